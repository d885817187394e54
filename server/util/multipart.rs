//! Minimal multipart/form-data parsing for upload requests.
//!
//! The whole (size-capped) body is already in memory, so parts are returned
//! as slices into it.

/// One part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part<'a> {
    /// The `name="..."` form field name.
    pub name: String,
    /// The `filename="..."` value; present only on file parts.
    pub filename: Option<String>,
    pub data: &'a [u8],
}

impl Part<'_> {
    pub fn is_file(&self) -> bool {
        self.filename.is_some()
    }
}

/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits `haystack` on every occurrence of `needle`, returning the pieces
/// between occurrences (excluding the needle itself).
pub fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut start = 0;
    while start <= haystack.len() {
        if let Some(pos) = find_subsequence(&haystack[start..], needle) {
            result.push(&haystack[start..start + pos]);
            start += pos + needle.len();
        } else {
            result.push(&haystack[start..]);
            break;
        }
    }
    result
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    if !content_type.trim_start().to_ascii_lowercase().starts_with("multipart/form-data") {
        return None;
    }
    content_type
        .split(';')
        .map(|s| s.trim())
        .find(|s| s.to_ascii_lowercase().starts_with("boundary="))
        .map(|s| s["boundary=".len()..].trim_matches('"').to_owned())
        .filter(|b| !b.is_empty())
}

/// Splits a multipart body into its parts. Parts without a
/// `Content-Disposition` name are skipped.
pub fn parse_parts<'a>(body: &'a [u8], boundary: &str) -> Vec<Part<'a>> {
    let delimiter = format!("--{}", boundary);
    let sep = b"\r\n\r\n";
    let mut parts = Vec::new();

    for chunk in split_on(body, delimiter.as_bytes()) {
        // The closing delimiter is followed by "--".
        if chunk.starts_with(b"--") {
            break;
        }
        let chunk = chunk.strip_prefix(b"\r\n").unwrap_or(chunk);
        let Some(sep_pos) = find_subsequence(chunk, sep) else {
            continue;
        };
        let headers = String::from_utf8_lossy(&chunk[..sep_pos]);
        let Some(disposition) = headers
            .lines()
            .find(|l| l.to_ascii_lowercase().starts_with("content-disposition:"))
        else {
            continue;
        };
        let Some(name) = disposition_param(disposition, "name") else {
            continue;
        };
        let raw = &chunk[sep_pos + sep.len()..];
        parts.push(Part {
            name,
            filename: disposition_param(disposition, "filename"),
            data: raw.strip_suffix(b"\r\n").unwrap_or(raw),
        });
    }
    parts
}

/// Reads one `key="value"` (or bare `key=value`) parameter from a
/// Content-Disposition header line. Keys match exactly, so `name` never
/// picks up `filename`.
fn disposition_param(line: &str, key: &str) -> Option<String> {
    let (_, params) = line.split_once(':')?;
    params.split(';').skip(1).find_map(|p| {
        let (k, v) = p.trim().split_once('=')?;
        if k.trim().eq_ignore_ascii_case(key) {
            Some(v.trim().trim_matches('"').to_owned())
        } else {
            None
        }
    })
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Builds a multipart body from `(name, filename, data)` triples.
    pub fn build_body(boundary: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, filename, data) in parts {
            body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
            let disposition = match filename {
                Some(f) => format!("Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n", name, f),
                None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", name),
            };
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
        body
    }

    #[test]
    fn boundary_is_extracted() {
        assert_eq!(
            extract_boundary("multipart/form-data; boundary=----abc123"),
            Some("----abc123".to_owned())
        );
        assert_eq!(
            extract_boundary("multipart/form-data; boundary=\"quoted\""),
            Some("quoted".to_owned())
        );
        assert_eq!(extract_boundary("application/json"), None);
        assert_eq!(extract_boundary("multipart/form-data"), None);
    }

    #[test]
    fn parts_are_split_with_names_and_filenames() {
        let body = build_body(
            "XyZ",
            &[
                ("brilho", None, &b"15"[..]),
                ("originalImage", Some("cat.png"), &b"\x89PNG\r\nrest"[..]),
            ],
        );
        let parts = parse_parts(&body, "XyZ");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].name, "brilho");
        assert!(!parts[0].is_file());
        assert_eq!(parts[0].data, b"15");
        assert_eq!(parts[1].name, "originalImage");
        assert_eq!(parts[1].filename.as_deref(), Some("cat.png"));
        // Embedded CRLFs inside the payload survive.
        assert_eq!(parts[1].data, b"\x89PNG\r\nrest");
    }

    #[test]
    fn name_lookup_ignores_filename_param() {
        let line = "Content-Disposition: form-data; filename=\"x.png\"; name=\"field\"";
        assert_eq!(disposition_param(line, "name").as_deref(), Some("field"));
        assert_eq!(disposition_param(line, "filename").as_deref(), Some("x.png"));
    }

    #[test]
    fn empty_filename_is_kept_as_empty() {
        let body = build_body("b", &[("originalImage", Some(""), &b""[..])]);
        let parts = parse_parts(&body, "b");
        assert_eq!(parts[0].filename.as_deref(), Some(""));
    }
}
