use image_comparator::EditParams;

use crate::error::ApiError;
use crate::util::multipart::{extract_boundary, parse_parts, Part};

/// Multipart field carrying the image.
pub const FILE_FIELD: &str = "originalImage";

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// A validated upload: the image bytes, its client-side name and the edit
/// parameters sent alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadForm {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub params: EditParams,
}

impl UploadForm {
    /// Parses and validates a multipart upload. Nothing is written to disk.
    pub fn parse(content_type: &str, body: &[u8]) -> Result<Self, ApiError> {
        let boundary = extract_boundary(content_type).ok_or(ApiError::InvalidMultipart)?;
        let parts = parse_parts(body, &boundary);

        let file = parts
            .iter()
            .find(|p| p.name == FILE_FIELD && p.is_file())
            .ok_or(ApiError::MissingUpload)?;
        let filename = file.filename.clone().unwrap_or_default();
        if filename.is_empty() {
            return Err(ApiError::EmptyFilename);
        }
        if !allowed_extension(&filename) {
            return Err(ApiError::DisallowedExtension);
        }

        let params = parse_params(&parts)?;
        Ok(UploadForm { filename, bytes: file.data.to_vec(), params })
    }

    /// The filename reduced to a safe single path component.
    pub fn safe_name(&self) -> String {
        sanitize_filename(&self.filename)
    }
}

/// True when `filename` ends in one of the accepted image extensions
/// (case-insensitive).
pub fn allowed_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Strips directory components and replaces anything outside
/// `[A-Za-z0-9._-]` with `_`. The extension survives even when the stem is
/// empty, so `.png` becomes `upload.png`.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or("");
    let (stem, ext) = match base.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => (stem, Some(clean(ext))),
        _ => (base, None),
    };
    let stem = clean(stem);
    let stem = match stem.trim_matches('.') {
        "" => "upload",
        s => s,
    };
    match ext {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem.to_owned(),
    }
}

fn clean(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' { c } else { '_' })
        .collect()
}

fn parse_params(parts: &[Part<'_>]) -> Result<EditParams, ApiError> {
    let defaults = EditParams::default();
    Ok(EditParams {
        brightness: field(parts, "brilho", defaults.brightness)?,
        contrast: finite_field(parts, "contraste", defaults.contrast)?,
        saturation: finite_field(parts, "saturacao", defaults.saturation)?,
        rotation_degrees: finite_field(parts, "rotacao", defaults.rotation_degrees)?,
        resize_percent: field(parts, "redim", defaults.resize_percent)?,
    })
}

fn text_field<'a>(parts: &'a [Part<'_>], name: &str) -> Option<std::borrow::Cow<'a, str>> {
    parts
        .iter()
        .find(|p| p.name == name && !p.is_file())
        .map(|p| String::from_utf8_lossy(p.data))
}

/// Missing or blank fields take `default`; anything else must parse.
fn field<T: std::str::FromStr>(parts: &[Part<'_>], name: &'static str, default: T) -> Result<T, ApiError> {
    match text_field(parts, name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| ApiError::InvalidParameter { field: name, value: raw.into_owned() }),
        _ => Ok(default),
    }
}

fn finite_field(parts: &[Part<'_>], name: &'static str, default: f64) -> Result<f64, ApiError> {
    let value: f64 = field(parts, name, default)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ApiError::InvalidParameter { field: name, value: value.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::multipart::tests::build_body;

    const CT: &str = "multipart/form-data; boundary=TEST";

    fn upload(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Result<UploadForm, ApiError> {
        let mut parts: Vec<(&str, Option<&str>, &[u8])> =
            fields.iter().map(|(k, v)| (*k, None, v.as_bytes())).collect();
        if let Some((name, data)) = file {
            parts.push((FILE_FIELD, Some(name), data));
        }
        UploadForm::parse(CT, &build_body("TEST", &parts))
    }

    #[test]
    fn defaults_apply_when_fields_are_missing_or_blank() {
        let form = upload(&[("brilho", "")], Some(("cat.PNG", &b"img"[..]))).unwrap();
        assert_eq!(form.params, EditParams::default());
        assert_eq!(form.filename, "cat.PNG");
        assert_eq!(form.bytes, b"img");
    }

    #[test]
    fn fields_are_parsed() {
        let form = upload(
            &[("brilho", "-20"), ("contraste", "1.5"), ("saturacao", "0.5"), ("rotacao", "90"), ("redim", "50")],
            Some(("dog.jpg", &b"x"[..])),
        )
        .unwrap();
        assert_eq!(form.params.brightness, -20);
        assert_eq!(form.params.contrast, 1.5);
        assert_eq!(form.params.saturation, 0.5);
        assert_eq!(form.params.rotation_degrees, 90.0);
        assert_eq!(form.params.resize_percent, 50);
    }

    #[test]
    fn missing_file_is_rejected() {
        assert!(matches!(upload(&[("brilho", "1")], None), Err(ApiError::MissingUpload)));
    }

    #[test]
    fn empty_filename_is_rejected() {
        assert!(matches!(upload(&[], Some(("", &b"x"[..]))), Err(ApiError::EmptyFilename)));
    }

    #[test]
    fn bad_extension_is_rejected() {
        assert!(matches!(upload(&[], Some(("notes.gif", &b"x"[..]))), Err(ApiError::DisallowedExtension)));
        assert!(matches!(upload(&[], Some(("noext", &b"x"[..]))), Err(ApiError::DisallowedExtension)));
    }

    #[test]
    fn unparsable_or_non_finite_numbers_are_rejected() {
        assert!(matches!(
            upload(&[("brilho", "bright")], Some(("a.png", &b"x"[..]))),
            Err(ApiError::InvalidParameter { field: "brilho", .. })
        ));
        assert!(matches!(
            upload(&[("rotacao", "NaN")], Some(("a.png", &b"x"[..]))),
            Err(ApiError::InvalidParameter { field: "rotacao", .. })
        ));
    }

    #[test]
    fn non_multipart_is_rejected() {
        assert!(matches!(
            UploadForm::parse("application/json", b"{}"),
            Err(ApiError::InvalidMultipart)
        ));
    }

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\photos\\my cat.png"), "my_cat.png");
        assert_eq!(sanitize_filename(".hidden.png"), "hidden.png");
        assert_eq!(sanitize_filename(".."), "upload");
    }

    #[test]
    fn bare_extension_names_keep_their_extension() {
        assert_eq!(sanitize_filename(".png"), "upload.png");
        assert_eq!(sanitize_filename("...jpg"), "upload.jpg");
        assert_eq!(sanitize_filename("dir/.JPEG"), "upload.JPEG");
        assert_eq!(sanitize_filename("a b.c d.png"), "a_b.c_d.png");

        let form = upload(&[], Some((".png", &b"x"[..]))).unwrap();
        assert_eq!(form.safe_name(), "upload.png");
        assert!(allowed_extension(&form.safe_name()));
    }
}
