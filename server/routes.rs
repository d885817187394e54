use std::io::{Cursor, Read};
use std::time::Instant;

use tiny_http::{Header, Method, Request, Response, StatusCode};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::handlers;
use crate::state::SharedState;

pub type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

/// Every response goes through here so it carries the CORS header.
fn build(status: u16, headers: &[(&str, &str)], body: Vec<u8>) -> HttpResponse {
    let len = body.len();
    let headers = headers
        .iter()
        .chain(std::iter::once(&("Access-Control-Allow-Origin", "*")))
        .filter_map(|(name, value)| header(name, value))
        .collect();
    Response::new(StatusCode(status), headers, Cursor::new(body), Some(len), None)
}

pub fn json_response(status: StatusCode, body: String) -> HttpResponse {
    build(status.0, &[("Content-Type", "application/json")], body.into_bytes())
}

pub fn file_response(bytes: Vec<u8>, content_type: &str) -> HttpResponse {
    build(200, &[("Content-Type", content_type)], bytes)
}

pub fn download_response(bytes: Vec<u8>, content_type: &str, filename: &str) -> HttpResponse {
    let disposition = format!("attachment; filename=\"{}\"", filename);
    build(
        200,
        &[("Content-Type", content_type), ("Content-Disposition", disposition.as_str())],
        bytes,
    )
}

pub fn not_found() -> HttpResponse {
    build(404, &[("Content-Type", "text/plain")], b"404 Not Found".to_vec())
}

pub fn preflight() -> HttpResponse {
    build(
        204,
        &[
            ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
            ("Access-Control-Allow-Headers", "Content-Type"),
        ],
        Vec::new(),
    )
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub fn content_type(request: &Request) -> String {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default()
}

/// Reads the request body, refusing anything over `limit` bytes. The
/// declared length is checked first so oversize uploads are never read.
pub fn read_body(request: &mut Request, limit: usize) -> Result<Vec<u8>, ApiError> {
    if request.body_length().is_some_and(|len| len > limit) {
        return Err(ApiError::PayloadTooLarge { limit });
    }
    let mut body = Vec::new();
    request
        .as_reader()
        .take(limit as u64 + 1)
        .read_to_end(&mut body)?;
    if body.len() > limit {
        return Err(ApiError::PayloadTooLarge { limit });
    }
    Ok(body)
}

/// Turns a handler result into a response, logging failures.
pub fn respond_with(result: Result<HttpResponse, ApiError>) -> HttpResponse {
    result.unwrap_or_else(|e| {
        if e.status() >= 500 {
            tracing::error!(error = %e, "request failed");
        } else {
            warn!(error = %e, status = e.status(), "request rejected");
        }
        e.to_response()
    })
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Routes one request to its handler and sends the response.
pub fn dispatch(mut request: Request, state: SharedState) {
    let started = Instant::now();
    let method = request.method().clone();
    let url = request.url().to_owned();
    let path = url.split('?').next().unwrap_or("").to_owned();

    let response = if method == Method::Options {
        preflight()
    } else if let (Method::Get, Some(rest)) = (&method, path.strip_prefix("/static/")) {
        handlers::static_files::handle(rest, &state)
    } else {
        match (&method, path.as_str()) {
            (Method::Post, "/api/compare") => handlers::compare::handle(&mut request, &state),
            (Method::Post, "/api/preview") => handlers::preview::handle(&mut request, &state),
            (Method::Get, "/api/get_csv") => handlers::export::handle(&state),
            _ => not_found(),
        }
    };

    info!(
        %method,
        path = %path,
        status = response.status_code().0,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    if let Err(e) = request.respond(response) {
        warn!(error = %e, "could not send response");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_http::TestRequest;

    const LIMIT: usize = 8;

    fn post(body: &'static str, headers: &[(&str, &str)]) -> Request {
        headers
            .iter()
            .filter_map(|(name, value)| header(name, value))
            .fold(
                TestRequest::new().with_method(Method::Post).with_path("/api/compare").with_body(body),
                |req, h| req.with_header(h),
            )
            .into()
    }

    #[test]
    fn body_at_the_limit_is_read() {
        let mut req = post("01234567", &[]);
        assert_eq!(read_body(&mut req, LIMIT).unwrap(), b"01234567");
    }

    #[test]
    fn declared_oversize_body_is_refused_unread() {
        // The declared length alone decides; the short payload is never consumed.
        let mut req = post("0123", &[("Content-Length", "4096")]);
        assert_eq!(req.body_length(), Some(4096));
        assert!(matches!(read_body(&mut req, LIMIT), Err(ApiError::PayloadTooLarge { limit: LIMIT })));

        let mut req = post("0123456789", &[]);
        assert!(matches!(read_body(&mut req, LIMIT), Err(ApiError::PayloadTooLarge { .. })));
    }

    #[test]
    fn undeclared_oversize_body_is_refused() {
        let mut req = post("a\r\n0123456789\r\n0\r\n\r\n", &[("Transfer-Encoding", "chunked")]);
        assert_eq!(req.body_length(), None);
        assert!(matches!(read_body(&mut req, LIMIT), Err(ApiError::PayloadTooLarge { limit: LIMIT })));
    }

    #[test]
    fn undeclared_body_within_limit_is_read() {
        let mut req = post("5\r\nhello\r\n0\r\n\r\n", &[("Transfer-Encoding", "chunked")]);
        assert_eq!(read_body(&mut req, LIMIT).unwrap(), b"hello");
    }

    #[test]
    fn oversize_upload_is_413_before_any_work() {
        let (_dir, state) = crate::handlers::test_state();
        let declared = (state.config.max_upload_bytes + 1).to_string();
        let mut req = post("x", &[("Content-Length", declared.as_str())]);
        let resp = handlers::compare::handle(&mut req, &state);
        assert_eq!(resp.status_code().0, 413);
        assert!(state.ledger.is_empty());
    }

    fn header_value(resp: &HttpResponse, name: &'static str) -> Option<String> {
        resp.headers()
            .iter()
            .find(|h| h.field.equiv(name))
            .map(|h| h.value.as_str().to_owned())
    }

    #[test]
    fn every_response_allows_any_origin() {
        for resp in [not_found(), preflight(), json_response(StatusCode(200), "{}".into())] {
            assert_eq!(header_value(&resp, "Access-Control-Allow-Origin").as_deref(), Some("*"));
        }
    }

    #[test]
    fn downloads_are_attachments() {
        let resp = download_response(b"a;b\n".to_vec(), "text/csv", "Ranking_Comparacoes.csv");
        assert_eq!(
            header_value(&resp, "Content-Disposition").as_deref(),
            Some("attachment; filename=\"Ranking_Comparacoes.csv\"")
        );
        assert_eq!(resp.status_code().0, 200);
    }

    #[test]
    fn preflight_is_empty_204() {
        let resp = preflight();
        assert_eq!(resp.status_code().0, 204);
        assert!(header_value(&resp, "Access-Control-Allow-Methods").is_some());
    }
}
