pub mod query;
pub mod voice;

use lambda_http::{Body, Request, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn json_response<T: Serialize>(
    status: u16,
    payload: &T,
) -> Result<Response<Body>, lambda_http::Error> {
    let body = serde_json::to_string(payload)
        .map_err(|e| lambda_http::Error::from(format!("Failed to serialize response: {e}")))?;

    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .map_err(|e| lambda_http::Error::from(e.to_string()))
}

pub fn error_response(status: u16, message: &str) -> Result<Response<Body>, lambda_http::Error> {
    json_response(
        status,
        &ErrorResponse {
            error: message.to_string(),
        },
    )
}

/// Read one query-string parameter from the raw URI, percent-decoded.
pub fn query_param(request: &Request, name: &str) -> Option<String> {
    let raw_query = request.uri().query()?;

    for pair in raw_query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key == name {
            return Some(percent_decode(value));
        }
    }

    None
}

fn percent_decode(value: &str) -> String {
    let mut decoded = String::with_capacity(value.len());
    let mut bytes = value.bytes();

    while let Some(byte) = bytes.next() {
        match byte {
            b'+' => decoded.push(' '),
            b'%' => {
                let high = bytes.next();
                let low = bytes.next();
                let parsed = high.zip(low).and_then(|(h, l)| {
                    let hex = [h, l];
                    let hex = std::str::from_utf8(&hex).ok()?;
                    u8::from_str_radix(hex, 16).ok()
                });
                match parsed {
                    Some(code) => decoded.push(code as char),
                    None => decoded.push('%'),
                }
            }
            other => decoded.push(other as char),
        }
    }

    decoded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(uri: &str) -> Request {
        let http_request = lambda_http::http::Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::Empty)
            .unwrap_or_default();
        Request::from(http_request)
    }

    #[test]
    fn query_param_reads_from_raw_uri() {
        let request = request_with("/query?query=sandy+soil&state=Rajasthan");
        assert_eq!(query_param(&request, "query").as_deref(), Some("sandy soil"));
        assert_eq!(query_param(&request, "state").as_deref(), Some("Rajasthan"));
        assert!(query_param(&request, "pincode").is_none());
    }

    #[test]
    fn percent_sequences_decode() {
        assert_eq!(percent_decode("clay%20soil"), "clay soil");
        assert_eq!(percent_decode("pH%3D6.5"), "pH=6.5");
        // Malformed escapes degrade to a literal percent sign.
        assert_eq!(percent_decode("50%"), "50%");
    }
}
