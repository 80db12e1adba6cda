use lambda_http::{Request, Response};
use uuid::Uuid;

/// Header used to thread one request id through every log line and the
/// response.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Take the caller's correlation id, or mint a UUID v4 when the header is
/// absent or empty.
pub fn extract_or_generate_correlation_id(request: &Request) -> String {
    request
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string)
}

/// Echo the correlation id on the response so callers can stitch traces.
pub fn add_correlation_id_to_response<T>(
    mut response: Response<T>,
    correlation_id: &str,
) -> Response<T> {
    if let Ok(header_value) = correlation_id.parse() {
        response
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, header_value);
    }
    response
}
