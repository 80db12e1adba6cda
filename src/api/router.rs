use crate::handlers::{self, query, voice};
use crate::middleware::correlation::{
    add_correlation_id_to_response, extract_or_generate_correlation_id,
};
use farmer_advisory::Orchestrator;
use lambda_http::{Body, Request, Response};
use std::env;
use std::sync::Arc;
use tracing::info;

/// Add CORS headers to response
fn add_cors_headers(mut response: Response<Body>) -> Response<Body> {
    let origin = env::var("ORIGIN").unwrap_or_else(|_| "*".to_string());

    let headers = response.headers_mut();

    // These are static strings that should always parse successfully
    if let Ok(value) = origin.parse() {
        headers.insert("Access-Control-Allow-Origin", value);
    }
    if let Ok(value) = "GET,POST,OPTIONS".parse() {
        headers.insert("Access-Control-Allow-Methods", value);
    }
    if let Ok(value) = "Content-Type,X-Session-Id,X-Language,X-Correlation-Id".parse() {
        headers.insert("Access-Control-Allow-Headers", value);
    }
    if let Ok(value) = "3600".parse() {
        headers.insert("Access-Control-Max-Age", value);
    }

    response
}

pub async fn route_request(
    orchestrator: &Arc<Orchestrator>,
    event: &Request,
) -> Result<Response<Body>, lambda_http::Error> {
    let correlation_id = extract_or_generate_correlation_id(event);

    info!(
        correlation_id = correlation_id.as_str(),
        method = event.method().as_str(),
        path = event.uri().path(),
        "Request received"
    );

    // Handle OPTIONS preflight requests
    if event.method().as_str() == "OPTIONS" {
        let response = Response::builder()
            .status(200)
            .body(Body::Empty)
            .map_err(|e| lambda_http::Error::from(e.to_string()))?;

        let response_with_cors = add_cors_headers(response);
        let response_with_correlation =
            add_correlation_id_to_response(response_with_cors, &correlation_id);
        return Ok(response_with_correlation);
    }

    let response = match (event.method().as_str(), event.uri().path()) {
        ("POST" | "GET", "/query") => {
            query::handle_query(orchestrator, event, &correlation_id).await?
        }
        ("POST", "/voice/asr") => voice::handle_asr(orchestrator, event, &correlation_id).await?,
        ("POST", "/voice/tts") => voice::handle_tts(orchestrator, event, &correlation_id).await?,
        ("GET", "/voice/limit") => {
            voice::handle_status(orchestrator, event, &correlation_id).await?
        }
        _ => handlers::error_response(404, "Not Found")?,
    };

    let response_with_cors = add_cors_headers(response);
    let response_with_correlation =
        add_correlation_id_to_response(response_with_cors, &correlation_id);

    info!(
        correlation_id = correlation_id.as_str(),
        status = response_with_correlation.status().as_u16(),
        "Response sent"
    );

    Ok(response_with_correlation)
}
