use super::{error_response, json_response, query_param};
use farmer_advisory::agents::orchestrator::failure_result;
use farmer_advisory::models::QueryRequest;
use farmer_advisory::Orchestrator;
use lambda_http::{Body, Request, Response};
use std::sync::Arc;
use tracing::{error, info};

/// Advisory query entry point. Accepts a JSON body (POST) or query-string
/// parameters (GET); a missing query text is the only client error. Agent
/// failures never surface as errors — the orchestrator always produces a
/// (possibly partial) result.
pub async fn handle_query(
    orchestrator: &Arc<Orchestrator>,
    request: &Request,
    correlation_id: &str,
) -> Result<Response<Body>, lambda_http::Error> {
    let Some(query_request) = parse_request(request) else {
        return error_response(400, "Invalid JSON body");
    };

    if query_request.query.trim().is_empty() {
        return error_response(400, "Question/query parameter is required.");
    }

    info!(
        correlation_id = correlation_id,
        pincode = query_request.pincode.as_deref().unwrap_or(""),
        state = query_request.state.as_deref().unwrap_or(""),
        "Handling advisory query"
    );

    // Run the pipeline on its own task so even a panic degrades into the
    // minimal orchestrator-failure result instead of a 500.
    let task = tokio::spawn({
        let orchestrator = orchestrator.clone();
        let query_request = query_request.clone();
        async move { orchestrator.handle(&query_request).await }
    });

    let result = match task.await {
        Ok(result) => result,
        Err(join_error) => {
            error!(
                correlation_id = correlation_id,
                error = %join_error,
                "Orchestration task failed"
            );
            failure_result(&query_request.query, &join_error.to_string())
        }
    };

    info!(
        correlation_id = correlation_id,
        confidence = result.overall_confidence,
        agents = result.agents_invoked.len(),
        errors = result.agent_errors.len(),
        "Advisory query completed"
    );

    json_response(200, &result)
}

/// Body JSON wins; a GET falls back to query-string parameters.
fn parse_request(request: &Request) -> Option<QueryRequest> {
    match request.body() {
        Body::Text(text) if !text.is_empty() => serde_json::from_str(text).ok(),
        Body::Binary(bytes) if !bytes.is_empty() => serde_json::from_slice(bytes).ok(),
        _ => {
            let query = query_param(request, "query")
                .or_else(|| query_param(request, "question"))
                .unwrap_or_default();

            Some(QueryRequest {
                query,
                pincode: query_param(request, "pincode"),
                district: query_param(request, "district"),
                state: query_param(request, "state"),
                language: query_param(request, "language"),
                user_profile: None,
                previous_queries: Vec::new(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_request(uri: &str) -> Request {
        let http_request = lambda_http::http::Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::Empty)
            .unwrap_or_default();
        Request::from(http_request)
    }

    fn post_request(body: &str) -> Request {
        let http_request = lambda_http::http::Request::builder()
            .method("POST")
            .uri("/query")
            .body(Body::from(body))
            .unwrap_or_default();
        Request::from(http_request)
    }

    #[test]
    fn json_body_parses_into_request() {
        let request =
            post_request(r#"{"query":"what to grow","pincode":"411001","state":"Maharashtra"}"#);

        let parsed = parse_request(&request).unwrap_or_default();
        assert_eq!(parsed.query, "what to grow");
        assert_eq!(parsed.pincode.as_deref(), Some("411001"));
        assert_eq!(parsed.state.as_deref(), Some("Maharashtra"));
    }

    #[test]
    fn question_alias_is_accepted() {
        let request = post_request(r#"{"question":"rabi season crops"}"#);
        let parsed = parse_request(&request).unwrap_or_default();
        assert_eq!(parsed.query, "rabi season crops");
    }

    #[test]
    fn invalid_json_is_rejected() {
        let request = post_request("{not json");
        assert!(parse_request(&request).is_none());
    }

    #[test]
    fn empty_body_reads_query_string() {
        let request = get_request("/query?query=sandy+soil&state=Rajasthan");
        let parsed = parse_request(&request).unwrap_or_default();
        assert_eq!(parsed.query, "sandy soil");
        assert_eq!(parsed.state.as_deref(), Some("Rajasthan"));
    }

    #[test]
    fn missing_query_yields_empty_string() {
        let request = get_request("/query?state=Punjab");
        let parsed = parse_request(&request).unwrap_or_default();
        assert!(parsed.query.is_empty());
    }

    #[test]
    fn user_profile_fields_deserialize() {
        let request = post_request(
            r#"{"query":"crops","user_profile":{"farm_size_ha":2.5,"irrigation_available":false}}"#,
        );

        let parsed = parse_request(&request).unwrap_or_default();
        let profile = parsed.user_profile.unwrap_or_default();
        assert_eq!(profile.farm_size_ha, Some(2.5));
        assert_eq!(profile.irrigation_available, Some(false));
    }
}
