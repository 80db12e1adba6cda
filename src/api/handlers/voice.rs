use super::{json_response, query_param};
use farmer_advisory::voice::rate_limiter::RateLimiter;
use farmer_advisory::voice::{
    asr_provider, polly_voice_id, transcribe_language_code, tts_provider, AsrProvider, AudioKind,
    Language, TtsProvider,
};
use farmer_advisory::{AdvisoryError, Orchestrator};
use lambda_http::{Body, Request, Response};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Routing decision for a speech-to-text request. The transcription itself
/// happens in the external provider; this endpoint enforces the quota and
/// picks the provider for the session's language.
#[derive(Debug, Serialize)]
struct AsrRoutingResponse {
    kind: AudioKind,
    language: Language,
    provider: AsrProvider,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_code: Option<&'static str>,
    remaining: u32,
    reset_in_seconds: i64,
}

#[derive(Debug, Serialize)]
struct TtsRoutingResponse {
    kind: AudioKind,
    language: Language,
    provider: TtsProvider,
    #[serde(skip_serializing_if = "Option::is_none")]
    voice_id: Option<&'static str>,
    remaining: u32,
    reset_in_seconds: i64,
}

#[derive(Debug, Serialize)]
struct RateLimitedResponse {
    error: String,
    retry_after_seconds: i64,
}

pub async fn handle_asr(
    orchestrator: &Arc<Orchestrator>,
    request: &Request,
    correlation_id: &str,
) -> Result<Response<Body>, lambda_http::Error> {
    let session_id = session_id(request);
    let language = language(request);

    match check_rate_limit(orchestrator, &session_id, AudioKind::Asr, correlation_id).await {
        Ok((remaining, reset_in_seconds)) => json_response(
            200,
            &AsrRoutingResponse {
                kind: AudioKind::Asr,
                language,
                provider: asr_provider(language),
                language_code: transcribe_language_code(language),
                remaining,
                reset_in_seconds,
            },
        ),
        Err(response) => response,
    }
}

pub async fn handle_tts(
    orchestrator: &Arc<Orchestrator>,
    request: &Request,
    correlation_id: &str,
) -> Result<Response<Body>, lambda_http::Error> {
    let session_id = session_id(request);
    let language = language(request);

    match check_rate_limit(orchestrator, &session_id, AudioKind::Tts, correlation_id).await {
        Ok((remaining, reset_in_seconds)) => json_response(
            200,
            &TtsRoutingResponse {
                kind: AudioKind::Tts,
                language,
                provider: tts_provider(language),
                voice_id: polly_voice_id(language),
                remaining,
                reset_in_seconds,
            },
        ),
        Err(response) => response,
    }
}

/// Current window state for the session without consuming a request.
pub async fn handle_status(
    orchestrator: &Arc<Orchestrator>,
    request: &Request,
    correlation_id: &str,
) -> Result<Response<Body>, lambda_http::Error> {
    let session_id = session_id(request);
    let kind = match query_param(request, "kind").as_deref() {
        Some("tts") => AudioKind::Tts,
        _ => AudioKind::Asr,
    };

    let limiter = RateLimiter::new(orchestrator.store().clone(), orchestrator.config());
    let status = limiter.status(&session_id, kind).await;

    info!(
        correlation_id = correlation_id,
        session = session_id.as_str(),
        kind = kind.as_str(),
        remaining = status.remaining,
        "Rate limit status read"
    );

    json_response(200, &status)
}

type LimitOutcome = Result<(u32, i64), Result<Response<Body>, lambda_http::Error>>;

async fn check_rate_limit(
    orchestrator: &Arc<Orchestrator>,
    session_id: &str,
    kind: AudioKind,
    correlation_id: &str,
) -> LimitOutcome {
    let limiter = RateLimiter::new(orchestrator.store().clone(), orchestrator.config());

    match limiter.check_and_increment(session_id, kind).await {
        Ok(decision) => Ok((decision.remaining, decision.reset_in_seconds)),
        Err(AdvisoryError::RateLimited {
            retry_after_seconds,
        }) => {
            info!(
                correlation_id = correlation_id,
                session = session_id,
                kind = kind.as_str(),
                retry_after = retry_after_seconds,
                "Audio request rate limited"
            );
            Err(json_response(
                429,
                &RateLimitedResponse {
                    error: format!(
                        "Rate limit exceeded. Try again in {retry_after_seconds} seconds."
                    ),
                    retry_after_seconds,
                },
            ))
        }
        // The limiter only fails with RateLimited; anything else would be
        // a programming error, but degrade to allowing the request.
        Err(_) => Ok((0, 0)),
    }
}

fn session_id(request: &Request) -> String {
    request
        .headers()
        .get("x-session-id")
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
        .or_else(|| query_param(request, "session_id"))
        .unwrap_or_else(|| "anonymous".to_string())
}

fn language(request: &Request) -> Language {
    let tag = query_param(request, "language")
        .or_else(|| {
            request
                .headers()
                .get("x-language")
                .and_then(|value| value.to_str().ok())
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| "en".to_string());

    Language::parse(&tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_http::http::HeaderValue;

    fn request_with(uri: &str) -> Request {
        let http_request = lambda_http::http::Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::Empty)
            .unwrap_or_default();
        Request::from(http_request)
    }

    #[test]
    fn session_id_prefers_the_header() {
        let mut request = request_with("/voice/asr?session_id=from-query");
        request
            .headers_mut()
            .insert("x-session-id", HeaderValue::from_static("from-header"));

        assert_eq!(session_id(&request), "from-header");
    }

    #[test]
    fn session_id_falls_back_to_query_then_anonymous() {
        let request = request_with("/voice/asr?session_id=from-query");
        assert_eq!(session_id(&request), "from-query");

        let request = request_with("/voice/asr");
        assert_eq!(session_id(&request), "anonymous");
    }

    #[test]
    fn language_reads_query_param_and_header() {
        let request = request_with("/voice/asr?language=odia");
        assert_eq!(language(&request), Language::Odia);

        let mut request = request_with("/voice/asr");
        request
            .headers_mut()
            .insert("x-language", HeaderValue::from_static("hi"));
        assert_eq!(language(&request), Language::Hindi);

        let request = request_with("/voice/asr");
        assert_eq!(language(&request), Language::English);
    }
}
