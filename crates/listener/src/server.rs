//! Router, handlers and SSE framing.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::ACCESS_CONTROL_ALLOW_HEADERS;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use nodes::Orchestrator;
use pipeline::{ChatError, StreamEvent};
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Request headers browsers may send cross-origin.
pub const ALLOWED_HEADERS: [&str; 4] = ["authorization", "x-client-info", "apikey", "content-type"];

/// [`ALLOWED_HEADERS`] as the value sent on every non-preflight response.
const ALLOWED_HEADERS_VALUE: &str = "authorization, x-client-info, apikey, content-type";

/// Final frame written after the terminal event.
pub const DONE_SENTINEL: &str = "[DONE]";

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }
}

/// Builds the service router: `POST /chat`, `GET /health`, permissive CORS.
///
/// Preflights are answered by the CORS layer. Every other response, error
/// bodies and event streams included, also carries the allowed-headers list.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static));

    Router::new()
        .route("/chat", post(chat))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS_VALUE),
        ))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let transcript = crate::parse_chat_request(&body)?;
    info!(messages = transcript.len(), "Chat request accepted");

    let (sink, rx) = nodes::channel();
    let orchestrator = Arc::clone(&state.orchestrator);
    tokio::spawn(async move {
        orchestrator.run(transcript, sink).await;
    });

    Ok(Sse::new(event_stream(rx)).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL)))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

// ---------------------------------------------------------------------------
// Framing
// ---------------------------------------------------------------------------

/// Frames each event as one `data: <json>` SSE event, in order, followed by
/// a `data: [DONE]` frame once the orchestrator closes its sink.
pub fn event_stream(
    rx: UnboundedReceiver<StreamEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    UnboundedReceiverStream::new(rx)
        .map(|event| Ok(frame(&event)))
        .chain(tokio_stream::once(Ok(Event::default().data(DONE_SENTINEL))))
}

fn frame(event: &StreamEvent) -> Event {
    match Event::default().json_data(event) {
        Ok(framed) => framed,
        Err(err) => {
            error!(error = %err, "Failed to serialise stream event");
            Event::default().data(r#"{"type":"error","content":"AI service temporarily unavailable."}"#)
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A failure reported before any stream is opened, as `{ "error": "..." }`.
#[derive(Debug)]
pub struct ApiError(pub ChatError);

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        warn!(kind = self.0.kind(), error = %self.0, status = status.as_u16(), "Chat request rejected");
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::Request;
    use nodes::prompts::WRITER_PROMPT;
    use nodes::Mode;
    use pipeline::testing::ScriptedCompletionClient;
    use serde_json::Value;
    use tower::ServiceExt;

    const BRIEF: &str = r#"{"writerBrief": "Cassoulet de Castelnaudary", "rubric": [{"criterion": "Beans", "expectations": "Lingot beans soaked overnight"}]}"#;

    fn app(client: Arc<ScriptedCompletionClient>) -> Router {
        router(AppState::new(Arc::new(Orchestrator::new(
            client,
            Mode::MultiAgent,
        ))))
    }

    fn assert_cors_headers(resp: &Response) {
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        let allowed = resp.headers()["access-control-allow-headers"]
            .to_str()
            .unwrap();
        for header in ALLOWED_HEADERS {
            assert!(allowed.contains(header), "{allowed} should allow {header}");
        }
    }

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header("origin", "https://recipes.example")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Splits an SSE body into its `data:` payloads.
    fn data_frames(body: &str) -> Vec<String> {
        body.split("\n\n")
            .filter_map(|frame| frame.strip_prefix("data: "))
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_chat_streams_status_then_assistant_then_done() {
        let client = Arc::new(ScriptedCompletionClient::new([
            Ok(BRIEF.to_string()),
            Ok("### 1. Introduction\n\nCassoulet.".to_string()),
            Ok(r#"{"passed": true, "score": 92}"#.to_string()),
        ]));
        let resp = app(client.clone())
            .oneshot(chat_request(
                r#"{"messages": [{"role": "user", "content": "I want to make cassoulet"}]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()["content-type"].to_str().unwrap(),
            "text/event-stream"
        );
        assert_cors_headers(&resp);

        let frames = data_frames(&body_string(resp).await);
        let (done, payloads) = frames.split_last().unwrap();
        assert_eq!(done, DONE_SENTINEL);

        let events: Vec<StreamEvent> = payloads
            .iter()
            .map(|p| serde_json::from_str(p).unwrap())
            .collect();
        let (terminal, statuses) = events.split_last().unwrap();
        assert!(statuses.iter().all(|e| !e.is_terminal()));
        assert_eq!(statuses.len(), 6);
        assert_eq!(
            terminal,
            &StreamEvent::Assistant("### 1. Introduction\n\nCassoulet.".to_string())
        );
        assert_eq!(client.calls_with_system_prompt(WRITER_PROMPT), 1);
    }

    #[tokio::test]
    async fn test_endpoint_failure_becomes_terminal_error_event() {
        let client = Arc::new(ScriptedCompletionClient::new([Err(ChatError::RateLimited)]));
        let resp = app(client)
            .oneshot(chat_request(
                r#"{"messages": [{"role": "user", "content": "Brisket please"}]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let frames = data_frames(&body_string(resp).await);
        let terminal: Value = serde_json::from_str(&frames[frames.len() - 2]).unwrap();
        assert_eq!(terminal["type"], "error");
        assert_eq!(
            terminal["content"],
            "Rate limits exceeded. Please try again in a moment."
        );
    }

    #[tokio::test]
    async fn test_invalid_body_is_rejected_before_streaming() {
        for body in ["{}", r#"{"messages": "hello"}"#, "nope"] {
            let client = Arc::new(ScriptedCompletionClient::new([Ok(BRIEF.to_string())]));
            let resp = app(client.clone()).oneshot(chat_request(body)).await.unwrap();

            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {body}");
            assert_cors_headers(&resp);
            assert_eq!(
                resp.headers()["content-type"].to_str().unwrap(),
                "application/json"
            );
            let json: Value = serde_json::from_str(&body_string(resp).await).unwrap();
            assert!(json["error"].is_string());
            assert!(client.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn test_preflight_gets_empty_permissive_response() {
        let client = Arc::new(ScriptedCompletionClient::new([]));
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/chat")
            .header("origin", "https://recipes.example")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "apikey, content-type")
            .body(Body::empty())
            .unwrap();
        let resp = app(client).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_cors_headers(&resp);
        assert!(body_string(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let client = Arc::new(ScriptedCompletionClient::new([]));
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app(client).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_allowed_headers_value_lists_every_header() {
        assert_eq!(ALLOWED_HEADERS_VALUE, ALLOWED_HEADERS.join(", "));
    }

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError(ChatError::CreditsExhausted).into_response().status(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            ApiError(ChatError::RateLimited).into_response().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError(ChatError::configuration("missing key"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
