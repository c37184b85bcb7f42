//! Web adapter — browser chat front-end over HTTP.
//!
//! The server is session-less: the page keeps the transcript and posts it
//! with every message.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::agent::{ChatSession, LlmClient, Message, Outcome};
use crate::config::{Config, Link};
use crate::templates;
use crate::Result;

/// Body of `POST /api/chat`
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<Message>,
}

/// Response of `POST /api/chat`
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Extras shown on the chat page besides the conversation itself
#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    pub greeting: Option<String>,
    pub links: Vec<Link>,
}

impl PageOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            greeting: config.greeting.clone(),
            links: config.links.clone(),
        }
    }
}

/// Shared handler state
struct AppState<C: LlmClient> {
    session: Arc<ChatSession<C>>,
    /// Rendered once; the page never changes while serving
    index_html: Arc<str>,
}

impl<C: LlmClient> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            index_html: self.index_html.clone(),
        }
    }
}

/// Build the HTTP router for a session.
pub fn router<C: LlmClient + 'static>(session: Arc<ChatSession<C>>, page: PageOptions) -> Router {
    let index_html = templates::render_index(
        session.profile().name(),
        page.greeting.as_deref(),
        &page.links,
    );
    let state = AppState {
        session,
        index_html: Arc::from(index_html),
    };

    Router::new()
        .route("/", get(index::<C>))
        .route("/health", get(health))
        .route("/api/chat", post(chat::<C>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C.
pub async fn serve<C: LlmClient + 'static>(
    session: Arc<ChatSession<C>>,
    page: PageOptions,
    host: &str,
    port: u16,
) -> Result<()> {
    let listener = TcpListener::bind((host, port)).await?;
    info!(addr = %listener.local_addr()?, persona = session.profile().name(), "web chat listening");

    axum::serve(listener, router(session, page))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Resolves on Ctrl+C. If the signal can't be watched the server keeps
/// running instead of shutting down at once.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; stop the process another way");
        std::future::pending::<()>().await;
    }
    info!("shutting down web chat");
}

async fn index<C: LlmClient + 'static>(State(state): State<AppState<C>>) -> Html<String> {
    Html(state.index_html.to_string())
}

/// Liveness check
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn chat<C: LlmClient + 'static>(
    State(state): State<AppState<C>>,
    Json(request): Json<ChatRequest>,
) -> std::result::Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "message must not be empty".to_string(),
            }),
        ));
    }

    let reply = state.session.ask(message, &request.history).await;
    Ok(Json(ChatResponse {
        reply: reply.content,
        outcome: reply.outcome,
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::agent::llm::FakeLlmClient;
    use crate::agent::FALLBACK_MESSAGE;
    use crate::notify::RecordingNotifier;
    use crate::profile::{Persona, ProfileContext};
    use crate::tools;

    fn test_session(client: FakeLlmClient) -> Arc<ChatSession<FakeLlmClient>> {
        let tools = tools::default_registry(Arc::new(RecordingNotifier::new())).unwrap();
        Arc::new(ChatSession::new(
            client,
            ProfileContext::new(&Persona::new("Ada")),
            tools,
            4,
        ))
    }

    fn post_chat(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = router(test_session(FakeLlmClient::new(vec![])), PageOptions::default());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_index_shows_persona_name() {
        let app = router(test_session(FakeLlmClient::new(vec![])), PageOptions::default());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let page = body_text(response).await;
        assert!(page.contains("Ada - AI Assistant"));
        assert!(page.contains("const greeting = null;"));
    }

    #[tokio::test]
    async fn test_index_shows_greeting_and_links() {
        let page = PageOptions {
            greeting: Some("Hello! I'm Ada, ask me about my work.".to_string()),
            links: vec![Link {
                label: "Book a meeting".to_string(),
                url: "https://cal.example/ada".to_string(),
            }],
        };
        let app = router(test_session(FakeLlmClient::new(vec![])), page);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let page = body_text(response).await;
        assert!(page.contains(r#"const greeting = "Hello! I'm Ada, ask me about my work.";"#));
        assert!(page.contains(r#"<a href="https://cal.example/ada" target="_blank" rel="noopener">Book a meeting</a>"#));
    }

    #[tokio::test]
    async fn test_chat_accepts_greeting_first_history() {
        let session = test_session(FakeLlmClient::new(vec!["Sure."]));
        let app = router(session.clone(), PageOptions::default());

        let response = app
            .oneshot(post_chat(json!({
                "message": "Tell me more",
                "history": [{"role": "assistant", "content": "Hello! I'm Ada."}]
            })))
            .await
            .unwrap();

        assert_eq!(body_json(response).await["outcome"], "answered");
        let sent = &session.client().requests()[0];
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[1].role, crate::agent::Role::Assistant);
        assert_eq!(sent[1].text(), "Hello! I'm Ada.");
    }

    #[tokio::test]
    async fn test_chat_passes_history() {
        let session = test_session(FakeLlmClient::new(vec!["Happy to help."]));
        let app = router(session.clone(), PageOptions::default());

        let response = app
            .oneshot(post_chat(json!({
                "message": "Can you help?",
                "history": [
                    {"role": "user", "content": "Hi"},
                    {"role": "assistant", "content": "Hello!"}
                ]
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["reply"], "Happy to help.");
        assert_eq!(body["outcome"], "answered");

        let sent = &session.client().requests()[0];
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[3].text(), "Can you help?");
    }

    #[tokio::test]
    async fn test_chat_reports_fallback() {
        let app = router(test_session(FakeLlmClient::new(vec![])), PageOptions::default());

        let response = app.oneshot(post_chat(json!({"message": "Hello"}))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["reply"], FALLBACK_MESSAGE);
        assert_eq!(body["outcome"], "fallback");
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message() {
        let session = test_session(FakeLlmClient::new(vec![]));
        let app = router(session.clone(), PageOptions::default());

        let response = app.oneshot(post_chat(json!({"message": "   "}))).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(session.client().calls(), 0);
    }
}
