//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, the chat
//! endpoint, and static document lookup.

use crate::config::AppState;
use crate::handler::{chat, static_files};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::error::Error as StdError;
use std::sync::Arc;

pub const CHAT_PATH: &str = "/api/chat";

/// Request context for static lookups
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling.
///
/// Generic over the body so tests can drive it with in-memory requests.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let mut response = route_request(req, &state).await;
    http::apply_common_headers(&mut response, &state.config.http);
    Ok(response)
}

async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match (&method, path.as_str()) {
        (&Method::OPTIONS, _) => http::build_options_response(state.config.http.enable_cors),
        (&Method::POST, CHAT_PATH) => {
            if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
                return resp;
            }
            chat::handle_chat(req.into_body(), state).await
        }
        (_, CHAT_PATH) => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            http::build_405_response()
        }
        (&Method::GET | &Method::HEAD, _) => {
            let ctx = RequestContext {
                path: &path,
                is_head: method == Method::HEAD,
                if_none_match: req
                    .headers()
                    .get(hyper::header::IF_NONE_MATCH)
                    .and_then(|v| v.to_str().ok())
                    .map(ToString::to_string),
            };
            static_files::serve(&ctx, &state.config.routes).await
        }
        _ => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            http::build_405_response()
        }
    }
}

/// Reject early when Content-Length already exceeds the limit
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get(hyper::header::CONTENT_LENGTH)?;
    match content_length.to_str().ok()?.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(chat::payload_too_large())
        }
        Ok(_) => None,
        Err(_) => {
            logger::log_warning("Invalid Content-Length value, relying on streaming limit");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::backend::fake::FakeBackend;
    use crate::chat::profile::DEFAULT_CLOSING_LINE;
    use crate::config::Config;
    use crate::error::RelayError;
    use http_body_util::BodyExt;
    use hyper::{header, StatusCode};

    struct Fixture {
        _dir: tempfile::TempDir,
        state: Arc<AppState>,
        backend: Arc<FakeBackend>,
    }

    fn fixture(backend: FakeBackend) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Namaste</h1>").unwrap();
        std::fs::write(dir.path().join("chatbot.html"), "<div id=chat></div>").unwrap();
        std::fs::create_dir(dir.path().join("css")).unwrap();
        std::fs::write(dir.path().join("css/style.css"), "body{margin:0}").unwrap();

        let mut config = Config::load_from("/nonexistent/relay-config").unwrap();
        config.routes.root = dir.path().to_str().unwrap().to_string();
        config.http.max_body_size = 4096;

        let backend = Arc::new(backend);
        let state = Arc::new(AppState::with_backend(config, backend.clone()).unwrap());
        Fixture {
            _dir: dir,
            state,
            backend,
        }
    }

    fn get(path: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn post_chat(body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(Method::POST)
            .uri(CHAT_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    async fn send(fx: &Fixture, req: Request<Full<Bytes>>) -> (StatusCode, Bytes) {
        let response = handle_request(req, fx.state.clone()).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }

    fn json(body: &Bytes) -> serde_json::Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn test_root_serves_index_document() {
        let fx = fixture(FakeBackend::replying("unused"));
        let (status, body) = send(&fx, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"<h1>Namaste</h1>");
    }

    #[tokio::test]
    async fn test_chatbot_and_nested_files() {
        let fx = fixture(FakeBackend::replying("unused"));
        let (status, body) = send(&fx, get("/chatbot.html")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"<div id=chat></div>");

        let response = handle_request(get("/css/style.css"), fx.state.clone()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css; charset=utf-8");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let fx = fixture(FakeBackend::replying("unused"));
        let (status, body) = send(&fx, get("/nonexistent.file")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(&body[..], b"File not found");
        assert_eq!(fx.backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_chat_success() {
        let fx = fixture(FakeBackend::replying(
            "Diwali celebrates light over darkness.\n\nNote: customs differ.",
        ));
        let (status, body) = send(
            &fx,
            post_chat(r#"{"messages":[{"role":"user","content":"Why is Diwali celebrated?"}]}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json(&body)["response"],
            format!("Diwali celebrates light over darkness.\n\n{DEFAULT_CLOSING_LINE}")
        );
        let prompt = fx.backend.last_prompt().unwrap();
        assert!(prompt.starts_with(&fx.state.relay.profile().system_prompt));
        assert!(prompt.ends_with("user: Why is Diwali celebrated?"));
    }

    #[tokio::test]
    async fn test_chat_with_empty_history_calls_backend() {
        let fx = fixture(FakeBackend::replying("Hello!"));
        let (status, body) = send(&fx, post_chat(r#"{"messages":[]}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json(&body)["response"].as_str().unwrap().starts_with("Hello!"));
        assert_eq!(fx.backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_chat_malformed_requests() {
        let fx = fixture(FakeBackend::replying("unused"));
        for body in ["not json", "{}", r#"{"messages":[{"role":"user"}]}"#] {
            let (status, body) = send(&fx, post_chat(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(json(&body)["error"].as_str().unwrap().starts_with("malformed request"));
        }
        assert_eq!(fx.backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_backend_failure_then_recovery() {
        let fx = fixture(FakeBackend::scripted(
            vec![Err(RelayError::BackendUnavailable("connection refused".into()))],
            "Back online.",
        ));
        let chat = r#"{"messages":[{"role":"user","content":"Hi"}]}"#;

        let (status, body) = send(&fx, post_chat(chat)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(json(&body)["error"].as_str().unwrap().contains("connection refused"));

        let (status, body) = send(&fx, post_chat(chat)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json(&body)["response"].as_str().unwrap().starts_with("Back online."));
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let fx = fixture(FakeBackend::replying("unused"));
        let big = format!(
            r#"{{"messages":[{{"role":"user","content":"{}"}}]}}"#,
            "a".repeat(8192)
        );
        let (status, body) = send(&fx, post_chat(&big)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(json(&body)["error"].is_string());
        assert_eq!(fx.backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_method_handling() {
        let fx = fixture(FakeBackend::replying("unused"));
        let delete = Request::builder()
            .method(Method::DELETE)
            .uri("/index.html")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let (status, _) = send(&fx, delete).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        for method in [Method::GET, Method::HEAD, Method::PUT] {
            let req = Request::builder()
                .method(method)
                .uri(CHAT_PATH)
                .body(Full::new(Bytes::new()))
                .unwrap();
            let response = handle_request(req, fx.state.clone()).await.unwrap();
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(response.headers()[header::ALLOW], "GET, HEAD, POST, OPTIONS");
        }
        assert_eq!(fx.backend.calls(), 0);

        let preflight = Request::builder()
            .method(Method::OPTIONS)
            .uri(CHAT_PATH)
            .body(Full::new(Bytes::new()))
            .unwrap();
        let response = handle_request(preflight, fx.state.clone()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
