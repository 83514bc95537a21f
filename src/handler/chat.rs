//! `POST /api/chat`
//!
//! Reads the body under the configured size limit, decodes the turn
//! history and hands it to the relay. Every failure becomes
//! `{"error": ...}` with a non-200 status; nothing propagates further.

use crate::chat::{ChatRequest, ChatResponse};
use crate::config::AppState;
use crate::error::RelayError;
use crate::http;
use crate::logger;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Response, StatusCode};
use std::error::Error as StdError;

pub async fn handle_chat<B>(body: B, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let limit = usize::try_from(state.config.http.max_body_size).unwrap_or(usize::MAX);
    let bytes = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            logger::log_error(&format!("Chat request body exceeds {limit} bytes"));
            return payload_too_large();
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read chat request body: {e}"));
            return http::json_error(StatusCode::BAD_REQUEST, "Failed to read request body");
        }
    };

    let request = match parse_chat_request(&bytes) {
        Ok(r) => r,
        Err(e) => {
            logger::log_warning(&e.to_string());
            return http::json_error(e.status(), e.to_string());
        }
    };

    match state.relay.reply(&request.messages).await {
        Ok(response) => http::json_response(StatusCode::OK, &ChatResponse { response }),
        Err(e) => http::json_error(e.status(), e.to_string()),
    }
}

/// Decode the request body; every decoding failure is a `MalformedRequest`
pub fn parse_chat_request(body: &[u8]) -> Result<ChatRequest, RelayError> {
    Ok(serde_json::from_slice(body)?)
}

pub fn payload_too_large() -> Response<Full<Bytes>> {
    http::json_error(StatusCode::PAYLOAD_TOO_LARGE, "request body too large")
}
