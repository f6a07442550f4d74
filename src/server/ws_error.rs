/// Helpers for WebSocket and HTTP error bodies.
///
/// Every error carries a stable code, a human-readable message and an optional context
/// (usually a player or game id).
use actix_web::{HttpResponse, http::StatusCode};
use serde_json::{Value, json};

fn error_body(code: &str, message: &str, context: Option<&str>) -> Value {
    json!({
        "code": code,
        "message": message,
        "context": context.unwrap_or(""),
    })
}

/// Text frame sent back on a socket when a frame could not be handled.
pub fn ws_error_message(code: &str, message: &str, context: Option<&str>) -> String {
    json!({ "action": "Error", "data": error_body(code, message, context) }).to_string()
}

pub fn http_error_response(
    code: &str,
    message: &str,
    context: Option<&str>,
    status: StatusCode,
) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "error": error_body(code, message, context) }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_error_escapes_message() {
        let text = ws_error_message("INVALID_PACKET", "bad \"frame\"", Some("p1"));
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["action"], "Error");
        assert_eq!(value["data"]["code"], "INVALID_PACKET");
        assert_eq!(value["data"]["message"], "bad \"frame\"");
        assert_eq!(value["data"]["context"], "p1");
    }

    #[test]
    fn test_http_error_status() {
        let resp = http_error_response("UNKNOWN_PLAYER", "nope", None, StatusCode::NOT_FOUND);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
