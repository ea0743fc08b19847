//! PSK-based authentication module.
//!
//! Implements constant-time comparison to mitigate timing attacks.

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;

use crate::errors::{codes, ErrorDetails, ErrorResponse};

/// Header name for the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// PSK authentication layer. When no PSK is configured, all requests pass
/// (dev mode); otherwise the key must arrive in `x-api-key` or as a bearer
/// token.
pub async fn psk_auth_layer(
    expected_psk: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = expected_psk else {
        return next.run(request).await;
    };

    match provided_key(&request) {
        Some(provided) if constant_time_compare(&provided, &expected) => {
            next.run(request).await
        }
        Some(_) => unauthorized_response("Invalid API key"),
        None => unauthorized_response("Missing API key"),
    }
}

/// Pull the API key from the request: `x-api-key` wins, falling back to an
/// `Authorization: Bearer` token.
fn provided_key(request: &Request) -> Option<String> {
    let headers = request.headers();

    if let Some(key) = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        return Some(key.to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
            details: None,
        },
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("test-key-123", "test-key-123"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("test-key-123", "test-key-124"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-key"));
    }

    #[test]
    fn test_constant_time_compare_empty() {
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("", "not-empty"));
    }

    #[test]
    fn test_provided_key_prefers_api_key_header() {
        let request = Request::builder()
            .header(API_KEY_HEADER, "from-header")
            .header(header::AUTHORIZATION, "Bearer from-bearer")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(provided_key(&request).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_provided_key_falls_back_to_bearer() {
        let request = Request::builder()
            .header(header::AUTHORIZATION, "Bearer from-bearer")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(provided_key(&request).as_deref(), Some("from-bearer"));
    }
}
