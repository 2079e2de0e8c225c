//! Request handling.
//!
//! # Responsibilities
//! - Assign a request ID (UUID v4) unless the client sent one
//! - Echo the request ID on the response
//! - Extract routing-relevant information (method, path, query, headers)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The routing engine sees only `RequestInfo`, never the body

use axum::{
    body::Body,
    extract::Request,
    http::{request::Parts, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::routing::{types::parse_query, RequestInfo};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Middleware assigning and echoing `x-request-id`.
pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    if let Ok(value) = HeaderValue::from_str(&id) {
        request.headers_mut().insert(X_REQUEST_ID, value);
    }
    request.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}

/// Build the routing view of a request.
pub fn request_info(parts: &Parts) -> RequestInfo {
    RequestInfo {
        method: parts.method.clone(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(parse_query).unwrap_or_default(),
        headers: parts.headers.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, Request as HttpRequest};

    #[test]
    fn test_request_info_from_parts() {
        let (parts, _) = HttpRequest::builder()
            .method(Method::PUT)
            .uri("http://example.com/users/7?force=true")
            .header("Host", "example.com")
            .body(())
            .unwrap()
            .into_parts();

        let info = request_info(&parts);
        assert_eq!(info.method, Method::PUT);
        assert_eq!(info.path, "/users/7");
        assert_eq!(info.query_param("force"), Some("true"));
        assert_eq!(info.host(), Some("example.com"));
    }
}
