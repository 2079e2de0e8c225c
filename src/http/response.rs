//! Response building.
//!
//! # Responsibilities
//! - Turn a routing outcome into an HTTP response
//! - Default not-found response for exhausted requests
//! - Map routing errors to 500
//!
//! # Design Decisions
//! - Routing errors are configuration bugs; the client gets a generic body
//! - Invalid configured status codes fall back to 500

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::routing::{Outcome, RouteResponse, RoutingError, RoutingResult};

/// Header naming the committed route.
pub const X_ROUTE: &str = "x-route";

/// Convert the result of `RouteTable::route` into a response.
pub fn into_response(result: RoutingResult<Outcome<RouteResponse>>) -> Response {
    match result {
        Ok(Outcome::Matched(route)) => matched(route),
        Ok(Outcome::Exhausted) => not_found(),
        Err(err) => routing_error(&err),
    }
}

pub fn matched(route: RouteResponse) -> Response {
    let status = StatusCode::from_u16(route.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::HeaderName::from_static(X_ROUTE), route.route),
        ],
        route.body,
    )
        .into_response()
}

pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

pub fn routing_error(err: &RoutingError) -> Response {
    tracing::error!(error = %err, "Routing configuration error");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
