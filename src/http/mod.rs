//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeout and trace layers)
//!     → request.rs (request ID, RequestInfo extraction)
//!     → RouteTable::route (routing engine)
//!     → response.rs (Matched → status/body, Exhausted → 404, error → 500)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id_middleware, request_info, RequestId, X_REQUEST_ID};
pub use server::HttpServer;
