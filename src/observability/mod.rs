//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing / http / config produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (dispatch outcomes, latency, pattern cache hits)
//!
//! Consumers:
//!     → stdout (JSON or pretty)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields, not formatted strings, for anything machine-read
//! - Request ID flows into every request span
//! - Metric calls are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
