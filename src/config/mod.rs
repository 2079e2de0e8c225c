//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! route file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (tokens, patterns, names, status codes)
//!     → RouterConfig (validated, immutable)
//!     → RouteTable::from_config
//!
//! On change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server swaps its Arc<RouteTable>
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ListenerConfig, ObservabilityConfig, RouteConfig, RouterConfig};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
