//! # Observability
//!
//! Structured logging and request tracking for the Scoop node.
//!
//! ```rust,ignore
//! use axum::Router;
//! use scoop_node::observability::{init_logging, request_id_layer, LogFormat};
//!
//! init_logging("info", LogFormat::Json);
//!
//! let app: Router<()> = Router::new().layer(request_id_layer());
//! ```

mod logging;
pub mod middleware;

pub use logging::{init_logging, LogFormat};
pub use middleware::{request_id_layer, REQUEST_ID_HEADER};
