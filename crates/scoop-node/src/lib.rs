//! # Scoop Node
//!
//! HTTP node serving the Scoop content store: users, articles, threaded
//! comments and up/down votes.
//!
//! ## Architecture
//!
//! ```text
//! request ──► TraceLayer ──► request id ──► CORS ──► dispatch
//!                                                      │
//!                               routing::RouteTable ◄──┤ (method, path)
//!                                                      │
//!                               handlers::* ◄──────────┤ (param, payload)
//!                                                      │
//!                               ContentStore ◄─────────┘
//!                                     │
//!                               persistence::SnapshotFile (after mutations)
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! cargo run --bin scoop-node -- --port 4000 --data-file ./scoop.json
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Router, shared state and request dispatch
//! - [`routing`] - Path-pattern matching and the route table
//! - [`handlers`] - One handler per resource operation
//! - [`persistence`] - Snapshot file load and save
//! - [`config`] - Layered node configuration
//! - [`observability`] - Structured logging and request ids
//!
//! ## Example: Driving the API in-process
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use scoop_store::ContentStore;
//! use scoop_node::api::{create_router, AppState};
//!
//! let store = Arc::new(ContentStore::new());
//! let app = create_router(AppState::new(store));
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod handlers;
pub mod observability;
pub mod persistence;
pub mod routing;
