//! Fuzz target for request path matching.
//!
//! Every path must resolve without panicking, and any match must be rooted at
//! the first path segment.

#![no_main]

use axum::http::Method;
use libfuzzer_sys::fuzz_target;
use scoop_node::{
    handlers,
    routing::{match_path, RouteParam},
};

fuzz_target!(|data: &[u8]| {
    let path = String::from_utf8_lossy(data);

    if let Some(m) = match_path(&path) {
        let first = path.split('/').find(|s| !s.is_empty()).unwrap_or_default();
        assert!(m.pattern.starts_with(&format!("/{first}")));

        if let RouteParam::Username(username) = &m.param {
            assert!(!username.is_empty());
        }
    }

    // Resolution through the real route table must not panic either
    let table = handlers::routes();
    for method in [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
    ] {
        let _ = table.resolve(&method, &path);
    }
});
