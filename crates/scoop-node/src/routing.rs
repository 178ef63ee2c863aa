//! Path-pattern routing.
//!
//! Request paths are split into non-empty `/`-separated segments and handed to
//! an ordered list of matchers. The first matcher that accepts the segments
//! decides the route pattern and the typed parameter extracted from the path:
//!
//! | Segments | Pattern | Parameter |
//! |---|---|---|
//! | `articles` | `/articles` | none |
//! | `articles`, `3`, `upvote` | `/articles/:id/upvote` | id `3` |
//! | `users`, `alice` | `/users/:username` | username `alice` |
//! | `comments`, `7` | `/comments/:id` | id `7` |
//!
//! A pattern is then looked up together with the request method in a
//! [`RouteTable`].

use axum::http::Method;
use std::collections::HashMap;
use thiserror::Error;

/// Parameter extracted from a request path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RouteParam {
    /// The pattern has no parameter.
    #[default]
    None,
    /// Whole-number id. Non-numeric segments become `0`.
    Id(u64),
    /// Numeric segment that can never name a record: negative, fractional or
    /// out of range. Kept verbatim.
    UnknownId(String),
    /// Username, taken verbatim from the path.
    Username(String),
}

impl RouteParam {
    /// Returns the id, or `0` when there is none. `0` never names a record, so
    /// lookups with an [`RouteParam::UnknownId`] miss.
    pub fn id(&self) -> u64 {
        match self {
            RouteParam::Id(id) => *id,
            _ => 0,
        }
    }

    /// Returns the username, if any.
    pub fn username(&self) -> Option<&str> {
        match self {
            RouteParam::Username(username) => Some(username),
            _ => None,
        }
    }
}

/// A path resolved to a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Route pattern, e.g. `/articles/:id`.
    pub pattern: String,
    /// Parameter extracted from the path.
    pub param: RouteParam,
}

/// Routing errors. Both are answered with a bare 400.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoutingError {
    /// No pattern is registered for the path.
    #[error("no route for {path}")]
    NoMatch { path: String },

    /// The pattern exists but not for this method.
    #[error("{method} not allowed on {pattern}")]
    MethodNotAllowed { method: Method, pattern: String },
}

type Matcher = fn(&[&str]) -> Option<RouteMatch>;

/// Matchers in priority order.
const MATCHERS: [Matcher; 4] = [match_collection, match_reaction, match_user, match_resource];

/// Resolves a path to a route pattern and its parameter.
///
/// Only the path is matched; callers pass `uri.path()` so a query string never
/// takes part. An empty path matches nothing.
pub fn match_path(path: &str) -> Option<RouteMatch> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return None;
    }
    MATCHERS.iter().find_map(|matcher| matcher(&segments))
}

fn match_collection(segments: &[&str]) -> Option<RouteMatch> {
    match segments {
        [collection] => Some(RouteMatch {
            pattern: format!("/{collection}"),
            param: RouteParam::None,
        }),
        _ => None,
    }
}

fn match_reaction(segments: &[&str]) -> Option<RouteMatch> {
    match segments {
        [collection, id, reaction, ..] if matches!(*reaction, "upvote" | "downvote") => {
            Some(RouteMatch {
                pattern: format!("/{collection}/:id/{reaction}"),
                param: parse_id(id),
            })
        }
        _ => None,
    }
}

fn match_user(segments: &[&str]) -> Option<RouteMatch> {
    match segments {
        ["users", username, ..] => Some(RouteMatch {
            pattern: "/users/:username".to_string(),
            param: RouteParam::Username(username.to_string()),
        }),
        _ => None,
    }
}

fn match_resource(segments: &[&str]) -> Option<RouteMatch> {
    match segments {
        [collection, id, ..] => Some(RouteMatch {
            pattern: format!("/{collection}/:id"),
            param: parse_id(id),
        }),
        _ => None,
    }
}

/// 2^64, the first whole number past `u64::MAX`.
const ID_LIMIT: f64 = 18_446_744_073_709_551_616.0;

fn parse_id(segment: &str) -> RouteParam {
    if let Ok(id) = segment.parse::<u64>() {
        return RouteParam::Id(id);
    }
    match segment.parse::<f64>() {
        Err(_) => RouteParam::Id(0),
        Ok(n) if n.is_nan() || n == 0.0 => RouteParam::Id(0),
        Ok(n) if n > 0.0 && n < ID_LIMIT && n.fract() == 0.0 => RouteParam::Id(n as u64),
        Ok(_) => RouteParam::UnknownId(segment.to_string()),
    }
}

/// Handlers registered by `(pattern, method)`.
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    routes: HashMap<String, HashMap<Method, H>>,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }
}

impl<H> RouteTable<H> {
    /// Creates an empty route table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for a pattern and method.
    pub fn route(mut self, pattern: &str, method: Method, handler: H) -> Self {
        self.routes
            .entry(pattern.to_string())
            .or_default()
            .insert(method, handler);
        self
    }

    /// Number of registered `(pattern, method)` pairs.
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    /// Returns true if no route is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolves a request to its handler and path parameter.
    pub fn resolve(&self, method: &Method, path: &str) -> Result<(&H, RouteParam), RoutingError> {
        let no_match = || RoutingError::NoMatch {
            path: path.to_string(),
        };

        let RouteMatch { pattern, param } = match_path(path).ok_or_else(no_match)?;
        let methods = self.routes.get(&pattern).ok_or_else(no_match)?;
        let handler = methods
            .get(method)
            .ok_or_else(|| RoutingError::MethodNotAllowed {
                method: method.clone(),
                pattern,
            })?;

        Ok((handler, param))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(path: &str) -> Option<String> {
        match_path(path).map(|m| m.pattern)
    }

    #[test]
    fn test_collection_routes() {
        assert_eq!(pattern("/users").as_deref(), Some("/users"));
        assert_eq!(pattern("/articles/").as_deref(), Some("/articles"));
        assert_eq!(pattern("//comments").as_deref(), Some("/comments"));
        assert_eq!(match_path("/articles").unwrap().param, RouteParam::None);
    }

    #[test]
    fn test_empty_path_matches_nothing() {
        assert_eq!(match_path("/"), None);
        assert_eq!(match_path(""), None);
    }

    #[test]
    fn test_reaction_routes() {
        let m = match_path("/articles/3/upvote").unwrap();
        assert_eq!(m.pattern, "/articles/:id/upvote");
        assert_eq!(m.param, RouteParam::Id(3));

        let m = match_path("/comments/12/downvote").unwrap();
        assert_eq!(m.pattern, "/comments/:id/downvote");
        assert_eq!(m.param.id(), 12);
    }

    #[test]
    fn test_reaction_takes_priority_over_users() {
        let m = match_path("/users/alice/upvote").unwrap();
        assert_eq!(m.pattern, "/users/:id/upvote");
        assert_eq!(m.param, RouteParam::Id(0));
    }

    #[test]
    fn test_user_route_keeps_username_verbatim() {
        let m = match_path("/users/123").unwrap();
        assert_eq!(m.pattern, "/users/:username");
        assert_eq!(m.param, RouteParam::Username("123".to_string()));
        assert_eq!(m.param.username(), Some("123"));
    }

    #[test]
    fn test_non_numeric_id_becomes_zero() {
        let m = match_path("/articles/abc").unwrap();
        assert_eq!(m.pattern, "/articles/:id");
        assert_eq!(m.param, RouteParam::Id(0));

        assert_eq!(match_path("/articles/NaN").unwrap().param, RouteParam::Id(0));
    }

    #[test]
    fn test_whole_number_forms_resolve_to_id() {
        assert_eq!(match_path("/articles/1.0").unwrap().param, RouteParam::Id(1));
        assert_eq!(match_path("/articles/2e1").unwrap().param, RouteParam::Id(20));
        assert_eq!(match_path("/articles/-0").unwrap().param, RouteParam::Id(0));
    }

    #[test]
    fn test_numeric_ids_outside_the_id_space_are_unknown() {
        for segment in ["-1", "1.5", "18446744073709551616", "1e30"] {
            let m = match_path(&format!("/articles/{segment}")).unwrap();
            assert_eq!(m.param, RouteParam::UnknownId(segment.to_string()));
            assert_eq!(m.param.id(), 0);
        }

        let m = match_path("/comments/-3/upvote").unwrap();
        assert_eq!(m.pattern, "/comments/:id/upvote");
        assert_eq!(m.param, RouteParam::UnknownId("-3".to_string()));
    }

    #[test]
    fn test_extra_segments_are_ignored() {
        assert_eq!(pattern("/articles/1/comments").as_deref(), Some("/articles/:id"));
        assert_eq!(
            pattern("/articles/1/upvote/again").as_deref(),
            Some("/articles/:id/upvote")
        );
    }

    #[test]
    fn test_route_table_resolution() {
        let table = RouteTable::new()
            .route("/articles", Method::GET, "list")
            .route("/articles", Method::POST, "create")
            .route("/articles/:id", Method::GET, "get");
        assert_eq!(table.len(), 3);

        let (handler, param) = table.resolve(&Method::GET, "/articles/4").unwrap();
        assert_eq!(*handler, "get");
        assert_eq!(param, RouteParam::Id(4));

        let (handler, _) = table.resolve(&Method::POST, "/articles").unwrap();
        assert_eq!(*handler, "create");
    }

    #[test]
    fn test_route_table_errors() {
        let table = RouteTable::new().route("/articles", Method::GET, ());

        assert!(matches!(
            table.resolve(&Method::DELETE, "/articles"),
            Err(RoutingError::MethodNotAllowed { .. })
        ));
        assert!(matches!(
            table.resolve(&Method::GET, "/widgets"),
            Err(RoutingError::NoMatch { .. })
        ));
        assert!(matches!(
            table.resolve(&Method::GET, "/"),
            Err(RoutingError::NoMatch { .. })
        ));
    }
}
