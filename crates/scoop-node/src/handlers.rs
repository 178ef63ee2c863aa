//! Resource handlers.
//!
//! Every handler has the same shape: it receives the store, the parameter
//! extracted from the path and the decoded request body, and answers with a
//! [`Reply`] or an [`ApiError`]. Handlers are plain functions so the whole API
//! can be driven without an HTTP server.

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use scoop_store::{ArticleChanges, ContentStore, NewArticle, NewComment, Vote};
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    routing::{RouteParam, RouteTable},
};

/// Signature shared by all resource handlers.
pub type Handler = fn(&ContentStore, &RouteParam, &Payload) -> Result<Reply, ApiError>;

/// Builds the table of every resource route.
pub fn routes() -> RouteTable<Handler> {
    RouteTable::<Handler>::new()
        // Users
        .route("/users", Method::POST, get_or_create_user)
        .route("/users/:username", Method::GET, get_user)
        // Articles
        .route("/articles", Method::GET, get_articles)
        .route("/articles", Method::POST, create_article)
        .route("/articles/:id", Method::GET, get_article)
        .route("/articles/:id", Method::PUT, update_article)
        .route("/articles/:id", Method::DELETE, delete_article)
        .route("/articles/:id/upvote", Method::PUT, upvote_article)
        .route("/articles/:id/downvote", Method::PUT, downvote_article)
        // Comments
        .route("/comments", Method::POST, create_comment)
        .route("/comments/:id", Method::PUT, set_comment)
        .route("/comments/:id", Method::DELETE, remove_comment)
        .route("/comments/:id/upvote", Method::PUT, upvote_comment)
        .route("/comments/:id/downvote", Method::PUT, downvote_comment)
}

// ==================== Request / Response Types ====================

/// Read-only view over a decoded JSON request body.
///
/// Lookups are lenient: a field of the wrong type reads as absent rather than
/// failing the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Value);

impl Payload {
    /// Wraps a decoded body.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// A payload with no fields, used for bodiless requests.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a nested object field if it is present and not empty-ish
    /// (`null`, `false`, `0` or `""`).
    pub fn field(&self, key: &str) -> Option<Payload> {
        self.0
            .get(key)
            .filter(|value| is_present(value))
            .map(|value| Payload(value.clone()))
    }

    /// Returns a string field if it is present and non-empty.
    pub fn text(&self, key: &str) -> Option<String> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Returns a positive id given as a whole JSON number or a numeric string,
    /// or `0`.
    pub fn id(&self, key: &str) -> u64 {
        match self.0.get(key) {
            Some(Value::Number(n)) => n.as_u64().or_else(|| whole_id(n.as_f64()?)).unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }
}

fn whole_id(n: f64) -> Option<u64> {
    // Below 2^53 every whole f64 converts to u64 exactly.
    (n >= 1.0 && n.fract() == 0.0 && n <= 9_007_199_254_740_992.0).then_some(n as u64)
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A successful handler response.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Response status.
    pub status: StatusCode,
    /// JSON body; `None` for an empty body.
    pub body: Option<Value>,
}

impl Reply {
    /// 200 with a JSON body.
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: Some(body),
        }
    }

    /// 201 with a JSON body.
    pub fn created(body: Value) -> Self {
        Self {
            status: StatusCode::CREATED,
            body: Some(body),
        }
    }

    /// 204 with an empty body.
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}

// ==================== Users ====================

/// `POST /users`: returns the user named in the body, creating it if needed.
pub fn get_or_create_user(
    store: &ContentStore,
    _param: &RouteParam,
    payload: &Payload,
) -> Result<Reply, ApiError> {
    let username = payload
        .text("username")
        .ok_or_else(|| ApiError::BadRequest("username is required".to_string()))?;

    let entry = store.get_or_create_user(&username)?;
    let created = entry.is_created();
    let body = json!({ "user": entry.into_user() });

    Ok(if created {
        Reply::created(body)
    } else {
        Reply::ok(body)
    })
}

/// `GET /users/:username`: the user with their articles and comments.
pub fn get_user(
    store: &ContentStore,
    param: &RouteParam,
    _payload: &Payload,
) -> Result<Reply, ApiError> {
    let username = param
        .username()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::BadRequest("username is required".to_string()))?;

    let profile = store.get_user(username)?;
    Ok(Reply::ok(json!(profile)))
}

// ==================== Articles ====================

/// `GET /articles`: live articles, newest first.
pub fn get_articles(
    store: &ContentStore,
    _param: &RouteParam,
    _payload: &Payload,
) -> Result<Reply, ApiError> {
    Ok(Reply::ok(json!({ "articles": store.list_articles() })))
}

/// `GET /articles/:id`: one article with its comments.
pub fn get_article(
    store: &ContentStore,
    param: &RouteParam,
    _payload: &Payload,
) -> Result<Reply, ApiError> {
    let id = require_id(param)?;
    let detail = store.get_article(id)?;
    Ok(Reply::ok(json!({ "article": detail })))
}

/// `POST /articles`
pub fn create_article(
    store: &ContentStore,
    _param: &RouteParam,
    payload: &Payload,
) -> Result<Reply, ApiError> {
    let article = payload
        .field("article")
        .ok_or_else(|| ApiError::BadRequest("article is required".to_string()))?;

    let new = NewArticle {
        title: article.text("title").unwrap_or_default(),
        url: article.text("url").unwrap_or_default(),
        username: article.text("username").unwrap_or_default(),
    };
    let article = store.create_article(new).map_err(ApiError::rejected)?;
    Ok(Reply::created(json!({ "article": article })))
}

/// `PUT /articles/:id`: overwrites the title and url given in the body.
pub fn update_article(
    store: &ContentStore,
    param: &RouteParam,
    payload: &Payload,
) -> Result<Reply, ApiError> {
    let article = payload
        .field("article")
        .ok_or_else(|| ApiError::BadRequest("article is required".to_string()))?;
    let id = require_id(param)?;

    let changes = ArticleChanges {
        title: article.text("title"),
        url: article.text("url"),
    };
    let article = store.update_article(id, changes)?;
    Ok(Reply::ok(json!({ "article": article })))
}

/// `DELETE /articles/:id`: an unknown id is a bad request here, not a 404.
pub fn delete_article(
    store: &ContentStore,
    param: &RouteParam,
    _payload: &Payload,
) -> Result<Reply, ApiError> {
    store.delete_article(param.id()).map_err(ApiError::rejected)?;
    Ok(Reply::no_content())
}

/// `PUT /articles/:id/upvote`
pub fn upvote_article(
    store: &ContentStore,
    param: &RouteParam,
    payload: &Payload,
) -> Result<Reply, ApiError> {
    react_article(store, param, payload, Vote::Up)
}

/// `PUT /articles/:id/downvote`
pub fn downvote_article(
    store: &ContentStore,
    param: &RouteParam,
    payload: &Payload,
) -> Result<Reply, ApiError> {
    react_article(store, param, payload, Vote::Down)
}

fn react_article(
    store: &ContentStore,
    param: &RouteParam,
    payload: &Payload,
    vote: Vote,
) -> Result<Reply, ApiError> {
    let username = payload.text("username").unwrap_or_default();
    let article = store
        .react_article(param.id(), &username, vote)
        .map_err(ApiError::rejected)?;
    Ok(Reply::ok(json!({ "article": article })))
}

// ==================== Comments ====================

/// `POST /comments`
pub fn create_comment(
    store: &ContentStore,
    _param: &RouteParam,
    payload: &Payload,
) -> Result<Reply, ApiError> {
    let comment = payload
        .field("comment")
        .ok_or_else(|| ApiError::BadRequest("comment is required".to_string()))?;

    let new = NewComment {
        body: comment.text("body").unwrap_or_default(),
        username: comment.text("username").unwrap_or_default(),
        article_id: comment.id("articleId"),
    };
    let comment = store.create_comment(new).map_err(ApiError::rejected)?;
    Ok(Reply::created(json!({ "comment": comment })))
}

/// `PUT /comments/:id`: replaces the body when a non-empty one is given.
pub fn set_comment(
    store: &ContentStore,
    param: &RouteParam,
    payload: &Payload,
) -> Result<Reply, ApiError> {
    let comment = payload
        .field("comment")
        .ok_or_else(|| ApiError::BadRequest("comment is required".to_string()))?;

    let comment = store.update_comment(param.id(), comment.text("body"))?;
    Ok(Reply::ok(json!({ "comment": comment })))
}

/// `DELETE /comments/:id`
pub fn remove_comment(
    store: &ContentStore,
    param: &RouteParam,
    _payload: &Payload,
) -> Result<Reply, ApiError> {
    store.delete_comment(param.id())?;
    Ok(Reply::no_content())
}

/// `PUT /comments/:id/upvote`
pub fn upvote_comment(
    store: &ContentStore,
    param: &RouteParam,
    payload: &Payload,
) -> Result<Reply, ApiError> {
    react_comment(store, param, payload, Vote::Up)
}

/// `PUT /comments/:id/downvote`
pub fn downvote_comment(
    store: &ContentStore,
    param: &RouteParam,
    payload: &Payload,
) -> Result<Reply, ApiError> {
    react_comment(store, param, payload, Vote::Down)
}

fn react_comment(
    store: &ContentStore,
    param: &RouteParam,
    payload: &Payload,
    vote: Vote,
) -> Result<Reply, ApiError> {
    let username = payload.text("username").unwrap_or_default();
    let comment = store
        .react_comment(param.id(), &username, vote)
        .map_err(ApiError::rejected)?;
    Ok(Reply::ok(json!({ "comment": comment })))
}

/// A missing or zero id is a bad request; a numeric id outside the id space
/// names nothing.
fn require_id(param: &RouteParam) -> Result<u64, ApiError> {
    match param {
        RouteParam::Id(id) if *id > 0 => Ok(*id),
        RouteParam::UnknownId(segment) => {
            Err(ApiError::NotFound(format!("no record {segment}")))
        }
        _ => Err(ApiError::BadRequest("id is required".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(value: Value) -> Payload {
        Payload::new(value)
    }

    fn call(store: &ContentStore, handler: Handler, param: RouteParam, body: Value) -> StatusCode {
        match handler(store, &param, &payload(body)) {
            Ok(reply) => reply.status,
            Err(err) => err.status(),
        }
    }

    fn seeded_store() -> ContentStore {
        let store = ContentStore::new();
        store.get_or_create_user("alice").unwrap();
        store
            .create_article(NewArticle::new("T", "U", "alice"))
            .unwrap();
        store
    }

    #[test]
    fn test_route_table_covers_every_resource() {
        let table = routes();
        assert_eq!(table.len(), 14);
        assert!(table.resolve(&Method::PUT, "/comments/1/downvote").is_ok());
        assert!(table.resolve(&Method::GET, "/comments/1").is_err());
        assert!(table.resolve(&Method::DELETE, "/users/alice").is_err());
    }

    #[test]
    fn test_payload_text_ignores_wrong_types() {
        let body = payload(json!({"a": "x", "b": "", "c": 3, "d": null}));
        assert_eq!(body.text("a").as_deref(), Some("x"));
        assert_eq!(body.text("b"), None);
        assert_eq!(body.text("c"), None);
        assert_eq!(body.text("d"), None);
        assert_eq!(body.text("missing"), None);
    }

    #[test]
    fn test_payload_ids() {
        let body = payload(json!({
            "n": 4, "s": "7", "neg": -1, "f": 1.5, "whole": 3.0, "bad": "x", "zero": 0.0
        }));
        assert_eq!(body.id("n"), 4);
        assert_eq!(body.id("whole"), 3);
        assert_eq!(body.id("zero"), 0);
        assert_eq!(body.id("s"), 7);
        assert_eq!(body.id("neg"), 0);
        assert_eq!(body.id("f"), 0);
        assert_eq!(body.id("bad"), 0);
        assert_eq!(body.id("missing"), 0);
    }

    #[test]
    fn test_payload_field_presence() {
        let body = payload(json!({"obj": {"k": 1}, "zero": 0, "empty": "", "no": false}));
        assert!(body.field("obj").is_some());
        assert!(body.field("zero").is_none());
        assert!(body.field("empty").is_none());
        assert!(body.field("no").is_none());
        assert!(Payload::empty().field("obj").is_none());
    }

    #[test]
    fn test_get_or_create_user_statuses() {
        let store = ContentStore::new();
        let handler: Handler = get_or_create_user;

        assert_eq!(
            call(&store, handler, RouteParam::None, json!({"username": "bob"})),
            StatusCode::CREATED
        );
        assert_eq!(
            call(&store, handler, RouteParam::None, json!({"username": "bob"})),
            StatusCode::OK
        );
        assert_eq!(
            call(&store, handler, RouteParam::None, json!({"username": ""})),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            call(&store, handler, RouteParam::None, json!({})),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_get_user_envelope() {
        let store = seeded_store();
        let reply = get_user(
            &store,
            &RouteParam::Username("alice".to_string()),
            &Payload::empty(),
        )
        .unwrap();

        let body = reply.body.unwrap();
        assert_eq!(body["user"]["username"], "alice");
        assert_eq!(body["userArticles"][0]["id"], 1);
        assert!(body["userComments"].as_array().unwrap().is_empty());

        assert_eq!(
            call(&store, get_user, RouteParam::Username("ghost".to_string()), Value::Null),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            call(&store, get_user, RouteParam::None, Value::Null),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_get_article_statuses() {
        let store = seeded_store();
        assert_eq!(
            call(&store, get_article, RouteParam::Id(1), Value::Null),
            StatusCode::OK
        );
        assert_eq!(
            call(&store, get_article, RouteParam::Id(0), Value::Null),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            call(&store, get_article, RouteParam::Id(999), Value::Null),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            call(&store, get_article, RouteParam::UnknownId("-1".to_string()), Value::Null),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_create_article_rejects_incomplete_input() {
        let store = seeded_store();
        let cases = [
            json!({}),
            json!({"article": {"title": "T", "url": "U"}}),
            json!({"article": {"title": "T", "url": "U", "username": "ghost"}}),
            json!({"article": {"title": "", "url": "U", "username": "alice"}}),
        ];
        for body in cases {
            assert_eq!(
                call(&store, create_article, RouteParam::None, body),
                StatusCode::BAD_REQUEST
            );
        }
        assert_eq!(store.list_articles().len(), 1);
    }

    #[test]
    fn test_update_article_statuses() {
        let store = seeded_store();
        let body = json!({"article": {"title": "New"}});

        assert_eq!(
            call(&store, update_article, RouteParam::Id(0), body.clone()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            call(&store, update_article, RouteParam::Id(1), json!({})),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            call(&store, update_article, RouteParam::Id(5), body.clone()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            call(&store, update_article, RouteParam::UnknownId("1.5".to_string()), body.clone()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            call(&store, update_article, RouteParam::UnknownId("1.5".to_string()), json!({})),
            StatusCode::BAD_REQUEST
        );

        let reply = update_article(&store, &RouteParam::Id(1), &payload(body)).unwrap();
        let article = &reply.body.unwrap()["article"];
        assert_eq!(article["title"], "New");
        assert_eq!(article["url"], "U");
    }

    #[test]
    fn test_delete_article_unknown_id_is_bad_request() {
        let store = seeded_store();
        assert_eq!(
            call(&store, delete_article, RouteParam::Id(9), Value::Null),
            StatusCode::BAD_REQUEST
        );

        assert_eq!(
            call(&store, delete_article, RouteParam::UnknownId("-1".to_string()), Value::Null),
            StatusCode::BAD_REQUEST
        );

        let reply = delete_article(&store, &RouteParam::Id(1), &Payload::empty()).unwrap();
        assert_eq!(reply, Reply::no_content());
        assert_eq!(
            call(&store, delete_article, RouteParam::Id(1), Value::Null),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_votes_require_known_user() {
        let store = seeded_store();
        assert_eq!(
            call(&store, upvote_article, RouteParam::Id(1), json!({"username": "ghost"})),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            call(&store, downvote_article, RouteParam::Id(2), json!({"username": "alice"})),
            StatusCode::BAD_REQUEST
        );

        let reply =
            downvote_article(&store, &RouteParam::Id(1), &payload(json!({"username": "alice"})))
                .unwrap();
        assert_eq!(reply.body.unwrap()["article"]["downvotedBy"][0], "alice");
    }

    #[test]
    fn test_comment_handlers() {
        let store = seeded_store();
        let reply = create_comment(
            &store,
            &RouteParam::None,
            &payload(json!({"comment": {"username": "alice", "articleId": 1, "body": "hi"}})),
        )
        .unwrap();
        assert_eq!(reply.status, StatusCode::CREATED);
        assert_eq!(reply.body.unwrap()["comment"]["id"], 1);

        let reply = create_comment(
            &store,
            &RouteParam::None,
            &payload(json!({"comment": {"username": "alice", "articleId": 1.0, "body": "again"}})),
        )
        .unwrap();
        assert_eq!(reply.body.unwrap()["comment"]["articleId"], 1);

        assert_eq!(
            call(&store, set_comment, RouteParam::Id(1), json!({})),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            call(&store, set_comment, RouteParam::Id(8), json!({"comment": {"body": "x"}})),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            call(&store, upvote_comment, RouteParam::Id(1), json!({"username": "alice"})),
            StatusCode::OK
        );
        assert_eq!(
            call(&store, downvote_comment, RouteParam::Id(1), json!({})),
            StatusCode::BAD_REQUEST
        );

        assert_eq!(
            call(&store, remove_comment, RouteParam::Id(1), Value::Null),
            StatusCode::NO_CONTENT
        );
        assert_eq!(
            call(&store, remove_comment, RouteParam::Id(1), Value::Null),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_create_comment_rejects_missing_references() {
        let store = seeded_store();
        let cases = [
            json!({"body": "hi"}),
            json!({"comment": {"username": "alice", "body": "hi"}}),
            json!({"comment": {"username": "alice", "articleId": 3, "body": "hi"}}),
            json!({"comment": {"username": "ghost", "articleId": 1, "body": "hi"}}),
            json!({"comment": {"username": "alice", "articleId": 1}}),
        ];
        for body in cases {
            assert_eq!(
                call(&store, create_comment, RouteParam::None, body),
                StatusCode::BAD_REQUEST
            );
        }
    }
}
