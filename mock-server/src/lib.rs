//! In-memory imitation of the Todoist REST v1 API.
//!
//! Serves `/v1/{projects,sections,tasks,labels,comments}` with the same
//! status conventions as the real service: 200 + JSON for reads and creates,
//! 204 for updates, deletes and task close/reopen, plain-text bodies for
//! errors. Every route requires a non-empty bearer token. Creates carrying an
//! `X-Request-Id` already seen return the originally created resource.

mod handlers;
pub mod models;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, sync::RwLock};

use models::{Comment, Label, Project, Section, Task, User};

/// Id of the project every fresh store starts with.
pub const INBOX_PROJECT_ID: u64 = 1;

/// The account that owns every project in the mock.
pub fn owner() -> User {
    User {
        id: 1,
        name: "Mock Owner".to_string(),
        email: "owner@example.com".to_string(),
    }
}

#[derive(Debug)]
pub struct Store {
    next_id: u64,
    pub projects: BTreeMap<u64, Project>,
    pub sections: BTreeMap<u64, Section>,
    pub tasks: BTreeMap<u64, Task>,
    pub labels: BTreeMap<u64, Label>,
    pub comments: BTreeMap<u64, Comment>,
    /// Responses to earlier creates, keyed by `X-Request-Id`.
    replays: HashMap<String, serde_json::Value>,
}

impl Store {
    pub fn new() -> Self {
        let mut projects = BTreeMap::new();
        projects.insert(
            INBOX_PROJECT_ID,
            Project {
                id: INBOX_PROJECT_ID,
                name: "Inbox".to_string(),
                inbox_project: true,
                url: project_url(INBOX_PROJECT_ID),
                ..Default::default()
            },
        );
        Self {
            next_id: INBOX_PROJECT_ID + 1,
            projects,
            sections: BTreeMap::new(),
            tasks: BTreeMap::new(),
            labels: BTreeMap::new(),
            comments: BTreeMap::new(),
            replays: HashMap::new(),
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn replay(&self, request_id: Option<&str>) -> Option<serde_json::Value> {
        request_id.and_then(|id| self.replays.get(id).cloned())
    }

    fn remember(&mut self, request_id: Option<&str>, value: &serde_json::Value) {
        if let Some(id) = request_id {
            self.replays.insert(id.to_string(), value.clone());
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with_store(Arc::new(RwLock::new(Store::new())))
}

/// Router over an existing store, so tests can seed or inspect state.
pub fn app_with_store(db: Db) -> Router {
    Router::new()
        .route("/v1/projects", get(handlers::list_projects).post(handlers::create_project))
        .route(
            "/v1/projects/{id}",
            get(handlers::get_project)
                .post(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route("/v1/projects/{id}/collaborators", get(handlers::list_collaborators))
        .route("/v1/sections", get(handlers::list_sections).post(handlers::create_section))
        .route(
            "/v1/sections/{id}",
            get(handlers::get_section)
                .post(handlers::update_section)
                .delete(handlers::delete_section),
        )
        .route("/v1/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route(
            "/v1/tasks/{id}",
            get(handlers::get_task)
                .post(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/v1/tasks/{id}/close", post(handlers::close_task))
        .route("/v1/tasks/{id}/reopen", post(handlers::reopen_task))
        .route("/v1/labels", get(handlers::list_labels).post(handlers::create_label))
        .route(
            "/v1/labels/{id}",
            get(handlers::get_label)
                .post(handlers::update_label)
                .delete(handlers::delete_label),
        )
        .route("/v1/comments", get(handlers::list_comments).post(handlers::create_comment))
        .route(
            "/v1/comments/{id}",
            get(handlers::get_comment)
                .post(handlers::update_comment)
                .delete(handlers::delete_comment),
        )
        .layer(middleware::from_fn(require_bearer))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_bearer(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !token.trim().is_empty());

    if !authorized {
        tracing::debug!(uri = %request.uri(), "rejecting request without bearer token");
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    next.run(request).await
}

fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers.get("x-request-id").and_then(|v| v.to_str().ok())
}

fn project_url(id: u64) -> String {
    format!("https://todoist.com/showProject?id={id}")
}

fn task_url(id: u64) -> String {
    format!("https://todoist.com/showTask?id={id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_store_has_only_inbox() {
        let store = Store::new();
        assert_eq!(store.projects.len(), 1);
        let inbox = &store.projects[&INBOX_PROJECT_ID];
        assert!(inbox.inbox_project);
        assert_eq!(inbox.name, "Inbox");
        assert!(store.tasks.is_empty());
    }

    #[test]
    fn ids_are_sequential_after_inbox() {
        let mut store = Store::new();
        assert_eq!(store.allocate_id(), 2);
        assert_eq!(store.allocate_id(), 3);
    }

    #[test]
    fn replay_only_matches_remembered_ids() {
        let mut store = Store::new();
        let value = serde_json::json!({"id": 2});
        store.remember(Some("abc"), &value);
        store.remember(None, &serde_json::json!({"id": 3}));
        assert_eq!(store.replay(Some("abc")), Some(value));
        assert_eq!(store.replay(Some("other")), None);
        assert_eq!(store.replay(None), None);
    }

    #[test]
    fn task_serializes_without_absent_due() {
        let task = Task {
            id: 2,
            content: "x".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("due").is_none());
        assert_eq!(json["content"], "x");
        assert_eq!(json["label_ids"], serde_json::json!([]));
    }
}
