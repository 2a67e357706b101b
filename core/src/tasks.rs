//! Tasks: `/v1/tasks[/:id][/close|/reopen]`.
//!
//! Besides the usual CRUD calls, tasks have two bodiless state transitions,
//! close and reopen. Options are forwarded exactly as given: the client does
//! not reconcile the `due_*` fields with each other or resend unrelated fields
//! to satisfy server-side quirks.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::TodoistClient;
use crate::de::null_as_default;
use crate::error::Result;
use crate::options::RequestOptions;
use crate::query::Query;
use crate::transport::Transport;

/// An active Todoist task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub project_id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub section_id: u64,
    /// Markdown-formatted task text.
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub completed: bool,
    /// Order carries no meaning, so this is a set.
    #[serde(deserialize_with = "null_as_default")]
    pub label_ids: BTreeSet<u64>,
    /// Absent for top-level tasks.
    pub parent_id: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub order: i64,
    /// 1 (normal) to 4 (urgent).
    #[serde(deserialize_with = "null_as_default")]
    pub priority: u8,
    pub due: Option<Due>,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub comment_count: u32,
    /// Responsible user, only for shared tasks.
    pub assignee: Option<u64>,
    /// User who assigned the task; 0 when unassigned.
    #[serde(deserialize_with = "null_as_default")]
    pub assigner: u64,
}

/// Due date of a task. Only present when one is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Due {
    /// Human-entered form, e.g. "every monday".
    #[serde(deserialize_with = "null_as_default")]
    pub string: String,
    /// `YYYY-MM-DD` in the user's timezone.
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub recurring: bool,
    /// RFC 3339 in UTC; only for tasks with an exact time.
    pub datetime: Option<String>,
    pub timezone: Option<String>,
}

/// Filters for `get_tasks`. Each present field becomes one query parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetTasksOptions {
    pub project_id: Option<u64>,
    pub section_id: Option<u64>,
    pub label_id: Option<u64>,
    /// Any supported Todoist filter expression.
    pub filter: Option<String>,
    /// IETF language tag of `filter`, if not English.
    pub lang: Option<String>,
    /// Sent as a single comma-joined `ids` parameter.
    pub ids: Option<Vec<u64>>,
}

impl GetTasksOptions {
    fn to_query(&self) -> Query {
        let mut query = Query::new();
        query
            .push_opt("project_id", self.project_id)
            .push_opt("section_id", self.section_id)
            .push_opt("label_id", self.label_id)
            .push_opt("filter", self.filter.as_deref())
            .push_opt("lang", self.lang.as_deref())
            .push_list("ids", self.ids.as_deref());
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskOptions {
    #[serde(skip)]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Defaults to the Inbox on the server side when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskOptions {
    #[serde(skip)]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_lang: Option<String>,
    /// `Some(0)` unassigns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<u64>,
}

#[derive(Serialize)]
struct CreateTaskBody<'a> {
    content: &'a str,
    #[serde(flatten)]
    options: &'a CreateTaskOptions,
}

impl<T: Transport> TodoistClient<T> {
    /// Active tasks matching `options`, in server order.
    #[instrument(skip(self))]
    pub fn get_tasks(&self, options: &GetTasksOptions) -> Result<Vec<Task>> {
        self.get("/tasks", &options.to_query())
    }

    #[instrument(skip(self))]
    pub fn get_task(&self, id: u64) -> Result<Task> {
        self.get(&format!("/tasks/{id}"), &Query::new())
    }

    #[instrument(skip(self, options))]
    pub fn create_task(&self, content: &str, options: &CreateTaskOptions) -> Result<Task> {
        let body = CreateTaskBody { content, options };
        self.post("/tasks", &body, options.request_id.as_deref())
    }

    #[instrument(skip(self, options))]
    pub fn update_task(&self, id: u64, options: &UpdateTaskOptions) -> Result<()> {
        self.post_void(&format!("/tasks/{id}"), options, options.request_id.as_deref())
    }

    #[instrument(skip(self, options))]
    pub fn close_task(&self, id: u64, options: &RequestOptions) -> Result<()> {
        self.post_action(&format!("/tasks/{id}/close"), options.request_id.as_deref())
    }

    #[instrument(skip(self, options))]
    pub fn reopen_task(&self, id: u64, options: &RequestOptions) -> Result<()> {
        self.post_action(&format!("/tasks/{id}/reopen"), options.request_id.as_deref())
    }

    #[instrument(skip(self, options))]
    pub fn delete_task(&self, id: u64, options: &RequestOptions) -> Result<()> {
        self.delete(&format!("/tasks/{id}"), options.request_id.as_deref())
    }
}
