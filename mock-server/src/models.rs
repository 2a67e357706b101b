//! Wire shapes served by the mock.
//!
//! Defined independently of `todoist-core`: the integration tests
//! in `core/` decode these with the client's own types, so schema drift
//! between the two shows up as a test failure.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub color: u32,
    pub parent_id: Option<u64>,
    pub order: i64,
    pub comment_count: u32,
    pub shared: bool,
    pub favorite: bool,
    pub inbox_project: bool,
    pub team_inbox: bool,
    pub sync_id: u64,
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: u64,
    pub project_id: u64,
    pub order: i64,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Due {
    pub string: String,
    pub date: String,
    pub recurring: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub project_id: u64,
    pub section_id: u64,
    pub content: String,
    pub description: String,
    pub completed: bool,
    pub label_ids: Vec<u64>,
    pub parent_id: Option<u64>,
    pub order: i64,
    pub priority: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<Due>,
    pub url: String,
    pub comment_count: u32,
    pub assignee: Option<u64>,
    pub assigner: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: u64,
    pub name: String,
    pub color: u32,
    pub order: i64,
    pub favorite: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub task_id: Option<u64>,
    pub project_id: Option<u64>,
    pub posted: String,
    pub content: String,
    pub attachment: Option<serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

// --- request payloads ---

#[derive(Debug, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub parent_id: Option<u64>,
    pub color: Option<u32>,
    pub favorite: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub color: Option<u32>,
    pub favorite: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSection {
    pub name: String,
    pub project_id: u64,
    pub order: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSection {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateTask {
    pub content: String,
    pub description: Option<String>,
    pub project_id: Option<u64>,
    pub section_id: Option<u64>,
    pub parent_id: Option<u64>,
    pub order: Option<i64>,
    pub label_ids: Option<Vec<u64>>,
    pub priority: Option<u8>,
    pub due_string: Option<String>,
    pub due_date: Option<String>,
    pub due_datetime: Option<String>,
    pub due_lang: Option<String>,
    pub assignee: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTask {
    pub content: Option<String>,
    pub description: Option<String>,
    pub label_ids: Option<Vec<u64>>,
    pub priority: Option<u8>,
    pub due_string: Option<String>,
    pub due_date: Option<String>,
    pub due_datetime: Option<String>,
    pub due_lang: Option<String>,
    pub assignee: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLabel {
    pub name: String,
    pub order: Option<i64>,
    pub color: Option<u32>,
    pub favorite: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLabel {
    pub name: Option<String>,
    pub order: Option<i64>,
    pub color: Option<u32>,
    pub favorite: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub content: String,
    pub task_id: Option<u64>,
    pub project_id: Option<u64>,
    pub attachment: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateComment {
    pub content: String,
}

// --- list filters ---

#[derive(Debug, Default, Deserialize)]
pub struct TaskFilter {
    pub project_id: Option<u64>,
    pub section_id: Option<u64>,
    pub label_id: Option<u64>,
    pub filter: Option<String>,
    pub lang: Option<String>,
    /// Comma-joined task ids.
    pub ids: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SectionFilter {
    pub project_id: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentFilter {
    pub project_id: Option<u64>,
    pub task_id: Option<u64>,
}
