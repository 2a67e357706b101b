//! Typed, synchronous client for the Todoist REST API (v1).
//!
//! # Overview
//! Every operation runs through one pipeline: build a plain-data
//! `HttpRequest`, send it through a `Transport`, classify the `HttpResponse`.
//! Non-2xx responses come back as [`ApiError::Request`] carrying the status
//! code and raw body; transport failures and decode failures have their own
//! variants.
//!
//! ```no_run
//! use todoist_core::{CreateTaskOptions, GetTasksOptions, TodoistClient};
//!
//! let client = TodoistClient::from_env()?;
//! let task = client.create_task("Buy milk", &CreateTaskOptions::default())?;
//! let inbox = client.get_tasks(&GetTasksOptions {
//!     project_id: Some(task.project_id),
//!     ..Default::default()
//! })?;
//! println!("{} open tasks", inbox.len());
//! # Ok::<(), todoist_core::ApiError>(())
//! ```
//!
//! # Design
//! - `TodoistClient` holds only the token, the base URL and the transport;
//!   it is stateless between calls and shareable across threads.
//! - Options structs are write-only: every field is an `Option`, and `None`
//!   means the key is left out of the request entirely.
//! - The default transport is a blocking `ureq` agent. Tests substitute
//!   `ScriptedTransport`, which replays canned responses and records requests.
//! - Nothing is retried, cached or paginated.

pub mod client;
pub mod comments;
pub mod config;
mod de;
pub mod error;
pub mod http;
pub mod labels;
pub mod options;
pub mod projects;
pub mod query;
pub mod sections;
pub mod tasks;
pub mod transport;
pub mod users;

pub use client::{encode_body, parse_empty, parse_json, TodoistClient};
pub use comments::{Attachment, Comment, CreateCommentOptions, Thumbnail, UploadAttachment};
pub use config::ClientConfig;
pub use error::{ApiError, Result, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use labels::{CreateLabelOptions, Label, UpdateLabelOptions};
pub use options::{new_request_id, RequestOptions};
pub use projects::{CreateProjectOptions, Project, UpdateProjectOptions};
pub use query::Query;
pub use sections::{CreateSectionOptions, GetSectionsOptions, Section};
pub use tasks::{CreateTaskOptions, Due, GetTasksOptions, Task, UpdateTaskOptions};
pub use transport::{ScriptedTransport, Transport, UreqTransport};
pub use users::User;
