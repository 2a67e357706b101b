//! Projects: `/v1/projects[/:id][/collaborators]`.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::TodoistClient;
use crate::de::null_as_default;
use crate::error::Result;
use crate::options::RequestOptions;
use crate::query::Query;
use crate::transport::Transport;
use crate::users::User;

/// A Todoist project. Projects form a tree through `parent_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Numeric color id, see the Todoist colors guide.
    #[serde(deserialize_with = "null_as_default")]
    pub color: u32,
    /// Absent for top-level projects.
    pub parent_id: Option<u64>,
    /// Position under the same parent.
    #[serde(deserialize_with = "null_as_default")]
    pub order: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub comment_count: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub shared: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub favorite: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub inbox_project: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub team_inbox: bool,
    /// Matches copies of a shared project across accounts; 0 when not shared.
    #[serde(deserialize_with = "null_as_default")]
    pub sync_id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProjectOptions {
    #[serde(skip)]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProjectOptions {
    #[serde(skip)]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
}

#[derive(Serialize)]
struct CreateProjectBody<'a> {
    name: &'a str,
    #[serde(flatten)]
    options: &'a CreateProjectOptions,
}

impl<T: Transport> TodoistClient<T> {
    /// All projects of the user, in server order.
    #[instrument(skip(self))]
    pub fn get_projects(&self) -> Result<Vec<Project>> {
        self.get("/projects", &Query::new())
    }

    #[instrument(skip(self))]
    pub fn get_project(&self, id: u64) -> Result<Project> {
        self.get(&format!("/projects/{id}"), &Query::new())
    }

    /// Create a project and return it as echoed by the server.
    #[instrument(skip(self, options))]
    pub fn create_project(&self, name: &str, options: &CreateProjectOptions) -> Result<Project> {
        let body = CreateProjectBody { name, options };
        self.post("/projects", &body, options.request_id.as_deref())
    }

    /// Partial update: only the fields set in `options` are sent.
    #[instrument(skip(self, options))]
    pub fn update_project(&self, id: u64, options: &UpdateProjectOptions) -> Result<()> {
        self.post_void(&format!("/projects/{id}"), options, options.request_id.as_deref())
    }

    #[instrument(skip(self, options))]
    pub fn delete_project(&self, id: u64, options: &RequestOptions) -> Result<()> {
        self.delete(&format!("/projects/{id}"), options.request_id.as_deref())
    }

    /// Users a shared project is shared with.
    #[instrument(skip(self))]
    pub fn get_collaborators(&self, project_id: u64) -> Result<Vec<User>> {
        self.get(&format!("/projects/{project_id}/collaborators"), &Query::new())
    }
}
