//! Sections: `/v1/sections[/:id]`.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::TodoistClient;
use crate::de::null_as_default;
use crate::error::Result;
use crate::options::RequestOptions;
use crate::query::Query;
use crate::transport::Transport;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub project_id: u64,
    /// Position among the sections of the same project.
    #[serde(deserialize_with = "null_as_default")]
    pub order: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetSectionsOptions {
    pub project_id: Option<u64>,
}

impl GetSectionsOptions {
    fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.push_opt("project_id", self.project_id);
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSectionOptions {
    #[serde(skip)]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[derive(Serialize)]
struct CreateSectionBody<'a> {
    name: &'a str,
    project_id: u64,
    #[serde(flatten)]
    options: &'a CreateSectionOptions,
}

#[derive(Serialize)]
struct UpdateSectionBody<'a> {
    name: &'a str,
}

impl<T: Transport> TodoistClient<T> {
    #[instrument(skip(self))]
    pub fn get_sections(&self, options: &GetSectionsOptions) -> Result<Vec<Section>> {
        self.get("/sections", &options.to_query())
    }

    #[instrument(skip(self))]
    pub fn get_section(&self, id: u64) -> Result<Section> {
        self.get(&format!("/sections/{id}"), &Query::new())
    }

    #[instrument(skip(self, options))]
    pub fn create_section(&self, name: &str, project_id: u64, options: &CreateSectionOptions) -> Result<Section> {
        let body = CreateSectionBody {
            name,
            project_id,
            options,
        };
        self.post("/sections", &body, options.request_id.as_deref())
    }

    /// Rename a section. The name is the only updatable field.
    #[instrument(skip(self, options))]
    pub fn update_section(&self, id: u64, name: &str, options: &RequestOptions) -> Result<()> {
        self.post_void(
            &format!("/sections/{id}"),
            &UpdateSectionBody { name },
            options.request_id.as_deref(),
        )
    }

    #[instrument(skip(self, options))]
    pub fn delete_section(&self, id: u64, options: &RequestOptions) -> Result<()> {
        self.delete(&format!("/sections/{id}"), options.request_id.as_deref())
    }
}
