//! Labels: `/v1/labels[/:id]`. Flat and user-scoped.

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
pub struct Label {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub color: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub order: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub favorite: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLabelOptions {
    #[serde(skip)]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLabelOptions {
    #[serde(skip)]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
}

#[derive(Serialize)]
struct CreateLabelBody<'a> {
    name: &'a str,
    #[serde(flatten)]
    options: &'a CreateLabelOptions,
}

impl<T: Transport> TodoistClient<T> {
    #[instrument(skip(self))]
    pub fn get_labels(&self) -> Result<Vec<Label>> {
        self.get("/labels", &Query::new())
    }

    #[instrument(skip(self))]
    pub fn get_label(&self, id: u64) -> Result<Label> {
        self.get(&format!("/labels/{id}"), &Query::new())
    }

    #[instrument(skip(self, options))]
    pub fn create_label(&self, name: &str, options: &CreateLabelOptions) -> Result<Label> {
        let body = CreateLabelBody { name, options };
        self.post("/labels", &body, options.request_id.as_deref())
    }

    #[instrument(skip(self, options))]
    pub fn update_label(&self, id: u64, options: &UpdateLabelOptions) -> Result<()> {
        self.post_void(&format!("/labels/{id}"), options, options.request_id.as_deref())
    }

    #[instrument(skip(self, options))]
    pub fn delete_label(&self, id: u64, options: &RequestOptions) -> Result<()> {
        self.delete(&format!("/labels/{id}"), options.request_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::{body_json, scripted, BASE_URL};
    use crate::http::HttpMethod;
    use crate::transport::ScriptedTransport;
    use crate::ApiError;

    #[test]
    fn get_labels() {
        let (client, transport) = scripted(ScriptedTransport::new().respond(
            200,
            r#"[{"id":1,"name":"LABEL_1","color":30,"order":1,"favorite":true},{"id":2,"name":"LABEL_2"}]"#,
        ));
        let labels = client.get_labels().unwrap();
        assert_eq!(
            labels,
            vec![
                Label {
                    id: 1,
                    name: "LABEL_1".to_string(),
                    color: 30,
                    order: 1,
                    favorite: true,
                },
                Label {
                    id: 2,
                    name: "LABEL_2".to_string(),
                    ..Default::default()
                },
            ]
        );
        assert_eq!(transport.last_request().unwrap().url, format!("{BASE_URL}/v1/labels"));
    }

    #[test]
    fn get_label_not_found() {
        let (client, transport) = scripted(ScriptedTransport::new().respond(404, "Label not found"));
        let err = client.get_label(9).unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(transport.last_request().unwrap().url, format!("{BASE_URL}/v1/labels/9"));
    }

    #[test]
    fn create_label_with_options() {
        let (client, transport) = scripted(ScriptedTransport::new().respond(200, r#"{"id":3,"name":"home"}"#));
        let options = CreateLabelOptions {
            request_id: Some("REQ".to_string()),
            order: Some(1),
            color: Some(30),
            favorite: Some(true),
        };
        let label = client.create_label("home", &options).unwrap();
        assert_eq!(label.id, 3);

        let req = transport.last_request().unwrap();
        assert_eq!(
            body_json(&req),
            serde_json::json!({"name": "home", "order": 1, "color": 30, "favorite": true})
        );
        assert_eq!(req.header("X-Request-Id"), Some("REQ"));
    }

    #[test]
    fn update_label_sends_only_present_fields() {
        let (client, transport) = scripted(ScriptedTransport::new().respond(204, ""));
        let options = UpdateLabelOptions {
            favorite: Some(false),
            ..Default::default()
        };
        client.update_label(3, &options).unwrap();

        let req = transport.last_request().unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, format!("{BASE_URL}/v1/labels/3"));
        assert_eq!(body_json(&req), serde_json::json!({"favorite": false}));
    }

    #[test]
    fn delete_missing_label_is_request_error() {
        let (client, transport) = scripted(ScriptedTransport::new().respond(404, "\"not found\""));
        let err = client.delete_label(404, &RequestOptions::default()).unwrap_err();
        assert!(matches!(err, ApiError::Request { status: 404, .. }));

        let req = transport.last_request().unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.header("X-Request-Id"), None);
    }

    #[test]
    fn label_with_null_fields_decodes() {
        let (client, _) = scripted(
            ScriptedTransport::new().respond(200, r#"{"id":3,"name":"x","color":null,"favorite":null}"#),
        );
        let label = client.get_label(3).unwrap();
        assert_eq!(label.color, 0);
        assert!(!label.favorite);
    }
}
