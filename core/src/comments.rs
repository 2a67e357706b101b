//! Comments: `/v1/comments[/:id]`.
//!
//! A comment belongs to exactly one task or one project. The public API
//! enforces that by offering separate task/project variants of listing and
//! creation; a body never carries both ids.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::client::TodoistClient;
use crate::de::null_as_default;
use crate::error::Result;
use crate::options::RequestOptions;
use crate::query::Query;
use crate::transport::Transport;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    /// Set for task comments.
    pub task_id: Option<u64>,
    /// Set for project comments.
    pub project_id: Option<u64>,
    /// RFC 3339 timestamp in UTC.
    #[serde(deserialize_with = "null_as_default")]
    pub posted: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    pub attachment: Option<Attachment>,
}

/// File attached to a comment. Which fields are present depends on
/// `resource_type` (file, image, audio, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    #[serde(deserialize_with = "null_as_default")]
    pub resource_type: String,
    pub file_name: Option<String>,
    /// Bytes.
    pub file_size: Option<u64>,
    /// MIME type.
    pub file_type: Option<String>,
    pub file_url: Option<String>,
    /// Seconds, audio only.
    pub file_duration: Option<u64>,
    /// `pending` or `completed`.
    pub upload_state: Option<String>,
    pub image: Option<String>,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    pub tn_l: Option<Thumbnail>,
    pub tn_m: Option<Thumbnail>,
    pub tn_s: Option<Thumbnail>,
}

/// Thumbnail as sent on the wire: `[url, width, height]`.
///
/// Decoding accepts any array: extra elements are ignored, a missing or
/// unreadable element becomes empty/0, and dimensions may arrive as numeric
/// strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Thumbnail(pub String, pub u32, pub u32);

impl<'de> Deserialize<'de> for Thumbnail {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let parts = Vec::<Value>::deserialize(deserializer)?;
        let url = parts.first().and_then(Value::as_str).unwrap_or_default().to_string();
        let dimension = |i: usize| {
            parts
                .get(i)
                .and_then(|v| v.as_u64().or_else(|| v.as_str()?.trim().parse().ok()))
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0)
        };
        Ok(Thumbnail(url, dimension(1), dimension(2)))
    }
}

/// Attachment metadata for a new comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadAttachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCommentOptions {
    #[serde(skip)]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<UploadAttachment>,
}

#[derive(Serialize)]
struct CreateCommentBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    task_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<u64>,
    content: &'a str,
    #[serde(flatten)]
    options: &'a CreateCommentOptions,
}

#[derive(Serialize)]
struct UpdateCommentBody<'a> {
    content: &'a str,
}

impl<T: Transport> TodoistClient<T> {
    #[instrument(skip(self))]
    pub fn get_project_comments(&self, project_id: u64) -> Result<Vec<Comment>> {
        let mut query = Query::new();
        query.push("project_id", project_id);
        self.get("/comments", &query)
    }

    #[instrument(skip(self))]
    pub fn get_task_comments(&self, task_id: u64) -> Result<Vec<Comment>> {
        let mut query = Query::new();
        query.push("task_id", task_id);
        self.get("/comments", &query)
    }

    #[instrument(skip(self))]
    pub fn get_comment(&self, id: u64) -> Result<Comment> {
        self.get(&format!("/comments/{id}"), &Query::new())
    }

    #[instrument(skip(self, content, options))]
    pub fn create_project_comment(
        &self,
        project_id: u64,
        content: &str,
        options: &CreateCommentOptions,
    ) -> Result<Comment> {
        let body = CreateCommentBody {
            task_id: None,
            project_id: Some(project_id),
            content,
            options,
        };
        self.post("/comments", &body, options.request_id.as_deref())
    }

    #[instrument(skip(self, content, options))]
    pub fn create_task_comment(&self, task_id: u64, content: &str, options: &CreateCommentOptions) -> Result<Comment> {
        let body = CreateCommentBody {
            task_id: Some(task_id),
            project_id: None,
            content,
            options,
        };
        self.post("/comments", &body, options.request_id.as_deref())
    }

    /// Replace the comment text.
    #[instrument(skip(self, content, options))]
    pub fn update_comment(&self, id: u64, content: &str, options: &RequestOptions) -> Result<()> {
        self.post_void(
            &format!("/comments/{id}"),
            &UpdateCommentBody { content },
            options.request_id.as_deref(),
        )
    }

    #[instrument(skip(self, options))]
    pub fn delete_comment(&self, id: u64, options: &RequestOptions) -> Result<()> {
        self.delete(&format!("/comments/{id}"), options.request_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::{body_json, scripted, BASE_URL};
    use crate::http::HttpMethod;
    use crate::transport::ScriptedTransport;

    #[test]
    fn get_project_comments_filters_by_project() {
        let (client, transport) = scripted(ScriptedTransport::new().respond(
            200,
            r#"[{"id":1,"project_id":5,"posted":"2024-01-01T00:00:00Z","content":"hi"}]"#,
        ));
        let comments = client.get_project_comments(5).unwrap();
        assert_eq!(comments[0].project_id, Some(5));
        assert_eq!(comments[0].task_id, None);
        assert_eq!(
            transport.last_request().unwrap().url,
            format!("{BASE_URL}/v1/comments?project_id=5")
        );
    }

    #[test]
    fn get_task_comments_filters_by_task() {
        let (client, transport) = scripted(ScriptedTransport::new().respond(200, "[]"));
        client.get_task_comments(8).unwrap();
        assert_eq!(
            transport.last_request().unwrap().url,
            format!("{BASE_URL}/v1/comments?task_id=8")
        );
    }

    #[test]
    fn get_comment_decodes_attachment() {
        let body = r#"{
            "id": 2, "task_id": 8, "posted": "2024-01-01T00:00:00Z", "content": "see file",
            "attachment": {
                "resource_type": "image", "file_name": "cat.png", "file_size": 1024,
                "file_type": "image/png", "file_url": "https://example.test/cat.png",
                "upload_state": "completed", "image": "https://example.test/cat.png",
                "image_width": 640, "image_height": 480,
                "tn_s": ["https://example.test/cat_s.png", 64, 48]
            }
        }"#;
        let (client, _) = scripted(ScriptedTransport::new().respond(200, body));
        let comment = client.get_comment(2).unwrap();
        let attachment = comment.attachment.unwrap();
        assert_eq!(attachment.resource_type, "image");
        assert_eq!(attachment.file_size, Some(1024));
        assert_eq!(
            attachment.tn_s,
            Some(Thumbnail("https://example.test/cat_s.png".to_string(), 64, 48))
        );
        assert_eq!(attachment.tn_l, None);
        assert_eq!(attachment.file_duration, None);
    }

    #[test]
    fn thumbnail_decoding_is_lenient() {
        let extra: Thumbnail = serde_json::from_str(r#"["https://example.test/t.png", 64, 48, "extra"]"#).unwrap();
        assert_eq!(extra, Thumbnail("https://example.test/t.png".to_string(), 64, 48));

        let stringly: Thumbnail = serde_json::from_str(r#"["https://example.test/t.png", "64", "48"]"#).unwrap();
        assert_eq!(stringly, Thumbnail("https://example.test/t.png".to_string(), 64, 48));

        let short: Thumbnail = serde_json::from_str(r#"["https://example.test/t.png"]"#).unwrap();
        assert_eq!(short, Thumbnail("https://example.test/t.png".to_string(), 0, 0));

        // Serializes back to the three-element wire form.
        assert_eq!(
            serde_json::to_value(&extra).unwrap(),
            serde_json::json!(["https://example.test/t.png", 64, 48])
        );
    }

    #[test]
    fn comment_with_null_fields_decodes() {
        let body = r#"{"id":5,"task_id":8,"posted":null,"content":null,"attachment":{"resource_type":null,"tn_m":null}}"#;
        let (client, _) = scripted(ScriptedTransport::new().respond(200, body));
        let comment = client.get_comment(5).unwrap();
        assert_eq!(comment.posted, "");
        assert_eq!(comment.content, "");
        let attachment = comment.attachment.unwrap();
        assert_eq!(attachment.resource_type, "");
        assert_eq!(attachment.tn_m, None);
    }

    #[test]
    fn create_task_comment_carries_only_task_id() {
        let (client, transport) = scripted(ScriptedTransport::new().respond(200, r#"{"id":3,"task_id":8,"content":"c"}"#));
        client
            .create_task_comment(8, "c", &CreateCommentOptions::default())
            .unwrap();
        let req = transport.last_request().unwrap();
        assert_eq!(req.url, format!("{BASE_URL}/v1/comments"));
        assert_eq!(body_json(&req), serde_json::json!({"task_id": 8, "content": "c"}));
    }

    #[test]
    fn create_project_comment_with_attachment() {
        let (client, transport) = scripted(ScriptedTransport::new().respond(200, r#"{"id":4,"project_id":5}"#));
        let options = CreateCommentOptions {
            request_id: Some("REQ".to_string()),
            attachment: Some(UploadAttachment {
                resource_type: Some("file".to_string()),
                file_url: Some("https://example.test/a.pdf".to_string()),
                ..Default::default()
            }),
        };
        client.create_project_comment(5, "report", &options).unwrap();

        let req = transport.last_request().unwrap();
        assert_eq!(
            body_json(&req),
            serde_json::json!({
                "project_id": 5,
                "content": "report",
                "attachment": {"resource_type": "file", "file_url": "https://example.test/a.pdf"}
            })
        );
        assert_eq!(req.header("X-Request-Id"), Some("REQ"));
    }

    #[test]
    fn update_comment_without_request_id() {
        let (client, transport) = scripted(ScriptedTransport::new().respond(204, ""));
        client.update_comment(7, "edited", &RequestOptions::default()).unwrap();

        let req = transport.last_request().unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, format!("{BASE_URL}/v1/comments/7"));
        assert_eq!(req.body.as_deref(), Some(r#"{"content":"edited"}"#));
        assert_eq!(req.header("X-Request-Id"), None);
    }

    #[test]
    fn delete_comment() {
        let (client, transport) = scripted(ScriptedTransport::new().respond(204, ""));
        client.delete_comment(7, &RequestOptions::default()).unwrap();
        let req = transport.last_request().unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, format!("{BASE_URL}/v1/comments/7"));
        assert!(req.body.is_none());
    }
}
