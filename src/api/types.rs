//! Wire types for the Story Spoiler API

use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};

pub const AUTHENTICATION: &str = "/api/User/Authentication";
pub const STORY_CREATE: &str = "/api/Story/Create";
pub const STORY_ALL: &str = "/api/Story/All";

/// Path for editing the story with `id`
pub fn story_edit(id: &str) -> String {
    format!("/api/Story/Edit/{}", id)
}

/// Path for deleting the story with `id`
pub fn story_delete(id: &str) -> String {
    format!("/api/Story/Delete/{}", id)
}

/// Username/password pair exchanged for a bearer token
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// A story record as sent to the create and edit endpoints
///
/// Every field is optional so that incomplete records can be sent on purpose.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl StoryDraft {
    /// A complete record with all three fields set
    pub fn new(title: &str, description: &str, url: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            url: Some(url.to_string()),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponse {
    pub access_token: Option<String>,
}

/// Status and body of a single API call
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Path the request was sent to
    pub endpoint: String,
    pub status: u16,
    /// Raw response body
    pub text: String,
    /// Body decoded as JSON, or why it could not be
    pub json: std::result::Result<serde_json::Value, String>,
}

impl ApiResponse {
    pub fn new(endpoint: &str, status: u16, text: String) -> Self {
        let json = if text.trim().is_empty() {
            Err("empty body".to_string())
        } else {
            serde_json::from_str(&text).map_err(|e| e.to_string())
        };
        Self {
            endpoint: endpoint.to_string(),
            status,
            text,
            json,
        }
    }

    /// The decoded JSON body
    ///
    /// A body that is empty or not JSON is an `InvalidResponse` error.
    pub fn body(&self) -> Result<&serde_json::Value> {
        self.json.as_ref().map_err(|e| Error::InvalidResponse {
            endpoint: self.endpoint.clone(),
            message: e.clone(),
        })
    }

    /// String field `key` of a JSON object body
    pub fn field(&self, key: &str) -> Option<&str> {
        self.json.as_ref().ok()?.get(key)?.as_str()
    }

    /// The `msg` field the service puts on most responses
    pub fn msg(&self) -> Option<&str> {
        self.field("msg")
    }

    /// The `storyId` field returned on creation
    pub fn story_id(&self) -> Option<&str> {
        self.field("storyId")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_draft_omits_missing_fields() {
        let draft = StoryDraft {
            url: Some(String::new()),
            ..Default::default()
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json, serde_json::json!({ "url": "" }));
    }

    #[test]
    fn test_response_fields() {
        let resp = ApiResponse::new(
            STORY_CREATE,
            201,
            r#"{"msg":"Successfully created!","storyId":"abc-1"}"#.to_string(),
        );
        assert_eq!(resp.msg(), Some("Successfully created!"));
        assert_eq!(resp.story_id(), Some("abc-1"));
    }

    #[test]
    fn test_non_json_body() {
        let resp = ApiResponse::new(STORY_ALL, 502, "<html>Bad Gateway</html>".to_string());
        assert!(resp.json.is_err());
        assert!(resp.msg().is_none());
        match resp.body() {
            Err(Error::InvalidResponse { endpoint, .. }) => assert_eq!(endpoint, STORY_ALL),
            other => panic!("Expected InvalidResponse, got {:?}", other),
        }

        let empty = ApiResponse::new(STORY_ALL, 400, String::new());
        assert_eq!(empty.json, Err("empty body".to_string()));
    }

    #[test]
    fn test_paths() {
        assert_eq!(story_edit("123"), "/api/Story/Edit/123");
        assert_eq!(story_delete("abc"), "/api/Story/Delete/abc");
    }
}
