//! Event chat rooms: history, sending, read markers.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::api::client::ApiClient;
use crate::api::pagination::{Page, QueryParams};
use crate::error::ClientResult;
use crate::types::{ChatMessage, ChatRoom};

/// History filters. The backend caps `limit` at 200 (default 100).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatMessagesParams {
    pub page: Option<u32>,
    pub since_id: Option<i64>,
    pub since_timestamp: Option<String>,
    pub limit: Option<u32>,
}

impl ChatMessagesParams {
    fn to_query(&self) -> Option<QueryParams> {
        QueryParams::new()
            .set_opt("page", self.page)
            .set_opt("since_id", self.since_id)
            .set_opt("since_timestamp", self.since_timestamp.as_deref())
            .set_opt("limit", self.limit)
            .into_option()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendChatMessagePayload {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SendChatMessagePayload {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_deleted: None,
            extra: Map::new(),
        }
    }
}

pub struct ChatApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn chat(&self) -> ChatApi<'_> {
        ChatApi { client: self }
    }
}

impl ChatApi<'_> {
    fn event_path(&self, event_id: i64, suffix: &str) -> String {
        ApiClient::path(
            &self.client.config().prefixes.chat,
            &format!("events/{}/{}", event_id, suffix),
        )
    }

    pub async fn messages(&self, event_id: i64, params: &ChatMessagesParams) -> ClientResult<Page<ChatMessage>> {
        self.client
            .get_with_auth(&self.event_path(event_id, "messages/"), params.to_query())
            .await
    }

    /// Also broadcast to the room's websocket subscribers by the backend.
    pub async fn send_message(&self, event_id: i64, payload: &SendChatMessagePayload) -> ClientResult<ChatMessage> {
        self.client.post(&self.event_path(event_id, "messages/"), payload).await
    }

    pub async fn mark_read(&self, event_id: i64) -> ClientResult<Value> {
        self.client.post(&self.event_path(event_id, "read/"), &json!({})).await
    }

    pub async fn room(&self, event_id: i64) -> ClientResult<ChatRoom> {
        self.client.get_with_auth(&self.event_path(event_id, "room/"), None).await
    }

    pub async fn unread(&self, event_id: i64) -> ClientResult<Value> {
        self.client.get_with_auth(&self.event_path(event_id, "unread/"), None).await
    }
}
