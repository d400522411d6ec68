//! Inbox: the current user's messages, read state and conversations.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::api::client::ApiClient;
use crate::api::pagination::{page_query, Page};
use crate::error::ClientResult;
use crate::types::{null_as_default, InboxMessage};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InboxPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnreadCount {
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct InboxApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn inbox(&self) -> InboxApi<'_> {
        InboxApi { client: self }
    }
}

impl InboxApi<'_> {
    fn path(&self, suffix: &str) -> String {
        ApiClient::path(&self.client.config().prefixes.inbox, suffix)
    }

    pub async fn list(&self, page: Option<u32>) -> ClientResult<Page<InboxMessage>> {
        self.client.get_with_auth(&self.path(""), page_query(page)).await
    }

    pub async fn create(&self, payload: &InboxPayload) -> ClientResult<InboxMessage> {
        self.client.post(&self.path(""), payload).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<InboxMessage> {
        self.client.get_with_auth(&self.path(&format!("{}/", id)), None).await
    }

    pub async fn update(&self, id: i64, payload: &InboxPayload) -> ClientResult<InboxMessage> {
        self.client.put(&self.path(&format!("{}/", id)), payload).await
    }

    pub async fn patch(&self, id: i64, payload: &InboxPayload) -> ClientResult<InboxMessage> {
        self.client.patch(&self.path(&format!("{}/", id)), payload).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.client.delete(&self.path(&format!("{}/", id))).await
    }

    pub async fn mark_read(&self, id: i64) -> ClientResult<InboxMessage> {
        self.client
            .post(&self.path(&format!("{}/mark_read/", id)), &json!({}))
            .await
    }

    pub async fn unread_count(&self) -> ClientResult<UnreadCount> {
        self.client.get_with_auth(&self.path("unread_count/"), None).await
    }

    /// Messages grouped by conversation partner.
    pub async fn conversations(&self) -> ClientResult<Value> {
        self.client.get_with_auth(&self.path("conversations/"), None).await
    }

    pub async fn mark_all_read(&self) -> ClientResult<Value> {
        self.client.post(&self.path("mark_all_read/"), &json!({})).await
    }
}
