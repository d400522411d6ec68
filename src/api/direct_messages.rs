use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::api::client::ApiClient;
use crate::api::events::encode_segment;
use crate::error::ClientResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendDirectMessagePayload {
    pub recipient_id: i64,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct DirectMessagesApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn direct_messages(&self) -> DirectMessagesApi<'_> {
        DirectMessagesApi { client: self }
    }
}

impl DirectMessagesApi<'_> {
    fn path(&self, suffix: &str) -> String {
        ApiClient::path(&self.client.config().prefixes.direct_messages, suffix)
    }

    pub async fn send(&self, payload: &SendDirectMessagePayload) -> ClientResult<Value> {
        self.client.post(&self.path(""), payload).await
    }

    /// History with `user_id`, in both directions.
    pub async fn conversation(&self, user_id: &str) -> ClientResult<Value> {
        let path = self.path(&format!("conversation/{}/", encode_segment(user_id)));
        self.client.get_with_auth(&path, None).await
    }

    /// Mark everything received from `user_id` as read.
    pub async fn mark_conversation_read(&self, user_id: &str) -> ClientResult<Value> {
        let path = self.path(&format!("conversation/{}/read/", encode_segment(user_id)));
        self.client.post(&path, &json!({})).await
    }
}
