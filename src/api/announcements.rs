use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::client::ApiClient;
use crate::api::pagination::{page_query, Page};
use crate::error::ClientResult;
use crate::types::Announcement;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_notification: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct AnnouncementsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn announcements(&self) -> AnnouncementsApi<'_> {
        AnnouncementsApi { client: self }
    }
}

impl AnnouncementsApi<'_> {
    fn path(&self, suffix: &str) -> String {
        ApiClient::path(&self.client.config().prefixes.announcements, suffix)
    }

    pub async fn list(&self, page: Option<u32>) -> ClientResult<Page<Announcement>> {
        self.client.get(&self.path(""), page_query(page)).await
    }

    pub async fn create(&self, payload: &AnnouncementPayload) -> ClientResult<Announcement> {
        self.client.post(&self.path(""), payload).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Announcement> {
        self.client.get(&self.path(&format!("{}/", id)), None).await
    }

    pub async fn update(&self, id: i64, payload: &AnnouncementPayload) -> ClientResult<Announcement> {
        self.client.put(&self.path(&format!("{}/", id)), payload).await
    }

    pub async fn patch(&self, id: i64, payload: &AnnouncementPayload) -> ClientResult<Announcement> {
        self.client.patch(&self.path(&format!("{}/", id)), payload).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.client.delete(&self.path(&format!("{}/", id))).await
    }
}
