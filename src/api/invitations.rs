use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::client::ApiClient;
use crate::api::pagination::{page_query, Page};
use crate::error::ClientResult;
use crate::types::Invitation;

/// Create/update/send body; unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvitationPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_via: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct InvitationsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn invitations(&self) -> InvitationsApi<'_> {
        InvitationsApi { client: self }
    }
}

impl InvitationsApi<'_> {
    fn path(&self, suffix: &str) -> String {
        ApiClient::path(&self.client.config().prefixes.invitations, suffix)
    }

    pub async fn list(&self, page: Option<u32>) -> ClientResult<Page<Invitation>> {
        self.client.get(&self.path(""), page_query(page)).await
    }

    pub async fn create(&self, payload: &InvitationPayload) -> ClientResult<Invitation> {
        self.client.post(&self.path(""), payload).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Invitation> {
        self.client.get(&self.path(&format!("{}/", id)), None).await
    }

    pub async fn update(&self, id: i64, payload: &InvitationPayload) -> ClientResult<Invitation> {
        self.client.put(&self.path(&format!("{}/", id)), payload).await
    }

    pub async fn patch(&self, id: i64, payload: &InvitationPayload) -> ClientResult<Invitation> {
        self.client.patch(&self.path(&format!("{}/", id)), payload).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.client.delete(&self.path(&format!("{}/", id))).await
    }

    /// Send through the channel named in the body (`sent_via`), or the backend default.
    pub async fn send(&self, id: i64, body: Option<&InvitationPayload>) -> ClientResult<Invitation> {
        let default = InvitationPayload::default();
        self.client
            .post(&self.path(&format!("{}/send/", id)), body.unwrap_or(&default))
            .await
    }
}
