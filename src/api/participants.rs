use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::client::ApiClient;
use crate::api::pagination::{Page, QueryParams};
use crate::error::ClientResult;
use crate::types::Participant;

/// Create/update body; unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipantPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct ParticipantsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn participants(&self) -> ParticipantsApi<'_> {
        ParticipantsApi { client: self }
    }
}

impl ParticipantsApi<'_> {
    fn path(&self, suffix: &str) -> String {
        ApiClient::path(&self.client.config().prefixes.participants, suffix)
    }

    pub async fn list(&self, page: Option<u32>, search: Option<&str>) -> ClientResult<Page<Participant>> {
        let query = QueryParams::new()
            .set_opt("page", page)
            .set_non_empty("search", search)
            .into_option();
        self.client.get(&self.path(""), query).await
    }

    pub async fn create(&self, payload: &ParticipantPayload) -> ClientResult<Participant> {
        self.client.post(&self.path(""), payload).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Participant> {
        self.client.get(&self.path(&format!("{}/", id)), None).await
    }

    pub async fn update(&self, id: i64, payload: &ParticipantPayload) -> ClientResult<Participant> {
        self.client.put(&self.path(&format!("{}/", id)), payload).await
    }

    pub async fn patch(&self, id: i64, payload: &ParticipantPayload) -> ClientResult<Participant> {
        self.client.patch(&self.path(&format!("{}/", id)), payload).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.client.delete(&self.path(&format!("{}/", id))).await
    }
}
