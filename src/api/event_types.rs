use crate::api::client::ApiClient;
use crate::api::pagination::{page_query, Page};
use crate::error::ClientResult;
use crate::types::EventType;

pub struct EventTypesApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn event_types(&self) -> EventTypesApi<'_> {
        EventTypesApi { client: self }
    }
}

impl EventTypesApi<'_> {
    fn path(&self, suffix: &str) -> String {
        ApiClient::path(&self.client.config().prefixes.event_types, suffix)
    }

    /// Paginated list of event types; `page` is 1-based.
    pub async fn list(&self, page: Option<u32>) -> ClientResult<Page<EventType>> {
        self.client.get(&self.path(""), page_query(page)).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<EventType> {
        self.client.get(&self.path(&format!("{}/", id)), None).await
    }
}
