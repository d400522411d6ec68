use serde_json::Value;

use crate::api::client::ApiClient;
use crate::api::pagination::{page_query, Page, QueryParams};
use crate::error::ClientResult;
use crate::types::InvitationTemplate;

pub struct InvitationTemplatesApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn invitation_templates(&self) -> InvitationTemplatesApi<'_> {
        InvitationTemplatesApi { client: self }
    }
}

impl InvitationTemplatesApi<'_> {
    fn path(&self, suffix: &str) -> String {
        ApiClient::path(&self.client.config().prefixes.invitation_templates, suffix)
    }

    /// Active templates only.
    pub async fn list(&self, page: Option<u32>) -> ClientResult<Page<InvitationTemplate>> {
        self.client.get(&self.path(""), page_query(page)).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<InvitationTemplate> {
        self.client.get(&self.path(&format!("{}/", id)), None).await
    }

    pub async fn categories(&self) -> ClientResult<Value> {
        self.client.get(&self.path("categories/"), None).await
    }

    /// `category` is an upper-case code such as `WEDDING`.
    pub async fn by_category(&self, category: &str) -> ClientResult<Value> {
        let query = QueryParams::new().set("category", category);
        self.client.get(&self.path("by_category/"), Some(query)).await
    }

    pub async fn free(&self) -> ClientResult<Value> {
        self.client.get(&self.path("free_templates/"), None).await
    }

    pub async fn premium(&self) -> ClientResult<Value> {
        self.client.get(&self.path("premium_templates/"), None).await
    }
}
