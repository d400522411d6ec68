use serde_json::Value;

use crate::api::client::ApiClient;
use crate::error::ClientResult;

/// Anonymous endpoints backing the landing page.
pub struct PublicApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn public(&self) -> PublicApi<'_> {
        PublicApi { client: self }
    }
}

impl PublicApi<'_> {
    fn path(&self, suffix: &str) -> String {
        ApiClient::path(&self.client.config().prefixes.public, suffix)
    }

    pub async fn config(&self) -> ClientResult<Value> {
        self.client.get(&self.path("config/"), None).await
    }

    pub async fn info(&self) -> ClientResult<Value> {
        self.client.get(&self.path("info/"), None).await
    }

    /// Active subscription plans.
    pub async fn plans(&self) -> ClientResult<Value> {
        self.client.get(&self.path("plans/"), None).await
    }
}
