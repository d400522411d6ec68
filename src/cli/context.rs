use std::sync::Arc;

use anyhow::anyhow;

use crate::api::client::ApiClient;
use crate::config::{config, normalize_base_url};
use crate::error::{ClientError, StorageError};
use crate::session::AuthSession;
use crate::storage::{FileStore, SharedStore};

/// Everything a command needs: the API client, the session and the file-backed store behind both.
pub struct CliContext {
    pub client: Arc<ApiClient>,
    pub session: Arc<AuthSession>,
    pub store: SharedStore,
}

impl CliContext {
    pub fn load(base_url: Option<&str>) -> anyhow::Result<Self> {
        Self::from_store(FileStore::open_default(), base_url)
    }

    fn from_store(opened: Result<FileStore, StorageError>, base_url: Option<&str>) -> anyhow::Result<Self> {
        // As a ClientError so the binary reports STORAGE_ERROR
        let file_store = opened.map_err(ClientError::from)?;
        tracing::debug!("Using credential store at {}", file_store.path().display());
        let store: SharedStore = Arc::new(file_store);

        let mut api_config = config().clone();
        if let Some(url) = base_url {
            api_config.base_url = normalize_base_url(url);
        }

        let client = Arc::new(ApiClient::new(api_config, store.clone())?);
        let session = Arc::new(AuthSession::new(store.clone()));
        session.attach(&client);

        Ok(Self { client, session, store })
    }

    pub fn require_login(&self) -> anyhow::Result<()> {
        if self.session.is_logged_in() {
            Ok(())
        } else {
            Err(anyhow!("Not logged in. Run 'ahadi auth login' first"))
        }
    }
}
