mod common;

use anyhow::Result;

use ahadi_client::api::events::PublicEventsParams;
use ahadi_client::error::ClientError;
use common::MockBackend;

#[tokio::test]
async fn no_content_response_decodes_as_unit() -> Result<()> {
    let backend = MockBackend::spawn().await?;
    let (client, _store) = backend.client()?;
    client.tokens().set_access_token(common::FRESH_ACCESS);

    client.events().delete(5).await?;
    Ok(())
}

#[tokio::test]
async fn error_status_carries_body() -> Result<()> {
    let backend = MockBackend::spawn().await?;
    let (client, _store) = backend.client()?;

    let params = PublicEventsParams { page: Some(9), ..Default::default() };
    let err = client.events().public_events(&params).await.unwrap_err();
    assert!(matches!(err, ClientError::Http { status: 404, .. }));
    assert_eq!(err.server_message(), Some("Invalid page."));
    assert_eq!(err.error_code(), "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn missing_base_url_is_a_config_error() -> Result<()> {
    let client = ahadi_client::ApiClient::new(
        ahadi_client::ApiConfig::default(),
        ahadi_client::storage::MemoryStore::shared(),
    )?;
    let err = client.public().config().await.unwrap_err();
    assert!(matches!(err, ClientError::ConfigMissing("API_BASE_URL")));
    Ok(())
}
