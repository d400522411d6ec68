mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;

use ahadi_client::api::MultipartForm;
use ahadi_client::error::ClientError;
use common::{MockBackend, FRESH_ACCESS, STALE_ACCESS, VALID_REFRESH};

fn count_logouts(client: &ahadi_client::ApiClient) -> Arc<AtomicUsize> {
    let logouts = Arc::new(AtomicUsize::new(0));
    let counter = logouts.clone();
    client.set_logout_handler(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    logouts
}

#[tokio::test]
async fn expired_token_is_refreshed_and_request_replayed() -> Result<()> {
    let backend = MockBackend::spawn().await?;
    let (client, _store) = backend.client()?;
    let logouts = count_logouts(&client);

    client.tokens().set_access_token(STALE_ACCESS);
    client.tokens().set_refresh_token(VALID_REFRESH);

    let me: Value = client.auth().me().await?;
    assert_eq!(me["full_name"], "Amina Juma");

    assert_eq!(backend.state.refresh_calls(), 1);
    assert_eq!(backend.state.me_calls(), 2, "original request plus one replay");
    assert_eq!(client.tokens().access_token().as_deref(), Some(FRESH_ACCESS));
    assert_eq!(client.tokens().refresh_token().as_deref(), Some(VALID_REFRESH));
    assert_eq!(logouts.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn valid_token_needs_no_refresh() -> Result<()> {
    let backend = MockBackend::spawn().await?;
    let (client, _store) = backend.client()?;

    client.tokens().set_access_token(FRESH_ACCESS);
    let _: Value = client.auth().me().await?;

    assert_eq!(backend.state.refresh_calls(), 0);
    assert_eq!(backend.state.me_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn rejected_refresh_clears_tokens_and_logs_out() -> Result<()> {
    let backend = MockBackend::spawn().await?;
    let (client, _store) = backend.client()?;
    let logouts = count_logouts(&client);

    client.tokens().set_access_token(STALE_ACCESS);
    client.tokens().set_refresh_token("r-revoked");

    let err = client.auth().me().await.unwrap_err();
    assert_eq!(err.status_code(), Some(401));
    assert_eq!(err.server_message(), Some("Given token not valid for any token type"));

    assert_eq!(backend.state.refresh_calls(), 1);
    assert_eq!(backend.state.me_calls(), 1, "no replay after a failed refresh");
    assert_eq!(client.tokens().access_token(), None);
    assert_eq!(client.tokens().refresh_token(), None);
    assert_eq!(logouts.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn missing_refresh_token_logs_out_without_calling_backend() -> Result<()> {
    let backend = MockBackend::spawn().await?;
    let (client, _store) = backend.client()?;
    let logouts = count_logouts(&client);

    client.tokens().set_access_token(STALE_ACCESS);

    let err = client.auth().me().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(backend.state.refresh_calls(), 0);
    assert_eq!(client.tokens().access_token(), None);
    assert_eq!(logouts.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn second_unauthorized_after_replay_logs_out() -> Result<()> {
    let backend = MockBackend::spawn().await?;
    backend.state.reject_everything.store(true, Ordering::SeqCst);
    let (client, _store) = backend.client()?;
    let logouts = count_logouts(&client);

    client.tokens().set_access_token(STALE_ACCESS);
    client.tokens().set_refresh_token(VALID_REFRESH);

    let err = client.auth().me().await.unwrap_err();
    assert_eq!(err.status_code(), Some(401));

    // One refresh, one replay, then give up: no refresh loop
    assert_eq!(backend.state.refresh_calls(), 1);
    assert_eq!(backend.state.me_calls(), 2);
    assert_eq!(client.tokens().access_token(), None);
    assert_eq!(client.tokens().refresh_token(), None);
    assert_eq!(logouts.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn concurrent_unauthorized_requests_share_one_refresh() -> Result<()> {
    let backend = MockBackend::spawn().await?;
    let (client, _store) = backend.client()?;
    let logouts = count_logouts(&client);

    client.tokens().set_access_token(STALE_ACCESS);
    client.tokens().set_refresh_token(VALID_REFRESH);

    let requests = (0..5).map(|_| {
        let client = client.clone();
        async move { client.auth().me().await }
    });
    let results = futures::future::join_all(requests).await;

    for result in results {
        let me = result?;
        assert_eq!(me["id"], 1);
    }
    assert_eq!(backend.state.refresh_calls(), 1);
    assert_eq!(logouts.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn concurrent_rejected_refresh_logs_out_once() -> Result<()> {
    let backend = MockBackend::spawn().await?;
    let (client, _store) = backend.client()?;
    let logouts = count_logouts(&client);

    client.tokens().set_access_token(STALE_ACCESS);
    client.tokens().set_refresh_token("r-revoked");

    let requests = (0..5).map(|_| {
        let client = client.clone();
        async move { client.auth().me().await }
    });
    let results = futures::future::join_all(requests).await;

    for result in results {
        assert_eq!(result.unwrap_err().status_code(), Some(401));
    }
    assert_eq!(backend.state.refresh_calls(), 1);
    assert_eq!(logouts.load(Ordering::SeqCst), 1);
    assert_eq!(client.tokens().access_token(), None);
    assert_eq!(client.tokens().refresh_token(), None);
    Ok(())
}

#[tokio::test]
async fn concurrent_second_unauthorized_logs_out_once() -> Result<()> {
    let backend = MockBackend::spawn().await?;
    backend.state.reject_everything.store(true, Ordering::SeqCst);
    let (client, _store) = backend.client()?;
    let logouts = count_logouts(&client);

    client.tokens().set_access_token(STALE_ACCESS);
    client.tokens().set_refresh_token(VALID_REFRESH);

    let requests = (0..3).map(|_| {
        let client = client.clone();
        async move { client.auth().me().await }
    });
    for result in futures::future::join_all(requests).await {
        assert!(result.unwrap_err().is_unauthorized());
    }
    assert_eq!(backend.state.refresh_calls(), 1);
    assert_eq!(logouts.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn multipart_upload_is_replayed_after_refresh() -> Result<()> {
    let backend = MockBackend::spawn().await?;
    let (client, _store) = backend.client()?;
    let logouts = count_logouts(&client);

    client.tokens().set_access_token(STALE_ACCESS);
    client.tokens().set_refresh_token(VALID_REFRESH);

    let form = MultipartForm::new()
        .text("full_name", "Amina Juma")
        .file("profile_picture", "me.png", Some("image/png"), b"PNGDATA".to_vec());
    let updated = client.auth().patch_me_multipart(&form).await?;

    assert_eq!(updated["multipart"], true);
    assert_eq!(updated["has_name"], true);
    assert_eq!(updated["has_file"], true, "file part must survive the replay");
    assert_eq!(backend.state.refresh_calls(), 1);
    assert_eq!(backend.state.me_patch_calls(), 2, "original upload plus one replay");
    assert_eq!(logouts.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn get_with_auth_fails_fast_without_token() -> Result<()> {
    let backend = MockBackend::spawn().await?;
    let (client, _store) = backend.client()?;

    let err = client.events().my_events(None).await.unwrap_err();
    assert!(matches!(err, ClientError::NotAuthenticated));
    assert_eq!(err.error_code(), "NOT_AUTHENTICATED");
    Ok(())
}

#[tokio::test]
async fn explicit_refresh_stores_new_access_token() -> Result<()> {
    let backend = MockBackend::spawn().await?;
    let (client, store) = backend.client()?;

    assert!(!client.refresh_access_token().await, "nothing to refresh with");

    client.tokens().set_refresh_token(VALID_REFRESH);
    assert!(client.refresh_access_token().await);
    assert_eq!(store.get("ahadi_access").as_deref(), Some(FRESH_ACCESS));
    Ok(())
}
