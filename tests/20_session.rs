mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};

use ahadi_client::router::{Navigation, Router};
use ahadi_client::session::{AuthSession, EXPIRY_KEY, USER_KEY};
use common::{MockBackend, STALE_ACCESS, VALID_REFRESH};

#[tokio::test]
async fn failed_refresh_logs_out_attached_session() -> Result<()> {
    let backend = MockBackend::spawn().await?;
    let (client, store) = backend.client()?;
    let session = Arc::new(AuthSession::new(store.clone()));
    session.attach(&client);

    assert!(session.complete_login(&json!({
        "access": STALE_ACCESS,
        "refresh": "r-revoked",
        "user": {"id": 1, "full_name": "Amina Juma"}
    })));
    assert!(session.is_logged_in());
    let mut rx = session.subscribe();

    let result: Result<Value, _> = client.auth().me().await;
    assert!(result.is_err());

    assert!(!session.is_logged_in());
    assert!(session.user().is_none());
    assert!(rx.has_changed()?);
    assert!(!rx.borrow_and_update().logged_in);
    for key in [EXPIRY_KEY, USER_KEY, "ahadi_access", "ahadi_refresh"] {
        assert_eq!(store.get(key), None, "{} should be cleared", key);
    }

    // The guard now sends protected navigation to the login page
    let nav = Router::default().before_each("/events", client.tokens());
    assert_eq!(nav.location().as_deref(), Some("/login?redirect=%2Fevents"));
    Ok(())
}

#[tokio::test]
async fn successful_refresh_keeps_session() -> Result<()> {
    let backend = MockBackend::spawn().await?;
    let (client, store) = backend.client()?;
    let session = Arc::new(AuthSession::new(store));
    session.attach(&client);

    session.complete_login(&json!({"access": STALE_ACCESS, "refresh": VALID_REFRESH}));

    let me: Value = client.auth().me().await?;
    assert_eq!(me["id"], 1);
    assert!(session.is_logged_in());
    assert_eq!(backend.state.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(Router::default().before_each("/events/create", client.tokens()), Navigation::Proceed);
    Ok(())
}
