//! Auth session state: whether the user is logged in and who they are, persisted in client storage.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::api::client::ApiClient;
use crate::api::token::{extract_access_token, extract_refresh_token, TokenStore, REFRESH_KEY};
use crate::storage::SharedStore;

pub const EXPIRY_KEY: &str = "ahadi_access_expiry";
pub const USER_KEY: &str = "ahadi_user";

/// Session lifetime stamped at login.
pub const SESSION_HOURS: i64 = 2;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub logged_in: bool,
    pub user: Option<AuthUser>,
}

pub struct AuthSession {
    tokens: TokenStore,
    state: watch::Sender<SessionState>,
}

impl AuthSession {
    /// Build a session over `store` and hydrate it from whatever is persisted there.
    pub fn new(store: SharedStore) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        let session = Self {
            tokens: TokenStore::new(store),
            state,
        };
        session.hydrate();
        session
    }

    /// Make this session the client's logout handler, so a failed token refresh logs out here too.
    pub fn attach(self: &Arc<Self>, client: &ApiClient) {
        let session = Arc::clone(self);
        client.set_logout_handler(move || session.logout());
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().logged_in
    }

    pub fn user(&self) -> Option<AuthUser> {
        self.state.borrow().user.clone()
    }

    /// Re-read login state and user from storage.
    pub fn hydrate(&self) {
        self.hydrate_at(now_ms());
    }

    pub fn hydrate_at(&self, now_ms: i64) {
        let logged_in = self.read_logged_in(now_ms);
        let user = self.read_stored_user();
        self.state.send_replace(SessionState { logged_in, user });
    }

    pub fn set_logged_in(&self, logged_in: bool) {
        self.state.send_modify(|s| s.logged_in = logged_in);
    }

    /// Update the cached user; `None` removes it from storage.
    pub fn set_user(&self, user: Option<AuthUser>) {
        let storage = self.tokens.storage();
        match &user {
            None => storage.remove(USER_KEY),
            Some(u) => match serde_json::to_string(u) {
                Ok(raw) => storage.set(USER_KEY, &raw),
                Err(e) => tracing::warn!("Failed to serialize user for storage: {}", e),
            },
        }
        self.state.send_modify(|s| s.user = user);
    }

    /// Call after storing the access token: the session ends `SESSION_HOURS` from now.
    pub fn set_session_expiry(&self) {
        self.set_session_expiry_at(now_ms());
    }

    pub fn set_session_expiry_at(&self, now_ms: i64) {
        let expiry = now_ms + Duration::hours(SESSION_HOURS).num_milliseconds();
        self.tokens.storage().set(EXPIRY_KEY, &expiry.to_string());
    }

    /// Store the credentials from a login/verify/social response and mark the session active.
    ///
    /// Returns `false` (and changes nothing) when the response carries no access token.
    pub fn complete_login(&self, response: &Value) -> bool {
        let Some(access) = extract_access_token(response) else {
            debug!("Login response carried no access token");
            return false;
        };

        self.tokens.set_access_token(&access);
        if let Some(refresh) = extract_refresh_token(response) {
            self.tokens.set_refresh_token(&refresh);
        }
        self.set_session_expiry();

        if let Some(user) = user_from_response(response) {
            self.set_user(Some(user));
        }
        self.set_logged_in(true);
        info!("Session started");
        true
    }

    pub fn logout(&self) {
        self.state.send_replace(SessionState::default());
        self.clear_persisted();
        debug!("Session cleared");
    }

    fn clear_persisted(&self) {
        self.tokens.clear_access_token();
        let storage = self.tokens.storage();
        storage.remove(EXPIRY_KEY);
        storage.remove(REFRESH_KEY);
        storage.remove(USER_KEY);
    }

    fn stored_expiry(&self) -> Option<i64> {
        let raw = self.tokens.storage().get(EXPIRY_KEY)?;
        let raw = raw.trim();
        // A blank stamp counts as epoch zero, i.e. long expired
        if raw.is_empty() {
            return Some(0);
        }
        raw.parse::<i64>()
            .ok()
            .or_else(|| raw.parse::<f64>().ok().filter(|n| n.is_finite()).map(|n| n as i64))
    }

    // Without a stored expiry the token alone decides
    fn session_valid(&self, now_ms: i64) -> bool {
        match self.stored_expiry() {
            Some(expiry) => now_ms < expiry,
            None => self.tokens.has_access_token(),
        }
    }

    fn read_logged_in(&self, now_ms: i64) -> bool {
        if !self.tokens.has_access_token() {
            return false;
        }
        if !self.session_valid(now_ms) {
            info!("Stored session expired; clearing credentials");
            self.clear_persisted();
            return false;
        }
        true
    }

    fn read_stored_user(&self) -> Option<AuthUser> {
        let raw = self.tokens.storage().get(USER_KEY)?;
        if raw.is_empty() {
            return None;
        }
        serde_json::from_str(&raw).ok()
    }
}

fn user_from_response(response: &Value) -> Option<AuthUser> {
    let user = response
        .get("user")
        .filter(|u| u.is_object())
        .or_else(|| response.get("data").and_then(|d| d.get("user")).filter(|u| u.is_object()))?;
    serde_json::from_value(user.clone()).ok()
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
