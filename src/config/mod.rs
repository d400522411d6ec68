use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const APP_NAME: &str = "Ahadi";

/// Used for window titles, CLI banners and similar brand surfaces.
pub const APP_TITLE: &str = "Ahadi – Events";

pub const DEFAULT_AUTH_SCHEME: &str = "Bearer";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// API base URL without trailing slash, e.g. `https://api.ahadi.app/api/v1`.
    pub base_url: String,
    pub prefixes: PrefixConfig,
    pub auth_scheme: String,
    pub timeout: Duration,
    pub google_client_id: Option<String>,
}

/// Path prefixes for every resource family, stored without surrounding slashes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrefixConfig {
    pub auth: String,
    pub events: String,
    pub public: String,
    pub payments: String,
    pub chat: String,
    pub inbox: String,
    pub direct_messages: String,
    pub invitations: String,
    pub invitation_templates: String,
    pub announcements: String,
    pub participants: String,
    pub event_types: String,
    pub whatsapp: String,
}

impl Default for PrefixConfig {
    fn default() -> Self {
        Self {
            auth: "auth".to_string(),
            events: "events".to_string(),
            public: "public".to_string(),
            payments: "payments".to_string(),
            chat: "chat".to_string(),
            inbox: "inbox".to_string(),
            direct_messages: "direct-messages".to_string(),
            invitations: "invitations".to_string(),
            invitation_templates: "invitation-templates".to_string(),
            announcements: "announcements".to_string(),
            participants: "participants".to_string(),
            event_types: "event-types".to_string(),
            whatsapp: "whatsapp".to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            prefixes: PrefixConfig::default(),
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            google_client_id: None,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        // A missing .env is normal outside local development
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (environment, map, test fixture).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_overrides(lookup)
    }

    /// Default prefixes and scheme against the given base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: normalize_base_url(&base_url),
            ..Self::default()
        }
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("API_BASE_URL") {
            self.base_url = normalize_base_url(&v);
        }

        let p = &mut self.prefixes;
        override_prefix(&mut p.auth, lookup("API_AUTH_PREFIX"));
        override_prefix(&mut p.events, lookup("API_EVENTS_PREFIX"));
        override_prefix(&mut p.public, lookup("API_PUBLIC_PREFIX"));
        override_prefix(&mut p.payments, lookup("API_PAYMENTS_PREFIX"));
        override_prefix(&mut p.chat, lookup("API_CHAT_PREFIX"));
        override_prefix(&mut p.inbox, lookup("API_INBOX_PREFIX"));
        override_prefix(&mut p.direct_messages, lookup("API_DIRECT_MESSAGES_PREFIX"));
        override_prefix(&mut p.invitations, lookup("API_INVITATIONS_PREFIX"));
        override_prefix(&mut p.invitation_templates, lookup("API_INVITATION_TEMPLATES_PREFIX"));
        override_prefix(&mut p.announcements, lookup("API_ANNOUNCEMENTS_PREFIX"));
        override_prefix(&mut p.participants, lookup("API_PARTICIPANTS_PREFIX"));
        override_prefix(&mut p.event_types, lookup("API_EVENT_TYPES_PREFIX"));
        override_prefix(&mut p.whatsapp, lookup("API_WHATSAPP_PREFIX"));

        // VITE_AUTH_SCHEME is the name the web frontend ships with
        let scheme = lookup("AUTH_SCHEME").or_else(|| lookup("VITE_AUTH_SCHEME"));
        self.auth_scheme = parse_auth_scheme(scheme.as_deref());

        self.timeout = parse_timeout(lookup("API_RECEIVE_TIMEOUT").as_deref());

        self.google_client_id = lookup("GOOGLE_CLIENT_ID")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        self
    }
}

/// Strip a single trailing slash from the base URL.
pub fn normalize_base_url(value: &str) -> String {
    value.strip_suffix('/').unwrap_or(value).to_string()
}

/// Strip every leading and trailing slash; fall back to `default` when nothing is left.
pub fn normalize_prefix(value: Option<&str>, default: &str) -> String {
    let trimmed = value.unwrap_or(default).trim_matches('/');
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

fn override_prefix(slot: &mut String, value: Option<String>) {
    let default = slot.clone();
    *slot = normalize_prefix(value.as_deref(), &default);
}

pub fn parse_auth_scheme(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => DEFAULT_AUTH_SCHEME.to_string(),
    }
}

/// Seconds from the environment; anything that is not a positive finite number means 60s.
pub fn parse_timeout(value: Option<&str>) -> Duration {
    let fallback = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
    match value.map(str::trim) {
        None | Some("") => fallback,
        Some(s) => match s.parse::<f64>() {
            Ok(n) if n.is_finite() && n > 0.0 => Duration::try_from_secs_f64(n).unwrap_or(fallback),
            _ => fallback,
        },
    }
}

// Global singleton config - initialized on first use
pub static CONFIG: Lazy<ApiConfig> = Lazy::new(ApiConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static ApiConfig {
    &CONFIG
}
