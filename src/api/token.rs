use serde_json::Value;

use crate::storage::SharedStore;

pub const ACCESS_KEY: &str = "ahadi_access";
pub const REFRESH_KEY: &str = "ahadi_refresh";

/// Access and refresh credentials kept in client storage.
///
/// This is the only place that knows the storage keys; the HTTP client and the auth session
/// both go through it.
#[derive(Clone)]
pub struct TokenStore {
    store: SharedStore,
}

impl TokenStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn storage(&self) -> &SharedStore {
        &self.store
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(ACCESS_KEY)
    }

    pub fn set_access_token(&self, token: &str) {
        self.store.set(ACCESS_KEY, token);
    }

    pub fn clear_access_token(&self) {
        self.store.remove(ACCESS_KEY);
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_KEY)
    }

    pub fn set_refresh_token(&self, token: &str) {
        self.store.set(REFRESH_KEY, token);
    }

    pub fn clear_refresh_token(&self) {
        self.store.remove(REFRESH_KEY);
    }

    /// Wipe access and refresh tokens (logout, failed refresh).
    pub fn clear_all(&self) {
        self.clear_access_token();
        self.clear_refresh_token();
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token().is_some()
    }

    // Empty strings count as absent
    fn read(&self, key: &str) -> Option<String> {
        self.store.get(key).filter(|t| !t.is_empty())
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("has_access", &self.access_token().is_some())
            .field("has_refresh", &self.refresh_token().is_some())
            .finish()
    }
}

const ACCESS_FIELDS: [&str; 4] = ["access", "access_token", "token", "key"];
const REFRESH_FIELDS: [&str; 2] = ["refresh", "refresh_token"];

/// Pull an access token out of a login/verify response.
///
/// Backends disagree on naming; tries `access`, `access_token`, `token`, `key` at the top
/// level and then under `data`. Returns the first non-blank string, trimmed.
pub fn extract_access_token(data: &Value) -> Option<String> {
    extract_first(data, &ACCESS_FIELDS)
}

/// Refresh-token counterpart of `extract_access_token` (`refresh`, `refresh_token`).
pub fn extract_refresh_token(data: &Value) -> Option<String> {
    extract_first(data, &REFRESH_FIELDS)
}

fn extract_first(data: &Value, fields: &[&str]) -> Option<String> {
    let top = data.as_object()?;
    let nested = top.get("data").and_then(Value::as_object);

    let top_level = fields.iter().map(|f| top.get(*f));
    let under_data = fields.iter().map(|f| nested.and_then(|n| n.get(*f)));

    top_level
        .chain(under_data)
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_empty_values_read_as_absent() {
        let tokens = TokenStore::new(MemoryStore::shared());
        tokens.set_access_token("");
        assert_eq!(tokens.access_token(), None);
        assert!(!tokens.has_access_token());

        tokens.set_access_token("abc");
        tokens.set_refresh_token("def");
        assert_eq!(tokens.access_token().as_deref(), Some("abc"));
        assert_eq!(tokens.refresh_token().as_deref(), Some("def"));

        tokens.clear_all();
        assert_eq!(tokens.access_token(), None);
        assert_eq!(tokens.refresh_token(), None);
    }

    #[test]
    fn test_extract_access_token_field_order() {
        assert_eq!(extract_access_token(&json!({"access": "a", "token": "t"})).as_deref(), Some("a"));
        assert_eq!(extract_access_token(&json!({"key": "k"})).as_deref(), Some("k"));
        assert_eq!(
            extract_access_token(&json!({"access": "  ", "access_token": " at "})).as_deref(),
            Some("at")
        );
    }

    #[test]
    fn test_extract_access_token_prefers_top_level_over_data() {
        let body = json!({"token": "top", "data": {"access": "nested"}});
        assert_eq!(extract_access_token(&body).as_deref(), Some("top"));

        let body = json!({"success": true, "data": {"access_token": "nested"}});
        assert_eq!(extract_access_token(&body).as_deref(), Some("nested"));
    }

    #[test]
    fn test_extract_access_token_rejects_non_strings() {
        assert_eq!(extract_access_token(&json!(null)), None);
        assert_eq!(extract_access_token(&json!("raw-token")), None);
        assert_eq!(extract_access_token(&json!({"access": 42, "data": {"token": true}})), None);
    }

    #[test]
    fn test_extract_refresh_token() {
        let body = json!({"data": {"refresh_token": "r1"}});
        assert_eq!(extract_refresh_token(&body).as_deref(), Some("r1"));
        assert_eq!(extract_refresh_token(&json!({"access": "a"})), None);
    }
}
