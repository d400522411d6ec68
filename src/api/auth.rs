//! Authentication endpoints: password login, JWT pair management, profile, OTP and social sign-in.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::api::client::{ApiClient, MultipartForm};
use crate::api::token::{extract_access_token, extract_refresh_token};
use crate::error::ClientResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPayload {
    pub phone: String,
    pub password: String,
}

/// Login / social sign-in response. Shape varies by backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthTokenResponse {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthTokenResponse {
    /// Access and refresh tokens, whichever field names the backend used.
    pub fn tokens(&self) -> (Option<String>, Option<String>) {
        let raw = serde_json::to_value(self).unwrap_or(Value::Null);
        (extract_access_token(&raw), extract_refresh_token(&raw))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenRefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLinkPhonePayload {
    pub phone: String,
    pub code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<VerifyOtpData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyOtpData {
    pub access: Option<String>,
    pub access_token: Option<String>,
    pub refresh: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<Value>,
    pub requires_phone_link: Option<bool>,
}

impl VerifyOtpResponse {
    /// Normalised (access, refresh) pair: `access` wins over `access_token`, `refresh` over `refresh_token`.
    pub fn tokens(&self) -> (Option<String>, Option<String>) {
        let Some(data) = &self.data else {
            return (None, None);
        };
        let pick = |a: &Option<String>, b: &Option<String>| {
            a.iter()
                .chain(b.iter())
                .map(|s| s.trim())
                .find(|s| !s.is_empty())
                .map(str::to_string)
        };
        (pick(&data.access, &data.access_token), pick(&data.refresh, &data.refresh_token))
    }

    pub fn requires_phone_link(&self) -> bool {
        self.data
            .as_ref()
            .and_then(|d| d.requires_phone_link)
            .unwrap_or(false)
    }
}

/// Google credential: the backend accepts either an ID token or an OAuth access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoogleCredential {
    IdToken(String),
    AccessToken(String),
}

impl GoogleCredential {
    fn to_body(&self) -> Value {
        match self {
            GoogleCredential::IdToken(t) => json!({ "id_token": t }),
            GoogleCredential::AccessToken(t) => json!({ "access_token": t }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppleSignIn {
    pub id_token: String,
    /// Only sent by Apple on the first sign-in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
}

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }
}

impl AuthApi<'_> {
    fn path(&self, suffix: &str) -> String {
        ApiClient::path(&self.client.config().prefixes.auth, suffix)
    }

    // --- Login / token ---

    /// POST auth/login/ - phone + password, returns a JWT pair.
    pub async fn login(&self, payload: &LoginPayload) -> ClientResult<AuthTokenResponse> {
        self.client.post(&self.path("login/"), payload).await
    }

    /// POST auth/token/ - same as login.
    pub async fn obtain_token(&self, payload: &LoginPayload) -> ClientResult<AuthTokenResponse> {
        self.client.post(&self.path("token/"), payload).await
    }

    /// POST auth/token/refresh/ through the regular client. The 401 handling uses its own
    /// side channel; this is for explicit refreshes.
    pub async fn refresh_token(&self, refresh: &str) -> ClientResult<TokenRefreshResponse> {
        self.client
            .post(&self.path("token/refresh/"), &json!({ "refresh": refresh }))
            .await
    }

    pub async fn verify_token(&self, token: &str) -> ClientResult<Value> {
        self.client
            .post(&self.path("token/verify/"), &json!({ "token": token }))
            .await
    }

    /// Requires the backend's token blacklist app.
    pub async fn blacklist_token(&self, refresh: &str) -> ClientResult<Value> {
        self.client
            .post(&self.path("token/blacklist/"), &json!({ "refresh": refresh }))
            .await
    }

    /// POST auth/logout/ - blacklists the refresh token server-side.
    pub async fn logout(&self, refresh: &str) -> ClientResult<()> {
        self.client
            .post::<Value, _>(&self.path("logout/"), &json!({ "refresh": refresh }))
            .await
            .map(drop)
    }

    // --- Current user ---

    pub async fn me(&self) -> ClientResult<Value> {
        self.client.get(&self.path("me/"), None).await
    }

    pub async fn patch_me(&self, payload: &Value) -> ClientResult<Value> {
        self.client.patch(&self.path("me/"), payload).await
    }

    /// Profile update with file parts (profile picture).
    pub async fn patch_me_multipart(&self, form: &MultipartForm) -> ClientResult<Value> {
        self.client.patch_multipart(&self.path("me/"), form).await
    }

    /// DELETE auth/me/ - deletes the account (204).
    pub async fn delete_me(&self) -> ClientResult<()> {
        self.client.delete(&self.path("me/")).await
    }

    // --- OTP ---

    pub async fn request_otp(&self, phone: &str) -> ClientResult<()> {
        self.client
            .post::<Value, _>(&self.path("request-otp/"), &json!({ "phone": phone.trim() }))
            .await
            .map(drop)
    }

    pub async fn verify_otp(&self, phone: &str, code: &str) -> ClientResult<VerifyOtpResponse> {
        let body = json!({ "phone": phone.trim(), "code": code.trim() });
        self.client.post(&self.path("verify-otp/"), &body).await
    }

    // --- Social auth ---

    pub async fn sign_in_with_google(&self, credential: &GoogleCredential) -> ClientResult<AuthTokenResponse> {
        self.client
            .post(&self.path("social/google/"), &credential.to_body())
            .await
    }

    pub async fn sign_in_with_facebook(&self, access_token: &str) -> ClientResult<AuthTokenResponse> {
        self.client
            .post(&self.path("social/facebook/"), &json!({ "access_token": access_token }))
            .await
    }

    pub async fn sign_in_with_apple(&self, params: &AppleSignIn) -> ClientResult<AuthTokenResponse> {
        self.client.post(&self.path("social/apple/"), params).await
    }

    /// Link a phone to a social account after OTP verification.
    pub async fn link_phone(&self, payload: &SocialLinkPhonePayload) -> ClientResult<Value> {
        self.client.post(&self.path("social/link-phone/"), payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_otp_tokens_normalized() {
        let resp: VerifyOtpResponse = serde_json::from_value(json!({
            "success": true,
            "data": {"access_token": "a1", "refresh_token": "r1", "requires_phone_link": false}
        }))
        .unwrap();
        assert_eq!(resp.tokens(), (Some("a1".to_string()), Some("r1".to_string())));

        let resp: VerifyOtpResponse = serde_json::from_value(json!({
            "data": {"access": "a2", "access_token": "ignored", "requires_phone_link": true}
        }))
        .unwrap();
        assert_eq!(resp.tokens(), (Some("a2".to_string()), None));
        assert!(resp.requires_phone_link());

        let resp: VerifyOtpResponse = serde_json::from_value(json!({"success": false})).unwrap();
        assert_eq!(resp.tokens(), (None, None));
    }

    #[test]
    fn test_auth_token_response_tokens() {
        let resp: AuthTokenResponse = serde_json::from_value(json!({"access": "a", "refresh": "r"})).unwrap();
        assert_eq!(resp.tokens(), (Some("a".to_string()), Some("r".to_string())));

        // Some backends return a DRF-style `key` instead
        let resp: AuthTokenResponse = serde_json::from_value(json!({"key": "k"})).unwrap();
        assert_eq!(resp.tokens(), (Some("k".to_string()), None));
    }

    #[test]
    fn test_google_credential_body() {
        assert_eq!(GoogleCredential::IdToken("x".into()).to_body(), json!({"id_token": "x"}));
        assert_eq!(GoogleCredential::AccessToken("y".into()).to_body(), json!({"access_token": "y"}));
    }
}
