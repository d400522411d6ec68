//! WhatsApp OTP login.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::api::client::ApiClient;
use crate::error::ClientResult;
use crate::types::null_as_default;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WhatsAppRequestOtpResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WhatsAppVerifyOtpResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub is_new_user: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct WhatsAppApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn whatsapp(&self) -> WhatsAppApi<'_> {
        WhatsAppApi { client: self }
    }
}

impl WhatsAppApi<'_> {
    fn path(&self, suffix: &str) -> String {
        ApiClient::path(&self.client.config().prefixes.whatsapp, suffix)
    }

    /// `phone_number` in international format without `+`, e.g. `255765551397`.
    pub async fn request_otp(&self, phone_number: &str) -> ClientResult<WhatsAppRequestOtpResponse> {
        self.client
            .post(&self.path("auth/request-otp/"), &json!({ "phone_number": phone_number }))
            .await
    }

    pub async fn resend_otp(&self, phone_number: &str) -> ClientResult<Value> {
        self.client
            .post(&self.path("auth/resend-otp/"), &json!({ "phone_number": phone_number }))
            .await
    }

    pub async fn verify_otp(&self, phone_number: &str, otp_code: &str) -> ClientResult<WhatsAppVerifyOtpResponse> {
        let body = json!({ "phone_number": phone_number, "otp_code": otp_code });
        self.client.post(&self.path("auth/verify-otp/"), &body).await
    }
}
