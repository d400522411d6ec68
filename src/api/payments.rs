//! Payments: Bill Pay lookup, bank/mobile-money checkout, contributions, disbursements,
//! per-event payout and transactions, subscriptions and the organizer wallet.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::api::client::ApiClient;
use crate::api::events::encode_segment;
use crate::api::pagination::QueryParams;
use crate::error::ClientResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionCheckoutBankPayload {
    pub plan_id: i64,
    pub billing_cycle: String,
    pub provider: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionCheckoutMnoPayload {
    pub plan_id: i64,
    pub billing_cycle: String,
    pub provider: String,
    pub account_number: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Transaction status filter for `my_transactions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Success,
    Pending,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Failed => "FAILED",
        }
    }
}

pub struct PaymentsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn payments(&self) -> PaymentsApi<'_> {
        PaymentsApi { client: self }
    }
}

fn body_or_empty(body: Option<&Value>) -> Value {
    body.cloned().unwrap_or_else(|| json!({}))
}

impl PaymentsApi<'_> {
    fn path(&self, suffix: &str) -> String {
        ApiClient::path(&self.client.config().prefixes.payments, suffix)
    }

    fn event_path(&self, event_id: i64, suffix: &str) -> String {
        self.path(&format!("events/{}/{}", event_id, suffix))
    }

    // --- Bill Pay lookup (public) ---

    /// Event info for a Bill Pay identifier, used to confirm before paying via USSD.
    pub async fn billpay_lookup(&self, bill_identifier: &str) -> ClientResult<Value> {
        let path = self.path(&format!("billpay/lookup/{}/", encode_segment(bill_identifier)));
        self.client.get(&path, None).await
    }

    /// Provider webhook. Normally server-to-server; exposed for sandbox testing.
    pub async fn callback(&self, payload: &Value) -> ClientResult<Value> {
        self.client.post(&self.path("callback/"), payload).await
    }

    // --- Checkout ---

    /// Bank checkout (CRDB, NMB); the payer confirms with an OTP.
    pub async fn checkout_bank(&self, body: Option<&Value>) -> ClientResult<Value> {
        self.client
            .post(&self.path("checkout/bank/"), &body_or_empty(body))
            .await
    }

    pub async fn checkout_mno_fee(&self, amount: f64, provider: &str) -> ClientResult<Value> {
        let query = QueryParams::new().set("amount", amount).set("provider", provider);
        self.client.get(&self.path("checkout/mno/fee/"), Some(query)).await
    }

    /// Mobile-money checkout: `event_id`, `amount`, `phone_number`, `provider`, optional `payer_name`.
    pub async fn checkout_mno(&self, body: Option<&Value>) -> ClientResult<Value> {
        self.client
            .post(&self.path("checkout/mno/"), &body_or_empty(body))
            .await
    }

    // --- Contributions ---

    /// Organizer-entered contribution (cash, bank transfer, items).
    pub async fn manual_contribution(&self, body: Option<&Value>) -> ClientResult<Value> {
        self.client
            .post(&self.path("contributions/manual/"), &body_or_empty(body))
            .await
    }

    // --- Disbursements ---

    pub async fn disbursements(&self) -> ClientResult<Value> {
        self.client.get_with_auth(&self.path("disbursements/"), None).await
    }

    pub async fn disbursement(&self, reference: &str) -> ClientResult<Value> {
        let path = self.path(&format!("disbursements/{}/", encode_segment(reference)));
        self.client.get_with_auth(&path, None).await
    }

    // --- Per event ---

    pub async fn event_billpay(&self, event_id: i64) -> ClientResult<Value> {
        self.client.get_with_auth(&self.event_path(event_id, "billpay/"), None).await
    }

    /// Toggle the event's Bill Pay account active/inactive.
    pub async fn patch_event_billpay(&self, event_id: i64, body: Option<&Value>) -> ClientResult<Value> {
        self.client
            .patch(&self.event_path(event_id, "billpay/"), &body_or_empty(body))
            .await
    }

    pub async fn event_contributions(&self, event_id: i64) -> ClientResult<Value> {
        self.client
            .get_with_auth(&self.event_path(event_id, "contributions/"), None)
            .await
    }

    /// Start a payout to the organizer.
    pub async fn disburse_event(&self, event_id: i64, body: Option<&Value>) -> ClientResult<Value> {
        self.client
            .post(&self.event_path(event_id, "disburse/"), &body_or_empty(body))
            .await
    }

    pub async fn event_disbursements(&self, event_id: i64) -> ClientResult<Value> {
        self.client
            .get_with_auth(&self.event_path(event_id, "disbursements/"), None)
            .await
    }

    /// Gross amount, fees, net payout and fee breakdown.
    pub async fn event_payout(&self, event_id: i64) -> ClientResult<Value> {
        self.client.get_with_auth(&self.event_path(event_id, "payout/"), None).await
    }

    pub async fn event_transactions(&self, event_id: i64) -> ClientResult<Value> {
        self.client
            .get_with_auth(&self.event_path(event_id, "transactions/"), None)
            .await
    }

    /// Sandbox only: mark a transaction completed when no callback arrives.
    pub async fn manual_update(&self, reference: &str, body: Option<&Value>) -> ClientResult<Value> {
        let path = self.path(&format!("manual-update/{}/", encode_segment(reference)));
        self.client.post(&path, &body_or_empty(body)).await
    }

    pub async fn providers(&self) -> ClientResult<Value> {
        self.client.get(&self.path("providers/"), None).await
    }

    // --- Subscriptions ---

    pub async fn subscription_billpay_lookup(&self, body: Option<&Value>) -> ClientResult<Value> {
        self.client
            .post(&self.path("subscriptions/billpay/lookup/"), &body_or_empty(body))
            .await
    }

    pub async fn subscription_billpay_payment(&self, body: Option<&Value>) -> ClientResult<Value> {
        self.client
            .post(&self.path("subscriptions/billpay/payment/"), &body_or_empty(body))
            .await
    }

    pub async fn subscription_checkout_bank(&self, payload: &SubscriptionCheckoutBankPayload) -> ClientResult<Value> {
        self.client
            .post(&self.path("subscriptions/checkout/bank/"), payload)
            .await
    }

    pub async fn subscription_checkout_mno(&self, payload: &SubscriptionCheckoutMnoPayload) -> ClientResult<Value> {
        self.client
            .post(&self.path("subscriptions/checkout/mno/"), payload)
            .await
    }

    pub async fn my_subscription(&self) -> ClientResult<Value> {
        self.client.get_with_auth(&self.path("subscriptions/my/"), None).await
    }

    pub async fn subscription_plans(&self) -> ClientResult<Value> {
        self.client.get(&self.path("subscriptions/plans/"), None).await
    }

    // --- Transactions and wallet ---

    pub async fn my_transactions(&self, status: Option<TransactionStatus>) -> ClientResult<Value> {
        let query = QueryParams::new()
            .set_opt("status", status.map(|s| s.as_str()))
            .into_option();
        self.client.get_with_auth(&self.path("transactions/"), query).await
    }

    pub async fn transaction(&self, reference: &str) -> ClientResult<Value> {
        let path = self.path(&format!("transactions/{}/", encode_segment(reference)));
        self.client.get_with_auth(&path, None).await
    }

    /// Organizer balance across events and withdrawable funds.
    pub async fn wallet(&self) -> ClientResult<Value> {
        self.client.get_with_auth(&self.path("wallet/"), None).await
    }
}
