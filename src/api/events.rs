//! Events: list/CRUD, nested resources (report, participants, contributions, messages,
//! announcements, admins), join/contribute codes and the public event listing.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::api::client::ApiClient;
use crate::api::pagination::{page_query, Page, QueryParams};
use crate::error::ClientResult;
use crate::types::PublicEvent;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventsListParams {
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub search: Option<String>,
}

impl EventsListParams {
    fn to_query(&self) -> Option<QueryParams> {
        QueryParams::new()
            .set_opt("ordering", self.ordering.as_deref())
            .set_opt("page", self.page)
            .set_non_empty("search", self.search.as_deref())
            .into_option()
    }
}

/// Filters for the public event listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicEventsParams {
    pub page: Option<u32>,
    pub event_type: Option<i64>,
    pub search: Option<String>,
}

impl PublicEventsParams {
    pub(crate) fn to_query(&self) -> Option<QueryParams> {
        QueryParams::new()
            .set_opt("page", self.page)
            .set_opt("event_type", self.event_type)
            .set_non_empty("search", self.search.as_deref())
            .into_option()
    }
}

/// Create/update body. Unset fields are omitted, so the same type serves PUT and PATCH.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contribution_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventPayload {
    /// Creation body; title is the only field the backend requires.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendInvitationPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_to_self: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinByCodeRegisterPayload {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

pub struct EventsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn events(&self) -> EventsApi<'_> {
        EventsApi { client: self }
    }
}

/// Percent-encode one path segment (join codes, references, user ids).
pub(crate) fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

impl EventsApi<'_> {
    fn path(&self, suffix: &str) -> String {
        ApiClient::path(&self.client.config().prefixes.events, suffix)
    }

    // --- Main CRUD ---

    /// Public events for anonymous callers, every accessible event when authenticated.
    pub async fn list(&self, params: &EventsListParams) -> ClientResult<Page<PublicEvent>> {
        self.client.get(&self.path(""), params.to_query()).await
    }

    pub async fn create(&self, payload: &EventPayload) -> ClientResult<PublicEvent> {
        self.client.post(&self.path(""), payload).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<PublicEvent> {
        self.client.get(&self.path(&format!("{}/", id)), None).await
    }

    /// Full update (owner/admin only).
    pub async fn update(&self, id: i64, payload: &EventPayload) -> ClientResult<PublicEvent> {
        self.client.put(&self.path(&format!("{}/", id)), payload).await
    }

    pub async fn patch(&self, id: i64, payload: &EventPayload) -> ClientResult<PublicEvent> {
        self.client.patch(&self.path(&format!("{}/", id)), payload).await
    }

    /// Owner only; 204 on success.
    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.client.delete(&self.path(&format!("{}/", id))).await
    }

    /// Send the invitation card to the selected participants (or everyone).
    pub async fn send_invitation(&self, event_id: i64, payload: Option<&SendInvitationPayload>) -> ClientResult<()> {
        let body = match payload {
            Some(p) => serde_json::to_value(p)?,
            None => json!({}),
        };
        self.client
            .post::<Value, _>(&self.path(&format!("{}/send-invitation/", event_id)), &body)
            .await
            .map(drop)
    }

    // --- Nested resources ---

    pub async fn report(&self, id: i64) -> ClientResult<Value> {
        self.nested(id, "report").await
    }

    pub async fn participants(&self, id: i64) -> ClientResult<Value> {
        self.nested(id, "participants").await
    }

    pub async fn contributions(&self, id: i64) -> ClientResult<Value> {
        self.nested(id, "contributions").await
    }

    pub async fn messages(&self, id: i64) -> ClientResult<Value> {
        self.nested(id, "messages").await
    }

    pub async fn announcements(&self, id: i64) -> ClientResult<Value> {
        self.nested(id, "announcements").await
    }

    async fn nested(&self, id: i64, resource: &str) -> ClientResult<Value> {
        self.client
            .get(&self.path(&format!("{}/{}/", id, resource)), None)
            .await
    }

    // --- My events ---

    pub async fn my_events(&self, page: Option<u32>) -> ClientResult<Page<PublicEvent>> {
        self.client
            .get_with_auth(&self.path("my_events/"), page_query(page))
            .await
    }

    // --- Admins ---

    pub async fn admins(&self, id: i64) -> ClientResult<Value> {
        self.nested(id, "admins").await
    }

    pub async fn add_admin(&self, id: i64, body: &Value) -> ClientResult<Value> {
        self.client.post(&self.path(&format!("{}/admins/", id)), body).await
    }

    pub async fn remove_admins(&self, id: i64) -> ClientResult<()> {
        self.client.delete(&self.path(&format!("{}/admins/", id))).await
    }

    // --- Public: contribute & join by code ---

    /// Event details for the public contribution page. Shape differs from `PublicEvent`.
    pub async fn by_contribute_code(&self, join_code: &str) -> ClientResult<Value> {
        let path = self.path(&format!("contribute/{}/", encode_segment(join_code)));
        self.client.get(&path, None).await
    }

    pub async fn by_join_code(&self, join_code: &str) -> ClientResult<Value> {
        let path = self.path(&format!("join/{}/", encode_segment(join_code)));
        self.client.get(&path, None).await
    }

    pub async fn register_by_join_code(
        &self,
        join_code: &str,
        payload: &JoinByCodeRegisterPayload,
    ) -> ClientResult<Value> {
        let path = self.path(&format!("join/{}/register/", encode_segment(join_code)));
        self.client.post(&path, payload).await
    }

    // --- Public listing (no auth) ---

    pub async fn public_events(&self, params: &PublicEventsParams) -> ClientResult<Page<PublicEvent>> {
        self.client
            .get(&self.path("public_events/"), params.to_query())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("ABC123"), "ABC123");
        assert_eq!(encode_segment("a b/c"), "a%20b%2Fc");
        assert_eq!(encode_segment("x+y"), "x%2By");
    }

    #[test]
    fn test_events_list_query() {
        assert_eq!(EventsListParams::default().to_query(), None);

        let q = EventsListParams {
            ordering: Some("-start_date".into()),
            page: Some(2),
            search: Some(String::new()),
        }
        .to_query()
        .unwrap();
        let pairs: Vec<_> = q.iter().collect();
        assert_eq!(pairs, vec![("ordering", "-start_date"), ("page", "2")]);
    }

    #[test]
    fn test_public_events_query() {
        let q = PublicEventsParams {
            page: Some(1),
            event_type: Some(4),
            search: Some("send-off".into()),
        }
        .to_query()
        .unwrap();
        assert_eq!(q.get("event_type"), Some("4"));
        assert_eq!(q.get("search"), Some("send-off"));
    }

    #[test]
    fn test_event_payload_omits_unset_fields() {
        let mut payload = EventPayload::new("Kitchen Party");
        payload.currency = Some("TZS".into());
        payload.extra.insert("theme".into(), json!("gold"));
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"title": "Kitchen Party", "currency": "TZS", "theme": "gold"})
        );
    }
}
