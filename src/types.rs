//! Resource models shared by the API wrappers and the browsing state
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Explicit `null` reads as the field's default, same as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Event as returned by the events and public-events endpoints.
///
/// The backend adds fields over time; anything not modelled here lands in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicEvent {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub description: Option<String>,
    /// Either a type id or an embedded event-type object, depending on the endpoint
    pub event_type: Option<Value>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub venue_name: Option<String>,
    pub status: Option<String>,
    pub visibility: Option<String>,
    pub contribution_target: Option<String>,
    pub currency: Option<String>,
    pub cover_image: Option<String>,
    pub join_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventType {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Participant {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub event: i64,
    pub user: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_contributions: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invitation {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub event: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub participant: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub participant_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub participant_phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub template: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sent_via: String,
    pub sent_at: Option<String>,
    pub viewed_at: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub pdf_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub share_link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub short_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvitationTemplate {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category_display: String,
    #[serde(deserialize_with = "null_as_default")]
    pub template_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub canvas_style: String,
    #[serde(deserialize_with = "null_as_default")]
    pub design_config: String,
    #[serde(deserialize_with = "null_as_default")]
    pub primary_color: String,
    #[serde(deserialize_with = "null_as_default")]
    pub secondary_color: String,
    #[serde(deserialize_with = "null_as_default")]
    pub accent_color: String,
    #[serde(deserialize_with = "null_as_default")]
    pub font_family: String,
    #[serde(deserialize_with = "null_as_default")]
    pub preview_image: String,
    #[serde(deserialize_with = "null_as_default")]
    pub preview_image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_active: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_premium: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Announcement {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub event: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub author: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub author_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_pinned: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub send_notification: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InboxMessage {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    pub sender: Option<i64>,
    pub sender_id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub sender_name: String,
    pub recipient: Option<i64>,
    pub recipient_id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub recipient_name: String,
    pub event: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub event_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message_type_display: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub card_image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub card_pdf_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub media_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_read: bool,
    pub read_at: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatMessage {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub event: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub sender: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub sender_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sender_phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_deleted: bool,
    /// Serialized as a string by the backend
    pub is_read: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatRoom {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub event_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub event_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_active: bool,
    pub participant_count: Value,
    pub message_count: Value,
}
