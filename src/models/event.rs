use serde::{Deserialize, Serialize};

/// A one-off, date-specific room booking, distinct from the weekly slots.
///
/// `id` is opaque and unique for the collection's lifetime; `id` and
/// `created_by` never change after creation. Unlike weekly slots, events in
/// the same room may overlap in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomEvent {
    pub id: String,
    pub date: String,
    pub room: String,
    pub start_time: String,
    pub end_time: String,
    pub event_name: String,
    pub created_by: String,
}

/// Wire envelope for event mutations: `{action: "create"|"update"|"delete", ...}`.
///
/// Which fields are required depends on the action; the event mutator
/// validates and rejects bad envelopes before touching state. On update an
/// omitted or empty field keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMutation {
    pub action: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub event_name: Option<String>,
}

// Response structure for the event mutation endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<RoomEvent>,
}
