use chrono::Utc;
use rand::Rng;
use tracing::info;

use crate::error::ServiceError;
use crate::models::event::{EventMutation, RoomEvent};

/// What a successful mutation did, carrying the single affected record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Created(RoomEvent),
    Updated(RoomEvent),
    Deleted(String),
}

impl MutationOutcome {
    /// Human-readable summary for response messages and logs.
    pub fn describe(&self) -> String {
        match self {
            MutationOutcome::Created(event) => format!("created event {}", event.id),
            MutationOutcome::Updated(event) => format!("updated event {}", event.id),
            MutationOutcome::Deleted(id) => format!("deleted event {}", id),
        }
    }
}

/// Generate a collision-resistant event id: millisecond timestamp plus a
/// random hex suffix. Uniqueness is the only hard requirement on the scheme.
pub fn generate_event_id() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..0x0100_0000);
    format!("evt-{}-{:06x}", Utc::now().timestamp_millis(), suffix)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn missing(field: &str, action: &str) -> ServiceError {
    ServiceError::InvalidInput(format!("{} is required for {}", field, action))
}

/// Apply a create/update/delete mutation to the event collection.
///
/// Returns the new collection together with the affected record. The input
/// collection is never modified, and errors leave it untouched:
/// - create requires date/room/startTime/endTime/eventName non-empty and
///   stamps the event with a fresh id and the caller's identity;
/// - update patches only the supplied non-empty fields; an unknown id is an
///   explicit NotFound, not a silent no-op;
/// - delete reports NotFound distinctly from success;
/// - any other action is rejected as invalid input.
pub fn apply_mutation(
    current: &[RoomEvent],
    mutation: &EventMutation,
    created_by: &str,
) -> Result<(Vec<RoomEvent>, MutationOutcome), ServiceError> {
    match mutation.action.as_str() {
        "create" => {
            let date = non_empty(&mutation.date).ok_or_else(|| missing("date", "create"))?;
            let room = non_empty(&mutation.room).ok_or_else(|| missing("room", "create"))?;
            let start_time =
                non_empty(&mutation.start_time).ok_or_else(|| missing("startTime", "create"))?;
            let end_time =
                non_empty(&mutation.end_time).ok_or_else(|| missing("endTime", "create"))?;
            let event_name =
                non_empty(&mutation.event_name).ok_or_else(|| missing("eventName", "create"))?;

            let event = RoomEvent {
                id: generate_event_id(),
                date: date.to_string(),
                room: room.to_string(),
                start_time: start_time.to_string(),
                end_time: end_time.to_string(),
                event_name: event_name.to_string(),
                created_by: created_by.to_string(),
            };

            info!(
                "Created event {} ('{}') in {} on {} by {}",
                event.id, event.event_name, event.room, event.date, created_by
            );

            let mut next = current.to_vec();
            next.push(event.clone());
            Ok((next, MutationOutcome::Created(event)))
        }
        "update" => {
            let id = non_empty(&mutation.id).ok_or_else(|| missing("id", "update"))?;

            let mut next = current.to_vec();
            let event = next
                .iter_mut()
                .find(|event| event.id == id)
                .ok_or_else(|| ServiceError::NotFound(format!("no event with id {}", id)))?;

            // Only supplied non-empty fields replace the stored values;
            // id and createdBy are immutable.
            if let Some(date) = non_empty(&mutation.date) {
                event.date = date.to_string();
            }
            if let Some(room) = non_empty(&mutation.room) {
                event.room = room.to_string();
            }
            if let Some(start_time) = non_empty(&mutation.start_time) {
                event.start_time = start_time.to_string();
            }
            if let Some(end_time) = non_empty(&mutation.end_time) {
                event.end_time = end_time.to_string();
            }
            if let Some(event_name) = non_empty(&mutation.event_name) {
                event.event_name = event_name.to_string();
            }

            let updated = event.clone();
            info!("Updated event {}", updated.id);
            Ok((next, MutationOutcome::Updated(updated)))
        }
        "delete" => {
            let id = non_empty(&mutation.id).ok_or_else(|| missing("id", "delete"))?;

            if !current.iter().any(|event| event.id == id) {
                return Err(ServiceError::NotFound(format!("no event with id {}", id)));
            }

            let next: Vec<RoomEvent> = current
                .iter()
                .filter(|event| event.id != id)
                .cloned()
                .collect();

            info!("Deleted event {}", id);
            Ok((next, MutationOutcome::Deleted(id.to_string())))
        }
        other => Err(ServiceError::InvalidInput(format!(
            "unknown action: {}",
            other
        ))),
    }
}
