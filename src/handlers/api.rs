use axum::{
    extract::{
        ws::{Message, WebSocket},
        Json as ExtractJson, Query, State, WebSocketUpgrade,
    },
    http::{header, HeaderMap},
    response::{Json, Response},
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::auth::AdminAuth;
use crate::error::ServiceError;
use crate::models::common::EventQuery;
use crate::models::event::{EventMutation, MutationResponse, RoomEvent};
use crate::models::schedule::{SlotProposal, WeeklySlot};
use crate::services::broadcast::{BroadcastGateway, Topic};
use crate::services::database::TimetableStore;
use crate::services::events::MutationOutcome;
use crate::services::schedule::validate_proposal;

// AppState struct containing shared resources
pub struct AppState {
    pub database: Arc<TimetableStore>,
    pub broadcaster: Arc<BroadcastGateway>,
    pub auth: AdminAuth,
}

// Resolve the bearer token to an administrator identity, or reject.
fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<String, ServiceError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ServiceError::Unauthorized("missing bearer token".to_string()))?;

    state
        .auth
        .verify(token)
        .ok_or_else(|| ServiceError::Unauthorized("invalid admin token".to_string()))
}

// Full weekly schedule endpoint
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<WeeklySlot>>, ServiceError> {
    let schedule = state.database.load_schedule()?;
    debug!("Returning schedule with {} slot(s)", schedule.len());
    Ok(Json(schedule))
}

// Slot placement endpoint: resolves the proposal against the current
// schedule, persists the result and fans it out to viewers.
pub async fn place_slot(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ExtractJson(proposal): ExtractJson<SlotProposal>,
) -> Result<Json<Vec<WeeklySlot>>, ServiceError> {
    let admin_id = require_admin(&state, &headers)?;
    validate_proposal(&proposal)?;

    info!(
        "Admin {} proposing slot {} {} {}-{} ('{}')",
        admin_id,
        proposal.day,
        proposal.room,
        proposal.start_time,
        proposal.end_time,
        proposal.class_name.trim()
    );

    // The store publishes the new snapshot itself, under the schedule lock,
    // so viewers see mutations in write order
    let schedule = state.database.place_slot(&proposal, &state.broadcaster)?;

    Ok(Json(schedule))
}

// Event listing endpoint with optional date/room filters
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventQuery>,
) -> Result<Json<Vec<RoomEvent>>, ServiceError> {
    let mut events = state.database.load_events()?;

    if let Some(date) = &params.date {
        events.retain(|event| &event.date == date);
    }
    if let Some(room) = &params.room {
        events.retain(|event| &event.room == room);
    }

    debug!("Returning {} event(s)", events.len());
    Ok(Json(events))
}

// Event mutation endpoint: applies the {action, ...} envelope, persists the
// new collection and fans it out to viewers.
pub async fn mutate_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ExtractJson(mutation): ExtractJson<EventMutation>,
) -> Result<Json<MutationResponse>, ServiceError> {
    let admin_id = require_admin(&state, &headers)?;

    info!(
        "Admin {} requested event mutation '{}'",
        admin_id, mutation.action
    );

    // Persist and fan out under the events lock; failed mutations publish
    // nothing
    let (events, outcome) =
        state
            .database
            .apply_event_mutation(&mutation, &admin_id, &state.broadcaster)?;

    let message = outcome.describe();
    let event = match outcome {
        MutationOutcome::Created(event) | MutationOutcome::Updated(event) => Some(event),
        MutationOutcome::Deleted(_) => None,
    };

    Ok(Json(MutationResponse {
        success: true,
        message,
        event,
    }))
}

// WebSocket subscription endpoints, one per aggregate
pub async fn watch_schedule(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| stream_topic(state, socket, Topic::Schedule))
}

pub async fn watch_events(State(state): State<Arc<AppState>>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| stream_topic(state, socket, Topic::Events))
}

// Push the current snapshot on subscribe, then every published snapshot
// until the viewer goes away. Viewers are read-only; anything they send
// other than a close frame is ignored.
async fn stream_topic(state: Arc<AppState>, socket: WebSocket, topic: Topic) {
    let (initial, mut rx) = state.broadcaster.attach(topic);
    let (mut sink, mut stream) = socket.split();

    info!(
        "Viewer subscribed to {:?} ({} now attached)",
        topic,
        state.broadcaster.viewer_count(topic)
    );

    if sink.send(Message::Text(initial)).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            update = rx.recv() => {
                match update {
                    Ok(payload) => {
                        if sink.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // Snapshots are complete, so skipping ahead is safe
                        warn!("Viewer on {:?} lagged, skipped {} snapshot(s)", topic, skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    info!("Viewer left {:?}", topic);
}
