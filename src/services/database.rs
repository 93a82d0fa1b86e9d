use csv::{ReaderBuilder, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{error, info};

use crate::error::ServiceError;
use crate::models::event::{EventMutation, RoomEvent};
use crate::models::schedule::{SlotProposal, WeeklySlot};
use crate::services::broadcast::{BroadcastGateway, Topic};
use crate::services::events::{apply_mutation, MutationOutcome};
use crate::services::schedule::resolve_slot;

const SCHEDULE_HEADERS: [&str; 5] = ["day", "room", "startTime", "endTime", "className"];
const EVENT_HEADERS: [&str; 7] = [
    "id",
    "date",
    "room",
    "startTime",
    "endTime",
    "eventName",
    "createdBy",
];

/// Flat-file store for the two aggregates, one CSV file per aggregate.
///
/// Each aggregate has its own mutex, and every mutating method runs its
/// whole read-modify-write cycle under that lock, so concurrent mutations
/// against the same aggregate are applied one at a time. That serialization
/// is what upholds the "at most one slot per (day, room, instant)" and
/// "unique event id" invariants, and because mutating methods also publish
/// the resulting snapshot under the same lock, fan-out order always matches
/// write order.
pub struct TimetableStore {
    schedule_path: String,
    events_path: String,
    schedule_mutex: Mutex<()>,
    events_mutex: Mutex<()>,
}

impl TimetableStore {
    pub fn new(schedule_path: &str, events_path: &str) -> Self {
        ensure_file(schedule_path, &SCHEDULE_HEADERS);
        ensure_file(events_path, &EVENT_HEADERS);

        Self {
            schedule_path: schedule_path.to_string(),
            events_path: events_path.to_string(),
            schedule_mutex: Mutex::new(()),
            events_mutex: Mutex::new(()),
        }
    }

    /// Read the full weekly schedule.
    pub fn load_schedule(&self) -> Result<Vec<WeeklySlot>, ServiceError> {
        let _lock = lock(&self.schedule_mutex)?;
        read_all(&self.schedule_path)
    }

    /// Run the slot resolver against the persisted schedule, save the
    /// result and fan it out, returning the new schedule.
    ///
    /// Read, resolve, rewrite and publish all happen under the schedule
    /// lock, so viewers receive snapshots in write order. On a save failure
    /// the error propagates, nothing is published and the computed schedule
    /// is discarded - callers never see a state that was not durably
    /// written.
    pub fn place_slot(
        &self,
        proposal: &SlotProposal,
        broadcaster: &BroadcastGateway,
    ) -> Result<Vec<WeeklySlot>, ServiceError> {
        let _lock = lock(&self.schedule_mutex)?;

        let current: Vec<WeeklySlot> = read_all(&self.schedule_path)?;
        let next = resolve_slot(&current, proposal);
        write_all(&self.schedule_path, &SCHEDULE_HEADERS, &next)?;
        broadcaster.publish(Topic::Schedule, &next);

        info!(
            "Schedule now holds {} slot(s) after proposal for {} {} {}-{}",
            next.len(),
            proposal.day,
            proposal.room,
            proposal.start_time,
            proposal.end_time
        );

        Ok(next)
    }

    /// Read the full event collection.
    pub fn load_events(&self) -> Result<Vec<RoomEvent>, ServiceError> {
        let _lock = lock(&self.events_mutex)?;
        read_all(&self.events_path)
    }

    /// Apply an event mutation under the events lock, persist the result
    /// and fan it out, returning the new collection and the affected record.
    ///
    /// As with `place_slot`, the publish happens before the lock drops, so
    /// snapshots reach viewers in write order and nothing is published for
    /// a mutation that failed.
    pub fn apply_event_mutation(
        &self,
        mutation: &EventMutation,
        created_by: &str,
        broadcaster: &BroadcastGateway,
    ) -> Result<(Vec<RoomEvent>, MutationOutcome), ServiceError> {
        let _lock = lock(&self.events_mutex)?;

        let current: Vec<RoomEvent> = read_all(&self.events_path)?;
        let (next, outcome) = apply_mutation(&current, mutation, created_by)?;
        write_all(&self.events_path, &EVENT_HEADERS, &next)?;
        broadcaster.publish(Topic::Events, &next);

        info!(
            "Event collection now holds {} event(s) after {}",
            next.len(),
            outcome.describe()
        );

        Ok((next, outcome))
    }
}

fn lock(mutex: &Mutex<()>) -> Result<std::sync::MutexGuard<'_, ()>, ServiceError> {
    mutex
        .lock()
        .map_err(|e| ServiceError::Persistence(format!("Failed to acquire mutex: {}", e)))
}

// Create the CSV file with its header row if it doesn't exist yet.
fn ensure_file(path: &str, headers: &[&str]) {
    if !Path::new(path).exists() {
        info!("Creating new timetable data file at {}", path);

        let file = File::create(path).unwrap_or_else(|e| {
            error!("Failed to create data file {}: {}", path, e);
            panic!("Failed to create data file {}: {}", path, e)
        });

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        if let Err(e) = writer.write_record(headers) {
            error!("Failed to write headers to {}: {}", path, e);
            panic!("Failed to write headers to {}: {}", path, e);
        }

        if let Err(e) = writer.flush() {
            error!("Failed to flush headers to {}: {}", path, e);
            panic!("Failed to flush headers to {}: {}", path, e);
        }
    }
}

fn read_all<T: DeserializeOwned>(path: &str) -> Result<Vec<T>, ServiceError> {
    let file = File::open(path)
        .map_err(|e| ServiceError::Persistence(format!("Failed to open {}: {}", path, e)))?;

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: T = result.map_err(|e| {
            ServiceError::Persistence(format!("Failed to read record from {}: {}", path, e))
        })?;
        records.push(record);
    }

    Ok(records)
}

// Overwrite the file with a header row followed by the full collection.
fn write_all<T: Serialize>(path: &str, headers: &[&str], records: &[T]) -> Result<(), ServiceError> {
    let file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(path)
        .map_err(|e| {
            ServiceError::Persistence(format!("Failed to open {} for writing: {}", path, e))
        })?;

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    writer
        .write_record(headers)
        .map_err(|e| ServiceError::Persistence(format!("Failed to write headers: {}", e)))?;

    for record in records {
        writer
            .serialize(record)
            .map_err(|e| ServiceError::Persistence(format!("Failed to write record: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| ServiceError::Persistence(format!("Failed to flush writer: {}", e)))
}

/// Create the store at the configured data directory.
pub fn create_timetable_store() -> Arc<TimetableStore> {
    // Default path with environment variable override
    let data_dir =
        std::env::var("TIMETABLE_DATA_DIR").unwrap_or_else(|_| "/app/data".to_string());

    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        error!("Failed to create data directory {}: {}", data_dir, e);
        panic!("Failed to create data directory {}: {}", data_dir, e);
    }

    let schedule_path = format!("{}/schedule.csv", data_dir);
    let events_path = format!("{}/events.csv", data_dir);

    Arc::new(TimetableStore::new(&schedule_path, &events_path))
}
