pub mod broadcast;
pub mod database;
pub mod events;
pub mod schedule;
pub mod time_slots;

mod events_test;
mod time_slots_test;
