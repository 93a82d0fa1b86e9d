//! Timetable Service
//!
//! This library provides a small web service for managing a weekly class
//! timetable and date-specific room events. Administrators place weekly
//! slots and mutate events over HTTP; viewers subscribe over WebSocket and
//! receive the full aggregate after every change.
//!
//! # Modules
//!
//! - `services`: slot resolution, event mutation, persistence and fan-out
//! - `handlers`: HTTP and WebSocket endpoints
//! - `auth`: admin token verification
//!
//! # Authentication
//!
//! Admin requests carry a bearer token of the form `<admin_id>.<signature>`
//! where the signature is an HMAC-SHA256 of the admin id under a shared
//! secret. Verifying the token yields the identity recorded as `createdBy`
//! on event creation.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;


// Re-export the main API types for ease of use
pub use auth::AdminAuth;
pub use error::ServiceError;
pub use handlers::api::AppState;
pub use routes::create_router;
