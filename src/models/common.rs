use serde::Deserialize;

// Query parameters for listing events
#[derive(Debug, Default, Deserialize)]
pub struct EventQuery {
    pub date: Option<String>,
    pub room: Option<String>,
}
