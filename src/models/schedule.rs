use serde::{Deserialize, Serialize};

/// A recurring weekly class occupying a room for one interval on a given day.
///
/// `day` is a site-defined label ("Mon".."Sun" by convention, not enforced).
/// Times are wall-clock "HH:MM" strings; interval comparisons go through
/// `services::time_slots`. Within the full schedule no two slots sharing the
/// same (day, room) overlap - the slot resolver maintains that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySlot {
    pub day: String,
    pub room: String,
    pub start_time: String,
    pub end_time: String,
    pub class_name: String,
}

// Admin request to place, replace or clear a weekly slot. An empty or
// whitespace-only class name clears the target interval instead of filling it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotProposal {
    pub day: String,
    pub room: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub class_name: String,
}
