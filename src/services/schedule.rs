use tracing::debug;

use crate::error::ServiceError;
use crate::models::schedule::{SlotProposal, WeeklySlot};
use crate::services::time_slots::{intervals_overlap, to_minutes};

/// Reject proposals missing any of the coordinates the resolver keys on.
///
/// The class name is allowed to be empty - that turns the proposal into a
/// deletion of the target interval.
pub fn validate_proposal(proposal: &SlotProposal) -> Result<(), ServiceError> {
    let required = [
        (&proposal.day, "day"),
        (&proposal.room, "room"),
        (&proposal.start_time, "startTime"),
        (&proposal.end_time, "endTime"),
    ];

    for (value, field) in required {
        if value.trim().is_empty() {
            return Err(ServiceError::InvalidInput(format!("{} is required", field)));
        }
    }

    Ok(())
}

/// Compute the schedule that results from placing `proposal` on the grid.
///
/// Every existing slot in the proposal's room and day whose interval
/// overlaps the proposal's [start, end) is removed, then the proposal is
/// appended if its trimmed class name is non-empty. A single call therefore
/// covers delete ("clear this interval") and place/replace ("clear it and
/// fill it"), and repeating the same call is a no-op the second time.
///
/// The resolver never fails; input validation happens upstream via
/// `validate_proposal`.
pub fn resolve_slot(current: &[WeeklySlot], proposal: &SlotProposal) -> Vec<WeeklySlot> {
    let s_min = to_minutes(&proposal.start_time);
    let e_min = to_minutes(&proposal.end_time);

    let mut next: Vec<WeeklySlot> = current
        .iter()
        .filter(|slot| {
            slot.day != proposal.day
                || slot.room != proposal.room
                || !intervals_overlap(
                    to_minutes(&slot.start_time),
                    to_minutes(&slot.end_time),
                    s_min,
                    e_min,
                )
        })
        .cloned()
        .collect();

    let removed = current.len() - next.len();

    let class_name = proposal.class_name.trim();
    if !class_name.is_empty() {
        next.push(WeeklySlot {
            day: proposal.day.clone(),
            room: proposal.room.clone(),
            start_time: proposal.start_time.clone(),
            end_time: proposal.end_time.clone(),
            class_name: class_name.to_string(),
        });
        debug!(
            "Placed '{}' in {} on {} {}-{}, displacing {} slot(s)",
            class_name, proposal.room, proposal.day, proposal.start_time, proposal.end_time, removed
        );
    } else {
        debug!(
            "Cleared {} on {} {}-{}, removing {} slot(s)",
            proposal.room, proposal.day, proposal.start_time, proposal.end_time, removed
        );
    }

    next
}
