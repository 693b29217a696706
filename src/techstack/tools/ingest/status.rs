use crate::techstack::tools::model::CompletionStatus;

const COMPLETED_MARKERS: [&str; 3] = ["complete", "done", "finish"];
const IN_PROGRESS_MARKERS: [&str; 3] = ["progress", "ongoing", "partial"];

/// Maps free-text status values onto the three canonical states.
///
/// Completion markers are checked first, so "Partially complete" is
/// `Completed`.
pub fn normalize_status(raw: &str) -> CompletionStatus {
    let lowered = raw.to_lowercase();
    if COMPLETED_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        CompletionStatus::Completed
    } else if IN_PROGRESS_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        CompletionStatus::InProgress
    } else {
        CompletionStatus::YetToStart
    }
}

/// Like [`normalize_status`] but tolerates an absent cell.
pub fn normalize_optional_status(raw: Option<&str>) -> CompletionStatus {
    raw.map(normalize_status).unwrap_or_default()
}

/// Combines two observations of a topic's status. Status only moves forward.
pub fn merge_status(current: CompletionStatus, observed: CompletionStatus) -> CompletionStatus {
    current.max(observed)
}
