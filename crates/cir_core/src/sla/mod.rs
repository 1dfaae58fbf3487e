use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::{Incident, Status, ValidationWarning};
use crate::normalize::timestamps::parse_ts;

/// Remaining time below this threshold buckets as `critical`.
pub const CRITICAL_WINDOW_MINUTES: i64 = 120;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SlaBucket {
    Completed,
    OnTrack,
    Critical,
    Overdue,
    /// Deadline missing or unparseable; surfaced instead of guessed.
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlaStatus {
    pub bucket: SlaBucket,
    /// Whole minutes until the deadline; negative once overdue. Zero and not
    /// meaningful for `completed` and `unknown`.
    pub remaining_minutes: i64,
}

/// Bucket an incident's SLA posture at `now`.
///
/// Resolved and closed incidents are `completed` regardless of the deadline
/// value. Deterministic given `now`; no side effects.
pub fn evaluate_sla(incident: &Incident, now: OffsetDateTime) -> (SlaStatus, Vec<ValidationWarning>) {
    let mut warnings = Vec::new();

    if matches!(incident.status, Status::Resolved | Status::Closed) {
        return (
            SlaStatus {
                bucket: SlaBucket::Completed,
                remaining_minutes: 0,
            },
            warnings,
        );
    }

    let Some(deadline) = parse_ts("sla_deadline", &incident.sla_deadline, &mut warnings) else {
        return (
            SlaStatus {
                bucket: SlaBucket::Unknown,
                remaining_minutes: 0,
            },
            warnings,
        );
    };

    let remaining = deadline - now;
    let remaining_minutes = remaining.whole_seconds() / 60;

    let bucket = if remaining.whole_seconds() < 0 {
        SlaBucket::Overdue
    } else if remaining_minutes < CRITICAL_WINDOW_MINUTES {
        SlaBucket::Critical
    } else {
        SlaBucket::OnTrack
    };

    (
        SlaStatus {
            bucket,
            remaining_minutes,
        },
        warnings,
    )
}
