use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::{Incident, NotificationDraft, NotificationKind, Role, Status};
use crate::error::{self, CoreError};

/// Which target statuses are reachable from each current status.
///
/// The table is data, not code: the shell may persist a policy alongside its
/// settings and hand it back per call. `forward_only` is the default;
/// `permissive` reproduces the historical any-to-any behavior for
/// deployments that rely on it to correct mistakes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransitionPolicy {
    edges: Vec<(Status, Vec<Status>)>,
}

impl TransitionPolicy {
    /// Forward-only lifecycle: reported -> assigned -> in_progress ->
    /// resolved -> closed, with skips ahead allowed and `closed` terminal.
    pub fn forward_only() -> Self {
        Self {
            edges: vec![
                (
                    Status::Reported,
                    vec![
                        Status::Assigned,
                        Status::InProgress,
                        Status::Resolved,
                        Status::Closed,
                    ],
                ),
                (
                    Status::Assigned,
                    vec![Status::InProgress, Status::Resolved, Status::Closed],
                ),
                (Status::InProgress, vec![Status::Resolved, Status::Closed]),
                (Status::Resolved, vec![Status::Closed]),
                (Status::Closed, vec![]),
            ],
        }
    }

    /// Any status to any other status. Same-status attempts still report as
    /// no-ops regardless of policy.
    pub fn permissive() -> Self {
        let edges = Status::ALL
            .iter()
            .map(|from| {
                let targets = Status::ALL
                    .iter()
                    .copied()
                    .filter(|to| to != from)
                    .collect();
                (*from, targets)
            })
            .collect();
        Self { edges }
    }

    pub fn allows(&self, from: Status, to: Status) -> bool {
        self.edges
            .iter()
            .find(|(s, _)| *s == from)
            .map(|(_, targets)| targets.contains(&to))
            .unwrap_or(false)
    }

    /// Reachable targets from a status, for rendering transition pickers.
    pub fn targets_from(&self, from: Status) -> &[Status] {
        self.edges
            .iter()
            .find(|(s, _)| *s == from)
            .map(|(_, targets)| targets.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self::forward_only()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransitionOutcome {
    pub incident: Incident,
    /// True whenever the status actually changed; the caller creates a
    /// notification row from `notification` when set.
    pub notify_required: bool,
    pub notification: NotificationDraft,
}

fn notification_for(incident: &Incident, target: Status) -> NotificationDraft {
    let kind = match target {
        Status::Assigned => NotificationKind::Assignment,
        Status::Resolved => NotificationKind::Resolved,
        _ => NotificationKind::IncidentUpdate,
    };
    NotificationDraft {
        user_id: incident.reported_by.clone(),
        incident_id: incident.id.clone(),
        title: "Incident status updated".to_string(),
        message: format!("'{}' is now {}", incident.title, target.label()),
        kind,
    }
}

/// Validate and apply a status transition.
///
/// Check order: actor role, then same-status no-op, then policy
/// reachability. On success the returned record carries the new status,
/// `resolved_at`/`closed_at` stamped only if previously unset, and
/// `updated_at = now`. The input record is never mutated; persistence and
/// notification delivery stay with the caller.
pub fn apply_transition(
    incident: &Incident,
    target: Status,
    actor_role: Role,
    now: OffsetDateTime,
    policy: &TransitionPolicy,
) -> Result<TransitionOutcome, CoreError> {
    if !actor_role.can_transition() {
        return Err(CoreError::new(
            error::TRANSITION_UNAUTHORIZED,
            "Only admins and technicians may change incident status",
        )
        .with_details(format!("role={}", actor_role.as_str())));
    }

    if target == incident.status {
        return Err(CoreError::new(
            error::TRANSITION_NOOP,
            "Incident already has the requested status",
        )
        .with_details(format!("status={}", target.as_str())));
    }

    if !policy.allows(incident.status, target) {
        return Err(CoreError::new(
            error::TRANSITION_INVALID,
            "Target status is not reachable from the current status",
        )
        .with_details(format!(
            "from={}; to={}",
            incident.status.as_str(),
            target.as_str()
        )));
    }

    let stamp = now.format(&Rfc3339).map_err(|e| {
        CoreError::new(error::TIME_FORMAT_FAILED, "Failed to format transition time")
            .with_details(e.to_string())
    })?;

    let mut updated = incident.clone();
    updated.status = target;
    if target == Status::Resolved && updated.resolved_at.is_none() {
        updated.resolved_at = Some(stamp.clone());
    }
    if target == Status::Closed && updated.closed_at.is_none() {
        updated.closed_at = Some(stamp.clone());
    }
    updated.updated_at = stamp;

    log::debug!(
        "transition applied: incident={} {} -> {}",
        incident.id,
        incident.status.as_str(),
        target.as_str()
    );

    let notification = notification_for(incident, target);
    Ok(TransitionOutcome {
        incident: updated,
        notify_required: true,
        notification,
    })
}
