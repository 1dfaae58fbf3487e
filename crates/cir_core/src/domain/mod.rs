use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::{self, CoreError};

/// Maintenance issue categories reportable on campus. The snake_case wire
/// strings are a bit-exact contract with the hosted backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Electricity,
    Water,
    Internet,
    Hostel,
    Equipment,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Electricity,
        Category::Water,
        Category::Internet,
        Category::Hostel,
        Category::Equipment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electricity => "electricity",
            Category::Water => "water",
            Category::Internet => "internet",
            Category::Hostel => "hostel",
            Category::Equipment => "equipment",
        }
    }

    pub fn parse(raw: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    pub fn parse(raw: &str) -> Option<Priority> {
        Priority::ALL.iter().copied().find(|p| p.as_str() == raw)
    }
}

/// Lifecycle states. Reachability between them is a `TransitionPolicy`
/// concern, not a property of the enum itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Reported,
    Assigned,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Reported,
        Status::Assigned,
        Status::InProgress,
        Status::Resolved,
        Status::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Reported => "reported",
            Status::Assigned => "assigned",
            Status::InProgress => "in_progress",
            Status::Resolved => "resolved",
            Status::Closed => "closed",
        }
    }

    /// Human-readable form for notification and report text.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Reported => "reported",
            Status::Assigned => "assigned",
            Status::InProgress => "in progress",
            Status::Resolved => "resolved",
            Status::Closed => "closed",
        }
    }

    pub fn parse(raw: &str) -> Option<Status> {
        Status::ALL.iter().copied().find(|s| s.as_str() == raw)
    }

    /// Open statuses count toward the active/overdue dashboards.
    pub fn is_open(&self) -> bool {
        matches!(self, Status::Reported | Status::Assigned | Status::InProgress)
    }
}

/// Caller role, supplied per invocation. Auth mechanics live in the hosted
/// backend; the core only gates transitions on the role value it is handed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Admin,
    Technician,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
            Role::Technician => "technician",
        }
    }

    pub fn parse(raw: &str) -> Option<Role> {
        [Role::Student, Role::Admin, Role::Technician]
            .iter()
            .copied()
            .find(|r| r.as_str() == raw)
    }

    pub fn can_transition(&self) -> bool {
        matches!(self, Role::Admin | Role::Technician)
    }
}

/// Canonical incident record as exchanged with the hosted backend.
///
/// Notes:
/// - Timestamps are RFC3339 UTC strings; the backend is their source of
///   truth and unparseable values surface as validation warnings rather than
///   being silently repaired.
/// - `sla_deadline` is computed externally from priority/category policy and
///   is immutable input here.
/// - `resolved_at`/`closed_at` are stamped exactly once by the transition
///   engine and never cleared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Incident {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub location: String,
    pub building: String,
    pub floor: Option<String>,
    pub room: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub reported_by: String,
    pub assigned_to: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub sla_deadline: String,
    pub resolved_at: Option<String>,
    pub closed_at: Option<String>,
}

/// Input shape for a freshly reported incident. Enum fields arrive as raw
/// strings from the form layer and are validated in `Incident::new`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewIncident {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub location: String,
    pub building: String,
    pub floor: Option<String>,
    pub room: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub reported_by: String,
    pub assigned_to: Option<String>,
    pub created_at: String,
    pub sla_deadline: String,
}

impl Incident {
    /// Validating factory for new reports. Rejects enum values outside the
    /// closed sets and a creation time past the SLA deadline.
    pub fn new(input: NewIncident) -> Result<Incident, CoreError> {
        let category = Category::parse(&input.category).ok_or_else(|| {
            CoreError::new(error::VALIDATION_FAILED, "Unknown incident category")
                .with_details(format!("category={}", input.category))
        })?;
        let priority = Priority::parse(&input.priority).ok_or_else(|| {
            CoreError::new(error::VALIDATION_FAILED, "Unknown incident priority")
                .with_details(format!("priority={}", input.priority))
        })?;
        let status = Status::parse(&input.status).ok_or_else(|| {
            CoreError::new(error::VALIDATION_FAILED, "Unknown incident status")
                .with_details(format!("status={}", input.status))
        })?;

        let created = OffsetDateTime::parse(&input.created_at, &Rfc3339).map_err(|e| {
            CoreError::new(error::VALIDATION_FAILED, "Unparseable created_at")
                .with_details(format!("value={}; err={e}", input.created_at))
        })?;
        let deadline = OffsetDateTime::parse(&input.sla_deadline, &Rfc3339).map_err(|e| {
            CoreError::new(error::VALIDATION_FAILED, "Unparseable sla_deadline")
                .with_details(format!("value={}; err={e}", input.sla_deadline))
        })?;
        if created > deadline {
            return Err(CoreError::new(
                error::VALIDATION_FAILED,
                "created_at must be <= sla_deadline",
            )
            .with_details(format!(
                "created_at={}; sla_deadline={}",
                input.created_at, input.sla_deadline
            )));
        }

        Ok(Incident {
            id: input.id,
            title: input.title,
            description: input.description,
            category,
            priority,
            status,
            location: input.location,
            building: input.building,
            floor: input.floor,
            room: input.room,
            latitude: input.latitude,
            longitude: input.longitude,
            reported_by: input.reported_by,
            assigned_to: input.assigned_to,
            updated_at: input.created_at.clone(),
            created_at: input.created_at,
            sla_deadline: input.sla_deadline,
            resolved_at: None,
            closed_at: None,
        })
    }
}

/// Notification categories understood by the shell's notification table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    IncidentUpdate,
    Assignment,
    Resolved,
    Warning,
}

/// A notification-worthy event produced by a successful transition. The core
/// never delivers anything; the caller persists this as a notification row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationDraft {
    pub user_id: String,
    pub incident_id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> NewIncident {
        NewIncident {
            id: "inc-1".to_string(),
            title: "Socket sparking".to_string(),
            description: "Wall socket sparks when used".to_string(),
            category: "electricity".to_string(),
            priority: "high".to_string(),
            status: "reported".to_string(),
            location: "Room 204".to_string(),
            building: "Hostel A".to_string(),
            floor: Some("2".to_string()),
            room: Some("204".to_string()),
            latitude: None,
            longitude: None,
            reported_by: "user-9".to_string(),
            assigned_to: None,
            created_at: "2026-02-01T08:00:00Z".to_string(),
            sla_deadline: "2026-02-01T20:00:00Z".to_string(),
        }
    }

    #[test]
    fn factory_accepts_well_formed_input() {
        let inc = Incident::new(sample_input()).expect("valid input");
        assert_eq!(inc.status, Status::Reported);
        assert_eq!(inc.updated_at, inc.created_at);
        assert!(inc.resolved_at.is_none() && inc.closed_at.is_none());
    }

    #[test]
    fn factory_rejects_unknown_category() {
        let mut input = sample_input();
        input.category = "plumbing".to_string();
        let err = Incident::new(input).expect_err("unknown category");
        assert_eq!(err.code, crate::error::VALIDATION_FAILED);
    }

    #[test]
    fn factory_rejects_creation_after_deadline() {
        let mut input = sample_input();
        input.sla_deadline = "2026-02-01T07:00:00Z".to_string();
        let err = Incident::new(input).expect_err("deadline before creation");
        assert_eq!(err.code, crate::error::VALIDATION_FAILED);
    }

    #[test]
    fn status_wire_strings_are_exact() {
        assert_eq!(Status::InProgress.as_str(), "in_progress");
        assert_eq!(Status::parse("in_progress"), Some(Status::InProgress));
        assert_eq!(Status::parse("in progress"), None);
        assert_eq!(Role::parse("technician"), Some(Role::Technician));
    }
}
