use pretty_assertions::assert_eq;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use cir_core::domain::{Category, Incident, Priority, Status};
use cir_core::sla::{evaluate_sla, SlaBucket};

fn ts(raw: &str) -> OffsetDateTime {
    OffsetDateTime::parse(raw, &Rfc3339).expect("test timestamp")
}

fn incident_with(status: Status, sla_deadline: &str) -> Incident {
    Incident {
        id: "inc-1".to_string(),
        title: "No water pressure".to_string(),
        description: String::new(),
        category: Category::Water,
        priority: Priority::High,
        status,
        location: "Washroom".to_string(),
        building: "Hostel B".to_string(),
        floor: None,
        room: None,
        latitude: None,
        longitude: None,
        reported_by: "student-2".to_string(),
        assigned_to: None,
        created_at: "2026-03-01T08:00:00Z".to_string(),
        updated_at: "2026-03-01T08:00:00Z".to_string(),
        sla_deadline: sla_deadline.to_string(),
        resolved_at: None,
        closed_at: None,
    }
}

#[test]
fn resolved_and_closed_are_completed_regardless_of_deadline() {
    let now = ts("2026-03-05T08:00:00Z");
    // Deadline long past for both; completion wins anyway.
    for status in [Status::Resolved, Status::Closed] {
        let incident = incident_with(status, "2026-03-01T09:00:00Z");
        let (sla, warnings) = evaluate_sla(&incident, now);
        assert_eq!(sla.bucket, SlaBucket::Completed);
        assert_eq!(sla.remaining_minutes, 0);
        assert!(warnings.is_empty());
    }
}

#[test]
fn open_incident_past_deadline_is_overdue() {
    let incident = incident_with(Status::InProgress, "2026-03-01T09:00:00Z");
    let (sla, _) = evaluate_sla(&incident, ts("2026-03-01T10:00:00Z"));
    assert_eq!(sla.bucket, SlaBucket::Overdue);
    assert_eq!(sla.remaining_minutes, -60);
}

#[test]
fn under_two_hours_remaining_is_critical() {
    let incident = incident_with(Status::Reported, "2026-03-01T10:00:00Z");
    let (sla, _) = evaluate_sla(&incident, ts("2026-03-01T08:01:00Z"));
    assert_eq!(sla.bucket, SlaBucket::Critical);
    assert_eq!(sla.remaining_minutes, 119);
}

#[test]
fn exactly_two_hours_remaining_is_on_track() {
    let incident = incident_with(Status::Reported, "2026-03-01T10:00:00Z");
    let (sla, _) = evaluate_sla(&incident, ts("2026-03-01T08:00:00Z"));
    assert_eq!(sla.bucket, SlaBucket::OnTrack);
    assert_eq!(sla.remaining_minutes, 120);
}

#[test]
fn unparseable_deadline_surfaces_as_unknown() {
    let incident = incident_with(Status::Assigned, "soon");
    let (sla, warnings) = evaluate_sla(&incident, ts("2026-03-01T08:00:00Z"));
    assert_eq!(sla.bucket, SlaBucket::Unknown);
    assert!(warnings.iter().any(|w| w.code == "TS_PARSE_FAILED"));
}
