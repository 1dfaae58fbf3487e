use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

use crate::domain::{Category, Incident, Priority, Status};
use crate::error::{self, CoreError};

fn fmt(dt: OffsetDateTime) -> Result<String, CoreError> {
    dt.format(&Rfc3339).map_err(|e| {
        CoreError::new(error::TIME_FORMAT_FAILED, "Failed to format demo timestamp")
            .with_details(e.to_string())
    })
}

fn deadline_hours(priority: Priority) -> i64 {
    match priority {
        Priority::Critical => 4,
        Priority::High => 12,
        Priority::Medium => 24,
        Priority::Low => 72,
    }
}

fn title_for(category: Category) -> &'static str {
    match category {
        Category::Electricity => "Power flickering",
        Category::Water => "Leaking tap",
        Category::Internet => "Wi-Fi outage",
        Category::Hostel => "Broken door latch",
        Category::Equipment => "Projector not starting",
    }
}

/// Deterministic demo dataset anchored at `now`.
///
/// Sized and cycled so every dashboard has something to show: all
/// categories, priorities, and statuses occur, the four trouble spots
/// accumulate real hotspot counts, and (building, location, category)
/// groups recur often enough to survive the prediction threshold.
pub fn seed_demo_incidents(now: OffsetDateTime) -> Result<Vec<Incident>, CoreError> {
    let buildings = ["Hostel A", "Hostel B", "Science Block", "Library"];
    let locations = ["Room 101", "Room 204", "Lab 2", "Reading Hall"];

    let mut out = Vec::new();
    for i in 0..36usize {
        let category = Category::ALL[i % Category::ALL.len()];
        let priority = Priority::ALL[(i / 4) % Priority::ALL.len()];
        let status = Status::ALL[i % Status::ALL.len()];
        let building = buildings[i % buildings.len()];
        let location = locations[i % locations.len()];

        let created = now - Duration::days(1 + (i as i64 % 28)) - Duration::hours(i as i64 % 7);
        let deadline = created + Duration::hours(deadline_hours(priority));

        let resolved_at = if status == Status::Resolved {
            Some(fmt(created + Duration::hours(2 + (i as i64 % 5)))?)
        } else {
            None
        };
        let closed_at = if status == Status::Closed {
            Some(fmt(created + Duration::hours(3 + (i as i64 % 5)))?)
        } else {
            None
        };
        let updated_at = match (&closed_at, &resolved_at) {
            (Some(ts), _) | (None, Some(ts)) => ts.clone(),
            (None, None) => fmt(created)?,
        };

        out.push(Incident {
            id: format!("demo-{:03}", i + 1),
            title: title_for(category).to_string(),
            description: format!("{} reported at {building}, {location}", title_for(category)),
            category,
            priority,
            status,
            location: location.to_string(),
            building: building.to_string(),
            floor: Some(format!("{}", 1 + i % 3)),
            room: Some(format!("{}", 100 + i)),
            latitude: None,
            longitude: None,
            reported_by: format!("student-{}", 1 + i % 6),
            assigned_to: if status == Status::Reported {
                None
            } else {
                Some(format!("tech-{}", 1 + i % 3))
            },
            created_at: fmt(created)?,
            updated_at,
            sla_deadline: fmt(deadline)?,
            resolved_at,
            closed_at,
        });
    }

    Ok(out)
}
