use pretty_assertions::assert_eq;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use cir_core::domain::{Category, Incident, Priority, Status};
use cir_core::hotspots::{rank_hotspots, IntensityTier};

fn ts(raw: &str) -> OffsetDateTime {
    OffsetDateTime::parse(raw, &Rfc3339).expect("test timestamp")
}

fn incident(id: &str, building: &str, location: &str, category: Category, created_at: &str) -> Incident {
    Incident {
        id: id.to_string(),
        title: format!("{} issue", category.as_str()),
        description: String::new(),
        category,
        priority: Priority::Low,
        status: Status::Reported,
        location: location.to_string(),
        building: building.to_string(),
        floor: None,
        room: None,
        latitude: None,
        longitude: None,
        reported_by: "student-1".to_string(),
        assigned_to: None,
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
        sla_deadline: "2026-03-10T00:00:00Z".to_string(),
        resolved_at: None,
        closed_at: None,
    }
}

#[test]
fn groups_rank_by_frequency() {
    let incidents = vec![
        incident("a", "BuildingA", "Room1", Category::Water, "2026-03-01T08:00:00Z"),
        incident("b", "BuildingB", "Room2", Category::Water, "2026-03-01T09:00:00Z"),
        incident("c", "BuildingA", "Room1", Category::Water, "2026-03-02T08:00:00Z"),
    ];

    let (hotspots, warnings) = rank_hotspots(&incidents, ts("2026-02-20T00:00:00Z"), None);

    assert!(warnings.is_empty());
    assert_eq!(hotspots.len(), 2);
    assert_eq!(hotspots[0].building, "BuildingA");
    assert_eq!(hotspots[0].location, "Room1");
    assert_eq!(hotspots[0].count, 2);
    assert_eq!(hotspots[1].building, "BuildingB");
    assert_eq!(hotspots[1].location, "Room2");
    assert_eq!(hotspots[1].count, 1);
}

#[test]
fn intensity_is_relative_to_the_busiest_group() {
    let mut incidents = Vec::new();
    for i in 0..10 {
        incidents.push(incident(
            &format!("a{i}"),
            "Hostel A",
            "Room 101",
            Category::Electricity,
            "2026-03-01T08:00:00Z",
        ));
    }
    for i in 0..6 {
        incidents.push(incident(
            &format!("b{i}"),
            "Hostel B",
            "Room 204",
            Category::Water,
            "2026-03-01T08:00:00Z",
        ));
    }
    for i in 0..4 {
        incidents.push(incident(
            &format!("c{i}"),
            "Library",
            "Reading Hall",
            Category::Internet,
            "2026-03-01T08:00:00Z",
        ));
    }
    incidents.push(incident(
        "d0",
        "Science Block",
        "Lab 2",
        Category::Equipment,
        "2026-03-01T08:00:00Z",
    ));

    let (hotspots, _) = rank_hotspots(&incidents, ts("2026-02-20T00:00:00Z"), None);

    assert_eq!(hotspots[0].intensity, IntensityTier::Critical); // 10/10
    assert_eq!(hotspots[1].intensity, IntensityTier::High); // 6/10
    assert_eq!(hotspots[2].intensity, IntensityTier::Medium); // 4/10
    assert_eq!(hotspots[3].intensity, IntensityTier::Low); // 1/10
}

#[test]
fn category_filter_narrows_the_ranking() {
    let incidents = vec![
        incident("a", "Hostel A", "Room 101", Category::Water, "2026-03-01T08:00:00Z"),
        incident("b", "Hostel B", "Room 204", Category::Internet, "2026-03-01T08:00:00Z"),
    ];

    let (hotspots, _) =
        rank_hotspots(&incidents, ts("2026-02-20T00:00:00Z"), Some(Category::Internet));

    assert_eq!(hotspots.len(), 1);
    assert_eq!(hotspots[0].building, "Hostel B");
}

#[test]
fn window_excludes_older_incidents() {
    let incidents = vec![
        incident("a", "Hostel A", "Room 101", Category::Water, "2026-01-01T08:00:00Z"),
        incident("b", "Hostel A", "Room 101", Category::Water, "2026-03-01T08:00:00Z"),
    ];

    let (hotspots, _) = rank_hotspots(&incidents, ts("2026-02-01T00:00:00Z"), None);
    assert_eq!(hotspots.len(), 1);
    assert_eq!(hotspots[0].count, 1);
}

#[test]
fn ties_keep_first_seen_order_and_first_category() {
    let incidents = vec![
        incident("a", "Hostel B", "Room 204", Category::Hostel, "2026-03-01T08:00:00Z"),
        incident("b", "Hostel A", "Room 101", Category::Water, "2026-03-01T09:00:00Z"),
        // Second incident at the same spot with a different category; the
        // group keeps the first one's category.
        incident("c", "Hostel B", "Room 204", Category::Electricity, "2026-03-01T10:00:00Z"),
        incident("d", "Hostel A", "Room 101", Category::Internet, "2026-03-01T11:00:00Z"),
    ];

    let (hotspots, _) = rank_hotspots(&incidents, ts("2026-02-20T00:00:00Z"), None);

    assert_eq!(hotspots.len(), 2);
    assert_eq!(hotspots[0].building, "Hostel B");
    assert_eq!(hotspots[0].category, Category::Hostel);
    assert_eq!(hotspots[1].building, "Hostel A");
    assert_eq!(hotspots[1].category, Category::Water);
}

#[test]
fn empty_input_ranks_to_nothing() {
    let (hotspots, warnings) = rank_hotspots(&[], ts("2026-02-20T00:00:00Z"), None);
    assert!(hotspots.is_empty());
    assert!(warnings.is_empty());
}
