use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::{Category, Incident, ValidationWarning};
use crate::normalize::timestamps::parse_ts;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntensityTier {
    Low,
    Medium,
    High,
    Critical,
}

fn tier_for(count: i64, max_count: i64) -> IntensityTier {
    let intensity = count as f64 / max_count as f64;
    if intensity > 0.7 {
        IntensityTier::Critical
    } else if intensity > 0.5 {
        IntensityTier::High
    } else if intensity > 0.3 {
        IntensityTier::Medium
    } else {
        IntensityTier::Low
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hotspot {
    pub building: String,
    pub location: String,
    /// Category of the first incident seen for the group; groups are not
    /// re-labeled by majority vote.
    pub category: Category,
    pub count: i64,
    pub intensity: IntensityTier,
}

/// Rank (building, location) pairs by incident frequency within the trailing
/// window, optionally restricted to one category.
///
/// The full ranking is returned, count descending with first-seen order on
/// ties; callers take a prefix for display. Intensity tiers are relative to
/// the busiest group in this result.
pub fn rank_hotspots(
    incidents: &[Incident],
    window_start: OffsetDateTime,
    category_filter: Option<Category>,
) -> (Vec<Hotspot>, Vec<ValidationWarning>) {
    let mut warnings = Vec::new();

    let mut groups: Vec<(String, String, Category, i64)> = Vec::new();
    for inc in incidents {
        if let Some(filter) = category_filter {
            if inc.category != filter {
                continue;
            }
        }
        let Some(created) = parse_ts("created_at", &inc.created_at, &mut warnings) else {
            continue;
        };
        if created < window_start {
            continue;
        }

        match groups
            .iter_mut()
            .find(|(b, l, _, _)| *b == inc.building && *l == inc.location)
        {
            Some(entry) => entry.3 += 1,
            None => groups.push((inc.building.clone(), inc.location.clone(), inc.category, 1)),
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    groups.sort_by(|a, b| b.3.cmp(&a.3));

    // Floor of 1 keeps the ratio defined when the result is empty.
    let max_count = groups.iter().map(|(_, _, _, n)| *n).max().unwrap_or(1).max(1);

    let hotspots = groups
        .into_iter()
        .map(|(building, location, category, count)| Hotspot {
            building,
            location,
            category,
            count,
            intensity: tier_for(count, max_count),
        })
        .collect();

    (hotspots, warnings)
}
