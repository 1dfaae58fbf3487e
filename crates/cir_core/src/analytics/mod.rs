use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::{Category, Incident, Status, ValidationWarning};
use crate::normalize::timestamps::{parse_opt_ts, parse_ts};

pub const DASHBOARD_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    pub total: i64,
    pub active: i64,
    pub resolved: i64,
    pub overdue: i64,
    /// Unrounded mean; rounding for display is a presentation concern.
    pub avg_resolution_hours: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySlice {
    pub category: Category,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSnapshot {
    pub version: u32,
    pub stats: Stats,
    pub category_breakdown: Vec<CategorySlice>,
    pub resolution_rate_pct: f64,
    pub efficiency_pct: f64,
}

/// Headline counts plus mean resolution time over the full collection.
///
/// An incident counts as overdue only while open and only when its deadline
/// is parseable; broken deadlines warn instead of counting either way.
pub fn compute_stats(
    incidents: &[Incident],
    now: OffsetDateTime,
) -> (Stats, Vec<ValidationWarning>) {
    let mut warnings = Vec::new();

    let total = incidents.len() as i64;
    let mut active = 0i64;
    let mut resolved = 0i64;
    let mut overdue = 0i64;

    let mut resolution_hours_sum = 0.0f64;
    let mut resolution_samples = 0i64;

    for inc in incidents {
        if inc.status.is_open() {
            active += 1;
            if let Some(deadline) = parse_ts("sla_deadline", &inc.sla_deadline, &mut warnings) {
                if deadline < now {
                    overdue += 1;
                }
            }
        }
        if inc.status == Status::Resolved {
            resolved += 1;
        }

        if inc.resolved_at.is_some() {
            let created = parse_ts("created_at", &inc.created_at, &mut warnings);
            let resolved_at = parse_opt_ts("resolved_at", &inc.resolved_at, &mut warnings);
            if let (Some(created), Some(resolved_at)) = (created, resolved_at) {
                let secs = (resolved_at - created).whole_seconds();
                if secs < 0 {
                    warnings.push(
                        ValidationWarning::new(
                            "TS_ORDER_VIOLATION",
                            "resolved_at precedes created_at; excluded from resolution mean",
                        )
                        .with_details(format!("incident={}", inc.id)),
                    );
                } else {
                    resolution_hours_sum += secs as f64 / 3600.0;
                    resolution_samples += 1;
                }
            }
        }
    }

    let avg_resolution_hours = if resolution_samples > 0 {
        resolution_hours_sum / resolution_samples as f64
    } else {
        0.0
    };

    (
        Stats {
            total,
            active,
            resolved,
            overdue,
            avg_resolution_hours,
        },
        warnings,
    )
}

/// Category counts within the trailing window, sorted by count descending.
/// Ties keep the order in which each category was first seen in the input.
pub fn category_breakdown(
    incidents: &[Incident],
    window_start: OffsetDateTime,
) -> (Vec<CategorySlice>, Vec<ValidationWarning>) {
    let mut warnings = Vec::new();

    // First-seen insertion order matters for tie-breaks, so no map here.
    let mut groups: Vec<(Category, i64)> = Vec::new();
    for inc in incidents {
        let Some(created) = parse_ts("created_at", &inc.created_at, &mut warnings) else {
            continue;
        };
        if created < window_start {
            continue;
        }
        match groups.iter_mut().find(|(c, _)| *c == inc.category) {
            Some(entry) => entry.1 += 1,
            None => groups.push((inc.category, 1)),
        }
    }

    let total_in_window: i64 = groups.iter().map(|(_, n)| n).sum();

    // Stable sort preserves first-seen order among equal counts.
    groups.sort_by(|a, b| b.1.cmp(&a.1));

    let slices = groups
        .into_iter()
        .map(|(category, count)| CategorySlice {
            category,
            count,
            percentage: if total_in_window == 0 {
                0.0
            } else {
                100.0 * count as f64 / total_in_window as f64
            },
        })
        .collect();

    (slices, warnings)
}

/// Everything the dashboard renders in one versioned payload: headline
/// stats, the windowed category mix, and the two derived ratios from the
/// performance panel.
pub fn build_dashboard_snapshot(
    incidents: &[Incident],
    now: OffsetDateTime,
    window_start: OffsetDateTime,
) -> (DashboardSnapshot, Vec<ValidationWarning>) {
    let (stats, mut warnings) = compute_stats(incidents, now);
    let (breakdown, breakdown_warnings) = category_breakdown(incidents, window_start);
    warnings.extend(breakdown_warnings);

    let resolution_rate_pct = if stats.total == 0 {
        0.0
    } else {
        100.0 * stats.resolved as f64 / stats.total as f64
    };

    // Overdue incidents are a subset of active ones, so the divisor is safe
    // whenever the numerator is non-zero.
    let efficiency_pct = if stats.overdue == 0 {
        100.0
    } else {
        (100.0 - 100.0 * stats.overdue as f64 / stats.active as f64).max(0.0)
    };

    (
        DashboardSnapshot {
            version: DASHBOARD_SNAPSHOT_VERSION,
            stats,
            category_breakdown: breakdown,
            resolution_rate_pct,
            efficiency_pct,
        },
        warnings,
    )
}
