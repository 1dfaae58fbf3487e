use time::OffsetDateTime;

use crate::analytics::build_dashboard_snapshot;
use crate::domain::Incident;
use crate::hotspots::rank_hotspots;
use crate::sla::{evaluate_sla, SlaBucket};
use crate::validate::validate_incident;

const HOTSPOT_LIMIT: usize = 10;

/// Generate a deterministic Markdown operations report.
///
/// Ordering rules are stable for a fixed dataset and `now`, so outputs are
/// snapshot-testable. Rounding happens here: this module is presentation.
pub fn generate_ops_report(
    incidents: &[Incident],
    now: OffsetDateTime,
    window_start: OffsetDateTime,
) -> String {
    let (snapshot, _) = build_dashboard_snapshot(incidents, now, window_start);
    let (hotspots, _) = rank_hotspots(incidents, window_start, None);

    let mut on_track = 0i64;
    let mut critical = 0i64;
    let mut overdue = 0i64;
    let mut completed = 0i64;
    let mut unknown = 0i64;
    for inc in incidents {
        let (sla, _) = evaluate_sla(inc, now);
        match sla.bucket {
            SlaBucket::OnTrack => on_track += 1,
            SlaBucket::Critical => critical += 1,
            SlaBucket::Overdue => overdue += 1,
            SlaBucket::Completed => completed += 1,
            SlaBucket::Unknown => unknown += 1,
        }
    }

    let mut out = String::new();
    out.push_str("# Campus Incident Operations Report\n\n");
    out.push_str(&format!(
        "Incident count: **{}**\n\n",
        snapshot.stats.total
    ));

    out.push_str("## Headline\n\n");
    out.push_str(&format!("- Active: **{}**\n", snapshot.stats.active));
    out.push_str(&format!("- Resolved: **{}**\n", snapshot.stats.resolved));
    out.push_str(&format!("- Overdue: **{}**\n", snapshot.stats.overdue));
    out.push_str(&format!(
        "- Average resolution time: **{:.1}h**\n",
        snapshot.stats.avg_resolution_hours
    ));
    out.push_str(&format!(
        "- Resolution rate: **{}%**\n",
        snapshot.resolution_rate_pct.round() as i64
    ));
    out.push_str(&format!(
        "- Operating efficiency: **{}%**\n\n",
        snapshot.efficiency_pct.round() as i64
    ));

    out.push_str("## SLA posture\n\n");
    for (label, count) in [
        ("on_track", on_track),
        ("critical", critical),
        ("overdue", overdue),
        ("completed", completed),
        ("unknown", unknown),
    ] {
        out.push_str(&format!("- {label}: {count}\n"));
    }
    out.push('\n');

    out.push_str("## Category breakdown (window)\n\n");
    if snapshot.category_breakdown.is_empty() {
        out.push_str("- None in window.\n");
    }
    for slice in &snapshot.category_breakdown {
        out.push_str(&format!(
            "- {}: {} ({}%)\n",
            slice.category.as_str(),
            slice.count,
            slice.percentage.round() as i64
        ));
    }
    out.push('\n');

    out.push_str("## Top hotspots (window)\n\n");
    if hotspots.is_empty() {
        out.push_str("- None in window.\n");
    }
    for (rank, h) in hotspots.iter().take(HOTSPOT_LIMIT).enumerate() {
        out.push_str(&format!(
            "{}. {} - {} [{}]: {} incidents\n",
            rank + 1,
            h.building,
            h.location,
            h.category.as_str(),
            h.count
        ));
    }
    out.push('\n');

    out.push_str("## Validation appendix\n\n");
    let mut rows: Vec<&Incident> = incidents.iter().collect();
    rows.sort_by(|a, b| a.id.cmp(&b.id));
    let mut any = false;
    for inc in rows {
        let mut codes: Vec<String> = validate_incident(inc)
            .into_iter()
            .map(|w| w.code)
            .collect();
        if codes.is_empty() {
            continue;
        }
        any = true;
        codes.sort();
        codes.dedup();
        out.push_str(&format!("- {}: {}\n", inc.id, codes.join(", ")));
    }
    if !any {
        out.push_str("- None.\n");
    }

    out
}
