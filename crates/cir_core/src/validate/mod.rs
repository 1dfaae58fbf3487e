use time::OffsetDateTime;

use crate::domain::{Incident, Status, ValidationWarning};
use crate::normalize::timestamps::{parse_opt_ts, parse_ts};

fn order_check(
    a_field: &str,
    a: Option<OffsetDateTime>,
    b_field: &str,
    b: Option<OffsetDateTime>,
    warnings: &mut Vec<ValidationWarning>,
) {
    let (Some(a), Some(b)) = (a, b) else { return };
    if a > b {
        warnings.push(
            ValidationWarning::new(
                "VALIDATION_TS_ORDER_VIOLATION",
                format!("Timestamp order violation: {a_field} must be <= {b_field}"),
            )
            .with_details(format!("{a_field}={a}; {b_field}={b}")),
        );
    }
}

/// Validate a record against repo rules:
/// created_at <= sla_deadline, created_at <= resolved_at <= closed_at,
/// lifecycle stamps consistent with the current status, coordinates in
/// range. Findings are warnings; nothing is repaired.
pub fn validate_incident(incident: &Incident) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let created = parse_ts("created_at", &incident.created_at, &mut warnings);
    let updated = parse_ts("updated_at", &incident.updated_at, &mut warnings);
    let deadline = parse_ts("sla_deadline", &incident.sla_deadline, &mut warnings);
    let resolved = parse_opt_ts("resolved_at", &incident.resolved_at, &mut warnings);
    let closed = parse_opt_ts("closed_at", &incident.closed_at, &mut warnings);

    order_check("created_at", created, "sla_deadline", deadline, &mut warnings);
    order_check("created_at", created, "updated_at", updated, &mut warnings);
    order_check("created_at", created, "resolved_at", resolved, &mut warnings);
    order_check("created_at", created, "closed_at", closed, &mut warnings);
    order_check("resolved_at", resolved, "closed_at", closed, &mut warnings);

    // Stamps must agree with the lifecycle: resolved/closed statuses carry
    // their stamp, and no stamp may exist while the incident is still open.
    if incident.status == Status::Resolved && incident.resolved_at.is_none() {
        warnings.push(ValidationWarning::new(
            "VALIDATION_STAMP_MISSING",
            "Status is resolved but resolved_at is unset",
        ));
    }
    if incident.status == Status::Closed && incident.closed_at.is_none() {
        warnings.push(ValidationWarning::new(
            "VALIDATION_STAMP_MISSING",
            "Status is closed but closed_at is unset",
        ));
    }
    if incident.status.is_open() {
        if incident.resolved_at.is_some() {
            warnings.push(
                ValidationWarning::new(
                    "VALIDATION_STAMP_PREMATURE",
                    "resolved_at is set while the incident is still open",
                )
                .with_details(format!("status={}", incident.status.as_str())),
            );
        }
        if incident.closed_at.is_some() {
            warnings.push(
                ValidationWarning::new(
                    "VALIDATION_STAMP_PREMATURE",
                    "closed_at is set while the incident is still open",
                )
                .with_details(format!("status={}", incident.status.as_str())),
            );
        }
    }

    if let Some(lat) = incident.latitude {
        if !(-90.0..=90.0).contains(&lat) {
            warnings.push(
                ValidationWarning::new("VALIDATION_GEO_OUT_OF_RANGE", "latitude out of range")
                    .with_details(format!("value={lat}")),
            );
        }
    }
    if let Some(lon) = incident.longitude {
        if !(-180.0..=180.0).contains(&lon) {
            warnings.push(
                ValidationWarning::new("VALIDATION_GEO_OUT_OF_RANGE", "longitude out of range")
                    .with_details(format!("value={lon}")),
            );
        }
    }

    for (field, value) in [
        ("title", &incident.title),
        ("location", &incident.location),
        ("building", &incident.building),
    ] {
        if value.trim().is_empty() {
            warnings.push(ValidationWarning::new(
                "VALIDATION_FIELD_EMPTY",
                format!("{field} is empty"),
            ));
        }
    }

    warnings
}
