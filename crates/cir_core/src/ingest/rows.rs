use serde::{Deserialize, Serialize};

use crate::domain::{Category, Incident, Priority, Status, ValidationWarning};
use crate::error::{self, CoreError};
use crate::normalize::timestamps::normalize_timestamp;

/// Raw incident row as the hosted backend returns it: everything optional,
/// everything stringly. Decoding is lenient; mapping is where rows earn
/// their way into the domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawIncidentRow {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub building: Option<String>,
    pub floor: Option<String>,
    pub room: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub reported_by: Option<String>,
    pub assigned_to: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub sla_deadline: Option<String>,
    pub resolved_at: Option<String>,
    pub closed_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestSummary {
    pub incidents: Vec<Incident>,
    pub imported: usize,
    pub skipped: usize,
    pub warnings: Vec<ValidationWarning>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(
    row_idx: usize,
    field: &str,
    value: &Option<String>,
    warnings: &mut Vec<ValidationWarning>,
) -> Option<String> {
    let v = non_empty(value);
    if v.is_none() {
        warnings.push(
            ValidationWarning::new(
                "INGEST_FIELD_MISSING",
                format!("Row {row_idx}: missing required field {field}"),
            ),
        );
    }
    v
}

/// Canonicalize an optional timestamp field. Values that stay non-canonical
/// are dropped from the record; the warning preserves the raw text.
fn optional_canonical_ts(
    field: &str,
    value: &Option<String>,
    warnings: &mut Vec<ValidationWarning>,
) -> Option<String> {
    let raw = non_empty(value)?;
    normalize_timestamp(field, &raw, warnings).canonical_rfc3339_utc
}

/// Map one raw row into a validated `Incident`, or `None` (with warnings)
/// when the row cannot be represented without guessing.
pub fn map_row(
    row_idx: usize,
    row: &RawIncidentRow,
    warnings: &mut Vec<ValidationWarning>,
) -> Option<Incident> {
    let id = required(row_idx, "id", &row.id, warnings)?;
    let title = required(row_idx, "title", &row.title, warnings)?;
    let location = required(row_idx, "location", &row.location, warnings)?;
    let building = required(row_idx, "building", &row.building, warnings)?;
    let reported_by = required(row_idx, "reported_by", &row.reported_by, warnings)?;

    let category_raw = required(row_idx, "category", &row.category, warnings)?;
    let priority_raw = required(row_idx, "priority", &row.priority, warnings)?;
    let status_raw = required(row_idx, "status", &row.status, warnings)?;

    let mut enum_miss = false;
    let category = Category::parse(&category_raw).or_else(|| {
        warnings.push(
            ValidationWarning::new(
                "INGEST_ENUM_UNKNOWN",
                format!("Row {row_idx}: unknown category"),
            )
            .with_details(format!("value={category_raw}")),
        );
        enum_miss = true;
        None
    });
    let priority = Priority::parse(&priority_raw).or_else(|| {
        warnings.push(
            ValidationWarning::new(
                "INGEST_ENUM_UNKNOWN",
                format!("Row {row_idx}: unknown priority"),
            )
            .with_details(format!("value={priority_raw}")),
        );
        enum_miss = true;
        None
    });
    let status = Status::parse(&status_raw).or_else(|| {
        warnings.push(
            ValidationWarning::new(
                "INGEST_ENUM_UNKNOWN",
                format!("Row {row_idx}: unknown status"),
            )
            .with_details(format!("value={status_raw}")),
        );
        enum_miss = true;
        None
    });
    if enum_miss {
        return None;
    }

    // created_at and sla_deadline anchor every downstream computation, so a
    // row without canonical values for both is skipped rather than guessed.
    let created_raw = required(row_idx, "created_at", &row.created_at, warnings)?;
    let created_at = normalize_timestamp("created_at", &created_raw, warnings)
        .canonical_rfc3339_utc
        .or_else(|| {
            warnings.push(ValidationWarning::new(
                "INGEST_ROW_SKIPPED",
                format!("Row {row_idx}: created_at is not canonicalizable"),
            ));
            None
        })?;
    let deadline_raw = required(row_idx, "sla_deadline", &row.sla_deadline, warnings)?;
    let sla_deadline = normalize_timestamp("sla_deadline", &deadline_raw, warnings)
        .canonical_rfc3339_utc
        .or_else(|| {
            warnings.push(ValidationWarning::new(
                "INGEST_ROW_SKIPPED",
                format!("Row {row_idx}: sla_deadline is not canonicalizable"),
            ));
            None
        })?;

    let updated_at =
        optional_canonical_ts("updated_at", &row.updated_at, warnings).unwrap_or_else(|| created_at.clone());
    let resolved_at = optional_canonical_ts("resolved_at", &row.resolved_at, warnings);
    let closed_at = optional_canonical_ts("closed_at", &row.closed_at, warnings);

    Some(Incident {
        id,
        title,
        description: non_empty(&row.description).unwrap_or_default(),
        category: category?,
        priority: priority?,
        status: status?,
        location,
        building,
        floor: non_empty(&row.floor),
        room: non_empty(&row.room),
        latitude: row.latitude,
        longitude: row.longitude,
        reported_by,
        assigned_to: non_empty(&row.assigned_to),
        created_at,
        updated_at,
        sla_deadline,
        resolved_at,
        closed_at,
    })
}

/// Decode a JSON array of backend rows into domain records.
///
/// Malformed JSON is a hard error; malformed rows are skipped with warnings
/// so one bad record cannot sink a whole fetch.
pub fn ingest_rows(json_text: &str) -> Result<IngestSummary, CoreError> {
    let rows: Vec<RawIncidentRow> = serde_json::from_str(json_text).map_err(|e| {
        CoreError::new(error::INGEST_DECODE_FAILED, "Failed to decode incident rows")
            .with_details(e.to_string())
    })?;

    let mut warnings = Vec::new();
    let mut incidents = Vec::new();
    let mut skipped = 0usize;

    for (idx, row) in rows.iter().enumerate() {
        match map_row(idx, row, &mut warnings) {
            Some(incident) => incidents.push(incident),
            None => skipped += 1,
        }
    }

    log::debug!(
        "ingested {} incident rows ({} skipped, {} warnings)",
        incidents.len(),
        skipped,
        warnings.len()
    );

    Ok(IngestSummary {
        imported: incidents.len(),
        incidents,
        skipped,
        warnings,
    })
}
