use time::format_description::well_known::Rfc3339;
use time::{format_description, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::domain::ValidationWarning;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTimestamp {
    /// Canonical RFC3339 UTC string, if deterministically parseable.
    pub canonical_rfc3339_utc: Option<String>,
    /// Raw input preserved for non-RFC3339 (or unparseable) inputs.
    pub raw: Option<String>,
}

/// Parse a canonical RFC3339 field, warning instead of guessing on failure.
/// Shared by the SLA, analytics, and validation layers.
pub fn parse_ts(
    field: &str,
    value: &str,
    warnings: &mut Vec<ValidationWarning>,
) -> Option<OffsetDateTime> {
    match OffsetDateTime::parse(value, &Rfc3339) {
        Ok(dt) => Some(dt),
        Err(e) => {
            warnings.push(
                ValidationWarning::new("TS_PARSE_FAILED", format!("Failed to parse {field}"))
                    .with_details(format!("value={value}; err={e}")),
            );
            None
        }
    }
}

/// Like `parse_ts` for optional fields: absent is fine, present-but-broken
/// warns.
pub fn parse_opt_ts(
    field: &str,
    value: &Option<String>,
    warnings: &mut Vec<ValidationWarning>,
) -> Option<OffsetDateTime> {
    value.as_deref().and_then(|v| parse_ts(field, v, warnings))
}

fn canonicalize_rfc3339_utc(dt: OffsetDateTime) -> Option<String> {
    let utc = dt.to_offset(UtcOffset::UTC);
    utc.format(&Rfc3339).ok()
}

fn parse_primitive_assume_utc(
    raw: &str,
    fmt: &str,
    field: &str,
    warnings: &mut Vec<ValidationWarning>,
) -> Option<String> {
    let items = format_description::parse(fmt).ok()?;
    let pdt = PrimitiveDateTime::parse(raw, &items).ok()?;

    // Format carries no timezone. Assume UTC deterministically but warn.
    warnings.push(
        ValidationWarning::new(
            "INGEST_TS_TZ_ASSUMED_UTC",
            format!("Assumed UTC timezone for {field}"),
        )
        .with_details(format!("value={raw}; fmt={fmt}")),
    );

    canonicalize_rfc3339_utc(pdt.assume_utc())
}

fn parse_allowlist(
    raw: &str,
    field: &str,
    warnings: &mut Vec<ValidationWarning>,
) -> Option<String> {
    // Deterministic allowlist only, no fuzzy parsing. The backend exports
    // either RFC3339 or these ISO-like forms without a timezone.
    for fmt in [
        "[year]-[month]-[day] [hour]:[minute]:[second]",
        "[year]-[month]-[day]T[hour]:[minute]:[second]",
    ] {
        if let Some(canon) = parse_primitive_assume_utc(raw, fmt, field, warnings) {
            return Some(canon);
        }
    }

    None
}

/// Normalize a backend-provided timestamp into canonical RFC3339 UTC while
/// preserving raw inputs.
///
/// Contract:
/// - RFC3339 input is canonicalized to UTC; `raw` stays `None`.
/// - Allowlisted timezone-less input is canonicalized with an explicit
///   assumed-UTC warning and the raw value preserved.
/// - Anything else keeps canonical `None`, preserves raw, and warns.
pub fn normalize_timestamp(
    field: &str,
    raw_input: &str,
    warnings: &mut Vec<ValidationWarning>,
) -> NormalizedTimestamp {
    let trimmed = raw_input.trim();
    if trimmed.is_empty() {
        return NormalizedTimestamp {
            canonical_rfc3339_utc: None,
            raw: None,
        };
    }

    if let Ok(dt) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return NormalizedTimestamp {
            canonical_rfc3339_utc: canonicalize_rfc3339_utc(dt),
            raw: None,
        };
    }

    if let Some(canon) = parse_allowlist(trimmed, field, warnings) {
        return NormalizedTimestamp {
            canonical_rfc3339_utc: Some(canon),
            raw: Some(trimmed.to_string()),
        };
    }

    warnings.push(
        ValidationWarning::new(
            "INGEST_TS_UNPARSEABLE",
            format!("Unparseable timestamp for {field}; preserved raw"),
        )
        .with_details(format!("raw={trimmed}")),
    );

    NormalizedTimestamp {
        canonical_rfc3339_utc: None,
        raw: Some(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_with_offset_is_canonicalized_to_utc() {
        let mut warnings = Vec::new();
        let norm = normalize_timestamp("created_at", "2026-02-01T10:00:00+02:00", &mut warnings);
        assert_eq!(
            norm.canonical_rfc3339_utc.as_deref(),
            Some("2026-02-01T08:00:00Z")
        );
        assert!(norm.raw.is_none());
        assert!(warnings.is_empty());
    }

    #[test]
    fn timezone_less_input_assumes_utc_and_warns() {
        let mut warnings = Vec::new();
        let norm = normalize_timestamp("created_at", "2026-02-01 08:00:00", &mut warnings);
        assert_eq!(
            norm.canonical_rfc3339_utc.as_deref(),
            Some("2026-02-01T08:00:00Z")
        );
        assert_eq!(norm.raw.as_deref(), Some("2026-02-01 08:00:00"));
        assert!(warnings
            .iter()
            .any(|w| w.code == "INGEST_TS_TZ_ASSUMED_UTC"));
    }

    #[test]
    fn garbage_is_preserved_raw_with_warning() {
        let mut warnings = Vec::new();
        let norm = normalize_timestamp("sla_deadline", "next tuesday", &mut warnings);
        assert!(norm.canonical_rfc3339_utc.is_none());
        assert_eq!(norm.raw.as_deref(), Some("next tuesday"));
        assert!(warnings.iter().any(|w| w.code == "INGEST_TS_UNPARSEABLE"));
    }
}
