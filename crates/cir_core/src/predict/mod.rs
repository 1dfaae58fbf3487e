use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

use crate::domain::{Category, Incident, ValidationWarning};
use crate::error::{self, CoreError};
use crate::normalize::timestamps::parse_ts;

pub const DEFAULT_MIN_RECURRENCE: i64 = 2;

/// Source of uniform draws in [0, 1). Injected so callers control
/// determinism; production code wraps a `rand` generator in `RngSource`,
/// tests supply a fixed sequence instead.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Adapter over any `rand` generator.
pub struct RngSource<R: rand::Rng>(pub R);

impl<R: rand::Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    /// "building - location", matching how the shell labels hotspots.
    pub location: String,
    pub category: Category,
    pub predicted_date: String,
    pub confidence: f64,
    pub incident_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionBatch {
    pub predictions: Vec<Prediction>,
    pub warnings: Vec<ValidationWarning>,
}

/// Forward-looking recurrence list. Explicitly a heuristic: a frequency
/// count over the trailing window with a randomized date and confidence
/// dressing, not a forecasting model. Deterministic only when the injected
/// source is.
///
/// Groups (building, location, category) within the window, drops groups
/// seen fewer than `min_recurrence` times, and for each survivor draws a
/// predicted date 7-20 days out and a confidence in [0.6, 0.95] that grows
/// with recurrence. Result is sorted by confidence descending.
pub fn predict_hotspots(
    incidents: &[Incident],
    now: OffsetDateTime,
    window_start: OffsetDateTime,
    min_recurrence: i64,
    rng: &mut dyn RandomSource,
) -> Result<PredictionBatch, CoreError> {
    let mut warnings = Vec::new();

    let mut groups: Vec<(String, String, Category, i64)> = Vec::new();
    for inc in incidents {
        let Some(created) = parse_ts("created_at", &inc.created_at, &mut warnings) else {
            continue;
        };
        if created < window_start {
            continue;
        }

        match groups.iter_mut().find(|(b, l, c, _)| {
            *b == inc.building && *l == inc.location && *c == inc.category
        }) {
            Some(entry) => entry.3 += 1,
            None => groups.push((inc.building.clone(), inc.location.clone(), inc.category, 1)),
        }
    }

    let mut predictions = Vec::new();
    for (building, location, category, count) in groups {
        if count < min_recurrence {
            continue;
        }

        let days_ahead = 7 + (rng.next_unit() * 14.0).floor() as i64;
        let predicted = now + Duration::days(days_ahead);
        let predicted_date = predicted.format(&Rfc3339).map_err(|e| {
            CoreError::new(error::TIME_FORMAT_FAILED, "Failed to format predicted date")
                .with_details(e.to_string())
        })?;

        let base = (count as f64 / 10.0 * 0.5 + 0.5).min(0.95);
        let jitter = (rng.next_unit() - 0.5) * 0.1;
        let confidence = (base + jitter).clamp(0.6, 0.95);

        predictions.push(Prediction {
            location: format!("{building} - {location}"),
            category,
            predicted_date,
            confidence,
            incident_count: count,
        });
    }

    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    Ok(PredictionBatch {
        predictions,
        warnings,
    })
}
