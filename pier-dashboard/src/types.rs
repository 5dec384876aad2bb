use serde::{Deserialize, Serialize};

/// The fixed pier set. Known statically to the presentation layer; summary
/// rows are emitted for every entry even when the data has no matching rows.
pub const PIERS: [&str; 5] = ["P1", "P2", "P3", "P4", "P5"];

/// Load combination under which stress is evaluated. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combo {
    Gravity,
    Wind,
    Seismic,
}

impl Combo {
    pub const ALL: [Combo; 3] = [Combo::Gravity, Combo::Wind, Combo::Seismic];

    pub fn label(&self) -> &'static str {
        match self {
            Combo::Gravity => "Gravity",
            Combo::Wind => "Wind",
            Combo::Seismic => "Seismic",
        }
    }
}

impl std::fmt::Display for Combo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub level: u16,
    pub pier: String,
    pub w: f64,
    pub d: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Force {
    pub level: u16,
    pub pier: String,
    pub combo: Combo,
    pub force: f64,
}

/// One solved stress row from the engine. The client never recomputes
/// `stress`; all numeric fields are whatever the engine returned.
///
/// `id` is the display-only composite `"<pier>_<level>"`; it repeats across
/// combinations, so the true identity key is (pier, level, combo).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressResult {
    pub level: u16,
    pub pier: String,
    pub combo: Combo,
    pub area: f64,
    pub force: f64,
    pub stress: f64,
    pub id: String,
}

/// Scalar multipliers per combination, edited in [0.5, 2.0] at the UI
/// boundary. The pipeline passes values through unvalidated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadFactors {
    pub gravity: f64,
    pub wind: f64,
    pub seismic: f64,
}

/// The requested recalculation envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressParams {
    pub load_factors: LoadFactors,
    pub level_range: (u16, u16),
}

impl Default for StressParams {
    fn default() -> Self {
        StressParams {
            load_factors: LoadFactors {
                gravity: 1.0,
                wind: 1.0,
                seismic: 1.0,
            },
            level_range: (1, 200),
        }
    }
}

/// The level span actually present in the most recent stress-result set, as
/// opposed to the span requested. `{0, 0}` for an empty result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveRange {
    pub min: u16,
    pub max: u16,
}

impl EffectiveRange {
    pub fn of(rows: &[StressResult]) -> Self {
        let mut iter = rows.iter().map(|r| r.level);
        match iter.next() {
            None => EffectiveRange { min: 0, max: 0 },
            Some(first) => {
                let (min, max) = iter.fold((first, first), |(lo, hi), level| {
                    (lo.min(level), hi.max(level))
                });
                EffectiveRange { min, max }
            }
        }
    }
}

/// Recalculation request body sent to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub params: StressParams,
}

/// Recalculation response envelope returned by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub job_id: String,
    pub status: CalculationStatus,
    pub results: Option<Vec<StressResult>>,
    pub error_message: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculationStatus {
    Success,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pier: &str, level: u16) -> StressResult {
        StressResult {
            level,
            pier: pier.to_string(),
            combo: Combo::Gravity,
            area: 1.0,
            force: 1.0,
            stress: 1.0,
            id: format!("{}_{}", pier, level),
        }
    }

    #[test]
    fn effective_range_of_empty_is_zero_zero() {
        assert_eq!(
            EffectiveRange::of(&[]),
            EffectiveRange { min: 0, max: 0 }
        );
    }

    #[test]
    fn effective_range_spans_actual_levels() {
        let rows = vec![row("P1", 7), row("P2", 3), row("P1", 42)];
        assert_eq!(
            EffectiveRange::of(&rows),
            EffectiveRange { min: 3, max: 42 }
        );
    }
}
