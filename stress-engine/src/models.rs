use serde::{Deserialize, Serialize};

/// Load combination under which stress is evaluated. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combo {
    Gravity,
    Wind,
    Seismic,
}

impl Combo {
    pub const ALL: [Combo; 3] = [Combo::Gravity, Combo::Wind, Combo::Seismic];
}

/// Cross-section of a pier at one floor level. `w * d` is the area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub level: u16,
    pub pier: String,
    pub w: f64,
    pub d: f64,
}

/// Axial/lateral demand at a level/pier/combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Force {
    pub level: u16,
    pub pier: String,
    pub combo: Combo,
    pub force: f64,
}

/// One solved row: stress = force / area.
///
/// `id` is the display-only composite `"<pier>_<level>"`; it repeats across
/// combinations, so identity is the tuple (pier, level, combo).
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

/// Scalar multipliers applied per combination during recalculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadFactors {
    pub gravity: f64,
    pub wind: f64,
    pub seismic: f64,
}

impl LoadFactors {
    pub fn for_combo(&self, combo: Combo) -> f64 {
        match combo {
            Combo::Gravity => self.gravity,
            Combo::Wind => self.wind,
            Combo::Seismic => self.seismic,
        }
    }
}

/// Requested recalculation envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressParams {
    pub load_factors: LoadFactors,
    pub level_range: (u16, u16),
}

/// Recalculation request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub params: StressParams,
}

/// Recalculation response envelope.
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
