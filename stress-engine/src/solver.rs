use std::collections::HashMap;

use crate::dataset::{result_id, BuildingModel};
use crate::models::{Section, StressParams, StressResult};

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Recalculate stress for the requested envelope.
///
/// Pure over the base model: filters to the requested level range, scales
/// each force by its combination's load factor and recomputes stress from
/// the unscaled section areas. Requests past the top of the model are
/// clamped to `model.max_level`, so the returned range can be narrower than
/// the requested one; the client reconciles that from the rows themselves.
pub fn calculate(model: &BuildingModel, params: &StressParams) -> Vec<StressResult> {
    let (min_level, requested_max) = params.level_range;
    let max_level = requested_max.min(model.max_level);

    let section_map: HashMap<(u16, &str), &Section> = model
        .sections
        .iter()
        .filter(|s| s.level >= min_level && s.level <= max_level)
        .map(|s| ((s.level, s.pier.as_str()), s))
        .collect();

    let mut results = Vec::new();
    for f in &model.forces {
        if f.level < min_level || f.level > max_level {
            continue;
        }

        let factor = params.load_factors.for_combo(f.combo);
        let adjusted = f.force * factor;

        if let Some(sec) = section_map.get(&(f.level, f.pier.as_str())) {
            let area = sec.w * sec.d;
            let stress = if area > 0.0 { adjusted / area } else { 0.0 };
            results.push(StressResult {
                level: f.level,
                pier: f.pier.clone(),
                combo: f.combo,
                area: (area * 1000.0).round() / 1000.0,
                force: round2(adjusted),
                stress: round2(stress),
                id: result_id(&f.pier, f.level),
            });
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PIERS;
    use crate::models::{Combo, LoadFactors};
    use approx::assert_relative_eq;

    fn params(gravity: f64, wind: f64, seismic: f64, range: (u16, u16)) -> StressParams {
        StressParams {
            load_factors: LoadFactors {
                gravity,
                wind,
                seismic,
            },
            level_range: range,
        }
    }

    #[test]
    fn unit_factors_reproduce_base_stress() {
        let model = BuildingModel::generate(20);
        let results = calculate(&model, &params(1.0, 1.0, 1.0, (1, 20)));
        assert_eq!(results.len(), model.stress.len());
        for (r, base) in results.iter().zip(model.stress.iter()) {
            assert_relative_eq!(r.stress, base.stress, max_relative = 0.01);
        }
    }

    #[test]
    fn gravity_factor_scales_only_gravity_rows() {
        let model = BuildingModel::generate(20);
        let base = calculate(&model, &params(1.0, 1.0, 1.0, (1, 20)));
        let scaled = calculate(&model, &params(2.0, 1.0, 1.0, (1, 20)));
        for (b, s) in base.iter().zip(scaled.iter()) {
            match b.combo {
                Combo::Gravity => assert_relative_eq!(s.force, b.force * 2.0, max_relative = 0.01),
                _ => assert_relative_eq!(s.force, b.force, max_relative = 1e-9),
            }
        }
    }

    #[test]
    fn filters_to_requested_range() {
        let model = BuildingModel::generate(50);
        let results = calculate(&model, &params(1.0, 1.0, 1.0, (10, 20)));
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.level >= 10 && r.level <= 20));
        let levels: std::collections::HashSet<u16> = results.iter().map(|r| r.level).collect();
        assert_eq!(levels.len(), 11);
    }

    #[test]
    fn clamps_to_model_top() {
        let model = BuildingModel::generate(100);
        let results = calculate(&model, &params(1.0, 1.0, 1.0, (1, 200)));
        let max = results.iter().map(|r| r.level).max().unwrap();
        assert_eq!(max, 100);
        assert_eq!(results.len(), 100 * PIERS.len() * Combo::ALL.len());
    }

    #[test]
    fn degenerate_range_yields_no_rows() {
        let model = BuildingModel::generate(50);
        let results = calculate(&model, &params(1.0, 1.0, 1.0, (60, 80)));
        assert!(results.is_empty());
    }
}
