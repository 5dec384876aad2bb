use std::collections::HashMap;

use crate::models::{Combo, Force, Section, StressResult};

pub const PIERS: [&str; 5] = ["P1", "P2", "P3", "P4", "P5"];

/// The synthetic building model: every dataset the service can hand out,
/// generated once at startup and served read-only thereafter.
pub struct BuildingModel {
    pub sections: Vec<Section>,
    pub forces: Vec<Force>,
    pub stress: Vec<StressResult>,
    pub max_level: u16,
}

/// Base cross-section dimensions (w, d) in metres at level 1.
fn base_dims(pier: &str) -> (f64, f64) {
    match pier {
        "P1" => (1.2, 0.6),
        "P2" => (1.0, 0.5),
        "P3" => (0.9, 0.45),
        "P4" => (1.1, 0.55),
        _ => (0.8, 0.4),
    }
}

/// Taper factor: dimensions shrink linearly to 40% at the top level.
fn taper(level: u16, max_level: u16) -> f64 {
    if max_level <= 1 {
        return 1.0;
    }
    let t = (level as f64 - 1.0) / (max_level as f64 - 1.0);
    1.0 - 0.6 * t
}

fn base_force(pier: &str, combo: Combo) -> f64 {
    let pier_factor = match pier {
        "P1" => 1.0,
        "P2" => 0.85,
        "P3" => 0.75,
        "P4" => 0.92,
        _ => 0.68,
    };
    let combo_base = match combo {
        Combo::Gravity => 5000.0,
        Combo::Wind => 2200.0,
        Combo::Seismic => 3100.0,
    };
    pier_factor * combo_base
}

/// Height profile: gravity accumulates toward the base, wind tails off with
/// height, seismic follows a triangular profile peaking around mid-height.
fn force_at_level(base: f64, level: u16, max_level: u16, combo: Combo) -> f64 {
    if max_level <= 1 {
        return base;
    }
    let norm = (level as f64 - 1.0) / (max_level as f64 - 1.0);
    match combo {
        Combo::Gravity => base * (1.0 - 0.85 * norm),
        Combo::Wind => base * (0.3 + 0.7 * (1.0 - norm)),
        Combo::Seismic => {
            let dist = (norm - 0.5).abs();
            base * (1.0 - 0.6 * dist)
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

pub fn result_id(pier: &str, level: u16) -> String {
    format!("{}_{}", pier, level)
}

impl BuildingModel {
    /// Generate the full model for `max_level` storeys.
    pub fn generate(max_level: u16) -> Self {
        let max_level = max_level.max(1);

        let mut sections = Vec::with_capacity(max_level as usize * PIERS.len());
        for level in 1..=max_level {
            let t = taper(level, max_level);
            for &pier in &PIERS {
                let (w, d) = base_dims(pier);
                sections.push(Section {
                    level,
                    pier: pier.to_string(),
                    w: round3(w * t),
                    d: round3(d * t),
                });
            }
        }

        let mut forces = Vec::with_capacity(sections.len() * Combo::ALL.len());
        for level in 1..=max_level {
            for &pier in &PIERS {
                for combo in Combo::ALL {
                    let base = base_force(pier, combo);
                    forces.push(Force {
                        level,
                        pier: pier.to_string(),
                        combo,
                        force: round2(force_at_level(base, level, max_level, combo)),
                    });
                }
            }
        }

        // Stress join on (level, pier)
        let section_map: HashMap<(u16, &str), &Section> = sections
            .iter()
            .map(|s| ((s.level, s.pier.as_str()), s))
            .collect();

        let mut stress = Vec::with_capacity(forces.len());
        for f in &forces {
            if let Some(sec) = section_map.get(&(f.level, f.pier.as_str())) {
                let area = sec.w * sec.d;
                let s = if area > 0.0 { f.force / area } else { 0.0 };
                stress.push(StressResult {
                    level: f.level,
                    pier: f.pier.clone(),
                    combo: f.combo,
                    area: round3(area),
                    force: f.force,
                    stress: round2(s),
                    id: result_id(&f.pier, f.level),
                });
            }
        }

        BuildingModel {
            sections,
            forces,
            stress,
            max_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn generates_full_grid() {
        let model = BuildingModel::generate(100);
        assert_eq!(model.max_level, 100);
        assert_eq!(model.sections.len(), 100 * PIERS.len());
        assert_eq!(model.forces.len(), 100 * PIERS.len() * Combo::ALL.len());
        assert_eq!(model.stress.len(), model.forces.len());
    }

    #[test]
    fn taper_shrinks_to_forty_percent_at_top() {
        let model = BuildingModel::generate(100);
        let base = model
            .sections
            .iter()
            .find(|s| s.pier == "P1" && s.level == 1)
            .unwrap();
        let top = model
            .sections
            .iter()
            .find(|s| s.pier == "P1" && s.level == 100)
            .unwrap();
        assert_relative_eq!(base.w, 1.2, max_relative = 1e-9);
        assert_relative_eq!(base.d, 0.6, max_relative = 1e-9);
        assert_relative_eq!(top.w, 0.48, max_relative = 1e-3);
        assert_relative_eq!(top.d, 0.24, max_relative = 1e-3);
    }

    #[test]
    fn stress_is_force_over_area() {
        let model = BuildingModel::generate(50);
        for r in &model.stress {
            if r.area > 0.0 {
                assert_relative_eq!(r.stress, r.force / r.area, max_relative = 0.01);
            }
        }
    }

    #[test]
    fn ids_follow_pier_level_scheme() {
        let model = BuildingModel::generate(10);
        let row = model
            .stress
            .iter()
            .find(|r| r.pier == "P3" && r.level == 7)
            .unwrap();
        assert_eq!(row.id, "P3_7");
    }

    #[test]
    fn single_storey_model_does_not_divide_by_zero() {
        let model = BuildingModel::generate(1);
        assert_eq!(model.sections.len(), PIERS.len());
        assert!(model.stress.iter().all(|r| r.stress.is_finite()));
    }
}
