//! Selection state: the selected pier and the user-edited recalculation
//! parameters. Pure state, no I/O.

use crate::types::{Combo, StressParams, PIERS};

pub struct DashboardStore {
    selected_pier: String,
    params: StressParams,
    version: u64,
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardStore {
    pub fn new() -> Self {
        DashboardStore {
            selected_pier: PIERS[0].to_string(),
            params: StressParams::default(),
            version: 0,
        }
    }

    pub fn selected_pier(&self) -> &str {
        &self.selected_pier
    }

    pub fn params(&self) -> &StressParams {
        &self.params
    }

    /// Advances on every mutation; derivation memoization keys off it.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn set_selected_pier(&mut self, pier: impl Into<String>) {
        self.selected_pier = pier.into();
        self.version += 1;
    }

    /// Replace one factor, leaving the others untouched.
    pub fn set_load_factor(&mut self, combo: Combo, value: f64) {
        match combo {
            Combo::Gravity => self.params.load_factors.gravity = value,
            Combo::Wind => self.params.load_factors.wind = value,
            Combo::Seismic => self.params.load_factors.seismic = value,
        }
        self.version += 1;
    }

    /// Replace the pair atomically. Callers editing one bound must supply the
    /// other as well, so a concurrent read never sees a torn pair. No
    /// validation: an inverted range passes through and is rejected, if at
    /// all, at the recalculation boundary.
    pub fn set_level_range(&mut self, range: (u16, u16)) {
        self.params.level_range = range;
        self.version += 1;
    }

    /// Restore default parameters. Leaves the pier selection alone.
    pub fn reset_params(&mut self) {
        self.params = StressParams::default();
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_first_pier_and_unit_factors() {
        let store = DashboardStore::new();
        assert_eq!(store.selected_pier(), "P1");
        assert_eq!(store.params().load_factors.gravity, 1.0);
        assert_eq!(store.params().load_factors.wind, 1.0);
        assert_eq!(store.params().load_factors.seismic, 1.0);
        assert_eq!(store.params().level_range, (1, 200));
    }

    #[test]
    fn set_load_factor_leaves_other_factors_untouched() {
        let mut store = DashboardStore::new();
        store.set_load_factor(Combo::Wind, 1.6);
        assert_eq!(store.params().load_factors.gravity, 1.0);
        assert_eq!(store.params().load_factors.wind, 1.6);
        assert_eq!(store.params().load_factors.seismic, 1.0);
    }

    #[test]
    fn out_of_domain_range_passes_through() {
        let mut store = DashboardStore::new();
        store.set_level_range((50, 10));
        assert_eq!(store.params().level_range, (50, 10));
    }

    #[test]
    fn reset_restores_defaults_regardless_of_history() {
        let mut store = DashboardStore::new();
        store.set_load_factor(Combo::Gravity, 1.9);
        store.set_load_factor(Combo::Seismic, 0.5);
        store.set_level_range((3, 77));
        store.set_selected_pier("P4");
        store.reset_params();
        assert_eq!(store.params(), &StressParams::default());
        // Pier selection is independent of the parameter envelope.
        assert_eq!(store.selected_pier(), "P4");
    }

    #[test]
    fn every_mutation_advances_the_version() {
        let mut store = DashboardStore::new();
        let v0 = store.version();
        store.set_selected_pier("P2");
        store.set_load_factor(Combo::Wind, 1.1);
        store.set_level_range((1, 50));
        store.reset_params();
        assert_eq!(store.version(), v0 + 4);
    }
}
