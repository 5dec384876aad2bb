//! Presentation surfaces, as contracts: pure builders from (selection
//! state, cache status, derivation outputs) to plain view structs. None of
//! these own data; front-ends render the structs however they like.

use crate::cache::DatasetStatus;
use crate::derive::{ComboSeries, SummaryRow};
use crate::types::{Combo, EffectiveRange, Force, LoadFactors, Section, StressParams, PIERS};

/// Load factor edit domain. Enforced here at the edit boundary only; the
/// pipeline itself passes any value through.
pub const FACTOR_MIN: f64 = 0.5;
pub const FACTOR_MAX: f64 = 2.0;

pub fn clamp_factor(value: f64) -> f64 {
    value.clamp(FACTOR_MIN, FACTOR_MAX)
}

/// Colour per combination, distinct and readable.
pub fn combo_color(combo: Combo) -> &'static str {
    match combo {
        Combo::Gravity => "#f59e0b",
        Combo::Wind => "#3b82f6",
        Combo::Seismic => "#ef4444",
    }
}

/// Dashboard header line: building shape summary from the static datasets.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    pub title: &'static str,
    pub stories: u16,
    pub piers: usize,
    pub load_cases: usize,
}

pub fn header(sections: &[Section], forces: &[Force]) -> HeaderView {
    HeaderView {
        title: "Pier Stress Dashboard",
        stories: sections.iter().map(|s| s.level).max().unwrap_or(0),
        piers: PIERS.len(),
        load_cases: forces.len(),
    }
}

/// The selector writes only `selected_pier`; everything else is read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct PierSelectorView {
    pub piers: [&'static str; 5],
    pub selected: String,
}

pub fn pier_selector(selected: &str) -> PierSelectorView {
    PierSelectorView {
        piers: PIERS,
        selected: selected.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartCard {
    pub combo: Combo,
    pub color: &'static str,
    /// (stress, level) pairs, already sorted ascending by level.
    pub points: Vec<(f64, u16)>,
}

/// Three cards, one per combination, for the selected pier. `cards` is
/// empty unless `status` is `Ready`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPanelView {
    pub status: DatasetStatus,
    pub pier: String,
    pub cards: Vec<ChartCard>,
}

pub fn chart_panel(status: DatasetStatus, pier: &str, series: &[ComboSeries]) -> ChartPanelView {
    let cards = match status {
        DatasetStatus::Ready => series
            .iter()
            .map(|s| ChartCard {
                combo: s.combo,
                color: combo_color(s.combo),
                points: s.points.clone(),
            })
            .collect(),
        _ => Vec::new(),
    };
    ChartPanelView {
        status,
        pier: pier.to_string(),
        cards,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRowView {
    pub row: SummaryRow,
    pub selected: bool,
}

/// One row per enumerated pier; clicking a row selects that pier.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTableView {
    pub status: DatasetStatus,
    pub rows: Vec<SummaryRowView>,
}

pub fn summary_table(
    status: DatasetStatus,
    rows: &[SummaryRow],
    selected: &str,
) -> SummaryTableView {
    SummaryTableView {
        status,
        rows: rows
            .iter()
            .map(|row| SummaryRowView {
                row: row.clone(),
                selected: row.pier == selected,
            })
            .collect(),
    }
}

/// Shown after a successful recalculation: the range actually returned, and
/// whether the engine truncated the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeNote {
    pub effective: EffectiveRange,
    pub requested_max: u16,
    pub truncated: bool,
}

/// Parameter controls: echo of the editable params, the in-flight flag that
/// disables re-triggering, and the outcome of the latest recalculation.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlsView {
    pub load_factors: LoadFactors,
    pub level_range: (u16, u16),
    pub busy: bool,
    pub error: Option<String>,
    pub range_note: Option<RangeNote>,
}

pub fn controls(
    params: &StressParams,
    busy: bool,
    last_error: Option<String>,
    effective: Option<EffectiveRange>,
) -> ControlsView {
    let range_note = effective.map(|effective| RangeNote {
        effective,
        requested_max: params.level_range.1,
        truncated: effective.max < params.level_range.1,
    });
    ControlsView {
        load_factors: params.load_factors.clone(),
        level_range: params.level_range,
        busy,
        error: last_error,
        range_note,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_editing_clamps_to_domain() {
        assert_eq!(clamp_factor(0.1), FACTOR_MIN);
        assert_eq!(clamp_factor(3.0), FACTOR_MAX);
        assert_eq!(clamp_factor(1.3), 1.3);
    }

    #[test]
    fn truncation_note_fires_when_engine_returned_less() {
        let params = StressParams {
            level_range: (1, 200),
            ..StressParams::default()
        };
        let view = controls(
            &params,
            false,
            None,
            Some(EffectiveRange { min: 1, max: 100 }),
        );
        let note = view.range_note.unwrap();
        assert!(note.truncated);
        assert_eq!(note.effective, EffectiveRange { min: 1, max: 100 });
        assert_eq!(note.requested_max, 200);
    }

    #[test]
    fn no_note_before_first_recalculation() {
        let view = controls(&StressParams::default(), false, None, None);
        assert!(view.range_note.is_none());
    }

    #[test]
    fn chart_panel_is_empty_while_loading() {
        let view = chart_panel(DatasetStatus::NotLoaded, "P1", &[]);
        assert_eq!(view.status, DatasetStatus::NotLoaded);
        assert!(view.cards.is_empty());
    }
}
