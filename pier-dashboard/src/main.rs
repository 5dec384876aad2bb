//! Terminal front-end: composes the pipeline against a running stress
//! engine, renders the dashboard views as text, and optionally triggers one
//! recalculation from command-line parameters.
//!
//! Usage: pier-dashboard [GRAVITY WIND SEISMIC [MIN MAX]]

use pier_dashboard::surfaces::{clamp_factor, ChartPanelView, ControlsView, SummaryTableView};
use pier_dashboard::{Combo, Dashboard, DatasetStatus, HttpEngineClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pier_dashboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let engine_url =
        std::env::var("ENGINE_URL").unwrap_or_else(|_| "http://127.0.0.1:8084".to_string());
    tracing::info!("Using stress engine at {}", engine_url);

    let mut dashboard = Dashboard::new(HttpEngineClient::new(engine_url));

    let header = match dashboard.header().await {
        Ok(header) => header,
        Err(err) => {
            tracing::error!("Failed to reach the stress engine: {}", err);
            std::process::exit(1);
        }
    };
    if let Err(err) = dashboard.load_initial().await {
        tracing::error!("Failed to load stress results: {}", err);
        std::process::exit(1);
    }

    println!(
        "{}: {}-story · {} piers · {} load cases · stress = force / area\n",
        header.title, header.stories, header.piers, header.load_cases
    );

    render_summary(&dashboard.summary_table());
    render_chart(&dashboard.chart_panel());

    if let Some((factors, range)) = parse_args() {
        let store = dashboard.store_mut();
        store.set_load_factor(Combo::Gravity, clamp_factor(factors.0));
        store.set_load_factor(Combo::Wind, clamp_factor(factors.1));
        store.set_load_factor(Combo::Seismic, clamp_factor(factors.2));
        if let Some(range) = range {
            store.set_level_range(range);
        }

        println!("\nRecalculating with g={} w={} s={} ...", factors.0, factors.1, factors.2);
        if let Err(err) = dashboard.recalculate().await {
            tracing::error!("Recalculation failed: {}", err);
        }
        render_controls(&dashboard.controls());
        render_summary(&dashboard.summary_table());
        render_chart(&dashboard.chart_panel());
    }
}

/// Optional CLI parameters: three load factors, then an optional level range.
fn parse_args() -> Option<((f64, f64, f64), Option<(u16, u16)>)> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        return None;
    }
    let g = args[0].parse().ok()?;
    let w = args[1].parse().ok()?;
    let s = args[2].parse().ok()?;
    let range = if args.len() >= 5 {
        Some((args[3].parse().ok()?, args[4].parse().ok()?))
    } else {
        None
    };
    Some(((g, w, s), range))
}

fn render_summary(view: &SummaryTableView) {
    if view.status != DatasetStatus::Ready {
        println!("Summary: {:?}", view.status);
        return;
    }
    println!(
        "{:<6} {:>12} {:>14} {:>12} {:>14} {:>14}",
        "Pier", "Base Area", "Max Gravity", "Max Wind", "Max Seismic", "Overall Max"
    );
    for r in &view.rows {
        let marker = if r.selected { "*" } else { " " };
        println!(
            "{}{:<5} {:>12.2} {:>14.2} {:>12.2} {:>14.2} {:>14.2}",
            marker, r.row.pier, r.row.area, r.row.max_gravity, r.row.max_wind,
            r.row.max_seismic, r.row.max_stress
        );
    }
}

fn render_chart(view: &ChartPanelView) {
    if view.status != DatasetStatus::Ready {
        println!("Charts ({}): {:?}", view.pier, view.status);
        return;
    }
    println!("\nCharts for {}:", view.pier);
    for card in &view.cards {
        let peak = card
            .points
            .iter()
            .map(|&(stress, _)| stress)
            .fold(0.0, f64::max);
        println!(
            "  {:<8} {:>4} levels, peak stress {:>10.2} kPa  [{}]",
            card.combo.label(),
            card.points.len(),
            peak,
            card.color
        );
    }
}

fn render_controls(view: &ControlsView) {
    if let Some(err) = &view.error {
        println!("Calculation failed: {}", err);
        return;
    }
    if let Some(note) = &view.range_note {
        println!("Calculation complete.");
        if note.truncated {
            println!(
                "Note: data available only up to level {} (requested {})",
                note.effective.max, note.requested_max
            );
        }
        println!(
            "Showing levels {}-{}",
            note.effective.min, note.effective.max
        );
    }
}
