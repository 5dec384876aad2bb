//! Client-side reactive data pipeline for the pier stress dashboard.
//!
//! The engine producing the numbers is a remote collaborator; this crate
//! owns everything between its wire responses and the rendered views: a
//! memoizing dataset cache, the recalculation mutator that supersedes the
//! cached results, pure derivations for the chart and summary projections,
//! and the view-model contracts the presentation surfaces consume.

pub mod app;
pub mod cache;
pub mod client;
pub mod derive;
pub mod error;
pub mod recalc;
pub mod store;
pub mod surfaces;
pub mod types;

pub use app::Dashboard;
pub use cache::{DatasetCache, DatasetKind, DatasetStatus};
pub use client::{EngineApi, HttpEngineClient};
pub use error::EngineError;
pub use recalc::{RecalcOutcome, Recalculator};
pub use store::DashboardStore;
pub use types::{
    Combo, EffectiveRange, Force, LoadFactors, Section, StressParams, StressResult, PIERS,
};
