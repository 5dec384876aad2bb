//! Composition root: one `Dashboard` owns the store, cache, mutator and
//! derivations, created at startup and injected into front-ends by
//! reference. No ambient globals.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::cache::{DatasetCache, DatasetKind, DatasetStatus};
use crate::client::EngineApi;
use crate::derive::Derivations;
use crate::error::EngineError;
use crate::recalc::{RecalcOutcome, Recalculator};
use crate::store::DashboardStore;
use crate::surfaces::{
    chart_panel, controls, header, pier_selector, summary_table, ChartPanelView, ControlsView,
    HeaderView, PierSelectorView, SummaryTableView,
};
use crate::types::StressParams;

pub struct Dashboard<E: EngineApi> {
    store: DashboardStore,
    cache: Arc<DatasetCache<E>>,
    recalc: Recalculator<E>,
    derived: Derivations,
    last_error: Mutex<Option<String>>,
}

impl<E: EngineApi> Dashboard<E> {
    pub fn new(engine: E) -> Self {
        let cache = Arc::new(DatasetCache::new(engine));
        let recalc = Recalculator::new(Arc::clone(&cache));
        Dashboard {
            store: DashboardStore::new(),
            cache,
            recalc,
            derived: Derivations::new(),
            last_error: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &DashboardStore {
        &self.store
    }

    /// Selection-state writes go through here; only the selector and the
    /// parameter controls should use it.
    pub fn store_mut(&mut self) -> &mut DashboardStore {
        &mut self.store
    }

    pub fn cache(&self) -> &DatasetCache<E> {
        &self.cache
    }

    /// Change notifications: the counter advances whenever a cache entry is
    /// replaced, telling front-ends to re-read their views.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.cache.subscribe()
    }

    /// Warm all three datasets. Sequential: the header needs the first two
    /// anyway, and first-fetch coalescing makes repeats free.
    pub async fn load_initial(&self) -> Result<(), EngineError> {
        self.cache.sections().await?;
        self.cache.forces().await?;
        self.cache.stress_results().await?;
        Ok(())
    }

    pub async fn header(&self) -> Result<HeaderView, EngineError> {
        let sections = self.cache.sections().await?;
        let forces = self.cache.forces().await?;
        Ok(header(&sections, &forces))
    }

    pub fn pier_selector(&self) -> PierSelectorView {
        pier_selector(self.store.selected_pier())
    }

    pub fn chart_panel(&self) -> ChartPanelView {
        let status = self.cache.status(DatasetKind::StressResults);
        let pier = self.store.selected_pier();
        match self.cache.stress_snapshot() {
            Some(rows) => {
                let series = self
                    .derived
                    .chart_for(&rows, self.cache.stress_version(), pier);
                chart_panel(status, pier, &series)
            }
            None => chart_panel(status, pier, &[]),
        }
    }

    pub fn summary_table(&self) -> SummaryTableView {
        let status = self.cache.status(DatasetKind::StressResults);
        match self.cache.stress_snapshot() {
            Some(rows) => {
                let summary = self.derived.summary_for(&rows, self.cache.stress_version());
                summary_table(status, &summary, self.store.selected_pier())
            }
            None => summary_table(status, &[], self.store.selected_pier()),
        }
    }

    pub fn controls(&self) -> ControlsView {
        let last_error = self.last_error.lock().expect("app lock poisoned").clone();
        controls(
            self.store.params(),
            self.recalc.in_flight(),
            last_error,
            self.cache.effective_range(),
        )
    }

    pub fn recalc_in_flight(&self) -> bool {
        self.recalc.in_flight()
    }

    /// Trigger a recalculation with the store's current parameters.
    pub async fn recalculate(&self) -> Result<RecalcOutcome, EngineError> {
        let params = self.store.params().clone();
        self.recalculate_with(&params).await
    }

    pub async fn recalculate_with(
        &self,
        params: &StressParams,
    ) -> Result<RecalcOutcome, EngineError> {
        match self.recalc.recalculate(params).await {
            Ok(outcome) => {
                *self.last_error.lock().expect("app lock poisoned") = None;
                Ok(outcome)
            }
            Err(err) => {
                *self.last_error.lock().expect("app lock poisoned") = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn dataset_status(&self, kind: DatasetKind) -> DatasetStatus {
        self.cache.status(kind)
    }
}
