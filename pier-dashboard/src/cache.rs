//! Remote dataset cache.
//!
//! Each of the three engine datasets is fetched exactly once on first read
//! and then served from memory until it is explicitly replaced. There is no
//! timer-based expiry: staleness is controlled by replacement alone. A fetch
//! failure parks the slot in a terminal failed state that every later read
//! reports without re-issuing the request; the retry policy belongs to the
//! caller, which clears the slot with [`DatasetCache::reset_failed`].

use std::future::Future;
use std::sync::{Arc, RwLock};

use tokio::sync::{watch, Mutex as AsyncMutex};

use crate::client::EngineApi;
use crate::error::EngineError;
use crate::types::{EffectiveRange, Force, Section, StressResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Sections,
    Forces,
    StressResults,
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DatasetKind::Sections => "sections",
            DatasetKind::Forces => "forces",
            DatasetKind::StressResults => "stress_results",
        };
        f.write_str(name)
    }
}

/// Loading-vs-error tri-state a presentation surface can render from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetStatus {
    NotLoaded,
    Ready,
    Failed,
}

enum SlotState<T> {
    Empty,
    Ready { data: Arc<Vec<T>>, version: u64 },
    Failed { message: String },
}

struct Slot<T> {
    state: RwLock<SlotState<T>>,
    // Serializes fetchers: concurrent first reads queue here, and whoever
    // enters after the winner finds the slot filled on re-check.
    flight: AsyncMutex<()>,
}

impl<T> Slot<T> {
    fn new() -> Self {
        Slot {
            state: RwLock::new(SlotState::Empty),
            flight: AsyncMutex::new(()),
        }
    }

    fn peek(&self, kind: DatasetKind) -> Result<Option<Arc<Vec<T>>>, EngineError> {
        match &*self.state.read().expect("cache lock poisoned") {
            SlotState::Empty => Ok(None),
            SlotState::Ready { data, .. } => Ok(Some(Arc::clone(data))),
            SlotState::Failed { message } => Err(EngineError::DatasetFailed {
                kind,
                message: message.clone(),
            }),
        }
    }

    fn status(&self) -> DatasetStatus {
        match &*self.state.read().expect("cache lock poisoned") {
            SlotState::Empty => DatasetStatus::NotLoaded,
            SlotState::Ready { .. } => DatasetStatus::Ready,
            SlotState::Failed { .. } => DatasetStatus::Failed,
        }
    }

    fn version(&self) -> u64 {
        match &*self.state.read().expect("cache lock poisoned") {
            SlotState::Ready { version, .. } => *version,
            _ => 0,
        }
    }

    /// Store a first-fetch result unless a replacement landed while the
    /// fetch was in flight; the replacement is newer and wins.
    fn store_if_absent(&self, data: Vec<T>) -> Arc<Vec<T>> {
        let mut state = self.state.write().expect("cache lock poisoned");
        match &*state {
            SlotState::Ready { data, .. } => Arc::clone(data),
            _ => {
                let arc = Arc::new(data);
                *state = SlotState::Ready {
                    data: Arc::clone(&arc),
                    version: 1,
                };
                arc
            }
        }
    }

    fn fail_if_absent(&self, message: String) {
        let mut state = self.state.write().expect("cache lock poisoned");
        if !matches!(&*state, SlotState::Ready { .. }) {
            *state = SlotState::Failed { message };
        }
    }

    /// Wholesale replacement; readers holding the old `Arc` keep a complete
    /// old snapshot, new readers get the complete new one.
    fn replace(&self, data: Vec<T>) -> u64 {
        let mut state = self.state.write().expect("cache lock poisoned");
        let version = match &*state {
            SlotState::Ready { version, .. } => version + 1,
            _ => 1,
        };
        *state = SlotState::Ready {
            data: Arc::new(data),
            version,
        };
        version
    }

    fn clear_failed(&self) {
        let mut state = self.state.write().expect("cache lock poisoned");
        if matches!(&*state, SlotState::Failed { .. }) {
            *state = SlotState::Empty;
        }
    }
}

/// Owns the engine client and one slot per dataset kind, plus the derived
/// effective-range entry that rides along with stress replacements.
pub struct DatasetCache<E> {
    engine: E,
    sections: Slot<Section>,
    forces: Slot<Force>,
    stress: Slot<StressResult>,
    effective_range: RwLock<Option<EffectiveRange>>,
    changed: watch::Sender<u64>,
}

impl<E: EngineApi> DatasetCache<E> {
    pub fn new(engine: E) -> Self {
        let (changed, _) = watch::channel(0);
        DatasetCache {
            engine,
            sections: Slot::new(),
            forces: Slot::new(),
            stress: Slot::new(),
            effective_range: RwLock::new(None),
            changed,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Subscribers see the counter advance whenever any entry is replaced.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    fn notify(&self) {
        self.changed.send_modify(|epoch| *epoch += 1);
    }

    pub async fn sections(&self) -> Result<Arc<Vec<Section>>, EngineError> {
        self.read_through(DatasetKind::Sections, &self.sections, || {
            self.engine.get_sections()
        })
        .await
    }

    pub async fn forces(&self) -> Result<Arc<Vec<Force>>, EngineError> {
        self.read_through(DatasetKind::Forces, &self.forces, || {
            self.engine.get_forces()
        })
        .await
    }

    pub async fn stress_results(&self) -> Result<Arc<Vec<StressResult>>, EngineError> {
        self.read_through(DatasetKind::StressResults, &self.stress, || {
            self.engine.get_stress_results()
        })
        .await
    }

    async fn read_through<T, F, Fut>(
        &self,
        kind: DatasetKind,
        slot: &Slot<T>,
        fetch: F,
    ) -> Result<Arc<Vec<T>>, EngineError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, EngineError>>,
    {
        if let Some(hit) = slot.peek(kind)? {
            return Ok(hit);
        }

        let _flight = slot.flight.lock().await;
        // The winner of the flight lock may have filled the slot (or parked
        // it as failed) while we waited.
        if let Some(hit) = slot.peek(kind)? {
            return Ok(hit);
        }

        tracing::debug!(dataset = %kind, "fetching dataset from engine");
        match fetch().await {
            Ok(data) => {
                tracing::info!(dataset = %kind, rows = data.len(), "dataset loaded");
                let arc = slot.store_if_absent(data);
                self.notify();
                Ok(arc)
            }
            Err(err) => {
                tracing::warn!(dataset = %kind, error = %err, "dataset fetch failed");
                slot.fail_if_absent(err.to_string());
                Err(err)
            }
        }
    }

    /// Synchronous view of the already-cached stress rows, if any. Never
    /// triggers a fetch; surfaces use it together with [`Self::status`].
    pub fn stress_snapshot(&self) -> Option<Arc<Vec<StressResult>>> {
        match &*self.stress.state.read().expect("cache lock poisoned") {
            SlotState::Ready { data, .. } => Some(Arc::clone(data)),
            _ => None,
        }
    }

    pub fn status(&self, kind: DatasetKind) -> DatasetStatus {
        match kind {
            DatasetKind::Sections => self.sections.status(),
            DatasetKind::Forces => self.forces.status(),
            DatasetKind::StressResults => self.stress.status(),
        }
    }

    /// Version of the stress entry; advances on every replacement. Zero
    /// means not loaded yet.
    pub fn stress_version(&self) -> u64 {
        self.stress.version()
    }

    /// The level span actually present in the latest stress-result set.
    /// Absent until the first successful recalculation stores it.
    pub fn effective_range(&self) -> Option<EffectiveRange> {
        *self.effective_range.read().expect("cache lock poisoned")
    }

    /// Clear a terminal failed state so the owner of the retry policy can
    /// trigger a fresh fetch. A no-op for slots that are empty or ready.
    pub fn reset_failed(&self, kind: DatasetKind) {
        match kind {
            DatasetKind::Sections => self.sections.clear_failed(),
            DatasetKind::Forces => self.forces.clear_failed(),
            DatasetKind::StressResults => self.stress.clear_failed(),
        }
    }

    /// Atomically supersede the stress entry and its derived range. The only
    /// write path into the cache after the initial fetches.
    pub(crate) fn replace_stress_results(&self, rows: Vec<StressResult>) -> EffectiveRange {
        let range = EffectiveRange::of(&rows);
        let version = self.stress.replace(rows);
        *self.effective_range.write().expect("cache lock poisoned") = Some(range);
        tracing::info!(
            version,
            min = range.min,
            max = range.max,
            "stress results replaced"
        );
        self.notify();
        range
    }
}
