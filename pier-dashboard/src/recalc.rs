//! Recalculation mutator: the single write path into the cache after the
//! initial fetches.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::cache::DatasetCache;
use crate::client::EngineApi;
use crate::error::EngineError;
use crate::types::{EffectiveRange, StressParams};

/// What became of one recalculation invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecalcOutcome {
    /// The cache now holds this invocation's rows.
    Applied { effective: EffectiveRange },
    /// A newer invocation was issued while this one was in flight; its
    /// response was discarded and the cache left alone.
    Superseded,
}

pub struct Recalculator<E> {
    cache: Arc<DatasetCache<E>>,
    issued: AtomicU64,
    settled: AtomicU64,
}

impl<E: EngineApi> Recalculator<E> {
    pub fn new(cache: Arc<DatasetCache<E>>) -> Self {
        Recalculator {
            cache,
            issued: AtomicU64::new(0),
            settled: AtomicU64::new(0),
        }
    }

    /// Invoke the engine's recalculation and, on success, replace the cached
    /// stress results wholesale and record the effective level range.
    ///
    /// Each invocation is stamped with a sequence number at trigger time;
    /// a response is applied only if its invocation is still the latest
    /// issued, so a late-resolving older call can never overwrite a newer
    /// one's data. On failure the cache keeps its last-good entries and the
    /// error goes to the caller alone.
    pub async fn recalculate(
        &self,
        params: &StressParams,
    ) -> Result<RecalcOutcome, EngineError> {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(
            ticket,
            min = params.level_range.0,
            max = params.level_range.1,
            "recalculation triggered"
        );

        let outcome = self.cache.engine().calculate_stress(params).await;
        self.settled.fetch_add(1, Ordering::SeqCst);

        let rows = match outcome {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!(ticket, error = %err, "recalculation failed; cache untouched");
                return Err(err);
            }
        };

        if ticket != self.issued.load(Ordering::SeqCst) {
            tracing::debug!(ticket, "discarding superseded recalculation response");
            return Ok(RecalcOutcome::Superseded);
        }

        let effective = self.cache.replace_stress_results(rows);
        Ok(RecalcOutcome::Applied { effective })
    }

    /// Whether any invocation is still pending. The presentation layer uses
    /// this to disable re-triggering from user input.
    pub fn in_flight(&self) -> bool {
        self.issued.load(Ordering::SeqCst) > self.settled.load(Ordering::SeqCst)
    }
}
