use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult, ValidationError};
use crate::results::Results;
use crate::targets::{Target, Targets};

use super::{Attacker, result_capacity};

/// Attempts left and the round-robin cursor of one concurrency run.
#[derive(Debug)]
pub(super) struct AttemptBudget {
    remaining: AtomicU64,
    cursor: AtomicUsize,
}

impl AttemptBudget {
    pub(super) const fn new(count: u64) -> Self {
        Self {
            remaining: AtomicU64::new(count),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Takes one attempt from the budget; `false` once it is spent.
    pub(super) fn try_claim(&self) -> bool {
        loop {
            let current = self.remaining.load(Ordering::Relaxed);
            let Some(next) = current.checked_sub(1) else {
                return false;
            };
            if self
                .remaining
                .compare_exchange(current, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return true;
            }
        }
    }

    pub(super) fn next_index(&self, len: usize) -> usize {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed);
        idx.checked_rem(len).unwrap_or(0)
    }
}

impl Attacker {
    /// Runs exactly `count` attempts spread over `concurrency` workers.
    ///
    /// Workers share one attempt budget and one round-robin cursor over
    /// `targets`; each keeps claiming attempts until the budget is spent.
    /// `concurrency` is clamped to `count`. Results are sorted by timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error when `targets` is empty or `concurrency` is zero
    /// while attempts are requested.
    pub async fn attack_concurrency(
        &self,
        targets: &Targets,
        concurrency: u64,
        count: u64,
    ) -> AppResult<Results> {
        if targets.is_empty() {
            return Err(AppError::validation(ValidationError::EmptyTargets));
        }
        if count == 0 {
            return Ok(Results::new());
        }
        if concurrency == 0 {
            return Err(AppError::validation(ValidationError::ZeroConcurrency));
        }

        let workers = worker_count(concurrency, count);
        let targets: Arc<[Target]> = Arc::from(targets.as_slice());
        let budget = Arc::new(AttemptBudget::new(count));
        let (batch_tx, mut batch_rx) = mpsc::channel::<Results>(1);
        debug!(workers, count, "Starting fixed-concurrency attack");

        for _ in 0..workers {
            let attacker = self.clone();
            let targets = Arc::clone(&targets);
            let budget = Arc::clone(&budget);
            let batch_tx = batch_tx.clone();
            tokio::spawn(async move {
                let batch = attacker.shoot(&targets, &budget).await;
                drop(batch_tx.send(batch).await);
            });
        }
        drop(batch_tx);

        let mut results = Results::with_capacity(result_capacity(count));
        while let Some(batch) = batch_rx.recv().await {
            results.extend(batch);
        }
        if u64::try_from(results.len()).ok() != Some(count) {
            warn!(
                "Collected {} of {} attempts; some workers did not report.",
                results.len(),
                count
            );
        }
        Ok(results.sorted())
    }

    async fn shoot(&self, targets: &[Target], budget: &AttemptBudget) -> Results {
        let mut results = Results::new();
        while budget.try_claim() {
            let Some(target) = targets.get(budget.next_index(targets.len())) else {
                break;
            };
            results.push(self.hit(target).await);
        }
        results
    }
}

pub(super) fn worker_count(concurrency: u64, count: u64) -> u64 {
    concurrency.min(count)
}
