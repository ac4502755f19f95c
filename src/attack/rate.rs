use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult, ValidationError};
use crate::results::Results;
use crate::targets::{Target, Targets};

use super::{Attacker, result_capacity};

const NANOS_PER_SEC: u64 = 1_000_000_000;

impl Attacker {
    /// Launches `floor(rate * duration)` attempts, one every `1 / rate`
    /// seconds, cycling through `targets` in order.
    ///
    /// Each attempt runs on its own task, so a slow response never delays the
    /// next launch. Returns once every attempt has reported, sorted by
    /// timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error when `rate` is zero or `targets` is empty.
    pub async fn attack_rate(
        &self,
        targets: &Targets,
        rate: u64,
        duration: Duration,
    ) -> AppResult<Results> {
        if rate == 0 {
            return Err(AppError::validation(ValidationError::ZeroRate));
        }
        if targets.is_empty() {
            return Err(AppError::validation(ValidationError::EmptyTargets));
        }

        let attempts = planned_attempts(rate, duration);
        let targets: Arc<[Target]> = Arc::from(targets.as_slice());
        let (result_tx, mut result_rx) = mpsc::channel(1);
        let mut throttle = interval(pacing_interval(rate));
        debug!(attempts, rate, "Starting fixed-rate attack");

        for index in 0..attempts {
            throttle.tick().await;
            let slot = index.checked_rem(targets.len()).unwrap_or(0);
            let attacker = self.clone();
            let targets = Arc::clone(&targets);
            let result_tx = result_tx.clone();
            tokio::spawn(async move {
                let Some(target) = targets.get(slot) else {
                    return;
                };
                let result = attacker.hit(target).await;
                drop(result_tx.send(result).await);
            });
        }
        drop(result_tx);

        let planned = u64::try_from(attempts).unwrap_or(u64::MAX);
        let mut results = Results::with_capacity(result_capacity(planned));
        while let Some(result) = result_rx.recv().await {
            results.push(result);
        }
        if results.len() != attempts {
            warn!(
                "Collected {} of {} attempts; some tasks did not report.",
                results.len(),
                attempts
            );
        }
        Ok(results.sorted())
    }
}

pub(super) fn planned_attempts(rate: u64, duration: Duration) -> usize {
    let total = u128::from(rate)
        .saturating_mul(duration.as_nanos())
        .checked_div(u128::from(NANOS_PER_SEC))
        .unwrap_or(0);
    usize::try_from(total).unwrap_or(usize::MAX)
}

pub(super) fn pacing_interval(rate: u64) -> Duration {
    Duration::from_nanos(NANOS_PER_SEC.checked_div(rate).unwrap_or(1).max(1))
}
