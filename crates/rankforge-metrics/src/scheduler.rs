//! Batched concurrent fan-out over a keyword list.
//!
//! Keywords are split into contiguous batches. Everything in a batch is
//! awaited together; batches run one after another with a fixed delay in
//! between, which is the only throttle against provider rate limits.
//! Output order always matches input order.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use rankforge_core::{BatchConfig, KeywordMetric};
use tokio::time::{Instant, sleep_until, timeout_at};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct BatchScheduler {
    batch_size: usize,
    delay: Duration,
    deadline: Option<Instant>,
}

/// Reported after each finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based.
    pub batch: usize,
    pub total_batches: usize,
    pub completed: usize,
    pub total: usize,
}

impl BatchProgress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (self.completed * 100 / self.total) as u8
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// One metric per processed keyword, in input order.
    pub metrics: Vec<KeywordMetric>,
    /// True when the deadline stopped the run before every batch finished.
    pub partial: bool,
}

impl BatchScheduler {
    /// A `batch_size` of 0 is treated as 1.
    pub fn new(batch_size: usize, delay: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            delay,
            deadline: None,
        }
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        Self::new(config.batch_size, config.inter_batch_delay())
    }

    /// Stop scheduling batches once `deadline` passes.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Run `worker` over every keyword, `batch_size` at a time.
    ///
    /// Without a deadline the result holds exactly one metric per keyword.
    /// With one, a batch still in flight at the deadline is dropped and the
    /// completed prefix is returned with `partial = true`.
    pub async fn run_batched<F, Fut>(
        &self,
        keywords: &[String],
        worker: F,
        mut on_batch: impl FnMut(BatchProgress),
    ) -> BatchOutcome
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = KeywordMetric>,
    {
        let total = keywords.len();
        let total_batches = total.div_ceil(self.batch_size);
        let mut metrics = Vec::with_capacity(total);

        for (i, batch) in keywords.chunks(self.batch_size).enumerate() {
            if i > 0 && !self.delay.is_zero() {
                let wake = Instant::now() + self.delay;
                // The pause between batches never outlasts the deadline.
                sleep_until(self.deadline.map_or(wake, |d| wake.min(d))).await;
            }

            if let Some(deadline) = self.deadline
                && Instant::now() >= deadline
            {
                warn!(
                    batch = i + 1,
                    total_batches,
                    completed = metrics.len(),
                    "deadline reached before batch"
                );
                return BatchOutcome {
                    metrics,
                    partial: true,
                };
            }

            let started = Instant::now();
            let tasks = join_all(batch.iter().map(|kw| worker(kw.clone())));
            let results = match self.deadline {
                Some(deadline) => match timeout_at(deadline, tasks).await {
                    Ok(results) => results,
                    Err(_) => {
                        warn!(
                            batch = i + 1,
                            total_batches,
                            completed = metrics.len(),
                            "deadline reached during batch"
                        );
                        return BatchOutcome {
                            metrics,
                            partial: true,
                        };
                    }
                },
                None => tasks.await,
            };
            metrics.extend(results);

            let progress = BatchProgress {
                batch: i + 1,
                total_batches,
                completed: metrics.len(),
                total,
            };
            info!(
                batch = progress.batch,
                total_batches,
                completed = progress.completed,
                total,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "batch complete"
            );
            on_batch(progress);
        }

        BatchOutcome {
            metrics,
            partial: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::tests::{StubDifficulty, StubVolume, all_creds, gateway};
    use rankforge_core::MetricSource;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    fn keywords(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("kw{i}")).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn preserves_order_when_completion_is_reversed() {
        let kws = keywords(7);
        let scheduler = BatchScheduler::new(5, Duration::ZERO);
        let out = scheduler
            .run_batched(
                &kws,
                |kw| async move {
                    let n: u64 = kw.trim_start_matches("kw").parse().unwrap();
                    // Later keywords finish first.
                    sleep(Duration::from_millis(100 - n * 10)).await;
                    KeywordMetric::neutral(kw)
                },
                |_| {},
            )
            .await;
        let got: Vec<&str> = out.metrics.iter().map(|m| m.keyword.as_str()).collect();
        assert_eq!(got, vec!["kw0", "kw1", "kw2", "kw3", "kw4", "kw5", "kw6"]);
        assert!(!out.partial);
    }

    #[tokio::test(start_paused = true)]
    async fn at_most_batch_size_in_flight() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut batches = Vec::new();

        let scheduler = BatchScheduler::new(2, Duration::from_millis(10));
        let out = scheduler
            .run_batched(
                &keywords(5),
                |kw| {
                    let in_flight = in_flight.clone();
                    let peak = peak.clone();
                    async move {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        sleep(Duration::from_millis(5)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        KeywordMetric::neutral(kw)
                    }
                },
                |p| batches.push(p),
            )
            .await;

        assert_eq!(out.metrics.len(), 5);
        assert_eq!(peak.load(Ordering::SeqCst), 2);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[2].completed, 5);
        assert_eq!(batches[2].percent(), 100);
        assert_eq!(batches[0].total_batches, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_only_between_batches() {
        let start = Instant::now();
        let scheduler = BatchScheduler::new(5, Duration::from_millis(1000));
        let out = scheduler
            .run_batched(
                &keywords(15),
                |kw| async move { KeywordMetric::neutral(kw) },
                |_| {},
            )
            .await;
        assert_eq!(out.metrics.len(), 15);
        // Three batches, two gaps.
        assert_eq!(start.elapsed(), Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn empty_input() {
        let scheduler = BatchScheduler::new(5, Duration::from_millis(1000));
        let mut calls = 0;
        let out = scheduler
            .run_batched(
                &[],
                |kw| async move { KeywordMetric::neutral(kw) },
                |_| calls += 1,
            )
            .await;
        assert!(out.metrics.is_empty());
        assert!(!out.partial);
        assert_eq!(calls, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_returns_completed_prefix() {
        let deadline = Instant::now() + Duration::from_millis(1500);
        let scheduler = BatchScheduler::new(1, Duration::from_millis(1000)).with_deadline(deadline);
        let out = scheduler
            .run_batched(
                &keywords(4),
                |kw| async move { KeywordMetric::neutral(kw) },
                |_| {},
            )
            .await;
        assert!(out.partial);
        let got: Vec<&str> = out.metrics.iter().map(|m| m.keyword.as_str()).collect();
        assert_eq!(got, vec!["kw0", "kw1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn inter_batch_delay_cut_short_by_deadline() {
        let start = Instant::now();
        let deadline = start + Duration::from_millis(100);
        let scheduler = BatchScheduler::new(1, Duration::from_secs(30)).with_deadline(deadline);
        let out = scheduler
            .run_batched(
                &keywords(3),
                |kw| async move { KeywordMetric::neutral(kw) },
                |_| {},
            )
            .await;
        assert!(out.partial);
        assert_eq!(out.metrics.len(), 1);
        assert_eq!(start.elapsed(), Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_drops_batch_in_flight() {
        let deadline = Instant::now() + Duration::from_millis(50);
        let scheduler = BatchScheduler::new(3, Duration::ZERO).with_deadline(deadline);
        let out = scheduler
            .run_batched(
                &keywords(3),
                |kw| async move {
                    sleep(Duration::from_secs(10)).await;
                    KeywordMetric::neutral(kw)
                },
                |_| {},
            )
            .await;
        assert!(out.partial);
        assert!(out.metrics.is_empty());
    }

    #[tokio::test]
    async fn every_provider_failing_still_yields_one_metric_per_keyword() {
        let gw = gateway(StubVolume::failing(), StubDifficulty::failing());
        let scheduler = BatchScheduler::new(2, Duration::ZERO);
        let kws = keywords(5);
        let out = gw
            .collect(&kws, "United States", &all_creds(), &scheduler, |_| {})
            .await;
        assert_eq!(out.metrics.len(), kws.len());
        for (m, kw) in out.metrics.iter().zip(&kws) {
            assert_eq!(&m.keyword, kw);
            assert_eq!(m.source, MetricSource::NeutralDefault);
            assert_eq!(m.volume, 0);
            assert_eq!(m.competition, 50.0);
            assert_eq!(m.difficulty, 50.0);
        }
    }

    #[test]
    fn zero_batch_size_clamped() {
        assert_eq!(BatchScheduler::new(0, Duration::ZERO).batch_size(), 1);
    }
}
