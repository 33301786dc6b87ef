//! Periodic background recompute of the current alignment.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info};

use crate::calculator::AlignmentCalculator;

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// Handle to the refresh thread. The thread stops when the handle is
/// dropped or [`AlignmentRefresher::stop`] is called.
#[derive(Debug)]
pub struct AlignmentRefresher {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    completed: Arc<AtomicU64>,
}

impl AlignmentRefresher {
    /// Start refreshing `calculator` every `interval`.
    pub fn spawn(
        calculator: Arc<AlignmentCalculator>,
        interval: Duration,
    ) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel::<()>();
        let completed = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&completed);

        let handle = thread::Builder::new()
            .name("alchm-alignment-refresh".into())
            .spawn(move || {
                info!(interval_ms = interval.as_millis() as u64, "alignment refresher started");
                loop {
                    match rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            if calculator.try_background_refresh().is_some() {
                                counter.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("alignment refresher stopped");
            })?;

        Ok(Self {
            stop: Some(tx),
            handle: Some(handle),
            completed,
        })
    }

    /// Refreshes finished so far.
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Signal the thread and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AlignmentRefresher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::CalculatorConfig;
    use alchm_ephemeris::PositionChain;
    use alchm_time::SystemClock;

    #[test]
    fn refreshes_until_stopped() {
        let clock = Arc::new(SystemClock);
        let chain = Arc::new(PositionChain::new(clock.clone()));
        let calc = Arc::new(
            AlignmentCalculator::new(CalculatorConfig::default(), clock, chain).unwrap(),
        );
        let refresher = AlignmentRefresher::spawn(Arc::clone(&calc), Duration::from_millis(5))
            .unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while refresher.completed() < 2 && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        let done = refresher.completed();
        refresher.stop();

        assert!(done >= 2, "completed {done}");
        assert!(calc.cached().is_some());
        assert!(calc.stats().computations >= 2);
    }
}
