use crate::session::TrackedFrame;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Shared count of stop requests
///
/// The first request ends the live pass. Later stages remember the count they
/// started with and end as soon as a newer request arrives.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicUsize>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.requests() > 0
    }

    /// Number of stop requests so far
    pub fn requests(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// Whether a request arrived after `seen` requests had been counted
    pub fn raised_since(&self, seen: usize) -> bool {
        self.requests() > seen
    }
}

/// Raises `stop` on every Ctrl-C; must be called from within the tokio runtime
pub fn spawn_ctrl_c_listener(stop: StopSignal) {
    tokio::spawn(async move {
        loop {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    stop.raise();
                    info!("Ctrl-C received ({}), finishing the current stage", stop.requests());
                }
                Err(e) => {
                    warn!("cannot listen for Ctrl-C: {}", e);
                    break;
                }
            }
        }
    });
}

/// Prints the per-frame debug information shared by all processors
pub fn print_default_debug_info(index: usize, tracked: &TrackedFrame) {
    debug!("--------------------------------");
    debug!("frame: {}", index);
    debug!("detection: {:?}", tracked.detection);
    debug!("trail segments: {}", tracked.segments);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_signal_is_shared_between_clones() {
        let stop = StopSignal::new();
        let other = stop.clone();
        assert!(!other.is_raised());
        stop.raise();
        assert!(other.is_raised());
    }

    #[test]
    fn test_every_request_is_counted() {
        let stop = StopSignal::new();
        stop.raise();
        let seen = stop.requests();
        assert!(!stop.raised_since(seen));
        stop.clone().raise();
        assert_eq!(stop.requests(), 2);
        assert!(stop.raised_since(seen));
    }

    #[tokio::test]
    async fn test_listener_does_not_raise_on_its_own() {
        let stop = StopSignal::new();
        spawn_ctrl_c_listener(stop.clone());
        tokio::task::yield_now().await;
        assert!(!stop.is_raised());
    }
}
