use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Trailing-edge debouncer for keystroke-driven search.
///
/// Each keystroke calls [`Debouncer::settle`]; only the call that is still
/// the newest after the window elapses reports `true` and should issue the
/// actual search. Everything this suppresses never reaches the network; it
/// does not cancel a search already in flight.
pub struct Debouncer {
    window: Duration,
    generation: AtomicU64,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: AtomicU64::new(0),
        }
    }

    /// Waits out the debounce window. Returns `true` when no newer call
    /// arrived in the meantime.
    pub async fn settle(&self) -> bool {
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.window).await;
        self.generation.load(Ordering::SeqCst) == my_generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_lone_call_settles() {
        let debouncer = Debouncer::new(Duration::from_millis(10));
        assert!(debouncer.settle().await);
    }

    #[tokio::test]
    async fn test_rapid_calls_only_newest_settles() {
        let debouncer = Arc::new(Debouncer::new(Duration::from_millis(40)));

        let first = {
            let debouncer = debouncer.clone();
            tokio::spawn(async move { debouncer.settle().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = {
            let debouncer = debouncer.clone();
            tokio::spawn(async move { debouncer.settle().await })
        };

        assert!(!first.await.unwrap());
        assert!(second.await.unwrap());
    }
}
