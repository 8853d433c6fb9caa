use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Result of a debounced call.
#[derive(Debug, Clone, PartialEq)]
pub enum Debounced<T> {
    Fresh(T),
    /// A newer call arrived; this one was dropped or its result discarded.
    Superseded,
}

/// Collapses bursts of searches into one fetch for the latest query.
///
/// Every call takes a ticket and waits out the window. Only the holder of the newest
/// ticket fetches, and its result is returned only if no newer call arrived while the
/// fetch was in flight, so results never land out of order.
#[derive(Debug)]
pub struct SearchDebouncer {
    window: Duration,
    generation: AtomicU64,
}

impl SearchDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: AtomicU64::new(0),
        }
    }

    pub async fn run<F, Fut, T, E>(&self, fetch: F) -> Result<Debounced<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.window).await;
        if !self.is_current(ticket) {
            return Ok(Debounced::Superseded);
        }

        let result = fetch().await;
        if !self.is_current(ticket) {
            // Errors from a replaced query are dropped along with its results.
            return Ok(Debounced::Superseded);
        }
        result.map(Debounced::Fresh)
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    use crate::upstream::fake::FakeBackend;
    use crate::upstream::StudioBackend;

    #[tokio::test(start_paused = true)]
    async fn test_shoe_then_shoes_fetches_once_for_shoes() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(500));
        let backend = FakeBackend::default();

        let first = debouncer.run(|| backend.search_products("shop-1", "shoe", 20));
        let second = async {
            sleep(Duration::from_millis(200)).await;
            debouncer
                .run(|| backend.search_products("shop-1", "shoes", 20))
                .await
        };
        let (first, second) = tokio::join!(first, second);

        assert!(matches!(first, Ok(Debounced::Superseded)));
        assert!(matches!(second, Ok(Debounced::Fresh(_))));
        assert_eq!(backend.calls(), vec!["search:shoes"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_outside_window_both_fetch() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(500));
        let backend = FakeBackend::default();

        let first = debouncer
            .run(|| backend.search_products("shop-1", "shoe", 20))
            .await;
        let second = debouncer
            .run(|| backend.search_products("shop-1", "shoes", 20))
            .await;

        assert!(matches!(first, Ok(Debounced::Fresh(_))));
        assert!(matches!(second, Ok(Debounced::Fresh(_))));
        assert_eq!(backend.calls(), vec!["search:shoe", "search:shoes"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_slow_response_is_discarded() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(500));

        let slow = debouncer.run(|| async {
            sleep(Duration::from_millis(1000)).await;
            Ok::<_, ()>("old results")
        });
        let fast = async {
            // Arrives while the first fetch is still in flight.
            sleep(Duration::from_millis(700)).await;
            debouncer.run(|| async { Ok::<_, ()>("new results") }).await
        };
        let (slow, fast) = tokio::join!(slow, fast);

        assert_eq!(slow, Ok(Debounced::Superseded));
        assert_eq!(fast, Ok(Debounced::Fresh("new results")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_slow_error_is_discarded() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(500));

        let slow = debouncer.run(|| async {
            sleep(Duration::from_millis(1000)).await;
            Err::<&str, _>("catalog timeout for 'shoe'")
        });
        let fast = async {
            sleep(Duration::from_millis(700)).await;
            debouncer.run(|| async { Ok::<_, &str>("shoes results") }).await
        };
        let (slow, fast) = tokio::join!(slow, fast);

        assert_eq!(slow, Ok(Debounced::Superseded));
        assert_eq!(fast, Ok(Debounced::Fresh("shoes results")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_error_is_returned() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(500));
        let result = debouncer
            .run(|| async { Err::<(), _>("catalog down") })
            .await;
        assert_eq!(result, Err("catalog down"));
    }
}
