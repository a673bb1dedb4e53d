use std::future::Future;
use tracing::{debug, warn};

/// Run an infallible async operation, asking exactly once more when its
/// first result is unusable
///
/// The retry happens immediately. If the second result is unusable too, the
/// first one is returned.
pub async fn retry_once_while<T, F, Fut, P>(operation_name: &str, mut operation: F, needs_retry: P) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = T>,
    P: Fn(&T) -> bool,
{
    let first = operation().await;
    if !needs_retry(&first) {
        return first;
    }

    debug!("{}: Unusable result, retrying once", operation_name);
    let second = operation().await;
    if !needs_retry(&second) {
        debug!("{}: Succeeded on retry", operation_name);
        return second;
    }

    warn!("{}: Both attempts returned an unusable result", operation_name);
    first
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counting<T, G>(counter: &Arc<AtomicU32>, produce: G) -> impl FnMut() -> std::future::Ready<T>
    where
        G: Fn(u32) -> T,
    {
        let counter = counter.clone();
        move || {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(produce(attempt))
        }
    }

    #[tokio::test]
    async fn test_usable_first_result_is_not_retried() {
        let counter = Arc::new(AtomicU32::new(0));

        let result = retry_once_while(
            "test",
            counting(&counter, |_| vec![1u32]),
            |v: &Vec<u32>| v.is_empty(),
        )
        .await;

        assert_eq!(result, vec![1]);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_first_result_retries_once() {
        let counter = Arc::new(AtomicU32::new(0));

        let result = retry_once_while(
            "test",
            counting(&counter, |attempt| if attempt == 0 { Vec::new() } else { vec![7u32] }),
            |v: &Vec<u32>| v.is_empty(),
        )
        .await;

        assert_eq!(result, vec![7]);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_always_empty_stops_after_two_attempts() {
        let counter = Arc::new(AtomicU32::new(0));

        let result = retry_once_while(
            "test",
            counting(&counter, |attempt| (attempt, Vec::<u32>::new())),
            |(_, v): &(u32, Vec<u32>)| v.is_empty(),
        )
        .await;

        assert_eq!(result.0, 0);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
