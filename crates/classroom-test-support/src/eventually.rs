//! Retry helper for reads against eventually consistent read models.

use std::future::Future;
use std::time::Duration;

const ATTEMPTS: u32 = 200;
const INTERVAL: Duration = Duration::from_millis(10);

/// Polls `probe` until it yields `Some`, sleeping between attempts.
///
/// # Panics
///
/// Panics if `probe` still yields `None` after about two seconds.
pub async fn eventually<T, F, Fut>(mut probe: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for _ in 0..ATTEMPTS {
        if let Some(value) = probe().await {
            return value;
        }
        tokio::time::sleep(INTERVAL).await;
    }
    panic!("condition not met after {ATTEMPTS} attempts");
}
