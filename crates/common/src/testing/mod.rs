//! Testing utilities
//!
//! - [`assert_within_percent`]: relative tolerance checks for computed
//!   distances
//! - [`assert_eventually_async!`](crate::assert_eventually_async): poll an
//!   async predicate until it holds or a timeout elapses

// Test helpers panic on failure by design of assertions.
#![allow(clippy::missing_panics_doc)]

/// Assert that `actual` is within `percent` percent of `expected`.
///
/// # Examples
///
/// ```
/// use georemind_common::testing::assert_within_percent;
///
/// assert_within_percent(11_119.5, 11_120.0, 0.5);
/// ```
pub fn assert_within_percent(actual: f64, expected: f64, percent: f64) {
    let tolerance = expected.abs() * percent / 100.0;
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Values differ by more than {}%: {} vs {} (diff: {})",
        percent,
        actual,
        expected,
        diff
    );
}

/// Assert that an async condition eventually becomes true within a timeout.
///
/// ```no_run
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # async fn example() {
/// let flag = Arc::new(AtomicBool::new(true));
/// georemind_common::assert_eventually_async!(Duration::from_secs(1), async {
///     flag.load(Ordering::SeqCst)
/// });
/// # }
/// ```
#[macro_export]
macro_rules! assert_eventually_async {
    ($timeout:expr, $fut:expr) => {{
        let timeout_duration = $timeout;
        let result = tokio::time::timeout(timeout_duration, async {
            loop {
                if $fut.await {
                    break;
                }
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
        })
        .await;

        assert!(result.is_ok(), "Condition did not become true within {:?}", timeout_duration);
    }};
}
