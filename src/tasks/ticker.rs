//! Cancellable periodic countdown task

use std::time::Duration;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Spawn a countdown that calls `on_tick` with the time left, once
/// immediately and then every `period`, and `on_complete` once when
/// `duration` has elapsed.
///
/// The time left passed to `on_tick` is measured against a fixed deadline,
/// so late ticks never accumulate drift. Cancelling the returned token stops
/// the task; neither callback runs after the task observes cancellation.
/// Cancelling is idempotent.
///
/// Must be called from within a tokio runtime.
pub fn spawn_countdown<T, C>(
    duration: Duration,
    period: Duration,
    mut on_tick: T,
    on_complete: C,
) -> CancellationToken
where
    T: FnMut(Duration) + Send + 'static,
    C: FnOnce() + Send + 'static,
{
    let token = CancellationToken::new();
    let cancelled = token.clone();

    let start = Instant::now();
    let deadline = start + duration;

    tokio::spawn(async move {
        let mut ticks = interval_at(start, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let expiry = sleep_until(deadline);
        tokio::pin!(expiry);

        loop {
            tokio::select! {
                biased;

                _ = cancelled.cancelled() => {
                    debug!("Countdown cancelled");
                    return;
                }

                _ = &mut expiry => {
                    debug!("Countdown reached its deadline");
                    on_complete();
                    return;
                }

                _ = ticks.tick() => {
                    let now = Instant::now();
                    if now < deadline {
                        on_tick(deadline - now);
                    }
                }
            }
        }
    });

    token
}
