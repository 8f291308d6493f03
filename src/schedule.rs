//! Day-boundary re-selection timer.
//!
//! Fires once at the next local midnight, then every 24 hours, until
//! cancelled or dropped.

use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::debug;

pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Time from `now` until the start of the next calendar day.
pub fn duration_until_next_midnight(now: NaiveDateTime) -> Duration {
    let next = now
        .date()
        .succ_opt()
        .and_then(|date| date.and_hms_opt(0, 0, 0));
    match next {
        Some(midnight) => (midnight - now).to_std().unwrap_or(Duration::ZERO),
        None => DAY,
    }
}

/// Handle to a running rollover timer. Dropping it cancels the timer.
#[derive(Debug)]
pub struct DayRollover {
    task: JoinHandle<()>,
}

impl DayRollover {
    /// Start against the local wall clock. Requires a tokio runtime.
    pub fn start<F>(on_new_day: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        Self::start_at(Local::now().naive_local(), on_new_day)
    }

    /// Start as if the current local time were `now`.
    pub fn start_at<F>(now: NaiveDateTime, on_new_day: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let first = duration_until_next_midnight(now);
        debug!(secs_until_midnight = first.as_secs(), "day rollover scheduled");

        let task = tokio::spawn(async move {
            sleep(first).await;
            on_new_day();

            let mut daily = interval_at(Instant::now() + DAY, DAY);
            daily.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                daily.tick().await;
                on_new_day();
            }
        });

        Self { task }
    }

    pub fn cancel(self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for DayRollover {
    fn drop(&mut self) {
        self.task.abort();
    }
}
