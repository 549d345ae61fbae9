/// Reminder polling loop
///
/// This module implements the worker's main loop. On every tick it scans
/// the task table for open tasks whose reminder falls inside the lookahead
/// window and has not been emitted yet, delivers each one through the
/// configured notifier, and stamps the task so it never fires twice.
///
/// # Lifecycle
///
/// ```text
/// ReminderPoller::run()
///   ├─> tick: poll_once()
///   │     ├─> Task::due_reminders(now, now + window)
///   │     ├─> Notifier::notify() per task
///   │     └─> Task::mark_notified() per delivered task
///   └─> shutdown token cancelled: drain and return
/// ```
///
/// A delivery failure leaves the task unstamped, so the next tick retries
/// it; a task completed or deleted between polls simply drops out of the
/// query.
///
/// # Example
///
/// ```no_run
/// use tasknest_worker::notifier::ConsoleNotifier;
/// use tasknest_worker::poller::{PollerConfig, ReminderPoller};
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example(pool: sqlx::SqlitePool) -> anyhow::Result<()> {
/// let shutdown = CancellationToken::new();
/// let poller = ReminderPoller::new(
///     pool,
///     Arc::new(ConsoleNotifier),
///     PollerConfig::default(),
///     shutdown.clone(),
/// );
///
/// tokio::spawn(async move { poller.run().await });
///
/// // ... later
/// shutdown.cancel();
/// # Ok(())
/// # }
/// ```

use crate::notifier::Notifier;
use chrono::{Duration as ChronoDuration, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tasknest_shared::models::task::Task;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Default poll cadence and lookahead window (seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 1800;

/// Reminder poller configuration
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Seconds between polls
    pub poll_interval_secs: u64,

    /// Lookahead window in seconds
    ///
    /// Kept equal to the poll interval so consecutive windows tile the
    /// timeline without gaps or overlap.
    pub window_secs: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            window_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl PollerConfig {
    /// Loads poller configuration from the environment
    ///
    /// `REMINDER_POLL_INTERVAL_SECS` overrides the default cadence; the
    /// window follows the cadence.
    pub fn from_env() -> anyhow::Result<Self> {
        let poll_interval_secs = match std::env::var("REMINDER_POLL_INTERVAL_SECS") {
            Ok(value) => value.parse::<u64>()?,
            Err(_) => DEFAULT_POLL_INTERVAL_SECS,
        };

        if poll_interval_secs == 0 {
            anyhow::bail!("REMINDER_POLL_INTERVAL_SECS must be at least 1");
        }

        Ok(Self {
            poll_interval_secs,
            window_secs: poll_interval_secs,
        })
    }
}

/// Reminder poller
///
/// Owns the database pool, a notifier, and a shutdown token; `run`
/// consumes the poller and loops until the token is cancelled.
pub struct ReminderPoller {
    db: SqlitePool,
    notifier: Arc<dyn Notifier>,
    config: PollerConfig,
    shutdown: CancellationToken,
}

impl ReminderPoller {
    /// Creates a new poller
    pub fn new(
        db: SqlitePool,
        notifier: Arc<dyn Notifier>,
        config: PollerConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            db,
            notifier,
            config,
            shutdown,
        }
    }

    /// Runs the polling loop until shutdown is requested
    ///
    /// The first poll happens immediately on startup, then once per
    /// configured interval.
    pub async fn run(self) {
        tracing::info!(
            notifier = self.notifier.name(),
            poll_interval_secs = self.config.poll_interval_secs,
            "Reminder poller started"
        );

        let mut ticker = interval(Duration::from_secs(self.config.poll_interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Reminder poller shutting down");
                    return;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.poll_once().await {
                        tracing::error!(error = %e, "Reminder poll failed");
                    }
                }
            }
        }
    }

    /// Performs a single poll pass
    ///
    /// Scans the window `(now, now + window_secs]` and delivers every
    /// pending reminder, stamping each task after delivery succeeds.
    pub async fn poll_once(&self) -> anyhow::Result<usize> {
        let now = Utc::now();
        let until = now + ChronoDuration::seconds(self.config.window_secs as i64);

        let due = Task::due_reminders(&self.db, now, until).await?;
        if due.is_empty() {
            tracing::debug!("No reminders due");
            return Ok(0);
        }

        tracing::info!(count = due.len(), "Delivering due reminders");

        let mut delivered = 0;
        for task in &due {
            match self.notifier.notify(task).await {
                Ok(()) => {
                    Task::mark_notified(&self.db, task.id).await?;
                    delivered += 1;
                }
                Err(e) => {
                    // Left unstamped; the next poll retries it.
                    tracing::warn!(task_id = task.id, error = %e, "Reminder delivery failed");
                }
            }
        }

        Ok(delivered)
    }
}
