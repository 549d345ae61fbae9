/// Notifier trait and implementations
///
/// This module defines the contract for delivering a reminder to the user.
/// The poller is deliberately ignorant of the delivery channel; it hands a
/// due task to whatever `Notifier` it was constructed with.
///
/// # Notifier Contract
///
/// Implementations must:
/// 1. Deliver (or enqueue) the reminder for the given task
/// 2. Return `Ok(())` only once delivery has been accepted
/// 3. Be safe to call concurrently
///
/// A returned error leaves the task unstamped, so it will be picked up
/// again on the next poll.

use async_trait::async_trait;
use tasknest_shared::models::task::Task;
use thiserror::Error;

/// Errors that can occur during reminder delivery
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The delivery channel rejected the reminder
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Contract for delivering a reminder about a due task
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns the notifier's name for logging
    fn name(&self) -> &str;

    /// Delivers a reminder for the given task
    async fn notify(&self, task: &Task) -> Result<(), NotifyError>;
}

/// Notifier that writes reminders to the process log
///
/// This is the default delivery channel; richer channels (email, push)
/// plug in behind the same trait.
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    async fn notify(&self, task: &Task) -> Result<(), NotifyError> {
        tracing::info!(
            task_id = task.id,
            user_id = task.user_id,
            title = %task.title,
            reminder_at = ?task.reminder_at,
            "Reminder due"
        );
        Ok(())
    }
}
