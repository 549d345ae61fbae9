/// Follow-up generation for repeating tasks
///
/// When a task is created with a repeat policy, exactly three follow-up
/// rows are written at 1x, 2x, and 3x the step from the parent's due date
/// (and from its reminder time, when one is set). Follow-ups copy the
/// parent's title, description, priority, category, repeat policy, and tag
/// set, and record the parent's id. Follow-ups never generate further
/// follow-ups themselves.
///
/// # Step Computation
///
/// - `daily`: `repeat_interval` days
/// - `weekly`: `repeat_interval` weeks
/// - `monthly`: `repeat_interval` calendar months (`chrono::Months`, so
///   Jan 31 + 1 month lands on Feb 28/29 rather than a fixed 30-day hop)
///
/// A task with no due date cannot be offset, so recurrence setup is
/// rejected before the parent row exists; this module therefore always
/// sees a due date.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tasknest_shared::models::task::RepeatType;
/// use tasknest_shared::recurrence::follow_up_times;
///
/// let due = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let times = follow_up_times(RepeatType::Daily, 2, due).unwrap();
/// assert_eq!(times.len(), 3);
/// assert_eq!(times[0], due + chrono::Duration::days(2));
/// assert_eq!(times[2], due + chrono::Duration::days(6));
/// ```

use chrono::{DateTime, Duration, Months, Utc};
use sqlx::SqliteConnection;
use tracing::debug;

use crate::models::task::{CreateTask, RepeatType, Task};

/// Number of follow-up tasks generated per repeating parent
pub const FOLLOW_UP_COUNT: u32 = 3;

/// Error type for recurrence generation
#[derive(Debug, thiserror::Error)]
pub enum RecurrenceError {
    /// Repeat policy present but the parent has no due date
    #[error("Recurring tasks require a due date")]
    MissingDueDate,

    /// Repeat interval below 1
    #[error("Repeat interval must be at least 1")]
    InvalidInterval,

    /// Offset arithmetic left the representable date range
    #[error("Computed follow-up date is out of range")]
    DateOverflow,

    /// Database failure while writing follow-ups
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Computes the three follow-up times for a repeating policy
///
/// Returns timestamps at 1x, 2x, and 3x the step from `from`.
///
/// # Errors
///
/// - [`RecurrenceError::InvalidInterval`] if `interval < 1`
/// - [`RecurrenceError::DateOverflow`] if a computed time is unrepresentable
pub fn follow_up_times(
    repeat: RepeatType,
    interval: u32,
    from: DateTime<Utc>,
) -> Result<Vec<DateTime<Utc>>, RecurrenceError> {
    if interval < 1 {
        return Err(RecurrenceError::InvalidInterval);
    }

    (1..=FOLLOW_UP_COUNT)
        .map(|k| {
            let steps = interval
                .checked_mul(k)
                .ok_or(RecurrenceError::DateOverflow)?;
            match repeat {
                RepeatType::None => unreachable!("follow_up_times called with RepeatType::None"),
                RepeatType::Daily => from
                    .checked_add_signed(Duration::days(i64::from(steps)))
                    .ok_or(RecurrenceError::DateOverflow),
                RepeatType::Weekly => from
                    .checked_add_signed(Duration::weeks(i64::from(steps)))
                    .ok_or(RecurrenceError::DateOverflow),
                RepeatType::Monthly => from
                    .checked_add_months(Months::new(steps))
                    .ok_or(RecurrenceError::DateOverflow),
            }
        })
        .collect()
}

/// Generates the follow-up rows for a freshly created parent task
///
/// No-op for `RepeatType::None`. Each follow-up copies the parent's
/// fields and the given tag set, and points back at the parent via
/// `parent_task_id`.
///
/// Takes a connection rather than a pool so the caller can run it in the
/// same transaction as the parent insert; an error here then rolls the
/// parent back instead of leaving an orphan row.
///
/// # Errors
///
/// [`RecurrenceError::MissingDueDate`] if the parent repeats without a due
/// date; database errors are passed through.
pub async fn generate_follow_ups(
    conn: &mut SqliteConnection,
    parent: &Task,
    tag_ids: &[i64],
) -> Result<Vec<Task>, RecurrenceError> {
    if !parent.repeat_type.repeats() {
        return Ok(Vec::new());
    }

    let due = parent.due_date.ok_or(RecurrenceError::MissingDueDate)?;
    let interval = u32::try_from(parent.repeat_interval)
        .map_err(|_| RecurrenceError::InvalidInterval)?;

    let due_dates = follow_up_times(parent.repeat_type, interval, due)?;
    let reminders = match parent.reminder_at {
        Some(reminder) => follow_up_times(parent.repeat_type, interval, reminder)?
            .into_iter()
            .map(Some)
            .collect(),
        None => vec![None; due_dates.len()],
    };

    let mut follow_ups = Vec::with_capacity(due_dates.len());
    for (due_date, reminder_at) in due_dates.into_iter().zip(reminders) {
        let task = Task::create(
            &mut *conn,
            CreateTask {
                user_id: parent.user_id,
                category_id: parent.category_id,
                title: parent.title.clone(),
                description: parent.description.clone(),
                priority: parent.priority,
                due_date: Some(due_date),
                repeat_type: parent.repeat_type,
                repeat_interval: parent.repeat_interval,
                reminder_at,
                parent_task_id: Some(parent.id),
            },
        )
        .await?;

        Task::attach_tags(&mut *conn, task.id, tag_ids).await?;
        follow_ups.push(task);
    }

    debug!(
        parent_id = parent.id,
        count = follow_ups.len(),
        "Generated recurrence follow-ups"
    );

    Ok(follow_ups)
}
