//! # TaskNest Worker
//!
//! Background reminder delivery for TaskNest. The worker polls the task
//! table for due reminders and hands each one to a notifier exactly once.
//!
//! ## Modules
//!
//! - `notifier`: The delivery contract and the console implementation
//! - `poller`: The polling loop with its shutdown lifecycle

pub mod notifier;
pub mod poller;
