//! Recording helpers for testing interception.
//!
//! Available behind the `test-utils` feature flag. These let tests observe
//! the exact order in which callbacks and operation bodies run.

mod call_log;
mod recording_operation;

pub use call_log::CallLog;
pub use recording_operation::{FailingOperation, RecordingOperation};
