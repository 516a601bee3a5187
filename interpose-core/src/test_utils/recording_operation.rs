//! Operations that record their invocation and return canned results.

use super::CallLog;
use crate::error::InterposeError;
use crate::operation::{Args, Arity, Dispatch, Operation};
use serde_json::Value;

/// An operation that records `label` in a [`CallLog`] and returns a fixed value.
///
/// Defaults to zero arguments and a `null` result, which is the shape of a
/// before/after callback.
pub struct RecordingOperation {
    label: String,
    log: CallLog,
    arity: Arity,
    result: Value,
}

impl RecordingOperation {
    /// Create a zero-argument operation returning `null`.
    pub fn new(label: impl Into<String>, log: &CallLog) -> Self {
        Self {
            label: label.into(),
            log: log.clone(),
            arity: Arity::Fixed(0),
            result: Value::Null,
        }
    }

    /// Accept a different number of arguments.
    pub fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    /// Return `result` instead of `null`.
    pub fn returning(mut self, result: Value) -> Self {
        self.result = result;
        self
    }
}

impl Operation for RecordingOperation {
    fn arity(&self) -> Arity {
        self.arity
    }

    fn call(&self, _this: &dyn Dispatch, _args: Args) -> Result<Value, InterposeError> {
        self.log.push(self.label.clone());
        Ok(self.result.clone())
    }
}

/// An operation that records `label` and then always fails.
pub struct FailingOperation {
    label: String,
    log: CallLog,
}

impl FailingOperation {
    /// Create a zero-argument operation that fails with an
    /// [`InterposeError::Operation`] naming `label`.
    pub fn new(label: impl Into<String>, log: &CallLog) -> Self {
        Self {
            label: label.into(),
            log: log.clone(),
        }
    }
}

impl Operation for FailingOperation {
    fn arity(&self) -> Arity {
        Arity::Fixed(0)
    }

    fn call(&self, _this: &dyn Dispatch, _args: Args) -> Result<Value, InterposeError> {
        self.log.push(self.label.clone());
        Err(InterposeError::operation(&self.label, "boom"))
    }
}
