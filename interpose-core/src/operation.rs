//! The Operation protocol — a named callable on an adopting type.

use crate::error::InterposeError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Positional arguments, forwarded unchanged through every wrapper.
pub type Args = Vec<Value>;

/// How many positional arguments an operation accepts.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// Exactly this many arguments.
    Fixed(usize),
    /// Any number of arguments.
    Variadic,
}

impl Arity {
    /// Whether a call with `count` arguments is acceptable.
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Fixed(n) => *n == count,
            Arity::Variadic => true,
        }
    }

    /// Reject a call to `name` with `got` arguments if the arity forbids it.
    pub fn check(&self, name: &str, got: usize) -> Result<(), InterposeError> {
        match self {
            Arity::Fixed(expected) if *expected != got => Err(InterposeError::ArityMismatch {
                name: name.to_string(),
                expected: *expected,
                got,
            }),
            _ => Ok(()),
        }
    }
}

/// A callable defined on an adopting type.
///
/// The body receives the type's [`Dispatch`] surface so it can call sibling
/// operations. Those calls are routed through the same table as external
/// calls, so they see wrappers exactly like any other caller.
pub trait Operation: Send + Sync {
    /// Declared argument count.
    fn arity(&self) -> Arity;

    /// Run the operation.
    fn call(&self, this: &dyn Dispatch, args: Args) -> Result<Value, InterposeError>;
}

/// The call surface of an adopting type.
pub trait Dispatch {
    /// Invoke the operation currently visible under `name`.
    fn invoke(&self, name: &str, args: Args) -> Result<Value, InterposeError>;

    /// Invoke the original callable behind `name`, bypassing any wrapper.
    ///
    /// Dispatchers without interception run the visible callable.
    fn invoke_unwrapped(&self, name: &str, args: Args) -> Result<Value, InterposeError> {
        self.invoke(name, args)
    }

    /// Invoke and decode the result into `R`.
    fn invoke_as<R: DeserializeOwned>(&self, name: &str, args: Args) -> Result<R, InterposeError>
    where
        Self: Sized,
    {
        decode(self.invoke(name, args)?)
    }
}

/// Decode an operation result into a concrete type.
pub fn decode<R: DeserializeOwned>(value: Value) -> Result<R, InterposeError> {
    serde_json::from_value(value).map_err(|e| InterposeError::Decode(e.to_string()))
}

/// An [`Operation`] backed by a closure. See [`operation_fn`].
pub struct OperationFn<F> {
    arity: Arity,
    f: F,
}

impl<F> Operation for OperationFn<F>
where
    F: Fn(&dyn Dispatch, Args) -> Result<Value, InterposeError> + Send + Sync,
{
    fn arity(&self) -> Arity {
        self.arity
    }

    fn call(&self, this: &dyn Dispatch, args: Args) -> Result<Value, InterposeError> {
        (self.f)(this, args)
    }
}

/// Create an operation from a closure.
///
/// # Example
///
/// ```
/// use interpose_core::{Arity, operation_fn};
/// use serde_json::json;
///
/// let double = operation_fn(Arity::Fixed(1), |_this, args| {
///     Ok(json!(args[0].as_i64().unwrap_or_default() * 2))
/// });
/// # let _ = double;
/// ```
#[must_use]
pub fn operation_fn<F>(arity: Arity, f: F) -> OperationFn<F>
where
    F: Fn(&dyn Dispatch, Args) -> Result<Value, InterposeError> + Send + Sync,
{
    OperationFn { arity, f }
}
