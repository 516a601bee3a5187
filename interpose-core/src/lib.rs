//! # interpose-core — protocol for the interpose interception engine
//!
//! This crate defines what an *operation* is and how operations are called,
//! independently of the engine that wraps them.
//!
//! | Item | What it does |
//! |------|-------------|
//! | [`Operation`] | A named callable on an adopting type |
//! | [`Dispatch`] | The call surface bodies use to reach sibling operations |
//! | [`Arity`] | How many positional arguments an operation takes |
//! | [`InterposeConfig`] | Engine policy (after-failure, depth scope, aliasing) |
//! | [`InterposeError`] | Everything dispatch can fail with |
//!
//! ## Arguments
//!
//! Positional arguments are `serde_json::Value`s. JSON values are the
//! interchange format that lets one table hold operations of any signature
//! while still forwarding arguments and results unchanged. Closures cannot be
//! passed as arguments: a wrapped operation never receives a deferred block.

#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod operation;

#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-exports for convenience
pub use config::{AfterFailurePolicy, DepthScope, InterposeConfig};
pub use error::InterposeError;
pub use operation::{Args, Arity, Dispatch, Operation, OperationFn, decode, operation_fn};
