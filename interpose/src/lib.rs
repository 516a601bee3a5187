#![deny(missing_docs)]
//! # interpose — umbrella crate
//!
//! Provides a single import surface for the interception protocol and
//! engine, plus a `prelude` for the happy path.

pub use interpose_core;
#[cfg(feature = "hooks")]
pub use interpose_hooks;

/// Happy-path imports for adopting interception.
pub mod prelude {
    pub use interpose_core::{
        AfterFailurePolicy, Args, Arity, DepthScope, Dispatch, InterposeConfig, InterposeError,
        Operation, decode, operation_fn,
    };

    #[cfg(feature = "hooks")]
    pub use interpose_hooks::{Interposed, InterposedBuilder, Observed};
}
