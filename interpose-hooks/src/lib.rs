#![deny(missing_docs)]
//! Before/after interception for named operations.
//!
//! An [`Interposed`] type holds a table of operations and one [`Engine`].
//! Whenever an operation is defined, the definition hook wraps it in a
//! [`Wrapper`] unless its name is excluded. The original stays callable
//! under an alias (`__interpose_original_<name>` by default).
//!
//! A wrapper runs the before-chain, the original body and the after-chain,
//! but only for the outermost wrapped call of the type. Calls a body makes
//! to sibling operations run their original bodies without re-firing the
//! chains. The [`DepthTracker`] that decides this is released on every exit
//! path, including failures and panics.
//!
//! Callbacks are ordinary zero-argument operations on the same type. They
//! are excluded from wrapping as soon as they are registered and are always
//! invoked unwrapped.

pub mod depth;
pub mod engine;
pub mod interceptor;
pub mod interposed;
pub mod registry;
pub mod wrapper;

pub use depth::{DepthGuard, DepthTracker};
pub use engine::Engine;
pub use interceptor::Observed;
pub use interposed::{Interposed, InterposedBuilder};
pub use registry::{ENGINE_API, Registry};
pub use wrapper::Wrapper;
