//! The callable installed in place of an intercepted operation.

use crate::engine::{Chain, Engine};
use interpose_core::{AfterFailurePolicy, Args, Arity, Dispatch, InterposeError, Operation};
use serde_json::Value;
use std::sync::Arc;

/// Runs the before-chain, the original operation and the after-chain.
///
/// Chains only run around the outermost wrapped call of the type: when a
/// wrapped body calls a sibling wrapped operation, the sibling sees a
/// non-zero depth and runs its original body only.
///
/// Arguments are forwarded untouched and the original's result, success
/// or failure, is returned as is. The one exception is a failing
/// after-callback following a successful operation, which is returned in
/// place of the result.
///
/// Callbacks run at depth zero. A callback that reaches a wrapped sibling
/// through [`Dispatch::invoke`] re-enters this wrapper and fires the chains
/// again without bound; callbacks must use [`Dispatch::invoke_unwrapped`].
pub struct Wrapper {
    name: String,
    original: Arc<dyn Operation>,
    engine: Arc<Engine>,
}

impl Wrapper {
    pub(crate) fn new(name: String, original: Arc<dyn Operation>, engine: Arc<Engine>) -> Self {
        Self {
            name,
            original,
            engine,
        }
    }

    /// Name of the wrapped operation.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Operation for Wrapper {
    fn arity(&self) -> Arity {
        self.original.arity()
    }

    fn call(&self, this: &dyn Dispatch, args: Args) -> Result<Value, InterposeError> {
        let depth = self.engine.depth();

        if depth.is_outermost() {
            self.engine.run_chain(Chain::Before, this)?;
        }

        let result = {
            let _guard = depth.enter();
            self.original.call(this, args)
        };

        if !depth.is_outermost() {
            return result;
        }

        let run_after = result.is_ok()
            || self.engine.config().after_failure == AfterFailurePolicy::Run;
        if run_after {
            let after = self.engine.run_chain(Chain::After, this);
            // An operation failure takes precedence over a callback failure.
            if result.is_ok() {
                after?;
            }
        }

        result
    }
}
