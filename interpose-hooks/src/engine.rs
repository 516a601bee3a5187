//! Per-type interception context shared by every wrapper of that type.

use crate::depth::DepthTracker;
use crate::registry::Registry;
use interpose_core::{Dispatch, InterposeConfig, InterposeError};

/// Everything a wrapper needs to know about its adopting type: the chains,
/// the exclusion set, the depth counter and the configuration.
///
/// One `Engine` exists per [`Interposed`](crate::Interposed); unrelated
/// types never share one.
pub struct Engine {
    type_name: String,
    config: InterposeConfig,
    registry: Registry,
    depth: DepthTracker,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Chain {
    Before,
    After,
}

impl Chain {
    fn label(self) -> &'static str {
        match self {
            Chain::Before => "before",
            Chain::After => "after",
        }
    }
}

impl Engine {
    pub(crate) fn new(type_name: String, config: InterposeConfig) -> Self {
        let registry = Registry::new(config.excluded.iter().cloned());
        let depth = DepthTracker::new(config.depth_scope);
        Self {
            type_name,
            config,
            registry,
            depth,
        }
    }

    /// Name of the adopting type, used in log events.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Configuration the engine was built with.
    pub fn config(&self) -> &InterposeConfig {
        &self.config
    }

    /// Chains and exclusions.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Reentrancy counter.
    pub fn depth(&self) -> &DepthTracker {
        &self.depth
    }

    /// Run every callback of `chain` in order, with no arguments.
    ///
    /// Callbacks are invoked unwrapped so they never re-enter a wrapper.
    /// The first failure stops the chain and is returned.
    pub(crate) fn run_chain(&self, chain: Chain, this: &dyn Dispatch) -> Result<(), InterposeError> {
        let names = match chain {
            Chain::Before => self.registry.before_chain(),
            Chain::After => self.registry.after_chain(),
        };
        tracing::trace!(
            type_name = %self.type_name,
            chain = chain.label(),
            callbacks = names.len(),
            "interpose.chain"
        );
        for name in &names {
            if let Err(e) = this.invoke_unwrapped(name, Vec::new()) {
                tracing::debug!(
                    type_name = %self.type_name,
                    chain = chain.label(),
                    callback = %name,
                    error = %e,
                    "interpose.chain.failed"
                );
                return Err(e);
            }
        }
        Ok(())
    }
}
