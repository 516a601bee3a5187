//! Engine configuration.

use crate::error::InterposeError;
use serde::{Deserialize, Serialize};

/// Prefix used for alias names unless configured otherwise.
pub const DEFAULT_ALIAS_PREFIX: &str = "__interpose_original_";

/// Whether the after-chain still runs when the wrapped operation fails.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AfterFailurePolicy {
    /// The failure propagates and the after-chain is skipped.
    #[default]
    Skip,
    /// The after-chain runs, then the failure propagates.
    Run,
}

/// Where the reentrancy depth counter lives.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthScope {
    /// One counter per thread for each adopting type. Concurrent callers
    /// on different threads each see their own outermost call.
    #[default]
    PerThread,
    /// One counter for the adopting type, shared by every thread.
    /// Only correct when a single thread drives the type.
    Shared,
}

/// Engine configuration. Every field has a default, so an empty JSON
/// object is a valid configuration.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterposeConfig {
    /// After-chain behavior on operation failure.
    pub after_failure: AfterFailurePolicy,

    /// Scope of the depth counter.
    pub depth_scope: DepthScope,

    /// Prefix prepended to an operation name to form its alias.
    pub alias_prefix: String,

    /// Extra names that must never be wrapped, on top of the engine's own API.
    pub excluded: Vec<String>,
}

impl Default for InterposeConfig {
    fn default() -> Self {
        Self {
            after_failure: AfterFailurePolicy::default(),
            depth_scope: DepthScope::default(),
            alias_prefix: DEFAULT_ALIAS_PREFIX.to_string(),
            excluded: Vec::new(),
        }
    }
}

impl InterposeConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, InterposeError> {
        serde_json::from_str(json).map_err(|e| InterposeError::Decode(e.to_string()))
    }

    /// Set the after-failure policy.
    pub fn with_after_failure(mut self, policy: AfterFailurePolicy) -> Self {
        self.after_failure = policy;
        self
    }

    /// Set the depth scope.
    pub fn with_depth_scope(mut self, scope: DepthScope) -> Self {
        self.depth_scope = scope;
        self
    }

    /// Set the alias prefix.
    pub fn with_alias_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.alias_prefix = prefix.into();
        self
    }

    /// Add a name that must never be wrapped.
    pub fn with_excluded(mut self, name: impl Into<String>) -> Self {
        self.excluded.push(name.into());
        self
    }

    /// The alias under which the original of `name` stays callable.
    pub fn alias_for(&self, name: &str) -> String {
        format!("{}{name}", self.alias_prefix)
    }
}
