//! Callback chains and the exclusion set for one adopting type.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Names of the engine's own API. These are never wrapped.
pub const ENGINE_API: &[&str] = &[
    "register_before",
    "register_after",
    "define",
    "observe",
    "invoke",
    "invoke_unwrapped",
    "invoke_as",
];

/// Ordered before/after chains plus the set of names that must never be
/// wrapped.
///
/// Chains are append-only and run in registration order. Registering a
/// callback also excludes it, so a callback is never itself intercepted.
/// Registering the same name twice makes it run twice.
pub struct Registry {
    state: Mutex<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
    before: Vec<String>,
    after: Vec<String>,
    excluded: HashSet<String>,
}

impl Registry {
    /// Create a registry whose exclusion set holds [`ENGINE_API`] plus `extra`.
    pub fn new<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut excluded: HashSet<String> = ENGINE_API.iter().map(|s| s.to_string()).collect();
        excluded.extend(extra.into_iter().map(Into::into));
        Self {
            state: Mutex::new(RegistryState {
                excluded,
                ..RegistryState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `name` to the before-chain and exclude it from wrapping.
    pub fn register_before(&self, name: impl Into<String>) {
        let name = name.into();
        let mut state = self.lock();
        state.excluded.insert(name.clone());
        state.before.push(name);
    }

    /// Append `name` to the after-chain and exclude it from wrapping.
    pub fn register_after(&self, name: impl Into<String>) {
        let name = name.into();
        let mut state = self.lock();
        state.excluded.insert(name.clone());
        state.after.push(name);
    }

    /// Snapshot of the before-chain, in registration order.
    pub fn before_chain(&self) -> Vec<String> {
        self.lock().before.clone()
    }

    /// Snapshot of the after-chain, in registration order.
    pub fn after_chain(&self) -> Vec<String> {
        self.lock().after.clone()
    }

    /// Whether `name` must not be wrapped.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.lock().excluded.contains(name)
    }

    /// Exclude `name` from wrapping.
    pub fn exclude(&self, name: impl Into<String>) {
        self.lock().excluded.insert(name.into());
    }

    /// Claim `name` for wrapping.
    ///
    /// If `name` is not excluded, excludes both `name` and `alias` and
    /// returns `true`. Otherwise changes nothing and returns `false`. The
    /// check and the insert happen under one lock, so at most one caller
    /// ever wins a given name.
    pub fn exclude_pair(&self, name: &str, alias: &str) -> bool {
        let mut state = self.lock();
        if state.excluded.contains(name) {
            return false;
        }
        state.excluded.insert(name.to_string());
        state.excluded.insert(alias.to_string());
        true
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_api_is_excluded_from_the_start() {
        let registry = Registry::default();
        for name in ENGINE_API {
            assert!(registry.is_excluded(name), "{name} should be excluded");
        }
        assert!(!registry.is_excluded("add"));
    }

    #[test]
    fn extra_names_are_seeded() {
        let registry = Registry::new(["to_string", "clone"]);
        assert!(registry.is_excluded("to_string"));
        assert!(registry.is_excluded("clone"));
    }

    #[test]
    fn chains_keep_registration_order() {
        let registry = Registry::default();
        registry.register_before("first");
        registry.register_before("second");
        registry.register_after("third");
        registry.register_after("fourth");

        assert_eq!(registry.before_chain(), vec!["first", "second"]);
        assert_eq!(registry.after_chain(), vec!["third", "fourth"]);
    }

    #[test]
    fn registered_callbacks_are_excluded() {
        let registry = Registry::default();
        registry.register_before("log_start");
        registry.register_after("log_end");
        assert!(registry.is_excluded("log_start"));
        assert!(registry.is_excluded("log_end"));
    }

    #[test]
    fn duplicate_registration_duplicates_the_entry() {
        let registry = Registry::default();
        registry.register_before("audit");
        registry.register_before("audit");
        assert_eq!(registry.before_chain(), vec!["audit", "audit"]);
    }

    #[test]
    fn exclude_pair_claims_once() {
        let registry = Registry::default();
        assert!(registry.exclude_pair("add", "__orig_add"));
        assert!(registry.is_excluded("add"));
        assert!(registry.is_excluded("__orig_add"));
        assert!(!registry.exclude_pair("add", "__orig_add"));
    }

    #[test]
    fn exclude_pair_refuses_excluded_names() {
        let registry = Registry::default();
        registry.exclude("helper");
        assert!(!registry.exclude_pair("helper", "__orig_helper"));
        assert!(!registry.is_excluded("__orig_helper"));
    }
}
