//! The definition hook: decides whether a newly defined operation gets
//! wrapped, and wraps it.

use crate::engine::Engine;
use crate::wrapper::Wrapper;
use interpose_core::{InterposeError, Operation};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Outcome of observing a definition.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observed {
    /// The operation was wrapped; its original is callable under `alias`.
    Wrapped {
        /// Name the original callable is now bound to.
        alias: String,
    },
    /// The name is excluded (engine API, callback, alias, or already
    /// wrapped), or its alias is already taken. The definition stays as
    /// it is.
    Skipped,
}

/// Operations of one adopting type, keyed by name.
#[derive(Default)]
pub(crate) struct OperationTable {
    pub(crate) ops: HashMap<String, Arc<dyn Operation>>,
    /// Names whose visible callable is currently a [`Wrapper`].
    pub(crate) wrapped: HashSet<String>,
}

/// Observe the definition of `name`, which must already be in `table`.
///
/// The name is left unwrapped when it is excluded or when its alias is
/// already defined or excluded.
///
/// The caller holds the table exclusively for the whole step, so the
/// operation never becomes callable unwrapped.
pub(crate) fn observe(
    engine: &Arc<Engine>,
    table: &mut OperationTable,
    name: &str,
) -> Result<Observed, InterposeError> {
    let original = table
        .ops
        .get(name)
        .cloned()
        .ok_or_else(|| InterposeError::UnknownOperation(name.to_string()))?;

    if engine.registry().is_excluded(name) {
        tracing::trace!(type_name = %engine.type_name(), operation = %name, "interpose.skip");
        return Ok(Observed::Skipped);
    }

    let alias = engine.config().alias_for(name);
    // An alias slot already in use would lose its occupant.
    if table.ops.contains_key(&alias) || engine.registry().is_excluded(&alias) {
        tracing::warn!(
            type_name = %engine.type_name(),
            operation = %name,
            alias = %alias,
            "interpose.skip: alias is already taken, operation stays unintercepted"
        );
        return Ok(Observed::Skipped);
    }
    if !engine.registry().exclude_pair(name, &alias) {
        return Ok(Observed::Skipped);
    }

    table.ops.insert(alias.clone(), Arc::clone(&original));
    let wrapper = Wrapper::new(name.to_string(), original, Arc::clone(engine));
    table.ops.insert(name.to_string(), Arc::new(wrapper));
    table.wrapped.insert(name.to_string());

    tracing::debug!(
        type_name = %engine.type_name(),
        operation = %name,
        alias = %alias,
        "interpose.wrap"
    );
    Ok(Observed::Wrapped { alias })
}
