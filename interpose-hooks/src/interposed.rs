//! An adopting type: a named operation table with interception.

use crate::engine::Engine;
use crate::interceptor::{self, Observed, OperationTable};
use interpose_core::{Args, Dispatch, InterposeConfig, InterposeError, Operation};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A type that has adopted interception.
///
/// Every operation defined on it is wrapped so that the registered
/// before-chain runs ahead of the outermost call and the after-chain runs
/// behind it, except for excluded names.
///
/// # Example
///
/// ```
/// use interpose_core::{Arity, Dispatch, operation_fn};
/// use interpose_hooks::Interposed;
/// use serde_json::json;
///
/// let calc = Interposed::builder("Calculator")
///     .before("log_start")
///     .after("log_end")
///     .define("log_start", operation_fn(Arity::Fixed(0), |_, _| Ok(json!(null))))
///     .define("log_end", operation_fn(Arity::Fixed(0), |_, _| Ok(json!(null))))
///     .define("add", operation_fn(Arity::Fixed(2), |_, args| {
///         Ok(json!(args[0].as_i64().unwrap_or(0) + args[1].as_i64().unwrap_or(0)))
///     }))
///     .build();
///
/// let sum: i64 = calc.invoke_as("add", vec![json!(2), json!(3)]).unwrap();
/// assert_eq!(sum, 5);
/// ```
pub struct Interposed {
    engine: Arc<Engine>,
    table: RwLock<OperationTable>,
}

impl Interposed {
    /// Start building an adopting type with the default configuration.
    pub fn builder(type_name: impl Into<String>) -> InterposedBuilder {
        InterposedBuilder::new(type_name)
    }

    /// Create an empty adopting type.
    pub fn new(type_name: impl Into<String>, config: InterposeConfig) -> Self {
        Self {
            engine: Arc::new(Engine::new(type_name.into(), config)),
            table: RwLock::new(OperationTable::default()),
        }
    }

    fn read_table(&self) -> RwLockReadGuard<'_, OperationTable> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_table(&self) -> RwLockWriteGuard<'_, OperationTable> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Name of the adopting type.
    pub fn type_name(&self) -> &str {
        self.engine.type_name()
    }

    /// The interception context of this type.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Append a callback to the before-chain. The callback is excluded
    /// from wrapping.
    ///
    /// Callbacks run outside any wrapped call, so a callback body must reach
    /// other operations through [`Dispatch::invoke_unwrapped`]. Calling a
    /// wrapped operation with [`Dispatch::invoke`] fires the chains again.
    pub fn register_before(&self, name: impl Into<String>) {
        self.engine.registry().register_before(name);
    }

    /// Append a callback to the after-chain. The callback is excluded
    /// from wrapping. The same rule as for
    /// [`register_before`](Self::register_before) applies to its body.
    pub fn register_after(&self, name: impl Into<String>) {
        self.engine.registry().register_after(name);
    }

    /// Exclude `name` from wrapping.
    pub fn exclude(&self, name: impl Into<String>) {
        self.engine.registry().exclude(name);
    }

    /// Define (or redefine) an operation and run the definition hook on it.
    pub fn define(&self, name: impl Into<String>, op: impl Operation + 'static) -> Observed {
        self.define_arc(name, Arc::new(op))
    }

    /// [`define`](Self::define) for an operation that is already shared.
    pub fn define_arc(&self, name: impl Into<String>, op: Arc<dyn Operation>) -> Observed {
        let name = name.into();
        let mut table = self.write_table();
        if table.wrapped.remove(&name) {
            tracing::warn!(
                type_name = %self.engine.type_name(),
                operation = %name,
                "interpose.redefine: operation was wrapped and is now unintercepted"
            );
        }
        table.ops.insert(name.clone(), op);
        // The name was inserted above, so the hook cannot miss it.
        interceptor::observe(&self.engine, &mut table, &name).unwrap_or(Observed::Skipped)
    }

    /// Run the definition hook on an operation that is already defined.
    ///
    /// Re-observing a wrapped operation is a no-op.
    pub fn observe(&self, name: &str) -> Result<Observed, InterposeError> {
        let mut table = self.write_table();
        interceptor::observe(&self.engine, &mut table, name)
    }

    /// Names of every defined operation, aliases included, sorted.
    pub fn operations(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read_table().ops.keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether the callable visible under `name` is a wrapper.
    pub fn is_wrapped(&self, name: &str) -> bool {
        self.read_table().wrapped.contains(name)
    }

    /// Current wrapped-call depth, as seen from the calling thread.
    pub fn depth(&self) -> usize {
        self.engine.depth().depth()
    }

    /// Snapshot of the before-chain.
    pub fn before_chain(&self) -> Vec<String> {
        self.engine.registry().before_chain()
    }

    /// Snapshot of the after-chain.
    pub fn after_chain(&self) -> Vec<String> {
        self.engine.registry().after_chain()
    }

    fn call_checked(
        &self,
        name: &str,
        op: Option<Arc<dyn Operation>>,
        args: Args,
    ) -> Result<Value, InterposeError> {
        let op = op.ok_or_else(|| InterposeError::UnknownOperation(name.to_string()))?;
        op.arity().check(name, args.len())?;
        op.call(self, args)
    }
}

impl Dispatch for Interposed {
    fn invoke(&self, name: &str, args: Args) -> Result<Value, InterposeError> {
        // The table lock is released before the body runs.
        let op = self.read_table().ops.get(name).cloned();
        self.call_checked(name, op, args)
    }

    fn invoke_unwrapped(&self, name: &str, args: Args) -> Result<Value, InterposeError> {
        let op = {
            let table = self.read_table();
            if table.wrapped.contains(name) {
                table.ops.get(&self.engine.config().alias_for(name)).cloned()
            } else {
                table.ops.get(name).cloned()
            }
        };
        self.call_checked(name, op, args)
    }
}

enum Step {
    Before(String),
    After(String),
    Exclude(String),
    Define(String, Arc<dyn Operation>),
}

/// Builder for [`Interposed`].
///
/// Steps are applied in the order they are declared, exactly as if the
/// corresponding runtime methods had been called one after another.
pub struct InterposedBuilder {
    type_name: String,
    config: InterposeConfig,
    steps: Vec<Step>,
}

impl InterposedBuilder {
    /// Start a builder for `type_name`.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            config: InterposeConfig::default(),
            steps: Vec::new(),
        }
    }

    /// Use `config` instead of the default configuration.
    pub fn config(mut self, config: InterposeConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a before-callback.
    pub fn before(mut self, name: impl Into<String>) -> Self {
        self.steps.push(Step::Before(name.into()));
        self
    }

    /// Register an after-callback.
    pub fn after(mut self, name: impl Into<String>) -> Self {
        self.steps.push(Step::After(name.into()));
        self
    }

    /// Exclude a name from wrapping.
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.steps.push(Step::Exclude(name.into()));
        self
    }

    /// Define an operation.
    pub fn define(mut self, name: impl Into<String>, op: impl Operation + 'static) -> Self {
        self.steps.push(Step::Define(name.into(), Arc::new(op)));
        self
    }

    /// Apply every step and return the adopting type.
    pub fn build(self) -> Interposed {
        let interposed = Interposed::new(self.type_name, self.config);
        for step in self.steps {
            match step {
                Step::Before(name) => interposed.register_before(name),
                Step::After(name) => interposed.register_after(name),
                Step::Exclude(name) => interposed.exclude(name),
                Step::Define(name, op) => {
                    interposed.define_arc(name, op);
                }
            }
        }
        interposed
    }
}
