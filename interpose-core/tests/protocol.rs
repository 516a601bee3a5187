//! Protocol-level tests: object safety, arity, configuration parsing.

use interpose_core::*;
use serde_json::{Value, json};
use std::collections::HashMap;

fn _assert_send_sync<T: Send + Sync>() {}

#[test]
fn arc_operation_is_send_sync() {
    _assert_send_sync::<std::sync::Arc<dyn Operation>>();
}

#[test]
fn dispatch_is_object_safe() {
    fn _takes(_d: &dyn Dispatch) {}
}

// --- Arity ---

#[test]
fn fixed_arity_accepts_exact_count_only() {
    let arity = Arity::Fixed(2);
    assert!(arity.accepts(2));
    assert!(!arity.accepts(1));
    assert!(!arity.accepts(3));
}

#[test]
fn variadic_accepts_anything() {
    assert!(Arity::Variadic.accepts(0));
    assert!(Arity::Variadic.accepts(17));
}

// --- operation_fn ---

/// A dispatcher over plain, unwrapped operations.
struct Table(HashMap<&'static str, Box<dyn Operation>>);

impl Dispatch for Table {
    fn invoke(&self, name: &str, args: Args) -> Result<Value, InterposeError> {
        let op = self
            .0
            .get(name)
            .ok_or_else(|| InterposeError::UnknownOperation(name.to_string()))?;
        op.call(self, args)
    }
}

#[test]
fn operation_fn_forwards_arguments_and_result() {
    let double = operation_fn(Arity::Fixed(1), |_this, args| {
        Ok(json!(args[0].as_i64().unwrap_or_default() * 2))
    });
    assert_eq!(double.arity(), Arity::Fixed(1));

    let table = Table(HashMap::from([("double", Box::new(double) as Box<dyn Operation>)]));
    let result: i64 = table.invoke_as("double", vec![json!(21)]).unwrap();
    assert_eq!(result, 42);
}

#[test]
fn operation_body_can_call_siblings_through_dispatch() {
    let mut ops: HashMap<&'static str, Box<dyn Operation>> = HashMap::new();
    ops.insert(
        "inc",
        Box::new(operation_fn(Arity::Fixed(1), |_this, args| {
            Ok(json!(args[0].as_i64().unwrap_or_default() + 1))
        })),
    );
    ops.insert(
        "inc_twice",
        Box::new(operation_fn(Arity::Fixed(1), |this, args| {
            let once = this.invoke("inc", args)?;
            this.invoke("inc", vec![once])
        })),
    );
    let table = Table(ops);
    assert_eq!(table.invoke("inc_twice", vec![json!(1)]).unwrap(), json!(3));
}

#[test]
fn invoke_as_reports_decode_failure() {
    let table = Table(HashMap::from([(
        "text",
        Box::new(operation_fn(Arity::Fixed(0), |_this, _args| Ok(json!("hello"))))
            as Box<dyn Operation>,
    )]));
    let err = table.invoke_as::<i64>("text", vec![]).unwrap_err();
    assert!(matches!(err, InterposeError::Decode(_)));
}

// --- Errors ---

#[test]
fn error_messages_name_the_operation() {
    let err = InterposeError::operation("withdraw", "insufficient funds");
    assert_eq!(err.to_string(), "operation withdraw failed: insufficient funds");

    let err = InterposeError::ArityMismatch {
        name: "add".into(),
        expected: 2,
        got: 3,
    };
    assert_eq!(err.to_string(), "arity mismatch for add: expected 2, got 3");
}

// --- Configuration ---

#[test]
fn default_config() {
    let config = InterposeConfig::default();
    assert_eq!(config.after_failure, AfterFailurePolicy::Skip);
    assert_eq!(config.depth_scope, DepthScope::PerThread);
    assert_eq!(config.alias_prefix, config::DEFAULT_ALIAS_PREFIX);
    assert!(config.excluded.is_empty());
}

#[test]
fn empty_json_yields_defaults() {
    let config = InterposeConfig::from_json("{}").unwrap();
    assert_eq!(config, InterposeConfig::default());
}

#[test]
fn json_overrides_individual_fields() {
    let config = InterposeConfig::from_json(
        r#"{"after_failure": "run", "depth_scope": "shared", "excluded": ["to_s"]}"#,
    )
    .unwrap();
    assert_eq!(config.after_failure, AfterFailurePolicy::Run);
    assert_eq!(config.depth_scope, DepthScope::Shared);
    assert_eq!(config.excluded, vec!["to_s".to_string()]);
    assert_eq!(config.alias_prefix, config::DEFAULT_ALIAS_PREFIX);
}

#[test]
fn malformed_json_is_a_decode_error() {
    let err = InterposeConfig::from_json(r#"{"after_failure": "sometimes"}"#).unwrap_err();
    assert!(matches!(err, InterposeError::Decode(_)));
}

#[test]
fn alias_uses_configured_prefix() {
    let config = InterposeConfig::default().with_alias_prefix("orig_");
    assert_eq!(config.alias_for("add"), "orig_add");
    assert_eq!(
        InterposeConfig::default().alias_for("add"),
        "__interpose_original_add"
    );
}
