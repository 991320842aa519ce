//! Relay server builder tests

use crate::test_utils::{ScriptedModel, builtin_registry};
use relay_server::{BuilderError, RelayServerBuilder};
use std::sync::Arc;

#[test]
fn test_missing_registry_is_reported() {
    let result = RelayServerBuilder::new()
        .with_model(ScriptedModel::text("hi"))
        .build();
    assert!(matches!(
        result,
        Err(BuilderError::MissingDependency("tool registry"))
    ));
}

#[test]
fn test_missing_model_is_reported() {
    let result = RelayServerBuilder::new()
        .with_registry(builtin_registry())
        .build();
    assert!(matches!(
        result,
        Err(BuilderError::MissingDependency("language model"))
    ));
}

#[test]
fn test_missing_tool_client_is_reported() {
    let result = RelayServerBuilder::new()
        .with_registry(builtin_registry())
        .with_model(ScriptedModel::text("hi"))
        .build();
    assert!(matches!(
        result,
        Err(BuilderError::MissingDependency("tool client"))
    ));
}

#[test]
fn test_build_shares_registry_with_tool_server() {
    let registry = builtin_registry();
    let server = RelayServerBuilder::new()
        .with_registry(Arc::clone(&registry))
        .with_model(ScriptedModel::text("hi"))
        .with_tool_invoker(registry.clone())
        .build()
        .expect("server");

    assert!(Arc::ptr_eq(server.tool_server().registry(), &registry));
    assert_eq!(server.tool_server().sessions().session_count(), 0);
    assert!(!server.shutdown_token().is_cancelled());
}
