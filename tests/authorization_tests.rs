//! Construction-time authorization gate tests.

mod common;

use std::sync::Arc;

use common::*;
use drover::agent::AgentExecutor;
use drover::error::DroverError;
use drover::tools::{ExecutionPolicy, ToolRegistry};

#[test]
fn unregistered_tool_fails_construction() {
    let transport = Arc::new(ScriptedTransport::new());
    let registry = registry_of(vec![]);

    let err = AgentExecutor::new(
        definition(&["does_not_exist"], 4),
        transport,
        &registry,
        None,
    )
    .unwrap_err();

    assert!(matches!(err, DroverError::UnauthorizedTool(_)));
    assert!(err.to_string().contains("does_not_exist"));
}

#[test]
fn interactive_tool_fails_construction_and_is_never_invoked() {
    let transport = Arc::new(ScriptedTransport::new());
    let (dangerous, tripped) = tripwire_tool("wipe_disk");
    let mut registry = ToolRegistry::new();
    registry.register(dangerous, ExecutionPolicy::RequiresConfirmation);

    let err = AgentExecutor::new(
        definition(&["wipe_disk"], 4),
        transport.clone(),
        &registry,
        None,
    )
    .unwrap_err();

    assert!(err.to_string().contains("requires confirmation"));
    assert!(!tripped.load(std::sync::atomic::Ordering::SeqCst));
    assert_eq!(transport.calls(), 0);
}

#[test]
fn one_bad_name_poisons_the_whole_definition() {
    let transport = Arc::new(ScriptedTransport::new());
    let (probe, _) = counting_tool("probe", drover::tools::ToolKind::ReadOnly);
    let registry = registry_of(vec![probe]);

    let err = AgentExecutor::new(
        definition(&["probe", "missing"], 4),
        transport,
        &registry,
        None,
    )
    .unwrap_err();

    assert!(matches!(err, DroverError::UnauthorizedTool(_)));
}

#[test]
fn construction_succeeds_for_allow_listed_tools() {
    let transport = Arc::new(ScriptedTransport::new());
    let (probe, _) = counting_tool("probe", drover::tools::ToolKind::ReadOnly);
    let registry = registry_of(vec![probe]);

    let executor = AgentExecutor::new(definition(&["probe"], 4), transport, &registry, None);
    assert!(executor.is_ok());
}
