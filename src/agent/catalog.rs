//! Per-run isolated tool catalog.
//!
//! The authorization boundary has two layers: [`IsolatedCatalog::build`]
//! fails executor construction for any tool that is unregistered or not
//! on the non-interactive allow-list, and [`IsolatedCatalog::get`] is the
//! runtime re-check applied to every call the model requests, since the
//! model may reference names outside the set it was shown. A denied name
//! never reaches the registry or any tool's execution path.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{DroverError, Result};
use crate::provider::ToolDeclaration;
use crate::tools::registry::ToolRegistry;
use crate::tools::tool::{Tool, ToolKind};

/// Read-only view over the tools one agent may use, in declaration order.
pub struct IsolatedCatalog {
    order: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, Arc<dyn Tool>>,
}

impl std::fmt::Debug for IsolatedCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IsolatedCatalog")
            .field("tools", &self.order.iter().map(|t| t.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl IsolatedCatalog {
    /// Build the catalog from the agent's requested tool names. Duplicate
    /// names keep their first position.
    pub fn build(registry: &ToolRegistry, requested: &[String]) -> Result<Self> {
        let mut order = Vec::with_capacity(requested.len());
        let mut by_name = HashMap::with_capacity(requested.len());

        for name in requested {
            if by_name.contains_key(name) {
                continue;
            }
            let Some(tool) = registry.get(name) else {
                return Err(DroverError::UnauthorizedTool(format!(
                    "'{name}' is not registered"
                )));
            };
            if !registry.is_non_interactive(name) {
                return Err(DroverError::UnauthorizedTool(format!(
                    "'{name}' requires confirmation and cannot run unattended"
                )));
            }
            by_name.insert(name.clone(), tool.clone());
            order.push(tool.clone());
        }

        Ok(Self { order, by_name })
    }

    /// Runtime membership check; `None` means the call must be denied.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.by_name.get(name)
    }

    /// Whether the named tool mutates external state. Unknown names are
    /// not mutators; they are denied before execution anyway.
    pub fn is_mutator(&self, name: &str) -> bool {
        self.get(name)
            .is_some_and(|tool| tool.kind() == ToolKind::Mutator)
    }

    /// Declarations to advertise to the model, in declaration order.
    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.order
            .iter()
            .map(|tool| ToolDeclaration {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters().schema.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::registry::ExecutionPolicy;
    use crate::tools::tool::{AgentTool, ToolOutput};
    use crate::tools::types::ToolParameters;

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(
            Arc::new(AgentTool::new(
                "lookup",
                "look something up",
                ToolParameters::empty(),
                |_, _| async { Ok(ToolOutput::json(serde_json::json!({}))) },
            )),
            ExecutionPolicy::NonInteractive,
        );
        registry.register(
            Arc::new(
                AgentTool::new("write_file", "write a file", ToolParameters::empty(), |_, _| async {
                    Ok(ToolOutput::json(serde_json::json!({})))
                })
                .with_kind(ToolKind::Mutator),
            ),
            ExecutionPolicy::NonInteractive,
        );
        registry.register(
            Arc::new(AgentTool::new(
                "shell",
                "run a command",
                ToolParameters::empty(),
                |_, _| async { Ok(ToolOutput::json(serde_json::json!({}))) },
            )),
            ExecutionPolicy::RequiresConfirmation,
        );
        registry
    }

    #[test]
    fn builds_an_ordered_view_of_authorized_tools() {
        let catalog = IsolatedCatalog::build(
            &registry(),
            &["write_file".to_string(), "lookup".to_string()],
        )
        .unwrap();

        let declarations = catalog.declarations();
        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[0].name, "write_file");
        assert_eq!(declarations[1].name, "lookup");
        assert!(catalog.is_mutator("write_file"));
        assert!(!catalog.is_mutator("lookup"));
    }

    #[test]
    fn unregistered_tool_fails_construction() {
        let err = IsolatedCatalog::build(&registry(), &["teleport".to_string()]).unwrap_err();
        assert!(matches!(err, DroverError::UnauthorizedTool(_)));
    }

    #[test]
    fn interactive_tool_fails_construction() {
        let err = IsolatedCatalog::build(&registry(), &["shell".to_string()]).unwrap_err();
        assert!(err.to_string().contains("requires confirmation"));
    }

    #[test]
    fn runtime_lookup_denies_names_outside_the_view() {
        let catalog = IsolatedCatalog::build(&registry(), &["lookup".to_string()]).unwrap();
        assert!(catalog.get("lookup").is_some());
        assert!(catalog.get("shell").is_none());
        assert!(catalog.get("teleport").is_none());
    }
}
