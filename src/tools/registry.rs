//! Ambient tool catalog with an explicit non-interactive allow-list.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::tool::Tool;

/// How a tool may be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPolicy {
    /// Safe to run unattended; eligible for autonomous agents.
    NonInteractive,
    /// Needs a human confirmation step; never handed to an agent.
    RequiresConfirmation,
}

/// The environment's tool catalog.
///
/// The allow-list of names safe for unattended execution is explicit state
/// on the registry, set at registration time, so the authorization gate has
/// no ambient or global coupling.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    non_interactive: HashSet<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under the given execution policy. A re-registration
    /// under the same name replaces the previous entry and its policy.
    pub fn register(&mut self, tool: Arc<dyn Tool>, policy: ExecutionPolicy) {
        let name = tool.name().to_string();
        match policy {
            ExecutionPolicy::NonInteractive => {
                self.non_interactive.insert(name.clone());
            }
            ExecutionPolicy::RequiresConfirmation => {
                self.non_interactive.remove(&name);
            }
        }
        self.tools.insert(name, tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Whether the named tool is safe for unattended execution.
    pub fn is_non_interactive(&self, name: &str) -> bool {
        self.non_interactive.contains(name)
    }

    /// Names of all tools safe for unattended execution.
    pub fn non_interactive_names(&self) -> impl Iterator<Item = &str> {
        self.non_interactive.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::tool::{AgentTool, ToolOutput};
    use crate::tools::types::ToolParameters;

    fn noop(name: &str) -> Arc<dyn Tool> {
        Arc::new(AgentTool::new(
            name,
            "noop",
            ToolParameters::empty(),
            |_, _| async { Ok(ToolOutput::json(serde_json::json!({}))) },
        ))
    }

    #[test]
    fn registration_tracks_the_allow_list() {
        let mut registry = ToolRegistry::new();
        registry.register(noop("read"), ExecutionPolicy::NonInteractive);
        registry.register(noop("shell"), ExecutionPolicy::RequiresConfirmation);

        assert!(registry.get("read").is_some());
        assert!(registry.get("shell").is_some());
        assert!(registry.is_non_interactive("read"));
        assert!(!registry.is_non_interactive("shell"));
    }

    #[test]
    fn re_registration_replaces_the_policy() {
        let mut registry = ToolRegistry::new();
        registry.register(noop("fs"), ExecutionPolicy::NonInteractive);
        registry.register(noop("fs"), ExecutionPolicy::RequiresConfirmation);

        assert!(!registry.is_non_interactive("fs"));
    }
}
