//! Drover — autonomous tool-calling agent engine
//!
//! Given a goal, a set of permitted tools, and a model transport, Drover
//! drives a bounded conversation loop: the model inspects state through
//! tools and must explicitly submit a result, while the engine enforces
//! the authorization, turn, and time limits the model itself cannot be
//! trusted to respect.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use drover::prelude::*;
//!
//! # async fn example(transport: Arc<dyn drover::provider::ModelTransport>) -> drover::error::Result<()> {
//! let registry = ToolRegistry::new();
//!
//! let definition = AgentDefinition::builder()
//!     .name("researcher".to_string())
//!     .description("Looks things up".to_string())
//!     .model_config(ModelConfig::new("gemini-2.5-pro"))
//!     .prompt_config(PromptConfig::new("Research interesting things."))
//!     .build();
//!
//! let executor = AgentExecutor::new(definition, transport, &registry, None)?;
//! let output = executor
//!     .run(AgentInputs::new(), Default::default())
//!     .await?;
//! println!("{}: {}", output.terminate_reason, output.result);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod types;
pub mod util;
