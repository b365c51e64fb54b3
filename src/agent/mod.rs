//! Agent engine: definitions, authorization, turn loop, and events.

pub mod catalog;
pub mod completion;
pub mod definition;
pub mod dispatch;
pub mod events;
pub mod executor;
pub mod stream;
pub mod types;

pub use catalog::IsolatedCatalog;
pub use completion::{CompletionHandler, CompletionOutcome, FINISH_TOOL_NAME};
pub use definition::{
    AgentDefinition, AgentInputs, InputSpec, InputType, ModelConfig, OutputConfig, PromptConfig,
    RunConfig,
};
pub use events::{ActivityEmitter, ActivityEvent, ActivitySink};
pub use executor::AgentExecutor;
pub use stream::{StreamProcessor, ValidatedResponse};
pub use types::{AgentOutput, TerminateReason};
