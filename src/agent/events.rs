//! Observable activity stream.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Callback receiving activity events.
pub type ActivitySink = Arc<dyn Fn(ActivityEvent) + Send + Sync>;

/// State transitions surfaced to observers.
///
/// Emitted synchronously and never buffered: without a subscriber the
/// event is simply lost. This is observability, not a ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityEvent {
    ThoughtChunk {
        text: String,
    },
    ToolCallStart {
        name: String,
        args: serde_json::Value,
    },
    ToolCallEnd {
        name: String,
        output: serde_json::Value,
    },
    Error {
        context: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        error: String,
    },
}

/// Emits activity events to the optional caller-supplied sink.
#[derive(Clone, Default)]
pub struct ActivityEmitter {
    sink: Option<ActivitySink>,
}

impl ActivityEmitter {
    pub fn new(sink: Option<ActivitySink>) -> Self {
        Self { sink }
    }

    pub fn emit(&self, event: ActivityEvent) {
        if let Some(sink) = &self.sink {
            (sink)(event);
        }
    }

    pub fn thought(&self, text: impl Into<String>) {
        self.emit(ActivityEvent::ThoughtChunk { text: text.into() });
    }

    pub fn tool_start(&self, name: &str, args: &serde_json::Value) {
        self.emit(ActivityEvent::ToolCallStart {
            name: name.to_string(),
            args: args.clone(),
        });
    }

    pub fn tool_end(&self, name: &str, output: serde_json::Value) {
        self.emit(ActivityEvent::ToolCallEnd {
            name: name.to_string(),
            output,
        });
    }

    pub fn error(&self, context: &str, name: Option<&str>, error: impl std::fmt::Display) {
        self.emit(ActivityEvent::Error {
            context: context.to_string(),
            name: name.map(str::to_string),
            error: error.to_string(),
        });
    }
}
