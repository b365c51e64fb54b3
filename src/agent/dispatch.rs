//! Concurrent execution of one turn's tool call batch.

use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use super::catalog::IsolatedCatalog;
use super::events::ActivityEmitter;
use crate::tools::arguments::ToolArguments;
use crate::tools::tool::ToolContext;
use crate::tools::validation::validate_arguments;
use crate::types::{ToolCallRequest, ToolCallResult};

/// Execute a batch of tool calls concurrently.
///
/// Returns one result per request, in request order regardless of
/// completion order, so the model's correlation ids line up
/// deterministically. An individual failure never aborts its siblings.
pub async fn dispatch(
    catalog: &IsolatedCatalog,
    requests: &[ToolCallRequest],
    emitter: &ActivityEmitter,
    signal: &CancellationToken,
) -> Vec<ToolCallResult> {
    let calls = requests
        .iter()
        .map(|request| execute_call(catalog, request, emitter, signal.child_token()));
    join_all(calls).await
}

/// Whether a batch produced nothing but failures. Such a turn is fed back
/// as a single corrective message so the model changes strategy instead of
/// repeating the rejected request.
pub fn all_failed(results: &[ToolCallResult]) -> bool {
    !results.is_empty() && results.iter().all(|result| result.is_error)
}

async fn execute_call(
    catalog: &IsolatedCatalog,
    request: &ToolCallRequest,
    emitter: &ActivityEmitter,
    signal: CancellationToken,
) -> ToolCallResult {
    emitter.tool_start(&request.name, &request.args);

    // Runtime re-check of the authorization boundary: the model may name
    // tools outside its catalog. Denial must not touch the tool itself.
    let Some(tool) = catalog.get(&request.name) else {
        emitter.error(
            "authorization",
            Some(&request.name),
            "not in this agent's tool catalog",
        );
        return ToolCallResult::error(
            request,
            format!("Tool '{}' is not available to this agent.", request.name),
        );
    };

    if let Err(violation) = validate_arguments(&request.args, &tool.parameters().schema) {
        emitter.error("validation", Some(&request.name), &violation);
        return ToolCallResult::error(
            request,
            format!("Invalid arguments for '{}': {violation}", request.name),
        );
    }

    let ctx = ToolContext {
        tool_call_id: request.id.clone(),
        tool_name: request.name.clone(),
        signal,
    };
    let args = ToolArguments::new(request.args.clone());
    match tool.execute(&args, &ctx).await {
        Ok(output) => {
            emitter.tool_end(&request.name, output.payload.clone());
            let result = ToolCallResult::ok(request, output.payload);
            match output.display {
                Some(display) => result.with_display(display),
                None => result,
            }
        }
        Err(e) => {
            tracing::warn!(tool = %request.name, error = %e, "Tool execution failed");
            emitter.error("execution", Some(&request.name), &e);
            ToolCallResult::error(request, e.to_string())
        }
    }
}
