//! Reply extraction from the workflow run envelope.
//!
//! A run returns `outputs[].outputs[]` where each inner entry is one component
//! result. Depending on the flow and server version the chat text lives in one
//! of several places, tried in this order:
//!
//! 1. `results.message.data.text`
//! 2. `results.message.text`
//! 3. `artifacts.message`
//! 4. `outputs.message.message`
//! 5. `messages[0].message`, only when the envelope mentions `message` at all
//!
//! Paths 1-4 are only consulted when `results.message` is an object. Path 5
//! needs a first component result, so an empty `outputs[0].outputs` there is
//! a malformed envelope rather than a missing reply.

use serde_json::{Map, Value};

use super::interface::WorkflowError;

type Object = Map<String, Value>;

/// Pull the reply text out of a workflow envelope.
///
/// Missing fields yield [`WorkflowError::NoReply`]; containers of the wrong
/// type along the `outputs[0].outputs[0]` spine yield
/// [`WorkflowError::Malformed`].
pub fn extract_reply(envelope: &Value) -> Result<String, WorkflowError> {
    let root = envelope
        .as_object()
        .ok_or_else(|| malformed("envelope is not an object"))?;
    let first = first_result(root)?;

    if let Some(text) = first.and_then(primary_text) {
        return Ok(text.to_string());
    }

    if envelope.to_string().contains("message") {
        if first.is_none() && inner_results_empty(root) {
            return Err(malformed("`outputs[0].outputs` is empty"));
        }
        if let Some(text) = first.and_then(message_list_text) {
            return Ok(text.to_string());
        }
    }

    Err(WorkflowError::NoReply)
}

/// `outputs[0].outputs[0]`, or `None` when either list is absent or empty.
fn first_result(root: &Object) -> Result<Option<&Object>, WorkflowError> {
    let Some(outputs) = present(root, "outputs") else {
        return Ok(None);
    };
    let outputs = outputs
        .as_array()
        .ok_or_else(|| malformed("`outputs` is not an array"))?;
    let Some(run) = outputs.first() else {
        return Ok(None);
    };
    let run = run
        .as_object()
        .ok_or_else(|| malformed("`outputs[0]` is not an object"))?;

    let Some(results) = present(run, "outputs") else {
        return Ok(None);
    };
    let results = results
        .as_array()
        .ok_or_else(|| malformed("`outputs[0].outputs` is not an array"))?;
    match results.first() {
        None => Ok(None),
        Some(result) => result
            .as_object()
            .map(Some)
            .ok_or_else(|| malformed("`outputs[0].outputs[0]` is not an object")),
    }
}

/// True when `outputs[0].outputs` is present as an empty array.
fn inner_results_empty(root: &Object) -> bool {
    present(root, "outputs")
        .and_then(Value::as_array)
        .and_then(|outputs| outputs.first())
        .and_then(|run| run.get("outputs"))
        .and_then(Value::as_array)
        .is_some_and(|results| results.is_empty())
}

fn primary_text(result: &Object) -> Option<&str> {
    let message = result.get("results")?.get("message")?.as_object()?;

    let candidates = [
        message.get("data").and_then(|data| data.get("text")),
        message.get("text"),
        result.get("artifacts").and_then(|a| a.get("message")),
        result
            .get("outputs")
            .and_then(|o| o.get("message"))
            .and_then(|m| m.get("message")),
    ];
    candidates.into_iter().flatten().find_map(non_empty_str)
}

fn message_list_text(result: &Object) -> Option<&str> {
    result
        .get("messages")?
        .as_array()?
        .first()?
        .get("message")
        .and_then(non_empty_str)
}

fn present<'a>(object: &'a Object, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| !v.is_null())
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}

fn malformed(reason: &str) -> WorkflowError {
    WorkflowError::Malformed(reason.to_string())
}
