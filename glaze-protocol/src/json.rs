//! JSON-lines framing for the editor bridge
//!
//! Inbound, one line holds one batch shaped like the editor's redraw
//! notification: an array of calls, each call an array whose first element
//! is the command name and whose remaining elements are argument lists.
//!
//! ```text
//! [["put", ["H"], ["i"]], ["cursor_goto", [0, 0]]]
//! ```
//!
//! Outbound, one line holds one encoded input as a JSON string.

use crate::command::RedrawCall;
use crate::error::{DecodeError, Result};
use crate::value::Value;

/// Parse one framed batch
pub fn parse_batch_line(line: &str) -> Result<Vec<RedrawCall>> {
    let json: serde_json::Value =
        serde_json::from_str(line).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    let serde_json::Value::Array(calls) = json else {
        return Err(DecodeError::Malformed("batch is not an array".to_string()));
    };

    calls.into_iter().map(parse_call).collect()
}

fn parse_call(json: serde_json::Value) -> Result<RedrawCall> {
    let serde_json::Value::Array(items) = json else {
        return Err(DecodeError::Malformed("call is not an array".to_string()));
    };
    let mut items = items.into_iter();
    let name = match items.next() {
        Some(serde_json::Value::String(name)) => name,
        _ => return Err(DecodeError::Malformed("call has no name".to_string())),
    };

    let args = items
        .map(|list| match Value::from(list) {
            Value::Array(values) => Ok(values),
            _ => Err(DecodeError::Malformed(format!(
                "'{}' argument list is not an array",
                name
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RedrawCall { name, args })
}

/// Frame one outbound input
pub fn encode_input_line(input: &str) -> String {
    // Serializing a str cannot fail
    serde_json::to_string(input).unwrap_or_default()
}
