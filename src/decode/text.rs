//! Reading JSON text ahead of decoding.
//!
//! serde_json caps nesting at 128 levels, below the default node limit, so
//! text is parsed with that cap lifted. A flat scan bounds the nesting first,
//! which keeps the parser's recursion within what the node limit allows.

use serde::Deserialize;
use serde_json::Value;

use super::common::{DecodeError, DecodeOptions};

/// JSON nesting allowed for a node limit: every node is an object, and one
/// held in a sequence field sits inside an array as well.
fn json_levels(max_depth: usize) -> usize {
    max_depth.saturating_mul(2).saturating_add(1)
}

/// Reject text whose bracket nesting can't fit within `options.max_depth`
/// nodes. Syntax is not checked here; the parser reports it.
pub fn check_nesting(input: &str, options: &DecodeOptions) -> Result<(), DecodeError> {
    let limit = json_levels(options.max_depth);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for byte in input.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > limit {
                    return Err(DecodeError::DepthExceeded(options.max_depth));
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Parse a single JSON document without serde_json's recursion cap. Callers
/// run [`check_nesting`] first.
pub fn parse_unbounded(input: &str) -> Result<Value, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_str(input);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}
