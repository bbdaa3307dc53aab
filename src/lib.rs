#![doc = include_str!("../API.md")]

pub mod decode;
pub mod encode;
pub mod expression;
pub mod fixtures;

#[cfg(feature = "serde")]
mod serde_impl;

#[cfg(feature = "cli")]
pub mod cli;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

// Re-export commonly used types for easier access
pub use decode::{DecodeError, DecodeOptions, FromJson, TagError};
pub use encode::Encode;
pub use expression::{
    AnonymousCall, Boolean, Call, Definition, Expression, Float64, Id, Int32, Lambda, Module, Nil,
    Node, Str, Tag,
};

/// Failure to read an expression from JSON text.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed JSON text: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Encode an expression tree into its tagged JSON form.
///
/// ```rust
/// use expr_json::{Expression, encode};
/// use serde_json::json;
///
/// let value = encode(&Expression::int32(-42));
/// assert_eq!(value, json!({"type": 4, "value": "-42"}));
/// ```
pub fn encode(expression: &Expression) -> Value {
    expression.encode()
}

/// Decode an expression tree from its tagged JSON form, leniently.
///
/// This is the main entry point for reading trees. See
/// [`decode_with_options`] to reject absent or mistyped fields, or to change
/// the nesting limit.
///
/// ```rust
/// use expr_json::{Expression, decode};
/// use serde_json::json;
///
/// let call = decode(&json!({
///     "type": 10,
///     "id": {"type": 7, "value": "print"},
///     "arguments": [{"type": 5, "value": "123.456"}]
/// }))
/// .unwrap();
/// assert_eq!(call, Expression::call("print", vec![Expression::float64(123.456)]));
///
/// let err = decode(&json!({"type": 0})).unwrap_err();
/// assert!(err.is_malformed());
/// ```
pub fn decode(value: &Value) -> Result<Expression, DecodeError> {
    decode_with_options(value, &DecodeOptions::default())
}

/// Decode an expression tree with explicit options.
pub fn decode_with_options(
    value: &Value,
    options: &DecodeOptions,
) -> Result<Expression, DecodeError> {
    Expression::from_json_with_options(value, options).inspect_err(|e| {
        debug!(error = %e, strict = options.strict, "failed to decode expression");
    })
}

/// Parse JSON text and decode the expression tree it holds.
pub fn from_str(input: &str) -> Result<Expression, Error> {
    from_str_with_options(input, &DecodeOptions::default())
}

/// Parse JSON text and decode it with explicit options.
///
/// `options.max_depth` bounds the text as well as the tree: input nested too
/// deeply fails with [`DecodeError::DepthExceeded`] before it is parsed.
pub fn from_str_with_options(input: &str, options: &DecodeOptions) -> Result<Expression, Error> {
    decode::check_nesting(input, options)?;
    let value = decode::parse_unbounded(input)?;
    Ok(decode_with_options(&value, options)?)
}

/// The canonical compact rendering; the same text as [`Expression::render`].
pub fn to_string(expression: &Expression) -> String {
    expression.render()
}

/// An indented rendering, for people.
pub fn to_string_pretty(expression: &Expression) -> String {
    match serde_json::to_string_pretty(&expression.encode()) {
        Ok(s) => s,
        Err(e) => e.to_string(),
    }
}
