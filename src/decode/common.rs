use std::num::{ParseFloatError, ParseIntError};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::expression::Tag;

/// Default limit on node nesting accepted by the decoder.
pub const DEFAULT_MAX_DEPTH: usize = 256;

static NULL: Value = Value::Null;

/// Why a node's `"type"` tag was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("expected an object, found {0}")]
    NotAnObject(&'static str),
    #[error("missing \"type\" field")]
    Missing,
    #[error("\"type\" must be an unsigned integer, found {0}")]
    NotAnInteger(String),
    #[error("unknown type tag {0}")]
    Unknown(u64),
    #[error("expected {expected}, found {found}")]
    Mismatch { expected: Tag, found: Tag },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The input does not have the shape of the node being decoded: its tag
    /// is missing, unknown, or belongs to another node kind.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] TagError),
    #[error("invalid Int32 value {text:?}: {source}")]
    InvalidInt32 { text: String, source: ParseIntError },
    #[error("invalid Float64 value {text:?}: {source}")]
    InvalidFloat64 {
        text: String,
        source: ParseFloatError,
    },
    #[error("Float64 value {0:?} is out of range")]
    Float64OutOfRange(String),
    #[error("{node}: missing field \"{field}\"")]
    MissingField { node: Tag, field: &'static str },
    #[error("{node}: field \"{field}\" must be {expected}, found {found}")]
    InvalidField {
        node: Tag,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("input nesting exceeds the maximum depth of {0}")]
    DepthExceeded(usize),
}

impl DecodeError {
    /// True for the malformed-input kind: a bad or mismatched tag.
    pub fn is_malformed(&self) -> bool {
        matches!(self, DecodeError::InvalidJson(_))
    }
}

/// Controls how forgiving the decoder is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// When false (the default), absent or `null` scalar fields decode to
    /// their zero value (`""` or `false`), scalars of the wrong JSON kind are
    /// coerced, and absent sequences decode as empty. When true, all of
    /// these are errors.
    pub strict: bool,
    /// Maximum nesting depth of nodes; the root is at depth 1.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strict: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    pub fn lenient() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// The JSON kind of a value, for diagnostics.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read the `"type"` tag of a node.
pub fn read_tag(value: &Value) -> Result<Tag, TagError> {
    let map = value
        .as_object()
        .ok_or_else(|| TagError::NotAnObject(kind_name(value)))?;
    match map.get("type") {
        None => Err(TagError::Missing),
        Some(Value::Number(n)) => {
            let number = n
                .as_u64()
                .ok_or_else(|| TagError::NotAnInteger(n.to_string()))?;
            Tag::try_from(number)
        }
        Some(other) => Err(TagError::NotAnInteger(other.to_string())),
    }
}

/// State of a single decode call: the options in force and how deep the
/// descent currently is.
pub struct Decoder<'a> {
    options: &'a DecodeOptions,
    depth: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(options: &'a DecodeOptions) -> Self {
        Self { options, depth: 0 }
    }

    pub fn options(&self) -> &DecodeOptions {
        self.options
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Run `f` one level deeper, failing if that exceeds the depth limit.
    pub(crate) fn descend<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        if self.depth >= self.options.max_depth {
            return Err(DecodeError::DepthExceeded(self.options.max_depth));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Check that `value` is a node tagged `expected` and give access to its
    /// fields.
    pub fn open<'v>(&self, value: &'v Value, expected: Tag) -> Result<Fields<'v>, DecodeError> {
        let found = read_tag(value)?;
        if found != expected {
            return Err(TagError::Mismatch { expected, found }.into());
        }
        // read_tag already rejected anything that isn't an object.
        let map = value
            .as_object()
            .ok_or(TagError::NotAnObject(kind_name(value)))?;
        Ok(Fields {
            node: expected,
            map,
            strict: self.options.strict,
        })
    }
}

/// A trait for nodes that can be rebuilt from their tagged JSON form.
///
/// Each implementation validates its own tag, so it can be used both as an
/// entry point and for a typed child field (a definition's `id`, say).
pub trait FromJson: Sized {
    /// Decode one node at the decoder's current depth. Children must go
    /// through [`FromJson::decode_with`] so the depth limit applies to them.
    fn decode_node(decoder: &mut Decoder, value: &Value) -> Result<Self, DecodeError>;

    /// Decode one node one level below the current depth.
    fn decode_with(decoder: &mut Decoder, value: &Value) -> Result<Self, DecodeError> {
        decoder.descend(|d| Self::decode_node(d, value))
    }

    fn from_json(value: &Value) -> Result<Self, DecodeError> {
        Self::from_json_with_options(value, &DecodeOptions::default())
    }

    fn from_json_with_options(value: &Value, options: &DecodeOptions) -> Result<Self, DecodeError> {
        let mut decoder = Decoder::new(options);
        Self::decode_with(&mut decoder, value)
    }
}

/// Decode every element of a sequence field, stopping at the first failure.
pub fn decode_all<T: FromJson>(
    decoder: &mut Decoder,
    items: &[Value],
) -> Result<Vec<T>, DecodeError> {
    items
        .iter()
        .map(|item| T::decode_with(decoder, item))
        .collect()
}

/// Field accessors for one node, applying the lenient or strict policy.
pub struct Fields<'v> {
    node: Tag,
    map: &'v Map<String, Value>,
    strict: bool,
}

impl<'v> Fields<'v> {
    fn get(&self, field: &'static str) -> Option<&'v Value> {
        self.map.get(field)
    }

    fn missing(&self, field: &'static str) -> DecodeError {
        DecodeError::MissingField {
            node: self.node,
            field,
        }
    }

    fn invalid(&self, field: &'static str, expected: &'static str, found: &Value) -> DecodeError {
        DecodeError::InvalidField {
            node: self.node,
            field,
            expected,
            found: kind_name(found),
        }
    }

    /// A text field.
    pub fn text(&self, field: &'static str) -> Result<String, DecodeError> {
        match (self.get(field), self.strict) {
            (Some(Value::String(s)), _) => Ok(s.clone()),
            (None, true) => Err(self.missing(field)),
            (Some(other), true) => Err(self.invalid(field, "a string", other)),
            (None | Some(Value::Null), false) => Ok(String::new()),
            (Some(Value::Number(n)), false) => Ok(n.to_string()),
            (Some(Value::Bool(b)), false) => Ok(b.to_string()),
            (Some(other), false) => Err(self.invalid(field, "a string", other)),
        }
    }

    /// A boolean field.
    pub fn boolean(&self, field: &'static str) -> Result<bool, DecodeError> {
        match (self.get(field), self.strict) {
            (Some(Value::Bool(b)), _) => Ok(*b),
            (None, true) => Err(self.missing(field)),
            (Some(other), true) => Err(self.invalid(field, "a boolean", other)),
            (None | Some(Value::Null), false) => Ok(false),
            (Some(Value::Number(n)), false) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
            (Some(Value::String(s)), false) => Ok(s.eq_ignore_ascii_case("true")),
            (Some(other), false) => Err(self.invalid(field, "a boolean", other)),
        }
    }

    /// A sequence field. Its elements are decoded by the caller.
    pub fn sequence(&self, field: &'static str) -> Result<&'v [Value], DecodeError> {
        match (self.get(field), self.strict) {
            (Some(Value::Array(items)), _) => Ok(items.as_slice()),
            (None, true) => Err(self.missing(field)),
            (None | Some(Value::Null), false) => Ok(&[]),
            (Some(other), _) => Err(self.invalid(field, "an array", other)),
        }
    }

    /// A nested node field. An absent child reads as `null`, which the
    /// child's decoder then rejects as malformed.
    pub fn child(&self, field: &'static str) -> Result<&'v Value, DecodeError> {
        match self.get(field) {
            Some(value) => Ok(value),
            None if self.strict => Err(self.missing(field)),
            None => Ok(&NULL),
        }
    }
}
