//! Encode expression trees into their tagged JSON form.
//!
//! Every node becomes an object with a `"type"` field holding its tag. Int32
//! and Float64 values are written as decimal text rather than JSON numbers, so
//! that consumers whose JSON numbers are doubles cannot lose precision.

use serde_json::{Map, Value};

use crate::expression::{
    AnonymousCall, Boolean, Call, Definition, Expression, Float64, Id, Int32, Lambda, Module, Nil,
    Node, Str, Tag,
};

/// A trait for nodes that can be encoded into the wire format.
///
/// Encoding is total: every tree that can be constructed can be encoded.
pub trait Encode {
    fn encode(&self) -> Value;
}

/// Compact JSON rendering of a node. Falls back to the serializer's error
/// text rather than failing.
pub fn render<T: Encode + ?Sized>(node: &T) -> String {
    match serde_json::to_string(&node.encode()) {
        Ok(s) => s,
        Err(e) => e.to_string(),
    }
}

/// Start an object for a node, with its `"type"` field set.
fn tagged(tag: Tag) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("type".to_string(), Value::from(tag.value()));
    map
}

fn with_value<T: Node>(node: &T, value: impl Into<Value>) -> Value {
    let mut map = tagged(node.tag());
    map.insert("value".to_string(), value.into());
    Value::Object(map)
}

fn sequence<'a, T: Encode + 'a>(items: impl IntoIterator<Item = &'a T>) -> Value {
    Value::Array(items.into_iter().map(Encode::encode).collect())
}

/// Shortest decimal text that parses back to the same `f64`.
///
/// Rust's float formatting never uses an exponent and prints the fewest
/// digits that round-trip. Non-finite values come out as `NaN`, `inf` and
/// `-inf`, all of which `str::parse::<f64>` accepts again.
pub fn format_float64(value: f64) -> String {
    value.to_string()
}

impl Encode for Expression {
    fn encode(&self) -> Value {
        match self {
            Expression::Module(n) => n.encode(),
            Expression::Nil(n) => n.encode(),
            Expression::Boolean(n) => n.encode(),
            Expression::Int32(n) => n.encode(),
            Expression::Float64(n) => n.encode(),
            Expression::String(n) => n.encode(),
            Expression::Id(n) => n.encode(),
            Expression::Definition(n) => n.encode(),
            Expression::Lambda(n) => n.encode(),
            Expression::Call(n) => n.encode(),
            Expression::AnonymousCall(n) => n.encode(),
        }
    }
}

impl Encode for Module {
    fn encode(&self) -> Value {
        let mut map = tagged(self.tag());
        map.insert("name".to_string(), Value::from(self.name.as_str()));
        map.insert("definitions".to_string(), sequence(&self.definitions));
        Value::Object(map)
    }
}

impl Encode for Nil {
    fn encode(&self) -> Value {
        Value::Object(tagged(self.tag()))
    }
}

impl Encode for Boolean {
    fn encode(&self) -> Value {
        with_value(self, self.value)
    }
}

impl Encode for Int32 {
    fn encode(&self) -> Value {
        with_value(self, self.value.to_string())
    }
}

impl Encode for Float64 {
    fn encode(&self) -> Value {
        with_value(self, format_float64(self.value))
    }
}

impl Encode for Str {
    fn encode(&self) -> Value {
        with_value(self, self.value.as_str())
    }
}

impl Encode for Id {
    fn encode(&self) -> Value {
        with_value(self, self.value.as_str())
    }
}

impl Encode for Definition {
    fn encode(&self) -> Value {
        let mut map = tagged(self.tag());
        map.insert("id".to_string(), self.id.encode());
        map.insert("expression".to_string(), self.expression.encode());
        Value::Object(map)
    }
}

impl Encode for Lambda {
    fn encode(&self) -> Value {
        let mut map = tagged(self.tag());
        map.insert("parameters".to_string(), sequence(&self.parameters));
        map.insert("expression".to_string(), self.expression.encode());
        Value::Object(map)
    }
}

impl Encode for Call {
    fn encode(&self) -> Value {
        let mut map = tagged(self.tag());
        map.insert("id".to_string(), self.id.encode());
        map.insert("arguments".to_string(), sequence(&self.arguments));
        Value::Object(map)
    }
}

impl Encode for AnonymousCall {
    fn encode(&self) -> Value {
        let mut map = tagged(self.tag());
        map.insert("lambda".to_string(), self.lambda.encode());
        map.insert("arguments".to_string(), sequence(&self.arguments));
        Value::Object(map)
    }
}
