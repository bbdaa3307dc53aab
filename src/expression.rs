//! The expression tree: a closed set of eleven node kinds.
//!
//! Every node kind is a plain struct; [`Expression`] is the sum of all of
//! them. Nodes that can only ever hold an identifier (a definition's name, a
//! call's target, a lambda's parameters) are typed as [`Id`] rather than
//! [`Expression`], so a tree that is constructed is always well-formed.

use std::fmt;

use crate::decode::TagError;
use crate::encode::render;

/// The stable wire tag of each node kind.
///
/// These numbers are part of the wire format and must never be renumbered or
/// reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    Module = 1,
    Nil = 2,
    Boolean = 3,
    Int32 = 4,
    Float64 = 5,
    String = 6,
    Id = 7,
    Definition = 8,
    Lambda = 9,
    Call = 10,
    AnonymousCall = 11,
}

impl Tag {
    /// All tags, in wire order.
    pub const ALL: [Tag; 11] = [
        Tag::Module,
        Tag::Nil,
        Tag::Boolean,
        Tag::Int32,
        Tag::Float64,
        Tag::String,
        Tag::Id,
        Tag::Definition,
        Tag::Lambda,
        Tag::Call,
        Tag::AnonymousCall,
    ];

    /// The number written to the `"type"` field.
    pub fn value(self) -> u64 {
        self as u64
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::Module => "Module",
            Tag::Nil => "Nil",
            Tag::Boolean => "Boolean",
            Tag::Int32 => "Int32",
            Tag::Float64 => "Float64",
            Tag::String => "String",
            Tag::Id => "ID",
            Tag::Definition => "Definition",
            Tag::Lambda => "Lambda",
            Tag::Call => "Call",
            Tag::AnonymousCall => "AnonymousCall",
        }
    }
}

impl TryFrom<u64> for Tag {
    type Error = TagError;

    /// Look up a tag by its wire number.
    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Tag::ALL
            .into_iter()
            .find(|t| t.value() == value)
            .ok_or(TagError::Unknown(value))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.value())
    }
}

/// Implemented by every node kind; ties the Rust type to its wire tag.
pub trait Node {
    const TAG: Tag;

    fn tag(&self) -> Tag {
        Self::TAG
    }
}

/// A module: the top-level container of definitions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub name: String,
    pub definitions: Vec<Definition>,
}

/// The unit literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Nil;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Boolean {
    pub value: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Int32 {
    pub value: i32,
}

/// A 64-bit float literal. Equality is IEEE equality; compare
/// `value.to_bits()` when bit-identity matters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Float64 {
    pub value: f64,
}

/// A string literal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Str {
    pub value: String,
}

/// An identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Id {
    pub value: String,
}

/// Binds a name to the value of an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub id: Id,
    pub expression: Box<Expression>,
}

/// A procedure literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub parameters: Vec<Id>,
    pub expression: Box<Expression>,
}

/// Invocation of a named procedure.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub id: Id,
    pub arguments: Vec<Expression>,
}

/// Invocation of a lambda literal in place.
#[derive(Debug, Clone, PartialEq)]
pub struct AnonymousCall {
    pub lambda: Lambda,
    pub arguments: Vec<Expression>,
}

/// Any node of the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Module(Module),
    Nil(Nil),
    Boolean(Boolean),
    Int32(Int32),
    Float64(Float64),
    String(Str),
    Id(Id),
    Definition(Definition),
    Lambda(Lambda),
    Call(Call),
    AnonymousCall(AnonymousCall),
}

// Wires a node struct to its tag, its `Expression` variant and its rendering.
macro_rules! node {
    ($ty:ident, $variant:ident) => {
        impl Node for $ty {
            const TAG: Tag = Tag::$variant;
        }

        impl From<$ty> for Expression {
            fn from(node: $ty) -> Self {
                Expression::$variant(node)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&render(self))
            }
        }
    };
}

node!(Module, Module);
node!(Nil, Nil);
node!(Boolean, Boolean);
node!(Int32, Int32);
node!(Float64, Float64);
node!(Str, String);
node!(Id, Id);
node!(Definition, Definition);
node!(Lambda, Lambda);
node!(Call, Call);
node!(AnonymousCall, AnonymousCall);

impl Module {
    pub fn new(name: impl Into<String>, definitions: Vec<Definition>) -> Self {
        Self {
            name: name.into(),
            definitions,
        }
    }
}

impl Str {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl Id {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::new(value)
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id { value }
    }
}

impl Definition {
    pub fn new(id: impl Into<Id>, expression: impl Into<Expression>) -> Self {
        Self {
            id: id.into(),
            expression: Box::new(expression.into()),
        }
    }
}

impl Lambda {
    pub fn new<I, P>(parameters: I, expression: impl Into<Expression>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Id>,
    {
        Self {
            parameters: parameters.into_iter().map(Into::into).collect(),
            expression: Box::new(expression.into()),
        }
    }
}

impl Call {
    pub fn new(id: impl Into<Id>, arguments: Vec<Expression>) -> Self {
        Self {
            id: id.into(),
            arguments,
        }
    }
}

impl AnonymousCall {
    pub fn new(lambda: Lambda, arguments: Vec<Expression>) -> Self {
        Self { lambda, arguments }
    }
}

// Builder methods for expressions
impl Expression {
    pub fn module(name: impl Into<String>, definitions: Vec<Definition>) -> Self {
        Module::new(name, definitions).into()
    }

    pub fn nil() -> Self {
        Expression::Nil(Nil)
    }

    pub fn boolean(value: bool) -> Self {
        Expression::Boolean(Boolean { value })
    }

    pub fn int32(value: i32) -> Self {
        Expression::Int32(Int32 { value })
    }

    pub fn float64(value: f64) -> Self {
        Expression::Float64(Float64 { value })
    }

    pub fn string(value: impl Into<String>) -> Self {
        Str::new(value).into()
    }

    pub fn id(value: impl Into<String>) -> Self {
        Id::new(value).into()
    }

    pub fn definition(id: impl Into<Id>, expression: impl Into<Expression>) -> Self {
        Definition::new(id, expression).into()
    }

    pub fn lambda<I, P>(parameters: I, expression: impl Into<Expression>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Id>,
    {
        Lambda::new(parameters, expression).into()
    }

    pub fn call(id: impl Into<Id>, arguments: Vec<Expression>) -> Self {
        Call::new(id, arguments).into()
    }

    pub fn anonymous_call(lambda: Lambda, arguments: Vec<Expression>) -> Self {
        AnonymousCall::new(lambda, arguments).into()
    }

    /// The wire tag of this node's variant.
    pub fn tag(&self) -> Tag {
        match self {
            Expression::Module(n) => n.tag(),
            Expression::Nil(n) => n.tag(),
            Expression::Boolean(n) => n.tag(),
            Expression::Int32(n) => n.tag(),
            Expression::Float64(n) => n.tag(),
            Expression::String(n) => n.tag(),
            Expression::Id(n) => n.tag(),
            Expression::Definition(n) => n.tag(),
            Expression::Lambda(n) => n.tag(),
            Expression::Call(n) => n.tag(),
            Expression::AnonymousCall(n) => n.tag(),
        }
    }

    /// The canonical compact JSON rendering of this tree.
    ///
    /// Never fails: should serialization ever error, the error's text is
    /// returned in place of the rendering.
    pub fn render(&self) -> String {
        render(self)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
