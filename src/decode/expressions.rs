//! Decoders for each node kind, and the tag dispatch over all of them.

use serde_json::Value;
use tracing::trace;

use super::common::{DecodeError, Decoder, FromJson, decode_all, read_tag};
use crate::expression::{
    AnonymousCall, Boolean, Call, Definition, Expression, Float64, Id, Int32, Lambda, Module, Nil,
    Node, Str, Tag,
};

impl FromJson for Expression {
    fn decode_node(decoder: &mut Decoder, value: &Value) -> Result<Self, DecodeError> {
        let tag = read_tag(value)?;
        trace!(%tag, depth = decoder.depth(), "decoding expression");

        // The payload decoders run at this node's depth; they re-check the tag.
        Ok(match tag {
            Tag::Module => Module::decode_node(decoder, value)?.into(),
            Tag::Nil => Nil::decode_node(decoder, value)?.into(),
            Tag::Boolean => Boolean::decode_node(decoder, value)?.into(),
            Tag::Int32 => Int32::decode_node(decoder, value)?.into(),
            Tag::Float64 => Float64::decode_node(decoder, value)?.into(),
            Tag::String => Str::decode_node(decoder, value)?.into(),
            Tag::Id => Id::decode_node(decoder, value)?.into(),
            Tag::Definition => Definition::decode_node(decoder, value)?.into(),
            Tag::Lambda => Lambda::decode_node(decoder, value)?.into(),
            Tag::Call => Call::decode_node(decoder, value)?.into(),
            Tag::AnonymousCall => AnonymousCall::decode_node(decoder, value)?.into(),
        })
    }
}

impl FromJson for Module {
    fn decode_node(decoder: &mut Decoder, value: &Value) -> Result<Self, DecodeError> {
        let fields = decoder.open(value, Self::TAG)?;
        let name = fields.text("name")?;
        let definitions = decode_all(decoder, fields.sequence("definitions")?)?;
        Ok(Module { name, definitions })
    }
}

impl FromJson for Nil {
    fn decode_node(decoder: &mut Decoder, value: &Value) -> Result<Self, DecodeError> {
        decoder.open(value, Self::TAG)?;
        Ok(Nil)
    }
}

impl FromJson for Boolean {
    fn decode_node(decoder: &mut Decoder, value: &Value) -> Result<Self, DecodeError> {
        let fields = decoder.open(value, Self::TAG)?;
        Ok(Boolean {
            value: fields.boolean("value")?,
        })
    }
}

impl FromJson for Int32 {
    fn decode_node(decoder: &mut Decoder, value: &Value) -> Result<Self, DecodeError> {
        let fields = decoder.open(value, Self::TAG)?;
        let text = fields.text("value")?;
        match text.parse::<i32>() {
            Ok(value) => Ok(Int32 { value }),
            Err(source) => Err(DecodeError::InvalidInt32 { text, source }),
        }
    }
}

impl FromJson for Float64 {
    fn decode_node(decoder: &mut Decoder, value: &Value) -> Result<Self, DecodeError> {
        let fields = decoder.open(value, Self::TAG)?;
        let text = fields.text("value")?;
        match text.parse::<f64>() {
            Ok(value) if value.is_infinite() && !is_infinity_spelling(&text) => {
                Err(DecodeError::Float64OutOfRange(text))
            }
            Ok(value) => Ok(Float64 { value }),
            Err(source) => Err(DecodeError::InvalidFloat64 { text, source }),
        }
    }
}

/// True for the explicit infinity spellings, as opposed to finite digits too
/// large for an f64.
fn is_infinity_spelling(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

impl FromJson for Str {
    fn decode_node(decoder: &mut Decoder, value: &Value) -> Result<Self, DecodeError> {
        let fields = decoder.open(value, Self::TAG)?;
        Ok(Str {
            value: fields.text("value")?,
        })
    }
}

impl FromJson for Id {
    fn decode_node(decoder: &mut Decoder, value: &Value) -> Result<Self, DecodeError> {
        let fields = decoder.open(value, Self::TAG)?;
        Ok(Id {
            value: fields.text("value")?,
        })
    }
}

impl FromJson for Definition {
    fn decode_node(decoder: &mut Decoder, value: &Value) -> Result<Self, DecodeError> {
        let fields = decoder.open(value, Self::TAG)?;
        let id = Id::decode_with(decoder, fields.child("id")?)?;
        let expression = Expression::decode_with(decoder, fields.child("expression")?)?;
        Ok(Definition {
            id,
            expression: Box::new(expression),
        })
    }
}

impl FromJson for Lambda {
    fn decode_node(decoder: &mut Decoder, value: &Value) -> Result<Self, DecodeError> {
        let fields = decoder.open(value, Self::TAG)?;
        let parameters = decode_all(decoder, fields.sequence("parameters")?)?;
        let expression = Expression::decode_with(decoder, fields.child("expression")?)?;
        Ok(Lambda {
            parameters,
            expression: Box::new(expression),
        })
    }
}

impl FromJson for Call {
    fn decode_node(decoder: &mut Decoder, value: &Value) -> Result<Self, DecodeError> {
        let fields = decoder.open(value, Self::TAG)?;
        let id = Id::decode_with(decoder, fields.child("id")?)?;
        let arguments = decode_all(decoder, fields.sequence("arguments")?)?;
        Ok(Call { id, arguments })
    }
}

impl FromJson for AnonymousCall {
    fn decode_node(decoder: &mut Decoder, value: &Value) -> Result<Self, DecodeError> {
        let fields = decoder.open(value, Self::TAG)?;
        let lambda = Lambda::decode_with(decoder, fields.child("lambda")?)?;
        let arguments = decode_all(decoder, fields.sequence("arguments")?)?;
        Ok(AnonymousCall { lambda, arguments })
    }
}
