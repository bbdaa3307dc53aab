//! Sample trees covering every node kind, shared by the unit tests, the
//! integration tests and the CLI tests.

use crate::expression::{AnonymousCall, Definition, Expression, Lambda, Module, Tag};

/// A representative tree for the given node kind.
pub fn sample(tag: Tag) -> Expression {
    match tag {
        Tag::Module => Module::new("test", vec![]).into(),
        Tag::Nil => Expression::nil(),
        Tag::Boolean => Expression::boolean(false),
        Tag::Int32 => Expression::int32(23),
        Tag::Float64 => Expression::float64(0.0000582),
        Tag::String => Expression::string("Hello, world!"),
        Tag::Id => Expression::id("id"),
        Tag::Definition => Expression::definition("definitionID", Expression::int32(-42)),
        Tag::Lambda => Expression::lambda(["x"], Expression::id("x")),
        Tag::Call => Expression::call("test", vec![Expression::float64(123.456)]),
        Tag::AnonymousCall => AnonymousCall::new(
            Lambda::new(["a"], Expression::id("a")),
            vec![Expression::string("a's value")],
        )
        .into(),
    }
}

/// One sample per node kind, in tag order, labelled with the kind's name.
pub fn samples() -> Vec<(&'static str, Expression)> {
    Tag::ALL
        .into_iter()
        .map(|tag| (tag.name(), sample(tag)))
        .collect()
}

/// A module exercising every node kind at once.
pub fn program() -> Module {
    Module::new(
        "program",
        vec![
            Definition::new("nothing", Expression::nil()),
            Definition::new("yes", Expression::boolean(true)),
            Definition::new("answer", Expression::int32(-42)),
            Definition::new("tiny", Expression::float64(0.0000582)),
            Definition::new("greeting", Expression::string("Hello, world!")),
            Definition::new("alias", Expression::id("greeting")),
            Definition::new(
                "pair",
                Expression::lambda(
                    ["a", "b"],
                    Expression::call("list", vec![Expression::id("a"), Expression::id("b")]),
                ),
            ),
            Definition::new(
                "main",
                Expression::anonymous_call(
                    Lambda::new(["x"], Expression::call("pair", vec![Expression::id("x")])),
                    vec![Expression::call("now", vec![])],
                ),
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_match_their_tags() {
        for (name, expression) in samples() {
            assert_eq!(expression.tag().name(), name);
        }
    }
}
