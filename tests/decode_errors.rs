//! Malformed input is rejected with a diagnosable error, never a partial tree.

use expr_json::fixtures::sample;
use expr_json::{
    AnonymousCall, Boolean, Call, DecodeError, DecodeOptions, Definition, Expression, Float64,
    FromJson, Id, Int32, Lambda, Module, Nil, Str, Tag, TagError, decode, decode_with_options,
    encode, from_str, from_str_with_options,
};
use rstest::rstest;
use serde_json::{Value, json};

/// Decode `value` with the constructor of one specific node kind.
fn decode_as(tag: Tag, value: &Value) -> Result<(), DecodeError> {
    match tag {
        Tag::Module => Module::from_json(value).map(drop),
        Tag::Nil => Nil::from_json(value).map(drop),
        Tag::Boolean => Boolean::from_json(value).map(drop),
        Tag::Int32 => Int32::from_json(value).map(drop),
        Tag::Float64 => Float64::from_json(value).map(drop),
        Tag::String => Str::from_json(value).map(drop),
        Tag::Id => Id::from_json(value).map(drop),
        Tag::Definition => Definition::from_json(value).map(drop),
        Tag::Lambda => Lambda::from_json(value).map(drop),
        Tag::Call => Call::from_json(value).map(drop),
        Tag::AnonymousCall => AnonymousCall::from_json(value).map(drop),
    }
}

#[test]
fn test_constructors_only_accept_their_own_tag() {
    for expected in Tag::ALL {
        for found in Tag::ALL {
            let value = encode(&sample(found));
            let result = decode_as(expected, &value);
            if expected == found {
                assert_eq!(result, Ok(()), "{expected} should accept its own sample");
            } else {
                assert_eq!(
                    result,
                    Err(DecodeError::InvalidJson(TagError::Mismatch { expected, found })),
                    "{expected} given {found}"
                );
            }
        }
    }
}

#[rstest]
#[case::zero(json!({"type": 0, "value": true}), TagError::Unknown(0))]
#[case::past_the_end(json!({"type": 12}), TagError::Unknown(12))]
#[case::huge(json!({"type": u64::MAX}), TagError::Unknown(u64::MAX))]
#[case::missing(json!({"value": "x"}), TagError::Missing)]
#[case::negative(json!({"type": -7}), TagError::NotAnInteger("-7".to_string()))]
#[case::fractional(json!({"type": 7.0}), TagError::NotAnInteger("7.0".to_string()))]
#[case::text(json!({"type": "7"}), TagError::NotAnInteger("\"7\"".to_string()))]
#[case::null_tag(json!({"type": null}), TagError::NotAnInteger("null".to_string()))]
#[case::array(json!([7, "x"]), TagError::NotAnObject("an array"))]
#[case::string(json!("x"), TagError::NotAnObject("a string"))]
#[case::null(Value::Null, TagError::NotAnObject("null"))]
fn test_top_level_rejects_bad_tags(#[case] input: Value, #[case] expected: TagError) {
    let err = decode(&input).unwrap_err();
    assert!(err.is_malformed());
    assert_eq!(err, DecodeError::InvalidJson(expected));
}

#[test]
fn test_boolean_with_invalid_tag() {
    let mut value = encode(&Expression::boolean(true));
    value["type"] = json!(0);
    assert_eq!(
        decode(&value),
        Err(DecodeError::InvalidJson(TagError::Unknown(0)))
    );
}

#[test]
fn test_parse_error_propagates_through_every_level() {
    let bad_int = json!({"type": 4, "value": "not a number"});
    let expected = Int32::from_json(&bad_int).unwrap_err();
    assert!(matches!(expected, DecodeError::InvalidInt32 { .. }));

    let definition = json!({
        "type": 8,
        "id": {"type": 7, "value": "broken"},
        "expression": bad_int
    });
    assert_eq!(Definition::from_json(&definition), Err(expected.clone()));

    let module = json!({
        "type": 1,
        "name": "m",
        "definitions": [
            {"type": 8, "id": {"type": 7, "value": "fine"}, "expression": {"type": 2}},
            definition
        ]
    });
    assert_eq!(decode(&module), Err(expected.clone()));
    assert_eq!(Module::from_json(&module), Err(expected));
}

#[test]
fn test_first_failing_argument_wins() {
    let call = json!({
        "type": 10,
        "id": {"type": 7, "value": "f"},
        "arguments": [
            {"type": 2},
            {"type": 5, "value": "1.2.3"},
            {"type": 4, "value": "99999999999"}
        ]
    });
    let err = decode(&call).unwrap_err();
    assert!(
        matches!(err, DecodeError::InvalidFloat64 { ref text, .. } if text == "1.2.3"),
        "{err}"
    );
}

#[rstest]
#[case::overflow("2147483648")]
#[case::underflow("-2147483649")]
#[case::fraction("1.5")]
#[case::words("forty-two")]
#[case::empty("")]
#[case::padded(" 1")]
fn test_invalid_int32_text(#[case] text: &str) {
    let err = decode(&json!({"type": 4, "value": text})).unwrap_err();
    match err {
        DecodeError::InvalidInt32 { text: reported, .. } => assert_eq!(reported, text),
        other => panic!("expected InvalidInt32, got {other}"),
    }
}

#[test]
fn test_module_definitions_must_be_definitions() {
    let module = json!({
        "type": 1,
        "name": "m",
        "definitions": [{"type": 2}]
    });
    assert_eq!(
        decode(&module),
        Err(DecodeError::InvalidJson(TagError::Mismatch {
            expected: Tag::Definition,
            found: Tag::Nil,
        }))
    );
}

#[test]
fn test_anonymous_call_needs_a_lambda() {
    let call = json!({
        "type": 11,
        "lambda": {"type": 7, "value": "f"},
        "arguments": []
    });
    assert_eq!(
        decode(&call),
        Err(DecodeError::InvalidJson(TagError::Mismatch {
            expected: Tag::Lambda,
            found: Tag::Id,
        }))
    );
}

#[test]
fn test_lenient_defaults() {
    let tree = decode(&json!({
        "type": 8,
        "id": {"type": 7},
        "expression": {"type": 3}
    }))
    .unwrap();
    assert_eq!(tree, Expression::definition("", Expression::boolean(false)));
}

#[rstest]
#[case(json!("true"), true)]
#[case(json!("True"), true)]
#[case(json!("false"), false)]
#[case(json!("yes"), false)]
#[case(json!("1"), false)]
#[case(json!(""), false)]
#[case(json!(1), true)]
#[case(json!(0), false)]
fn test_lenient_boolean_coercion(#[case] value: Value, #[case] expected: bool) {
    let tree = decode(&json!({"type": 3, "value": value})).unwrap();
    assert_eq!(tree, Expression::boolean(expected));
}

#[test]
fn test_strict_mode() {
    let strict = DecodeOptions::strict();

    let err = decode_with_options(&json!({"type": 6}), &strict).unwrap_err();
    assert_eq!(
        err,
        DecodeError::MissingField {
            node: Tag::String,
            field: "value"
        }
    );

    let err = decode_with_options(&json!({"type": 3, "value": "true"}), &strict).unwrap_err();
    assert_eq!(
        err,
        DecodeError::InvalidField {
            node: Tag::Boolean,
            field: "value",
            expected: "a boolean",
            found: "a string",
        }
    );

    // Everything the encoder produces is accepted in strict mode.
    for tag in Tag::ALL {
        let expression = sample(tag);
        assert_eq!(
            decode_with_options(&encode(&expression), &strict).as_ref(),
            Ok(&expression)
        );
    }
}

#[test]
fn test_depth_limit_reports_error_instead_of_overflowing() {
    let mut value = json!({"type": 2});
    for _ in 0..300 {
        value = json!({"type": 9, "parameters": [], "expression": value});
    }
    let err = decode(&value).unwrap_err();
    assert_eq!(
        err,
        DecodeError::DepthExceeded(expr_json::decode::DEFAULT_MAX_DEPTH)
    );

    let roomy = DecodeOptions::default().with_max_depth(400);
    assert!(decode_with_options(&value, &roomy).is_ok());
}

fn nested_definitions(levels: usize) -> Expression {
    let mut expression = Expression::nil();
    for i in 0..levels {
        expression = Expression::definition(format!("d{i}"), expression);
    }
    expression
}

#[rstest]
#[case(129)]
#[case(150)]
#[case(255)]
fn test_from_str_reads_rendered_trees_up_to_the_default_limit(#[case] levels: usize) {
    let expression = nested_definitions(levels);
    assert_eq!(from_str(&expression.render()).unwrap(), expression);
}

#[test]
fn test_from_str_honours_a_raised_limit() {
    let expression = nested_definitions(300);
    let text = expression.render();

    let err = from_str(&text).unwrap_err();
    assert!(matches!(
        err,
        expr_json::Error::Decode(DecodeError::DepthExceeded(256))
    ));

    let roomy = DecodeOptions::default().with_max_depth(400);
    assert_eq!(from_str_with_options(&text, &roomy).unwrap(), expression);
}

#[test]
fn test_from_str_rejects_runaway_nesting_before_parsing() {
    let text = "[".repeat(100_000);
    assert!(matches!(
        from_str(&text),
        Err(expr_json::Error::Decode(DecodeError::DepthExceeded(256)))
    ));
}

#[test]
fn test_from_str_distinguishes_syntax_from_shape() {
    assert!(matches!(
        from_str("{\"type\": 2"),
        Err(expr_json::Error::Json(_))
    ));
    assert!(matches!(
        from_str("{\"type\": 13}"),
        Err(expr_json::Error::Decode(DecodeError::InvalidJson(
            TagError::Unknown(13)
        )))
    ));
}
