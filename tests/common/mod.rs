//! Common test utilities for roundtrip testing

use expr_json::{Expression, decode, encode};

/// Encode an expression, print the wire form, decode it again and check that
/// the result is the same tree with the same tag.
pub fn roundtrip(expression: &Expression) -> Expression {
    let value = encode(expression);
    println!("{value}");

    let decoded = match decode(&value) {
        Ok(decoded) => decoded,
        Err(e) => {
            println!("Error decoding {value}:\n{e}");
            panic!("{}", e);
        }
    };

    assert_eq!(decoded.tag(), expression.tag());
    assert_eq!(
        &decoded, expression,
        "Expected:\n---\n{}\n---\nActual:\n---\n{}\n---",
        expression, decoded
    );
    decoded
}

/// Roundtrip through JSON text rather than an in-memory value.
pub fn roundtrip_text(expression: &Expression) -> Expression {
    let text = expression.render();
    let decoded = expr_json::from_str(&text).unwrap_or_else(|e| panic!("{text}: {e}"));
    assert_eq!(decoded.render(), text);
    decoded
}
