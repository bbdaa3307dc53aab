//! `Expression` as a field of ordinary serde types, in JSON and YAML.
#![cfg(feature = "serde")]

use expr_json::fixtures::program;
use expr_json::{Expression, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Document {
    title: String,
    body: Expression,
}

fn document() -> Document {
    Document {
        title: "sample".to_string(),
        body: program().into(),
    }
}

#[test]
fn test_json_field() {
    let doc = document();
    let text = serde_json::to_string(&doc).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["body"], encode(&doc.body));

    let back: Document = serde_json::from_str(&text).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn test_yaml_field() {
    let doc = document();
    let yaml = serde_yaml::to_string(&doc).unwrap();
    // Numbers stay text in YAML too.
    assert!(!yaml.contains("value: -42"), "{yaml}");

    let back: Document = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn test_invalid_body_is_rejected() {
    let text = r#"{"title": "t", "body": {"type": 4, "value": "x"}}"#;
    let err = serde_json::from_str::<Document>(text).unwrap_err();
    assert!(err.to_string().contains("invalid Int32 value"), "{err}");
}
