//! JSON Parser Tests
//!
//! Recognizer precedence, nesting, canonical output and failure modes of the
//! recognizer-chain parser.

use admissions::json::{parse, Map, ParseError, Parser, Value, ValueKind, MAX_DEPTH};

// =============================================================================
// Recognizer Precedence
// =============================================================================

/// A decimal literal is read whole, never as an integer prefix.
#[test]
fn test_decimal_wins_over_integer_prefix() {
    let value = parse("123.456").unwrap();
    assert_eq!(value.kind(), ValueKind::Double);
    assert_eq!(value, Value::Double(123.456));
}

#[test]
fn test_chain_order_is_fixed() {
    let order = Parser::new().recognizer_order();
    assert_eq!(
        order,
        vec!["null", "object", "array", "double", "int", "string", "boolean"]
    );

    let double = order.iter().position(|n| *n == "double").unwrap();
    let int = order.iter().position(|n| *n == "int").unwrap();
    assert!(double < int);
}

#[test]
fn test_simple_documents() {
    assert_eq!(parse("null").unwrap(), Value::Null);
    assert_eq!(parse("true").unwrap(), Value::Bool(true));
    assert_eq!(parse("false").unwrap(), Value::Bool(false));
    assert_eq!(
        parse("[1,2,3]").unwrap(),
        Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );
}

#[test]
fn test_negative_numbers() {
    assert_eq!(parse("-42").unwrap(), Value::Int(-42));
    assert_eq!(parse("-0.5").unwrap(), Value::Double(-0.5));
}

// =============================================================================
// Nested Structures
// =============================================================================

#[test]
fn test_three_levels_of_mixed_nesting() {
    let value = parse(r#"{"a":[{"b":[1,2.5,"x"]},null],"c":{"d":{"e":true}}}"#).unwrap();

    let a = value.get("a").and_then(Value::as_array).unwrap();
    assert_eq!(a.len(), 2);
    let b = a[0].get("b").and_then(Value::as_array).unwrap();
    assert_eq!(
        b,
        &[
            Value::Int(1),
            Value::Double(2.5),
            Value::String("x".to_string())
        ]
    );
    assert!(a[1].is_null());

    let e = value
        .get("c")
        .and_then(|c| c.get("d"))
        .and_then(|d| d.get("e"))
        .unwrap();
    assert_eq!(e, &Value::Bool(true));
}

#[test]
fn test_whitespace_between_tokens() {
    let value = parse(" {\n  \"k\" : [ 1 , 2 ] ,\n  \"s\" : \"v\"\n} ").unwrap();
    assert_eq!(value.to_json_string(), r#"{"k":[1,2],"s":"v"}"#);
}

#[test]
fn test_object_keeps_insertion_order() {
    let value = parse(r#"{"z":1,"a":2,"m":3}"#).unwrap();
    let keys: Vec<&str> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn test_empty_containers() {
    assert_eq!(parse("{}").unwrap(), Value::Object(Map::new()));
    assert_eq!(parse("[]").unwrap(), Value::Array(Vec::new()));
    assert_eq!(parse("[[],{}]").unwrap().to_json_string(), "[[],{}]");
}

// =============================================================================
// Canonical Serialization
// =============================================================================

#[test]
fn test_parse_then_serialize_is_canonical() {
    let text = r#"{"data":{"t":[[1,"a",true,2.0,null]]},"seq":{"t":1}}"#;
    assert_eq!(parse(text).unwrap().to_json_string(), text);
}

#[test]
fn test_integral_double_keeps_fraction() {
    assert_eq!(Value::Double(123.0).to_json_string(), "123.0");
    assert_eq!(parse("123.0").unwrap().to_json_string(), "123.0");
}

// =============================================================================
// Failure Modes
// =============================================================================

#[test]
fn test_empty_input() {
    assert_eq!(parse("").unwrap_err(), ParseError::EmptyInput);
    assert_eq!(parse(" \n\t ").unwrap_err(), ParseError::EmptyInput);
}

#[test]
fn test_unrecognized_text() {
    assert!(matches!(
        parse("nope").unwrap_err(),
        ParseError::NoRecognizer { offset: 0 }
    ));
}

#[test]
fn test_missing_colon() {
    assert!(matches!(
        parse(r#"{"a" 1}"#).unwrap_err(),
        ParseError::Expected { token: ':', .. }
    ));
}

#[test]
fn test_unterminated_containers() {
    assert!(matches!(
        parse("[1,2").unwrap_err(),
        ParseError::Unterminated { .. }
    ));
    assert!(matches!(
        parse(r#"{"a":1"#).unwrap_err(),
        ParseError::Unterminated { .. }
    ));
}

#[test]
fn test_trailing_input_rejected() {
    assert!(matches!(
        parse("1 2").unwrap_err(),
        ParseError::TrailingInput { .. }
    ));
}

#[test]
fn test_integer_out_of_range() {
    assert!(matches!(
        parse("2147483648").unwrap_err(),
        ParseError::IntegerOutOfRange { .. }
    ));
    assert_eq!(parse("-2147483648").unwrap(), Value::Int(i32::MIN));
}

#[test]
fn test_depth_limit() {
    let deep = "[".repeat(MAX_DEPTH + 1) + &"]".repeat(MAX_DEPTH + 1);
    assert_eq!(
        parse(&deep).unwrap_err(),
        ParseError::TooDeep { limit: MAX_DEPTH }
    );

    let ok = "[".repeat(MAX_DEPTH) + &"]".repeat(MAX_DEPTH);
    assert!(parse(&ok).is_ok());
}

/// Strings end at the next quote; escapes are not interpreted.
#[test]
fn test_backslash_is_kept_verbatim() {
    assert_eq!(
        parse(r#""a\nb""#).unwrap(),
        Value::String(r"a\nb".to_string())
    );
}
