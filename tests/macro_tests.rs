use qs_value::{qs, stringify, Number, QsMap, Value};

#[test]
fn test_qs_macro_null() {
    assert_eq!(qs!(null), Value::Null);
}

#[test]
fn test_qs_macro_booleans() {
    assert_eq!(qs!(true), Value::Bool(true));
    assert_eq!(qs!(false), Value::Bool(false));
}

#[test]
fn test_qs_macro_numbers() {
    assert_eq!(qs!(42), Value::Number(Number::Integer(42)));
    assert_eq!(qs!(3.5), Value::Number(Number::Float(3.5)));
    assert_eq!(qs!(-123), Value::Number(Number::Integer(-123)));
}

#[test]
fn test_qs_macro_strings() {
    assert_eq!(qs!("hello world"), Value::String("hello world".to_string()));
    assert_eq!(qs!(""), Value::String(String::new()));
}

#[test]
fn test_qs_macro_sequences() {
    assert_eq!(qs!([]), Value::Sequence(vec![]));

    let mixed = qs!([1, "hello", true, null]);
    assert_eq!(
        mixed,
        Value::Sequence(vec![
            Value::Number(Number::Integer(1)),
            Value::String("hello".to_string()),
            Value::Bool(true),
            Value::Null,
        ])
    );
}

#[test]
fn test_qs_macro_mappings() {
    assert_eq!(qs!({}), Value::Mapping(QsMap::new()));

    let simple = qs!({
        "name": "Alice",
        "age": 30
    });

    match simple {
        Value::Mapping(ref map) => {
            assert_eq!(map.len(), 2);
            assert_eq!(map.get("name"), Some(&Value::String("Alice".to_string())));
            assert_eq!(map.get("age"), Some(&Value::Number(Number::Integer(30))));
        }
        _ => panic!("Expected mapping"),
    }
}

#[test]
fn test_qs_macro_nested() {
    let nested = qs!({
        "user": {
            "id": 123,
            "name": "Bob",
            "active": true
        },
        "tags": ["admin", "developer"]
    });

    if let Some(Value::Mapping(user)) = nested.get("user") {
        assert_eq!(user.get("id"), Some(&Value::Number(Number::Integer(123))));
        assert_eq!(user.get("active"), Some(&Value::Bool(true)));
    } else {
        panic!("Expected user to be a mapping");
    }

    if let Some(Value::Sequence(tags)) = nested.get("tags") {
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1], Value::String("developer".to_string()));
    } else {
        panic!("Expected tags to be a sequence");
    }
}

#[test]
fn test_qs_macro_keeps_key_order() {
    let value = qs!({ "z": "1", "a": "2", "m": "3" });
    assert_eq!(stringify(&value), "z=1&a=2&m=3");
}

#[test]
fn test_qs_macro_expressions() {
    let name = String::from("tj");
    let value = qs!({ "name": name, "len": (2 + 3), "missing": (None::<i32>) });
    assert_eq!(value.get("name").and_then(Value::as_str), Some("tj"));
    assert_eq!(value.get("len").and_then(Value::as_i64), Some(5));
    assert_eq!(value.get("missing"), Some(&Value::Null));
}

#[test]
fn test_value_predicates() {
    let null = qs!(null);
    assert!(null.is_null());
    assert!(null.is_primitive());
    assert!(!null.is_structured());

    let text = qs!("hello");
    assert!(text.is_string());
    assert_eq!(text.as_str(), Some("hello"));

    let sequence = qs!([1, 2, 3]);
    assert!(sequence.is_sequence());
    assert_eq!(sequence.as_sequence().map(Vec::len), Some(3));

    let mapping = qs!({ "key": "value" });
    assert!(mapping.is_mapping());
    assert_eq!(mapping.as_mapping().map(QsMap::len), Some(1));
}
