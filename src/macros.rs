/// Builds a [`Value`](crate::Value) tree from a JSON-like literal.
///
/// Array elements and mapping values must be single token trees; wrap longer
/// expressions in parentheses.
///
/// ```rust
/// use qs_value::{qs, Value};
///
/// let value = qs!({ "a": ["b", null, (1 + 1)], "c": {} });
/// assert_eq!(value.get("a").and_then(|a| a.get("2")), Some(&Value::from(2)));
/// ```
#[macro_export]
macro_rules! qs {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Sequence(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Sequence(vec![$($crate::qs!($elem)),*])
    };

    ({}) => {
        $crate::Value::Mapping($crate::QsMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut mapping = $crate::QsMap::new();
        $(
            mapping.insert($key.to_string(), $crate::qs!($value));
        )*
        $crate::Value::Mapping(mapping)
    }};

    // Anything convertible with `Value::from`.
    ($e:expr) => {
        $crate::Value::from($e)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Number, QsMap, Value};

    #[test]
    fn test_qs_macro_primitives() {
        assert_eq!(qs!(null), Value::Null);
        assert_eq!(qs!(true), Value::Bool(true));
        assert_eq!(qs!(false), Value::Bool(false));
        assert_eq!(qs!(42), Value::Number(Number::Integer(42)));
        assert_eq!(qs!(3.5), Value::Number(Number::Float(3.5)));
        assert_eq!(qs!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_qs_macro_sequences() {
        assert_eq!(qs!([]), Value::Sequence(vec![]));
        assert_eq!(
            qs!(["a", null]),
            Value::Sequence(vec![Value::String("a".to_string()), Value::Null])
        );
    }

    #[test]
    fn test_qs_macro_mappings() {
        assert_eq!(qs!({}), Value::Mapping(QsMap::new()));

        let value = qs!({ "a": { "b": "c" } });
        match value {
            Value::Mapping(map) => {
                assert_eq!(map.len(), 1);
                assert_eq!(
                    map.get("a").and_then(|a| a.get("b")),
                    Some(&Value::String("c".to_string()))
                );
            }
            _ => panic!("Expected mapping"),
        }
    }
}
