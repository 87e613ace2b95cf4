use chrono::{TimeZone, Utc};
use num_bigint::BigInt;
use qs_value::formats::Format;
use qs_value::{
    parse, parse_with_options, qs, stringify, stringify_with_options, ArrayFormat, Charset,
    Filter, ParseOptions, QsMap, StringifyOptions, Value,
};

fn unencoded() -> StringifyOptions {
    StringifyOptions::new().with_encode(false)
}

#[test]
fn test_scalars() {
    assert_eq!(stringify(&qs!({ "a": "b" })), "a=b");
    assert_eq!(stringify(&qs!({ "a": 1 })), "a=1");
    assert_eq!(stringify(&qs!({ "a": 1.5 })), "a=1.5");
    assert_eq!(stringify(&qs!({ "a": 2.0 })), "a=2");
    assert_eq!(stringify(&qs!({ "a": true, "b": false })), "a=true&b=false");
    assert_eq!(stringify(&qs!({ "a": "b", "c": "d" })), "a=b&c=d");
}

#[test]
fn test_big_integers() {
    let mut map = QsMap::new();
    map.insert(
        "a".to_string(),
        Value::BigInt(BigInt::from(9_007_199_254_740_993u64)),
    );
    assert_eq!(stringify(&Value::Mapping(map)), "a=9007199254740993");
}

#[test]
fn test_bytes() {
    let mut map = QsMap::new();
    map.insert("a".to_string(), Value::Bytes(b"test".to_vec()));
    assert_eq!(stringify(&Value::Mapping(map)), "a=test");
}

#[test]
fn test_percent_encoding() {
    assert_eq!(stringify(&qs!({ "a": "b c" })), "a=b%20c");
    assert_eq!(stringify(&qs!({ "a": "\u{20ac}" })), "a=%E2%82%AC");
    assert_eq!(stringify(&qs!({ "a": "\u{1F600}" })), "a=%F0%9F%98%80");
    assert_eq!(stringify(&qs!({ "a": "-_.~" })), "a=-_.~");
    assert_eq!(stringify(&qs!({ "a": "&=+" })), "a=%26%3D%2B");
}

#[test]
fn test_nested_keys_are_encoded() {
    assert_eq!(stringify(&qs!({ "a": { "b": "c" } })), "a%5Bb%5D=c");
    assert_eq!(
        stringify(&qs!({ "a": { "b": { "c": { "d": "e" } } } })),
        "a%5Bb%5D%5Bc%5D%5Bd%5D=e"
    );
}

#[test]
fn test_encode_values_only() {
    let options = StringifyOptions::new().with_encode_values_only(true);
    assert_eq!(
        stringify_with_options(&qs!({ "a": { "b": "c d" } }), &options),
        "a[b]=c%20d"
    );
}

#[test]
fn test_array_formats() {
    let value = qs!({ "a": ["b", "c"] });

    let indices = unencoded().with_array_format(ArrayFormat::Indices);
    assert_eq!(stringify_with_options(&value, &indices), "a[0]=b&a[1]=c");

    let brackets = unencoded().with_array_format(ArrayFormat::Brackets);
    assert_eq!(stringify_with_options(&value, &brackets), "a[]=b&a[]=c");

    let repeat = unencoded().with_array_format(ArrayFormat::Repeat);
    assert_eq!(stringify_with_options(&value, &repeat), "a=b&a=c");

    assert_eq!(stringify(&value), "a%5B0%5D=b&a%5B1%5D=c");
}

#[test]
fn test_indices_switch() {
    let value = qs!({ "a": ["b", "c"] });
    let options = unencoded().with_indices(false);
    assert_eq!(stringify_with_options(&value, &options), "a=b&a=c");
}

#[test]
fn test_nested_sequences() {
    let value = qs!({ "a": [{ "b": "c" }, ["d"]] });
    assert_eq!(
        stringify_with_options(&value, &unencoded()),
        "a[0][b]=c&a[1][0]=d"
    );

    let brackets = unencoded().with_array_format(ArrayFormat::Brackets);
    assert_eq!(
        stringify_with_options(&value, &brackets),
        "a[][b]=c&a[][]=d"
    );
}

#[test]
fn test_dot_notation() {
    let options = unencoded().with_allow_dots(true);
    assert_eq!(
        stringify_with_options(&qs!({ "a": { "b": { "c": "d" } } }), &options),
        "a.b.c=d"
    );
    assert_eq!(
        stringify_with_options(&qs!({ "a": { "b": ["c"] } }), &options),
        "a.b[0]=c"
    );
}

#[test]
fn test_nulls() {
    assert_eq!(stringify(&qs!({ "a": null })), "a=");
    assert_eq!(stringify(&qs!({ "a": null, "b": "" })), "a=&b=");

    let strict = StringifyOptions::new().with_strict_null_handling(true);
    assert_eq!(stringify_with_options(&qs!({ "a": null }), &strict), "a");
    assert_eq!(
        stringify_with_options(&qs!({ "a": { "b": null } }), &strict),
        "a%5Bb%5D"
    );

    let strict_raw = unencoded().with_strict_null_handling(true);
    assert_eq!(
        stringify_with_options(&qs!({ "a": { "b": null } }), &strict_raw),
        "a[b]"
    );
}

#[test]
fn test_skip_nulls() {
    let options = unencoded().with_skip_nulls(true);
    assert_eq!(
        stringify_with_options(&qs!({ "a": "b", "c": null }), &options),
        "a=b"
    );
    assert_eq!(
        stringify_with_options(&qs!({ "a": { "b": "c", "d": null } }), &options),
        "a[b]=c"
    );
}

#[test]
fn test_nulls_inside_sequences() {
    assert_eq!(
        stringify_with_options(&qs!({ "a": [null, "b"] }), &unencoded()),
        "a[0]=&a[1]=b"
    );
}

#[test]
fn test_undefined_is_omitted() {
    let mut map = QsMap::new();
    map.insert("a".to_string(), Value::Undefined);
    assert_eq!(stringify(&Value::Mapping(map)), "");

    let value = Value::Mapping(
        vec![(
            "a".to_string(),
            Value::Sequence(vec![qs!("b"), Value::Undefined, qs!("c")]),
        )]
        .into_iter()
        .collect(),
    );
    assert_eq!(
        stringify_with_options(&value, &unencoded()),
        "a[0]=b&a[2]=c"
    );
}

#[test]
fn test_empty_containers() {
    assert_eq!(stringify(&qs!({})), "");
    assert_eq!(stringify(&qs!({ "a": [] })), "");
    assert_eq!(stringify(&qs!({ "a": {} })), "");
    assert_eq!(stringify(&qs!({ "a": [], "b": "c" })), "b=c");
}

#[test]
fn test_non_container_roots() {
    assert_eq!(stringify(&Value::Null), "");
    assert_eq!(stringify(&Value::Undefined), "");
    assert_eq!(stringify(&qs!("a")), "");
    assert_eq!(stringify(&qs!(42)), "");
}

#[test]
fn test_false_root_is_empty() {
    assert_eq!(stringify(&Value::Bool(false)), "");
    assert_eq!(stringify(&qs!(false)), "");
}

#[test]
fn test_empty_string_root_is_empty() {
    assert_eq!(stringify(&qs!("")), "");
}

#[test]
fn test_root_sequence() {
    assert_eq!(stringify(&qs!(["a", "b"])), "0=a&1=b");
    assert_eq!(
        stringify_with_options(&qs!([{ "a": "b" }]), &unencoded()),
        "0[a]=b"
    );
}

#[test]
fn test_query_prefix() {
    let options = StringifyOptions::new().with_add_query_prefix(true);
    assert_eq!(stringify_with_options(&qs!({ "a": "b" }), &options), "?a=b");
    assert_eq!(stringify_with_options(&qs!({}), &options), "");
}

#[test]
fn test_custom_delimiter() {
    let options = StringifyOptions::new().with_delimiter(";");
    assert_eq!(
        stringify_with_options(&qs!({ "a": "b", "c": "d" }), &options),
        "a=b;c=d"
    );
}

#[test]
fn test_rfc1738_format() {
    let options = StringifyOptions::new().with_format(Format::Rfc1738);
    assert_eq!(
        stringify_with_options(&qs!({ "a b": "c d" }), &options),
        "a+b=c+d"
    );
    assert_eq!(stringify(&qs!({ "a b": "c d" })), "a%20b=c%20d");
}

#[test]
fn test_sort() {
    let options = StringifyOptions::new().with_sort(|a, b| a.cmp(b));
    assert_eq!(
        stringify_with_options(&qs!({ "a": "c", "z": "y", "b": "f" }), &options),
        "a=c&b=f&z=y"
    );

    let nested = unencoded().with_sort(|a, b| a.cmp(b));
    assert_eq!(
        stringify_with_options(&qs!({ "b": { "d": "1", "c": "2" }, "a": "3" }), &nested),
        "a=3&b[c]=2&b[d]=1"
    );
}

#[test]
fn test_key_filter() {
    let options = StringifyOptions::new().with_filter(Filter::keys(["a", "e"]));
    assert_eq!(
        stringify_with_options(&qs!({ "a": "b", "c": "d", "e": "f" }), &options),
        "a=b&e=f"
    );

    let options = StringifyOptions::new().with_filter(Filter::keys(["a", "0", "2"]));
    assert_eq!(
        stringify_with_options(&qs!({ "a": ["b", "c", "d"], "e": "f" }), &options),
        "a%5B0%5D=b&a%5B2%5D=d"
    );
}

#[test]
fn test_key_filter_order_wins() {
    let options = unencoded().with_filter(Filter::keys(["c", "a"]));
    assert_eq!(
        stringify_with_options(&qs!({ "a": "b", "c": "d" }), &options),
        "c=d&a=b"
    );
}

#[test]
fn test_function_filter() {
    let options = unencoded().with_filter(Filter::function(|prefix, value| {
        if prefix == "b" {
            Value::Undefined
        } else if prefix == "e[f]" {
            match value.as_date() {
                Some(date) => Value::from(date.timestamp_millis()),
                None => value.clone(),
            }
        } else {
            value.clone()
        }
    }));

    let mut inner = QsMap::new();
    inner.insert(
        "f".to_string(),
        Value::Date(Utc.timestamp_millis_opt(123).unwrap()),
    );
    let mut map = QsMap::new();
    map.insert("a".to_string(), qs!("b"));
    map.insert("b".to_string(), qs!("c"));
    map.insert("e".to_string(), Value::Mapping(inner));

    assert_eq!(
        stringify_with_options(&Value::Mapping(map), &options),
        "a=b&e[f]=123"
    );
}

#[test]
fn test_function_filter_sees_root() {
    let options = StringifyOptions::new().with_filter(Filter::function(|prefix, value| {
        if prefix.is_empty() {
            qs!({ "replaced": "yes" })
        } else {
            value.clone()
        }
    }));
    assert_eq!(
        stringify_with_options(&qs!({ "a": "b" }), &options),
        "replaced=yes"
    );
}

#[test]
fn test_dates() {
    let mut map = QsMap::new();
    map.insert("a".to_string(), Value::Date(Utc.timestamp_opt(0, 0).unwrap()));
    let value = Value::Mapping(map);

    assert_eq!(stringify(&value), "a=1970-01-01T00%3A00%3A00.000Z");

    let options = StringifyOptions::new()
        .with_serialize_date(|date| date.timestamp_millis().to_string());
    assert_eq!(stringify_with_options(&value, &options), "a=0");
}

#[test]
fn test_iso_charset() {
    let options = StringifyOptions::new().with_charset(Charset::Iso88591);
    assert_eq!(
        stringify_with_options(&qs!({ "\u{e6}": "\u{e6}" }), &options),
        "%E6=%E6"
    );
    assert_eq!(
        stringify_with_options(&qs!({ "a": "\u{263A}" }), &options),
        "a=%26%239786%3B"
    );
}

#[test]
fn test_charset_sentinel() {
    let utf8 = StringifyOptions::new().with_charset_sentinel(true);
    assert_eq!(
        stringify_with_options(&qs!({ "a": "\u{e6}" }), &utf8),
        "utf8=%E2%9C%93&a=%C3%A6"
    );

    let iso = utf8.clone().with_charset(Charset::Iso88591);
    assert_eq!(
        stringify_with_options(&qs!({ "a": "\u{e6}" }), &iso),
        "utf8=%26%2310003%3B&a=%E6"
    );
}

#[test]
fn test_charset_sentinel_round_trip() {
    let value = qs!({ "name": "\u{e6}\u{f8}", "city": "K\u{f8}benhavn" });
    let parse_options = ParseOptions::new().with_charset_sentinel(true);

    let iso = StringifyOptions::new()
        .with_charset(Charset::Iso88591)
        .with_charset_sentinel(true);
    let query = stringify_with_options(&value, &iso);
    assert_eq!(query, "utf8=%26%2310003%3B&name=%E6%F8&city=K%F8benhavn");
    assert_eq!(Value::Mapping(parse_with_options(&query, &parse_options)), value);

    let utf8 = StringifyOptions::new().with_charset_sentinel(true);
    let query = stringify_with_options(&value, &utf8);
    let latin1_default = parse_options.with_charset(Charset::Iso88591);
    assert_eq!(Value::Mapping(parse_with_options(&query, &latin1_default)), value);
}

#[test]
fn test_custom_encoder() {
    let options = StringifyOptions::new().with_encoder(|text, _| text.to_uppercase());
    assert_eq!(
        stringify_with_options(&qs!({ "a": { "b": "c" } }), &options),
        "A[B]=C"
    );
}

#[test]
fn test_custom_array_format() {
    let options = unencoded().with_array_format(ArrayFormat::custom(|prefix, index| {
        format!("{}({})", prefix, index)
    }));
    assert_eq!(
        stringify_with_options(&qs!({ "a": ["b", "c"] }), &options),
        "a(0)=b&a(1)=c"
    );
}

#[test]
fn test_round_trip() {
    let value = qs!({
        "a": { "b": ["c", "d"], "e": "f g" },
        "h": ["i", { "j": "k" }],
        "l": "\u{e6}&="
    });
    let query = stringify(&value);
    assert_eq!(Value::Mapping(parse(&query)), value);
}

#[test]
fn test_round_trip_preserves_key_order() {
    let value = qs!({ "z": "1", "a": { "y": "2", "b": "3" } });
    let parsed = parse(&stringify(&value));
    let keys: Vec<_> = parsed.keys().cloned().collect();
    assert_eq!(keys, vec!["z", "a"]);
    assert_eq!(stringify(&Value::Mapping(parsed)), stringify(&value));
}
