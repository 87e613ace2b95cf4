//! # qs_value
//!
//! A query string parser and stringifier with nesting support.
//!
//! ## What does it do?
//!
//! Query strings are flat: `key=value` pairs joined by `&`. This crate reads
//! bracket notation (`a[b][c]=d`), array notation (`a[]=x`, `a[0]=x`) and,
//! optionally, dot notation (`a.b=c`) as paths into a nested [`Value`] tree,
//! and writes such trees back out.
//!
//! ## Key Features
//!
//! - **Nesting**: mappings and sequences at any depth, capped by a configurable limit
//! - **Duplicate keys**: `a=b&a=c` coalesces into a sequence
//! - **Array formats**: `a[0]=b`, `a[]=b` or `a=b` when stringifying
//! - **Charsets**: UTF-8 and ISO-8859-1, with the `utf8=✓` sentinel convention
//! - **Safe keys**: `__proto__`, `constructor` and `prototype` are filtered out
//! - **Serde bridge**: any `T: Serialize` can be stringified, and [`Value`]
//!   itself serializes to any serde format
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! qs_value = "0.1"
//! ```
//!
//! ### Parsing
//!
//! ```rust
//! use qs_value::{parse, qs, Value};
//!
//! let parsed = parse("user[name]=tj&user[tags][]=a&user[tags][]=b");
//! assert_eq!(
//!     Value::Mapping(parsed),
//!     qs!({ "user": { "name": "tj", "tags": ["a", "b"] } })
//! );
//! ```
//!
//! ### Stringifying
//!
//! ```rust
//! use qs_value::{qs, stringify_with_options, ArrayFormat, StringifyOptions};
//!
//! let value = qs!({ "a": { "b": ["c", "d"] } });
//! let options = StringifyOptions::new()
//!     .with_array_format(ArrayFormat::Brackets)
//!     .with_encode(false);
//! assert_eq!(stringify_with_options(&value, &options), "a[b][]=c&a[b][]=d");
//! ```
//!
//! ### From Rust types
//!
//! ```rust
//! use qs_value::to_string;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Filter {
//!     status: &'static str,
//!     ids: Vec<u32>,
//! }
//!
//! let filter = Filter { status: "open", ids: vec![3, 7] };
//! assert_eq!(
//!     to_string(&filter).unwrap(),
//!     "status=open&ids%5B0%5D=3&ids%5B1%5D=7"
//! );
//! ```
//!
//! ## Failure Model
//!
//! Parsing and stringifying never fail: malformed escapes decode to their
//! raw text, reserved keys are dropped, and input over the configured limits
//! is truncated or kept as literal keys. Errors only come from resolving
//! option names ([`Charset`], [`Format`], [`ArrayFormat`],
//! [`Delimiter::pattern`]) and from the serde bridge.
//!
//! ## Logging
//!
//! Recovery points emit `debug` records through the [`log`] facade, so a
//! binary that installs a logger can see which parameters were dropped.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`basic.rs`** - parsing and stringifying with default options
//! - **`custom_options.rs`** - delimiters, dots, charsets and array formats
//! - **`from_structs.rs`** - stringifying serde types
//!
//! Run any demo with: `cargo run --example <name>`

pub mod codec;
pub mod de;
pub mod error;
pub mod formats;
pub mod keys;
pub mod macros;
pub mod map;
pub mod merge;
pub mod options;
pub mod ser;
pub mod value;

pub use de::Parser;
pub use error::{Error, Result};
pub use formats::Format;
pub use map::QsMap;
pub use options::{
    ArrayFormat, Charset, Decoder, Delimiter, Encoder, Filter, ParseOptions, StringifyOptions,
};
pub use ser::{Stringifier, ValueSerializer};
pub use value::{Number, Value};

use serde::Serialize;

/// Parse a query string with default options.
///
/// # Examples
///
/// ```rust
/// use qs_value::{parse, Value};
///
/// let parsed = parse("a=b&a=c");
/// assert_eq!(
///     parsed.get("a"),
///     Some(&Value::Sequence(vec![Value::from("b"), Value::from("c")]))
/// );
/// ```
#[must_use]
pub fn parse(input: &str) -> QsMap {
    parse_with_options(input, &ParseOptions::default())
}

/// Parse a query string with custom options.
///
/// # Examples
///
/// ```rust
/// use qs_value::{parse_with_options, qs, ParseOptions, Value};
///
/// let options = ParseOptions::new()
///     .with_ignore_query_prefix(true)
///     .with_allow_dots(true);
/// let parsed = parse_with_options("?a.b=c", &options);
/// assert_eq!(Value::Mapping(parsed), qs!({ "a": { "b": "c" } }));
/// ```
#[must_use]
pub fn parse_with_options(input: &str, options: &ParseOptions) -> QsMap {
    Parser::new(options).parse_str(input)
}

/// Parse a mapping whose keys are in bracket notation.
///
/// Values are used as given; only keys are decomposed.
#[must_use]
pub fn parse_map(input: QsMap, options: &ParseOptions) -> QsMap {
    Parser::new(options).parse_map(input)
}

/// Stringify a value with default options.
///
/// # Examples
///
/// ```rust
/// use qs_value::{qs, stringify};
///
/// assert_eq!(stringify(&qs!({ "a": "b", "c": "d e" })), "a=b&c=d%20e");
/// assert_eq!(stringify(&qs!("not a container")), "");
/// ```
#[must_use]
pub fn stringify(value: &Value) -> String {
    stringify_with_options(value, &StringifyOptions::default())
}

/// Stringify a value with custom options.
#[must_use]
pub fn stringify_with_options(value: &Value, options: &StringifyOptions) -> String {
    Stringifier::new(options).stringify(value)
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use qs_value::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_mapping());
/// assert_eq!(value.get("x"), Some(&Value::from(1)));
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for enum variants carrying data and for
/// non-scalar map keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Serialize any `T: Serialize` to a query string with default options.
///
/// # Errors
///
/// Returns an error if the value cannot be converted to a [`Value`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &StringifyOptions::default())
}

/// Serialize any `T: Serialize` to a query string with custom options.
///
/// # Examples
///
/// ```rust
/// use qs_value::{to_string_with_options, StringifyOptions};
/// use std::collections::BTreeMap;
///
/// let mut params = BTreeMap::new();
/// params.insert("b", "2");
/// params.insert("a", "1");
///
/// let options = StringifyOptions::new().with_add_query_prefix(true);
/// assert_eq!(to_string_with_options(&params, &options).unwrap(), "?a=1&b=2");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be converted to a [`Value`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &StringifyOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let value = to_value(value)?;
    Ok(stringify_with_options(&value, options))
}
