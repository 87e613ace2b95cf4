//! Query string serialization.
//!
//! This module provides two things:
//!
//! - [`Stringifier`]: walks a [`Value`] tree depth-first and emits one
//!   `key=value` pair per leaf
//! - [`ValueSerializer`]: a serde [`Serializer`](serde::Serializer) that
//!   turns any `T: Serialize` into a [`Value`] tree, so Rust structs can be
//!   stringified directly
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use qs_value::{qs, stringify, to_string};
//! use serde::Serialize;
//!
//! assert_eq!(stringify(&qs!({ "a": { "b": "c" } })), "a%5Bb%5D=c");
//!
//! #[derive(Serialize)]
//! struct Search { q: String, page: u32 }
//!
//! let search = Search { q: "rust lang".to_string(), page: 2 };
//! assert_eq!(to_string(&search).unwrap(), "q=rust%20lang&page=2");
//! ```
//!
//! ## Direct Stringifier Usage
//!
//! ```rust
//! use qs_value::ser::Stringifier;
//! use qs_value::{qs, ArrayFormat, StringifyOptions};
//!
//! let options = StringifyOptions::new()
//!     .with_array_format(ArrayFormat::Repeat)
//!     .with_encode(false);
//! let output = Stringifier::new(&options).stringify(&qs!({ "a": ["b", "c"] }));
//! assert_eq!(output, "a=b&a=c");
//! ```

use crate::codec::{self, ISO_SENTINEL, UTF8_SENTINEL};
use crate::options::Filter;
use crate::{Charset, Error, Number, QsMap, Result, StringifyOptions, Value};
use chrono::{DateTime, SecondsFormat, Utc};
use num_bigint::BigInt;
use serde::{ser, Serialize};

/// The query string stringifier.
///
/// Borrows a finished [`StringifyOptions`] record and can be reused.
#[derive(Debug, Clone, Copy)]
pub struct Stringifier<'a> {
    options: &'a StringifyOptions,
}

impl<'a> Stringifier<'a> {
    #[must_use]
    pub fn new(options: &'a StringifyOptions) -> Self {
        Stringifier { options }
    }

    /// Stringifies `value`.
    ///
    /// Only mappings and sequences produce output; any other root yields an
    /// empty string.
    #[must_use]
    pub fn stringify(&self, value: &Value) -> String {
        let options = self.options;

        let filtered;
        let root = match &options.filter {
            Some(Filter::Function(filter)) => {
                filtered = filter("", value);
                &filtered
            }
            _ => value,
        };
        if !root.is_structured() {
            return String::new();
        }

        let mut keys = match &options.filter {
            Some(Filter::Keys(keys)) => keys.clone(),
            _ => natural_keys(root),
        };
        if let Some(sort) = &options.sort {
            keys.sort_by(|a, b| sort(a, b));
        }

        let mut pairs = Vec::new();
        for key in keys {
            let Some(child) = root.get(&key) else {
                continue;
            };
            if options.skip_nulls && child.is_null() {
                continue;
            }
            self.walk(child, key, &mut pairs);
        }

        let joined = pairs.join(&options.delimiter);
        if joined.is_empty() {
            return joined;
        }

        let mut output = String::with_capacity(joined.len() + 24);
        if options.add_query_prefix {
            output.push('?');
        }
        if options.charset_sentinel {
            output.push_str(match options.charset {
                Charset::Utf8 => UTF8_SENTINEL,
                Charset::Iso88591 => ISO_SENTINEL,
            });
            output.push('&');
        }
        output.push_str(&joined);
        output
    }

    fn walk(&self, value: &Value, prefix: String, pairs: &mut Vec<String>) {
        let options = self.options;

        let filtered;
        let value = match &options.filter {
            Some(Filter::Function(filter)) => {
                filtered = filter(&prefix, value);
                &filtered
            }
            _ => value,
        };

        match value {
            Value::Undefined => {}
            Value::Null if options.strict_null_handling => {
                if options.encode && !options.encode_values_only {
                    pairs.push(self.encode(&prefix));
                } else {
                    pairs.push(prefix);
                }
            }
            Value::Null => pairs.push(self.pair(&prefix, "")),
            Value::Date(date) => {
                let text = self.serialize_date(date);
                pairs.push(self.pair(&prefix, &text));
            }
            Value::Sequence(_) | Value::Mapping(_) => {
                for key in self.child_keys(value) {
                    let Some(child) = value.get(&key) else {
                        continue;
                    };
                    if options.skip_nulls && child.is_null() {
                        continue;
                    }
                    let child_prefix = if value.is_sequence() {
                        options.array_format.render(&prefix, &key)
                    } else if options.allow_dots {
                        format!("{}.{}", prefix, key)
                    } else {
                        format!("{}[{}]", prefix, key)
                    };
                    self.walk(child, child_prefix, pairs);
                }
            }
            scalar => {
                if let Some(text) = scalar.scalar_text() {
                    pairs.push(self.pair(&prefix, &text));
                }
            }
        }
    }

    fn child_keys(&self, value: &Value) -> Vec<String> {
        if let Some(Filter::Keys(keys)) = &self.options.filter {
            return keys.clone();
        }
        let mut keys = natural_keys(value);
        if let Some(sort) = &self.options.sort {
            keys.sort_by(|a, b| sort(a, b));
        }
        keys
    }

    fn pair(&self, key: &str, value: &str) -> String {
        let format = self.options.format;
        if !self.options.encode {
            return format!(
                "{}={}",
                format.format(key.to_string()),
                format.format(value.to_string())
            );
        }
        let key = if self.options.encode_values_only {
            key.to_string()
        } else {
            self.encode(key)
        };
        format!("{}={}", format.format(key), format.format(self.encode(value)))
    }

    fn encode(&self, text: &str) -> String {
        match &self.options.encoder {
            Some(encoder) => encoder(text, self.options.charset),
            None => codec::encode(text, self.options.charset),
        }
    }

    fn serialize_date(&self, date: &DateTime<Utc>) -> String {
        match &self.options.serialize_date {
            Some(serialize) => serialize(date),
            None => date.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

fn natural_keys(value: &Value) -> Vec<String> {
    match value {
        Value::Mapping(map) => map.keys().cloned().collect(),
        Value::Sequence(items) => (0..items.len()).map(|i| i.to_string()).collect(),
        _ => Vec::new(),
    }
}

/// Serializes any `T: Serialize` into a [`Value`].
///
/// Structs and maps become mappings, sequences and tuples become sequences,
/// `None` and `()` become `Null`, unit enum variants become their name.
/// Integers outside the `i64` range become [`Value::BigInt`]. Enum variants
/// carrying data have no query string shape and are rejected.
pub struct ValueSerializer;

pub struct SerializeSequence {
    items: Vec<Value>,
}

pub struct SerializeMapping {
    map: QsMap,
    current_key: Option<String>,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeSequence;
    type SerializeTuple = SerializeSequence;
    type SerializeTupleStruct = SerializeSequence;
    type SerializeTupleVariant = ser::Impossible<Value, Error>;
    type SerializeMap = SerializeMapping;
    type SerializeStruct = SerializeMapping;
    type SerializeStructVariant = ser::Impossible<Value, Error>;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v)))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        match i64::try_from(v) {
            Ok(small) => self.serialize_i64(small),
            Err(_) => Ok(Value::BigInt(BigInt::from(v))),
        }
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        match i64::try_from(v) {
            Ok(small) => self.serialize_i64(small),
            Err(_) => Ok(Value::BigInt(BigInt::from(v))),
        }
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        match i64::try_from(v) {
            Ok(small) => self.serialize_i64(small),
            Err(_) => Ok(Value::BigInt(BigInt::from(v))),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::unsupported_type("newtype variants"))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeSequence> {
        Ok(SerializeSequence {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeSequence> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeSequence> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported_type("tuple variants"))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMapping> {
        Ok(SerializeMapping {
            map: QsMap::with_capacity(len.unwrap_or(0)),
            current_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMapping> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::unsupported_type("struct variants"))
    }
}

impl ser::SerializeSeq for SerializeSequence {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Sequence(self.items))
    }
}

impl ser::SerializeTuple for SerializeSequence {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeSequence {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeMap for SerializeMapping {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        // Query string keys are text; scalar keys are rendered as they would print.
        let key = to_value(key)?;
        match key.scalar_text() {
            Some(text) => {
                self.current_key = Some(text);
                Ok(())
            }
            None => Err(Error::unsupported_type("non-scalar mapping keys")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Mapping(self.map))
    }
}

impl ser::SerializeStruct for SerializeMapping {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Mapping(self.map))
    }
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}
