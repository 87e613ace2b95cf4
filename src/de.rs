//! Query string parsing.
//!
//! This module provides the [`Parser`] that turns a delimited query string
//! (or an already split key/value mapping) into a nested [`Value`] tree.
//!
//! ## Overview
//!
//! Parsing runs in three passes over the input:
//!
//! - **Flat pass**: split on the delimiter, locate each `key=value`
//!   separator, percent-decode both sides and coalesce repeated keys into
//!   sequences
//! - **Nesting pass**: decompose every distinct key into path segments and
//!   build the nested value for it bottom-up
//! - **Merge pass**: fold the nested values into one mapping, then remove the
//!   holes sparse indices left behind
//!
//! Nothing in here fails. Malformed escapes, reserved key names and inputs
//! over the configured limits are recovered from locally.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use qs_value::{parse, qs, Value};
//!
//! let parsed = parse("a[b][c]=d&e=f&e=g");
//! assert_eq!(
//!     Value::Mapping(parsed),
//!     qs!({ "a": { "b": { "c": "d" } }, "e": ["f", "g"] })
//! );
//! ```

use crate::codec::{self, ISO_SENTINEL, UTF8_SENTINEL};
use crate::keys::{decompose, PathSegment};
use crate::merge::{canonical_index, combine, merge_nodes, slots_to_entries, Node, Slot};
use crate::{Charset, ParseOptions, QsMap, Value};
use indexmap::IndexMap;

/// Prefix shared by both charset sentinel tokens.
const SENTINEL_PREFIX: &str = "utf8=";

/// The query string parser.
///
/// Borrows a finished [`ParseOptions`] record; one parser can be reused for
/// any number of inputs.
///
/// # Examples
///
/// ```rust
/// use qs_value::de::Parser;
/// use qs_value::{ParseOptions, Value};
///
/// let options = ParseOptions::new().with_delimiter(';');
/// let parser = Parser::new(&options);
/// let parsed = parser.parse_str("a=b;c=d");
/// assert_eq!(parsed.get("c"), Some(&Value::from("d")));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    options: &'a ParseOptions,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(options: &'a ParseOptions) -> Self {
        Parser { options }
    }

    /// Parses a delimited query string.
    #[must_use]
    pub fn parse_str(&self, input: &str) -> QsMap {
        if input.is_empty() {
            return QsMap::new();
        }
        let flat = self.parse_values(input);
        self.assemble(flat)
    }

    /// Parses a mapping whose keys are still in bracket or dot notation.
    ///
    /// Values are taken as they are: no decoding and no coalescing happen,
    /// only key decomposition and merging.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use qs_value::de::Parser;
    /// use qs_value::{qs, ParseOptions, QsMap, Value};
    ///
    /// let mut input = QsMap::new();
    /// input.insert("a[b]".to_string(), Value::from("c"));
    /// input.insert("a[d]".to_string(), Value::from(1));
    ///
    /// let options = ParseOptions::default();
    /// let parsed = Parser::new(&options).parse_map(input);
    /// assert_eq!(Value::Mapping(parsed), qs!({ "a": { "b": "c", "d": 1 } }));
    /// ```
    #[must_use]
    pub fn parse_map(&self, input: QsMap) -> QsMap {
        if input.is_empty() {
            return QsMap::new();
        }
        self.assemble(input)
    }

    /// Splits, decodes and coalesces the input into a flat key → value map.
    fn parse_values(&self, input: &str) -> QsMap {
        let options = self.options;
        let input = if options.ignore_query_prefix {
            input.strip_prefix('?').unwrap_or(input)
        } else {
            input
        };

        let mut tokens = options.delimiter.split(input);
        let parts: Vec<&str> = tokens.by_ref().take(options.parameter_limit).collect();
        if tokens.next().is_some() {
            log::debug!(
                "dropping parameters beyond the limit of {}",
                options.parameter_limit
            );
        }

        let mut charset = options.charset;
        let mut skip_index = None;
        if options.charset_sentinel {
            if let Some((index, part)) = parts
                .iter()
                .enumerate()
                .find(|(_, part)| part.starts_with(SENTINEL_PREFIX))
            {
                if *part == UTF8_SENTINEL {
                    charset = Charset::Utf8;
                } else if *part == ISO_SENTINEL {
                    charset = Charset::Iso88591;
                }
                log::debug!("charset sentinel {:?} selects {}", part, charset);
                skip_index = Some(index);
            }
        }

        let mut flat = QsMap::new();
        for (index, part) in parts.iter().enumerate() {
            if skip_index == Some(index) {
                continue;
            }

            let (key, value) = match separator_position(part) {
                Some(pos) => (
                    self.decode(&part[..pos], charset),
                    Value::String(self.decode(&part[pos + 1..], charset)),
                ),
                None => {
                    let value = if options.strict_null_handling {
                        Value::Null
                    } else {
                        Value::String(String::new())
                    };
                    (self.decode(part, charset), value)
                }
            };

            let value = match value {
                Value::String(text)
                    if !text.is_empty()
                        && options.interpret_numeric_entities
                        && charset == Charset::Iso88591 =>
                {
                    Value::String(codec::interpret_numeric_entities(&text))
                }
                value => value,
            };

            match flat.get_mut(&key) {
                Some(existing) => {
                    let previous = std::mem::take(existing);
                    *existing = combine(previous, value);
                }
                None => {
                    flat.insert(key, value);
                }
            }
        }

        log::trace!(
            "read {} parameters into {} distinct keys",
            parts.len(),
            flat.len()
        );
        flat
    }

    fn decode(&self, text: &str, charset: Charset) -> String {
        match &self.options.decoder {
            Some(decoder) => decoder(text, charset),
            None => codec::decode(text, charset),
        }
    }

    /// Nests every flat entry and folds the results into one mapping.
    fn assemble(&self, flat: QsMap) -> QsMap {
        let mut result = Node::Map(IndexMap::new());
        for (key, value) in flat {
            let Some(segments) = decompose(&key, self.options) else {
                continue;
            };
            let Some(leaf) = Node::from_value(value) else {
                continue;
            };
            let nested = match self.build_nested(&segments, leaf) {
                // A key without a parent, such as `[0]`, still lands in the root mapping.
                Node::List(slots) => Node::Map(slots_to_entries(slots)),
                nested => nested,
            };
            result = merge_nodes(result, nested, self.options);
        }

        match result.into_value() {
            Value::Mapping(map) => map,
            _ => QsMap::new(),
        }
    }

    /// Wraps `leaf` in one container per segment, innermost segment first.
    fn build_nested(&self, segments: &[PathSegment], leaf: Node) -> Node {
        let options = self.options;
        segments.iter().rev().fold(leaf, |leaf, segment| match segment {
            PathSegment::Index(inner) if inner.is_empty() => {
                if !options.parse_arrays {
                    Node::entry("0".to_string(), leaf)
                } else if matches!(leaf, Node::List(_)) {
                    leaf
                } else {
                    Node::at_slot(0, leaf)
                }
            }
            PathSegment::Index(inner) => match self.array_index(inner) {
                Some(slot) => Node::at_slot(slot, leaf),
                None => Node::entry(inner.clone(), leaf),
            },
            PathSegment::Name(name) => Node::entry(name.clone(), leaf),
        })
    }

    /// Returns the slot an index segment addresses, if it may become a sequence.
    fn array_index(&self, inner: &str) -> Option<Slot> {
        if !self.options.parse_arrays {
            return None;
        }
        let slot = canonical_index(inner)?;
        if slot > self.options.array_limit as Slot {
            log::debug!(
                "index {} exceeds array limit {}, keeping it as a key",
                slot,
                self.options.array_limit
            );
            return None;
        }
        Some(slot)
    }
}

/// Position of the `=` separating key from value.
///
/// An `=` directly after a `]` wins over an earlier bare `=`, so bracketed
/// keys may contain `=` themselves.
fn separator_position(part: &str) -> Option<usize> {
    match part.find("]=") {
        Some(pos) => Some(pos + 1),
        None => part.find('='),
    }
}
