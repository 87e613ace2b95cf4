//! Configuration options for parsing and stringifying.
//!
//! - [`ParseOptions`]: limits, delimiter, charset and key handling for [`crate::parse_with_options`]
//! - [`StringifyOptions`]: encoding, array format, filtering and null handling for [`crate::stringify_with_options`]
//! - [`Charset`], [`Delimiter`], [`ArrayFormat`], [`Filter`]: the building blocks
//!
//! Options are resolved up front. Names coming from outside the program
//! (configuration files, command lines) go through `FromStr`, and that is
//! where configuration errors surface; once an options record exists, parse
//! and stringify calls cannot fail.
//!
//! ## Examples
//!
//! ```rust
//! use qs_value::{ArrayFormat, Charset, ParseOptions, StringifyOptions};
//!
//! let parse = ParseOptions::new()
//!     .with_depth(10)
//!     .with_allow_dots(true)
//!     .with_charset("iso-8859-1".parse::<Charset>().unwrap());
//! assert_eq!(parse.depth, 10);
//!
//! let stringify = StringifyOptions::new()
//!     .with_array_format("brackets".parse::<ArrayFormat>().unwrap())
//!     .with_encode(false);
//! assert!(!stringify.encode);
//! ```

use crate::formats::Format;
use crate::{Error, Result, Value};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Custom decoder: receives raw (still escaped) text and the active charset.
pub type Decoder = Arc<dyn Fn(&str, Charset) -> String + Send + Sync>;

/// Custom encoder: receives key or value text and the active charset.
pub type Encoder = Arc<dyn Fn(&str, Charset) -> String + Send + Sync>;

/// Renders a date leaf before it is encoded.
pub type DateSerializer = Arc<dyn Fn(&DateTime<Utc>) -> String + Send + Sync>;

/// Orders sibling keys during stringification.
pub type Sorter = Arc<dyn Fn(&str, &str) -> Ordering + Send + Sync>;

/// Receives `(prefix, value)` and returns the value to emit in its place.
pub type FilterFn = Arc<dyn Fn(&str, &Value) -> Value + Send + Sync>;

/// Computes a sequence element key from its parent key and index.
pub type ArrayPrefixFn = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// Character set used to read and write percent escapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Charset {
    #[default]
    Utf8,
    Iso88591,
}

impl Charset {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Iso88591 => "iso-8859-1",
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Charset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "utf-8" => Ok(Charset::Utf8),
            "iso-8859-1" => Ok(Charset::Iso88591),
            other => Err(Error::UnsupportedCharset(other.to_string())),
        }
    }
}

/// Token separator for parsing.
///
/// # Examples
///
/// ```rust
/// use qs_value::Delimiter;
///
/// assert_eq!(Delimiter::default().as_str(), Some("&"));
///
/// let pattern = Delimiter::pattern(r"[;,]").unwrap();
/// assert_eq!(pattern.as_str(), None);
/// assert!(Delimiter::pattern("[").is_err());
/// ```
#[derive(Clone, Debug)]
pub enum Delimiter {
    Text(String),
    Pattern(Regex),
}

impl Delimiter {
    /// Compiles a regular expression delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDelimiter`] if the pattern does not compile.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Delimiter::Pattern)
            .map_err(|e| Error::InvalidDelimiter(e.to_string()))
    }

    /// Returns the literal delimiter text, or `None` for a pattern.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Delimiter::Text(text) => Some(text),
            Delimiter::Pattern(_) => None,
        }
    }

    pub(crate) fn split<'a>(&'a self, input: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        match self {
            Delimiter::Text(text) => Box::new(input.split(text.as_str())),
            Delimiter::Pattern(re) => Box::new(re.split(input)),
        }
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter::Text("&".to_string())
    }
}

impl From<&str> for Delimiter {
    fn from(text: &str) -> Self {
        Delimiter::Text(text.to_string())
    }
}

impl From<char> for Delimiter {
    fn from(ch: char) -> Self {
        Delimiter::Text(ch.to_string())
    }
}

impl From<Regex> for Delimiter {
    fn from(re: Regex) -> Self {
        Delimiter::Pattern(re)
    }
}

/// Strategy that computes each sequence element's key while stringifying.
///
/// # Examples
///
/// ```rust
/// use qs_value::ArrayFormat;
///
/// assert_eq!(ArrayFormat::Indices.render("a", "0"), "a[0]");
/// assert_eq!(ArrayFormat::Brackets.render("a", "0"), "a[]");
/// assert_eq!(ArrayFormat::Repeat.render("a", "0"), "a");
///
/// let custom = ArrayFormat::custom(|prefix, index| format!("{}:{}", prefix, index));
/// assert_eq!(custom.render("a", "3"), "a:3");
/// ```
#[derive(Clone, Default)]
pub enum ArrayFormat {
    #[default]
    Indices,
    Brackets,
    Repeat,
    Custom(ArrayPrefixFn),
}

impl ArrayFormat {
    /// Wraps a closure as an array format.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        ArrayFormat::Custom(Arc::new(f))
    }

    /// Renders the key of the element at `index` under `prefix`.
    #[must_use]
    pub fn render(&self, prefix: &str, index: &str) -> String {
        match self {
            ArrayFormat::Indices => format!("{}[{}]", prefix, index),
            ArrayFormat::Brackets => format!("{}[]", prefix),
            ArrayFormat::Repeat => prefix.to_string(),
            ArrayFormat::Custom(f) => f(prefix, index),
        }
    }
}

impl fmt::Debug for ArrayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayFormat::Indices => f.write_str("Indices"),
            ArrayFormat::Brackets => f.write_str("Brackets"),
            ArrayFormat::Repeat => f.write_str("Repeat"),
            ArrayFormat::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl FromStr for ArrayFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "indices" => Ok(ArrayFormat::Indices),
            "brackets" => Ok(ArrayFormat::Brackets),
            "repeat" => Ok(ArrayFormat::Repeat),
            other => Err(Error::UnknownArrayFormat(other.to_string())),
        }
    }
}

/// Restricts or rewrites what gets stringified.
#[derive(Clone)]
pub enum Filter {
    /// Called with `("", root)` first and then with every nested `(prefix, value)`.
    Function(FilterFn),
    /// Allow-list of keys, in output order, applied at every level.
    /// Entries that parse as integers select sequence elements.
    Keys(Vec<String>),
}

impl Filter {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&str, &Value) -> Value + Send + Sync + 'static,
    {
        Filter::Function(Arc::new(f))
    }

    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::Keys(keys.into_iter().map(Into::into).collect())
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Function(_) => f.write_str("Function(..)"),
            Filter::Keys(keys) => f.debug_tuple("Keys").field(keys).finish(),
        }
    }
}

/// Configuration for [`crate::parse_with_options`].
///
/// # Examples
///
/// ```rust
/// use qs_value::ParseOptions;
///
/// let options = ParseOptions::default();
/// assert_eq!(options.depth, 5);
/// assert_eq!(options.array_limit, 20);
/// assert_eq!(options.parameter_limit, 1000);
/// assert!(options.parse_arrays);
/// ```
#[derive(Clone)]
pub struct ParseOptions {
    pub allow_dots: bool,
    pub allow_prototypes: bool,
    pub array_limit: usize,
    pub charset: Charset,
    pub charset_sentinel: bool,
    pub decoder: Option<Decoder>,
    pub delimiter: Delimiter,
    pub depth: usize,
    pub ignore_query_prefix: bool,
    pub interpret_numeric_entities: bool,
    pub parameter_limit: usize,
    pub parse_arrays: bool,
    pub plain_objects: bool,
    pub strict_null_handling: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            allow_dots: false,
            allow_prototypes: false,
            array_limit: 20,
            charset: Charset::Utf8,
            charset_sentinel: false,
            decoder: None,
            delimiter: Delimiter::default(),
            depth: 5,
            ignore_query_prefix: false,
            interpret_numeric_entities: false,
            parameter_limit: 1000,
            parse_arrays: true,
            plain_objects: false,
            strict_null_handling: false,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `a.b.c` as an alias of `a[b][c]`.
    #[must_use]
    pub fn with_allow_dots(mut self, allow_dots: bool) -> Self {
        self.allow_dots = allow_dots;
        self
    }

    /// Keep keys named `__proto__`, `constructor` or `prototype`.
    #[must_use]
    pub fn with_allow_prototypes(mut self, allow_prototypes: bool) -> Self {
        self.allow_prototypes = allow_prototypes;
        self
    }

    /// Highest index that still creates a sequence slot; larger indices become mapping keys.
    #[must_use]
    pub fn with_array_limit(mut self, array_limit: usize) -> Self {
        self.array_limit = array_limit;
        self
    }

    #[must_use]
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Honor a leading `utf8=` token that declares the charset actually used.
    #[must_use]
    pub fn with_charset_sentinel(mut self, charset_sentinel: bool) -> Self {
        self.charset_sentinel = charset_sentinel;
        self
    }

    /// Replaces the default percent decoder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use qs_value::{parse_with_options, ParseOptions, Value};
    ///
    /// let options = ParseOptions::new().with_decoder(|s, _| s.to_uppercase());
    /// let parsed = parse_with_options("a=b", &options);
    /// assert_eq!(parsed.get("A"), Some(&Value::from("B")));
    /// ```
    #[must_use]
    pub fn with_decoder<F>(mut self, decoder: F) -> Self
    where
        F: Fn(&str, Charset) -> String + Send + Sync + 'static,
    {
        self.decoder = Some(Arc::new(decoder));
        self
    }

    #[must_use]
    pub fn with_delimiter<D: Into<Delimiter>>(mut self, delimiter: D) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Maximum number of bracket groups decomposed per key.
    #[must_use]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Strip one leading `?`.
    #[must_use]
    pub fn with_ignore_query_prefix(mut self, ignore_query_prefix: bool) -> Self {
        self.ignore_query_prefix = ignore_query_prefix;
        self
    }

    /// Turn `&#NNNN;` into characters when decoding as ISO-8859-1.
    #[must_use]
    pub fn with_interpret_numeric_entities(mut self, interpret: bool) -> Self {
        self.interpret_numeric_entities = interpret;
        self
    }

    /// Maximum number of tokens read from the input. Use `usize::MAX` for no limit.
    #[must_use]
    pub fn with_parameter_limit(mut self, parameter_limit: usize) -> Self {
        self.parameter_limit = parameter_limit;
        self
    }

    #[must_use]
    pub fn with_parse_arrays(mut self, parse_arrays: bool) -> Self {
        self.parse_arrays = parse_arrays;
        self
    }

    /// Build prototype-free mappings; reserved key names are then kept verbatim.
    #[must_use]
    pub fn with_plain_objects(mut self, plain_objects: bool) -> Self {
        self.plain_objects = plain_objects;
        self
    }

    /// Read a token without `=` as `Null` instead of an empty string.
    #[must_use]
    pub fn with_strict_null_handling(mut self, strict_null_handling: bool) -> Self {
        self.strict_null_handling = strict_null_handling;
        self
    }

    /// Whether reserved key names are filtered out.
    pub(crate) fn rejects_prototype_keys(&self) -> bool {
        !self.plain_objects && !self.allow_prototypes
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("allow_dots", &self.allow_dots)
            .field("allow_prototypes", &self.allow_prototypes)
            .field("array_limit", &self.array_limit)
            .field("charset", &self.charset)
            .field("charset_sentinel", &self.charset_sentinel)
            .field("decoder", &self.decoder.as_ref().map(|_| ".."))
            .field("delimiter", &self.delimiter)
            .field("depth", &self.depth)
            .field("ignore_query_prefix", &self.ignore_query_prefix)
            .field("interpret_numeric_entities", &self.interpret_numeric_entities)
            .field("parameter_limit", &self.parameter_limit)
            .field("parse_arrays", &self.parse_arrays)
            .field("plain_objects", &self.plain_objects)
            .field("strict_null_handling", &self.strict_null_handling)
            .finish()
    }
}

/// Configuration for [`crate::stringify_with_options`].
///
/// # Examples
///
/// ```rust
/// use qs_value::{stringify_with_options, qs, ArrayFormat, StringifyOptions};
///
/// let options = StringifyOptions::new()
///     .with_array_format(ArrayFormat::Brackets)
///     .with_encode_values_only(true);
/// assert_eq!(
///     stringify_with_options(&qs!({ "a": ["b", "c"] }), &options),
///     "a[]=b&a[]=c"
/// );
/// ```
#[derive(Clone)]
pub struct StringifyOptions {
    pub add_query_prefix: bool,
    pub allow_dots: bool,
    pub array_format: ArrayFormat,
    pub charset: Charset,
    pub charset_sentinel: bool,
    pub delimiter: String,
    pub encode: bool,
    pub encoder: Option<Encoder>,
    pub encode_values_only: bool,
    pub filter: Option<Filter>,
    pub format: Format,
    pub serialize_date: Option<DateSerializer>,
    pub skip_nulls: bool,
    pub sort: Option<Sorter>,
    pub strict_null_handling: bool,
}

impl Default for StringifyOptions {
    fn default() -> Self {
        StringifyOptions {
            add_query_prefix: false,
            allow_dots: false,
            array_format: ArrayFormat::Indices,
            charset: Charset::Utf8,
            charset_sentinel: false,
            delimiter: "&".to_string(),
            encode: true,
            encoder: None,
            encode_values_only: false,
            filter: None,
            format: Format::default(),
            serialize_date: None,
            skip_nulls: false,
            sort: None,
            strict_null_handling: false,
        }
    }
}

impl StringifyOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix a non-empty result with `?`.
    #[must_use]
    pub fn with_add_query_prefix(mut self, add_query_prefix: bool) -> Self {
        self.add_query_prefix = add_query_prefix;
        self
    }

    /// Nest mapping keys as `a.b` instead of `a[b]`.
    #[must_use]
    pub fn with_allow_dots(mut self, allow_dots: bool) -> Self {
        self.allow_dots = allow_dots;
        self
    }

    #[must_use]
    pub fn with_array_format(mut self, array_format: ArrayFormat) -> Self {
        self.array_format = array_format;
        self
    }

    /// Legacy switch: `true` selects [`ArrayFormat::Indices`], `false` selects [`ArrayFormat::Repeat`].
    #[must_use]
    pub fn with_indices(mut self, indices: bool) -> Self {
        self.array_format = if indices {
            ArrayFormat::Indices
        } else {
            ArrayFormat::Repeat
        };
        self
    }

    #[must_use]
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Prepend the `utf8=` token that declares the charset used.
    #[must_use]
    pub fn with_charset_sentinel(mut self, charset_sentinel: bool) -> Self {
        self.charset_sentinel = charset_sentinel;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Disable to emit keys and values verbatim.
    #[must_use]
    pub fn with_encode(mut self, encode: bool) -> Self {
        self.encode = encode;
        self
    }

    /// Replaces the default percent encoder.
    #[must_use]
    pub fn with_encoder<F>(mut self, encoder: F) -> Self
    where
        F: Fn(&str, Charset) -> String + Send + Sync + 'static,
    {
        self.encoder = Some(Arc::new(encoder));
        self
    }

    /// Encode values but leave keys (brackets included) as they are.
    #[must_use]
    pub fn with_encode_values_only(mut self, encode_values_only: bool) -> Self {
        self.encode_values_only = encode_values_only;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_serialize_date<F>(mut self, serialize_date: F) -> Self
    where
        F: Fn(&DateTime<Utc>) -> String + Send + Sync + 'static,
    {
        self.serialize_date = Some(Arc::new(serialize_date));
        self
    }

    /// Omit keys whose value is `Null`.
    #[must_use]
    pub fn with_skip_nulls(mut self, skip_nulls: bool) -> Self {
        self.skip_nulls = skip_nulls;
        self
    }

    #[must_use]
    pub fn with_sort<F>(mut self, sort: F) -> Self
    where
        F: Fn(&str, &str) -> Ordering + Send + Sync + 'static,
    {
        self.sort = Some(Arc::new(sort));
        self
    }

    /// Emit `Null` as a bare key instead of `key=`.
    #[must_use]
    pub fn with_strict_null_handling(mut self, strict_null_handling: bool) -> Self {
        self.strict_null_handling = strict_null_handling;
        self
    }
}

impl fmt::Debug for StringifyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringifyOptions")
            .field("add_query_prefix", &self.add_query_prefix)
            .field("allow_dots", &self.allow_dots)
            .field("array_format", &self.array_format)
            .field("charset", &self.charset)
            .field("charset_sentinel", &self.charset_sentinel)
            .field("delimiter", &self.delimiter)
            .field("encode", &self.encode)
            .field("encoder", &self.encoder.as_ref().map(|_| ".."))
            .field("encode_values_only", &self.encode_values_only)
            .field("filter", &self.filter)
            .field("format", &self.format)
            .field("serialize_date", &self.serialize_date.as_ref().map(|_| ".."))
            .field("skip_nulls", &self.skip_nulls)
            .field("sort", &self.sort.as_ref().map(|_| ".."))
            .field("strict_null_handling", &self.strict_null_handling)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charset_names() {
        assert_eq!("utf-8".parse::<Charset>().unwrap(), Charset::Utf8);
        assert_eq!("iso-8859-1".parse::<Charset>().unwrap(), Charset::Iso88591);
        let err = "utf-16".parse::<Charset>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedCharset(ref name) if name == "utf-16"));
    }

    #[test]
    fn test_array_format_names() {
        assert!(matches!(
            "indices".parse::<ArrayFormat>(),
            Ok(ArrayFormat::Indices)
        ));
        assert!(matches!(
            "repeat".parse::<ArrayFormat>(),
            Ok(ArrayFormat::Repeat)
        ));
        assert!(matches!(
            "comma".parse::<ArrayFormat>(),
            Err(Error::UnknownArrayFormat(_))
        ));
    }

    #[test]
    fn test_indices_switch() {
        let options = StringifyOptions::new().with_indices(false);
        assert!(matches!(options.array_format, ArrayFormat::Repeat));
        let options = options.with_indices(true);
        assert!(matches!(options.array_format, ArrayFormat::Indices));
    }

    #[test]
    fn test_delimiter_split() {
        let text = Delimiter::from(';');
        assert_eq!(text.split("a;b;c").collect::<Vec<_>>(), vec!["a", "b", "c"]);

        let pattern = Delimiter::pattern(r"[;,]").unwrap();
        assert_eq!(
            pattern.split("a;b,c").collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_prototype_key_policy() {
        assert!(ParseOptions::new().rejects_prototype_keys());
        assert!(!ParseOptions::new()
            .with_allow_prototypes(true)
            .rejects_prototype_keys());
        assert!(!ParseOptions::new()
            .with_plain_objects(true)
            .rejects_prototype_keys());
    }

    #[test]
    fn test_debug_hides_hooks() {
        let options = StringifyOptions::new().with_sort(|a, b| a.cmp(b));
        let rendered = format!("{:?}", options);
        assert!(rendered.contains("sort: Some(\"..\")"));
    }
}
