//! Error types for query string handling.
//!
//! Parsing and stringifying never fail on data content: malformed escapes,
//! prototype-reserved keys and over-limit input are all recovered locally.
//! The errors in this module are configuration errors, raised while an
//! options record is being resolved, plus the failures of the serde bridge
//! ([`crate::to_value`]) for Rust types that have no query string shape.
//!
//! ## Examples
//!
//! ```rust
//! use qs_value::{ArrayFormat, Error};
//!
//! let err = "comma".parse::<ArrayFormat>().unwrap_err();
//! assert!(matches!(err, Error::UnknownArrayFormat(_)));
//! assert!(err.to_string().contains("comma"));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by this crate.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A charset other than `utf-8` or `iso-8859-1` was requested
    #[error("The charset option must be either utf-8 or iso-8859-1, found `{0}`")]
    UnsupportedCharset(String),

    /// An output format name other than `RFC1738` or `RFC3986`
    #[error("Unknown format option provided: `{0}`")]
    UnknownFormat(String),

    /// An array format name other than `indices`, `brackets` or `repeat`
    #[error("Unknown array format option provided: `{0}`")]
    UnknownArrayFormat(String),

    /// The delimiter pattern failed to compile
    #[error("Invalid delimiter pattern: {0}")]
    InvalidDelimiter(String),

    /// A Rust value with no query string representation
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an unsupported type error for values that cannot become a [`crate::Value`].
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use qs_value::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
