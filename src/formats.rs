//! Output formats.
//!
//! Two percent-encoding profiles exist. [`Format::Rfc3986`] (the default)
//! leaves encoded spaces as `%20`; [`Format::Rfc1738`] rewrites them to `+`,
//! the way HTML forms submit `application/x-www-form-urlencoded` bodies.
//!
//! ```rust
//! use qs_value::formats::{Format, DEFAULT_FORMAT};
//!
//! assert_eq!(DEFAULT_FORMAT, Format::Rfc3986);
//! assert_eq!(Format::Rfc1738.format("a%20b".to_string()), "a+b");
//! assert_eq!(Format::Rfc3986.format("a%20b".to_string()), "a%20b");
//! assert_eq!("RFC1738".parse::<Format>().unwrap(), Format::Rfc1738);
//! ```

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Percent-encoding profile applied to every emitted key and value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Format {
    Rfc1738,
    #[default]
    Rfc3986,
}

/// The format used when none is configured.
pub const DEFAULT_FORMAT: Format = Format::Rfc3986;

/// Every supported format.
pub const FORMATS: [Format; 2] = [Format::Rfc1738, Format::Rfc3986];

impl Format {
    /// Returns the canonical name of this format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Format::Rfc1738 => "RFC1738",
            Format::Rfc3986 => "RFC3986",
        }
    }

    /// Applies the output formatter to already-encoded text.
    #[must_use]
    pub fn format(&self, value: String) -> String {
        match self {
            Format::Rfc1738 if value.contains("%20") => value.replace("%20", "+"),
            _ => value,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FORMATS
            .iter()
            .find(|format| format.as_str() == s)
            .copied()
            .ok_or_else(|| Error::UnknownFormat(s.to_string()))
    }
}
