//! Bracket and dot notation key decomposition.
//!
//! A key such as `a[b][0][]` is split into a root name followed by one
//! segment per bracket group. The number of bracket groups consumed is
//! capped by [`ParseOptions::depth`]; whatever is left is kept as one
//! literal trailing segment instead of being thrown away.
//!
//! ```rust
//! use qs_value::keys::{decompose, PathSegment};
//! use qs_value::ParseOptions;
//!
//! let segments = decompose("a[b][0]", &ParseOptions::default()).unwrap();
//! assert_eq!(
//!     segments,
//!     vec![
//!         PathSegment::Name("a".to_string()),
//!         PathSegment::Index("b".to_string()),
//!         PathSegment::Index("0".to_string()),
//!     ]
//! );
//! ```

use crate::ParseOptions;
use regex::Regex;
use std::sync::OnceLock;

/// Key names that would reach the prototype of a dynamic object.
pub const FORBIDDEN_KEYS: [&str; 3] = ["__proto__", "constructor", "prototype"];

/// One step of a decomposed key path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// A literal mapping key: the root name, or an over-depth remainder.
    Name(String),
    /// The inner text of a bracket group, empty for `[]`.
    ///
    /// Whether it addresses a sequence slot is decided while the value is built.
    Index(String),
}

impl PathSegment {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            PathSegment::Name(s) | PathSegment::Index(s) => s,
        }
    }
}

/// Returns `true` for `__proto__`, `constructor` and `prototype`.
#[must_use]
pub fn is_forbidden_key(key: &str) -> bool {
    FORBIDDEN_KEYS.contains(&key)
}

fn bracket_group() -> &'static Regex {
    static GROUP: OnceLock<Regex> = OnceLock::new();
    GROUP.get_or_init(|| Regex::new(r"\[[^\[\]]*\]").expect("static pattern"))
}

fn dot_segment() -> &'static Regex {
    static DOT: OnceLock<Regex> = OnceLock::new();
    DOT.get_or_init(|| Regex::new(r"\.([^.\[]+)").expect("static pattern"))
}

/// Splits a decoded key into path segments.
///
/// Returns `None` when the key contributes nothing: it is empty, or its root
/// name is prototype-reserved and neither `plain_objects` nor
/// `allow_prototypes` is set. Bracket groups naming a reserved key are
/// dropped individually.
#[must_use]
pub fn decompose(key: &str, options: &ParseOptions) -> Option<Vec<PathSegment>> {
    if key.is_empty() {
        return None;
    }

    let key = if options.allow_dots {
        dot_segment().replace_all(key, "[$1]").into_owned()
    } else {
        key.to_string()
    };

    let mut groups = bracket_group().find_iter(&key).peekable();
    let parent = match groups.peek() {
        Some(first) => &key[..first.start()],
        None => key.as_str(),
    };

    let mut segments = Vec::new();
    if !parent.is_empty() {
        if options.rejects_prototype_keys() && is_forbidden_key(parent) {
            log::debug!("skipping prototype-reserved key {:?}", parent);
            return None;
        }
        segments.push(PathSegment::Name(parent.to_string()));
    }

    let mut consumed = 0usize;
    while consumed < options.depth {
        let Some(group) = groups.next() else {
            break;
        };
        consumed += 1;
        let inner = &group.as_str()[1..group.len() - 1];
        if options.rejects_prototype_keys() && is_forbidden_key(inner) {
            log::debug!("dropping prototype-reserved segment {:?}", inner);
            continue;
        }
        segments.push(PathSegment::Index(inner.to_string()));
    }

    if let Some(rest) = groups.next() {
        log::debug!("key {:?} exceeds depth {}", key, options.depth);
        segments.push(PathSegment::Name(key[rest.start()..].to_string()));
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}
