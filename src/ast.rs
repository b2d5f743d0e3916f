//! The value produced by the scanner: a property access chain such as
//! `pets[3].name`, decoded into its keys.

use std::fmt;

/// One segment of an access chain: a property name or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Name(String),
    Index(usize),
}

impl Key {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) => Some(name),
            Key::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Name(_) => None,
            Key::Index(idx) => Some(*idx),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<usize> for Key {
    fn from(idx: usize) -> Self {
        Key::Index(idx)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => f.write_str(name),
            Key::Index(idx) => write!(f, "{}", idx),
        }
    }
}

/// A successfully scanned reference.
///
/// `keys` is never empty and always starts with the leading identifier.
/// `matched` is the exact source text consumed, beginning at byte offset
/// `start`; the source string itself is not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencePath {
    pub(crate) keys: Vec<Key>,
    pub(crate) start: usize,
    pub(crate) matched: String,
}

impl ReferencePath {
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn into_keys(self) -> Vec<Key> {
        self.keys
    }

    /// Byte offset in the source where the match began.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset just past the last accepted token.
    pub fn end(&self) -> usize {
        self.start + self.matched.len()
    }

    pub fn matched(&self) -> &str {
        &self.matched
    }

    /// Render the keys as an RFC 6901 JSON Pointer.
    ///
    /// The leading identifier is kept as the first reference token, so
    /// `$['Outer Space'].url` becomes `/$/Outer Space/url`.
    pub fn to_json_pointer(&self) -> String {
        let mut out = String::new();
        for key in &self.keys {
            out.push('/');
            match key {
                Key::Name(name) => {
                    for ch in name.chars() {
                        match ch {
                            '~' => out.push_str("~0"),
                            '/' => out.push_str("~1"),
                            c => out.push(c),
                        }
                    }
                }
                Key::Index(idx) => out.push_str(&idx.to_string()),
            }
        }
        out
    }
}

/// Canonical JavaScript form: `.name` where the name is a plain identifier,
/// `["..."]` otherwise, `[n]` for indices. Scanning the output yields the
/// same keys.
impl fmt::Display for ReferencePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            match key {
                Key::Name(name) if i == 0 => f.write_str(name)?,
                Key::Name(name) if is_identifier(name) => write!(f, ".{}", name)?,
                Key::Name(name) => write!(f, "[{}]", crate::json::quote(name))?,
                Key::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

pub(crate) fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

pub(crate) fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

/// Check whether `s` matches `[A-Za-z_$][A-Za-z0-9_$]*`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(ch) if is_identifier_start(ch) => chars.all(is_identifier_char),
        _ => false,
    }
}
