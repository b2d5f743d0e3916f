use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::ast::{Key, ReferencePath};

/// Where to look for a reference and how strictly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Byte offset to begin scanning from.
    pub start_offset: usize,
    /// When true the identifier must begin exactly at `start_offset`;
    /// otherwise the first identifier at or after it is used.
    pub require_match_at_start: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            start_offset: 0,
            require_match_at_start: true,
        }
    }
}

impl ScanOptions {
    pub fn at(mut self, offset: usize) -> Self {
        self.start_offset = offset;
        self
    }

    pub fn anywhere(mut self) -> Self {
        self.require_match_at_start = false;
        self
    }
}

static IDENT_AT_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[$_A-Za-z][$_A-Za-z0-9]*").unwrap());

static IDENT_ANYWHERE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[$_A-Za-z][$_A-Za-z0-9]*").unwrap());

// Groups: 1 = digits, 2 = quoted literal, 3 = dotted identifier.
// No group matched means a whitespace run. Whitespace may sit between
// the dot and its identifier, as in JavaScript.
static KEY_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?:\[\s*(?:([0-9]+)|('(?:\\[^\r\n]|[^\\'\r\n])*'|"(?:\\[^\r\n]|[^\\"\r\n])*"))\s*\]|\.\s*([$_A-Za-z][$_A-Za-z0-9]*)|\s+)"#,
    )
    .unwrap()
});

/// A single accessor recognized by the key-token matcher.
#[derive(Debug, PartialEq)]
enum KeyToken<'a> {
    Identifier(&'a str),
    Index(usize),
    StringKey(String),
}

impl From<KeyToken<'_>> for Key {
    fn from(token: KeyToken<'_>) -> Self {
        match token {
            KeyToken::Identifier(name) => Key::Name(name.to_string()),
            KeyToken::Index(idx) => Key::Index(idx),
            KeyToken::StringKey(name) => Key::Name(name),
        }
    }
}

/// What the key-token matcher found at the cursor.
#[derive(Debug, PartialEq)]
enum Step<'a> {
    /// An accessor that yields a key.
    Key(KeyToken<'a>),
    /// A bracket accessor whose content matched but did not decode. It is
    /// consumed without contributing a key.
    Undecodable,
    Whitespace,
}

/// Scanner state: the source and a cursor into it.
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

/// Scan a reference at the start of `source` with default options.
pub fn scan(source: &str) -> Option<ReferencePath> {
    scan_with(source, &ScanOptions::default())
}

/// Scan the longest access chain allowed by `options`.
///
/// Returns `None` when no leading identifier is found (or, with
/// `require_match_at_start`, when it does not begin at the start offset).
/// Anything that fails to match after the identifier ends the chain; the
/// keys accumulated so far are still returned.
pub fn scan_with(source: &str, options: &ScanOptions) -> Option<ReferencePath> {
    let start = options.start_offset;
    if start >= source.len() || !source.is_char_boundary(start) {
        return None;
    }

    let mut scanner = Scanner {
        input: source,
        pos: start,
    };
    let (begin, ident) = scanner.match_identifier(options.require_match_at_start)?;
    let mut keys = vec![Key::Name(ident.to_string())];

    // Whitespace moves the cursor but not `end`, so a trailing run is
    // left out of the matched text.
    let mut end = scanner.pos;
    while let Some(step) = scanner.match_key_token() {
        match step {
            Step::Key(token) => {
                keys.push(token.into());
                end = scanner.pos;
            }
            Step::Undecodable => end = scanner.pos,
            Step::Whitespace => {}
        }
    }

    Some(ReferencePath {
        keys,
        start: begin,
        matched: source[begin..end].to_string(),
    })
}

impl<'a> Scanner<'a> {
    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Match the leading identifier, returning its start offset and text.
    fn match_identifier(&mut self, at_start: bool) -> Option<(usize, &'a str)> {
        let m = if at_start {
            let m = IDENT_AT_START.find(self.remaining())?;
            (self.pos + m.start(), self.pos + m.end())
        } else {
            let m = IDENT_ANYWHERE.find_at(self.input, self.pos)?;
            (m.start(), m.end())
        };
        self.pos = m.1;
        Some((m.0, &self.input[m.0..m.1]))
    }

    /// Match one accessor or whitespace run exactly at the cursor.
    fn match_key_token(&mut self) -> Option<Step<'a>> {
        let input = self.input;
        let caps = KEY_TOKEN.captures(&input[self.pos..])?;
        let len = caps.get(0).map_or(0, |m| m.end());
        if len == 0 {
            return None;
        }
        let step = classify(&caps);
        self.pos += len;
        Some(step)
    }
}

fn classify<'a>(caps: &Captures<'a>) -> Step<'a> {
    if let Some(digits) = caps.get(1) {
        return match digits.as_str().parse::<usize>() {
            Ok(idx) => Step::Key(KeyToken::Index(idx)),
            Err(_) => Step::Undecodable,
        };
    }
    if let Some(literal) = caps.get(2) {
        return match decode_quoted(literal.as_str()) {
            Some(s) => Step::Key(KeyToken::StringKey(s)),
            None => Step::Undecodable,
        };
    }
    if let Some(name) = caps.get(3) {
        return Step::Key(KeyToken::Identifier(name.as_str()));
    }
    Step::Whitespace
}

/// Decode a quoted literal (quotes included) using JSON string rules.
///
/// Inside single quotes `\'` is an escaped quote and `"` needs no escape.
/// Returns `None` for anything JSON would reject: unknown escapes, raw
/// control characters, malformed or unpaired `\u` sequences.
pub(crate) fn decode_quoted(literal: &str) -> Option<String> {
    let quote = literal.chars().next()?;
    if literal.len() < 2 || !literal.ends_with(quote) {
        return None;
    }
    let body = &literal[1..literal.len() - 1];

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next()? {
                '"' => out.push('"'),
                '\\' => out.push('\\'),
                '/' => out.push('/'),
                '\'' if quote == '\'' => out.push('\''),
                'b' => out.push('\u{0008}'),
                'f' => out.push('\u{000C}'),
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                'u' => out.push(decode_unicode_escape(&mut chars)?),
                _ => return None,
            },
            c if c < '\u{0020}' => return None,
            c => out.push(c),
        }
    }
    Some(out)
}

/// Decode the `XXXX` after `\u`, pairing a high surrogate with the
/// `\uXXXX` low surrogate that must follow it.
fn decode_unicode_escape(chars: &mut std::str::Chars<'_>) -> Option<char> {
    let high = read_hex4(chars)?;
    if !(0xD800..0xDC00).contains(&high) {
        return char::from_u32(high);
    }
    if chars.next()? != '\\' || chars.next()? != 'u' {
        return None;
    }
    let low = read_hex4(chars)?;
    if !(0xDC00..0xE000).contains(&low) {
        return None;
    }
    char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> Option<u32> {
    let mut value = 0;
    for _ in 0..4 {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(src: &str) -> Option<Step<'_>> {
        let mut scanner = Scanner { input: src, pos: 0 };
        scanner.match_key_token()
    }

    #[test]
    fn key_token_kinds() {
        assert_eq!(token(".abc"), Some(Step::Key(KeyToken::Identifier("abc"))));
        assert_eq!(token(". abc"), Some(Step::Key(KeyToken::Identifier("abc"))));
        assert_eq!(token("[ 42 ]"), Some(Step::Key(KeyToken::Index(42))));
        assert_eq!(
            token("['x y']"),
            Some(Step::Key(KeyToken::StringKey("x y".to_string())))
        );
        assert_eq!(token("  \t"), Some(Step::Whitespace));
        assert_eq!(token("[\"\\q\"]"), Some(Step::Undecodable));
    }

    #[test]
    fn key_token_rejects() {
        assert_eq!(token(""), None);
        assert_eq!(token(".1a"), None);
        assert_eq!(token("[bad]"), None);
        assert_eq!(token("['open]"), None);
        assert_eq!(token("[-1]"), None);
        assert_eq!(token("['a\nb']"), None);
        assert_eq!(token("x.y"), None);
    }

    #[test]
    fn identifier_requires_exact_start() {
        let mut scanner = Scanner {
            input: "  foo",
            pos: 0,
        };
        assert_eq!(scanner.match_identifier(true), None);
        assert_eq!(scanner.match_identifier(false), Some((2, "foo")));
        assert_eq!(scanner.pos, 5);
    }

    #[test]
    fn decode_json_escapes() {
        assert_eq!(decode_quoted(r#""a\nb""#).as_deref(), Some("a\nb"));
        assert_eq!(decode_quoted(r#""\u00e9""#).as_deref(), Some("é"));
        assert_eq!(decode_quoted(r#""\ud83d\ude00""#).as_deref(), Some("😀"));
        assert_eq!(decode_quoted(r#""\/\\""#).as_deref(), Some("/\\"));
        assert_eq!(decode_quoted(r#""""#).as_deref(), Some(""));
    }

    #[test]
    fn decode_single_quoted() {
        assert_eq!(decode_quoted(r#"'a "b" c'"#).as_deref(), Some("a \"b\" c"));
        assert_eq!(decode_quoted(r#"'a \"b\" c'"#).as_deref(), Some("a \"b\" c"));
        assert_eq!(decode_quoted(r"'it\'s'").as_deref(), Some("it's"));
    }

    #[test]
    fn decode_failures() {
        assert_eq!(decode_quoted(r#""it\'s""#), None);
        assert_eq!(decode_quoted(r#""\x41""#), None);
        assert_eq!(decode_quoted(r#""\u12""#), None);
        assert_eq!(decode_quoted(r#""\ud83d""#), None);
        assert_eq!(decode_quoted(r#""\ude00""#), None);
        assert_eq!(decode_quoted("\"a\tb\""), None);
    }
}
