use crate::ast::{Key, ReferencePath};
use crate::error::{PathError, Position};

/// JSON formatting style.
#[derive(Clone, Copy)]
pub enum JsonStyle {
    /// Compact: no whitespace between tokens.
    Compact,
    /// Pretty: 2-space indented, one entry per line.
    Pretty,
}

struct JsonWriter {
    buf: String,
    style: JsonStyle,
    depth: usize,
}

impl JsonWriter {
    fn new(style: JsonStyle) -> Self {
        JsonWriter {
            buf: String::new(),
            style,
            depth: 0,
        }
    }

    fn is_pretty(&self) -> bool {
        matches!(self.style, JsonStyle::Pretty)
    }

    fn newline(&mut self) {
        if self.is_pretty() {
            self.buf.push('\n');
            for _ in 0..self.depth {
                self.buf.push_str("  ");
            }
        }
    }

    fn space(&mut self) {
        if self.is_pretty() {
            self.buf.push(' ');
        }
    }

    fn write_path(&mut self, path: &ReferencePath) {
        self.buf.push('{');
        self.depth += 1;

        let mut first = true;

        self.entry_sep(&mut first);
        self.write_key("keys");
        self.write_keys(path.keys());

        self.entry_sep(&mut first);
        self.write_key("index");
        write!(&mut self.buf, "{}", path.start()).unwrap();

        self.entry_sep(&mut first);
        self.write_key("matched");
        self.write_string_value(path.matched());

        self.entry_sep(&mut first);
        self.write_key("pointer");
        self.write_string_value(&path.to_json_pointer());

        self.depth -= 1;
        self.newline();
        self.buf.push('}');
    }

    /// Keys stay on one line even in pretty mode; they read better as
    /// `["pets", 3, "name"]` than one per line.
    fn write_keys(&mut self, keys: &[Key]) {
        self.buf.push('[');
        for (i, key) in keys.iter().enumerate() {
            if i > 0 {
                self.buf.push(',');
                self.space();
            }
            match key {
                Key::Name(name) => self.write_string_value(name),
                Key::Index(idx) => write!(&mut self.buf, "{}", idx).unwrap(),
            }
        }
        self.buf.push(']');
    }

    fn entry_sep(&mut self, first: &mut bool) {
        if *first {
            *first = false;
        } else {
            self.buf.push(',');
        }
        self.newline();
    }

    fn write_key(&mut self, key: &str) {
        self.write_string_value(key);
        self.buf.push(':');
        self.space();
    }

    fn write_string_value(&mut self, s: &str) {
        self.buf.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.buf.push_str("\\\""),
                '\\' => self.buf.push_str("\\\\"),
                '\n' => self.buf.push_str("\\n"),
                '\r' => self.buf.push_str("\\r"),
                '\t' => self.buf.push_str("\\t"),
                '\u{0008}' => self.buf.push_str("\\b"),
                '\u{000C}' => self.buf.push_str("\\f"),
                c if c < '\u{0020}' => {
                    write!(&mut self.buf, "\\u{:04x}", c as u32).unwrap();
                }
                c => self.buf.push(c),
            }
        }
        self.buf.push('"');
    }
}

use std::fmt::Write;

/// Quote `s` as a JSON string literal.
pub fn quote(s: &str) -> String {
    let mut w = JsonWriter::new(JsonStyle::Compact);
    w.write_string_value(s);
    w.buf
}

/// Serialize keys as a JSON array, e.g. `["pets",3,"name"]`.
pub fn keys_to_json(keys: &[Key]) -> String {
    let mut w = JsonWriter::new(JsonStyle::Compact);
    w.write_keys(keys);
    w.buf
}

/// Serialize a scan result to a compact JSON object with `keys`, `index`,
/// `matched` and `pointer` entries.
pub fn to_json(path: &ReferencePath) -> String {
    let mut w = JsonWriter::new(JsonStyle::Compact);
    w.write_path(path);
    w.buf
}

/// Serialize a scan result to a pretty-printed JSON object (2-space indent).
pub fn to_json_pretty(path: &ReferencePath) -> String {
    let mut w = JsonWriter::new(JsonStyle::Pretty);
    w.write_path(path);
    w.buf
}

/// Serialize a list of path errors to a JSON array string.
pub fn errors_to_json(errors: &[PathError]) -> String {
    let mut w = JsonWriter::new(JsonStyle::Compact);
    w.buf.push('[');
    for (i, err) in errors.iter().enumerate() {
        if i > 0 {
            w.buf.push(',');
        }
        w.buf.push('{');
        w.write_key("code");
        w.write_string_value(&err.code);
        w.buf.push(',');
        w.write_key("message");
        w.write_string_value(&err.message);
        w.buf.push(',');
        w.write_key("begin");
        write_position(&mut w, &err.begin);
        w.buf.push(',');
        w.write_key("end");
        write_position(&mut w, &err.end);
        w.buf.push('}');
    }
    w.buf.push(']');
    w.buf
}

fn write_position(w: &mut JsonWriter, pos: &Position) {
    write!(
        &mut w.buf,
        "{{\"line\":{},\"column\":{},\"offset\":{}}}",
        pos.line, pos.column, pos.offset
    )
    .unwrap();
}
