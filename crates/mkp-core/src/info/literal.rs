//! Python-literal text encoding of the metadata record.
//!
//! The `info` entry of every package is the `pprint` rendering of a Python
//! dict. Older tooling reads it back with a literal evaluator, so the writer
//! below sticks to that output style and the reader accepts exactly the
//! literal subset: dicts, lists, tuples, strings, numbers, booleans and
//! `None`. Nothing is ever evaluated.

use super::value::{Info, InfoValue};
use indexmap::IndexMap;
use std::fmt::Write as _;

/// Line width used when laying out nested values.
const WIDTH: usize = 80;

/// Maximum container nesting accepted by the parser.
pub const MAX_LITERAL_DEPTH: usize = 64;

/// Error raised while rendering or parsing literal text.
///
/// `line` is 0 for rendering errors, which have no position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}{}", position(.line, .column))]
pub struct LiteralError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

fn position(line: &usize, column: &usize) -> String {
    if *line == 0 {
        String::new()
    } else {
        format!(" at line {line} column {column}")
    }
}

fn render_error(message: impl Into<String>) -> LiteralError {
    LiteralError {
        message: message.into(),
        line: 0,
        column: 0,
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Render the record in `pprint` layout.
pub fn format_info(info: &Info) -> Result<String, LiteralError> {
    let value = InfoValue::Dict(info.as_map().clone());
    format_value(&value)
}

/// Render any value in `pprint` layout.
pub fn format_value(value: &InfoValue) -> Result<String, LiteralError> {
    let mut out = String::new();
    pformat(value, 0, 0, &mut out)?;
    Ok(out)
}

fn pformat(
    value: &InfoValue,
    indent: usize,
    allowance: usize,
    out: &mut String,
) -> Result<(), LiteralError> {
    let rep = repr(value)?;
    let max_width = WIDTH.saturating_sub(indent + allowance);
    if rep.chars().count() <= max_width {
        out.push_str(&rep);
        return Ok(());
    }
    match value {
        InfoValue::Dict(map) if !map.is_empty() => {
            out.push('{');
            let indent = indent + 1;
            let last_index = map.len() - 1;
            for (i, (key, item)) in sorted(map).into_iter().enumerate() {
                let key_rep = repr_str(key);
                out.push_str(&key_rep);
                out.push_str(": ");
                let last = i == last_index;
                let item_allowance = if last { allowance + 1 } else { 1 };
                pformat(item, indent + key_rep.chars().count() + 2, item_allowance, out)?;
                if !last {
                    out.push_str(",\n");
                    out.push_str(&" ".repeat(indent));
                }
            }
            out.push('}');
        }
        InfoValue::List(items) if !items.is_empty() => {
            out.push('[');
            let indent = indent + 1;
            let last_index = items.len() - 1;
            for (i, item) in items.iter().enumerate() {
                let last = i == last_index;
                let item_allowance = if last { allowance + 1 } else { 1 };
                pformat(item, indent, item_allowance, out)?;
                if !last {
                    out.push_str(",\n");
                    out.push_str(&" ".repeat(indent));
                }
            }
            out.push(']');
        }
        _ => out.push_str(&rep),
    }
    Ok(())
}

/// Single-line rendering.
fn repr(value: &InfoValue) -> Result<String, LiteralError> {
    let mut out = String::new();
    write_repr(value, &mut out)?;
    Ok(out)
}

fn write_repr(value: &InfoValue, out: &mut String) -> Result<(), LiteralError> {
    match value {
        InfoValue::None => out.push_str("None"),
        InfoValue::Bool(true) => out.push_str("True"),
        InfoValue::Bool(false) => out.push_str("False"),
        InfoValue::Int(i) => {
            let _ = write!(out, "{i}");
        }
        InfoValue::Float(f) => {
            if !f.is_finite() {
                return Err(render_error(format!("cannot encode non-finite float {f}")));
            }
            // Debug keeps a trailing ".0" on integral values, like Python.
            let _ = write!(out, "{f:?}");
        }
        InfoValue::Str(s) => out.push_str(&repr_str(s)),
        InfoValue::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(item, out)?;
            }
            out.push(']');
        }
        InfoValue::Dict(map) => {
            out.push('{');
            for (i, (key, item)) in sorted(map).into_iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&repr_str(key));
                out.push_str(": ");
                write_repr(item, out)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

/// `pprint` writes dict entries in key order.
fn sorted(map: &IndexMap<String, InfoValue>) -> Vec<(&String, &InfoValue)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

/// Python `repr()` of a str.
fn repr_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if !is_printable(c) => {
                let code = c as u32;
                let _ = if code < 0x100 {
                    write!(out, "\\x{code:02x}")
                } else if code < 0x10000 {
                    write!(out, "\\u{code:04x}")
                } else {
                    write!(out, "\\U{code:08x}")
                };
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Python's `str.isprintable` without the unassigned code points: controls,
/// separators other than the space, format characters, surrogates and
/// private use are escaped by `repr`.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    if c.is_control() || c.is_whitespace() {
        return false;
    }
    !matches!(
        c as u32,
        0xad
            | 0x600..=0x605
            | 0x61c
            | 0x6dd
            | 0x70f
            | 0x890..=0x891
            | 0x8e2
            | 0x180e
            | 0x200b..=0x200f
            | 0x2028..=0x202e
            | 0x2060..=0x2064
            | 0x2066..=0x206f
            | 0xe000..=0xf8ff
            | 0xfdd0..=0xfdef
            | 0xfeff
            | 0xfff9..=0xfffb
            | 0xfffe..=0xffff
            | 0x110bd
            | 0x110cd
            | 0x1bca0..=0x1bca3
            | 0x1d173..=0x1d17a
            | 0xe0001
            | 0xe0020..=0xe007f
            | 0xf0000..=0x10ffff
    )
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse literal text into a value.
pub fn parse_value(text: &str) -> Result<InfoValue, LiteralError> {
    let mut parser = Parser::new(text);
    parser.skip_ws();
    let value = parser.value()?;
    parser.skip_ws();
    if parser.peek().is_some() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

/// Parse literal text that must hold a dict.
pub fn parse_info(text: &str) -> Result<Info, LiteralError> {
    match parse_value(text)? {
        InfoValue::Dict(map) => Ok(Info::from(map)),
        _ => Err(render_error("top-level value is not a dict")),
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        let consumed = &self.chars[..self.pos.min(self.chars.len())];
        let line = consumed.iter().filter(|&&c| c == '\n').count() + 1;
        let column = consumed.iter().rev().take_while(|&&c| c != '\n').count() + 1;
        LiteralError {
            message: message.into(),
            line,
            column,
        }
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\n' | '\r' | '\x0c' => self.pos += 1,
                '\\' if matches!(self.peek_at(1), Some('\n')) => self.pos += 2,
                '#' => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn enter(&mut self) -> Result<(), LiteralError> {
        self.depth += 1;
        if self.depth > MAX_LITERAL_DEPTH {
            return Err(self.error(format!(
                "nesting deeper than {MAX_LITERAL_DEPTH} levels"
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn value(&mut self) -> Result<InfoValue, LiteralError> {
        self.skip_ws();
        let Some(c) = self.peek() else {
            return Err(self.error("unexpected end of input"));
        };
        match c {
            '{' => self.dict(),
            '[' => self.list(),
            '(' => self.paren(),
            '\'' | '"' => self.strings(),
            '-' | '+' | '.' | '0'..='9' => self.number(),
            c if c.is_alphabetic() || c == '_' => {
                if self.at_string_prefix() {
                    self.strings()
                } else {
                    self.name()
                }
            }
            c => Err(self.error(format!("unexpected character '{c}'"))),
        }
    }

    fn dict(&mut self) -> Result<InfoValue, LiteralError> {
        self.enter()?;
        self.pos += 1;
        let mut map = IndexMap::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.pos += 1;
                break;
            }
            let key_start = self.pos;
            let key = match self.value()? {
                InfoValue::Str(s) => s,
                _ => {
                    self.pos = key_start;
                    return Err(self.error("dict keys must be strings"));
                }
            };
            self.skip_ws();
            if self.peek() != Some(':') {
                return Err(self.error("expected ':' after dict key (sets are not supported)"));
            }
            self.pos += 1;
            let value = self.value()?;
            map.insert(key, value);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some('}') => break,
                Some(c) => return Err(self.error(format!("expected ',' or '}}', found '{c}'"))),
                None => return Err(self.error("unterminated dict")),
            }
        }
        self.leave();
        Ok(InfoValue::Dict(map))
    }

    fn list(&mut self) -> Result<InfoValue, LiteralError> {
        self.enter()?;
        self.pos += 1;
        let items = self.sequence(']')?;
        self.leave();
        Ok(InfoValue::List(items))
    }

    /// Tuple, parenthesized value or empty tuple.
    fn paren(&mut self) -> Result<InfoValue, LiteralError> {
        self.enter()?;
        self.pos += 1;
        self.skip_ws();
        if self.peek() == Some(')') {
            self.pos += 1;
            self.leave();
            return Ok(InfoValue::List(Vec::new()));
        }
        let first = self.value()?;
        self.skip_ws();
        let result = match self.bump() {
            Some(')') => first,
            Some(',') => {
                let mut items = vec![first];
                items.extend(self.sequence(')')?);
                InfoValue::List(items)
            }
            Some(c) => return Err(self.error(format!("expected ',' or ')', found '{c}'"))),
            None => return Err(self.error("unterminated tuple")),
        };
        self.leave();
        Ok(result)
    }

    /// Comma separated values up to `close`, trailing comma allowed.
    fn sequence(&mut self, close: char) -> Result<Vec<InfoValue>, LiteralError> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(items);
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(c) if c == close => return Ok(items),
                Some(c) => {
                    return Err(self.error(format!("expected ',' or '{close}', found '{c}'")))
                }
                None => return Err(self.error("unterminated sequence")),
            }
        }
    }

    fn name(&mut self) -> Result<InfoValue, LiteralError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "None" => Ok(InfoValue::None),
            "True" => Ok(InfoValue::Bool(true)),
            "False" => Ok(InfoValue::Bool(false)),
            _ => {
                self.pos = start;
                Err(self.error(format!("unexpected name '{word}'")))
            }
        }
    }

    fn number(&mut self) -> Result<InfoValue, LiteralError> {
        let start = self.pos;
        let mut negative = false;
        while let Some(sign @ ('-' | '+')) = self.peek() {
            if sign == '-' {
                negative = !negative;
            }
            self.pos += 1;
            self.skip_ws();
        }

        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B')) {
            let radix = match self.peek_at(1) {
                Some('x' | 'X') => 16,
                Some('o' | 'O') => 8,
                _ => 2,
            };
            self.pos += 2;
            let digits = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
            let digits = digits.replace('_', "");
            let magnitude = i64::from_str_radix(&digits, radix)
                .map_err(|_| self.error(format!("invalid integer literal '{digits}'")))?;
            return Ok(InfoValue::Int(if negative { -magnitude } else { magnitude }));
        }

        let body_start = self.pos;
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => self.pos += 1,
                '.' => {
                    is_float = true;
                    self.pos += 1;
                }
                'e' | 'E' => {
                    is_float = true;
                    self.pos += 1;
                    if matches!(self.peek(), Some('+' | '-')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
        let body: String = self.chars[body_start..self.pos]
            .iter()
            .filter(|&&c| c != '_')
            .collect();
        if body.is_empty() || body == "." {
            self.pos = start;
            return Err(self.error("invalid number"));
        }
        match self.peek() {
            Some('j' | 'J') => return Err(self.error("complex numbers are not supported")),
            // Python 2 long suffix.
            Some('l' | 'L') if !is_float => self.pos += 1,
            _ => {}
        }
        if is_float {
            let f: f64 = body
                .parse()
                .map_err(|_| self.error(format!("invalid float literal '{body}'")))?;
            Ok(InfoValue::Float(if negative { -f } else { f }))
        } else {
            let signed = if negative { format!("-{body}") } else { body };
            let i: i64 = signed
                .parse()
                .map_err(|_| self.error(format!("integer literal '{signed}' out of range")))?;
            Ok(InfoValue::Int(i))
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// True if the cursor sits on a prefixed string such as `u'x'` or `rb"x"`.
    fn at_string_prefix(&self) -> bool {
        let mut offset = 0;
        while offset < 2 {
            match self.peek_at(offset) {
                Some('u' | 'U' | 'r' | 'R' | 'b' | 'B') => offset += 1,
                Some('\'' | '"') => return offset > 0,
                _ => return false,
            }
        }
        matches!(self.peek_at(offset), Some('\'' | '"'))
    }

    /// One or more adjacent string literals, concatenated.
    fn strings(&mut self) -> Result<InfoValue, LiteralError> {
        let mut out = self.string()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some('\'' | '"') => out.push_str(&self.string()?),
                Some(_) if self.at_string_prefix() => out.push_str(&self.string()?),
                _ => break,
            }
        }
        Ok(InfoValue::Str(out))
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let mut raw = false;
        while let Some(c @ ('u' | 'U' | 'r' | 'R' | 'b' | 'B')) = self.peek() {
            if matches!(c, 'r' | 'R') {
                raw = true;
            }
            self.pos += 1;
        }
        let Some(quote) = self.bump() else {
            return Err(self.error("unterminated string"));
        };
        let triple = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            self.pos += 2;
        }

        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(self.error("unterminated string"));
            };
            match c {
                c if c == quote => {
                    if !triple {
                        return Ok(out);
                    }
                    if self.peek() == Some(quote) && self.peek_at(1) == Some(quote) {
                        self.pos += 2;
                        return Ok(out);
                    }
                    out.push(c);
                }
                '\n' if !triple => return Err(self.error("unterminated string")),
                '\\' if raw => {
                    out.push('\\');
                    if let Some(next) = self.bump() {
                        out.push(next);
                    }
                }
                '\\' => self.escape(&mut out)?,
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let Some(c) = self.bump() else {
            return Err(self.error("unterminated string"));
        };
        match c {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.pos += 1;
                        }
                        None => break,
                    }
                }
                out.push(self.code_point(code)?);
            }
            'x' => {
                let code = self.hex_digits(2)?;
                out.push(self.code_point(code)?);
            }
            'u' => {
                let code = self.hex_digits(4)?;
                out.push(self.code_point(code)?);
            }
            'U' => {
                let code = self.hex_digits(8)?;
                out.push(self.code_point(code)?);
            }
            'N' => return Err(self.error("named unicode escapes are not supported")),
            other => {
                // Unknown escapes are kept verbatim.
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_digits(&mut self, count: usize) -> Result<u32, LiteralError> {
        let mut code = 0u32;
        for _ in 0..count {
            let digit = self
                .peek()
                .and_then(|d| d.to_digit(16))
                .ok_or_else(|| self.error(format!("truncated \\x/\\u escape, expected {count} hex digits")))?;
            code = code * 16 + digit;
            self.pos += 1;
        }
        Ok(code)
    }

    fn code_point(&self, code: u32) -> Result<char, LiteralError> {
        char::from_u32(code).ok_or_else(|| self.error(format!("invalid code point {code:#x}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(entries: &[(&str, InfoValue)]) -> InfoValue {
        InfoValue::Dict(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn short_dict_stays_on_one_line() {
        let value = dict(&[
            ("title", "Test package".into()),
            ("num_files", InfoValue::Int(1)),
            ("version.usable_until", InfoValue::None),
        ]);
        assert_eq!(
            format_value(&value).unwrap(),
            "{'num_files': 1, 'title': 'Test package', 'version.usable_until': None}"
        );
    }

    #[test]
    fn long_dict_wraps_like_pprint() {
        let files = dict(&[
            ("agents", InfoValue::from(vec!["special/agent_test"])),
            ("checks", InfoValue::from(vec!["foo"])),
        ]);
        let value = dict(&[
            ("author", "John Doe".into()),
            ("files", files),
            ("name", "foo".into()),
            ("num_files", InfoValue::Int(2)),
            ("version", "42".into()),
            ("version.packaged", "mkp-rs".into()),
        ]);
        let expected = "{'author': 'John Doe',\n \
                        'files': {'agents': ['special/agent_test'], 'checks': ['foo']},\n \
                        'name': 'foo',\n \
                        'num_files': 2,\n \
                        'version': '42',\n \
                        'version.packaged': 'mkp-rs'}";
        assert_eq!(format_value(&value).unwrap(), expected);
    }

    #[test]
    fn nested_values_wrap_with_key_indent() {
        let long: Vec<String> = (0..12).map(|i| format!("plugins/file_{i:02}.py")).collect();
        let value = dict(&[("files", dict(&[("agents", InfoValue::from(long.clone()))]))]);
        let text = format_value(&value).unwrap();
        assert!(text.starts_with("{'files': {'agents': ['plugins/file_00.py',\n"));
        assert!(text.contains(&format!("\n{}'plugins/file_01.py',", " ".repeat(22))));
        assert!(text.ends_with("'plugins/file_11.py']}}"));
        assert_eq!(parse_value(&text).unwrap(), value);
    }

    #[test]
    fn string_quoting_matches_python_repr() {
        assert_eq!(repr_str("plain"), "'plain'");
        assert_eq!(repr_str("it's"), "\"it's\"");
        assert_eq!(repr_str("both ' and \""), "'both \\' and \"'");
        assert_eq!(repr_str("tab\there\n"), "'tab\\there\\n'");
        assert_eq!(repr_str("bell\x07"), "'bell\\x07'");
        assert_eq!(repr_str("naïve"), "'naïve'");
        assert_eq!(repr_str("nb\u{a0}sp"), "'nb\\xa0sp'");
        assert_eq!(repr_str("zero\u{200b}width"), "'zero\\u200bwidth'");
        assert_eq!(repr_str("\u{feff}bom"), "'\\ufeffbom'");
        assert_eq!(repr_str("a b"), "'a b'");
    }

    #[test]
    fn dict_keys_are_written_sorted() {
        let value = dict(&[
            ("version", "1".into()),
            ("files", dict(&[("web", InfoValue::from(vec!["a"])), ("checks", InfoValue::from(vec!["b"]))])),
            ("author", "me".into()),
        ]);
        assert_eq!(
            format_value(&value).unwrap(),
            "{'author': 'me', 'files': {'checks': ['b'], 'web': ['a']}, 'version': '1'}"
        );
    }

    #[test]
    fn render_errors_have_no_position() {
        let err = format_value(&InfoValue::Float(f64::INFINITY)).unwrap_err();
        assert_eq!(err.line, 0);
        assert_eq!(err.to_string(), "cannot encode non-finite float inf");
    }

    #[test]
    fn parses_legacy_python2_style_info() {
        let text = "{'author': u'John Doe',\n 'files': {'agents': ['special/agent_test'],\n           'checkman': ['test']},\n 'num_files': 2L,\n 'version.min_required': '1.2.6p5',\n 'version.usable_until': None}\n";
        let info = parse_info(text).unwrap();
        assert_eq!(info.get_str("author"), Some("John Doe"));
        assert_eq!(info.num_files(), Some(2));
        assert_eq!(info.get("version.usable_until"), Some(&InfoValue::None));
        let files = info.files().unwrap();
        assert_eq!(files["checkman"], vec!["test".to_string()]);
    }

    #[test]
    fn parses_tuples_numbers_and_concatenated_strings() {
        let value = parse_value(
            "{'t': (1, -2.5, 0x10, 1_000), 'one': ('x',), 'grp': ('ab' \"cd\"), 'e': (), 'exp': 1e3, 'neg': - 3}",
        )
        .unwrap();
        let map = value.as_dict().unwrap();
        assert_eq!(
            map["t"],
            InfoValue::List(vec![
                InfoValue::Int(1),
                InfoValue::Float(-2.5),
                InfoValue::Int(16),
                InfoValue::Int(1000)
            ])
        );
        assert_eq!(map["one"], InfoValue::List(vec!["x".into()]));
        assert_eq!(map["grp"], InfoValue::Str("abcd".into()));
        assert_eq!(map["e"], InfoValue::List(vec![]));
        assert_eq!(map["exp"], InfoValue::Float(1000.0));
        assert_eq!(map["neg"], InfoValue::Int(-3));
    }

    #[test]
    fn parses_escapes_and_raw_strings() {
        let value = parse_value(r#"['a\nb', 'q\'s', '\x41\u00e9\101', r'c:\temp', 'keep\d']"#).unwrap();
        assert_eq!(
            value,
            InfoValue::List(vec![
                "a\nb".into(),
                "q's".into(),
                "AéA".into(),
                "c:\\temp".into(),
                "keep\\d".into(),
            ])
        );
    }

    #[test]
    fn ignores_comments_and_trailing_commas() {
        let value = parse_value("{\n  # generated\n  'a': [1, 2,],\n}").unwrap();
        assert_eq!(value, dict(&[("a", InfoValue::from(vec![1i64, 2]))]));
    }

    #[test]
    fn rejects_code_and_malformed_input() {
        for bad in [
            "__import__('os').system('true')",
            "{'a': open('x')}",
            "{'a': 1",
            "{'a' 1}",
            "{1: 'x'}",
            "{'a', 'b'}",
            "'unterminated",
            "{'a': 1} extra",
            "{'a': 1j}",
            "",
        ] {
            assert!(parse_value(bad).is_err(), "accepted: {bad}");
        }
    }

    #[test]
    fn reports_error_position() {
        let err = parse_value("{'a': 1,\n 'b': ?}").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 7);
        assert!(err.to_string().contains("line 2 column 7"));
    }

    #[test]
    fn rejects_excessive_nesting() {
        let deep = "[".repeat(MAX_LITERAL_DEPTH + 1) + &"]".repeat(MAX_LITERAL_DEPTH + 1);
        let err = parse_value(&deep).unwrap_err();
        assert!(err.message.contains("nesting"));

        let ok = "[".repeat(MAX_LITERAL_DEPTH) + &"]".repeat(MAX_LITERAL_DEPTH);
        assert!(parse_value(&ok).is_ok());
    }

    #[test]
    fn top_level_must_be_dict() {
        assert!(parse_info("['not', 'a', 'dict']").is_err());
    }

    #[test]
    fn non_finite_floats_cannot_be_written() {
        assert!(format_value(&InfoValue::Float(f64::NAN)).is_err());
        assert_eq!(format_value(&InfoValue::Float(1.0)).unwrap(), "1.0");
    }

    #[test]
    fn writer_output_parses_back() {
        let value = dict(&[
            ("quote", "it's \"quoted\"".into()),
            ("ctrl", "\u{1}\u{7f}".into()),
            ("nums", InfoValue::from(vec![InfoValue::Int(-7), InfoValue::Float(0.25)])),
            ("flags", InfoValue::from(vec![true, false])),
            ("empty", dict(&[])),
        ]);
        let text = format_value(&value).unwrap();
        assert_eq!(parse_value(&text).unwrap(), value);
    }
}
