//! Tolerant parser for the object literal assigned to `goods_sale_prop_str`.
//!
//! Accepts what a scripting-language literal evaluator accepts and strict
//! JSON does not: single-quoted strings, unknown escapes kept verbatim
//! (`\/` stays `\/`), `True`/`False`/`None`, trailing commas, tuples and
//! raw newlines inside strings. Produces a `serde_json::Value` so both parse
//! strategies feed the same reconciler.

use serde_json::{Map, Number, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{message} at byte {pos}")]
pub(crate) struct LiteralError {
    pub pos: usize,
    pub message: &'static str,
}

/// Nesting depth after which the parser gives up.
const MAX_DEPTH: usize = 64;

pub(crate) fn parse_object_literal(src: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser { src, pos: 0 };
    let value = parser.value(0)?;
    parser.skip_ws();
    if parser.pos != src.len() {
        return Err(parser.err("trailing characters after literal"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn err(&self, message: &'static str) -> LiteralError {
        LiteralError {
            pos: self.pos,
            message,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, wanted: char, message: &'static str) -> Result<(), LiteralError> {
        self.skip_ws();
        if self.peek() == Some(wanted) {
            self.bump();
            Ok(())
        } else {
            Err(self.err(message))
        }
    }

    fn value(&mut self, depth: usize) -> Result<Value, LiteralError> {
        if depth > MAX_DEPTH {
            return Err(self.err("literal nested too deeply"));
        }
        self.skip_ws();
        match self.peek() {
            Some('{') => self.object(depth),
            Some('[') => self.sequence(depth, ']'),
            Some('(') => self.sequence(depth, ')'),
            Some(q @ ('\'' | '"')) => {
                self.bump();
                self.string(q).map(Value::String)
            }
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.keyword(),
            Some(_) => Err(self.err("unexpected character")),
            None => Err(self.err("unexpected end of literal")),
        }
    }

    fn object(&mut self, depth: usize) -> Result<Value, LiteralError> {
        self.bump(); // '{'
        let mut map = Map::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Object(map));
            }

            let key = match self.value(depth + 1)? {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                _ => return Err(self.err("object key must be a string or number")),
            };
            self.expect(':', "expected ':' after object key")?;
            let value = self.value(depth + 1)?;
            map.insert(key, value);

            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some('}') => return Ok(Value::Object(map)),
                _ => return Err(self.err("expected ',' or '}' in object")),
            }
        }
    }

    fn sequence(&mut self, depth: usize, close: char) -> Result<Value, LiteralError> {
        self.bump(); // '[' or '('
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(Value::Array(items));
            }
            items.push(self.value(depth + 1)?);
            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some(c) if c == close => return Ok(Value::Array(items)),
                _ => return Err(self.err("expected ',' or closing bracket in sequence")),
            }
        }
    }

    /// Reads a string body after the opening quote `q`.
    fn string(&mut self, q: char) -> Result<String, LiteralError> {
        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(self.err("unterminated string"));
            };
            if c == q {
                return Ok(out);
            }
            if c != '\\' {
                out.push(c);
                continue;
            }

            let Some(esc) = self.bump() else {
                return Err(self.err("unterminated escape"));
            };
            match esc {
                '\\' | '\'' | '"' => out.push(esc),
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                'b' => out.push('\u{8}'),
                'f' => out.push('\u{c}'),
                'v' => out.push('\u{b}'),
                'a' => out.push('\u{7}'),
                '0' => out.push('\0'),
                '\n' => {} // line continuation
                'x' => {
                    let code = self.hex(2)?;
                    out.push(char::from_u32(code).ok_or_else(|| self.err("invalid \\x escape"))?);
                }
                'u' => {
                    let c = self.unicode_escape()?;
                    out.push(c);
                }
                other => {
                    out.push('\\');
                    out.push(other);
                }
            }
        }
    }

    fn hex(&mut self, digits: usize) -> Result<u32, LiteralError> {
        let end = self.pos + digits;
        let chunk = self
            .src
            .get(self.pos..end)
            .ok_or_else(|| self.err("truncated hex escape"))?;
        if !chunk.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(self.err("invalid hex escape"));
        }
        let code = u32::from_str_radix(chunk, 16).map_err(|_| self.err("invalid hex escape"))?;
        self.pos = end;
        Ok(code)
    }

    /// `\uXXXX`, combining a UTF-16 surrogate pair when one follows.
    fn unicode_escape(&mut self) -> Result<char, LiteralError> {
        let high = self.hex(4)?;
        if (0xD800..0xDC00).contains(&high) {
            if !self.src[self.pos..].starts_with("\\u") {
                return Err(self.err("unpaired surrogate in \\u escape"));
            }
            self.pos += 2;
            let low = self.hex(4)?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.err("invalid low surrogate in \\u escape"));
            }
            let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
            return char::from_u32(code).ok_or_else(|| self.err("invalid surrogate pair"));
        }
        char::from_u32(high).ok_or_else(|| self.err("unpaired surrogate in \\u escape"))
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        {
            self.bump();
        }
        let text = self.src[start..self.pos].trim_start_matches('+');
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Value::from(i));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| self.err("invalid number"))
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        match &self.src[start..self.pos] {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            _ => {
                self.pos = start;
                Err(self.err("unknown bare word"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_plain_json_object() {
        let v = parse_object_literal(r#"{"1": {"base_name": "Size", "listorder": 2}}"#).unwrap();
        assert_eq!(v, json!({"1": {"base_name": "Size", "listorder": 2}}));
    }

    #[test]
    fn keeps_unknown_escapes_verbatim() {
        let v = parse_object_literal(r#"{"img": "https:\/\/img.example\/a.png"}"#).unwrap();
        assert_eq!(v["img"], r"https:\/\/img.example\/a.png");
    }

    #[test]
    fn decodes_unicode_and_surrogate_pairs() {
        let v = parse_object_literal(r#"{"a": "\u00e9", "b": "\ud83d\ude00"}"#).unwrap();
        assert_eq!(v["a"], "é");
        assert_eq!(v["b"], "😀");
    }

    #[test]
    fn accepts_single_quotes_keywords_and_trailing_commas() {
        let v = parse_object_literal("{'a': True, 'b': None, 'c': [1, 2.5,], 'd': (3,),}").unwrap();
        assert_eq!(v, json!({"a": true, "b": null, "c": [1, 2.5], "d": [3]}));
    }

    #[test]
    fn numeric_keys_become_strings() {
        let v = parse_object_literal("{10: 'x'}").unwrap();
        assert_eq!(v["10"], "x");
    }

    #[test]
    fn preserves_key_order() {
        let v = parse_object_literal(r#"{"b": 1, "a": 2, "c": 3}"#).unwrap();
        let keys: Vec<&String> = v.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn rejects_unterminated_string() {
        let err = parse_object_literal(r#"{"a": "open}"#).unwrap_err();
        assert_eq!(err.message, "unterminated string");
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse_object_literal(r#"{"a": 1} extra"#).is_err());
    }

    #[test]
    fn rejects_signed_hex_escapes() {
        let err = parse_object_literal(r#"{"a": "\u+04a"}"#).unwrap_err();
        assert_eq!(err.message, "invalid hex escape");
        assert!(parse_object_literal(r#"{"a": "\x+4"}"#).is_err());
    }

    #[test]
    fn rejects_lone_surrogate() {
        assert!(parse_object_literal(r#"{"a": "\ud83d"}"#).is_err());
    }
}
