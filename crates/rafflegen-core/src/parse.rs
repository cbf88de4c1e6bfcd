//! Parser for the table-literal subset used by addon saved variables.
//!
//! Accepts a single `NAME = <value>` assignment. Values are brace tables,
//! strings, numbers and booleans. Table fields may be `[key] = value`,
//! `name = value` or positional. Tables whose keys are exactly `1..=n`
//! in order come back as [`Value::Array`].

use crate::error::{Error, Result};
use crate::value::{Key, Table, Value};

const MAX_DEPTH: usize = 128;

/// Parsed saved-variables file.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub name: String,
    pub value: Value,
}

/// Parse a whole saved-variables document.
pub fn parse_document(input: &str) -> Result<Document> {
    let mut parser = Parser::new(input);
    parser.skip_trivia();
    let name = parser
        .identifier()
        .ok_or_else(|| parser.error("expected variable name"))?;
    parser.skip_trivia();
    parser.expect('=')?;
    let value = parser.value(0)?;
    parser.skip_trivia();
    if let Some(ch) = parser.peek() {
        return Err(parser.error(format!("unexpected trailing character '{ch}'")));
    }
    Ok(Document { name, value })
}

/// Parse a single value expression.
pub fn parse_value(input: &str) -> Result<Value> {
    let mut parser = Parser::new(input);
    let value = parser.value(0)?;
    parser.skip_trivia();
    if let Some(ch) = parser.peek() {
        return Err(parser.error(format!("unexpected trailing character '{ch}'")));
    }
    Ok(value)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.peek() {
            Some(ch) if ch == expected => {
                self.bump();
                Ok(())
            }
            Some(ch) => Err(self.error(format!("expected '{expected}', found '{ch}'"))),
            None => Err(self.error(format!("expected '{expected}', found end of input"))),
        }
    }

    /// Skip whitespace and `--` line comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.bump();
                }
                Some('-') if self.peek_at(1) == Some('-') => {
                    while let Some(ch) = self.bump() {
                        if ch == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn identifier(&mut self) -> Option<String> {
        let first = self.peek()?;
        if !(first.is_ascii_alphabetic() || first == '_') {
            return None;
        }
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                name.push(ch);
                self.bump();
            } else {
                break;
            }
        }
        Some(name)
    }

    fn value(&mut self, depth: usize) -> Result<Value> {
        self.skip_trivia();
        match self.peek() {
            Some('{') => self.table(depth),
            Some('"') | Some('\'') => self.string().map(Value::Str),
            Some(ch) if ch == '-' || ch == '.' || ch.is_ascii_digit() => self.number(),
            Some(ch) if ch.is_ascii_alphabetic() => {
                let word = self.identifier().unwrap_or_default();
                match word.as_str() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    other => Err(self.error(format!("unsupported value '{other}'"))),
                }
            }
            Some(ch) => Err(self.error(format!("unexpected character '{ch}'"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn table(&mut self, depth: usize) -> Result<Value> {
        if depth >= MAX_DEPTH {
            return Err(self.error("table nesting too deep"));
        }
        self.expect('{')?;
        let mut entries: Vec<(Key, Value)> = Vec::new();
        let mut next_index = 1_i64;

        loop {
            self.skip_trivia();
            if self.peek() == Some('}') {
                self.bump();
                break;
            }

            let (key, value) = self.field(depth, &mut next_index)?;
            match entries.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, slot)) => *slot = value,
                None => entries.push((key, value)),
            }

            self.skip_trivia();
            match self.peek() {
                Some(',') | Some(';') => {
                    self.bump();
                }
                Some('}') => {}
                Some(ch) => return Err(self.error(format!("expected ',' or '}}', found '{ch}'"))),
                None => return Err(self.error("unterminated table")),
            }
        }

        Ok(into_value(entries))
    }

    fn field(&mut self, depth: usize, next_index: &mut i64) -> Result<(Key, Value)> {
        match self.peek() {
            Some('[') => {
                self.bump();
                self.skip_trivia();
                let key = match self.peek() {
                    Some('"') | Some('\'') => Key::Str(self.string()?),
                    _ => match self.number()? {
                        Value::Int(number) => Key::Int(number),
                        _ => return Err(self.error("only integer numeric keys are supported")),
                    },
                };
                self.skip_trivia();
                self.expect(']')?;
                self.skip_trivia();
                self.expect('=')?;
                let value = self.value(depth + 1)?;
                Ok((key, value))
            }
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                let start = (self.pos, self.line, self.column);
                let name = self.identifier().unwrap_or_default();
                self.skip_trivia();
                if self.peek() == Some('=') {
                    self.bump();
                    let value = self.value(depth + 1)?;
                    return Ok((Key::Str(name), value));
                }
                // Not `name = value`; rewind and read it as a positional value.
                (self.pos, self.line, self.column) = start;
                self.positional(depth, next_index)
            }
            _ => self.positional(depth, next_index),
        }
    }

    fn positional(&mut self, depth: usize, next_index: &mut i64) -> Result<(Key, Value)> {
        let value = self.value(depth + 1)?;
        let key = Key::Int(*next_index);
        *next_index += 1;
        Ok((key, value))
    }

    fn string(&mut self) -> Result<String> {
        let quote = self.bump().ok_or_else(|| self.error("expected string"))?;
        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(ch) if ch == quote => break,
                Some('\\') => {
                    let escaped = self
                        .bump()
                        .ok_or_else(|| self.error("unterminated escape sequence"))?;
                    match escaped {
                        'n' => text.push('\n'),
                        'r' => text.push('\r'),
                        't' => text.push('\t'),
                        '0'..='9' => text.push(self.decimal_escape(escaped)?),
                        other => text.push(other),
                    }
                }
                Some(ch) => text.push(ch),
            }
        }
        Ok(text)
    }

    /// `\ddd` escape with up to three decimal digits.
    fn decimal_escape(&mut self, first: char) -> Result<char> {
        let mut code = first.to_digit(10).unwrap_or_default();
        for _ in 0..2 {
            match self.peek().and_then(|ch| ch.to_digit(10)) {
                Some(digit) => {
                    code = code * 10 + digit;
                    self.bump();
                }
                None => break,
            }
        }
        char::from_u32(code).ok_or_else(|| self.error(format!("invalid escape \\{code}")))
    }

    fn number(&mut self) -> Result<Value> {
        let mut lexeme = String::new();
        let mut is_float = false;
        if self.peek() == Some('-') {
            lexeme.push('-');
            self.bump();
        }
        while let Some(ch) = self.peek() {
            match ch {
                '0'..='9' => lexeme.push(ch),
                '.' | 'e' | 'E' => {
                    is_float = true;
                    lexeme.push(ch);
                }
                '+' | '-' if lexeme.ends_with(&['e', 'E'][..]) => lexeme.push(ch),
                _ => break,
            }
            self.bump();
        }

        if is_float {
            lexeme
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| self.error(format!("invalid number '{lexeme}'")))
        } else {
            lexeme
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| self.error(format!("invalid integer '{lexeme}'")))
        }
    }
}

fn into_value(entries: Vec<(Key, Value)>) -> Value {
    let is_sequence = !entries.is_empty()
        && entries
            .iter()
            .enumerate()
            .all(|(index, (key, _))| *key == Key::Int(index as i64 + 1));

    if is_sequence {
        Value::Array(entries.into_iter().map(|(_, value)| value).collect())
    } else {
        Value::Table(entries.into_iter().collect::<Table>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_document_with_nested_tables() {
        let input = r#"Saved =
{
    ["Default"] = {
        ["@A"] = {
            ["version"] = 1,
            ["list"] = {
                [1] = "x",
                [2] = "y",
            },
        },
    },
}
"#;
        let document = parse_document(input).expect("parse document");
        assert_eq!(document.name, "Saved");

        let account = document
            .value
            .as_table()
            .and_then(|root| root.get("Default"))
            .and_then(Value::as_table)
            .and_then(|profile| profile.get("@A"))
            .and_then(Value::as_table)
            .expect("account table");
        assert_eq!(account.get_int("version"), Some(1));
        assert_eq!(
            account.get("list"),
            Some(&Value::Array(vec!["x".into(), "y".into()]))
        );
    }

    #[test]
    fn accepts_bare_names_positional_fields_and_comments() {
        let value = parse_value("{ a = 1; -- note\n 'two', true, [\"c\"] = -2.5 }").expect("parse");
        let table = value.as_table().expect("table");
        assert_eq!(table.get_int("a"), Some(1));
        assert_eq!(table.get("c"), Some(&Value::Float(-2.5)));
        let positional: Vec<&Value> = table
            .iter()
            .filter(|(key, _)| matches!(key, Key::Int(_)))
            .map(|(_, value)| value)
            .collect();
        assert_eq!(positional, vec![&Value::Str("two".into()), &Value::Bool(true)]);
    }

    #[test]
    fn reads_escapes_and_raw_newlines() {
        let value = parse_value("\"a \\\"b\\\" \\\\ c\r\nd\\110\"").expect("parse");
        assert_eq!(value, Value::Str("a \"b\" \\ c\r\ndn".to_string()));
    }

    #[test]
    fn empty_braces_are_an_empty_table() {
        assert_eq!(parse_value("{}").expect("parse"), Value::Table(Table::new()));
    }

    #[test]
    fn reports_position_of_errors() {
        let err = parse_document("Saved =\n{\n    [\"a\"] 1,\n}").expect_err("should fail");
        match err {
            Error::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_trailing_content_and_nil() {
        assert!(parse_document("A = {} B = {}").is_err());
        assert!(parse_value("{ [1] = nil }").is_err());
        assert!(parse_value("{ [1] = 2").is_err());
    }
}
