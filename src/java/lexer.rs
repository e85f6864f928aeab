//! Tokenizer for Java source text.
//!
//! Produces [`Token`]s with 1-based line and column positions. Comments are
//! kept as tokens so style rules can reason about them; literals carry both
//! their raw source text and their decoded value.

use super::escape::{decode_at, Escape};
use serde::Serialize;
use std::fmt;

const KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long", "native",
    "new", "package", "private", "protected", "public", "return", "short", "static", "strictfp",
    "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try", "void",
    "volatile", "while", "true", "false", "null",
];

// `>>` and `>>>` are left as repeated `>` so generic closers stay balanced.
const OPERATORS: &[&str] = &[
    "<<=", "...", "->", "::", "++", "--", "&&", "||", "==", "!=", "<=", ">=", "+=", "-=", "*=",
    "/=", "&=", "|=", "^=", "%=", "<<",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Literal {
    /// Source text between the delimiters.
    pub raw: String,
    pub value: String,
    pub escapes: Vec<Escape>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenKind {
    Identifier,
    Keyword,
    StringLiteral(Literal),
    CharLiteral(Literal),
    TextBlock(Literal),
    Number,
    Punct,
    LineComment,
    BlockComment { doc: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub col: usize,
}

impl Token {
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::LineComment | TokenKind::BlockComment { .. })
    }

    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == text
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == text
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    pub fn literal(&self) -> Option<&Literal> {
        match &self.kind {
            TokenKind::StringLiteral(lit) | TokenKind::CharLiteral(lit) | TokenKind::TextBlock(lit) => {
                Some(lit)
            }
            _ => None,
        }
    }

    /// Line of the last character of the token.
    pub fn end_line(&self) -> usize {
        self.line + self.text.matches('\n').count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.col, self.message)
    }
}

impl std::error::Error for LexError {}

impl From<LexError> for crate::utils::error::PresubmitError {
    fn from(e: LexError) -> Self {
        crate::utils::error::PresubmitError::LexError {
            message: e.message,
            line: e.line,
            col: e.col,
        }
    }
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn starts_with(&self, text: &str) -> bool {
        text.chars().enumerate().all(|(i, c)| self.peek(i) == Some(c))
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.pos += 1;
        let newline = c == '\n' || (c == '\r' && self.peek(0) != Some('\n'));
        if newline {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn text_from(&self, start: usize) -> String {
        self.chars[start..self.pos].iter().collect()
    }

    fn error(&self, message: impl Into<String>, line: usize, col: usize) -> LexError {
        LexError {
            message: message.into(),
            line,
            col,
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some(c) = self.peek(0) {
            if c.is_whitespace() {
                self.bump();
                continue;
            }

            let (line, col, start) = (self.line, self.col, self.pos);

            let kind = if self.starts_with("//") {
                while let Some(c) = self.peek(0) {
                    if c == '\n' || c == '\r' {
                        break;
                    }
                    self.bump();
                }
                TokenKind::LineComment
            } else if self.starts_with("/*") {
                let doc = self.starts_with("/**") && !self.starts_with("/**/");
                self.bump_n(2);
                loop {
                    if self.starts_with("*/") {
                        self.bump_n(2);
                        break;
                    }
                    if self.bump().is_none() {
                        return Err(self.error("unterminated comment", line, col));
                    }
                }
                TokenKind::BlockComment { doc }
            } else if self.starts_with("\"\"\"") {
                TokenKind::TextBlock(self.text_block(line, col)?)
            } else if c == '"' {
                TokenKind::StringLiteral(self.quoted('"', line, col)?)
            } else if c == '\'' {
                let literal = self.quoted('\'', line, col)?;
                if literal.value.chars().count() != 1 {
                    return Err(self.error("character literal must hold exactly one character", line, col));
                }
                TokenKind::CharLiteral(literal)
            } else if c.is_alphabetic() || c == '_' || c == '$' {
                while let Some(c) = self.peek(0) {
                    if c.is_alphanumeric() || c == '_' || c == '$' {
                        self.bump();
                    } else {
                        break;
                    }
                }
                if KEYWORDS.contains(&self.text_from(start).as_str()) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                }
            } else if c.is_ascii_digit() || (c == '.' && self.peek(1).is_some_and(|n| n.is_ascii_digit())) {
                self.number();
                TokenKind::Number
            } else {
                let op = OPERATORS.iter().find(|op| self.starts_with(op));
                match op {
                    Some(op) => self.bump_n(op.chars().count()),
                    None => {
                        self.bump();
                    }
                }
                TokenKind::Punct
            };

            tokens.push(Token {
                kind,
                text: self.text_from(start),
                line,
                col,
            });
        }

        Ok(tokens)
    }

    fn number(&mut self) {
        let hex = self.starts_with("0x") || self.starts_with("0X");
        while let Some(c) = self.peek(0) {
            let exponent = if hex { matches!(c, 'p' | 'P') } else { matches!(c, 'e' | 'E') };
            if exponent && matches!(self.peek(1), Some('+') | Some('-')) {
                self.bump_n(2);
            } else if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// Decodes the escape at the current position into `value`.
    fn escape(&mut self, value: &mut String, escapes: &mut Vec<Escape>, body_start: usize) -> Result<(), LexError> {
        let (line, col) = (self.line, self.col);
        let (mut escape, consumed) = decode_at(&self.chars, self.pos)
            .map_err(|e| self.error(format!("invalid escape sequence: {}", e), line, col))?;
        escape.offset = self.pos - body_start;
        value.push(escape.value);
        escapes.push(escape);
        self.bump_n(consumed);
        Ok(())
    }

    fn quoted(&mut self, quote: char, line: usize, col: usize) -> Result<Literal, LexError> {
        self.bump();
        let body_start = self.pos;
        let mut value = String::new();
        let mut escapes = Vec::new();

        loop {
            match self.peek(0) {
                None | Some('\n') | Some('\r') => {
                    let what = if quote == '"' { "string" } else { "character" };
                    return Err(self.error(format!("unterminated {} literal", what), line, col));
                }
                Some(c) if c == quote => break,
                Some('\\') => self.escape(&mut value, &mut escapes, body_start)?,
                Some(c) => {
                    value.push(c);
                    self.bump();
                }
            }
        }

        let raw = self.text_from(body_start);
        self.bump();
        Ok(Literal { raw, value, escapes })
    }

    fn text_block(&mut self, line: usize, col: usize) -> Result<Literal, LexError> {
        self.bump_n(3);
        let body_start = self.pos;
        let mut value = String::new();
        let mut escapes = Vec::new();

        loop {
            if self.starts_with("\"\"\"") {
                break;
            }
            match self.peek(0) {
                None => return Err(self.error("unterminated text block", line, col)),
                Some('\\') if matches!(self.peek(1), Some('\n') | Some('\r')) => {
                    // Line continuation: the backslash and terminator vanish.
                    self.bump();
                    if self.starts_with("\r\n") {
                        self.bump();
                    }
                    self.bump();
                }
                Some('\\') => self.escape(&mut value, &mut escapes, body_start)?,
                Some(c) => {
                    value.push(c);
                    self.bump();
                }
            }
        }

        let raw = self.text_from(body_start);
        self.bump_n(3);
        Ok(Literal { raw, value, escapes })
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::java::escape::EscapeKind;

    fn kinds(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_declaration() {
        let tokens = tokenize("public class Foo { int x = 0x1F; }").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec!["public", "class", "Foo", "{", "int", "x", "=", "0x1F", ";", "}"]
        );
        assert!(tokens[0].is_keyword("public"));
        assert!(tokens[2].is_identifier());
        assert_eq!(tokens[7].kind, TokenKind::Number);
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("a\n  b\r\nc").unwrap();
        assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].col), (2, 3));
        assert_eq!((tokens[2].line, tokens[2].col), (3, 1));
    }

    #[test]
    fn test_string_literal_escapes() {
        let tokens = tokenize(r#"String s = "\u000a\012";"#).unwrap();
        let literal = tokens[3].literal().unwrap();
        assert_eq!(literal.raw, r"\u000a\012");
        assert_eq!(literal.value, "\n\n");
        assert_eq!(literal.escapes.len(), 2);
        assert_eq!(literal.escapes[0].kind, EscapeKind::Unicode);
        assert_eq!(literal.escapes[1].kind, EscapeKind::Octal);
        assert_eq!(literal.escapes[1].offset, 6);
    }

    #[test]
    fn test_char_literal() {
        let tokens = tokenize(r"char c = '\'';").unwrap();
        assert_eq!(tokens[3].literal().unwrap().value, "'");
        assert!(matches!(tokens[3].kind, TokenKind::CharLiteral(_)));

        let err = tokenize("char c = '';").unwrap_err();
        assert_eq!((err.line, err.col), (1, 10));
    }

    #[test]
    fn test_comments_are_tokens() {
        let tokens = tokenize("/** doc */ int a; // trailing\n/* block */").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::BlockComment { doc: true });
        assert_eq!(tokens[4].kind, TokenKind::LineComment);
        assert_eq!(tokens[4].text, "// trailing");
        assert_eq!(tokens[5].kind, TokenKind::BlockComment { doc: false });
        assert_eq!(tokens[5].line, 2);
    }

    #[test]
    fn test_operators_and_generics() {
        let tokens = tokenize("Map<String, List<Integer>> m; a >>= 1; x -> x; a::b").unwrap();
        let texts = kinds(&tokens);
        assert!(texts.windows(2).any(|w| w == [">", ">"]));
        assert!(texts.contains(&"->"));
        assert!(texts.contains(&"::"));
    }

    #[test]
    fn test_text_block() {
        let source = "String s = \"\"\"\n    hi\\t\\\n    there\"\"\";";
        let tokens = tokenize(source).unwrap();
        let literal = tokens[3].literal().unwrap();
        assert_eq!(literal.value, "\n    hi\t    there");
        assert_eq!(tokens[4].text, ";");
        assert_eq!(tokens[4].line, 3);
    }

    #[test]
    fn test_errors() {
        let err = tokenize("String s = \"abc\n\";").unwrap_err();
        assert_eq!(err.message, "unterminated string literal");
        assert_eq!((err.line, err.col), (1, 12));

        let err = tokenize(r#"String s = "a\qb";"#).unwrap_err();
        assert!(err.message.starts_with("invalid escape sequence"));
        assert_eq!(err.col, 14);

        assert!(tokenize("/* never closed").is_err());
    }

    #[test]
    fn test_escaped_backslash_before_digits() {
        let tokens = tokenize(r#""\\012""#).unwrap();
        let literal = tokens[0].literal().unwrap();
        assert_eq!(literal.value, r"\012");
        assert_eq!(literal.escapes.len(), 1);
    }
}
