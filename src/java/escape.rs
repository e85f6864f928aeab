//! Java escape sequence decoding.
//!
//! Three forms are recognized inside string, character and text block
//! literals: the simple escapes (`\n`, `\"`, ...), octal escapes (`\0` up to
//! `\377`) and unicode escapes (`\u000a`, with any number of `u`s).

use serde::Serialize;
use thiserror::Error;

/// Characters that have a dedicated single-letter escape, as `(letter, value)`.
pub const SPECIAL_ESCAPES: [(char, char); 8] = [
    ('b', '\u{8}'),
    ('t', '\t'),
    ('n', '\n'),
    ('f', '\u{c}'),
    ('r', '\r'),
    ('"', '"'),
    ('\'', '\''),
    ('\\', '\\'),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapeKind {
    Simple,
    Octal,
    Unicode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Escape {
    pub kind: EscapeKind,
    /// Source text of the escape, backslash included.
    pub raw: String,
    pub value: char,
    /// Char offset of the backslash within the literal body.
    pub offset: usize,
}

impl Escape {
    /// The special escape letter that should replace this escape, if it is an
    /// octal or unicode spelling of a character that has one.
    pub fn preferred(&self) -> Option<char> {
        match self.kind {
            EscapeKind::Simple => None,
            EscapeKind::Octal | EscapeKind::Unicode => special_escape_for(self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscapeError {
    #[error("backslash at end of input")]
    Dangling,

    #[error("illegal escape character '{0}'")]
    Unknown(char),

    #[error("malformed unicode escape '{0}'")]
    MalformedUnicode(String),

    #[error("unicode escape names a lone surrogate U+{0:04X}")]
    NotAScalar(u32),
}

/// A decoded literal body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decoded {
    pub value: String,
    pub escapes: Vec<Escape>,
}

pub fn special_escape_for(c: char) -> Option<char> {
    SPECIAL_ESCAPES
        .iter()
        .find(|(_, value)| *value == c)
        .map(|(letter, _)| *letter)
}

fn simple_escape_value(letter: char) -> Option<char> {
    if letter == 's' {
        return Some(' ');
    }
    SPECIAL_ESCAPES
        .iter()
        .find(|(l, _)| *l == letter)
        .map(|(_, value)| *value)
}

/// Reads one `\uXXXX` code unit starting at the backslash at `pos`.
/// Returns the UTF-16 code unit and the number of chars consumed.
fn read_unicode_unit(chars: &[char], pos: usize) -> Result<(u32, usize), EscapeError> {
    let mut i = pos + 1;
    while chars.get(i) == Some(&'u') {
        i += 1;
    }

    let digits: String = chars.iter().skip(i).take(4).collect();
    if digits.chars().count() < 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        let seen: String = chars[pos..(i + digits.chars().count()).min(chars.len())]
            .iter()
            .collect();
        return Err(EscapeError::MalformedUnicode(seen));
    }

    let unit = u32::from_str_radix(&digits, 16).map_err(|_| EscapeError::MalformedUnicode(digits.clone()))?;
    Ok((unit, i + 4 - pos))
}

fn is_high_surrogate(unit: u32) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

fn is_low_surrogate(unit: u32) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// Decodes the escape whose backslash sits at `chars[pos]`.
///
/// Returns the escape and the number of chars it spans. A high surrogate
/// unicode escape immediately followed by a low surrogate escape is decoded
/// as a single escape covering both.
pub fn decode_at(chars: &[char], pos: usize) -> Result<(Escape, usize), EscapeError> {
    debug_assert_eq!(chars.get(pos), Some(&'\\'));
    let next = *chars.get(pos + 1).ok_or(EscapeError::Dangling)?;

    let (kind, value, consumed) = match next {
        'u' => {
            let (unit, mut consumed) = read_unicode_unit(chars, pos)?;
            let value = if is_high_surrogate(unit) {
                let low_pos = pos + consumed;
                let low = if chars.get(low_pos) == Some(&'\\') && chars.get(low_pos + 1) == Some(&'u') {
                    read_unicode_unit(chars, low_pos).ok()
                } else {
                    None
                };
                match low {
                    Some((low, low_len)) if is_low_surrogate(low) => {
                        consumed += low_len;
                        let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                        char::from_u32(code).ok_or(EscapeError::NotAScalar(code))?
                    }
                    _ => return Err(EscapeError::NotAScalar(unit)),
                }
            } else {
                char::from_u32(unit).ok_or(EscapeError::NotAScalar(unit))?
            };
            (EscapeKind::Unicode, value, consumed)
        }
        '0'..='7' => {
            // A three digit octal escape must start with 0-3, keeping it <= 0o377.
            let max_digits = if next <= '3' { 3 } else { 2 };
            let digits: String = chars[pos + 1..]
                .iter()
                .take(max_digits)
                .take_while(|c| ('0'..='7').contains(*c))
                .collect();
            let code = u32::from_str_radix(&digits, 8).map_err(|_| EscapeError::Unknown(next))?;
            let value = char::from_u32(code).ok_or(EscapeError::NotAScalar(code))?;
            (EscapeKind::Octal, value, digits.len() + 1)
        }
        letter => {
            let value = simple_escape_value(letter).ok_or(EscapeError::Unknown(letter))?;
            (EscapeKind::Simple, value, 2)
        }
    };

    let raw: String = chars[pos..pos + consumed].iter().collect();
    Ok((
        Escape {
            kind,
            raw,
            value,
            offset: pos,
        },
        consumed,
    ))
}

/// Decodes every escape in a literal body (the text between the quotes).
pub fn unescape(body: &str) -> Result<Decoded, EscapeError> {
    let chars: Vec<char> = body.chars().collect();
    let mut value = String::with_capacity(body.len());
    let mut escapes = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        if chars[pos] == '\\' {
            let (escape, consumed) = decode_at(&chars, pos)?;
            value.push(escape.value);
            escapes.push(escape);
            pos += consumed;
        } else {
            value.push(chars[pos]);
            pos += 1;
        }
    }

    Ok(Decoded { value, escapes })
}
