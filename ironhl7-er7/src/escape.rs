/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! HL7 escape sequences.
//!
//! Delimiter characters inside field data are written as `\F\`, `\S\`, `\T\`,
//! `\R\`, `\E\` and (2.7+) `\P\`, using the message's own escape character.
//! Hex data `\Xhh..\` and the `\.br\` line break are decoded; any other
//! sequence is left untouched.

use ironhl7_core::types::Delimiters;
use std::borrow::Cow;

/// Escapes delimiter characters in a field value.
#[must_use]
pub fn escape<'a>(value: &'a str, delimiters: &Delimiters) -> Cow<'a, str> {
    let needs_escape = value.chars().any(|c| code_for(c, delimiters).is_some());
    if !needs_escape {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match code_for(c, delimiters) {
            Some(code) => {
                out.push(delimiters.escape);
                out.push(code);
                out.push(delimiters.escape);
            }
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Decodes escape sequences in a raw field value.
#[must_use]
pub fn unescape<'a>(value: &'a str, delimiters: &Delimiters) -> Cow<'a, str> {
    let esc = delimiters.escape;
    if !value.contains(esc) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(open) = rest.find(esc) {
        out.push_str(&rest[..open]);
        let after = &rest[open + esc.len_utf8()..];
        let Some(close) = after.find(esc) else {
            // unterminated, keep verbatim
            out.push_str(&rest[open..]);
            return Cow::Owned(out);
        };
        let sequence = &after[..close];
        match decode_sequence(sequence, delimiters) {
            Some(decoded) => out.push_str(&decoded),
            None => out.push_str(&rest[open..open + esc.len_utf8() * 2 + close]),
        }
        rest = &after[close + esc.len_utf8()..];
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn code_for(c: char, d: &Delimiters) -> Option<char> {
    if c == d.escape {
        Some('E')
    } else if c == d.field {
        Some('F')
    } else if c == d.component {
        Some('S')
    } else if c == d.subcomponent {
        Some('T')
    } else if c == d.repetition {
        Some('R')
    } else if Some(c) == d.truncation {
        Some('P')
    } else {
        None
    }
}

fn decode_sequence(sequence: &str, d: &Delimiters) -> Option<String> {
    let single = |c: char| Some(c.to_string());
    match sequence {
        "F" => single(d.field),
        "S" => single(d.component),
        "T" => single(d.subcomponent),
        "R" => single(d.repetition),
        "E" => single(d.escape),
        "P" => d.truncation.map(|c| c.to_string()),
        ".br" => single('\n'),
        _ => sequence.strip_prefix('X').and_then(decode_hex),
    }
}

fn decode_hex(hex: &str) -> Option<String> {
    if hex.is_empty() || hex.len() % 2 != 0 {
        return None;
    }
    hex.as_bytes()
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(pair, 16).ok().map(char::from)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_delimiters() {
        let d = Delimiters::default();
        assert_eq!(escape("A|B^C&D~E\\F", &d), "A\\F\\B\\S\\C\\T\\D\\R\\E\\E\\F");
        assert!(matches!(escape("plain", &d), Cow::Borrowed(_)));
    }

    #[test]
    fn test_unescape_delimiters() {
        let d = Delimiters::default();
        assert_eq!(unescape("A\\F\\B\\S\\C\\T\\D\\R\\E\\E\\F", &d), "A|B^C&D~E\\F");
    }

    #[test]
    fn test_unescape_hex_and_line_break() {
        let d = Delimiters::default();
        assert_eq!(unescape("\\X4142\\", &d), "AB");
        assert_eq!(unescape("line1\\.br\\line2", &d), "line1\nline2");
    }

    #[test]
    fn test_unescape_unknown_and_unterminated() {
        let d = Delimiters::default();
        assert_eq!(unescape("a\\H\\b", &d), "a\\H\\b");
        assert_eq!(unescape("a\\F", &d), "a\\F");
        assert_eq!(unescape("\\X4\\", &d), "\\X4\\");
    }

    #[test]
    fn test_truncation_requires_declared_character() {
        let d = Delimiters::default();
        assert_eq!(unescape("\\P\\", &d), "\\P\\");
        let d = Delimiters {
            truncation: Some('#'),
            ..Delimiters::default()
        };
        assert_eq!(escape("1#2", &d), "1\\P\\2");
        assert_eq!(unescape("1\\P\\2", &d), "1#2");
    }
}
