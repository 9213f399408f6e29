/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Character set resolution and decoding.
//!
//! An HL7 message names its own character set in MSH-18, so a binary buffer
//! has to be partially read before it can be decoded. This happens in two
//! separate passes:
//!
//! 1. [`resolve_encoding`] scans the raw bytes of the first line for the
//!    18th field and returns its text, or the caller's default.
//! 2. [`Charset::decode`] decodes the complete buffer with that charset.

use crate::framing::skip_start_block;
use encoding_rs::Encoding;
use ironhl7_core::error::ArgumentError;
use ironhl7_core::types::{DEFAULT_FIELD_SEPARATOR, SEGMENT_TYPE_LEN};
use memchr::memchr;
use std::borrow::Cow;
use tracing::warn;

/// Encoding used when neither the caller nor the message names one.
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// 0-based index of the MSH-18 token, counting the span before MSH-1 as token 0.
const CHARACTER_SET_TOKEN: usize = 17;

/// Vendor prefix placed before the actual transfer encoding name.
const UNICODE_PREFIX: &str = "UNICODE";

const CR: u8 = b'\r';

/// Finds the character set declared in the first line of a raw buffer.
///
/// The walk starts right after the three-byte segment type and counts
/// field-separator-delimited tokens. It stops at token 17 (MSH-18) or as soon
/// as the walk passes the first carriage return. A missing or empty token
/// yields `default`; this function never fails.
///
/// # Arguments
/// * `buffer` - Raw message bytes, optionally starting with an MLLP start block
/// * `default` - Encoding name to fall back to
///
/// # Example
/// ```
/// use ironhl7_er7::resolve_encoding;
///
/// let raw = b"MSH|^~\\&||||||||||||||||8859/1\rPID|1\r";
/// assert_eq!(resolve_encoding(raw, "UTF-8"), "8859/1");
/// ```
#[must_use]
pub fn resolve_encoding<'a>(buffer: &[u8], default: &'a str) -> Cow<'a, str> {
    let buffer = skip_start_block(buffer);
    if buffer.len() <= SEGMENT_TYPE_LEN {
        return Cow::Borrowed(default);
    }

    let separator = match buffer[SEGMENT_TYPE_LEN] {
        CR => DEFAULT_FIELD_SEPARATOR,
        b => b,
    };
    let line_end = memchr(CR, buffer).unwrap_or(buffer.len());

    let mut start = SEGMENT_TYPE_LEN;
    let mut index = 0;
    loop {
        if start > line_end {
            return Cow::Borrowed(default);
        }
        let next = memchr(separator, &buffer[start..]).map(|p| start + p);
        if index == CHARACTER_SET_TOKEN {
            let end = next.map_or(line_end, |p| p.min(line_end));
            return declared_name(&buffer[start..end]).map_or(Cow::Borrowed(default), Cow::Owned);
        }
        match next {
            Some(pos) => {
                start = pos + 1;
                index += 1;
            }
            None => return Cow::Borrowed(default),
        }
    }
}

/// Turns the raw MSH-18 bytes into an encoding name.
fn declared_name(token: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(token);
    let name = text.trim();
    let name = name
        .strip_prefix(UNICODE_PREFIX)
        .map_or(name, str::trim_start);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// A decoder for one character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charset {
    encoding: &'static Encoding,
}

impl Charset {
    /// Looks up a charset by HL7 table 0211 name or WHATWG label.
    ///
    /// Matching is case-insensitive. Returns `None` for unknown names.
    ///
    /// `ASCII` and `8859/1` decode as windows-1252, the WHATWG reading of
    /// ISO 8859-1: bytes 0x80 to 0x9F become cp1252 characters such as `€`
    /// rather than C1 control codes.
    #[must_use]
    pub fn from_hl7_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let encoding = match name.to_ascii_uppercase().as_str() {
            "ASCII" | "8859/1" => encoding_rs::WINDOWS_1252,
            "8859/2" => encoding_rs::ISO_8859_2,
            "8859/3" => encoding_rs::ISO_8859_3,
            "8859/4" => encoding_rs::ISO_8859_4,
            "8859/5" => encoding_rs::ISO_8859_5,
            "8859/6" => encoding_rs::ISO_8859_6,
            "8859/7" => encoding_rs::ISO_8859_7,
            "8859/8" => encoding_rs::ISO_8859_8,
            "8859/9" => encoding_rs::WINDOWS_1254,
            "8859/15" => encoding_rs::ISO_8859_15,
            "ISO IR14" => encoding_rs::SHIFT_JIS,
            "ISO IR87" => encoding_rs::ISO_2022_JP,
            "ISO IR159" => encoding_rs::EUC_JP,
            "GB 18030-2000" => encoding_rs::GB18030,
            "KS X 1001" => encoding_rs::EUC_KR,
            "BIG-5" => encoding_rs::BIG5,
            "UTF-8" => encoding_rs::UTF_8,
            "UTF-16" => encoding_rs::UTF_16LE,
            _ => Encoding::for_label(name.as_bytes())?,
        };
        Some(Self { encoding })
    }

    /// Returns the canonical name of the underlying encoding.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decodes a complete buffer.
    ///
    /// Malformed sequences are replaced with U+FFFD and reported once as a warning.
    #[must_use]
    pub fn decode(&self, buffer: &[u8]) -> String {
        let (text, had_errors) = self.encoding.decode_without_bom_handling(buffer);
        if had_errors {
            warn!(
                charset = self.name(),
                "malformed byte sequences replaced while decoding message"
            );
        }
        text.into_owned()
    }
}

/// Decodes a buffer with the named charset.
///
/// # Errors
/// Returns `ArgumentError::UnsupportedEncoding` if `name` is not recognized.
pub fn decode(buffer: &[u8], name: &str) -> Result<String, ArgumentError> {
    let charset = Charset::from_hl7_name(name)
        .ok_or_else(|| ArgumentError::UnsupportedEncoding(name.to_string()))?;
    Ok(charset.decode(buffer))
}
