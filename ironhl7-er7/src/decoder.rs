/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Message decoder.
//!
//! This module turns message input into an ordered list of [`Segment`]s:
//! binary input is decoded with its resolved charset, MLLP framing is
//! stripped, the header is required, and every non-empty line becomes one
//! segment. Segment failures are annotated with their line before being
//! returned.

use crate::charset::{Charset, DEFAULT_ENCODING, resolve_encoding};
use crate::config::MessageConfig;
use crate::framing::strip_framing;
use crate::segment::Segment;
use bytes::Bytes;
use ironhl7_core::error::{ArgumentError, ParseError};
use ironhl7_core::types::{Delimiters, HEADER_SEGMENT, SEGMENT_TERMINATOR};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, warn};

/// Message input: already-decoded text or raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hl7Input<'a> {
    /// Decoded text; charset resolution is skipped.
    Text(&'a str),
    /// Raw bytes; the charset comes from MSH-18 or the fallback.
    Binary(&'a [u8]),
}

impl<'a> Hl7Input<'a> {
    /// Converts the input to text.
    ///
    /// Binary input is decoded with the charset declared in MSH-18. An empty
    /// or missing declaration, or one that no decoder recognizes, falls back
    /// to `fallback`.
    ///
    /// # Arguments
    /// * `fallback` - Encoding name used when the message does not declare one
    ///
    /// # Errors
    /// Returns `ArgumentError::UnsupportedEncoding` if `fallback` is not recognized.
    pub fn into_text(self, fallback: &str) -> Result<Cow<'a, str>, ArgumentError> {
        let fallback_charset = Charset::from_hl7_name(fallback)
            .ok_or_else(|| ArgumentError::UnsupportedEncoding(fallback.to_string()))?;

        match self {
            Self::Text(text) => Ok(Cow::Borrowed(text)),
            Self::Binary(buffer) => {
                let declared = resolve_encoding(buffer, fallback);
                let charset = match Charset::from_hl7_name(&declared) {
                    Some(charset) => charset,
                    None => {
                        warn!(
                            declared = %declared,
                            fallback,
                            "unrecognized character set in MSH-18, using fallback"
                        );
                        fallback_charset
                    }
                };
                debug!(
                    charset = charset.name(),
                    bytes = buffer.len(),
                    "decoding message"
                );
                Ok(Cow::Owned(charset.decode(buffer)))
            }
        }
    }
}

impl Default for Hl7Input<'_> {
    fn default() -> Self {
        Self::Text("")
    }
}

impl<'a> From<&'a str> for Hl7Input<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for Hl7Input<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a [u8]> for Hl7Input<'a> {
    fn from(buffer: &'a [u8]) -> Self {
        Self::Binary(buffer)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Hl7Input<'a> {
    fn from(buffer: &'a [u8; N]) -> Self {
        Self::Binary(buffer)
    }
}

impl<'a> From<&'a Vec<u8>> for Hl7Input<'a> {
    fn from(buffer: &'a Vec<u8>) -> Self {
        Self::Binary(buffer)
    }
}

impl<'a> From<&'a Bytes> for Hl7Input<'a> {
    fn from(buffer: &'a Bytes) -> Self {
        Self::Binary(buffer)
    }
}

/// Splits decoded message text into segments.
#[derive(Debug, Clone)]
pub struct Decoder {
    /// Configuration handed to every segment.
    config: Arc<MessageConfig>,
}

impl Decoder {
    /// Creates a decoder whose segments share `config`.
    #[inline]
    #[must_use]
    pub fn new(config: Arc<MessageConfig>) -> Self {
        Self { config }
    }

    /// Decodes message input using the default fallback encoding.
    ///
    /// # Errors
    /// Returns `Hl7Error` on an invalid encoding or a parse failure.
    pub fn decode_input(&self, input: Hl7Input<'_>) -> ironhl7_core::Result<Vec<Segment>> {
        let text = input.into_text(DEFAULT_ENCODING)?;
        Ok(self.decode(&text)?)
    }

    /// Splits message text into segments.
    ///
    /// Framing bytes are stripped first. Empty lines are skipped. The returned
    /// list is only produced when every line parses.
    ///
    /// # Errors
    /// Returns `ParseError::MissingHeader` if the text does not start with
    /// `MSH`, or `ParseError::Segment` carrying the 1-based line number, the
    /// line and the whole message when a segment rejects its line.
    pub fn decode(&self, text: &str) -> Result<Vec<Segment>, ParseError> {
        let text = strip_framing(text);
        if !text.starts_with(HEADER_SEGMENT) {
            return Err(ParseError::MissingHeader {
                expected: HEADER_SEGMENT,
                message_contents: text.to_string(),
            });
        }

        let mut segments = Vec::new();
        let mut delimiters = Delimiters::default();
        for (index, line) in text.split(SEGMENT_TERMINATOR).enumerate() {
            if line.is_empty() {
                continue;
            }
            let segment = Segment::parse(line, delimiters, Arc::clone(&self.config)).map_err(
                |source| ParseError::Segment {
                    line: index + 1,
                    line_contents: line.to_string(),
                    message_contents: text.to_string(),
                    source,
                },
            )?;
            if segment.is_header() {
                delimiters = *segment.delimiters();
            }
            segments.push(segment);
        }

        debug!(segments = segments.len(), "split message into segments");
        Ok(segments)
    }
}
