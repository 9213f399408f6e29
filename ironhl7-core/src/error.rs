/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Error types for the IronHL7 codec.
//!
//! This module provides a unified error hierarchy using `thiserror` for typed,
//! domain-specific errors across all IronHL7 operations.

use thiserror::Error;

/// Result type alias using [`Hl7Error`] as the error type.
pub type Result<T> = std::result::Result<T, Hl7Error>;

/// Top-level error type for all IronHL7 operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Hl7Error {
    /// A bad value was handed to a constructor, setter or parse call.
    #[error("argument error: {0}")]
    Argument(#[from] ArgumentError),

    /// Message parsing failed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A segment operation outside of message parsing failed.
    #[error("segment error: {0}")]
    Segment(#[from] SegmentError),
}

impl Hl7Error {
    /// Returns the parse error, if this is one.
    #[must_use]
    pub fn as_parse(&self) -> Option<&ParseError> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

/// Errors raised immediately for invalid input values, before any parsing work.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// The version string is not one of the supported HL7 revisions.
    #[error("unsupported hl7 version: {0:?}")]
    UnsupportedVersion(String),

    /// The caller-supplied character encoding name is not recognized.
    #[error("unsupported character encoding: {0:?}")]
    UnsupportedEncoding(String),
}

/// Errors that occur while splitting a message into segments.
///
/// Segment-level failures carry the 1-based line number, the offending line
/// and the whole message text so callers can render diagnostics without
/// re-parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The message does not begin with the header segment once framing is stripped.
    #[error("message must start with {expected} segment")]
    MissingHeader {
        /// The required header segment type.
        expected: &'static str,
        /// The decoded, framing-stripped message text.
        message_contents: String,
    },

    /// A segment rejected its line.
    #[error("line {line}: {source}")]
    Segment {
        /// 1-based line number within the message.
        line: usize,
        /// Full text of the offending line.
        line_contents: String,
        /// The decoded, framing-stripped message text.
        message_contents: String,
        /// The underlying segment error.
        #[source]
        source: SegmentError,
    },
}

impl ParseError {
    /// Returns true for structural errors (message shape, not segment content).
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::MissingHeader { .. })
    }

    /// Returns the 1-based line number of the failing segment.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::MissingHeader { .. } => None,
            Self::Segment { line, .. } => Some(*line),
        }
    }

    /// Returns the text of the failing line.
    #[must_use]
    pub fn line_contents(&self) -> Option<&str> {
        match self {
            Self::MissingHeader { .. } => None,
            Self::Segment { line_contents, .. } => Some(line_contents),
        }
    }

    /// Returns the full message text the error was raised against.
    #[must_use]
    pub fn message_contents(&self) -> &str {
        match self {
            Self::MissingHeader {
                message_contents, ..
            }
            | Self::Segment {
                message_contents, ..
            } => message_contents,
        }
    }

    /// Returns the segment error behind a segment-level failure.
    #[must_use]
    pub const fn segment_error(&self) -> Option<&SegmentError> {
        match self {
            Self::MissingHeader { .. } => None,
            Self::Segment { source, .. } => Some(source),
        }
    }
}

/// Errors raised by a segment while parsing or editing its own structure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SegmentError {
    /// Segment type is not three uppercase alphanumeric characters.
    #[error("invalid segment type: {0:?}")]
    InvalidSegmentType(String),

    /// Header segment is too short to carry its field separator and encoding characters.
    #[error("header segment is missing its encoding characters")]
    MissingEncodingCharacters,

    /// Header encoding characters are malformed or not distinct.
    #[error("invalid encoding characters: {0:?}")]
    InvalidEncodingCharacters(String),

    /// Segment type is not defined by the dictionary in effect.
    #[error("unknown segment {segment:?} for hl7 version {version}")]
    UnknownSegment {
        /// The segment type found on the line.
        segment: String,
        /// The dictionary version.
        version: String,
    },

    /// Field value is longer than the dictionary allows.
    #[error("{segment}-{position} is {length} characters, maximum is {max_length}")]
    FieldTooLong {
        /// The segment type.
        segment: String,
        /// The 1-based field position.
        position: usize,
        /// Actual length in characters.
        length: usize,
        /// Maximum length from the dictionary.
        max_length: usize,
    },

    /// Field position cannot be addressed.
    #[error("field {index} cannot be set on segment {segment}")]
    FieldIndexOutOfRange {
        /// The segment type.
        segment: String,
        /// The 1-based field position.
        index: usize,
    },
}
