/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Core types for HL7 v2 message handling.
//!
//! This module provides fundamental types used throughout IronHL7:
//! - [`Version`]: The supported HL7 v2 revisions
//! - [`SegmentType`]: Three-character segment identifier (e.g., `MSH`, `PID`)
//! - [`Delimiters`]: Field separator and encoding characters declared by the header

use crate::error::{ArgumentError, SegmentError};
use arrayvec::ArrayString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Segment terminator (carriage return).
pub const SEGMENT_TERMINATOR: char = '\r';

/// Type code of the mandatory first segment.
pub const HEADER_SEGMENT: &str = "MSH";

/// Field separator assumed when the header does not declare one.
pub const DEFAULT_FIELD_SEPARATOR: u8 = b'|';

/// Length of every segment type code.
pub const SEGMENT_TYPE_LEN: usize = 3;

/// Supported HL7 v2 revisions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Version {
    /// HL7 2.1
    #[serde(rename = "2.1")]
    V2_1,
    /// HL7 2.2
    #[serde(rename = "2.2")]
    V2_2,
    /// HL7 2.3
    #[serde(rename = "2.3")]
    V2_3,
    /// HL7 2.3.1
    #[serde(rename = "2.3.1")]
    V2_3_1,
    /// HL7 2.4
    #[serde(rename = "2.4")]
    V2_4,
    /// HL7 2.5
    #[default]
    #[serde(rename = "2.5")]
    V2_5,
    /// HL7 2.5.1
    #[serde(rename = "2.5.1")]
    V2_5_1,
    /// HL7 2.6
    #[serde(rename = "2.6")]
    V2_6,
    /// HL7 2.7
    #[serde(rename = "2.7")]
    V2_7,
    /// HL7 2.7.1
    #[serde(rename = "2.7.1")]
    V2_7_1,
    /// HL7 2.8
    #[serde(rename = "2.8")]
    V2_8,
    /// HL7 2.8.1
    #[serde(rename = "2.8.1")]
    V2_8_1,
    /// HL7 2.8.2
    #[serde(rename = "2.8.2")]
    V2_8_2,
}

impl Version {
    /// Every supported revision, oldest first.
    pub const ALL: [Self; 13] = [
        Self::V2_1,
        Self::V2_2,
        Self::V2_3,
        Self::V2_3_1,
        Self::V2_4,
        Self::V2_5,
        Self::V2_5_1,
        Self::V2_6,
        Self::V2_7,
        Self::V2_7_1,
        Self::V2_8,
        Self::V2_8_1,
        Self::V2_8_2,
    ];

    /// Returns the version identifier as written in MSH-12.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V2_1 => "2.1",
            Self::V2_2 => "2.2",
            Self::V2_3 => "2.3",
            Self::V2_3_1 => "2.3.1",
            Self::V2_4 => "2.4",
            Self::V2_5 => "2.5",
            Self::V2_5_1 => "2.5.1",
            Self::V2_6 => "2.6",
            Self::V2_7 => "2.7",
            Self::V2_7_1 => "2.7.1",
            Self::V2_8 => "2.8",
            Self::V2_8_1 => "2.8.1",
            Self::V2_8_2 => "2.8.2",
        }
    }

    /// Resolves an optional version string.
    ///
    /// An empty value selects the default version.
    ///
    /// # Errors
    /// Returns `ArgumentError::UnsupportedVersion` for unrecognized values.
    pub fn resolve(value: &str) -> Result<Self, ArgumentError> {
        if value.is_empty() {
            return Ok(Self::default());
        }
        value.parse()
    }
}

impl FromStr for Version {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ArgumentError::UnsupportedVersion(s.to_string()))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three-character segment type code.
///
/// The first character is an uppercase letter, the rest uppercase letters
/// or digits. Types starting with `Z` are site-defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SegmentType(ArrayString<SEGMENT_TYPE_LEN>);

impl SegmentType {
    /// Creates a segment type after validating its shape.
    ///
    /// # Errors
    /// Returns `SegmentError::InvalidSegmentType` if `value` is not a valid code.
    pub fn new(value: &str) -> Result<Self, SegmentError> {
        let bytes = value.as_bytes();
        let valid = bytes.len() == SEGMENT_TYPE_LEN
            && bytes[0].is_ascii_uppercase()
            && bytes[1..]
                .iter()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
        if !valid {
            return Err(SegmentError::InvalidSegmentType(value.to_string()));
        }
        ArrayString::from(value)
            .map(Self)
            .map_err(|_| SegmentError::InvalidSegmentType(value.to_string()))
    }

    /// Returns the header segment type (`MSH`).
    #[must_use]
    pub fn header() -> Self {
        let mut code = ArrayString::new();
        code.push_str(HEADER_SEGMENT);
        Self(code)
    }

    /// Returns the type code as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns true for the header segment.
    #[inline]
    #[must_use]
    pub fn is_header(&self) -> bool {
        self.0.as_str() == HEADER_SEGMENT
    }

    /// Returns true for site-defined `Z` segments.
    #[inline]
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.0.starts_with('Z')
    }
}

impl FromStr for SegmentType {
    type Err = SegmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SegmentType {
    type Error = SegmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<SegmentType> for String {
    fn from(ty: SegmentType) -> Self {
        ty.as_str().to_string()
    }
}

impl PartialEq<str> for SegmentType {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for SegmentType {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delimiters declared by a message header in MSH-1 and MSH-2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Delimiters {
    /// Field separator (MSH-1).
    pub field: char,
    /// Component separator.
    pub component: char,
    /// Repetition separator.
    pub repetition: char,
    /// Escape character.
    pub escape: char,
    /// Subcomponent separator.
    pub subcomponent: char,
    /// Truncation character (2.7 and later).
    pub truncation: Option<char>,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            field: '|',
            component: '^',
            repetition: '~',
            escape: '\\',
            subcomponent: '&',
            truncation: None,
        }
    }
}

impl Delimiters {
    /// Reads the delimiters from a header line such as `MSH|^~\&|...`.
    ///
    /// # Errors
    /// Returns `SegmentError::MissingEncodingCharacters` if the line is too short,
    /// or `SegmentError::InvalidEncodingCharacters` if the characters are
    /// alphanumeric, repeated, or not four or five in number.
    pub fn from_header(line: &str) -> Result<Self, SegmentError> {
        let rest = line
            .get(SEGMENT_TYPE_LEN..)
            .ok_or(SegmentError::MissingEncodingCharacters)?;
        let mut chars = rest.chars();
        let field = chars.next().ok_or(SegmentError::MissingEncodingCharacters)?;
        let encoding: String = chars.take_while(|&c| c != field).collect();
        if encoding.is_empty() {
            return Err(SegmentError::MissingEncodingCharacters);
        }

        let invalid = || SegmentError::InvalidEncodingCharacters(encoding.clone());
        let declared: Vec<char> = encoding.chars().collect();
        if !(4..=5).contains(&declared.len()) {
            return Err(invalid());
        }
        let mut seen = vec![field];
        for &c in &declared {
            if c.is_ascii_alphanumeric() || c == SEGMENT_TERMINATOR || seen.contains(&c) {
                return Err(invalid());
            }
            seen.push(c);
        }
        if field.is_ascii_alphanumeric() || field == SEGMENT_TERMINATOR {
            return Err(invalid());
        }

        Ok(Self {
            field,
            component: declared[0],
            repetition: declared[1],
            escape: declared[2],
            subcomponent: declared[3],
            truncation: declared.get(4).copied(),
        })
    }

    /// Returns the MSH-2 encoding characters.
    #[must_use]
    pub fn encoding_characters(&self) -> String {
        let mut out = String::with_capacity(5);
        out.push(self.component);
        out.push(self.repetition);
        out.push(self.escape);
        out.push(self.subcomponent);
        if let Some(t) = self.truncation {
            out.push(t);
        }
        out
    }
}
