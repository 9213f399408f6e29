/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! HL7 segment.
//!
//! A segment keeps the raw text of each field, so rendering a parsed segment
//! reproduces its line byte for byte. Repetitions, components and escape
//! sequences are interpreted on access.
//!
//! Field positions are 1-based as in the HL7 standard. For the header segment
//! MSH-1 is the field separator itself and MSH-2 the encoding characters.

use crate::config::MessageConfig;
use crate::escape::{escape, unescape};
use ironhl7_core::error::SegmentError;
use ironhl7_core::types::{Delimiters, HEADER_SEGMENT, SegmentType, Version};
use ironhl7_dictionary::builtin::{header_segment, msh};
use ironhl7_dictionary::SegmentDef;
use smallvec::SmallVec;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Built-in MSH layout used for name lookups when no dictionary is configured.
static HEADER_DEF: LazyLock<SegmentDef> = LazyLock::new(|| header_segment(Version::default()));

/// One line of an HL7 message.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Segment type code.
    segment_type: SegmentType,
    /// Raw field text; index 0 holds field 1.
    fields: SmallVec<[String; 16]>,
    /// Delimiters used to read and write this segment.
    delimiters: Delimiters,
    /// Configuration inherited from the owning message.
    config: Arc<MessageConfig>,
}

impl Segment {
    /// Creates an empty segment.
    ///
    /// A header segment starts with MSH-1 and MSH-2 filled from `delimiters`.
    #[must_use]
    pub fn new(
        segment_type: SegmentType,
        delimiters: Delimiters,
        config: Arc<MessageConfig>,
    ) -> Self {
        let mut fields = SmallVec::new();
        if segment_type.is_header() {
            fields.push(delimiters.field.to_string());
            fields.push(delimiters.encoding_characters());
        }
        Self {
            segment_type,
            fields,
            delimiters,
            config,
        }
    }

    /// Assembles a segment from already-formatted raw fields.
    pub(crate) fn from_parts(
        segment_type: SegmentType,
        fields: SmallVec<[String; 16]>,
        delimiters: Delimiters,
        config: Arc<MessageConfig>,
    ) -> Self {
        Self {
            segment_type,
            fields,
            delimiters,
            config,
        }
    }

    /// Parses one line into a segment.
    ///
    /// A line starting with `MSH` declares its own delimiters; any other line
    /// is read with `delimiters`, normally taken from the message header.
    ///
    /// # Arguments
    /// * `line` - The segment text without its terminator
    /// * `delimiters` - Delimiters in effect for non-header segments
    /// * `config` - Configuration inherited from the owning message
    ///
    /// # Errors
    /// Returns `SegmentError` if the type code or header encoding characters are
    /// malformed, or if a configured dictionary rejects the segment and
    /// `ignore_parsing_errors` is off.
    pub fn parse(
        line: &str,
        delimiters: Delimiters,
        config: Arc<MessageConfig>,
    ) -> Result<Self, SegmentError> {
        let is_header = line.starts_with(HEADER_SEGMENT);
        let delimiters = if is_header {
            Delimiters::from_header(line)?
        } else {
            delimiters
        };

        let mut parts = line.split(delimiters.field);
        let segment_type = SegmentType::new(parts.next().unwrap_or_default())?;

        let mut fields: SmallVec<[String; 16]> = SmallVec::new();
        if is_header {
            fields.push(delimiters.field.to_string());
        }
        fields.extend(parts.map(str::to_string));

        let segment = Self {
            segment_type,
            fields,
            delimiters,
            config,
        };
        segment.validate()?;
        Ok(segment)
    }

    /// Checks the segment against the configured dictionary.
    fn validate(&self) -> Result<(), SegmentError> {
        let Some(dict) = self.config.dictionary() else {
            return Ok(());
        };
        if self.config.ignore_parsing_errors {
            return Ok(());
        }

        let Some(def) = dict.get_segment(self.segment_type.as_str()) else {
            if self.segment_type.is_header() || self.segment_type.is_custom() {
                return Ok(());
            }
            return Err(SegmentError::UnknownSegment {
                segment: self.segment_type.to_string(),
                version: dict.version.to_string(),
            });
        };

        for field in &def.fields {
            let (Some(max_length), Some(value)) = (field.max_length, self.field(field.position))
            else {
                continue;
            };
            let length = value.chars().count();
            if length > max_length {
                return Err(SegmentError::FieldTooLong {
                    segment: self.segment_type.to_string(),
                    position: field.position,
                    length,
                    max_length,
                });
            }
        }
        Ok(())
    }

    /// Returns the segment type.
    #[inline]
    #[must_use]
    pub fn segment_type(&self) -> SegmentType {
        self.segment_type
    }

    /// Returns true for the header segment.
    #[inline]
    #[must_use]
    pub fn is_header(&self) -> bool {
        self.segment_type.is_header()
    }

    /// Returns the delimiters this segment is written with.
    #[inline]
    #[must_use]
    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// Returns the configuration inherited from the owning message.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MessageConfig {
        &self.config
    }

    /// Returns the shared configuration handle.
    #[inline]
    #[must_use]
    pub fn shared_config(&self) -> &Arc<MessageConfig> {
        &self.config
    }

    /// Returns the number of fields present, counting empty ones.
    #[inline]
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Returns an iterator over the raw field values, starting at field 1.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Gets the raw text of a field.
    ///
    /// # Arguments
    /// * `position` - The 1-based field position
    #[must_use]
    pub fn field(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|i| self.fields.get(i))
            .map(String::as_str)
    }

    /// Gets a field with escape sequences decoded.
    #[must_use]
    pub fn decoded_field(&self, position: usize) -> Option<String> {
        self.field(position)
            .map(|raw| unescape(raw, &self.delimiters).into_owned())
    }

    /// Splits a field into its repetitions.
    ///
    /// MSH-1 and MSH-2 are never split.
    #[must_use]
    pub fn repetitions(&self, position: usize) -> Vec<&str> {
        match self.field(position) {
            Some(raw) if self.is_delimiter_field(position) => vec![raw],
            Some(raw) => raw.split(self.delimiters.repetition).collect(),
            None => Vec::new(),
        }
    }

    /// Splits the first repetition of a field into components.
    #[must_use]
    pub fn components(&self, position: usize) -> Vec<&str> {
        let Some(first) = self.repetitions(position).into_iter().next() else {
            return Vec::new();
        };
        if self.is_delimiter_field(position) {
            return vec![first];
        }
        first.split(self.delimiters.component).collect()
    }

    /// Gets one component of a field.
    ///
    /// # Arguments
    /// * `position` - The 1-based field position
    /// * `component` - The 1-based component position
    #[must_use]
    pub fn component(&self, position: usize, component: usize) -> Option<&str> {
        let index = component.checked_sub(1)?;
        self.components(position).get(index).copied()
    }

    /// Gets a field by its dictionary name.
    ///
    /// The configured dictionary is consulted first. The header segment falls
    /// back to the built-in MSH layout.
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&str> {
        let from_dict = self
            .config
            .dictionary()
            .and_then(|d| d.get_field_by_name(self.segment_type.as_str(), name));
        let def = match from_dict {
            Some(def) => def,
            None if self.is_header() => HEADER_DEF.field_by_name(name)?,
            None => return None,
        };
        self.field(def.position)
    }

    /// Sets a field, escaping delimiters when `encode_hl7_data_types` is enabled.
    ///
    /// Missing fields up to `position` are created empty.
    ///
    /// # Errors
    /// Returns `SegmentError::FieldIndexOutOfRange` for position 0 and for MSH-1/MSH-2.
    pub fn set_field(&mut self, position: usize, value: &str) -> Result<(), SegmentError> {
        if self.config.encode_hl7_data_types {
            let escaped = escape(value, &self.delimiters).into_owned();
            self.set_field_raw(position, escaped)
        } else {
            self.set_field_raw(position, value)
        }
    }

    /// Sets a field verbatim, without escaping.
    ///
    /// # Errors
    /// Returns `SegmentError::FieldIndexOutOfRange` for position 0 and for MSH-1/MSH-2.
    pub fn set_field_raw(
        &mut self,
        position: usize,
        value: impl Into<String>,
    ) -> Result<(), SegmentError> {
        if position == 0 || self.is_delimiter_field(position) {
            return Err(SegmentError::FieldIndexOutOfRange {
                segment: self.segment_type.to_string(),
                index: position,
            });
        }
        if self.fields.len() < position {
            self.fields.resize(position, String::new());
        }
        self.fields[position - 1] = value.into();
        Ok(())
    }

    /// Returns the version identifier (MSH-12, first component) of a header segment.
    #[must_use]
    pub fn version_id(&self) -> Option<&str> {
        if !self.is_header() {
            return None;
        }
        self.component(msh::VERSION_ID, 1)
    }

    /// Sets the version identifier of a header segment.
    ///
    /// Components after the first (country, international version) are kept.
    ///
    /// # Errors
    /// Returns `SegmentError::FieldIndexOutOfRange` if this is not a header segment.
    pub fn set_version_id(&mut self, version: Version) -> Result<(), SegmentError> {
        if !self.is_header() {
            return Err(SegmentError::FieldIndexOutOfRange {
                segment: self.segment_type.to_string(),
                index: msh::VERSION_ID,
            });
        }
        self.write_version_id(version);
        Ok(())
    }

    /// Writes MSH-12 on a segment already known to be a header.
    pub(crate) fn write_version_id(&mut self, version: Version) {
        let value = self.version_field_with(version);
        if self.fields.len() < msh::VERSION_ID {
            self.fields.resize(msh::VERSION_ID, String::new());
        }
        self.fields[msh::VERSION_ID - 1] = value;
    }

    /// Returns the declared character set (MSH-18) of a header segment.
    #[must_use]
    pub fn character_set(&self) -> Option<&str> {
        if !self.is_header() {
            return None;
        }
        self.field(msh::CHARACTER_SET).filter(|v| !v.is_empty())
    }

    /// Renders the segment as one line, without a terminator.
    #[must_use]
    pub fn to_hl7(&self) -> String {
        let mut out = String::with_capacity(self.encoded_len());
        self.write_to(&mut out, None);
        out
    }

    /// Appends the segment text to `out`.
    ///
    /// For a header segment, `version` replaces the version identifier in the
    /// rendered text without touching the stored field.
    pub(crate) fn write_to(&self, out: &mut String, version: Option<Version>) {
        out.push_str(self.segment_type.as_str());
        let version_value = version
            .filter(|_| self.is_header())
            .map(|v| self.version_field_with(v));

        for (i, value) in self.fields.iter().enumerate() {
            let position = i + 1;
            // MSH-1 is the separator itself; MSH-2 follows it directly.
            if !self.is_delimiter_field(position) {
                out.push(self.delimiters.field);
            }
            match &version_value {
                Some(v) if position == msh::VERSION_ID => out.push_str(v),
                _ => out.push_str(value),
            }
        }

        if let Some(v) = version_value {
            for _ in self.fields.len()..msh::VERSION_ID {
                out.push(self.delimiters.field);
            }
            if self.fields.len() < msh::VERSION_ID {
                out.push_str(&v);
            }
        }
    }

    /// Returns an estimate of the rendered length.
    pub(crate) fn encoded_len(&self) -> usize {
        self.segment_type.as_str().len() + self.fields.iter().map(|f| f.len() + 1).sum::<usize>()
    }

    fn is_delimiter_field(&self, position: usize) -> bool {
        self.is_header()
            && (position == msh::FIELD_SEPARATOR || position == msh::ENCODING_CHARACTERS)
    }

    /// Builds the MSH-12 text with `version` as its first component.
    fn version_field_with(&self, version: Version) -> String {
        let current = self.field(msh::VERSION_ID).unwrap_or_default();
        match current.find(self.delimiters.component) {
            Some(pos) => format!("{}{}", version.as_str(), &current[pos..]),
            None => version.as_str().to_string(),
        }
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.segment_type == other.segment_type
            && self.fields == other.fields
            && self.delimiters == other.delimiters
    }
}

impl Eq for Segment {}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hl7())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironhl7_dictionary::{DataType, Dictionary, FieldDef};

    const MSH: &str = "MSH|^~\\&|SEND|FAC|RECV|RFAC|20240101120000||ADT^A01|MSG0001|P|2.3^USA";

    fn config() -> Arc<MessageConfig> {
        Arc::new(MessageConfig::new())
    }

    fn parse(line: &str) -> Segment {
        Segment::parse(line, Delimiters::default(), config()).unwrap()
    }

    fn strict_dict() -> Arc<Dictionary> {
        let mut dict = Dictionary::new(Version::V2_5);
        dict.add_segment(
            SegmentDef::new("PID", "Patient Identification")
                .with_field(FieldDef::new(1, "Set ID", DataType::Si).with_max_length(4))
                .with_field(FieldDef::new(3, "Patient Identifier List", DataType::Cx)),
        );
        Arc::new(dict)
    }

    #[test]
    fn test_parse_header_fields() {
        let seg = parse(MSH);
        assert!(seg.is_header());
        assert_eq!(seg.field(1), Some("|"));
        assert_eq!(seg.field(2), Some("^~\\&"));
        assert_eq!(seg.field(3), Some("SEND"));
        assert_eq!(seg.field(9), Some("ADT^A01"));
        assert_eq!(seg.field_count(), 12);
        assert_eq!(seg.field(13), None);
        assert_eq!(seg.field(0), None);
    }

    #[test]
    fn test_round_trip_is_byte_exact() {
        for line in [
            MSH,
            "PID|1||123^^^HOSP^MR~456^^^OTHER||DOE^JOHN",
            "PID",
            "PID|",
            "NTE|1||trailing|||",
        ] {
            assert_eq!(parse(line).to_hl7(), line);
        }
    }

    #[test]
    fn test_components_and_repetitions() {
        let seg = parse("PID|1||123^^^HOSP^MR~456^^^OTHER||DOE^JOHN^Q");
        assert_eq!(seg.repetitions(3), vec!["123^^^HOSP^MR", "456^^^OTHER"]);
        assert_eq!(seg.components(5), vec!["DOE", "JOHN", "Q"]);
        assert_eq!(seg.component(5, 2), Some("JOHN"));
        assert_eq!(seg.component(5, 4), None);
        assert_eq!(seg.component(3, 4), Some("HOSP"));
        assert!(seg.repetitions(30).is_empty());
    }

    #[test]
    fn test_header_delimiter_fields_are_not_split() {
        let seg = parse(MSH);
        assert_eq!(seg.components(2), vec!["^~\\&"]);
        assert_eq!(seg.repetitions(2), vec!["^~\\&"]);
    }

    #[test]
    fn test_custom_delimiters_flow_from_header() {
        let header = parse("MSH#$*!%#APP");
        let seg = Segment::parse("PID#1##A$B", *header.delimiters(), config()).unwrap();
        assert_eq!(seg.component(3, 2), Some("B"));
        assert_eq!(header.to_hl7(), "MSH#$*!%#APP");
    }

    #[test]
    fn test_invalid_segment_type() {
        let err = Segment::parse("P1|x", Delimiters::default(), config()).unwrap_err();
        assert_eq!(err, SegmentError::InvalidSegmentType("P1".to_string()));
    }

    #[test]
    fn test_header_without_encoding_characters() {
        let err = Segment::parse("MSH", Delimiters::default(), config()).unwrap_err();
        assert_eq!(err, SegmentError::MissingEncodingCharacters);
    }

    #[test]
    fn test_decoded_field() {
        let seg = parse("NTE|1||Result \\T\\ notes\\F\\more");
        assert_eq!(seg.decoded_field(3).as_deref(), Some("Result & notes|more"));
        assert_eq!(seg.field(3), Some("Result \\T\\ notes\\F\\more"));
    }

    #[test]
    fn test_set_field_extends_and_respects_encoding_flag() {
        let mut seg = Segment::new(SegmentType::new("NTE").unwrap(), Delimiters::default(), config());
        seg.set_field(3, "a^b").unwrap();
        assert_eq!(seg.to_hl7(), "NTE|||a^b");

        let encoding = Arc::new(MessageConfig::new().with_encode_hl7_data_types(true));
        let mut seg = Segment::new(SegmentType::new("NTE").unwrap(), Delimiters::default(), encoding);
        seg.set_field(1, "a^b|c").unwrap();
        assert_eq!(seg.to_hl7(), "NTE|a\\S\\b\\F\\c");
        assert_eq!(seg.decoded_field(1).as_deref(), Some("a^b|c"));
    }

    #[test]
    fn test_set_field_rejects_delimiter_positions() {
        let mut seg = parse(MSH);
        assert!(matches!(
            seg.set_field(1, "#"),
            Err(SegmentError::FieldIndexOutOfRange { index: 1, .. })
        ));
        assert!(seg.set_field(2, "^~").is_err());
        assert!(seg.set_field(0, "x").is_err());
    }

    #[test]
    fn test_version_id_keeps_other_components() {
        let mut seg = parse(MSH);
        assert_eq!(seg.version_id(), Some("2.3"));
        seg.set_version_id(Version::V2_5_1).unwrap();
        assert_eq!(seg.field(12), Some("2.5.1^USA"));
        assert_eq!(seg.version_id(), Some("2.5.1"));
    }

    #[test]
    fn test_set_version_id_on_short_header() {
        let mut seg = parse("MSH|^~\\&|APP");
        assert_eq!(seg.version_id(), None);
        seg.set_version_id(Version::V2_4).unwrap();
        assert_eq!(seg.to_hl7(), "MSH|^~\\&|APP|||||||||2.4");
    }

    #[test]
    fn test_write_version_id_pads_short_header() {
        let mut seg = parse("MSH|^~\\&");
        seg.write_version_id(Version::V2_7);
        assert_eq!(seg.field_count(), 12);
        assert_eq!(seg.version_id(), Some("2.7"));
        assert_eq!(seg.to_hl7(), "MSH|^~\\&||||||||||2.7");
    }

    #[test]
    fn test_set_version_id_requires_header() {
        let mut seg = parse("PID|1");
        assert!(seg.set_version_id(Version::V2_5).is_err());
        assert_eq!(seg.version_id(), None);
    }

    #[test]
    fn test_render_with_version_override() {
        let seg = parse(MSH);
        let mut out = String::new();
        seg.write_to(&mut out, Some(Version::V2_6));
        assert!(out.ends_with("|P|2.6^USA"));
        assert_eq!(seg.version_id(), Some("2.3"));

        let short = parse("MSH|^~\\&|APP");
        let mut out = String::new();
        short.write_to(&mut out, Some(Version::V2_6));
        assert_eq!(out, "MSH|^~\\&|APP|||||||||2.6");
    }

    #[test]
    fn test_character_set() {
        let seg = parse("MSH|^~\\&||||||||||||||||8859/1");
        assert_eq!(seg.character_set(), Some("8859/1"));
        assert_eq!(parse(MSH).character_set(), None);
    }

    #[test]
    fn test_field_by_name() {
        let seg = parse(MSH);
        assert_eq!(seg.field_by_name("Message Control ID"), Some("MSG0001"));
        assert_eq!(seg.field_by_name("No Such Field"), None);

        let dict_config = Arc::new(MessageConfig::new().with_custom_dict(strict_dict()));
        let pid = Segment::parse("PID|1||123", Delimiters::default(), dict_config).unwrap();
        assert_eq!(pid.field_by_name("patient identifier list"), Some("123"));
        assert_eq!(parse("PID|1||123").field_by_name("Set ID"), None);
    }

    #[test]
    fn test_dictionary_rejects_unknown_segment() {
        let strict = Arc::new(MessageConfig::new().with_custom_dict(strict_dict()));
        let err = Segment::parse("OBX|1", Delimiters::default(), Arc::clone(&strict)).unwrap_err();
        assert_eq!(
            err,
            SegmentError::UnknownSegment {
                segment: "OBX".to_string(),
                version: "2.5".to_string(),
            }
        );
        assert!(Segment::parse("ZXT|1", Delimiters::default(), Arc::clone(&strict)).is_ok());
        assert!(Segment::parse(MSH, Delimiters::default(), strict).is_ok());
    }

    #[test]
    fn test_dictionary_rejects_long_field() {
        let strict = Arc::new(MessageConfig::new().with_custom_dict(strict_dict()));
        let err = Segment::parse("PID|12345", Delimiters::default(), strict).unwrap_err();
        assert!(matches!(
            err,
            SegmentError::FieldTooLong {
                position: 1,
                length: 5,
                max_length: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_ignore_parsing_errors_skips_dictionary_checks() {
        let lenient = Arc::new(
            MessageConfig::new()
                .with_custom_dict(strict_dict())
                .with_ignore_parsing_errors(true),
        );
        assert!(Segment::parse("OBX|1", Delimiters::default(), Arc::clone(&lenient)).is_ok());
        assert!(Segment::parse("PID|12345", Delimiters::default(), lenient).is_ok());
    }

    #[test]
    fn test_equality_ignores_config() {
        let a = parse("PID|1");
        let b = Segment::parse(
            "PID|1",
            Delimiters::default(),
            Arc::new(MessageConfig::new().with_ignore_parsing_errors(true)),
        )
        .unwrap();
        assert_eq!(a, b);
    }
}
