/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema definitions for HL7 v2 dictionaries.
//!
//! This module defines the structures that describe an HL7 version's segments:
//! - [`DataType`]: HL7 data type codes (ST, NM, CWE, ...)
//! - [`FieldDef`]: Field definitions with position, name and type
//! - [`SegmentDef`]: Ordered field definitions for one segment type
//! - [`Dictionary`]: Complete set of segment definitions for a version

use ironhl7_core::types::Version;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while loading or saving a dictionary.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The JSON document could not be read or written.
    #[error("invalid dictionary json: {0}")]
    Json(#[from] serde_json::Error),
}

/// HL7 v2 data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    /// String data.
    St,
    /// Text data.
    Tx,
    /// Formatted text.
    Ft,
    /// Numeric.
    Nm,
    /// Sequence ID.
    Si,
    /// Coded value for HL7-defined tables.
    Id,
    /// Coded value for user-defined tables.
    Is,
    /// Date.
    Dt,
    /// Time.
    Tm,
    /// Date/time.
    Dtm,
    /// Time stamp (pre-2.6 composite of DTM).
    Ts,
    /// Coded element.
    Ce,
    /// Coded with exceptions.
    Cwe,
    /// Coded with no exceptions.
    Cne,
    /// Extended composite ID with check digit.
    Cx,
    /// Extended person name.
    Xpn,
    /// Extended address.
    Xad,
    /// Extended telecommunication number.
    Xtn,
    /// Hierarchic designator.
    Hd,
    /// Entity identifier.
    Ei,
    /// Message type.
    Msg,
    /// Processing type.
    Pt,
    /// Version identifier.
    Vid,
    /// Variable data type, resolved by another field.
    Varies,
}

impl std::str::FromStr for DataType {
    type Err = std::convert::Infallible;

    /// Creates a DataType from its HL7 code.
    ///
    /// Unknown codes fall back to `St`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_uppercase().as_str() {
            "TX" => Self::Tx,
            "FT" => Self::Ft,
            "NM" => Self::Nm,
            "SI" => Self::Si,
            "ID" => Self::Id,
            "IS" => Self::Is,
            "DT" => Self::Dt,
            "TM" => Self::Tm,
            "DTM" => Self::Dtm,
            "TS" => Self::Ts,
            "CE" => Self::Ce,
            "CWE" => Self::Cwe,
            "CNE" => Self::Cne,
            "CX" => Self::Cx,
            "XPN" => Self::Xpn,
            "XAD" => Self::Xad,
            "XTN" => Self::Xtn,
            "HD" => Self::Hd,
            "EI" => Self::Ei,
            "MSG" => Self::Msg,
            "PT" => Self::Pt,
            "VID" => Self::Vid,
            "VARIES" => Self::Varies,
            _ => Self::St,
        })
    }
}

/// Definition of one field within a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// 1-based field position.
    pub position: usize,
    /// Field name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
    /// Whether the field may repeat.
    #[serde(default)]
    pub repeatable: bool,
    /// Maximum length in characters.
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Field description.
    #[serde(default)]
    pub description: Option<String>,
}

impl FieldDef {
    /// Creates a new field definition.
    ///
    /// # Arguments
    /// * `position` - The 1-based field position
    /// * `name` - The field name
    /// * `data_type` - The field data type
    #[must_use]
    pub fn new(position: usize, name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            position,
            name: name.into(),
            data_type,
            repeatable: false,
            max_length: None,
            description: None,
        }
    }

    /// Marks the field as repeatable.
    #[must_use]
    pub const fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// Sets the maximum length.
    #[must_use]
    pub const fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }
}

/// Definition of a segment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDef {
    /// Three-character segment type code.
    pub segment_type: String,
    /// Segment name.
    pub name: String,
    /// Field definitions ordered by position.
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl SegmentDef {
    /// Creates a segment definition with no fields.
    #[must_use]
    pub fn new(segment_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            segment_type: segment_type.into(),
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field definition.
    #[must_use]
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Gets a field definition by 1-based position.
    #[must_use]
    pub fn field(&self, position: usize) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.position == position)
    }

    /// Gets a field definition by name, ignoring ASCII case.
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }
}

/// Complete HL7 dictionary for a specific version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    /// HL7 version.
    pub version: Version,
    /// Segment definitions indexed by type code.
    #[serde(default)]
    pub segments: HashMap<String, SegmentDef>,
}

impl Dictionary {
    /// Creates a new empty dictionary for the specified version.
    ///
    /// # Arguments
    /// * `version` - The HL7 version
    #[must_use]
    pub fn new(version: Version) -> Self {
        Self {
            version,
            segments: HashMap::new(),
        }
    }

    /// Loads a dictionary from a JSON document.
    ///
    /// # Errors
    /// Returns `DictionaryError::Json` if the document does not describe a dictionary.
    pub fn from_json(json: &str) -> Result<Self, DictionaryError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the dictionary to pretty-printed JSON.
    ///
    /// # Errors
    /// Returns `DictionaryError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, DictionaryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Adds a segment definition, replacing any previous one for the same type.
    pub fn add_segment(&mut self, segment: SegmentDef) {
        self.segments.insert(segment.segment_type.clone(), segment);
    }

    /// Gets a segment definition by type code.
    #[must_use]
    pub fn get_segment(&self, segment_type: &str) -> Option<&SegmentDef> {
        self.segments.get(segment_type)
    }

    /// Returns true if the dictionary defines the segment type.
    #[must_use]
    pub fn contains_segment(&self, segment_type: &str) -> bool {
        self.segments.contains_key(segment_type)
    }

    /// Gets a field definition by segment type and field name.
    #[must_use]
    pub fn get_field_by_name(&self, segment_type: &str, name: &str) -> Option<&FieldDef> {
        self.get_segment(segment_type)
            .and_then(|s| s.field_by_name(name))
    }

    /// Returns an iterator over all segment definitions.
    pub fn segments(&self) -> impl Iterator<Item = &SegmentDef> {
        self.segments.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid() -> SegmentDef {
        SegmentDef::new("PID", "Patient Identification")
            .with_field(FieldDef::new(1, "Set ID", DataType::Si))
            .with_field(FieldDef::new(3, "Patient Identifier List", DataType::Cx).repeatable())
            .with_field(FieldDef::new(5, "Patient Name", DataType::Xpn).with_max_length(250))
    }

    #[test]
    fn test_data_type_from_str() {
        assert_eq!("NM".parse::<DataType>().unwrap(), DataType::Nm);
        assert_eq!("cwe".parse::<DataType>().unwrap(), DataType::Cwe);
        assert_eq!("unknown".parse::<DataType>().unwrap(), DataType::St);
    }

    #[test]
    fn test_segment_def_lookup() {
        let seg = pid();
        assert_eq!(seg.field(3).unwrap().name, "Patient Identifier List");
        assert!(seg.field(3).unwrap().repeatable);
        assert_eq!(seg.field_by_name("patient name").unwrap().position, 5);
        assert!(seg.field(2).is_none());
    }

    #[test]
    fn test_dictionary_segment_operations() {
        let mut dict = Dictionary::new(Version::V2_5);
        dict.add_segment(pid());

        assert!(dict.contains_segment("PID"));
        assert!(dict.get_segment("OBX").is_none());
        assert_eq!(
            dict.get_field_by_name("PID", "Set ID").unwrap().data_type,
            DataType::Si
        );
    }

    #[test]
    fn test_dictionary_json() {
        let json = r#"{
            "version": "2.4",
            "segments": {
                "ZPI": {
                    "segment_type": "ZPI",
                    "name": "Site Patient Info",
                    "fields": [
                        { "position": 1, "name": "Badge", "data_type": "ST", "max_length": 8 }
                    ]
                }
            }
        }"#;
        let dict = Dictionary::from_json(json).unwrap();
        assert_eq!(dict.version, Version::V2_4);
        let field = dict.get_segment("ZPI").unwrap().field(1).unwrap();
        assert_eq!(field.max_length, Some(8));
        assert!(!field.repeatable);

        let again = Dictionary::from_json(&dict.to_json().unwrap()).unwrap();
        assert_eq!(again, dict);
    }

    #[test]
    fn test_dictionary_json_invalid() {
        assert!(matches!(
            Dictionary::from_json("{\"version\": \"9.9\"}"),
            Err(DictionaryError::Json(_))
        ));
    }
}
