/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Header segment builder.
//!
//! This module provides a fluent builder for MSH segments. Values are stored
//! verbatim, so composite values such as `ADT^A01` keep their component
//! separators.

use crate::config::MessageConfig;
use crate::segment::Segment;
use chrono::{DateTime, Utc};
use ironhl7_core::types::{Delimiters, SegmentType, Version};
use ironhl7_dictionary::builtin::msh;
use smallvec::SmallVec;
use std::sync::Arc;

/// Timestamp layout for MSH-7.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Default processing id (MSH-11).
pub const DEFAULT_PROCESSING_ID: &str = "P";

/// Builder for MSH segments.
#[derive(Debug, Clone)]
pub struct HeaderBuilder {
    delimiters: Delimiters,
    sending_application: String,
    sending_facility: String,
    receiving_application: String,
    receiving_facility: String,
    timestamp: Option<DateTime<Utc>>,
    message_type: String,
    control_id: String,
    processing_id: String,
    version: Version,
    character_set: String,
}

impl Default for HeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderBuilder {
    /// Creates a builder with default delimiters, processing id `P` and the
    /// default version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            delimiters: Delimiters::default(),
            sending_application: String::new(),
            sending_facility: String::new(),
            receiving_application: String::new(),
            receiving_facility: String::new(),
            timestamp: None,
            message_type: String::new(),
            control_id: String::new(),
            processing_id: DEFAULT_PROCESSING_ID.to_string(),
            version: Version::default(),
            character_set: String::new(),
        }
    }

    /// Sets the delimiters declared in MSH-1 and MSH-2.
    #[must_use]
    pub const fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    /// Sets the sending application (MSH-3).
    #[must_use]
    pub fn with_sending_application(mut self, value: impl Into<String>) -> Self {
        self.sending_application = value.into();
        self
    }

    /// Sets the sending facility (MSH-4).
    #[must_use]
    pub fn with_sending_facility(mut self, value: impl Into<String>) -> Self {
        self.sending_facility = value.into();
        self
    }

    /// Sets the receiving application (MSH-5).
    #[must_use]
    pub fn with_receiving_application(mut self, value: impl Into<String>) -> Self {
        self.receiving_application = value.into();
        self
    }

    /// Sets the receiving facility (MSH-6).
    #[must_use]
    pub fn with_receiving_facility(mut self, value: impl Into<String>) -> Self {
        self.receiving_facility = value.into();
        self
    }

    /// Sets the message timestamp (MSH-7).
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Stamps the message with the current time.
    #[must_use]
    pub fn with_current_timestamp(self) -> Self {
        self.with_timestamp(Utc::now())
    }

    /// Sets the message type (MSH-9), e.g. `ADT^A01`.
    #[must_use]
    pub fn with_message_type(mut self, value: impl Into<String>) -> Self {
        self.message_type = value.into();
        self
    }

    /// Sets the message control id (MSH-10).
    #[must_use]
    pub fn with_control_id(mut self, value: impl Into<String>) -> Self {
        self.control_id = value.into();
        self
    }

    /// Sets the processing id (MSH-11).
    #[must_use]
    pub fn with_processing_id(mut self, value: impl Into<String>) -> Self {
        self.processing_id = value.into();
        self
    }

    /// Sets the version identifier (MSH-12).
    #[must_use]
    pub const fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Sets the declared character set (MSH-18).
    #[must_use]
    pub fn with_character_set(mut self, value: impl Into<String>) -> Self {
        self.character_set = value.into();
        self
    }

    /// Builds the header segment.
    ///
    /// Fields after MSH-12 are only written when a character set is declared.
    #[must_use]
    pub fn build(self, config: Arc<MessageConfig>) -> Segment {
        let last = if self.character_set.is_empty() {
            msh::VERSION_ID
        } else {
            msh::CHARACTER_SET
        };

        let mut fields: SmallVec<[String; 16]> = SmallVec::new();
        fields.resize(last, String::new());
        let mut put = |position: usize, value: String| fields[position - 1] = value;

        put(msh::FIELD_SEPARATOR, self.delimiters.field.to_string());
        put(msh::ENCODING_CHARACTERS, self.delimiters.encoding_characters());
        put(msh::SENDING_APPLICATION, self.sending_application);
        put(msh::SENDING_FACILITY, self.sending_facility);
        put(msh::RECEIVING_APPLICATION, self.receiving_application);
        put(msh::RECEIVING_FACILITY, self.receiving_facility);
        if let Some(ts) = self.timestamp {
            put(
                msh::DATE_TIME_OF_MESSAGE,
                ts.format(TIMESTAMP_FORMAT).to_string(),
            );
        }
        put(msh::MESSAGE_TYPE, self.message_type);
        put(msh::MESSAGE_CONTROL_ID, self.control_id);
        put(msh::PROCESSING_ID, self.processing_id);
        put(msh::VERSION_ID, self.version.as_str().to_string());
        if !self.character_set.is_empty() {
            put(msh::CHARACTER_SET, self.character_set);
        }

        Segment::from_parts(SegmentType::header(), fields, self.delimiters, config)
    }
}
