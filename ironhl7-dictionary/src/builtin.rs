/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Built-in header segment definition.
//!
//! The MSH layout is stable across every supported revision apart from the
//! timestamp data type, so it is shipped with the crate. Everything else is
//! expected to come from a site dictionary.

use crate::schema::{DataType, Dictionary, FieldDef, SegmentDef};
use ironhl7_core::types::{HEADER_SEGMENT, Version};

/// MSH field positions.
pub mod msh {
    /// MSH-1 Field Separator.
    pub const FIELD_SEPARATOR: usize = 1;
    /// MSH-2 Encoding Characters.
    pub const ENCODING_CHARACTERS: usize = 2;
    /// MSH-3 Sending Application.
    pub const SENDING_APPLICATION: usize = 3;
    /// MSH-4 Sending Facility.
    pub const SENDING_FACILITY: usize = 4;
    /// MSH-5 Receiving Application.
    pub const RECEIVING_APPLICATION: usize = 5;
    /// MSH-6 Receiving Facility.
    pub const RECEIVING_FACILITY: usize = 6;
    /// MSH-7 Date/Time of Message.
    pub const DATE_TIME_OF_MESSAGE: usize = 7;
    /// MSH-9 Message Type.
    pub const MESSAGE_TYPE: usize = 9;
    /// MSH-10 Message Control ID.
    pub const MESSAGE_CONTROL_ID: usize = 10;
    /// MSH-11 Processing ID.
    pub const PROCESSING_ID: usize = 11;
    /// MSH-12 Version ID.
    pub const VERSION_ID: usize = 12;
    /// MSH-18 Character Set.
    pub const CHARACTER_SET: usize = 18;
}

/// Returns the MSH segment definition for a version.
#[must_use]
pub fn header_segment(version: Version) -> SegmentDef {
    let timestamp = if version >= Version::V2_6 {
        DataType::Dtm
    } else {
        DataType::Ts
    };

    SegmentDef::new(HEADER_SEGMENT, "Message Header")
        .with_field(FieldDef::new(1, "Field Separator", DataType::St).with_max_length(1))
        .with_field(FieldDef::new(2, "Encoding Characters", DataType::St).with_max_length(5))
        .with_field(FieldDef::new(3, "Sending Application", DataType::Hd))
        .with_field(FieldDef::new(4, "Sending Facility", DataType::Hd))
        .with_field(FieldDef::new(5, "Receiving Application", DataType::Hd))
        .with_field(FieldDef::new(6, "Receiving Facility", DataType::Hd))
        .with_field(FieldDef::new(7, "Date/Time of Message", timestamp))
        .with_field(FieldDef::new(8, "Security", DataType::St))
        .with_field(FieldDef::new(9, "Message Type", DataType::Msg))
        .with_field(FieldDef::new(10, "Message Control ID", DataType::St))
        .with_field(FieldDef::new(11, "Processing ID", DataType::Pt))
        .with_field(FieldDef::new(12, "Version ID", DataType::Vid))
        .with_field(FieldDef::new(13, "Sequence Number", DataType::Nm))
        .with_field(FieldDef::new(14, "Continuation Pointer", DataType::St))
        .with_field(FieldDef::new(15, "Accept Acknowledgment Type", DataType::Id))
        .with_field(FieldDef::new(16, "Application Acknowledgment Type", DataType::Id))
        .with_field(FieldDef::new(17, "Country Code", DataType::Id))
        .with_field(FieldDef::new(18, "Character Set", DataType::Id).repeatable())
        .with_field(FieldDef::new(19, "Principal Language of Message", DataType::Ce))
        .with_field(FieldDef::new(
            20,
            "Alternate Character Set Handling Scheme",
            DataType::Id,
        ))
        .with_field(FieldDef::new(21, "Message Profile Identifier", DataType::Ei).repeatable())
}

impl Dictionary {
    /// Creates a dictionary holding only the header segment definition.
    #[must_use]
    pub fn header(version: Version) -> Self {
        let mut dict = Self::new(version);
        dict.add_segment(header_segment(version));
        dict
    }
}
