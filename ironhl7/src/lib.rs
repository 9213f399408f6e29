/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronHL7
//!
//! HL7 v2 message parsing and serialization for Rust.
//!
//! IronHL7 reads and writes HL7 v2 messages in the pipe-and-hat (ER7)
//! encoding, for every revision from 2.1 through 2.8.2.
//!
//! ## Features
//!
//! - **Charset aware**: Binary input is decoded with the charset its header declares
//! - **MLLP tolerant**: Start and end block framing bytes are stripped on input
//! - **Byte-exact**: Parsed messages re-serialize unchanged apart from the version field
//! - **Located errors**: Parse failures report the line, its text and the whole message
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ironhl7::prelude::*;
//!
//! let raw = b"MSH|^~\\&|LAB|HOSP|||20240101120000||ORU^R01|1|P|2.5\rOBX|1|NM|HR||72\r";
//! let mut message = Message::new();
//! message.parse(&raw[..])?;
//!
//! let obx = message.get_segment("OBX", 0).unwrap();
//! assert_eq!(obx.field(5), Some("72"));
//! println!("{}", message.to_hl7());
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Versions, delimiters, segment types and error definitions
//! - [`dictionary`]: Segment and field dictionaries
//! - [`er7`]: Charset resolution, framing, segments and messages

pub mod core {
    //! Versions, delimiters, segment types and error definitions.
    pub use ironhl7_core::*;
}

pub mod dictionary {
    //! Segment and field dictionaries.
    pub use ironhl7_dictionary::*;
}

pub mod er7 {
    //! Pipe-and-hat message parsing and serialization.
    pub use ironhl7_er7::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use ironhl7_core::{
        ArgumentError, Delimiters, Hl7Error, ParseError, Result, SegmentError, SegmentType,
        Version,
    };

    // Dictionary
    pub use ironhl7_dictionary::{DataType, Dictionary, FieldDef, SegmentDef};

    // ER7 encoding
    pub use ironhl7_er7::{
        HeaderBuilder, Hl7Input, Message, MessageConfig, MessageOptions, ParseOptions, Segment,
    };
}
