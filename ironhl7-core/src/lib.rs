/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronHL7 Core
//!
//! Core types and error definitions for the IronHL7 HL7 v2 codec.
//!
//! This crate provides the fundamental building blocks used across all IronHL7 crates:
//! - **Error types**: Unified error handling with `thiserror`, including line-annotated
//!   parse errors
//! - **Version**: The enumerated set of supported HL7 v2 revisions
//! - **Wire types**: `SegmentType`, `Delimiters` and the segment terminator constants

pub mod error;
pub mod types;

pub use error::{ArgumentError, Hl7Error, ParseError, Result, SegmentError};
pub use types::{
    DEFAULT_FIELD_SEPARATOR, Delimiters, HEADER_SEGMENT, SEGMENT_TERMINATOR, SegmentType, Version,
};
