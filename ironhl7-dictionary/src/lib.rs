/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronHL7 Dictionary
//!
//! HL7 v2 segment and field dictionaries for IronHL7.
//!
//! This crate provides:
//! - **Schema definitions**: Segment and field definitions with HL7 data types
//! - **JSON loading**: Custom site dictionaries via `serde_json`
//! - **Built-in header**: The MSH definition shared by every supported version

pub mod builtin;
pub mod schema;

pub use schema::{DataType, Dictionary, DictionaryError, FieldDef, SegmentDef};
