/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronHL7 ER7
//!
//! Parsing and serialization of HL7 v2 messages in the pipe-and-hat (ER7)
//! encoding.
//!
//! Parsing a binary buffer is two-phase: the header's character set field is
//! located by a byte scan ([`charset::resolve_encoding`]), then the whole
//! buffer is decoded once with the resolved charset. The decoded text has any
//! MLLP framing stripped and is split into [`Segment`]s on the segment
//! terminator.
//!
//! ## Features
//!
//! - **Self-declared charsets**: MSH-18 selects the decoder via `encoding_rs`
//! - **MLLP tolerant**: Start/end block bytes are stripped on input
//! - **Byte-exact round trip**: Segments keep their raw field text
//! - **Located errors**: Segment failures carry line number, line and message text

pub mod charset;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod escape;
pub mod framing;
pub mod header;
pub mod message;
pub mod segment;

pub use charset::{Charset, DEFAULT_ENCODING, resolve_encoding};
pub use config::{MessageConfig, MessageOptions, ParseOptions};
pub use decoder::{Decoder, Hl7Input};
pub use encoder::Encoder;
pub use header::HeaderBuilder;
pub use message::Message;
pub use segment::Segment;
