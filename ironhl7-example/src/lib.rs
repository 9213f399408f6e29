/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Common utilities shared across examples.

use ironhl7_er7::Segment;
use std::env;
use std::path::PathBuf;

/// Sample admission message, MLLP framed and encoded as ISO 8859-1.
pub const SAMPLE_ADT: &[u8] = include_bytes!("../data/adt_a01_latin1.hl7");

/// Initializes logging for examples.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

/// Returns the message file named by `HL7_FILE`, if set.
#[must_use]
pub fn input_path() -> Option<PathBuf> {
    env::var_os("HL7_FILE").map(PathBuf::from)
}

/// Formats one segment as an indented field listing.
#[must_use]
pub fn describe_segment(segment: &Segment) -> String {
    let mut out = format!("{}\n", segment.segment_type());
    for (i, value) in segment.fields().enumerate() {
        if !value.is_empty() {
            out.push_str(&format!("  {}-{}: {}\n", segment.segment_type(), i + 1, value));
        }
    }
    out
}
