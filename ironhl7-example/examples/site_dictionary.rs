/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Validates messages against a site dictionary loaded from JSON.
//!
//! Run with: `cargo run --example site_dictionary`

use ironhl7_core::Version;
use ironhl7_dictionary::{DataType, Dictionary, FieldDef, SegmentDef};
use ironhl7_er7::{Message, MessageOptions, ParseOptions};
use ironhl7_example::{SAMPLE_ADT, init_logging};
use std::sync::Arc;
use tracing::{info, warn};

fn site_dictionary() -> Dictionary {
    let mut dict = Dictionary::header(Version::V2_5_1);
    dict.add_segment(SegmentDef::new("EVN", "Event Type"));
    dict.add_segment(
        SegmentDef::new("PID", "Patient Identification")
            .with_field(
                FieldDef::new(3, "Patient Identifier List", DataType::Cx)
                    .repeatable()
                    .with_max_length(250),
            )
            .with_field(FieldDef::new(5, "Patient Name", DataType::Xpn).with_max_length(48))
            .with_field(FieldDef::new(7, "Date/Time of Birth", DataType::Ts)),
    );
    dict.add_segment(SegmentDef::new("PV1", "Patient Visit"));
    dict.add_segment(SegmentDef::new("OBX", "Observation Result"));
    dict
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let json = site_dictionary().to_json()?;
    info!("Site dictionary is {} bytes of JSON", json.len());
    let dict = Arc::new(Dictionary::from_json(&json)?);

    // NK1 is not in the site dictionary.
    let strict = MessageOptions::new().with_custom_dict(Arc::clone(&dict));
    match Message::parse_new(SAMPLE_ADT, strict) {
        Ok(_) => info!("Sample accepted"),
        Err(e) => warn!("Sample rejected: {}", e),
    }

    let lenient = MessageOptions::new()
        .with_custom_dict(Arc::clone(&dict))
        .with_ignore_parsing_errors(true);
    let message = Message::parse_new(SAMPLE_ADT, lenient)?;
    info!("Lenient parse kept {} segments", message.segment_count());

    if let Some(pid) = message.get_segment("PID", 0) {
        info!(
            "Birth date: {}",
            pid.field_by_name("date/time of birth").unwrap_or_default()
        );
    }
    if let Some(header) = message.header() {
        info!(
            "Message type: {}",
            header.field_by_name("Message Type").unwrap_or_default()
        );
    }

    let mut reparsed = Message::new();
    let per_call = ParseOptions::new().with_custom_dict(dict);
    if let Err(e) = reparsed.parse_with(SAMPLE_ADT, &per_call) {
        warn!("Per-call dictionary rejected sample: {}", e);
    }

    Ok(())
}
