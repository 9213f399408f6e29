/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Parses an HL7 message and prints its segments.
//!
//! Reads the file named by `HL7_FILE`, or the bundled ISO 8859-1 sample.
//!
//! Run with: `cargo run --example parse_message`

use bytes::Bytes;
use ironhl7_er7::{Message, MessageOptions, resolve_encoding};
use ironhl7_example::{SAMPLE_ADT, describe_segment, init_logging, input_path};
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    init_logging();

    let raw = match input_path() {
        Some(path) => {
            info!("Reading {}", path.display());
            Bytes::from(std::fs::read(&path)?)
        }
        None => Bytes::from_static(SAMPLE_ADT),
    };

    info!(
        "Declared character set: {}",
        resolve_encoding(&raw, "UTF-8")
    );

    let message = match Message::parse_new(&raw, MessageOptions::new()) {
        Ok(message) => message,
        Err(e) => {
            if let Some(parse) = e.as_parse()
                && let Some(line) = parse.line()
            {
                error!(
                    "Line {}: {:?}",
                    line,
                    parse.line_contents().unwrap_or_default()
                );
            }
            return Err(e.into());
        }
    };

    info!(
        "Parsed {} segments, header version {}",
        message.segment_count(),
        message.header_version().unwrap_or("none")
    );

    for segment in message.segments() {
        print!("{}", describe_segment(segment));
    }

    if let Some(pid) = message.get_segment("PID", 0) {
        info!(
            "Patient: {} {}",
            pid.component(5, 2).unwrap_or_default(),
            pid.component(5, 1).unwrap_or_default()
        );
        for id in pid.repetitions(3) {
            info!("Identifier: {}", id);
        }
    }

    for (i, obx) in message.segments_of_type("OBX").enumerate() {
        info!(
            "Observation {}: {} = {} {}",
            i + 1,
            obx.component(3, 2).unwrap_or_default(),
            obx.field(5).unwrap_or_default(),
            obx.field(6).unwrap_or_default()
        );
    }

    Ok(())
}
