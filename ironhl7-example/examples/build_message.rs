/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Builds an ORU^R01 result message from scratch and prints it.
//!
//! Run with: `cargo run --example build_message`

use chrono::Utc;
use ironhl7_er7::{Message, MessageOptions};
use ironhl7_example::init_logging;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging();

    let mut message = Message::with_options(
        MessageOptions::new()
            .with_version("2.5.1")
            .with_encode_hl7_data_types(true),
    )?;

    let header = message
        .header_builder()
        .with_sending_application("LAB")
        .with_sending_facility("GENERAL HOSPITAL")
        .with_receiving_application("EHR")
        .with_timestamp(Utc::now())
        .with_message_type("ORU^R01^ORU_R01")
        .with_control_id("RES0001");
    message.add_header(header);

    let mut pid = message.new_segment("PID")?;
    pid.set_field(1, "1")?;
    pid.set_field_raw(3, "448812^^^GH^MR")?;
    pid.set_field_raw(5, "DOE^JANE")?;
    message.add(pid);

    let results = [
        ("718-7", "Hemoglobin", "13.9", "g/dL"),
        ("4544-3", "Hematocrit", "41", "%"),
        ("777-3", "Platelets", "250", "10*3/uL"),
    ];
    for (i, (code, name, value, unit)) in results.iter().enumerate() {
        let mut obx = message.new_segment("OBX")?;
        obx.set_field(1, &(i + 1).to_string())?;
        obx.set_field(2, "NM")?;
        obx.set_field_raw(3, format!("{code}^{name}^LN"))?;
        obx.set_field(5, value)?;
        obx.set_field(6, unit)?;
        obx.set_field(11, "F")?;
        message.add(obx);
    }

    let mut nte = message.new_segment("NTE")?;
    nte.set_field(1, "1")?;
    nte.set_field(3, "Sample drawn 08:00 & processed 08:45")?;
    message.add(nte);

    let text = message.to_hl7();
    info!(
        "Built {} segments, {} bytes",
        message.segment_count(),
        text.len()
    );
    for line in text.split('\r').filter(|l| !l.is_empty()) {
        println!("{line}");
    }

    Ok(())
}
