/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! End-to-end message tests across the IronHL7 crates.

use bytes::Bytes;
use ironhl7::er7::charset::resolve_encoding;
use ironhl7::prelude::*;
use std::sync::Arc;

const ORU: &str = "MSH|^~\\&|LAB|HOSP|EHR|CLINIC|20240101120000||ORU^R01|CTRL1|P|2.5\r\
                   PID|1||123^^^HOSP^MR||DOE^JANE||19800101|F\r\
                   OBR|1||ORD1|CBC^Complete Blood Count\r\
                   OBX|1|NM|WBC||6.1|10*9/L\r\
                   OBX|2|NM|RBC||4.5|10*12/L\r\
                   OBX|3|NM|HGB||13.9|g/dL\r";

const SITE_DICTIONARY: &str = r#"{
    "version": "2.5",
    "segments": {
        "PID": {
            "segment_type": "PID",
            "name": "Patient Identification",
            "fields": [
                { "position": 3, "name": "Patient Identifier List", "data_type": "CX", "repeatable": true },
                { "position": 5, "name": "Patient Name", "data_type": "XPN", "max_length": 20 }
            ]
        },
        "OBR": { "segment_type": "OBR", "name": "Observation Request" },
        "OBX": { "segment_type": "OBX", "name": "Observation Result" }
    }
}"#;

fn latin1_message() -> Vec<u8> {
    let mut raw = b"MSH|^~\\&|A|B|C|D|20240101||ADT^A01|1|P|2.3||||||8859/1\r".to_vec();
    raw.extend_from_slice(b"PID|1||123||J\xd6RGENSEN^ANDR\xc9\r");
    raw
}

#[test]
fn test_end_to_end_declared_charset() {
    let raw = latin1_message();
    assert_eq!(resolve_encoding(&raw, "UTF-8"), "8859/1");

    let mut message = Message::new();
    message.parse(&raw).unwrap();

    assert_eq!(message.segment_count(), 2);
    assert_eq!(message.segments()[0].segment_type(), "MSH");
    assert_eq!(message.segments()[1].segment_type(), "PID");
    let pid = message.get_segment("PID", 0).unwrap();
    assert_eq!(pid.component(5, 1), Some("J\u{d6}RGENSEN"));
    assert_eq!(pid.component(5, 2), Some("ANDR\u{c9}"));

    let out = message.to_hl7();
    assert_eq!(
        out,
        "MSH|^~\\&|A|B|C|D|20240101||ADT^A01|1|P|2.5||||||8859/1\r\
         PID|1||123||J\u{d6}RGENSEN^ANDR\u{c9}\r"
    );
}

#[test]
fn test_unicode_prefixed_charset() {
    let raw = b"MSH|^~\\&||||||||||||||||UNICODE UTF-8\rPID|1||caf\xc3\xa9\r";
    assert_eq!(resolve_encoding(raw, "8859/1"), "UTF-8");

    let message = Message::parse_new(&raw[..], MessageOptions::new()).unwrap();
    assert_eq!(message.get_segment("PID", 0).unwrap().field(3), Some("caf\u{e9}"));
}

#[test]
fn test_empty_charset_uses_caller_encoding() {
    let raw = b"MSH|^~\\&|A\rPID|1||\xe9t\xe9\r";
    assert_eq!(resolve_encoding(raw, "8859/1"), "8859/1");

    let mut message = Message::new();
    message
        .parse_with(&raw[..], &ParseOptions::new().with_encoding("8859/1"))
        .unwrap();
    assert_eq!(message.get_segment("PID", 0).unwrap().field(3), Some("\u{e9}t\u{e9}"));
}

#[test]
fn test_mllp_framed_bytes() {
    let mut framed = vec![0x0b];
    framed.extend_from_slice(ORU.as_bytes());
    framed.extend_from_slice(&[0x1c, 0x0d]);
    let framed = Bytes::from(framed);

    let mut message = Message::new();
    message.parse(&framed).unwrap();
    assert_eq!(message.segment_count(), 6);
    assert_eq!(message.to_hl7(), ORU);
}

#[test]
fn test_round_trip_reparses_equal() {
    let first = Message::parse_new(ORU, MessageOptions::new().with_version("2.7")).unwrap();
    let mut rendered = first.clone();
    let text = rendered.to_hl7();

    let second: Message = text.parse().unwrap();
    assert_eq!(second.segment_count(), first.segment_count());
    for (a, b) in first.segments().iter().zip(second.segments()).skip(1) {
        assert_eq!(a, b);
    }
    assert_eq!(second.header_version(), Some("2.7"));
    assert_eq!(first.header_version(), Some("2.5"));
}

#[test]
fn test_occurrence_lookup() {
    let message: Message = ORU.parse().unwrap();
    assert_eq!(message.get_segment("OBX", 0).unwrap().field(3), Some("WBC"));
    assert_eq!(message.get_segment("OBX", 1).unwrap().field(3), Some("RBC"));
    assert_eq!(message.get_segment("OBX", 2).unwrap().field(3), Some("HGB"));
    assert!(message.get_segment("OBX", 5).is_none());
    assert!(message.get_segment("ZZZ", 0).is_none());
}

#[test]
fn test_blank_lines_are_skipped() {
    let text = "MSH|^~\\&|A\r\rPID|1\r\r\rOBX|1\r";
    let message: Message = text.parse().unwrap();
    assert_eq!(message.segment_count(), 3);
}

#[test]
fn test_missing_header_is_structural() {
    for input in ["PID|1\r", "\x0bEVN|A01\r\x1c\r", ""] {
        let err = input.parse::<Message>().unwrap_err();
        let parse = err.as_parse().unwrap();
        assert!(parse.is_structural(), "input {input:?}");
        assert_eq!(parse.line(), None);
    }
}

#[test]
fn test_segment_error_diagnostics() {
    let text = "MSH|^~\\&|A\rPID|1\r\rxyz|bad\r";
    let err = text.parse::<Message>().unwrap_err();
    assert_eq!(err.to_string(), "parse error: line 4: invalid segment type: \"xyz\"");

    let parse = err.as_parse().unwrap();
    assert_eq!(parse.line_contents(), Some("xyz|bad"));
    assert_eq!(parse.message_contents(), text);
}

#[test]
fn test_bad_encoding_characters() {
    let err = "MSH|^^\\&|A\r".parse::<Message>().unwrap_err();
    let parse = err.as_parse().unwrap();
    assert_eq!(parse.line(), Some(1));
    assert!(matches!(
        parse.segment_error(),
        Some(SegmentError::InvalidEncodingCharacters(_))
    ));
}

#[test]
fn test_site_dictionary() {
    let dict = Arc::new(Dictionary::from_json(SITE_DICTIONARY).unwrap());
    let options = MessageOptions::new().with_custom_dict(Arc::clone(&dict));
    let message = Message::parse_new(ORU, options).unwrap();

    let pid = message.get_segment("PID", 0).unwrap();
    assert_eq!(pid.field_by_name("patient name"), Some("DOE^JANE"));
    assert_eq!(pid.repetitions(3), vec!["123^^^HOSP^MR"]);

    let header = message.header().unwrap();
    assert_eq!(header.field_by_name("Message Control ID"), Some("CTRL1"));
}

#[test]
fn test_site_dictionary_rejects_unknown_and_long_fields() {
    let dict = Arc::new(Dictionary::from_json(SITE_DICTIONARY).unwrap());

    let with_unknown = format!("{ORU}NTE|1||comment\r");
    let err = Message::parse_new(
        with_unknown.as_str(),
        MessageOptions::new().with_custom_dict(Arc::clone(&dict)),
    )
    .unwrap_err();
    assert!(matches!(
        err.as_parse().and_then(ParseError::segment_error),
        Some(SegmentError::UnknownSegment { .. })
    ));

    let long_name = "MSH|^~\\&\rPID|1||1||ABCDEFGHIJKLMNOPQRSTUVWXYZ\r";
    let err = Message::parse_new(
        long_name,
        MessageOptions::new().with_custom_dict(Arc::clone(&dict)),
    )
    .unwrap_err();
    assert!(matches!(
        err.as_parse().and_then(ParseError::segment_error),
        Some(SegmentError::FieldTooLong { max_length: 20, .. })
    ));

    let lenient = MessageOptions::new()
        .with_custom_dict(dict)
        .with_ignore_parsing_errors(true);
    let message = Message::parse_new(with_unknown.as_str(), lenient).unwrap();
    assert_eq!(message.segments_of_type("NTE").count(), 1);
}

#[test]
fn test_z_segments_pass_dictionary() {
    let dict = Arc::new(Dictionary::from_json(SITE_DICTIONARY).unwrap());
    let text = format!("{ORU}ZPI|custom\r");
    let message =
        Message::parse_new(text.as_str(), MessageOptions::new().with_custom_dict(dict)).unwrap();
    assert_eq!(message.get_segment("ZPI", 0).unwrap().field(1), Some("custom"));
}

#[test]
fn test_build_message_from_scratch() {
    let ts = chrono::DateTime::parse_from_rfc3339("2024-06-01T09:15:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);
    let mut message = Message::with_options(
        MessageOptions::new()
            .with_version("2.5.1")
            .with_encode_hl7_data_types(true),
    )
    .unwrap();
    let header = message
        .header_builder()
        .with_sending_application("IRONHL7")
        .with_timestamp(ts)
        .with_message_type("ADT^A08")
        .with_control_id("99");
    message.add_header(header);

    let mut pid = message.new_segment("PID").unwrap();
    pid.set_field(1, "1").unwrap();
    pid.set_field(5, "SMITH & SONS").unwrap();
    message.add(pid);

    assert_eq!(
        message.to_hl7(),
        "MSH|^~\\&|IRONHL7||||20240601091500||ADT^A08|99|P|2.5.1\r\
         PID|1||||SMITH \\T\\ SONS\r"
    );
    assert_eq!(
        message.get_segment("PID", 0).unwrap().decoded_field(5).as_deref(),
        Some("SMITH & SONS")
    );
}

#[test]
fn test_invalid_version_rejected_everywhere() {
    assert!(matches!(
        Message::with_options(MessageOptions::new().with_version("3.0")),
        Err(Hl7Error::Argument(ArgumentError::UnsupportedVersion(_)))
    ));
    assert!(matches!(
        Message::parse_new(ORU, MessageOptions::new().with_version("2.9")),
        Err(Hl7Error::Argument(ArgumentError::UnsupportedVersion(_)))
    ));

    let mut message = Message::new();
    message.set_version("2.8.2").unwrap();
    assert!(message.set_version("v2").is_err());
    assert_eq!(message.version(), Version::V2_8_2);
}

#[test]
fn test_every_version_renders() {
    for version in Version::ALL {
        let mut message =
            Message::parse_new(ORU, MessageOptions::new().with_version(version.as_str())).unwrap();
        let text = message.to_hl7();
        assert!(text.starts_with("MSH|"));
        assert_eq!(message.header_version(), Some(version.as_str()));
    }
}

#[test]
fn test_display_matches_serialization() {
    let message: Message = ORU.parse().unwrap();
    assert_eq!(message.to_string(), ORU);
}

#[test]
fn test_ignore_parsing_errors_keeps_structural_errors() {
    let lenient = MessageOptions::new().with_ignore_parsing_errors(true);
    let err = Message::parse_new("PID|1\r", lenient).unwrap_err();
    assert!(matches!(
        err,
        Hl7Error::Parse(ParseError::MissingHeader { .. })
    ));

    let mut message = Message::with_options(
        MessageOptions::new().with_ignore_parsing_errors(true),
    )
    .unwrap();
    let err = message.parse("xyz|1\r").unwrap_err();
    assert!(err.as_parse().is_some_and(ParseError::is_structural));
}

#[test]
fn test_ignore_parsing_errors_keeps_argument_errors() {
    let lenient = || MessageOptions::new().with_ignore_parsing_errors(true);
    assert!(matches!(
        Message::with_options(lenient().with_version("9.9")),
        Err(Hl7Error::Argument(ArgumentError::UnsupportedVersion(_)))
    ));
    assert!(matches!(
        Message::parse_new(ORU, lenient().with_version("9.9")),
        Err(Hl7Error::Argument(ArgumentError::UnsupportedVersion(_)))
    ));

    let mut message = Message::with_options(lenient()).unwrap();
    let err = message
        .parse_with(ORU.as_bytes(), &ParseOptions::new().with_encoding("EBCDIC-X"))
        .unwrap_err();
    assert!(matches!(
        err,
        Hl7Error::Argument(ArgumentError::UnsupportedEncoding(_))
    ));
    assert!(message.is_empty());
}

#[test]
fn test_ignore_parsing_errors_keeps_segment_shape_errors() {
    let lenient = MessageOptions::new().with_ignore_parsing_errors(true);
    let err = Message::parse_new("MSH|^~\\&\rPID|1\rx1|2\r", lenient).unwrap_err();
    let parse = err.as_parse().unwrap();
    assert_eq!(parse.line(), Some(3));
    assert!(matches!(
        parse.segment_error(),
        Some(SegmentError::InvalidSegmentType(_))
    ));
}
