/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! HL7 message.
//!
//! A [`Message`] owns an ordered list of segments, a version and the
//! configuration shared with its segments. Parsing replaces the segment list
//! only when the whole input parses; serialization writes the message
//! version into the header before rendering.

use crate::charset::DEFAULT_ENCODING;
use crate::config::{MessageConfig, MessageOptions, ParseOptions};
use crate::decoder::{Decoder, Hl7Input};
use crate::encoder::Encoder;
use crate::header::HeaderBuilder;
use crate::segment::Segment;
use bytes::Bytes;
use ironhl7_core::error::{Hl7Error, Result};
use ironhl7_core::types::{Delimiters, SegmentType, Version};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// An HL7 v2 message.
#[derive(Debug, Clone, Default)]
pub struct Message {
    /// Version written into MSH-12 on output.
    version: Version,
    /// Segments in wire order.
    segments: Vec<Segment>,
    /// Configuration shared with every segment this message creates.
    config: Arc<MessageConfig>,
}

impl Message {
    /// Creates an empty message with the default version and configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty message from options.
    ///
    /// # Errors
    /// Returns `ArgumentError::UnsupportedVersion` if the version is not supported.
    pub fn with_options(options: MessageOptions) -> Result<Self> {
        let version = Version::resolve(options.version.as_deref().unwrap_or_default())?;
        Ok(Self {
            version,
            segments: Vec::new(),
            config: Arc::new(options.config),
        })
    }

    /// Creates a message from options and parses `input` into it.
    ///
    /// # Errors
    /// Returns `Hl7Error` if the options are invalid or parsing fails.
    pub fn parse_new<'a>(input: impl Into<Hl7Input<'a>>, options: MessageOptions) -> Result<Self> {
        let mut message = Self::with_options(options)?;
        message.parse(input)?;
        Ok(message)
    }

    /// Returns the message version.
    #[inline]
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Sets the message version from its string form.
    ///
    /// An empty string selects the default version. An unsupported value is
    /// rejected and the current version is kept.
    ///
    /// # Errors
    /// Returns `ArgumentError::UnsupportedVersion` for unrecognized values.
    pub fn set_version(&mut self, version: &str) -> Result<()> {
        self.version = Version::resolve(version)?;
        Ok(())
    }

    /// Returns the configuration shared with this message's segments.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &Arc<MessageConfig> {
        &self.config
    }

    /// Returns the segments in wire order.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the number of segments.
    #[inline]
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the message has no segments.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Appends a segment.
    ///
    /// No header check is made; only parsing enforces that MSH comes first.
    pub fn add(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Creates an empty segment bound to this message's configuration and
    /// header delimiters. The segment is not added.
    ///
    /// # Errors
    /// Returns `SegmentError::InvalidSegmentType` if `segment_type` is malformed.
    pub fn new_segment(&self, segment_type: &str) -> Result<Segment> {
        let segment_type = SegmentType::new(segment_type)?;
        Ok(Segment::new(
            segment_type,
            self.delimiters(),
            Arc::clone(&self.config),
        ))
    }

    /// Returns a header builder preset with this message's version and delimiters.
    #[must_use]
    pub fn header_builder(&self) -> HeaderBuilder {
        HeaderBuilder::new()
            .with_version(self.version)
            .with_delimiters(self.delimiters())
    }

    /// Builds a header with `builder` and makes it the message header.
    ///
    /// An existing header is replaced in place; otherwise the header is
    /// inserted as the first segment.
    pub fn add_header(&mut self, builder: HeaderBuilder) {
        let header = builder.build(Arc::clone(&self.config));
        match self.segments.iter_mut().find(|s| s.is_header()) {
            Some(existing) => *existing = header,
            None => self.segments.insert(0, header),
        }
    }

    /// Returns the delimiters declared by the header, or the defaults.
    #[must_use]
    pub fn delimiters(&self) -> Delimiters {
        self.header()
            .map(|h| *h.delimiters())
            .unwrap_or_default()
    }

    /// Parses input into this message with default parse options.
    ///
    /// # Errors
    /// Returns `Hl7Error` if parsing fails; the segment list is then unchanged.
    pub fn parse<'a>(&mut self, input: impl Into<Hl7Input<'a>>) -> Result<()> {
        self.parse_with(input, &ParseOptions::default())
    }

    /// Parses input into this message.
    ///
    /// Binary input is decoded with the charset declared in MSH-18, falling back
    /// to `options.encoding` and then UTF-8. A dictionary in `options`
    /// replaces the message's own for this call. On success the previous
    /// segments are replaced; on failure they are left untouched.
    ///
    /// # Errors
    /// Returns `ArgumentError` for an unsupported fallback encoding,
    /// `ParseError::MissingHeader` if the message does not start with MSH, and
    /// `ParseError::Segment` with line context if a segment fails.
    pub fn parse_with<'a>(
        &mut self,
        input: impl Into<Hl7Input<'a>>,
        options: &ParseOptions,
    ) -> Result<()> {
        let fallback = options.encoding.as_deref().unwrap_or(DEFAULT_ENCODING);
        let text = input.into().into_text(fallback)?;
        let decoder = Decoder::new(options.effective_config(&self.config));
        let segments = decoder.decode(&text)?;
        debug!(
            segments = segments.len(),
            version = %self.version,
            "parsed message"
        );
        self.segments = segments;
        Ok(())
    }

    /// Finds a segment by type and 0-based occurrence among segments of that type.
    ///
    /// # Arguments
    /// * `segment_type` - The segment type code, e.g. `"OBX"`
    /// * `index` - Which occurrence to return; 0 is the first
    #[must_use]
    pub fn get_segment(&self, segment_type: &str, index: usize) -> Option<&Segment> {
        self.segments
            .iter()
            .filter(|s| s.segment_type() == segment_type)
            .nth(index)
    }

    /// Mutable variant of [`Message::get_segment`].
    #[must_use]
    pub fn get_segment_mut(&mut self, segment_type: &str, index: usize) -> Option<&mut Segment> {
        self.segments
            .iter_mut()
            .filter(|s| s.segment_type() == segment_type)
            .nth(index)
    }

    /// Returns an iterator over every segment of one type, in order.
    pub fn segments_of_type<'s>(
        &'s self,
        segment_type: &'s str,
    ) -> impl Iterator<Item = &'s Segment> + 's {
        self.segments
            .iter()
            .filter(move |s| s.segment_type() == segment_type)
    }

    /// Returns the first header segment.
    #[must_use]
    pub fn header(&self) -> Option<&Segment> {
        self.segments.iter().find(|s| s.is_header())
    }

    /// Returns the version found in the header (MSH-12), which may differ from
    /// [`Message::version`] until the message is serialized.
    #[must_use]
    pub fn header_version(&self) -> Option<&str> {
        self.header().and_then(Segment::version_id)
    }

    /// Writes the message version into the header segment, if there is one.
    pub fn sync_header_version(&mut self) {
        let version = self.version;
        if let Some(header) = self.segments.iter_mut().find(|s| s.is_header()) {
            header.write_version_id(version);
        }
    }

    /// Serializes the message.
    ///
    /// The message version is first written into the header; every segment,
    /// including the last, is followed by a carriage return.
    #[must_use]
    pub fn to_hl7(&mut self) -> String {
        self.sync_header_version();
        self.render()
    }

    /// Returns the whole message as text. Alias of [`Message::to_hl7`].
    #[must_use]
    pub fn hl7(&mut self) -> String {
        self.to_hl7()
    }

    /// Replaces the whole message by parsing `text`.
    ///
    /// # Errors
    /// Returns `Hl7Error` if parsing fails.
    pub fn set_hl7(&mut self, text: &str) -> Result<()> {
        self.parse(text)
    }

    /// Serializes the message into a byte buffer.
    #[must_use]
    pub fn to_bytes(&mut self) -> Bytes {
        Bytes::from(self.to_hl7())
    }

    fn render(&self) -> String {
        let capacity = self.segments.iter().map(|s| s.encoded_len() + 1).sum();
        let mut encoder = Encoder::with_capacity(capacity).with_version(self.version);
        encoder.put_segments(&self.segments);
        encoder.finish()
    }
}

impl fmt::Display for Message {
    /// Renders the message with the current version, without modifying it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for Message {
    type Err = Hl7Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut message = Self::new();
        message.parse(s)?;
        Ok(message)
    }
}
