/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! HL7 message encoder.
//!
//! This module renders segments back into wire text. Every segment,
//! including the last, is followed by the segment terminator. No framing
//! bytes are written and no charset is re-applied; the output is text.

use crate::segment::Segment;
use ironhl7_core::types::{SEGMENT_TERMINATOR, Version};

/// HL7 message encoder.
///
/// The encoder appends segments in order. A version passed to
/// [`Encoder::with_version`] replaces the header's version identifier in the
/// output without modifying the segment.
#[derive(Debug, Default)]
pub struct Encoder {
    /// Output text.
    buf: String,
    /// Version written into header segments, if any.
    version: Option<Version>,
    /// Number of segments written.
    segments: usize,
}

impl Encoder {
    /// Creates a new encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new encoder with pre-allocated capacity.
    ///
    /// # Arguments
    /// * `capacity` - Initial buffer capacity in bytes
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Sets the version rendered into header segments.
    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Appends a segment followed by the segment terminator.
    #[inline]
    pub fn put_segment(&mut self, segment: &Segment) {
        segment.write_to(&mut self.buf, self.version);
        self.buf.push(SEGMENT_TERMINATOR);
        self.segments += 1;
    }

    /// Appends every segment in order.
    pub fn put_segments<'a>(&mut self, segments: impl IntoIterator<Item = &'a Segment>) {
        for segment in segments {
            self.put_segment(segment);
        }
    }

    /// Finishes encoding and returns the message text.
    #[must_use]
    pub fn finish(self) -> String {
        self.buf
    }

    /// Returns the number of segments written.
    #[inline]
    #[must_use]
    pub const fn segment_count(&self) -> usize {
        self.segments
    }

    /// Returns the current output length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Clears the encoder for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
        self.segments = 0;
    }
}
