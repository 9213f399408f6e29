/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Message and parse configuration.
//!
//! [`MessageConfig`] is fixed when a message is created and shared with every
//! segment the message builds. [`MessageOptions`] adds the starting version,
//! and [`ParseOptions`] carries per-call overrides.

use ironhl7_dictionary::Dictionary;
use std::sync::Arc;

/// Configuration shared by a message and its segments.
#[derive(Debug, Clone, Default)]
pub struct MessageConfig {
    /// Site dictionary used to validate segment types and field lengths.
    pub custom_dict: Option<Arc<Dictionary>>,
    /// Whether segments accept content the dictionary rejects.
    pub ignore_parsing_errors: bool,
    /// Whether values set on segments have delimiters escaped on output.
    pub encode_hl7_data_types: bool,
}

impl MessageConfig {
    /// Creates a configuration with no dictionary and both flags off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the site dictionary.
    #[must_use]
    pub fn with_custom_dict(mut self, dict: Arc<Dictionary>) -> Self {
        self.custom_dict = Some(dict);
        self
    }

    /// Sets whether segments ignore dictionary violations.
    #[must_use]
    pub const fn with_ignore_parsing_errors(mut self, ignore: bool) -> Self {
        self.ignore_parsing_errors = ignore;
        self
    }

    /// Sets whether values set on segments are escaped.
    #[must_use]
    pub const fn with_encode_hl7_data_types(mut self, encode: bool) -> Self {
        self.encode_hl7_data_types = encode;
        self
    }

    /// Returns the site dictionary, if any.
    #[inline]
    #[must_use]
    pub fn dictionary(&self) -> Option<&Dictionary> {
        self.custom_dict.as_deref()
    }
}

/// Options for constructing a [`Message`](crate::message::Message).
#[derive(Debug, Clone, Default)]
pub struct MessageOptions {
    /// Starting version; `None` or empty selects the default.
    pub version: Option<String>,
    /// Configuration handed to every segment.
    pub config: MessageConfig,
}

impl MessageOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the starting version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the site dictionary.
    #[must_use]
    pub fn with_custom_dict(mut self, dict: Arc<Dictionary>) -> Self {
        self.config = self.config.with_custom_dict(dict);
        self
    }

    /// Sets whether segments ignore dictionary violations.
    #[must_use]
    pub fn with_ignore_parsing_errors(mut self, ignore: bool) -> Self {
        self.config = self.config.with_ignore_parsing_errors(ignore);
        self
    }

    /// Sets whether values set on segments are escaped.
    #[must_use]
    pub fn with_encode_hl7_data_types(mut self, encode: bool) -> Self {
        self.config = self.config.with_encode_hl7_data_types(encode);
        self
    }
}

/// Per-call overrides for parsing.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Encoding used for binary input when MSH-18 is empty or absent.
    pub encoding: Option<String>,
    /// Dictionary that replaces the message's own for this call.
    pub custom_dict: Option<Arc<Dictionary>>,
}

impl ParseOptions {
    /// Creates options with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback encoding.
    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Sets the dictionary override.
    #[must_use]
    pub fn with_custom_dict(mut self, dict: Arc<Dictionary>) -> Self {
        self.custom_dict = Some(dict);
        self
    }

    /// Returns the configuration in effect for one parse call.
    ///
    /// The message's own configuration is reused unless a dictionary override is set.
    #[must_use]
    pub fn effective_config(&self, base: &Arc<MessageConfig>) -> Arc<MessageConfig> {
        match &self.custom_dict {
            Some(dict) => Arc::new((**base).clone().with_custom_dict(Arc::clone(dict))),
            None => Arc::clone(base),
        }
    }
}
