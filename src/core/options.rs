//! Options controlling how cell content is recovered from markup

// =============================================================================
// Grid Reconstruction Options
// =============================================================================

/// Options for reading a table fragment
///
/// Options only affect cell *content*; the grid structure (spans, widths,
/// links) is never altered by them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridOptions {
    /// Decode HTML character references in cell content (`&amp;`, `&nbsp;`, `&#8212;`)
    /// Default: true
    pub decode_entities: bool,

    /// Collapse runs of whitespace (including line breaks and non-breaking
    /// spaces) inside a cell into a single space
    /// Default: true
    pub collapse_whitespace: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            decode_entities: true,
            collapse_whitespace: true,
        }
    }
}

impl GridOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep cell text exactly as it appears between the tags (only trimmed)
    pub fn verbatim() -> Self {
        Self {
            decode_entities: false,
            collapse_whitespace: false,
        }
    }

    /// Load options from a TOML document
    ///
    /// Missing keys fall back to their defaults.
    #[cfg(feature = "config")]
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Apply the configured clean-up to raw cell text
    pub fn clean_content(&self, raw: &str) -> String {
        let decoded = if self.decode_entities {
            html_escape::decode_html_entities(raw).into_owned()
        } else {
            raw.to_string()
        };

        if self.collapse_whitespace {
            decoded.split_whitespace().collect::<Vec<_>>().join(" ")
        } else {
            decoded.trim().to_string()
        }
    }
}
