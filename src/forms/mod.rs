//! Form field records extracted from an AcroForm dictionary, following
//! ISO 32000-1 Section 12.7.

/// Type of form field, derived from the /FT name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldType {
    /// Button field (push button, checkbox, radio button)
    Button,
    /// Text field
    Text,
    /// Choice field (list box, combo box)
    Choice,
    /// Signature field
    Signature,
    /// Missing or unrecognized /FT
    Unknown,
}

impl FieldType {
    /// Map a /FT name to its field type
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "Btn" => FieldType::Button,
            "Tx" => FieldType::Text,
            "Ch" => FieldType::Choice,
            "Sig" => FieldType::Signature,
            _ => FieldType::Unknown,
        }
    }

    /// Human-readable label
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Button => "Button",
            FieldType::Text => "Text",
            FieldType::Choice => "Choice",
            FieldType::Signature => "Signature",
            FieldType::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One interactive-form field.
///
/// `name` is the node's own /T title; ancestor titles are not concatenated,
/// so nested fields show their leaf name rather than the fully-qualified
/// `parent.child` form PDF viewers display.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormField {
    /// Field name from /T
    pub name: String,
    /// Field type from /FT
    pub field_type: FieldType,
    /// Current value from /V, or the /AS appearance state for buttons
    pub value: Option<String>,
}
