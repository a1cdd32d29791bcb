//! # formscan
//!
//! A minimal, best-effort PDF parser. It rebuilds the object graph from
//! raw bytes with a from-scratch tokenizer, inflates Flate-compressed
//! streams, extracts AcroForm field definitions, and heuristically
//! reconstructs titles and sections from content-stream text operators —
//! without a full PDF engine.
//!
//! Recoverable problems (malformed objects, failed decompression,
//! unsupported filters) become entries in [`ParsedDocument::warnings`];
//! the parse itself never fails over an in-memory buffer.
//!
//! ## Quick start
//!
//! ```rust
//! use formscan::parse_document;
//!
//! let doc = b"1 0 obj\n<< /Type /Catalog /AcroForm << /Fields [2 0 R] >> >>\nendobj\n\
//!             2 0 obj\n<< /T (name) /FT /Tx /V (Alice) >>\nendobj\n";
//! let result = parse_document(doc);
//!
//! assert_eq!(result.form_fields[0].name, "name");
//! println!("{}", result.prompt_summary());
//! ```
//!
//! Not supported, by design: encryption, cross-reference streams and
//! object streams, font metrics, and filters beyond FlateDecode.

pub mod forms;
pub mod parser;
mod summary;
pub mod text;

pub use forms::{FieldType, FormField};
pub use parser::{ObjectId, ObjectTable, ParseError, ParseResult};
pub use text::{Section, TextItem};

use parser::{DocumentResolver, Inflater};

/// Everything recovered from one document
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedDocument {
    /// All recovered text, newline-joined in stream order
    pub raw_text: String,
    /// The document title (the first section's heading), when one exists
    pub titles: Vec<String>,
    /// Sections grouped under their headings
    pub sections: Vec<Section>,
    /// AcroForm fields, flattened
    pub form_fields: Vec<FormField>,
    /// Recoverable problems encountered along the way
    pub warnings: Vec<String>,
}

/// Parse a PDF document from an in-memory buffer.
///
/// Never fails: malformed input degrades to an emptier result with more
/// warnings. Each call builds and discards its own object table; nothing
/// is shared between calls.
pub fn parse_document(bytes: &[u8]) -> ParsedDocument {
    parse_document_with(bytes, &Inflater::default())
}

/// Parse with an explicit decompression capability set. Mostly useful for
/// tests and for embedders that need to restrict the inflate paths.
pub fn parse_document_with(bytes: &[u8], inflater: &Inflater) -> ParsedDocument {
    let (table, warnings) = ObjectTable::build(bytes, inflater);
    let resolver = DocumentResolver::new(&table);

    let form_fields = resolver.acroform_fields();

    let mut items = Vec::new();
    for id in resolver.content_stream_ids() {
        if let Some(entry) = table.entry(id) {
            if let Some(stream) = &entry.stream {
                items.extend(text::extract_text_items(&stream.data));
            }
        }
    }

    let raw_text = items
        .iter()
        .map(|item| item.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let (titles, sections) = text::build_headings_and_sections(&items);

    tracing::debug!(
        fields = form_fields.len(),
        sections = sections.len(),
        warnings = warnings.len(),
        "document parsed"
    );

    ParsedDocument {
        raw_text,
        titles,
        sections,
        form_fields,
        warnings,
    }
}

/// Read and parse a PDF file.
///
/// I/O is the only fatal path; everything after the bytes are in memory
/// follows the degrade-to-warnings contract of [`parse_document`].
pub fn parse_file<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<ParsedDocument> {
    let bytes = std::fs::read(path)?;
    Ok(parse_document(&bytes))
}
