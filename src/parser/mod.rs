//! PDF Parser Module
//!
//! A minimal native reader of the PDF file body: a lexer, an object parser,
//! a whole-document object table, Flate stream handling, a restricted
//! content-stream parser, and the resolvers that walk the table for
//! document structure. No cross-reference tables, no encryption, no object
//! streams; malformed input degrades to warnings instead of failures.

pub mod content;
pub mod document;
pub mod filters;
pub mod lexer;
pub mod objects;
pub mod table;

pub use self::content::{ContentOperation, ContentParser, TextElement};
pub use self::document::DocumentResolver;
pub use self::filters::{Filter, InflateMethod, InflateOutcome, Inflater};
pub use self::lexer::{Lexer, Token};
pub use self::objects::{PdfArray, PdfDictionary, PdfName, PdfObject, PdfString};
pub use self::table::{ObjectEntry, ObjectId, ObjectTable, StreamPayload};

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// PDF parser errors. These stay local: the object table catches them
/// per object and downgrades to warnings.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Syntax error at position {position}: {message}")]
    SyntaxError { position: usize, message: String },

    #[error("Unexpected token: expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },
}
