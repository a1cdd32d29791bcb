//! PDF Stream Filters
//!
//! Filter-name handling and best-effort Flate decompression according to
//! ISO 32000-1 Section 7.4. Only FlateDecode is actually decoded; every
//! other filter is recognized by name so callers can warn precisely.

use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use std::io::Read;

use super::objects::{PdfDictionary, PdfObject};

/// Filter names this crate recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    ASCIIHexDecode,
    ASCII85Decode,
    LZWDecode,
    FlateDecode,
    RunLengthDecode,
    CCITTFaxDecode,
    JBIG2Decode,
    DCTDecode,
    JPXDecode,
    Crypt,
}

impl Filter {
    /// Parse filter from name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ASCIIHexDecode" => Some(Filter::ASCIIHexDecode),
            "ASCII85Decode" => Some(Filter::ASCII85Decode),
            "LZWDecode" => Some(Filter::LZWDecode),
            "FlateDecode" => Some(Filter::FlateDecode),
            "RunLengthDecode" => Some(Filter::RunLengthDecode),
            "CCITTFaxDecode" => Some(Filter::CCITTFaxDecode),
            "JBIG2Decode" => Some(Filter::JBIG2Decode),
            "DCTDecode" => Some(Filter::DCTDecode),
            "JPXDecode" => Some(Filter::JPXDecode),
            "Crypt" => Some(Filter::Crypt),
            _ => None,
        }
    }
}

/// Normalize a stream dictionary's /Filter entry (a single Name or an
/// Array of Names) into a list of filter name strings.
///
/// Anything that is not a Name is skipped; the caller sees only the names
/// that were actually present.
pub fn filter_names(dict: &PdfDictionary) -> Vec<String> {
    match dict.get("Filter") {
        Some(PdfObject::Name(name)) => vec![name.as_str().to_string()],
        Some(PdfObject::Array(array)) => array
            .iter()
            .filter_map(|obj| obj.as_name().map(|n| n.as_str().to_string()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Decompression methods, tried strictly in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflateMethod {
    /// zlib-wrapped deflate, the FlateDecode wire format
    Zlib,
    /// Raw deflate, for producers that omit the zlib header
    RawDeflate,
    /// gzip-wrapped deflate
    Gzip,
}

/// Outcome of a best-effort inflate
#[derive(Debug, Clone)]
pub struct InflateOutcome {
    /// Decompressed bytes, or the input unchanged when nothing worked
    pub data: Vec<u8>,
    /// The method that succeeded, if any
    pub method: Option<InflateMethod>,
}

/// Immutable decompression capability set, computed once per parse and
/// handed to the object table builder.
#[derive(Debug, Clone)]
pub struct Inflater {
    methods: Vec<InflateMethod>,
}

impl Default for Inflater {
    fn default() -> Self {
        Self {
            methods: vec![
                InflateMethod::Zlib,
                InflateMethod::RawDeflate,
                InflateMethod::Gzip,
            ],
        }
    }
}

impl Inflater {
    /// Build an inflater restricted to the given methods. An empty list
    /// makes every inflate a no-op pass-through.
    pub fn with_methods(methods: Vec<InflateMethod>) -> Self {
        Self { methods }
    }

    /// Best-effort inflate. Tries each configured method in order and
    /// returns the first success; when all fail the input comes back
    /// unchanged with `method: None`. Never errors.
    pub fn inflate(&self, data: &[u8]) -> InflateOutcome {
        for &method in &self.methods {
            if let Some(decoded) = try_inflate(method, data) {
                return InflateOutcome {
                    data: decoded,
                    method: Some(method),
                };
            }
        }

        tracing::debug!(len = data.len(), "all inflate methods failed, keeping raw bytes");
        InflateOutcome {
            data: data.to_vec(),
            method: None,
        }
    }
}

fn try_inflate(method: InflateMethod, data: &[u8]) -> Option<Vec<u8>> {
    let mut decoded = Vec::new();
    let result = match method {
        InflateMethod::Zlib => ZlibDecoder::new(data).read_to_end(&mut decoded),
        InflateMethod::RawDeflate => DeflateDecoder::new(data).read_to_end(&mut decoded),
        InflateMethod::Gzip => GzDecoder::new(data).read_to_end(&mut decoded),
    };
    result.ok().map(|_| decoded)
}
