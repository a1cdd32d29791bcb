//! PDF Object Table
//!
//! Scans the whole document for `<n> <g> obj ... endobj` spans and builds
//! the object table the resolvers work from. Parsing is best-effort: a
//! malformed object becomes a raw-fallback entry plus a warning, never an
//! abort. Cross-reference tables are deliberately ignored; the linear scan
//! also recovers objects a damaged xref would lose.

use lazy_static::lazy_static;
use regex::bytes::Regex;
use std::collections::BTreeMap;
use std::fmt;

use super::filters::{filter_names, Filter, Inflater};
use super::lexer::{find_subsequence, Lexer};
use super::objects::{PdfDictionary, PdfObject};

lazy_static! {
    static ref OBJ_HEADER: Regex =
        Regex::new(r"(?-u)(\d+)[ \t\r\n]+(\d+)[ \t\r\n]+obj\b").expect("valid regex");
}

/// Object identity: object number plus generation number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    pub number: u32,
    pub generation: u16,
}

impl ObjectId {
    pub fn new(number: u32, generation: u16) -> Self {
        Self { number, generation }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.generation)
    }
}

/// Stream payload attached to an object
#[derive(Debug, Clone)]
pub struct StreamPayload {
    /// Decompressed bytes when a Flate pass succeeded, raw bytes otherwise
    pub data: Vec<u8>,
    /// Whether `data` is the decoded form
    pub decoded: bool,
}

/// One table entry per recognized `obj ... endobj` span
#[derive(Debug, Clone, Default)]
pub struct ObjectEntry {
    /// Parsed object body. Usually a dictionary; bare arrays, numbers and
    /// strings are kept too so indirect references to them resolve.
    pub object: Option<PdfObject>,
    /// Stream payload, when the span carried `stream ... endstream`
    pub stream: Option<StreamPayload>,
    /// Raw span text (Latin-1), kept only when parsing failed
    pub raw: Option<String>,
}

impl ObjectEntry {
    /// The entry's dictionary, when its body parsed as one
    pub fn dict(&self) -> Option<&PdfDictionary> {
        self.object.as_ref().and_then(|obj| obj.as_dict())
    }
}

/// The document's object table, ordered by object id
#[derive(Debug, Default)]
pub struct ObjectTable {
    entries: BTreeMap<ObjectId, ObjectEntry>,
}

impl ObjectTable {
    /// Scan `bytes` and build the table. Returns the table together with
    /// the warnings accumulated along the way.
    pub fn build(bytes: &[u8], inflater: &Inflater) -> (Self, Vec<String>) {
        let mut entries = BTreeMap::new();
        let mut warnings = Vec::new();

        for captures in OBJ_HEADER.captures_iter(bytes) {
            let header = captures.get(0).expect("whole match");
            let number = match parse_capture_u32(&captures, 1) {
                Some(n) => n,
                None => continue,
            };
            let generation = match parse_capture_u32(&captures, 2) {
                Some(g) if g <= u16::MAX as u32 => g as u16,
                _ => continue,
            };
            let id = ObjectId::new(number, generation);

            let body_start = header.end();
            let span = match find_subsequence(&bytes[body_start..], b"endobj") {
                Some(offset) => &bytes[body_start..body_start + offset],
                None => {
                    warnings.push(format!("object {id}: missing endobj, skipped"));
                    continue;
                }
            };

            let entry = Self::parse_span(id, span, inflater, &mut warnings);
            entries.insert(id, entry);
        }

        tracing::debug!(objects = entries.len(), warnings = warnings.len(), "object table built");
        (Self { entries }, warnings)
    }

    fn parse_span(
        id: ObjectId,
        span: &[u8],
        inflater: &Inflater,
        warnings: &mut Vec<String>,
    ) -> ObjectEntry {
        let mut entry = ObjectEntry::default();

        let stream_span = locate_stream(span);
        let body = match stream_span {
            Some((keyword_pos, _, _)) => &span[..keyword_pos],
            None => span,
        };

        match PdfObject::parse(&mut Lexer::new(body)) {
            Ok(object) => entry.object = Some(object),
            Err(err) => {
                warnings.push(format!("object {id}: {err}"));
                entry.raw = Some(latin1(span));
            }
        }

        if let Some((_, data_start, data_end)) = stream_span {
            let raw = span[data_start..data_end].to_vec();
            let filters = entry.dict().map(filter_names).unwrap_or_default();

            let mut payload = StreamPayload {
                data: raw,
                decoded: false,
            };

            if filters.iter().any(|f| f == "FlateDecode") {
                let outcome = inflater.inflate(&payload.data);
                if outcome.method.is_some() {
                    payload.data = outcome.data;
                    payload.decoded = true;
                } else {
                    tracing::warn!(object = %id, "FlateDecode failed");
                    warnings.push(format!(
                        "object {id}: FlateDecode failed, keeping raw stream bytes"
                    ));
                }
            }
            for name in filters.iter().filter(|f| f.as_str() != "FlateDecode") {
                if Filter::from_name(name).is_some() {
                    warnings.push(format!("object {id}: unsupported filter /{name}"));
                } else {
                    warnings.push(format!("object {id}: unknown filter /{name}"));
                }
            }

            entry.stream = Some(payload);
        }

        entry
    }

    /// Look up an entry by id
    pub fn entry(&self, id: ObjectId) -> Option<&ObjectEntry> {
        self.entries.get(&id)
    }

    /// Look up an entry's parsed object body
    pub fn object(&self, id: ObjectId) -> Option<&PdfObject> {
        self.entries.get(&id).and_then(|e| e.object.as_ref())
    }

    /// Look up an entry's dictionary
    pub fn dict(&self, id: ObjectId) -> Option<&PdfDictionary> {
        self.entries.get(&id).and_then(|e| e.dict())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &ObjectEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }
}

/// Locate a `stream ... endstream` sub-span.
///
/// Returns (keyword position, payload start, payload end). The keyword must
/// sit after a delimiter (rejecting the tail of `endstream`) and be followed
/// by an EOL sequence; the payload begins right after that EOL and ends at
/// `endstream`, with one trailing EOL stripped since it is not stream data.
fn locate_stream(span: &[u8]) -> Option<(usize, usize, usize)> {
    let mut search_from = 0;
    while let Some(offset) = find_subsequence(&span[search_from..], b"stream") {
        let keyword_pos = search_from + offset;
        search_from = keyword_pos + 1;

        if keyword_pos > 0 && !is_token_boundary(span[keyword_pos - 1]) {
            continue;
        }

        let after = keyword_pos + b"stream".len();
        let data_start = match span.get(after) {
            Some(b'\r') if span.get(after + 1) == Some(&b'\n') => after + 2,
            Some(b'\r') | Some(b'\n') => after + 1,
            _ => continue,
        };

        let data_end = match find_subsequence(&span[data_start..], b"endstream") {
            Some(end_offset) => data_start + end_offset,
            None => return None,
        };

        return Some((keyword_pos, data_start, trim_trailing_eol(span, data_start, data_end)));
    }
    None
}

fn trim_trailing_eol(span: &[u8], start: usize, end: usize) -> usize {
    if end >= start + 2 && &span[end - 2..end] == b"\r\n" {
        end - 2
    } else if end > start && matches!(span[end - 1], b'\r' | b'\n') {
        end - 1
    } else {
        end
    }
}

fn is_token_boundary(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t' | b'\r' | b'\n' | b'\x0C' | b'>' | b']')
}

fn parse_capture_u32(captures: &regex::bytes::Captures<'_>, index: usize) -> Option<u32> {
    let text = std::str::from_utf8(captures.get(index)?.as_bytes()).ok()?;
    text.parse().ok()
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn build(bytes: &[u8]) -> (ObjectTable, Vec<String>) {
        ObjectTable::build(bytes, &Inflater::default())
    }

    #[test]
    fn test_build_simple_table() {
        let doc = b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n\
                    2 0 obj\n<< /Type /Pages /Count 0 >>\nendobj\n";
        let (table, warnings) = build(doc);

        assert_eq!(table.len(), 2);
        assert!(warnings.is_empty());
        let catalog = table.dict(ObjectId::new(1, 0)).unwrap();
        assert_eq!(catalog.get_type(), Some("Catalog"));
        assert_eq!(catalog.get("Pages").unwrap().as_reference(), Some((2, 0)));
    }

    #[test]
    fn test_missing_endobj_is_skipped() {
        let doc = b"1 0 obj\n<< /Type /Catalog >>\n";
        let (table, warnings) = build(doc);
        assert!(table.is_empty());
        assert!(warnings.iter().any(|w| w.contains("1 0") && w.contains("endobj")));
    }

    #[test]
    fn test_malformed_object_keeps_raw_fallback() {
        let doc = b"1 0 obj\n<< (notaname) /Value >>\nendobj\n\
                    2 0 obj\n<< /Type /Pages >>\nendobj\n";
        let (table, warnings) = build(doc);

        assert_eq!(table.len(), 2);
        assert!(warnings.iter().any(|w| w.starts_with("object 1 0")));

        let bad = table.entry(ObjectId::new(1, 0)).unwrap();
        assert!(bad.object.is_none());
        assert!(bad.raw.as_deref().unwrap().contains("notaname"));

        assert!(table.dict(ObjectId::new(2, 0)).is_some());
    }

    #[test]
    fn test_non_dictionary_object_is_kept() {
        let doc = b"3 0 obj\n[1 2 3]\nendobj\n";
        let (table, _) = build(doc);
        let entry = table.entry(ObjectId::new(3, 0)).unwrap();
        let array = entry.object.as_ref().unwrap().as_array().unwrap();
        assert_eq!(array.len(), 3);
    }

    #[test]
    fn test_flate_stream_is_decoded() {
        let content = b"BT /F1 12 Tf (Hi) Tj ET";
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut doc = Vec::new();
        doc.extend_from_slice(
            format!(
                "4 0 obj\n<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            )
            .as_bytes(),
        );
        doc.extend_from_slice(&compressed);
        doc.extend_from_slice(b"\nendstream\nendobj\n");

        let (table, warnings) = build(&doc);
        assert!(warnings.is_empty());
        let stream = table.entry(ObjectId::new(4, 0)).unwrap().stream.as_ref().unwrap();
        assert!(stream.decoded);
        assert_eq!(stream.data, content);
    }

    #[test]
    fn test_flate_failure_keeps_raw_bytes() {
        let doc = b"5 0 obj\n<< /Filter /FlateDecode >>\nstream\n\xde\xad\xbe\xef\nendstream\nendobj\n";
        let (table, warnings) = build(doc);

        let stream = table.entry(ObjectId::new(5, 0)).unwrap().stream.as_ref().unwrap();
        assert!(!stream.decoded);
        assert_eq!(stream.data, b"\xde\xad\xbe\xef");
        assert!(warnings.iter().any(|w| w.contains("5 0") && w.contains("FlateDecode")));
    }

    #[test]
    fn test_unsupported_filter_warns_and_keeps_bytes() {
        let doc = b"6 0 obj\n<< /Filter /LZWDecode >>\nstream\nabc\nendstream\nendobj\n";
        let (table, warnings) = build(doc);

        let stream = table.entry(ObjectId::new(6, 0)).unwrap().stream.as_ref().unwrap();
        assert!(!stream.decoded);
        assert_eq!(stream.data, b"abc");
        assert!(warnings.iter().any(|w| w.contains("unsupported filter /LZWDecode")));
    }

    #[test]
    fn test_unknown_filter_warns_distinctly() {
        let doc = b"8 0 obj\n<< /Filter /NoSuchFilter >>\nstream\nabc\nendstream\nendobj\n";
        let (_, warnings) = build(doc);
        assert!(warnings.iter().any(|w| w.contains("unknown filter /NoSuchFilter")));
    }

    #[test]
    fn test_uncompressed_stream_kept_verbatim() {
        let doc = b"7 0 obj\n<< /Length 5 >>\nstream\r\nhello\nendstream\nendobj\n";
        let (table, _) = build(doc);
        let stream = table.entry(ObjectId::new(7, 0)).unwrap().stream.as_ref().unwrap();
        assert_eq!(stream.data, b"hello");
    }

    #[test]
    fn test_duplicate_object_id_keeps_last() {
        let doc = b"1 0 obj\n<< /Version 1 >>\nendobj\n1 0 obj\n<< /Version 2 >>\nendobj\n";
        let (table, _) = build(doc);
        assert_eq!(table.len(), 1);
        let dict = table.dict(ObjectId::new(1, 0)).unwrap();
        assert_eq!(dict.get("Version").unwrap().as_integer(), Some(2));
    }
}
