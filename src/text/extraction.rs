//! Text extraction from content streams
//!
//! Walks the restricted operator list and accumulates shown strings into
//! line-sized items tagged with the font size that was active when the
//! line flushed. No glyph metrics, no positioning math: line-break
//! operators and the text-object boundary are the only layout signals.

use crate::parser::{ContentOperation, ContentParser, TextElement};

/// Font size assumed until the first Tf
const DEFAULT_FONT_SIZE: f64 = 12.0;

/// One run of shown text between layout-breaking operators
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextItem {
    /// Whitespace-collapsed text
    pub text: String,
    /// Font size active when the run flushed
    pub font_size: f64,
}

/// Extract text items from one decompressed content stream.
///
/// Operators other than BT are ignored outside a text object. A stream
/// that ends inside BT still flushes its pending line.
pub fn extract_text_items(content: &[u8]) -> Vec<TextItem> {
    let mut items = Vec::new();
    let mut in_text = false;
    let mut font_size = DEFAULT_FONT_SIZE;
    let mut line = String::new();

    for operation in ContentParser::parse_content(content) {
        if !in_text {
            if operation == ContentOperation::BeginText {
                in_text = true;
            }
            continue;
        }

        match operation {
            ContentOperation::BeginText => {}
            ContentOperation::EndText => {
                flush_line(&mut line, font_size, &mut items);
                in_text = false;
            }
            ContentOperation::SetFont(_, size) => font_size = size,
            ContentOperation::ShowText(text) => line.push_str(&text.decode()),
            ContentOperation::ShowTextArray(elements) => {
                for element in elements {
                    if let TextElement::Text(text) = element {
                        line.push_str(&text.decode());
                    }
                }
            }
            ContentOperation::NextLineShowText(text) => {
                flush_line(&mut line, font_size, &mut items);
                line.push_str(&text.decode());
            }
            ContentOperation::SetSpacingNextLineShowText(_, _, text) => {
                flush_line(&mut line, font_size, &mut items);
                line.push_str(&text.decode());
            }
            ContentOperation::NextLine
            | ContentOperation::MoveText(_, _)
            | ContentOperation::MoveTextSetLeading(_, _) => {
                flush_line(&mut line, font_size, &mut items);
            }
            ContentOperation::Other(_) => {}
        }
    }

    flush_line(&mut line, font_size, &mut items);
    items
}

/// Trim, collapse internal whitespace runs to single spaces, and emit
/// the line as an item unless nothing is left
fn flush_line(line: &mut String, font_size: f64, items: &mut Vec<TextItem>) {
    let text = collapse_whitespace(line);
    line.clear();
    if !text.is_empty() {
        items.push(TextItem { text, font_size });
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
