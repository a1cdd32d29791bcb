//! PDF Content Stream Parser
//!
//! Re-tokenizes decompressed page content as a restricted operator
//! language: only the text-object and text-showing operators are given
//! structure, everything else surfaces as [`ContentOperation::Other`] and
//! is ignored downstream. Graphics state, paths and color never matter to
//! text recovery, so their operands are parsed and dropped.

use super::lexer::{Lexer, Token};
use super::objects::{PdfObject, PdfString};

/// Operators recognized in a content stream
#[derive(Debug, Clone, PartialEq)]
pub enum ContentOperation {
    /// BT
    BeginText,
    /// ET
    EndText,
    /// Tf (font name is kept for debugging, only the size matters)
    SetFont(String, f64),
    /// Td
    MoveText(f64, f64),
    /// TD
    MoveTextSetLeading(f64, f64),
    /// T*
    NextLine,
    /// Tj
    ShowText(PdfString),
    /// TJ
    ShowTextArray(Vec<TextElement>),
    /// '
    NextLineShowText(PdfString),
    /// " (word spacing, char spacing, string)
    SetSpacingNextLineShowText(f64, f64, PdfString),
    /// Anything else, with whatever operands it had discarded
    Other(String),
}

/// One element of a TJ array
#[derive(Debug, Clone, PartialEq)]
pub enum TextElement {
    Text(PdfString),
    Spacing(f64),
}

/// Content stream parser
pub struct ContentParser;

impl ContentParser {
    /// Parse a content stream into its operations.
    ///
    /// Best-effort: a tokenizer error (binary garbage, truncated stream)
    /// stops the scan and returns the operations collected so far.
    pub fn parse_content(content: &[u8]) -> Vec<ContentOperation> {
        let mut lexer = Lexer::new(content);
        let mut operations = Vec::new();
        let mut operands: Vec<PdfObject> = Vec::new();

        loop {
            let token = match lexer.next_token() {
                Ok(Token::Eof) => break,
                Ok(token) => token,
                Err(err) => {
                    tracing::debug!(%err, "content stream tokenizer stopped early");
                    break;
                }
            };

            match token {
                Token::Keyword(op) if op == "BI" => {
                    // Inline image: skip the binary payload wholesale
                    operands.clear();
                    if !lexer.skip_until_sequence(b"EI") {
                        break;
                    }
                }
                Token::Keyword(op) => {
                    operations.push(Self::build_operation(&op, &mut operands));
                    operands.clear();
                }
                other => match PdfObject::parse_from_token(&mut lexer, other) {
                    Ok(obj) => operands.push(obj),
                    Err(err) => {
                        tracing::debug!(%err, "content stream operand parse stopped early");
                        break;
                    }
                },
            }
        }

        operations
    }

    /// Assemble one operation from its operand stack. Missing or mistyped
    /// operands degrade the operator to `Other` instead of erroring.
    fn build_operation(op: &str, operands: &mut Vec<PdfObject>) -> ContentOperation {
        match op {
            "BT" => ContentOperation::BeginText,
            "ET" => ContentOperation::EndText,
            "Tf" => match (pop_number(operands), pop_name(operands)) {
                (Some(size), Some(font)) => ContentOperation::SetFont(font, size),
                _ => ContentOperation::Other(op.to_string()),
            },
            "Td" => match (pop_number(operands), pop_number(operands)) {
                (Some(ty), Some(tx)) => ContentOperation::MoveText(tx, ty),
                _ => ContentOperation::Other(op.to_string()),
            },
            "TD" => match (pop_number(operands), pop_number(operands)) {
                (Some(ty), Some(tx)) => ContentOperation::MoveTextSetLeading(tx, ty),
                _ => ContentOperation::Other(op.to_string()),
            },
            "T*" => ContentOperation::NextLine,
            "Tj" => match pop_string(operands) {
                Some(text) => ContentOperation::ShowText(text),
                None => ContentOperation::Other(op.to_string()),
            },
            "TJ" => match pop_array(operands) {
                Some(elements) => ContentOperation::ShowTextArray(elements),
                None => ContentOperation::Other(op.to_string()),
            },
            "'" => match pop_string(operands) {
                Some(text) => ContentOperation::NextLineShowText(text),
                None => ContentOperation::Other(op.to_string()),
            },
            "\"" => {
                let text = pop_string(operands);
                let char_spacing = pop_number(operands);
                let word_spacing = pop_number(operands);
                match (word_spacing, char_spacing, text) {
                    (Some(aw), Some(ac), Some(text)) => {
                        ContentOperation::SetSpacingNextLineShowText(aw, ac, text)
                    }
                    _ => ContentOperation::Other(op.to_string()),
                }
            }
            _ => ContentOperation::Other(op.to_string()),
        }
    }
}

fn pop_number(operands: &mut Vec<PdfObject>) -> Option<f64> {
    match operands.pop() {
        Some(PdfObject::Integer(i)) => Some(i as f64),
        Some(PdfObject::Real(r)) => Some(r),
        _ => None,
    }
}

fn pop_name(operands: &mut Vec<PdfObject>) -> Option<String> {
    match operands.pop() {
        Some(PdfObject::Name(n)) => Some(n.0),
        _ => None,
    }
}

fn pop_string(operands: &mut Vec<PdfObject>) -> Option<PdfString> {
    match operands.pop() {
        Some(PdfObject::String(s)) => Some(s),
        _ => None,
    }
}

fn pop_array(operands: &mut Vec<PdfObject>) -> Option<Vec<TextElement>> {
    match operands.pop() {
        Some(PdfObject::Array(array)) => Some(
            array
                .0
                .into_iter()
                .filter_map(|obj| match obj {
                    PdfObject::String(s) => Some(TextElement::Text(s)),
                    PdfObject::Integer(i) => Some(TextElement::Spacing(i as f64)),
                    PdfObject::Real(r) => Some(TextElement::Spacing(r)),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    }
}
