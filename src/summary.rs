//! Prompt-ready rendering of a parse result.

use crate::ParsedDocument;

/// Sections listed beyond this count are elided
const MAX_SECTIONS: usize = 10;

/// Section content longer than this many characters is truncated
const MAX_CONTENT_CHARS: usize = 200;

impl ParsedDocument {
    /// Render a compact plain-text summary: the document title, the first
    /// sections with truncated content, and every form field with its
    /// current value.
    pub fn prompt_summary(&self) -> String {
        let mut out = String::new();

        if !self.titles.is_empty() {
            out.push_str("Title: ");
            out.push_str(&self.titles.join(" | "));
            out.push('\n');
        }

        if !self.sections.is_empty() {
            out.push_str("Sections:\n");
            for section in self.sections.iter().take(MAX_SECTIONS) {
                out.push_str("- ");
                out.push_str(&section.title);
                out.push_str(": ");
                out.push_str(&truncate_chars(&section.content, MAX_CONTENT_CHARS));
                out.push('\n');
            }
        }

        if !self.form_fields.is_empty() {
            out.push_str("Form fields:\n");
            for field in &self.form_fields {
                out.push_str("- ");
                out.push_str(&field.name);
                out.push_str(" [");
                out.push_str(field.field_type.as_str());
                out.push(']');
                if let Some(value) = &field.value {
                    out.push_str(" = ");
                    out.push_str(value);
                }
                out.push('\n');
            }
        }

        out
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    let mut truncated: String = text.chars().take(limit).collect();
    if text.chars().count() > limit {
        truncated.push('…');
    }
    truncated
}

#[cfg(test)]
mod tests {
    use crate::forms::{FieldType, FormField};
    use crate::text::Section;
    use crate::ParsedDocument;

    fn result() -> ParsedDocument {
        ParsedDocument {
            raw_text: String::new(),
            titles: vec!["Form A".to_string()],
            sections: vec![Section {
                title: "S1".to_string(),
                content: "x".repeat(250),
            }],
            form_fields: vec![FormField {
                name: "f1".to_string(),
                field_type: FieldType::Text,
                value: Some("v1".to_string()),
            }],
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_summary_sections_and_fields() {
        let summary = result().prompt_summary();

        assert!(summary.contains("Title: Form A"));
        let expected_section = format!("- S1: {}…", "x".repeat(200));
        assert!(summary.contains(&expected_section));
        assert!(summary.contains("- f1 [Text] = v1"));
    }

    #[test]
    fn test_summary_skips_empty_blocks() {
        let empty = ParsedDocument {
            raw_text: String::new(),
            titles: Vec::new(),
            sections: Vec::new(),
            form_fields: Vec::new(),
            warnings: Vec::new(),
        };
        assert_eq!(empty.prompt_summary(), "");
    }

    #[test]
    fn test_summary_caps_section_count() {
        let mut doc = result();
        doc.sections = (0..15)
            .map(|i| crate::text::Section {
                title: format!("S{i}"),
                content: "c".to_string(),
            })
            .collect();
        let summary = doc.prompt_summary();
        assert!(summary.contains("- S9: c"));
        assert!(!summary.contains("- S10: c"));
    }

    #[test]
    fn test_summary_field_without_value() {
        let mut doc = result();
        doc.form_fields[0].value = None;
        let summary = doc.prompt_summary();
        assert!(summary.contains("- f1 [Text]\n"));
    }

    #[test]
    fn test_short_content_not_truncated() {
        let mut doc = result();
        doc.sections[0].content = "short".to_string();
        let summary = doc.prompt_summary();
        assert!(summary.contains("- S1: short\n"));
    }
}
