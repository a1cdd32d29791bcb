//! Heading and section reconstruction
//!
//! Groups text items into sections by relative font size: the two largest
//! distinct sizes observed are the heading tiers, everything else is body
//! text. A known limitation, kept deliberately: documents set in a single
//! size put every line in the heading tier, and documents with many sizes
//! misplace some headings. Callers rely on this exact two-tier behavior.

use super::extraction::TextItem;

/// Font sizes closer than this are the same tier
const SIZE_TOLERANCE: f64 = 0.1;

/// Ratio for the synthetic second tier when only one size exists
const FALLBACK_H2_RATIO: f64 = 0.8;

/// Title of the implicit section for body text before any heading
const IMPLICIT_SECTION_TITLE: &str = "Document";

/// A titled run of body text
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    /// Heading text that opened the section
    pub title: String,
    /// Newline-joined body items
    pub content: String,
}

/// Group items into sections and surface the document title.
///
/// Returns the titles list (the first section's title, when any section
/// exists) and the sections in reading order.
pub fn build_headings_and_sections(items: &[TextItem]) -> (Vec<String>, Vec<Section>) {
    if items.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let mut sizes: Vec<f64> = Vec::new();
    for item in items {
        if !sizes
            .iter()
            .any(|size| (size - item.font_size).abs() <= SIZE_TOLERANCE)
        {
            sizes.push(item.font_size);
        }
    }
    sizes.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let h1_size = sizes[0];
    let h2_size = sizes.get(1).copied().unwrap_or(h1_size * FALLBACK_H2_RATIO);

    let mut sections: Vec<Section> = Vec::new();
    let mut current: Option<Section> = None;

    for item in items {
        let is_heading = (item.font_size - h1_size).abs() <= SIZE_TOLERANCE
            || (item.font_size - h2_size).abs() <= SIZE_TOLERANCE;

        if is_heading {
            if let Some(section) = current.take() {
                sections.push(section);
            }
            current = Some(Section {
                title: item.text.clone(),
                content: String::new(),
            });
        } else {
            let section = current.get_or_insert_with(|| Section {
                title: IMPLICIT_SECTION_TITLE.to_string(),
                content: String::new(),
            });
            if !section.content.is_empty() {
                section.content.push('\n');
            }
            section.content.push_str(&item.text);
        }
    }

    if let Some(section) = current {
        sections.push(section);
    }

    let titles = sections
        .first()
        .map(|section| vec![section.title.clone()])
        .unwrap_or_default();

    (titles, sections)
}
