//! Text recovery from content streams: the extraction state machine and
//! the font-size heading heuristic.

pub mod extraction;
pub mod layout;

pub use self::extraction::{extract_text_items, TextItem};
pub use self::layout::{build_headings_and_sections, Section};
