//! namegraph Extractor - Person names and their co-occurrence
//!
//! Runs entity recognition over book text, canonicalizes person names,
//! ranks them by frequency and counts which names share a sentence or a
//! paragraph.

use namegraph_core::Result;

pub mod cooccurrence;
pub mod names;
pub mod ner;
pub mod pipeline;
pub mod segment;

pub use cooccurrence::CooccurrenceBuilder;
pub use names::{
    extract_names, extract_names_from_file, normalize_newlines, read_text_from, FrequencyTable,
};
pub use ner::{EntityLabel, Lexicon, RuleBasedNer};
pub use pipeline::{analyze_text, run_analysis, Analysis};
pub use segment::{split_paragraphs, split_sentences, TextSpan};

/// Extracted entity from text
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedEntity {
    pub text: String,
    pub entity_type: EntityLabel,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    pub confidence: f32,
}

impl ExtractedEntity {
    pub fn is_person(&self) -> bool {
        self.entity_type == EntityLabel::Person
    }
}

/// Trait for entity recognizers.
///
/// The recognizer is the only place that decides what a name is; everything
/// downstream only sees labelled spans and sentence boundaries.
pub trait EntityExtractor: Send + Sync {
    /// Labelled spans in order of appearance
    fn extract(&self, text: &str) -> Result<Vec<ExtractedEntity>>;

    /// Sentence boundaries, as trimmed byte ranges
    fn sentences(&self, text: &str) -> Vec<TextSpan> {
        split_sentences(text, &Default::default())
    }

    /// Only the spans labelled as persons
    fn persons(&self, text: &str) -> Result<Vec<ExtractedEntity>> {
        Ok(self
            .extract(text)?
            .into_iter()
            .filter(ExtractedEntity::is_person)
            .collect())
    }
}
