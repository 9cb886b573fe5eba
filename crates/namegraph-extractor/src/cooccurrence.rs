//! Co-occurrence counting
//!
//! Segments text by sentence or by paragraph, finds which subjects of
//! interest each segment mentions, and counts every unordered pair once per
//! segment.

use std::collections::BTreeSet;

use namegraph_core::{MatchMode, NameTables, RecognitionStrategy, Result, SegmentLevel};
use namegraph_graph::{CooccurrenceGraph, PairCounts};

use crate::segment::{split_paragraphs, TextSpan};
use crate::EntityExtractor;

/// Builds co-occurrence graphs over a fixed subject list
pub struct CooccurrenceBuilder<'a> {
    recognizer: &'a dyn EntityExtractor,
    tables: &'a NameTables,
    subjects: BTreeSet<String>,
    match_mode: MatchMode,
    strategy: RecognitionStrategy,
}

impl<'a> CooccurrenceBuilder<'a> {
    pub fn new(
        recognizer: &'a dyn EntityExtractor,
        tables: &'a NameTables,
        subjects: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            recognizer,
            tables,
            subjects: subjects.into_iter().map(Into::into).collect(),
            match_mode: MatchMode::default(),
            strategy: RecognitionStrategy::default(),
        }
    }

    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    pub fn with_strategy(mut self, strategy: RecognitionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn subjects(&self) -> &BTreeSet<String> {
        &self.subjects
    }

    /// Segment boundaries for a level
    pub fn segments(&self, text: &str, level: SegmentLevel) -> Vec<TextSpan> {
        match level {
            SegmentLevel::Sentence => self.recognizer.sentences(text),
            SegmentLevel::Paragraph => split_paragraphs(text),
        }
    }

    /// The subject a detected span stands for, if any
    fn match_subject<'s>(&'s self, span_text: &'s str) -> Option<&'s str> {
        let name = match self.match_mode {
            MatchMode::Canonical => self.tables.resolve(span_text)?,
            MatchMode::Exact => span_text,
        };
        self.subjects.get(name).map(String::as_str)
    }

    /// Count, for every subject pair, the segments mentioning both
    pub fn count_pairs(&self, text: &str, level: SegmentLevel) -> Result<PairCounts> {
        let segments = self.segments(text, level);
        let mut counts = PairCounts::new();

        match self.strategy {
            RecognitionStrategy::PerSegment => {
                for segment in &segments {
                    let persons = self.recognizer.persons(segment.slice(text))?;
                    let matched: Vec<&str> = persons
                        .iter()
                        .filter_map(|entity| self.match_subject(&entity.text))
                        .collect();
                    counts.record_segment(matched);
                }
            }
            RecognitionStrategy::Bucketed => {
                let persons = self.recognizer.persons(text)?;
                let mut buckets: Vec<Vec<&str>> = vec![Vec::new(); segments.len()];
                for entity in &persons {
                    let idx = segments.partition_point(|s| s.end <= entity.start);
                    let Some(segment) = segments.get(idx) else {
                        continue;
                    };
                    if !segment.contains(entity.start) {
                        continue;
                    }
                    if let Some(name) = self.match_subject(&entity.text) {
                        buckets[idx].push(name);
                    }
                }
                for bucket in buckets {
                    counts.record_segment(bucket);
                }
            }
        }

        tracing::debug!(
            "{}: {} segments, {} co-occurring pairs",
            level.display_name(),
            segments.len(),
            counts.len()
        );
        Ok(counts)
    }

    /// Build the co-occurrence graph for a level
    pub fn build(&self, text: &str, level: SegmentLevel) -> Result<CooccurrenceGraph> {
        let counts = self.count_pairs(text, level)?;
        let graph = CooccurrenceGraph::from_counts(level, &counts);
        tracing::info!(
            "{} graph: {} nodes, {} edges",
            level.display_name(),
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleBasedNer;
    use proptest::prelude::*;

    const SCENARIO: &str = "Jack talked to Carl Solomon. Later, Ginsberg wrote to Carl.";

    fn tables() -> NameTables {
        NameTables::new()
            .with_alias("Jack", "Jack Kerouac")
            .with_alias("Ginsberg", "Allen Ginsberg")
    }

    fn subjects() -> Vec<&'static str> {
        vec!["Jack Kerouac", "Carl Solomon", "Allen Ginsberg"]
    }

    fn ner(tables: &NameTables) -> RuleBasedNer {
        RuleBasedNer::new().with_known_names(tables.known_forms())
    }

    #[test]
    fn test_sentence_scenario() {
        let tables = tables();
        let ner = ner(&tables);
        let builder = CooccurrenceBuilder::new(&ner, &tables, subjects());
        let graph = builder.build(SCENARIO, SegmentLevel::Sentence).unwrap();

        assert_eq!(graph.weight("Jack Kerouac", "Carl Solomon"), Some(1));
        assert_eq!(graph.weight("Allen Ginsberg", "Jack Kerouac"), None);
        assert_eq!(graph.weight("Allen Ginsberg", "Carl Solomon"), None);
        assert!(!graph.contains_node("Allen Ginsberg"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_paragraph_scenario() {
        let tables = tables();
        let ner = ner(&tables);
        let builder = CooccurrenceBuilder::new(&ner, &tables, subjects());
        let graph = builder.build(SCENARIO, SegmentLevel::Paragraph).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.weight("Jack Kerouac", "Carl Solomon"), Some(1));
        assert_eq!(graph.weight("Jack Kerouac", "Allen Ginsberg"), Some(1));
        assert_eq!(graph.weight("Carl Solomon", "Allen Ginsberg"), Some(1));
    }

    #[test]
    fn test_bucketed_strategy_matches_scenario() {
        let tables = tables();
        let ner = ner(&tables);
        let builder = CooccurrenceBuilder::new(&ner, &tables, subjects())
            .with_strategy(RecognitionStrategy::Bucketed);

        let sentence = builder.count_pairs(SCENARIO, SegmentLevel::Sentence).unwrap();
        assert_eq!(sentence.len(), 1);
        assert_eq!(sentence.get("Carl Solomon", "Jack Kerouac"), 1);

        let paragraph = builder.count_pairs(SCENARIO, SegmentLevel::Paragraph).unwrap();
        assert_eq!(paragraph.len(), 3);
    }

    #[test]
    fn test_exact_mode_requires_canonical_text() {
        let tables = tables();
        let ner = ner(&tables);
        let builder = CooccurrenceBuilder::new(&ner, &tables, subjects())
            .with_match_mode(MatchMode::Exact);

        assert!(builder.count_pairs(SCENARIO, SegmentLevel::Paragraph).unwrap().is_empty());

        let text = "Jack Kerouac talked to Carl Solomon.";
        let counts = builder.count_pairs(text, SegmentLevel::Sentence).unwrap();
        assert_eq!(counts.get("Jack Kerouac", "Carl Solomon"), 1);
    }

    #[test]
    fn test_excluded_names_never_match() {
        let tables = tables().with_excluded("Carl Solomon");
        let ner = ner(&tables);
        let builder = CooccurrenceBuilder::new(&ner, &tables, subjects());
        let counts = builder.count_pairs(SCENARIO, SegmentLevel::Paragraph).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("Jack Kerouac", "Allen Ginsberg"), 1);
    }

    #[test]
    fn test_repeated_mentions_count_once_per_segment() {
        let tables = tables();
        let ner = ner(&tables);
        let builder = CooccurrenceBuilder::new(&ner, &tables, subjects());
        let text = "Jack met Carl Solomon. Jack and Carl Solomon left.\n\nCarl Solomon stayed with Jack.";

        let paragraph = builder.count_pairs(text, SegmentLevel::Paragraph).unwrap();
        assert_eq!(paragraph.get("Jack Kerouac", "Carl Solomon"), 2);

        let sentence = builder.count_pairs(text, SegmentLevel::Sentence).unwrap();
        assert_eq!(sentence.get("Jack Kerouac", "Carl Solomon"), 3);
    }

    #[test]
    fn test_strategies_agree_across_paragraphs() {
        let tables = tables();
        let ner = ner(&tables);
        let text = "Jack talked to Carl Solomon. Later, Ginsberg wrote to Carl Solomon.\n\n\
                    Ginsberg met Jack at dawn. Carl Solomon slept.\n\n\
                    Jack, Ginsberg and Carl Solomon drove west. ";

        let per_segment = CooccurrenceBuilder::new(&ner, &tables, subjects());
        let bucketed = CooccurrenceBuilder::new(&ner, &tables, subjects())
            .with_strategy(RecognitionStrategy::Bucketed);

        for level in [SegmentLevel::Sentence, SegmentLevel::Paragraph] {
            let expected = per_segment.count_pairs(text, level).unwrap();
            let actual = bucketed.count_pairs(text, level).unwrap();
            assert_eq!(actual, expected, "{}", level.display_name());
        }

        let sentence = bucketed.count_pairs(text, SegmentLevel::Sentence).unwrap();
        assert_eq!(sentence.get("Jack Kerouac", "Carl Solomon"), 2);
        assert_eq!(sentence.get("Allen Ginsberg", "Carl Solomon"), 2);
        assert_eq!(sentence.get("Allen Ginsberg", "Jack Kerouac"), 2);
    }

    const POOL: [&str; 4] = ["Neal Cassady", "Allen Ginsberg", "Gregory Corso", "Carl Solomon"];

    proptest! {
        #[test]
        fn prop_paragraph_weights_count_shared_paragraphs(
            paragraphs in prop::collection::vec(
                prop::collection::vec(prop::sample::select(POOL.to_vec()), 1..4),
                1..8,
            ),
            bucketed in any::<bool>(),
        ) {
            let tables = NameTables::new();
            let ner = RuleBasedNer::new().with_known_names(POOL);
            let strategy = if bucketed {
                RecognitionStrategy::Bucketed
            } else {
                RecognitionStrategy::PerSegment
            };
            let builder = CooccurrenceBuilder::new(&ner, &tables, POOL).with_strategy(strategy);

            let text = paragraphs
                .iter()
                .map(|names| names.join(" and "))
                .collect::<Vec<_>>()
                .join("\n\n");
            let graph = builder.build(&text, SegmentLevel::Paragraph).unwrap();

            for a in POOL {
                for b in POOL {
                    if a == b {
                        continue;
                    }
                    let shared = paragraphs
                        .iter()
                        .filter(|p| p.contains(&a) && p.contains(&b))
                        .count() as u32;
                    prop_assert_eq!(graph.weight(a, b).unwrap_or(0), shared);
                    prop_assert_eq!(graph.weight(a, b), graph.weight(b, a));
                }
            }
        }
    }
}
