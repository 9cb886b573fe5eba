//! End-to-end analysis: text → frequency table → subjects → two graphs

use namegraph_core::{AnalysisConfig, AppConfig, NameTables, Result, SegmentLevel};
use namegraph_graph::CooccurrenceGraph;

use crate::cooccurrence::CooccurrenceBuilder;
use crate::names::{extract_names, normalize_newlines, read_text_from, FrequencyTable};
use crate::EntityExtractor;

/// Everything the dashboard shows, computed once at startup
#[derive(Debug, Clone)]
pub struct Analysis {
    pub frequencies: FrequencyTable,
    /// Subjects of interest, most frequent first
    pub subjects: Vec<String>,
    pub sentence_graph: CooccurrenceGraph,
    pub paragraph_graph: CooccurrenceGraph,
}

impl Analysis {
    pub fn graph(&self, level: SegmentLevel) -> &CooccurrenceGraph {
        match level {
            SegmentLevel::Sentence => &self.sentence_graph,
            SegmentLevel::Paragraph => &self.paragraph_graph,
        }
    }

    /// Subjects paired with their frequencies
    pub fn ranked_subjects(&self) -> Vec<(&str, u32)> {
        self.subjects
            .iter()
            .map(|name| (name.as_str(), self.frequencies.count(name)))
            .collect()
    }
}

/// Run the analysis on text that has already been read
pub fn analyze_text(
    text: &str,
    settings: &AnalysisConfig,
    tables: &NameTables,
    recognizer: &dyn EntityExtractor,
) -> Result<Analysis> {
    let text = normalize_newlines(text);
    let text = text.as_ref();
    let frequencies = extract_names(text, recognizer, tables)?;
    let subjects = frequencies.subjects(settings.top_n);
    tracing::info!("Subjects of interest: {}", subjects.join(", "));

    let builder = CooccurrenceBuilder::new(recognizer, tables, subjects.iter().cloned())
        .with_match_mode(settings.match_mode)
        .with_strategy(settings.strategy);
    let sentence_graph = builder.build(text, SegmentLevel::Sentence)?;
    let paragraph_graph = builder.build(text, SegmentLevel::Paragraph)?;

    Ok(Analysis {
        frequencies,
        subjects,
        sentence_graph,
        paragraph_graph,
    })
}

/// Read the configured text file and run the analysis on it
pub fn run_analysis(config: &AppConfig, recognizer: &dyn EntityExtractor) -> Result<Analysis> {
    tracing::info!(
        "Analysing {} from line {}",
        config.input.text_path.display(),
        config.analysis.start_line
    );
    let text = read_text_from(&config.input.text_path, config.analysis.start_line)?;
    analyze_text(&text, &config.analysis, &config.names, recognizer)
}
