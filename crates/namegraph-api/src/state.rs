//! Application state management

use std::path::Path;
use std::time::Instant;

use namegraph_core::{AppConfig, InputConfig, Result, SegmentLevel};
use namegraph_extractor::{analyze_text, run_analysis, Analysis, RuleBasedNer};
use namegraph_parser::convert_to_text;

use crate::dashboard::render_dashboard;
use crate::stylesheet::{build_stylesheet, StyleRule};

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Frequencies, subjects and both graphs
    pub analysis: Analysis,
    /// Rendered dashboard page
    pub dashboard_html: String,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Create state around a finished analysis
    pub fn new(config: AppConfig, analysis: Analysis) -> Self {
        let dashboard_html = render_dashboard(&config.dashboard);
        Self {
            config,
            analysis,
            dashboard_html,
            start_time: Instant::now(),
        }
    }

    /// Run the whole pipeline for a configuration.
    ///
    /// Converts the e-book first when the text file does not exist yet.
    pub fn prepare(config: AppConfig) -> Result<Self> {
        prepare_text(&config.input)?;
        let recognizer = RuleBasedNer::from_config(&config.model, &config.names)?;
        let analysis = run_analysis(&config, &recognizer)?;
        Ok(Self::new(config, analysis))
    }

    /// Analyse text held in memory instead of the configured file
    pub fn from_text(config: AppConfig, text: &str) -> Result<Self> {
        let recognizer = RuleBasedNer::from_config(&config.model, &config.names)?;
        let analysis = analyze_text(text, &config.analysis, &config.names, &recognizer)?;
        Ok(Self::new(config, analysis))
    }

    /// Stylesheet for one level's diagram
    pub fn stylesheet(&self, level: SegmentLevel) -> Vec<StyleRule> {
        build_stylesheet(
            &self.config.dashboard,
            &self.config.names.highlight,
            self.analysis.graph(level).max_weight(),
        )
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Write the plain-text file from the e-book if it is missing
pub fn prepare_text(input: &InputConfig) -> Result<()> {
    if input.text_path.exists() {
        return Ok(());
    }
    let Some(epub_path) = input.epub_path.as_deref() else {
        return Ok(());
    };
    convert(epub_path, &input.text_path)
}

fn convert(epub_path: &Path, text_path: &Path) -> Result<()> {
    tracing::info!(
        "{} not found, extracting it from {}",
        text_path.display(),
        epub_path.display()
    );
    convert_to_text(epub_path, text_path)?;
    Ok(())
}
