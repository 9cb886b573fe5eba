//! namegraph Core - Shared types for the name co-occurrence pipeline
//!
//! This crate defines what the other crates agree on:
//! - The pipeline error type and its diagnosable kinds
//! - Configuration management
//! - The static name tables (canonical map, exclusions, highlights)
//! - Segment granularity

pub mod config;
pub mod names;

pub use config::{
    AnalysisConfig, AppConfig, ConfigError, DashboardConfig, InputConfig, LoggingConfig,
    MatchMode, ModelConfig, RecognitionStrategy, ServerConfig, CYTOSCAPE_CDN,
};
pub use names::NameTables;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while turning a book into co-occurrence graphs
#[derive(Error, Debug)]
pub enum NamegraphError {
    /// An input file does not exist
    #[error("Input not found: {0}")]
    InputNotFound(String),

    /// The e-book container could not be opened or is malformed
    #[error("Unreadable container: {0}")]
    UnreadableContainer(String),

    /// The entity recognizer could not be initialised
    #[error("Entity recognition model unavailable: {0}")]
    ModelUnavailable(String),

    /// Nothing is left to analyse after skipping front matter
    #[error("No text to analyse in {0} after the configured line offset")]
    EmptyText(String),

    /// IO failure on a specific path
    #[error("IO error on {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NamegraphError {
    /// Stable, machine-readable kind used in logs and API error codes
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InputNotFound(_) => "input-not-found",
            Self::UnreadableContainer(_) => "unreadable-container",
            Self::ModelUnavailable(_) => "model-unavailable",
            Self::EmptyText(_) => "degenerate-empty-text",
            Self::Io { .. } => "io",
            Self::Config(_) => "config",
            Self::Other(_) => "other",
        }
    }

    /// Map an IO error on `path`, promoting `NotFound` to `InputNotFound`
    pub fn from_io(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::InputNotFound(path)
        } else {
            Self::Io { path, source }
        }
    }
}

impl From<ConfigError> for NamegraphError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NamegraphError>;

// ============================================================================
// Segments
// ============================================================================

/// Granularity at which co-occurrence is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentLevel {
    Sentence,
    Paragraph,
}

impl SegmentLevel {
    pub const ALL: [SegmentLevel; 2] = [SegmentLevel::Sentence, SegmentLevel::Paragraph];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sentence => "sentence",
            Self::Paragraph => "paragraph",
        }
    }

    /// Human-readable prefix used in the hover readout
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Sentence => "Sentence Level",
            Self::Paragraph => "Paragraph Level",
        }
    }
}

impl std::fmt::Display for SegmentLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SegmentLevel {
    type Err = NamegraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sentence" | "sent" => Ok(Self::Sentence),
            "paragraph" | "para" => Ok(Self::Paragraph),
            other => Err(NamegraphError::Config(format!(
                "unknown segment level: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_distinct() {
        let errors = [
            NamegraphError::InputNotFound("a.epub".into()),
            NamegraphError::UnreadableContainer("bad zip".into()),
            NamegraphError::ModelUnavailable("no lexicon".into()),
            NamegraphError::EmptyText("a.txt".into()),
        ];
        let kinds: std::collections::HashSet<_> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn test_from_io_promotes_not_found() {
        let err = NamegraphError::from_io(
            "missing.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.kind(), "input-not-found");

        let err = NamegraphError::from_io(
            "locked.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        );
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn test_segment_level_parse() {
        assert_eq!("sentence".parse::<SegmentLevel>().unwrap(), SegmentLevel::Sentence);
        assert_eq!("Paragraph".parse::<SegmentLevel>().unwrap(), SegmentLevel::Paragraph);
        assert!("chapter".parse::<SegmentLevel>().is_err());
        assert_eq!(SegmentLevel::Sentence.display_name(), "Sentence Level");
    }
}
