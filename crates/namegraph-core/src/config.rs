//! namegraph Configuration Management
//!
//! Handles configuration from a TOML file and environment variables with
//! defaults matching the reference run (27 subjects, no line offset).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::names::NameTables;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Input and intermediate file locations
    pub input: InputConfig,

    /// Name extraction and co-occurrence settings
    pub analysis: AnalysisConfig,

    /// Canonical map, exclusions and highlight set
    pub names: NameTables,

    /// Entity recognizer assets
    pub model: ModelConfig,

    /// Dashboard server configuration
    pub server: ServerConfig,

    /// Dashboard presentation
    pub dashboard: DashboardConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables on top of defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError { path, message },
            other => other,
        })
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        self.apply_env()?;
        Ok(self)
    }

    /// Load the optional config file, apply env overrides, then validate
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env_override()?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analysis.top_n == 0 {
            return Err(ConfigError::InvalidValue {
                key: "analysis.top_n".to_string(),
                value: "0".to_string(),
            });
        }
        if self.dashboard.min_edge_width > self.dashboard.max_edge_width {
            return Err(ConfigError::InvalidValue {
                key: "dashboard.min_edge_width".to_string(),
                value: format!(
                    "{} exceeds max_edge_width {}",
                    self.dashboard.min_edge_width, self.dashboard.max_edge_width
                ),
            });
        }
        if let Some(dir) = &self.dashboard.assets_dir {
            if !dir.is_dir() {
                return Err(ConfigError::InvalidValue {
                    key: "dashboard.assets_dir".to_string(),
                    value: format!("{} is not a directory", dir.display()),
                });
            }
        }
        self.names.validate()
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        // Server
        if let Ok(host) = std::env::var("NAMEGRAPH_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("NAMEGRAPH_PORT") {
            self.server.port = parse_env("NAMEGRAPH_PORT", port)?;
        }

        // Input
        if let Ok(path) = std::env::var("NAMEGRAPH_EPUB_PATH") {
            self.input.epub_path = Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var("NAMEGRAPH_TEXT_PATH") {
            self.input.text_path = PathBuf::from(path);
        }

        // Analysis
        if let Ok(offset) = std::env::var("NAMEGRAPH_START_LINE") {
            self.analysis.start_line = parse_env("NAMEGRAPH_START_LINE", offset)?;
        }
        if let Ok(top_n) = std::env::var("NAMEGRAPH_TOP_N") {
            self.analysis.top_n = parse_env("NAMEGRAPH_TOP_N", top_n)?;
        }
        if let Ok(mode) = std::env::var("NAMEGRAPH_MATCH_MODE") {
            self.analysis.match_mode = mode.parse()?;
        }
        if let Ok(strategy) = std::env::var("NAMEGRAPH_STRATEGY") {
            self.analysis.strategy = strategy.parse()?;
        }

        // Model
        if let Ok(path) = std::env::var("NAMEGRAPH_LEXICON") {
            self.model.lexicon_path = Some(PathBuf::from(path));
        }

        // Dashboard
        if let Ok(dir) = std::env::var("NAMEGRAPH_ASSETS_DIR") {
            self.dashboard.assets_dir = Some(PathBuf::from(dir));
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

/// Input file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// E-book container to convert (optional when the text already exists)
    pub epub_path: Option<PathBuf>,

    /// Plain-text file produced by the extractor and read by the analysis
    pub text_path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            epub_path: None,
            text_path: PathBuf::from("book.txt"),
        }
    }
}

/// Name extraction and co-occurrence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Lines to skip before analysis (copyright, table of contents)
    pub start_line: usize,

    /// Size of the subjects-of-interest list
    pub top_n: usize,

    /// How detected spans are matched against the subject list
    pub match_mode: MatchMode,

    /// Whether recognition reruns per segment or once over the whole text
    pub strategy: RecognitionStrategy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            start_line: 0,
            top_n: 27,
            match_mode: MatchMode::Canonical,
            strategy: RecognitionStrategy::PerSegment,
        }
    }
}

/// Matching rule between a detected span and the subject list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Canonicalize and filter exclusions before matching
    #[default]
    Canonical,
    /// The span text itself must equal a subject name
    Exact,
}

impl std::str::FromStr for MatchMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "canonical" => Ok(Self::Canonical),
            "exact" => Ok(Self::Exact),
            _ => Err(ConfigError::InvalidValue {
                key: "analysis.match_mode".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Where entity recognition runs during co-occurrence counting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionStrategy {
    /// Re-run recognition on each segment's own text
    #[default]
    PerSegment,
    /// Run once over the full text and bucket spans by offset
    Bucketed,
}

impl std::str::FromStr for RecognitionStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "per_segment" => Ok(Self::PerSegment),
            "bucketed" => Ok(Self::Bucketed),
            _ => Err(ConfigError::InvalidValue {
                key: "analysis.strategy".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Entity recognizer assets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Extra lexicon (TOML) merged into the built-in recognizer lexicon
    pub lexicon_path: Option<PathBuf>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub const CYTOSCAPE_CDN: &str = "https://unpkg.com/cytoscape@3.28.1/dist/cytoscape.min.js";

/// Dashboard presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Page heading
    pub title: String,

    /// Default node colour
    pub node_color: String,

    /// Colour for names in the highlight set
    pub highlight_color: String,

    /// Edge width for the lightest edge
    pub min_edge_width: f32,

    /// Edge width for the heaviest edge
    pub max_edge_width: f32,

    /// Where the page loads Cytoscape.js from
    pub script_src: String,

    /// Directory served under `/assets`, for running without network access
    pub assets_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Name Co-Occurrence Network".to_string(),
            node_color: "lightblue".to_string(),
            highlight_color: "#ff9999".to_string(),
            min_edge_width: 1.0,
            max_edge_width: 12.0,
            script_src: CYTOSCAPE_CDN.to_string(),
            assets_dir: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
