//! namegraph Parser - E-book to plain-text extraction
//!
//! Supports parsing of:
//! - EPUB containers (every HTML content part, in container order)
//! - Plain text files
//!
//! Each parser implements the `DocumentParser` trait and produces a
//! `ParsedDocument` whose plain-text rendering keeps paragraphs separated by
//! blank lines, which is the only structure the name analysis relies on.

pub mod epub;
pub mod html;

pub use epub::EpubParser;
pub use html::extract_paragraphs;

use std::path::Path;

use namegraph_core::NamegraphError;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during document parsing
#[derive(Error, Debug)]
pub enum ParserError {
    /// The input file does not exist
    #[error("Input not found: {0}")]
    InputNotFound(String),

    /// IO error while reading or writing a file
    #[error("IO error on file: {path}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The container is not a readable archive or is malformed
    #[error("Unreadable container: {0}")]
    UnreadableContainer(String),

    /// A part the container refers to is absent
    #[error("Container part missing: {0}")]
    MissingPart(String),

    /// File format is not supported
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Encoding error
    #[error("Text encoding error: {0}")]
    EncodingError(String),
}

impl ParserError {
    /// Map an IO error on `path`, promoting `NotFound` to `InputNotFound`
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::InputNotFound(path.display().to_string())
        } else {
            Self::IoError {
                path: path.display().to_string(),
                source,
            }
        }
    }
}

impl From<ParserError> for NamegraphError {
    fn from(err: ParserError) -> Self {
        match err {
            ParserError::InputNotFound(path) => NamegraphError::InputNotFound(path),
            ParserError::IoError { path, source } => NamegraphError::Io { path, source },
            ParserError::UnreadableContainer(msg) | ParserError::MissingPart(msg) => {
                NamegraphError::UnreadableContainer(msg)
            }
            ParserError::UnsupportedFormat(ext) => {
                NamegraphError::UnreadableContainer(format!("unsupported format: {ext}"))
            }
            ParserError::EncodingError(msg) => {
                NamegraphError::UnreadableContainer(format!("encoding: {msg}"))
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ParserError>;

// ============================================================================
// Parsed Document Types
// ============================================================================

/// A parsed document with extracted content
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Original file path
    pub file_path: String,

    /// Detected file type
    pub file_type: FileType,

    /// Plain-text content, paragraphs separated by blank lines
    pub content: String,

    /// Content parts in container order
    pub sections: Vec<DocumentSection>,
}

impl ParsedDocument {
    /// Create a new parsed document
    pub fn new(file_path: impl Into<String>, file_type: FileType) -> Self {
        Self {
            file_path: file_path.into(),
            file_type,
            content: String::new(),
            sections: Vec::new(),
        }
    }

    /// Set content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set sections and render the content from them
    pub fn with_sections(mut self, sections: Vec<DocumentSection>) -> Self {
        self.content = render_sections(&sections);
        self.sections = sections;
        self
    }

    /// Get total paragraph count across sections
    pub fn paragraph_count(&self) -> usize {
        self.sections.iter().map(|s| s.paragraphs.len()).sum()
    }
}

/// Render sections as plain text.
///
/// Paragraphs inside a part are joined by one blank line and every part ends
/// with a blank line; parts are joined by another blank line.
pub fn render_sections(sections: &[DocumentSection]) -> String {
    sections
        .iter()
        .map(|section| format!("{}\n\n", section.paragraphs.join("\n\n")))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Supported file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Epub,
    Html,
    PlainText,
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "epub" => Self::Epub,
            "html" | "htm" | "xhtml" => Self::Html,
            "txt" => Self::PlainText,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Epub => write!(f, "epub"),
            Self::Html => write!(f, "html"),
            Self::PlainText => write!(f, "text"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// One content part of a document
#[derive(Debug, Clone, Default)]
pub struct DocumentSection {
    /// Part name inside the container
    pub title: Option<String>,

    /// Trimmed paragraph texts in document order
    pub paragraphs: Vec<String>,
}

impl DocumentSection {
    /// Create a new section
    pub fn new(paragraphs: Vec<String>) -> Self {
        Self {
            title: None,
            paragraphs,
        }
    }

    /// Set title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

// ============================================================================
// Parser Trait
// ============================================================================

/// Trait for document parsers
pub trait DocumentParser: Send + Sync {
    /// Parse a document from a file path
    fn parse(&self, path: &Path) -> Result<ParsedDocument>;

    /// Get supported file types
    fn supported_types(&self) -> &[FileType];

    /// Check if this parser can handle a file type
    fn can_parse(&self, file_type: FileType) -> bool {
        self.supported_types().contains(&file_type)
    }
}

// ============================================================================
// Parser Registry
// ============================================================================

/// Registry of available parsers
pub struct ParserRegistry {
    parsers: Vec<Box<dyn DocumentParser>>,
}

impl ParserRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Registry with every built-in parser
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(EpubParser::new());
        registry.register(HtmlParser);
        registry.register(PlainTextParser);
        registry
    }

    /// Register a parser
    pub fn register<P: DocumentParser + 'static>(&mut self, parser: P) {
        self.parsers.push(Box::new(parser));
    }

    /// Find a parser for a file type
    pub fn find_parser(&self, file_type: FileType) -> Option<&dyn DocumentParser> {
        self.parsers
            .iter()
            .find(|p| p.can_parse(file_type))
            .map(|p| p.as_ref())
    }

    /// Parse a file using the appropriate parser
    pub fn parse(&self, path: &Path) -> Result<ParsedDocument> {
        let file_type = FileType::from_path(path);

        if file_type == FileType::Unknown {
            return Err(ParserError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("none")
                    .to_string(),
            ));
        }

        let parser = self
            .find_parser(file_type)
            .ok_or_else(|| ParserError::UnsupportedFormat(file_type.to_string()))?;

        parser.parse(path)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// Simple Parsers
// ============================================================================

/// Plain text parser
pub struct PlainTextParser;

impl DocumentParser for PlainTextParser {
    fn parse(&self, path: &Path) -> Result<ParsedDocument> {
        let content = std::fs::read_to_string(path).map_err(|e| ParserError::io(path, e))?;

        Ok(
            ParsedDocument::new(path.display().to_string(), FileType::PlainText)
                .with_content(content),
        )
    }

    fn supported_types(&self) -> &[FileType] {
        &[FileType::PlainText]
    }
}

/// Single HTML document parser
pub struct HtmlParser;

impl DocumentParser for HtmlParser {
    fn parse(&self, path: &Path) -> Result<ParsedDocument> {
        let markup = std::fs::read_to_string(path).map_err(|e| ParserError::io(path, e))?;
        let section = DocumentSection::new(extract_paragraphs(&markup))
            .with_title(path.display().to_string());

        Ok(ParsedDocument::new(path.display().to_string(), FileType::Html)
            .with_sections(vec![section]))
    }

    fn supported_types(&self) -> &[FileType] {
        &[FileType::Html]
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// Write a document's plain-text rendering, overwriting `dest`
pub fn write_plain_text(doc: &ParsedDocument, dest: &Path) -> Result<()> {
    std::fs::write(dest, &doc.content).map_err(|e| ParserError::IoError {
        path: dest.display().to_string(),
        source: e,
    })?;

    tracing::info!(
        source = %doc.file_path,
        parts = doc.sections.len(),
        paragraphs = doc.paragraph_count(),
        "Text successfully extracted to {}",
        dest.display()
    );
    Ok(())
}

/// Parse `source` with the default registry and write its text to `dest`
pub fn convert_to_text(source: &Path, dest: &Path) -> Result<ParsedDocument> {
    let doc = ParserRegistry::with_defaults().parse(source)?;
    write_plain_text(&doc, dest)?;
    Ok(doc)
}

// ============================================================================
// Tests
// ============================================================================
