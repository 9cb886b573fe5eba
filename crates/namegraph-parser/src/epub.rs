//! EPUB container parser using zip
//!
//! Locates the package document through `META-INF/container.xml`, then walks
//! the manifest and collects the paragraphs of every HTML content part in
//! manifest order.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use percent_encoding::percent_decode_str;
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::html::extract_paragraphs;
use crate::{DocumentParser, DocumentSection, FileType, ParsedDocument, ParserError, Result};

const CONTAINER_XML: &str = "META-INF/container.xml";
const HTML_MEDIA_TYPES: [&str; 2] = ["application/xhtml+xml", "text/html"];

/// A manifest entry of the package document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    pub id: String,
    pub href: String,
    pub media_type: String,
}

impl ManifestItem {
    pub fn is_html(&self) -> bool {
        HTML_MEDIA_TYPES.contains(&self.media_type.as_str())
    }
}

/// EPUB document parser
pub struct EpubParser;

impl EpubParser {
    /// Create a new EPUB parser
    pub fn new() -> Self {
        Self
    }

    fn open(path: &Path) -> Result<ZipArchive<BufReader<File>>> {
        let file = File::open(path).map_err(|e| ParserError::io(path, e))?;
        ZipArchive::new(BufReader::new(file)).map_err(|e| {
            ParserError::UnreadableContainer(format!("{}: {e}", path.display()))
        })
    }

    /// Names of the HTML parts in container order
    fn content_parts<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let Some(container) = read_entry(archive, CONTAINER_XML)? else {
            tracing::warn!("{CONTAINER_XML} missing, falling back to archive order");
            let parts = (0..archive.len())
                .filter_map(|i| archive.by_index(i).ok().map(|f| f.name().to_string()))
                .filter(|name| FileType::from_path(Path::new(name)) == FileType::Html)
                .collect();
            return Ok(parts);
        };

        let package_path = package_path(&container)?
            .ok_or_else(|| ParserError::MissingPart(format!("rootfile in {CONTAINER_XML}")))?;
        let package = read_entry(archive, &package_path)?
            .ok_or_else(|| ParserError::MissingPart(package_path.clone()))?;

        let parts = manifest_items(&package)?
            .into_iter()
            .filter(ManifestItem::is_html)
            .map(|item| resolve_href(&package_path, &item.href))
            .collect();

        Ok(parts)
    }
}

impl Default for EpubParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser for EpubParser {
    fn parse(&self, path: &Path) -> Result<ParsedDocument> {
        let mut archive = Self::open(path)?;
        let parts = Self::content_parts(&mut archive)?;

        let mut sections = Vec::with_capacity(parts.len());
        for part in parts {
            let markup =
                read_entry(&mut archive, &part)?.ok_or_else(|| ParserError::MissingPart(part.clone()))?;
            let paragraphs = extract_paragraphs(&markup);
            tracing::debug!(part = %part, paragraphs = paragraphs.len(), "Parsed content part");
            sections.push(DocumentSection::new(paragraphs).with_title(part));
        }

        Ok(ParsedDocument::new(path.display().to_string(), FileType::Epub).with_sections(sections))
    }

    fn supported_types(&self) -> &[FileType] {
        &[FileType::Epub]
    }
}

/// Read a UTF-8 entry; `Ok(None)` when the archive has no such entry
fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(ParserError::UnreadableContainer(format!("{name}: {e}"))),
    };

    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| ParserError::UnreadableContainer(format!("{name}: {e}")))?;

    let text = String::from_utf8(bytes).map_err(|e| ParserError::EncodingError(format!("{name}: {e}")))?;
    Ok(Some(text.trim_start_matches('\u{feff}').to_string()))
}

/// Attributes of every element whose local name is `local`, in document order.
///
/// Namespace prefixes are ignored on element and attribute names.
fn elements_named(xml: &str, local: &str) -> Result<Vec<Vec<(String, String)>>> {
    let malformed = |e: quick_xml::Error| ParserError::UnreadableContainer(format!("malformed XML: {e}"));

    let mut reader = Reader::from_str(xml);
    let mut found = Vec::new();
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(element) | Event::Empty(element)
                if element.local_name().as_ref() == local.as_bytes() =>
            {
                let mut attributes = Vec::new();
                for attribute in element.attributes() {
                    let attribute = attribute.map_err(|e| malformed(e.into()))?;
                    let name = String::from_utf8_lossy(attribute.key.local_name().as_ref()).to_lowercase();
                    let value = attribute.unescape_value().map_err(malformed)?;
                    attributes.push((name, value.into_owned()));
                }
                found.push(attributes);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(found)
}

fn attribute(attributes: &[(String, String)], name: &str) -> Option<String> {
    attributes
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.clone())
}

/// Path of the package document declared in `container.xml`
pub fn package_path(container_xml: &str) -> Result<Option<String>> {
    Ok(elements_named(container_xml, "rootfile")?
        .iter()
        .find_map(|attributes| attribute(attributes, "full-path")))
}

/// Manifest items in declaration order
pub fn manifest_items(package: &str) -> Result<Vec<ManifestItem>> {
    Ok(elements_named(package, "item")?
        .iter()
        .filter_map(|attributes| {
            Some(ManifestItem {
                id: attribute(attributes, "id").unwrap_or_default(),
                href: attribute(attributes, "href")?,
                media_type: attribute(attributes, "media-type")?,
            })
        })
        .collect())
}

/// Resolve a manifest href against the package document's directory
pub fn resolve_href(package_path: &str, href: &str) -> String {
    let href = href.split('#').next().unwrap_or(href);
    let href = percent_decode_str(href).decode_utf8_lossy();

    let mut segments: Vec<&str> = match package_path.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').filter(|s| !s.is_empty()).collect(),
        None => Vec::new(),
    };

    for segment in href.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}
