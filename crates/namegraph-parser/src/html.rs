//! Paragraph text from (X)HTML content parts

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("paragraph selector"));

/// Trimmed text of every `<p>` element, in document order.
///
/// Nested markup is dropped and character references are decoded. Comments
/// and script content are not text. Empty paragraphs are kept as empty
/// strings.
pub fn extract_paragraphs(markup: &str) -> Vec<String> {
    let document = Html::parse_document(markup);
    document
        .select(&PARAGRAPH)
        .map(|paragraph| paragraph.text().collect::<String>().trim().to_string())
        .collect()
}
