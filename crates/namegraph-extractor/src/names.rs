//! Person name extraction, canonicalization and frequency ranking

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use namegraph_core::{NameTables, NamegraphError, Result};

use crate::EntityExtractor;

/// Read a text file and drop its first `offset` lines.
///
/// `\r\n` and lone `\r` line endings are read as `\n`; otherwise the
/// remaining lines join back into the text as it appears in the file. A
/// result with no visible characters is an error: there is nothing to analyse.
pub fn read_text_from(path: &Path, offset: usize) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| NamegraphError::from_io(path.display().to_string(), e))?;

    let text: String = normalize_newlines(&content)
        .split_inclusive('\n')
        .skip(offset)
        .collect();
    if text.trim().is_empty() {
        return Err(NamegraphError::EmptyText(format!(
            "{} has no text after line {}",
            path.display(),
            offset
        )));
    }

    tracing::debug!(
        "Read {} bytes from {} (skipped {} lines)",
        text.len(),
        path.display(),
        offset
    );
    Ok(text)
}

/// Rewrite `\r\n` and lone `\r` as `\n`
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Occurrence count per canonical person identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, u32>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str) {
        *self.counts.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, name: &str) -> u32 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.counts.contains_key(name)
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total occurrences across all names
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    /// The `n` most frequent names, ties broken alphabetically
    pub fn most_common(&self, n: usize) -> Vec<(String, u32)> {
        let mut ranked: Vec<(String, u32)> = self
            .counts
            .iter()
            .map(|(name, &count)| (name.clone(), count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(n);
        ranked
    }

    /// Subjects-of-interest list: the top `n` names
    pub fn subjects(&self, n: usize) -> Vec<String> {
        self.most_common(n).into_iter().map(|(name, _)| name).collect()
    }
}

impl<'a> FromIterator<&'a str> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut table = Self::new();
        for name in iter {
            table.add(name);
        }
        table
    }
}

/// Count canonical person identities in `text`.
///
/// Every person span is resolved through the canonical map; identities in
/// the excluded set are dropped.
pub fn extract_names(
    text: &str,
    recognizer: &dyn EntityExtractor,
    tables: &NameTables,
) -> Result<FrequencyTable> {
    let persons = recognizer.persons(text)?;
    let detected = persons.len();

    let table: FrequencyTable = persons
        .iter()
        .filter_map(|entity| tables.resolve(&entity.text))
        .collect();

    tracing::info!(
        "Found {} person mentions, {} distinct names after canonicalization",
        detected,
        table.len()
    );
    Ok(table)
}

/// Read `path` from line `offset` and count the names in it
pub fn extract_names_from_file(
    path: &Path,
    offset: usize,
    recognizer: &dyn EntityExtractor,
    tables: &NameTables,
) -> Result<FrequencyTable> {
    let text = read_text_from(path, offset)?;
    extract_names(&text, recognizer, tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntityLabel, ExtractedEntity, RuleBasedNer};
    use proptest::prelude::*;

    /// Treats every comma-separated piece as a person span
    struct CommaNames;

    impl EntityExtractor for CommaNames {
        fn extract(&self, text: &str) -> Result<Vec<ExtractedEntity>> {
            let mut offset = 0;
            let mut entities = Vec::new();
            for piece in text.split(',') {
                if !piece.is_empty() {
                    entities.push(ExtractedEntity {
                        text: piece.to_string(),
                        entity_type: EntityLabel::Person,
                        start: offset,
                        end: offset + piece.len(),
                        confidence: 1.0,
                    });
                }
                offset += piece.len() + 1;
            }
            Ok(entities)
        }
    }

    fn tables() -> NameTables {
        NameTables::new()
            .with_alias("Jack", "Jack Kerouac")
            .with_alias("Kerouac", "Jack Kerouac")
            .with_alias("Ginsberg", "Allen Ginsberg")
            .with_excluded("Cody")
            .with_excluded("Sal Paradise")
    }

    #[test]
    fn test_read_text_skips_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.txt");
        std::fs::write(&path, "Copyright\nContents\n\nJack wrote.\n\nAllen read.\n").unwrap();

        let text = read_text_from(&path, 3).unwrap();
        assert_eq!(text, "Jack wrote.\n\nAllen read.\n");
        assert_eq!(read_text_from(&path, 0).unwrap().lines().count(), 6);
    }

    #[test]
    fn test_read_text_normalizes_line_endings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.txt");
        std::fs::write(
            &path,
            "Copyright\r\nHe saw Neal Cassady there.\r\n\r\nShe saw Carl Solomon there.\r\rEnd.\r\n",
        )
        .unwrap();

        let text = read_text_from(&path, 1).unwrap();
        assert_eq!(
            text,
            "He saw Neal Cassady there.\n\nShe saw Carl Solomon there.\n\nEnd.\n"
        );
        assert_eq!(crate::split_paragraphs(&text).len(), 3);
        assert_eq!(normalize_newlines("no carriage returns"), "no carriage returns");
    }

    #[test]
    fn test_read_text_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.txt");
        std::fs::write(&path, "Copyright\n\n  \n").unwrap();

        assert_eq!(read_text_from(&path, 1).unwrap_err().kind(), "degenerate-empty-text");
        assert_eq!(read_text_from(&path, 10).unwrap_err().kind(), "degenerate-empty-text");
        assert_eq!(
            read_text_from(&dir.path().join("missing.txt"), 0).unwrap_err().kind(),
            "input-not-found"
        );
    }

    #[test]
    fn test_extract_names_canonicalizes_and_excludes() {
        let table = extract_names("Jack,Kerouac,Ginsberg,Cody,Bob Jones,Jones", &CommaNames, &tables())
            .unwrap();
        assert_eq!(table.count("Jack Kerouac"), 2);
        assert_eq!(table.count("Allen Ginsberg"), 1);
        assert!(!table.contains("Cody"));
        // unmapped variants stay distinct
        assert_eq!(table.count("Bob Jones"), 1);
        assert_eq!(table.count("Jones"), 1);
        assert_eq!(table.total(), 5);
    }

    #[test]
    fn test_extract_names_with_rule_based_ner() {
        let tables = tables();
        let ner = RuleBasedNer::new().with_known_names(tables.known_forms());
        let text = "Jack talked to Carl Solomon. Later, Ginsberg wrote to Carl and Jack.";
        let table = extract_names(text, &ner, &tables).unwrap();

        assert_eq!(table.count("Jack Kerouac"), 2);
        assert_eq!(table.count("Allen Ginsberg"), 1);
        assert_eq!(table.count("Carl Solomon"), 1);
        assert_eq!(table.count("Carl"), 1);
    }

    #[test]
    fn test_possessive_counts_toward_canonical_name() {
        let tables = NameTables::new()
            .with_alias("Corso", "Gregory Corso")
            .with_alias("Gregory", "Gregory Corso");
        let ner = RuleBasedNer::new().with_known_names(tables.known_forms());
        let table = extract_names("Allen read Corso's poems. Later, Gregory Corso left.", &ner, &tables)
            .unwrap();
        assert_eq!(table.count("Gregory Corso"), 2);
        assert!(!table.contains("Corso's"));
    }

    #[test]
    fn test_most_common_breaks_ties_alphabetically() {
        let table: FrequencyTable = ["Neal", "Allen", "Jack", "Neal", "Allen", "Gregory"]
            .into_iter()
            .collect();
        assert_eq!(
            table.most_common(3),
            vec![
                ("Allen".to_string(), 2),
                ("Neal".to_string(), 2),
                ("Gregory".to_string(), 1)
            ]
        );
        assert_eq!(table.subjects(10).len(), 4);
        assert!(table.subjects(0).is_empty());
    }

    #[test]
    fn test_extract_names_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.txt");
        std::fs::write(&path, "Cody,Cody\nJack,Ginsberg").unwrap();

        let table = extract_names_from_file(&path, 1, &CommaNames, &tables()).unwrap();
        assert_eq!(table.subjects(5), vec!["Allen Ginsberg", "Jack Kerouac"]);
    }

    proptest! {
        #[test]
        fn prop_excluded_never_counted_and_subjects_bounded(
            names in prop::collection::vec(
                prop::sample::select(vec!["Jack", "Kerouac", "Ginsberg", "Cody", "Sal Paradise", "Neal", "Gregory"]),
                0..40,
            ),
            n in 0usize..8,
        ) {
            let tables = tables();
            let table = extract_names(&names.join(","), &CommaNames, &tables).unwrap();

            for excluded in &tables.excluded {
                prop_assert!(!table.contains(excluded));
            }

            let subjects = table.subjects(n);
            prop_assert!(subjects.len() <= n);
            for subject in &subjects {
                prop_assert!(table.count(subject) > 0);
            }
        }
    }
}
