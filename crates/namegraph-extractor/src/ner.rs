//! Named Entity Recognition (NER) module
//!
//! A rule-based recognizer for English prose: runs of capitalized words are
//! grouped into candidate spans, function words and titles are trimmed off,
//! and the remainder is labelled from a lexicon plus a few positional cues.
//! The lexicon can be extended from a TOML file, which plays the role of the
//! model assets.

use std::collections::BTreeSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::segment::{split_sentences, TextSpan};
use crate::{EntityExtractor, ExtractedEntity};
use namegraph_core::{ModelConfig, NameTables, NamegraphError, Result};

static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{L}[\p{L}\p{M}'’\-]*").expect("word pattern is valid"));

const KNOWN_CONFIDENCE: f32 = 0.95;
const TITLED_CONFIDENCE: f32 = 0.9;
const PHRASE_CONFIDENCE: f32 = 0.8;
const CAPITALIZED_CONFIDENCE: f32 = 0.7;
/// Below the default threshold: a lone capitalized word at the start of a
/// sentence is usually not a name
const SENTENCE_INITIAL_CONFIDENCE: f32 = 0.45;
const DEFAULT_THRESHOLD: f32 = 0.5;

// ============================================================================
// Entity labels
// ============================================================================

/// Labels produced by the recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    Person,
    #[serde(rename = "ORG")]
    Organization,
    #[serde(rename = "LOC")]
    Location,
    Misc,
}

impl EntityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Organization => "ORG",
            Self::Location => "LOC",
            Self::Misc => "MISC",
        }
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Lexicon
// ============================================================================

const NON_NAMES: &[&str] = &[
    // pronouns
    "I", "He", "She", "It", "We", "They", "You", "Me", "Him", "Her", "Us", "Them", "His", "Hers",
    "Its", "Our", "Their", "Your", "My", "Mine", "This", "That", "These", "Those", "Who", "What",
    "Where", "When", "Why", "How", "Which", "Whose", "Whom", "Everyone", "Everybody", "Someone",
    "Somebody", "Nobody", "Nothing", "Everything", "Something", "Anyone",
    // determiners and quantifiers
    "The", "A", "An", "Some", "Any", "Every", "Each", "All", "No", "Both", "Either", "Neither",
    "Another", "Such", "Many", "Much", "Most", "Few", "Several", "Other", "One", "Two", "Three",
    "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "First", "Second", "Third", "Last",
    // conjunctions
    "And", "But", "Or", "Nor", "So", "Yet", "For", "If", "Because", "Although", "Though",
    "While", "Since", "Unless", "Until", "As", "Whether", "Than",
    // prepositions
    "In", "On", "At", "By", "With", "From", "To", "Of", "Into", "Onto", "Over", "Under", "After",
    "Before", "During", "Between", "Among", "Through", "About", "Against", "Without", "Within",
    "Upon", "Near", "Around", "Across", "Behind", "Beyond", "Like",
    // adverbs and interjections
    "Later", "Then", "Now", "Here", "There", "Soon", "Still", "Even", "Also", "Only", "Just",
    "Again", "Never", "Always", "Often", "Sometimes", "Perhaps", "Maybe", "Yes", "Not", "Once",
    "Meanwhile", "However", "Indeed", "Thus", "Finally", "Today", "Tonight", "Tomorrow",
    "Yesterday", "Instead", "Afterward", "Afterwards", "Anyway", "Well", "Oh", "Ah", "Yeah",
    "Okay", "Very", "Too", "Please", "Thank", "Thanks", "Hello", "Goodbye",
    // auxiliaries
    "Is", "Are", "Was", "Were", "Be", "Been", "Do", "Does", "Did", "Have", "Has", "Had", "Will",
    "Would", "Shall", "Should", "Can", "Could", "May", "Might", "Must", "Let",
    // book structure
    "Chapter", "Part", "Book", "Volume", "Section", "Introduction", "Preface", "Foreword",
    "Afterword", "Contents", "Index", "Notes", "Acknowledgments", "Epilogue", "Prologue",
    "Appendix", "Bibliography", "Copyright", "Page",
    // calendar
    "January", "February", "March", "April", "June", "July", "August", "September", "October",
    "November", "December", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
    "Sunday",
    // forms of address that never start a name
    "God", "Lord", "Dear", "Sir", "Madam",
];

const HONORIFICS: &[&str] = &[
    "Mr", "Mrs", "Ms", "Miss", "Dr", "Prof", "Professor", "Rev", "Reverend", "Father", "Mother",
    "Uncle", "Aunt", "Brother", "Sister", "Captain", "Colonel", "General", "Senator", "President",
];

const ABBREVIATIONS: &[&str] = &[
    "St", "Mt", "Jr", "Sr", "Co", "Inc", "Ltd", "Ave", "vs", "etc", "Vol", "No", "pp",
];

const ORGANIZATION_WORDS: &[&str] = &[
    "University", "College", "Press", "Review", "Company", "Corporation", "Church", "School",
    "Institute", "Society", "Times", "Magazine", "Records", "Hospital", "Army", "Navy", "Party",
    "Library", "Museum", "Club", "Bank", "Academy", "Foundation", "Department",
];

const LOCATION_WORDS: &[&str] = &[
    "Street", "Avenue", "Road", "City", "County", "River", "Park", "Square", "Bridge", "Island",
    "Bay", "Mountain", "Mountains", "Valley", "Village", "Ocean", "Sea", "Lake", "Coast", "State",
    "States", "Hotel", "Bar",
];

const LOCATIONS: &[&str] = &[
    "America", "Europe", "Africa", "Asia", "Mexico", "Mexico City", "Canada", "France", "Paris",
    "London", "England", "New York", "San Francisco", "Los Angeles", "Chicago", "Denver",
    "Texas", "California", "Colorado", "Manhattan", "Brooklyn", "Harlem", "Tangier", "Morocco",
    "Italy", "Rome", "Berlin", "Germany", "Russia", "Japan", "China", "India", "Boston",
    "New Orleans", "Seattle", "Oregon", "Florida", "Massachusetts", "Greenwich Village",
    "Big Sur", "North Beach", "Times Square",
];

const ORGANIZATIONS: &[&str] = &["Harvard", "Columbia", "Princeton", "Yale", "Oxford"];

fn set_of(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Word lists the recognizer decides with.
///
/// Entries are matched case-sensitively against the text as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Full names always labelled as persons
    pub persons: BTreeSet<String>,
    /// Capitalized words that are never part of a name
    pub non_names: BTreeSet<String>,
    /// Titles that precede a name and are not part of it
    pub honorifics: BTreeSet<String>,
    /// Words whose trailing period does not end a sentence
    pub abbreviations: BTreeSet<String>,
    pub organizations: BTreeSet<String>,
    pub locations: BTreeSet<String>,
}

impl Lexicon {
    /// Built-in English word lists
    pub fn builtin() -> Self {
        Self {
            persons: BTreeSet::new(),
            non_names: set_of(NON_NAMES),
            honorifics: set_of(HONORIFICS),
            abbreviations: set_of(ABBREVIATIONS),
            organizations: set_of(ORGANIZATIONS),
            locations: set_of(LOCATIONS),
        }
    }

    /// Load extra entries from a TOML file.
    ///
    /// A missing or malformed file means the recognizer cannot be set up, so
    /// both are reported as an unavailable model.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            NamegraphError::ModelUnavailable(format!(
                "cannot read lexicon {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            NamegraphError::ModelUnavailable(format!(
                "malformed lexicon {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Union with another lexicon
    pub fn merge(&mut self, other: Lexicon) {
        self.persons.extend(other.persons);
        self.non_names.extend(other.non_names);
        self.honorifics.extend(other.honorifics);
        self.abbreviations.extend(other.abbreviations);
        self.organizations.extend(other.organizations);
        self.locations.extend(other.locations);
    }
}

// ============================================================================
// Rule-based NER
// ============================================================================

/// A capitalized word, with any possessive ending cut off
#[derive(Debug, Clone, Copy)]
struct Token<'t> {
    text: &'t str,
    start: usize,
    end: usize,
    /// End of the matched word, before the possessive was cut
    raw_end: usize,
    possessive: bool,
}

/// Rule-based NER over capitalized word runs
#[derive(Debug, Clone)]
pub struct RuleBasedNer {
    lexicon: Lexicon,
    /// Abbreviations and honorifics, for sentence splitting
    sentence_abbreviations: BTreeSet<String>,
    min_confidence: f32,
}

impl RuleBasedNer {
    /// Create a recognizer with the built-in lexicon
    pub fn new() -> Self {
        Self::from_lexicon(Lexicon::builtin())
    }

    pub fn from_lexicon(lexicon: Lexicon) -> Self {
        let sentence_abbreviations = lexicon
            .abbreviations
            .iter()
            .chain(lexicon.honorifics.iter())
            .cloned()
            .collect();
        Self {
            lexicon,
            sentence_abbreviations,
            min_confidence: DEFAULT_THRESHOLD,
        }
    }

    /// Set up the recognizer for a run: built-in lexicon, the optional
    /// lexicon file, and every name form the name tables mention.
    pub fn from_config(model: &ModelConfig, tables: &NameTables) -> Result<Self> {
        let mut lexicon = Lexicon::builtin();
        if let Some(path) = &model.lexicon_path {
            let extra = Lexicon::from_file(path)?;
            tracing::debug!(
                "Loaded lexicon {} ({} persons)",
                path.display(),
                extra.persons.len()
            );
            lexicon.merge(extra);
        }

        let ner = Self::from_lexicon(lexicon).with_known_names(tables.known_forms());
        tracing::info!(
            "Rule-based NER ready with {} known person names",
            ner.lexicon.persons.len()
        );
        Ok(ner)
    }

    /// Add names that are always labelled as persons
    pub fn with_known_names<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.lexicon
            .persons
            .extend(names.into_iter().map(str::to_string));
        self
    }

    /// Set the minimum confidence an entity needs to be reported
    pub fn with_threshold(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn is_non_name(&self, word: &str) -> bool {
        self.lexicon.non_names.contains(word)
    }

    fn is_honorific(&self, word: &str) -> bool {
        self.lexicon.honorifics.contains(word)
    }

    /// Words that may be followed by a period without ending the run
    fn takes_period(&self, word: &str) -> bool {
        is_initial(word) || self.is_honorific(word) || self.lexicon.abbreviations.contains(word)
    }

    fn tokenize<'t>(&self, text: &'t str) -> Vec<Token<'t>> {
        WORD.find_iter(text)
            .filter_map(|m| {
                let raw = m.as_str();
                let (core, possessive) = match raw
                    .strip_suffix("'s")
                    .or_else(|| raw.strip_suffix("’s"))
                {
                    Some(stem) => (stem, true),
                    None => (raw, false),
                };
                let trimmed = core.trim_end_matches(|c: char| matches!(c, '\'' | '’' | '-'));
                if trimmed.is_empty() {
                    return None;
                }
                Some(Token {
                    text: trimmed,
                    start: m.start(),
                    end: m.start() + trimmed.len(),
                    raw_end: m.end(),
                    possessive: possessive || trimmed.len() < core.len(),
                })
            })
            .collect()
    }

    /// Whether `next` continues the run that ends with `prev`
    fn joins(&self, text: &str, prev: &Token<'_>, next: &Token<'_>) -> bool {
        if prev.possessive {
            return false;
        }
        let gap = &text[prev.raw_end..next.start];
        if !gap.is_empty() && gap.chars().all(is_inline_space) {
            return true;
        }
        match gap.strip_prefix('.') {
            Some(rest) => self.takes_period(prev.text) && rest.chars().all(is_inline_space),
            None => false,
        }
    }

    /// Runs of adjacent capitalized words
    fn capitalized_runs<'t>(&self, text: &'t str) -> Vec<Vec<Token<'t>>> {
        let mut runs = Vec::new();
        let mut current: Vec<Token<'t>> = Vec::new();

        for token in self.tokenize(text) {
            if !is_capitalized(token.text) || is_shouting(token.text) {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
                continue;
            }
            if let Some(prev) = current.last() {
                if !self.joins(text, prev, &token) {
                    runs.push(std::mem::take(&mut current));
                }
            }
            current.push(token);
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }

    /// Label one run, or `None` when nothing name-like is left after trimming
    fn classify(&self, text: &str, run: &[Token<'_>]) -> Option<ExtractedEntity> {
        let mut titled = false;
        let mut words = run;

        while let Some((first, rest)) = words.split_first() {
            if self.is_honorific(first.text) {
                titled = true;
            } else if !self.is_non_name(first.text) {
                break;
            }
            words = rest;
        }
        while let Some((last, rest)) = words.split_last() {
            if !(self.is_non_name(last.text) || is_initial(last.text)) {
                break;
            }
            words = rest;
        }

        let (first, last) = (words.first()?, words.last()?);
        let span = TextSpan::new(first.start, last.end);
        let phrase = span.slice(text);

        let (entity_type, confidence) = if self.lexicon.persons.contains(phrase) {
            (EntityLabel::Person, KNOWN_CONFIDENCE)
        } else if self.lexicon.organizations.contains(phrase)
            || words.iter().any(|w| ORGANIZATION_WORDS.contains(&w.text))
        {
            (EntityLabel::Organization, PHRASE_CONFIDENCE)
        } else if self.lexicon.locations.contains(phrase) || LOCATION_WORDS.contains(&last.text) {
            (EntityLabel::Location, PHRASE_CONFIDENCE)
        } else if titled {
            (EntityLabel::Person, TITLED_CONFIDENCE)
        } else if words.len() == 1 && first.start == run[0].start && is_sentence_start(text, first.start)
        {
            (EntityLabel::Person, SENTENCE_INITIAL_CONFIDENCE)
        } else {
            (EntityLabel::Person, CAPITALIZED_CONFIDENCE)
        };

        Some(ExtractedEntity {
            text: phrase.to_string(),
            entity_type,
            start: span.start,
            end: span.end,
            confidence,
        })
    }
}

impl Default for RuleBasedNer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityExtractor for RuleBasedNer {
    fn extract(&self, text: &str) -> Result<Vec<ExtractedEntity>> {
        let entities = self
            .capitalized_runs(text)
            .iter()
            .filter_map(|run| self.classify(text, run))
            .filter(|entity| entity.confidence >= self.min_confidence)
            .collect();
        Ok(entities)
    }

    fn sentences(&self, text: &str) -> Vec<TextSpan> {
        split_sentences(text, &self.sentence_abbreviations)
    }
}

fn is_inline_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{a0}')
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// All-caps words longer than one letter: headings and acronyms
fn is_shouting(word: &str) -> bool {
    word.chars().count() > 1 && !word.chars().any(char::is_lowercase)
}

fn is_initial(word: &str) -> bool {
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
}

/// Nothing but opening quotes and spaces between `offset` and the previous
/// sentence boundary
fn is_sentence_start(text: &str, offset: usize) -> bool {
    for c in text[..offset].chars().rev() {
        match c {
            '\n' | '.' | '!' | '?' | ':' | '…' => return true,
            ' ' | '\t' | '\u{a0}' | '"' | '\'' | '“' | '‘' | '(' | '[' => continue,
            _ => return false,
        }
    }
    true
}
