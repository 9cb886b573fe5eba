//! Sentence and paragraph segmentation
//!
//! Segments are byte ranges into the analysed text, so spans recognised over
//! the whole text can be bucketed into them by offset.

use std::collections::BTreeSet;

/// A byte range into a text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end]
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Paragraphs are the pieces between blank lines (`"\n\n"`).
///
/// Pieces holding only whitespace are skipped; they cannot contain a name.
pub fn split_paragraphs(text: &str) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    let mut start = 0;
    for (pos, sep) in text.match_indices("\n\n") {
        push_nonblank(text, start, pos, &mut spans, false);
        start = pos + sep.len();
    }
    push_nonblank(text, start, text.len(), &mut spans, false);
    spans
}

/// Split text into trimmed sentence spans.
///
/// A sentence ends at a line break, or at a run of `.`, `!`, `?` or `…`
/// (plus closing quotes) followed by whitespace and an uppercase letter,
/// digit or opening quote. A lone period after an initial or after one of
/// `abbreviations` does not end a sentence.
pub fn split_sentences(text: &str, abbreviations: &BTreeSet<String>) -> Vec<TextSpan> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let offset_at = |idx: usize| chars.get(idx).map(|(pos, _)| *pos).unwrap_or(text.len());

    let mut spans = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];

        if c == '\n' {
            push_nonblank(text, start, pos, &mut spans, true);
            while i < chars.len() && chars[i].1.is_whitespace() {
                i += 1;
            }
            start = offset_at(i);
            continue;
        }

        if !is_terminator(c) {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < chars.len() && is_terminator(chars[j].1) {
            j += 1;
        }
        let lone_period = c == '.' && j == i + 1;
        while j < chars.len() && is_closing(chars[j].1) {
            j += 1;
        }

        let mut k = j;
        while k < chars.len() && chars[k].1.is_whitespace() && chars[k].1 != '\n' {
            k += 1;
        }

        let next = chars.get(k).map(|&(_, c)| c);
        let hard_break = matches!(next, None | Some('\n'));
        let soft_break = k > j && next.is_some_and(is_sentence_starter);
        let abbreviated = lone_period && is_abbreviation(&text[..pos], abbreviations);

        if hard_break || (soft_break && !abbreviated) {
            let end = offset_at(j);
            push_nonblank(text, start, end, &mut spans, true);
            start = end;
        }
        i = j;
    }

    push_nonblank(text, start, text.len(), &mut spans, true);
    spans
}

fn push_nonblank(text: &str, start: usize, end: usize, spans: &mut Vec<TextSpan>, trim: bool) {
    let piece = &text[start..end];
    let trimmed = piece.trim();
    if trimmed.is_empty() {
        return;
    }
    if trim {
        let lead = piece.len() - piece.trim_start().len();
        spans.push(TextSpan::new(start + lead, start + lead + trimmed.len()));
    } else {
        spans.push(TextSpan::new(start, end));
    }
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | '”' | '’' | ')' | ']')
}

fn is_sentence_starter(c: char) -> bool {
    c.is_uppercase() || c.is_ascii_digit() || matches!(c, '"' | '\'' | '“' | '‘' | '(' | '[')
}

/// The word right before a period is an initial or a known abbreviation
fn is_abbreviation(before: &str, abbreviations: &BTreeSet<String>) -> bool {
    let word_start = before
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphabetic())
        .last()
        .map(|(idx, _)| idx);

    let Some(word_start) = word_start else {
        return false;
    };
    let word = &before[word_start..];

    let mut chars = word.chars();
    let single_upper = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase());
    single_upper || abbreviations.contains(word)
}
