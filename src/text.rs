/*
    BioC Library (BioC document interchange model)

        Licensed under the GNU General Public License v3
*/

//! This module reconstructs the text of passages and documents from their children, and
//! defines the [`Text`] trait.
//!
//! A passage without text gets the text of its sentences, each placed at the column given by its
//! offset relative to the passage; a document gets the text of its passages in the same way. Gaps
//! are filled with newlines. A child that starts before the end of the text built so far overlaps
//! its predecessor; this is reported and never repaired.
//!
//! Reconstructed text is held as a [`TextLayout`]: the borrowed texts of the children along with
//! the columns they start at. Gaps only turn into newlines when a slice that covers them is asked for.

use std::borrow::Cow;

use crate::document::Document;
use crate::error::BiocError;
use crate::passage::Passage;
use crate::sentence::Sentence;
use crate::types::Level;

const FILL: char = '\n';

/// Number of codepoints between two byte offset checkpoints of a segment
const STRIDE: usize = 64;

/// A problem found while reconstructing text
#[derive(Debug, Clone, Copy)]
pub(crate) enum TextIssue<'a> {
    /// A passage (`sentence` is None) or a sentence starts at absolute `offset`, but the text
    /// before it already runs until absolute offset `end`.
    Overlap {
        level: Level,
        offset: usize,
        end: usize,
        passage: &'a Passage,
        sentence: Option<&'a Sentence>,
    },
    /// A sentence has no text while its passage has to be reconstructed from it
    MissingText {
        passage: &'a Passage,
        sentence: &'a Sentence,
    },
}

/// A borrowed text placed at a column
#[derive(Debug, Clone)]
struct Segment<'a> {
    start: usize,
    /// Length in unicode codepoints
    chars: usize,
    text: &'a str,
    /// Byte offset of every STRIDE-th codepoint, empty for ASCII text
    checkpoints: Vec<usize>,
}

impl<'a> Segment<'a> {
    fn new(start: usize, text: &'a str) -> Self {
        let mut chars = text.len();
        let mut checkpoints = Vec::new();
        if !text.is_ascii() {
            chars = 0;
            for (byte, _) in text.char_indices() {
                if chars % STRIDE == 0 {
                    checkpoints.push(byte);
                }
                chars += 1;
            }
        }
        Self {
            start,
            chars,
            text,
            checkpoints,
        }
    }

    fn end(&self) -> usize {
        self.start.saturating_add(self.chars)
    }

    /// Byte offset of a codepoint relative to the start of the segment, clamped to the text
    fn byte_at(&self, pos: usize) -> usize {
        if pos >= self.chars {
            return self.text.len();
        }
        match self.checkpoints.get(pos / STRIDE) {
            None => pos,
            Some(&base) => self.text[base..]
                .char_indices()
                .nth(pos % STRIDE)
                .map(|(i, _)| base + i)
                .unwrap_or(self.text.len()),
        }
    }

    /// Codepoints `begin..end` relative to the start of the segment
    fn slice(&self, begin: usize, end: usize) -> &'a str {
        let text: &'a str = self.text;
        &text[self.byte_at(begin)..self.byte_at(end.max(begin))]
    }
}

/// Text made up of pieces placed at columns (unicode codepoints), with newlines in the gaps
/// between them. Pieces never overlap and are ordered by column.
#[derive(Debug, Clone, Default)]
pub(crate) struct TextLayout<'a> {
    segments: Vec<Segment<'a>>,
    len: usize,
}

impl<'a> TextLayout<'a> {
    /// A layout holding a single text at column 0
    pub(crate) fn of_text(text: &'a str) -> Self {
        let mut layout = Self::default();
        layout.push_at(0, text).ok();
        layout
    }

    /// Length in codepoints, gaps included
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Where a piece meant for `start` ends up. If `start` lies before the current end, the piece
    /// goes right after it and the current end is returned as error.
    fn position(&self, start: usize) -> (usize, Result<(), usize>) {
        if start < self.len {
            (self.len, Err(self.len))
        } else {
            (start, Ok(()))
        }
    }

    /// Places `text` at column `start`, see [`Self::position()`] for overlaps
    pub(crate) fn push_at(&mut self, start: usize, text: &'a str) -> Result<(), usize> {
        let (at, result) = self.position(start);
        let segment = Segment::new(at, text);
        self.len = segment.end();
        if segment.chars > 0 {
            self.segments.push(segment);
        }
        result
    }

    /// Places a whole layout at column `start`, see [`Self::position()`] for overlaps
    fn append_at(&mut self, start: usize, other: TextLayout<'a>) -> Result<(), usize> {
        let (at, result) = self.position(start);
        for mut segment in other.segments {
            segment.start = segment.start.saturating_add(at);
            self.segments.push(segment);
        }
        self.len = at.saturating_add(other.len);
        result
    }

    /// Returns the text between the codepoints `begin` and `end`, clamped to the bounds of the layout.
    /// This only allocates if the range is not covered by a single piece.
    pub(crate) fn slice(&self, begin: usize, end: usize) -> Cow<'a, str> {
        let end = end.min(self.len);
        if begin >= end {
            return Cow::Borrowed("");
        }
        let first = self.segments.partition_point(|s| s.end() <= begin);
        let rest = &self.segments[first..];
        if let Some(segment) = rest.first() {
            if segment.start <= begin && end <= segment.end() {
                return Cow::Borrowed(segment.slice(begin - segment.start, end - segment.start));
            }
        }
        let mut text = String::new();
        let mut cursor = begin;
        for segment in rest.iter().take_while(|s| s.start < end) {
            fill(&mut text, segment.start.saturating_sub(cursor));
            let from = cursor.max(segment.start);
            let to = end.min(segment.end());
            text.push_str(segment.slice(from - segment.start, to - segment.start));
            cursor = to;
        }
        fill(&mut text, end - cursor);
        Cow::Owned(text)
    }

    /// Is the text between `begin` and `end` (clamped as in [`Self::slice()`]) equal to `expected`?
    /// Ranges longer than `expected` are rejected without looking at them.
    pub(crate) fn matches(&self, begin: usize, end: usize, expected: &str) -> bool {
        let length = end.min(self.len).saturating_sub(begin);
        if length > expected.len() || length != expected.chars().count() {
            return false;
        }
        self.slice(begin, end) == expected
    }

    /// The whole text, gaps filled
    pub(crate) fn to_text(&self) -> Cow<'a, str> {
        self.slice(0, self.len)
    }
}

fn fill(text: &mut String, count: usize) {
    text.extend(std::iter::repeat(FILL).take(count));
}

/// Returns the layout of the effective text of a passage, reconstructed from its sentences if it has no text of its own.
pub(crate) fn passage_layout_with<'a, F>(
    passage: &'a Passage,
    on_issue: &mut F,
) -> Result<TextLayout<'a>, BiocError>
where
    F: FnMut(TextIssue<'a>) -> Result<(), BiocError>,
{
    if let Some(text) = passage.text.as_deref() {
        if !text.is_empty() {
            return Ok(TextLayout::of_text(text));
        }
    }
    let mut layout = TextLayout::default();
    for sentence in passage.sentences.iter() {
        let pushed = match sentence.offset.checked_sub(passage.offset) {
            Some(start) => layout.push_at(start, &sentence.text),
            None => {
                layout.push_at(layout.len(), &sentence.text).ok();
                Err(0)
            }
        };
        if let Err(end) = pushed {
            on_issue(TextIssue::Overlap {
                level: Level::Sentence,
                offset: sentence.offset,
                end: passage.offset.saturating_add(end),
                passage,
                sentence: Some(sentence),
            })?;
        }
        if sentence.text.is_empty() {
            on_issue(TextIssue::MissingText { passage, sentence })?;
        }
    }
    Ok(layout)
}

/// Returns the layout of the effective text of a document (starting at offset 0) along with the
/// layout of each of its passages.
pub(crate) fn document_layout_with<'a, F>(
    document: &'a Document,
    on_issue: &mut F,
) -> Result<(TextLayout<'a>, Vec<TextLayout<'a>>), BiocError>
where
    F: FnMut(TextIssue<'a>) -> Result<(), BiocError>,
{
    let mut layout = TextLayout::default();
    let mut passage_layouts = Vec::with_capacity(document.passages.len());
    for passage in document.passages.iter() {
        let passage_layout = passage_layout_with(passage, on_issue)?;
        if let Err(end) = layout.append_at(passage.offset, passage_layout.clone()) {
            on_issue(TextIssue::Overlap {
                level: Level::Passage,
                offset: passage.offset,
                end,
                passage,
                sentence: None,
            })?;
        }
        passage_layouts.push(passage_layout);
    }
    Ok((layout, passage_layouts))
}

fn fail_on_issue(issue: TextIssue) -> Result<(), BiocError> {
    match issue {
        TextIssue::Overlap {
            level, offset, end, ..
        } => Err(BiocError::SpanError(format!(
            "overlapping {} at {}, previous text ends at {}",
            level, offset, end
        ))),
        TextIssue::MissingText { sentence, .. } => Err(BiocError::SpanError(format!(
            "sentence has no text: {}",
            sentence.offset
        ))),
    }
}

/// This trait gives access to the text of the structures that carry or contain text
pub trait Text {
    /// Returns the absolute offset of the text in the document and the text itself.
    /// Passages without text and documents have their text reconstructed from their children,
    /// with every gap between children filled by newlines.
    fn text_with_offset(&self) -> Result<(usize, Cow<'_, str>), BiocError>;
}

impl Text for Sentence {
    fn text_with_offset(&self) -> Result<(usize, Cow<'_, str>), BiocError> {
        Ok((self.offset, Cow::Borrowed(self.text.as_str())))
    }
}

impl Text for Passage {
    fn text_with_offset(&self) -> Result<(usize, Cow<'_, str>), BiocError> {
        let layout = passage_layout_with(self, &mut fail_on_issue)?;
        Ok((self.offset, layout.to_text()))
    }
}

impl Text for Document {
    fn text_with_offset(&self) -> Result<(usize, Cow<'_, str>), BiocError> {
        let (layout, _) = document_layout_with(self, &mut fail_on_issue)?;
        Ok((0, layout.to_text()))
    }
}
