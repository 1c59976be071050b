/*
    BioC Library (BioC document interchange model)

        Licensed under the GNU General Public License v3
*/

//! This module implements the offset-consistency [`Validator`]. It checks that the text of every
//! annotation matches the text found at its location, that every relation node refers to an
//! existing annotation or relation, and that passages and sentences do not overlap.
//!
//! Violations are passed to a [`Reporter`]. The default reporter, [`FailFast`], turns the first
//! violation into an error; [`Collect`] and [`Warn`] let the validator carry on and report everything.

use std::collections::HashSet;
use std::fmt;

use crate::annotation::Annotation;
use crate::collection::Collection;
use crate::document::Document;
use crate::error::BiocError;
use crate::relation::Relation;
use crate::sentence::Sentence;
use crate::text::{document_layout_with, TextIssue, TextLayout};

/// Number of characters shown on each side of a mismatching annotation
const CONTEXT_WINDOW: usize = 10;

/// Largest number of characters of actual text shown for a mismatching annotation
const MAX_SHOWN: usize = 200;

/// One element in the chain of structures enclosing a violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceItem {
    Collection,
    /// Document by id
    Document(String),
    /// Passage by offset
    Passage(usize),
    /// Sentence by offset
    Sentence(usize),
    /// Annotation by id
    Annotation(String),
    /// Relation by id
    Relation(String),
}

impl fmt::Display for TraceItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Collection => write!(f, "collection"),
            Self::Document(id) => write!(f, "document {}", id),
            Self::Passage(offset) => write!(f, "passage {}", offset),
            Self::Sentence(offset) => write!(f, "sentence {}", offset),
            Self::Annotation(id) => write!(f, "annotation {}", id),
            Self::Relation(id) => write!(f, "relation {}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// The text of an annotation differs from the text at its location
    TextMismatch,
    /// An annotation has no locations, so it has no span
    EmptyAnnotation,
    /// A location ends beyond the largest possible offset
    InvalidSpan,
    /// A relation node refers to an id that does not exist in the document
    DanglingReference,
    /// A passage or sentence starts before its predecessor ends
    Overlap,
    /// A sentence has no text
    MissingText,
    /// A passage has both text and sentences (only checked on request)
    PassageShape,
}

/// A consistency violation found by the validator
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
    /// The enclosing structures, outermost first
    pub path: Vec<TraceItem>,
}

impl Violation {
    /// The path as a readable string, e.g. `document D1 → passage 0`
    pub fn path_string(&self) -> String {
        join_path(&self.path)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (in {})", self.message, self.path_string())
    }
}

fn join_path(path: &[TraceItem]) -> String {
    path.iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Receives the violations found by the validator. Returning an error aborts validation.
pub trait Reporter {
    fn report(&mut self, violation: Violation) -> Result<(), BiocError>;
}

/// Aborts on the first violation with [`BiocError::ValidationError`]
#[derive(Debug, Default, Clone, Copy)]
pub struct FailFast;

impl Reporter for FailFast {
    fn report(&mut self, violation: Violation) -> Result<(), BiocError> {
        Err(BiocError::ValidationError(violation))
    }
}

/// Collects all violations
#[derive(Debug, Default, Clone)]
pub struct Collect {
    pub violations: Vec<Violation>,
}

impl Reporter for Collect {
    fn report(&mut self, violation: Violation) -> Result<(), BiocError> {
        self.violations.push(violation);
        Ok(())
    }
}

/// Prints every violation to standard error output and continues
#[derive(Debug, Default, Clone, Copy)]
pub struct Warn;

impl Reporter for Warn {
    fn report(&mut self, violation: Violation) -> Result<(), BiocError> {
        eprintln!("[BIOC VALIDATION] {}", violation);
        Ok(())
    }
}

impl<F> Reporter for F
where
    F: FnMut(Violation) -> Result<(), BiocError>,
{
    fn report(&mut self, violation: Violation) -> Result<(), BiocError> {
        self(violation)
    }
}

/// Validates documents and collections, see the module documentation.
pub struct Validator<R: Reporter> {
    reporter: R,
    trace: Vec<TraceItem>,
    docid: String,
    passage_exclusivity: bool,
    reported: usize,
}

impl Default for Validator<FailFast> {
    fn default() -> Self {
        Self::new(FailFast)
    }
}

impl<R: Reporter> Validator<R> {
    pub fn new(reporter: R) -> Self {
        Self {
            reporter,
            trace: Vec::new(),
            docid: String::new(),
            passage_exclusivity: false,
            reported: 0,
        }
    }

    /// Also report passages that have both text and sentences
    pub fn with_passage_exclusivity(mut self, value: bool) -> Self {
        self.passage_exclusivity = value;
        self
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// The number of violations reported so far
    pub fn reported(&self) -> usize {
        self.reported
    }

    /// Validates all documents in a collection, and the sentences directly under it (BioC v2)
    pub fn validate(&mut self, collection: &Collection) -> Result<(), BiocError> {
        if !collection.sentences.is_empty() {
            self.trace.clear();
            self.docid.clear();
            self.trace.push(TraceItem::Collection);
            let mut pool = HashSet::new();
            for sentence in collection.sentences.iter() {
                add_ids(&mut pool, &sentence.annotations, &sentence.relations);
            }
            for sentence in collection.sentences.iter() {
                self.validate_sentence(sentence, &pool)?;
            }
            self.trace.pop();
        }
        for document in collection.documents.iter() {
            self.validate_document(document)?;
        }
        Ok(())
    }

    /// Validates a single document
    pub fn validate_document(&mut self, document: &Document) -> Result<(), BiocError> {
        self.trace.clear();
        self.docid = document.id.clone();
        self.trace.push(TraceItem::Document(document.id.clone()));

        let mut pool = HashSet::new();
        add_ids(&mut pool, &document.annotations, &document.relations);
        for passage in document.passages.iter() {
            add_ids(&mut pool, &passage.annotations, &passage.relations);
            for sentence in passage.sentences.iter() {
                add_ids(&mut pool, &sentence.annotations, &sentence.relations);
            }
        }
        for sentence in document.sentences.iter() {
            add_ids(&mut pool, &sentence.annotations, &sentence.relations);
        }

        let (layout, passage_layouts) =
            document_layout_with(document, &mut |issue| self.text_issue(issue))?;

        self.validate_annotations(&document.annotations, &layout, 0)?;
        self.validate_relations(&document.relations, &pool)?;

        for (passage, layout) in document.passages.iter().zip(passage_layouts.iter()) {
            self.trace.push(TraceItem::Passage(passage.offset));
            if self.passage_exclusivity
                && passage.text.as_deref().is_some_and(|t| !t.is_empty())
                && !passage.sentences.is_empty()
            {
                self.report(
                    ViolationKind::PassageShape,
                    format!(
                        "{}: passage {} has both text and sentences",
                        self.docid, passage.offset
                    ),
                )?;
            }
            self.validate_annotations(&passage.annotations, layout, passage.offset)?;
            self.validate_relations(&passage.relations, &pool)?;
            for sentence in passage.sentences.iter() {
                self.validate_sentence(sentence, &pool)?;
            }
            self.trace.pop();
        }

        for sentence in document.sentences.iter() {
            self.validate_sentence(sentence, &pool)?;
        }
        self.trace.pop();
        Ok(())
    }

    fn validate_sentence(
        &mut self,
        sentence: &Sentence,
        pool: &HashSet<&str>,
    ) -> Result<(), BiocError> {
        self.trace.push(TraceItem::Sentence(sentence.offset));
        let layout = TextLayout::of_text(&sentence.text);
        self.validate_annotations(&sentence.annotations, &layout, sentence.offset)?;
        self.validate_relations(&sentence.relations, pool)?;
        self.trace.pop();
        Ok(())
    }

    /// Checks the annotations of a structure whose text is `layout`, starting at absolute `offset`
    fn validate_annotations(
        &mut self,
        annotations: &[Annotation],
        layout: &TextLayout,
        offset: usize,
    ) -> Result<(), BiocError> {
        for annotation in annotations.iter() {
            self.trace.push(TraceItem::Annotation(annotation.id.clone()));
            match annotation.total_span() {
                Ok(span) => {
                    let begin = span.offset.checked_sub(offset);
                    let matches = match begin {
                        Some(begin) => layout.matches(
                            begin,
                            begin.saturating_add(span.length),
                            &annotation.text,
                        ),
                        None => false,
                    };
                    if !matches {
                        let (actual, context) = match begin {
                            Some(begin) => {
                                let end = begin.saturating_add(span.length.min(MAX_SHOWN));
                                (
                                    layout.slice(begin, end),
                                    layout.slice(
                                        begin.saturating_sub(CONTEXT_WINDOW),
                                        end.saturating_add(CONTEXT_WINDOW),
                                    ),
                                )
                            }
                            None => ("".into(), layout.slice(0, CONTEXT_WINDOW)),
                        };
                        self.report(
                            ViolationKind::TextMismatch,
                            format!(
                                "{}: Annotation text is incorrect at {}.\n  Annotation: {}\n  Actual text: {}\n  Context: {:?}",
                                self.docid, span.offset, annotation.text, actual, context
                            ),
                        )?;
                    }
                }
                Err(_) if annotation.locations.is_empty() => {
                    self.report(
                        ViolationKind::EmptyAnnotation,
                        format!(
                            "{}: Annotation {} has no locations",
                            self.docid, annotation.id
                        ),
                    )?;
                }
                Err(e) => {
                    self.report(
                        ViolationKind::InvalidSpan,
                        format!("{}: Annotation {}: {}", self.docid, annotation.id, e),
                    )?;
                }
            }
            self.trace.pop();
        }
        Ok(())
    }

    fn validate_relations(
        &mut self,
        relations: &[Relation],
        pool: &HashSet<&str>,
    ) -> Result<(), BiocError> {
        for relation in relations.iter() {
            for node in relation.nodes.iter() {
                if !pool.contains(node.refid.as_str()) {
                    let message = format!("Cannot find node {} in {}", node, join_path(&self.trace));
                    self.trace.push(TraceItem::Relation(relation.id.clone()));
                    let result = self.report(ViolationKind::DanglingReference, message);
                    self.trace.pop();
                    result?;
                }
            }
        }
        Ok(())
    }

    fn text_issue(&mut self, issue: TextIssue) -> Result<(), BiocError> {
        let depth = self.trace.len();
        let result = match issue {
            TextIssue::Overlap {
                offset,
                end,
                passage,
                sentence,
                ..
            } => {
                self.trace.push(TraceItem::Passage(passage.offset));
                if let Some(sentence) = sentence {
                    self.trace.push(TraceItem::Sentence(sentence.offset));
                }
                self.report(
                    ViolationKind::Overlap,
                    format!(
                        "{}: Overlap with previous text: len[{}] vs next offset[{}]",
                        self.docid, end, offset
                    ),
                )
            }
            TextIssue::MissingText { passage, sentence } => {
                self.trace.push(TraceItem::Passage(passage.offset));
                self.trace.push(TraceItem::Sentence(sentence.offset));
                self.report(
                    ViolationKind::MissingText,
                    format!(
                        "{}: BioC sentence has no text: {}",
                        self.docid, sentence.offset
                    ),
                )
            }
        };
        self.trace.truncate(depth);
        result
    }

    fn report(&mut self, kind: ViolationKind, message: String) -> Result<(), BiocError> {
        self.reported += 1;
        self.reporter.report(Violation {
            kind,
            message,
            path: self.trace.clone(),
        })
    }
}

fn add_ids<'a>(pool: &mut HashSet<&'a str>, annotations: &'a [Annotation], relations: &'a [Relation]) {
    pool.extend(annotations.iter().map(|a| a.id.as_str()));
    pool.extend(relations.iter().map(|r| r.id.as_str()));
}

/// Validates a collection, failing on the first violation
pub fn validate(collection: &Collection) -> Result<(), BiocError> {
    Validator::default().validate(collection)
}

/// Validates a single document, failing on the first violation
pub fn validate_document(document: &Document) -> Result<(), BiocError> {
    Validator::default().validate_document(document)
}
