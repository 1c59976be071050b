/*
    BioC Library (BioC document interchange model)

        Licensed under the GNU General Public License v3
*/

//! This module contains iterators over the annotations, relations and sentences of a structure,
//! optionally restricted to certain [`Level`]s. Each item is a [`Found`] that also tells where the
//! item was found.

use crate::annotation::{Annotation, HasAnnotations};
use crate::collection::Collection;
use crate::document::Document;
use crate::error::BiocError;
use crate::passage::Passage;
use crate::relation::Relation;
use crate::sentence::Sentence;
use crate::types::Level;

/// An item along with the structures enclosing it
#[derive(Debug, Clone, Copy)]
pub struct Found<'a, T> {
    pub document: Option<&'a Document>,
    pub passage: Option<&'a Passage>,
    pub sentence: Option<&'a Sentence>,
    pub item: &'a T,
}

impl<'a, T> Found<'a, T> {
    /// The level of the structure that directly holds the item
    pub fn level(&self) -> Option<Level> {
        if self.sentence.is_some() {
            Some(Level::Sentence)
        } else if self.passage.is_some() {
            Some(Level::Passage)
        } else if self.document.is_some() {
            Some(Level::Document)
        } else {
            None
        }
    }
}

pub type FoundIter<'a, T> = Box<dyn Iterator<Item = Found<'a, T>> + 'a>;

#[derive(Debug, Clone, Copy, Default)]
struct LevelSet {
    document: bool,
    passage: bool,
    sentence: bool,
}

impl LevelSet {
    /// Builds the set, `top` is the highest level the structure being iterated can hold
    fn new(levels: &[Level], top: Level) -> Result<Self, BiocError> {
        if levels.is_empty() {
            return Err(BiocError::LevelError("at least one level is required"));
        }
        let mut set = Self::default();
        for level in levels {
            if *level < top {
                return Err(BiocError::LevelError(
                    "level is above the structure being iterated",
                ));
            }
            match level {
                Level::Document => set.document = true,
                Level::Passage => set.passage = true,
                Level::Sentence => set.sentence = true,
            }
        }
        Ok(set)
    }

    fn all() -> Self {
        Self {
            document: true,
            passage: true,
            sentence: true,
        }
    }
}

type Picker<T> = fn(&dyn HasAnnotations) -> &[T];

fn annotations_of(holder: &dyn HasAnnotations) -> &[Annotation] {
    holder.annotations()
}

fn relations_of(holder: &dyn HasAnnotations) -> &[Relation] {
    holder.relations()
}

fn sentence_items<'a, T: 'a>(
    document: Option<&'a Document>,
    passage: Option<&'a Passage>,
    sentence: &'a Sentence,
    levels: LevelSet,
    pick: Picker<T>,
) -> FoundIter<'a, T> {
    let items: &'a [T] = if levels.sentence { pick(sentence) } else { &[] };
    Box::new(items.iter().map(move |item| Found {
        document,
        passage,
        sentence: Some(sentence),
        item,
    }))
}

fn passage_items<'a, T: 'a>(
    document: Option<&'a Document>,
    passage: &'a Passage,
    levels: LevelSet,
    pick: Picker<T>,
) -> FoundIter<'a, T> {
    let items: &'a [T] = if levels.passage { pick(passage) } else { &[] };
    Box::new(
        items
            .iter()
            .map(move |item| Found {
                document,
                passage: Some(passage),
                sentence: None,
                item,
            })
            .chain(passage.sentences.iter().flat_map(move |sentence| {
                sentence_items(document, Some(passage), sentence, levels, pick)
            })),
    )
}

fn document_items<'a, T: 'a>(
    document: &'a Document,
    levels: LevelSet,
    pick: Picker<T>,
) -> FoundIter<'a, T> {
    let items: &'a [T] = if levels.document { pick(document) } else { &[] };
    Box::new(
        items
            .iter()
            .map(move |item| Found {
                document: Some(document),
                passage: None,
                sentence: None,
                item,
            })
            .chain(
                document
                    .passages
                    .iter()
                    .flat_map(move |passage| passage_items(Some(document), passage, levels, pick)),
            )
            .chain(document.sentences.iter().flat_map(move |sentence| {
                sentence_items(Some(document), None, sentence, levels, pick)
            })),
    )
}

fn collection_items<'a, T: 'a>(
    collection: &'a Collection,
    levels: LevelSet,
    pick: Picker<T>,
) -> FoundIter<'a, T> {
    Box::new(
        collection
            .sentences
            .iter()
            .flat_map(move |sentence| sentence_items(None, None, sentence, levels, pick))
            .chain(
                collection
                    .documents
                    .iter()
                    .flat_map(move |document| document_items(document, levels, pick)),
            ),
    )
}

/// A structure to iterate over
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    Collection(&'a Collection),
    Document(&'a Document),
    Passage(&'a Passage),
    Sentence(&'a Sentence),
}

impl<'a> Scope<'a> {
    /// The highest level this structure can hold annotations at
    pub fn top_level(&self) -> Level {
        match self {
            Self::Collection(_) | Self::Document(_) => Level::Document,
            Self::Passage(_) => Level::Passage,
            Self::Sentence(_) => Level::Sentence,
        }
    }

    fn items<T: 'a>(self, levels: LevelSet, pick: Picker<T>) -> FoundIter<'a, T> {
        match self {
            Self::Collection(collection) => collection_items(collection, levels, pick),
            Self::Document(document) => document_items(document, levels, pick),
            Self::Passage(passage) => passage_items(None, passage, levels, pick),
            Self::Sentence(sentence) => sentence_items(None, None, sentence, levels, pick),
        }
    }
}

/// Implemented by the structures that hold annotations and relations, directly or below them.
/// Items come in document order: a structure's own items first, then those of its children.
pub trait Annotated {
    fn scope(&self) -> Scope<'_>;

    /// Iterates over the annotations at the given levels.
    /// Fails with [`BiocError::LevelError`] if a level is above this structure or no level is given.
    fn annotations_at(&self, levels: &[Level]) -> Result<FoundIter<'_, Annotation>, BiocError> {
        let scope = self.scope();
        let levels = LevelSet::new(levels, scope.top_level())?;
        Ok(scope.items(levels, annotations_of))
    }

    /// Iterates over the relations at the given levels.
    /// Fails with [`BiocError::LevelError`] if a level is above this structure or no level is given.
    fn relations_at(&self, levels: &[Level]) -> Result<FoundIter<'_, Relation>, BiocError> {
        let scope = self.scope();
        let levels = LevelSet::new(levels, scope.top_level())?;
        Ok(scope.items(levels, relations_of))
    }

    /// Iterates over all annotations
    fn all_annotations(&self) -> FoundIter<'_, Annotation> {
        self.scope().items(LevelSet::all(), annotations_of)
    }

    /// Iterates over all relations
    fn all_relations(&self) -> FoundIter<'_, Relation> {
        self.scope().items(LevelSet::all(), relations_of)
    }
}

impl Annotated for Collection {
    fn scope(&self) -> Scope<'_> {
        Scope::Collection(self)
    }
}

impl Annotated for Document {
    fn scope(&self) -> Scope<'_> {
        Scope::Document(self)
    }
}

impl Annotated for Passage {
    fn scope(&self) -> Scope<'_> {
        Scope::Passage(self)
    }
}

impl Annotated for Sentence {
    fn scope(&self) -> Scope<'_> {
        Scope::Sentence(self)
    }
}

/// Iterates over all sentences in a collection: collection-level sentences first, then per
/// document the sentences of its passages followed by its document-level sentences.
pub fn sentences(collection: &Collection) -> impl Iterator<Item = Found<'_, Sentence>> {
    collection
        .sentences
        .iter()
        .map(|sentence| Found {
            document: None,
            passage: None,
            sentence: None,
            item: sentence,
        })
        .chain(collection.documents.iter().flat_map(document_sentences))
}

/// Iterates over all sentences in a document, those in passages first
pub fn document_sentences(document: &Document) -> impl Iterator<Item = Found<'_, Sentence>> {
    document
        .passages
        .iter()
        .flat_map(move |passage| {
            passage.sentences.iter().map(move |sentence| Found {
                document: Some(document),
                passage: Some(passage),
                sentence: None,
                item: sentence,
            })
        })
        .chain(document.sentences.iter().map(move |sentence| Found {
            document: Some(document),
            passage: None,
            sentence: None,
            item: sentence,
        }))
}
