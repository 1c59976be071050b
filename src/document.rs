/*
    BioC Library (BioC document interchange model)

        Licensed under the GNU General Public License v3
*/

use datasize::DataSize;
use sealed::sealed;
use serde::{Deserialize, Serialize};

use crate::annotation::{impl_has_annotations, Annotation};
use crate::error::BiocError;
use crate::infons::{impl_has_infons, Infons};
use crate::passage::Passage;
use crate::relation::Relation;
use crate::sentence::{count_annotations, count_relations, Sentence};
use crate::types::*;

/// One document in a collection.
///
/// An id, typically from the original corpus, identifies the document. It holds the
/// passages of the document and possibly annotations and relations over the whole document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, DataSize)]
pub struct Document {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub infons: Infons,

    #[serde(default)]
    pub passages: Vec<Passage>,

    /// Sentences directly under the document, only valid in BioC v2
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sentences: Vec<Sentence>,

    #[serde(default)]
    pub annotations: Vec<Annotation>,

    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl_has_infons!(Document);
impl_has_annotations!(Document);

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Builder pattern to add a passage
    pub fn with_passage(mut self, passage: Passage) -> Self {
        self.add_passage(passage);
        self
    }

    /// Builder pattern to add a document-level sentence (BioC v2)
    pub fn with_sentence(mut self, sentence: Sentence) -> Self {
        self.sentences.push(sentence);
        self
    }

    /// Builder pattern to add an annotation
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Builder pattern to add a relation
    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn add_passage(&mut self, passage: Passage) {
        self.passages.push(passage);
    }

    /// Returns the passage starting at the given offset
    pub fn passage(&self, offset: usize) -> Option<&Passage> {
        self.passages.iter().find(|p| p.offset == offset)
    }

    /// Returns a document containing the passages
    pub fn of_passages(passages: impl IntoIterator<Item = Passage>) -> Result<Self, BiocError> {
        let passages: Vec<Passage> = passages.into_iter().collect();
        if passages.is_empty() {
            return Err(BiocError::OtherError("There has to be at least one passage"));
        }
        Ok(Self {
            passages,
            ..Self::default()
        })
    }

    /// Returns a document containing one passage (at offset 0) with the text
    pub fn of_text(text: impl Into<String>) -> Self {
        Self {
            passages: vec![Passage::new(0).with_text(text)],
            ..Self::default()
        }
    }

    /// Does this document use shapes that only exist in BioC v2?
    pub fn has_v2_shapes(&self) -> bool {
        !self.sentences.is_empty()
    }

    /// Number of structures in this subtree, the document itself included
    pub fn node_count(&self) -> usize {
        1 + self.passages.iter().map(|p| p.node_count()).sum::<usize>()
            + self.sentences.iter().map(|s| s.node_count()).sum::<usize>()
            + count_annotations(&self.annotations)
            + count_relations(&self.relations)
    }
}

#[sealed]
impl TypeInfo for Document {
    fn typeinfo() -> Type {
        Type::Document
    }
}
