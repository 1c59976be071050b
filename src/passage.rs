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
use crate::relation::Relation;
use crate::sentence::{count_annotations, count_relations, Sentence};
use crate::types::*;

/// One passage in a document.
///
/// This is either the text of the passage with annotations over that text, or the
/// sentences of the passage. Nothing here keeps those possibilities mutually exclusive,
/// see [`crate::Validator::with_passage_exclusivity`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, DataSize)]
pub struct Passage {
    /// Absolute offset in the document
    pub offset: usize,

    #[serde(default)]
    pub infons: Infons,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default)]
    pub sentences: Vec<Sentence>,

    #[serde(default)]
    pub annotations: Vec<Annotation>,

    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl_has_infons!(Passage);
impl_has_annotations!(Passage);

impl Passage {
    pub fn new(offset: usize) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    /// Builder pattern to set the text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder pattern to add a sentence
    pub fn with_sentence(mut self, sentence: Sentence) -> Self {
        self.add_sentence(sentence);
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

    pub fn add_sentence(&mut self, sentence: Sentence) {
        self.sentences.push(sentence);
    }

    /// Returns the sentence starting at the given offset
    pub fn sentence(&self, offset: usize) -> Option<&Sentence> {
        self.sentences.iter().find(|s| s.offset == offset)
    }

    /// Returns a passage containing the sentences, its offset is that of the earliest sentence
    pub fn of_sentences(sentences: impl IntoIterator<Item = Sentence>) -> Result<Self, BiocError> {
        let sentences: Vec<Sentence> = sentences.into_iter().collect();
        let offset = sentences
            .iter()
            .map(|s| s.offset)
            .min()
            .ok_or(BiocError::OtherError("There has to be at least one sentence"))?;
        Ok(Self {
            offset,
            sentences,
            ..Self::default()
        })
    }

    /// Number of structures in this subtree, the passage itself included
    pub fn node_count(&self) -> usize {
        1 + self.sentences.iter().map(|s| s.node_count()).sum::<usize>()
            + count_annotations(&self.annotations)
            + count_relations(&self.relations)
    }
}

#[sealed]
impl TypeInfo for Passage {
    fn typeinfo() -> Type {
        Type::Passage
    }
}
