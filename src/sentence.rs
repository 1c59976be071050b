/*
    BioC Library (BioC document interchange model)

        Licensed under the GNU General Public License v3
*/

use datasize::DataSize;
use sealed::sealed;
use serde::{Deserialize, Serialize};

use crate::annotation::{impl_has_annotations, Annotation};
use crate::infons::{impl_has_infons, Infons};
use crate::relation::Relation;
use crate::types::*;

/// One sentence in a passage (or, in BioC v2, directly in a document or collection).
/// It holds the original text of the sentence and annotations/relations on it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, DataSize)]
pub struct Sentence {
    /// Absolute offset in the document
    pub offset: usize,

    #[serde(default)]
    pub infons: Infons,

    /// Sentences must carry text, an empty string counts as absent
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub annotations: Vec<Annotation>,

    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl_has_infons!(Sentence);
impl_has_annotations!(Sentence);

impl Sentence {
    pub fn new(offset: usize, text: impl Into<String>) -> Self {
        Self {
            offset,
            text: text.into(),
            ..Self::default()
        }
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

    /// Number of structures in this subtree, the sentence itself included
    pub fn node_count(&self) -> usize {
        1 + count_annotations(&self.annotations) + count_relations(&self.relations)
    }
}

#[sealed]
impl TypeInfo for Sentence {
    fn typeinfo() -> Type {
        Type::Sentence
    }
}

pub(crate) fn count_annotations(annotations: &[Annotation]) -> usize {
    annotations.iter().map(|a| 1 + a.locations.len()).sum()
}

pub(crate) fn count_relations(relations: &[Relation]) -> usize {
    relations.iter().map(|r| 1 + r.nodes.len()).sum()
}
