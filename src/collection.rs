/*
    BioC Library (BioC document interchange model)

        Licensed under the GNU General Public License v3
*/

use datasize::DataSize;
use sealed::sealed;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::BiocError;
use crate::infons::{impl_has_infons, Infons};
use crate::sentence::Sentence;
use crate::types::*;

/// Collection of documents, e.g. an entire corpus or some portion of it.
///
/// When reading or writing a document at a time, the collection only holds the
/// collection-level information and `documents` stays empty.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, DataSize)]
pub struct Collection {
    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub key: String,

    /// Only present in BioC v2
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default)]
    pub infons: Infons,

    #[serde(default)]
    pub documents: Vec<Document>,

    /// Sentences directly under the collection, only valid in BioC v2
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sentences: Vec<Sentence>,
}

impl_has_infons!(Collection);

impl Default for Collection {
    /// An empty collection dated today
    fn default() -> Self {
        Self {
            source: String::new(),
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            key: String::new(),
            version: None,
            infons: Infons::new(),
            documents: Vec::new(),
            sentences: Vec::new(),
        }
    }
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Builder pattern to add a document
    pub fn with_document(mut self, document: Document) -> Self {
        self.add_document(document);
        self
    }

    pub fn add_document(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Returns the document with the given id
    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Returns a collection containing the documents
    pub fn of_documents(documents: impl IntoIterator<Item = Document>) -> Result<Self, BiocError> {
        let documents: Vec<Document> = documents.into_iter().collect();
        if documents.is_empty() {
            return Err(BiocError::OtherError("There has to be at least one document"));
        }
        Ok(Self {
            documents,
            ..Self::default()
        })
    }

    /// Returns a copy of the collection-level information only, without documents
    pub fn info(&self) -> Self {
        Self {
            source: self.source.clone(),
            date: self.date.clone(),
            key: self.key.clone(),
            version: self.version.clone(),
            infons: self.infons.clone(),
            documents: Vec::new(),
            sentences: self.sentences.clone(),
        }
    }

    /// Does this collection use shapes that only exist in BioC v2?
    /// Documents are not inspected.
    pub fn has_v2_shapes(&self) -> bool {
        self.version.is_some() || !self.sentences.is_empty()
    }
}

#[sealed]
impl TypeInfo for Collection {
    fn typeinfo() -> Type {
        Type::Collection
    }
}
