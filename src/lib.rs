/*
    BioC Library (BioC document interchange model)

        Licensed under the GNU General Public License v3
*/

//! ## Introduction
//!
//! BioC is a simple format to share text data and stand-off annotations, mostly used for
//! biomedical text corpora. This is a software library to work with BioC from Rust.
//!
//! **What can you do with this library?**
//!
//! * Build and manipulate BioC collections in memory: collections hold documents, documents hold
//!   passages, passages hold sentences, and each of these may hold annotations and relations.
//!   Every level carries a key/value map of *infons*.
//! * Read and write BioC XML incrementally, one document at a time, so that corpora far larger
//!   than memory can be processed ([`XmlDocumentReader`], [`XmlDocumentWriter`]).
//! * Read and write whole collections in BioC XML ([`xml`]), BioC JSON ([`json`]) and BioC JSON lines
//!   ([`JsonLinesReader`], [`JsonLinesWriter`]).
//! * Validate that annotations agree with the text they refer to and that relations refer to
//!   existing annotations ([`Validator`]).
//!
//! Both version 1 and version 2 of the BioC schema are supported, see [`BiocVersion`] and [`ShapePolicy`].
//!
//! Offsets count unicode codepoints and are absolute within a document.
//!
//! Model:
//! * [`Collection`]
//! * [`Document`]
//! * [`Passage`]
//! * [`Sentence`]
//! * [`Annotation`] and [`Location`]
//! * [`Relation`] and [`Node`]
//! * [`Infons`]

mod annotation;
mod collection;
mod config;
mod decoder;
mod document;
mod encoder;
mod error;
mod file;
mod infons;
mod iter;
mod passage;
mod relation;
mod sentence;
mod text;
mod types;
mod validator;

pub mod json;
pub mod xml;

pub use annotation::{Annotation, HasAnnotations, Location};
pub use collection::Collection;
pub use config::{Config, Configurable};
pub use decoder::XmlDocumentReader;
pub use document::Document;
pub use encoder::XmlDocumentWriter;
pub use error::BiocError;
pub use file::{dataformat_for, load_file, save_file, strip_known_extension};
pub use infons::{HasInfons, Infons, InfonsIter};
pub use iter::{document_sentences, sentences, Annotated, Found, FoundIter, Scope};
pub use json::{BiocObject, FromJson, JsonLinesReader, JsonLinesWriter, ToJson};
pub use passage::Passage;
pub use relation::{Node, Relation};
pub use sentence::Sentence;
pub use text::Text;
pub use types::*;
pub use validator::{
    validate, validate_document, Collect, FailFast, Reporter, TraceItem, Validator, Violation,
    ViolationKind, Warn,
};

mod tests;
