/*
    BioC Library (BioC document interchange model)

        Licensed under the GNU General Public License v3
*/

//! This module contains small shared types (versions, policies, levels) and the
//! [`TypeInfo`] trait that all model structures implement.

use sealed::sealed;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Config;

/// The version of the BioC schema to read or write.
///
/// Version 2 adds a `version` field at collection scope and permits sentences as direct
/// children of a document or of the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub enum BiocVersion {
    #[default]
    V1,
    V2,
}

impl fmt::Display for BiocVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "v1"),
            Self::V2 => write!(f, "v2"),
        }
    }
}

/// What to do when a shape that only exists in BioC v2 is encountered while reading or
/// writing BioC v1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub enum ShapePolicy {
    /// Fail with [`crate::BiocError::VersionError`]
    #[default]
    Reject,
    /// Print a warning and leave the element out
    Warn,
    /// Leave the element out silently
    Skip,
}

/// Character encoding declared for (and enforced on) XML output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Ascii,
}

impl TextEncoding {
    /// The label used in the XML declaration
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Ascii => "US-ASCII",
        }
    }

    /// Can this character be represented in this encoding?
    pub fn can_encode(&self, c: char) -> bool {
        match self {
            Self::Utf8 => true,
            Self::Ascii => c.is_ascii(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Serialisation format of a BioC file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum DataFormat {
    Xml,
    Json { compact: bool },
    JsonLines,
}

impl Default for DataFormat {
    fn default() -> Self {
        Self::Xml
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Xml => write!(f, "xml"),
            Self::Json { .. } => write!(f, "json"),
            Self::JsonLines => write!(f, "jsonl"),
        }
    }
}

/// The structural level of an annotation or relation within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Document,
    Passage,
    Sentence,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Document => write!(f, "document"),
            Self::Passage => write!(f, "passage"),
            Self::Sentence => write!(f, "sentence"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Collection,
    Document,
    Passage,
    Sentence,
    Annotation,
    Relation,
    Location,
    Node,
    Config,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Collection => "BioCCollection",
            Self::Document => "BioCDocument",
            Self::Passage => "BioCPassage",
            Self::Sentence => "BioCSentence",
            Self::Annotation => "BioCAnnotation",
            Self::Relation => "BioCRelation",
            Self::Location => "BioCLocation",
            Self::Node => "BioCNode",
            Self::Config => "Config",
        };
        write!(f, "{}", s)
    }
}

/// Reports the type of a structure at runtime, used in messages.
/// This is a sealed trait, not implementable outside this crate.
#[sealed(pub(crate))]
pub trait TypeInfo {
    fn typeinfo() -> Type;
}

/// Prints a debug message to stderr if debug mode is enabled in the configuration.
/// The message is only formatted when it is actually printed.
pub(crate) fn debug<F>(config: &Config, message_func: F)
where
    F: FnOnce() -> String,
{
    if config.debug() {
        eprintln!("[BIOC DEBUG] {}", message_func());
    }
}

/// Prints a warning to stderr, used by [`ShapePolicy::Warn`]
pub(crate) fn warn<F>(message_func: F)
where
    F: FnOnce() -> String,
{
    eprintln!("[BIOC WARNING] {}", message_func());
}
