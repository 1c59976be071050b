/*
    BioC Library (BioC document interchange model)

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`Annotation`] and [`Location`] structures.

use datasize::DataSize;
use sealed::sealed;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::error::BiocError;
use crate::infons::{impl_has_infons, Infons};
use crate::relation::Relation;
use crate::types::*;

/// The connection to the original text, made through an offset and a length.
/// Offsets count unicode codepoints (not bytes!) and are absolute in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, DataSize)]
pub struct Location {
    pub offset: usize,
    pub length: usize,
}

impl Location {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// The end offset (non-inclusive).
    /// Fails with [`BiocError::SpanError`] if the end lies beyond the largest possible offset.
    pub fn end(&self) -> Result<usize, BiocError> {
        self.offset.checked_add(self.length).ok_or_else(|| {
            BiocError::SpanError(format!("{} ends beyond the largest possible offset", self))
        })
    }

    /// Does this location fully cover the other one? Locations without a valid end cover nothing
    pub fn contains(&self, other: &Location) -> bool {
        match (self.end(), other.end()) {
            (Ok(end), Ok(other_end)) => self.offset <= other.offset && other_end <= end,
            _ => false,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Location[offset={},length={}]", self.offset, self.length)
    }
}

#[sealed]
impl TypeInfo for Location {
    fn typeinfo() -> Type {
        Type::Location
    }
}

/// A stand-off annotation: some text and the location(s) where it occurs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, DataSize)]
pub struct Annotation {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub infons: Infons,

    #[serde(default)]
    pub text: String,

    /// Discontinuous annotations have more than one location
    #[serde(default)]
    pub locations: SmallVec<[Location; 1]>,
}

impl_has_infons!(Annotation);

impl Annotation {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Builder pattern to add a location
    pub fn with_location(mut self, location: Location) -> Self {
        self.add_location(location);
        self
    }

    pub fn add_location(&mut self, location: Location) {
        self.locations.push(location);
    }

    /// The total span of this annotation: the smallest location covering all its
    /// locations. Discontinuous locations are merged.
    pub fn total_span(&self) -> Result<Location, BiocError> {
        let mut span: Option<(usize, usize)> = None;
        for location in self.locations.iter() {
            let end = location.end()?;
            span = Some(match span {
                Some((begin, max)) => (begin.min(location.offset), max.max(end)),
                None => (location.offset, end),
            });
        }
        match span {
            Some((begin, end)) => Ok(Location::new(begin, end - begin)),
            None => Err(BiocError::SpanError(format!(
                "{}: annotation must have at least one location",
                self.id
            ))),
        }
    }

    /// Does the total span of this annotation cover the total span of the other?
    pub fn contains(&self, other: &Annotation) -> Result<bool, BiocError> {
        Ok(self.total_span()?.contains(&other.total_span()?))
    }
}

#[sealed]
impl TypeInfo for Annotation {
    fn typeinfo() -> Type {
        Type::Annotation
    }
}

/// Implemented by the structures that hold annotations and relations (documents,
/// passages and sentences).
pub trait HasAnnotations {
    fn annotations(&self) -> &[Annotation];

    fn relations(&self) -> &[Relation];

    fn annotations_mut(&mut self) -> &mut Vec<Annotation>;

    fn relations_mut(&mut self) -> &mut Vec<Relation>;

    fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations_mut().push(annotation);
    }

    fn add_relation(&mut self, relation: Relation) {
        self.relations_mut().push(relation);
    }

    /// Removes all annotations
    fn clear_annotations(&mut self) {
        self.annotations_mut().clear();
    }

    /// Removes all relations
    fn clear_relations(&mut self) {
        self.relations_mut().clear();
    }

    /// Returns the annotation with the given id, if any
    fn annotation(&self, id: &str) -> Option<&Annotation> {
        self.annotations().iter().find(|a| a.id == id)
    }
}

macro_rules! impl_has_annotations {
    ($($t:ty),*) => {
        $(
            impl crate::annotation::HasAnnotations for $t {
                fn annotations(&self) -> &[crate::annotation::Annotation] {
                    &self.annotations
                }

                fn relations(&self) -> &[crate::relation::Relation] {
                    &self.relations
                }

                fn annotations_mut(&mut self) -> &mut Vec<crate::annotation::Annotation> {
                    &mut self.annotations
                }

                fn relations_mut(&mut self) -> &mut Vec<crate::relation::Relation> {
                    &mut self.relations
                }
            }
        )*
    };
}

pub(crate) use impl_has_annotations;
