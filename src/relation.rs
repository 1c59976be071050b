/*
    BioC Library (BioC document interchange model)

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`Relation`] and [`Node`] structures.

use datasize::DataSize;
use sealed::sealed;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::infons::{impl_has_infons, Infons};
use crate::types::*;

/// A node refers to an annotation or another relation participating in a relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize, Serialize, DataSize)]
pub struct Node {
    /// Identifier of the annotation or relation
    pub refid: String,

    /// How the referenced annotation or relation participates in the relation
    #[serde(default)]
    pub role: String,
}

impl Node {
    pub fn new(refid: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            refid: refid.into(),
            role: role.into(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Node[refid={},role={}]", self.refid, self.role)
    }
}

#[sealed]
impl TypeInfo for Node {
    fn typeinfo() -> Type {
        Type::Node
    }
}

/// Relationship between multiple annotations and possibly other relations
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, DataSize)]
pub struct Relation {
    /// May be empty
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub infons: Infons,

    #[serde(default)]
    pub nodes: SmallVec<[Node; 2]>,
}

impl_has_infons!(Relation);

impl Relation {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Builder pattern to add a node
    pub fn with_node(mut self, node: Node) -> Self {
        self.add_node(node);
        self
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Returns the first node with the given role
    pub fn node(&self, role: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.role == role)
    }
}

#[sealed]
impl TypeInfo for Relation {
    fn typeinfo() -> Type {
        Type::Relation
    }
}
