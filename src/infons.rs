/*
    BioC Library (BioC document interchange model)

        Licensed under the GNU General Public License v3
*/

//! Infons are free-form key/value metadata pairs that can be attached to every structure.

use datasize::DataSize;
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::mem::size_of;

/// An owned mapping from infon key to value. Keys are unique, insertion order is not kept;
/// iteration is in key order so that serialisation is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Infons(BTreeMap<String, String>);

impl Infons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an infon, replacing and returning any previous value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes all infons
    pub fn clear(&mut self) {
        self.0.clear()
    }

    /// Replaces all infons with the given ones
    pub fn replace(&mut self, infons: Infons) {
        self.0 = infons.0;
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> InfonsIter<'_> {
        InfonsIter(self.0.iter())
    }
}

pub struct InfonsIter<'a>(btree_map::Iter<'a, String, String>);

impl<'a> Iterator for InfonsIter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'a> IntoIterator for &'a Infons {
    type Item = (&'a str, &'a str);
    type IntoIter = InfonsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Infons
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl DataSize for Infons {
    const IS_DYNAMIC: bool = true;
    const STATIC_HEAP_SIZE: usize = 0;

    fn estimate_heap_size(&self) -> usize {
        self.0
            .iter()
            .map(|(k, v)| size_of::<(String, String)>() + k.capacity() + v.capacity())
            .sum()
    }
}

/// Implemented by every structure that carries infons
pub trait HasInfons {
    fn infons(&self) -> &Infons;

    fn infons_mut(&mut self) -> &mut Infons;

    /// Shortcut to get the value of an infon
    fn infon(&self, key: &str) -> Option<&str> {
        self.infons().get(key)
    }

    /// Shortcut to set an infon, replacing any previous value
    fn set_infon(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.infons_mut().insert(key, value);
    }

    /// Clears all infons
    fn clear_infons(&mut self) {
        self.infons_mut().clear();
    }
}

macro_rules! impl_has_infons {
    ($($t:ty),*) => {
        $(
            impl crate::infons::HasInfons for $t {
                fn infons(&self) -> &crate::infons::Infons {
                    &self.infons
                }

                fn infons_mut(&mut self) -> &mut crate::infons::Infons {
                    &mut self.infons
                }
            }
        )*
    };
}

pub(crate) use impl_has_infons;
