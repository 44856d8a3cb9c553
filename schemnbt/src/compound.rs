use std::convert::TryFrom;
use std::ops::{Deref, DerefMut, Index};

use indexmap::{map, IndexMap};

use crate::error::{Error, Result};
use crate::{Native, Tag, TagKind};

/// An insertion-ordered map of string keys to tags. Keys are unique, and
/// iteration and encoding follow the order keys were first inserted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound {
    entries: IndexMap<String, Tag>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert a tag, returning the previous tag for `key` if there was one.
    /// Replacing a key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, tag: impl Into<Tag>) -> Option<Tag> {
        self.entries.insert(key.into(), tag.into())
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Tag> {
        self.entries.get_mut(key)
    }

    /// Remove `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> map::Iter<'_, String, Tag> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> map::IterMut<'_, String, Tag> {
        self.entries.iter_mut()
    }

    pub fn keys(&self) -> map::Keys<'_, String, Tag> {
        self.entries.keys()
    }

    pub fn values(&self) -> map::Values<'_, String, Tag> {
        self.entries.values()
    }

    pub fn to_native(&self) -> IndexMap<String, Native> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_native()))
            .collect()
    }
}

impl Index<&str> for Compound {
    type Output = Tag;

    /// # Panics
    ///
    /// If `key` is not present.
    fn index(&self, key: &str) -> &Tag {
        &self.entries[key]
    }
}

impl<K: Into<String>, V: Into<Tag>> FromIterator<(K, V)> for Compound {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Tag>> Extend<(K, V)> for Compound {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())))
    }
}

impl IntoIterator for Compound {
    type Item = (String, Tag);
    type IntoIter = map::IntoIter<String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a String, &'a Tag);
    type IntoIter = map::Iter<'a, String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// An ordered sequence of tags that all have the same kind. The kind is set
/// by the first element, an empty list has none.
///
/// Every way of adding a tag checks its kind, so a list can never hold mixed
/// kinds. For the same reason elements are only handed out mutably when they
/// are themselves containers, see [`compound_mut`](Self::compound_mut) and
/// [`list_mut`](Self::list_mut).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct List {
    items: Vec<Tag>,
}

impl List {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from tags, failing with a structural error if they are
    /// not all of one kind.
    pub fn from_tags(items: Vec<Tag>) -> Result<Self> {
        if let Some(first) = items.first() {
            let kind = first.kind();
            if let Some((i, odd)) = items.iter().enumerate().find(|(_, t)| t.kind() != kind) {
                return Err(mixed(kind, odd.kind(), i));
            }
        }
        Ok(Self { items })
    }

    /// Items already known to share a kind, as produced by the decoders.
    pub(crate) fn from_vec_unchecked(items: Vec<Tag>) -> Self {
        Self { items }
    }

    /// The kind of the elements, or `None` if the list is empty.
    pub fn kind(&self) -> Option<TagKind> {
        self.items.first().map(Tag::kind)
    }

    /// The element kind as written on the wire, `End` for an empty list.
    pub fn element_kind(&self) -> TagKind {
        self.kind().unwrap_or(TagKind::End)
    }

    pub fn push(&mut self, tag: impl Into<Tag>) -> Result<()> {
        let tag = tag.into();
        self.check(&tag, self.items.len())?;
        self.items.push(tag);
        Ok(())
    }

    /// # Panics
    ///
    /// If `index > len`.
    pub fn insert(&mut self, index: usize, tag: impl Into<Tag>) -> Result<()> {
        let tag = tag.into();
        self.check(&tag, index)?;
        self.items.insert(index, tag);
        Ok(())
    }

    /// Replace the element at `index`, returning the old one.
    ///
    /// # Panics
    ///
    /// If `index` is out of bounds.
    pub fn set(&mut self, index: usize, tag: impl Into<Tag>) -> Result<Tag> {
        let tag = tag.into();
        if self.items.len() > 1 {
            self.check(&tag, index)?;
        }
        Ok(std::mem::replace(&mut self.items[index], tag))
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.items.get(index)
    }

    pub fn compound_mut(&mut self, index: usize) -> Option<&mut Compound> {
        self.items.get_mut(index).and_then(Tag::as_compound_mut)
    }

    pub fn list_mut(&mut self, index: usize) -> Option<&mut List> {
        match self.items.get_mut(index) {
            Some(Tag::List(list)) => Some(list),
            _ => None,
        }
    }

    /// # Panics
    ///
    /// If `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Tag {
        self.items.remove(index)
    }

    pub fn pop(&mut self) -> Option<Tag> {
        self.items.pop()
    }

    pub fn clear(&mut self) {
        self.items.clear()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Tag] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Tag> {
        self.items
    }

    // The index is only for the error message.
    fn check(&self, tag: &Tag, index: usize) -> Result<()> {
        match self.kind() {
            Some(kind) if kind != tag.kind() => Err(mixed(kind, tag.kind(), index)),
            _ => Ok(()),
        }
    }
}

fn mixed(expected: TagKind, found: TagKind, index: usize) -> Error {
    Error::structural(format!(
        "list of {} cannot hold a {} (at index {})",
        expected, found, index
    ))
}

impl TryFrom<Vec<Tag>> for List {
    type Error = Error;

    fn try_from(items: Vec<Tag>) -> Result<Self> {
        Self::from_tags(items)
    }
}

impl IntoIterator for List {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// The top of an encoded stream: a compound bound to a single name, which is
/// usually the empty string.
///
/// Derefs to the inner compound, so entries can be read and written directly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamedRoot {
    name: String,
    compound: Compound,
}

impl NamedRoot {
    pub fn new(name: impl Into<String>, compound: Compound) -> Self {
        Self {
            name: name.into(),
            compound,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn compound(&self) -> &Compound {
        &self.compound
    }

    pub fn compound_mut(&mut self) -> &mut Compound {
        &mut self.compound
    }

    pub fn into_compound(self) -> Compound {
        self.compound
    }

    pub fn into_parts(self) -> (String, Compound) {
        (self.name, self.compound)
    }

    /// A single-entry map from the root's name to its compound.
    pub fn to_native(&self) -> Native {
        let mut map = IndexMap::with_capacity(1);
        map.insert(self.name.clone(), Native::Map(self.compound.to_native()));
        Native::Map(map)
    }
}

impl TryFrom<Compound> for NamedRoot {
    type Error = Error;

    /// Unwrap a compound holding exactly one entry, whose value must itself be
    /// a compound.
    fn try_from(outer: Compound) -> Result<Self> {
        if outer.len() != 1 {
            return Err(Error::structural(format!(
                "named root must have exactly one entry, found {}",
                outer.len()
            )));
        }

        match outer.into_iter().next() {
            Some((name, Tag::Compound(compound))) => Ok(Self { name, compound }),
            Some((name, other)) => Err(Error::structural(format!(
                "named root {:?} must hold a Compound, found {}",
                name,
                other.kind()
            ))),
            None => Err(Error::structural("named root has no entry")),
        }
    }
}

impl From<NamedRoot> for Compound {
    fn from(root: NamedRoot) -> Self {
        let mut outer = Compound::with_capacity(1);
        outer.insert(root.name, root.compound);
        outer
    }
}

impl Deref for NamedRoot {
    type Target = Compound;

    fn deref(&self) -> &Compound {
        &self.compound
    }
}

impl DerefMut for NamedRoot {
    fn deref_mut(&mut self) -> &mut Compound {
        &mut self.compound
    }
}
