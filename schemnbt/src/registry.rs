//! Maps discriminator bytes to the tag kinds they denote.
//!
//! Every decode goes through a [`Registry`]: the decoder reads a
//! discriminator, resolves it here, and calls the bound decode function. An
//! id with nothing bound to it aborts the decode with
//! [`ErrorKind::UnknownTagKind`][crate::error::ErrorKind::UnknownTagKind],
//! since the length of an unknown payload cannot be known.
//!
//! The set of kinds is closed, so a registry only decides *which* byte means
//! which kind. The process-wide registry returned by [`registry`] holds the
//! twelve built-in kinds and is never mutated after it is built.

use std::fmt;

use log::debug;
use once_cell::sync::Lazy;

use crate::de::{decoder_for, DecodeFn};
use crate::error::{Error, Result};
use crate::TagKind;

static BUILTIN: Lazy<Registry> = Lazy::new(Registry::builtin);

/// The process-wide registry of the built-in kinds, ids 1 to 12.
pub fn registry() -> &'static Registry {
    &BUILTIN
}

/// A kind bound to an id, along with the function that decodes its payload.
#[derive(Clone, Copy)]
pub struct Entry {
    pub kind: TagKind,
    pub decode: DecodeFn,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry").field("kind", &self.kind).finish()
    }
}

/// Lookup table from a one-byte discriminator to a tag kind.
#[derive(Clone)]
pub struct Registry {
    entries: [Option<Entry>; 256],
}

impl Registry {
    /// A registry with nothing bound. Every id fails to resolve.
    pub fn new() -> Self {
        Self {
            entries: [None; 256],
        }
    }

    /// A registry with the twelve built-in kinds bound to their standard ids.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for kind in TagKind::BUILTIN {
            registry.entries[kind.id() as usize] = Some(Entry {
                kind,
                decode: decoder_for(kind),
            });
        }
        debug!("registered {} built-in tag kinds", TagKind::BUILTIN.len());
        registry
    }

    /// Bind `id` to `kind`. Fails with `DuplicateRegistration` if `id` is
    /// already bound, unless `overwrite` is set.
    ///
    /// `End` is not a payload-carrying kind and cannot be bound.
    pub fn register(&mut self, id: u8, kind: TagKind, overwrite: bool) -> Result<()> {
        if kind == TagKind::End {
            return Err(Error::structural("End has no payload and cannot be registered"));
        }

        let slot = &mut self.entries[id as usize];
        if let Some(existing) = slot {
            if !overwrite {
                return Err(Error::duplicate_registration(id, existing.kind));
            }
        }

        *slot = Some(Entry {
            kind,
            decode: decoder_for(kind),
        });
        Ok(())
    }

    /// Get the entry bound to `id`, or fail with `UnknownTagKind`.
    pub fn entry(&self, id: u8) -> Result<&Entry> {
        self.entries[id as usize]
            .as_ref()
            .ok_or_else(|| Error::unknown_tag(id))
    }

    /// Get the kind bound to `id`, or fail with `UnknownTagKind`.
    pub fn resolve(&self, id: u8) -> Result<TagKind> {
        self.entry(id).map(|e| e.kind)
    }

    /// Iterate over the bound ids and their kinds in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, TagKind)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(id, e)| e.map(|e| (id as u8, e.kind)))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
