//! Object registry and per-document anchor sets
//!
//! Two separate stores back the domain:
//!
//! - [`ObjectRegistry`] maps a fullname to where it is documented. The last
//!   registration of a fullname wins; with [`CollisionPolicy::Warn`] the
//!   replacement is also logged and recorded.
//! - [`DocumentAnchors`] tracks which identifiers are already used as anchors
//!   in each document. Here the first registration wins.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use super::ObjectKind;
use crate::config::CollisionPolicy;

/// Where a registered object is documented
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectEntry {
    /// Document containing the object
    pub docname: String,
    /// Declared kind
    pub kind: ObjectKind,
    /// Anchor identifier inside the document
    pub anchor: String,
}

/// One registry row, as yielded for external indexing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObjectRecord<'a> {
    pub fullname: &'a str,
    pub kind: ObjectKind,
    pub docname: &'a str,
    pub anchor: &'a str,
}

/// A fullname that was registered again with a different entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub fullname: String,
    pub previous: ObjectEntry,
    pub replacement: ObjectEntry,
}

/// Fullname → entry map with an explicit collision policy
#[derive(Debug, Clone, Default)]
pub struct ObjectRegistry {
    objects: BTreeMap<String, ObjectEntry>,
    policy: CollisionPolicy,
    collisions: Vec<Collision>,
}

impl ObjectRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            objects: BTreeMap::new(),
            policy,
            collisions: Vec::new(),
        }
    }

    /// Register `fullname`, returning the entry it replaced
    pub fn insert(&mut self, fullname: impl Into<String>, entry: ObjectEntry) -> Option<ObjectEntry> {
        let fullname = fullname.into();
        let previous = self.objects.insert(fullname.clone(), entry.clone())?;
        if previous != entry && self.policy == CollisionPolicy::Warn {
            tracing::warn!(
                fullname = %fullname,
                previous_doc = %previous.docname,
                doc = %entry.docname,
                "C++ object registered twice; keeping the later registration"
            );
            self.collisions.push(Collision {
                fullname,
                previous: previous.clone(),
                replacement: entry,
            });
        }
        Some(previous)
    }

    /// Look up a fullname
    #[must_use]
    pub fn get(&self, fullname: &str) -> Option<&ObjectEntry> {
        self.objects.get(fullname)
    }

    /// Remove every entry documented in `docname`, returning how many were removed
    pub fn clear_doc(&mut self, docname: &str) -> usize {
        let before = self.objects.len();
        self.objects.retain(|_, entry| entry.docname != docname);
        before - self.objects.len()
    }

    /// All entries, sorted by fullname
    pub fn iter(&self) -> impl Iterator<Item = ObjectRecord<'_>> {
        self.objects.iter().map(|(fullname, entry)| ObjectRecord {
            fullname,
            kind: entry.kind,
            docname: &entry.docname,
            anchor: &entry.anchor,
        })
    }

    /// Recorded collisions (only with [`CollisionPolicy::Warn`])
    #[must_use]
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Identifiers already used as anchors, per document
#[derive(Debug, Clone, Default)]
pub struct DocumentAnchors {
    anchors: HashMap<String, HashSet<String>>,
}

impl DocumentAnchors {
    /// Claim `anchor` in `docname`; false if the document already has it
    pub fn claim(&mut self, docname: &str, anchor: &str) -> bool {
        self.anchors
            .entry(docname.to_string())
            .or_default()
            .insert(anchor.to_string())
    }

    #[must_use]
    pub fn contains(&self, docname: &str, anchor: &str) -> bool {
        self.anchors
            .get(docname)
            .is_some_and(|ids| ids.contains(anchor))
    }

    /// Forget every anchor of `docname`
    pub fn clear_doc(&mut self, docname: &str) {
        self.anchors.remove(docname);
    }
}
