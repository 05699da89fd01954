//! Locally persisted favorites.
//!
//! The store is a mapping from photo ID to the full photo record. Entries are
//! denormalized on purpose: the external API does not guarantee a photo stays
//! retrievable by ID, so a favorite must survive on its own. The whole store
//! is serialized to JSON and rewritten under a single key on every mutation;
//! there is exactly one writer (the current session), so no merge logic is
//! needed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Photo;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("favorites serialization failed: {0}")]
    Serialization(String),

    #[error("favorites deserialization failed: {0}")]
    Deserialization(String),
}

/// The user's favorite photos, keyed by photo ID.
///
/// Backed by a `BTreeMap` so iteration (and therefore the rendered favorites
/// grid) is stable across sessions. The persisted form is a plain JSON object
/// keyed by photo ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesStore {
    entries: BTreeMap<String, Photo>,
}

impl FavoritesStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, photo_id: &str) -> bool {
        self.entries.contains_key(photo_id)
    }

    #[must_use]
    pub fn get(&self, photo_id: &str) -> Option<&Photo> {
        self.entries.get(photo_id)
    }

    /// Photos in stable (ID-sorted) order.
    pub fn photos(&self) -> impl Iterator<Item = &Photo> {
        self.entries.values()
    }

    /// Remove the photo if it is already a favorite, insert it otherwise.
    ///
    /// Returns `true` when the photo is a favorite after the call. Toggling
    /// the same photo twice leaves the store unchanged.
    pub fn toggle(&mut self, photo: Photo) -> bool {
        if self.entries.remove(&photo.id).is_some() {
            false
        } else {
            self.entries.insert(photo.id.clone(), photo);
            true
        }
    }

    /// Serialize the full store for persistence.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Rebuild the store from its persisted representation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Deserialization(e.to_string()))
    }
}
