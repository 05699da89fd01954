//! Breed and photo records, plus the pure derivation layer that powers the
//! origin filter.
//!
//! Records are decoded straight from the public catalogue API and replaced
//! wholesale on every refetch; nothing in this module performs IO.

use serde::{Deserialize, Serialize};

/// A cat breed as returned by the breed-listing endpoint.
///
/// The `origin` field is free text and may name several countries separated
/// by commas (e.g. `"Burma, France"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breed {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub temperament: Option<String>,
}

impl Breed {
    /// Whether this breed matches an origin filter.
    ///
    /// Matching is case-insensitive substring containment against the raw,
    /// unsplit origin field, so a multi-origin breed matches any of its
    /// countries (and partial country names match too).
    #[must_use]
    pub fn matches_origin(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.origin
            .as_deref()
            .map(|origin| origin.to_lowercase().contains(&needle))
            .unwrap_or(false)
    }
}

/// A sample photograph for a breed.
///
/// Identified by a stable external ID; both the transient gallery and the
/// persisted favorites store hold full copies of this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// The distinct origin countries present in a breed list.
///
/// Each breed's origin field is split on commas and trimmed before
/// de-duplication; the result is lexicographically sorted. Breeds without an
/// origin contribute nothing.
#[must_use]
pub fn unique_origins(breeds: &[Breed]) -> Vec<String> {
    let mut origins: Vec<String> = breeds
        .iter()
        .filter_map(|breed| breed.origin.as_deref())
        .flat_map(|origin| origin.split(','))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect();

    origins.sort();
    origins.dedup();
    origins
}

/// The subset of `breeds` whose origin matches `origin`.
///
/// Note the asymmetry with [`unique_origins`]: the list of selectable origins
/// is built from split tokens, while matching here is substring containment
/// against the raw field.
#[must_use]
pub fn filter_by_origin<'a>(breeds: &'a [Breed], origin: &str) -> Vec<&'a Breed> {
    if origin.trim().is_empty() {
        return breeds.iter().collect();
    }
    breeds
        .iter()
        .filter(|breed| breed.matches_origin(origin))
        .collect()
}
