//! Persisted list of bookmarked cities.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::storage::KeyValueStore;

/// Storage key holding the JSON array of favorite city names.
pub const FAVORITES_KEY: &str = "favorites";

/// Insertion-ordered, duplicate-free city names backed by a [`KeyValueStore`].
#[derive(Debug)]
pub struct Favorites<S> {
    store: S,
    cities: Vec<String>,
}

impl<S: KeyValueStore> Favorites<S> {
    /// Read the persisted list once. Anything unreadable counts as empty.
    pub fn load(store: S) -> Self {
        let cities = match store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(cities) => dedup(cities),
                Err(err) => {
                    warn!(error = %err, "Stored favorites are not a JSON string array; starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "Could not read favorites; starting empty");
                Vec::new()
            }
        };

        Self { store, cities }
    }

    pub fn list(&self) -> &[String] {
        &self.cities
    }

    pub fn contains(&self, city: &str) -> bool {
        self.cities.iter().any(|c| c == city)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Append `city` and persist. Returns `Ok(false)` for the empty name and
    /// exact duplicates.
    ///
    /// # Errors
    /// Fails when the store cannot be written; the in-memory list keeps the
    /// new city.
    pub fn add(&mut self, city: &str) -> Result<bool> {
        if city.is_empty() || self.contains(city) {
            return Ok(false);
        }

        self.cities.push(city.to_string());
        info!(city, "Added favorite");
        self.save()?;
        Ok(true)
    }

    /// Remove every exact match of `city` and persist. Returns `Ok(false)`
    /// without writing when nothing matched.
    ///
    /// # Errors
    /// Fails when the store cannot be written.
    pub fn remove(&mut self, city: &str) -> Result<bool> {
        let before = self.cities.len();
        self.cities.retain(|c| c != city);

        if self.cities.len() == before {
            return Ok(false);
        }

        info!(city, "Removed favorite");
        self.save()?;
        Ok(true)
    }

    pub fn save(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.cities).context("Failed to encode favorites")?;
        self.store
            .set(FAVORITES_KEY, json)
            .context("Failed to persist favorites")
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

fn dedup(cities: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(cities.len());
    for city in cities {
        if !out.contains(&city) {
            out.push(city);
        }
    }
    out
}
