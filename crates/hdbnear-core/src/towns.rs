use std::collections::BTreeSet;

use serde::Serialize;

/// Deduplicated set of town names bounding a search's dataset queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TownSet(BTreeSet<String>);

impl TownSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a town, normalised to upper case. Returns `false` if it was
    /// already present or blank.
    pub fn insert(&mut self, town: &str) -> bool {
        let town = town.trim();
        if town.is_empty() {
            return false;
        }
        self.0.insert(town.to_uppercase())
    }

    #[must_use]
    pub fn contains(&self, town: &str) -> bool {
        self.0.contains(&town.trim().to_uppercase())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for TownSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut set = TownSet::new();
        for town in iter {
            set.insert(town);
        }
        set
    }
}
