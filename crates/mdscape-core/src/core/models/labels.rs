use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Mapping from entity identifier to a categorical tag (e.g. a lineage name).
///
/// Labels are joined to a [`Configuration`](super::configuration::Configuration) by
/// identifier, never by position. Iteration order is sorted by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryLabels {
    labels: BTreeMap<String, String>,
}

impl CategoryLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            labels: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Assigns `category` to `identifier`, returning the previous category if any.
    pub fn insert(
        &mut self,
        identifier: impl Into<String>,
        category: impl Into<String>,
    ) -> Option<String> {
        self.labels.insert(identifier.into(), category.into())
    }

    /// Assigns `category` to `identifier` unless it already carries a different one.
    ///
    /// Returns the conflicting category on failure. Re-assigning the same category is a no-op.
    pub fn try_insert(
        &mut self,
        identifier: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<(), String> {
        let category = category.into();
        match self.labels.entry(identifier.into()) {
            Entry::Vacant(slot) => {
                slot.insert(category);
                Ok(())
            }
            Entry::Occupied(slot) if *slot.get() == category => Ok(()),
            Entry::Occupied(slot) => Err(slot.get().clone()),
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.labels.get(identifier).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.labels.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Distinct category names, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.labels.values().map(String::as_str).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }
}
