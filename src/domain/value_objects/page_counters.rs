//! Per-page visit counters.

use std::collections::BTreeMap;

use serde::Serialize;

/// Visit count per page. Counts only ever grow.
///
/// Backed by a `BTreeMap` so serialized snapshots have a stable key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageCounters(BTreeMap<String, u64>);

impl PageCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` visits to `page`.
    pub fn add(&mut self, page: &str, count: u64) {
        match self.0.get_mut(page) {
            Some(existing) => *existing += count,
            None => {
                self.0.insert(page.to_owned(), count);
            }
        }
    }

    /// Count one visit to `page`.
    pub fn increment(&mut self, page: &str) {
        self.add(page, 1);
    }

    /// Visits recorded for `page` (zero when never seen).
    pub fn get(&self, page: &str) -> u64 {
        self.0.get(page).copied().unwrap_or(0)
    }

    /// Sum over all pages.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Merge another set of counters into this one.
    pub fn merge(&mut self, other: &PageCounters) {
        for (page, count) in other.iter() {
            self.add(page, count);
        }
    }

    /// Keep only the entry for `page`.
    pub fn only(&self, page: &str) -> PageCounters {
        self.0
            .get_key_value(page)
            .map(|(page, count)| PageCounters(BTreeMap::from([(page.clone(), *count)])))
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(page, count)| (page.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, u64)> for PageCounters {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counters = PageCounters::new();
        for (page, count) in iter {
            counters.add(&page, count);
        }
        counters
    }
}
