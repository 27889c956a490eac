//! Entity frequency table

use std::collections::HashMap;

/// Occurrence counts of entity surface strings across a run
///
/// Counts only ever grow; a string never seen has frequency 0.
#[derive(Debug, Clone, Default)]
pub struct EntityFrequencies {
    counts: HashMap<String, usize>,
}

impl EntityFrequencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of an entity
    pub fn record(&mut self, entity: &str) {
        *self.counts.entry(entity.to_string()).or_insert(0) += 1;
    }

    /// Occurrences of an entity, 0 when never seen
    pub fn count(&self, entity: &str) -> usize {
        self.counts.get(entity).copied().unwrap_or(0)
    }

    /// Number of distinct entities
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `n` most frequent entities, ties broken alphabetically
    pub fn most_common(&self, n: usize) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .counts
            .iter()
            .map(|(entity, count)| (entity.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }
}
