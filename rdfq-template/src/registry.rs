//! Variable name allocation
//!
//! Labels derived from predicates repeat, so each label carries a counter:
//! the first request for `name` gets `name`, later ones `name1`, `name2`, ...
//! Resources (blank nodes) keep the name they were first given.

use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct VariableRegistry {
    /// Resource key to assigned name, suffix included
    names: FxHashMap<Arc<str>, Arc<str>>,
    /// Label to the last suffix handed out
    counters: FxHashMap<Arc<str>, u32>,
}

impl VariableRegistry {
    /// Allocate the next name for `label`
    pub fn next_name(&mut self, label: &str) -> String {
        match self.counters.get_mut(label) {
            Some(n) => {
                *n += 1;
                format!("{}{}", label, n)
            }
            None => {
                self.counters.insert(Arc::from(label), 0);
                label.to_string()
            }
        }
    }

    /// Name of a resource, assigning one from `label` on first sight.
    ///
    /// An unknown resource with no label gets no name.
    pub fn name_for(&mut self, key: &str, label: Option<&str>) -> Option<Arc<str>> {
        if let Some(name) = self.names.get(key) {
            return Some(name.clone());
        }
        let name: Arc<str> = Arc::from(self.next_name(label?));
        self.names.insert(Arc::from(key), name.clone());
        Some(name)
    }

    /// Name already assigned to a resource
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.names.get(key).map(|name| name.as_ref())
    }
}
