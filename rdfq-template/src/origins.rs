//! Variable provenance
//!
//! [`OriginTable`] maps each captured variable to the template location it
//! came from, in first-capture order. Compiled queries carry the table as
//! `# @origin <var> <path>` comments; [`origins_from_query`] reads them back.

use regex::Regex;
use rustc_hash::FxHashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::{Arc, OnceLock};

/// Insertion-ordered variable → origin map
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OriginTable {
    entries: Vec<(Arc<str>, Arc<str>)>,
    index: FxHashMap<Arc<str>, usize>,
}

impl OriginTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an origin. Re-recording a variable replaces its origin but
    /// keeps its position.
    pub fn insert(&mut self, var: impl AsRef<str>, origin: impl AsRef<str>) {
        let origin: Arc<str> = Arc::from(origin.as_ref());
        match self.index.get(var.as_ref()) {
            Some(&pos) => self.entries[pos].1 = origin,
            None => {
                let var: Arc<str> = Arc::from(var.as_ref());
                self.index.insert(var.clone(), self.entries.len());
                self.entries.push((var, origin));
            }
        }
    }

    pub fn get(&self, var: &str) -> Option<&str> {
        self.index.get(var).map(|&pos| self.entries[pos].1.as_ref())
    }

    /// Whether any variable was captured from `origin`
    pub fn contains_origin(&self, origin: &str) -> bool {
        self.entries.iter().any(|(_, o)| o.as_ref() == origin)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(v, o)| (v.as_ref(), o.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for OriginTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (var, origin) in &self.entries {
            map.serialize_entry(var.as_ref(), origin.as_ref())?;
        }
        map.end()
    }
}

fn origin_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"# @origin ([^\s]+)\s([^\n]+)\n").expect("origin pattern is valid")
    })
}

/// Extract the origin annotations of a compiled query
pub fn origins_from_query(text: &str) -> OriginTable {
    let mut table = OriginTable::new();
    for caps in origin_pattern().captures_iter(text) {
        table.insert(&caps[1], &caps[2]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reinsert_keeps_position() {
        let mut table = OriginTable::new();
        table.insert("a", "/1");
        table.insert("b", "/2");
        table.insert("a", "/3");
        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![("a", "/3"), ("b", "/2")]);
        assert!(table.contains_origin("/2"));
        assert!(!table.contains_origin("/1"));
    }

    #[test]
    fn test_origins_from_query() {
        let text = "SELECT REDUCED *\nWHERE {\n}\n# @origin name /a/b/c\n# @origin _x /1 /2\n";
        let table = origins_from_query(text);
        assert_eq!(table.get("name"), Some("/a/b/c"));
        assert_eq!(table.get("_x"), Some("/1 /2"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_unterminated_annotation_ignored() {
        assert!(origins_from_query("# @origin name /a/b/c").is_empty());
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let mut table = OriginTable::new();
        table.insert("z", "/1");
        table.insert("a", "/2");
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"z":"/1","a":"/2"}"#);
    }
}
