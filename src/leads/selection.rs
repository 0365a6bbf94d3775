//! Row-selection state feeding bulk actions.
//!
//! The selection is always reconciled against the filtered id space: the
//! app calls [`Selection::retain`] after every filter change, so select-all
//! followed by narrowing a filter can never leave stale, invisible ids
//! marked for a bulk action.

use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct Selection {
    ids: HashSet<String>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Select-all semantics coupled to the filter: if everything currently
    /// visible is already selected, clear; otherwise select exactly the
    /// visible ids (never the full unfiltered collection).
    pub fn toggle_all<'a>(&mut self, filtered_ids: impl IntoIterator<Item = &'a str>) {
        let filtered: HashSet<String> = filtered_ids.into_iter().map(String::from).collect();
        if self.ids.len() == filtered.len() {
            self.ids.clear();
        } else {
            self.ids = filtered;
        }
    }

    /// Drop ids no longer present in the filtered set.
    pub fn retain<'a>(&mut self, filtered_ids: impl IntoIterator<Item = &'a str>) {
        let filtered: HashSet<&str> = filtered_ids.into_iter().collect();
        self.ids.retain(|id| filtered.contains(id.as_str()));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_membership() {
        let mut sel = Selection::default();
        sel.toggle("a");
        assert!(sel.contains("a"));
        sel.toggle("a");
        assert!(!sel.contains("a"));
    }

    #[test]
    fn test_toggle_all_selects_exactly_filtered() {
        let mut sel = Selection::default();
        sel.toggle("stale");
        sel.toggle_all(["a", "b", "c"]);
        assert_eq!(sel.len(), 3);
        assert!(sel.contains("a") && sel.contains("b") && sel.contains("c"));
        assert!(!sel.contains("stale"));
    }

    #[test]
    fn test_toggle_all_twice_returns_to_empty() {
        // Idempotent in pairs under a stable filtered set.
        let mut sel = Selection::default();
        let filtered = ["a", "b", "c"];
        sel.toggle_all(filtered);
        assert_eq!(sel.len(), 3);
        sel.toggle_all(filtered);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_retain_reconciles_after_narrowing() {
        // Select all 5 visible leads, then the filter narrows to 2.
        let mut sel = Selection::default();
        sel.toggle_all(["a", "b", "c", "d", "e"]);
        assert_eq!(sel.len(), 5);

        let narrowed = ["b", "d"];
        sel.retain(narrowed);
        assert_eq!(sel.len(), 2);
        assert!(sel.contains("b") && sel.contains("d"));

        // The narrowed set is now fully selected, so toggle-all clears it.
        sel.toggle_all(narrowed);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_toggle_all_after_partial_selection() {
        let mut sel = Selection::default();
        sel.toggle("a");
        sel.toggle_all(["a", "b"]);
        assert_eq!(sel.len(), 2);
    }
}
