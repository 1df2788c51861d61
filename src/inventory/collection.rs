//! The client-side view of the remote collection
//!
//! A cache, not an authority: it is only ever replaced wholesale with
//! the server's response order, never patched in place.

use super::types::{InventoryItem, InventoryStats};

/// Ordered sequence of inventory items in server response order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryCollection {
    items: Vec<InventoryItem>,
}

impl InventoryCollection {
    /// Build a collection from a server response
    pub fn from_items(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    /// Replace the whole collection with a fresh server response
    pub fn replace(&mut self, items: Vec<InventoryItem>) {
        self.items = items;
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by server id
    pub fn get(&self, id: i64) -> Option<&InventoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Aggregates over the full collection, recomputed on every call
    pub fn stats(&self) -> InventoryStats {
        InventoryStats {
            count: self.items.len(),
            total_quantity: self.items.iter().map(|item| item.quantity).sum(),
            total_value: self.items.iter().map(|item| item.line_value()).sum(),
        }
    }

    /// Case-insensitive substring search over name and description.
    /// Pure and synchronous; an empty term matches everything.
    pub fn search(&self, term: &str) -> InventoryCollection {
        let needle = term.to_lowercase();
        let items = self
            .items
            .iter()
            .filter(|item| {
                item.name.to_lowercase().contains(&needle)
                    || item
                        .description
                        .as_ref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        InventoryCollection { items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, name: &str, quantity: i64, price: f64, description: Option<&str>) -> InventoryItem {
        InventoryItem {
            id,
            name: name.to_string(),
            quantity,
            price,
            description: description.map(str::to_string),
        }
    }

    fn sample() -> InventoryCollection {
        InventoryCollection::from_items(vec![
            item(1, "Widget", 5, 9.99, Some("small metal widget")),
            item(2, "Gadget", 2, 120.50, None),
            item(3, "Cable", 40, 1.25, Some("USB-C, 1m")),
        ])
    }

    #[test]
    fn stats_sum_quantities_and_line_values() {
        let stats = sample().stats();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.total_quantity, 47);
        let expected = 5.0 * 9.99 + 2.0 * 120.50 + 40.0 * 1.25;
        assert!((stats.total_value - expected).abs() < 1e-9);
    }

    #[test]
    fn stats_of_empty_collection_are_zero() {
        let stats = InventoryCollection::default().stats();
        assert_eq!(stats, InventoryStats::default());
    }

    #[test]
    fn empty_term_matches_everything() {
        let all = sample().search("");
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn search_is_case_insensitive_over_name() {
        let hits = sample().search("wIdGeT");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.items()[0].id, 1);
    }

    #[test]
    fn search_also_matches_description() {
        let hits = sample().search("usb");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.items()[0].name, "Cable");
    }

    #[test]
    fn search_returns_a_subset_containing_the_term() {
        let collection = sample();
        let hits = collection.search("et");
        assert!(hits.len() <= collection.len());
        for hit in hits.items() {
            let in_name = hit.name.to_lowercase().contains("et");
            let in_description = hit
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains("et"));
            assert!(in_name || in_description);
            assert!(collection.get(hit.id).is_some());
        }
    }

    #[test]
    fn replace_is_wholesale() {
        let mut collection = sample();
        collection.replace(vec![item(9, "Crate", 1, 3.0, None)]);
        assert_eq!(collection.len(), 1);
        assert!(collection.get(1).is_none());
        assert!(collection.get(9).is_some());
    }
}
