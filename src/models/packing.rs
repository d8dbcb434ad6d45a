//! Packing list content model
//!
//! A packing list is a mapping from category label to items. Category order
//! is insertion order and carries meaning (display order), so the model keeps
//! an ordered sequence internally while still serializing as a plain JSON
//! object.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single item on a packing list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingItem {
    /// Item name, non-empty
    pub name: String,
    /// Quantity as produced by the generator; carried as a JSON number
    pub quantity: f64,
    /// Whether the item has been packed; always false on fresh lists
    #[serde(default)]
    pub packed: bool,
}

impl PackingItem {
    /// Create an unpacked item
    #[must_use]
    pub fn new<S: Into<String>>(name: S, quantity: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
            packed: false,
        }
    }
}

/// Ordered category → items mapping
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackingListContent {
    categories: Vec<(String, Vec<PackingItem>)>,
}

impl PackingListContent {
    /// Create an empty list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a category, or replace its items if the label already exists.
    /// Replacing keeps the original position, matching JSON object semantics.
    pub fn insert<S: Into<String>>(&mut self, label: S, items: Vec<PackingItem>) {
        let label = label.into();
        if let Some(entry) = self.categories.iter_mut().find(|(l, _)| *l == label) {
            entry.1 = items;
        } else {
            self.categories.push((label, items));
        }
    }

    /// Items of a category, if present
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&[PackingItem]> {
        self.categories
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, items)| items.as_slice())
    }

    #[must_use]
    pub fn contains_category(&self, label: &str) -> bool {
        self.categories.iter().any(|(l, _)| l == label)
    }

    /// Number of categories
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PackingItem])> {
        self.categories
            .iter()
            .map(|(label, items)| (label.as_str(), items.as_slice()))
    }

    /// Total number of items across all categories
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|(_, items)| items.len()).sum()
    }
}

impl Serialize for PackingListContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for (label, items) in &self.categories {
            map.serialize_entry(label, items)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PackingListContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ContentVisitor;

        impl<'de> Visitor<'de> for ContentVisitor {
            type Value = PackingListContent;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of category labels to item arrays")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut content = PackingListContent::new();
                while let Some((label, items)) =
                    access.next_entry::<String, Vec<PackingItem>>()?
                {
                    content.insert(label, items);
                }
                Ok(content)
            }
        }

        deserializer.deserialize_map(ContentVisitor)
    }
}
