//! # Item Catalogs
//!
//! The host game owns its item data; this module defines how the resolver
//! reads it. A catalog maps canonical IDs to records and can be enumerated in
//! a stable order. [`MemoryCatalog`] and [`CatalogSet`] are in-memory versions
//! for tests and tools.

use super::ItemCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field delimiter of legacy string records.
pub const LEGACY_FIELD_DELIMITER: char = '/';

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogRecord {
    /// Structured record with a name and an optional type discriminator
    Structured {
        name: String,
        #[serde(default, rename = "type")]
        item_type: Option<String>,
    },
    /// Legacy `/`-delimited string record whose first field is the name
    Delimited(String),
}

impl CatalogRecord {
    /// Creates a structured record.
    pub fn named(name: impl Into<String>) -> Self {
        CatalogRecord::Structured {
            name: name.into(),
            item_type: None,
        }
    }

    /// Creates a structured record with a type discriminator.
    pub fn typed(name: impl Into<String>, item_type: impl Into<String>) -> Self {
        CatalogRecord::Structured {
            name: name.into(),
            item_type: Some(item_type.into()),
        }
    }

    /// Creates a legacy delimited record.
    pub fn delimited(raw: impl Into<String>) -> Self {
        CatalogRecord::Delimited(raw.into())
    }

    /// Name the record is matched by.
    ///
    /// # Examples
    ///
    /// ```
    /// use forage::CatalogRecord;
    ///
    /// let hat = CatalogRecord::delimited("Cowboy Hat/Yeehaw!/true/true");
    /// assert_eq!(hat.display_name(), "Cowboy Hat");
    /// ```
    pub fn display_name(&self) -> &str {
        match self {
            CatalogRecord::Structured { name, .. } => name,
            CatalogRecord::Delimited(raw) => raw
                .split(LEGACY_FIELD_DELIMITER)
                .next()
                .unwrap_or_default(),
        }
    }

    /// Type discriminator, e.g. `Ring` for rings in the object catalog.
    pub fn item_type(&self) -> Option<&str> {
        match self {
            CatalogRecord::Structured { item_type, .. } => item_type.as_deref(),
            CatalogRecord::Delimited(_) => None,
        }
    }

    /// Whether the type discriminator equals `expected`, ignoring case.
    pub fn has_type(&self, expected: &str) -> bool {
        self.item_type()
            .map(|t| t.eq_ignore_ascii_case(expected))
            .unwrap_or(false)
    }
}

/// A host-owned item data table.
pub trait ItemCatalog {
    /// Looks up a record by canonical ID.
    fn get(&self, id: &str) -> Option<&CatalogRecord>;

    /// Enumerates every `(id, record)` pair in the catalog's stable order.
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &CatalogRecord)> + '_>;
}

/// Gives access to the catalog of each item category.
pub trait CatalogProvider {
    /// Catalog holding the given category's data, if the host has one loaded.
    fn catalog(&self, category: ItemCategory) -> Option<&dyn ItemCatalog>;
}

/// Insertion-ordered in-memory catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<(String, CatalogRecord)>", into = "Vec<(String, CatalogRecord)>")]
pub struct MemoryCatalog {
    entries: Vec<(String, CatalogRecord)>,
    index: HashMap<String, usize>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record, builder style.
    pub fn with(mut self, id: impl Into<String>, record: CatalogRecord) -> Self {
        self.insert(id, record);
        self
    }

    /// Inserts or replaces a record. Replacing keeps the entry's position.
    pub fn insert(&mut self, id: impl Into<String>, record: CatalogRecord) {
        let id = id.into();
        match self.index.get(&id) {
            Some(&slot) => self.entries[slot].1 = record,
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, record));
            }
        }
    }

    /// Removes a record, returning it.
    pub fn remove(&mut self, id: &str) -> Option<CatalogRecord> {
        let slot = self.index.remove(id)?;
        let (_, record) = self.entries.remove(slot);

        for position in self.index.values_mut() {
            if *position > slot {
                *position -= 1;
            }
        }
        Some(record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<(String, CatalogRecord)>> for MemoryCatalog {
    fn from(entries: Vec<(String, CatalogRecord)>) -> Self {
        let mut catalog = MemoryCatalog::new();
        for (id, record) in entries {
            catalog.insert(id, record);
        }
        catalog
    }
}

impl From<MemoryCatalog> for Vec<(String, CatalogRecord)> {
    fn from(catalog: MemoryCatalog) -> Self {
        catalog.entries
    }
}

impl ItemCatalog for MemoryCatalog {
    fn get(&self, id: &str) -> Option<&CatalogRecord> {
        self.index.get(id).map(|&slot| &self.entries[slot].1)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &CatalogRecord)> + '_> {
        Box::new(
            self.entries
                .iter()
                .map(|(id, record)| (id.as_str(), record)),
        )
    }
}

/// One [`MemoryCatalog`] per category. Rings read the object catalog.
///
/// # Examples
///
/// ```
/// use forage::{CatalogRecord, CatalogSet, ItemCategory, MemoryCatalog};
///
/// let catalogs = CatalogSet::new().with_catalog(
///     ItemCategory::Object,
///     MemoryCatalog::new().with("16", CatalogRecord::typed("Wild Horseradish", "Basic")),
/// );
/// assert!(catalogs.get(ItemCategory::Object).is_some());
/// assert!(catalogs.get(ItemCategory::Hat).is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSet {
    catalogs: HashMap<ItemCategory, MemoryCatalog>,
}

impl CatalogSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a category's catalog, builder style.
    pub fn with_catalog(mut self, category: ItemCategory, catalog: MemoryCatalog) -> Self {
        self.set_catalog(category, catalog);
        self
    }

    /// Sets (or reloads) a category's catalog.
    pub fn set_catalog(&mut self, category: ItemCategory, catalog: MemoryCatalog) {
        self.catalogs.insert(category.catalog_category(), catalog);
    }

    pub fn get(&self, category: ItemCategory) -> Option<&MemoryCatalog> {
        self.catalogs.get(&category.catalog_category())
    }

    pub fn get_mut(&mut self, category: ItemCategory) -> Option<&mut MemoryCatalog> {
        self.catalogs.get_mut(&category.catalog_category())
    }
}

impl CatalogProvider for CatalogSet {
    fn catalog(&self, category: ItemCategory) -> Option<&dyn ItemCatalog> {
        self.get(category).map(|catalog| catalog as &dyn ItemCatalog)
    }
}
