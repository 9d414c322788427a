//! # Items Module
//!
//! Item categories, the descriptors spawn rules are written with, and the
//! resolved item instances the spawner places.
//!
//! A descriptor names an item loosely, by canonical ID or by display name.
//! The [`ItemResolver`] turns it into a canonical ID by querying the host's
//! catalogs at the moment of the call.

pub mod catalog;
pub mod resolver;

pub use catalog::*;
pub use resolver::*;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The item catalogs a descriptor can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ItemCategory {
    BigCraftable,
    Boots,
    Furniture,
    Hat,
    Object,
    Pants,
    /// Rings live in the object catalog with a `Ring` type.
    Ring,
    Shirt,
    Tool,
    Weapon,
}

/// Lower-case category names and abbreviations accepted in configuration.
static CATEGORY_SYNONYMS: Lazy<HashMap<&'static str, ItemCategory>> = Lazy::new(|| {
    use ItemCategory::*;

    let table: [(&[&str], ItemCategory); 10] = [
        (
            &[
                "(bc)",
                "bc",
                "big craftable",
                "big craftables",
                "bigcraftable",
                "bigcraftables",
            ],
            BigCraftable,
        ),
        (&["(b)", "b", "boot", "boots"], Boots),
        (&["(f)", "f", "furniture"], Furniture),
        (&["(h)", "h", "hat", "hats"], Hat),
        (&["(o)", "o", "item", "items", "object", "objects"], Object),
        (&["(p)", "p", "pant", "pants"], Pants),
        (&["ring", "rings"], Ring),
        (&["(s)", "s", "shirt", "shirts"], Shirt),
        (&["(t)", "t", "tool", "tools"], Tool),
        (&["(w)", "w", "weapon", "weapons"], Weapon),
    ];

    table
        .iter()
        .flat_map(|(names, category)| names.iter().map(move |name| (*name, *category)))
        .collect()
});

impl ItemCategory {
    /// Parses a category name, abbreviation or qualifier, ignoring case and
    /// surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use forage::ItemCategory;
    ///
    /// assert_eq!(ItemCategory::parse("Big Craftable"), Some(ItemCategory::BigCraftable));
    /// assert_eq!(ItemCategory::parse("(O)"), Some(ItemCategory::Object));
    /// assert_eq!(ItemCategory::parse("rings"), Some(ItemCategory::Ring));
    /// assert_eq!(ItemCategory::parse("vehicle"), None);
    /// ```
    pub fn parse(name: &str) -> Option<Self> {
        CATEGORY_SYNONYMS
            .get(name.trim().to_lowercase().as_str())
            .copied()
    }

    /// Returns all categories.
    pub fn all() -> [ItemCategory; 10] {
        use ItemCategory::*;
        [
            BigCraftable,
            Boots,
            Furniture,
            Hat,
            Object,
            Pants,
            Ring,
            Shirt,
            Tool,
            Weapon,
        ]
    }

    /// The catalog that holds items of this category.
    pub fn catalog_category(self) -> ItemCategory {
        match self {
            ItemCategory::Ring => ItemCategory::Object,
            other => other,
        }
    }

    /// Type prefix used in qualified item IDs, e.g. `(O)` in `(O)128`.
    pub fn qualifier(self) -> &'static str {
        match self {
            ItemCategory::BigCraftable => "(BC)",
            ItemCategory::Boots => "(B)",
            ItemCategory::Furniture => "(F)",
            ItemCategory::Hat => "(H)",
            ItemCategory::Object | ItemCategory::Ring => "(O)",
            ItemCategory::Pants => "(P)",
            ItemCategory::Shirt => "(S)",
            ItemCategory::Tool => "(T)",
            ItemCategory::Weapon => "(W)",
        }
    }

    /// Canonical configuration name of the category.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemCategory::BigCraftable => "big craftable",
            ItemCategory::Boots => "boots",
            ItemCategory::Furniture => "furniture",
            ItemCategory::Hat => "hat",
            ItemCategory::Object => "object",
            ItemCategory::Pants => "pants",
            ItemCategory::Ring => "ring",
            ItemCategory::Shirt => "shirt",
            ItemCategory::Tool => "tool",
            ItemCategory::Weapon => "weapon",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ItemCategory {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ItemCategory::parse(&value).ok_or_else(|| format!("unknown item category \"{}\"", value))
    }
}

impl From<ItemCategory> for String {
    fn from(category: ItemCategory) -> Self {
        category.as_str().to_string()
    }
}

fn default_stack() -> u32 {
    1
}

/// An item named by category plus canonical ID or display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemDescriptor {
    pub category: ItemCategory,
    /// Canonical ID or display name, matched case-insensitively by name
    pub identifier: String,
    #[serde(default = "default_stack")]
    pub stack: u32,
}

impl ItemDescriptor {
    /// Creates a descriptor for a single item.
    pub fn new(category: ItemCategory, identifier: impl Into<String>) -> Self {
        Self {
            category,
            identifier: identifier.into(),
            stack: 1,
        }
    }

    /// Sets the stack size the resolved item spawns with.
    pub fn with_stack(mut self, stack: u32) -> Self {
        self.stack = stack;
        self
    }
}

/// A concrete item: a category and the canonical ID it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemInstance {
    pub category: ItemCategory,
    pub id: String,
    pub stack: u32,
}

impl ItemInstance {
    pub fn new(category: ItemCategory, id: impl Into<String>, stack: u32) -> Self {
        Self {
            category,
            id: id.into(),
            stack,
        }
    }

    /// The item ID with its type prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use forage::{ItemCategory, ItemInstance};
    ///
    /// let ring = ItemInstance::new(ItemCategory::Ring, "517", 1);
    /// assert_eq!(ring.qualified_id(), "(O)517");
    /// ```
    pub fn qualified_id(&self) -> String {
        format!("{}{}", self.category.qualifier(), self.id)
    }
}
