//! # Item Resolver
//!
//! Maps `(category, id-or-name)` pairs to canonical item IDs.

use super::catalog::{CatalogProvider, CatalogRecord, ItemCatalog};
use super::{ItemCategory, ItemDescriptor, ItemInstance};

/// Type discriminator of rings in the object catalog.
pub const RING_TYPE: &str = "Ring";

/// Resolves item descriptors against the host's current catalogs.
///
/// The resolver holds no state of its own: every call reads the catalogs as
/// they are at that moment, so a catalog reload between two calls is picked up
/// by the second one.
///
/// # Examples
///
/// ```
/// use forage::{CatalogRecord, CatalogSet, ItemCategory, ItemResolver, MemoryCatalog};
///
/// let catalogs = CatalogSet::new().with_catalog(
///     ItemCategory::Object,
///     MemoryCatalog::new().with("20", CatalogRecord::typed("Leek", "Basic")),
/// );
/// let resolver = ItemResolver::new(&catalogs);
///
/// assert_eq!(resolver.resolve("object", "20"), Some("20".to_string()));
/// assert_eq!(resolver.resolve("O", "leek"), Some("20".to_string()));
/// assert_eq!(resolver.resolve("object", "Dandelion"), None);
/// ```
pub struct ItemResolver<'a, P: CatalogProvider + ?Sized> {
    catalogs: &'a P,
}

impl<P: CatalogProvider + ?Sized> Clone for ItemResolver<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: CatalogProvider + ?Sized> Copy for ItemResolver<'_, P> {}

impl<'a, P: CatalogProvider + ?Sized> ItemResolver<'a, P> {
    pub fn new(catalogs: &'a P) -> Self {
        Self { catalogs }
    }

    /// Resolves an identifier within a category given by name.
    ///
    /// Returns `None` when the category name is not recognized or no catalog
    /// entry matches.
    pub fn resolve(&self, category: &str, identifier: &str) -> Option<String> {
        let category = ItemCategory::parse(category)?;
        self.resolve_in(category, identifier)
    }

    /// Resolves an identifier within a known category.
    ///
    /// An exact canonical-ID match wins. Otherwise entries are scanned in
    /// catalog order and the first whose display name matches, ignoring case,
    /// is returned; later entries sharing that name are never reached. Case is
    /// folded for all of Unicode, not only ASCII.
    pub fn resolve_in(&self, category: ItemCategory, identifier: &str) -> Option<String> {
        let catalog = self.catalogs.catalog(category.catalog_category())?;
        let accepts = |record: &CatalogRecord| match category {
            ItemCategory::Ring => record.has_type(RING_TYPE),
            _ => true,
        };

        if catalog.get(identifier).is_some_and(|record| accepts(record)) {
            return Some(identifier.to_string());
        }

        find_by_name(catalog, identifier, accepts)
    }

    /// Resolves a descriptor into a placeable item instance.
    pub fn resolve_descriptor(&self, descriptor: &ItemDescriptor) -> Option<ItemInstance> {
        let id = self.resolve_in(descriptor.category, &descriptor.identifier);

        if id.is_none() {
            log::warn!(
                "No {} matches \"{}\"; it will not be spawned",
                descriptor.category,
                descriptor.identifier
            );
        }

        id.map(|id| ItemInstance::new(descriptor.category, id, descriptor.stack))
    }
}

fn find_by_name(
    catalog: &dyn ItemCatalog,
    name: &str,
    accepts: impl Fn(&CatalogRecord) -> bool,
) -> Option<String> {
    let name = name.to_lowercase();
    catalog
        .entries()
        .find(|(_, record)| accepts(*record) && record.display_name().to_lowercase() == name)
        .map(|(id, _)| id.to_string())
}
