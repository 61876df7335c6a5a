//! Menu catalog - in-memory cooking metadata cache
//!
//! Menu management lives upstream; the kitchen only needs each item's
//! default cooking type to classify orders. Entries are loaded at startup
//! and kept behind a read-write lock.

use parking_lot::RwLock;
use shared::{CookingType, OrderItem};
use std::collections::HashMap;
use std::sync::Arc;

/// Cooking metadata for one menu item
#[derive(Debug, Clone)]
pub struct MenuEntry {
    pub name: String,
    pub cooking_type: CookingType,
}

impl MenuEntry {
    pub fn new(name: impl Into<String>, cooking_type: CookingType) -> Self {
        Self {
            name: name.into(),
            cooking_type,
        }
    }
}

/// In-memory menu metadata cache
#[derive(Clone, Default)]
pub struct MenuCatalog {
    entries: Arc<RwLock<HashMap<String, MenuEntry>>>,
}

impl std::fmt::Debug for MenuCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries_count = self.entries.read().len();
        f.debug_struct("MenuCatalog")
            .field("entries_count", &entries_count)
            .finish()
    }
}

impl MenuCatalog {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace a menu entry
    pub fn upsert(&self, menu_item_id: impl Into<String>, entry: MenuEntry) {
        let mut cache = self.entries.write();
        cache.insert(menu_item_id.into(), entry);
    }

    /// Remove a menu entry
    pub fn remove(&self, menu_item_id: &str) {
        let mut cache = self.entries.write();
        cache.remove(menu_item_id);
    }

    /// Get a menu entry by id (from cache)
    pub fn get(&self, menu_item_id: &str) -> Option<MenuEntry> {
        let cache = self.entries.read();
        cache.get(menu_item_id).cloned()
    }

    /// True if any line's effective cooking type is long.
    ///
    /// Per-item overrides win over the catalog default. Unknown menu
    /// references fall back to short so a stale id cannot park an order
    /// behind a timeout it does not need.
    pub fn order_has_long_items(&self, items: &[OrderItem]) -> bool {
        let cache = self.entries.read();
        items.iter().any(|item| {
            let default = match cache.get(&item.menu_item_id) {
                Some(entry) => entry.cooking_type,
                None => {
                    tracing::warn!(
                        "Menu item {} not in catalog, assuming short cooking time",
                        item.menu_item_id
                    );
                    CookingType::Short
                }
            };
            item.effective_cooking_type(default) == CookingType::Long
        })
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Portion;

    fn item(menu_item_id: &str, cooking_override: Option<CookingType>) -> OrderItem {
        OrderItem {
            menu_item_id: menu_item_id.to_string(),
            name: menu_item_id.to_string(),
            quantity: 1,
            unit_price: 5.0,
            portion: Portion::Full,
            cooking_override,
            note: None,
        }
    }

    #[test]
    fn test_catalog_default_classification() {
        let catalog = MenuCatalog::new();
        catalog.upsert("espresso", MenuEntry::new("Espresso", CookingType::Short));
        catalog.upsert("lasagna", MenuEntry::new("Lasagna", CookingType::Long));

        assert!(!catalog.order_has_long_items(&[item("espresso", None)]));
        assert!(catalog.order_has_long_items(&[item("espresso", None), item("lasagna", None)]));
    }

    #[test]
    fn test_item_override_beats_catalog_default() {
        let catalog = MenuCatalog::new();
        catalog.upsert("espresso", MenuEntry::new("Espresso", CookingType::Short));
        catalog.upsert("lasagna", MenuEntry::new("Lasagna", CookingType::Long));

        // Short item overridden to long
        assert!(catalog.order_has_long_items(&[item("espresso", Some(CookingType::Long))]));
        // Long item overridden to short
        assert!(!catalog.order_has_long_items(&[item("lasagna", Some(CookingType::Short))]));
    }

    #[test]
    fn test_unknown_menu_item_defaults_to_short() {
        let catalog = MenuCatalog::new();
        assert!(!catalog.order_has_long_items(&[item("ghost-item", None)]));
        // An explicit override still applies to unknown items
        assert!(catalog.order_has_long_items(&[item("ghost-item", Some(CookingType::Long))]));
    }
}
