//! Order line items

use serde::{Deserialize, Serialize};

/// Portion size for a drink or dish
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Portion {
    Half,
    #[default]
    Full,
}

/// Cooking-time class of a menu item. `Long` items drive the display
/// timeout and requeue mechanism.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CookingType {
    Short,
    Long,
}

/// One line of an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Menu item reference
    pub menu_item_id: String,
    /// Display name, denormalized at checkout
    pub name: String,
    /// Always >= 1
    pub quantity: i32,
    /// Per-unit price for the chosen portion
    pub unit_price: f64,
    #[serde(default)]
    pub portion: Portion,
    /// Per-line override; takes precedence over the catalog default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooking_override: Option<CookingType>,
    /// Free-form note from the customer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl OrderItem {
    /// Effective cooking type: the per-line override wins over the
    /// catalog default.
    pub fn effective_cooking_type(&self, catalog_default: CookingType) -> CookingType {
        self.cooking_override.unwrap_or(catalog_default)
    }
}
