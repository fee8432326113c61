//! Menu Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn default_available() -> bool {
    true
}

/// Menu entry
///
/// The remote service sends the picture under `image`; it is stored and
/// re-serialized as `imageUrl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "crate::money::as_f64")]
    pub price: Decimal,
    pub category: String,
    #[serde(default, alias = "image")]
    pub image_url: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

/// Create / update menu item payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemInput {
    pub name: String,
    pub description: String,
    #[serde(with = "crate::money::as_f64")]
    pub price: Decimal,
    pub category: String,
    pub image_url: String,
}

impl MenuItemInput {
    /// Materialize as a menu entry under the given id
    pub fn into_item(self, id: i64) -> MenuItem {
        MenuItem {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            image_url: self.image_url,
            available: true,
        }
    }

    /// Overwrite the editable fields of an existing entry
    pub fn apply_to(self, item: &mut MenuItem) {
        item.name = self.name;
        item.description = self.description;
        item.price = self.price;
        item.category = self.category;
        item.image_url = self.image_url;
    }
}
