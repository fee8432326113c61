//! Cart Model
//!
//! `Cart` is the local replica. It only knows the local-only mutation rules;
//! the storefront decides when to use them and when to replace the replica
//! wholesale with a remote pull.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::menu::MenuItem;

/// One line of the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Menu item id, or a client-synthesized id for custom items
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "crate::money::as_f64")]
    pub unit_price: Decimal,
    /// Always >= 1 while the line is held by a [`Cart`]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
}

impl CartLine {
    /// Build a line for a regular menu entry
    pub fn from_menu_item(item: &MenuItem, quantity: u32, instructions: Option<String>) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            description: item.description.clone(),
            unit_price: item.price,
            quantity,
            instructions: normalize_instructions(instructions),
            is_custom: false,
        }
    }

    /// unit price × quantity
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Custom items are deduplicated by what they are, not by their id.
    fn same_custom_item(&self, other: &CartLine) -> bool {
        self.is_custom
            && other.is_custom
            && self.name == other.name
            && self.description == other.description
    }
}

/// Empty instruction text is the same as none.
pub fn normalize_instructions(instructions: Option<String>) -> Option<String> {
    instructions.and_then(|text| {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Ordered set of cart lines, unique by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from a pulled sequence, dropping zero-quantity lines.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self {
            lines: lines.into_iter().filter(|l| l.quantity > 0).collect(),
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn get(&self, id: i64) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Total number of units in the cart
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Σ unit price × quantity
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Local-only insert.
    ///
    /// Regular items merge by id, custom items by (name, description).
    /// A line with zero quantity is ignored.
    pub fn add(&mut self, line: CartLine) {
        if line.quantity == 0 {
            return;
        }

        let existing = if line.is_custom {
            self.lines.iter_mut().find(|l| l.same_custom_item(&line))
        } else {
            self.lines
                .iter_mut()
                .find(|l| !l.is_custom && l.id == line.id)
        };

        match existing {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => self.lines.push(line),
        }
    }

    /// Local-only quantity change. The line is dropped once it reaches zero.
    ///
    /// Returns `false` when no line has this id.
    pub fn adjust(&mut self, id: i64, delta: i64) -> bool {
        let Some(pos) = self.lines.iter().position(|l| l.id == id) else {
            return false;
        };

        let next = i64::from(self.lines[pos].quantity).saturating_add(delta);
        if next <= 0 {
            self.lines.remove(pos);
        } else {
            self.lines[pos].quantity = u32::try_from(next).unwrap_or(u32::MAX);
        }
        true
    }

    /// Returns `false` when no line has this id.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Snapshot of the lines, leaving the cart empty
    pub fn take(&mut self) -> Vec<CartLine> {
        std::mem::take(&mut self.lines)
    }
}
