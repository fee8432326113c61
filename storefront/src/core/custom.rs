//! Build-your-own items
//!
//! A custom item is a regular [`CartLine`] with `is_custom = true` and a
//! client-synthesized id. Its identity for deduplication is (name,
//! description), so the description spells out everything that was chosen.

use rust_decimal::Decimal;
use shared::models::CartLine;
use shared::models::cart::normalize_instructions;

use crate::error::StorefrontError;

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomBase {
    Pizza,
    Burger,
    Pasta,
    Salad,
}

impl CustomBase {
    pub fn base_price(&self) -> Decimal {
        match self {
            Self::Pizza => Decimal::new(1299, 2),
            Self::Burger => Decimal::new(899, 2),
            Self::Pasta => Decimal::new(1099, 2),
            Self::Salad => Decimal::new(799, 2),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pizza => "pizza",
            Self::Burger => "burger",
            Self::Pasta => "pasta",
            Self::Salad => "salad",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pizza => "Custom Pizza",
            Self::Burger => "Custom Burger",
            Self::Pasta => "Custom Pasta",
            Self::Salad => "Custom Salad",
        }
    }
}

impl std::str::FromStr for CustomBase {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pizza" => Ok(Self::Pizza),
            "burger" => Ok(Self::Burger),
            "pasta" => Ok(Self::Pasta),
            "salad" => Ok(Self::Salad),
            other => Err(StorefrontError::UnknownCustomBase(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Topping {
    pub name: String,
    pub price: Decimal,
}

impl Topping {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomItemBuilder {
    base: CustomBase,
    toppings: Vec<Topping>,
    quantity: u32,
    instructions: Option<String>,
}

impl CustomItemBuilder {
    pub fn new(base: CustomBase) -> Self {
        Self {
            base,
            toppings: Vec::new(),
            quantity: MIN_QUANTITY,
            instructions: None,
        }
    }

    pub fn topping(mut self, topping: Topping) -> Self {
        self.toppings.push(topping);
        self
    }

    /// Clamped to 1..=10
    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = clamp_quantity(quantity);
        self
    }

    pub fn adjust_quantity(mut self, delta: i64) -> Self {
        self.quantity = clamp_quantity(i64::from(self.quantity).saturating_add(delta));
        self
    }

    pub fn instructions(mut self, text: impl Into<String>) -> Self {
        self.instructions = normalize_instructions(Some(text.into()));
        self
    }

    pub fn current_quantity(&self) -> u32 {
        self.quantity
    }

    /// base + Σ toppings
    pub fn unit_price(&self) -> Decimal {
        self.base.base_price() + self.toppings.iter().map(|t| t.price).sum::<Decimal>()
    }

    pub fn total_price(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity)
    }

    /// `Custom pizza with Olives, Ham. Special instructions: well done`
    pub fn description(&self) -> String {
        let mut description = format!("Custom {}", self.base.as_str());
        if !self.toppings.is_empty() {
            let names: Vec<&str> = self.toppings.iter().map(|t| t.name.as_str()).collect();
            description.push_str(" with ");
            description.push_str(&names.join(", "));
        }
        if let Some(instructions) = &self.instructions {
            description.push_str(". Special instructions: ");
            description.push_str(instructions);
        }
        description
    }

    pub fn build(&self, id: i64) -> CartLine {
        CartLine {
            id,
            name: self.base.display_name().to_string(),
            description: self.description(),
            unit_price: self.unit_price(),
            quantity: self.quantity,
            instructions: self.instructions.clone(),
            is_custom: true,
        }
    }
}

fn clamp_quantity(quantity: i64) -> u32 {
    // 在 1..=10 范围内，转换不会失败
    u32::try_from(quantity.clamp(i64::from(MIN_QUANTITY), i64::from(MAX_QUANTITY)))
        .unwrap_or(MIN_QUANTITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_base() {
        let line = CustomItemBuilder::new(CustomBase::Burger).build(42);
        assert_eq!(line.name, "Custom Burger");
        assert_eq!(line.description, "Custom burger");
        assert_eq!(line.unit_price, Decimal::new(899, 2));
        assert_eq!(line.quantity, 1);
        assert!(line.is_custom);
        assert_eq!(line.id, 42);
    }

    #[test]
    fn toppings_and_instructions_shape_description_and_price() {
        let builder = CustomItemBuilder::new(CustomBase::Pizza)
            .topping(Topping::new("Olives", Decimal::new(150, 2)))
            .topping(Topping::new("Ham", Decimal::new(250, 2)))
            .instructions(" well done ")
            .quantity(2);
        assert_eq!(
            builder.description(),
            "Custom pizza with Olives, Ham. Special instructions: well done"
        );
        assert_eq!(builder.unit_price(), Decimal::new(1699, 2));
        assert_eq!(builder.total_price(), Decimal::new(3398, 2));
        assert_eq!(builder.build(1).instructions.as_deref(), Some("well done"));
    }

    #[test]
    fn quantity_is_clamped() {
        let b = CustomItemBuilder::new(CustomBase::Salad);
        assert_eq!(b.clone().quantity(0).current_quantity(), 1);
        assert_eq!(b.clone().quantity(-5).current_quantity(), 1);
        assert_eq!(b.clone().quantity(11).current_quantity(), 10);
        assert_eq!(b.quantity(9).adjust_quantity(5).current_quantity(), 10);
    }

    #[test]
    fn adjust_quantity_saturates() {
        let b = CustomItemBuilder::new(CustomBase::Pizza).quantity(3);
        assert_eq!(b.clone().adjust_quantity(i64::MAX).current_quantity(), 10);
        assert_eq!(b.adjust_quantity(i64::MIN).current_quantity(), 1);
    }

    #[test]
    fn blank_instructions_are_dropped() {
        let b = CustomItemBuilder::new(CustomBase::Pasta).instructions("   ");
        assert_eq!(b.description(), "Custom pasta");
    }

    #[test]
    fn parse_base() {
        assert_eq!("Pizza".parse::<CustomBase>().unwrap(), CustomBase::Pizza);
        assert!(matches!(
            " Soup ".parse::<CustomBase>(),
            Err(StorefrontError::UnknownCustomBase(ref b)) if b == "soup"
        ));
    }
}
