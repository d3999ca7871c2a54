//! # Ingredient Data Model
//!
//! This module defines the pantry-side view of an ingredient: what it contains per
//! 100 base units, what one base unit costs, how much of it is on hand and how it is
//! sold.
//!
//! ## Core Concepts
//!
//! - **Ingredient**: a stocked food item with identity, density, price and stock
//! - **Stock**: the quantity on hand, a [`BaseAmount`] tagged with its unit kind
//! - **PackageInfo**: optional bulk packaging used to round purchases up to whole packages
//!
//! ## Usage
//!
//! ```rust
//! use pantry::ingredient_model::{Ingredient, PackageInfo};
//! use pantry::nutrition::NutrientsPer100;
//! use pantry::units::{Unit, UnitKind};
//!
//! let rice = Ingredient::new("rice", "Basmati rice", UnitKind::Mass)
//!     .with_nutrients(NutrientsPer100::new(78.0, 0.9, 8.0))
//!     .with_stock_in(2.0, Unit::Kilograms)
//!     .with_package(PackageInfo::new(1000.0, 3.2));
//!
//! assert_eq!(rice.stock.value, 2000.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::nutrition::NutrientsPer100;
use crate::units::{convert_to_base, BaseAmount, Unit, UnitKind};

/// A pantry ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Stable identifier
    pub id: String,

    /// Display name, unique per normalized name within a pantry
    pub name: String,

    /// Alternative names recipes may use for this ingredient
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Nutrient density per 100 base units
    #[serde(default)]
    pub nutrients: NutrientsPer100,

    /// Price of a single base unit (one gram, milliliter or piece)
    #[serde(default)]
    pub price_per_base: f64,

    /// Quantity on hand; its value never drops below zero
    pub stock: BaseAmount,

    /// Bulk packaging, consulted only when buying
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<PackageInfo>,
}

/// How an ingredient is sold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Package size in base units
    pub size: f64,
    /// Price of one whole package
    pub price: f64,
}

/// Quantity and price of a purchase after package rounding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Acquisition {
    /// Base units actually bought
    pub quantity: f64,
    /// Whole packages bought, when the ingredient is packaged
    pub packages: Option<u32>,
    pub price: f64,
}

impl Ingredient {
    /// Create an ingredient with empty stock of the given kind
    pub fn new(id: &str, name: &str, kind: UnitKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            aliases: Vec::new(),
            nutrients: NutrientsPer100::default(),
            price_per_base: 0.0,
            stock: BaseAmount::zero(kind),
            package: None,
        }
    }

    pub fn with_nutrients(mut self, nutrients: NutrientsPer100) -> Self {
        self.nutrients = nutrients;
        self
    }

    pub fn with_price_per_base(mut self, price: f64) -> Self {
        self.price_per_base = price.max(0.0);
        self
    }

    /// Set the stock from an amount in base units of the ingredient's kind
    pub fn with_stock(mut self, base_value: f64) -> Self {
        self.stock.value = base_value.max(0.0);
        self
    }

    /// Set the stock from an amount in any unit; the unit also fixes the stock kind
    pub fn with_stock_in(mut self, amount: f64, unit: Unit) -> Self {
        let base = convert_to_base(amount.max(0.0), unit);
        self.stock = base;
        self
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn with_package(mut self, package: PackageInfo) -> Self {
        self.package = Some(package);
        self
    }

    /// Unit kind the stock is counted in
    pub fn kind(&self) -> UnitKind {
        self.stock.kind
    }

    /// Cost of `base_amount` base units at the unit price
    pub fn cost_of(&self, base_amount: f64) -> f64 {
        self.price_per_base * base_amount
    }

    /// What buying at least `needed` base units takes
    ///
    /// Packaged ingredients round up to whole packages and are priced per package,
    /// everything else is bought as requested at the unit price.
    pub fn acquisition_for(&self, needed: f64) -> Acquisition {
        match &self.package {
            Some(package) => package.acquire(needed),
            None => {
                let quantity = needed.max(0.0);
                Acquisition {
                    quantity,
                    packages: None,
                    price: self.cost_of(quantity),
                }
            }
        }
    }
}

impl PackageInfo {
    pub fn new(size: f64, price: f64) -> Self {
        Self { size, price }
    }

    /// Round `needed` up to a whole number of packages, priced pro rata
    pub fn acquire(&self, needed: f64) -> Acquisition {
        let needed = needed.max(0.0);
        if self.size <= 0.0 || !self.size.is_finite() {
            return Acquisition {
                quantity: needed,
                packages: None,
                price: 0.0,
            };
        }

        let packages = (needed / self.size).ceil();
        let quantity = packages * self.size;
        Acquisition {
            quantity,
            packages: Some(packages as u32),
            price: self.price * quantity / self.size,
        }
    }

    /// Price of a single base unit when bought in this package
    pub fn unit_price(&self) -> f64 {
        if self.size > 0.0 {
            self.price / self.size
        } else {
            0.0
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.stock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_creation() {
        let flour = Ingredient::new("flour", "Flour", UnitKind::Mass)
            .with_nutrients(NutrientsPer100::new(76.0, 1.0, 10.0))
            .with_price_per_base(0.002)
            .with_stock(750.0)
            .with_alias("all-purpose flour");

        assert_eq!(flour.kind(), UnitKind::Mass);
        assert_eq!(flour.stock.value, 750.0);
        assert_eq!(flour.aliases, vec!["all-purpose flour".to_string()]);
        assert!((flour.cost_of(500.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_stock_in_other_units() {
        let milk = Ingredient::new("milk", "Milk", UnitKind::Mass).with_stock_in(1.5, Unit::Liters);
        assert_eq!(milk.stock, BaseAmount::milliliters(1500.0));
    }

    #[test]
    fn test_negative_stock_clamped() {
        let eggs = Ingredient::new("eggs", "Eggs", UnitKind::Count).with_stock(-4.0);
        assert_eq!(eggs.stock.value, 0.0);
    }

    #[test]
    fn test_package_rounds_up() {
        let package = PackageInfo::new(500.0, 4.0);
        let bought = package.acquire(720.0);
        assert_eq!(bought.quantity, 1000.0);
        assert_eq!(bought.packages, Some(2));
        assert_eq!(bought.price, 8.0);

        let exact = package.acquire(500.0);
        assert_eq!(exact.quantity, 500.0);
        assert_eq!(exact.packages, Some(1));
    }

    #[test]
    fn test_acquisition_without_package() {
        let salt = Ingredient::new("salt", "Salt", UnitKind::Mass).with_price_per_base(0.001);
        let bought = salt.acquisition_for(30.0);
        assert_eq!(bought.quantity, 30.0);
        assert_eq!(bought.packages, None);
        assert!((bought.price - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_display_formatting() {
        let rice = Ingredient::new("rice", "Rice", UnitKind::Mass).with_stock(1250.0);
        assert_eq!(format!("{}", rice), "Rice (1.25 kg)");
    }

    #[test]
    fn test_serde_camel_case() {
        let oil = Ingredient::new("oil", "Olive oil", UnitKind::Volume).with_price_per_base(0.01);
        let json = serde_json::to_value(&oil).unwrap();
        assert_eq!(json["pricePerBase"], 0.01);
        assert_eq!(json["stock"]["kind"], "volume");
        assert!(json.get("package").is_none());
    }
}
