//! # Units Module
//!
//! Measurement units and their conversion into base quantities.
//!
//! Every supported unit belongs to exactly one [`UnitKind`]. Mass units convert to
//! grams, volume units to milliliters and the count unit passes through unchanged.
//! Quantities of different kinds are never interconvertible, so a converted value is
//! carried as a tagged [`BaseAmount`] rather than a bare number.
//!
//! ## Usage
//!
//! ```rust
//! use pantry::units::{convert_to_base, Unit, UnitKind};
//!
//! let milk = convert_to_base(1.5, Unit::Cups);
//! assert_eq!(milk.kind, UnitKind::Volume);
//! assert_eq!(milk.value, 360.0);
//! ```

use lazy_static::lazy_static;
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Physical dimension a unit measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Base unit: grams
    Mass,
    /// Base unit: milliliters
    Volume,
    /// Base unit: the count itself
    Count,
}

/// Supported measurement units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    // Mass units
    /// Milligrams
    #[serde(rename = "mg")]
    Milligrams,
    /// Grams
    #[serde(rename = "g")]
    Grams,
    /// Kilograms
    #[serde(rename = "kg")]
    Kilograms,
    /// Avoirdupois pounds
    #[serde(rename = "lb")]
    Pounds,
    /// Avoirdupois ounces
    #[serde(rename = "oz")]
    Ounces,

    // Volume units
    /// Milliliters
    #[serde(rename = "ml")]
    Milliliters,
    /// Liters
    #[serde(rename = "l")]
    Liters,
    /// US teaspoons
    #[serde(rename = "tsp")]
    Teaspoons,
    /// US tablespoons
    #[serde(rename = "tbsp")]
    Tablespoons,
    /// Metric-ish cup (240 ml)
    #[serde(rename = "cup")]
    Cups,

    // Count units
    /// Individual pieces/items
    #[serde(rename = "piece")]
    Pieces,
}

const GRAMS_PER_MG: f64 = 0.001;
const GRAMS_PER_KG: f64 = 1000.0;
const GRAMS_PER_LB: f64 = 453.59237;
const GRAMS_PER_OZ: f64 = 28.349523125;

const ML_PER_L: f64 = 1000.0;
const ML_PER_TSP: f64 = 4.92892;
const ML_PER_TBSP: f64 = 14.7868;
const ML_PER_CUP: f64 = 240.0;

/// Threshold at which mass and volume labels switch to kg / l
const LARGE_UNIT_THRESHOLD: f64 = 1000.0;

lazy_static! {
    /// Accepted spellings for every unit, matched after lower-casing
    static ref UNIT_MAPPINGS: HashMap<&'static str, Unit> = {
        let mut map = HashMap::new();

        // Mass units
        map.insert("mg", Unit::Milligrams);
        map.insert("milligram", Unit::Milligrams);
        map.insert("milligrams", Unit::Milligrams);
        map.insert("g", Unit::Grams);
        map.insert("gr", Unit::Grams);
        map.insert("gram", Unit::Grams);
        map.insert("grams", Unit::Grams);
        map.insert("kg", Unit::Kilograms);
        map.insert("kilo", Unit::Kilograms);
        map.insert("kilogram", Unit::Kilograms);
        map.insert("kilograms", Unit::Kilograms);
        map.insert("lb", Unit::Pounds);
        map.insert("lbs", Unit::Pounds);
        map.insert("pound", Unit::Pounds);
        map.insert("pounds", Unit::Pounds);
        map.insert("oz", Unit::Ounces);
        map.insert("ounce", Unit::Ounces);
        map.insert("ounces", Unit::Ounces);

        // Volume units
        map.insert("ml", Unit::Milliliters);
        map.insert("milliliter", Unit::Milliliters);
        map.insert("milliliters", Unit::Milliliters);
        map.insert("millilitre", Unit::Milliliters);
        map.insert("millilitres", Unit::Milliliters);
        map.insert("l", Unit::Liters);
        map.insert("liter", Unit::Liters);
        map.insert("liters", Unit::Liters);
        map.insert("litre", Unit::Liters);
        map.insert("litres", Unit::Liters);
        map.insert("tsp", Unit::Teaspoons);
        map.insert("teaspoon", Unit::Teaspoons);
        map.insert("teaspoons", Unit::Teaspoons);
        map.insert("tbsp", Unit::Tablespoons);
        map.insert("tablespoon", Unit::Tablespoons);
        map.insert("tablespoons", Unit::Tablespoons);
        map.insert("cup", Unit::Cups);
        map.insert("cups", Unit::Cups);

        // Count units
        map.insert("piece", Unit::Pieces);
        map.insert("pieces", Unit::Pieces);
        map.insert("pc", Unit::Pieces);
        map.insert("pcs", Unit::Pieces);

        map
    };
}

impl Unit {
    /// All supported units, mass first, then volume, then count
    pub const ALL: [Unit; 11] = [
        Unit::Milligrams,
        Unit::Grams,
        Unit::Kilograms,
        Unit::Pounds,
        Unit::Ounces,
        Unit::Milliliters,
        Unit::Liters,
        Unit::Teaspoons,
        Unit::Tablespoons,
        Unit::Cups,
        Unit::Pieces,
    ];

    /// Kind of quantity this unit measures
    pub const fn kind(self) -> UnitKind {
        match self {
            Unit::Milligrams | Unit::Grams | Unit::Kilograms | Unit::Pounds | Unit::Ounces => {
                UnitKind::Mass
            }
            Unit::Milliliters | Unit::Liters | Unit::Teaspoons | Unit::Tablespoons | Unit::Cups => {
                UnitKind::Volume
            }
            Unit::Pieces => UnitKind::Count,
        }
    }

    /// Number of base units (g, ml or pieces) in one of this unit
    pub const fn base_factor(self) -> f64 {
        match self {
            Unit::Milligrams => GRAMS_PER_MG,
            Unit::Grams => 1.0,
            Unit::Kilograms => GRAMS_PER_KG,
            Unit::Pounds => GRAMS_PER_LB,
            Unit::Ounces => GRAMS_PER_OZ,
            Unit::Milliliters => 1.0,
            Unit::Liters => ML_PER_L,
            Unit::Teaspoons => ML_PER_TSP,
            Unit::Tablespoons => ML_PER_TBSP,
            Unit::Cups => ML_PER_CUP,
            Unit::Pieces => 1.0,
        }
    }

    /// Short token used for display and serialization
    pub const fn symbol(self) -> &'static str {
        match self {
            Unit::Milligrams => "mg",
            Unit::Grams => "g",
            Unit::Kilograms => "kg",
            Unit::Pounds => "lb",
            Unit::Ounces => "oz",
            Unit::Milliliters => "ml",
            Unit::Liters => "l",
            Unit::Teaspoons => "tsp",
            Unit::Tablespoons => "tbsp",
            Unit::Cups => "cup",
            Unit::Pieces => "piece",
        }
    }

    /// Express a base value (g, ml or pieces) in this unit
    pub fn from_base(self, base_value: f64) -> f64 {
        base_value / self.base_factor()
    }

    /// Base unit of a kind
    pub const fn base_of(kind: UnitKind) -> Unit {
        match kind {
            UnitKind::Mass => Unit::Grams,
            UnitKind::Volume => Unit::Milliliters,
            UnitKind::Count => Unit::Pieces,
        }
    }
}

/// Kind of a unit, usable before any quantity is known
pub const fn unit_kind(unit: Unit) -> UnitKind {
    unit.kind()
}

/// Convert an amount expressed in `unit` into its base quantity
///
/// The function is total over [`Unit`]: counts pass through unchanged and the
/// returned kind depends on the unit alone, never on the amount.
pub fn convert_to_base(amount: f64, unit: Unit) -> BaseAmount {
    BaseAmount {
        kind: unit.kind(),
        value: amount * unit.base_factor(),
    }
}

/// Render a base value with a human-scaled unit
///
/// Counts render as whole pieces, mass and volume switch to kilograms / liters
/// with two decimals from 1000 base units up.
pub fn format_base(value: f64, kind: UnitKind) -> String {
    match kind {
        UnitKind::Count => {
            let pieces = value.round();
            if pieces == 1.0 {
                "1 pc".to_string()
            } else {
                format!("{pieces} pcs")
            }
        }
        // Thresholds apply to the displayed value, so 999.96 g shows as 1.00 kg
        UnitKind::Mass if reaches_large_unit(value) => {
            format!("{:.2} kg", value / GRAMS_PER_KG)
        }
        UnitKind::Mass => format!("{} g", trim_decimal(value)),
        UnitKind::Volume if reaches_large_unit(value) => {
            format!("{:.2} l", value / ML_PER_L)
        }
        UnitKind::Volume => format!("{} ml", trim_decimal(value)),
    }
}

fn reaches_large_unit(value: f64) -> bool {
    (value * 10.0).round() / 10.0 >= LARGE_UNIT_THRESHOLD
}

/// One decimal at most, without a trailing `.0`
fn trim_decimal(value: f64) -> String {
    let rounded = format!("{value:.1}");
    match rounded.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => rounded,
    }
}

/// A quantity as entered by a user, not yet converted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub amount: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(amount: f64, unit: Unit) -> Self {
        Self { amount, unit }
    }

    /// Base quantity of this amount
    pub fn to_base(&self) -> BaseAmount {
        convert_to_base(self.amount, self.unit)
    }

    /// Same unit, amount multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            amount: self.amount * factor,
            unit: self.unit,
        }
    }
}

/// A quantity in base units, tagged with its kind
///
/// Operations between two amounts of different kinds return `None` instead of
/// mixing grams with milliliters or piece counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseAmount {
    pub kind: UnitKind,
    pub value: f64,
}

impl BaseAmount {
    pub fn new(kind: UnitKind, value: f64) -> Self {
        Self { kind, value }
    }

    pub fn zero(kind: UnitKind) -> Self {
        Self { kind, value: 0.0 }
    }

    pub fn grams(value: f64) -> Self {
        Self::new(UnitKind::Mass, value)
    }

    pub fn milliliters(value: f64) -> Self {
        Self::new(UnitKind::Volume, value)
    }

    pub fn pieces(value: f64) -> Self {
        Self::new(UnitKind::Count, value)
    }

    pub fn same_kind(&self, other: &BaseAmount) -> bool {
        self.kind == other.kind
    }

    /// Sum of two amounts of the same kind
    pub fn checked_add(&self, other: &BaseAmount) -> Option<BaseAmount> {
        self.same_kind(other)
            .then(|| BaseAmount::new(self.kind, self.value + other.value))
    }

    /// Difference of two amounts of the same kind, floored at zero
    pub fn saturating_sub(&self, other: &BaseAmount) -> Option<BaseAmount> {
        self.same_kind(other)
            .then(|| BaseAmount::new(self.kind, (self.value - other.value).max(0.0)))
    }

    /// Same kind, value multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> BaseAmount {
        BaseAmount::new(self.kind, self.value * factor)
    }
}

impl fmt::Display for BaseAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_base(self.value, self.kind))
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitKind::Mass => "mass",
            UnitKind::Volume => "volume",
            UnitKind::Count => "count",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.amount.fract() == 0.0 {
            write!(f, "{} {}", self.amount as i64, self.unit)
        } else {
            write!(f, "{} {}", self.amount, self.unit)
        }
    }
}

/// Errors raised when reading a unit token
#[derive(Debug, Clone, PartialEq)]
pub enum UnitError {
    Unknown(String),
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitError::Unknown(token) => write!(f, "Unknown unit: {token}"),
        }
    }
}

impl std::error::Error for UnitError {}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim().trim_end_matches('.').to_lowercase();
        trace!("Looking up unit token '{}'", token);
        UNIT_MAPPINGS
            .get(token.as_str())
            .copied()
            .ok_or(UnitError::Unknown(token))
    }
}
