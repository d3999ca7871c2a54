//! # Recipe Model
//!
//! A recipe is authored once for `base_servings` people and scaled at read time for
//! any requested pax. Scaling never mutates the recipe itself.
//!
//! Ingredient lines can be built directly or parsed from the way people write them:
//!
//! ```rust
//! use pantry::recipe::{Recipe, RecipeIngredient};
//! use pantry::units::Unit;
//!
//! let line = RecipeIngredient::parse("1 1/2 cups milk")?;
//! assert_eq!(line.name, "milk");
//! assert_eq!(line.quantity.amount, 1.5);
//! assert_eq!(line.quantity.unit, Unit::Cups);
//!
//! let bowl = Recipe::new("bowl-1", "Grilled Chicken Bowl", 2)?
//!     .with_line("Chicken breast", 200.0, Unit::Grams)
//!     .with_parsed_line("150 g rice")?;
//! assert_eq!(bowl.ingredients.len(), 2);
//! # Ok::<(), pantry::recipe::RecipeError>(())
//! ```

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

use crate::units::{BaseAmount, Quantity, Unit};

/// Longest accepted recipe name, in bytes
pub const MAX_RECIPE_NAME_LENGTH: usize = 255;

lazy_static! {
    /// Leading quantity of a line: "2", "0.5", "1,5", "3/4" or "1 1/2"
    static ref LINE_PATTERN: Regex = Regex::new(
        r"^(?P<qty>\d+\s+\d+/\d+|\d+/\d+|\d+(?:[.,]\d+)?)\s*(?P<rest>.+)$"
    )
    .expect("Recipe line pattern should be valid");
    static ref MIXED_FRACTION: Regex =
        Regex::new(r"^(?:(\d+)\s+)?(\d+)/(\d+)$").expect("Fraction pattern should be valid");
}

/// A named dish with its ingredient list for `base_servings` people
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Serving count the ingredient lines were written for
    pub base_servings: NonZeroU32,
    /// Lines in declaration order, quantities per `base_servings`
    pub ingredients: Vec<RecipeIngredient>,
    /// Diet and cuisine tags (e.g. "vegetarian", "thai")
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Ingredient name as the recipe author wrote it
    pub name: String,
    pub quantity: Quantity,
}

/// Errors raised while building a recipe
#[derive(Debug, Clone, PartialEq)]
pub enum RecipeError {
    EmptyName,
    NameTooLong(usize),
    ZeroServings,
    /// The line has no leading quantity or no ingredient name
    InvalidLine(String),
    /// The quantity could not be read as a number
    InvalidNumber(String),
}

impl fmt::Display for RecipeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeError::EmptyName => write!(f, "Recipe name is empty"),
            RecipeError::NameTooLong(len) => {
                write!(f, "Recipe name is {len} bytes, limit is {MAX_RECIPE_NAME_LENGTH}")
            }
            RecipeError::ZeroServings => write!(f, "Base servings must be at least 1"),
            RecipeError::InvalidLine(line) => write!(f, "Cannot read ingredient line: {line}"),
            RecipeError::InvalidNumber(qty) => write!(f, "Invalid number format: {qty}"),
        }
    }
}

impl std::error::Error for RecipeError {}

/// Trim a recipe name and check it is usable
pub fn validate_recipe_name(name: &str) -> Result<String, RecipeError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(RecipeError::EmptyName);
    }
    if trimmed.len() > MAX_RECIPE_NAME_LENGTH {
        return Err(RecipeError::NameTooLong(trimmed.len()));
    }

    Ok(trimmed.to_string())
}

impl Recipe {
    /// Create a recipe with no ingredient lines yet
    pub fn new(id: &str, name: &str, base_servings: u32) -> Result<Self, RecipeError> {
        let name = validate_recipe_name(name)?;
        let base_servings = NonZeroU32::new(base_servings).ok_or(RecipeError::ZeroServings)?;

        Ok(Self {
            id: id.to_string(),
            name,
            category: String::new(),
            base_servings,
            ingredients: Vec::new(),
            tags: Vec::new(),
        })
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    /// Append an ingredient line, amount given per `base_servings`
    pub fn with_line(mut self, name: &str, amount: f64, unit: Unit) -> Self {
        self.ingredients.push(RecipeIngredient::new(name, amount, unit));
        self
    }

    /// Append a line parsed from text such as "200 g chicken breast"
    pub fn with_parsed_line(mut self, line: &str) -> Result<Self, RecipeError> {
        self.ingredients.push(RecipeIngredient::parse(line)?);
        Ok(self)
    }

    /// Factor turning base-serving quantities into quantities for `pax` servings
    pub fn scale_for(&self, pax: u32) -> f64 {
        f64::from(pax) / f64::from(self.base_servings.get())
    }

    /// Case-insensitive tag check
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

impl RecipeIngredient {
    pub fn new(name: &str, amount: f64, unit: Unit) -> Self {
        Self {
            name: name.trim().to_string(),
            quantity: Quantity::new(amount, unit),
        }
    }

    /// Parse "<quantity> [unit] <name>"
    ///
    /// Quantities may be integers, decimals (with `.` or `,`), fractions or mixed
    /// fractions. When the word after the quantity is not a known unit the line is a
    /// piece count, so "3 eggs" is three pieces of "eggs".
    pub fn parse(line: &str) -> Result<Self, RecipeError> {
        let line = line.trim();
        let captures = LINE_PATTERN
            .captures(line)
            .ok_or_else(|| RecipeError::InvalidLine(line.to_string()))?;

        let amount = parse_amount(&captures["qty"])?;
        let rest = captures["rest"].trim();

        let (unit, name) = match rest.split_once(char::is_whitespace) {
            Some((token, remainder)) => match token.parse::<Unit>() {
                Ok(unit) => (unit, remainder.trim()),
                Err(_) => (Unit::Pieces, rest),
            },
            None => match rest.parse::<Unit>() {
                Ok(unit) => (unit, ""),
                Err(_) => (Unit::Pieces, rest),
            },
        };

        if name.is_empty() {
            return Err(RecipeError::InvalidLine(line.to_string()));
        }

        debug!("Parsed recipe line '{}' as {} {} {}", line, amount, unit, name);
        Ok(Self::new(name, amount, unit))
    }

    /// Base quantity for the recipe's own `base_servings`
    pub fn base_amount(&self) -> BaseAmount {
        self.quantity.to_base()
    }

    /// Base quantity after multiplying by a serving scale factor
    pub fn scaled_base_amount(&self, scale: f64) -> BaseAmount {
        self.quantity.scaled(scale).to_base()
    }
}

fn parse_amount(qty: &str) -> Result<f64, RecipeError> {
    let qty = qty.trim();
    let invalid = || RecipeError::InvalidNumber(qty.to_string());

    if let Some(captures) = MIXED_FRACTION.captures(qty) {
        let whole: f64 = match captures.get(1) {
            Some(m) => m.as_str().parse().map_err(|_| invalid())?,
            None => 0.0,
        };
        let numerator: f64 = captures[2].parse().map_err(|_| invalid())?;
        let denominator: f64 = captures[3].parse().map_err(|_| invalid())?;
        if denominator == 0.0 {
            return Err(invalid());
        }
        return Ok(whole + numerator / denominator);
    }

    qty.replace(',', ".").parse().map_err(|_| invalid())
}

impl fmt::Display for RecipeIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quantity, self.name)
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (serves {}):", self.name, self.base_servings)?;
        for line in &self.ingredients {
            writeln!(f, "  • {}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_name_validation() {
        assert!(validate_recipe_name("Chocolate Chip Cookies").is_ok());
        assert_eq!(validate_recipe_name("  Mom's Lasagna  ").unwrap(), "Mom's Lasagna");
        assert_eq!(validate_recipe_name("   "), Err(RecipeError::EmptyName));
        assert_eq!(
            validate_recipe_name(&"a".repeat(256)),
            Err(RecipeError::NameTooLong(256))
        );
    }

    #[test]
    fn test_zero_servings_rejected() {
        assert_eq!(
            Recipe::new("r", "Soup", 0).unwrap_err(),
            RecipeError::ZeroServings
        );
    }

    #[test]
    fn test_scale_for() {
        let recipe = Recipe::new("r", "Soup", 4).unwrap();
        assert_eq!(recipe.scale_for(2), 0.5);
        assert_eq!(recipe.scale_for(6), 1.5);
    }

    #[test]
    fn test_parse_simple_line() {
        let line = RecipeIngredient::parse("200 g Chicken breast").unwrap();
        assert_eq!(line.name, "Chicken breast");
        assert_eq!(line.quantity, Quantity::new(200.0, Unit::Grams));
    }

    #[test]
    fn test_parse_glued_unit() {
        let line = RecipeIngredient::parse("500ml vegetable stock").unwrap();
        assert_eq!(line.name, "vegetable stock");
        assert_eq!(line.quantity, Quantity::new(500.0, Unit::Milliliters));
    }

    #[test]
    fn test_parse_fractions() {
        let half = RecipeIngredient::parse("1/2 tsp salt").unwrap();
        assert_eq!(half.quantity, Quantity::new(0.5, Unit::Teaspoons));

        let mixed = RecipeIngredient::parse("2 1/4 cups flour").unwrap();
        assert_eq!(mixed.quantity, Quantity::new(2.25, Unit::Cups));

        let comma = RecipeIngredient::parse("1,5 kg potatoes").unwrap();
        assert_eq!(comma.quantity, Quantity::new(1.5, Unit::Kilograms));
    }

    #[test]
    fn test_parse_count_line() {
        let eggs = RecipeIngredient::parse("3 eggs").unwrap();
        assert_eq!(eggs.name, "eggs");
        assert_eq!(eggs.quantity, Quantity::new(3.0, Unit::Pieces));

        let onions = RecipeIngredient::parse("2 large onions").unwrap();
        assert_eq!(onions.name, "large onions");
        assert_eq!(onions.quantity.unit, Unit::Pieces);
    }

    #[test]
    fn test_parse_rejects_bad_lines() {
        assert!(matches!(
            RecipeIngredient::parse("salt to taste"),
            Err(RecipeError::InvalidLine(_))
        ));
        assert!(matches!(
            RecipeIngredient::parse("1/0 cup sugar"),
            Err(RecipeError::InvalidNumber(_))
        ));
        assert!(matches!(
            RecipeIngredient::parse("200 g"),
            Err(RecipeError::InvalidLine(_))
        ));
    }

    #[test]
    fn test_recipe_serde() {
        let recipe = Recipe::new("bowl", "Bowl", 2)
            .unwrap()
            .with_tag("high-protein")
            .with_line("Rice", 1.0, Unit::Cups);
        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["baseServings"], 2);
        assert_eq!(json["ingredients"][0]["quantity"]["unit"], "cup");

        let back: Recipe = serde_json::from_value(json).unwrap();
        assert_eq!(back, recipe);
        assert!(back.has_tag("High-Protein"));
    }

    #[test]
    fn test_zero_servings_rejected_on_deserialize() {
        let json = r#"{"id":"x","name":"X","baseServings":0,"ingredients":[]}"#;
        assert!(serde_json::from_str::<Recipe>(json).is_err());
    }
}
