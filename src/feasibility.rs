//! # Feasibility Module
//!
//! Decides whether the pantry covers a recipe for a requested number of servings,
//! how many servings it covers at most, and what the scaled recipe contains.
//!
//! Everything here is a pure function over an [`InventoryIndex`] snapshot.
//! [`feasibility_for_recipe`] never fails: shortages come back as data so it can be
//! polled for availability badges. [`calculate_recipe_for_pax`] expects a feasible
//! recipe and returns a [`CalcError`] otherwise.
//!
//! Lines are checked in declaration order and the first failing line is the one
//! reported as limiting, even when a later line is shorter. Use
//! [`shortages_for_recipe`] to see every failing line.

use log::debug;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::ingredient_model::Ingredient;
use crate::inventory::InventoryIndex;
use crate::nutrition::{serialize_with_calories, NutritionTotals};
use crate::recipe::{Recipe, RecipeIngredient};
use crate::units::{BaseAmount, UnitKind};

/// Tolerance applied when comparing quantities, so that float rounding never makes
/// the computed maximum serving count test as infeasible
pub const QUANTITY_EPSILON: f64 = 1e-9;

/// Why a recipe line cannot be covered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShortageReason {
    /// The pantry has no ingredient under this name
    Missing,
    /// The pantry holds less than the line needs
    Insufficient,
    /// The line is measured in a different unit kind than the pantry stock
    KindMismatch,
}

/// The ingredient that stops a recipe from being made
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortage {
    /// Pantry name, or the recipe's own wording when nothing matched
    #[serde(rename = "ingredientId")]
    pub ingredient: String,
    /// Base units required; zero for missing ingredients
    pub needed: f64,
    /// Base units on hand; zero for missing ingredients
    pub available: f64,
    pub kind: UnitKind,
    pub reason: ShortageReason,
}

impl Shortage {
    fn missing(name: &str, kind: UnitKind) -> Self {
        Self {
            ingredient: name.to_string(),
            needed: 0.0,
            available: 0.0,
            kind,
            reason: ShortageReason::Missing,
        }
    }

    /// Base units still to acquire
    pub fn shortfall(&self) -> f64 {
        (self.needed - self.available).max(0.0)
    }
}

/// Outcome of a feasibility probe
#[derive(Debug, Clone, PartialEq)]
pub enum Feasibility {
    Feasible { max_pax: u32 },
    Infeasible { limiting: Shortage },
}

impl Feasibility {
    pub fn can_make(&self) -> bool {
        matches!(self, Feasibility::Feasible { .. })
    }

    pub fn max_pax(&self) -> Option<u32> {
        match self {
            Feasibility::Feasible { max_pax } => Some(*max_pax),
            Feasibility::Infeasible { .. } => None,
        }
    }

    pub fn limiting(&self) -> Option<&Shortage> {
        match self {
            Feasibility::Feasible { .. } => None,
            Feasibility::Infeasible { limiting } => Some(limiting),
        }
    }
}

/// Serialized as `{ canMake, maxPax }` or `{ canMake, limiting }` for the UI layer
impl Serialize for Feasibility {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Feasibility", 2)?;
        state.serialize_field("canMake", &self.can_make())?;
        match self {
            Feasibility::Feasible { max_pax } => state.serialize_field("maxPax", max_pax)?,
            Feasibility::Infeasible { limiting } => state.serialize_field("limiting", limiting)?,
        }
        state.end()
    }
}

/// Errors from the unchecked calculation path
#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    MissingIngredient(String),
    InsufficientQuantity {
        ingredient: String,
        needed: f64,
        available: f64,
    },
    KindMismatch {
        ingredient: String,
        needed: UnitKind,
    },
    /// Zero servings requested
    InvalidPax,
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::MissingIngredient(name) => write!(f, "Ingredient not in pantry: {name}"),
            CalcError::InsufficientQuantity {
                ingredient,
                needed,
                available,
            } => write!(
                f,
                "Not enough {ingredient}: need {needed}, have {available}"
            ),
            CalcError::KindMismatch { ingredient, needed } => write!(
                f,
                "{ingredient} is stocked in a different unit kind than the {needed} the recipe asks for"
            ),
            CalcError::InvalidPax => write!(f, "Servings must be at least 1"),
        }
    }
}

impl std::error::Error for CalcError {}

impl From<Shortage> for CalcError {
    fn from(shortage: Shortage) -> Self {
        match shortage.reason {
            ShortageReason::Missing => CalcError::MissingIngredient(shortage.ingredient),
            ShortageReason::Insufficient => CalcError::InsufficientQuantity {
                ingredient: shortage.ingredient,
                needed: shortage.needed,
                available: shortage.available,
            },
            ShortageReason::KindMismatch => CalcError::KindMismatch {
                ingredient: shortage.ingredient,
                needed: shortage.kind,
            },
        }
    }
}

/// What one recipe line contributes to a calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineContribution {
    pub ingredient: String,
    pub needed: BaseAmount,
    #[serde(serialize_with = "serialize_with_calories")]
    pub totals: NutritionTotals,
}

/// Scaled nutrition and cost of a recipe for `pax` servings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCalculation {
    pub recipe_id: String,
    pub pax: u32,
    #[serde(serialize_with = "serialize_with_calories")]
    pub totals: NutritionTotals,
    #[serde(serialize_with = "serialize_with_calories")]
    pub per_person: NutritionTotals,
    pub lines: Vec<LineContribution>,
}

/// A quantity to buy so a recipe line can be covered
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLine {
    pub ingredient: String,
    /// Pantry id, when the pantry knows the ingredient
    pub ingredient_id: Option<String>,
    /// Base units missing
    pub shortfall: BaseAmount,
    /// Base units to buy after package rounding
    pub quantity: BaseAmount,
    pub packages: Option<u32>,
    /// Unknown for ingredients the pantry has never priced
    pub price: Option<f64>,
}

fn exceeds(needed: f64, available: f64) -> bool {
    needed - available > QUANTITY_EPSILON * available.max(1.0)
}

/// Check one line scaled by `scale` against the snapshot
fn check_line<'a>(
    line: &RecipeIngredient,
    scale: f64,
    index: &InventoryIndex<'a>,
) -> Result<(&'a Ingredient, BaseAmount), Shortage> {
    let needed = line.scaled_base_amount(scale);

    let Some(ingredient) = index.find(&line.name) else {
        return Err(Shortage::missing(&line.name, needed.kind));
    };

    if ingredient.stock.kind != needed.kind {
        return Err(Shortage {
            ingredient: ingredient.name.clone(),
            needed: needed.value,
            available: 0.0,
            kind: needed.kind,
            reason: ShortageReason::KindMismatch,
        });
    }

    if exceeds(needed.value, ingredient.stock.value) {
        return Err(Shortage {
            ingredient: ingredient.name.clone(),
            needed: needed.value,
            available: ingredient.stock.value,
            kind: needed.kind,
            reason: ShortageReason::Insufficient,
        });
    }

    Ok((ingredient, needed))
}

/// Whether the snapshot covers `recipe` for `pax` servings
///
/// Stops at the first line that cannot be covered and reports it as limiting. When
/// every line is covered the result carries the largest makeable serving count.
///
/// # Examples
///
/// ```rust
/// use pantry::feasibility::feasibility_for_recipe;
/// use pantry::ingredient_model::Ingredient;
/// use pantry::inventory::InventoryIndex;
/// use pantry::recipe::Recipe;
/// use pantry::units::{Unit, UnitKind};
///
/// let chicken = Ingredient::new("chicken", "Chicken breast", UnitKind::Mass).with_stock(150.0);
/// let index = InventoryIndex::new([&chicken]);
/// let bowl = Recipe::new("bowl", "Grilled Chicken Bowl", 2)?
///     .with_line("Chicken breast", 200.0, Unit::Grams);
///
/// assert_eq!(feasibility_for_recipe(&bowl, 1, &index).max_pax(), Some(1));
/// assert!(!feasibility_for_recipe(&bowl, 2, &index).can_make());
/// # Ok::<(), pantry::recipe::RecipeError>(())
/// ```
pub fn feasibility_for_recipe(recipe: &Recipe, pax: u32, index: &InventoryIndex<'_>) -> Feasibility {
    let scale = recipe.scale_for(pax);

    for line in &recipe.ingredients {
        if let Err(limiting) = check_line(line, scale, index) {
            debug!(
                "Recipe '{}' not feasible for {}: {:?} on '{}'",
                recipe.name, pax, limiting.reason, limiting.ingredient
            );
            return Feasibility::Infeasible { limiting };
        }
    }

    Feasibility::Feasible {
        max_pax: max_users_for_recipe(recipe, index),
    }
}

/// Largest whole number of servings the snapshot covers
///
/// Returns 0 when any line is missing from the pantry, stocked in another unit kind,
/// or needs a zero or negative amount. A recipe without lines is unbounded and
/// returns `u32::MAX`.
pub fn max_users_for_recipe(recipe: &Recipe, index: &InventoryIndex<'_>) -> u32 {
    let base_servings = f64::from(recipe.base_servings.get());
    let mut servings = f64::INFINITY;

    for line in &recipe.ingredients {
        let per_serving = line.base_amount().scaled(1.0 / base_servings);
        if !(per_serving.value > 0.0) {
            debug!("Recipe '{}' has a non-positive line '{}'", recipe.name, line.name);
            return 0;
        }

        let Some(ingredient) = index.find(&line.name) else {
            return 0;
        };
        if ingredient.stock.kind != per_serving.kind {
            return 0;
        }

        servings = servings.min(ingredient.stock.value / per_serving.value);
    }

    if servings.is_infinite() {
        return u32::MAX;
    }
    // `as` saturates on overflow
    (servings + QUANTITY_EPSILON).floor() as u32
}

/// Scaled totals and per-person values of `recipe` for `pax` servings
///
/// Fails on the first line the snapshot cannot cover; callers wanting a non-failing
/// probe use [`feasibility_for_recipe`] first.
pub fn calculate_recipe_for_pax(
    recipe: &Recipe,
    pax: u32,
    index: &InventoryIndex<'_>,
) -> Result<RecipeCalculation, CalcError> {
    if pax == 0 {
        return Err(CalcError::InvalidPax);
    }

    let scale = recipe.scale_for(pax);
    let mut totals = NutritionTotals::default();
    let mut lines = Vec::with_capacity(recipe.ingredients.len());

    for line in &recipe.ingredients {
        let (ingredient, needed) = check_line(line, scale, index)?;

        let mut contribution = ingredient.nutrients.for_amount(needed.value);
        contribution.cost = ingredient.cost_of(needed.value);
        totals.accumulate(&contribution);

        lines.push(LineContribution {
            ingredient: ingredient.name.clone(),
            needed,
            totals: contribution,
        });
    }

    let per_person = totals.divided_by(f64::from(pax));
    debug!(
        "Calculated '{}' for {}: {:.1} kcal, {:.2} cost",
        recipe.name,
        pax,
        totals.calories(),
        totals.cost
    );

    Ok(RecipeCalculation {
        recipe_id: recipe.id.clone(),
        pax,
        totals,
        per_person,
        lines,
    })
}

/// Every line that cannot be covered for `pax` servings, in declaration order
pub fn shortages_for_recipe(recipe: &Recipe, pax: u32, index: &InventoryIndex<'_>) -> Vec<Shortage> {
    let scale = recipe.scale_for(pax);
    recipe
        .ingredients
        .iter()
        .filter_map(|line| check_line(line, scale, index).err())
        .collect()
}

/// What to buy so that `recipe` can be made for `pax` servings
///
/// Stocked ingredients are topped up by their shortfall, rounded up to whole
/// packages when they declare one. Ingredients the pantry does not hold in the
/// needed unit kind are listed in full and without a price.
pub fn shopping_list(recipe: &Recipe, pax: u32, index: &InventoryIndex<'_>) -> Vec<PurchaseLine> {
    let scale = recipe.scale_for(pax);
    let mut purchases = Vec::new();

    for line in &recipe.ingredients {
        let Err(shortage) = check_line(line, scale, index) else {
            continue;
        };
        let needed = line.scaled_base_amount(scale);

        let purchase = match (shortage.reason, index.find(&line.name)) {
            (ShortageReason::Insufficient, Some(ingredient)) => {
                let shortfall = shortage.shortfall();
                let acquisition = ingredient.acquisition_for(shortfall);
                PurchaseLine {
                    ingredient: ingredient.name.clone(),
                    ingredient_id: Some(ingredient.id.clone()),
                    shortfall: BaseAmount::new(needed.kind, shortfall),
                    quantity: BaseAmount::new(needed.kind, acquisition.quantity),
                    packages: acquisition.packages,
                    price: Some(acquisition.price),
                }
            }
            (_, ingredient) => PurchaseLine {
                ingredient: shortage.ingredient.clone(),
                ingredient_id: ingredient.map(|i| i.id.clone()),
                shortfall: needed,
                quantity: needed,
                packages: None,
                price: None,
            },
        };
        purchases.push(purchase);
    }

    purchases
}
