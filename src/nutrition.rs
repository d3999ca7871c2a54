//! # Nutrition Module
//!
//! Nutrient density per 100 base units and the totals accumulated from it.
//!
//! Calories are never stored: they are derived from the macro totals with the
//! Atwater factors every time they are read, so the macros stay the single source
//! of truth.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// kcal per gram of carbohydrate
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
/// kcal per gram of protein
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
/// kcal per gram of fat
pub const KCAL_PER_GRAM_FATS: f64 = 9.0;

/// Open-ended micro-nutrient values keyed by name (e.g. "sodium_mg", "vitamin_c_mg")
pub type MicroNutrients = BTreeMap<String, f64>;

/// Calories from macro grams
pub fn atwater_calories(carbs: f64, protein: f64, fats: f64) -> f64 {
    carbs * KCAL_PER_GRAM_CARBS + protein * KCAL_PER_GRAM_PROTEIN + fats * KCAL_PER_GRAM_FATS
}

/// Add every entry of `other` into `into`, keys missing on either side count as zero
pub fn merge_micros(into: &mut MicroNutrients, other: &MicroNutrients) {
    for (key, value) in other {
        *into.entry(key.clone()).or_insert(0.0) += value;
    }
}

/// Nutrient density of an ingredient, per 100 g / 100 ml / 100 pieces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientsPer100 {
    pub carbs: f64,
    pub fats: f64,
    pub protein: f64,
    #[serde(default)]
    pub micros: MicroNutrients,
}

impl NutrientsPer100 {
    pub fn new(carbs: f64, fats: f64, protein: f64) -> Self {
        Self {
            carbs,
            fats,
            protein,
            micros: MicroNutrients::new(),
        }
    }

    /// Add a micro-nutrient density
    pub fn with_micro(mut self, key: &str, per_100: f64) -> Self {
        self.micros.insert(key.to_string(), per_100);
        self
    }

    /// Calories per 100 base units
    pub fn calories(&self) -> f64 {
        atwater_calories(self.carbs, self.protein, self.fats)
    }

    /// Nutrients contained in `base_amount` base units of the ingredient
    pub fn for_amount(&self, base_amount: f64) -> NutritionTotals {
        let factor = base_amount / 100.0;
        NutritionTotals {
            carbs: self.carbs * factor,
            fats: self.fats * factor,
            protein: self.protein * factor,
            micros: self
                .micros
                .iter()
                .map(|(key, value)| (key.clone(), value * factor))
                .collect(),
            cost: 0.0,
        }
    }
}

/// Accumulated macros, micros and cost of a set of recipe lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTotals {
    pub carbs: f64,
    pub fats: f64,
    pub protein: f64,
    pub micros: MicroNutrients,
    pub cost: f64,
}

impl NutritionTotals {
    /// Calories derived from the macro totals
    pub fn calories(&self) -> f64 {
        atwater_calories(self.carbs, self.protein, self.fats)
    }

    /// Add another set of totals into this one
    pub fn accumulate(&mut self, other: &NutritionTotals) {
        self.carbs += other.carbs;
        self.fats += other.fats;
        self.protein += other.protein;
        self.cost += other.cost;
        merge_micros(&mut self.micros, &other.micros);
    }

    /// Every field divided by `divisor`, micros key by key
    pub fn divided_by(&self, divisor: f64) -> NutritionTotals {
        NutritionTotals {
            carbs: self.carbs / divisor,
            fats: self.fats / divisor,
            protein: self.protein / divisor,
            micros: self
                .micros
                .iter()
                .map(|(key, value)| (key.clone(), value / divisor))
                .collect(),
            cost: self.cost / divisor,
        }
    }
}

/// Totals as handed to the UI layer, with calories filled in from the macros
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionView<'a> {
    pub calories: f64,
    #[serde(flatten)]
    pub totals: &'a NutritionTotals,
}

impl<'a> From<&'a NutritionTotals> for NutritionView<'a> {
    fn from(totals: &'a NutritionTotals) -> Self {
        Self {
            calories: totals.calories(),
            totals,
        }
    }
}

/// `serialize_with` helper emitting totals together with their derived calories
pub fn serialize_with_calories<S: Serializer>(
    totals: &NutritionTotals,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    NutritionView::from(totals).serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atwater_calories() {
        let totals = NutritionTotals {
            carbs: 10.0,
            fats: 2.0,
            protein: 5.0,
            ..Default::default()
        };
        assert_eq!(totals.calories(), 10.0 * 4.0 + 5.0 * 4.0 + 2.0 * 9.0);
    }

    #[test]
    fn test_for_amount_scales_density() {
        let oats = NutrientsPer100::new(66.0, 7.0, 17.0).with_micro("iron_mg", 4.0);
        let portion = oats.for_amount(50.0);
        assert_eq!(portion.carbs, 33.0);
        assert_eq!(portion.fats, 3.5);
        assert_eq!(portion.protein, 8.5);
        assert_eq!(portion.micros["iron_mg"], 2.0);
    }

    #[test]
    fn test_merge_micros_union_of_keys() {
        let mut left: MicroNutrients = [("sodium_mg".to_string(), 10.0)].into_iter().collect();
        let right: MicroNutrients = [
            ("sodium_mg".to_string(), 5.0),
            ("vitamin_c_mg".to_string(), 3.0),
        ]
        .into_iter()
        .collect();

        merge_micros(&mut left, &right);

        assert_eq!(left.len(), 2);
        assert_eq!(left["sodium_mg"], 15.0);
        assert_eq!(left["vitamin_c_mg"], 3.0);
    }

    #[test]
    fn test_divided_by_keeps_calorie_identity() {
        let mut totals = NutritionTotals {
            carbs: 30.0,
            fats: 9.0,
            protein: 21.0,
            cost: 6.0,
            ..Default::default()
        };
        totals.micros.insert("fiber_g".to_string(), 6.0);

        let per_person = totals.divided_by(3.0);

        assert_eq!(per_person.carbs, 10.0);
        assert_eq!(per_person.cost, 2.0);
        assert_eq!(per_person.micros["fiber_g"], 2.0);
        assert_eq!(
            per_person.calories(),
            atwater_calories(per_person.carbs, per_person.protein, per_person.fats)
        );
    }

    #[test]
    fn test_view_serializes_calories() {
        let totals = NutritionTotals {
            carbs: 1.0,
            ..Default::default()
        };
        let json = serde_json::to_value(NutritionView::from(&totals)).unwrap();
        assert_eq!(json["calories"], 4.0);
        assert_eq!(json["carbs"], 1.0);
    }
}
