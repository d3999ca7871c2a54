//! # Report Module
//!
//! Plain-text renderings of engine results for the command line.

use crate::feasibility::{Feasibility, PurchaseLine, RecipeCalculation, ShortageReason};
use crate::inventory::Pantry;
use crate::recipe::Recipe;
use crate::units::{format_base, UnitKind};

/// One line per recipe: whether it can be made for `pax` and what blocks it
pub fn format_feasibility(recipe: &Recipe, pax: u32, feasibility: &Feasibility) -> String {
    match feasibility {
        Feasibility::Feasible { max_pax } if *max_pax == u32::MAX => {
            format!("✅ {} for {}: no ingredients needed", recipe.name, pax)
        }
        Feasibility::Feasible { max_pax } => {
            format!("✅ {} for {} (up to {})", recipe.name, pax, max_pax)
        }
        Feasibility::Infeasible { limiting } => {
            let blocker = match limiting.reason {
                ShortageReason::Missing => format!("{} is not in the pantry", limiting.ingredient),
                ShortageReason::Insufficient => format!(
                    "{} short: need {}, have {}",
                    limiting.ingredient,
                    format_base(limiting.needed, limiting.kind),
                    format_base(limiting.available, limiting.kind)
                ),
                ShortageReason::KindMismatch => format!(
                    "{} is stocked by a different measure than {}",
                    limiting.ingredient, limiting.kind
                ),
            };
            format!("❌ {} for {}: {}", recipe.name, pax, blocker)
        }
    }
}

/// Totals, per-person values and line breakdown of a calculation
pub fn format_calculation(recipe: &Recipe, calculation: &RecipeCalculation) -> String {
    let totals = &calculation.totals;
    let per_person = &calculation.per_person;

    let mut output = format!("📊 **{}** for {}\n\n", recipe.name, calculation.pax);
    output.push_str(&format!(
        "Total: {:.0} kcal, {:.1} g carbs, {:.1} g protein, {:.1} g fats, cost {:.2}\n",
        totals.calories(),
        totals.carbs,
        totals.protein,
        totals.fats,
        totals.cost
    ));
    output.push_str(&format!(
        "Per person: {:.0} kcal, {:.1} g carbs, {:.1} g protein, {:.1} g fats, cost {:.2}\n",
        per_person.calories(),
        per_person.carbs,
        per_person.protein,
        per_person.fats,
        per_person.cost
    ));

    if !calculation.lines.is_empty() {
        output.push('\n');
        for line in &calculation.lines {
            output.push_str(&format!(
                "• {} {} ({:.0} kcal)\n",
                line.needed,
                line.ingredient,
                line.totals.calories()
            ));
        }
    }

    output
}

/// Shopping list lines, with package counts and prices when known
pub fn format_shopping_list(purchases: &[PurchaseLine]) -> String {
    if purchases.is_empty() {
        return "🛒 Nothing to buy\n".to_string();
    }

    let mut output = String::from("🛒 **Shopping list**\n\n");
    for purchase in purchases {
        let mut line = format!("• {} {}", purchase.quantity, purchase.ingredient);
        if let Some(packages) = purchase.packages {
            let noun = if packages == 1 { "package" } else { "packages" };
            line.push_str(&format!(" ({packages} {noun})"));
        }
        match purchase.price {
            Some(price) => line.push_str(&format!(" ~ {price:.2}")),
            None => line.push_str(" (price unknown)"),
        }
        output.push_str(&line);
        output.push('\n');
    }
    output
}

/// Pantry stock grouped by unit kind, ingredients listed alphabetically
pub fn pantry_summary(pantry: &Pantry) -> String {
    if pantry.is_empty() {
        return "The pantry is empty\n".to_string();
    }

    let mut mass_items = Vec::new();
    let mut volume_items = Vec::new();
    let mut count_items = Vec::new();

    for entry in pantry.entries() {
        let item = entry.ingredient.to_string();
        match entry.ingredient.kind() {
            UnitKind::Mass => mass_items.push(item),
            UnitKind::Volume => volume_items.push(item),
            UnitKind::Count => count_items.push(item),
        }
    }

    let mut summary = String::new();
    for (label, items) in [
        ("⚖️ **Weight**", &mut mass_items),
        ("🥤 **Volume**", &mut volume_items),
        ("🔢 **Count**", &mut count_items),
    ] {
        if items.is_empty() {
            continue;
        }
        items.sort();
        summary.push_str(&format!("{label}: {}\n", items.join(", ")));
    }

    summary
}
