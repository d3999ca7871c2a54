//! # Pantry Walkthrough
//!
//! Stocks a small pantry, checks a recipe against it, cooks it and undoes a change.
//!
//! Run with `cargo run --example pantry_walkthrough`.

use std::sync::mpsc;

use pantry::feasibility::{calculate_recipe_for_pax, feasibility_for_recipe, max_users_for_recipe, shopping_list};
use pantry::ingredient_model::{Ingredient, PackageInfo};
use pantry::inventory::Pantry;
use pantry::nutrition::NutrientsPer100;
use pantry::recipe::Recipe;
use pantry::report::{format_calculation, format_feasibility, format_shopping_list, pantry_summary};
use pantry::units::{convert_to_base, BaseAmount, Unit, UnitKind};

fn main() -> anyhow::Result<()> {
    println!("🥗 Pantry Walkthrough\n");

    // Example 1: Unit conversion
    println!("📝 Example 1: Converting to base units");
    for (amount, unit) in [(1.5, Unit::Cups), (2.0, Unit::Pounds), (3.0, Unit::Tablespoons)] {
        println!("  • {amount} {unit} = {}", convert_to_base(amount, unit));
    }
    println!();

    // Example 2: Stocking the pantry
    println!("📝 Example 2: Stocking the pantry");
    let mut pantry = Pantry::new();
    pantry.insert(
        Ingredient::new("chicken", "Chicken breast", UnitKind::Mass)
            .with_alias("chicken")
            .with_nutrients(NutrientsPer100::new(0.0, 3.6, 31.0))
            .with_price_per_base(0.012)
            .with_package(PackageInfo::new(500.0, 6.0))
            .with_stock(300.0),
    )?;
    pantry.insert(
        Ingredient::new("rice", "Rice", UnitKind::Mass)
            .with_nutrients(NutrientsPer100::new(80.0, 0.6, 7.0).with_micro("iron_mg", 0.8))
            .with_price_per_base(0.003)
            .with_stock_in(1.0, Unit::Kilograms),
    )?;
    pantry.insert(
        Ingredient::new("milk", "Milk", UnitKind::Volume)
            .with_nutrients(NutrientsPer100::new(4.8, 3.5, 3.4))
            .with_stock_in(1.0, Unit::Liters),
    )?;
    print!("{}", pantry_summary(&pantry));
    println!();

    // Example 3: Feasibility
    println!("📝 Example 3: Can we make it?");
    let bowl = Recipe::new("bowl", "Grilled Chicken Bowl", 2)?
        .with_tag("high-protein")
        .with_parsed_line("200 g chicken")?
        .with_parsed_line("150 g rice")?;

    for pax in [2, 4] {
        let feasibility = feasibility_for_recipe(&bowl, pax, &pantry.index());
        println!("  {}", format_feasibility(&bowl, pax, &feasibility));
    }
    println!("  Max servings: {}", max_users_for_recipe(&bowl, &pantry.index()));
    println!();

    // Example 4: Nutrition and shopping
    println!("📝 Example 4: Nutrition and shopping");
    let calculation = calculate_recipe_for_pax(&bowl, 2, &pantry.index())?;
    print!("{}", format_calculation(&bowl, &calculation));
    print!("{}", format_shopping_list(&shopping_list(&bowl, 4, &pantry.index())));
    println!();

    // Example 5: Cooking with an observer attached
    println!("📝 Example 5: Cooking");
    let (sender, receiver) = mpsc::channel();
    pantry.subscribe(Box::new(sender));
    pantry.consume_recipe(&bowl, 2);
    for change in receiver.try_iter() {
        println!("  • {} now {}", change.ingredient_id, change.remaining);
    }
    println!();

    // Example 6: Waste and undo
    println!("📝 Example 6: Waste and undo");
    pantry.waste("milk", BaseAmount::milliliters(250.0), Some("spilled"));
    println!("  After waste: {:?}", pantry.ingredient("milk").map(ToString::to_string));
    pantry.undo("milk", None);
    println!("  After undo: {:?}", pantry.ingredient("milk").map(ToString::to_string));

    Ok(())
}
