//! # Inventory Module
//!
//! The pantry: every stocked ingredient, its remaining quantity and an append-only
//! audit history of what changed it.
//!
//! Remaining quantities are running totals. The history is written on every
//! mutation but never replayed to compute stock; `undo` only reads it to learn which
//! change to reverse. Deductions floor at zero instead of failing, and mutating an
//! unknown ingredient id leaves the pantry untouched.
//!
//! Interested parts of the application subscribe an [`InventoryObserver`] and receive
//! an [`InventoryChange`] for every applied mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::mpsc::Sender;
use tracing::{debug, info, warn};

use crate::ingredient_model::{Acquisition, Ingredient};
use crate::normalize::{normalize_name, CanonicalNames};
use crate::recipe::Recipe;
use crate::units::{BaseAmount, UnitKind};

/// Default number of history events retained per ingredient
pub const DEFAULT_HISTORY_LIMIT: usize = 500;

/// What kind of change an inventory event records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Add,
    Deduct,
    Restock,
    Waste,
    Undo,
}

/// One audit entry in an ingredient's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEvent {
    pub kind: EventKind,
    /// Amount the caller asked for, in base units
    pub amount: f64,
    /// Signed change actually applied to the remaining quantity
    pub applied: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// An ingredient together with its history; the ingredient's stock is the remaining quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub ingredient: Ingredient,
    #[serde(default)]
    pub history: Vec<InventoryEvent>,
}

impl InventoryEntry {
    pub fn new(ingredient: Ingredient) -> Self {
        Self {
            ingredient,
            history: Vec::new(),
        }
    }

    /// Quantity currently on hand
    pub fn remaining(&self) -> BaseAmount {
        self.ingredient.stock
    }

    /// Most recent change that has not been cancelled by a later undo
    fn last_undoable(&self) -> Option<&InventoryEvent> {
        let mut pending_undos = 0usize;
        for event in self.history.iter().rev() {
            if event.kind == EventKind::Undo {
                pending_undos += 1;
            } else if pending_undos > 0 {
                pending_undos -= 1;
            } else {
                return Some(event);
            }
        }
        None
    }
}

/// Notification delivered to observers after a mutation is applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryChange {
    pub ingredient_id: String,
    pub event: InventoryEvent,
    pub remaining: BaseAmount,
}

/// Receiver of inventory change notifications
pub trait InventoryObserver {
    fn on_change(&mut self, change: &InventoryChange);
}

impl InventoryObserver for Sender<InventoryChange> {
    fn on_change(&mut self, change: &InventoryChange) {
        // A dropped receiver only means nobody is listening any more
        let _ = self.send(change.clone());
    }
}

/// Adapter turning a closure into an observer
pub struct Callback<F>(pub F);

impl<F: FnMut(&InventoryChange)> InventoryObserver for Callback<F> {
    fn on_change(&mut self, change: &InventoryChange) {
        (self.0)(change)
    }
}

/// Errors raised when adding ingredients to a pantry
#[derive(Debug, Clone, PartialEq)]
pub enum InventoryError {
    /// Another ingredient already uses a name with the same normalized form
    DuplicateName { name: String, existing_id: String },
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryError::DuplicateName { name, existing_id } => {
                write!(f, "Ingredient name '{name}' is already used by '{existing_id}'")
            }
        }
    }
}

impl std::error::Error for InventoryError {}

/// Name-keyed, read-only snapshot of pantry ingredients used by the feasibility engine
#[derive(Debug, Clone, Default)]
pub struct InventoryIndex<'a> {
    by_name: HashMap<&'a str, &'a Ingredient>,
    names: CanonicalNames,
}

impl<'a> InventoryIndex<'a> {
    pub fn new<I>(ingredients: I) -> Self
    where
        I: IntoIterator<Item = &'a Ingredient>,
    {
        // Registration follows the caller's order so alias collisions resolve the same way every time
        let ordered: Vec<&'a Ingredient> = ingredients.into_iter().collect();

        let names = CanonicalNames::build(ordered.iter().map(|ingredient| {
            (
                ingredient.name.as_str(),
                ingredient.aliases.iter().map(String::as_str),
            )
        }));
        let by_name = ordered
            .into_iter()
            .map(|ingredient| (ingredient.name.as_str(), ingredient))
            .collect();

        Self { by_name, names }
    }

    /// Pantry name a recipe ingredient name resolves to, or the name itself
    pub fn resolve<'b>(&'b self, name: &'b str) -> &'b str {
        self.names.resolve(name)
    }

    /// Ingredient a recipe line refers to, if the pantry holds it
    pub fn find(&self, name: &str) -> Option<&'a Ingredient> {
        self.by_name.get(self.names.resolve(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Single-writer pantry state keyed by ingredient id
#[derive(Serialize, Deserialize)]
pub struct Pantry {
    entries: BTreeMap<String, InventoryEntry>,
    #[serde(default = "default_history_limit")]
    history_limit: usize,
    #[serde(skip)]
    observers: Vec<Box<dyn InventoryObserver>>,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for Pantry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Pantry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pantry")
            .field("entries", &self.entries)
            .field("history_limit", &self.history_limit)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Pantry {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            observers: Vec::new(),
        }
    }

    /// Cap the number of history events kept per ingredient, oldest dropped first
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Register an observer for every subsequent mutation
    pub fn subscribe(&mut self, observer: Box<dyn InventoryObserver>) {
        self.observers.push(observer);
    }

    /// Add an ingredient, or replace the one with the same id
    pub fn insert(&mut self, ingredient: Ingredient) -> Result<(), InventoryError> {
        let key = normalize_name(&ingredient.name);
        if let Some(existing) = self
            .entries
            .values()
            .find(|e| e.ingredient.id != ingredient.id && normalize_name(&e.ingredient.name) == key)
        {
            return Err(InventoryError::DuplicateName {
                name: ingredient.name,
                existing_id: existing.ingredient.id.clone(),
            });
        }

        info!(ingredient_id = %ingredient.id, name = %ingredient.name, stock = %ingredient.stock, "Ingredient stocked");
        match self.entries.get_mut(&ingredient.id) {
            Some(entry) => {
                // Deltas recorded in another unit kind cannot be undone against the new stock
                if entry.ingredient.kind() != ingredient.kind() {
                    warn!(
                        ingredient_id = %ingredient.id,
                        old_kind = %entry.ingredient.kind(),
                        new_kind = %ingredient.kind(),
                        "Unit kind changed, clearing history"
                    );
                    entry.history.clear();
                }
                entry.ingredient = ingredient;
            }
            None => {
                self.entries
                    .insert(ingredient.id.clone(), InventoryEntry::new(ingredient));
            }
        }
        Ok(())
    }

    /// Entry for `id`, creating an empty one named `name` when it does not exist yet
    pub fn ensure(&mut self, id: &str, name: &str, kind: UnitKind) -> &InventoryEntry {
        self.entries.entry(id.to_string()).or_insert_with(|| {
            debug!(ingredient_id = %id, name = %name, "Creating ingredient on first use");
            InventoryEntry::new(Ingredient::new(id, name, kind))
        })
    }

    /// Remove an ingredient and its history
    pub fn remove(&mut self, id: &str) -> Option<InventoryEntry> {
        let removed = self.entries.remove(id);
        if removed.is_some() {
            info!(ingredient_id = %id, "Ingredient removed from pantry");
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<&InventoryEntry> {
        self.entries.get(id)
    }

    pub fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        self.entries.get(id).map(|entry| &entry.ingredient)
    }

    pub fn entries(&self) -> impl Iterator<Item = &InventoryEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name-keyed snapshot for feasibility checks
    pub fn index(&self) -> InventoryIndex<'_> {
        InventoryIndex::new(self.entries.values().map(|entry| &entry.ingredient))
    }

    /// Entry a recipe ingredient name refers to
    pub fn find_by_name(&self, name: &str) -> Option<&InventoryEntry> {
        let id = self.index().find(name).map(|ingredient| ingredient.id.clone())?;
        self.entries.get(&id)
    }

    /// Copy of every ingredient record, as a caller would persist them
    pub fn snapshot(&self) -> Vec<Ingredient> {
        self.entries
            .values()
            .map(|entry| entry.ingredient.clone())
            .collect()
    }

    /// Consume stock; the remaining quantity floors at zero
    pub fn deduct(&mut self, id: &str, amount: BaseAmount, note: Option<&str>) -> Option<&InventoryEntry> {
        self.apply(id, EventKind::Deduct, amount, note)?;
        self.entries.get(id)
    }

    /// Add stock without any upper bound
    pub fn add(&mut self, id: &str, amount: BaseAmount, note: Option<&str>) -> Option<&InventoryEntry> {
        self.apply(id, EventKind::Add, amount, note)?;
        self.entries.get(id)
    }

    /// Add stock after a shopping trip
    pub fn restock(&mut self, id: &str, amount: BaseAmount, note: Option<&str>) -> Option<&InventoryEntry> {
        self.apply(id, EventKind::Restock, amount, note)?;
        self.entries.get(id)
    }

    /// Remove spoiled or discarded stock; floors at zero like a deduction
    pub fn waste(&mut self, id: &str, amount: BaseAmount, note: Option<&str>) -> Option<&InventoryEntry> {
        self.apply(id, EventKind::Waste, amount, note)?;
        self.entries.get(id)
    }

    /// Reverse the latest change not already undone
    ///
    /// Returns `None` for unknown ids and when there is nothing left to undo.
    pub fn undo(&mut self, id: &str, note: Option<&str>) -> Option<&InventoryEntry> {
        let (kind, applied) = {
            let entry = self.entries.get(id)?;
            let target = entry.last_undoable()?;
            (entry.ingredient.stock.kind, target.applied)
        };

        self.mutate(id, EventKind::Undo, kind, applied.abs(), -applied, note)?;
        self.entries.get(id)
    }

    /// Buy at least `needed` base units, rounded up to whole packages, and restock them
    pub fn purchase(&mut self, id: &str, needed: f64, note: Option<&str>) -> Option<Acquisition> {
        let (acquisition, kind) = {
            let ingredient = self.ingredient(id)?;
            (ingredient.acquisition_for(needed), ingredient.kind())
        };

        self.apply(
            id,
            EventKind::Restock,
            BaseAmount::new(kind, acquisition.quantity),
            note,
        )?;
        Some(acquisition)
    }

    /// Deduct every line of `recipe` scaled to `pax` servings
    ///
    /// Lines are matched by canonical name. Lines whose ingredient is not stocked
    /// are skipped; callers check feasibility first when that matters.
    pub fn consume_recipe(&mut self, recipe: &Recipe, pax: u32) -> Vec<InventoryChange> {
        let scale = recipe.scale_for(pax);
        let plan: Vec<(String, BaseAmount)> = {
            let index = self.index();
            recipe
                .ingredients
                .iter()
                .filter_map(|line| match index.find(&line.name) {
                    Some(ingredient) => {
                        Some((ingredient.id.clone(), line.scaled_base_amount(scale)))
                    }
                    None => {
                        warn!(recipe = %recipe.name, ingredient = %line.name, "Skipping unstocked ingredient");
                        None
                    }
                })
                .collect()
        };

        let note = format!("cooked {} for {}", recipe.name, pax);
        plan.into_iter()
            .filter_map(|(id, needed)| self.apply(&id, EventKind::Deduct, needed, Some(&note)))
            .collect()
    }

    fn apply(
        &mut self,
        id: &str,
        kind: EventKind,
        amount: BaseAmount,
        note: Option<&str>,
    ) -> Option<InventoryChange> {
        let requested = if amount.value.is_finite() {
            amount.value.max(0.0)
        } else {
            0.0
        };
        let delta = match kind {
            EventKind::Add | EventKind::Restock => requested,
            EventKind::Deduct | EventKind::Waste => -requested,
            EventKind::Undo => amount.value,
        };
        self.mutate(id, kind, amount.kind, requested, delta, note)
    }

    fn mutate(
        &mut self,
        id: &str,
        kind: EventKind,
        amount_kind: UnitKind,
        requested: f64,
        delta: f64,
        note: Option<&str>,
    ) -> Option<InventoryChange> {
        let Some(entry) = self.entries.get_mut(id) else {
            debug!(ingredient_id = %id, ?kind, "Ignoring mutation of unknown ingredient");
            return None;
        };

        if entry.ingredient.stock.kind != amount_kind {
            warn!(
                ingredient_id = %id,
                stock_kind = %entry.ingredient.stock.kind,
                amount_kind = %amount_kind,
                "Refusing mutation across unit kinds"
            );
            return None;
        }

        let before = entry.ingredient.stock.value;
        let after = (before + delta).max(0.0);
        entry.ingredient.stock.value = after;

        let event = InventoryEvent {
            kind,
            amount: requested,
            applied: after - before,
            timestamp: Utc::now(),
            note: note.map(str::to_string),
        };
        entry.history.push(event.clone());
        if entry.history.len() > self.history_limit {
            let excess = entry.history.len() - self.history_limit;
            entry.history.drain(..excess);
        }

        info!(
            ingredient_id = %id,
            ?kind,
            requested,
            applied = event.applied,
            remaining = after,
            "Inventory mutation applied"
        );

        let change = InventoryChange {
            ingredient_id: id.to_string(),
            event,
            remaining: entry.ingredient.stock,
        };
        for observer in self.observers.iter_mut() {
            observer.on_change(&change);
        }
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::mpsc;

    fn pantry_with_chicken(grams: f64) -> Pantry {
        let mut pantry = Pantry::new();
        pantry
            .insert(
                Ingredient::new("chicken", "Chicken breast", UnitKind::Mass)
                    .with_stock(grams)
                    .with_alias("chicken fillet"),
            )
            .unwrap();
        pantry
    }

    #[test]
    fn test_deduct_floors_at_zero() {
        let mut pantry = pantry_with_chicken(300.0);

        let entry = pantry.deduct("chicken", BaseAmount::grams(500.0), None).unwrap();

        assert_eq!(entry.remaining().value, 0.0);
        assert_eq!(entry.history.len(), 1);
        assert_eq!(entry.history[0].amount, 500.0);
        assert_eq!(entry.history[0].applied, -300.0);
    }

    #[test]
    fn test_repeated_deductions_never_negative() {
        let mut pantry = pantry_with_chicken(120.0);
        for _ in 0..5 {
            pantry.deduct("chicken", BaseAmount::grams(45.0), Some("snack"));
            assert!(pantry.get("chicken").unwrap().remaining().value >= 0.0);
        }
        assert_eq!(pantry.get("chicken").unwrap().remaining().value, 0.0);
    }

    #[test]
    fn test_add_and_restock_unbounded() {
        let mut pantry = pantry_with_chicken(100.0);
        pantry.add("chicken", BaseAmount::grams(50.0), None);
        let entry = pantry
            .restock("chicken", BaseAmount::grams(1e6), Some("bulk buy"))
            .unwrap();

        assert_eq!(entry.remaining().value, 1_000_150.0);
        assert_eq!(entry.history[1].kind, EventKind::Restock);
        assert_eq!(entry.history[1].note.as_deref(), Some("bulk buy"));
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut pantry = pantry_with_chicken(100.0);
        assert!(pantry.deduct("tofu", BaseAmount::grams(10.0), None).is_none());
        assert!(pantry.undo("tofu", None).is_none());
        assert_eq!(pantry.len(), 1);
        assert!(pantry.get("chicken").unwrap().history.is_empty());
    }

    #[test]
    fn test_cross_kind_mutation_refused() {
        let mut pantry = pantry_with_chicken(100.0);
        assert!(pantry
            .deduct("chicken", BaseAmount::milliliters(10.0), None)
            .is_none());
        assert_eq!(pantry.get("chicken").unwrap().remaining().value, 100.0);
        assert!(pantry.get("chicken").unwrap().history.is_empty());
    }

    #[test]
    fn test_non_finite_amount_treated_as_zero() {
        let mut pantry = pantry_with_chicken(100.0);
        let entry = pantry
            .deduct("chicken", BaseAmount::grams(f64::NAN), None)
            .unwrap();
        assert_eq!(entry.remaining().value, 100.0);
    }

    #[test]
    fn test_waste_and_undo() {
        let mut pantry = pantry_with_chicken(300.0);
        pantry.waste("chicken", BaseAmount::grams(500.0), Some("spoiled"));
        let entry = pantry.undo("chicken", Some("not spoiled after all")).unwrap();

        assert_eq!(entry.remaining().value, 300.0);
        assert_eq!(entry.history.last().unwrap().kind, EventKind::Undo);
        assert_eq!(entry.history.last().unwrap().applied, 300.0);
    }

    #[test]
    fn test_undo_walks_back_through_history() {
        let mut pantry = pantry_with_chicken(100.0);
        pantry.add("chicken", BaseAmount::grams(50.0), None);
        pantry.deduct("chicken", BaseAmount::grams(30.0), None);

        assert_eq!(pantry.undo("chicken", None).unwrap().remaining().value, 150.0);
        assert_eq!(pantry.undo("chicken", None).unwrap().remaining().value, 100.0);
        assert!(pantry.undo("chicken", None).is_none());
    }

    #[test]
    fn test_history_limit_drops_oldest() {
        let mut pantry = pantry_with_chicken(0.0).with_history_limit(2);
        pantry.add("chicken", BaseAmount::grams(1.0), Some("first"));
        pantry.add("chicken", BaseAmount::grams(2.0), Some("second"));
        pantry.add("chicken", BaseAmount::grams(3.0), Some("third"));

        let history = &pantry.get("chicken").unwrap().history;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].note.as_deref(), Some("second"));
        assert_eq!(pantry.get("chicken").unwrap().remaining().value, 6.0);
    }

    #[test]
    fn test_purchase_rounds_to_packages() {
        let mut pantry = Pantry::new();
        pantry
            .insert(
                Ingredient::new("rice", "Rice", UnitKind::Mass)
                    .with_stock(100.0)
                    .with_package(crate::ingredient_model::PackageInfo::new(1000.0, 2.5)),
            )
            .unwrap();

        let bought = pantry.purchase("rice", 1200.0, Some("weekly shop")).unwrap();

        assert_eq!(bought.quantity, 2000.0);
        assert_eq!(bought.price, 5.0);
        assert_eq!(pantry.get("rice").unwrap().remaining().value, 2100.0);
    }

    #[test]
    fn test_duplicate_normalized_name_rejected() {
        let mut pantry = pantry_with_chicken(100.0);
        let err = pantry
            .insert(Ingredient::new("chicken-2", "Chicken Breasts (raw)", UnitKind::Mass))
            .unwrap_err();
        assert_eq!(
            err,
            InventoryError::DuplicateName {
                name: "Chicken Breasts (raw)".to_string(),
                existing_id: "chicken".to_string(),
            }
        );

        // Replacing the same id is allowed
        pantry
            .insert(Ingredient::new("chicken", "Chicken breast", UnitKind::Mass).with_stock(5.0))
            .unwrap();
        assert_eq!(pantry.get("chicken").unwrap().remaining().value, 5.0);
    }

    #[test]
    fn test_ensure_creates_empty_entry() {
        let mut pantry = Pantry::new();
        let entry = pantry.ensure("basil", "Basil", UnitKind::Mass);
        assert_eq!(entry.remaining(), BaseAmount::grams(0.0));
        pantry.ensure("basil", "Something else", UnitKind::Count);
        assert_eq!(pantry.ingredient("basil").unwrap().name, "Basil");
    }

    #[test]
    fn test_find_by_alias() {
        let pantry = pantry_with_chicken(100.0);
        let entry = pantry.find_by_name("Chicken Fillets").unwrap();
        assert_eq!(entry.ingredient.id, "chicken");
        assert!(pantry.find_by_name("beef").is_none());
    }

    #[test]
    fn test_replacing_with_other_kind_clears_history() {
        let mut pantry = pantry_with_chicken(300.0);
        pantry.deduct("chicken", BaseAmount::grams(100.0), None);

        pantry
            .insert(Ingredient::new("chicken", "Chicken breast", UnitKind::Volume).with_stock(500.0))
            .unwrap();

        assert!(pantry.get("chicken").unwrap().history.is_empty());
        assert!(pantry.undo("chicken", None).is_none());
        assert_eq!(pantry.get("chicken").unwrap().remaining(), BaseAmount::milliliters(500.0));

        pantry.deduct("chicken", BaseAmount::milliliters(50.0), None);
        pantry
            .insert(Ingredient::new("chicken", "Chicken breast", UnitKind::Volume).with_stock(400.0))
            .unwrap();
        assert_eq!(pantry.get("chicken").unwrap().history.len(), 1);
    }

    #[test]
    fn test_colliding_aliases_resolve_to_first_registered() {
        let spring_onion = Ingredient::new("spring-onion", "Spring onion", UnitKind::Count)
            .with_alias("green onion")
            .with_stock(4.0);
        let scallion = Ingredient::new("scallion", "Scallion", UnitKind::Count)
            .with_alias("green onion");

        for _ in 0..200 {
            let index = InventoryIndex::new([&spring_onion, &scallion]);
            assert_eq!(index.resolve("green onions"), "Spring onion");
            assert_eq!(index.find("Green Onions").map(|i| i.id.as_str()), Some("spring-onion"));
        }

        let reversed = InventoryIndex::new([&scallion, &spring_onion]);
        assert_eq!(reversed.resolve("green onions"), "Scallion");
    }

    #[test]
    fn test_pantry_index_alias_order_is_stable() {
        let mut pantry = Pantry::new();
        pantry
            .insert(Ingredient::new("b-scallion", "Scallion", UnitKind::Count).with_alias("green onion"))
            .unwrap();
        pantry
            .insert(
                Ingredient::new("a-spring-onion", "Spring onion", UnitKind::Count)
                    .with_alias("green onion"),
            )
            .unwrap();

        for _ in 0..200 {
            assert_eq!(pantry.index().resolve("green onion"), "Spring onion");
        }
    }

    #[test]
    fn test_observers_receive_changes() {
        let mut pantry = pantry_with_chicken(200.0);
        let (tx, rx) = mpsc::channel();
        pantry.subscribe(Box::new(tx));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        pantry.subscribe(Box::new(Callback(move |change: &InventoryChange| {
            sink.borrow_mut().push(change.remaining.value);
        })));

        pantry.deduct("chicken", BaseAmount::grams(50.0), None);
        pantry.deduct("missing", BaseAmount::grams(50.0), None);

        let change = rx.try_recv().unwrap();
        assert_eq!(change.ingredient_id, "chicken");
        assert_eq!(change.event.kind, EventKind::Deduct);
        assert!(rx.try_recv().is_err());
        assert_eq!(*seen.borrow(), vec![150.0]);
    }

    #[test]
    fn test_consume_recipe() {
        let mut pantry = pantry_with_chicken(500.0);
        let recipe = Recipe::new("bowl", "Chicken Bowl", 2)
            .unwrap()
            .with_line("chicken fillets", 200.0, crate::units::Unit::Grams)
            .with_line("Rice", 150.0, crate::units::Unit::Grams);

        let changes = pantry.consume_recipe(&recipe, 3);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].event.amount, 300.0);
        assert_eq!(pantry.get("chicken").unwrap().remaining().value, 200.0);
        assert_eq!(
            changes[0].event.note.as_deref(),
            Some("cooked Chicken Bowl for 3")
        );
    }

    #[test]
    fn test_serde_round_trip_keeps_state() {
        let mut pantry = pantry_with_chicken(250.0).with_history_limit(10);
        pantry.deduct("chicken", BaseAmount::grams(50.0), None);

        let json = serde_json::to_string(&pantry).unwrap();
        let restored: Pantry = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.history_limit(), 10);
        assert_eq!(restored.get("chicken"), pantry.get("chicken"));
    }
}
