//! # Pantry
//!
//! A nutrition inventory and recipe feasibility engine. Ingredients are stocked in
//! one of three base units (grams, milliliters or pieces), recipes are authored for
//! a base serving count and scaled on demand, and the engine answers whether a
//! recipe can be made for a given number of people, how many it can feed at most,
//! and what it costs and contains.
//!
//! Calculations run against an in-memory pantry snapshot; persistence is left to a
//! [`store::KeyValueStore`].

pub mod config;
pub mod feasibility;
pub mod ingredient_model;
pub mod inventory;
pub mod normalize;
pub mod nutrition;
pub mod recipe;
pub mod report;
pub mod store;
pub mod units;
