//! # Name Normalization Module
//!
//! Recipes and pantry entries are authored independently, so a recipe line saying
//! "Chicken Breasts (raw)" has to find the pantry's "chicken breast". This module
//! produces the normalized lookup key for a name and keeps the map from those keys
//! back to the literal name the pantry actually uses.

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    static ref PARENTHETICAL: Regex =
        Regex::new(r"\([^)]*\)").expect("Parenthetical pattern should be valid");
    static ref PREPARATION_STATE: Regex =
        Regex::new(r"\b(?:raw|cooked|uncooked)\b").expect("Preparation pattern should be valid");
    static ref NON_ALPHANUMERIC: Regex =
        Regex::new(r"[^\p{L}\p{N}]+").expect("Separator pattern should be valid");
}

/// Build the lookup key for an ingredient name
///
/// Lower-cases, removes parenthetical notes and the words "raw", "cooked" and
/// "uncooked", collapses punctuation and whitespace runs, then singularizes each word.
///
/// # Examples
///
/// ```rust
/// use pantry::normalize::normalize_name;
///
/// assert_eq!(normalize_name("Chicken Breasts (raw)"), "chicken breast");
/// assert_eq!(normalize_name("Cooked  Brown-Rice"), "brown rice");
/// assert_eq!(normalize_name("Cherries"), "cherry");
/// ```
pub fn normalize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let without_notes = PARENTHETICAL.replace_all(&lowered, " ");
    let without_state = PREPARATION_STATE.replace_all(&without_notes, " ");
    let collapsed = NON_ALPHANUMERIC.replace_all(&without_state, " ");

    let key = collapsed
        .split_whitespace()
        .map(singularize)
        .collect::<Vec<_>>()
        .join(" ");

    trace!("Normalized '{}' to '{}'", name, key);
    key
}

/// Light English singularization of one lower-case word
pub fn singularize(word: &str) -> String {
    if word.ends_with("ss") {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for suffix in ["ches", "shes", "xes", "zes", "ses"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

/// Map from normalized keys to the literal names stored in the pantry
#[derive(Debug, Clone, Default)]
pub struct CanonicalNames {
    by_key: HashMap<String, String>,
}

impl CanonicalNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the map from `(literal name, aliases)` pairs
    ///
    /// Every literal name is registered before any alias, so an ingredient's own
    /// name wins over another ingredient's alias that normalizes to the same key.
    pub fn build<'a, I, A>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, A)>,
        A: IntoIterator<Item = &'a str>,
    {
        let mut names = Self::new();
        let mut pending_aliases = Vec::new();

        for (literal, aliases) in entries {
            names.register(literal);
            pending_aliases.extend(aliases.into_iter().map(|alias| (alias, literal)));
        }
        for (alias, literal) in pending_aliases {
            names.register_alias(alias, literal);
        }

        debug!("Built canonical name map with {} keys", names.len());
        names
    }

    /// Register a pantry name under its own key; the first registration wins
    pub fn register(&mut self, literal: &str) {
        self.register_alias(literal, literal);
    }

    /// Register `alias` as another way of writing `literal`
    pub fn register_alias(&mut self, alias: &str, literal: &str) {
        let key = normalize_name(alias);
        if key.is_empty() {
            return;
        }
        self.by_key
            .entry(key)
            .or_insert_with(|| literal.to_string());
    }

    /// Literal pantry name for `name`, if any
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.by_key.get(&normalize_name(name)).map(String::as_str)
    }

    /// Literal pantry name for `name`, falling back to `name` itself
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.lookup(name).unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
