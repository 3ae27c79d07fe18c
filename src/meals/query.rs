use std::collections::BTreeSet;

use crate::meals::domain::{
    Allergen, HungerLevel, MealRecord, MealTime, Mood, Preference, QueryFilters,
};

/// Filter the catalog store is asked to apply. `mood` is never relaxed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub mood: Mood,
    pub hunger_level: Option<HungerLevel>,
    pub preference: Option<Preference>,
    pub meal_time: Option<MealTime>,
    /// Restrict to `is_vegetarian = true` when set.
    pub vegetarian_only: bool,
    /// Records whose tags intersect this set are excluded.
    pub exclude_allergens: BTreeSet<Allergen>,
}

/// One soft filter the fallback chain may drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relaxation {
    Preference,
    HungerLevel,
    MealTime,
    Vegetarian,
    Allergens,
}

/// Least essential first. Allergen avoidance is dropped last.
pub const FALLBACK_ORDER: [Relaxation; 5] = [
    Relaxation::Preference,
    Relaxation::HungerLevel,
    Relaxation::MealTime,
    Relaxation::Vegetarian,
    Relaxation::Allergens,
];

impl Relaxation {
    pub fn as_str(self) -> &'static str {
        match self {
            Relaxation::Preference => "preference",
            Relaxation::HungerLevel => "hungerLevel",
            Relaxation::MealTime => "mealTime",
            Relaxation::Vegetarian => "isVegetarian",
            Relaxation::Allergens => "allergenTags",
        }
    }
}

impl CatalogQuery {
    pub fn strict(filters: &QueryFilters) -> Self {
        Self {
            mood: filters.mood,
            hunger_level: filters.hunger_level,
            preference: filters.preference.and_then(|p| p.as_store_value()),
            meal_time: filters.meal_time,
            vegetarian_only: filters.vegetarian_only,
            exclude_allergens: filters.avoid_allergens.clone(),
        }
    }

    #[cfg(test)]
    pub fn mood_only(mood: Mood) -> Self {
        Self::strict(&QueryFilters::mood_only(mood))
    }

    /// Drops one filter. Returns false when it was not set, leaving the query unchanged.
    pub fn relax(&mut self, step: Relaxation) -> bool {
        match step {
            Relaxation::Preference => self.preference.take().is_some(),
            Relaxation::HungerLevel => self.hunger_level.take().is_some(),
            Relaxation::MealTime => self.meal_time.take().is_some(),
            Relaxation::Vegetarian => std::mem::take(&mut self.vegetarian_only),
            Relaxation::Allergens => !std::mem::take(&mut self.exclude_allergens).is_empty(),
        }
    }

    pub fn is_mood_only(&self) -> bool {
        self.hunger_level.is_none()
            && self.preference.is_none()
            && self.meal_time.is_none()
            && !self.vegetarian_only
            && self.exclude_allergens.is_empty()
    }

    /// In-process evaluation, same semantics a database store implements.
    pub fn matches(&self, meal: &MealRecord) -> bool {
        meal.mood == self.mood
            && self.hunger_level.map_or(true, |h| meal.hunger_level == h)
            && self.preference.map_or(true, |p| meal.preference == p)
            && self.meal_time.map_or(true, |t| meal.meal_time == Some(t))
            && (!self.vegetarian_only || meal.is_vegetarian)
            && meal.allergen_tags.is_disjoint(&self.exclude_allergens)
    }
}
