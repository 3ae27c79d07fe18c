use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use serde::{Serialize, Serializer};

use crate::meals::domain::{Category, Labeled, MealRecord};

/// Response group. Orders as the category declaration, with `Other` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    Category(Category),
    Other,
}

impl Bucket {
    pub fn of(meal: &MealRecord) -> Self {
        meal.category.map_or(Bucket::Other, Bucket::Category)
    }

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Category(c) => c.as_str(),
            Bucket::Other => "Other",
        }
    }
}

impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

pub type GroupedMeals = BTreeMap<Bucket, Vec<MealRecord>>;

/// Base-31 polynomial over UTF-16 code units, wrapping at 2^32.
pub fn seed_hash(seed: &str) -> u32 {
    seed.encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)))
}

/// `state = 1103515245 * state + 12345 (mod 2^32)`, yielding `state / 2^32`.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        f64::from(self.state) / 4_294_967_296.0
    }
}

/// Fisher-Yates from the last index down to 1. Same seed and input order,
/// same output.
pub fn seeded_shuffle<T>(items: &mut [T], seed: &str) {
    let mut rng = Lcg::new(seed_hash(seed));
    for i in (1..items.len()).rev() {
        let j = (rng.next_f64() * (i as f64 + 1.0)) as usize;
        items.swap(i, j.min(i));
    }
}

/// Shuffles the whole match list, then groups it stably by category and keeps
/// at most `cap` meals per group. Groups without meals are absent.
pub fn shape(mut records: Vec<MealRecord>, seed: Option<&str>, cap: usize) -> GroupedMeals {
    match seed {
        Some(seed) => seeded_shuffle(&mut records, seed),
        None => records.shuffle(&mut rand::thread_rng()),
    }

    let cap = cap.max(1);
    let mut groups = GroupedMeals::new();
    for meal in records {
        let group = groups.entry(Bucket::of(&meal)).or_default();
        if group.len() < cap {
            group.push(meal);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::domain::Mood;
    use crate::meals::test_support::meal;

    fn named(count: usize, category: Category) -> Vec<MealRecord> {
        (0..count)
            .map(|i| meal(&format!("{} {i}", category.as_str()), Mood::Happy, category))
            .collect()
    }

    #[test]
    fn seed_hash_matches_reference_values() {
        assert_eq!(seed_hash(""), 0);
        assert_eq!(seed_hash("a"), 97);
        assert_eq!(seed_hash("ab"), 3105);
        assert_eq!(seed_hash("regenerate-1"), 1_032_764_492);
        // surrogate pair hashes as two code units
        assert_eq!(seed_hash("🍜"), 1_773_216);
    }

    #[test]
    fn lcg_first_step_from_zero() {
        let mut rng = Lcg::new(0);
        assert_eq!(rng.next_f64(), 12_345.0 / 4_294_967_296.0);
        let next = rng.next_f64();
        assert!((0.0..1.0).contains(&next));
    }

    #[test]
    fn seeded_shuffle_reference_permutations() {
        let cases: [(&str, [usize; 8]); 3] = [
            ("abc", [5, 4, 6, 0, 2, 7, 1, 3]),
            ("regenerate-1", [3, 2, 1, 0, 6, 7, 4, 5]),
            ("42", [2, 1, 4, 6, 7, 5, 3, 0]),
        ];
        for (seed, expected) in cases {
            let mut items: Vec<usize> = (0..8).collect();
            seeded_shuffle(&mut items, seed);
            assert_eq!(items, expected, "seed {seed}");
        }
    }

    #[test]
    fn seeded_shape_is_deterministic() {
        let mut records = named(9, Category::FullMeal);
        records.extend(named(4, Category::Drink));
        let a = shape(records.clone(), Some("monday"), 6);
        let b = shape(records, Some("monday"), 6);
        assert_eq!(a, b);
    }

    #[test]
    fn unseeded_shape_keeps_the_same_meals() {
        let records = named(5, Category::Snack);
        let groups = shape(records.clone(), None, 10);
        let mut got: Vec<_> = groups[&Bucket::Category(Category::Snack)]
            .iter()
            .map(|m| m.name.clone())
            .collect();
        let mut want: Vec<_> = records.into_iter().map(|m| m.name).collect();
        got.sort();
        want.sort();
        assert_eq!(got, want);
    }

    #[test]
    fn groups_are_capped_and_empty_groups_absent() {
        let mut records = named(10, Category::FullMeal);
        records.extend(named(1, Category::Dessert));
        let groups = shape(records, Some("cap"), 3);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&Bucket::Category(Category::FullMeal)].len(), 3);
        assert_eq!(groups[&Bucket::Category(Category::Dessert)].len(), 1);
        assert!(!groups.contains_key(&Bucket::Category(Category::Drink)));
        assert!(groups.values().all(|g| g.len() <= 3));
    }

    #[test]
    fn unknown_category_goes_to_other_last() {
        let mut odd = meal("Mystery Box", Mood::Happy, Category::Snack);
        odd.category = None;
        let records = vec![odd, meal("Turon", Mood::Happy, Category::Dessert)];
        let groups = shape(records, Some("x"), 6);
        let labels: Vec<_> = groups.keys().map(|b| b.label()).collect();
        assert_eq!(labels, vec!["Dessert", "Other"]);

        let json = serde_json::to_value(&groups).unwrap();
        assert_eq!(json["Other"][0]["name"], "Mystery Box");
    }

    #[test]
    fn empty_input_yields_empty_grouping() {
        assert!(shape(Vec::new(), Some("seed"), 6).is_empty());
        assert!(shape(Vec::new(), None, 6).is_empty());
    }
}
