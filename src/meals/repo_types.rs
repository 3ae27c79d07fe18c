use std::collections::BTreeSet;

use sqlx::FromRow;
use uuid::Uuid;

use crate::error::StoreError;
use crate::meals::domain::{Allergen, Category, Labeled, MealRecord, MealTime};

/// Row of the `meals` table, enum columns still as text.
#[derive(Debug, FromRow)]
pub struct MealRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub mood: String,
    pub category: String,
    pub hunger_level: String,
    pub preference: String,
    pub meal_time: Option<String>,
    pub is_vegetarian: bool,
    pub allergen_tags: Vec<String>,
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
}

fn required<T: Labeled>(id: Uuid, column: &str, raw: &str) -> Result<T, StoreError> {
    T::parse_label(raw).ok_or_else(|| StoreError::Malformed {
        id,
        reason: format!("unknown {column} '{raw}'"),
    })
}

/// Tags must be canonical: the SQL exclusion compares them byte for byte.
fn allergen_tags(id: Uuid, raw: &[String]) -> Result<BTreeSet<Allergen>, StoreError> {
    raw.iter()
        .map(|t| {
            Allergen::parse_exact(t).ok_or_else(|| StoreError::Malformed {
                id,
                reason: format!("unknown allergen tag '{t}'"),
            })
        })
        .collect()
}

impl TryFrom<MealRow> for MealRecord {
    type Error = StoreError;

    fn try_from(r: MealRow) -> Result<Self, Self::Error> {
        Ok(Self {
            mood: required(r.id, "mood", &r.mood)?,
            hunger_level: required(r.id, "hunger_level", &r.hunger_level)?,
            preference: required(r.id, "preference", &r.preference)?,
            // unknown category groups under "Other"
            category: Category::parse_label(&r.category),
            meal_time: r.meal_time.as_deref().and_then(MealTime::parse_label),
            allergen_tags: allergen_tags(r.id, &r.allergen_tags)?,
            id: r.id,
            name: r.name,
            description: r.description,
            is_vegetarian: r.is_vegetarian,
            calories: r.calories,
            protein_g: r.protein_g,
            carbs_g: r.carbs_g,
            fat_g: r.fat_g,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::domain::{Mood, Preference};

    fn row() -> MealRow {
        MealRow {
            id: Uuid::new_v4(),
            name: "Sinigang na Isda (Dinner)".into(),
            description: None,
            mood: "Sad".into(),
            category: "Full Meal".into(),
            hunger_level: "Moderate".into(),
            preference: "Healthy".into(),
            meal_time: Some("Dinner".into()),
            is_vegetarian: false,
            allergen_tags: vec!["seafood".into(), "egg".into()],
            calories: Some(406.0),
            protein_g: Some(15.0),
            carbs_g: None,
            fat_g: None,
        }
    }

    #[test]
    fn row_converts_to_record() {
        let meal = MealRecord::try_from(row()).unwrap();
        assert_eq!(meal.mood, Mood::Sad);
        assert_eq!(meal.category, Some(Category::FullMeal));
        assert_eq!(meal.preference, Preference::Healthy);
        assert_eq!(
            meal.allergen_tags.iter().copied().collect::<Vec<_>>(),
            vec![Allergen::Seafood, Allergen::Egg]
        );
    }

    #[test]
    fn unknown_category_is_tolerated() {
        let mut r = row();
        r.category = "Side".into();
        assert_eq!(MealRecord::try_from(r).unwrap().category, None);
    }

    #[test]
    fn unknown_mood_is_malformed() {
        let mut r = row();
        r.mood = "Angry".into();
        let err = MealRecord::try_from(r).unwrap_err();
        assert!(err.to_string().contains("unknown mood 'Angry'"));
    }

    #[test]
    fn non_canonical_allergen_tag_is_malformed() {
        for tag in ["Nuts", "msg"] {
            let mut r = row();
            r.allergen_tags = vec!["dairy".into(), tag.into()];
            let err = MealRecord::try_from(r).unwrap_err();
            assert!(err.to_string().contains(&format!("unknown allergen tag '{tag}'")));
        }
    }
}
