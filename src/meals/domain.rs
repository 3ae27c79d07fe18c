use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Closed vocabulary with a fixed wire label per variant.
pub trait Labeled: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    /// Case-insensitive lookup by wire label.
    fn parse_label(raw: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(raw))
    }

    /// Lookup that only accepts the canonical wire label.
    fn parse_exact(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == raw)
    }
}

macro_rules! labeled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl Labeled for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

labeled_enum! {
    /// Emotional state that anchors every recommendation.
    Mood {
        Happy => "Happy",
        Sad => "Sad",
        Stressed => "Stressed",
        Tired => "Tired",
        Energetic => "Energetic",
        Bored => "Bored",
    }
}

labeled_enum! {
    /// Declaration order is the order groups appear in a response.
    Category {
        FullMeal => "Full Meal",
        Appetizer => "Appetizer",
        Dessert => "Dessert",
        Drink => "Drink",
        Snack => "Snack",
    }
}

labeled_enum! {
    HungerLevel {
        Light => "Light",
        Moderate => "Moderate",
        VeryHungry => "Very Hungry",
    }
}

labeled_enum! {
    /// Food style stored on a catalog record.
    Preference {
        Healthy => "Healthy",
        Comfort => "Comfort",
        Balanced => "Balanced",
    }
}

labeled_enum! {
    /// Food style a user may ask for. `Surprise` matches any stored preference.
    PreferenceChoice {
        Healthy => "Healthy",
        Comfort => "Comfort",
        Balanced => "Balanced",
        Surprise => "Surprise",
    }
}

labeled_enum! {
    MealTime {
        Breakfast => "Breakfast",
        Lunch => "Lunch",
        Dinner => "Dinner",
    }
}

labeled_enum! {
    Allergen {
        Seafood => "seafood",
        Dairy => "dairy",
        Nuts => "nuts",
        Egg => "egg",
        Soy => "soy",
        Gluten => "gluten",
        Chicken => "chicken",
    }
}

impl PreferenceChoice {
    /// Value to filter the catalog on; `None` for the Surprise wildcard.
    pub fn as_store_value(self) -> Option<Preference> {
        match self {
            PreferenceChoice::Healthy => Some(Preference::Healthy),
            PreferenceChoice::Comfort => Some(Preference::Comfort),
            PreferenceChoice::Balanced => Some(Preference::Balanced),
            PreferenceChoice::Surprise => None,
        }
    }
}

/// Immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub mood: Mood,
    /// `None` when the stored category is outside the known vocabulary.
    #[serde(default, deserialize_with = "lenient_label")]
    pub category: Option<Category>,
    pub hunger_level: HungerLevel,
    pub preference: Preference,
    #[serde(default, deserialize_with = "lenient_label")]
    pub meal_time: Option<MealTime>,
    pub is_vegetarian: bool,
    #[serde(default)]
    pub allergen_tags: BTreeSet<Allergen>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default, rename = "protein_g")]
    pub protein_g: Option<f64>,
    #[serde(default, rename = "carbs_g")]
    pub carbs_g: Option<f64>,
    #[serde(default, rename = "fat_g")]
    pub fat_g: Option<f64>,
}

/// Identity tuple the catalog keeps unique.
pub type MealIdentity = (
    String,
    Mood,
    Option<Category>,
    HungerLevel,
    Preference,
    Option<MealTime>,
);

impl MealRecord {
    pub fn identity(&self) -> MealIdentity {
        (
            self.name.clone(),
            self.mood,
            self.category,
            self.hunger_level,
            self.preference,
            self.meal_time,
        )
    }
}

/// Validated, request-scoped filters. Echoed back verbatim in the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFilters {
    pub mood: Mood,
    pub hunger_level: Option<HungerLevel>,
    pub preference: Option<PreferenceChoice>,
    pub meal_time: Option<MealTime>,
    pub vegetarian_only: bool,
    pub avoid_allergens: BTreeSet<Allergen>,
}

impl QueryFilters {
    #[cfg(test)]
    pub fn mood_only(mood: Mood) -> Self {
        Self {
            mood,
            hunger_level: None,
            preference: None,
            meal_time: None,
            vegetarian_only: false,
            avoid_allergens: BTreeSet::new(),
        }
    }
}

/// Unknown, empty or "Any" labels read as unset instead of failing the record.
fn lenient_label<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Labeled,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| T::parse_label(s.trim())))
}
