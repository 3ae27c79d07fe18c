use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::meals::domain::{Mood, QueryFilters};
use crate::meals::shaper::GroupedMeals;

/// Raw recommendation request, as sent in a query string or a JSON body.
///
/// Loosely typed on purpose: validation and coercion belong to the normalizer,
/// so that every malformed field yields the same error shape.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub mood: Option<String>,
    pub hunger_level: Option<String>,
    pub preference: Option<String>,
    pub meal_time: Option<String>,
    /// `true`, `"true"`, `1` or `"1"`; anything else is false.
    pub vegetarian_only: Option<serde_json::Value>,
    /// List of tags or a comma-delimited string.
    #[serde(alias = "avoidAllergens")]
    pub avoid: Option<serde_json::Value>,
    pub seed: Option<String>,
    pub limit: Option<serde_json::Value>,
}

impl RecommendRequest {
    /// Builds a request from decoded query-string pairs. Repeated `avoid`
    /// keys accumulate into a list; any other repeated key keeps its last value.
    pub fn from_query_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut req = Self::default();
        let mut avoid = Vec::new();
        for (key, value) in pairs {
            match key.as_str() {
                "mood" => req.mood = Some(value),
                "hungerLevel" => req.hunger_level = Some(value),
                "preference" => req.preference = Some(value),
                "mealTime" => req.meal_time = Some(value),
                "vegetarianOnly" => req.vegetarian_only = Some(Value::String(value)),
                "avoid" | "avoidAllergens" => avoid.push(Value::String(value)),
                "seed" => req.seed = Some(value),
                "limit" => req.limit = Some(Value::String(value)),
                _ => {}
            }
        }
        req.avoid = match avoid.len() {
            0 => None,
            1 => avoid.pop(),
            _ => Some(Value::Array(avoid)),
        };
        req
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub mood: Mood,
    pub filters: QueryFilters,
    pub results: GroupedMeals,
    /// Matches before per-category truncation.
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct MoodItem {
    pub name: Mood,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn repeated_avoid_becomes_a_list() {
        let req = RecommendRequest::from_query_pairs(pairs(&[
            ("mood", "Sad"),
            ("avoid", "nuts"),
            ("avoidAllergens", "dairy"),
        ]));
        assert_eq!(req.mood.as_deref(), Some("Sad"));
        assert_eq!(req.avoid, Some(json!(["nuts", "dairy"])));
    }

    #[test]
    fn single_avoid_stays_a_string() {
        let req = RecommendRequest::from_query_pairs(pairs(&[("avoid", "nuts,soy"), ("limit", "3")]));
        assert_eq!(req.avoid, Some(json!("nuts,soy")));
        assert_eq!(req.limit, Some(json!("3")));
    }

    #[test]
    fn other_repeated_keys_keep_the_last_value() {
        let req = RecommendRequest::from_query_pairs(pairs(&[
            ("mood", "Happy"),
            ("mood", "Tired"),
            ("_t", "1712"),
        ]));
        assert_eq!(req.mood.as_deref(), Some("Tired"));
        assert_eq!(req.avoid, None);
    }
}
