use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::ValidationError;
use crate::meals::domain::{
    Allergen, HungerLevel, Labeled, MealTime, Mood, PreferenceChoice, QueryFilters,
};
use crate::meals::dto::RecommendRequest;

/// Everything a recommendation needs after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendParams {
    pub filters: QueryFilters,
    pub seed: Option<String>,
    pub limit: Option<usize>,
}

pub fn normalize(
    req: &RecommendRequest,
    max_limit: usize,
) -> Result<RecommendParams, ValidationError> {
    let filters = normalize_filters(req)?;
    let seed = Some(trimmed(&req.seed))
        .filter(|s| !s.is_empty())
        .map(str::to_owned);
    let limit = parse_limit(req.limit.as_ref(), max_limit)?;
    Ok(RecommendParams {
        filters,
        seed,
        limit,
    })
}

pub fn normalize_filters(req: &RecommendRequest) -> Result<QueryFilters, ValidationError> {
    let mood = match trimmed(&req.mood) {
        "" => return Err(ValidationError::MissingMood),
        raw => Mood::parse_label(raw).ok_or(ValidationError::InvalidMood)?,
    };

    let hunger_level = optional_label::<HungerLevel>(trimmed(&req.hunger_level))
        .map_err(|_| ValidationError::InvalidHungerLevel)?;

    let preference = optional_label::<PreferenceChoice>(trimmed(&req.preference))
        .map_err(|_| ValidationError::InvalidPreference)?;

    let meal_time = match trimmed(&req.meal_time) {
        "Any" => None,
        raw => optional_label::<MealTime>(raw).map_err(|_| ValidationError::InvalidMealTime)?,
    };

    Ok(QueryFilters {
        mood,
        hunger_level,
        preference,
        meal_time,
        vegetarian_only: parse_flag(req.vegetarian_only.as_ref()),
        avoid_allergens: parse_avoid(req.avoid.as_ref()),
    })
}

fn trimmed(v: &Option<String>) -> &str {
    v.as_deref().map(str::trim).unwrap_or("")
}

/// Empty means unfiltered; anything else must be the exact label.
fn optional_label<T: Labeled>(raw: &str) -> Result<Option<T>, ()> {
    if raw.is_empty() {
        return Ok(None);
    }
    T::parse_exact(raw).map(Some).ok_or(())
}

pub fn parse_flag(v: Option<&Value>) -> bool {
    match v {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        Some(Value::String(s)) => s == "true" || s == "1",
        _ => false,
    }
}

/// Permissive: unknown tokens are dropped, never rejected.
pub fn parse_avoid(v: Option<&Value>) -> BTreeSet<Allergen> {
    let tokens: Vec<&str> = match v {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .flat_map(|s| s.split(','))
            .collect(),
        Some(Value::String(s)) => s.split(',').collect(),
        _ => Vec::new(),
    };
    tokens
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter_map(|t| Allergen::parse_label(&t))
        .collect()
}

fn parse_limit(v: Option<&Value>, max_limit: usize) -> Result<Option<usize>, ValidationError> {
    let parsed = match v {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(Value::Number(n)) => n.as_u64(),
        Some(_) => None,
    };
    match parsed {
        Some(n) if n >= 1 => Ok(Some((n as usize).min(max_limit.max(1)))),
        _ => Err(ValidationError::InvalidLimit),
    }
}
