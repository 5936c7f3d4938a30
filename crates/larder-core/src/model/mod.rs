//! Entity and value model.
//!
//! Every type here is an immutable value: there are no setters, and each
//! "change" method takes `&self` and returns a new value. Catalogue entities
//! are referenced from plans by id only, never embedded.

mod catalogue;
mod context;
mod ids;
mod labels;
mod plan;
mod shortlist;

pub use catalogue::{Dish, Ingredient};
pub use context::UserContext;
pub use ids::{ContextId, DishId, IngredientId, PlanId};
pub use labels::{Category, Cuisine, Day, LabelParseError, PurchaseType, Region};
pub use plan::{Month, MonthlyPlan, Scope, WEEKS_PER_PLAN, WeekPlan, week_index};
pub use shortlist::Shortlist;

use crate::error::{Error, Result};

/// Trim `name` and reject it when nothing is left.
pub(crate) fn normalize_name(kind: &str, name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{kind} name must not be empty")));
    }
    Ok(trimmed.to_owned())
}

/// Title-case each whitespace-separated word: `"fried  rice "` -> `"Fried Rice"`.
pub(crate) fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
