use serde::{Deserialize, Serialize};

use super::ids::DishId;
use crate::error::{Error, Result};

/// Dishes picked to plan from, in the order they were added. Each dish
/// appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortlist {
    #[serde(default, alias = "dish_uids")]
    dish_ids: Vec<DishId>,
}

impl Shortlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dish_ids(&self) -> &[DishId] {
        &self.dish_ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.dish_ids.iter().any(|d| d.as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.dish_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dish_ids.is_empty()
    }

    /// Copy with `id` appended. Unchanged when it is already listed.
    pub fn with_dish(&self, id: impl Into<DishId>) -> Self {
        let id = id.into();
        if self.contains(id.as_str()) {
            return self.clone();
        }
        let mut dish_ids = self.dish_ids.clone();
        dish_ids.push(id);
        Self { dish_ids }
    }

    pub fn without_dish(&self, id: &str) -> Self {
        Self {
            dish_ids: self
                .dish_ids
                .iter()
                .filter(|d| d.as_str() != id)
                .cloned()
                .collect(),
        }
    }

    /// Copy keeping only the dishes `keep` accepts.
    pub fn retain(&self, keep: impl Fn(&DishId) -> bool) -> Self {
        Self {
            dish_ids: self.dish_ids.iter().filter(|d| keep(d)).cloned().collect(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for (i, id) in self.dish_ids.iter().enumerate() {
            if self.dish_ids[..i].contains(id) {
                return Err(Error::validation(format!("shortlist lists {id:?} twice")));
            }
        }
        Ok(())
    }
}
