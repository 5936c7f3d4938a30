//! Pure operations over a plan and a catalogue snapshot. Nothing here reads
//! or writes storage; callers pass in everything they need.

pub mod distribute;
pub mod shopping;
pub mod variety;

use std::collections::BTreeMap;

pub use distribute::{Distribution, DistributionOptions, apply_distribution, distribute_dishes};
pub use shopping::{ShoppingList, monthly_shopping_list, shopping_list, weekly_shopping_list};
pub use variety::{
    Coverage, DEFAULT_REPEAT_THRESHOLD, VarietyReport, analyze_variety,
    analyze_variety_with_threshold, variety_score,
};

use crate::repo::Entity;

/// Index a slice of entities by id.
pub(crate) fn by_id<E: Entity>(items: &[E]) -> BTreeMap<&str, &E> {
    items.iter().map(|e| (e.id_str(), e)).collect()
}
