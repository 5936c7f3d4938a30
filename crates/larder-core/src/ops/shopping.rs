//! Shopping list: the ingredients a plan scope needs, split by how they are
//! bought.

use std::collections::BTreeMap;

use tracing::warn;

use super::by_id;
use crate::error::{DanglingReference, EntityKind, MissingReferences, Referrer, Result};
use crate::model::{Dish, Ingredient, MonthlyPlan, PurchaseType, Scope};

/// Bulk and weekly buckets, each deduplicated and sorted by name then id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    bulk: Vec<Ingredient>,
    weekly: Vec<Ingredient>,
}

impl ShoppingList {
    pub fn bulk(&self) -> &[Ingredient] {
        &self.bulk
    }

    pub fn weekly(&self) -> &[Ingredient] {
        &self.weekly
    }

    pub fn bulk_names(&self) -> Vec<&str> {
        self.bulk.iter().map(Ingredient::name).collect()
    }

    pub fn weekly_names(&self) -> Vec<&str> {
        self.weekly.iter().map(Ingredient::name).collect()
    }

    /// Whether either bucket holds ingredient `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.bulk
            .iter()
            .chain(&self.weekly)
            .any(|i| i.id().as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.bulk.len() + self.weekly.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bulk.is_empty() && self.weekly.is_empty()
    }
}

/// Shopping list for `scope` of `plan`.
///
/// Every scheduled dish and every ingredient it names must resolve. All
/// unresolved ids in the scope are collected and returned together as
/// [`Error::MissingReference`](crate::Error::MissingReference).
pub fn shopping_list(
    plan: &MonthlyPlan,
    scope: Scope,
    dishes: &[Dish],
    ingredients: &[Ingredient],
) -> Result<ShoppingList> {
    let dish_by_id = by_id(dishes);
    let ingredient_by_id = by_id(ingredients);

    let mut needed: BTreeMap<&str, &Ingredient> = BTreeMap::new();
    let mut missing = Vec::new();

    for (week, day, dish_id) in plan.slots(scope)? {
        let Some(dish) = dish_by_id.get(dish_id.as_str()) else {
            missing.push(DanglingReference {
                referrer: Referrer::Slot { week, day },
                target: EntityKind::Dish,
                id: dish_id.to_string(),
            });
            continue;
        };
        for ingredient_id in dish.ingredients() {
            match ingredient_by_id.get(ingredient_id.as_str()) {
                Some(ingredient) => {
                    needed.insert(ingredient_id.as_str(), ingredient);
                }
                None => missing.push(DanglingReference {
                    referrer: Referrer::Dish(dish.id().to_string()),
                    target: EntityKind::Ingredient,
                    id: ingredient_id.to_string(),
                }),
            }
        }
    }

    if let Some(missing) = MissingReferences::from_refs(missing) {
        warn!(plan = %plan.id(), %scope, %missing, "shopping list has unresolved references");
        return Err(missing.into());
    }

    let (mut bulk, mut weekly): (Vec<Ingredient>, Vec<Ingredient>) = needed
        .into_values()
        .cloned()
        .partition(|i| i.purchase_type() == PurchaseType::Bulk);
    for bucket in [&mut bulk, &mut weekly] {
        bucket.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));
    }
    Ok(ShoppingList { bulk, weekly })
}

/// Shopping list for week `week` (1-4).
pub fn weekly_shopping_list(
    plan: &MonthlyPlan,
    week: u8,
    dishes: &[Dish],
    ingredients: &[Ingredient],
) -> Result<ShoppingList> {
    shopping_list(plan, Scope::Week(week), dishes, ingredients)
}

/// Shopping list across all four weeks.
pub fn monthly_shopping_list(
    plan: &MonthlyPlan,
    dishes: &[Dish],
    ingredients: &[Ingredient],
) -> Result<ShoppingList> {
    shopping_list(plan, Scope::Month, dishes, ingredients)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::model::{Cuisine, Day, Month};

    fn catalogue() -> (Vec<Dish>, Vec<Ingredient>) {
        let ingredients = vec![
            Ingredient::from_parts("ING-1", "Rice", PurchaseType::Bulk).unwrap(),
            Ingredient::from_parts("ING-2", "Spinach", PurchaseType::Weekly).unwrap(),
            Ingredient::from_parts("ING-3", "Garlic", PurchaseType::Weekly).unwrap(),
        ];
        let dishes = vec![
            Dish::from_parts("DISH-1", "Fried Rice", Cuisine::Chinese)
                .unwrap()
                .with_ingredients(["ING-1", "ING-2"]),
            Dish::from_parts("DISH-2", "Garlic Spinach", Cuisine::Chinese)
                .unwrap()
                .with_ingredients(["ING-2", "ING-3"]),
        ];
        (dishes, ingredients)
    }

    fn plan() -> MonthlyPlan {
        MonthlyPlan::new("2025-01".parse::<Month>().unwrap())
    }

    #[test]
    fn buckets_by_purchase_type() {
        let (dishes, ingredients) = catalogue();
        let plan = plan().schedule(1, Day::Mon, Some("DISH-1".into())).unwrap();

        let list = weekly_shopping_list(&plan, 1, &dishes, &ingredients).unwrap();

        assert_eq!(list.bulk_names(), vec!["Rice"]);
        assert_eq!(list.weekly_names(), vec!["Spinach"]);
    }

    #[test]
    fn shared_ingredient_appears_once_sorted_by_name() {
        let (dishes, ingredients) = catalogue();
        let plan = plan()
            .schedule(1, Day::Mon, Some("DISH-1".into()))
            .unwrap()
            .schedule(1, Day::Wed, Some("DISH-2".into()))
            .unwrap();

        let list = weekly_shopping_list(&plan, 1, &dishes, &ingredients).unwrap();

        assert_eq!(list.weekly_names(), vec!["Garlic", "Spinach"]);
        assert_eq!(list.len(), 3);
        assert!(list.contains("ING-3"));
    }

    #[test]
    fn month_scope_spans_all_weeks() {
        let (dishes, ingredients) = catalogue();
        let plan = plan()
            .schedule(1, Day::Mon, Some("DISH-1".into()))
            .unwrap()
            .schedule(4, Day::Sun, Some("DISH-2".into()))
            .unwrap();

        assert!(!weekly_shopping_list(&plan, 1, &dishes, &ingredients)
            .unwrap()
            .contains("ING-3"));
        let month = monthly_shopping_list(&plan, &dishes, &ingredients).unwrap();
        assert!(month.contains("ING-3"));
        assert!(weekly_shopping_list(&plan, 2, &dishes, &ingredients).unwrap().is_empty());
    }

    #[test]
    fn all_missing_references_are_reported_together() {
        let (dishes, mut ingredients) = catalogue();
        ingredients.retain(|i| i.id().as_str() != "ING-2");
        let plan = plan()
            .schedule(1, Day::Mon, Some("DISH-1".into()))
            .unwrap()
            .schedule(1, Day::Tue, Some("DISH-404".into()))
            .unwrap();

        let err = weekly_shopping_list(&plan, 1, &dishes, &ingredients).unwrap_err();

        let Error::MissingReference(missing) = err else {
            panic!("expected missing reference, got {err:?}");
        };
        assert_eq!(missing.missing_ids(), vec!["DISH-404", "ING-2"]);
    }

    #[test]
    fn invalid_week_is_rejected() {
        let (dishes, ingredients) = catalogue();
        assert!(matches!(
            weekly_shopping_list(&plan(), 5, &dishes, &ingredients),
            Err(Error::Validation(_))
        ));
    }
}
