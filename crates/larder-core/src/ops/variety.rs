//! Variety analysis: how diverse the dishes in a plan scope are.
//!
//! Coverage counts which [`Category`] and [`Cuisine`] values appear at least
//! once. Occurrence counts, the repeat list and the 0-100 score describe how
//! the scheduled slots are spread. A slot naming a dish that is no longer in
//! the catalogue fails the whole analysis with every such slot listed.

use std::collections::BTreeMap;

use tracing::warn;

use super::by_id;
use crate::error::{DanglingReference, EntityKind, MissingReferences, Referrer, Result};
use crate::model::{Category, Cuisine, Dish, DishId, MonthlyPlan, Region, Scope};

/// A dish scheduled this many times or more is reported as a repeat.
pub const DEFAULT_REPEAT_THRESHOLD: usize = 3;

/// Distinct values observed out of all values that exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    pub hit: usize,
    pub total: usize,
}

impl Coverage {
    /// `hit / total`, in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.hit as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarietyReport {
    scope: Scope,
    repeat_threshold: usize,
    dish_counts: BTreeMap<DishId, usize>,
    dish_names: BTreeMap<DishId, String>,
    category_counts: BTreeMap<Category, usize>,
    cuisine_counts: BTreeMap<Cuisine, usize>,
    region_counts: BTreeMap<Region, usize>,
    total_scheduled: usize,
}

impl VarietyReport {
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Occurrences of every scheduled dish.
    pub fn dish_counts(&self) -> &BTreeMap<DishId, usize> {
        &self.dish_counts
    }

    pub fn dish_count(&self, id: &str) -> usize {
        self.dish_counts.get(id).copied().unwrap_or(0)
    }

    pub fn category_counts(&self) -> &BTreeMap<Category, usize> {
        &self.category_counts
    }

    pub fn cuisine_counts(&self) -> &BTreeMap<Cuisine, usize> {
        &self.cuisine_counts
    }

    pub fn region_counts(&self) -> &BTreeMap<Region, usize> {
        &self.region_counts
    }

    pub fn region_count(&self, region: Region) -> usize {
        self.region_counts.get(&region).copied().unwrap_or(0)
    }

    pub fn category_coverage(&self) -> Coverage {
        Coverage {
            hit: self.category_counts.len(),
            total: Category::ALL.len(),
        }
    }

    pub fn cuisine_coverage(&self) -> Coverage {
        Coverage {
            hit: self.cuisine_counts.len(),
            total: Cuisine::ALL.len(),
        }
    }

    /// `(dish id, count)` for every dish at or above the repeat threshold,
    /// ordered by id.
    pub fn repeats(&self) -> Vec<(&DishId, usize)> {
        self.dish_counts
            .iter()
            .filter(|(_, n)| **n >= self.repeat_threshold)
            .map(|(id, n)| (id, *n))
            .collect()
    }

    /// Number of scheduled slots in the scope.
    pub fn total_scheduled(&self) -> usize {
        self.total_scheduled
    }

    pub fn unique_dishes(&self) -> usize {
        self.dish_counts.len()
    }

    pub fn variety_score(&self) -> u8 {
        variety_score(
            self.unique_dishes(),
            self.total_scheduled,
            self.cuisine_counts.len(),
            self.region_count(Region::Eastern),
            self.region_count(Region::Western),
        )
    }

    /// Plain-language hints for improving the plan. Empty for an empty scope.
    pub fn suggestions(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.total_scheduled == 0 {
            return out;
        }

        for (id, count) in self.repeats() {
            let name = self.dish_names.get(id).map_or(id.as_str(), String::as_str);
            out.push(format!(
                "'{name}' appears {count} times. Consider reducing to 1-2 times."
            ));
        }

        let eastern = self.region_count(Region::Eastern);
        let western = self.region_count(Region::Western);
        let (more, fewer) = (eastern.max(western), eastern.min(western));
        if fewer > 0 && more > fewer * 2 {
            let dominant = if eastern > western { "Eastern" } else { "Western" };
            out.push(format!(
                "{dominant} dishes are dominant ({more} vs {fewer}). Consider balancing regions."
            ));
        }

        let cuisines = self.cuisine_counts.len();
        if cuisines < 3 {
            out.push(format!(
                "Only {cuisines} cuisine(s) used. Consider adding more variety."
            ));
        }

        match self.variety_score() {
            s if s < 50 => out.push("Variety score is low. Try adding more unique dishes.".into()),
            s if s < 70 => out.push("Good variety, but room for improvement.".into()),
            _ => {}
        }
        out
    }
}

/// Score a plan scope from 0 to 100.
///
/// 40 points for uniqueness (distinct / scheduled), 30 for cuisine breadth
/// (cuisines used / cuisines known) and 30 for east/west balance
/// (smaller region / larger region). An empty scope scores 100.
pub fn variety_score(
    unique: usize,
    total: usize,
    cuisines: usize,
    eastern: usize,
    western: usize,
) -> u8 {
    if total == 0 {
        return 100;
    }
    let uniqueness = unique as f64 / total as f64 * 40.0;
    let breadth = (cuisines as f64 / Cuisine::ALL.len() as f64 * 30.0).min(30.0);
    let balance = match eastern.max(western) {
        0 => 30.0,
        more => eastern.min(western) as f64 / more as f64 * 30.0,
    };
    (uniqueness + breadth + balance).clamp(0.0, 100.0) as u8
}

/// Variety of `scope` in `plan` with the default repeat threshold.
///
/// Every scheduled dish must resolve in `dishes`. All unresolved slots in the
/// scope are returned together as
/// [`Error::MissingReference`](crate::Error::MissingReference).
pub fn analyze_variety(plan: &MonthlyPlan, scope: Scope, dishes: &[Dish]) -> Result<VarietyReport> {
    analyze_variety_with_threshold(plan, scope, dishes, DEFAULT_REPEAT_THRESHOLD)
}

pub fn analyze_variety_with_threshold(
    plan: &MonthlyPlan,
    scope: Scope,
    dishes: &[Dish],
    repeat_threshold: usize,
) -> Result<VarietyReport> {
    let dish_by_id = by_id(dishes);
    let mut report = VarietyReport {
        scope,
        repeat_threshold: repeat_threshold.max(1),
        dish_counts: BTreeMap::new(),
        dish_names: BTreeMap::new(),
        category_counts: BTreeMap::new(),
        cuisine_counts: BTreeMap::new(),
        region_counts: BTreeMap::new(),
        total_scheduled: 0,
    };
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
        report.total_scheduled += 1;
        *report.dish_counts.entry(dish_id.clone()).or_default() += 1;
        report
            .dish_names
            .entry(dish_id.clone())
            .or_insert_with(|| dish.name().to_owned());
        *report.cuisine_counts.entry(dish.cuisine()).or_default() += 1;
        *report.region_counts.entry(dish.region()).or_default() += 1;
        for category in dish.categories() {
            *report.category_counts.entry(*category).or_default() += 1;
        }
    }

    if let Some(missing) = MissingReferences::from_refs(missing) {
        warn!(plan = %plan.id(), %scope, %missing, "variety report has unresolved references");
        return Err(missing.into());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::model::{Day, Month};

    fn plan() -> MonthlyPlan {
        MonthlyPlan::new("2025-01".parse::<Month>().unwrap())
    }

    fn dishes() -> Vec<Dish> {
        vec![
            Dish::from_parts("DISH-1", "Fried Rice", Cuisine::Chinese)
                .unwrap()
                .with_categories([Category::Grains, Category::Greens]),
            Dish::from_parts("DISH-2", "Risotto", Cuisine::Italian)
                .unwrap()
                .with_categories([Category::Grains, Category::Dairy]),
        ]
    }

    #[test]
    fn empty_plan_has_zero_coverage_and_full_score() {
        let report = analyze_variety(&plan(), Scope::Month, &dishes()).unwrap();
        assert_eq!(report.category_coverage(), Coverage { hit: 0, total: 11 });
        assert_eq!(report.cuisine_coverage().hit, 0);
        assert!(report.repeats().is_empty());
        assert_eq!(report.total_scheduled(), 0);
        assert_eq!(report.variety_score(), 100);
        assert!(report.suggestions().is_empty());
    }

    #[test]
    fn counts_occurrences_and_coverage() {
        let plan = plan()
            .schedule(1, Day::Mon, Some("DISH-1".into()))
            .unwrap()
            .schedule(1, Day::Tue, Some("DISH-1".into()))
            .unwrap()
            .schedule(1, Day::Wed, Some("DISH-2".into()))
            .unwrap();

        let report = analyze_variety(&plan, Scope::Week(1), &dishes()).unwrap();

        assert_eq!(report.dish_count("DISH-1"), 2);
        assert!(report.repeats().is_empty());
        assert_eq!(report.category_counts()[&Category::Grains], 3);
        assert_eq!(report.category_coverage().hit, 3);
        assert_eq!(report.cuisine_coverage().hit, 2);
        assert_eq!(report.region_count(Region::Eastern), 2);
        assert_eq!(report.region_count(Region::Western), 1);
        assert_eq!(report.unique_dishes(), 2);
    }

    #[test]
    fn third_occurrence_is_a_repeat() {
        let mut plan = plan();
        for day in [Day::Mon, Day::Wed, Day::Fri] {
            plan = plan.schedule(2, day, Some("DISH-1".into())).unwrap();
        }
        let report = analyze_variety(&plan, Scope::Month, &dishes()).unwrap();
        let repeats: Vec<(&str, usize)> =
            report.repeats().into_iter().map(|(id, n)| (id.as_str(), n)).collect();
        assert_eq!(repeats, vec![("DISH-1", 3)]);
        assert!(report.suggestions()[0].starts_with("'Fried Rice' appears 3 times"));

        let strict = analyze_variety_with_threshold(&plan, Scope::Month, &dishes(), 4).unwrap();
        assert!(strict.repeats().is_empty());
    }

    #[test]
    fn missing_dish_fails_the_analysis() {
        let plan = plan()
            .schedule(1, Day::Mon, Some("DISH-1".into()))
            .unwrap()
            .schedule(1, Day::Tue, Some("DISH-GONE".into()))
            .unwrap()
            .schedule(3, Day::Sat, Some("DISH-ALSO-GONE".into()))
            .unwrap();

        let err = analyze_variety(&plan, Scope::Month, &dishes()).unwrap_err();

        match err {
            Error::MissingReference(missing) => {
                assert_eq!(missing.missing_ids(), vec!["DISH-ALSO-GONE", "DISH-GONE"]);
                assert_eq!(
                    missing.references()[0].referrer,
                    Referrer::Slot { week: 1, day: Day::Tue }
                );
            }
            other => panic!("expected missing reference, got {other:?}"),
        }
    }

    #[test]
    fn missing_dish_outside_the_scope_is_ignored() {
        let plan = plan()
            .schedule(1, Day::Mon, Some("DISH-1".into()))
            .unwrap()
            .schedule(2, Day::Tue, Some("DISH-GONE".into()))
            .unwrap();

        let report = analyze_variety(&plan, Scope::Week(1), &dishes()).unwrap();

        assert_eq!(report.total_scheduled(), 1);
        assert_eq!(report.unique_dishes(), 1);
        assert_eq!(report.dish_count("DISH-GONE"), 0);
    }

    #[test]
    fn score_weights_uniqueness_breadth_and_balance() {
        // 2 distinct of 2, 2 of 11 cuisines, 1 east vs 1 west.
        assert_eq!(variety_score(2, 2, 2, 1, 1), 40 + 5 + 30);
        // Same dish twice, one region only.
        assert_eq!(variety_score(1, 2, 1, 2, 0), 20 + 2);
        assert_eq!(variety_score(0, 0, 0, 0, 0), 100);
    }

    #[test]
    fn repeated_calls_agree() {
        let plan = plan().schedule(3, Day::Thu, Some("DISH-2".into())).unwrap();
        let a = analyze_variety(&plan, Scope::Month, &dishes()).unwrap();
        let b = analyze_variety(&plan, Scope::Month, &dishes()).unwrap();
        assert_eq!(a, b);
    }
}
