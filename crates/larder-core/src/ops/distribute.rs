//! Automatic planning: spread a shortlist of dishes over the weeks of a plan.
//!
//! Each week is filled greedily. Eastern picks come first, then western, then
//! any dish to top the week up. Every candidate is scored by how many of its
//! categories are new to the week, whether its cuisine is new to the week, and
//! whether it was used the week before. Dishes not yet used anywhere are
//! preferred; once a region runs dry its dishes are reused.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::model::{Category, Cuisine, Day, Dish, DishId, MonthlyPlan, Region, WEEKS_PER_PLAN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionOptions {
    pub weeks: usize,
    pub per_week: usize,
    pub eastern_per_week: usize,
    pub western_per_week: usize,
}

impl Default for DistributionOptions {
    fn default() -> Self {
        Self {
            weeks: WEEKS_PER_PLAN,
            per_week: 4,
            eastern_per_week: 2,
            western_per_week: 2,
        }
    }
}

impl DistributionOptions {
    fn validate(&self) -> Result<()> {
        if !(1..=WEEKS_PER_PLAN).contains(&self.weeks) {
            return Err(Error::validation(format!(
                "weeks must be 1-{WEEKS_PER_PLAN}, got {}",
                self.weeks
            )));
        }
        if self.per_week > Day::ALL.len() {
            return Err(Error::validation(format!(
                "at most {} dishes fit in a week, got {}",
                Day::ALL.len(),
                self.per_week
            )));
        }
        if self.eastern_per_week + self.western_per_week > self.per_week {
            return Err(Error::validation(format!(
                "{} eastern + {} western dishes exceed {} per week",
                self.eastern_per_week, self.western_per_week, self.per_week
            )));
        }
        Ok(())
    }
}

/// Dish ids chosen for each week, plus what was left out or used twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    pub weeks: Vec<Vec<DishId>>,
    /// Input dishes that were never picked, in input order.
    pub discarded: Vec<DishId>,
    /// Dishes picked in more than one week, ordered by id.
    pub reused: Vec<DishId>,
}

#[derive(Default)]
struct WeekState {
    categories: BTreeSet<Category>,
    cuisines: BTreeSet<Cuisine>,
    picked: Vec<DishId>,
}

impl WeekState {
    fn add(&mut self, dish: &Dish) {
        self.categories.extend(dish.categories().iter().copied());
        self.cuisines.insert(dish.cuisine());
        self.picked.push(dish.id().clone());
    }

    fn has(&self, dish: &Dish) -> bool {
        self.picked.contains(dish.id())
    }

    // Doubled so the half-point cuisine bonus stays integral.
    fn score(&self, dish: &Dish, previous: &BTreeSet<DishId>) -> i64 {
        let new_categories = dish.categories().difference(&self.categories).count() as i64;
        let mut score = new_categories * 2;
        if !self.cuisines.contains(&dish.cuisine()) {
            score += 1;
        }
        if previous.contains(dish.id()) {
            score -= 2;
        }
        score
    }
}

struct Picker<'a> {
    dishes: &'a [Dish],
    used: BTreeMap<DishId, usize>,
    previous: BTreeSet<DishId>,
}

impl<'a> Picker<'a> {
    /// Pick the best candidate matching `region` (any region when `None`),
    /// preferring dishes not used in any week yet.
    fn pick(&mut self, week: &mut WeekState, region: Option<Region>) -> bool {
        let in_region: Vec<&'a Dish> = self
            .dishes
            .iter()
            .filter(|d| region.is_none_or(|r| d.region() == r))
            .filter(|d| !week.has(d))
            .collect();
        let fresh: Vec<&'a Dish> = in_region
            .iter()
            .copied()
            .filter(|d| !self.used.contains_key(d.id()))
            .collect();
        let pool = if fresh.is_empty() { in_region } else { fresh };

        let mut best: Option<(&Dish, i64)> = None;
        for dish in pool {
            let score = week.score(dish, &self.previous);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((dish, score));
            }
        }
        let Some((dish, _)) = best else {
            return false;
        };
        week.add(dish);
        *self.used.entry(dish.id().clone()).or_default() += 1;
        true
    }
}

/// Spread `dishes` over `options.weeks` weeks.
///
/// Ties go to the dish that comes first in `dishes`, so the result is a pure
/// function of the input order.
pub fn distribute_dishes(dishes: &[Dish], options: DistributionOptions) -> Result<Distribution> {
    options.validate()?;
    let mut picker = Picker {
        dishes,
        used: BTreeMap::new(),
        previous: BTreeSet::new(),
    };

    let mut weeks = Vec::with_capacity(options.weeks);
    for _ in 0..options.weeks {
        let mut week = WeekState::default();
        for _ in 0..options.eastern_per_week {
            if !picker.pick(&mut week, Some(Region::Eastern)) {
                break;
            }
        }
        for _ in 0..options.western_per_week {
            if !picker.pick(&mut week, Some(Region::Western)) {
                break;
            }
        }
        while week.picked.len() < options.per_week {
            if !picker.pick(&mut week, None) {
                break;
            }
        }
        picker.previous = week.picked.iter().cloned().collect();
        weeks.push(week.picked);
    }

    let mut seen = BTreeSet::new();
    let discarded = dishes
        .iter()
        .map(Dish::id)
        .filter(|id| !picker.used.contains_key(*id) && seen.insert(*id))
        .cloned()
        .collect();
    let reused = picker
        .used
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(id, _)| id)
        .collect();

    Ok(Distribution {
        weeks,
        discarded,
        reused,
    })
}

/// Lay `distribution` onto `plan`: week N's dishes fill that week from
/// Monday onward. Days past the last dish keep what they had.
pub fn apply_distribution(plan: &MonthlyPlan, distribution: &Distribution) -> Result<MonthlyPlan> {
    let mut plan = plan.clone();
    for (week_no, dishes) in (1u8..).zip(&distribution.weeks) {
        if dishes.len() > Day::ALL.len() {
            return Err(Error::validation(format!(
                "week {week_no} has {} dishes, more than fit in a week",
                dishes.len()
            )));
        }
        let mut week = plan.week(week_no)?.clone();
        for (day, dish) in Day::ALL.iter().zip(dishes) {
            week = week.with_dish(*day, Some(dish.clone()));
        }
        plan = plan.with_week(week_no, week)?;
    }
    Ok(plan)
}
