use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ids::{DishId, PlanId};
use super::labels::Day;
use crate::error::{Error, Result};

/// Number of weeks in every monthly plan.
pub const WEEKS_PER_PLAN: usize = 4;

/// Map a 1-based week number onto an index into [`MonthlyPlan`] weeks.
pub fn week_index(week: u8) -> Result<usize> {
    match week {
        1..=4 => Ok(usize::from(week) - 1),
        _ => Err(Error::validation(format!("week must be 1-4, got {week}"))),
    }
}

// -----------------------------------------------------------------------
// Month
// -----------------------------------------------------------------------

/// A `YYYY-MM` month label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month(String);

impl Month {
    /// The current month in local time.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self(format!("{:04}-{:02}", today.year(), today.month()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human label such as `January 2025`.
    pub fn label(&self) -> String {
        self.first_day()
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| self.0.clone())
    }

    fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&format!("{}-01", self.0), "%Y-%m-%d").ok()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let shaped = s.len() == 7
            && s.bytes()
                .enumerate()
                .all(|(i, b)| if i == 4 { b == b'-' } else { b.is_ascii_digit() });
        let month = Self(s.to_owned());
        if shaped && month.first_day().is_some() {
            Ok(month)
        } else {
            Err(Error::validation(format!("month must be YYYY-MM, got {s:?}")))
        }
    }
}

impl TryFrom<String> for Month {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Month> for String {
    fn from(m: Month) -> Self {
        m.0
    }
}

// -----------------------------------------------------------------------
// Scope
// -----------------------------------------------------------------------

/// Unit over which shopping and variety operations aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// One week, numbered 1-4.
    Week(u8),
    Month,
}

impl Scope {
    pub fn from_week(week: Option<u8>) -> Self {
        week.map_or(Self::Month, Self::Week)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Week(n) => write!(f, "week {n}"),
            Self::Month => f.write_str("month"),
        }
    }
}

// -----------------------------------------------------------------------
// WeekPlan
// -----------------------------------------------------------------------

/// One week: an optional dish per day, Monday first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "[Option<DishId>; 7]", from = "WeekPlanRepr")]
pub struct WeekPlan {
    days: [Option<DishId>; 7],
}

impl WeekPlan {
    pub fn dish_on(&self, day: Day) -> Option<&DishId> {
        self.days[day.index()].as_ref()
    }

    /// Copy of this week with `day` set to `dish` (`None` clears it).
    pub fn with_dish(&self, day: Day, dish: Option<DishId>) -> Self {
        let mut days = self.days.clone();
        days[day.index()] = dish;
        Self { days }
    }

    /// Scheduled days in week order.
    pub fn scheduled(&self) -> impl Iterator<Item = (Day, &DishId)> + '_ {
        Day::ALL
            .iter()
            .zip(&self.days)
            .filter_map(|(day, dish)| dish.as_ref().map(|d| (*day, d)))
    }

    pub fn scheduled_dish_ids(&self) -> Vec<&DishId> {
        self.scheduled().map(|(_, id)| id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Option::is_none)
    }
}

impl From<WeekPlan> for [Option<DishId>; 7] {
    fn from(week: WeekPlan) -> Self {
        week.days
    }
}

/// Accepted on-disk shapes for a week: the current seven-slot list, or the
/// older split of weekday dinners and weekend meals keyed by day label.
#[derive(Deserialize)]
#[serde(untagged)]
enum WeekPlanRepr {
    Days([Option<DishId>; 7]),
    Split {
        #[serde(default)]
        weekday_dinners: BTreeMap<Day, Option<DishId>>,
        #[serde(default)]
        weekend_meals: BTreeMap<Day, Option<DishId>>,
    },
}

impl From<WeekPlanRepr> for WeekPlan {
    fn from(repr: WeekPlanRepr) -> Self {
        match repr {
            WeekPlanRepr::Days(days) => Self { days },
            WeekPlanRepr::Split {
                weekday_dinners,
                weekend_meals,
            } => {
                let mut days: [Option<DishId>; 7] = Default::default();
                for (day, dish) in weekday_dinners.into_iter().chain(weekend_meals) {
                    days[day.index()] = dish;
                }
                Self { days }
            }
        }
    }
}

// -----------------------------------------------------------------------
// MonthlyPlan
// -----------------------------------------------------------------------

/// A four-week plan for one month.
///
/// Weeks are shared behind [`Arc`], so scheduling a dish copies only the
/// touched week; the other three are the same allocations as before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPlan {
    #[serde(alias = "uid")]
    id: PlanId,
    month: Month,
    #[serde(default)]
    weeks: [Arc<WeekPlan>; WEEKS_PER_PLAN],
}

impl MonthlyPlan {
    /// Fresh plan with four empty weeks.
    pub fn new(month: Month) -> Self {
        Self {
            id: PlanId::for_month(&month),
            month,
            weeks: Default::default(),
        }
    }

    pub fn id(&self) -> &PlanId {
        &self.id
    }

    pub fn month(&self) -> &Month {
        &self.month
    }

    pub fn weeks(&self) -> &[Arc<WeekPlan>; WEEKS_PER_PLAN] {
        &self.weeks
    }

    /// Week `week` (1-4).
    pub fn week(&self, week: u8) -> Result<&WeekPlan> {
        Ok(&self.weeks[week_index(week)?])
    }

    pub fn with_week(&self, week: u8, plan: WeekPlan) -> Result<Self> {
        let idx = week_index(week)?;
        let mut weeks = self.weeks.clone();
        weeks[idx] = Arc::new(plan);
        Ok(Self {
            weeks,
            ..self.clone()
        })
    }

    /// Copy of this plan with one slot replaced. `None` clears the slot.
    pub fn schedule(&self, week: u8, day: Day, dish: Option<DishId>) -> Result<Self> {
        let updated = self.week(week)?.with_dish(day, dish);
        self.with_week(week, updated)
    }

    /// Every scheduled slot in `scope` as `(week, day, dish)`, in calendar
    /// order.
    pub fn slots(&self, scope: Scope) -> Result<Vec<(u8, Day, &DishId)>> {
        let weeks: Vec<u8> = match scope {
            Scope::Week(n) => {
                week_index(n)?;
                vec![n]
            }
            Scope::Month => (1..=4).collect(),
        };
        Ok(weeks
            .into_iter()
            .flat_map(|n| {
                self.weeks[usize::from(n) - 1]
                    .scheduled()
                    .map(move |(day, id)| (n, day, id))
            })
            .collect())
    }

    pub fn all_scheduled_dish_ids(&self) -> Vec<&DishId> {
        self.weeks.iter().flat_map(|w| w.scheduled_dish_ids()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.iter().all(|w| w.is_empty())
    }

    /// Whether any slot holds `dish`.
    pub fn uses_dish(&self, dish: &str) -> bool {
        self.weeks
            .iter()
            .any(|w| w.scheduled().any(|(_, id)| id.as_str() == dish))
    }

    /// The id must be the one derived from the month.
    pub(crate) fn validate(&self) -> Result<()> {
        let expected = PlanId::for_month(&self.month);
        if self.id != expected {
            return Err(Error::validation(format!(
                "plan {:?} is for month {}, expected id {expected:?}",
                self.id.as_str(),
                self.month
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan() -> Month {
        "2025-01".parse().unwrap()
    }

    #[test]
    fn month_accepts_only_yyyy_mm() {
        assert_eq!(jan().as_str(), "2025-01");
        for bad in ["2025-13", "2025-1", "25-01", "2025/01", "", "2025-00", "abcd-ef"] {
            assert!(bad.parse::<Month>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn month_label_is_human_readable() {
        assert_eq!(jan().label(), "January 2025");
        assert!(Month::current().as_str().len() == 7);
    }

    #[test]
    fn month_deserialization_validates() {
        assert!(serde_json::from_str::<Month>("\"2025-02\"").is_ok());
        assert!(serde_json::from_str::<Month>("\"February\"").is_err());
    }

    #[test]
    fn fresh_plan_has_four_empty_weeks() {
        let plan = MonthlyPlan::new(jan());
        assert_eq!(plan.id().as_str(), "PLAN-2025-01");
        assert_eq!(plan.weeks().len(), WEEKS_PER_PLAN);
        for week in 1..=4 {
            assert!(plan.week(week).unwrap().is_empty());
        }
        assert!(plan.slots(Scope::Month).unwrap().is_empty());
    }

    #[test]
    fn week_outside_range_is_a_validation_error() {
        let plan = MonthlyPlan::new(jan());
        for week in [0, 5] {
            assert!(matches!(plan.week(week), Err(Error::Validation(_))));
            assert!(plan.schedule(week, Day::Mon, None).is_err());
            assert!(plan.slots(Scope::Week(week)).is_err());
        }
    }

    #[test]
    fn scheduling_shares_untouched_weeks() {
        let plan = MonthlyPlan::new(jan());
        let next = plan.schedule(1, Day::Mon, Some("DISH-1".into())).unwrap();

        assert!(plan.is_empty());
        assert_eq!(next.week(1).unwrap().dish_on(Day::Mon).unwrap().as_str(), "DISH-1");
        assert!(!Arc::ptr_eq(&plan.weeks()[0], &next.weeks()[0]));
        for i in 1..4 {
            assert!(Arc::ptr_eq(&plan.weeks()[i], &next.weeks()[i]));
        }
    }

    #[test]
    fn slots_follow_calendar_order() {
        let plan = MonthlyPlan::new(jan())
            .schedule(2, Day::Sun, Some("DISH-3".into()))
            .unwrap()
            .schedule(1, Day::Tue, Some("DISH-2".into()))
            .unwrap()
            .schedule(1, Day::Mon, Some("DISH-1".into()))
            .unwrap();

        let slots: Vec<(u8, Day, &str)> = plan
            .slots(Scope::Month)
            .unwrap()
            .into_iter()
            .map(|(w, d, id)| (w, d, id.as_str()))
            .collect();
        assert_eq!(
            slots,
            vec![(1, Day::Mon, "DISH-1"), (1, Day::Tue, "DISH-2"), (2, Day::Sun, "DISH-3")]
        );
        assert_eq!(plan.slots(Scope::Week(2)).unwrap().len(), 1);
        assert!(plan.uses_dish("DISH-3"));
    }

    #[test]
    fn weeks_serialize_as_seven_slot_lists() {
        let plan = MonthlyPlan::new(jan())
            .schedule(1, Day::Wed, Some("DISH-1".into()))
            .unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(
            json["weeks"][0],
            serde_json::json!([null, null, "DISH-1", null, null, null, null])
        );
        let back: MonthlyPlan = serde_json::from_value(json).unwrap();
        assert_eq!(back, plan);
    }

    #[test]
    fn plan_id_must_match_month() {
        assert!(MonthlyPlan::new(jan()).validate().is_ok());
        let json = r#"{"id": "PLAN-2025-01", "month": "2025-02"}"#;
        let plan: MonthlyPlan = serde_json::from_str(json).unwrap();
        assert!(matches!(plan.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn split_week_layout_is_read() {
        let json = r#"{
            "uid": "PLAN-2025-01",
            "month": "2025-01",
            "weeks": [
                {"weekday_dinners": {"Mon": "DISH-1", "Tue": null},
                 "weekend_meals": {"Sun": "DISH-2"}},
                {}, {}, {}
            ]
        }"#;
        let plan: MonthlyPlan = serde_json::from_str(json).unwrap();
        let week = plan.week(1).unwrap();
        assert_eq!(week.dish_on(Day::Mon).unwrap().as_str(), "DISH-1");
        assert_eq!(week.dish_on(Day::Sun).unwrap().as_str(), "DISH-2");
        assert!(plan.week(2).unwrap().is_empty());
    }
}
