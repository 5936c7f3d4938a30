use crate::error::{EntityKind, Error, Result};
use crate::model::{Month, MonthlyPlan};

use super::{Entity, EntityStore};

impl EntityStore<MonthlyPlan> {
    /// The plan for `month`, if one has been stored.
    pub fn get_for_month(&mut self, month: &Month) -> Result<Option<MonthlyPlan>> {
        Ok(self
            .filter(|p| p.month() == month)?
            .into_iter()
            .next())
    }

    /// Add an empty plan for `month`. Fails if the month already has one.
    pub fn create(&mut self, month: &Month) -> Result<MonthlyPlan> {
        if let Some(existing) = self.get_for_month(month)? {
            return Err(Error::duplicate(EntityKind::Plan, existing.id_str()));
        }
        self.add(MonthlyPlan::new(month.clone()))
    }

    /// The stored plan for `month`, or a fresh empty one. A fresh plan is not
    /// added to the store; the caller decides whether to keep it.
    pub fn get_or_create(&mut self, month: &Month) -> Result<MonthlyPlan> {
        Ok(self
            .get_for_month(month)?
            .unwrap_or_else(|| MonthlyPlan::new(month.clone())))
    }
}
