//! Scoped unit of work for one user.
//!
//! A [`Session`] owns the four entity stores and the shortlist for a user.
//! Stores load lazily on first use. [`Session::run`] commits every dirty
//! store when the closure succeeds and throws the in-memory changes away when
//! it fails, so a failed batch never reaches storage. Dropping a session
//! never saves.

use std::sync::Arc;

use larder_store::migration::{self, MigrationReport};
use larder_store::{BlobStore, LocalBlobStore, StoreConfig};
use tracing::{debug, info, warn};

use crate::defaults::{self, is_default_dish};
use crate::error::{EntityKind, Error, Result};
use crate::model::{Day, Dish, DishId, Month, MonthlyPlan, PlanId, Scope};
use crate::ops::{self, Distribution, DistributionOptions, ShoppingList, VarietyReport};
use crate::repo::{ContextStore, DishStore, IngredientStore, PlanStore, ShortlistStore};

pub struct Session {
    blobs: Arc<dyn BlobStore>,
    user_id: String,
    ingredients: IngredientStore,
    dishes: DishStore,
    plans: PlanStore,
    contexts: ContextStore,
    shortlist: ShortlistStore,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("dirty", &self.is_dirty())
            .finish()
    }
}

impl Session {
    pub fn open(blobs: Arc<dyn BlobStore>, user_id: &str) -> Self {
        debug!(user_id, "opening session");
        Self {
            ingredients: IngredientStore::for_user(Arc::clone(&blobs), user_id),
            dishes: DishStore::for_user(Arc::clone(&blobs), user_id),
            plans: PlanStore::for_user(Arc::clone(&blobs), user_id),
            contexts: ContextStore::for_user(Arc::clone(&blobs), user_id),
            shortlist: ShortlistStore::for_user(Arc::clone(&blobs), user_id),
            blobs,
            user_id: user_id.to_owned(),
        }
    }

    /// Session over a [`LocalBlobStore`] rooted at `config.data_path`.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let blobs = LocalBlobStore::new(&config.data_path)?;
        Ok(Self::open(Arc::new(blobs), &config.user_id))
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn ingredients(&mut self) -> &mut IngredientStore {
        &mut self.ingredients
    }

    pub fn dishes(&mut self) -> &mut DishStore {
        &mut self.dishes
    }

    pub fn plans(&mut self) -> &mut PlanStore {
        &mut self.plans
    }

    pub fn contexts(&mut self) -> &mut ContextStore {
        &mut self.contexts
    }

    pub fn shortlist(&mut self) -> &mut ShortlistStore {
        &mut self.shortlist
    }

    pub fn is_dirty(&self) -> bool {
        self.ingredients.is_dirty()
            || self.dishes.is_dirty()
            || self.plans.is_dirty()
            || self.contexts.is_dirty()
            || self.shortlist.is_dirty()
    }

    /// Run `f`, then commit if it returned `Ok` or discard if it returned
    /// `Err`. A failed commit also discards whatever it had not yet written.
    pub fn run<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        match f(self) {
            Ok(value) => match self.commit() {
                Ok(()) => Ok(value),
                Err(err) => {
                    warn!(user_id = %self.user_id, error = %err, "commit failed, discarding the rest");
                    self.discard();
                    Err(err)
                }
            },
            Err(err) => {
                debug!(user_id = %self.user_id, error = %err, "discarding session changes");
                self.discard();
                Err(err)
            }
        }
    }

    /// Save every store with pending changes.
    ///
    /// Collections are written one blob at a time in a fixed order
    /// (ingredients, dishes, plans, contexts, shortlist). When a write fails,
    /// the collections before it are already on disk and the ones after it
    /// are not; there is no rollback across blobs.
    pub fn commit(&mut self) -> Result<()> {
        let mut saved = 0;
        if self.ingredients.is_dirty() {
            self.ingredients.save()?;
            saved += 1;
        }
        if self.dishes.is_dirty() {
            self.dishes.save()?;
            saved += 1;
        }
        if self.plans.is_dirty() {
            self.plans.save()?;
            saved += 1;
        }
        if self.contexts.is_dirty() {
            self.contexts.save()?;
            saved += 1;
        }
        if self.shortlist.is_dirty() {
            self.shortlist.save()?;
            saved += 1;
        }
        if saved > 0 {
            info!(user_id = %self.user_id, collections = saved, "committed session");
        }
        Ok(())
    }

    /// Drop all unsaved changes.
    pub fn discard(&mut self) {
        self.ingredients.reload();
        self.dishes.reload();
        self.plans.reload();
        self.contexts.reload();
        self.shortlist.reload();
    }

    // -------------------------------------------------------------------
    // Reports
    // -------------------------------------------------------------------

    /// The stored plan for `month`. A month without a plan is `NotFound`.
    pub fn plan_for(&mut self, month: &Month) -> Result<MonthlyPlan> {
        self.plans
            .get_for_month(month)?
            .ok_or_else(|| Error::not_found(EntityKind::Plan, PlanId::for_month(month)))
    }

    pub fn shopping_list(&mut self, month: &Month, scope: Scope) -> Result<ShoppingList> {
        let plan = self.plan_for(month)?;
        let dishes = self.dishes.list_all()?;
        let ingredients = self.ingredients.list_all()?;
        ops::shopping_list(&plan, scope, &dishes, &ingredients)
    }

    pub fn weekly_shopping_list(&mut self, month: &Month, week: u8) -> Result<ShoppingList> {
        self.shopping_list(month, Scope::Week(week))
    }

    pub fn monthly_shopping_list(&mut self, month: &Month) -> Result<ShoppingList> {
        self.shopping_list(month, Scope::Month)
    }

    /// Variety of one week, or of the whole month when `week` is `None`.
    /// Fails with [`Error::MissingReference`] when a slot in range names a
    /// dish that no longer exists.
    pub fn variety_report(&mut self, month: &Month, week: Option<u8>) -> Result<VarietyReport> {
        let plan = self.plan_for(month)?;
        let dishes = self.dishes.list_all()?;
        ops::analyze_variety(&plan, Scope::from_week(week), &dishes)
    }

    // -------------------------------------------------------------------
    // Scheduling
    // -------------------------------------------------------------------

    /// Put `dish_id` on `day` of `week`, creating the month's plan if needed.
    /// The dish must exist.
    pub fn schedule_dish(
        &mut self,
        month: &Month,
        week: u8,
        day: Day,
        dish_id: &str,
    ) -> Result<MonthlyPlan> {
        let dish = self.dishes.get(dish_id)?;
        let plan = self.plans.get_or_create(month)?;
        let updated = plan.schedule(week, day, Some(dish.id().clone()))?;
        let updated = self.store_plan(updated)?;
        debug!(month = %month, week, %day, dish = %dish.id(), "scheduled dish");
        Ok(updated)
    }

    /// Empty one slot of an existing plan.
    pub fn clear_slot(&mut self, month: &Month, week: u8, day: Day) -> Result<MonthlyPlan> {
        let plan = self.plan_for(month)?;
        let updated = plan.schedule(week, day, None)?;
        self.plans.update(updated)
    }

    /// Fill the month's plan automatically from `shortlist` (every dish in the
    /// catalogue when `None`).
    pub fn auto_plan(
        &mut self,
        month: &Month,
        shortlist: Option<&[DishId]>,
        options: DistributionOptions,
    ) -> Result<(MonthlyPlan, Distribution)> {
        let candidates: Vec<Dish> = match shortlist {
            Some(ids) => ids
                .iter()
                .map(|id| self.dishes.get(id.as_str()))
                .collect::<Result<_>>()?,
            None => self.dishes.list_all()?,
        };
        let distribution = ops::distribute_dishes(&candidates, options)?;
        let plan = self.plans.get_or_create(month)?;
        let updated = ops::apply_distribution(&plan, &distribution)?;
        let updated = self.store_plan(updated)?;
        info!(
            month = %month,
            picked = distribution.weeks.iter().map(Vec::len).sum::<usize>(),
            discarded = distribution.discarded.len(),
            "auto-planned month"
        );
        Ok((updated, distribution))
    }

    /// [`auto_plan`](Self::auto_plan) drawing from the saved shortlist.
    /// Shortlisted dishes that were deleted since are skipped.
    pub fn auto_plan_from_shortlist(
        &mut self,
        month: &Month,
        options: DistributionOptions,
    ) -> Result<(MonthlyPlan, Distribution)> {
        let shortlist = self.shortlist.get()?;
        let mut candidates = Vec::with_capacity(shortlist.len());
        for id in shortlist.dish_ids() {
            if self.dishes.contains(id.as_str())? {
                candidates.push(id.clone());
            } else {
                warn!(dish = %id, "shortlisted dish no longer exists, skipping");
            }
        }
        if candidates.is_empty() {
            return Err(Error::validation("the shortlist has no dishes to plan with"));
        }
        self.auto_plan(month, Some(candidates.as_slice()), options)
    }

    fn store_plan(&mut self, plan: MonthlyPlan) -> Result<MonthlyPlan> {
        if self.plans.contains(plan.id().as_str())? {
            self.plans.update(plan)
        } else {
            self.plans.add(plan)
        }
    }

    // -------------------------------------------------------------------
    // Catalogue maintenance
    // -------------------------------------------------------------------

    /// Delete an ingredient. While dishes still use it the delete is refused
    /// unless `force` is set, in which case those dishes keep a dangling
    /// reference. Returns the ids of the dishes that use it.
    pub fn delete_ingredient(&mut self, id: &str, force: bool) -> Result<Vec<DishId>> {
        self.ingredients.get(id)?;
        let users: Vec<DishId> = self
            .dishes
            .find_by_ingredient(id)?
            .iter()
            .map(|d| d.id().clone())
            .collect();
        if !users.is_empty() && !force {
            return Err(Error::validation(format!(
                "ingredient {id:?} is used by {}",
                join_ids(&users)
            )));
        }
        self.ingredients.delete(id)?;
        Ok(users)
    }

    /// Put an existing dish on the shortlist. Returns `false` when it was
    /// already there.
    pub fn shortlist_dish(&mut self, dish_id: &str) -> Result<bool> {
        let dish = self.dishes.get(dish_id)?;
        self.shortlist.add(dish.id().clone())
    }

    /// Delete a dish. While a plan still schedules it the delete is refused
    /// unless `force` is set. The dish also leaves the shortlist. Returns the
    /// ids of the plans that use it.
    pub fn delete_dish(&mut self, id: &str, force: bool) -> Result<Vec<PlanId>> {
        self.dishes.get(id)?;
        let users: Vec<PlanId> = self
            .plans
            .filter(|p| p.uses_dish(id))?
            .iter()
            .map(|p| p.id().clone())
            .collect();
        if !users.is_empty() && !force {
            return Err(Error::validation(format!(
                "dish {id:?} is scheduled in {}",
                join_ids(&users)
            )));
        }
        self.dishes.delete(id)?;
        self.shortlist.remove(id)?;
        Ok(users)
    }

    /// Restore the built-in dishes to their original form.
    ///
    /// With `keep_user_additions` the user's own dishes stay; without it the
    /// catalogue holds only the defaults afterwards, and plans that scheduled
    /// a removed dish are left pointing at it. Shortlist entries for removed
    /// dishes are dropped. Returns the number of dishes in the catalogue.
    pub fn reset_catalogue(&mut self, keep_user_additions: bool) -> Result<usize> {
        let defaults = defaults::default_dishes()?;
        let replaced: Vec<DishId> = self
            .dishes
            .filter(|d| !keep_user_additions || is_default_dish(d.id().as_str()))?
            .iter()
            .map(|d| d.id().clone())
            .collect();
        for id in &replaced {
            self.dishes.delete(id.as_str())?;
        }
        for dish in defaults {
            self.dishes.add(dish)?;
        }

        for id in self.shortlist.get()?.dish_ids() {
            if !self.dishes.contains(id.as_str())? {
                self.shortlist.remove(id.as_str())?;
            }
        }

        let count = self.dishes.list_all()?.len();
        info!(user_id = %self.user_id, count, keep_user_additions, "reset catalogue to defaults");
        Ok(count)
    }

    // -------------------------------------------------------------------
    // Maintenance
    // -------------------------------------------------------------------

    /// Bring this user's stored data up to the current layout: split a
    /// legacy single-file data set, then rewrite old-format plans. Pending
    /// changes are dropped first so the stores re-read the result.
    pub fn migrate_legacy(&mut self) -> Result<MigrationReport> {
        self.discard();
        let report = migration::migrate_if_needed(self.blobs.as_ref(), &self.user_id)?;
        Ok(report)
    }
}

fn join_ids<T: std::fmt::Display>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
