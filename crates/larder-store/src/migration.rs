//! Migration from the legacy single-file layout.
//!
//! Older data directories kept everything in one `meals.json` at the store
//! root:
//!
//! ```json
//! { "ingredient_bank": {..}, "dish_bank": {..}, "plans": {..}, "ai_context_bank": {..} }
//! ```
//!
//! The current layout keeps one blob per collection under a user prefix.
//! [`migrate_legacy_layout`] splits the old file into those blobs and moves
//! the original aside as `meals.json.backup`.
//!
//! Plans written by those versions also stored each week as separate
//! `weekday_dinners` / `weekend_meals` maps keyed by day label.
//! [`migrate_plan_format`] rewrites such plans as seven-slot lists, Monday
//! first, keeping the previous file as `plans.json.old`.
//!
//! [`migrate_if_needed`] runs both steps in order. Each step is idempotent.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::blob::BlobStore;
use crate::error::StorageError;

/// Key of the legacy monolithic file.
pub const LEGACY_KEY: &str = "meals.json";
/// Key the legacy file is moved to after a successful migration.
pub const LEGACY_BACKUP_KEY: &str = "meals.json.backup";

/// Suffix appended to a user's `plans.json` key for the pre-rewrite copy.
pub const PLAN_BACKUP_SUFFIX: &str = ".old";

/// Day labels in slot order.
const DAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Legacy section name -> collection file name in the per-user layout.
const SECTIONS: [(&str, &str); 4] = [
    ("ingredient_bank", "ingredients.json"),
    ("dish_bank", "dishes.json"),
    ("plans", "plans.json"),
    ("ai_context_bank", "contexts.json"),
];

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("legacy file {key:?} is not valid JSON: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("legacy file {key:?} must contain a JSON object at the top level")]
    NotAnObject { key: String },

    #[error("plan {plan:?} in {key:?} cannot be converted: {reason}")]
    Unconvertible {
        key: String,
        plan: String,
        reason: String,
    },
}

/// What a migration run did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MigrationReport {
    /// Keys written in the per-user layout.
    pub written: Vec<String>,
    /// Where the legacy file was moved, if a migration happened.
    pub backup: Option<String>,
    /// Plan ids rewritten from the split week layout.
    pub converted_plans: Vec<String>,
    /// Where the pre-rewrite `plans.json` was copied.
    pub plan_backup: Option<String>,
}

impl MigrationReport {
    pub fn migrated(&self) -> bool {
        self.backup.is_some() || self.plan_backup.is_some()
    }
}

/// Run every migration step for `user_id`.
pub fn migrate_if_needed(
    store: &dyn BlobStore,
    user_id: &str,
) -> Result<MigrationReport, MigrationError> {
    let mut report = migrate_legacy_layout(store, user_id)?;
    let plans = migrate_plan_format(store, user_id)?;
    report.converted_plans = plans.converted_plans;
    report.plan_backup = plans.plan_backup;
    Ok(report)
}

/// Whether the store still holds legacy data that has not been migrated for
/// `user_id`.
pub fn needs_migration(store: &dyn BlobStore, user_id: &str) -> Result<bool, StorageError> {
    let legacy = store.exists(LEGACY_KEY)?;
    let migrated = store.exists(&format!("{user_id}/dishes.json"))?;
    Ok(legacy && !migrated)
}

/// Split `meals.json` into per-collection blobs for `user_id`.
///
/// Does nothing when there is no legacy file or the user already has data in
/// the new layout. Missing sections become empty collections.
pub fn migrate_legacy_layout(
    store: &dyn BlobStore,
    user_id: &str,
) -> Result<MigrationReport, MigrationError> {
    if !needs_migration(store, user_id)? {
        debug!(user_id, "no legacy data to migrate");
        return Ok(MigrationReport::default());
    }

    let Some(bytes) = store.load(LEGACY_KEY)? else {
        return Ok(MigrationReport::default());
    };
    let legacy: Value = serde_json::from_slice(&bytes).map_err(|source| MigrationError::Malformed {
        key: LEGACY_KEY.to_owned(),
        source,
    })?;
    let Value::Object(mut sections) = legacy else {
        return Err(MigrationError::NotAnObject {
            key: LEGACY_KEY.to_owned(),
        });
    };

    let mut report = MigrationReport::default();
    for (section, file_name) in SECTIONS {
        let content = sections
            .remove(section)
            .unwrap_or_else(|| Value::Object(Map::new()));
        let key = format!("{user_id}/{file_name}");
        let encoded = serde_json::to_vec_pretty(&content).map_err(|source| {
            MigrationError::Malformed {
                key: key.clone(),
                source,
            }
        })?;
        store.save(&key, &encoded)?;
        report.written.push(key);
    }

    store.save(LEGACY_BACKUP_KEY, &bytes)?;
    store.delete(LEGACY_KEY)?;
    report.backup = Some(LEGACY_BACKUP_KEY.to_owned());

    info!(user_id, written = report.written.len(), "migrated legacy meals.json");
    Ok(report)
}

/// Rewrite `{user_id}/plans.json` so every week is a seven-slot list.
///
/// Does nothing when the file is missing or already uses the current layout.
/// Otherwise the original bytes are saved under `plans.json.old` before the
/// converted collection replaces them.
pub fn migrate_plan_format(
    store: &dyn BlobStore,
    user_id: &str,
) -> Result<MigrationReport, MigrationError> {
    let key = format!("{user_id}/plans.json");
    let Some(bytes) = store.load(&key)? else {
        return Ok(MigrationReport::default());
    };
    let value: Value = serde_json::from_slice(&bytes).map_err(|source| MigrationError::Malformed {
        key: key.clone(),
        source,
    })?;
    let Value::Object(mut plans) = value else {
        return Err(MigrationError::NotAnObject { key });
    };

    let mut converted = Vec::new();
    for (plan_id, plan) in plans.iter_mut() {
        if convert_plan(plan).map_err(|reason| MigrationError::Unconvertible {
            key: key.clone(),
            plan: plan_id.clone(),
            reason,
        })? {
            converted.push(plan_id.clone());
        }
    }
    if converted.is_empty() {
        debug!(%key, "plans already use the current layout");
        return Ok(MigrationReport::default());
    }

    let backup = format!("{key}{PLAN_BACKUP_SUFFIX}");
    store.save(&backup, &bytes)?;
    let encoded = serde_json::to_vec_pretty(&plans).map_err(|source| MigrationError::Malformed {
        key: key.clone(),
        source,
    })?;
    store.save(&key, &encoded)?;

    info!(%key, plans = converted.len(), %backup, "converted plans to the current layout");
    Ok(MigrationReport {
        converted_plans: converted,
        plan_backup: Some(backup),
        ..MigrationReport::default()
    })
}

/// Convert one stored plan in place. Returns whether anything changed.
fn convert_plan(plan: &mut Value) -> Result<bool, String> {
    let Value::Object(fields) = plan else {
        return Err("plan is not a JSON object".to_owned());
    };
    let Some(Value::Array(weeks)) = fields.get_mut("weeks") else {
        return Ok(false);
    };
    if !weeks.iter().any(Value::is_object) {
        return Ok(false);
    }
    for week in weeks.iter_mut() {
        let slots = match week {
            Value::Object(split) => split_week_to_slots(split)?,
            _ => continue,
        };
        *week = Value::Array(slots);
    }
    if !fields.contains_key("id") {
        if let Some(uid) = fields.remove("uid") {
            fields.insert("id".to_owned(), uid);
        }
    }
    Ok(true)
}

fn split_week_to_slots(split: &Map<String, Value>) -> Result<Vec<Value>, String> {
    let mut slots = vec![Value::Null; DAY_LABELS.len()];
    for section in ["weekday_dinners", "weekend_meals"] {
        let Some(days) = split.get(section) else {
            continue;
        };
        let Value::Object(days) = days else {
            return Err(format!("{section} is not a map of day to dish"));
        };
        for (label, dish) in days {
            let index = DAY_LABELS
                .iter()
                .position(|d| d.eq_ignore_ascii_case(label))
                .ok_or_else(|| format!("unknown day {label:?} in {section}"))?;
            slots[index] = dish.clone();
        }
    }
    Ok(slots)
}
