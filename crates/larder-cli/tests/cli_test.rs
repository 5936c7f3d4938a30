//! Integration tests for the `larder` binary.
//!
//! Each test runs the real executable against its own temporary data
//! directory and config home, so nothing leaks between tests or into the
//! developer's environment.

use std::path::Path;
use std::process::{Command, Output};

use larder_core::model::Day;
use larder_test_utils::{TempStore, january, seed_fried_rice};
use tempfile::TempDir;

// -----------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------

struct Env {
    store: TempStore,
    config_home: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            store: TempStore::new(),
            config_home: TempDir::new().expect("failed to create config dir"),
        }
    }

    fn larder(&self, args: &[&str]) -> Output {
        larder_in(self.store.path(), self.config_home.path(), args)
    }

    fn ok(&self, args: &[&str]) -> String {
        let out = self.larder(args);
        assert!(
            out.status.success(),
            "larder {args:?} failed: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        String::from_utf8_lossy(&out.stdout).into_owned()
    }

    fn fails(&self, args: &[&str]) -> String {
        let out = self.larder(args);
        assert!(!out.status.success(), "larder {args:?} unexpectedly succeeded");
        String::from_utf8_lossy(&out.stderr).into_owned()
    }
}

fn larder_in(data: &Path, config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_larder"))
        .arg("--data-path")
        .arg(data)
        .args(["--user", "alice"])
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("LARDER_DATA_PATH")
        .env_remove("LARDER_USER_ID")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run larder")
}

// ===========================================================================
// Catalogue and planning
// ===========================================================================

#[test]
fn build_a_week_and_shop_for_it() {
    let env = Env::new();
    env.ok(&["ingredient", "add", "Rice", "--purchase", "bulk", "--tag", "grains"]);
    env.ok(&["ingredient", "add", "Spinach", "--purchase", "weekly", "--tag", "greens"]);
    env.ok(&[
        "dish", "add", "fried rice", "--cuisine", "chinese", "--category", "grains",
        "--ingredient", "rice", "--ingredient", "Spinach",
    ]);

    let scheduled = env.ok(&["plan", "schedule", "2025-01", "1", "mon", "Fried Rice"]);
    assert!(scheduled.contains("January 2025"), "{scheduled}");

    let list = env.ok(&["shop", "2025-01", "--week", "1"]);
    let bulk = list.find("Rice").expect("rice listed");
    let weekly_header = list.find("Weekly").expect("weekly bucket");
    let spinach = list.find("Spinach").expect("spinach listed");
    assert!(bulk < weekly_header && weekly_header < spinach, "{list}");
}

#[test]
fn dish_with_unknown_ingredient_is_refused() {
    let env = Env::new();
    let err = env.fails(&["dish", "add", "Soup", "--cuisine", "french", "--ingredient", "Leek"]);
    assert!(err.contains("not found"), "{err}");

    let listed = env.ok(&["dish", "list"]);
    assert!(listed.contains("No dishes found"), "{listed}");
}

#[test]
fn plan_show_prints_a_grid() {
    let env = Env::new();
    let mut session = env.store.session("alice");
    seed_fried_rice(&mut session);
    session
        .run(|s| s.schedule_dish(&january(), 2, Day::Sat, "DISH-1"))
        .unwrap();

    let grid = env.ok(&["plan", "show", "2025-01"]);

    assert!(grid.contains("WEEK 4"), "{grid}");
    let sat = grid.lines().find(|l| l.starts_with("Sat")).expect("saturday row");
    assert!(sat.contains("Fried Rice"), "{grid}");
}

#[test]
fn plan_show_without_a_plan_is_not_an_error() {
    let env = Env::new();
    let out = env.ok(&["plan", "show", "2025-01"]);
    assert!(out.contains("No plan for January 2025"), "{out}");
}

#[test]
fn unknown_dish_cannot_be_scheduled() {
    let env = Env::new();
    let err = env.fails(&["plan", "schedule", "2025-01", "1", "mon", "DISH-404"]);
    assert!(err.contains("DISH-404"), "{err}");
}

// ===========================================================================
// Reports
// ===========================================================================

#[test]
fn shopping_list_names_missing_ingredients() {
    let env = Env::new();
    let mut session = env.store.session("alice");
    seed_fried_rice(&mut session);
    session
        .run(|s| s.schedule_dish(&january(), 1, Day::Mon, "DISH-1"))
        .unwrap();

    let refused = env.fails(&["ingredient", "delete", "ING-2"]);
    assert!(refused.contains("DISH-1"), "{refused}");

    env.ok(&["ingredient", "delete", "ING-2", "--force"]);
    let err = env.fails(&["shop", "2025-01", "--week", "1"]);
    assert!(err.contains("ING-2"), "{err}");
}

#[test]
fn shopping_without_a_plan_fails() {
    let env = Env::new();
    let err = env.fails(&["shop", "2025-01"]);
    assert!(err.contains("not found"), "{err}");
}

#[test]
fn variety_report_counts_repeats() {
    let env = Env::new();
    let mut session = env.store.session("alice");
    seed_fried_rice(&mut session);
    session
        .run(|s| {
            s.schedule_dish(&january(), 1, Day::Mon, "DISH-1")?;
            s.schedule_dish(&january(), 1, Day::Wed, "DISH-1")?;
            s.schedule_dish(&january(), 1, Day::Fri, "DISH-1")
        })
        .unwrap();

    let report = env.ok(&["variety", "2025-01", "--week", "1"]);

    assert!(report.contains("3 scheduled, 1 unique"), "{report}");
    assert!(report.contains("DISH-1  x3"), "{report}");
    assert!(report.contains("Suggestions:"), "{report}");
}

#[test]
fn variety_report_fails_on_a_deleted_dish() {
    let env = Env::new();
    let mut session = env.store.session("alice");
    seed_fried_rice(&mut session);
    session
        .run(|s| s.schedule_dish(&january(), 2, Day::Tue, "DISH-1"))
        .unwrap();

    env.ok(&["dish", "delete", "DISH-1", "--force"]);
    let err = env.fails(&["variety", "2025-01"]);

    assert!(err.contains("no longer exist"), "{err}");
    assert!(err.contains("DISH-1"), "{err}");
}

// ===========================================================================
// Starter catalogue and shortlist
// ===========================================================================

#[test]
fn seed_adds_the_starter_dishes() {
    let env = Env::new();
    env.ok(&["dish", "add", "Toast", "--cuisine", "american"]);

    let out = env.ok(&["seed"]);
    assert!(out.contains("Catalogue has 41 dishes."), "{out}");
    let dishes = env.ok(&["dish", "list"]);
    assert!(dishes.contains("Mapo Tofu"), "{dishes}");
    assert!(dishes.contains("Toast"), "{dishes}");

    let out = env.ok(&["seed", "--replace"]);
    assert!(out.contains("Catalogue has 40 dishes."), "{out}");
    assert!(!env.ok(&["dish", "list"]).contains("Toast"));
}

#[test]
fn auto_plan_from_the_shortlist() {
    let env = Env::new();
    env.ok(&["seed"]);
    env.ok(&["shortlist", "add", "Mapo Tofu"]);
    env.ok(&["shortlist", "add", "DEFAULT-ita-margherita-pizza"]);
    let again = env.ok(&["shortlist", "add", "mapo tofu"]);
    assert!(again.contains("already"), "{again}");

    let listed = env.ok(&["shortlist", "list"]);
    assert!(listed.contains("Mapo Tofu"), "{listed}");

    let grid = env.ok(&[
        "plan", "auto", "2025-01", "--shortlist", "--per-week", "2", "--eastern", "1",
        "--western", "1",
    ]);
    assert!(grid.contains("Mapo Tofu"), "{grid}");
    assert!(!grid.contains("Bibimbap"), "{grid}");

    env.ok(&["shortlist", "clear"]);
    let err = env.fails(&["plan", "auto", "2025-02", "--shortlist"]);
    assert!(err.contains("shortlist"), "{err}");
}

// ===========================================================================
// Context notes
// ===========================================================================

#[test]
fn context_notes_round_trip() {
    let env = Env::new();
    env.ok(&["context", "add", "No coriander", "--category", "Dislikes"]);
    env.ok(&["context", "add", "Owns a wok"]);

    let all = env.ok(&["context", "list"]);
    assert!(all.contains("[dislikes] No coriander"), "{all}");
    assert!(all.contains("Owns a wok"), "{all}");

    let filtered = env.ok(&["context", "list", "--category", "dislikes"]);
    assert!(!filtered.contains("wok"), "{filtered}");
}

// ===========================================================================
// Setup and tooling
// ===========================================================================

#[test]
fn init_refuses_to_overwrite_without_force() {
    let env = Env::new();
    let out = env.ok(&["init"]);
    assert!(out.contains("store.user_id   = alice"), "{out}");

    let written = env.config_home.path().join("larder").join("config.toml");
    let contents = std::fs::read_to_string(&written).unwrap();
    assert!(contents.contains("[store]"), "{contents}");

    let err = env.fails(&["init"]);
    assert!(err.contains("--force"), "{err}");
    env.ok(&["init", "--force"]);
}

#[test]
fn config_file_supplies_the_user() {
    let env = Env::new();
    env.ok(&["init"]);
    env.ok(&["ingredient", "add", "Rice", "--purchase", "bulk"]);

    // No --user or --data-path: both come from the config file.
    let out = Command::new(env!("CARGO_BIN_EXE_larder"))
        .args(["ingredient", "list"])
        .env("XDG_CONFIG_HOME", env.config_home.path())
        .env_remove("LARDER_DATA_PATH")
        .env_remove("LARDER_USER_ID")
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Rice"));
}

#[test]
fn migrate_with_nothing_to_do() {
    let env = Env::new();
    let out = env.ok(&["migrate"]);
    assert!(out.contains("Nothing to migrate"), "{out}");
}

#[test]
fn migrate_rewrites_old_plan_layout() {
    let env = Env::new();
    let mut session = env.store.session("alice");
    seed_fried_rice(&mut session);
    let old = br#"{"PLAN-2025-01": {"uid": "PLAN-2025-01", "month": "2025-01", "weeks": [
        {"weekday_dinners": {"Mon": "DISH-1"}, "weekend_meals": {}}, {}, {}, {}
    ]}}"#;
    env.store.blobs().save("alice/plans.json", old).unwrap();

    let out = env.ok(&["migrate"]);
    assert!(out.contains("converted PLAN-2025-01"), "{out}");
    assert!(out.contains("alice/plans.json.old"), "{out}");

    let grid = env.ok(&["plan", "show", "2025-01"]);
    assert!(grid.contains("Fried Rice"), "{grid}");
    assert!(env.ok(&["migrate"]).contains("Nothing to migrate"));
}

#[test]
fn completions_are_generated() {
    let env = Env::new();
    let script = env.ok(&["completions", "bash"]);
    assert!(script.contains("larder"));
}
