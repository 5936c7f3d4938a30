//! CLI handlers for `larder plan` subcommands.
//!
//! Implements:
//! - `larder plan show [month]`                      -- print the month as a grid
//! - `larder plan schedule <month> <week> <day> <dish>` -- fill one slot
//! - `larder plan clear <month> <week> <day>`        -- empty one slot
//! - `larder plan auto <month>`                      -- fill the month automatically
//! - `larder plan auto <month> --shortlist`          -- fill it from the saved shortlist

use std::collections::BTreeMap;

use anyhow::Result;

use larder_core::model::{Day, DishId, Month, MonthlyPlan};
use larder_core::ops::DistributionOptions;
use larder_core::{EntityKind, Error, Session};

use crate::catalogue_cmds::find_dish;
use crate::{PlanCommands, surface};

// -----------------------------------------------------------------------
// Public entry point
// -----------------------------------------------------------------------

/// Dispatch a `PlanCommands` variant to the appropriate handler.
pub fn run_plan_command(command: PlanCommands, session: &mut Session) -> Result<()> {
    match command {
        PlanCommands::Show { month } => {
            cmd_show(session, &month.unwrap_or_else(Month::current))
        }
        PlanCommands::Schedule {
            month,
            week,
            day,
            dish,
        } => {
            let (plan, name) = session
                .run(|s| {
                    let dish = find_dish(s, &dish)?;
                    let plan = s.schedule_dish(&month, week, day, dish.id().as_str())?;
                    Ok((plan, dish.name().to_owned()))
                })
                .map_err(surface)?;
            println!("{}: week {week} {day} is now {name}.", plan.month().label());
            Ok(())
        }
        PlanCommands::Clear { month, week, day } => {
            session
                .run(|s| s.clear_slot(&month, week, day))
                .map_err(surface)?;
            println!("{}: week {week} {day} cleared.", month.label());
            Ok(())
        }
        PlanCommands::Auto {
            month,
            dishes,
            shortlist,
            per_week,
            eastern,
            western,
        } => {
            let options = DistributionOptions {
                per_week,
                eastern_per_week: eastern,
                western_per_week: western,
                ..Default::default()
            };
            let source = if shortlist {
                Candidates::Shortlist
            } else {
                Candidates::Named(dishes)
            };
            cmd_auto(session, &month, &source, options)
        }
    }
}

// -----------------------------------------------------------------------
// larder plan show
// -----------------------------------------------------------------------

fn cmd_show(session: &mut Session, month: &Month) -> Result<()> {
    let plan = match session.plan_for(month) {
        Ok(plan) => plan,
        Err(Error::NotFound {
            entity: EntityKind::Plan,
            ..
        }) => {
            println!(
                "No plan for {}. Use `larder plan schedule` or `larder plan auto` to start one.",
                month.label()
            );
            return Ok(());
        }
        Err(e) => return Err(surface(e)),
    };
    let names = dish_names(session)?;
    print_grid(&plan, &names);
    Ok(())
}

fn dish_names(session: &mut Session) -> Result<BTreeMap<DishId, String>> {
    Ok(session
        .dishes()
        .list_all()
        .map_err(surface)?
        .into_iter()
        .map(|d| (d.id().clone(), d.name().to_owned()))
        .collect())
}

/// One row per day, one column per week. Unknown dish ids are shown
/// bracketed so a deleted dish is visible rather than silently blank.
fn print_grid(plan: &MonthlyPlan, names: &BTreeMap<DishId, String>) {
    let cell = |dish: Option<&DishId>| match dish {
        None => "-".to_owned(),
        Some(id) => names
            .get(id)
            .cloned()
            .unwrap_or_else(|| format!("[{id}]")),
    };

    let rows: Vec<(Day, Vec<String>)> = Day::ALL
        .iter()
        .map(|day| {
            let cells = plan.weeks().iter().map(|w| cell(w.dish_on(*day))).collect();
            (*day, cells)
        })
        .collect();
    let col_w = rows
        .iter()
        .flat_map(|(_, cells)| cells.iter().map(String::len))
        .max()
        .unwrap_or(6)
        .max(6);

    println!("Plan: {} ({})", plan.month().label(), plan.id());
    println!();
    print!("{:<4}", "");
    for week in 1..=plan.weeks().len() {
        print!("  {:<col_w$}", format!("WEEK {week}"));
    }
    println!();
    for (day, cells) in &rows {
        print!("{:<4}", day.as_str());
        for c in cells {
            print!("  {c:<col_w$}");
        }
        println!();
    }
}

// -----------------------------------------------------------------------
// larder plan auto
// -----------------------------------------------------------------------

/// Where `plan auto` draws its dishes from.
enum Candidates {
    /// Dish ids or names from the command line; empty means every dish.
    Named(Vec<String>),
    Shortlist,
}

fn cmd_auto(
    session: &mut Session,
    month: &Month,
    source: &Candidates,
    options: DistributionOptions,
) -> Result<()> {
    let (plan, distribution) = session
        .run(|s| match source {
            Candidates::Shortlist => s.auto_plan_from_shortlist(month, options),
            Candidates::Named(keys) if keys.is_empty() => s.auto_plan(month, None, options),
            Candidates::Named(keys) => {
                let ids = keys
                    .iter()
                    .map(|k| find_dish(s, k).map(|d| d.id().clone()))
                    .collect::<larder_core::Result<Vec<DishId>>>()?;
                s.auto_plan(month, Some(ids.as_slice()), options)
            }
        })
        .map_err(surface)?;

    let names = dish_names(session)?;
    print_grid(&plan, &names);

    if !distribution.reused.is_empty() {
        println!();
        println!(
            "Used in more than one week: {}",
            render_names(&distribution.reused, &names)
        );
    }
    if !distribution.discarded.is_empty() {
        println!();
        println!(
            "Not placed: {}",
            render_names(&distribution.discarded, &names)
        );
    }
    Ok(())
}

fn render_names(ids: &[DishId], names: &BTreeMap<DishId, String>) -> String {
    ids.iter()
        .map(|id| names.get(id).cloned().unwrap_or_else(|| id.to_string()))
        .collect::<Vec<_>>()
        .join(", ")
}
