//! CLI handlers for `larder shop` and `larder variety`.

use anyhow::Result;

use larder_core::model::{Ingredient, Month, Region, Scope};
use larder_core::ops::VarietyReport;
use larder_core::{Error, Session};

use crate::surface;

// -----------------------------------------------------------------------
// larder shop
// -----------------------------------------------------------------------

pub fn run_shop(session: &mut Session, month: &Month, week: Option<u8>) -> Result<()> {
    let scope = Scope::from_week(week);
    let list = session.shopping_list(month, scope).map_err(explain_missing)?;

    println!("Shopping list: {}, {scope}", month.label());
    if list.is_empty() {
        println!();
        println!("Nothing to buy. No dishes are scheduled in this range.");
        return Ok(());
    }
    print_bucket("Bulk (check the pantry)", list.bulk());
    print_bucket("Weekly (fresh)", list.weekly());
    Ok(())
}

/// List dangling references on stderr before surfacing the error.
fn explain_missing(err: Error) -> anyhow::Error {
    if let Error::MissingReference(missing) = &err {
        eprintln!("The plan refers to things that no longer exist:");
        for r in missing.references() {
            eprintln!("  {r}");
        }
    }
    surface(err)
}

fn print_bucket(title: &str, items: &[Ingredient]) {
    println!();
    println!("{title}:");
    if items.is_empty() {
        println!("  (none)");
    }
    for item in items {
        println!("  [ ] {}", item.name());
    }
}

// -----------------------------------------------------------------------
// larder variety
// -----------------------------------------------------------------------

pub fn run_variety(session: &mut Session, month: &Month, week: Option<u8>) -> Result<()> {
    let report = session
        .variety_report(month, week)
        .map_err(explain_missing)?;
    print_report(month, &report);
    Ok(())
}

fn print_report(month: &Month, report: &VarietyReport) {
    println!("Variety: {}, {}", month.label(), report.scope());
    println!();

    let categories = report.category_coverage();
    let cuisines = report.cuisine_coverage();
    println!("  Score:       {}/100", report.variety_score());
    println!(
        "  Dishes:      {} scheduled, {} unique",
        report.total_scheduled(),
        report.unique_dishes()
    );
    println!(
        "  Categories:  {}/{} ({:.0}%)",
        categories.hit,
        categories.total,
        categories.ratio() * 100.0
    );
    println!(
        "  Cuisines:    {}/{} ({:.0}%)",
        cuisines.hit,
        cuisines.total,
        cuisines.ratio() * 100.0
    );
    println!(
        "  Regions:     {} eastern, {} western",
        report.region_count(Region::Eastern),
        report.region_count(Region::Western)
    );

    if !report.category_counts().is_empty() {
        println!();
        let label_w = report
            .category_counts()
            .keys()
            .map(|c| c.as_str().len())
            .max()
            .unwrap_or(8)
            .max(8);
        println!("{:<label_w$}  {:>5}", "CATEGORY", "COUNT");
        for (category, count) in report.category_counts() {
            println!("{:<label_w$}  {count:>5}", category.as_str());
        }
    }

    let repeats = report.repeats();
    if !repeats.is_empty() {
        println!();
        println!("Repeated dishes:");
        for (id, count) in repeats {
            println!("  {id}  x{count}");
        }
    }

    let suggestions = report.suggestions();
    if !suggestions.is_empty() {
        println!();
        println!("Suggestions:");
        for s in suggestions {
            println!("  - {s}");
        }
    }
}
