mod catalogue_cmds;
mod config;
mod context_cmds;
mod plan_cmds;
mod report_cmds;
mod shortlist_cmds;

use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use larder_core::Session;
use larder_core::model::{Category, Cuisine, Day, Month, PurchaseType};
use larder_store::StoreConfig;

#[derive(Parser)]
#[command(name = "larder", version, about = "Personal meal planner")]
struct Cli {
    /// Data directory (overrides LARDER_DATA_PATH and the config file)
    #[arg(long, global = true)]
    data_path: Option<PathBuf>,

    /// User whose collections to use (overrides LARDER_USER_ID and the config file)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a larder config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Ingredient catalogue
    Ingredient {
        #[command(subcommand)]
        command: IngredientCommands,
    },
    /// Dish catalogue
    Dish {
        #[command(subcommand)]
        command: DishCommands,
    },
    /// Monthly plans
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Shopping list for a week or a whole month
    Shop {
        /// Month as YYYY-MM (defaults to the current month)
        month: Option<Month>,
        /// Week 1-4 (omit for the whole month)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
        week: Option<u8>,
    },
    /// Variety report for a week or a whole month
    Variety {
        /// Month as YYYY-MM (defaults to the current month)
        month: Option<Month>,
        /// Week 1-4 (omit for the whole month)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
        week: Option<u8>,
    },
    /// Free-text notes about tastes and constraints
    Context {
        #[command(subcommand)]
        command: ContextCommands,
    },
    /// Dishes picked for automatic planning
    Shortlist {
        #[command(subcommand)]
        command: ShortlistCommands,
    },
    /// Restore the built-in starter dishes
    Seed {
        /// Remove your own dishes too, leaving only the starter set
        #[arg(long)]
        replace: bool,
    },
    /// Bring stored data up to the current layout
    Migrate,
    /// Print a shell completion script
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum IngredientCommands {
    /// Add an ingredient
    Add {
        /// Display name
        name: String,
        /// How it is bought: bulk or weekly
        #[arg(long)]
        purchase: PurchaseType,
        /// Category tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<Category>,
    },
    /// List ingredients
    List {
        /// Only ingredients with this tag
        #[arg(long)]
        tag: Option<Category>,
    },
    /// Show one ingredient and the dishes that use it
    Show {
        /// Ingredient ID or name
        ingredient: String,
    },
    /// Delete an ingredient
    Delete {
        /// Ingredient ID
        id: String,
        /// Delete even if dishes still use it
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum DishCommands {
    /// Add a dish
    Add {
        /// Display name
        name: String,
        /// Cuisine, e.g. chinese or italian
        #[arg(long)]
        cuisine: Cuisine,
        /// Category (repeatable)
        #[arg(long = "category")]
        categories: Vec<Category>,
        /// Ingredient ID or name (repeatable)
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
        /// Free-form tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Where the recipe lives (book page, URL)
        #[arg(long)]
        recipe: Option<String>,
    },
    /// List dishes
    List {
        /// Only dishes of this cuisine
        #[arg(long)]
        cuisine: Option<Cuisine>,
        /// Only dishes in this category
        #[arg(long)]
        category: Option<Category>,
    },
    /// Show one dish with its ingredients
    Show {
        /// Dish ID or name
        dish: String,
    },
    /// Delete a dish
    Delete {
        /// Dish ID
        id: String,
        /// Delete even if a plan still schedules it
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Show a month's plan as a week-by-day grid
    Show {
        /// Month as YYYY-MM (defaults to the current month)
        month: Option<Month>,
    },
    /// Put a dish on one day, creating the plan if needed
    Schedule {
        /// Month as YYYY-MM
        month: Month,
        /// Week 1-4
        #[arg(value_parser = clap::value_parser!(u8).range(1..=4))]
        week: u8,
        /// Day: mon, tue, wed, thu, fri, sat or sun
        day: Day,
        /// Dish ID or name
        dish: String,
    },
    /// Empty one day of an existing plan
    Clear {
        /// Month as YYYY-MM
        month: Month,
        /// Week 1-4
        #[arg(value_parser = clap::value_parser!(u8).range(1..=4))]
        week: u8,
        /// Day: mon, tue, wed, thu, fri, sat or sun
        day: Day,
    },
    /// Fill a month automatically, balancing regions and categories
    Auto {
        /// Month as YYYY-MM
        month: Month,
        /// Dish ID or name to choose from (repeatable; defaults to every dish)
        #[arg(long = "dish")]
        dishes: Vec<String>,
        /// Choose from the saved shortlist
        #[arg(long, conflicts_with = "dishes")]
        shortlist: bool,
        /// Dishes per week
        #[arg(long, default_value_t = 4)]
        per_week: usize,
        /// Eastern dishes per week
        #[arg(long, default_value_t = 2)]
        eastern: usize,
        /// Western dishes per week
        #[arg(long, default_value_t = 2)]
        western: usize,
    },
}

#[derive(Subcommand)]
pub enum ShortlistCommands {
    /// Put a dish on the shortlist
    Add {
        /// Dish ID or name
        dish: String,
    },
    /// Take a dish off the shortlist
    Remove {
        /// Dish ID or name
        dish: String,
    },
    /// List shortlisted dishes
    List,
    /// Empty the shortlist
    Clear,
}

#[derive(Subcommand)]
pub enum ContextCommands {
    /// Add a note
    Add {
        /// Note text
        content: String,
        /// Grouping such as dietary or equipment
        #[arg(long)]
        category: Option<String>,
    },
    /// List notes
    List {
        /// Only notes in this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a note
    Delete {
        /// Context ID
        id: String,
    },
}

// -----------------------------------------------------------------------
// Shared helpers
// -----------------------------------------------------------------------

/// Convert a domain error for display. Storage and decode faults get a
/// plain-language lead so the user is not left with a bare OS message.
pub(crate) fn surface(err: larder_core::Error) -> anyhow::Error {
    if err.is_storage() {
        anyhow::Error::new(err).context("could not load or save your data")
    } else {
        err.into()
    }
}

fn open_session(store: &StoreConfig) -> anyhow::Result<Session> {
    Session::from_config(store).map_err(surface)
}

// -----------------------------------------------------------------------
// larder init
// -----------------------------------------------------------------------

/// Write the resolved store location to the config file.
fn cmd_init(store: &StoreConfig, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        store: config::StoreSection {
            data_path: Some(store.data_path.clone()),
            user_id: Some(store.user_id.clone()),
        },
    };
    config::save_config(&cfg)?;
    std::fs::create_dir_all(&store.data_path).with_context(|| {
        format!("failed to create data directory {}", store.data_path.display())
    })?;

    println!("Config written to {}", path.display());
    println!("  store.data_path = {}", store.data_path.display());
    println!("  store.user_id   = {}", store.user_id);
    println!();
    println!(
        "Dishes will be kept in {}.",
        store.data_path.join(store.key("dishes.json")).display()
    );

    Ok(())
}

// -----------------------------------------------------------------------
// larder migrate
// -----------------------------------------------------------------------

fn cmd_migrate(session: &mut Session) -> anyhow::Result<()> {
    let report = session.migrate_legacy().map_err(surface)?;
    if !report.migrated() {
        println!("Nothing to migrate.");
        return Ok(());
    }
    for key in &report.written {
        println!("  wrote {key}");
    }
    if let Some(backup) = &report.backup {
        println!("Legacy file kept as {backup}.");
    }
    for plan in &report.converted_plans {
        println!("  converted {plan}");
    }
    if let Some(backup) = &report.plan_backup {
        println!("Previous plans kept as {backup}.");
    }
    Ok(())
}

// -----------------------------------------------------------------------
// larder seed
// -----------------------------------------------------------------------

fn cmd_seed(session: &mut Session, replace: bool) -> anyhow::Result<()> {
    let count = session
        .run(|s| s.reset_catalogue(!replace))
        .map_err(surface)?;
    println!("Catalogue has {count} dishes.");
    Ok(())
}

// -----------------------------------------------------------------------
// Entry point
// -----------------------------------------------------------------------

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "larder", &mut std::io::stdout());
        return Ok(());
    }

    let store = config::resolve(cli.data_path, cli.user)?;
    tracing::debug!(data_path = %store.data_path.display(), user_id = %store.user_id, "resolved store");

    match cli.command {
        Commands::Init { force } => cmd_init(&store, force),
        Commands::Ingredient { command } => {
            catalogue_cmds::run_ingredient_command(command, &mut open_session(&store)?)
        }
        Commands::Dish { command } => {
            catalogue_cmds::run_dish_command(command, &mut open_session(&store)?)
        }
        Commands::Plan { command } => {
            plan_cmds::run_plan_command(command, &mut open_session(&store)?)
        }
        Commands::Shop { month, week } => {
            let month = month.unwrap_or_else(Month::current);
            report_cmds::run_shop(&mut open_session(&store)?, &month, week)
        }
        Commands::Variety { month, week } => {
            let month = month.unwrap_or_else(Month::current);
            report_cmds::run_variety(&mut open_session(&store)?, &month, week)
        }
        Commands::Context { command } => {
            context_cmds::run_context_command(command, &mut open_session(&store)?)
        }
        Commands::Shortlist { command } => {
            shortlist_cmds::run_shortlist_command(command, &mut open_session(&store)?)
        }
        Commands::Seed { replace } => cmd_seed(&mut open_session(&store)?, replace),
        Commands::Migrate => cmd_migrate(&mut open_session(&store)?),
        Commands::Completions { .. } => Ok(()),
    }
}
