//! CLI handlers for `larder shortlist` subcommands.

use anyhow::Result;

use larder_core::Session;

use crate::catalogue_cmds::find_dish;
use crate::{ShortlistCommands, surface};

pub fn run_shortlist_command(command: ShortlistCommands, session: &mut Session) -> Result<()> {
    match command {
        ShortlistCommands::Add { dish } => {
            let (added, name) = session
                .run(|s| {
                    let dish = find_dish(s, &dish)?;
                    let added = s.shortlist_dish(dish.id().as_str())?;
                    Ok((added, dish.name().to_owned()))
                })
                .map_err(surface)?;
            if added {
                println!("{name} added to the shortlist.");
            } else {
                println!("{name} is already on the shortlist.");
            }
            Ok(())
        }
        ShortlistCommands::Remove { dish } => {
            // Fall back to the raw id so entries for deleted dishes can go.
            let removed = session
                .run(|s| {
                    let id = match find_dish(s, &dish) {
                        Ok(found) => found.id().to_string(),
                        Err(_) => dish.clone(),
                    };
                    s.shortlist().remove(&id)
                })
                .map_err(surface)?;
            if !removed {
                anyhow::bail!("{dish} is not on the shortlist");
            }
            println!("{dish} removed from the shortlist.");
            Ok(())
        }
        ShortlistCommands::List => cmd_list(session),
        ShortlistCommands::Clear => {
            let cleared = session
                .run(|s| s.shortlist().clear())
                .map_err(surface)?;
            println!("Shortlist cleared ({cleared} removed).");
            Ok(())
        }
    }
}

fn cmd_list(session: &mut Session) -> Result<()> {
    let shortlist = session.shortlist().get().map_err(surface)?;
    if shortlist.is_empty() {
        println!("The shortlist is empty. Use `larder shortlist add` to pick dishes.");
        return Ok(());
    }

    let mut rows = Vec::with_capacity(shortlist.len());
    for id in shortlist.dish_ids() {
        let row = if session.dishes().contains(id.as_str()).map_err(surface)? {
            let dish = session.dishes().get(id.as_str()).map_err(surface)?;
            (id.to_string(), dish.name().to_owned(), dish.cuisine().to_string())
        } else {
            (id.to_string(), "[deleted]".to_owned(), "-".to_owned())
        };
        rows.push(row);
    }

    let id_w = rows.iter().map(|r| r.0.len()).max().unwrap_or(2).max(2);
    let name_w = rows.iter().map(|r| r.1.len()).max().unwrap_or(4).max(4);
    println!("{:<id_w$}  {:<name_w$}  CUISINE", "ID", "NAME");
    for (id, name, cuisine) in &rows {
        println!("{id:<id_w$}  {name:<name_w$}  {cuisine}");
    }
    Ok(())
}
