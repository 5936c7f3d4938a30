//! CLI handlers for `larder context` subcommands.

use anyhow::Result;

use larder_core::Session;
use larder_core::model::UserContext;

use crate::{ContextCommands, surface};

pub fn run_context_command(command: ContextCommands, session: &mut Session) -> Result<()> {
    match command {
        ContextCommands::Add { content, category } => {
            let context = UserContext::new(&content, category.as_deref()).map_err(surface)?;
            let added = session
                .run(|s| s.contexts().add(context))
                .map_err(surface)?;
            println!("Context {} added.", added.id());
            Ok(())
        }
        ContextCommands::List { category } => {
            let contexts = match category {
                Some(c) => session.contexts().by_category(&c),
                None => session.contexts().list_all(),
            }
            .map_err(surface)?;
            if contexts.is_empty() {
                println!("No context notes. Use `larder context add` to record one.");
                return Ok(());
            }
            let id_w = contexts.iter().map(|c| c.id().as_str().len()).max().unwrap_or(2).max(2);
            println!("{:<id_w$}  NOTE", "ID");
            for context in &contexts {
                println!("{:<id_w$}  {context}", context.id());
            }
            Ok(())
        }
        ContextCommands::Delete { id } => {
            session
                .run(|s| s.contexts().delete(&id))
                .map_err(surface)?;
            println!("Context {id} deleted.");
            Ok(())
        }
    }
}
