//! CLI handlers for `larder ingredient` and `larder dish` subcommands.
//!
//! Implements:
//! - `larder ingredient add|list|show|delete`
//! - `larder dish add|list|show|delete`

use anyhow::Result;

use larder_core::model::{Dish, Ingredient, IngredientId};
use larder_core::{EntityKind, Error, Session};

use crate::{DishCommands, IngredientCommands, surface};

// -----------------------------------------------------------------------
// Public entry points
// -----------------------------------------------------------------------

pub fn run_ingredient_command(command: IngredientCommands, session: &mut Session) -> Result<()> {
    match command {
        IngredientCommands::Add {
            name,
            purchase,
            tags,
        } => {
            let ingredient = Ingredient::new(&name, purchase).map_err(surface)?.with_tags(tags);
            let added = session
                .run(|s| s.ingredients().add(ingredient))
                .map_err(surface)?;
            println!(
                "Ingredient {} added: {} ({})",
                added.id(),
                added.name(),
                added.purchase_type()
            );
            Ok(())
        }
        IngredientCommands::List { tag } => {
            let ingredients = match tag {
                Some(tag) => session.ingredients().find_by_tag(tag),
                None => session.ingredients().list_all(),
            }
            .map_err(surface)?;
            print_ingredients(&ingredients);
            Ok(())
        }
        IngredientCommands::Show { ingredient } => cmd_ingredient_show(session, &ingredient),
        IngredientCommands::Delete { id, force } => {
            let users = session
                .run(|s| s.delete_ingredient(&id, force))
                .map_err(surface)?;
            println!("Ingredient {id} deleted.");
            if !users.is_empty() {
                println!(
                    "Warning: {} dish(es) still list it: {}",
                    users.len(),
                    join(users.iter())
                );
            }
            Ok(())
        }
    }
}

pub fn run_dish_command(command: DishCommands, session: &mut Session) -> Result<()> {
    match command {
        DishCommands::Add {
            name,
            cuisine,
            categories,
            ingredients,
            tags,
            recipe,
        } => {
            let added = session
                .run(|s| {
                    let ids = ingredients
                        .iter()
                        .map(|key| find_ingredient(s, key).map(|i| i.id().clone()))
                        .collect::<larder_core::Result<Vec<IngredientId>>>()?;
                    let dish = Dish::new(&name, cuisine)?
                        .with_categories(categories)
                        .with_ingredients(ids)
                        .with_tags(tags)
                        .with_recipe_reference(recipe.as_deref().unwrap_or_default());
                    s.dishes().add(dish)
                })
                .map_err(surface)?;
            println!(
                "Dish {} added: {} ({}, {} ingredient(s))",
                added.id(),
                added.name(),
                added.cuisine(),
                added.ingredients().len()
            );
            Ok(())
        }
        DishCommands::List { cuisine, category } => {
            let dishes = session
                .dishes()
                .filter(|d| {
                    cuisine.is_none_or(|c| d.cuisine() == c)
                        && category.is_none_or(|c| d.categories().contains(&c))
                })
                .map_err(surface)?;
            print_dishes(&dishes);
            Ok(())
        }
        DishCommands::Show { dish } => cmd_dish_show(session, &dish),
        DishCommands::Delete { id, force } => {
            let plans = session.run(|s| s.delete_dish(&id, force)).map_err(surface)?;
            println!("Dish {id} deleted.");
            if !plans.is_empty() {
                println!(
                    "Warning: still scheduled in {}; those slots now show as missing.",
                    join(plans.iter())
                );
            }
            Ok(())
        }
    }
}

// -----------------------------------------------------------------------
// Lookup by ID or name
// -----------------------------------------------------------------------

pub(crate) fn find_ingredient(session: &mut Session, key: &str) -> larder_core::Result<Ingredient> {
    match session.ingredients().get(key) {
        Err(Error::NotFound { .. }) => session.ingredients().get_by_name(key),
        other => other,
    }
}

pub(crate) fn find_dish(session: &mut Session, key: &str) -> larder_core::Result<Dish> {
    match session.dishes().get(key) {
        Err(Error::NotFound { .. }) => session.dishes().get_by_name(key),
        other => other,
    }
}

// -----------------------------------------------------------------------
// larder ingredient show / larder dish show
// -----------------------------------------------------------------------

fn cmd_ingredient_show(session: &mut Session, key: &str) -> Result<()> {
    let ingredient = find_ingredient(session, key).map_err(surface)?;
    let users = session
        .dishes()
        .find_by_ingredient(ingredient.id().as_str())
        .map_err(surface)?;

    println!("Ingredient: {}", ingredient.name());
    println!("  ID:       {}", ingredient.id());
    println!("  Purchase: {}", ingredient.purchase_type());
    println!("  Tags:     {}", join_or_dash(ingredient.tags().iter()));
    println!();
    if users.is_empty() {
        println!("Not used by any dish.");
    } else {
        println!("Used by:");
        for dish in &users {
            println!("  {}  {}", dish.id(), dish.name());
        }
    }
    Ok(())
}

fn cmd_dish_show(session: &mut Session, key: &str) -> Result<()> {
    let dish = find_dish(session, key).map_err(surface)?;

    println!("Dish: {}", dish.name());
    println!("  ID:         {}", dish.id());
    println!("  Cuisine:    {} ({})", dish.cuisine(), dish.region());
    println!("  Categories: {}", join_or_dash(dish.categories().iter()));
    println!("  Tags:       {}", join_or_dash(dish.tags().iter()));
    if !dish.recipe_reference().is_empty() {
        println!("  Recipe:     {}", dish.recipe_reference());
    }
    println!();

    if dish.ingredients().is_empty() {
        println!("No ingredients listed.");
        return Ok(());
    }
    println!("Ingredients:");
    for id in dish.ingredients() {
        match session.ingredients().get(id.as_str()) {
            Ok(ingredient) => println!(
                "  {}  {} ({})",
                id,
                ingredient.name(),
                ingredient.purchase_type()
            ),
            Err(Error::NotFound {
                entity: EntityKind::Ingredient,
                ..
            }) => println!("  {id}  (missing)"),
            Err(e) => return Err(surface(e)),
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------
// Tables
// -----------------------------------------------------------------------

fn print_ingredients(ingredients: &[Ingredient]) {
    if ingredients.is_empty() {
        println!("No ingredients found. Use `larder ingredient add` to create one.");
        return;
    }

    let id_w = ingredients.iter().map(|i| i.id().as_str().len()).max().unwrap_or(2).max(2);
    let name_w = ingredients.iter().map(|i| i.name().len()).max().unwrap_or(4).max(4);
    let purchase_w = 8;

    println!("{:<id_w$}  {:<name_w$}  {:<purchase_w$}  TAGS", "ID", "NAME", "PURCHASE");
    for ingredient in ingredients {
        println!(
            "{:<id_w$}  {:<name_w$}  {:<purchase_w$}  {}",
            ingredient.id(),
            ingredient.name(),
            ingredient.purchase_type().as_str(),
            join_or_dash(ingredient.tags().iter()),
        );
    }
}

fn print_dishes(dishes: &[Dish]) {
    if dishes.is_empty() {
        println!("No dishes found. Use `larder dish add` to create one.");
        return;
    }

    let id_w = dishes.iter().map(|d| d.id().as_str().len()).max().unwrap_or(2).max(2);
    let name_w = dishes.iter().map(|d| d.name().len()).max().unwrap_or(4).max(4);
    let cuisine_w = dishes
        .iter()
        .map(|d| d.cuisine().as_str().len())
        .max()
        .unwrap_or(7)
        .max(7);

    println!(
        "{:<id_w$}  {:<name_w$}  {:<cuisine_w$}  CATEGORIES",
        "ID", "NAME", "CUISINE"
    );
    for dish in dishes {
        println!(
            "{:<id_w$}  {:<name_w$}  {:<cuisine_w$}  {}",
            dish.id(),
            dish.name(),
            dish.cuisine().as_str(),
            join_or_dash(dish.categories().iter()),
        );
    }
}

fn join<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
}

fn join_or_dash<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
    let joined = join(items);
    if joined.is_empty() { "-".to_owned() } else { joined }
}
