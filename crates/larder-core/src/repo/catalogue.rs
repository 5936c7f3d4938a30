use crate::error::{EntityKind, Error, Result};
use crate::model::{Category, Dish, Ingredient};

use super::EntityStore;

impl EntityStore<Ingredient> {
    /// Case-insensitive lookup by name.
    pub fn get_by_name(&mut self, name: &str) -> Result<Ingredient> {
        let wanted = name.trim();
        self.filter(|i| i.name().eq_ignore_ascii_case(wanted))?
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(EntityKind::Ingredient, wanted))
    }

    pub fn find_by_tag(&mut self, tag: Category) -> Result<Vec<Ingredient>> {
        self.filter(|i| i.has_tag(tag))
    }
}

impl EntityStore<Dish> {
    /// Case-insensitive lookup by name.
    pub fn get_by_name(&mut self, name: &str) -> Result<Dish> {
        let wanted = name.trim();
        self.filter(|d| d.name().eq_ignore_ascii_case(wanted))?
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(EntityKind::Dish, wanted))
    }

    pub fn find_by_tag(&mut self, tag: Category) -> Result<Vec<Dish>> {
        self.filter(|d| d.categories().contains(&tag))
    }

    /// Dishes whose ingredient list names `ingredient`.
    pub fn find_by_ingredient(&mut self, ingredient: &str) -> Result<Vec<Dish>> {
        self.filter(|d| d.uses_ingredient(ingredient))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use larder_store::MemoryBlobStore;

    use super::*;
    use crate::model::{Cuisine, PurchaseType};
    use crate::repo::{DishStore, IngredientStore};

    #[test]
    fn ingredient_queries() {
        let mut store = IngredientStore::for_user(Arc::new(MemoryBlobStore::new()), "u");
        store
            .add(
                Ingredient::from_parts("ING-1", "Spinach", PurchaseType::Weekly)
                    .unwrap()
                    .with_tags([Category::Greens]),
            )
            .unwrap();
        store
            .add(Ingredient::from_parts("ING-2", "Rice", PurchaseType::Bulk).unwrap())
            .unwrap();

        assert_eq!(store.get_by_name(" SPINACH ").unwrap().id().as_str(), "ING-1");
        assert!(matches!(store.get_by_name("kale"), Err(Error::NotFound { .. })));
        let greens = store.find_by_tag(Category::Greens).unwrap();
        assert_eq!(greens.len(), 1);
        assert_eq!(greens[0].name(), "Spinach");
    }

    #[test]
    fn dish_queries() {
        let mut store = DishStore::for_user(Arc::new(MemoryBlobStore::new()), "u");
        store
            .add(
                Dish::from_parts("DISH-1", "fried rice", Cuisine::Chinese)
                    .unwrap()
                    .with_ingredients(["ING-1", "ING-2"])
                    .with_category(Category::Grains),
            )
            .unwrap();
        store
            .add(
                Dish::from_parts("DISH-2", "Saag", Cuisine::Indian)
                    .unwrap()
                    .with_ingredient("ING-1"),
            )
            .unwrap();

        assert_eq!(store.get_by_name("Fried Rice").unwrap().id().as_str(), "DISH-1");
        assert_eq!(store.find_by_ingredient("ING-1").unwrap().len(), 2);
        assert_eq!(store.find_by_ingredient("ING-2").unwrap().len(), 1);
        assert_eq!(store.find_by_tag(Category::Grains).unwrap().len(), 1);
        assert!(store.find_by_tag(Category::Dairy).unwrap().is_empty());
    }
}
