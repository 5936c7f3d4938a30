use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ids::{DishId, IngredientId};
use super::labels::{Category, Cuisine, PurchaseType, Region};
use super::{normalize_name, title_case};
use crate::error::Result;

/// Something that can be bought. Its [`PurchaseType`] decides which
/// shopping-list bucket it lands in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(alias = "uid")]
    id: IngredientId,
    name: String,
    #[serde(default)]
    tags: BTreeSet<Category>,
    purchase_type: PurchaseType,
}

impl Ingredient {
    /// New ingredient with a generated id.
    pub fn new(name: &str, purchase_type: PurchaseType) -> Result<Self> {
        Self::from_parts(IngredientId::generate(), name, purchase_type)
    }

    /// New ingredient with a caller-chosen id.
    pub fn from_parts(
        id: impl Into<IngredientId>,
        name: &str,
        purchase_type: PurchaseType,
    ) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            name: normalize_name("ingredient", name)?,
            tags: BTreeSet::new(),
            purchase_type,
        })
    }

    pub fn id(&self) -> &IngredientId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &BTreeSet<Category> {
        &self.tags
    }

    pub fn purchase_type(&self) -> PurchaseType {
        self.purchase_type
    }

    pub fn has_tag(&self, tag: Category) -> bool {
        self.tags.contains(&tag)
    }

    pub fn with_name(&self, name: &str) -> Result<Self> {
        Ok(Self {
            name: normalize_name("ingredient", name)?,
            ..self.clone()
        })
    }

    pub fn with_tags(&self, tags: impl IntoIterator<Item = Category>) -> Self {
        Self {
            tags: tags.into_iter().collect(),
            ..self.clone()
        }
    }

    pub fn with_purchase_type(&self, purchase_type: PurchaseType) -> Self {
        Self {
            purchase_type,
            ..self.clone()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        normalize_name("ingredient", &self.name).map(|_| ())
    }
}

/// A dish that can be scheduled into a plan.
///
/// Ingredient references are ids only. A reference that no longer resolves is
/// not an error here; it is reported when a shopping list is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    #[serde(alias = "uid")]
    id: DishId,
    name: String,
    cuisine: Cuisine,
    #[serde(default)]
    categories: BTreeSet<Category>,
    #[serde(default, alias = "ingredient_uids")]
    ingredients: BTreeSet<IngredientId>,
    #[serde(default)]
    tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    recipe_reference: String,
}

impl Dish {
    /// New dish with a generated id. The name is title-cased.
    pub fn new(name: &str, cuisine: Cuisine) -> Result<Self> {
        Self::from_parts(DishId::generate(), name, cuisine)
    }

    /// New dish with a caller-chosen id.
    pub fn from_parts(id: impl Into<DishId>, name: &str, cuisine: Cuisine) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            name: title_case(&normalize_name("dish", name)?),
            cuisine,
            categories: BTreeSet::new(),
            ingredients: BTreeSet::new(),
            tags: BTreeSet::new(),
            recipe_reference: String::new(),
        })
    }

    pub fn id(&self) -> &DishId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cuisine(&self) -> Cuisine {
        self.cuisine
    }

    pub fn region(&self) -> Region {
        self.cuisine.region()
    }

    pub fn categories(&self) -> &BTreeSet<Category> {
        &self.categories
    }

    pub fn ingredients(&self) -> &BTreeSet<IngredientId> {
        &self.ingredients
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn recipe_reference(&self) -> &str {
        &self.recipe_reference
    }

    pub fn uses_ingredient(&self, id: &str) -> bool {
        self.ingredients.contains(id)
    }

    pub fn with_name(&self, name: &str) -> Result<Self> {
        Ok(Self {
            name: title_case(&normalize_name("dish", name)?),
            ..self.clone()
        })
    }

    pub fn with_cuisine(&self, cuisine: Cuisine) -> Self {
        Self {
            cuisine,
            ..self.clone()
        }
    }

    pub fn with_categories(&self, categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            categories: categories.into_iter().collect(),
            ..self.clone()
        }
    }

    pub fn with_category(&self, category: Category) -> Self {
        let mut categories = self.categories.clone();
        categories.insert(category);
        Self {
            categories,
            ..self.clone()
        }
    }

    pub fn without_category(&self, category: Category) -> Self {
        let mut categories = self.categories.clone();
        categories.remove(&category);
        Self {
            categories,
            ..self.clone()
        }
    }

    pub fn with_ingredients<I>(&self, ingredients: impl IntoIterator<Item = I>) -> Self
    where
        I: Into<IngredientId>,
    {
        Self {
            ingredients: ingredients.into_iter().map(Into::into).collect(),
            ..self.clone()
        }
    }

    pub fn with_ingredient(&self, id: impl Into<IngredientId>) -> Self {
        let mut ingredients = self.ingredients.clone();
        ingredients.insert(id.into());
        Self {
            ingredients,
            ..self.clone()
        }
    }

    pub fn without_ingredient(&self, id: &str) -> Self {
        let mut ingredients = self.ingredients.clone();
        ingredients.remove(id);
        Self {
            ingredients,
            ..self.clone()
        }
    }

    /// Replace the free-form tags. Tags are title-cased; blank ones dropped.
    pub fn with_tags<S: AsRef<str>>(&self, tags: impl IntoIterator<Item = S>) -> Self {
        Self {
            tags: tags
                .into_iter()
                .map(|t| title_case(t.as_ref()))
                .filter(|t| !t.is_empty())
                .collect(),
            ..self.clone()
        }
    }

    pub fn with_recipe_reference(&self, reference: &str) -> Self {
        Self {
            recipe_reference: reference.trim().to_owned(),
            ..self.clone()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        normalize_name("dish", &self.name).map(|_| ())
    }
}
