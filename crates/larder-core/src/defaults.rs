//! Built-in starter catalogue of vegetarian dishes.
//!
//! Every default dish has a fixed `DEFAULT-<cuisine>-<slug>` id, so seeding
//! twice, or resetting after edits, lands on the same records. Dishes the
//! user created never carry that prefix.

use crate::error::Result;
use crate::model::Category::{
    self, Alliums, Cruciferous, Dairy, Fermented, FreshHerbs, Grains, Greens, Legumes, RootVeg,
    Seeds,
};
use crate::model::{Cuisine, Dish};

/// Prefix shared by every built-in dish id.
pub const DEFAULT_ID_PREFIX: &str = "DEFAULT-";

/// Bumped whenever the table below changes.
pub const DEFAULTS_VERSION: &str = "v1";

struct Seed {
    id: &'static str,
    name: &'static str,
    cuisine: Cuisine,
    categories: &'static [Category],
    recipe: &'static str,
}

const fn seed(
    id: &'static str,
    name: &'static str,
    cuisine: Cuisine,
    categories: &'static [Category],
    recipe: &'static str,
) -> Seed {
    Seed {
        id,
        name,
        cuisine,
        categories,
        recipe,
    }
}

#[rustfmt::skip]
const SEEDS: &[Seed] = &[
    // Chinese
    seed("DEFAULT-chi-mapo-tofu", "Mapo Tofu", Cuisine::Chinese, &[Legumes, Fermented, Alliums],
         "Silken tofu, doubanjiang, Sichuan peppercorns, scallions"),
    seed("DEFAULT-chi-vegetable-chow-mein", "Vegetable Chow Mein", Cuisine::Chinese, &[Grains, Greens, Alliums],
         "Egg noodles, bok choy, cabbage, carrots, soy sauce"),
    seed("DEFAULT-chi-kung-pao-tofu", "Kung Pao Tofu", Cuisine::Chinese, &[Legumes, Alliums, Seeds],
         "Firm tofu, peanuts, dried chilies, Sichuan peppercorns"),
    seed("DEFAULT-chi-vegetable-fried-rice", "Vegetable Fried Rice", Cuisine::Chinese, &[Grains, Greens, Alliums],
         "Jasmine rice, eggs, peas, carrots, scallions"),
    seed("DEFAULT-chi-hot-and-sour-soup", "Hot And Sour Soup", Cuisine::Chinese, &[Legumes, Fermented, Greens],
         "Tofu, wood ear mushrooms, bamboo shoots, rice vinegar"),
    // Japanese
    seed("DEFAULT-jap-miso-soup", "Miso Soup", Cuisine::Japanese, &[Fermented, Legumes, Greens],
         "White miso paste, silken tofu, wakame, scallions"),
    seed("DEFAULT-jap-vegetable-tempura", "Vegetable Tempura", Cuisine::Japanese, &[RootVeg, Greens, Grains],
         "Sweet potato, kabocha, shiso leaves, tempura batter"),
    seed("DEFAULT-jap-edamame-buddha-bowl", "Edamame Buddha Bowl", Cuisine::Japanese, &[Grains, Legumes, Greens, Seeds],
         "Brown rice, edamame, avocado, pickled ginger, sesame"),
    seed("DEFAULT-jap-agedashi-tofu", "Agedashi Tofu", Cuisine::Japanese, &[Legumes, Grains, Alliums],
         "Silken tofu, dashi broth, grated daikon, scallions"),
    seed("DEFAULT-jap-japanese-curry", "Japanese Curry", Cuisine::Japanese, &[RootVeg, Grains, Alliums],
         "Potato, carrots, onions, curry roux, rice"),
    // Korean
    seed("DEFAULT-kor-kimchi-fried-rice", "Kimchi Fried Rice", Cuisine::Korean, &[Grains, Fermented, Alliums],
         "Short-grain rice, aged kimchi, gochujang, sesame oil"),
    seed("DEFAULT-kor-bibimbap", "Bibimbap", Cuisine::Korean, &[Grains, Greens, Fermented, Seeds],
         "Rice, spinach, bean sprouts, gochujang, fried egg"),
    seed("DEFAULT-kor-japchae", "Japchae", Cuisine::Korean, &[Grains, Greens, Alliums, Seeds],
         "Sweet potato noodles, spinach, carrots, sesame"),
    seed("DEFAULT-kor-sundubu-jjigae", "Sundubu Jjigae", Cuisine::Korean, &[Legumes, Fermented, Alliums],
         "Soft tofu, gochugaru, kimchi, scallions, egg"),
    seed("DEFAULT-kor-kimbap", "Kimbap", Cuisine::Korean, &[Grains, Greens, RootVeg, Seeds],
         "Sushi rice, spinach, pickled radish, carrots, seaweed"),
    // Thai
    seed("DEFAULT-tha-green-curry", "Thai Green Curry", Cuisine::Thai, &[Greens, Legumes, FreshHerbs],
         "Coconut milk, green curry paste, tofu, Thai basil"),
    seed("DEFAULT-tha-pad-thai", "Pad Thai", Cuisine::Thai, &[Grains, Legumes, Alliums, Seeds],
         "Rice noodles, tofu, bean sprouts, peanuts, lime"),
    seed("DEFAULT-tha-tom-yum-soup", "Tom Yum Soup", Cuisine::Thai, &[Greens, FreshHerbs, Alliums],
         "Lemongrass, galangal, kaffir lime, mushrooms, tofu"),
    seed("DEFAULT-tha-massaman-curry", "Massaman Curry", Cuisine::Thai, &[RootVeg, Legumes, Seeds],
         "Coconut milk, potatoes, tofu, peanuts, massaman paste"),
    // Vietnamese
    seed("DEFAULT-vie-pho-chay", "Pho Chay", Cuisine::Vietnamese, &[Grains, Greens, FreshHerbs, Alliums],
         "Rice noodles, vegetable broth, tofu, Thai basil, bean sprouts"),
    seed("DEFAULT-vie-banh-mi-chay", "Banh Mi Chay", Cuisine::Vietnamese, &[Grains, Legumes, RootVeg, FreshHerbs],
         "Baguette, lemongrass tofu, pickled carrots, cilantro"),
    seed("DEFAULT-vie-fresh-spring-rolls", "Fresh Spring Rolls", Cuisine::Vietnamese, &[Grains, Greens, FreshHerbs],
         "Rice paper, vermicelli, lettuce, mint, peanut sauce"),
    // Indian
    seed("DEFAULT-ind-dal-tadka", "Dal Tadka", Cuisine::Indian, &[Legumes, Alliums, FreshHerbs],
         "Yellow lentils, cumin, garlic, cilantro, ghee"),
    seed("DEFAULT-ind-palak-paneer", "Palak Paneer", Cuisine::Indian, &[Greens, Dairy, Alliums],
         "Spinach puree, paneer, cream, garam masala"),
    seed("DEFAULT-ind-chana-masala", "Chana Masala", Cuisine::Indian, &[Legumes, Alliums, FreshHerbs],
         "Chickpeas, tomatoes, onions, garam masala, cilantro"),
    seed("DEFAULT-ind-aloo-gobi", "Aloo Gobi", Cuisine::Indian, &[RootVeg, Cruciferous, Alliums],
         "Potatoes, cauliflower, turmeric, cumin, ginger"),
    seed("DEFAULT-ind-vegetable-biryani", "Vegetable Biryani", Cuisine::Indian, &[Grains, RootVeg, Alliums, FreshHerbs],
         "Basmati rice, mixed vegetables, saffron, fried onions"),
    // Mediterranean
    seed("DEFAULT-med-falafel-wrap", "Falafel Wrap", Cuisine::Mediterranean, &[Legumes, Greens, Grains, FreshHerbs],
         "Chickpea falafel, pita, tahini, lettuce, tomatoes"),
    seed("DEFAULT-med-greek-salad", "Greek Salad", Cuisine::Mediterranean, &[Greens, Dairy, Alliums],
         "Cucumber, tomatoes, feta, olives, red onion"),
    seed("DEFAULT-med-shakshuka", "Shakshuka", Cuisine::Mediterranean, &[Legumes, Alliums, FreshHerbs],
         "Poached eggs, tomato sauce, bell peppers, cumin"),
    seed("DEFAULT-med-hummus-plate", "Hummus Plate", Cuisine::Mediterranean, &[Legumes, Seeds, Grains],
         "Chickpea hummus, pita, olive oil, pine nuts"),
    // Italian
    seed("DEFAULT-ita-margherita-pizza", "Margherita Pizza", Cuisine::Italian, &[Grains, Dairy, FreshHerbs],
         "Pizza dough, tomato sauce, mozzarella, fresh basil"),
    seed("DEFAULT-ita-pasta-primavera", "Pasta Primavera", Cuisine::Italian, &[Grains, Greens, Alliums],
         "Penne, zucchini, bell peppers, cherry tomatoes, garlic"),
    seed("DEFAULT-ita-caprese-salad", "Caprese Salad", Cuisine::Italian, &[Dairy, FreshHerbs],
         "Fresh mozzarella, tomatoes, basil, balsamic glaze"),
    // Mexican
    seed("DEFAULT-mex-black-bean-tacos", "Black Bean Tacos", Cuisine::Mexican, &[Legumes, Grains, Greens, Alliums],
         "Corn tortillas, black beans, cabbage, salsa, lime"),
    seed("DEFAULT-mex-veggie-burrito-bowl", "Veggie Burrito Bowl", Cuisine::Mexican, &[Grains, Legumes, Greens],
         "Cilantro lime rice, black beans, corn, guacamole"),
    seed("DEFAULT-mex-cheese-quesadilla", "Cheese Quesadilla", Cuisine::Mexican, &[Grains, Dairy, Alliums],
         "Flour tortilla, cheddar, peppers, onions, salsa"),
    // French
    seed("DEFAULT-fre-ratatouille", "Ratatouille", Cuisine::French, &[Greens, RootVeg, Alliums, FreshHerbs],
         "Eggplant, zucchini, tomatoes, bell peppers, herbs de Provence"),
    seed("DEFAULT-fre-french-onion-soup", "French Onion Soup", Cuisine::French, &[Alliums, Grains, Dairy],
         "Caramelized onions, vegetable broth, crusty bread, gruyere"),
    // American
    seed("DEFAULT-ame-mac-and-cheese", "Mac And Cheese", Cuisine::American, &[Grains, Dairy],
         "Elbow pasta, cheddar cheese sauce, breadcrumbs"),
];

/// The starter catalogue, in table order.
pub fn default_dishes() -> Result<Vec<Dish>> {
    SEEDS
        .iter()
        .map(|s| {
            Ok(Dish::from_parts(s.id, s.name, s.cuisine)?
                .with_categories(s.categories.iter().copied())
                .with_recipe_reference(s.recipe))
        })
        .collect()
}

/// Whether `id` names a built-in dish.
pub fn is_default_dish(id: &str) -> bool {
    id.starts_with(DEFAULT_ID_PREFIX)
}
