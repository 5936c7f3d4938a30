use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::plan::Month;

/// Declare a string-backed id newtype with a random-id constructor.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Fresh id of the form `", $prefix, "-<8 hex>`.")]
            pub fn generate() -> Self {
                let hex = Uuid::new_v4().simple().to_string();
                Self(format!(concat!($prefix, "-{}"), &hex[..8]))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

entity_id!(
    /// Identity of an [`Ingredient`](super::Ingredient).
    IngredientId,
    "ING"
);
entity_id!(
    /// Identity of a [`Dish`](super::Dish).
    DishId,
    "DISH"
);
entity_id!(
    /// Identity of a [`UserContext`](super::UserContext).
    ContextId,
    "CTX"
);
entity_id!(
    /// Identity of a [`MonthlyPlan`](super::MonthlyPlan). Always `PLAN-<month>`.
    PlanId,
    "PLAN"
);

impl PlanId {
    /// The one plan id a month can have.
    pub fn for_month(month: &Month) -> Self {
        Self(format!("PLAN-{month}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_have_prefix_and_eight_hex_chars() {
        let id = IngredientId::generate();
        let hex = id.as_str().strip_prefix("ING-").expect("prefix");
        assert_eq!(hex.len(), 8);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(IngredientId::generate(), IngredientId::generate());
        assert!(DishId::generate().as_str().starts_with("DISH-"));
        assert!(ContextId::generate().as_str().starts_with("CTX-"));
    }

    #[test]
    fn plan_id_is_derived_from_month() {
        let month: Month = "2025-01".parse().unwrap();
        assert_eq!(PlanId::for_month(&month).as_str(), "PLAN-2025-01");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = DishId::from("DISH-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"DISH-1\"");
    }
}
