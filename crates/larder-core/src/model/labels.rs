use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known label of an enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelParseError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for LabelParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for LabelParseError {}

/// Declare a fieldless enum serialized as a string label, with `ALL`,
/// `as_str`, `Display` and a case-insensitive `FromStr`.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant,)+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = LabelParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| LabelParseError {
                        kind: $kind,
                        value: s.to_owned(),
                    })
            }
        }
    };
}

labelled_enum! {
    /// How an ingredient is bought, which decides its shopping-list bucket.
    PurchaseType, "purchase type" {
        Bulk => "bulk",
        Weekly => "weekly",
    }
}

labelled_enum! {
    /// Food-type categories used for diversity tracking.
    Category, "category" {
        Greens => "greens",
        Legumes => "legumes",
        Grains => "grains",
        Alliums => "alliums",
        Cruciferous => "cruciferous",
        FreshHerbs => "fresh_herbs",
        Seeds => "seeds",
        Fermented => "fermented",
        RootVeg => "root_veg",
        Dairy => "dairy",
        Protein => "protein",
    }
}

labelled_enum! {
    /// Binary east/west classification used for balance.
    Region, "region" {
        Eastern => "eastern",
        Western => "western",
    }
}

labelled_enum! {
    /// Cuisine of a dish. Each cuisine belongs to exactly one [`Region`].
    Cuisine, "cuisine" {
        Korean => "korean",
        Japanese => "japanese",
        Chinese => "chinese",
        Thai => "thai",
        Vietnamese => "vietnamese",
        Indian => "indian",
        Italian => "italian",
        French => "french",
        American => "american",
        Mexican => "mexican",
        Mediterranean => "mediterranean",
    }
}

impl Cuisine {
    pub fn region(self) -> Region {
        match self {
            Self::Korean
            | Self::Japanese
            | Self::Chinese
            | Self::Thai
            | Self::Vietnamese
            | Self::Indian => Region::Eastern,
            Self::Italian | Self::French | Self::American | Self::Mexican | Self::Mediterranean => {
                Region::Western
            }
        }
    }
}

labelled_enum! {
    /// Day slot within a week plan, Monday first.
    Day, "day" {
        Mon => "Mon",
        Tue => "Tue",
        Wed => "Wed",
        Thu => "Thu",
        Fri => "Fri",
        Sat => "Sat",
        Sun => "Sun",
    }
}

impl Day {
    /// Position of the day in a week, `Mon` = 0.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, Self::Sat | Self::Sun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_roundtrip_through_display_and_parse() {
        for c in Category::ALL {
            assert_eq!(c.to_string().parse::<Category>().unwrap(), *c);
        }
        assert_eq!("FRESH_HERBS".parse::<Category>().unwrap(), Category::FreshHerbs);
        assert_eq!(" mon ".parse::<Day>().unwrap(), Day::Mon);
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = "brunch".parse::<Day>().unwrap_err();
        assert_eq!(err.to_string(), "invalid day: \"brunch\"");
        assert!("bulky".parse::<PurchaseType>().is_err());
    }

    #[test]
    fn enums_serialize_to_labels() {
        assert_eq!(serde_json::to_string(&PurchaseType::Bulk).unwrap(), "\"bulk\"");
        assert_eq!(serde_json::to_string(&Category::RootVeg).unwrap(), "\"root_veg\"");
        assert_eq!(serde_json::to_string(&Day::Sun).unwrap(), "\"Sun\"");
        assert!(serde_json::from_str::<Cuisine>("\"klingon\"").is_err());
    }

    #[test]
    fn every_cuisine_has_a_region() {
        let eastern = Cuisine::ALL.iter().filter(|c| c.region() == Region::Eastern).count();
        assert_eq!(eastern, 6);
        assert_eq!(Cuisine::ALL.len() - eastern, 5);
    }

    #[test]
    fn day_index_follows_week_order() {
        let indices: Vec<usize> = Day::ALL.iter().map(|d| d.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5, 6]);
        assert!(Day::Sat.is_weekend());
        assert!(!Day::Fri.is_weekend());
    }
}
