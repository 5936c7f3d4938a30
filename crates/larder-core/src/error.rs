//! Domain error taxonomy.
//!
//! Expected failures (an id that does not resolve, a duplicate add, a plan
//! pointing at a deleted dish) are ordinary `Err` values. Only
//! [`Error::Storage`] and [`Error::Decode`] describe faults outside the
//! caller's control.

use std::fmt;

use larder_store::StorageError;
use larder_store::migration::MigrationError;
use thiserror::Error;

use crate::model::Day;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Kind of entity named in an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Ingredient,
    Dish,
    Plan,
    Context,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ingredient => "ingredient",
            Self::Dish => "dish",
            Self::Plan => "plan",
            Self::Context => "context",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{entity} {id:?} not found")]
    NotFound { entity: EntityKind, id: String },

    #[error("{entity} {id:?} already exists")]
    Duplicate { entity: EntityKind, id: String },

    #[error(transparent)]
    MissingReference(#[from] MissingReferences),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("stored collection {key:?} could not be decoded: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Error {
    pub fn not_found(entity: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn duplicate(entity: EntityKind, id: impl fmt::Display) -> Self {
        Self::Duplicate {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True for failures of the byte store or of decoding its content.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Decode { .. })
    }
}

impl From<MigrationError> for Error {
    fn from(err: MigrationError) -> Self {
        match err {
            MigrationError::Storage(e) => Self::Storage(e),
            MigrationError::Malformed { key, source } => Self::Decode { key, source },
            e @ (MigrationError::NotAnObject { .. } | MigrationError::Unconvertible { .. }) => {
                Self::Validation(e.to_string())
            }
        }
    }
}

/// Where a dangling reference was found.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Referrer {
    /// A plan slot (week 1-4, day).
    Slot { week: u8, day: Day },
    /// A dish's ingredient list.
    Dish(String),
}

impl fmt::Display for Referrer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slot { week, day } => write!(f, "week {week} {day}"),
            Self::Dish(id) => write!(f, "dish {id:?}"),
        }
    }
}

/// One id that failed to resolve during a report.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DanglingReference {
    pub referrer: Referrer,
    pub target: EntityKind,
    pub id: String,
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} references missing {} {:?}", self.referrer, self.target, self.id)
    }
}

/// Every dangling reference found in one operation, in a stable order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingReferences(Vec<DanglingReference>);

impl MissingReferences {
    /// `None` when nothing is missing.
    pub fn from_refs(refs: impl IntoIterator<Item = DanglingReference>) -> Option<Self> {
        let mut refs: Vec<_> = refs.into_iter().collect();
        refs.sort();
        refs.dedup();
        (!refs.is_empty()).then_some(Self(refs))
    }

    pub fn references(&self) -> &[DanglingReference] {
        &self.0
    }

    /// Distinct missing ids, sorted.
    pub fn missing_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.0.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|r| r.id == id)
    }
}

impl fmt::Display for MissingReferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unresolved references: ")?;
        for (i, r) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{r}")?;
        }
        Ok(())
    }
}

impl std::error::Error for MissingReferences {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_id() {
        let err = Error::not_found(EntityKind::Ingredient, "ING-2");
        assert_eq!(err.to_string(), "ingredient \"ING-2\" not found");
    }

    #[test]
    fn missing_references_are_sorted_and_deduplicated() {
        let dangling = |id: &str| DanglingReference {
            referrer: Referrer::Dish("DISH-1".into()),
            target: EntityKind::Ingredient,
            id: id.into(),
        };
        let refs =
            MissingReferences::from_refs([dangling("ING-9"), dangling("ING-2"), dangling("ING-9")])
                .unwrap();
        assert_eq!(refs.missing_ids(), vec!["ING-2", "ING-9"]);
        assert_eq!(refs.references().len(), 2);
        assert_eq!(
            refs.to_string(),
            "unresolved references: dish \"DISH-1\" references missing ingredient \"ING-2\"; \
             dish \"DISH-1\" references missing ingredient \"ING-9\""
        );
    }

    #[test]
    fn empty_reference_list_is_none() {
        assert!(MissingReferences::from_refs(Vec::new()).is_none());
    }
}
