use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::ContextId;
use crate::error::{Error, Result};

/// A free-text preference note, optionally filed under a category such as
/// `dietary` or `budget`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    #[serde(alias = "uid")]
    id: ContextId,
    #[serde(alias = "context")]
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
}

impl UserContext {
    pub fn new(content: &str, category: Option<&str>) -> Result<Self> {
        Self::from_parts(ContextId::generate(), content, category)
    }

    pub fn from_parts(
        id: impl Into<ContextId>,
        content: &str,
        category: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            content: normalize_content(content)?,
            category: normalize_category(category),
        })
    }

    pub fn id(&self) -> &ContextId {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn with_content(&self, content: &str) -> Result<Self> {
        Ok(Self {
            content: normalize_content(content)?,
            ..self.clone()
        })
    }

    pub fn with_category(&self, category: Option<&str>) -> Self {
        Self {
            category: normalize_category(category),
            ..self.clone()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        normalize_content(&self.content).map(|_| ())
    }
}

/// `[category] content`, or just the content when uncategorised.
impl fmt::Display for UserContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.category {
            Some(category) => write!(f, "[{category}] {}", self.content),
            None => f.write_str(&self.content),
        }
    }
}

fn normalize_content(content: &str) -> Result<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("context content must not be empty"));
    }
    Ok(trimmed.to_owned())
}

fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
}
