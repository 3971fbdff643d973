use serde::{Deserialize, Serialize};

use stockbook_core::{DomainError, DomainResult, ProductId};

/// A validated product name: trimmed and non-empty.
///
/// Equality and ordering are plain byte comparison of the trimmed text, so
/// "Amla" and "amla" are distinct products and listing order does not depend
/// on locale.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductName(String);

impl ProductName {
    /// Trim `raw` and reject it if nothing is left.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        Self::try_trimmed(raw)
            .ok_or_else(|| DomainError::invalid_input("product name cannot be empty"))
    }

    /// Trim `raw`; `None` when it is blank.
    ///
    /// Used by the paths that skip blank rows instead of failing on them.
    pub fn try_trimmed(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for ProductName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProductName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProductName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        ProductName::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A registered catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
}

impl Product {
    pub fn new(id: ProductId, name: ProductName) -> Self {
        Self { id, name }
    }
}

/// Sort names ascending by byte order (the catalog listing order).
pub fn sort_names(names: &mut [String]) {
    names.sort_unstable();
}
