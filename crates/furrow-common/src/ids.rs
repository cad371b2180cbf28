//! ID types for crop species.

use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::fmt;

/// Identifier of a crop species in the catalog (e.g. `"tomato"`).
///
/// Built-in species are available as associated constants and borrow a
/// static string; identifiers read from saves or user input own theirs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(Cow<'static, str>);

impl SpeciesId {
    /// Wheat.
    pub const WHEAT: Self = Self::from_static("wheat");
    /// Corn.
    pub const CORN: Self = Self::from_static("corn");
    /// Tomato.
    pub const TOMATO: Self = Self::from_static("tomato");
    /// Potato.
    pub const POTATO: Self = Self::from_static("potato");
    /// Carrot.
    pub const CARROT: Self = Self::from_static("carrot");

    /// Creates a species ID from a static string.
    #[must_use]
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Creates a species ID from any string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SpeciesId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SpeciesId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SpeciesId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
