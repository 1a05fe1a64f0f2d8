//! Built-in game variants and variant selection.

pub mod precinct;
pub mod rift;

use serde::{Deserialize, Serialize};

use crate::engine::Catalog;

/// Which built-in game a session plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantChoice {
    /// League-themed clicker: gold, LP, seasons.
    Rift,
    /// Police-themed clicker: budget, merit, promotions.
    Precinct,
}

impl VariantChoice {
    /// All variants in menu order.
    pub fn all() -> &'static [VariantChoice] {
        &[VariantChoice::Rift, VariantChoice::Precinct]
    }

    /// Stable key, also used as the save-slot prefix.
    pub fn key(&self) -> &'static str {
        match self {
            VariantChoice::Rift => "rift",
            VariantChoice::Precinct => "precinct",
        }
    }

    pub fn from_key(key: &str) -> Option<VariantChoice> {
        Self::all().iter().copied().find(|v| v.key() == key)
    }
}

/// Build the catalog for a variant.
pub fn create_catalog(choice: &VariantChoice) -> Catalog {
    match choice {
        VariantChoice::Rift => rift::catalog(),
        VariantChoice::Precinct => precinct::catalog(),
    }
}
