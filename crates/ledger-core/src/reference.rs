//! Reference data: the payer and category registries.
//!
//! Both are append-only `{id, name}` tables with unique names. Only the names
//! cross the store boundary: an expense names its payer and category, and the
//! store resolves those names to ids at insert time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which registry a name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
  Payer,
  Category,
}

impl fmt::Display for ReferenceKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      ReferenceKind::Payer => "payer",
      ReferenceKind::Category => "category",
    })
  }
}

/// Names registered once at startup. Already-registered names are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedData {
  pub payers:     Vec<String>,
  pub categories: Vec<String>,
}

impl SeedData {
  pub fn is_empty(&self) -> bool {
    self.payers.is_empty() && self.categories.is_empty()
  }
}
