//! Static equipment table and category index.
//!
//! Both are immutable once built: either from the compiled-in defaults or
//! from a YAML catalog file given at startup. The catalog is then shared
//! (behind an `Arc`) by the lookup and category resolvers.

mod builtin;
pub mod types;

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};
use tracing::warn;

pub use types::{EquipmentRecord, RangeKm};

use crate::error::{ConfigError, ConfigResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Equipment name (case-sensitive) -> record
    #[serde(default)]
    equipment: BTreeMap<String, EquipmentRecord>,

    /// Lowercased category name -> member equipment names
    #[serde(default)]
    categories: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    pub fn new(
        equipment: BTreeMap<String, EquipmentRecord>,
        categories: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self {
            equipment,
            categories,
        }
        .normalized()
    }

    /// The compiled-in table.
    pub fn builtin() -> Self {
        Self::new(builtin::equipment(), builtin::categories())
    }

    pub fn from_yaml_str(yaml: &str, origin: &str) -> ConfigResult<Self> {
        let catalog: Catalog = serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;
        Ok(catalog.normalized())
    }

    /// Load a catalog from a YAML file
    pub async fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
        Self::from_yaml_str(&content, &path.display().to_string())
    }

    /// Category keys are matched trimmed and lowercased; fold duplicates that
    /// only differed in case.
    fn normalized(self) -> Self {
        let mut categories: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, members) in self.categories {
            categories
                .entry(normalize_category(&name))
                .or_default()
                .extend(members);
        }
        Self {
            equipment: self.equipment,
            categories,
        }
    }

    pub fn equipment(&self, name: &str) -> Option<&EquipmentRecord> {
        self.equipment.get(name)
    }

    /// Members of an already-normalized category name.
    pub fn category(&self, normalized: &str) -> Option<&[String]> {
        self.categories.get(normalized).map(Vec::as_slice)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn equipment_count(&self) -> usize {
        self.equipment.len()
    }

    /// `(category, member)` pairs naming equipment absent from the table.
    pub fn dangling_members(&self) -> Vec<(&str, &str)> {
        self.categories
            .iter()
            .flat_map(|(category, members)| {
                members
                    .iter()
                    .filter(|m| !self.equipment.contains_key(m.as_str()))
                    .map(move |m| (category.as_str(), m.as_str()))
            })
            .collect()
    }

    /// Log category members that do not resolve locally. They still resolve
    /// through the cache and fetcher tiers, so this is advisory only.
    pub fn warn_dangling_members(&self) {
        for (category, member) in self.dangling_members() {
            warn!(
                category = %category,
                member = %member,
                "Category member is not in the equipment table"
            );
        }
    }
}

pub fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}
