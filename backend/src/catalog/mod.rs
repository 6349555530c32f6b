//! In-memory medicine catalog.
//!
//! The dataset is read once at startup and never written back. Every listing,
//! filter and lookup runs against this immutable snapshot.

mod advanced;
mod query;
pub mod sample;

pub use advanced::*;
pub use query::*;

use std::collections::BTreeSet;
use std::path::Path;

use rand::seq::SliceRandom;

use crate::errors::AppError;
use crate::models::{Medicine, MedicineDataset};

/// Immutable medicine catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    medicines: Vec<Medicine>,
    from_sample: bool,
}

impl Catalog {
    pub fn new(medicines: Vec<Medicine>) -> Self {
        Self {
            medicines,
            from_sample: false,
        }
    }

    /// Load the dataset file, falling back to the embedded sample on any error.
    pub async fn load_or_sample(path: &Path) -> Self {
        match Self::load(path).await {
            Ok(catalog) => {
                tracing::info!("Loaded {} medicines from {:?}", catalog.len(), path);
                catalog
            }
            Err(e) => {
                tracing::warn!(
                    "Could not load medicines from {:?} ({}); using sample data",
                    path,
                    e
                );
                Self {
                    medicines: sample::sample_medicines(),
                    from_sample: true,
                }
            }
        }
    }

    /// Load the dataset file.
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let dataset: MedicineDataset = serde_json::from_str(&raw)?;
        Ok(Self::new(dataset.medicines))
    }

    pub fn all(&self) -> &[Medicine] {
        &self.medicines
    }

    pub fn len(&self) -> usize {
        self.medicines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.medicines.is_empty()
    }

    /// Whether the embedded sample is being served.
    pub fn is_sample(&self) -> bool {
        self.from_sample
    }

    pub fn get(&self, id: i64) -> Option<&Medicine> {
        self.medicines.iter().find(|m| m.id == id)
    }

    /// Look up a medicine, failing with `NotFound`.
    pub fn require(&self, id: i64) -> Result<&Medicine, AppError> {
        self.get(id)
            .ok_or_else(|| AppError::NotFound(format!("Medicine {} not found", id)))
    }

    /// Resolve ids in order, skipping unknown ones.
    pub fn resolve(&self, ids: &[i64]) -> Vec<Medicine> {
        ids.iter().filter_map(|id| self.get(*id)).cloned().collect()
    }

    /// Filter and sort for the catalog listing.
    pub fn query(&self, query: &CatalogQuery) -> Vec<Medicine> {
        let mut results: Vec<Medicine> = self
            .medicines
            .iter()
            .filter(|m| query.matches(m))
            .cloned()
            .collect();
        sort_medicines(
            &mut results,
            query.sort.as_deref().and_then(SortKey::parse),
        );
        results
    }

    /// Sorted distinct non-empty drug class strings.
    pub fn drug_classes(&self) -> Vec<String> {
        self.medicines
            .iter()
            .map(|m| m.drug_class.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct medicine types, sorted.
    pub fn types(&self) -> Vec<String> {
        self.medicines
            .iter()
            .map(|m| m.medicine_type.clone())
            .filter(|t| !t.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn random(&self) -> Option<&Medicine> {
        self.medicines.choose(&mut rand::thread_rng())
    }
}
