//! Advanced filter panel: extra predicates and sort over the catalog.

use serde::{Deserialize, Serialize};

use super::query::{sort_medicines, SortKey};
use crate::models::Medicine;

/// Tri-state presence check for a text field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    #[default]
    #[serde(alias = "")]
    Any,
    Yes,
    No,
}

impl Presence {
    fn accepts(&self, text: &str) -> bool {
        let present = !text.trim().is_empty();
        match self {
            Presence::Any => true,
            Presence::Yes => present,
            Presence::No => !present,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Any => "",
            Presence::Yes => "yes",
            Presence::No => "no",
        }
    }
}

/// Advanced filter parameters. Empty strings disable a predicate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedFilter {
    #[serde(default)]
    pub drug_class: String,
    #[serde(default)]
    pub pregnancy: String,
    #[serde(default)]
    pub contains_text: String,
    #[serde(default)]
    pub side_effects: Presence,
    #[serde(default)]
    pub interactions: Presence,
    #[serde(default)]
    pub sort_by: String,
    #[serde(default)]
    pub page: Option<usize>,
}

impl AdvancedFilter {
    pub fn matches(&self, medicine: &Medicine) -> bool {
        if !self.drug_class.is_empty() && medicine.drug_class != self.drug_class {
            return false;
        }
        if !self.pregnancy.is_empty() && medicine.pregnancy != self.pregnancy {
            return false;
        }
        if !self.contains_text.trim().is_empty() {
            let needle = self.contains_text.trim().to_lowercase();
            if !searchable_text(medicine).contains(&needle) {
                return false;
            }
        }
        self.side_effects.accepts(&medicine.side_effects)
            && self.interactions.accepts(&medicine.interactions)
    }

    /// Sort key; a blank `sortBy` means name order.
    fn sort_key(&self) -> Option<SortKey> {
        match self.sort_by.trim() {
            "" => Some(SortKey::Name),
            key => SortKey::parse(key),
        }
    }

    /// Filter then sort.
    pub fn apply(&self, medicines: &[Medicine]) -> Vec<Medicine> {
        let mut results: Vec<Medicine> = medicines
            .iter()
            .filter(|m| self.matches(m))
            .cloned()
            .collect();
        sort_medicines(&mut results, self.sort_key());
        results
    }
}

/// Lowercased blob of every field the "contains" box looks at.
fn searchable_text(medicine: &Medicine) -> String {
    [
        medicine.name.as_str(),
        medicine.brand.as_str(),
        medicine.generic.as_str(),
        medicine.uses.as_str(),
        medicine.side_effects.as_str(),
        medicine.precautions.as_str(),
        medicine.interactions.as_str(),
        medicine.dosage.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample::sample_medicines;

    #[test]
    fn test_drug_class_exact() {
        let filter = AdvancedFilter {
            drug_class: "Antihistamine".to_string(),
            ..Default::default()
        };
        let hits = filter.apply(&sample_medicines());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Cetirizine");

        let partial = AdvancedFilter {
            drug_class: "Antibiotic".to_string(),
            ..Default::default()
        };
        assert!(partial.apply(&sample_medicines()).is_empty());
    }

    #[test]
    fn test_contains_text_searches_precautions() {
        let filter = AdvancedFilter {
            contains_text: "GRAPEFRUIT".to_string(),
            ..Default::default()
        };
        let hits = filter.apply(&sample_medicines());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Atorvastatin");
    }

    #[test]
    fn test_presence_checks() {
        let mut medicines = sample_medicines();
        medicines[0].side_effects = "   ".to_string();

        let without = AdvancedFilter {
            side_effects: Presence::No,
            ..Default::default()
        };
        let hits = without.apply(&medicines);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        let with = AdvancedFilter {
            side_effects: Presence::Yes,
            ..Default::default()
        };
        assert_eq!(with.apply(&medicines).len(), medicines.len() - 1);
    }

    #[test]
    fn test_sort_brand_desc() {
        let filter = AdvancedFilter {
            sort_by: "brand-desc".to_string(),
            ..Default::default()
        };
        let brands: Vec<String> = filter
            .apply(&sample_medicines())
            .into_iter()
            .map(|m| m.brand)
            .collect();
        assert_eq!(
            brands,
            vec!["Zyrtec", "Ventolin", "Panadol", "Losec", "Lipitor", "Augmentin"]
        );
    }

    #[test]
    fn test_blank_sort_is_name_order() {
        let names: Vec<String> = AdvancedFilter::default()
            .apply(&sample_medicines())
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(
            names,
            vec!["Amoxicillin", "Atorvastatin", "Cetirizine", "Omeprazole", "Paracetamol", "Salbutamol"]
        );

        let unknown = AdvancedFilter {
            sort_by: "price".to_string(),
            ..Default::default()
        };
        assert_eq!(unknown.apply(&sample_medicines())[0].name, "Paracetamol");
    }
}
