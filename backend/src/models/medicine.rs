//! Medicine catalog record.

use serde::{Deserialize, Deserializer, Serialize};

/// One catalog entry as it appears in the medicines dataset.
///
/// Every text field other than `name` may be missing in the source data;
/// missing and `null` text both read as an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub id: i64,
    #[serde(deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub brand: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub generic: String,
    #[serde(rename = "type", default, deserialize_with = "nullable_string")]
    pub medicine_type: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub drug_class: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub form: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub strength: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub uses: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub dosage: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub side_effects: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub precautions: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub interactions: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub pregnancy: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub storage: String,
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Medicine {
    /// Drug classes split on commas, trimmed, blanks dropped.
    pub fn drug_classes(&self) -> Vec<&str> {
        self.drug_class
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect()
    }

    /// Font Awesome icon name for the medicine type.
    pub fn type_icon(&self) -> &'static str {
        match self.medicine_type.to_lowercase().as_str() {
            "tablet" => "fa-tablet-alt",
            "capsule" => "fa-capsules",
            "syrup" => "fa-wine-bottle",
            "injection" => "fa-syringe",
            "ointment" => "fa-prescription-bottle",
            "drops" => "fa-eye-dropper",
            "cream" => "fa-pump-medical",
            "powder" => "fa-mortar-pestle",
            "inhaler" => "fa-lungs",
            _ => "fa-pills",
        }
    }
}

/// Dataset document wrapper: `{ "medicines": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicineDataset {
    pub medicines: Vec<Medicine>,
}

/// Compact card view used by listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineCard {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub generic: String,
    #[serde(rename = "type")]
    pub medicine_type: String,
    pub icon: &'static str,
    pub uses_preview: String,
}

impl From<&Medicine> for MedicineCard {
    fn from(medicine: &Medicine) -> Self {
        Self {
            id: medicine.id,
            name: medicine.name.clone(),
            brand: medicine.brand.clone(),
            generic: medicine.generic.clone(),
            medicine_type: medicine.medicine_type.clone(),
            icon: medicine.type_icon(),
            uses_preview: truncate_text(&medicine.uses, CARD_PREVIEW_LEN),
        }
    }
}

/// Characters of `uses` shown on a card.
pub const CARD_PREVIEW_LEN: usize = 100;

/// Truncate to `max_len` characters, appending "..." when cut.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_len).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_defaults_missing_fields() {
        let medicine: Medicine =
            serde_json::from_str(r#"{"id": 9, "name": "Test", "type": "syrup"}"#).unwrap();
        assert_eq!(medicine.medicine_type, "syrup");
        assert!(medicine.brand.is_empty());
        assert!(medicine.side_effects.is_empty());
    }

    #[test]
    fn test_null_text_fields_read_as_empty() {
        let medicine: Medicine = serde_json::from_str(
            r#"{"id": 7, "name": "Ibuprofen", "brand": null, "type": null, "drugClass": null}"#,
        )
        .unwrap();
        assert_eq!(medicine.name, "Ibuprofen");
        assert!(medicine.brand.is_empty());
        assert!(medicine.medicine_type.is_empty());
        assert!(medicine.drug_classes().is_empty());
    }

    #[test]
    fn test_drug_classes_split() {
        let medicine: Medicine = serde_json::from_str(
            r#"{"id": 1, "name": "X", "drugClass": "Statin,  Lipid-lowering agent , "}"#,
        )
        .unwrap();
        assert_eq!(medicine.drug_classes(), vec!["Statin", "Lipid-lowering agent"]);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 100), "short");
        let long = "a".repeat(120);
        let cut = truncate_text(&long, 100);
        assert_eq!(cut.len(), 103);
        assert!(cut.ends_with("..."));
    }
}
