//! Side-by-side medicine comparison table.

use serde::Serialize;

use crate::errors::AppError;
use crate::models::Medicine;

/// Most medicines in one comparison.
pub const MAX_COMPARE: usize = 4;

/// Fewest medicines worth comparing.
pub const MIN_COMPARE: usize = 2;

const MISSING: &str = "N/A";

type FieldGetter = fn(&Medicine) -> &str;

const ROWS: [(&str, FieldGetter); 12] = [
    ("Medicine Name", |m| m.name.as_str()),
    ("Brand", |m| m.brand.as_str()),
    ("Generic", |m| m.generic.as_str()),
    ("Type", |m| m.medicine_type.as_str()),
    ("Drug Class", |m| m.drug_class.as_str()),
    ("Uses", |m| m.uses.as_str()),
    ("Dosage", |m| m.dosage.as_str()),
    ("Side Effects", |m| m.side_effects.as_str()),
    ("Precautions", |m| m.precautions.as_str()),
    ("Interactions", |m| m.interactions.as_str()),
    ("Pregnancy", |m| m.pregnancy.as_str()),
    ("Storage", |m| m.storage.as_str()),
];

/// One labelled row with a value per compared medicine.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub label: &'static str,
    pub values: Vec<String>,
}

/// Comparison table, one column per medicine.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonTable {
    pub medicine_ids: Vec<i64>,
    pub headers: Vec<String>,
    pub rows: Vec<ComparisonRow>,
}

/// Build the table. Needs at least two medicines; empty fields show "N/A".
pub fn compare(medicines: &[Medicine]) -> Result<ComparisonTable, AppError> {
    if medicines.len() < MIN_COMPARE {
        return Err(AppError::Validation(format!(
            "Select at least {} medicines to compare",
            MIN_COMPARE
        )));
    }
    if medicines.len() > MAX_COMPARE {
        return Err(AppError::LimitReached(format!(
            "Maximum {} medicines can be compared",
            MAX_COMPARE
        )));
    }

    let rows = ROWS
        .iter()
        .map(|(label, field)| ComparisonRow {
            label: *label,
            values: medicines
                .iter()
                .map(|m| {
                    let value = field(m).trim();
                    if value.is_empty() {
                        MISSING.to_string()
                    } else {
                        value.to_string()
                    }
                })
                .collect(),
        })
        .collect();

    Ok(ComparisonTable {
        medicine_ids: medicines.iter().map(|m| m.id).collect(),
        headers: medicines.iter().map(|m| m.name.clone()).collect(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample::sample_medicines;

    #[test]
    fn test_table_shape() {
        let medicines = sample_medicines();
        let table = compare(&medicines[..3]).unwrap();
        assert_eq!(table.headers, vec!["Paracetamol", "Amoxicillin", "Omeprazole"]);
        assert_eq!(table.rows.len(), 12);
        assert_eq!(table.rows[0].label, "Medicine Name");
        assert_eq!(table.rows[11].label, "Storage");
        assert!(table.rows.iter().all(|r| r.values.len() == 3));
        assert_eq!(table.rows[1].values[0], "Panadol");
    }

    #[test]
    fn test_empty_field_shows_placeholder() {
        let mut medicines = sample_medicines();
        medicines[0].storage.clear();
        let table = compare(&medicines[..2]).unwrap();
        assert_eq!(table.rows[11].values[0], "N/A");
    }

    #[test]
    fn test_size_limits() {
        let medicines = sample_medicines();
        let too_few = compare(&medicines[..1]).unwrap_err();
        assert_eq!(too_few.message(), "Select at least 2 medicines to compare");
        assert!(matches!(compare(&medicines[..5]), Err(AppError::LimitReached(_))));
    }
}
