//! Catalog exports (CSV, JSON, plain text) and printable HTML.

pub mod print;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::Medicine;

pub const EXPORT_SOURCE: &str = "PHARMADICES Medicine Database";
pub const DEVELOPER: &str = "Students of GPGC Lakki Marwat";

const CSV_HEADERS: [&str; 15] = [
    "ID",
    "Name",
    "Brand",
    "Generic",
    "Type",
    "Drug Class",
    "Form",
    "Uses",
    "Dosage",
    "Side Effects",
    "Precautions",
    "Interactions",
    "Pregnancy Category",
    "Storage",
    "Strength",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Txt,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Txt => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
            ExportFormat::Txt => "text/plain",
        }
    }

    pub fn filename(&self) -> String {
        format!("pharmadices_medicines.{}", self.extension())
    }
}

/// A generated download.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub filename: String,
    pub mime_type: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportInfo {
    pub source: String,
    pub export_date: String,
    pub total_medicines: usize,
    pub developer: String,
}

/// JSON export document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineExport {
    pub export_info: ExportInfo,
    pub medicines: Vec<Medicine>,
}

/// Render `medicines` in `format`.
pub fn export(
    medicines: &[Medicine],
    format: ExportFormat,
    now: DateTime<Utc>,
) -> Result<ExportFile, AppError> {
    if medicines.is_empty() {
        return Err(AppError::Validation("No medicines to export".to_string()));
    }

    let content = match format {
        ExportFormat::Csv => to_csv(medicines),
        ExportFormat::Json => to_json(medicines, now)?,
        ExportFormat::Txt => to_text(medicines, now),
    };

    Ok(ExportFile {
        filename: format.filename(),
        mime_type: format.mime_type().to_string(),
        content,
    })
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

pub fn to_csv(medicines: &[Medicine]) -> String {
    let mut csv = CSV_HEADERS.join(",");
    csv.push('\n');

    for m in medicines {
        let quoted = [
            &m.name,
            &m.brand,
            &m.generic,
            &m.medicine_type,
            &m.drug_class,
            &m.form,
            &m.uses,
            &m.dosage,
            &m.side_effects,
            &m.precautions,
            &m.interactions,
            &m.pregnancy,
            &m.storage,
            &m.strength,
        ]
        .map(|field| quote(field));

        csv.push_str(&m.id.to_string());
        for field in quoted {
            csv.push(',');
            csv.push_str(&field);
        }
        csv.push('\n');
    }

    csv
}

pub fn to_json(medicines: &[Medicine], now: DateTime<Utc>) -> Result<String, AppError> {
    let document = MedicineExport {
        export_info: ExportInfo {
            source: EXPORT_SOURCE.to_string(),
            export_date: now.to_rfc3339(),
            total_medicines: medicines.len(),
            developer: DEVELOPER.to_string(),
        },
        medicines: medicines.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}

pub fn to_text(medicines: &[Medicine], now: DateTime<Utc>) -> String {
    let rule = "=".repeat(50);
    let mut text = String::new();

    text.push_str("PHARMADICES - Medicine Information Database\n");
    text.push_str(&rule);
    text.push('\n');
    text.push_str(&format!("Export Date: {}\n", now.format("%Y-%m-%d")));
    text.push_str(&format!("Total Medicines: {}\n", medicines.len()));
    text.push_str(&format!("Developed by: {}\n", DEVELOPER));
    text.push_str(&rule);
    text.push_str("\n\n");

    for (i, m) in medicines.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, m.name));
        text.push_str(&"-".repeat(30));
        text.push('\n');
        let lines = [
            ("Brand", &m.brand),
            ("Generic", &m.generic),
            ("Type", &m.medicine_type),
            ("Drug Class", &m.drug_class),
            ("Form", &m.form),
            ("Strength", &m.strength),
            ("Uses", &m.uses),
            ("Dosage", &m.dosage),
            ("Side Effects", &m.side_effects),
            ("Precautions", &m.precautions),
            ("Interactions", &m.interactions),
            ("Pregnancy", &m.pregnancy),
            ("Storage", &m.storage),
        ];
        for (label, value) in lines {
            text.push_str(&format!("{}: {}\n", label, or_na(value)));
        }
        text.push('\n');
    }

    text.push_str(&rule);
    text.push('\n');
    text.push_str("Disclaimer: This information is for educational purposes only.\n");
    text.push_str("Always consult a healthcare professional before taking any medication.\n");
    text
}
