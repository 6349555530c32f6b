//! Standalone printable HTML documents with inline styles.

use chrono::{DateTime, Utc};

use super::DEVELOPER;
use crate::models::Medicine;

const DETAIL_STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; line-height: 1.6; }
.header { text-align: center; border-bottom: 2px solid #1a73e8; padding-bottom: 20px; margin-bottom: 30px; }
.logo { font-size: 24px; font-weight: bold; color: #1a73e8; margin-bottom: 10px; }
.medicine-name { font-size: 28px; font-weight: bold; margin: 20px 0; }
.medicine-type { display: inline-block; padding: 5px 15px; background: #e3f2fd; color: #1565c0; border-radius: 20px; font-size: 14px; }
.info-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 20px; margin: 20px 0; }
.info-label { font-weight: bold; color: #333; margin-bottom: 5px; }
.info-value { color: #666; }
.section { margin: 30px 0; }
.section-title { font-size: 18px; font-weight: bold; color: #1a73e8; border-bottom: 1px solid #ddd; padding-bottom: 5px; margin-bottom: 15px; }
.disclaimer { background: #fff8e1; padding: 15px; border-left: 4px solid #ff9800; margin-top: 30px; }
.footer { text-align: center; margin-top: 40px; padding-top: 20px; border-top: 1px solid #ddd; color: #666; font-size: 12px; }
@media print { body { margin: 0; } }";

const LIST_STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; }
.header { text-align: center; margin-bottom: 30px; }
.logo { font-size: 24px; font-weight: bold; color: #1a73e8; margin-bottom: 10px; }
table { width: 100%; border-collapse: collapse; margin: 20px 0; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; font-size: 12px; }
th { background-color: #f2f2f2; font-weight: bold; }
tr:nth-child(even) { background-color: #f9f9f9; }
.footer { text-align: center; margin-top: 30px; font-size: 12px; color: #666; }
@media print { body { margin: 0; } th, td { font-size: 10px; padding: 6px; } }";

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

fn footer(now: DateTime<Utc>) -> String {
    format!(
        "<div class=\"footer\">\n<div>Printed from PHARMADICES Medicine Database</div>\n<div>Developed by {}</div>\n<div>Print Date: {}</div>\n</div>",
        DEVELOPER,
        now.format("%Y-%m-%d")
    )
}

/// Printable detail sheet for one medicine.
pub fn medicine_print_html(medicine: &Medicine, now: DateTime<Utc>) -> String {
    let info = [
        ("Brand Name", medicine.brand.as_str(), ""),
        ("Generic Name", medicine.generic.as_str(), ""),
        ("Drug Class", medicine.drug_class.as_str(), "Not specified"),
        ("Form", medicine.form.as_str(), "Not specified"),
        ("Strength", medicine.strength.as_str(), "Not specified"),
        ("Pregnancy Category", medicine.pregnancy.as_str(), "Consult doctor"),
    ];
    let sections = [
        ("Uses", medicine.uses.as_str(), "Information not available"),
        (
            "Dosage",
            medicine.dosage.as_str(),
            "Consult your healthcare provider for proper dosage.",
        ),
        (
            "Side Effects",
            medicine.side_effects.as_str(),
            "Common side effects may include nausea, headache, or dizziness. Report any severe reactions to your doctor.",
        ),
        (
            "Precautions",
            medicine.precautions.as_str(),
            "Inform your doctor about any allergies or medical conditions before taking this medicine.",
        ),
        (
            "Drug Interactions",
            medicine.interactions.as_str(),
            "May interact with other medications. Inform your doctor about all drugs you are taking.",
        ),
        (
            "Storage",
            medicine.storage.as_str(),
            "Store at room temperature, away from moisture and heat.",
        ),
    ];

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str(&format!(
        "<title>{} - Medicine Information</title>\n<style>\n{}\n</style>\n</head>\n<body>\n",
        escape_html(&medicine.name),
        DETAIL_STYLE
    ));
    html.push_str("<div class=\"header\">\n<div class=\"logo\">PHARMADICES</div>\n<div>Medicine Information Database</div>\n</div>\n");
    html.push_str(&format!(
        "<div class=\"medicine-name\">{}</div>\n<div class=\"medicine-type\">{}</div>\n",
        escape_html(&medicine.name),
        escape_html(&medicine.medicine_type)
    ));

    html.push_str("<div class=\"info-grid\">\n");
    for (label, value, fallback) in info {
        html.push_str(&format!(
            "<div class=\"info-item\"><div class=\"info-label\">{}:</div><div class=\"info-value\">{}</div></div>\n",
            label,
            escape_html(or_default(value, fallback))
        ));
    }
    html.push_str("</div>\n");

    for (title, value, fallback) in sections {
        html.push_str(&format!(
            "<div class=\"section\"><div class=\"section-title\">{}</div><div>{}</div></div>\n",
            title,
            escape_html(or_default(value, fallback))
        ));
    }

    html.push_str("<div class=\"disclaimer\"><strong>Disclaimer:</strong> This information is for educational purposes only. Always consult a healthcare professional before taking any medication. Do not self-medicate.</div>\n");
    html.push_str(&footer(now));
    html.push_str("\n</body>\n</html>\n");
    html
}

/// Printable table of medicines.
pub fn medicine_list_print_html(medicines: &[Medicine], now: DateTime<Utc>) -> String {
    let mut rows = String::new();
    for (i, m) in medicines.iter().enumerate() {
        let uses = if m.uses.is_empty() {
            "N/A".to_string()
        } else {
            format!("{}...", m.uses.chars().take(100).collect::<String>())
        };
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            i + 1,
            escape_html(&m.name),
            escape_html(&m.brand),
            escape_html(&m.generic),
            escape_html(&m.medicine_type),
            escape_html(or_default(&m.drug_class, "N/A")),
            escape_html(&uses)
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<title>Medicines List - PHARMADICES</title>\n<style>\n{style}\n</style>\n</head>\n<body>\n\
<div class=\"header\">\n<div class=\"logo\">PHARMADICES</div>\n<div>Medicine Information Database</div>\n\
<div style=\"margin-top: 10px; font-size: 16px;\">Medicines List ({count} medicines)</div>\n</div>\n\
<table>\n<thead>\n<tr><th>#</th><th>Medicine Name</th><th>Brand</th><th>Generic</th><th>Type</th><th>Drug Class</th><th>Uses</th></tr>\n</thead>\n\
<tbody>\n{rows}</tbody>\n</table>\n{footer}\n</body>\n</html>\n",
        style = LIST_STYLE,
        count = medicines.len(),
        rows = rows,
        footer = footer(now)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample::sample_medicines;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"A" & 'B'</b>"#),
            "&lt;b&gt;&quot;A&quot; &amp; &#039;B&#039;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_detail_sheet_is_standalone() {
        let html = medicine_print_html(&sample_medicines()[0], Utc::now());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert!(!html.contains("<link"));
        assert!(html.contains("<title>Paracetamol - Medicine Information</title>"));
        // Empty strength falls back to placeholder text
        assert!(html.contains("Not specified"));
    }

    #[test]
    fn test_list_sheet_rows() {
        let medicines = sample_medicines();
        let html = medicine_list_print_html(&medicines, Utc::now());
        assert!(html.contains("Medicines List (6 medicines)"));
        assert_eq!(html.matches("<tr><td>").count(), 6);
        assert!(html.contains("<td>6</td><td>Cetirizine</td>"));
    }
}
