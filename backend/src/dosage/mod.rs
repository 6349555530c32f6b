//! Weight-based dosage estimates.
//!
//! A small per-drug table of mg/kg ranges, adjusted multiplicatively for
//! condition severity, organ impairment and age. The result is either a dose
//! range or a contraindication.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::Medicine;

/// Age band the rule table is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatientCategory {
    Adult,
    Child,
    Infant,
}

impl PatientCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientCategory::Adult => "adult",
            PatientCategory::Child => "child",
            PatientCategory::Infant => "infant",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    #[default]
    Moderate,
    Severe,
}

impl Severity {
    fn multiplier(&self) -> f64 {
        match self {
            Severity::Mild => 0.8,
            Severity::Moderate => 1.0,
            Severity::Severe => 1.2,
        }
    }
}

/// Kidney or liver function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrganFunction {
    #[default]
    Normal,
    MildImpairment,
    ModerateImpairment,
    SevereImpairment,
}

impl OrganFunction {
    fn multiplier(&self) -> f64 {
        match self {
            OrganFunction::Normal => 1.0,
            OrganFunction::MildImpairment => 0.9,
            OrganFunction::ModerateImpairment => 0.7,
            OrganFunction::SevereImpairment => 0.5,
        }
    }

    fn is_impaired(&self) -> bool {
        *self != OrganFunction::Normal
    }
}

/// Patient parameters for a calculation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    pub age: u32,
    pub weight: f64,
    pub category: PatientCategory,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub kidney_function: OrganFunction,
    #[serde(default)]
    pub liver_function: OrganFunction,
    #[serde(default)]
    pub is_pregnant: bool,
}

impl PatientProfile {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.age == 0 || self.weight.is_nan() || self.weight <= 0.0 {
            return Err(AppError::Validation(
                "Please enter age and weight".to_string(),
            ));
        }
        Ok(())
    }
}

/// mg/kg bounds for one patient category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseRule {
    pub min_per_kg: f64,
    pub max_per_kg: f64,
    pub max_daily: f64,
    pub frequency: &'static str,
}

/// Rules for one drug. `None` means not recommended for that category.
#[derive(Debug, Clone, Copy)]
pub struct DrugRules {
    pub adult: Option<DoseRule>,
    pub child: Option<DoseRule>,
    pub infant: Option<DoseRule>,
}

impl DrugRules {
    fn for_category(&self, category: PatientCategory) -> Option<DoseRule> {
        match category {
            PatientCategory::Adult => self.adult,
            PatientCategory::Child => self.child,
            PatientCategory::Infant => self.infant,
        }
    }
}

const fn rule(min_per_kg: f64, max_per_kg: f64, max_daily: f64, frequency: &'static str) -> DoseRule {
    DoseRule {
        min_per_kg,
        max_per_kg,
        max_daily,
        frequency,
    }
}

const PARACETAMOL: DrugRules = DrugRules {
    adult: Some(rule(10.0, 15.0, 4000.0, "4-6 hours")),
    child: Some(rule(10.0, 15.0, 75.0, "4-6 hours")),
    infant: Some(rule(10.0, 15.0, 60.0, "4-6 hours")),
};

const IBUPROFEN: DrugRules = DrugRules {
    adult: Some(rule(5.0, 10.0, 2400.0, "6-8 hours")),
    child: Some(rule(5.0, 10.0, 40.0, "6-8 hours")),
    infant: Some(rule(5.0, 10.0, 30.0, "6-8 hours")),
};

const AMOXICILLIN: DrugRules = DrugRules {
    adult: Some(rule(20.0, 40.0, 3000.0, "8 hours")),
    child: Some(rule(20.0, 40.0, 90.0, "8 hours")),
    infant: Some(rule(20.0, 40.0, 90.0, "8 hours")),
};

const ASPIRIN: DrugRules = DrugRules {
    adult: Some(rule(10.0, 15.0, 4000.0, "4-6 hours")),
    child: None,
    infant: None,
};

/// Used for any drug without its own entry.
pub const FALLBACK: DrugRules = DrugRules {
    adult: Some(rule(5.0, 10.0, 1000.0, "8-12 hours")),
    child: Some(rule(5.0, 10.0, 50.0, "8-12 hours")),
    infant: Some(rule(2.0, 5.0, 25.0, "8-12 hours")),
};

fn rules_by_name(name: &str) -> Option<DrugRules> {
    match name {
        "Paracetamol" => Some(PARACETAMOL),
        "Ibuprofen" => Some(IBUPROFEN),
        "Amoxicillin" => Some(AMOXICILLIN),
        "Aspirin" => Some(ASPIRIN),
        _ => None,
    }
}

/// Rules for a medicine: by name, then by generic name, else the fallback.
pub fn rules_for(medicine: &Medicine) -> DrugRules {
    rules_by_name(&medicine.name)
        .or_else(|| rules_by_name(&medicine.generic))
        .unwrap_or(FALLBACK)
}

/// Which adjustments changed the base range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Adjustments {
    pub kidney: bool,
    pub liver: bool,
    pub age: bool,
    pub severity: bool,
}

/// Computed dose range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoseRange {
    pub min_dose: f64,
    pub max_dose: f64,
    pub max_daily_dose: f64,
    pub frequency: String,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pregnancy_warning: Option<String>,
    pub adjustments: Adjustments,
}

/// Outcome of a calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DosageOutcome {
    Dose(DoseRange),
    Contraindicated { reason: String },
}

impl DosageOutcome {
    pub fn is_contraindicated(&self) -> bool {
        matches!(self, DosageOutcome::Contraindicated { .. })
    }
}

/// Pregnancy category letter: the letter after "Category", else any of
/// D/X/C appearing in the text.
fn pregnancy_letter(pregnancy: &str) -> Option<char> {
    if let Some(idx) = pregnancy.find("Category") {
        let letter = pregnancy[idx + "Category".len()..]
            .trim_start()
            .chars()
            .next()
            .filter(|c| c.is_ascii_uppercase());
        if letter.is_some() {
            return letter;
        }
    }
    ['D', 'X', 'C']
        .into_iter()
        .find(|letter| pregnancy.contains(*letter))
}

const PREGNANCY_WARNING: &str = "Use only if clearly needed. Consult your healthcare provider.";

/// Compute a dose range for `patient`.
pub fn calculate(medicine: &Medicine, patient: &PatientProfile) -> DosageOutcome {
    let Some(rule) = rules_for(medicine).for_category(patient.category) else {
        return DosageOutcome::Contraindicated {
            reason: format!(
                "{} is not recommended for {}s. Please consult a healthcare provider.",
                medicine.name,
                patient.category.as_str()
            ),
        };
    };

    let mut min_dose = rule.min_per_kg * patient.weight;
    let mut max_dose = rule.max_per_kg * patient.weight;
    let mut max_daily = match patient.category {
        PatientCategory::Adult => rule.max_daily,
        _ => rule.max_daily * patient.weight,
    };

    min_dose *= patient.severity.multiplier();
    max_dose *= patient.severity.multiplier();

    let elderly = patient.age > 65;
    let organ_and_age = [
        patient.kidney_function.multiplier(),
        patient.liver_function.multiplier(),
        if elderly { 0.8 } else { 1.0 },
    ];
    for factor in organ_and_age {
        min_dose *= factor;
        max_dose *= factor;
        max_daily *= factor;
    }

    let mut pregnancy_warning = None;
    if patient.is_pregnant {
        let category = if medicine.pregnancy.is_empty() {
            "Unknown"
        } else {
            medicine.pregnancy.as_str()
        };
        match pregnancy_letter(category) {
            Some('D') | Some('X') => {
                return DosageOutcome::Contraindicated {
                    reason: format!(
                        "{} is contraindicated in pregnancy (Category {}). Please consult your healthcare provider immediately.",
                        medicine.name, category
                    ),
                };
            }
            Some('C') => pregnancy_warning = Some(PREGNANCY_WARNING.to_string()),
            _ => {}
        }
    }

    DosageOutcome::Dose(DoseRange {
        min_dose: round2(min_dose),
        max_dose: round2(max_dose),
        max_daily_dose: round2(max_daily),
        frequency: rule.frequency.to_string(),
        unit: "mg".to_string(),
        pregnancy_warning,
        adjustments: Adjustments {
            kidney: patient.kidney_function.is_impaired(),
            liver: patient.liver_function.is_impaired(),
            age: elderly,
            severity: patient.severity != Severity::Moderate,
        },
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample::sample_medicines;

    fn named(name: &str) -> Medicine {
        let mut medicine = sample_medicines().remove(0);
        medicine.name = name.to_string();
        medicine.generic = String::new();
        medicine.pregnancy = String::new();
        medicine
    }

    fn adult(weight: f64) -> PatientProfile {
        PatientProfile {
            age: 30,
            weight,
            category: PatientCategory::Adult,
            severity: Severity::Moderate,
            kidney_function: OrganFunction::Normal,
            liver_function: OrganFunction::Normal,
            is_pregnant: false,
        }
    }

    fn dose(outcome: DosageOutcome) -> DoseRange {
        match outcome {
            DosageOutcome::Dose(range) => range,
            other => panic!("expected a dose, got {:?}", other),
        }
    }

    #[test]
    fn test_paracetamol_adult_70kg() {
        let range = dose(calculate(&named("Paracetamol"), &adult(70.0)));
        assert_eq!(range.min_dose, 700.0);
        assert_eq!(range.max_dose, 1050.0);
        assert_eq!(range.max_daily_dose, 4000.0);
        assert_eq!(range.frequency, "4-6 hours");
        assert_eq!(range.unit, "mg");
        assert_eq!(range.adjustments, Adjustments::default());
    }

    #[test]
    fn test_aspirin_child_contraindicated() {
        let mut patient = adult(20.0);
        patient.age = 8;
        patient.category = PatientCategory::Child;
        let outcome = calculate(&named("Aspirin"), &patient);
        assert!(outcome.is_contraindicated());
        if let DosageOutcome::Contraindicated { reason } = outcome {
            assert!(reason.contains("not recommended for childs"));
        }
    }

    #[test]
    fn test_child_daily_cap_is_per_kg() {
        let mut patient = adult(20.0);
        patient.age = 8;
        patient.category = PatientCategory::Child;
        let range = dose(calculate(&named("Ibuprofen"), &patient));
        assert_eq!(range.min_dose, 100.0);
        assert_eq!(range.max_dose, 200.0);
        assert_eq!(range.max_daily_dose, 800.0);
    }

    #[test]
    fn test_lookup_by_generic_then_fallback() {
        let mut medicine = named("Panadol Extra");
        medicine.generic = "Paracetamol".to_string();
        assert_eq!(rules_for(&medicine).adult, PARACETAMOL.adult);

        let unknown = named("Mystery");
        let mut patient = adult(10.0);
        patient.age = 1;
        patient.category = PatientCategory::Infant;
        let range = dose(calculate(&unknown, &patient));
        assert_eq!(range.min_dose, 20.0);
        assert_eq!(range.max_dose, 50.0);
        assert_eq!(range.max_daily_dose, 250.0);
        assert_eq!(range.frequency, "8-12 hours");
    }

    #[test]
    fn test_adjustments_stack() {
        let mut patient = adult(50.0);
        patient.age = 70;
        patient.severity = Severity::Severe;
        patient.kidney_function = OrganFunction::ModerateImpairment;
        patient.liver_function = OrganFunction::MildImpairment;

        let range = dose(calculate(&named("Paracetamol"), &patient));
        // 500 * 1.2 * 0.7 * 0.9 * 0.8
        assert_eq!(range.min_dose, 302.4);
        assert_eq!(range.max_dose, 453.6);
        // 4000 * 0.7 * 0.9 * 0.8, severity leaves the cap alone
        assert_eq!(range.max_daily_dose, 2016.0);
        assert!(range.adjustments.kidney);
        assert!(range.adjustments.liver);
        assert!(range.adjustments.age);
        assert!(range.adjustments.severity);
    }

    #[test]
    fn test_pregnancy_categories() {
        let mut patient = adult(60.0);
        patient.is_pregnant = true;

        let mut statin = named("Atorvastatin");
        statin.pregnancy = "Category X - Contraindicated in pregnancy.".to_string();
        assert!(calculate(&statin, &patient).is_contraindicated());

        let mut ppi = named("Omeprazole");
        ppi.pregnancy = "Category C - Consult doctor if pregnant.".to_string();
        let range = dose(calculate(&ppi, &patient));
        assert_eq!(range.pregnancy_warning.as_deref(), Some(PREGNANCY_WARNING));

        let mut antibiotic = named("Amoxicillin");
        antibiotic.pregnancy = "Category B - Generally safe during pregnancy.".to_string();
        assert!(dose(calculate(&antibiotic, &patient)).pregnancy_warning.is_none());

        let unknown = named("Mystery");
        assert!(dose(calculate(&unknown, &patient)).pregnancy_warning.is_none());
    }

    #[test]
    fn test_validation() {
        let mut patient = adult(0.0);
        assert!(patient.validate().is_err());
        patient.weight = 70.0;
        patient.age = 0;
        assert!(patient.validate().is_err());
        patient.age = 40;
        assert!(patient.validate().is_ok());
    }
}
