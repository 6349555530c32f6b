//! Pairwise drug interaction rules.
//!
//! Two constant rule sets are checked for every unordered pair of selected
//! medicines: named drug pairs and drug-class patterns.

use serde::Serialize;

use crate::models::Medicine;

/// Most medicines that can be selected for one check.
pub const MAX_SELECTED: usize = 10;

/// Fewest medicines a check needs.
pub const MIN_TO_CHECK: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum InteractionSeverity {
    High,
    Medium,
    Low,
}

/// Which rule set produced an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Specific,
    Class,
}

struct ClassRule {
    classes: [&'static str; 2],
    severity: InteractionSeverity,
    description: &'static str,
    recommendation: &'static str,
}

struct PairRule {
    drugs: [&'static str; 2],
    severity: InteractionSeverity,
    description: &'static str,
    recommendation: &'static str,
}

const CLASS_RULES: &[ClassRule] = &[
    ClassRule {
        classes: ["NSAID", "Anticoagulant"],
        severity: InteractionSeverity::High,
        description: "Increased risk of bleeding when NSAIDs are combined with anticoagulants",
        recommendation: "Monitor for signs of bleeding. Consider alternative pain management.",
    },
    ClassRule {
        classes: ["ACE inhibitor", "Potassium-sparing diuretic"],
        severity: InteractionSeverity::Medium,
        description: "Risk of hyperkalemia when ACE inhibitors are combined with potassium-sparing diuretics",
        recommendation: "Monitor potassium levels regularly.",
    },
    ClassRule {
        classes: ["Statin", "Macrolide antibiotic"],
        severity: InteractionSeverity::High,
        description: "Increased risk of muscle toxicity (rhabdomyolysis)",
        recommendation: "Consider temporary statin discontinuation during antibiotic course.",
    },
    ClassRule {
        classes: ["SSRI antidepressant", "NSAID"],
        severity: InteractionSeverity::Medium,
        description: "Increased risk of gastrointestinal bleeding",
        recommendation: "Consider gastroprotective therapy if combination necessary.",
    },
    ClassRule {
        classes: ["Beta-blocker", "Calcium channel blocker"],
        severity: InteractionSeverity::Medium,
        description: "Risk of excessive bradycardia and hypotension",
        recommendation: "Monitor heart rate and blood pressure closely.",
    },
    ClassRule {
        classes: ["Benzodiazepine", "Opioid analgesic"],
        severity: InteractionSeverity::High,
        description: "Increased risk of respiratory depression and sedation",
        recommendation: "Avoid combination if possible. If necessary, use lowest effective doses.",
    },
    ClassRule {
        classes: ["Warfarin", "Antibiotic"],
        severity: InteractionSeverity::High,
        description: "Antibiotics may enhance warfarin effects, increasing bleeding risk",
        recommendation: "Monitor INR more frequently during antibiotic therapy.",
    },
    ClassRule {
        classes: ["Digoxin", "Loop diuretic"],
        severity: InteractionSeverity::Medium,
        description: "Diuretics may cause electrolyte imbalances affecting digoxin toxicity",
        recommendation: "Monitor digoxin levels and electrolytes regularly.",
    },
];

const PAIR_RULES: &[PairRule] = &[
    PairRule {
        drugs: ["Warfarin", "Aspirin"],
        severity: InteractionSeverity::High,
        description: "Significantly increased bleeding risk",
        recommendation: "Avoid combination unless absolutely necessary. Monitor INR closely.",
    },
    PairRule {
        drugs: ["Metformin", "Contrast dye"],
        severity: InteractionSeverity::High,
        description: "Risk of lactic acidosis",
        recommendation: "Discontinue metformin before contrast procedures.",
    },
    PairRule {
        drugs: ["Simvastatin", "Amlodipine"],
        severity: InteractionSeverity::Medium,
        description: "Increased simvastatin levels may increase muscle toxicity risk",
        recommendation: "Limit simvastatin dose to 20mg daily when used with amlodipine.",
    },
];

/// Medicine identity carried in an interaction record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractingMedicine {
    pub id: i64,
    pub name: String,
    pub generic: String,
}

impl From<&Medicine> for InteractingMedicine {
    fn from(medicine: &Medicine) -> Self {
        Self {
            id: medicine.id,
            name: medicine.name.clone(),
            generic: medicine.generic.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub medicine1: InteractingMedicine,
    pub medicine2: InteractingMedicine,
    pub severity: InteractionSeverity,
    pub description: String,
    pub recommendation: String,
    pub kind: InteractionKind,
}

/// Count of interactions per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeveritySummary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionReport {
    pub medicines: Vec<InteractingMedicine>,
    pub interactions: Vec<Interaction>,
    pub summary: SeveritySummary,
}

fn pair_matches(rule: &PairRule, a: &Medicine, b: &Medicine) -> bool {
    let listed = |s: &str| rule.drugs.iter().any(|d| *d == s);
    (listed(&a.name) && listed(&b.name)) || (listed(&a.generic) && listed(&b.generic))
}

fn class_matches(rule: &ClassRule, a: &Medicine, b: &Medicine) -> bool {
    let a_classes = a.drug_class.split(',').map(str::trim).collect::<Vec<_>>();
    let b_classes = b.drug_class.split(',').map(str::trim).collect::<Vec<_>>();

    let has_rule_class = |classes: &[&str]| {
        classes
            .iter()
            .any(|c| rule.classes.iter().any(|rc| c.contains(rc)))
    };

    // Same class list on both sides is not an interaction.
    let identical = a_classes.iter().all(|c| b_classes.contains(c));

    has_rule_class(&a_classes) && has_rule_class(&b_classes) && !identical
}

/// Run every pair of `medicines` against both rule sets.
pub fn analyze(medicines: &[Medicine]) -> Vec<Interaction> {
    let mut found: Vec<Interaction> = Vec::new();

    let mut push = |a: &Medicine,
                    b: &Medicine,
                    severity: InteractionSeverity,
                    description: &str,
                    recommendation: &str,
                    kind: InteractionKind| {
        let duplicate = found.iter().any(|i| {
            i.medicine1.id == a.id && i.medicine2.id == b.id && i.description == description
        });
        if !duplicate {
            found.push(Interaction {
                medicine1: a.into(),
                medicine2: b.into(),
                severity,
                description: description.to_string(),
                recommendation: recommendation.to_string(),
                kind,
            });
        }
    };

    for (i, a) in medicines.iter().enumerate() {
        for b in &medicines[i + 1..] {
            for rule in PAIR_RULES.iter().filter(|r| pair_matches(r, a, b)) {
                push(
                    a,
                    b,
                    rule.severity,
                    rule.description,
                    rule.recommendation,
                    InteractionKind::Specific,
                );
            }
            for rule in CLASS_RULES.iter().filter(|r| class_matches(r, a, b)) {
                push(
                    a,
                    b,
                    rule.severity,
                    rule.description,
                    rule.recommendation,
                    InteractionKind::Class,
                );
            }
        }
    }

    found
}

/// Analyze and summarize.
pub fn report(medicines: &[Medicine]) -> InteractionReport {
    let interactions = analyze(medicines);
    let mut summary = SeveritySummary::default();
    for interaction in &interactions {
        match interaction.severity {
            InteractionSeverity::High => summary.high += 1,
            InteractionSeverity::Medium => summary.medium += 1,
            InteractionSeverity::Low => summary.low += 1,
        }
    }
    InteractionReport {
        medicines: medicines.iter().map(InteractingMedicine::from).collect(),
        interactions,
        summary,
    }
}
