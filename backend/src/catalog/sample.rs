//! Embedded fallback data set used when the medicines file cannot be loaded.

use crate::models::Medicine;

#[allow(clippy::too_many_arguments)]
fn medicine(
    id: i64,
    name: &str,
    brand: &str,
    generic: &str,
    medicine_type: &str,
    drug_class: &str,
    form: &str,
    text: [&str; 7],
) -> Medicine {
    let [uses, dosage, side_effects, precautions, interactions, pregnancy, storage] = text;
    Medicine {
        id,
        name: name.to_string(),
        brand: brand.to_string(),
        generic: generic.to_string(),
        medicine_type: medicine_type.to_string(),
        drug_class: drug_class.to_string(),
        form: form.to_string(),
        strength: String::new(),
        uses: uses.to_string(),
        dosage: dosage.to_string(),
        side_effects: side_effects.to_string(),
        precautions: precautions.to_string(),
        interactions: interactions.to_string(),
        pregnancy: pregnancy.to_string(),
        storage: storage.to_string(),
    }
}

/// Six common medicines.
pub fn sample_medicines() -> Vec<Medicine> {
    vec![
        medicine(
            1,
            "Paracetamol",
            "Panadol",
            "Acetaminophen",
            "tablet",
            "Analgesic, Antipyretic",
            "Tablet",
            [
                "Used to treat mild to moderate pain and fever.",
                "500-1000mg every 4-6 hours as needed. Maximum 4000mg per day.",
                "Rare at therapeutic doses. May cause liver damage in overdose.",
                "Do not exceed recommended dose. Avoid alcohol.",
                "May interact with warfarin and other blood thinners.",
                "Generally considered safe during pregnancy.",
                "Store at room temperature, away from moisture.",
            ],
        ),
        medicine(
            2,
            "Amoxicillin",
            "Augmentin",
            "Amoxicillin + Clavulanate",
            "tablet",
            "Antibiotic, Penicillin",
            "Tablet",
            [
                "Used to treat bacterial infections such as pneumonia, bronchitis, and sinusitis.",
                "250-500mg every 8 hours or 875mg every 12 hours.",
                "Diarrhea, nausea, vomiting, rash.",
                "Complete the full course even if symptoms improve.",
                "May reduce effectiveness of birth control pills.",
                "Category B - Generally safe during pregnancy.",
                "Store at room temperature.",
            ],
        ),
        medicine(
            3,
            "Omeprazole",
            "Losec",
            "Omeprazole",
            "capsule",
            "Proton Pump Inhibitor",
            "Delayed-release capsule",
            [
                "Used to treat acid reflux, GERD, and stomach ulcers.",
                "20-40mg once daily before meals.",
                "Headache, diarrhea, abdominal pain.",
                "Do not crush or chew capsules.",
                "May interact with warfarin, diazepam, and phenytoin.",
                "Category C - Consult doctor if pregnant.",
                "Store at room temperature.",
            ],
        ),
        medicine(
            4,
            "Salbutamol",
            "Ventolin",
            "Albuterol",
            "inhaler",
            "Bronchodilator, Beta-2 agonist",
            "Metered dose inhaler",
            [
                "Used to treat and prevent bronchospasm in asthma and COPD.",
                "1-2 puffs every 4-6 hours as needed.",
                "Tremor, headache, tachycardia, nervousness.",
                "Not for regular scheduled use. Use only for symptom relief.",
                "May interact with beta-blockers and diuretics.",
                "Category C - Use if clearly needed.",
                "Store at room temperature. Avoid extreme temperatures.",
            ],
        ),
        medicine(
            5,
            "Atorvastatin",
            "Lipitor",
            "Atorvastatin",
            "tablet",
            "Statin, Lipid-lowering agent",
            "Tablet",
            [
                "Used to lower cholesterol and reduce risk of heart disease.",
                "10-80mg once daily, usually in the evening.",
                "Muscle pain, weakness, liver problems, digestive issues.",
                "Regular liver function tests required. Avoid grapefruit juice.",
                "Interacts with many drugs including other cholesterol medications.",
                "Category X - Contraindicated in pregnancy.",
                "Store at room temperature.",
            ],
        ),
        medicine(
            6,
            "Cetirizine",
            "Zyrtec",
            "Cetirizine",
            "tablet",
            "Antihistamine",
            "Tablet",
            [
                "Used to treat allergy symptoms such as runny nose, sneezing, and hives.",
                "5-10mg once daily.",
                "Drowsiness, dry mouth, fatigue, headache.",
                "May cause drowsiness. Avoid alcohol.",
                "May enhance effects of other CNS depressants.",
                "Category B - Generally safe during pregnancy.",
                "Store at room temperature.",
            ],
        ),
    ]
}
