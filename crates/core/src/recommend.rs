//! Static diet recommendation rules.
//!
//! Six independent rules, evaluated in fixed order against the raw input
//! record: diet, iron intake, BMI, menstrual cycle, sleep, then a combined
//! symptom sentence. Rules never look at the model's prediction or
//! attribution.

use crate::features::{InputRecord, SYMPTOM_NAMES};

pub const POOR_DIET: &str = "Your diet seems poor. Include iron-rich foods like spinach, legumes, eggs, red meat, and fortified cereals.";
pub const AVERAGE_DIET: &str =
    "Your diet is average. Try to include more iron-rich foods regularly.";
pub const LOW_IRON: &str =
    "Iron intake is low. Consider iron-rich foods or supplements if recommended by your doctor.";
pub const GOOD_IRON: &str = "Good iron intake. Maintain it.";
pub const UNDERWEIGHT: &str = "You are underweight. Include more protein and calories in your diet.";
pub const OVERWEIGHT: &str = "Maintain a balanced diet to manage weight.";
pub const IRREGULAR_CYCLE: &str = "Irregular menstrual cycle detected. Ensure sufficient iron intake and consult a doctor if needed.";
pub const SHORT_SLEEP: &str =
    "Short sleep may affect health and iron absorption. Aim for 6-8 hours of sleep.";

/// Compose the advice list for an input record.
///
/// Returns an empty list iff none of the rule conditions hold.
pub fn diet_recommendations(record: &InputRecord) -> Vec<String> {
    let mut recommendations = Vec::new();

    if record.diet == 0 {
        recommendations.push(POOR_DIET.to_string());
    } else if record.diet == 1 {
        recommendations.push(AVERAGE_DIET.to_string());
    }

    if record.iron_intake == 0 {
        recommendations.push(LOW_IRON.to_string());
    } else if record.iron_intake == 2 {
        recommendations.push(GOOD_IRON.to_string());
    }

    if record.bmi == 0 {
        recommendations.push(UNDERWEIGHT.to_string());
    } else if record.bmi == 2 || record.bmi == 3 {
        recommendations.push(OVERWEIGHT.to_string());
    }

    if record.menstrual_cycle == 1 {
        recommendations.push(IRREGULAR_CYCLE.to_string());
    }

    if record.sleep_duration == 0 {
        recommendations.push(SHORT_SLEEP.to_string());
    }

    let present: Vec<String> = SYMPTOM_NAMES
        .iter()
        .zip(record.symptoms.iter())
        .filter(|(_, &flag)| flag == 1)
        .map(|(name, _)| name.replace('_', " "))
        .collect();
    if !present.is_empty() {
        recommendations.push(format!(
            "You have symptoms like {}. Consider nutrient-rich foods (iron, B12, folate, protein).",
            present.join(", ")
        ));
    }

    recommendations
}
