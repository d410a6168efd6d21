//! Feature schema shared between training and inference.
//!
//! The 18 input fields are positional: training rows, form submissions, and
//! attribution vectors all use the order of [`FEATURE_NAMES`]. Reordering or
//! re-encoding a field silently breaks predictions, so both the trainer and
//! the server build their vectors through [`InputRecord::to_features`].

/// Fixed-point scale factor (micro precision, 1e6)
pub const SCALE: i64 = 1_000_000;

/// Number of input features
pub const FEATURE_COUNT: usize = 18;

/// Number of binary symptom flags (the trailing features)
pub const SYMPTOM_COUNT: usize = 10;

/// Canonical feature order for the whole system
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "gender",
    "diet",
    "activity",
    "menstrual_cycle",
    "iron_intake",
    "sleep_duration",
    "bmi",
    "pale_skin",
    "cold_hands_legs",
    "weakness",
    "dizziness",
    "short_breath",
    "brittle_nails",
    "sore_tongue",
    "pica",
    "hair_loss",
    "poor_concentration",
];

/// Symptom flag names, in feature order
pub const SYMPTOM_NAMES: [&str; SYMPTOM_COUNT] = [
    "pale_skin",
    "cold_hands_legs",
    "weakness",
    "dizziness",
    "short_breath",
    "brittle_nails",
    "sore_tongue",
    "pica",
    "hair_loss",
    "poor_concentration",
];

/// One person's worth of inputs, integer-coded.
///
/// `age` is micro-scaled years (e.g. 42 years = 42_000_000); every other
/// field is a raw category code or 0/1 flag. Encodings:
/// gender 0=female 1=male; diet 0=poor 1=average 2=good; activity 0/1/2;
/// menstrual_cycle 0=regular 1=irregular; iron_intake 0=low 1=medium 2=high;
/// sleep_duration 0=short 1=normal 2=long; bmi 0=underweight 1=normal
/// 2=overweight 3=obese; symptoms 0=absent 1=present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRecord {
    pub age: i64,
    pub gender: i64,
    pub diet: i64,
    pub activity: i64,
    pub menstrual_cycle: i64,
    pub iron_intake: i64,
    pub sleep_duration: i64,
    pub bmi: i64,
    pub symptoms: [i64; SYMPTOM_COUNT],
}

impl InputRecord {
    /// Build the positional feature vector, micro-scaled, in schema order.
    pub fn to_features(&self) -> Vec<i64> {
        let mut features = Vec::with_capacity(FEATURE_COUNT);
        features.push(self.age);
        features.push(self.gender * SCALE);
        features.push(self.diet * SCALE);
        features.push(self.activity * SCALE);
        features.push(self.menstrual_cycle * SCALE);
        features.push(self.iron_intake * SCALE);
        features.push(self.sleep_duration * SCALE);
        features.push(self.bmi * SCALE);
        for &flag in &self.symptoms {
            features.push(flag * SCALE);
        }
        features
    }

    /// Symptom flag by position within [`SYMPTOM_NAMES`]
    pub fn symptom(&self, idx: usize) -> i64 {
        self.symptoms[idx]
    }
}
