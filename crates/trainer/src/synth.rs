//! Synthetic training data.
//!
//! Draws independent records with the LCG RNG and labels them with the fixed
//! risk formula. The label is a pure function of the record; the sampling is
//! only there to manufacture a training table.

use crate::deterministic::LcgRng;
use anemia_core::features::{InputRecord, FEATURE_NAMES, SCALE, SYMPTOM_COUNT};
use anyhow::{Context, Result};
use std::path::Path;

/// Per-symptom presence probabilities, micro-scaled, in symptom order
const SYMPTOM_P_MICRO: [i64; SYMPTOM_COUNT] = [
    300_000, // pale_skin
    300_000, // cold_hands_legs
    400_000, // weakness
    250_000, // dizziness
    200_000, // short_breath
    150_000, // brittle_nails
    100_000, // sore_tongue
    50_000,  // pica
    200_000, // hair_loss
    300_000, // poor_concentration
];

#[derive(Clone, Debug)]
pub struct SynthConfig {
    pub records: usize,
    pub seed: i64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            records: 5000,
            seed: 42,
        }
    }
}

/// Risk label formula: 1 iff diet is poor, OR more than two of
/// {pale_skin, weakness, dizziness, hair_loss} are present, OR iron intake
/// is low, OR the person is female with an irregular menstrual cycle.
pub fn risk_label(record: &InputRecord) -> i64 {
    let symptom_count =
        record.symptom(0) + record.symptom(2) + record.symptom(3) + record.symptom(8);

    let at_risk = record.diet == 0
        || symptom_count > 2
        || record.iron_intake == 0
        || (record.gender == 0 && record.menstrual_cycle == 1);

    i64::from(at_risk)
}

/// Draw `config.records` labelled records
pub fn synthesize(config: &SynthConfig) -> Vec<(InputRecord, i64)> {
    let mut rng = LcgRng::new(config.seed);
    let mut rows = Vec::with_capacity(config.records);

    for _ in 0..config.records {
        let mut symptoms = [0i64; SYMPTOM_COUNT];
        let record = InputRecord {
            age: (18 + rng.next_range(52)) * SCALE,
            gender: rng.next_range(2),
            diet: rng.next_range(3),
            activity: rng.next_range(3),
            menstrual_cycle: rng.next_range(2),
            iron_intake: rng.next_range(3),
            sleep_duration: rng.next_range(3),
            bmi: rng.next_range(4),
            symptoms: {
                for (flag, &p) in symptoms.iter_mut().zip(SYMPTOM_P_MICRO.iter()) {
                    *flag = rng.next_bernoulli(p);
                }
                symptoms
            },
        };

        let label = risk_label(&record);
        rows.push((record, label));
    }

    rows
}

/// Write labelled rows as CSV: commented header, raw integer columns
/// (age in years), trailing `risk` column.
pub fn write_csv<P: AsRef<Path>>(path: P, rows: &[(InputRecord, i64)]) -> Result<()> {
    let mut out = String::new();
    out.push_str("# ");
    out.push_str(&FEATURE_NAMES.join(","));
    out.push_str(",risk\n");

    for (record, label) in rows {
        let mut cols = vec![
            record.age / SCALE,
            record.gender,
            record.diet,
            record.activity,
            record.menstrual_cycle,
            record.iron_intake,
            record.sleep_duration,
            record.bmi,
        ];
        cols.extend_from_slice(&record.symptoms);
        cols.push(*label);

        let line: Vec<String> = cols.iter().map(|v| v.to_string()).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    std::fs::write(path.as_ref(), out)
        .with_context(|| format!("failed to write dataset to {}", path.as_ref().display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(diet: i64, iron: i64, gender: i64, cycle: i64, symptoms: [i64; 10]) -> InputRecord {
        InputRecord {
            age: 30 * SCALE,
            gender,
            diet,
            activity: 1,
            menstrual_cycle: cycle,
            iron_intake: iron,
            sleep_duration: 1,
            bmi: 1,
            symptoms,
        }
    }

    #[test]
    fn test_risk_label_truth_table() {
        // Poor diet alone
        assert_eq!(risk_label(&record(0, 1, 1, 0, [0; 10])), 1);
        // Low iron alone
        assert_eq!(risk_label(&record(2, 0, 1, 0, [0; 10])), 1);
        // Female with irregular cycle
        assert_eq!(risk_label(&record(2, 1, 0, 1, [0; 10])), 1);
        // Male with irregular cycle is not flagged
        assert_eq!(risk_label(&record(2, 1, 1, 1, [0; 10])), 0);

        // Three of the four counted symptoms trip the rule
        let mut symptoms = [0i64; 10];
        symptoms[0] = 1; // pale_skin
        symptoms[2] = 1; // weakness
        symptoms[3] = 1; // dizziness
        assert_eq!(risk_label(&record(2, 1, 1, 0, symptoms)), 1);

        // Two counted symptoms do not (> 2, strict)
        symptoms[3] = 0;
        assert_eq!(risk_label(&record(2, 1, 1, 0, symptoms)), 0);

        // Uncounted symptoms never trip it
        let mut uncounted = [1i64; 10];
        uncounted[0] = 0;
        uncounted[2] = 0;
        uncounted[3] = 0;
        uncounted[8] = 0;
        assert_eq!(risk_label(&record(2, 1, 1, 0, uncounted)), 0);

        // Nothing at all
        assert_eq!(risk_label(&record(2, 1, 1, 0, [0; 10])), 0);
    }

    #[test]
    fn test_label_is_deterministic() {
        let r = record(0, 0, 0, 1, [1; 10]);
        for _ in 0..10 {
            assert_eq!(risk_label(&r), risk_label(&r));
        }
    }

    #[test]
    fn test_synthesize_determinism() {
        let config = SynthConfig {
            records: 100,
            seed: 42,
        };
        assert_eq!(synthesize(&config), synthesize(&config));

        let other_seed = SynthConfig {
            records: 100,
            seed: 43,
        };
        assert_ne!(synthesize(&config), synthesize(&other_seed));
    }

    #[test]
    fn test_synthesized_values_in_range() {
        let rows = synthesize(&SynthConfig {
            records: 500,
            seed: 1,
        });
        assert_eq!(rows.len(), 500);

        let mut saw_at_risk = false;
        let mut saw_not_at_risk = false;

        for (record, label) in &rows {
            assert!((18 * SCALE..70 * SCALE).contains(&record.age));
            assert!((0..2).contains(&record.gender));
            assert!((0..3).contains(&record.diet));
            assert!((0..4).contains(&record.bmi));
            assert!(record.symptoms.iter().all(|&f| f == 0 || f == 1));
            assert_eq!(*label, risk_label(record));

            saw_at_risk |= *label == 1;
            saw_not_at_risk |= *label == 0;
        }

        assert!(saw_at_risk && saw_not_at_risk);
    }

    #[test]
    fn test_csv_shape() {
        let rows = synthesize(&SynthConfig {
            records: 10,
            seed: 42,
        });
        let file = tempfile::NamedTempFile::new().unwrap();
        write_csv(file.path(), &rows).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 11);
        assert!(lines[0].starts_with("# age,gender,"));
        assert_eq!(lines[1].split(',').count(), 19);
    }
}
