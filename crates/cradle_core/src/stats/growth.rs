//! Growth classification against fixed reference values.
//!
//! # Invariants
//! - The reference entry is picked by minimal absolute age distance, no
//!   interpolation; equidistant ages resolve to the earlier entry.
//! - A deviation of exactly ±threshold classifies as `Within`.

/// Age-indexed reference values for the first year.
///
/// Median weight/height for a healthy infant, coarse enough for the
/// three-band classification.
const REFERENCE: &[ReferenceEntry] = &[
    ReferenceEntry { age_weeks: 0, weight_grams: 3_400, height_cm: 50.0 },
    ReferenceEntry { age_weeks: 4, weight_grams: 4_400, height_cm: 54.0 },
    ReferenceEntry { age_weeks: 9, weight_grams: 5_600, height_cm: 57.5 },
    ReferenceEntry { age_weeks: 13, weight_grams: 6_400, height_cm: 60.5 },
    ReferenceEntry { age_weeks: 17, weight_grams: 7_000, height_cm: 62.5 },
    ReferenceEntry { age_weeks: 22, weight_grams: 7_500, height_cm: 64.5 },
    ReferenceEntry { age_weeks: 26, weight_grams: 7_900, height_cm: 66.5 },
    ReferenceEntry { age_weeks: 30, weight_grams: 8_300, height_cm: 68.0 },
    ReferenceEntry { age_weeks: 35, weight_grams: 8_600, height_cm: 69.5 },
    ReferenceEntry { age_weeks: 39, weight_grams: 8_900, height_cm: 71.0 },
    ReferenceEntry { age_weeks: 43, weight_grams: 9_200, height_cm: 72.0 },
    ReferenceEntry { age_weeks: 48, weight_grams: 9_400, height_cm: 73.5 },
    ReferenceEntry { age_weeks: 52, weight_grams: 9_600, height_cm: 74.5 },
];

/// Deviation band allowed before a weight counts as above/below average.
pub const WEIGHT_BAND_PERCENT: f64 = 15.0;
/// Deviation band allowed before a height counts as above/below average.
pub const HEIGHT_BAND_PERCENT: f64 = 10.0;

/// One row of the fixed reference table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceEntry {
    pub age_weeks: u32,
    pub weight_grams: u32,
    pub height_cm: f64,
}

/// Three-band classification of a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthBand {
    AboveAverage,
    WithinAverage,
    BelowAverage,
}

/// Reference entry nearest to the given age.
pub fn nearest_reference(age_weeks: u32) -> ReferenceEntry {
    let mut nearest = REFERENCE[0];
    let mut best_distance = age_distance(nearest.age_weeks, age_weeks);
    for &entry in &REFERENCE[1..] {
        let distance = age_distance(entry.age_weeks, age_weeks);
        if distance < best_distance {
            nearest = entry;
            best_distance = distance;
        }
    }
    nearest
}

/// Percentage deviation of `value` from `reference`.
pub fn deviation_percent(value: f64, reference: f64) -> f64 {
    (value - reference) / reference * 100.0
}

/// Classifies a weight against the nearest reference entry.
pub fn classify_weight(age_weeks: u32, weight_grams: u32) -> GrowthBand {
    let reference = nearest_reference(age_weeks);
    classify_deviation(
        deviation_percent(f64::from(weight_grams), f64::from(reference.weight_grams)),
        WEIGHT_BAND_PERCENT,
    )
}

/// Classifies a height against the nearest reference entry.
pub fn classify_height(age_weeks: u32, height_cm: f64) -> GrowthBand {
    let reference = nearest_reference(age_weeks);
    classify_deviation(
        deviation_percent(height_cm, reference.height_cm),
        HEIGHT_BAND_PERCENT,
    )
}

fn classify_deviation(deviation: f64, band_percent: f64) -> GrowthBand {
    if deviation > band_percent {
        GrowthBand::AboveAverage
    } else if deviation < -band_percent {
        GrowthBand::BelowAverage
    } else {
        GrowthBand::WithinAverage
    }
}

fn age_distance(reference_age: u32, age: u32) -> u32 {
    reference_age.abs_diff(age)
}

#[cfg(test)]
mod tests {
    use super::{classify_height, classify_weight, nearest_reference, GrowthBand};

    #[test]
    fn nearest_reference_prefers_earlier_entry_on_ties() {
        // Week 2 is equidistant from weeks 0 and 4.
        assert_eq!(nearest_reference(2).age_weeks, 0);
        assert_eq!(nearest_reference(3).age_weeks, 4);
        assert_eq!(nearest_reference(90).age_weeks, 52);
    }

    #[test]
    fn exact_band_edges_classify_as_within() {
        // Week 0 reference weight is 3400 g; ±15% puts the edges at
        // 3910 g and 2890 g.
        assert_eq!(classify_weight(0, 3910), GrowthBand::WithinAverage);
        assert_eq!(classify_weight(0, 2890), GrowthBand::WithinAverage);
        assert_eq!(classify_weight(0, 3911), GrowthBand::AboveAverage);
        assert_eq!(classify_weight(0, 2889), GrowthBand::BelowAverage);
    }

    #[test]
    fn height_bands_use_the_tighter_threshold() {
        // Week 0 reference height is 50 cm; ±10% puts the edges at 45/55.
        assert_eq!(classify_height(0, 55.0), GrowthBand::WithinAverage);
        assert_eq!(classify_height(0, 55.1), GrowthBand::AboveAverage);
        assert_eq!(classify_height(0, 45.0), GrowthBand::WithinAverage);
        assert_eq!(classify_height(0, 44.9), GrowthBand::BelowAverage);
    }
}
