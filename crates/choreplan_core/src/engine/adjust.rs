//! Household-specific point and frequency scaling.
//!
//! # Invariants
//! - Factors compound multiplicatively; a later factor never replaces an
//!   earlier one.
//! - Multipliers and adjustments are rounded to two decimals.
//! - A frequency adjustment below 1.0 means "more often"; it scales the
//!   recurrence interval, never the points.

use crate::model::questionnaire::{QuestionnaireResponse, WaterHardness};

const RELAXED_POINTS_BONUS: f64 = 1.2;
const DEMANDING_POINTS_FACTOR: f64 = 0.9;
const ALLERGY_HARD_TASK_BONUS: f64 = 1.1;
const ALLERGY_BONUS_MIN_DIFFICULTY: u8 = 3;
const DEPENDANTS_BONUS: f64 = 1.05;

const SPOTLESS_FREQUENCY: f64 = 0.7;
const DEMANDING_FREQUENCY: f64 = 0.85;
const RELAXED_FREQUENCY: f64 = 1.3;
const ALLERGY_DUST_FREQUENCY: f64 = 0.8;
const HARD_WATER_DESCALING_FREQUENCY: f64 = 0.7;
const PET_HAIR_FREQUENCY: f64 = 0.9;
const DUSTY_AREA_FREQUENCY: f64 = 0.85;

/// Computes the points multiplier for one template difficulty.
pub fn calculate_points_multiplier(responses: &QuestionnaireResponse, task_difficulty: u8) -> f64 {
    let mut multiplier = 1.0;

    let cleanliness = responses.cleanliness_level;
    if cleanliness <= 2 {
        multiplier *= RELAXED_POINTS_BONUS;
    } else if cleanliness >= 4 {
        multiplier *= DEMANDING_POINTS_FACTOR;
    }

    if responses.has_real_allergies() && task_difficulty >= ALLERGY_BONUS_MIN_DIFFICULTY {
        multiplier *= ALLERGY_HARD_TASK_BONUS;
    }

    if responses.has_children || responses.has_real_animals() {
        multiplier *= DEPENDANTS_BONUS;
    }

    round_two_decimals(multiplier)
}

/// Computes the recurrence interval factor for one template expression.
///
/// Cleanliness brackets are checked highest first and only the first match
/// applies, so level 1 falls into the `<= 2` bracket.
pub fn calculate_frequency_adjustment(
    responses: &QuestionnaireResponse,
    condition_code: Option<&str>,
) -> f64 {
    let mut adjustment = 1.0;

    let cleanliness = responses.cleanliness_level;
    if cleanliness >= 5 {
        adjustment *= SPOTLESS_FREQUENCY;
    } else if cleanliness >= 4 {
        adjustment *= DEMANDING_FREQUENCY;
    } else if cleanliness <= 2 {
        adjustment *= RELAXED_FREQUENCY;
    }

    let expression = condition_code.unwrap_or_default();

    if responses.has_real_allergies() && expression.contains("poussiere") {
        adjustment *= ALLERGY_DUST_FREQUENCY;
    }

    if responses.water_hardness == WaterHardness::Hard && expression.contains("detartrage") {
        adjustment *= HARD_WATER_DESCALING_FREQUENCY;
    }

    if responses.has_real_animals() && matches!(expression, "chat" | "chien") {
        adjustment *= PET_HAIR_FREQUENCY;
    }

    if responses.high_dust_area {
        adjustment *= DUSTY_AREA_FREQUENCY;
    }

    round_two_decimals(adjustment)
}

/// Resolves the integer points value for one completion.
pub fn calculate_task_points(base_points: u32, multiplier: f64) -> u32 {
    let points = (f64::from(base_points) * multiplier).round();
    if points.is_nan() || points <= 0.0 {
        return 0;
    }
    // Saturates at u32::MAX.
    points as u32
}

/// Scales a base recurrence interval, never below one day.
pub fn calculate_interval_days(default_interval_days: u32, adjustment: f64) -> u32 {
    let days = (f64::from(default_interval_days) * adjustment).round();
    if days.is_nan() || days < 1.0 {
        return 1;
    }
    days as u32
}

fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::{
        calculate_frequency_adjustment, calculate_interval_days, calculate_points_multiplier,
        calculate_task_points,
    };
    use crate::model::questionnaire::{QuestionnaireResponse, WaterHardness};
    use uuid::Uuid;

    fn base() -> QuestionnaireResponse {
        QuestionnaireResponse::for_household(Uuid::new_v4())
    }

    fn approx(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn standard_household_has_neutral_multiplier() {
        assert!(approx(calculate_points_multiplier(&base(), 5), 1.0));
    }

    #[test]
    fn cleanliness_brackets_scale_points() {
        let mut responses = base();
        responses.cleanliness_level = 2;
        assert!(approx(calculate_points_multiplier(&responses, 1), 1.2));
        responses.cleanliness_level = 4;
        assert!(approx(calculate_points_multiplier(&responses, 1), 0.9));
    }

    #[test]
    fn allergy_bonus_only_for_hard_tasks() {
        let mut responses = base();
        responses.allergies = vec!["dust".to_string()];
        assert!(approx(calculate_points_multiplier(&responses, 2), 1.0));
        assert!(approx(calculate_points_multiplier(&responses, 3), 1.1));

        responses.allergies = vec!["none".to_string()];
        assert!(approx(calculate_points_multiplier(&responses, 3), 1.0));
    }

    #[test]
    fn bonuses_compound_and_round() {
        let mut responses = base();
        responses.cleanliness_level = 1;
        responses.allergies = vec!["pollen".to_string()];
        responses.has_children = true;
        // 1.2 * 1.1 * 1.05 = 1.386
        assert!(approx(calculate_points_multiplier(&responses, 4), 1.39));
    }

    #[test]
    fn frequency_brackets_use_first_match() {
        let mut responses = base();
        let expectations = [(5, 0.7), (4, 0.85), (3, 1.0), (2, 1.3), (1, 1.3)];
        for (level, expected) in expectations {
            responses.cleanliness_level = level;
            assert!(
                approx(calculate_frequency_adjustment(&responses, None), expected),
                "level {level}"
            );
        }
    }

    #[test]
    fn frequency_expression_specific_factors() {
        let mut responses = base();
        responses.allergies = vec!["dust".to_string()];
        assert!(approx(
            calculate_frequency_adjustment(&responses, Some("allergie_poussiere")),
            0.8
        ));

        let mut responses = base();
        responses.water_hardness = WaterHardness::Hard;
        assert!(approx(
            calculate_frequency_adjustment(&responses, Some("detartrage_bouilloire")),
            0.7
        ));
        assert!(approx(
            calculate_frequency_adjustment(&responses, Some("four")),
            1.0
        ));

        let mut responses = base();
        responses.animals = vec!["cat".to_string()];
        assert!(approx(
            calculate_frequency_adjustment(&responses, Some("chat")),
            0.9
        ));
        assert!(approx(
            calculate_frequency_adjustment(&responses, Some("chat|chien")),
            1.0
        ));
    }

    #[test]
    fn dusty_area_compounds_with_cleanliness() {
        let mut responses = base();
        responses.cleanliness_level = 4;
        responses.high_dust_area = true;
        // 0.85 * 0.85 = 0.7225
        assert!(approx(calculate_frequency_adjustment(&responses, None), 0.72));
    }

    #[test]
    fn task_points_round_and_stay_monotonic() {
        assert_eq!(calculate_task_points(10, 1.25), 13);
        assert_eq!(calculate_task_points(10, 1.2), 12);
        assert_eq!(calculate_task_points(10, 0.0), 0);
        assert_eq!(calculate_task_points(10, -1.0), 0);

        let mut previous = 0;
        for step in 0..=300 {
            let multiplier = f64::from(step) / 100.0;
            let points = calculate_task_points(37, multiplier);
            assert!(points >= previous);
            previous = points;
        }
    }

    #[test]
    fn interval_days_never_drop_below_one() {
        assert_eq!(calculate_interval_days(7, 0.7), 5);
        assert_eq!(calculate_interval_days(1, 0.6), 1);
        assert_eq!(calculate_interval_days(30, 1.3), 39);
    }
}
