//! Folding of grouped wizard answers into the flat questionnaire snapshot.
//!
//! # Invariants
//! - Answers are validated against the schema before any field is read.
//! - Unanswered optional questions keep the snapshot defaults, except
//!   multi-choice groups which become empty selections.
//! - `animals` and `allergies` are normalized so `none` clears the list.

use crate::model::questionnaire::{
    normalize_exclusive_selection, CookingFrequency, FloorType, HouseholdId, HousingType,
    OutdoorType, QuestionnaireResponse, ValidationError, WaterHardness,
};
use crate::questionnaire::schema::{validate_answers, AnswerValue, WizardAnswers};

impl QuestionnaireResponse {
    /// Builds a snapshot for `household_id` from raw wizard answers.
    ///
    /// # Errors
    /// - Any schema violation reported by [`validate_answers`].
    /// - `MissingHouseholdId` or `OutOfRange` from [`QuestionnaireResponse::validate`].
    pub fn from_answers(
        household_id: HouseholdId,
        answers: &WizardAnswers,
    ) -> Result<Self, ValidationError> {
        validate_answers(answers)?;
        let reader = AnswerReader { answers };
        let mut response = Self::for_household(household_id);

        if let Some(value) = reader.choice("housing_type") {
            response.housing_type =
                HousingType::parse(value).ok_or_else(|| unknown("housing_type", value))?;
        }
        if let Some(value) = reader.number("room_count")? {
            response.room_count = value;
        }

        let special_spaces = reader.choices("special_spaces");
        response.has_stairs = contains(special_spaces, "stairs");
        response.has_fireplace = contains(special_spaces, "fireplace");
        response.has_dressing = contains(special_spaces, "dressing");
        response.has_office = contains(special_spaces, "office");

        response.kitchen_equipment = reader.choices("kitchen_equipment").to_vec();
        if let Some(value) = reader.choice("cooking_frequency") {
            response.cooking_frequency = CookingFrequency::parse(value)
                .ok_or_else(|| unknown("cooking_frequency", value))?;
        }

        if let Some(value) = reader.number("bathroom_count")? {
            response.bathroom_count = value;
        }
        response.bathroom_features = reader.choices("bathroom_features").to_vec();

        // The snapshot default assumes a washing machine; only an explicit
        // laundry answer overrides it.
        if let Some(laundry) = reader.answered_choices("laundry_equipment") {
            response.has_washing_machine = contains(laundry, "washing_machine");
            response.has_dryer = contains(laundry, "dryer");
            response.laundry_features = laundry
                .iter()
                .filter(|value| !matches!(value.as_str(), "washing_machine" | "dryer"))
                .cloned()
                .collect();
        }

        if let Some(value) = reader.choice("floor_type") {
            response.floor_type =
                FloorType::parse(value).ok_or_else(|| unknown("floor_type", value))?;
        }
        response.furniture_types = reader.choices("furniture_types").to_vec();
        response.robots = reader.choices("robots").to_vec();

        if let Some(value) = reader.choice("has_outdoor_space") {
            response.outdoor_type = OutdoorType::parse(value);
            response.has_outdoor_space = response.outdoor_type.is_some();
        }
        if response.has_outdoor_space {
            response.outdoor_features = reader.choices("outdoor_features").to_vec();
        }

        response.animals = normalize_exclusive_selection(reader.choices("animals"));

        response.has_children = reader.choice("has_children") == Some("yes");
        if response.has_children {
            let details = reader.choices("children_details");
            response.has_baby = contains(details, "baby");
            response.children_play_outside = contains(details, "plays_outside");
        }

        if let Some(value) = reader.number("household_size")? {
            response.household_size = value;
        }
        let lifestyle = reader.choices("lifestyle");
        response.is_shared_housing = contains(lifestyle, "shared_housing");
        response.works_from_home = contains(lifestyle, "works_from_home");

        if let Some(value) = reader.choice("water_hardness") {
            response.water_hardness =
                WaterHardness::parse(value).ok_or_else(|| unknown("water_hardness", value))?;
        }
        let environment = reader.choices("environment");
        response.high_dust_area = contains(environment, "high_dust");
        response.high_pollen_area = contains(environment, "high_pollen");
        response.allergies = normalize_exclusive_selection(reader.choices("allergies"));

        if let Some(value) = reader.number("cleanliness_level")? {
            response.cleanliness_level =
                u8::try_from(value).map_err(|_| out_of_range("cleanliness_level", value))?;
        }
        if let Some(value) = reader.number("available_minutes_daily")? {
            response.available_minutes_daily = value;
        }

        response.validate()?;
        Ok(response)
    }
}

struct AnswerReader<'a> {
    answers: &'a WizardAnswers,
}

impl<'a> AnswerReader<'a> {
    fn choice(&self, id: &str) -> Option<&'a str> {
        self.answers.get(id).and_then(AnswerValue::as_choice)
    }

    fn answered_choices(&self, id: &str) -> Option<&'a [String]> {
        self.answers.get(id).and_then(AnswerValue::as_choices)
    }

    fn choices(&self, id: &str) -> &'a [String] {
        self.answered_choices(id).unwrap_or_default()
    }

    fn number(&self, id: &'static str) -> Result<Option<u32>, ValidationError> {
        let Some(answer) = self.answers.get(id) else {
            return Ok(None);
        };
        let value = answer
            .as_integer()
            .ok_or(ValidationError::WrongAnswerType(id))?;
        u32::try_from(value)
            .map(Some)
            .map_err(|_| ValidationError::OutOfRange {
                field: id,
                value,
                min: 0,
                max: i64::from(u32::MAX),
            })
    }
}

fn contains(values: &[String], expected: &str) -> bool {
    values.iter().any(|value| value == expected)
}

fn unknown(question: &'static str, value: &str) -> ValidationError {
    ValidationError::UnknownOption {
        question,
        value: value.to_string(),
    }
}

fn out_of_range(field: &'static str, value: u32) -> ValidationError {
    ValidationError::OutOfRange {
        field,
        value: i64::from(value),
        min: 1,
        max: 5,
    }
}
