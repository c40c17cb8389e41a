//! Static questionnaire definition and answer checks.
//!
//! # Responsibility
//! - Declare wizard questions in display order with their option sets.
//! - Evaluate per-question visibility against earlier answers.
//! - Validate raw wizard answers against question types and options.
//!
//! # Invariants
//! - Visibility only references questions that appear earlier in the list.
//! - Hidden questions are never required and their answers are ignored.
//! - Multi-choice questions may be left unanswered.

use crate::model::questionnaire::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw answers keyed by question id, as posted by the wizard.
pub type WizardAnswers = BTreeMap<String, AnswerValue>;

/// One raw wizard answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Flag(bool),
    Number(i64),
    Choice(String),
    Choices(Vec<String>),
}

impl AnswerValue {
    pub fn as_choice(&self) -> Option<&str> {
        match self {
            Self::Choice(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Self::Choices(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    /// Accepts numbers and numeric strings; form inputs post the latter.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Choice(value) => value.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionType {
    Single,
    Multiple,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionOption {
    pub value: &'static str,
    pub label: &'static str,
    pub description: Option<&'static str>,
}

/// Match rule applied to the referenced answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityRule {
    Equals(&'static str),
    OneOf(&'static [&'static str]),
    Flag(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleWhen {
    pub field: &'static str,
    pub rule: VisibilityRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: &'static str,
    pub kind: QuestionType,
    pub prompt: &'static str,
    pub description: Option<&'static str>,
    pub options: &'static [QuestionOption],
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub visible_when: Option<VisibleWhen>,
}

impl Question {
    const fn single(
        id: &'static str,
        prompt: &'static str,
        options: &'static [QuestionOption],
    ) -> Self {
        Self {
            id,
            kind: QuestionType::Single,
            prompt,
            description: None,
            options,
            min: None,
            max: None,
            visible_when: None,
        }
    }

    const fn multiple(
        id: &'static str,
        prompt: &'static str,
        options: &'static [QuestionOption],
    ) -> Self {
        Self {
            kind: QuestionType::Multiple,
            ..Self::single(id, prompt, options)
        }
    }

    const fn number(id: &'static str, prompt: &'static str, min: i64, max: i64) -> Self {
        Self {
            kind: QuestionType::Number,
            min: Some(min),
            max: Some(max),
            ..Self::single(id, prompt, &[])
        }
    }

    const fn described(self, description: &'static str) -> Self {
        Self {
            description: Some(description),
            ..self
        }
    }

    const fn shown_when(self, field: &'static str, rule: VisibilityRule) -> Self {
        Self {
            visible_when: Some(VisibleWhen { field, rule }),
            ..self
        }
    }

    /// Returns whether this question applies given earlier answers.
    ///
    /// A missing referenced answer hides the question.
    pub fn is_visible(&self, answers: &WizardAnswers) -> bool {
        let Some(condition) = self.visible_when else {
            return true;
        };
        let Some(answer) = answers.get(condition.field) else {
            return false;
        };

        match (condition.rule, answer) {
            (VisibilityRule::Equals(expected), AnswerValue::Choice(value)) => value == expected,
            (VisibilityRule::Equals(expected), AnswerValue::Choices(values)) => {
                values.iter().any(|value| value == expected)
            }
            (VisibilityRule::OneOf(expected), AnswerValue::Choice(value)) => {
                expected.contains(&value.as_str())
            }
            (VisibilityRule::OneOf(expected), AnswerValue::Choices(values)) => values
                .iter()
                .any(|value| expected.contains(&value.as_str())),
            (VisibilityRule::Flag(expected), AnswerValue::Flag(value)) => *value == expected,
            _ => false,
        }
    }

    /// Whether a visible question must be answered.
    pub fn is_required(&self) -> bool {
        self.kind != QuestionType::Multiple
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.value == value)
    }

    /// Checks one answer against this question's type, options and bounds.
    pub fn check_answer(&self, answer: &AnswerValue) -> Result<(), ValidationError> {
        match self.kind {
            QuestionType::Single => {
                let value = answer
                    .as_choice()
                    .ok_or(ValidationError::WrongAnswerType(self.id))?;
                self.ensure_option(value)
            }
            QuestionType::Multiple => {
                let values = answer
                    .as_choices()
                    .ok_or(ValidationError::WrongAnswerType(self.id))?;
                values
                    .iter()
                    .try_for_each(|value| self.ensure_option(value.as_str()))
            }
            QuestionType::Number => {
                let value = answer
                    .as_integer()
                    .ok_or(ValidationError::WrongAnswerType(self.id))?;
                let min = self.min.unwrap_or(i64::MIN);
                let max = self.max.unwrap_or(i64::MAX);
                if value < min || value > max {
                    return Err(ValidationError::OutOfRange {
                        field: self.id,
                        value,
                        min,
                        max,
                    });
                }
                Ok(())
            }
        }
    }

    fn ensure_option(&self, value: &str) -> Result<(), ValidationError> {
        if self.has_option(value) {
            Ok(())
        } else {
            Err(ValidationError::UnknownOption {
                question: self.id,
                value: value.to_string(),
            })
        }
    }
}

const fn opt(value: &'static str, label: &'static str) -> QuestionOption {
    QuestionOption {
        value,
        label,
        description: None,
    }
}

const fn opt_described(
    value: &'static str,
    label: &'static str,
    description: &'static str,
) -> QuestionOption {
    QuestionOption {
        value,
        label,
        description: Some(description),
    }
}

const OUTDOOR_KINDS: &[&str] = &["balcony", "terrace", "garden"];

const QUESTIONNAIRE: &[Question] = &[
    Question::single(
        "housing_type",
        "Quel type de logement habitez-vous ?",
        &[opt("apartment", "Appartement"), opt("house", "Maison")],
    )
    .described("Cela détermine les tâches spécifiques à votre habitat"),
    Question::number(
        "room_count",
        "Combien de pièces principales avez-vous ?",
        1,
        15,
    )
    .described("Chambres, salon, bureau, etc. (hors cuisine et SDB)"),
    Question::multiple(
        "special_spaces",
        "Quels espaces spéciaux avez-vous ?",
        &[
            opt("stairs", "Escaliers"),
            opt("fireplace", "Cheminée / Poêle"),
            opt("dressing", "Dressing"),
            opt("office", "Bureau / Espace de travail"),
        ],
    ),
    Question::multiple(
        "kitchen_equipment",
        "Quels équipements de cuisine avez-vous ?",
        &[
            opt("oven", "Four"),
            opt("microwave", "Micro-ondes"),
            opt("hood", "Hotte aspirante"),
            opt("dishwasher", "Lave-vaisselle"),
            opt("freezer", "Congélateur"),
            opt("toaster", "Grille-pain"),
            opt_described("food_processor", "Robot de cuisine", "Mixeur, blender, etc."),
            opt_described("thermomix", "Robot cuiseur", "Thermomix ou équivalent"),
            opt("plancha_bbq", "Plancha / BBQ intérieur"),
            opt("compost", "Compost / Poubelle bio"),
            opt("pantry", "Garde-manger"),
        ],
    ),
    Question::single(
        "cooking_frequency",
        "À quelle fréquence cuisinez-vous ?",
        &[
            opt_described("never", "Jamais", "Restauration uniquement"),
            opt_described("rare", "Rarement", "1-2 fois par semaine"),
            opt_described("regular", "Régulièrement", "3-5 fois par semaine"),
            opt("daily", "Tous les jours"),
        ],
    ),
    Question::number(
        "bathroom_count",
        "Combien de salles de bain/douche avez-vous ?",
        1,
        5,
    ),
    Question::multiple(
        "bathroom_features",
        "Quels équipements dans vos salles de bain ?",
        &[
            opt("bathtub", "Baignoire"),
            opt("shower_door", "Paroi de douche en verre"),
            opt("shower_curtain", "Rideau de douche"),
            opt("bidet", "Bidet"),
            opt("bath_mat", "Tapis de bain"),
        ],
    ),
    Question::multiple(
        "laundry_equipment",
        "Quels équipements de buanderie avez-vous ?",
        &[
            opt("washing_machine", "Lave-linge"),
            opt("dryer", "Sèche-linge"),
            opt("ironing", "Fer à repasser / Centrale vapeur"),
            opt("outdoor_clothes", "Vêtements techniques / outdoor"),
        ],
    ),
    Question::single(
        "floor_type",
        "Quel est le type de sol majoritaire ?",
        &[
            opt("tile", "Carrelage"),
            opt("wood", "Parquet / Bois"),
            opt("carpet", "Moquette"),
            opt("mixed", "Mixte (plusieurs types)"),
        ],
    ),
    Question::multiple(
        "furniture_types",
        "Quels types de mobilier avez-vous ?",
        &[
            opt("wood_furniture", "Meubles en bois"),
            opt("leather_sofa", "Canapé en cuir"),
            opt("fabric_sofa", "Canapé en tissu"),
            opt("rugs", "Tapis / Moquettes"),
            opt("curtains", "Rideaux / Voilages"),
            opt("blinds", "Stores / Volets"),
        ],
    ),
    Question::multiple(
        "robots",
        "Avez-vous des robots ménagers ?",
        &[
            opt("vacuum", "Robot aspirateur"),
            opt("mop", "Robot laveur"),
            opt("self_empty", "Station auto-vidage"),
            opt("window", "Robot lave-vitres"),
            opt("lawn_mower", "Robot tondeuse"),
        ],
    )
    .described("Ils nécessitent un entretien régulier"),
    Question::single(
        "has_outdoor_space",
        "Avez-vous un espace extérieur ?",
        &[
            opt("no", "Non"),
            opt("balcony", "Balcon"),
            opt("terrace", "Terrasse"),
            opt("garden", "Jardin"),
        ],
    ),
    Question::multiple(
        "outdoor_features",
        "Quels éléments dans votre espace extérieur ?",
        &[
            opt("lawn", "Pelouse"),
            opt("hedges", "Haies / Arbustes"),
            opt("vegetable_garden", "Potager"),
            opt("garden_furniture", "Mobilier de jardin"),
            opt("garden_shed", "Abri de jardin / Cabanon"),
            opt("bbq", "Barbecue / Plancha extérieure"),
            opt("pool", "Piscine"),
            opt("jacuzzi", "Jacuzzi / Spa"),
            opt("gutters", "Gouttières"),
            opt("garage", "Garage"),
        ],
    )
    .shown_when("has_outdoor_space", VisibilityRule::OneOf(OUTDOOR_KINDS)),
    Question::multiple(
        "animals",
        "Avez-vous des animaux de compagnie ?",
        &[
            opt("none", "Aucun animal"),
            opt("cat", "Chat(s)"),
            opt("dog", "Chien(s)"),
            opt("aquarium", "Aquarium / Poissons"),
            opt_described(
                "rodent_bird",
                "Rongeurs / Oiseaux",
                "Hamster, lapin, perruche...",
            ),
            opt_described("reptile", "Reptiles", "Terrarium, vivarium"),
        ],
    ),
    Question::single(
        "has_children",
        "Y a-t-il des enfants dans le foyer ?",
        &[opt("no", "Non"), opt("yes", "Oui")],
    ),
    Question::multiple(
        "children_details",
        "Précisions sur les enfants",
        &[
            opt_described("baby", "Bébé (0-2 ans)", "Nécessite stérilisation, etc."),
            opt("plays_outside", "Jouent à l'extérieur"),
        ],
    )
    .shown_when("has_children", VisibilityRule::Equals("yes")),
    Question::number(
        "household_size",
        "Combien de personnes vivent dans le foyer ?",
        1,
        15,
    ),
    Question::multiple(
        "lifestyle",
        "Votre mode de vie",
        &[
            opt("shared_housing", "Colocation"),
            opt("works_from_home", "Télétravail"),
        ],
    ),
    Question::single(
        "water_hardness",
        "Quelle est la dureté de votre eau ?",
        &[
            opt_described("soft", "Douce", "Peu de calcaire"),
            opt_described("medium", "Moyenne", "Calcaire modéré"),
            opt_described("hard", "Dure", "Beaucoup de calcaire"),
        ],
    )
    .described("Influence la fréquence de détartrage"),
    Question::multiple(
        "environment",
        "Votre environnement",
        &[
            opt("high_dust", "Zone poussiéreuse"),
            opt("high_pollen", "Zone pollinique"),
        ],
    ),
    Question::multiple(
        "allergies",
        "Y a-t-il des allergies dans le foyer ?",
        &[
            opt("none", "Aucune allergie"),
            opt("dust", "Poussière / Acariens"),
            opt("pollen", "Pollen"),
            opt("mold", "Moisissures"),
            opt("pets", "Poils d'animaux"),
        ],
    ),
    Question::single(
        "cleanliness_level",
        "Quel est votre niveau d'exigence de propreté ?",
        &[
            opt("1", "Très relax"),
            opt("2", "Relax"),
            opt("3", "Standard"),
            opt("4", "Exigeant"),
            opt("5", "Très exigeant"),
        ],
    ),
    Question::single(
        "available_minutes_daily",
        "Combien de minutes par jour pour le ménage ?",
        &[
            opt("15", "15 minutes"),
            opt("30", "30 minutes"),
            opt("45", "45 minutes"),
            opt("60", "1 heure"),
            opt("90", "1h30"),
            opt("120", "2 heures+"),
        ],
    ),
];

/// Returns all wizard questions in display order.
pub fn questionnaire() -> &'static [Question] {
    QUESTIONNAIRE
}

pub fn find_question(id: &str) -> Option<&'static Question> {
    QUESTIONNAIRE.iter().find(|question| question.id == id)
}

/// Validates raw answers for every visible question.
///
/// # Errors
/// - `MissingAnswer` when a visible single/number question is unanswered.
/// - `WrongAnswerType`, `UnknownOption`, `OutOfRange` for bad values.
pub fn validate_answers(answers: &WizardAnswers) -> Result<(), ValidationError> {
    for question in QUESTIONNAIRE {
        if !question.is_visible(answers) {
            continue;
        }
        match answers.get(question.id) {
            Some(answer) => question.check_answer(answer)?,
            None if question.is_required() => {
                return Err(ValidationError::MissingAnswer(question.id));
            }
            None => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        find_question, questionnaire, validate_answers, AnswerValue, Question, QuestionType,
        VisibilityRule, WizardAnswers,
    };
    use crate::model::questionnaire::ValidationError;
    use std::collections::HashSet;

    fn choice(value: &str) -> AnswerValue {
        AnswerValue::Choice(value.to_string())
    }

    fn choices(values: &[&str]) -> AnswerValue {
        AnswerValue::Choices(values.iter().map(|value| value.to_string()).collect())
    }

    fn minimal_answers() -> WizardAnswers {
        let mut answers = WizardAnswers::new();
        answers.insert("housing_type".into(), choice("apartment"));
        answers.insert("room_count".into(), AnswerValue::Number(3));
        answers.insert("cooking_frequency".into(), choice("regular"));
        answers.insert("bathroom_count".into(), AnswerValue::Number(1));
        answers.insert("floor_type".into(), choice("tile"));
        answers.insert("has_outdoor_space".into(), choice("no"));
        answers.insert("has_children".into(), choice("no"));
        answers.insert("household_size".into(), choice("2"));
        answers.insert("water_hardness".into(), choice("medium"));
        answers.insert("cleanliness_level".into(), choice("3"));
        answers.insert("available_minutes_daily".into(), choice("45"));
        answers
    }

    #[test]
    fn question_ids_are_unique() {
        let ids: HashSet<_> = questionnaire().iter().map(|question| question.id).collect();
        assert_eq!(ids.len(), questionnaire().len());
    }

    #[test]
    fn visibility_only_references_earlier_questions() {
        let mut seen = HashSet::new();
        for question in questionnaire() {
            if let Some(condition) = question.visible_when {
                assert!(seen.contains(condition.field), "{}", question.id);
            }
            seen.insert(question.id);
        }
    }

    #[test]
    fn outdoor_features_visible_only_with_outdoor_space() {
        let question = find_question("outdoor_features").expect("question exists");
        let mut answers = WizardAnswers::new();
        assert!(!question.is_visible(&answers));

        answers.insert("has_outdoor_space".into(), choice("no"));
        assert!(!question.is_visible(&answers));

        answers.insert("has_outdoor_space".into(), choice("terrace"));
        assert!(question.is_visible(&answers));
    }

    #[test]
    fn children_details_visible_only_when_children_present() {
        let question = find_question("children_details").expect("question exists");
        let mut answers = WizardAnswers::new();
        answers.insert("has_children".into(), choice("yes"));
        assert!(question.is_visible(&answers));
        answers.insert("has_children".into(), choice("no"));
        assert!(!question.is_visible(&answers));
    }

    #[test]
    fn minimal_answers_validate() {
        validate_answers(&minimal_answers()).expect("minimal answers should be valid");
    }

    #[test]
    fn missing_required_answer_is_reported() {
        let mut answers = minimal_answers();
        answers.remove("floor_type");
        assert_eq!(
            validate_answers(&answers),
            Err(ValidationError::MissingAnswer("floor_type"))
        );
    }

    #[test]
    fn unknown_option_and_range_errors_are_reported() {
        let mut answers = minimal_answers();
        answers.insert("robots".into(), choices(&["vacuum", "jetpack"]));
        assert!(matches!(
            validate_answers(&answers),
            Err(ValidationError::UnknownOption { question: "robots", .. })
        ));

        let mut answers = minimal_answers();
        answers.insert("room_count".into(), AnswerValue::Number(40));
        assert!(matches!(
            validate_answers(&answers),
            Err(ValidationError::OutOfRange { field: "room_count", .. })
        ));
    }

    #[test]
    fn hidden_question_answers_are_not_checked() {
        let mut answers = minimal_answers();
        answers.insert("outdoor_features".into(), choices(&["moat"]));
        validate_answers(&answers).expect("hidden answers are ignored");
    }

    #[test]
    fn flag_rule_requires_matching_boolean_answer() {
        let question = Question::number("pets_count", "Combien ?", 0, 10)
            .shown_when("has_pets", VisibilityRule::Flag(true));
        let mut answers = WizardAnswers::new();
        assert!(!question.is_visible(&answers));

        answers.insert("has_pets".into(), AnswerValue::Flag(true));
        assert!(question.is_visible(&answers));

        answers.insert("has_pets".into(), AnswerValue::Flag(false));
        assert!(!question.is_visible(&answers));

        answers.insert("has_pets".into(), choice("true"));
        assert!(!question.is_visible(&answers));
    }

    #[test]
    fn multi_choice_questions_are_optional() {
        for question in questionnaire() {
            assert_eq!(
                question.is_required(),
                question.kind != QuestionType::Multiple
            );
        }
    }

    #[test]
    fn untagged_answers_deserialize_by_shape() {
        let answers: WizardAnswers = serde_json::from_str(
            r#"{"room_count":3,"housing_type":"house","robots":["vacuum"],"flag":true}"#,
        )
        .expect("answers should parse");
        assert_eq!(answers["room_count"], AnswerValue::Number(3));
        assert_eq!(answers["housing_type"], choice("house"));
        assert_eq!(answers["robots"], choices(&["vacuum"]));
        assert_eq!(answers["flag"], AnswerValue::Flag(true));
    }
}
