//! Condition code derivation.
//!
//! # Responsibility
//! - Map a questionnaire snapshot to the set of active condition codes.
//! - Own the closed condition vocabulary referenced by catalog templates.
//!
//! # Invariants
//! - Derivation is pure, total and deterministic; absent fields mean
//!   "feature absent".
//! - Unmapped equipment/feature tags are ignored, never rejected.
//! - `pas_robot_aspirateur` is the only negatively derived code.

use crate::model::questionnaire::{
    CookingFrequency, FloorType, HousingType, OutdoorType, QuestionnaireResponse, WaterHardness,
};
use std::collections::BTreeSet;

/// Normalized tag describing one derived household fact.
pub type ConditionCode = &'static str;

/// Ordered set of active condition codes.
pub type ConditionSet = BTreeSet<ConditionCode>;

pub const NO_ROBOT_VACUUM: ConditionCode = "pas_robot_aspirateur";

const KITCHEN_CODES: &[(&str, ConditionCode)] = &[
    ("toaster", "grille_pain"),
    ("food_processor", "robot_cuisine"),
    ("thermomix", "robot_cuiseur"),
    ("plancha_bbq", "plancha_bbq"),
    ("compost", "compost"),
    ("pantry", "garde_manger"),
    ("dishwasher", "lave_vaisselle"),
    ("oven", "four"),
    ("microwave", "micro_ondes"),
    ("hood", "hotte"),
    ("freezer", "congelateur"),
];

const BATHROOM_CODES: &[(&str, ConditionCode)] = &[
    ("shower_door", "paroi_douche"),
    ("shower_curtain", "rideau_douche"),
    ("bidet", "bidet"),
    ("bath_mat", "tapis_bain"),
    ("bathtub", "baignoire"),
];

const LAUNDRY_CODES: &[(&str, ConditionCode)] = &[
    ("ironing", "repassage"),
    ("outdoor_clothes", "vetements_outdoor"),
];

const FURNITURE_CODES: &[(&str, ConditionCode)] = &[
    ("wood_furniture", "meubles_bois"),
    ("leather_sofa", "canape_cuir"),
    ("fabric_sofa", "canape_tissu"),
    ("rugs", "tapis"),
    ("curtains", "rideaux"),
    ("blinds", "stores"),
];

const ROBOT_CODES: &[(&str, ConditionCode)] = &[
    ("vacuum", "robot_aspirateur"),
    ("mop", "robot_laveur"),
    ("self_empty", "robot_station_autovidage"),
    ("window", "robot_vitres"),
    ("lawn_mower", "robot_tondeuse"),
];

const OUTDOOR_FEATURE_CODES: &[(&str, ConditionCode)] = &[
    ("lawn", "pelouse"),
    ("hedges", "haies"),
    ("gutters", "gouttiere"),
    ("bbq", "barbecue"),
    ("pool", "piscine"),
    ("jacuzzi", "jacuzzi"),
    ("garage", "garage"),
    ("vegetable_garden", "potager"),
    ("garden_furniture", "mobilier_jardin"),
    ("garden_shed", "abri_jardin"),
];

const ANIMAL_CODES: &[(&str, ConditionCode)] = &[
    ("cat", "chat"),
    ("dog", "chien"),
    ("aquarium", "aquarium"),
    ("rodent_bird", "rongeur_oiseau"),
    ("reptile", "reptile"),
];

const ALLERGY_CODES: &[(&str, ConditionCode)] = &[
    ("dust", "allergie_poussiere"),
    ("pollen", "allergie_pollen"),
    ("mold", "allergie_moisissures"),
    ("pets", "allergie_animaux"),
];

/// Every condition code the deriver can emit, grouped by questionnaire domain.
pub const ALL_CONDITION_CODES: &[ConditionCode] = &[
    // housing
    "maison",
    "appartement",
    "escaliers",
    "cheminee",
    "dressing",
    "bureau",
    // kitchen
    "grille_pain",
    "robot_cuisine",
    "robot_cuiseur",
    "plancha_bbq",
    "compost",
    "garde_manger",
    "lave_vaisselle",
    "four",
    "micro_ondes",
    "hotte",
    "congelateur",
    "cuisine_frequente",
    // bathroom
    "paroi_douche",
    "rideau_douche",
    "bidet",
    "tapis_bain",
    "baignoire",
    // laundry
    "lave_linge",
    "seche_linge",
    "repassage",
    "vetements_outdoor",
    // furniture and floors
    "meubles_bois",
    "canape_cuir",
    "canape_tissu",
    "tapis",
    "rideaux",
    "stores",
    "sol_carrelage",
    "sol_parquet",
    "sol_moquette",
    "sol_mixte",
    // robots
    "robot_aspirateur",
    "robot_laveur",
    "robot_station_autovidage",
    "robot_vitres",
    "robot_tondeuse",
    NO_ROBOT_VACUUM,
    // outdoor
    "exterieur",
    "jardin",
    "terrasse",
    "balcon",
    "pelouse",
    "haies",
    "gouttiere",
    "barbecue",
    "piscine",
    "jacuzzi",
    "garage",
    "potager",
    "mobilier_jardin",
    "abri_jardin",
    // animals
    "animaux",
    "chat",
    "chien",
    "aquarium",
    "rongeur_oiseau",
    "reptile",
    // children
    "enfants",
    "bebe",
    "enfants_exterieur",
    // lifestyle
    "colocation",
    "teletravail",
    // environment
    "eau_douce",
    "eau_moyenne",
    "eau_dure",
    "zone_poussiere",
    "zone_pollen",
    "allergies",
    "allergie_poussiere",
    "allergie_pollen",
    "allergie_moisissures",
    "allergie_animaux",
];

/// Returns whether `code` belongs to the derivable vocabulary.
pub fn is_known_condition_code(code: &str) -> bool {
    ALL_CONDITION_CODES.contains(&code)
}

/// Derives every active condition code for one household snapshot.
pub fn derive_condition_codes(responses: &QuestionnaireResponse) -> ConditionSet {
    let mut conditions = ConditionSet::new();

    derive_housing(responses, &mut conditions);
    derive_kitchen(responses, &mut conditions);
    map_tags(
        &responses.bathroom_features,
        BATHROOM_CODES,
        &mut conditions,
    );
    derive_laundry(responses, &mut conditions);
    derive_furniture(responses, &mut conditions);
    derive_robots(responses, &mut conditions);
    derive_outdoor(responses, &mut conditions);
    derive_household(responses, &mut conditions);
    derive_environment(responses, &mut conditions);

    conditions
}

fn derive_housing(responses: &QuestionnaireResponse, conditions: &mut ConditionSet) {
    conditions.insert(match responses.housing_type {
        HousingType::House => "maison",
        HousingType::Apartment => "appartement",
    });
    insert_if(conditions, responses.has_stairs, "escaliers");
    insert_if(conditions, responses.has_fireplace, "cheminee");
    insert_if(conditions, responses.has_dressing, "dressing");
    insert_if(conditions, responses.has_office, "bureau");
}

fn derive_kitchen(responses: &QuestionnaireResponse, conditions: &mut ConditionSet) {
    map_tags(&responses.kitchen_equipment, KITCHEN_CODES, conditions);
    insert_if(
        conditions,
        matches!(
            responses.cooking_frequency,
            CookingFrequency::Daily | CookingFrequency::Regular
        ),
        "cuisine_frequente",
    );
}

fn derive_laundry(responses: &QuestionnaireResponse, conditions: &mut ConditionSet) {
    insert_if(conditions, responses.has_washing_machine, "lave_linge");
    insert_if(conditions, responses.has_dryer, "seche_linge");
    map_tags(&responses.laundry_features, LAUNDRY_CODES, conditions);
}

fn derive_furniture(responses: &QuestionnaireResponse, conditions: &mut ConditionSet) {
    map_tags(&responses.furniture_types, FURNITURE_CODES, conditions);
    conditions.insert(match responses.floor_type {
        FloorType::Tile => "sol_carrelage",
        FloorType::Wood => "sol_parquet",
        FloorType::Carpet => "sol_moquette",
        FloorType::Mixed => "sol_mixte",
    });
}

fn derive_robots(responses: &QuestionnaireResponse, conditions: &mut ConditionSet) {
    map_tags(&responses.robots, ROBOT_CODES, conditions);
    if !responses.robots.iter().any(|robot| robot == "vacuum") {
        conditions.insert(NO_ROBOT_VACUUM);
    }
}

fn derive_outdoor(responses: &QuestionnaireResponse, conditions: &mut ConditionSet) {
    if responses.has_outdoor_space {
        conditions.insert("exterieur");
        match responses.outdoor_type {
            Some(OutdoorType::Garden) => {
                conditions.insert("jardin");
            }
            Some(OutdoorType::Terrace) => {
                conditions.insert("terrasse");
            }
            Some(OutdoorType::Balcony) => {
                conditions.insert("balcon");
            }
            None => {}
        }
    }
    map_tags(
        &responses.outdoor_features,
        OUTDOOR_FEATURE_CODES,
        conditions,
    );
}

fn derive_household(responses: &QuestionnaireResponse, conditions: &mut ConditionSet) {
    if responses.has_real_animals() {
        conditions.insert("animaux");
        map_tags(&responses.animals, ANIMAL_CODES, conditions);
    }

    if responses.has_children {
        conditions.insert("enfants");
        insert_if(conditions, responses.has_baby, "bebe");
        insert_if(
            conditions,
            responses.children_play_outside,
            "enfants_exterieur",
        );
    }

    insert_if(conditions, responses.is_shared_housing, "colocation");
    insert_if(conditions, responses.works_from_home, "teletravail");
}

fn derive_environment(responses: &QuestionnaireResponse, conditions: &mut ConditionSet) {
    conditions.insert(match responses.water_hardness {
        WaterHardness::Soft => "eau_douce",
        WaterHardness::Medium => "eau_moyenne",
        WaterHardness::Hard => "eau_dure",
    });
    insert_if(conditions, responses.high_dust_area, "zone_poussiere");
    insert_if(conditions, responses.high_pollen_area, "zone_pollen");

    map_tags(&responses.allergies, ALLERGY_CODES, conditions);
    insert_if(conditions, responses.has_real_allergies(), "allergies");
}

fn map_tags(tags: &[String], table: &[(&str, ConditionCode)], conditions: &mut ConditionSet) {
    for tag in tags {
        if let Some((_, code)) = table.iter().find(|(answer, _)| *answer == tag.as_str()) {
            conditions.insert(*code);
        }
    }
}

fn insert_if(conditions: &mut ConditionSet, flag: bool, code: ConditionCode) {
    if flag {
        conditions.insert(code);
    }
}
