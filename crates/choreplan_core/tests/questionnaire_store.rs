use choreplan_core::db::open_db_in_memory;
use choreplan_core::{
    QuestionnaireRepository, QuestionnaireResponse, RepoError, SqliteQuestionnaireRepository,
    ValidationError,
};
use uuid::Uuid;

#[test]
fn upsert_overwrites_previous_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqliteQuestionnaireRepository::try_new(&conn).unwrap();
    let household_id = Uuid::new_v4();

    let mut response = QuestionnaireResponse::for_household(household_id);
    repo.upsert_questionnaire_response(&response).unwrap();
    response.cleanliness_level = 5;
    response.animals = vec!["dog".to_string()];
    repo.upsert_questionnaire_response(&response).unwrap();

    let stored = repo.get_questionnaire_response(household_id).unwrap();
    assert_eq!(stored, Some(response));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM questionnaire_responses;", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn unknown_household_has_no_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteQuestionnaireRepository::try_new(&conn).unwrap();
    assert_eq!(repo.get_questionnaire_response(Uuid::new_v4()).unwrap(), None);
}

#[test]
fn invalid_snapshot_is_not_stored() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqliteQuestionnaireRepository::try_new(&conn).unwrap();
    let mut response = QuestionnaireResponse::for_household(Uuid::new_v4());
    response.room_count = 0;

    assert!(matches!(
        repo.upsert_questionnaire_response(&response),
        Err(RepoError::Validation(ValidationError::OutOfRange {
            field: "room_count",
            ..
        }))
    ));
}

#[test]
fn legacy_payload_without_optional_fields_loads_with_defaults() {
    let conn = open_db_in_memory().unwrap();
    let household_id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO questionnaire_responses (household_id, payload) VALUES (?1, ?2);",
        [
            household_id.to_string(),
            r#"{"housing_type":"house","robots":["vacuum"]}"#.to_string(),
        ],
    )
    .unwrap();

    let repo = SqliteQuestionnaireRepository::try_new(&conn).unwrap();
    let stored = repo
        .get_questionnaire_response(household_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.household_id, household_id);
    assert_eq!(stored.robots, vec!["vacuum".to_string()]);
    assert_eq!(stored.cleanliness_level, 3);
    assert_eq!(stored.available_minutes_daily, 45);
}

#[test]
fn payload_bound_to_other_household_is_invalid() {
    let conn = open_db_in_memory().unwrap();
    let household_id = Uuid::new_v4();
    let payload = format!(r#"{{"household_id":"{}"}}"#, Uuid::new_v4());
    conn.execute(
        "INSERT INTO questionnaire_responses (household_id, payload) VALUES (?1, ?2);",
        [household_id.to_string(), payload],
    )
    .unwrap();

    let repo = SqliteQuestionnaireRepository::try_new(&conn).unwrap();
    assert!(matches!(
        repo.get_questionnaire_response(household_id),
        Err(RepoError::InvalidData(_))
    ));
}
