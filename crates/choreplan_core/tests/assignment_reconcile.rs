use choreplan_core::db::open_db_in_memory;
use choreplan_core::{
    AssignmentService, HouseholdTask, HouseholdTaskRepository, QuestionnaireResponse,
    SqliteHouseholdTaskRepository, SqliteTemplateRepository, TaskTemplate, TemplateId,
};
use rusqlite::Connection;
use std::collections::BTreeSet;
use uuid::Uuid;

fn seed_catalog(conn: &Connection, templates: &[TaskTemplate]) {
    SqliteTemplateRepository::try_new(conn)
        .unwrap()
        .import_templates(templates)
        .unwrap();
}

fn service(
    conn: &Connection,
) -> AssignmentService<SqliteTemplateRepository<'_>, SqliteHouseholdTaskRepository<'_>> {
    AssignmentService::new(
        SqliteTemplateRepository::try_new(conn).unwrap(),
        SqliteHouseholdTaskRepository::try_new(conn).unwrap(),
    )
}

#[test]
fn apply_replaces_three_existing_rows_with_five_resolved() {
    let conn = open_db_in_memory().unwrap();
    let old_templates: Vec<TaskTemplate> = (0..3)
        .map(|index| TaskTemplate::new(format!("Ancienne tâche {index}"), 5))
        .collect();
    let new_templates: Vec<TaskTemplate> = (0..5)
        .map(|index| TaskTemplate::new(format!("Nouvelle tâche {index}"), 10))
        .collect();
    seed_catalog(&conn, &old_templates);

    let household_id = Uuid::new_v4();
    let mut tasks = SqliteHouseholdTaskRepository::try_new(&conn).unwrap();
    let existing: Vec<HouseholdTask> = old_templates
        .iter()
        .map(|template| HouseholdTask {
            id: Uuid::new_v4(),
            household_id,
            template_id: template.id,
            is_active: true,
            points_value: 5,
            interval_days: 7,
        })
        .collect();
    tasks.insert_household_tasks(&existing).unwrap();
    assert_eq!(tasks.list_household_tasks(household_id).unwrap().len(), 3);

    let plan = choreplan_core::resolve_assignments(
        &QuestionnaireResponse::for_household(household_id),
        &new_templates,
    );
    assert_eq!(plan.assigned_count, 5);
    seed_catalog(&conn, &new_templates);

    let mut service = service(&conn);
    let outcome = service
        .apply_assignments(household_id, &plan.assignments)
        .unwrap();
    assert_eq!(outcome.created, 5);
    assert_eq!(outcome.updated, 0);
    assert_eq!(outcome.deleted_implicitly, 3);

    let rows = service.list_household_tasks(household_id).unwrap();
    assert_eq!(rows.len(), 5);
    let persisted: BTreeSet<TemplateId> = rows.iter().map(|row| row.template_id).collect();
    let expected: BTreeSet<TemplateId> = new_templates.iter().map(|template| template.id).collect();
    assert_eq!(persisted, expected);
    assert!(rows.iter().all(|row| row.is_active && row.points_value == 10));
}

#[test]
fn apply_leaves_other_households_untouched() {
    let conn = open_db_in_memory().unwrap();
    let templates = vec![TaskTemplate::new("Arroser les plantes", 3)];
    seed_catalog(&conn, &templates);

    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let mut service = service(&conn);
    for household_id in [first, second] {
        let plan = service
            .preview(&QuestionnaireResponse::for_household(household_id))
            .unwrap();
        service
            .apply_assignments(household_id, &plan.assignments)
            .unwrap();
    }

    let outcome = service.apply_assignments(first, &[]).unwrap();
    assert_eq!(outcome.deleted_implicitly, 1);
    assert!(service.list_household_tasks(first).unwrap().is_empty());
    assert_eq!(service.list_household_tasks(second).unwrap().len(), 1);
}

#[test]
fn reapplying_same_plan_is_stable() {
    let conn = open_db_in_memory().unwrap();
    let templates = vec![
        TaskTemplate::new("Faire la vaisselle", 5).with_condition(Some("cuisine_frequente")),
        TaskTemplate::new("Nettoyer le four", 12)
            .with_difficulty(4)
            .with_condition(Some("four")),
    ];
    seed_catalog(&conn, &templates);

    let household_id = Uuid::new_v4();
    let responses = QuestionnaireResponse::for_household(household_id);
    let mut service = service(&conn);
    let plan = service.preview(&responses).unwrap();

    service
        .apply_assignments(household_id, &plan.assignments)
        .unwrap();
    let first: BTreeSet<TemplateId> = service
        .list_household_tasks(household_id)
        .unwrap()
        .iter()
        .map(|row| row.template_id)
        .collect();

    let outcome = service
        .apply_assignments(household_id, &plan.assignments)
        .unwrap();
    let second: BTreeSet<TemplateId> = service
        .list_household_tasks(household_id)
        .unwrap()
        .iter()
        .map(|row| row.template_id)
        .collect();

    assert_eq!(first, second);
    assert_eq!(outcome.deleted_implicitly, outcome.created);
}

#[test]
fn failed_insert_rolls_back_the_delete() {
    let conn = open_db_in_memory().unwrap();
    let templates = vec![TaskTemplate::new("Passer la serpillière", 8)];
    seed_catalog(&conn, &templates);

    let household_id = Uuid::new_v4();
    let mut tasks = SqliteHouseholdTaskRepository::try_new(&conn).unwrap();
    let kept = HouseholdTask {
        id: Uuid::new_v4(),
        household_id,
        template_id: templates[0].id,
        is_active: true,
        points_value: 8,
        interval_days: 7,
    };
    tasks.insert_household_tasks(&[kept.clone()]).unwrap();

    let dangling = HouseholdTask {
        id: Uuid::new_v4(),
        household_id,
        template_id: Uuid::new_v4(),
        is_active: true,
        points_value: 8,
        interval_days: 7,
    };
    let err = tasks
        .replace_household_tasks(household_id, &[dangling])
        .unwrap_err();
    assert_eq!(err.stage, choreplan_core::ReplaceStage::Insert);
    assert!(!err.delete_committed);

    assert_eq!(tasks.list_household_tasks(household_id).unwrap(), vec![kept]);
}
