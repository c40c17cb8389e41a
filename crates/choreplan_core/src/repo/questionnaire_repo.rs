//! Questionnaire snapshot repository.
//!
//! # Invariants
//! - One row per household; writes overwrite the previous snapshot.
//! - Payloads are JSON; fields missing from older payloads take defaults.
//! - A payload bound to another household is rejected on read.

use crate::model::questionnaire::{HouseholdId, QuestionnaireResponse};
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

pub trait QuestionnaireRepository {
    /// Stores `response` as the household's latest snapshot.
    fn upsert_questionnaire_response(&mut self, response: &QuestionnaireResponse)
        -> RepoResult<()>;

    fn get_questionnaire_response(
        &self,
        household_id: HouseholdId,
    ) -> RepoResult<Option<QuestionnaireResponse>>;
}

pub struct SqliteQuestionnaireRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuestionnaireRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["questionnaire_responses"])?;
        Ok(Self { conn })
    }
}

impl QuestionnaireRepository for SqliteQuestionnaireRepository<'_> {
    fn upsert_questionnaire_response(
        &mut self,
        response: &QuestionnaireResponse,
    ) -> RepoResult<()> {
        response.validate()?;
        let payload = serde_json::to_string(response)?;

        self.conn.execute(
            "INSERT INTO questionnaire_responses (household_id, payload)
             VALUES (?1, ?2)
             ON CONFLICT(household_id) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![response.household_id.to_string(), payload],
        )?;
        Ok(())
    }

    fn get_questionnaire_response(
        &self,
        household_id: HouseholdId,
    ) -> RepoResult<Option<QuestionnaireResponse>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM questionnaire_responses WHERE household_id = ?1;",
                [household_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        let mut response: QuestionnaireResponse = serde_json::from_str(&payload)?;
        if response.household_id.is_nil() {
            response.household_id = household_id;
        } else if response.household_id != household_id {
            return Err(RepoError::InvalidData(format!(
                "questionnaire payload for `{household_id}` is bound to `{}`",
                response.household_id
            )));
        }
        Ok(Some(response))
    }
}
