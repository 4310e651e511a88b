use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{LedgerError, Result, is_unique_violation};
use crate::models::{Competition, CompetitionChanges, NewCompetition};

const COMPETITION_COLUMNS: &str =
    "competition_id, title, slug, entry_fee, opens_at, closes_at, created_at";

/// Repository for Competition database operations
pub struct CompetitionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompetitionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all competitions, most recently opened first
    pub async fn list(&self) -> Result<Vec<Competition>> {
        let competitions = sqlx::query_as::<_, Competition>(&format!(
            r#"
            SELECT {COMPETITION_COLUMNS}
            FROM competitions
            ORDER BY opens_at DESC, created_at DESC
            "#
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(competitions)
    }

    pub async fn find_by_id(&self, competition_id: Uuid) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(&format!(
            r#"
            SELECT {COMPETITION_COLUMNS}
            FROM competitions
            WHERE competition_id = $1
            "#
        ))
        .bind(competition_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(LedgerError::NotFound)?;

        Ok(competition)
    }

    pub async fn create(&self, new: &NewCompetition) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(&format!(
            r#"
            INSERT INTO competitions (competition_id, title, slug, entry_fee, opens_at, closes_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COMPETITION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.slug)
        .bind(new.entry_fee)
        .bind(new.opens_at)
        .bind(new.closes_at)
        .fetch_one(self.pool)
        .await
        .map_err(slug_conflict)?;

        Ok(competition)
    }

    /// Only succeeds while nobody has enrolled yet.
    pub async fn update(
        &self,
        competition_id: Uuid,
        changes: &CompetitionChanges,
    ) -> Result<Competition> {
        let updated = sqlx::query_as::<_, Competition>(&format!(
            r#"
            UPDATE competitions
            SET
                title = $2,
                slug = $3,
                entry_fee = $4,
                opens_at = $5,
                closes_at = $6
            WHERE competition_id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM participations WHERE competition_id = $1
              )
            RETURNING {COMPETITION_COLUMNS}
            "#
        ))
        .bind(competition_id)
        .bind(&changes.title)
        .bind(&changes.slug)
        .bind(changes.entry_fee)
        .bind(changes.opens_at)
        .bind(changes.closes_at)
        .fetch_optional(self.pool)
        .await
        .map_err(slug_conflict)?;

        match updated {
            Some(competition) => Ok(competition),
            None => {
                // Distinguish a missing row from one that already has participants
                self.find_by_id(competition_id).await?;
                Err(LedgerError::ConstraintViolation(
                    "Competition already has participants".to_string(),
                ))
            }
        }
    }

    pub async fn close(&self, competition_id: Uuid, at: DateTime<Utc>) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(&format!(
            r#"
            UPDATE competitions
            SET closes_at = LEAST(COALESCE(closes_at, $2), $2)
            WHERE competition_id = $1
            RETURNING {COMPETITION_COLUMNS}
            "#
        ))
        .bind(competition_id)
        .bind(at)
        .fetch_optional(self.pool)
        .await?
        .ok_or(LedgerError::NotFound)?;

        Ok(competition)
    }
}

fn slug_conflict(e: sqlx::Error) -> LedgerError {
    if is_unique_violation(&e) {
        return LedgerError::ConstraintViolation("Slug already exists".to_string());
    }
    LedgerError::from(e)
}
