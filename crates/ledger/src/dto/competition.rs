use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Competition, CompetitionChanges, NewCompetition};

/// Request payload for creating a new competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCompetitionRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Slug must be between 1 and 255 characters"
    ))]
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,

    #[validate(custom(function = "validate_fee"))]
    #[schema(example = "1000.00")]
    pub entry_fee: Decimal,

    /// Defaults to the moment of creation.
    pub opens_at: Option<DateTime<Utc>>,

    pub closes_at: Option<DateTime<Utc>>,
}

/// Request payload for updating a competition that has no participants yet
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCompetitionRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 255))]
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[validate(custom(function = "validate_fee"))]
    #[schema(example = "1000.00")]
    pub entry_fee: Option<Decimal>,

    pub opens_at: Option<DateTime<Utc>>,

    pub closes_at: Option<DateTime<Utc>>,
}

fn validate_slug(slug: &str) -> Result<(), validator::ValidationError> {
    let is_valid = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--");

    if is_valid {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_slug"))
    }
}

fn validate_fee(fee: &Decimal) -> Result<(), validator::ValidationError> {
    if *fee <= Decimal::ZERO {
        return Err(validator::ValidationError::new("fee_not_positive"));
    }
    if fee.normalize().scale() > 2 {
        return Err(validator::ValidationError::new("fee_too_precise"));
    }
    Ok(())
}

fn check_window(
    opens_at: DateTime<Utc>,
    closes_at: Option<DateTime<Utc>>,
) -> Result<(), &'static str> {
    match closes_at {
        Some(closes_at) if closes_at <= opens_at => Err("closes_at must be after opens_at"),
        _ => Ok(()),
    }
}

impl CreateCompetitionRequest {
    /// Cross-field validation, resolving defaults against `now`.
    pub fn into_new(self, now: DateTime<Utc>) -> Result<NewCompetition, &'static str> {
        let opens_at = self.opens_at.unwrap_or(now);
        check_window(opens_at, self.closes_at)?;

        Ok(NewCompetition {
            title: self.title,
            slug: self.slug,
            entry_fee: self.entry_fee,
            opens_at,
            closes_at: self.closes_at,
        })
    }
}

impl UpdateCompetitionRequest {
    pub fn apply_to(&self, existing: &Competition) -> Result<CompetitionChanges, &'static str> {
        let changes = CompetitionChanges {
            title: self.title.clone().unwrap_or_else(|| existing.title.clone()),
            slug: self.slug.clone().unwrap_or_else(|| existing.slug.clone()),
            entry_fee: self.entry_fee.unwrap_or(existing.entry_fee),
            opens_at: self.opens_at.unwrap_or(existing.opens_at),
            closes_at: self.closes_at.or(existing.closes_at),
        };
        check_window(changes.opens_at, changes.closes_at)?;
        Ok(changes)
    }
}
