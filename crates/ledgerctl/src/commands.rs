use std::sync::Arc;

use chrono::{DateTime, Utc};
use ledger::{
    DEFAULT_CALL_TIMEOUT, Database, Ledger,
    models::{Identity, PayoutBreakdown, PayoutConfig, PayoutRates},
    services::{payout_calculation, payout_config},
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{CtlError, Result};

/// Connects to Postgres and wraps the pool in a [`Ledger`].
pub async fn connect(database_url: Option<&str>) -> Result<(Database, Ledger)> {
    let database_url = database_url.ok_or(CtlError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to database...");
    let db = Database::new(database_url).await?;
    let ledger = Ledger::new(Arc::new(db.clone()), DEFAULT_CALL_TIMEOUT);

    Ok((db, ledger))
}

pub async fn migrate(db: &Database) -> Result<()> {
    tracing::info!("Running database migrations");
    db.run_migrations().await?;
    tracing::info!("Database migrations completed successfully");
    Ok(())
}

pub async fn set_config(
    ledger: &Ledger,
    operator: Uuid,
    rates: PayoutRates,
    effective_from: Option<DateTime<Utc>>,
) -> Result<PayoutConfig> {
    let config =
        payout_config::set_config(ledger, &Identity::admin(operator), rates, effective_from)
            .await?;
    log_config(&config);
    Ok(config)
}

pub async fn show_config(ledger: &Ledger, at: Option<DateTime<Utc>>) -> Result<PayoutConfig> {
    let config = payout_config::effective_config(ledger, at.unwrap_or_else(Utc::now)).await?;
    log_config(&config);
    Ok(config)
}

pub async fn history(ledger: &Ledger, operator: Identity, json: bool) -> Result<Vec<PayoutConfig>> {
    let configs = payout_config::history(ledger, &operator).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&configs)?);
    } else if configs.is_empty() {
        tracing::warn!("No payout configuration has been set");
    } else {
        for config in &configs {
            log_config(config);
        }
    }

    Ok(configs)
}

/// Breakdown for `gross` under explicit rates, without touching the store.
pub fn preview_with_rates(gross: Decimal, rates: PayoutRates) -> Result<PayoutBreakdown> {
    if gross <= Decimal::ZERO {
        return Err(CtlError::InvalidArgument(
            "gross must be positive".to_string(),
        ));
    }

    let breakdown = payout_calculation::compute_payout(gross, &rates)?;
    log_breakdown(&breakdown);
    Ok(breakdown)
}

/// Breakdown for `gross` under the stored configuration effective at `at`.
pub async fn preview_stored(
    ledger: &Ledger,
    gross: Decimal,
    at: Option<DateTime<Utc>>,
) -> Result<PayoutBreakdown> {
    let config = show_config(ledger, at).await?;
    preview_with_rates(gross, config.rates())
}

fn log_config(config: &PayoutConfig) {
    tracing::info!(
        "v{} effective {}: sponsor bonus {}%, TDS {}% (id {}, by {})",
        config.version,
        config.effective_from,
        config.sponsor_bonus_pct,
        config.tds_pct,
        config.config_id,
        config.created_by
    );
}

fn log_breakdown(breakdown: &PayoutBreakdown) {
    tracing::info!(
        "gross {} = sponsor bonus {} + TDS {} + net {}",
        breakdown.gross,
        breakdown.sponsor_bonus,
        breakdown.tds,
        breakdown.net
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn rates(sponsor_bonus_pct: i64, tds_pct: i64) -> PayoutRates {
        PayoutRates::new(Decimal::from(sponsor_bonus_pct), Decimal::from(tds_pct))
    }

    #[test]
    fn test_preview_with_rates() {
        let breakdown = preview_with_rates(Decimal::from(1000), rates(10, 5)).unwrap();
        assert_eq!(breakdown.sponsor_bonus, Decimal::from(100));
        assert_eq!(breakdown.tds, Decimal::from(50));
        assert_eq!(breakdown.net, Decimal::from(850));
    }

    #[test]
    fn test_preview_rejects_non_positive_gross() {
        assert!(matches!(
            preview_with_rates(Decimal::ZERO, rates(10, 5)),
            Err(CtlError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_set_then_preview_stored() {
        let ledger = Ledger::in_memory();
        let operator = Uuid::new_v4();
        let start = Utc::now() - Duration::days(1);

        set_config(&ledger, operator, rates(10, 5), Some(start))
            .await
            .unwrap();
        set_config(&ledger, operator, rates(20, 5), Some(start + Duration::hours(1)))
            .await
            .unwrap();

        let breakdown = preview_stored(&ledger, Decimal::from(200), Some(start))
            .await
            .unwrap();
        assert_eq!(breakdown.sponsor_bonus, Decimal::from(20));

        let configs = history(&ledger, Identity::admin(operator), false)
            .await
            .unwrap();
        assert_eq!(configs.len(), 2);
    }

    #[tokio::test]
    async fn test_connect_requires_url() {
        assert!(matches!(
            connect(None).await,
            Err(CtlError::MissingDatabaseUrl)
        ));
    }
}
