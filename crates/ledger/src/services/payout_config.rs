use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::Ledger;
use crate::error::{LedgerError, Result};
use crate::models::{Identity, NewPayoutConfig, PayoutConfig, PayoutRates};

/// Percentages are stored with four decimal places.
const RATE_SCALE: u32 = 4;

/// Append a configuration version. `effective_from` defaults to now and must
/// be strictly later than the latest existing version and every payout, so
/// an existing payout never changes which version was effective for it.
pub async fn set_config(
    ledger: &Ledger,
    admin: &Identity,
    rates: PayoutRates,
    effective_from: Option<DateTime<Utc>>,
) -> Result<PayoutConfig> {
    admin.require_admin()?;
    check_rates(&rates)?;

    let now = Utc::now();
    let config = ledger
        .call(ledger.store().append_config(NewPayoutConfig {
            rates,
            effective_from: effective_from.unwrap_or(now),
            created_by: admin.user_id,
            created_at: now,
        }))
        .await?;

    tracing::info!(
        config_id = %config.config_id,
        version = config.version,
        sponsor_bonus_pct = %config.sponsor_bonus_pct,
        tds_pct = %config.tds_pct,
        effective_from = %config.effective_from,
        "Payout configuration appended"
    );

    Ok(config)
}

/// New version with a different sponsor bonus; TDS carries forward.
pub async fn set_sponsor_bonus(
    ledger: &Ledger,
    admin: &Identity,
    sponsor_bonus_pct: Decimal,
    effective_from: Option<DateTime<Utc>>,
) -> Result<PayoutConfig> {
    admin.require_admin()?;
    let latest = latest_or_missing(ledger).await?;
    set_config(
        ledger,
        admin,
        PayoutRates::new(sponsor_bonus_pct, latest.tds_pct),
        effective_from,
    )
    .await
}

/// New version with a different TDS; sponsor bonus carries forward.
pub async fn set_tds(
    ledger: &Ledger,
    admin: &Identity,
    tds_pct: Decimal,
    effective_from: Option<DateTime<Utc>>,
) -> Result<PayoutConfig> {
    admin.require_admin()?;
    let latest = latest_or_missing(ledger).await?;
    set_config(
        ledger,
        admin,
        PayoutRates::new(latest.sponsor_bonus_pct, tds_pct),
        effective_from,
    )
    .await
}

pub async fn effective_config(ledger: &Ledger, at: DateTime<Utc>) -> Result<PayoutConfig> {
    ledger.call(ledger.store().effective_config(at)).await
}

pub async fn current_config(ledger: &Ledger) -> Result<PayoutConfig> {
    effective_config(ledger, Utc::now()).await
}

pub async fn history(ledger: &Ledger, admin: &Identity) -> Result<Vec<PayoutConfig>> {
    admin.require_admin()?;
    ledger.call(ledger.store().config_history()).await
}

async fn latest_or_missing(ledger: &Ledger) -> Result<PayoutConfig> {
    ledger
        .call(ledger.store().latest_config())
        .await?
        .ok_or(LedgerError::NoConfiguration)
}

fn check_rates(rates: &PayoutRates) -> Result<()> {
    let hundred = Decimal::from(100);

    if let Some(violation) = rates.range_violation() {
        return Err(LedgerError::InvalidRange(violation));
    }
    if rates.sponsor_bonus_pct > hundred || rates.tds_pct > hundred {
        return Err(LedgerError::InvalidRange(
            "percentages must not exceed 100".to_string(),
        ));
    }
    if rates.sponsor_bonus_pct.normalize().scale() > RATE_SCALE
        || rates.tds_pct.normalize().scale() > RATE_SCALE
    {
        return Err(LedgerError::InvalidRange(format!(
            "percentages must have at most {} decimal places",
            RATE_SCALE
        )));
    }
    Ok(())
}
