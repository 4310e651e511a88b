use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{LedgerError, Result};
use crate::models::{PayoutBreakdown, PayoutRates};

/// Decimal places of the currency's smallest unit.
pub const CURRENCY_SCALE: u32 = 2;

/// Splits `gross` into sponsor bonus, TDS and net.
///
/// Bonus and TDS are each rounded half away from zero to the currency unit;
/// net is whatever remains, so the three parts always sum to `gross` exactly.
/// When the rates add up to 100% both roundings can go up on an odd-cent
/// gross; TDS is then capped at what the bonus leaves so net stays at zero.
pub fn compute_payout(gross: Decimal, rates: &PayoutRates) -> Result<PayoutBreakdown> {
    if let Some(violation) = rates.range_violation() {
        return Err(LedgerError::InvalidConfiguration(violation));
    }

    let hundred = Decimal::from(100);
    let sponsor_bonus = round_currency(gross * rates.sponsor_bonus_pct / hundred);
    let tds = round_currency(gross * rates.tds_pct / hundred).min(gross - sponsor_bonus);
    let net = gross - sponsor_bonus - tds;

    Ok(PayoutBreakdown {
        gross,
        sponsor_bonus,
        tds,
        net,
    })
}

fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
