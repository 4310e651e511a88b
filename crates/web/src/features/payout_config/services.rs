use ledger::{
    Ledger,
    dto::payout_config::{RateResponse, SetPayoutConfigRequest, SetRateRequest},
    models::{Identity, PayoutConfig, PayoutRates},
    services::payout_config,
};

use crate::error::ApiResult;

/// Which single rate a `/sponsor-bonus` or `/tds` route addresses
#[derive(Debug, Clone, Copy)]
pub enum Rate {
    SponsorBonus,
    Tds,
}

impl Rate {
    fn view(self, config: &PayoutConfig) -> RateResponse {
        match self {
            Rate::SponsorBonus => RateResponse::sponsor_bonus(config),
            Rate::Tds => RateResponse::tds(config),
        }
    }
}

pub async fn set_config(
    ledger: &Ledger,
    identity: &Identity,
    request: SetPayoutConfigRequest,
) -> ApiResult<PayoutConfig> {
    let rates = PayoutRates::new(request.sponsor_bonus_pct, request.tds_pct);

    Ok(payout_config::set_config(ledger, identity, rates, request.effective_from).await?)
}

pub async fn current_rate(ledger: &Ledger, rate: Rate) -> ApiResult<RateResponse> {
    let config = payout_config::current_config(ledger).await?;

    Ok(rate.view(&config))
}

pub async fn set_rate(
    ledger: &Ledger,
    identity: &Identity,
    rate: Rate,
    request: SetRateRequest,
) -> ApiResult<RateResponse> {
    let config = match rate {
        Rate::SponsorBonus => {
            payout_config::set_sponsor_bonus(
                ledger,
                identity,
                request.percentage,
                request.effective_from,
            )
            .await?
        }
        Rate::Tds => {
            payout_config::set_tds(ledger, identity, request.percentage, request.effective_from)
                .await?
        }
    };

    Ok(rate.view(&config))
}
