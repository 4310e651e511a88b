pub mod competitions;
pub mod participation;
pub mod payment_intake;
pub mod payout_calculation;
pub mod payout_config;
pub mod reporting;
pub mod users;
pub mod verification;

#[cfg(test)]
mod tests;
