pub mod competition;
pub mod participation;
pub mod payment;
pub mod payout_config;
pub mod stats;
pub mod user_status;
