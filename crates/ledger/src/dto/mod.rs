pub mod common;
pub mod competition;
pub mod participation;
pub mod payout_config;
pub mod stats;
pub mod user;
