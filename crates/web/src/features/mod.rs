pub mod competitions;
pub mod participations;
pub mod payout_config;
pub mod stats;
pub mod users;
