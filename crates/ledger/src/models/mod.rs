pub mod competition;
pub mod identity;
pub mod participation;
pub mod payment;
pub mod payout;
pub mod payout_config;
pub mod user_status;

pub use competition::{Competition, CompetitionChanges, NewCompetition};
pub use identity::Identity;
pub use participation::{NewParticipation, Participation, ParticipationFilter, ParticipationStatus};
pub use payment::{PaymentDetail, PaymentReview, PaymentSubmission, ReviewDecision};
pub use payout::{NewPayout, Payout, PayoutBreakdown};
pub use payout_config::{NewPayoutConfig, PayoutConfig, PayoutRates};
pub use user_status::UserStatus;
