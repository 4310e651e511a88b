use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use ledger::Ledger;

use super::handlers::{
    all_participations, get_participation, get_participation_detail, my_participations,
    submit_payment, verify_payment, withdraw,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Ledger> {
    Router::new()
        .route("/my", get(my_participations))
        .route("/admin/all", get(all_participations))
        .route("/admin/:participation_id/verify-payment", put(verify_payment))
        .route("/:participation_id", get(get_participation))
        .route("/:participation_id/detail", get(get_participation_detail))
        .route("/:participation_id/payment", post(submit_payment))
        .route("/:participation_id/withdraw", post(withdraw))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
