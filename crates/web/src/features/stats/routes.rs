use axum::{Router, middleware, routing::get};
use ledger::Ledger;

use super::handlers::{bv_stats, income_stats};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Ledger> {
    Router::new()
        .route("/income", get(income_stats))
        .route("/bv", get(bv_stats))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
