use axum::{Router, middleware, routing::put};
use ledger::Ledger;

use super::handlers::set_user_blocked;
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Ledger> {
    Router::new()
        .route("/:user_id/block", put(set_user_blocked))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
