use axum::{Router, middleware, routing::get};
use ledger::Ledger;

use super::handlers::{
    get_current_config, get_history, get_sponsor_bonus, get_tds, set_config, set_sponsor_bonus,
    set_tds,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Ledger> {
    Router::new()
        .route("/", get(get_current_config).put(set_config))
        .route("/history", get(get_history))
        .route("/sponsor-bonus", get(get_sponsor_bonus).put(set_sponsor_bonus))
        .route("/tds", get(get_tds).put(set_tds))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
