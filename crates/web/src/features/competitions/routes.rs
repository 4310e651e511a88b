use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use ledger::Ledger;

use super::handlers::{
    close_competition, create_competition, get_competition, list_competitions, participate,
    update_competition,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Ledger> {
    let protected = Router::new()
        .route("/", post(create_competition))
        .route("/:competition_id", put(update_competition))
        .route("/:competition_id/close", put(close_competition))
        .route("/:competition_id/participate", post(participate))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_competitions))
        .route("/:competition_id", get(get_competition))
        .merge(protected)
}
