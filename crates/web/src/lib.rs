use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use ledger::Ledger;

pub mod config;
pub mod error;
pub mod features;
pub mod middleware;

use features::{competitions, participations, payout_config, stats, users};
use middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        competitions::handlers::list_competitions,
        competitions::handlers::get_competition,
        competitions::handlers::create_competition,
        competitions::handlers::update_competition,
        competitions::handlers::close_competition,
        competitions::handlers::participate,
        participations::handlers::submit_payment,
        participations::handlers::withdraw,
        participations::handlers::my_participations,
        participations::handlers::get_participation,
        participations::handlers::get_participation_detail,
        participations::handlers::all_participations,
        participations::handlers::verify_payment,
        payout_config::handlers::get_current_config,
        payout_config::handlers::set_config,
        payout_config::handlers::get_history,
        payout_config::handlers::get_sponsor_bonus,
        payout_config::handlers::set_sponsor_bonus,
        payout_config::handlers::get_tds,
        payout_config::handlers::set_tds,
        stats::handlers::income_stats,
        stats::handlers::bv_stats,
        users::handlers::set_user_blocked,
    ),
    components(
        schemas(
            ledger::dto::competition::CreateCompetitionRequest,
            ledger::dto::competition::UpdateCompetitionRequest,
            ledger::dto::participation::SubmitPaymentRequest,
            ledger::dto::participation::VerifyPaymentRequest,
            ledger::dto::participation::PaymentReceipt,
            ledger::dto::participation::ParticipationDetailResponse,
            ledger::dto::participation::ReviewOutcome,
            ledger::dto::payout_config::SetPayoutConfigRequest,
            ledger::dto::payout_config::SetRateRequest,
            ledger::dto::payout_config::RateResponse,
            ledger::dto::stats::IncomeStats,
            ledger::dto::stats::BvStatsEntry,
            ledger::dto::user::BlockUserRequest,
            ledger::dto::common::PaginationMeta,
            ledger::models::Competition,
            ledger::models::Participation,
            ledger::models::ParticipationStatus,
            ledger::models::PaymentDetail,
            ledger::models::ReviewDecision,
            ledger::models::Payout,
            ledger::models::PayoutConfig,
            ledger::models::UserStatus,
        )
    ),
    tags(
        (name = "competitions", description = "Competitions and enrollment"),
        (name = "participations", description = "Payment intake and verification"),
        (name = "payout-config", description = "Versioned sponsor bonus and TDS rates"),
        (name = "stats", description = "Income and volume reporting"),
        (name = "admin", description = "User eligibility"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up")
    ),
    tag = "admin"
)]
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// The full HTTP surface over `ledger`, with Swagger UI mounted alongside.
pub fn app(ledger: Ledger, api_keys: ApiKeys) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .nest("/competitions", competitions::routes::routes(api_keys.clone()))
        .nest(
            "/participations",
            participations::routes::routes(api_keys.clone()),
        )
        .nest(
            "/payout-config",
            payout_config::routes::routes(api_keys.clone()),
        )
        .nest("/stats", stats::routes::routes(api_keys.clone()))
        .nest("/admin/users", users::routes::routes(api_keys));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(ledger)
}
