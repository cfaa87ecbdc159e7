//! HTTP gateway: axum router over the engine and reconciler.

pub mod handlers;
pub mod state;
pub mod types;

use axum::{
    Router,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use tracing::{error, info};

use state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/webhooks", post(handlers::handle_webhook))
        .route("/transfers", post(handlers::create_transfer))
        .route("/payouts", post(handlers::create_payout))
        .route("/payouts", get(handlers::list_payouts))
        .route("/beneficiaries", post(handlers::create_beneficiary))
        .route("/beneficiaries", get(handlers::list_beneficiaries))
        .route("/beneficiaries/{id}", put(handlers::rename_beneficiary))
        .route("/deposits", post(handlers::create_deposit))
        .route("/balance", get(handlers::get_balance))
        .route("/reconciliation", get(handlers::get_reconciliation));

    // [SECURITY] Mock callback route - only compiled when 'mock-api' is
    // enabled. Production builds MUST use `--no-default-features`.
    #[cfg(feature = "mock-api")]
    let api = api.route(
        "/internal/simulate_callback",
        post(handlers::simulate_callback),
    );

    Router::new().nest("/api/v1", api).with_state(state)
}

/// Bind and serve the gateway until the process exits.
pub async fn run_server(host: &str, port: u16, state: AppState) {
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind gateway");
            std::process::exit(1);
        }
    };

    info!(%addr, "gateway listening");
    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "gateway server error");
        std::process::exit(1);
    }
}
