//! Payrail service entry point.
//!
//! Wiring order: config, logging, stores, provider adapter, engine and
//! reconciler, then the gateway. Demo organizations are seeded only when
//! the sandbox provider is active.

use std::sync::Arc;

use tracing::info;

use payrail::config::AppConfig;
use payrail::directory::{ComplianceStatus, DirectoryStore};
use payrail::engine::TransferEngine;
use payrail::gateway::{self, state::AppState};
use payrail::ledger::LedgerStore;
use payrail::logging::init_logging;
use payrail::payout::PayoutStore;
use payrail::provider::{HttpProvider, PayoutProvider};
use payrail::reconciler::Reconciler;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

fn build_provider(config: &AppConfig) -> Arc<dyn PayoutProvider> {
    #[cfg(feature = "mock-provider")]
    if config.provider.use_sandbox {
        info!("using sandbox payout provider");
        return Arc::new(payrail::provider::SandboxProvider::new());
    }
    info!(base_url = %config.provider.base_url, "using HTTP payout provider");
    match HttpProvider::new(&config.provider) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            eprintln!("FATAL: failed to build provider client: {e}");
            std::process::exit(1);
        }
    }
}

/// Seed two verified demo organizations so the sandbox flow works without
/// any setup calls.
fn seed_demo_orgs(directory: &DirectoryStore, ledger: &LedgerStore) {
    for (name, number) in [("Acme Corp", "ACC-ACME"), ("Globex Inc", "ACC-GLOBEX")] {
        if let Some(org) = directory.create_organization(name, number, ComplianceStatus::Verified)
        {
            ledger.open_account(org.account_id);
            info!(
                org_id = org.org_id,
                account_id = org.account_id,
                account_number = number,
                "seeded demo organization"
            );
        }
    }
}

#[tokio::main]
async fn main() {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _guard = init_logging(&config);

    info!(env = %env, "starting payrail");

    let ledger = Arc::new(LedgerStore::new());
    let payouts = Arc::new(PayoutStore::new());
    let directory = Arc::new(DirectoryStore::new());
    let provider = build_provider(&config);

    if config.provider.use_sandbox {
        seed_demo_orgs(&directory, &ledger);
    }

    let engine = Arc::new(TransferEngine::new(
        ledger.clone(),
        payouts.clone(),
        directory.clone(),
        provider,
    ));
    let reconciler = Arc::new(Reconciler::new(payouts, ledger, directory));

    let state = AppState::new(engine, reconciler, config.webhook.secret.clone());
    gateway::run_server(&config.gateway.host, config.gateway.port, state).await;
}
