use std::sync::Arc;

use crate::engine::TransferEngine;
use crate::reconciler::Reconciler;

/// Gateway shared application state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TransferEngine>,
    pub reconciler: Arc<Reconciler>,
    /// HMAC secret for webhook signature verification; None disables checks.
    pub webhook_secret: Option<String>,
}

impl AppState {
    pub fn new(
        engine: Arc<TransferEngine>,
        reconciler: Arc<Reconciler>,
        webhook_secret: Option<String>,
    ) -> Self {
        Self {
            engine,
            reconciler,
            webhook_secret,
        }
    }
}
