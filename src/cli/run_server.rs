use std::sync::Arc;

use tracing::info;

use crate::models::{LeadApp, Result};
use crate::server::{build_rocket, ServerState};

impl LeadApp {
    /// Serve the engine over HTTP. Blocks until the server shuts down.
    pub async fn run_server(&self) -> Result<()> {
        let state = ServerState {
            config: self.config.clone(),
            store: self.store.clone(),
            leads: self.leads.clone(),
            dispatcher: Arc::clone(&self.dispatcher),
        };

        info!("Starting API server on port {}", self.config.server.port);
        build_rocket(state).launch().await?;
        Ok(())
    }
}
