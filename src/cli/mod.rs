use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::credits::CreditLedger;
use crate::dispatch::Dispatcher;
use crate::models::{LeadApp, Result};
use crate::selection::SelectionManager;
use crate::store::StateStore;

pub mod cli;
pub mod run;
pub mod run_dispatch;
pub mod run_ingest;
pub mod run_recommend;
pub mod run_server;
pub mod select_group;
pub mod show_credits;
pub mod show_history;
pub mod show_tier_stats;

impl LeadApp {
    pub async fn new(config: Config) -> Result<Self> {
        let store = StateStore::open(&config.persistence.db_path).await?;
        let ledger = CreditLedger::restore(&store, config.credits.starting_balance).await?;
        info!("Credit balance: {}", ledger.balance());

        Ok(Self {
            dispatcher: Arc::new(Dispatcher::new(ledger)),
            selection: SelectionManager::new(),
            leads: Vec::new(),
            store,
            config,
        })
    }
}
