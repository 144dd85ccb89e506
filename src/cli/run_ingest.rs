use tracing::info;

use crate::classify::classify;
use crate::models::{LeadApp, Result};
use crate::normalizer::normalize_batch;
use crate::selection::SelectionManager;
use crate::sources::source_from_config;

impl LeadApp {
    /// Fetch a batch from the configured source, normalize and classify it,
    /// then reconcile (or restore) the selection against the new universe.
    pub async fn run_ingest(&mut self) -> Result<()> {
        let source = source_from_config(&self.config.ingestion)?;
        info!("Ingesting leads via `{}` source", source.name());

        let raws = source.fetch_batch().await?;
        let leads = normalize_batch(raws);
        self.leads = classify(leads);

        let universe: Vec<_> = self.leads.iter().map(|l| l.lead.clone()).collect();
        let loss = if self.selection.is_empty() {
            // first load of the session: bring back the persisted selection
            let (selection, loss) = SelectionManager::restore(&self.store, &universe).await?;
            self.selection = selection;
            loss
        } else {
            self.selection.reconcile(&universe)
        };

        if let Some(loss) = loss {
            if loss.fully_invalidated {
                println!("⚠️  Your previous selection no longer matches any loaded lead.");
            } else {
                println!(
                    "⚠️  {} previously selected lead(s) are no longer in the list.",
                    loss.lost_ids.len()
                );
            }
        }
        self.selection.persist(&self.store).await?;

        println!(
            "✅ Loaded {} lead(s), {} selected after reconciliation",
            self.leads.len(),
            self.selection.len()
        );
        Ok(())
    }
}
