use dialoguer::{theme::ColorfulTheme, Select};
use tracing::error;

use crate::cli::cli::MenuAction;
use crate::dispatch::DispatchAction;
use crate::models::{LeadApp, Result};

impl LeadApp {
    pub async fn run(&mut self) -> Result<()> {
        println!("\n🚀 Welcome to Lead Engine!");
        println!("═══════════════════════════════════════");

        if let Err(e) = self.run_ingest().await {
            error!("Initial ingest failed: {}", e);
            println!("⚠️  No leads loaded yet - run the ingest action once the source is ready.");
        }

        loop {
            println!(
                "\n{} lead(s) loaded, {} selected, {} credit(s)",
                self.leads.len(),
                self.selection.len(),
                self.dispatcher.balance()
            );

            let actions = vec![
                MenuAction::IngestLeads,
                MenuAction::ShowTierStats,
                MenuAction::SelectGroup,
                MenuAction::DispatchVerify,
                MenuAction::DispatchCall,
                MenuAction::DispatchEmail,
                MenuAction::DispatchExport,
                MenuAction::RecommendTimeSlots,
                MenuAction::ShowCredits,
                MenuAction::ShowHistory,
                MenuAction::StartApiServer,
                MenuAction::Exit,
            ];

            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("\nSelect an action")
                .default(1)
                .items(&actions)
                .interact()?;

            match &actions[selection] {
                MenuAction::IngestLeads => {
                    if let Err(e) = self.run_ingest().await {
                        error!("Ingest failed: {}", e);
                    }
                }
                MenuAction::ShowTierStats => {
                    self.show_tier_stats();
                }
                MenuAction::SelectGroup => {
                    if let Err(e) = self.select_group().await {
                        error!("Group selection failed: {}", e);
                    }
                }
                MenuAction::DispatchVerify => {
                    if let Err(e) = self.run_dispatch(DispatchAction::Verify).await {
                        error!("Verification dispatch failed: {}", e);
                    }
                }
                MenuAction::DispatchCall => {
                    if let Err(e) = self.run_dispatch(DispatchAction::Call).await {
                        error!("Call dispatch failed: {}", e);
                    }
                }
                MenuAction::DispatchEmail => {
                    if let Err(e) = self.run_dispatch(DispatchAction::Email).await {
                        error!("Email dispatch failed: {}", e);
                    }
                }
                MenuAction::DispatchExport => {
                    if let Err(e) = self.run_dispatch(DispatchAction::Export).await {
                        error!("Export dispatch failed: {}", e);
                    }
                }
                MenuAction::RecommendTimeSlots => {
                    self.run_recommend();
                }
                MenuAction::ShowCredits => {
                    if let Err(e) = self.show_credits().await {
                        error!("Credit screen failed: {}", e);
                    }
                }
                MenuAction::ShowHistory => {
                    if let Err(e) = self.show_history().await {
                        error!("History screen failed: {}", e);
                    }
                }
                MenuAction::StartApiServer => {
                    if let Err(e) = self.run_server().await {
                        error!("API server failed: {}", e);
                    }
                }
                MenuAction::Exit => {
                    self.selection.persist(&self.store).await?;
                    println!("\n👋 Thanks for using Lead Engine!");
                    break;
                }
            }
        }

        Ok(())
    }
}
