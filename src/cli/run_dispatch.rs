use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::channels::executor_for;
use crate::dispatch::{DispatchAction, DispatchReport, DispatchRequest, DispatchStatus};
use crate::errors::EngineError;
use crate::models::{ClassifiedLead, LeadApp, Result};

impl LeadApp {
    pub async fn run_dispatch(&mut self, action: DispatchAction) -> Result<()> {
        let target_leads: Vec<ClassifiedLead> = self
            .leads
            .iter()
            .filter(|l| self.selection.contains(l.id()))
            .cloned()
            .collect();

        let required = action.credits_required(target_leads.len());
        if required > self.config.credits.confirm_above {
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(format!(
                    "`{}` on {} lead(s) will cost {} credit(s). Continue?",
                    action,
                    target_leads.len(),
                    required
                ))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("Cancelled - nothing charged.");
                return Ok(());
            }
        }

        let executor = executor_for(action, &self.config.email, &self.config.output);
        let request = DispatchRequest {
            action,
            target_leads,
        };

        match self
            .dispatcher
            .dispatch(request, executor.as_ref(), &self.store)
            .await?
        {
            DispatchReport::Executed(receipt) => match receipt.status {
                DispatchStatus::Completed => {
                    println!(
                        "✅ `{}` completed for {} lead(s) ({} credit(s) charged)",
                        receipt.action, receipt.lead_count, receipt.credits_charged
                    );
                }
                DispatchStatus::PartialFailure => {
                    println!(
                        "⚠️  `{}` finished with {} of {} lead(s) failed:",
                        receipt.action,
                        receipt.failed_lead_ids.len(),
                        receipt.lead_count
                    );
                    for id in &receipt.failed_lead_ids {
                        println!("   ✖ {}", id);
                    }
                    println!("   (credits cover the attempt - no refund)");
                }
            },
            DispatchReport::InsufficientCredits {
                required, balance, ..
            } => {
                let err = EngineError::InsufficientCredits {
                    action,
                    required,
                    balance,
                };
                println!(
                    "🚫 {}. Top up {} credit(s) to proceed.",
                    err,
                    err.shortfall().unwrap_or(0)
                );
            }
            DispatchReport::Rejected { .. } => {
                println!("🚫 {}", EngineError::EmptySelection { action });
            }
        }

        Ok(())
    }
}
