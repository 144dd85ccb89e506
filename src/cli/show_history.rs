use crate::models::{LeadApp, Result};

impl LeadApp {
    pub async fn show_history(&self) -> Result<()> {
        println!("\n📜 Dispatch History");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━");

        let receipts = self.store.recent_receipts(20).await?;
        if receipts.is_empty() {
            println!("No dispatches yet.");
            return Ok(());
        }

        for receipt in receipts {
            println!(
                "{} `{}` - {} lead(s), {} credit(s), {} [{}]",
                receipt.requested_at,
                receipt.action,
                receipt.lead_count,
                receipt.credits_charged,
                receipt.status,
                receipt.id
            );
            if receipt.status == "partial_failure" {
                println!("   failed: {}", receipt.failed_lead_ids);
            }
        }

        Ok(())
    }
}
