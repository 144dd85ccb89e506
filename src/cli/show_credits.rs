use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use crate::models::{LeadApp, Result};

impl LeadApp {
    /// Balance screen with a manual top-up path standing in for the external
    /// purchase flow.
    pub async fn show_credits(&mut self) -> Result<()> {
        println!("\n💳 Credit Balance");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("Available: {} credit(s)", self.dispatcher.balance());
        println!("AI verification costs 1 credit per lead; call/email/export are free.");

        let top_up = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Top up now?")
            .default(false)
            .interact()?;

        if top_up {
            let amount: u64 = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Credits to add")
                .default(25)
                .interact_text()?;

            self.dispatcher.top_up(amount);
            self.dispatcher.persist_balance(&self.store).await?;
            println!("✅ New balance: {} credit(s)", self.dispatcher.balance());
        }

        Ok(())
    }
}
