use dialoguer::{theme::ColorfulTheme, Select};

use crate::classify::group_by;
use crate::models::{LeadApp, Result};

impl LeadApp {
    /// Pick a group tab; switching to a tab selects everything in it, the
    /// same way the dashboard tabs behave.
    pub async fn select_group(&mut self) -> Result<()> {
        if self.leads.is_empty() {
            println!("No leads loaded yet - ingest first.");
            return Ok(());
        }

        let groups = group_by(&self.leads);
        let items = vec![
            format!("All leads ({})", groups.all.len()),
            format!("🔥 Hot ({})", groups.hot.len()),
            format!("🌤  Warm ({})", groups.warm.len()),
            format!("🧊 Cold ({})", groups.cold.len()),
            format!("📞 Ready to call ({})", groups.ready_to_call.len()),
            format!("🌐 No website ({})", groups.no_website.len()),
            "🔀 Toggle a single lead".to_string(),
            "✖ Clear selection".to_string(),
        ];

        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Select a group")
            .default(0)
            .items(&items)
            .interact()?;

        match choice {
            0 => {
                let universe: Vec<_> = self.leads.iter().map(|l| l.lead.clone()).collect();
                self.selection.select_all(&universe);
            }
            1 => self.selection.auto_select_group(groups.hot.iter().map(|l| &l.lead)),
            2 => self.selection.auto_select_group(groups.warm.iter().map(|l| &l.lead)),
            3 => self.selection.auto_select_group(groups.cold.iter().map(|l| &l.lead)),
            4 => self
                .selection
                .auto_select_group(groups.ready_to_call.iter().map(|l| &l.lead)),
            5 => self
                .selection
                .auto_select_group(groups.no_website.iter().map(|l| &l.lead)),
            6 => {
                let labels: Vec<String> = self
                    .leads
                    .iter()
                    .map(|l| {
                        let mark = if self.selection.contains(l.id()) { "☑" } else { "☐" };
                        format!("{} {} [{}] {}", mark, l.lead.name, l.tier, l.score)
                    })
                    .collect();
                let picked = Select::with_theme(&ColorfulTheme::default())
                    .with_prompt("Toggle which lead?")
                    .default(0)
                    .items(&labels)
                    .interact()?;
                let id = self.leads[picked].id().to_string();
                self.selection.toggle(&id);
            }
            _ => self.selection.clear(),
        }

        self.selection.persist(&self.store).await?;
        println!("✅ {} lead(s) selected", self.selection.len());
        Ok(())
    }
}
