use crate::classify::group_by;
use crate::models::LeadApp;

impl LeadApp {
    pub fn show_tier_stats(&self) {
        println!("\n📊 Lead Tier Statistics");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━");

        if self.leads.is_empty() {
            println!("No leads loaded yet.");
            return;
        }

        let groups = group_by(&self.leads);
        let total = self.leads.len();
        let pct = |n: usize| (n as f64 / total as f64) * 100.0;

        println!("📦 Total leads: {}", total);
        println!("🔥 Hot:   {} ({:.1}%)", groups.hot.len(), pct(groups.hot.len()));
        println!("🌤  Warm:  {} ({:.1}%)", groups.warm.len(), pct(groups.warm.len()));
        println!("🧊 Cold:  {} ({:.1}%)", groups.cold.len(), pct(groups.cold.len()));
        println!("📞 Ready to call: {}", groups.ready_to_call.len());
        println!("🌐 No website:    {}", groups.no_website.len());

        let avg = self.leads.iter().map(|l| l.score as f64).sum::<f64>() / total as f64;
        println!("🎯 Average score: {:.1}", avg);

        // top prospects first
        let mut by_score: Vec<_> = self.leads.iter().collect();
        by_score.sort_by(|a, b| b.score.cmp(&a.score));

        println!("\n🏆 Top prospects:");
        for lead in by_score.iter().take(5) {
            println!(
                "   {} [{}] {} - {}",
                lead.score,
                lead.tier,
                lead.lead.name,
                lead.reasons.first().map(String::as_str).unwrap_or("-")
            );
        }
    }
}
