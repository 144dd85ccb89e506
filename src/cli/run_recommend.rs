use crate::models::LeadApp;
use crate::timeslots::recommend;

impl LeadApp {
    /// Rank the candidate send times against the current selection's
    /// best-time-to-call hints.
    pub fn run_recommend(&self) {
        let selected: Vec<_> = self
            .leads
            .iter()
            .filter(|l| self.selection.contains(l.id()))
            .map(|l| &l.lead)
            .collect();

        if selected.is_empty() {
            println!("No leads selected - pick a group first.");
            return;
        }

        println!("\n⏰ Recommended send times ({} lead(s) considered)", selected.len());
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━");

        for (rank, slot) in recommend(selected.iter().copied()).iter().enumerate() {
            println!(
                "{}. {} - score {} (base {}, {} matching lead(s))",
                rank + 1,
                slot.label(),
                slot.final_score,
                slot.base_score,
                slot.matched_lead_count
            );
        }
    }
}
