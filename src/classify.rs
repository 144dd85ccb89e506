use crate::models::{ClassifiedLead, LeadRecord, Tier};
use crate::scoring::{score, tier_for};

/// Run the scoring engine over a batch, preserving input order. The input
/// records are moved into the classified wrappers untouched; sorting is a
/// presentation concern applied downstream.
pub fn classify(leads: Vec<LeadRecord>) -> Vec<ClassifiedLead> {
    leads
        .into_iter()
        .map(|lead| {
            let (score, reasons) = score(&lead);
            ClassifiedLead {
                tier: tier_for(score),
                score,
                reasons,
                lead,
            }
        })
        .collect()
}

/// Tier and derived groups over a classified batch. Groups borrow from the
/// batch - they are views, not copies.
#[derive(Debug)]
pub struct LeadGroups<'a> {
    pub all: &'a [ClassifiedLead],
    pub hot: Vec<&'a ClassifiedLead>,
    pub warm: Vec<&'a ClassifiedLead>,
    pub cold: Vec<&'a ClassifiedLead>,
    pub ready_to_call: Vec<&'a ClassifiedLead>,
    pub no_website: Vec<&'a ClassifiedLead>,
}

pub fn group_by(classified: &[ClassifiedLead]) -> LeadGroups<'_> {
    let mut groups = LeadGroups {
        all: classified,
        hot: Vec::new(),
        warm: Vec::new(),
        cold: Vec::new(),
        ready_to_call: Vec::new(),
        no_website: Vec::new(),
    };

    for lead in classified {
        match lead.tier {
            Tier::Hot => groups.hot.push(lead),
            Tier::Warm => groups.warm.push(lead),
            Tier::Cold => groups.cold.push(lead),
        }

        // ready_to_call comes from the verification collaborator, not scoring
        if lead.lead.ready_to_call {
            groups.ready_to_call.push(lead);
        }

        // keyed off the analysis alone: an unanalyzed lead counts as no-website
        let analyzed_has_website = lead
            .lead
            .website_analysis
            .as_ref()
            .map_or(false, |a| a.has_website);
        if !analyzed_has_website {
            groups.no_website.push(lead);
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WebsiteAnalysis;

    fn lead(id: &str, website: Option<&str>, phone: Option<&str>) -> LeadRecord {
        LeadRecord {
            id: id.to_string(),
            name: format!("Business {}", id),
            phone: phone.map(String::from),
            email: None,
            website: website.map(String::from),
            address: None,
            rating: None,
            website_analysis: website.map(|_| WebsiteAnalysis {
                has_website: true,
                platform: None,
                needs_upgrade: false,
                issues: Vec::new(),
                mobile_score: None,
            }),
            best_time_to_call: None,
            ready_to_call: false,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn classify_preserves_input_order() {
        let classified = classify(vec![
            lead("c", Some("c.com"), None),
            lead("a", None, None),
            lead("b", Some("b.com"), None),
        ]);
        let ids: Vec<&str> = classified.iter().map(|l| l.id()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn groups_partition_by_tier() {
        // no website + phone = 95 (hot); no website = 90 (hot); website only = 50 (cold)
        let classified = classify(vec![
            lead("hot", None, Some("555")),
            lead("cold", Some("x.com"), None),
        ]);
        let groups = group_by(&classified);

        assert_eq!(groups.hot.len(), 1);
        assert_eq!(groups.hot[0].id(), "hot");
        assert!(groups.warm.is_empty());
        assert_eq!(groups.cold.len(), 1);
        assert_eq!(groups.all.len(), 2);
    }

    #[test]
    fn no_website_group_tracks_analysis_and_absence() {
        let mut parked = lead("parked", Some("parked.example"), None);
        parked.website_analysis.as_mut().unwrap().has_website = false;

        let classified = classify(vec![
            lead("absent", None, None),
            parked,
            lead("live", Some("live.example"), None),
        ]);
        let groups = group_by(&classified);

        let ids: Vec<&str> = groups.no_website.iter().map(|l| l.id()).collect();
        assert_eq!(ids, vec!["absent", "parked"]);
    }

    #[test]
    fn ready_to_call_is_externally_supplied() {
        let mut verified = lead("verified", Some("x.com"), None);
        verified.ready_to_call = true;

        let classified = classify(vec![lead("plain", Some("y.com"), None), verified]);
        let groups = group_by(&classified);

        assert_eq!(groups.ready_to_call.len(), 1);
        assert_eq!(groups.ready_to_call[0].id(), "verified");
    }
}
