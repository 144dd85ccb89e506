use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::errors::EngineError;
use crate::models::{LeadRecord, WebsiteAnalysis};

/// Raw lead as delivered by the upstream maps/platform scraper. Field names
/// follow the scraper's camelCase JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLead {
    pub id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub website_analysis: Option<WebsiteAnalysis>,
    pub best_time_to_call: Option<String>,
    #[serde(default)]
    pub ready_to_call: bool,
}

/// Validate and normalize a raw lead into the canonical shape.
///
/// Missing `id` or `name` (or a name that is empty after trimming) rejects
/// the record. Out-of-range ratings and malformed website URLs are
/// data-quality warnings recorded on the lead, not failures.
pub fn normalize(raw: RawLead) -> Result<LeadRecord, EngineError> {
    let id = match raw.id {
        Some(id) if !id.trim().is_empty() => id,
        _ => return Err(EngineError::Validation("missing `id`".to_string())),
    };

    let name = match raw.name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        Some(_) => {
            return Err(EngineError::Validation(format!(
                "lead {} has an empty `name`",
                id
            )))
        }
        None => return Err(EngineError::Validation(format!("lead {} missing `name`", id))),
    };

    let mut warnings = Vec::new();

    let rating = raw.rating.map(|r| {
        if !(0.0..=5.0).contains(&r) {
            let clamped = r.clamp(0.0, 5.0);
            warnings.push(format!("rating {} out of range, clamped to {}", r, clamped));
            clamped
        } else {
            r
        }
    });

    if let Some(site) = raw.website.as_deref() {
        if !site.is_empty() && parse_website(site).is_none() {
            warnings.push(format!("website `{}` is not a valid URL", site));
        }
    }

    Ok(LeadRecord {
        id,
        name,
        phone: raw.phone,
        email: raw.email,
        website: raw.website,
        address: raw.address,
        rating,
        website_analysis: raw.website_analysis,
        best_time_to_call: raw.best_time_to_call,
        ready_to_call: raw.ready_to_call,
        warnings,
    })
}

/// Normalize a batch. Invalid records are skipped and logged; one bad lead
/// never aborts the rest of the batch.
pub fn normalize_batch(raws: Vec<RawLead>) -> Vec<LeadRecord> {
    let total = raws.len();
    let leads: Vec<LeadRecord> = raws
        .into_iter()
        .filter_map(|raw| match normalize(raw) {
            Ok(lead) => Some(lead),
            Err(e) => {
                warn!("Skipping lead: {}", e);
                None
            }
        })
        .collect();

    if leads.len() < total {
        warn!("Dropped {} of {} raw leads during normalization", total - leads.len(), total);
    }

    leads
}

fn parse_website(site: &str) -> Option<Url> {
    // Scraped sites often omit the scheme
    Url::parse(site)
        .or_else(|_| Url::parse(&format!("https://{}", site)))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, name: &str) -> RawLead {
        RawLead {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            phone: None,
            email: None,
            website: None,
            address: None,
            rating: None,
            website_analysis: None,
            best_time_to_call: None,
            ready_to_call: false,
        }
    }

    #[test]
    fn rejects_missing_id() {
        let mut lead = raw("x", "Joe's Plumbing");
        lead.id = None;
        assert!(normalize(lead).is_err());
    }

    #[test]
    fn rejects_whitespace_name() {
        let lead = raw("lead-1", "   ");
        assert!(normalize(lead).is_err());
    }

    #[test]
    fn clamps_out_of_range_rating_with_warning() {
        let mut lead = raw("lead-1", "Acme");
        lead.rating = Some(7.2);
        let normalized = normalize(lead).unwrap();
        assert_eq!(normalized.rating, Some(5.0));
        assert_eq!(normalized.warnings.len(), 1);
    }

    #[test]
    fn in_range_rating_passes_untouched() {
        let mut lead = raw("lead-1", "Acme");
        lead.rating = Some(4.5);
        let normalized = normalize(lead).unwrap();
        assert_eq!(normalized.rating, Some(4.5));
        assert!(normalized.warnings.is_empty());
    }

    #[test]
    fn absent_fields_stay_absent() {
        let normalized = normalize(raw("lead-1", "Acme")).unwrap();
        assert!(normalized.phone.is_none());
        assert!(normalized.website.is_none());
        assert!(normalized.rating.is_none());
    }

    #[test]
    fn batch_skips_invalid_records_only() {
        let mut bad = raw("lead-2", "B");
        bad.name = None;
        let leads = normalize_batch(vec![raw("lead-1", "A"), bad, raw("lead-3", "C")]);
        let ids: Vec<&str> = leads.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["lead-1", "lead-3"]);
    }
}
