use crate::models::{LeadRecord, Tier};

pub const BASE_SCORE: i64 = 50;
pub const HOT_THRESHOLD: i64 = 80;
pub const WARM_THRESHOLD: i64 = 55;

/// Platforms that signal an aging website worth pitching a rebuild for.
const LEGACY_PLATFORMS: [&str; 4] = ["joomla", "drupal", "weebly", "godaddy"];

/// Score a lead with the fixed additive rule set. Deterministic: the same
/// record always yields the same score and the same reasons in the same
/// order (rule-evaluation order, not severity order).
pub fn score(lead: &LeadRecord) -> (i64, Vec<String>) {
    let mut score = BASE_SCORE;
    let mut reasons = Vec::new();
    let analysis = lead.website_analysis.as_ref();

    // Rule 1: no web presence at all is the strongest signal
    let has_website = lead.website.is_some() && analysis.map_or(true, |a| a.has_website);
    if !has_website {
        score += 40;
        reasons.push("No website - needs your services!".to_string());
    }

    // Rule 2: flagged for upgrade
    if analysis.map_or(false, |a| a.needs_upgrade) {
        score += 30;
        reasons.push("Website needs upgrade".to_string());
    }

    // Rule 3: detected issues, one bracket only
    let issue_count = analysis.map_or(0, |a| a.issues.len());
    if issue_count >= 3 {
        score += 25;
        reasons.push(format!("{} website issues detected", issue_count));
    } else if issue_count > 0 {
        score += 10;
        reasons.push(format!("{} minor issues", issue_count));
    }

    // Rule 4: mobile score brackets, only when the audit produced one
    if let Some(mobile) = analysis.and_then(|a| a.mobile_score) {
        if mobile < 50.0 {
            score += 20;
            reasons.push(format!("Poor mobile score ({})", mobile));
        } else if mobile < 70.0 {
            score += 10;
            reasons.push(format!("Mediocre mobile score ({})", mobile));
        }
    }

    // Rule 5: reachable by phone
    if lead.phone.as_deref().map_or(false, |p| !p.trim().is_empty()) {
        score += 5;
        reasons.push("Phone number available".to_string());
    }

    // Rule 6: established reputation
    if let Some(rating) = lead.rating {
        if rating >= 4.5 {
            score += 10;
            reasons.push(format!("High rating ({}) - established business", rating));
        }
    }

    // Rule 7: legacy platform match, case-insensitive substring
    if let Some(platform) = analysis.and_then(|a| a.platform.as_deref()) {
        let platform_lower = platform.to_lowercase();
        if LEGACY_PLATFORMS.iter().any(|p| platform_lower.contains(p)) {
            score += 20;
            reasons.push(format!("Legacy platform ({})", platform));
        }
    }

    (score, reasons)
}

/// Pure function of the final score. Boundaries are inclusive on the low
/// side: exactly 80 is hot, exactly 55 is warm.
pub fn tier_for(score: i64) -> Tier {
    if score >= HOT_THRESHOLD {
        Tier::Hot
    } else if score >= WARM_THRESHOLD {
        Tier::Warm
    } else {
        Tier::Cold
    }
}
