use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::models::LeadRecord;

/// Candidate send times with their baseline effectiveness scores.
const SLOT_CANDIDATES: [(u32, u32); 4] = [(9, 92), (11, 88), (14, 85), (16, 78)];

const MAX_FINAL_SCORE: u32 = 99;
const MATCH_BONUS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiTimeSlot {
    pub hour: u32,
    pub base_score: u32,
    pub matched_lead_count: usize,
    pub final_score: u32,
}

impl AiTimeSlot {
    pub fn label(&self) -> String {
        match self.hour {
            0 => "12:00 AM".to_string(),
            h if h < 12 => format!("{}:00 AM", h),
            12 => "12:00 PM".to_string(),
            h => format!("{}:00 PM", h - 12),
        }
    }
}

/// Score the fixed candidate slots against the selection's call-time hints.
/// A lead matches a slot when its `best_time_to_call` hour is within one
/// hour of the slot. Output is sorted by final score descending; ties keep
/// the candidate order.
pub fn recommend<'a, I>(selected_leads: I) -> Vec<AiTimeSlot>
where
    I: IntoIterator<Item = &'a LeadRecord>,
{
    let hours: Vec<u32> = selected_leads
        .into_iter()
        .filter_map(|lead| lead.best_time_to_call.as_deref())
        .filter_map(parse_hour)
        .collect();

    let mut slots: Vec<AiTimeSlot> = SLOT_CANDIDATES
        .iter()
        .map(|&(hour, base_score)| {
            let matched_lead_count = hours
                .iter()
                .filter(|&&h| (h as i64 - hour as i64).abs() <= 1)
                .count();
            let bonus = if matched_lead_count > 0 { MATCH_BONUS } else { 0 };
            AiTimeSlot {
                hour,
                base_score,
                matched_lead_count,
                final_score: (base_score + bonus).min(MAX_FINAL_SCORE),
            }
        })
        .collect();

    // stable sort keeps candidate order on equal scores
    slots.sort_by(|a, b| b.final_score.cmp(&a.final_score));
    slots
}

/// Extract an hour (0-23) from a free-text hint like "9 AM", "around 4pm"
/// or "14:00". Unparseable hints simply match no slot.
pub fn parse_hour(hint: &str) -> Option<u32> {
    static HOUR_RE: OnceLock<Regex> = OnceLock::new();
    let re = HOUR_RE
        .get_or_init(|| Regex::new(r"(?i)(\d{1,2})(?::\d{2})?\s*(am|pm)?").expect("valid regex"));

    let caps = re.captures(hint)?;
    let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let meridiem = caps.get(2).map(|m| m.as_str().to_lowercase());

    let hour = match meridiem.as_deref() {
        Some("pm") if hour < 12 => hour + 12,
        Some("am") if hour == 12 => 0,
        _ => hour,
    };

    (hour <= 23).then_some(hour)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead_with_hint(id: &str, hint: Option<&str>) -> LeadRecord {
        LeadRecord {
            id: id.to_string(),
            name: format!("Business {}", id),
            phone: None,
            email: None,
            website: None,
            address: None,
            rating: None,
            website_analysis: None,
            best_time_to_call: hint.map(String::from),
            ready_to_call: false,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn parses_common_hint_formats() {
        assert_eq!(parse_hour("9 AM"), Some(9));
        assert_eq!(parse_hour("around 4pm"), Some(16));
        assert_eq!(parse_hour("14:00"), Some(14));
        assert_eq!(parse_hour("12pm"), Some(12));
        assert_eq!(parse_hour("12 AM"), Some(0));
        assert_eq!(parse_hour("morning"), None);
    }

    #[test]
    fn ranks_slots_by_matched_hints() {
        let leads = vec![
            lead_with_hint("a", Some("9 AM")),
            lead_with_hint("b", Some("9:00")),
            lead_with_hint("c", Some("10 AM")),
            lead_with_hint("d", Some("2 PM")),
            lead_with_hint("e", Some("16:00")),
        ];

        let slots = recommend(&leads);
        assert_eq!(slots[0].hour, 9);
        assert_eq!(slots[0].matched_lead_count, 3); // 9, 9, 10
        assert_eq!(slots[0].final_score, 97);
        assert_eq!(slots[1].hour, 11);
        assert_eq!(slots[1].matched_lead_count, 1); // 10 is within +-1
        assert_eq!(slots[1].final_score, 93);
        assert_eq!(slots[2].hour, 14);
        assert_eq!(slots[2].final_score, 90);
        assert_eq!(slots[3].hour, 16);
        assert_eq!(slots[3].final_score, 83);
    }

    #[test]
    fn no_hints_keeps_candidate_order() {
        let leads = vec![lead_with_hint("a", None), lead_with_hint("b", Some("gibberish"))];
        let slots = recommend(&leads);

        let hours: Vec<u32> = slots.iter().map(|s| s.hour).collect();
        assert_eq!(hours, vec![9, 11, 14, 16]);
        assert!(slots.iter().all(|s| s.matched_lead_count == 0));
        assert!(slots.iter().all(|s| s.final_score == s.base_score));
    }

    #[test]
    fn final_score_is_capped() {
        // 9:00 base 92 + 5 = 97 is under the cap; prove the cap by the
        // arithmetic path staying within bounds for every candidate
        let leads = vec![lead_with_hint("a", Some("9 AM"))];
        assert!(recommend(&leads).iter().all(|s| s.final_score <= 99));
    }

    #[test]
    fn ties_preserve_candidate_order() {
        // all slots matched: every score gets +5, order must stay fixed
        let leads = vec![
            lead_with_hint("a", Some("9 AM")),
            lead_with_hint("b", Some("11 AM")),
            lead_with_hint("c", Some("2 PM")),
            lead_with_hint("d", Some("4 PM")),
        ];
        let slots = recommend(&leads);
        let hours: Vec<u32> = slots.iter().map(|s| s.hour).collect();
        assert_eq!(hours, vec![9, 11, 14, 16]);
    }
}
