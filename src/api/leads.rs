use rocket::{get, post, serde::json::Json, State};
use serde::{Deserialize, Serialize};

use crate::api::stats::ApiResponse;
use crate::models::{ClassifiedLead, Tier};
use crate::server::ServerState;
use crate::timeslots::{recommend, AiTimeSlot};

#[derive(Serialize)]
pub struct LeadsResponse {
    pub leads: Vec<ClassifiedLead>,
    pub total_count: usize,
    pub page: usize,
    pub per_page: usize,
}

#[get("/leads?<tier>&<min_score>&<page>&<per_page>")]
pub async fn get_leads(
    state: &State<ServerState>,
    tier: Option<String>,
    min_score: Option<i64>,
    page: Option<usize>,
    per_page: Option<usize>,
) -> Json<ApiResponse<LeadsResponse>> {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(50).min(1000);

    let tier_filter = match tier.as_deref() {
        Some("hot") => Some(Tier::Hot),
        Some("warm") => Some(Tier::Warm),
        Some("cold") => Some(Tier::Cold),
        Some(other) => {
            return Json(ApiResponse::error(format!("unknown tier `{}`", other)));
        }
        None => None,
    };

    let filtered: Vec<&ClassifiedLead> = state
        .leads
        .iter()
        .filter(|l| tier_filter.map_or(true, |t| l.tier == t))
        .filter(|l| min_score.map_or(true, |min| l.score >= min))
        .collect();

    let total_count = filtered.len();
    let leads: Vec<ClassifiedLead> = filtered
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();

    Json(ApiResponse::success(LeadsResponse {
        leads,
        total_count,
        page,
        per_page,
    }))
}

#[derive(Deserialize)]
pub struct TimeSlotBody {
    pub lead_ids: Vec<String>,
}

#[derive(Serialize)]
pub struct TimeSlotResponse {
    pub slots: Vec<AiTimeSlot>,
    pub leads_considered: usize,
}

/// Recommend send times for the given selection.
#[post("/timeslots", data = "<body>")]
pub async fn recommend_timeslots(
    state: &State<ServerState>,
    body: Json<TimeSlotBody>,
) -> Json<ApiResponse<TimeSlotResponse>> {
    let selected: Vec<&ClassifiedLead> = state
        .leads
        .iter()
        .filter(|l| body.lead_ids.iter().any(|id| id == l.id()))
        .collect();

    let slots = recommend(selected.iter().map(|l| &l.lead));
    Json(ApiResponse::success(TimeSlotResponse {
        leads_considered: selected.len(),
        slots,
    }))
}
