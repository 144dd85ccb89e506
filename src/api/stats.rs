use rocket::{get, serde::json::Json, State};
use serde::Serialize;

use crate::classify::group_by;
use crate::server::ServerState;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

#[derive(Serialize)]
pub struct TierStats {
    pub total_leads: usize,
    pub hot: usize,
    pub warm: usize,
    pub cold: usize,
    pub ready_to_call: usize,
    pub no_website: usize,
    pub avg_score: f64,
}

#[get("/stats")]
pub async fn get_stats(state: &State<ServerState>) -> Json<ApiResponse<TierStats>> {
    let groups = group_by(&state.leads);
    let total = state.leads.len();
    let avg_score = if total > 0 {
        state.leads.iter().map(|l| l.score as f64).sum::<f64>() / total as f64
    } else {
        0.0
    };

    Json(ApiResponse::success(TierStats {
        total_leads: total,
        hot: groups.hot.len(),
        warm: groups.warm.len(),
        cold: groups.cold.len(),
        ready_to_call: groups.ready_to_call.len(),
        no_website: groups.no_website.len(),
        avg_score,
    }))
}

#[derive(Serialize)]
pub struct CreditStatus {
    pub balance: u64,
}

#[get("/credits")]
pub async fn get_credits(state: &State<ServerState>) -> Json<ApiResponse<CreditStatus>> {
    Json(ApiResponse::success(CreditStatus {
        balance: state.dispatcher.balance(),
    }))
}
