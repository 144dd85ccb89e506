use rocket::{post, serde::json::Json, State};
use serde::{Deserialize, Serialize};

use crate::api::stats::ApiResponse;
use crate::channels::executor_for;
use crate::dispatch::{DispatchAction, DispatchReceipt, DispatchReport, DispatchRequest};
use crate::models::ClassifiedLead;
use crate::server::ServerState;

#[derive(Deserialize)]
pub struct DispatchBody {
    pub action: DispatchAction,
    pub lead_ids: Vec<String>,
}

#[derive(Serialize)]
pub struct DispatchResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<DispatchReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortfall: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[post("/dispatch", data = "<body>")]
pub async fn post_dispatch(
    state: &State<ServerState>,
    body: Json<DispatchBody>,
) -> Json<ApiResponse<DispatchResponse>> {
    let target_leads: Vec<ClassifiedLead> = state
        .leads
        .iter()
        .filter(|l| body.lead_ids.iter().any(|id| id == l.id()))
        .cloned()
        .collect();

    let request = DispatchRequest {
        action: body.action,
        target_leads,
    };
    let executor = executor_for(body.action, &state.config.email, &state.config.output);

    match state
        .dispatcher
        .dispatch(request, executor.as_ref(), &state.store)
        .await
    {
        Ok(DispatchReport::Executed(receipt)) => {
            let status = match receipt.status {
                crate::dispatch::DispatchStatus::Completed => "completed",
                crate::dispatch::DispatchStatus::PartialFailure => "partial_failure",
            };
            Json(ApiResponse::success(DispatchResponse {
                status: status.to_string(),
                receipt: Some(receipt),
                required: None,
                balance: None,
                shortfall: None,
                reason: None,
            }))
        }
        Ok(DispatchReport::InsufficientCredits {
            required,
            balance,
            shortfall,
        }) => Json(ApiResponse::success(DispatchResponse {
            status: "insufficient_credits".to_string(),
            receipt: None,
            required: Some(required),
            balance: Some(balance),
            shortfall: Some(shortfall),
            reason: None,
        })),
        Ok(DispatchReport::Rejected { reason }) => Json(ApiResponse::success(DispatchResponse {
            status: "rejected".to_string(),
            receipt: None,
            required: None,
            balance: None,
            shortfall: None,
            reason: Some(reason),
        })),
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}
