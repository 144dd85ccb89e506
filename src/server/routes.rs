pub mod health {
    use rocket::{get, serde::json::Json};
    use serde_json::{json, Value};

    #[get("/health")]
    pub async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "service": "lead-engine-api"
        }))
    }

    #[get("/")]
    pub async fn index() -> Json<Value> {
        Json(json!({
            "name": "Lead Engine API",
            "version": "0.1.0",
            "description": "Scored and tiered leads with credit-gated dispatch",
            "endpoints": {
                "health": "/api/health",
                "stats": "/api/stats",
                "credits": "/api/credits",
                "leads": "/api/leads",
                "timeslots": "/api/timeslots",
                "dispatch": "/api/dispatch"
            }
        }))
    }
}
