use std::sync::Arc;

use rocket::{routes, Build, Rocket};

use crate::api::*;
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::models::ClassifiedLead;
use crate::store::StateStore;

pub mod routes;

pub struct ServerState {
    pub config: Config,
    pub store: StateStore,
    pub leads: Vec<ClassifiedLead>,
    pub dispatcher: Arc<Dispatcher>,
}

pub fn build_rocket(state: ServerState) -> Rocket<Build> {
    let figment = rocket::Config::figment().merge(("port", state.config.server.port));

    rocket::custom(figment).manage(state).mount(
        "/api",
        routes![
            // Health and info endpoints
            routes::health::health_check,
            routes::health::index,
            // Engine endpoints
            get_stats,
            get_credits,
            get_leads,
            recommend_timeslots,
            post_dispatch,
        ],
    )
}
