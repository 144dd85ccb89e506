use serde::{Deserialize, Serialize};

use crate::{
    config::Config, dispatch::Dispatcher, selection::SelectionManager, store::StateStore,
};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Canonical lead shape consumed by scoring. Optional contact fields stay
/// `None` when the upstream record omitted them, so rules can tell "no phone"
/// apart from "phone is an empty string".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub website_analysis: Option<WebsiteAnalysis>,
    pub best_time_to_call: Option<String>,
    /// Set by the AI-verification collaborator, never recomputed here.
    #[serde(default)]
    pub ready_to_call: bool,
    /// Data-quality warnings collected during normalization (clamped rating,
    /// malformed website URL).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteAnalysis {
    pub has_website: bool,
    pub platform: Option<String>,
    pub needs_upgrade: bool,
    pub issues: Vec<String>,
    pub mobile_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "hot")]
    Hot,
    #[serde(rename = "warm")]
    Warm,
    #[serde(rename = "cold")]
    Cold,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Hot => write!(f, "hot"),
            Tier::Warm => write!(f, "warm"),
            Tier::Cold => write!(f, "cold"),
        }
    }
}

/// A lead plus its scoring result. Recomputed on demand; the source
/// `LeadRecord` is never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedLead {
    #[serde(flatten)]
    pub lead: LeadRecord,
    pub score: i64,
    pub tier: Tier,
    pub reasons: Vec<String>,
}

impl ClassifiedLead {
    pub fn id(&self) -> &str {
        &self.lead.id
    }
}

pub struct LeadApp {
    pub config: Config,
    pub store: StateStore,
    pub leads: Vec<ClassifiedLead>,
    pub selection: SelectionManager,
    pub dispatcher: std::sync::Arc<Dispatcher>,
}
