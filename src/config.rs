use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub credits: CreditsConfig,
    pub ingestion: IngestionConfig,
    pub persistence: PersistenceConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
    pub email: EmailConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreditsConfig {
    /// Balance a brand-new state store starts with.
    pub starting_balance: u64,
    /// CLI asks for confirmation before any dispatch costing more than this.
    pub confirm_above: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestionConfig {
    /// Path to a JSON file of raw leads from the scraper.
    pub leads_file: String,
    /// Optional HTTP endpoint serving the same payload; takes precedence
    /// over the file when set.
    pub leads_endpoint: Option<String>,
    pub api_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PersistenceConfig {
    pub db_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: String,
    pub pretty_json: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub delay_between_emails_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credits: CreditsConfig {
                starting_balance: 25,
                confirm_above: 10,
            },
            ingestion: IngestionConfig {
                leads_file: "data/leads.json".to_string(),
                leads_endpoint: None,
                api_timeout_seconds: 10,
            },
            persistence: PersistenceConfig {
                db_path: "data/engine.db".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            output: OutputConfig {
                directory: "out".to_string(),
                pretty_json: true,
            },
            email: EmailConfig {
                delay_between_emails_ms: 3000,
            },
            server: ServerConfig { port: 8000 },
        }
    }
}

pub async fn load_config(
    path: &str,
) -> std::result::Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}
