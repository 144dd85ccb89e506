use async_trait::async_trait;
use chrono::Utc;
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use crate::config::{EmailConfig, OutputConfig};
use crate::dispatch::{ChannelExecutor, DispatchAction, LeadOutcome};
use crate::models::{ClassifiedLead, Result};

/// Stand-in for the telephony / AI-verification collaborators: logs the
/// handoff and reports per-lead outcomes. A call needs a phone number on
/// file; verification accepts any lead.
pub struct LoggingChannel;

#[async_trait]
impl ChannelExecutor for LoggingChannel {
    async fn execute(
        &self,
        action: DispatchAction,
        leads: &[ClassifiedLead],
    ) -> Result<Vec<LeadOutcome>> {
        info!("Handing {} lead(s) to the `{}` channel", leads.len(), action);

        let outcomes = leads
            .iter()
            .map(|lead| {
                let missing_phone = action == DispatchAction::Call
                    && lead
                        .lead
                        .phone
                        .as_deref()
                        .map_or(true, |p| p.trim().is_empty());
                if missing_phone {
                    LeadOutcome {
                        lead_id: lead.id().to_string(),
                        success: false,
                        detail: Some("no phone number on file".to_string()),
                    }
                } else {
                    debug!("{}: queued {} ({})", action, lead.lead.name, lead.id());
                    LeadOutcome {
                        lead_id: lead.id().to_string(),
                        success: true,
                        detail: None,
                    }
                }
            })
            .collect();

        Ok(outcomes)
    }
}

/// Email campaign channel. Paces sends with the configured delay plus a
/// little jitter so the batch doesn't look robotic to the receiving side.
pub struct EmailChannel {
    config: EmailConfig,
}

impl EmailChannel {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn send_delay(&self) -> Duration {
        let jitter = fastrand::u64(0..=1000);
        Duration::from_millis(self.config.delay_between_emails_ms + jitter)
    }
}

#[async_trait]
impl ChannelExecutor for EmailChannel {
    async fn execute(
        &self,
        _action: DispatchAction,
        leads: &[ClassifiedLead],
    ) -> Result<Vec<LeadOutcome>> {
        let mut outcomes = Vec::with_capacity(leads.len());

        for (i, lead) in leads.iter().enumerate() {
            match lead.lead.email.as_deref() {
                Some(email) if !email.trim().is_empty() => {
                    // actual SMTP delivery happens behind this boundary
                    info!("Queued email to {} ({})", email, lead.lead.name);
                    outcomes.push(LeadOutcome {
                        lead_id: lead.id().to_string(),
                        success: true,
                        detail: None,
                    });
                }
                _ => outcomes.push(LeadOutcome {
                    lead_id: lead.id().to_string(),
                    success: false,
                    detail: Some("no email address on file".to_string()),
                }),
            }

            if i + 1 < leads.len() {
                sleep(self.send_delay()).await;
            }
        }

        Ok(outcomes)
    }
}

/// Writes the selected classified leads to a JSON file under the output
/// directory. The CRM field mapping itself lives in the downstream importer.
pub struct ExportChannel {
    config: OutputConfig,
}

impl ExportChannel {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ChannelExecutor for ExportChannel {
    async fn execute(
        &self,
        _action: DispatchAction,
        leads: &[ClassifiedLead],
    ) -> Result<Vec<LeadOutcome>> {
        tokio::fs::create_dir_all(&self.config.directory).await?;

        let filename = format!(
            "{}/leads_export_{}.json",
            self.config.directory,
            Utc::now().format("%Y%m%d_%H%M%S")
        );
        let json = if self.config.pretty_json {
            serde_json::to_string_pretty(leads)?
        } else {
            serde_json::to_string(leads)?
        };
        tokio::fs::write(&filename, json).await?;
        info!("Exported {} lead(s) to {}", leads.len(), filename);

        Ok(leads
            .iter()
            .map(|lead| LeadOutcome {
                lead_id: lead.id().to_string(),
                success: true,
                detail: Some(filename.clone()),
            })
            .collect())
    }
}

/// Route an action to its channel collaborator.
pub fn executor_for(
    action: DispatchAction,
    email: &EmailConfig,
    output: &OutputConfig,
) -> Box<dyn ChannelExecutor> {
    match action {
        DispatchAction::Email => Box::new(EmailChannel::new(email.clone())),
        DispatchAction::Export => Box::new(ExportChannel::new(output.clone())),
        DispatchAction::Verify | DispatchAction::Call => Box::new(LoggingChannel),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::models::LeadRecord;

    fn lead(id: &str, phone: Option<&str>, email: Option<&str>) -> LeadRecord {
        LeadRecord {
            id: id.to_string(),
            name: format!("Business {}", id),
            phone: phone.map(String::from),
            email: email.map(String::from),
            website: None,
            address: None,
            rating: None,
            website_analysis: None,
            best_time_to_call: None,
            ready_to_call: false,
            warnings: Vec::new(),
        }
    }

    #[tokio::test]
    async fn call_channel_fails_leads_without_phone() {
        let leads = classify(vec![
            lead("a", Some("555-0001"), None),
            lead("b", None, None),
        ]);

        let outcomes = LoggingChannel
            .execute(DispatchAction::Call, &leads)
            .await
            .expect("execute");

        assert!(outcomes[0].success);
        assert!(!outcomes[1].success);
    }

    #[tokio::test]
    async fn email_channel_reports_missing_addresses() {
        let channel = EmailChannel::new(EmailConfig {
            delay_between_emails_ms: 0,
        });
        let leads = classify(vec![
            lead("a", None, Some("owner@a.example")),
            lead("b", None, Some("")),
            lead("c", None, None),
        ]);

        let outcomes = channel
            .execute(DispatchAction::Email, &leads)
            .await
            .expect("execute");

        let successes: Vec<bool> = outcomes.iter().map(|o| o.success).collect();
        assert_eq!(successes, vec![true, false, false]);
    }
}
