use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::credits::CreditLedger;
use crate::models::{ClassifiedLead, Result};
use crate::store::StateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchAction {
    Verify,
    Call,
    Email,
    Export,
}

impl DispatchAction {
    /// Cost model per action. AI verification is metered per lead; the other
    /// channels are free at this layer (their transports bill elsewhere).
    pub fn credits_required(&self, lead_count: usize) -> u64 {
        match self {
            DispatchAction::Verify => lead_count as u64,
            DispatchAction::Call | DispatchAction::Email | DispatchAction::Export => 0,
        }
    }
}

impl std::fmt::Display for DispatchAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchAction::Verify => write!(f, "verify"),
            DispatchAction::Call => write!(f, "call"),
            DispatchAction::Email => write!(f, "email"),
            DispatchAction::Export => write!(f, "export"),
        }
    }
}

/// A requested bulk action against the current selection.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub action: DispatchAction,
    pub target_leads: Vec<ClassifiedLead>,
}

/// Outcome of the credit gate. Replaces ad-hoc notification side effects
/// with a tagged result the caller routes on.
#[derive(Debug)]
pub enum DispatchDecision {
    Approved {
        receipt_id: Uuid,
        credits_charged: u64,
        balance_after: u64,
    },
    /// Terminal until an external top-up; the engine never auto-retries.
    InsufficientCredits {
        required: u64,
        balance: u64,
        shortfall: u64,
    },
    /// Empty selection - a precondition failure, not a silent no-op.
    Rejected { reason: String },
}

/// Per-lead result reported back by a channel collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadOutcome {
    pub lead_id: String,
    pub success: bool,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    Completed,
    PartialFailure,
}

impl std::fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchStatus::Completed => write!(f, "completed"),
            DispatchStatus::PartialFailure => write!(f, "partial_failure"),
        }
    }
}

/// Record of one approved-and-executed dispatch, kept in history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchReceipt {
    pub id: String,
    pub action: DispatchAction,
    pub lead_count: usize,
    pub credits_charged: u64,
    pub requested_at: DateTime<Utc>,
    pub status: DispatchStatus,
    pub failed_lead_ids: Vec<String>,
}

#[derive(Debug)]
pub enum DispatchReport {
    Executed(DispatchReceipt),
    InsufficientCredits {
        required: u64,
        balance: u64,
        shortfall: u64,
    },
    Rejected { reason: String },
}

/// The channel-specific collaborator (telephony, SMTP, CRM export, AI
/// verification) the engine hands approved batches to.
#[async_trait]
pub trait ChannelExecutor: Send + Sync {
    async fn execute(
        &self,
        action: DispatchAction,
        leads: &[ClassifiedLead],
    ) -> Result<Vec<LeadOutcome>>;
}

/// Credit-gated dispatch. The ledger sits behind a mutex so two concurrent
/// requests can never both see a stale balance and over-approve: there is at
/// most one in-flight debit decision at a time.
pub struct Dispatcher {
    ledger: Mutex<CreditLedger>,
}

impl Dispatcher {
    pub fn new(ledger: CreditLedger) -> Self {
        Self {
            ledger: Mutex::new(ledger),
        }
    }

    pub fn balance(&self) -> u64 {
        self.lock_ledger().balance()
    }

    /// External top-up collaborator entry point.
    pub fn top_up(&self, amount: u64) {
        self.lock_ledger().credit(amount);
    }

    /// Requested → {Approved | InsufficientCredits | Rejected}. The debit is
    /// applied atomically with the approval, under the ledger lock. No state
    /// changes on the blocked paths.
    pub fn decide(&self, request: &DispatchRequest) -> DispatchDecision {
        if request.target_leads.is_empty() {
            return DispatchDecision::Rejected {
                reason: format!("no leads selected for `{}`", request.action),
            };
        }

        let required = request.action.credits_required(request.target_leads.len());
        let mut ledger = self.lock_ledger();

        match ledger.debit(required) {
            Ok(balance_after) => DispatchDecision::Approved {
                receipt_id: Uuid::new_v4(),
                credits_charged: required,
                balance_after,
            },
            Err(shortfall) => DispatchDecision::InsufficientCredits {
                required,
                balance: ledger.balance(),
                shortfall,
            },
        }
    }

    /// Full pipeline: decide, then on approval hand the batch to the channel
    /// executor and record the receipt. Credits buy the attempt - a partial
    /// downstream failure is recorded but never refunded.
    pub async fn dispatch(
        &self,
        request: DispatchRequest,
        executor: &dyn ChannelExecutor,
        store: &StateStore,
    ) -> Result<DispatchReport> {
        let decision = self.decide(&request);
        let (receipt_id, credits_charged) = match decision {
            DispatchDecision::Approved {
                receipt_id,
                credits_charged,
                balance_after,
            } => {
                info!(
                    "Approved `{}` for {} lead(s), {} credit(s) charged, {} remaining",
                    request.action,
                    request.target_leads.len(),
                    credits_charged,
                    balance_after
                );
                self.persist_balance(store).await?;
                (receipt_id, credits_charged)
            }
            DispatchDecision::InsufficientCredits {
                required,
                balance,
                shortfall,
            } => {
                warn!(
                    "Blocked `{}`: need {} credit(s), have {} (short {})",
                    request.action, required, balance, shortfall
                );
                return Ok(DispatchReport::InsufficientCredits {
                    required,
                    balance,
                    shortfall,
                });
            }
            DispatchDecision::Rejected { reason } => {
                return Ok(DispatchReport::Rejected { reason });
            }
        };

        // Executing: the channel collaborator owns the actual I/O
        let outcomes = executor
            .execute(request.action, &request.target_leads)
            .await?;

        let failed_lead_ids: Vec<String> = outcomes
            .iter()
            .filter(|o| !o.success)
            .map(|o| o.lead_id.clone())
            .collect();
        let status = if failed_lead_ids.is_empty() {
            DispatchStatus::Completed
        } else {
            warn!(
                "`{}` finished with {} of {} lead(s) failed",
                request.action,
                failed_lead_ids.len(),
                outcomes.len()
            );
            DispatchStatus::PartialFailure
        };

        let receipt = DispatchReceipt {
            id: receipt_id.to_string(),
            action: request.action,
            lead_count: request.target_leads.len(),
            credits_charged,
            requested_at: Utc::now(),
            status,
            failed_lead_ids,
        };
        store.append_receipt(&receipt).await?;

        Ok(DispatchReport::Executed(receipt))
    }

    pub async fn persist_balance(&self, store: &StateStore) -> Result<()> {
        let balance = self.balance();
        store.set(crate::credits::CREDITS_KEY, &balance.to_string()).await
    }

    fn lock_ledger(&self) -> MutexGuard<'_, CreditLedger> {
        // a poisoned lock still holds a consistent ledger (debit is atomic)
        self.ledger.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::models::LeadRecord;

    fn leads(n: usize) -> Vec<ClassifiedLead> {
        classify(
            (0..n)
                .map(|i| LeadRecord {
                    id: format!("lead-{}", i),
                    name: format!("Business {}", i),
                    phone: None,
                    email: None,
                    website: None,
                    address: None,
                    rating: None,
                    website_analysis: None,
                    best_time_to_call: None,
                    ready_to_call: false,
                    warnings: Vec::new(),
                })
                .collect(),
        )
    }

    #[test]
    fn empty_selection_is_rejected_without_state_change() {
        let dispatcher = Dispatcher::new(CreditLedger::new(10));
        let request = DispatchRequest {
            action: DispatchAction::Verify,
            target_leads: Vec::new(),
        };

        assert!(matches!(
            dispatcher.decide(&request),
            DispatchDecision::Rejected { .. }
        ));
        assert_eq!(dispatcher.balance(), 10);
    }

    #[test]
    fn verify_charges_one_credit_per_lead() {
        let dispatcher = Dispatcher::new(CreditLedger::new(10));
        let request = DispatchRequest {
            action: DispatchAction::Verify,
            target_leads: leads(4),
        };

        match dispatcher.decide(&request) {
            DispatchDecision::Approved {
                credits_charged,
                balance_after,
                ..
            } => {
                assert_eq!(credits_charged, 4);
                assert_eq!(balance_after, 6);
            }
            other => panic!("expected approval, got {:?}", other),
        }
        assert_eq!(dispatcher.balance(), 6);
    }

    #[test]
    fn insufficient_credits_reports_exact_shortfall() {
        let dispatcher = Dispatcher::new(CreditLedger::new(10));
        let request = DispatchRequest {
            action: DispatchAction::Verify,
            target_leads: leads(15),
        };

        match dispatcher.decide(&request) {
            DispatchDecision::InsufficientCredits {
                required,
                balance,
                shortfall,
            } => {
                assert_eq!(required, 15);
                assert_eq!(balance, 10);
                assert_eq!(shortfall, 5);
            }
            other => panic!("expected insufficient credits, got {:?}", other),
        }
        // blocked request leaves the ledger untouched
        assert_eq!(dispatcher.balance(), 10);
    }

    #[test]
    fn free_actions_approve_on_zero_balance() {
        let dispatcher = Dispatcher::new(CreditLedger::new(0));
        for action in [
            DispatchAction::Call,
            DispatchAction::Email,
            DispatchAction::Export,
        ] {
            let request = DispatchRequest {
                action,
                target_leads: leads(3),
            };
            assert!(matches!(
                dispatcher.decide(&request),
                DispatchDecision::Approved {
                    credits_charged: 0,
                    ..
                }
            ));
        }
        assert_eq!(dispatcher.balance(), 0);
    }

    #[test]
    fn concurrent_requests_never_over_approve() {
        use std::sync::Arc;

        // 10 credits, 4 threads each asking to verify 3 leads: at most 3
        // approvals can fit, and the balance must never underflow.
        let dispatcher = Arc::new(Dispatcher::new(CreditLedger::new(10)));
        let mut handles = Vec::new();

        for _ in 0..4 {
            let dispatcher = Arc::clone(&dispatcher);
            handles.push(std::thread::spawn(move || {
                let request = DispatchRequest {
                    action: DispatchAction::Verify,
                    target_leads: leads(3),
                };
                matches!(dispatcher.decide(&request), DispatchDecision::Approved { .. })
            }));
        }

        let approvals = handles
            .into_iter()
            .map(|h| h.join().expect("decide thread panicked"))
            .filter(|approved| *approved)
            .count();

        assert_eq!(approvals, 3);
        assert_eq!(dispatcher.balance(), 10 - 3 * approvals as u64);
    }

    #[tokio::test]
    async fn partial_failure_keeps_the_debit() {
        struct FlakyChannel;

        #[async_trait]
        impl ChannelExecutor for FlakyChannel {
            async fn execute(
                &self,
                _action: DispatchAction,
                leads: &[ClassifiedLead],
            ) -> Result<Vec<LeadOutcome>> {
                Ok(leads
                    .iter()
                    .enumerate()
                    .map(|(i, lead)| LeadOutcome {
                        lead_id: lead.id().to_string(),
                        success: i % 2 == 0,
                        detail: (i % 2 != 0).then(|| "bounced".to_string()),
                    })
                    .collect())
            }
        }

        let store = StateStore::open_in_memory().await.expect("in-memory store");
        let dispatcher = Dispatcher::new(CreditLedger::new(10));
        let request = DispatchRequest {
            action: DispatchAction::Verify,
            target_leads: leads(4),
        };

        let report = dispatcher
            .dispatch(request, &FlakyChannel, &store)
            .await
            .expect("dispatch");

        match report {
            DispatchReport::Executed(receipt) => {
                assert_eq!(receipt.status, DispatchStatus::PartialFailure);
                assert_eq!(receipt.failed_lead_ids, vec!["lead-1", "lead-3"]);
                assert_eq!(receipt.credits_charged, 4);
            }
            other => panic!("expected executed receipt, got {:?}", other),
        }
        // no refund for the failed half
        assert_eq!(dispatcher.balance(), 6);
    }
}
