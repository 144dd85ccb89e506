use tracing::info;

use crate::models::Result;
use crate::store::StateStore;

pub const CREDITS_KEY: &str = "credits";

/// Consumable verification credits. The balance is unsigned, so it can never
/// go negative; `debit` is checked and refuses a partial spend.
#[derive(Debug)]
pub struct CreditLedger {
    balance: u64,
}

impl CreditLedger {
    pub fn new(balance: u64) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Debit the full amount or nothing. Returns the new balance on success,
    /// the exact shortfall on refusal.
    pub fn debit(&mut self, amount: u64) -> std::result::Result<u64, u64> {
        if amount > self.balance {
            return Err(amount - self.balance);
        }
        self.balance -= amount;
        Ok(self.balance)
    }

    /// Top-ups come from the external purchase collaborator.
    pub fn credit(&mut self, amount: u64) {
        self.balance += amount;
    }

    /// Load the stored balance, falling back to the configured starting
    /// balance for a fresh store.
    pub async fn restore(store: &StateStore, starting_balance: u64) -> Result<Self> {
        match store.get(CREDITS_KEY).await? {
            Some(raw) => {
                let balance: u64 = raw.parse()?;
                Ok(Self::new(balance))
            }
            None => {
                info!("No stored credit balance, starting with {}", starting_balance);
                Ok(Self::new(starting_balance))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debit_within_balance() {
        let mut ledger = CreditLedger::new(10);
        assert_eq!(ledger.debit(4), Ok(6));
        assert_eq!(ledger.balance(), 6);
    }

    #[test]
    fn overdraft_is_refused_with_exact_shortfall() {
        let mut ledger = CreditLedger::new(10);
        assert_eq!(ledger.debit(15), Err(5));
        // no partial debit
        assert_eq!(ledger.balance(), 10);
    }

    #[test]
    fn exact_balance_drains_to_zero() {
        let mut ledger = CreditLedger::new(7);
        assert_eq!(ledger.debit(7), Ok(0));
        assert_eq!(ledger.debit(1), Err(1));
    }

    #[test]
    fn credit_tops_up() {
        let mut ledger = CreditLedger::new(0);
        ledger.credit(25);
        assert_eq!(ledger.balance(), 25);
    }
}
