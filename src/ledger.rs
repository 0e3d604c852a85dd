//! Authoritative wrapped balances, total supply, and the collateralization
//! invariant.
//!
//! Every mutation records the post-mutation value into the affected
//! histories under the still-open snapshot window, so a snapshot taken later
//! observes state as of its own boundary. The live balance of an account is
//! by construction the latest recorded value of its history (the sparse
//! record call dedupes unchanged values without losing that property).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::collateral::SharedCollateral;
use crate::{
    AccountId, Amount, LedgerError, SharedSnapshotClock, SnapshotHistory, SnapshotId,
};

/// Collateral-bounded balance ledger with snapshot-indexed history.
///
/// Invariant: after every mutating operation,
/// `total_supply() <= collateral_pool()` and `total_supply()` equals the sum
/// of all account balances. Neither needs to hold mid-operation.
pub struct WrappedLedger {
    balance_history: BTreeMap<AccountId, SnapshotHistory<Amount>>,
    supply_history: SnapshotHistory<Amount>,
    clock: SharedSnapshotClock,
    collateral: SharedCollateral,
    pool_account: AccountId,
}

impl WrappedLedger {
    /// `pool_account` is the ledger's own account on the external collateral
    /// ledger; its balance there is the collateral pool.
    pub fn new(
        clock: SharedSnapshotClock,
        collateral: SharedCollateral,
        pool_account: AccountId,
    ) -> Self {
        Self {
            balance_history: BTreeMap::new(),
            supply_history: SnapshotHistory::new(),
            clock,
            collateral,
            pool_account,
        }
    }

    pub fn pool_account(&self) -> &AccountId {
        &self.pool_account
    }

    /// Collateral actually held by the pool account on the external ledger.
    pub fn collateral_pool(&self) -> Amount {
        self.collateral.borrow().balance_of(&self.pool_account)
    }

    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balance_history
            .get(account)
            .map(SnapshotHistory::latest)
            .unwrap_or(0)
    }

    pub fn total_supply(&self) -> Amount {
        self.supply_history.latest()
    }

    pub fn last_snapshot_id(&self) -> SnapshotId {
        self.clock.borrow().last_id()
    }

    /// Mint `amount` wrapped units to `account`.
    ///
    /// Fails with [`LedgerError::ExceedsCollateral`] unless the grown supply
    /// still fits inside the collateral pool at call time. Zero-amount mints
    /// are permitted; the history record dedupes the unchanged value.
    pub fn mint_to(&mut self, account: &AccountId, amount: Amount) -> Result<(), LedgerError> {
        let supply = self.total_supply();
        let pool = self.collateral_pool();
        let grown = supply
            .checked_add(amount)
            .filter(|&grown| grown <= pool)
            .ok_or(LedgerError::ExceedsCollateral {
                requested: amount,
                supply,
                pool,
            })?;
        let window = self.open_window();
        let balance = self.balance_of(account);
        self.record_balance(account, window, balance + amount);
        self.supply_history.record(window, grown);
        Ok(())
    }

    /// Move `amount` from `from` to `to`. Total supply is unchanged and its
    /// history is not re-recorded.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let debited = self.debited_balance(from, amount)?;
        let window = self.open_window();
        self.record_balance(from, window, debited);
        // Self-transfer lands on the already-updated entry.
        let credited = self.balance_of(to) + amount;
        self.record_balance(to, window, credited);
        Ok(())
    }

    /// Destroy `amount` wrapped units held by `account`, shrinking supply.
    pub fn burn(&mut self, account: &AccountId, amount: Amount) -> Result<(), LedgerError> {
        let debited = self.debited_balance(account, amount)?;
        let window = self.open_window();
        self.record_balance(account, window, debited);
        let supply = self.total_supply() - amount;
        self.supply_history.record(window, supply);
        Ok(())
    }

    /// Ledger-internal snapshot: advance the shared counter and return the
    /// new id without touching any balance. Forces a fresh checkpoint
    /// boundary independent of any transfer.
    pub fn snapshot(&mut self) -> SnapshotId {
        self.clock.borrow_mut().advance()
    }

    /// Balance of `account` as of snapshot `id`.
    pub fn balance_of_at(
        &self,
        account: &AccountId,
        id: SnapshotId,
    ) -> Result<Amount, LedgerError> {
        let last = self.last_snapshot_id();
        match self.balance_history.get(account) {
            Some(history) => history.value_at(id, last),
            None => SnapshotHistory::default().value_at(id, last),
        }
    }

    /// Total supply as of snapshot `id`.
    pub fn total_supply_at(&self, id: SnapshotId) -> Result<Amount, LedgerError> {
        self.supply_history.value_at(id, self.last_snapshot_id())
    }

    /// Tamper-evidence checkpoint: every non-zero balance and the supply as
    /// of snapshot `id`, committed to a Sha256 digest.
    pub fn checkpoint(&self, id: SnapshotId) -> Result<LedgerCheckpoint, LedgerError> {
        let mut balances = BTreeMap::new();
        for account in self.balance_history.keys() {
            let balance = self.balance_of_at(account, id)?;
            if balance > 0 {
                balances.insert(account.clone(), balance);
            }
        }
        let total_supply = self.total_supply_at(id)?;
        let digest = compute_digest(id, &balances, total_supply);
        Ok(LedgerCheckpoint {
            id,
            balances,
            total_supply,
            digest,
        })
    }

    /// Undo a committed burn after a failed external push. Skips the
    /// collateral guard: the pool still holds the collateral backing the
    /// re-credited units.
    pub(crate) fn reinstate(&mut self, account: &AccountId, amount: Amount) {
        let window = self.open_window();
        let balance = self.balance_of(account) + amount;
        self.record_balance(account, window, balance);
        let supply = self.total_supply() + amount;
        self.supply_history.record(window, supply);
    }

    fn open_window(&self) -> SnapshotId {
        self.clock.borrow().open_window()
    }

    fn record_balance(&mut self, account: &AccountId, window: SnapshotId, value: Amount) {
        self.balance_history
            .entry(account.clone())
            .or_default()
            .record(window, value);
    }

    fn debited_balance(
        &self,
        account: &AccountId,
        amount: Amount,
    ) -> Result<Amount, LedgerError> {
        let available = self.balance_of(account);
        available
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientBalance {
                account: account.clone(),
                requested: amount,
                available,
            })
    }
}

/// Point-in-time commitment over the ledger state at one snapshot id.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerCheckpoint {
    pub id: SnapshotId,
    pub balances: BTreeMap<AccountId, Amount>,
    pub total_supply: Amount,
    pub digest: [u8; 32],
}

impl LedgerCheckpoint {
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

fn compute_digest(
    id: SnapshotId,
    balances: &BTreeMap<AccountId, Amount>,
    total_supply: Amount,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"wrap-ledger-checkpoint");
    hasher.update(id.to_le_bytes());
    for (account, balance) in balances {
        hasher.update(b"acct");
        hasher.update(account.as_bytes());
        hasher.update(balance.to_le_bytes());
    }
    hasher.update(b"supply");
    hasher.update(total_supply.to_le_bytes());
    hasher.finalize().into()
}
