//! Seam to the external collateral asset.
//!
//! The wrapper ledger never owns the collateral's accounting; it only reads
//! the pool balance and asks the asset to move funds. [`CollateralAsset`]
//! captures the transfer/approve/balance primitives that contract requires,
//! and [`TokenLedger`] is an in-memory implementation used in tests and
//! single-process deployments.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, LedgerError};

/// External fungible asset held as collateral.
///
/// Any externally reported failure surfaces as
/// [`LedgerError::CollateralTransferFailed`]; the caller performs no retries.
pub trait CollateralAsset {
    /// Balance of `account` on the external ledger.
    fn balance_of(&self, account: &AccountId) -> Amount;

    /// Move `amount` from `from` to `to`.
    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming
    /// allowance.
    fn transfer_from(
        &mut self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    /// Let `spender` move up to `amount` out of `owner`'s balance.
    /// `Amount::MAX` is treated as unlimited.
    fn approve(&mut self, owner: &AccountId, spender: &AccountId, amount: Amount);
}

/// Shared handle to the collateral asset. The ledger reads the pool balance
/// through it; the gateway moves funds through it. One cell, one sequential
/// execution boundary.
pub type SharedCollateral = Rc<RefCell<dyn CollateralAsset>>;

/// Minimal in-memory fungible token: balances plus allowances.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenLedger {
    balances: BTreeMap<AccountId, Amount>,
    allowances: BTreeMap<(AccountId, AccountId), Amount>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `amount` units in `account`. Test/deployment funding hook; the
    /// wrapper ledger itself never calls this.
    pub fn mint(&mut self, account: &AccountId, amount: Amount) {
        let balance = self.balances.entry(account.clone()).or_default();
        *balance += amount;
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }
}

impl CollateralAsset for TokenLedger {
    fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::CollateralTransferFailed {
                reason: format!(
                    "transfer amount exceeds balance of {from}: requested {amount}, available {available}"
                ),
            });
        }
        if let Some(balance) = self.balances.get_mut(from) {
            *balance -= amount;
        }
        let balance = self.balances.entry(to.clone()).or_default();
        *balance += amount;
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(LedgerError::CollateralTransferFailed {
                reason: format!(
                    "transfer amount exceeds allowance of {spender}: requested {amount}, allowed {allowed}"
                ),
            });
        }
        self.transfer(from, to, amount)?;
        if allowed != Amount::MAX {
            self.allowances
                .insert((from.clone(), spender.clone()), allowed - amount);
        }
        Ok(())
    }

    fn approve(&mut self, owner: &AccountId, spender: &AccountId, amount: Amount) {
        self.allowances
            .insert((owner.clone(), spender.clone()), amount);
    }
}
