//! Atomic bridge between the external collateral asset and the wrapped
//! ledger.
//!
//! Deposit is pull-then-mint, withdraw is burn-then-push; each pair is one
//! atomic unit. Ordering matters on withdraw: burning first means no observer
//! inside the unit ever sees the pool under-collateralized, and a failed push
//! is compensated by re-crediting the burned units before the operation
//! reports failure.

use crate::collateral::SharedCollateral;
use crate::{AccountId, Amount, LedgerError, WrappedLedger};

/// Thin adapter translating deposit/withdraw requests into collateral
/// movements plus ledger mutations.
///
/// Holds its own handle to the collateral cell; the ledger is borrowed per
/// call so that all state stays behind the one sequential execution boundary.
#[derive(Clone)]
pub struct CollateralGateway {
    collateral: SharedCollateral,
}

impl CollateralGateway {
    pub fn new(collateral: SharedCollateral) -> Self {
        Self { collateral }
    }

    /// Pull `amount` collateral from `caller` into the pool, then mint the
    /// same amount of wrapped units to `beneficiary`.
    ///
    /// If the external pull fails nothing is minted. Once the pull succeeds
    /// the mint cannot exceed the pool it just grew.
    pub fn deposit_for(
        &self,
        ledger: &mut WrappedLedger,
        caller: &AccountId,
        beneficiary: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let pool = ledger.pool_account().clone();
        self.collateral
            .borrow_mut()
            .transfer_from(&pool, caller, &pool, amount)?;
        if let Err(err) = ledger.mint_to(beneficiary, amount) {
            // Unreachable while the pool holds the units pulled above; refund
            // them if a foreign collateral implementation broke that.
            let _ = self.collateral.borrow_mut().transfer(&pool, caller, amount);
            return Err(err);
        }
        Ok(())
    }

    /// Burn `amount` wrapped units held by `caller`, then push the same
    /// amount of collateral from the pool to `recipient`.
    ///
    /// A push rejected by the external asset rolls the burn back and fails
    /// the whole operation; the ledger never ends up with supply reduced but
    /// collateral still allocated to a withdrawal that did not happen.
    pub fn withdraw_to(
        &self,
        ledger: &mut WrappedLedger,
        caller: &AccountId,
        recipient: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        ledger.burn(caller, amount)?;
        let pool = ledger.pool_account().clone();
        if let Err(err) = self
            .collateral
            .borrow_mut()
            .transfer(&pool, recipient, amount)
        {
            ledger.reinstate(caller, amount);
            return Err(err);
        }
        Ok(())
    }
}
