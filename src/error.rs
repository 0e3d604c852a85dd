use thiserror::Error;

use crate::{AccountId, Amount, SnapshotId};

/// Canonical error type exposed by the wrapper ledger.
///
/// Every failure aborts the enclosing operation and leaves ledger state
/// exactly as it was before the call; there is no internal retry or
/// partial-rollback path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Historic lookups reject the reserved id 0 ("no snapshot taken yet").
    #[error("snapshot id 0 is reserved")]
    InvalidSnapshotId,

    /// The queried snapshot id has not been issued yet.
    #[error("snapshot {id} does not exist (last issued id: {last})")]
    SnapshotNotFound { id: SnapshotId, last: SnapshotId },

    /// Minting `requested` would push total supply past the collateral pool.
    #[error("mint of {requested} exceeds collateral: supply {supply}, pool {pool}")]
    ExceedsCollateral {
        requested: Amount,
        supply: Amount,
        pool: Amount,
    },

    /// Transfer or burn amount exceeds the account's current balance.
    #[error("insufficient balance in account {account}: requested {requested}, available {available}")]
    InsufficientBalance {
        account: AccountId,
        requested: Amount,
        available: Amount,
    },

    /// The external collateral asset rejected a pull or push.
    #[error("collateral transfer failed: {reason}")]
    CollateralTransferFailed { reason: String },
}
