//! Collateral-backed wrapper ledger with snapshot-indexed history.
//!
//! The crate mirrors a quantity of an external fungible asset ("collateral")
//! as a locally tracked wrapped balance, and keeps a tamper-evident record of
//! every balance and total-supply value at discrete checkpoints, queryable
//! after the fact by a monotonically increasing snapshot id.
//!
//! Building blocks, leaves first:
//!
//! * [`history`] — [`SnapshotHistory`], a generic append-only series mapping
//!   snapshot id → value with binary-search point-in-time lookup.
//! * [`clock`] — [`SnapshotClock`], the single shared monotonic id counter,
//!   plus [`SnapshotCoordinator`] for externally triggered snapshots.
//! * [`collateral`] — the [`CollateralAsset`] seam to the external ledger and
//!   an in-memory [`TokenLedger`] implementation of it.
//! * [`ledger`] — [`WrappedLedger`], the authoritative balances, supply, and
//!   collateralization invariant.
//! * [`gateway`] — [`CollateralGateway`], the atomic deposit/withdraw bridge
//!   between the external asset and the wrapped ledger.
//!
//! Execution is strictly sequential: all shared state (the id counter and the
//! collateral handle) sits behind `Rc<RefCell<_>>` cells inside one
//! mutual-exclusion boundary, and every public operation either fully applies
//! or fails leaving prior state untouched.

pub mod clock;
pub mod collateral;
pub mod gateway;
pub mod history;
pub mod ledger;

mod error;

pub use clock::{shared_clock, SharedSnapshotClock, SnapshotClock, SnapshotCoordinator};
pub use collateral::{CollateralAsset, SharedCollateral, TokenLedger};
pub use error::LedgerError;
pub use gateway::CollateralGateway;
pub use history::SnapshotHistory;
pub use ledger::{LedgerCheckpoint, WrappedLedger};

pub type AccountId = String;
pub type Amount = u128;
pub type SnapshotId = u64;

pub const UNIT: Amount = 1_000_000_000_000_000_000; // one whole wrapped token = 1e18 minimal units
