#![deny(missing_docs)]
#![deny(unreachable_pub)]
#![warn(clippy::arithmetic_side_effects)]

//! A pure Rust model of the Five Pillars investment-manager accounting.
//!
//! The crate mirrors, off-chain, the deterministic accounting state machine
//! of the deployed contract: fixed-point balances, the referral forest, pool
//! eligibility, deposit admission, and the claim/redistribution split. It
//! performs no I/O and never consults a system clock; callers inject ledger
//! snapshots and wall-clock time, and every verdict it produces is advisory.
//! Authority always rests with the ledger's own acceptance of a transaction.

/// Account address.
pub mod address;

/// Error type.
pub mod error;

/// Fixed-point amount.
pub mod fixed;

/// System state and constants.
pub mod system;

/// Investor ledger record.
pub mod investor;

/// Referral graph.
pub mod referral;

/// Pool registry.
pub mod pool;

/// Eligibility evaluator.
pub mod eligibility;

/// Actions.
pub mod action;

/// Ledger mirror.
pub mod ledger;

/// Raw snapshot boundary.
pub mod snapshot;


pub use action::{
    claim::{Claim, ClaimPreview, ClaimReport},
    deposit::{Deposit, DepositReport},
    LedgerAction,
};
pub use address::Address;
pub use eligibility::PoolVerdict;
pub use error::Error;
pub use fixed::Amount;
pub use investor::InvestorRecord;
pub use ledger::Ledger;
pub use pool::{Pool, PoolCriteria, PoolKind, PoolRegistry};
pub use referral::ReferralGraph;
pub use snapshot::{LedgerSnapshot, RawInvestor, RawPool, RawSystem};
pub use system::SystemState;

/// Alias for result.
pub type Result<T> = std::result::Result<T, Error>;
