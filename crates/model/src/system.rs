use crate::fixed::Amount;

/// Unix timestamp in seconds. Always injected by the caller; the model never
/// reads a system clock.
pub type UnixTime = u64;

/// Minimum elapsed seconds required between two admitted deposits (4 hours).
pub const DEPOSIT_COOLDOWN: u64 = 14_400;

/// Minimum amount for a deposit or a claim: one token.
pub const MIN_DEPOSIT_OR_CLAIM: Amount = Amount::ONE;

/// Portion of a claimed reward returned to the reward pools, in basis points
/// of [`BPS_DENOMINATOR`](crate::fixed::BPS_DENOMINATOR).
pub const CLAIM_REDISTRIBUTION_BPS: u32 = 5_000;

/// System-wide scalars mirrored from the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemState {
    /// Timestamp the system started accepting deposits.
    pub start_timestamp: UnixTime,
    /// Total amount deposited across all investors.
    pub total_deposit_amount: Amount,
    /// Number of investors with at least one admitted deposit.
    pub total_investors_count: u32,
}
