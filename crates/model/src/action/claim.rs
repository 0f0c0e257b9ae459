use crate::{
    address::Address,
    fixed::Amount,
    investor::InvestorRecord,
    ledger::Ledger,
    system::{UnixTime, CLAIM_REDISTRIBUTION_BPS, MIN_DEPOSIT_OR_CLAIM},
};

use super::LedgerAction;

/// Preview of a claim settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClaimPreview {
    /// Amount paid out to the claiming investor.
    pub payout: Amount,
    /// Amount returned to the reward pools.
    pub redistributed: Amount,
    /// Accumulated reward after the claim. Always zero.
    pub new_accumulated: Amount,
}

/// Compute the claim/redistribution split for `investor` without mutating
/// anything.
///
/// The payout is `floor(accumulated * 50%)` and the redistribution side
/// receives the exact remainder, so the two always sum to the accumulated
/// reward. The proportional bookkeeping of the redistributed portion across
/// other pools and investors is owned by the ledger, not previewed here; the
/// caller cross-checks these amounts against the confirmed transaction.
pub fn preview(investor: &InvestorRecord) -> crate::Result<ClaimPreview> {
    let accumulated = investor.accumulated_reward;
    if accumulated < MIN_DEPOSIT_OR_CLAIM {
        return Err(crate::Error::AmountTooSmall);
    }
    let (payout, redistributed) = accumulated.split_bps(CLAIM_REDISTRIBUTION_BPS)?;
    Ok(ClaimPreview {
        payout,
        redistributed,
        new_accumulated: Amount::ZERO,
    })
}

/// A prospective claim, validated against the current mirror state.
#[must_use = "actions do nothing unless you `execute` them"]
pub struct Claim<'a> {
    ledger: &'a mut Ledger,
    investor: Address,
    now: UnixTime,
}

impl<'a> Claim<'a> {
    pub(crate) fn try_new(
        ledger: &'a mut Ledger,
        investor: Address,
        now: UnixTime,
    ) -> crate::Result<Self> {
        // An address without a record has nothing accumulated.
        let record = ledger
            .investor(&investor)
            .ok_or(crate::Error::AmountTooSmall)?;
        preview(record)?;
        Ok(Self {
            ledger,
            investor,
            now,
        })
    }
}

/// Report of an executed claim.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClaimReport {
    investor: Address,
    payout: Amount,
    redistributed: Amount,
    accumulated_before: Amount,
    timestamp: UnixTime,
}

impl ClaimReport {
    /// Get the claiming investor.
    pub fn investor(&self) -> &Address {
        &self.investor
    }

    /// Get the amount paid out to the investor.
    pub fn payout(&self) -> &Amount {
        &self.payout
    }

    /// Get the amount returned to the reward pools.
    pub fn redistributed(&self) -> &Amount {
        &self.redistributed
    }

    /// Get the accumulated reward the claim settled.
    pub fn accumulated_before(&self) -> &Amount {
        &self.accumulated_before
    }

    /// Get the claim timestamp.
    pub fn timestamp(&self) -> UnixTime {
        self.timestamp
    }
}

impl LedgerAction for Claim<'_> {
    type Report = ClaimReport;

    fn execute(self) -> crate::Result<Self::Report> {
        let Self {
            ledger,
            investor,
            now,
        } = self;
        let record = ledger.investor_mut(&investor);
        let accumulated_before = record.accumulated_reward;
        let split = preview(record)?;
        debug_assert_eq!(
            split.payout.checked_add(&split.redistributed),
            Some(accumulated_before),
            "split must conserve the accumulated reward"
        );
        record.accumulated_reward = split.new_accumulated;
        record.last_claim_timestamp = now;
        Ok(ClaimReport {
            investor,
            payout: split.payout,
            redistributed: split.redistributed,
            accumulated_before,
            timestamp: now,
        })
    }
}
