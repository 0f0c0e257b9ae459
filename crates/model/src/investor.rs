use crate::{address::Address, fixed::Amount, system::UnixTime};

/// Per-address accounting snapshot.
///
/// A record is created implicitly by an investor's first admitted deposit;
/// before that every field is zero or absent. It is mutated only by the
/// deposit and claim actions and is never deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InvestorRecord {
    /// Sum of all admitted deposits.
    pub total_deposit: Amount,
    /// Number of direct referees.
    pub direct_referrals_count: u32,
    /// Number of transitive referees below the direct level.
    pub downline_referrals_count: u32,
    /// Sum of deposits made by direct referees.
    pub direct_referrals_deposit: Amount,
    /// Sum of deposits made by downline referees.
    pub downline_referrals_deposit: Amount,
    /// Referrer. Set at most once, on the first deposit, and immutable
    /// thereafter.
    pub referer: Option<Address>,
    /// Daily reward granted in the last distribution round.
    pub last_daily_reward: Amount,
    /// Referral reward granted in the last distribution round.
    pub last_referral_reward: Amount,
    /// Reward accumulated and not yet claimed.
    pub accumulated_reward: Amount,
    /// Timestamp of the last executed claim.
    pub last_claim_timestamp: UnixTime,
    /// Timestamp of the last admitted deposit.
    pub last_deposit_timestamp: UnixTime,
    /// Timestamp of the last referral aggregate update.
    pub last_referral_update_timestamp: UnixTime,
}

impl InvestorRecord {
    /// Whether the record has ever received an admitted deposit.
    ///
    /// Referral aggregation can touch an address before it deposits itself;
    /// such a record carries referee statistics but no deposit history, so
    /// cooldown and referrer rules do not apply to it yet.
    pub fn has_deposited(&self) -> bool {
        !self.total_deposit.is_zero()
    }
}
