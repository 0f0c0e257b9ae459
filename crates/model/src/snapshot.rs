//! Raw ledger facts, field-for-field as the contract returns them, and
//! their conversion into the validated model.
//!
//! The zero-address "no referrer" sentinel and the `pool index >= 7`
//! whitelist gating both exist only here; past this boundary absence is an
//! `Option` and gating is the [`PoolKind`] tag.

use ruint::aliases::U256;

use crate::{
    address::Address,
    fixed::Amount,
    investor::InvestorRecord,
    ledger::Ledger,
    pool::{Pool, PoolCriteria, PoolKind, DEFAULT_TOTAL_SHARE, FIRST_WHITELIST_POOL},
    system::SystemState,
};

/// Raw investor tuple (`accountToInvestorInfo`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawInvestor {
    /// Total deposit, in raw 18-decimal units.
    pub total_deposit: U256,
    /// Direct referees count.
    pub direct_referrals_count: u32,
    /// Downline referees count.
    pub downline_referrals_count: u32,
    /// Direct referees' deposit sum, raw units.
    pub direct_referrals_deposit: U256,
    /// Downline referees' deposit sum, raw units.
    pub downline_referrals_deposit: U256,
    /// Referrer; the zero address means "none".
    pub referer: Address,
    /// Last round daily reward, raw units.
    pub last_daily_reward: U256,
    /// Last round referral reward, raw units.
    pub last_referral_reward: U256,
    /// Accumulated unclaimed reward, raw units.
    pub accumulated_reward: U256,
    /// Last claim timestamp.
    pub last_claim_timestamp: u64,
    /// Last deposit timestamp.
    pub last_deposit_timestamp: u64,
    /// Last referral update timestamp.
    pub last_referral_update_timestamp: u64,
}

impl From<RawInvestor> for InvestorRecord {
    fn from(raw: RawInvestor) -> Self {
        Self {
            total_deposit: Amount::from_raw(raw.total_deposit),
            direct_referrals_count: raw.direct_referrals_count,
            downline_referrals_count: raw.downline_referrals_count,
            direct_referrals_deposit: Amount::from_raw(raw.direct_referrals_deposit),
            downline_referrals_deposit: Amount::from_raw(raw.downline_referrals_deposit),
            referer: raw.referer.into_option(),
            last_daily_reward: Amount::from_raw(raw.last_daily_reward),
            last_referral_reward: Amount::from_raw(raw.last_referral_reward),
            accumulated_reward: Amount::from_raw(raw.accumulated_reward),
            last_claim_timestamp: raw.last_claim_timestamp,
            last_deposit_timestamp: raw.last_deposit_timestamp,
            last_referral_update_timestamp: raw.last_referral_update_timestamp,
        }
    }
}

/// Raw pool tuple (`pools(i)`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawPool {
    /// Whether the pool is active.
    pub is_active: bool,
    /// Current round reward, raw units.
    pub cur_reward: U256,
    /// Last round reward, raw units.
    pub last_reward: U256,
    /// Number of participants.
    pub participants_count: u32,
    /// Stored reward-per-investor accumulator, raw units.
    pub reward_per_investor_stored: U256,
    /// Minimum personal deposit, raw units.
    pub personal_invest_required: U256,
    /// Minimum direct referees' deposit sum, raw units.
    pub total_direct_invest_required: U256,
    /// Minimum direct referees count.
    pub direct_refs_required: u8,
    /// Share weight.
    pub share: u16,
}

impl RawPool {
    /// Convert into a [`Pool`], assigning the gating tag from the pool
    /// index. This is the only place the index decides gating.
    fn into_pool(self, index: usize) -> Pool {
        let kind = if index >= FIRST_WHITELIST_POOL {
            PoolKind::Whitelist
        } else {
            PoolKind::Criteria(
                PoolCriteria::builder()
                    .personal_invest_required(Amount::from_raw(self.personal_invest_required))
                    .total_direct_invest_required(Amount::from_raw(
                        self.total_direct_invest_required,
                    ))
                    .direct_refs_required(self.direct_refs_required)
                    .build(),
            )
        };
        Pool {
            is_active: self.is_active,
            cur_reward: Amount::from_raw(self.cur_reward),
            last_reward: Amount::from_raw(self.last_reward),
            reward_per_investor_stored: Amount::from_raw(self.reward_per_investor_stored),
            participants_count: self.participants_count,
            kind,
            share: self.share,
        }
    }
}

/// Raw system scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawSystem {
    /// Timestamp the system started accepting deposits.
    pub start_timestamp: u64,
    /// Total deposited across all investors, raw units.
    pub total_deposit_amount: U256,
    /// Number of investors.
    pub total_investors_count: u32,
    /// Share sum the configuration declares across all pools.
    pub expected_total_share: u16,
}

impl Default for RawSystem {
    fn default() -> Self {
        Self {
            start_timestamp: 0,
            total_deposit_amount: U256::ZERO,
            total_investors_count: 0,
            expected_total_share: DEFAULT_TOTAL_SHARE,
        }
    }
}

/// A full refresh-cycle snapshot of the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LedgerSnapshot {
    /// System scalars.
    pub system: RawSystem,
    /// The nine raw pool tuples, in index order.
    pub pools: Vec<RawPool>,
    /// Investor tuples keyed by address.
    pub investors: Vec<(Address, RawInvestor)>,
    /// Allow-list memberships: `(investor, pool index, member)`.
    pub whitelist: Vec<(Address, usize, bool)>,
}

impl TryFrom<LedgerSnapshot> for Ledger {
    type Error = crate::Error;

    /// Validate and convert a snapshot into a [`Ledger`] mirror.
    ///
    /// The registry consistency check runs before anything else; a failure
    /// means the whole snapshot must not be trusted and the caller should
    /// keep its last known-good mirror.
    fn try_from(snapshot: LedgerSnapshot) -> crate::Result<Self> {
        let pools = snapshot
            .pools
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.into_pool(index))
            .collect();
        let registry =
            crate::pool::PoolRegistry::try_new(pools, snapshot.system.expected_total_share)?;
        let system = SystemState {
            start_timestamp: snapshot.system.start_timestamp,
            total_deposit_amount: Amount::from_raw(snapshot.system.total_deposit_amount),
            total_investors_count: snapshot.system.total_investors_count,
        };
        let mut ledger = Ledger::new(registry, system);
        for (address, raw) in snapshot.investors {
            ledger.insert_investor(address, raw.into())?;
        }
        for (address, pool_index, member) in snapshot.whitelist {
            ledger.set_whitelisted(address, pool_index, member)?;
        }
        Ok(ledger)
    }
}
