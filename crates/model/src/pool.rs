use typed_builder::TypedBuilder;

use crate::fixed::Amount;

/// Number of reward pools.
pub const POOL_COUNT: usize = 9;

/// Index of the first whitelist-gated pool. Pools below it are
/// criteria-gated.
pub const FIRST_WHITELIST_POOL: usize = 7;

/// Share sum declared by the deployed configuration. The registry's own
/// declared total is the source of truth; this is only the default.
pub const DEFAULT_TOTAL_SHARE: u16 = 1_500;

/// Automatic eligibility thresholds of a criteria-gated pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, TypedBuilder)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolCriteria {
    /// Minimum personal total deposit.
    #[builder(default)]
    pub personal_invest_required: Amount,
    /// Minimum sum of direct referees' deposits.
    #[builder(default)]
    pub total_direct_invest_required: Amount,
    /// Minimum number of direct referees.
    #[builder(default)]
    pub direct_refs_required: u8,
}

/// How membership of a pool is decided.
///
/// The tag is assigned once, when a snapshot is converted, so the
/// criteria-vs-whitelist branch exists in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "strum", derive(strum::Display))]
#[cfg_attr(feature = "strum", strum(serialize_all = "snake_case"))]
pub enum PoolKind {
    /// Open pool; membership is derived from an investor's statistics.
    Criteria(PoolCriteria),
    /// Allow-list pool; membership is explicit and never derived from
    /// statistics.
    Whitelist,
}

/// A reward pool.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pool {
    /// Whether the pool currently takes part in reward distribution.
    pub is_active: bool,
    /// Reward accrued in the current round.
    pub cur_reward: Amount,
    /// Reward distributed in the last round.
    pub last_reward: Amount,
    /// Stored reward-per-investor accumulator.
    pub reward_per_investor_stored: Amount,
    /// Number of participants.
    pub participants_count: u32,
    /// Gating of this pool.
    pub kind: PoolKind,
    /// Share weight in basis-point-like units.
    pub share: u16,
}

/// Ordered set of the [`POOL_COUNT`] reward pools with a declared share
/// total.
///
/// Construction runs the consistency check, so a registry value is always
/// trustworthy: exactly nine pools, shares summing to the declared total,
/// whitelist gating on exactly the pools at and above
/// [`FIRST_WHITELIST_POOL`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolRegistry {
    pools: Vec<Pool>,
    expected_total_share: u16,
}

impl PoolRegistry {
    /// Create a registry, running the consistency check against the declared
    /// share total.
    pub fn try_new(pools: Vec<Pool>, expected_total_share: u16) -> crate::Result<Self> {
        if pools.len() != POOL_COUNT {
            return Err(crate::Error::Configuration(
                "registry must hold exactly nine pools",
            ));
        }
        for (index, pool) in pools.iter().enumerate() {
            let whitelist_gated = matches!(pool.kind, PoolKind::Whitelist);
            if whitelist_gated != (index >= FIRST_WHITELIST_POOL) {
                return Err(crate::Error::Configuration(
                    "whitelist gating on the wrong pool index",
                ));
            }
        }
        let total: u32 = pools.iter().map(|pool| u32::from(pool.share)).sum();
        if total != u32::from(expected_total_share) {
            return Err(crate::Error::Configuration(
                "pool share sum departs from the declared total",
            ));
        }
        Ok(Self {
            pools,
            expected_total_share,
        })
    }

    /// Get a pool by index.
    pub fn get(&self, index: usize) -> Option<&Pool> {
        self.pools.get(index)
    }

    /// Iterate pools in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Pool> {
        self.pools.iter()
    }

    /// The declared share total the registry was validated against.
    pub fn expected_total_share(&self) -> u16 {
        self.expected_total_share
    }
}
