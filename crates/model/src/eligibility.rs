use crate::{
    investor::InvestorRecord,
    pool::{PoolCriteria, PoolKind, PoolRegistry, POOL_COUNT},
};

/// Per-pool eligibility verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "strum", derive(strum::Display))]
#[cfg_attr(feature = "strum", strum(serialize_all = "snake_case"))]
pub enum PoolVerdict {
    /// The investor meets every criterion of the pool.
    Eligible,
    /// The investor misses at least one criterion.
    NotEligible,
    /// The pool is whitelist-gated; the verdict is the externally supplied
    /// membership, never a function of the investor's statistics.
    WhitelistOnly {
        /// Whether the investor is on the pool's allow-list.
        member: bool,
    },
}

impl PoolVerdict {
    /// Whether the verdict grants membership.
    pub fn is_eligible(&self) -> bool {
        matches!(
            self,
            Self::Eligible | Self::WhitelistOnly { member: true }
        )
    }
}

/// Evaluate `investor` against every pool in the registry.
///
/// `whitelisted` holds the externally supplied allow-list memberships,
/// indexed by pool; entries for criteria-gated pools are ignored. The
/// evaluator is pure: identical input always yields identical verdicts, and
/// it never consults a clock.
pub fn evaluate(
    investor: &InvestorRecord,
    registry: &PoolRegistry,
    whitelisted: &[bool; POOL_COUNT],
) -> Vec<PoolVerdict> {
    registry
        .iter()
        .enumerate()
        .map(|(index, pool)| match &pool.kind {
            PoolKind::Criteria(criteria) => {
                if meets(investor, criteria) {
                    PoolVerdict::Eligible
                } else {
                    PoolVerdict::NotEligible
                }
            }
            PoolKind::Whitelist => PoolVerdict::WhitelistOnly {
                member: whitelisted[index],
            },
        })
        .collect()
}

/// All three comparisons are conjunctive; there is no partial credit.
fn meets(investor: &InvestorRecord, criteria: &PoolCriteria) -> bool {
    investor.total_deposit >= criteria.personal_invest_required
        && investor.direct_referrals_count >= u32::from(criteria.direct_refs_required)
        && investor.direct_referrals_deposit >= criteria.total_direct_invest_required
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pool::{PoolRegistry, DEFAULT_TOTAL_SHARE, FIRST_WHITELIST_POOL},
        test::{amount, test_pools},
    };

    fn registry() -> PoolRegistry {
        PoolRegistry::try_new(test_pools(), DEFAULT_TOTAL_SHARE).unwrap()
    }

    fn investor(deposit: &str, refs: u32, refs_deposit: &str) -> InvestorRecord {
        InvestorRecord {
            total_deposit: amount(deposit),
            direct_referrals_count: refs,
            direct_referrals_deposit: amount(refs_deposit),
            ..Default::default()
        }
    }

    #[test]
    fn criteria_are_conjunctive() {
        let registry = registry();
        let whitelisted = [false; POOL_COUNT];

        // Pool 1 of the fixtures requires 200 deposited, 2 direct referees
        // and 400 of direct referee deposits.
        let verdicts = evaluate(&investor("200", 2, "400"), &registry, &whitelisted);
        assert_eq!(verdicts[1], PoolVerdict::Eligible);

        for missing in [
            investor("199.999999999999999999", 2, "400"),
            investor("200", 1, "400"),
            investor("200", 2, "399"),
        ] {
            let verdicts = evaluate(&missing, &registry, &whitelisted);
            assert_eq!(verdicts[1], PoolVerdict::NotEligible);
        }
    }

    #[test]
    fn verdicts_are_idempotent() {
        let registry = registry();
        let record = investor("1000", 5, "2000");
        let whitelisted = [false; POOL_COUNT];
        let first = evaluate(&record, &registry, &whitelisted);
        let second = evaluate(&record, &registry, &whitelisted);
        assert_eq!(first, second);
        assert_eq!(first.len(), POOL_COUNT);
    }

    #[test]
    fn whitelist_pools_ignore_statistics() {
        let registry = registry();
        let mut whitelisted = [false; POOL_COUNT];
        whitelisted[7] = true;

        let poor = InvestorRecord::default();
        let rich = investor("1000000", 1000, "1000000");

        for record in [&poor, &rich] {
            let verdicts = evaluate(record, &registry, &whitelisted);
            assert_eq!(verdicts[7], PoolVerdict::WhitelistOnly { member: true });
            assert_eq!(verdicts[8], PoolVerdict::WhitelistOnly { member: false });
        }
    }

    #[test]
    fn whitelist_pools_start_at_the_expected_index() {
        let registry = registry();
        let record = investor("1000000", 1000, "1000000");
        let verdicts = evaluate(&record, &registry, &[false; POOL_COUNT]);
        for (index, verdict) in verdicts.iter().enumerate() {
            if index >= FIRST_WHITELIST_POOL {
                assert!(matches!(verdict, PoolVerdict::WhitelistOnly { .. }));
            } else {
                assert!(matches!(
                    verdict,
                    PoolVerdict::Eligible | PoolVerdict::NotEligible
                ));
            }
        }
    }

    #[test]
    fn zeroed_record_is_eligible_only_where_thresholds_are_zero() {
        let registry = registry();
        let verdicts = evaluate(
            &InvestorRecord::default(),
            &registry,
            &[false; POOL_COUNT],
        );
        // Fixture pool 0 has zero thresholds.
        assert_eq!(verdicts[0], PoolVerdict::Eligible);
        assert_eq!(verdicts[1], PoolVerdict::NotEligible);
    }
}
