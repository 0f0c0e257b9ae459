use std::collections::BTreeMap;

use crate::{
    action::{claim::Claim, deposit::Deposit},
    address::Address,
    eligibility::{self, PoolVerdict},
    fixed::Amount,
    investor::InvestorRecord,
    pool::{PoolKind, PoolRegistry, POOL_COUNT},
    referral::ReferralGraph,
    system::{SystemState, UnixTime},
};

/// In-memory mirror of the ledger's accounting state.
///
/// Every query is computed synchronously over this immutable-between-refresh
/// snapshot; no call blocks, sleeps, or performs I/O. Verdicts computed
/// against a stale mirror are advisory only — callers must recompute from
/// the latest snapshot before surfacing a decision, and authority always
/// rests with the ledger's own acceptance of a transaction.
#[derive(Debug, Clone)]
pub struct Ledger {
    investors: BTreeMap<Address, InvestorRecord>,
    referrals: ReferralGraph,
    registry: PoolRegistry,
    whitelist: BTreeMap<Address, [bool; POOL_COUNT]>,
    system: SystemState,
}

impl Ledger {
    /// Create a mirror over a validated registry, with no investors yet.
    pub fn new(registry: PoolRegistry, system: SystemState) -> Self {
        Self {
            investors: BTreeMap::new(),
            referrals: ReferralGraph::new(),
            registry,
            whitelist: BTreeMap::new(),
            system,
        }
    }

    /// Get an investor record, if the address was ever touched by a deposit
    /// or a referral aggregation.
    pub fn investor(&self, address: &Address) -> Option<&InvestorRecord> {
        self.investors.get(address)
    }

    /// Get or create the record for `address`.
    pub(crate) fn investor_mut(&mut self, address: &Address) -> &mut InvestorRecord {
        self.investors.entry(*address).or_default()
    }

    /// Number of tracked investor records.
    pub fn investors_len(&self) -> usize {
        self.investors.len()
    }

    /// The referral forest.
    pub fn referrals(&self) -> &ReferralGraph {
        &self.referrals
    }

    pub(crate) fn referrals_mut(&mut self) -> &mut ReferralGraph {
        &mut self.referrals
    }

    /// The validated pool registry.
    pub fn registry(&self) -> &PoolRegistry {
        &self.registry
    }

    /// System-wide scalars.
    pub fn system(&self) -> &SystemState {
        &self.system
    }

    pub(crate) fn system_mut(&mut self) -> &mut SystemState {
        &mut self.system
    }

    /// Whitelist memberships of `address`, indexed by pool.
    pub fn whitelist(&self, address: &Address) -> [bool; POOL_COUNT] {
        self.whitelist
            .get(address)
            .copied()
            .unwrap_or([false; POOL_COUNT])
    }

    /// Set an allow-list membership, mirroring the operator's `setWhitelist`.
    ///
    /// Only whitelist-gated pools accept memberships; criteria-gated pools
    /// never carry one.
    pub fn set_whitelisted(
        &mut self,
        address: Address,
        pool_index: usize,
        member: bool,
    ) -> crate::Result<()> {
        match self.registry.get(pool_index).map(|pool| &pool.kind) {
            Some(PoolKind::Whitelist) => {}
            Some(PoolKind::Criteria(_)) => {
                return Err(crate::Error::InvalidArgument("pool is criteria-gated"))
            }
            None => return Err(crate::Error::InvalidArgument("pool index out of range")),
        }
        self.whitelist.entry(address).or_insert([false; POOL_COUNT])[pool_index] = member;
        Ok(())
    }

    /// Evaluate pool eligibility for `address` from the current snapshot.
    ///
    /// An address without a record evaluates as an all-zero one.
    pub fn eligibility(&self, address: &Address) -> Vec<PoolVerdict> {
        let default = InvestorRecord::default();
        let record = self.investor(address).unwrap_or(&default);
        eligibility::evaluate(record, &self.registry, &self.whitelist(address))
    }

    /// Create a deposit action for `investor`, validating admission.
    pub fn deposit(
        &mut self,
        investor: Address,
        amount: Amount,
        proposed_referer: Option<Address>,
        now: UnixTime,
    ) -> crate::Result<Deposit<'_>> {
        Deposit::try_new(self, investor, amount, proposed_referer, now)
    }

    /// Create a claim action for `investor`, validating the minimum amount.
    pub fn claim(&mut self, investor: Address, now: UnixTime) -> crate::Result<Claim<'_>> {
        Claim::try_new(self, investor, now)
    }

    /// Insert a pre-existing record while loading a snapshot.
    pub(crate) fn insert_investor(
        &mut self,
        address: Address,
        record: InvestorRecord,
    ) -> crate::Result<()> {
        if let Some(referrer) = record.referer {
            self.referrals.assign(address, referrer)?;
        }
        self.investors.insert(address, record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{addr, test_ledger};

    #[test]
    fn unknown_addresses_evaluate_as_zeroed_records() {
        let ledger = test_ledger();
        let verdicts = ledger.eligibility(&addr(42));
        assert_eq!(verdicts.len(), POOL_COUNT);
        // Fixture pool 0 has zero thresholds; the whitelist pools are empty.
        assert_eq!(verdicts[0], PoolVerdict::Eligible);
        assert_eq!(verdicts[7], PoolVerdict::WhitelistOnly { member: false });
    }

    #[test]
    fn whitelisting_flips_only_the_targeted_pool() -> crate::Result<()> {
        let mut ledger = test_ledger();
        ledger.set_whitelisted(addr(1), 7, true)?;

        let verdicts = ledger.eligibility(&addr(1));
        assert_eq!(verdicts[7], PoolVerdict::WhitelistOnly { member: true });
        assert_eq!(verdicts[8], PoolVerdict::WhitelistOnly { member: false });

        // Nobody else is affected.
        let verdicts = ledger.eligibility(&addr(2));
        assert_eq!(verdicts[7], PoolVerdict::WhitelistOnly { member: false });

        ledger.set_whitelisted(addr(1), 7, false)?;
        let verdicts = ledger.eligibility(&addr(1));
        assert_eq!(verdicts[7], PoolVerdict::WhitelistOnly { member: false });
        Ok(())
    }

    #[test]
    fn whitelisting_a_criteria_pool_is_rejected() {
        let mut ledger = test_ledger();
        assert!(matches!(
            ledger.set_whitelisted(addr(1), 0, true),
            Err(crate::Error::InvalidArgument(_))
        ));
        assert!(matches!(
            ledger.set_whitelisted(addr(1), POOL_COUNT, true),
            Err(crate::Error::InvalidArgument(_))
        ));
    }
}
