use crate::{
    address::Address,
    fixed::Amount,
    investor::InvestorRecord,
    ledger::Ledger,
    system::{UnixTime, DEPOSIT_COOLDOWN, MIN_DEPOSIT_OR_CLAIM},
};

use super::LedgerAction;

/// Seconds remaining until `investor` may deposit again; zero when ready.
///
/// The boundary is inclusive: a deposit at exactly
/// `last_deposit_timestamp + DEPOSIT_COOLDOWN` is admissible.
pub fn cooldown_remaining(investor: &InvestorRecord, now: UnixTime) -> u64 {
    investor
        .last_deposit_timestamp
        .saturating_add(DEPOSIT_COOLDOWN)
        .saturating_sub(now)
}

/// Check whether a prospective deposit is admissible.
///
/// Pure over the supplied record and `now`; a verdict computed against a
/// stale snapshot is advisory only. `investor` is `None` when the address
/// has never had an admitted deposit, in which case no cooldown applies.
pub fn check(
    investor: Option<&InvestorRecord>,
    self_address: &Address,
    now: UnixTime,
    amount: &Amount,
    proposed_referer: Option<&Address>,
) -> crate::Result<()> {
    if *amount < MIN_DEPOSIT_OR_CLAIM {
        return Err(crate::Error::AmountTooSmall);
    }
    if proposed_referer == Some(self_address) {
        return Err(crate::Error::InvalidReferer);
    }
    if let Some(record) = investor {
        let remaining = cooldown_remaining(record, now);
        if remaining > 0 {
            return Err(crate::Error::CooldownActive { remaining });
        }
        if let (Some(current), Some(proposed)) = (record.referer.as_ref(), proposed_referer) {
            if current != proposed {
                return Err(crate::Error::RefererAlreadySet);
            }
        }
    }
    Ok(())
}

/// A prospective deposit, validated against the current mirror state.
#[must_use = "actions do nothing unless you `execute` them"]
pub struct Deposit<'a> {
    ledger: &'a mut Ledger,
    investor: Address,
    amount: Amount,
    proposed_referer: Option<Address>,
    now: UnixTime,
}

impl<'a> Deposit<'a> {
    pub(crate) fn try_new(
        ledger: &'a mut Ledger,
        investor: Address,
        amount: Amount,
        proposed_referer: Option<Address>,
        now: UnixTime,
    ) -> crate::Result<Self> {
        check(
            ledger
                .investor(&investor)
                .filter(|record| record.has_deposited()),
            &investor,
            now,
            &amount,
            proposed_referer.as_ref(),
        )?;
        Ok(Self {
            ledger,
            investor,
            amount,
            proposed_referer,
            now,
        })
    }
}

/// Report of an executed deposit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DepositReport {
    investor: Address,
    amount: Amount,
    referer: Option<Address>,
    first_deposit: bool,
    timestamp: UnixTime,
}

impl DepositReport {
    /// Get the depositing investor.
    pub fn investor(&self) -> &Address {
        &self.investor
    }

    /// Get the admitted amount.
    pub fn amount(&self) -> &Amount {
        &self.amount
    }

    /// Get the referrer in effect after the deposit.
    pub fn referer(&self) -> Option<&Address> {
        self.referer.as_ref()
    }

    /// Whether this deposit created the investor record.
    pub fn first_deposit(&self) -> bool {
        self.first_deposit
    }

    /// Get the admission timestamp.
    pub fn timestamp(&self) -> UnixTime {
        self.timestamp
    }
}

impl LedgerAction for Deposit<'_> {
    type Report = DepositReport;

    fn execute(self) -> crate::Result<Self::Report> {
        let Self {
            ledger,
            investor,
            amount,
            proposed_referer,
            now,
        } = self;
        debug_assert!(amount >= MIN_DEPOSIT_OR_CLAIM, "validated in try_new");

        let first_deposit = !ledger
            .investor(&investor)
            .is_some_and(|record| record.has_deposited());

        // The referral edge is created before any balance mutation, so a
        // rejected assignment leaves the mirror untouched. A referrer can
        // only be attached by the deposit that creates the record.
        let referer = if first_deposit {
            if let Some(referrer) = proposed_referer {
                ledger.referrals_mut().assign(investor, referrer)?;
                Some(referrer)
            } else {
                None
            }
        } else {
            ledger.investor(&investor).and_then(|record| record.referer)
        };

        {
            let record = ledger.investor_mut(&investor);
            record.total_deposit = record
                .total_deposit
                .checked_add(&amount)
                .ok_or(crate::Error::Overflow)?;
            record.last_deposit_timestamp = now;
            if first_deposit {
                record.referer = referer;
            }
        }

        // Aggregate up the whole ancestor chain: the immediate referrer is
        // credited as direct, every higher ancestor as downline. Counts move
        // only when a new edge was created; deposit sums move every time.
        let ancestors: Vec<Address> = ledger.referrals().ancestors(&investor).copied().collect();
        for (depth, ancestor) in ancestors.iter().enumerate() {
            let record = ledger.investor_mut(ancestor);
            if depth == 0 {
                if first_deposit {
                    record.direct_referrals_count = record
                        .direct_referrals_count
                        .checked_add(1)
                        .ok_or(crate::Error::Overflow)?;
                }
                record.direct_referrals_deposit = record
                    .direct_referrals_deposit
                    .checked_add(&amount)
                    .ok_or(crate::Error::Overflow)?;
            } else {
                if first_deposit {
                    record.downline_referrals_count = record
                        .downline_referrals_count
                        .checked_add(1)
                        .ok_or(crate::Error::Overflow)?;
                }
                record.downline_referrals_deposit = record
                    .downline_referrals_deposit
                    .checked_add(&amount)
                    .ok_or(crate::Error::Overflow)?;
            }
            record.last_referral_update_timestamp = now;
        }

        let system = ledger.system_mut();
        system.total_deposit_amount = system
            .total_deposit_amount
            .checked_add(&amount)
            .ok_or(crate::Error::Overflow)?;
        if first_deposit {
            system.total_investors_count = system
                .total_investors_count
                .checked_add(1)
                .ok_or(crate::Error::Overflow)?;
        }

        Ok(DepositReport {
            investor,
            amount,
            referer,
            first_deposit,
            timestamp: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        system::DEPOSIT_COOLDOWN,
        test::{addr, amount, test_ledger},
        LedgerAction,
    };

    #[test]
    fn first_deposit_without_referrer() -> crate::Result<()> {
        let mut ledger = test_ledger();
        let now = ledger.system().start_timestamp;

        let report = ledger
            .deposit(addr(1), amount("1"), None, now)?
            .execute()?;
        assert!(report.first_deposit());
        assert_eq!(report.referer(), None);

        let record = ledger.investor(&addr(1)).unwrap();
        assert_eq!(record.total_deposit, amount("1"));
        assert_eq!(record.referer, None);
        assert_eq!(record.last_deposit_timestamp, now);
        assert_eq!(ledger.system().total_investors_count, 1);
        assert_eq!(ledger.system().total_deposit_amount, amount("1"));
        Ok(())
    }

    #[test]
    fn amounts_below_one_token_are_rejected() {
        let mut ledger = test_ledger();
        let now = ledger.system().start_timestamp;
        let result = ledger.deposit(addr(1), amount("0.999999999999999999"), None, now);
        assert!(matches!(result, Err(crate::Error::AmountTooSmall)));
        assert!(ledger.investor(&addr(1)).is_none());
    }

    #[test]
    fn cooldown_boundary_is_inclusive() -> crate::Result<()> {
        let mut ledger = test_ledger();
        let start = ledger.system().start_timestamp;
        ledger
            .deposit(addr(1), amount("1"), None, start)?
            .execute()?;

        // One second early: still cooling down.
        let early = start + DEPOSIT_COOLDOWN - 1;
        match ledger.deposit(addr(1), amount("1"), None, early) {
            Err(crate::Error::CooldownActive { remaining }) => assert_eq!(remaining, 1),
            _ => panic!("expected the cooldown to be active"),
        }

        // Exactly on the edge: admitted.
        let on_time = start + DEPOSIT_COOLDOWN;
        let report = ledger
            .deposit(addr(1), amount("1"), None, on_time)?
            .execute()?;
        assert!(!report.first_deposit());
        assert_eq!(
            ledger.investor(&addr(1)).unwrap().total_deposit,
            amount("2")
        );
        Ok(())
    }

    #[test]
    fn self_referral_is_always_rejected() -> crate::Result<()> {
        let mut ledger = test_ledger();
        let start = ledger.system().start_timestamp;

        let result = ledger.deposit(addr(1), amount("1"), Some(addr(1)), start);
        assert!(matches!(result, Err(crate::Error::InvalidReferer)));

        // Still rejected once the investor has history.
        ledger
            .deposit(addr(1), amount("1"), None, start)?
            .execute()?;
        let later = start + DEPOSIT_COOLDOWN;
        let result = ledger.deposit(addr(1), amount("1"), Some(addr(1)), later);
        assert!(matches!(result, Err(crate::Error::InvalidReferer)));
        Ok(())
    }

    #[test]
    fn referrer_is_immutable_once_set() -> crate::Result<()> {
        let mut ledger = test_ledger();
        let start = ledger.system().start_timestamp;
        ledger
            .deposit(addr(2), amount("1"), Some(addr(1)), start)?
            .execute()?;

        let later = start + DEPOSIT_COOLDOWN;
        let result = ledger.deposit(addr(2), amount("1"), Some(addr(3)), later);
        assert!(matches!(result, Err(crate::Error::RefererAlreadySet)));

        // Re-supplying the same referrer, or omitting it, is fine.
        ledger
            .deposit(addr(2), amount("1"), Some(addr(1)), later)?
            .execute()?;
        ledger
            .deposit(addr(2), amount("1"), None, later + DEPOSIT_COOLDOWN)?
            .execute()?;
        assert_eq!(ledger.investor(&addr(2)).unwrap().referer, Some(addr(1)));
        Ok(())
    }

    #[test]
    fn aggregates_flow_up_the_ancestor_chain() -> crate::Result<()> {
        let mut ledger = test_ledger();
        let start = ledger.system().start_timestamp;

        // 1 ← 2 ← 3: investor 3 deposits 5 tokens.
        ledger
            .deposit(addr(1), amount("1"), None, start)?
            .execute()?;
        ledger
            .deposit(addr(2), amount("1"), Some(addr(1)), start)?
            .execute()?;
        ledger
            .deposit(addr(3), amount("5"), Some(addr(2)), start)?
            .execute()?;

        let two = ledger.investor(&addr(2)).unwrap();
        assert_eq!(two.direct_referrals_count, 1);
        assert_eq!(two.direct_referrals_deposit, amount("5"));
        assert_eq!(two.downline_referrals_count, 0);
        assert_eq!(two.last_referral_update_timestamp, start);

        let one = ledger.investor(&addr(1)).unwrap();
        assert_eq!(one.direct_referrals_count, 1);
        assert_eq!(one.direct_referrals_deposit, amount("1"));
        assert_eq!(one.downline_referrals_count, 1);
        assert_eq!(one.downline_referrals_deposit, amount("5"));

        // A repeat deposit moves the sums but not the counts.
        ledger
            .deposit(addr(3), amount("2"), None, start + DEPOSIT_COOLDOWN)?
            .execute()?;
        let two = ledger.investor(&addr(2)).unwrap();
        assert_eq!(two.direct_referrals_count, 1);
        assert_eq!(two.direct_referrals_deposit, amount("7"));
        let one = ledger.investor(&addr(1)).unwrap();
        assert_eq!(one.downline_referrals_count, 1);
        assert_eq!(one.downline_referrals_deposit, amount("7"));
        Ok(())
    }

    #[test]
    fn referrer_without_history_still_accumulates() -> crate::Result<()> {
        // A referrer that never deposited can still be named; its record is
        // created by the aggregation.
        let mut ledger = test_ledger();
        let start = ledger.system().start_timestamp;
        ledger
            .deposit(addr(2), amount("3"), Some(addr(1)), start)?
            .execute()?;
        let one = ledger.investor(&addr(1)).unwrap();
        assert_eq!(one.total_deposit, amount("0"));
        assert_eq!(one.direct_referrals_deposit, amount("3"));
        assert_eq!(one.direct_referrals_count, 1);
        Ok(())
    }

    #[test]
    fn cooldown_remaining_counts_down_to_zero() {
        let record = InvestorRecord {
            last_deposit_timestamp: 1_000,
            ..Default::default()
        };
        assert_eq!(cooldown_remaining(&record, 1_000), DEPOSIT_COOLDOWN);
        assert_eq!(cooldown_remaining(&record, 1_000 + DEPOSIT_COOLDOWN - 1), 1);
        assert_eq!(cooldown_remaining(&record, 1_000 + DEPOSIT_COOLDOWN), 0);
        assert_eq!(cooldown_remaining(&record, u64::MAX), 0);
    }
}
