/// Deposit.
pub mod deposit;

/// Claim.
pub mod claim;

/// An action over the ledger mirror.
///
/// Actions validate on construction and mutate only on [`execute`], so a
/// failed construction leaves the mirror untouched.
///
/// [`execute`]: LedgerAction::execute
pub trait LedgerAction {
    /// The report returned by a successful execution.
    type Report;

    /// Execute.
    fn execute(self) -> crate::Result<Self::Report>;
}
