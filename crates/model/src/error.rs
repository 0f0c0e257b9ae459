/// Error type.
///
/// Every variant is locally recoverable; the caller decides whether to
/// surface it, log it, or re-fetch a fresh snapshot. There is no global
/// handler and nothing here aborts the process.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// Amount below the one-token minimum shared by deposits and claims.
    #[error("amount below the minimum deposit/claim")]
    AmountTooSmall,
    /// The deposit cooldown has not elapsed yet.
    #[error("deposit cooldown active, {remaining} second(s) remaining")]
    CooldownActive {
        /// Seconds until the next admissible deposit.
        remaining: u64,
    },
    /// A different referrer is already set for this investor.
    #[error("referer already set")]
    RefererAlreadySet,
    /// The proposed referrer is not acceptable (self-referral, or the
    /// assignment would make an address its own ancestor).
    #[error("invalid referer")]
    InvalidReferer,
    /// Pool registry invariant violation. The snapshot that produced it must
    /// not be trusted; fall back to the last known-good one.
    #[error("configuration error: {0}")]
    Configuration(&'static str),
    /// A subtraction would produce a negative amount, which indicates a
    /// corrupted snapshot. The current computation must be aborted rather
    /// than clamped to zero.
    #[error("amount underflow")]
    Underflow,
    /// Overflow.
    #[error("overflow")]
    Overflow,
    /// Convert error.
    #[error("convert value error")]
    Convert,
    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// Unknown computation error.
    #[error("unknown computation error: {0}")]
    Computation(&'static str),
}
