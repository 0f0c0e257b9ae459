use std::{
    fmt,
    ops::{Add, Mul, Sub},
    str::FromStr,
};

use num_traits::{CheckedAdd, CheckedMul, CheckedSub, Zero};
use ruint::aliases::U256;

/// Number of fractional decimal digits in an [`Amount`].
pub const DECIMALS: u8 = 18;

/// Denominator of basis-point-like parameters (shares, split ratios).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Non-negative fixed-point monetary value with 18 fractional digits, backed
/// by a 256-bit unsigned integer.
///
/// All arithmetic is exact; no implicit rounding is ever applied. Explicit
/// truncation only happens at defined boundaries ([`Amount::split_bps`]),
/// which round down and attribute the residue to the second half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Amount(U256);

impl Amount {
    /// The zero value.
    pub const ZERO: Self = Self(U256::ZERO);

    /// One whole token, i.e. `10^18` raw units.
    pub const ONE: Self = Self(U256::from_limbs([10u64.pow(DECIMALS as u32), 0, 0, 0]));

    /// Create from the ledger's native integer representation.
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Get the ledger's native integer representation. Exact and lossless.
    pub const fn to_raw(self) -> U256 {
        self.0
    }

    /// Create from a whole number of tokens.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn from_tokens(tokens: u64) -> Self {
        // `u64 * 10^18` cannot overflow 256 bits.
        Self(U256::from(tokens) * Self::ONE.0)
    }

    /// Whether this is the zero value.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checked addition.
    pub fn checked_add(&self, rhs: &Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Checked subtraction. Returns `None` when the result would be
    /// negative; call sites map this to [`Error::Underflow`](crate::Error).
    pub fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Calculates `floor(self * numerator / denominator)` on the raw
    /// representation with full precision.
    ///
    /// Returns `None` if the `denominator` is zero or the product overflows.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn checked_mul_div(&self, numerator: &Self, denominator: &Self) -> Option<Self> {
        if denominator.0.is_zero() {
            return None;
        }
        let product = self.0.checked_mul(numerator.0)?;
        Some(Self(product / denominator.0))
    }

    /// Split by a basis-point ratio of [`BPS_DENOMINATOR`].
    ///
    /// The first half is `floor(self * bps / 10_000)`; the second half is the
    /// exact remainder, so the halves always sum to `self`. The floor
    /// residue, if any, lands in the second half.
    pub fn split_bps(&self, bps: u32) -> crate::Result<(Self, Self)> {
        if bps > BPS_DENOMINATOR {
            return Err(crate::Error::InvalidArgument("bps above denominator"));
        }
        let first = self
            .checked_mul_div(
                &Self(U256::from(bps)),
                &Self(U256::from(BPS_DENOMINATOR)),
            )
            .ok_or(crate::Error::Overflow)?;
        let second = self.checked_sub(&first).ok_or(crate::Error::Underflow)?;
        Ok((first, second))
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(&rhs).expect("amount addition overflow")
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(&rhs).expect("amount underflow")
    }
}

impl Mul for Amount {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.checked_mul(&rhs).expect("amount multiplication overflow")
    }
}

impl CheckedAdd for Amount {
    fn checked_add(&self, v: &Self) -> Option<Self> {
        Amount::checked_add(self, v)
    }
}

impl CheckedSub for Amount {
    fn checked_sub(&self, v: &Self) -> Option<Self> {
        Amount::checked_sub(self, v)
    }
}

impl CheckedMul for Amount {
    fn checked_mul(&self, v: &Self) -> Option<Self> {
        self.checked_mul_div(v, &Self::ONE)
    }
}

impl Zero for Amount {
    fn zero() -> Self {
        Self::ZERO
    }

    fn is_zero(&self) -> bool {
        Amount::is_zero(self)
    }
}

impl fmt::Display for Amount {
    #[allow(clippy::arithmetic_side_effects)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int = self.0 / Self::ONE.0;
        let frac = self.0 % Self::ONE.0;
        if frac.is_zero() {
            return write!(f, "{int}");
        }
        let digits = frac.to_string();
        let mut padded = "0".repeat((DECIMALS as usize).saturating_sub(digits.len()));
        padded.push_str(&digits);
        let trimmed = padded.trim_end_matches('0');
        write!(f, "{int}.{trimmed}")
    }
}

impl FromStr for Amount {
    type Err = crate::Error;

    /// Parse a non-negative decimal string with at most 18 fractional
    /// digits. Excess precision is rejected rather than rounded.
    fn from_str(s: &str) -> crate::Result<Self> {
        fn digits_to_u256(digits: &str) -> crate::Result<U256> {
            let mut value = U256::ZERO;
            for c in digits.chars() {
                let digit = c.to_digit(10).ok_or(crate::Error::Convert)?;
                value = value
                    .checked_mul(U256::from(10u8))
                    .and_then(|v| v.checked_add(U256::from(digit)))
                    .ok_or(crate::Error::Overflow)?;
            }
            Ok(value)
        }

        let (int_part, frac_part) = match s.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (s, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(crate::Error::Convert);
        }
        if frac_part.len() > DECIMALS as usize {
            return Err(crate::Error::Convert);
        }

        let int = digits_to_u256(int_part)?
            .checked_mul(Self::ONE.0)
            .ok_or(crate::Error::Overflow)?;
        let scale = 10u64.pow((DECIMALS as usize - frac_part.len()) as u32);
        let frac = digits_to_u256(frac_part)?
            .checked_mul(U256::from(scale))
            .ok_or(crate::Error::Overflow)?;
        int.checked_add(frac)
            .map(Self)
            .ok_or(crate::Error::Overflow)
    }
}
