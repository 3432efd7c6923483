use alloy_primitives::U256;
use fixed::types::I80F48;
use std::fmt::{Display, Formatter};
use thiserror::Error;

const FRACTION_BITS: usize = 48;
/// Largest integer part an I80F48 can hold.
const MAX_WHOLE: u128 = 1 << 79;

/// A raw on-chain token amount together with the decimals needed to display it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedAmount {
    pub raw: U256,
    pub decimals: u8,
}

impl NormalizedAmount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn zero(decimals: u8) -> Self {
        Self::new(U256::ZERO, decimals)
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Saturates at `I80F48::MAX` for amounts too large to represent.
    pub fn normalized(&self) -> I80F48 {
        ratio(self.raw, unit(self.decimals))
    }
}

impl Display for NormalizedAmount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let unit = unit(self.decimals);
        let whole = self.raw / unit;
        let fraction = self.raw % unit;

        if fraction.is_zero() {
            return write!(f, "{whole}");
        }

        let fraction = format!(
            "{:0>width$}",
            fraction.to_string(),
            width = self.decimals as usize
        );
        write!(f, "{whole}.{}", fraction.trim_end_matches('0'))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseUnitsError {
    #[error("Empty amount")]
    Empty,
    #[error("Invalid amount")]
    Negative,
    #[error("Not a decimal number: {0}")]
    Malformed(String),
    #[error("At most {0} decimals are allowed")]
    TooPrecise(u8),
    #[error("Amount does not fit in 256 bits")]
    Overflow,
}

/// Parses a human decimal string such as `"1.25"` into base units of a token with
/// `decimals` decimals. No rounding: digits past `decimals` are rejected.
pub fn parse_units(text: &str, decimals: u8) -> Result<U256, ParseUnitsError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseUnitsError::Empty);
    }
    if text.starts_with('-') {
        return Err(ParseUnitsError::Negative);
    }

    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };

    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(ParseUnitsError::Malformed(text.to_string()));
    }
    if fraction.len() > decimals as usize {
        return Err(ParseUnitsError::TooPrecise(decimals));
    }

    let parse = |digits: &str| -> Result<U256, ParseUnitsError> {
        if digits.is_empty() {
            return Ok(U256::ZERO);
        }
        U256::from_str_radix(digits, 10).map_err(|_| ParseUnitsError::Overflow)
    };

    let padded = format!("{fraction:0<width$}", width = decimals as usize);
    parse(whole)?
        .checked_mul(unit(decimals))
        .and_then(|whole| whole.checked_add(parse(&padded).ok()?))
        .ok_or(ParseUnitsError::Overflow)
}

pub fn unit(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}

/// `numerator / denominator` as a fixed-point number, saturating at `I80F48::MAX`.
/// A zero denominator yields zero.
pub fn ratio(numerator: U256, denominator: U256) -> I80F48 {
    if denominator.is_zero() {
        return I80F48::ZERO;
    }

    let whole = numerator / denominator;
    if whole >= U256::from(MAX_WHOLE) {
        return I80F48::MAX;
    }

    let remainder = numerator % denominator;
    let fraction = remainder.saturating_mul(U256::from(1u64 << FRACTION_BITS)) / denominator;
    let bits = (whole.to::<u128>() << FRACTION_BITS) | fraction.to::<u128>();

    I80F48::from_bits(bits as i128)
}
