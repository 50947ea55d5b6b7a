//! Exact token amounts
//!
//! Raw balances arrive as smallest-unit integers (decimal strings from Cosmos
//! LCDs, hex words from EVM nodes) that routinely exceed `u128` once a
//! whale's 18-decimal balance is involved. `Amount` keeps them exact as
//! `mantissa / 10^scale` on top of `BigUint`.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Amount parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Empty amount")]
    Empty,

    #[error("Negative amount: {0}")]
    Negative(String),

    #[error("Invalid decimal amount: {0}")]
    InvalidDecimal(String),

    #[error("Invalid hex amount: {0}")]
    InvalidHex(String),
}

/// Non-negative exact decimal amount
///
/// Always stored in canonical form (no trailing zeros in the fractional
/// part), so derived equality compares values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Amount {
    mantissa: BigUint,
    scale: u32,
}

fn pow10(exp: u32) -> BigUint {
    BigUint::from(10u32).pow(exp)
}

impl Amount {
    /// Zero amount
    pub fn zero() -> Self {
        Self {
            mantissa: BigUint::zero(),
            scale: 0,
        }
    }

    /// Integer amount in smallest units
    pub fn from_raw(raw: BigUint) -> Self {
        Self {
            mantissa: raw,
            scale: 0,
        }
    }

    fn canonical(mut mantissa: BigUint, mut scale: u32) -> Self {
        if mantissa.is_zero() {
            return Self::zero();
        }
        while scale > 0 && (&mantissa % 10u32).is_zero() {
            mantissa /= 10u32;
            scale -= 1;
        }
        Self { mantissa, scale }
    }

    /// Parse a plain decimal string such as `"1000000"` or `"12.5"`
    pub fn parse(input: &str) -> Result<Self, AmountError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }
        if trimmed.starts_with('-') {
            return Err(AmountError::Negative(trimmed.to_string()));
        }

        let (integer, fraction) = match trimmed.split_once('.') {
            Some((i, f)) => (i, f),
            None => (trimmed, ""),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (integer.is_empty() && fraction.is_empty()) || !all_digits(integer) || !all_digits(fraction) {
            return Err(AmountError::InvalidDecimal(trimmed.to_string()));
        }

        let digits = format!("{}{}", integer, fraction);
        let mantissa = BigUint::parse_bytes(digits.as_bytes(), 10)
            .ok_or_else(|| AmountError::InvalidDecimal(trimmed.to_string()))?;
        let scale = u32::try_from(fraction.len())
            .map_err(|_| AmountError::InvalidDecimal(trimmed.to_string()))?;

        Ok(Self::canonical(mantissa, scale))
    }

    /// Parse a `0x`-prefixed hex word as returned by `eth_call`
    pub fn from_hex(input: &str) -> Result<Self, AmountError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        // `eth_call` against a non-contract address answers "0x"
        if digits.is_empty() {
            return Ok(Self::zero());
        }

        BigUint::parse_bytes(digits.as_bytes(), 16)
            .map(Self::from_raw)
            .ok_or_else(|| AmountError::InvalidHex(trimmed.to_string()))
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// Number of fractional digits in canonical form
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Divide by `10^exp`, exactly
    pub fn div_pow10(&self, exp: u32) -> Self {
        Self::canonical(self.mantissa.clone(), self.scale + exp)
    }

    /// Drop the fractional part (round toward zero)
    pub fn round_down(&self) -> Self {
        if self.scale == 0 {
            return self.clone();
        }
        Self::from_raw(&self.mantissa / pow10(self.scale))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let divisor = pow10(self.scale);
        let integer = &self.mantissa / &divisor;
        let fraction = &self.mantissa % &divisor;
        write!(
            f,
            "{}.{:0>width$}",
            integer,
            fraction.to_string(),
            width = self.scale as usize
        )
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::parse(s)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount::from_raw(BigUint::from(value))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accepts a decimal string or a JSON number. Numbers keep their exact
/// digits (`serde_json` is built with `arbitrary_precision`), so integers
/// beyond `u64` deserialize without loss.
impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Amount::parse(&s).map_err(de::Error::custom),
            Value::Number(n) => Amount::parse(&n.to_string()).map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "expected an amount string or number, got {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_and_decimal() {
        assert_eq!(Amount::parse("1000000").unwrap().to_string(), "1000000");
        assert_eq!(Amount::parse("12.50").unwrap().to_string(), "12.5");
        assert_eq!(Amount::parse("0.000").unwrap().to_string(), "0");
        assert_eq!(Amount::parse(".5").unwrap().to_string(), "0.5");
        assert_eq!(Amount::parse("007").unwrap().to_string(), "7");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Amount::parse(""), Err(AmountError::Empty));
        assert_eq!(Amount::parse("  "), Err(AmountError::Empty));
        assert!(matches!(Amount::parse("-5"), Err(AmountError::Negative(_))));
        assert!(matches!(Amount::parse("1.2.3"), Err(AmountError::InvalidDecimal(_))));
        assert!(matches!(Amount::parse("1e18"), Err(AmountError::InvalidDecimal(_))));
        assert!(matches!(Amount::parse("."), Err(AmountError::InvalidDecimal(_))));
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Amount::from_hex("0x0de0b6b3a7640000").unwrap().to_string(), "1000000000000000000");
        assert_eq!(Amount::from_hex("0x").unwrap(), Amount::zero());
        assert!(Amount::from_hex("0xzz").is_err());
    }

    #[test]
    fn test_beyond_u128() {
        // 2^130
        let big = Amount::parse("1361129467683753853853498429727072845824").unwrap();
        assert_eq!(big.div_pow10(18).round_down().to_string(), "1361129467683753853853");
    }

    #[test]
    fn test_div_and_round_down() {
        let raw = Amount::parse("1234567").unwrap();
        assert_eq!(raw.div_pow10(6).to_string(), "1.234567");
        assert_eq!(raw.div_pow10(6).round_down().to_string(), "1");
        assert_eq!(raw.div_pow10(8).to_string(), "0.01234567");
        assert_eq!(raw.div_pow10(8).round_down(), Amount::zero());
    }

    #[test]
    fn test_canonical_equality() {
        assert_eq!(Amount::parse("1.500").unwrap(), Amount::parse("1.5").unwrap());
        assert_eq!(Amount::parse("1500000").unwrap().div_pow10(6), Amount::parse("1.5").unwrap());
    }

    #[test]
    fn test_serde_as_string() {
        let amount = Amount::parse("42.1").unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"42.1\"");

        let from_text: Amount = serde_json::from_str("\"900\"").unwrap();
        let from_int: Amount = serde_json::from_str("900").unwrap();
        assert_eq!(from_text, from_int);
    }

    #[test]
    fn test_deserialize_numbers_beyond_u64() {
        // 100 tokens at 18 decimals
        let balances: std::collections::HashMap<String, Amount> =
            serde_json::from_str(r#"{"uluna": 100000000000000000000, "uusd": "7"}"#).unwrap();
        assert_eq!(balances["uluna"].to_string(), "100000000000000000000");
        assert_eq!(balances["uusd"], Amount::from(7));

        let fractional: Amount = serde_json::from_str("1.25").unwrap();
        assert_eq!(fractional.to_string(), "1.25");
    }

    #[test]
    fn test_deserialize_rejects_non_amounts() {
        assert!(serde_json::from_str::<Amount>("-3").is_err());
        assert!(serde_json::from_str::<Amount>("true").is_err());
        assert!(serde_json::from_str::<Amount>("\"abc\"").is_err());
    }
}
