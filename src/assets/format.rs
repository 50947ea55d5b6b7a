//! Balance formatting for display
//!
//! Ether-base chains carry 18 decimals while the native ledger carries 6.
//! Their balances are first cut down to native base units (rounding toward
//! zero) so the same token shows the same precision on every chain.

use crate::amount::Amount;
use crate::types::{Asset, BalanceDisplay, Chain};
use crate::log_warn;

/// Format an exact raw amount held on `chain`
pub fn format_amount(amount: &Amount, chain: Chain) -> String {
    let native = Chain::NATIVE_LEDGER.decimals();
    match chain.balance_display() {
        BalanceDisplay::Direct => amount.div_pow10(chain.decimals()).to_string(),
        BalanceDisplay::NormalizedToNative => amount
            .div_pow10(chain.decimals().saturating_sub(native))
            .round_down()
            .div_pow10(native)
            .to_string(),
    }
}

/// Format a raw balance string; empty or unparseable input gives `""`
pub fn format_balance(balance: &str, chain: Chain) -> String {
    if balance.trim().is_empty() {
        return String::new();
    }
    match Amount::parse(balance) {
        Ok(amount) => format_amount(&amount, chain),
        Err(e) => {
            log_warn!("format", "Unparseable balance", chain = chain, error = e);
            String::new()
        }
    }
}

/// Display balance of an asset held on `chain`, `""` when unknown
pub fn display_balance(asset: &Asset, chain: Chain) -> String {
    asset
        .balance
        .as_ref()
        .map(|b| format_amount(b, chain))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_ledger() {
        assert_eq!(format_balance("1000000", Chain::Terra), "1");
        assert_eq!(format_balance("1234567", Chain::Terra), "1.234567");
        assert_eq!(format_balance("1", Chain::Terra), "0.000001");
    }

    #[test]
    fn test_secret_uses_own_exponent() {
        assert_eq!(format_balance("2500000", Chain::Secret), "2.5");
    }

    #[test]
    fn test_ether_base_rounds_down_to_native_units() {
        // 1.2345678... ETH-side units, only 6 decimals survive
        assert_eq!(format_balance("1234567891234567891", Chain::Ethereum), "1.234567");
        assert_eq!(format_balance("1000000000000000000", Chain::Bsc), "1");
        // below one native base unit
        assert_eq!(format_balance("999999999999", Chain::Ethereum), "0");
    }

    #[test]
    fn test_empty_and_zero() {
        assert_eq!(format_balance("", Chain::Terra), "");
        assert_eq!(format_balance("   ", Chain::Ethereum), "");
        // a non-empty string is not falsy
        assert_eq!(format_balance("0", Chain::Terra), "0");
    }

    #[test]
    fn test_garbage_is_tolerated() {
        assert_eq!(format_balance("NaN", Chain::Terra), "");
        assert_eq!(format_balance("-100", Chain::Bsc), "");
    }

    #[test]
    fn test_fractional_raw_input() {
        assert_eq!(format_balance("1000000.5", Chain::Terra), "1.0000005");
        // round-down happens before the native division
        assert_eq!(format_balance("1000000000000.9", Chain::Ethereum), "0.000001");
    }

    #[test]
    fn test_display_balance() {
        let mut asset = Asset::new("UST");
        assert_eq!(display_balance(&asset, Chain::Terra), "");
        asset.balance = Some(Amount::from(3_000_000));
        assert_eq!(display_balance(&asset, Chain::Terra), "3");
    }
}
