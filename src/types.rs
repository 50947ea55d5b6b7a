//! Shared types for the bridge asset core
//!
//! All data structures that cross module boundaries are defined here
//! for consistent serialization.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::amount::Amount;

// =============================================================================
// Chain Types
// =============================================================================

/// Blockchains the bridge can send from and to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Terra,
    Ethereum,
    Bsc,
    Secret,
}

/// How a chain's raw balances are brought to display units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceDisplay {
    /// Divide by the chain's own decimal exponent
    Direct,
    /// Reduce to native-ledger base units (round down), then divide by the
    /// native exponent
    NormalizedToNative,
}

impl Chain {
    /// Chain whose base unit is the common display target
    pub const NATIVE_LEDGER: Chain = Chain::Terra;

    pub fn all() -> [Chain; 4] {
        [Chain::Terra, Chain::Ethereum, Chain::Bsc, Chain::Secret]
    }

    pub fn is_native_ledger(&self) -> bool {
        *self == Self::NATIVE_LEDGER
    }

    pub fn is_ether_base(&self) -> bool {
        matches!(self, Chain::Ethereum | Chain::Bsc)
    }

    /// Decimal exponent of the chain's bridged token base unit
    pub fn decimals(&self) -> u32 {
        match self {
            Chain::Terra => 6,
            Chain::Ethereum | Chain::Bsc => 18,
            Chain::Secret => 6,
        }
    }

    pub fn balance_display(&self) -> BalanceDisplay {
        match self {
            Chain::Terra | Chain::Secret => BalanceDisplay::Direct,
            Chain::Ethereum | Chain::Bsc => BalanceDisplay::NormalizedToNative,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Chain::Terra => "Terra",
            Chain::Ethereum => "Ethereum",
            Chain::Bsc => "BSC",
            Chain::Secret => "Secret",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Terra => "terra",
            Chain::Ethereum => "ethereum",
            Chain::Bsc => "bsc",
            Chain::Secret => "secret",
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Chain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "terra" | "luna" => Ok(Chain::Terra),
            "ethereum" | "eth" => Ok(Chain::Ethereum),
            "bsc" | "bnb" | "binance" => Ok(Chain::Bsc),
            "secret" | "scrt" => Ok(Chain::Secret),
            _ => Err(format!("Unknown chain: {}", s)),
        }
    }
}

// =============================================================================
// Session Types
// =============================================================================

/// Wallet used to authenticate the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalletType {
    TerraExtension,
    TerraWalletConnect,
    MetaMask,
    CoinbaseWallet,
    BinanceChain,
    WalletConnect,
    Keplr,
}

impl WalletType {
    /// Chains this wallet can sign for
    pub fn supports(&self, chain: Chain) -> bool {
        match self {
            WalletType::TerraExtension | WalletType::TerraWalletConnect => chain == Chain::Terra,
            WalletType::MetaMask | WalletType::CoinbaseWallet | WalletType::WalletConnect => {
                chain.is_ether_base()
            }
            WalletType::BinanceChain => chain == Chain::Bsc,
            WalletType::Keplr => chain == Chain::Secret,
        }
    }
}

impl std::str::FromStr for WalletType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "terra-extension" | "terra-station" => Ok(WalletType::TerraExtension),
            "terra-walletconnect" | "terra-wallet-connect" => Ok(WalletType::TerraWalletConnect),
            "metamask" | "meta-mask" => Ok(WalletType::MetaMask),
            "coinbase" | "coinbase-wallet" => Ok(WalletType::CoinbaseWallet),
            "binance" | "binance-chain" => Ok(WalletType::BinanceChain),
            "walletconnect" | "wallet-connect" => Ok(WalletType::WalletConnect),
            "keplr" => Ok(WalletType::Keplr),
            _ => Err(format!("Unknown wallet type: {}", s)),
        }
    }
}

/// Authenticated wallet session
///
/// A session exists only while the user is logged in; wallet SDK handles
/// stay with the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub address: String,
    pub wallet_type: WalletType,
}

impl User {
    pub fn new(address: impl Into<String>, wallet_type: WalletType) -> Self {
        Self {
            address: address.into(),
            wallet_type,
        }
    }
}

// =============================================================================
// Asset Types
// =============================================================================

/// Symbol -> token contract address or native denom
pub type WhiteList = BTreeMap<String, String>;

/// Token address -> raw balance in smallest units
pub type BalanceList = HashMap<String, Amount>;

/// A bridgeable asset as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

impl Asset {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
            logo_uri: None,
            token_address: None,
            balance: None,
            disabled: None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.unwrap_or(false)
    }
}

/// Inputs of one asset list computation
#[derive(Debug, Clone)]
pub struct AssetQuery {
    pub from: Chain,
    pub to: Chain,
    /// `None` when logged out
    pub user: Option<User>,
}

impl AssetQuery {
    pub fn new(from: Chain, to: Chain, user: Option<User>) -> Self {
        Self { from, to, user }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }
}
