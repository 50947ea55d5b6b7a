//! Bridge Assets Core Library
//!
//! Asset list and balance display logic for a cross-chain token bridge
//! between Terra, Ethereum, BSC and Secret Network.
//!
//! # Architecture
//!
//! This crate provides:
//! - **assets**: asset catalog, asset list aggregation, balance formatting
//! - **sources**: per-chain balance sources (Terra LCD, EVM JSON-RPC,
//!   Secret SNIP-20 gateway, in-memory)
//! - **config**: JSON configuration with environment overrides
//! - **utils**: HTTP helpers, endpoint validation, redacting logger
//!
//! # Example
//!
//! ```rust,ignore
//! use bridge_assets::{AssetListStore, AssetQuery, BridgeConfig, Chain};
//!
//! let aggregator = BridgeConfig::load("bridge.json")?.build_aggregator()?;
//! let store = AssetListStore::new();
//! let query = AssetQuery::new(Chain::Terra, Chain::Ethereum, None);
//! aggregator.get_asset_list(&store, &query).await?;
//! for asset in store.snapshot()? {
//!     println!("{} {}", asset.symbol, bridge_assets::display_balance(&asset, query.from));
//! }
//! ```

pub mod amount;
pub mod assets;
pub mod config;
pub mod error;
pub mod sources;
pub mod types;
pub mod utils;

pub use amount::{Amount, AmountError};
pub use assets::{
    display_balance, format_amount, format_balance, AssetAggregator, AssetCatalog, AssetListStore,
};
pub use config::BridgeConfig;
pub use error::{BridgeError, BridgeResult, ErrorCode};
pub use sources::{BalanceSource, StaticBalanceSource};
pub use types::*;
