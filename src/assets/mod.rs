//! Bridgeable asset lists
//!
//! The catalog holds every asset and whitelist, the aggregator turns a
//! route plus session into the list the user picks from, and the formatter
//! renders raw balances for display.

pub mod aggregator;
pub mod catalog;
pub mod format;
pub mod store;


pub use aggregator::{mark_unavailable, merge_balances, AssetAggregator};
pub use catalog::AssetCatalog;
pub use format::{display_balance, format_amount, format_balance};
pub use store::{AssetListStore, RefreshTicket};
