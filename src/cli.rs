//! # CLI Interface
//!
//! Command-line arguments for `bridge-assets`, built with `clap` derive.
//! Subcommands: `format`, `assets` and `chains`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bridge_assets::{Chain, WalletType};

/// Bridge asset lists and balance formatting.
#[derive(Parser, Debug)]
#[command(name = "bridge-assets", version, propagate_version = true)]
pub struct BridgeCli {
    /// Print debug logs to stderr.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Format a raw balance for display.
    Format(FormatArgs),
    /// Build the asset list for a bridge route.
    Assets(AssetsArgs),
    /// List supported chains and their decimal exponents.
    Chains,
}

#[derive(Parser, Debug)]
pub struct FormatArgs {
    /// Chain the balance is held on.
    #[arg(long, short = 'c')]
    pub chain: Chain,

    /// Raw balance in smallest units.
    #[arg(allow_hyphen_values = true)]
    pub balance: String,
}

#[derive(Parser, Debug)]
pub struct AssetsArgs {
    /// Path to the JSON configuration file.
    #[arg(long, short = 'c', env = "BRIDGE_CONFIG")]
    pub config: PathBuf,

    /// Source chain.
    #[arg(long)]
    pub from: Chain,

    /// Destination chain.
    #[arg(long)]
    pub to: Chain,

    /// Wallet address; omit to list assets as a logged-out user.
    #[arg(long)]
    pub address: Option<String>,

    /// Wallet used for the session. Defaults to the usual wallet of the
    /// source chain.
    #[arg(long)]
    pub wallet: Option<WalletType>,

    /// Read balances from a JSON file (`{"token": "amount"}`) instead of
    /// querying the network.
    #[arg(long)]
    pub balances: Option<PathBuf>,

    /// Print the list as JSON.
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        BridgeCli::command().debug_assert();
    }

    #[test]
    fn parses_format_command() {
        let cli = BridgeCli::parse_from(["bridge-assets", "format", "--chain", "eth", "1000000000000000000"]);
        match cli.command {
            Commands::Format(args) => {
                assert_eq!(args.chain, Chain::Ethereum);
                assert_eq!(args.balance, "1000000000000000000");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
