use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::sync::Arc;

use bridge_assets::utils::logging;
use bridge_assets::{
    display_balance, format_amount, Amount, Asset, AssetAggregator, AssetListStore, AssetQuery,
    BalanceList, BridgeConfig, Chain, StaticBalanceSource, User, WalletType,
};

mod cli;
use cli::{AssetsArgs, BridgeCli, Commands, FormatArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = BridgeCli::parse();

    logging::init_from_env();
    if cli.verbose {
        logging::enable_debug();
    }

    match cli.command {
        Commands::Format(args) => run_format(args),
        Commands::Assets(args) => run_assets(args).await,
        Commands::Chains => {
            run_chains();
            Ok(())
        }
    }
}

fn run_format(args: FormatArgs) -> Result<()> {
    if args.balance.trim().is_empty() {
        println!();
        return Ok(());
    }
    let amount: Amount = args
        .balance
        .parse()
        .with_context(|| format!("invalid balance: {}", args.balance))?;
    println!("{}", format_amount(&amount, args.chain));
    Ok(())
}

fn default_wallet(chain: Chain) -> WalletType {
    match chain {
        Chain::Terra => WalletType::TerraExtension,
        Chain::Ethereum => WalletType::MetaMask,
        Chain::Bsc => WalletType::BinanceChain,
        Chain::Secret => WalletType::Keplr,
    }
}

async fn run_assets(args: AssetsArgs) -> Result<()> {
    let config = BridgeConfig::load(&args.config)?;

    let aggregator = match &args.balances {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("cannot read balances file {}", path.display()))?;
            let balances: BalanceList =
                serde_json::from_str(&json).context("balances file is not a token -> amount map")?;
            AssetAggregator::new(config.catalog.clone())
                .with_source(Arc::new(StaticBalanceSource::new(args.from, balances)))
        }
        None => config.build_aggregator()?,
    };

    let user = args.address.map(|address| {
        let wallet = args.wallet.unwrap_or_else(|| default_wallet(args.from));
        User::new(address, wallet)
    });
    let query = AssetQuery::new(args.from, args.to, user);

    let store = AssetListStore::new();
    aggregator.get_asset_list(&store, &query).await?;
    let assets = store.snapshot()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assets)?);
    } else {
        print_table(&assets, args.from);
    }
    Ok(())
}

fn print_table(assets: &[Asset], chain: Chain) {
    println!("{:<8} {:>24}  {:<12} {}", "SYMBOL", "BALANCE", "STATUS", "TOKEN");
    for asset in assets {
        let status = if asset.is_disabled() { "unavailable" } else { "ok" };
        println!(
            "{:<8} {:>24}  {:<12} {}",
            asset.symbol,
            display_balance(asset, chain),
            status,
            asset.token_address.as_deref().unwrap_or("-")
        );
    }
}

fn run_chains() {
    for chain in Chain::all() {
        println!(
            "{:<10} {:<10} decimals={}",
            chain.as_str(),
            chain.display_name(),
            chain.decimals()
        );
    }
}
