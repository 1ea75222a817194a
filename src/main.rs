// =============================================================================
// Allo Starter Kit - Main Entry Point
// =============================================================================
//
// License: Apache 2.0 / MIT
//
// Description:
//   Loads and validates configuration, connects to the configured chain and
//   runs one command. Every failure surfaces as a non-zero exit with the
//   typed error logged.
//
// Runtime Requirements:
//   • ALLO_CONFIG or --config pointing to a TOML file (see
//     allo-starter.example.toml)
//   • ALLO_SIGNER_KEY holding the sender's private key
//
// =============================================================================

use std::path::Path;
use std::sync::Arc;

use allo_starter::config::Settings;
use allo_starter::ipfs::IpfsPinner;
use allo_starter::metadata::image_data_url;
use allo_starter::web3::chains::parse_address;
use allo_starter::web3::prelude::*;
use allo_starter::web3::{predict_profile_id, Allo, MicroGrantsStrategy, Registry, Web3Client};
use allo_starter::{
    profile_args, AlloError, Config, MicroGrantsDeployer, PoolBootstrap, ProfileCreator, RegistryClient,
};
use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

mod clap;

use crate::clap::{Args, Commands};

#[tokio::main]
async fn main() {
    let args = clap::parse();
    init_tracing(&args);
    info!("🚀 Starting allo-starter {}", clap::version());

    if let Err(e) = run(args).await {
        error!("❌ {:#}", e);
        if e.downcast_ref::<AlloError>().is_some_and(AlloError::is_retryable) {
            warn!("⚠️ The failure looks transient; running the command again may succeed");
        }
        std::process::exit(1);
    }
}

fn init_tracing(args: &Args) {
    let filter = match &args.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" })),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run(args: Args) -> anyhow::Result<()> {
    if let Commands::ProfileId { nonce, owner } = &args.command {
        let owner = match owner {
            Some(owner) => parse_address(owner)?,
            None => Config::profile_owner(args.config.as_deref())?,
        };
        println!("{:?}", predict_profile_id(U256::from(*nonce), owner));
        return Ok(());
    }

    let config = Config::load(args.config.as_deref())?;
    let settings = config.validate()?;

    let chain = Arc::new(Web3Client::new(settings.client.clone(), settings.signer.clone())?);
    chain.verify_chain().await?;

    match args.command {
        Commands::GasPrice => {
            let price = chain.gas_price().await.map_err(AlloError::GasPriceUnavailable)?;
            println!("{price}");
        }
        Commands::CreateProfile { nonce, name } => {
            let registry = registry_client(&settings, chain)?;
            let profile_id = registry
                .create_profile(profile_args(&settings.profile, nonce, name))
                .await?;
            println!("{profile_id:?}");
        }
        Commands::CreatePool { nonce, image } => {
            let pool_id = create_pool(&settings, chain, nonce, image.as_deref()).await?;
            println!("{pool_id}");
        }
        Commands::ProfileId { .. } => {}
    }
    Ok(())
}

fn registry_client(settings: &Settings, chain: Arc<Web3Client>) -> anyhow::Result<RegistryClient<Arc<Web3Client>>> {
    let registry = Registry::new(settings.registry_address)?;
    Ok(RegistryClient::new(chain, registry).with_confirmations(settings.confirmations))
}

async fn create_pool(
    settings: &Settings,
    chain: Arc<Web3Client>,
    nonce: Option<u64>,
    image: Option<&Path>,
) -> anyhow::Result<U256> {
    let artifact = settings
        .strategy_artifact
        .as_deref()
        .context("strategy.artifact must point to the MicroGrants bytecode")?;
    let bytecode = tokio::fs::read_to_string(artifact)
        .await
        .with_context(|| format!("reading {}", artifact.display()))?;
    let strategy = MicroGrantsStrategy::from_hex(&bytecode)?;

    let mut template = settings.pool.clone();
    if let Some(path) = image {
        template.image = Some(image_data_url(path)?);
    }

    let deployer = MicroGrantsDeployer::new(
        chain.clone(),
        Allo::new(settings.allo_address)?,
        strategy,
        settings.strategy.clone(),
    )
    .with_confirmations(settings.confirmations);

    let bootstrap = PoolBootstrap::new(
        registry_client(settings, chain)?,
        IpfsPinner::new(settings.ipfs.clone())?,
        deployer,
        template,
    );
    Ok(bootstrap
        .bootstrap(profile_args(&settings.profile, nonce, None))
        .await?)
}
