//! petitiond: runs the petitions gateway, or drives a running one.

use anyhow::Context;
use clap::Parser;
use petition_client::{sign_action_request, FlowError, GatewayClient, Orchestrator};
use petition_gateway::{GatewayConfig, GatewayServer, ShutdownController, StoreBackend};
use petition_types::{PetitionId, SystemClock};
use petition_utils::{init_tracing, LogFormat};
use petition_worldid::{ActionApiVersion, FileProofSource};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "petitiond", about = "Verified-human petitions service")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "PETITION_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to bind.
    #[arg(long, env = "PETITION_BIND_ADDRESS")]
    bind_address: Option<String>,

    /// HTTP port.
    #[arg(long, env = "PETITION_PORT")]
    port: Option<u16>,

    /// Petition store: "json" or "memory".
    #[arg(long, env = "PETITION_STORE")]
    store: Option<StoreBackend>,

    /// Backing file of the JSON store.
    #[arg(long, env = "PETITION_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// World ID application id.
    #[arg(long, env = "APP_ID")]
    app_id: Option<String>,

    /// Key protecting `POST /actions`; client commands send it as a bearer token.
    #[arg(long, env = "PETITION_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Bearer key for the World ID developer API.
    #[arg(long, env = "WORLD_ID_API_KEY", hide_env_values = true)]
    world_id_api_key: Option<String>,

    /// Base URL of the World ID developer API.
    #[arg(long, env = "PETITION_WORLD_ID_URL")]
    world_id_base_url: Option<String>,

    /// Create-action API generation: "v2" or "v1".
    #[arg(long, env = "PETITION_ACTION_API")]
    action_api_version: Option<ActionApiVersion>,

    /// Key of the petition id HMAC.
    #[arg(long, env = "PETITION_ID_SECRET", hide_env_values = true)]
    id_secret: Option<String>,

    /// Key of the wallet-auth nonce HMAC.
    #[arg(long, env = "HMAC_SECRET_KEY", hide_env_values = true)]
    hmac_secret: Option<String>,

    /// Chain RPC endpoint for SIWE verification.
    #[arg(long, env = "RPC_URL")]
    rpc_url: Option<String>,

    /// Enable Prometheus metrics endpoint.
    #[arg(long, env = "PETITION_ENABLE_METRICS")]
    metrics: bool,

    /// Upstream request timeout in seconds.
    #[arg(long, env = "PETITION_REQUEST_TIMEOUT")]
    request_timeout: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "PETITION_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "PETITION_LOG_FORMAT")]
    log_format: Option<String>,

    /// Gateway used by the client commands.
    #[arg(long, default_value = "http://127.0.0.1:3000", env = "PETITION_GATEWAY_URL")]
    gateway_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the gateway until SIGINT/SIGTERM.
    Serve,

    /// Print the effective configuration as TOML.
    Config,

    /// Work with petitions on a running gateway.
    #[command(subcommand)]
    Petitions(PetitionsCommand),
}

#[derive(clap::Subcommand)]
enum PetitionsCommand {
    /// List all petitions.
    List,

    /// Verify with a proof, create a petition and register its sign action.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// JSON file holding the verify payload for "create-petition".
        #[arg(long)]
        proof: PathBuf,
    },

    /// Verify with a proof and sign a petition.
    Sign {
        id: String,
        /// JSON file holding the verify payload for "sign-petition-<id>".
        #[arg(long)]
        proof: PathBuf,
    },

    /// Re-register the sign action of an existing petition.
    RegisterAction { id: String },
}

/// Load the optional TOML file, then let CLI flags and env vars override it.
fn load_config(cli: &Cli) -> anyhow::Result<GatewayConfig> {
    let base = match &cli.config {
        Some(path) => {
            let path = path.to_string_lossy();
            GatewayConfig::from_toml_file(&path)
                .with_context(|| format!("loading config from {path}"))?
        }
        None => GatewayConfig::default(),
    };
    Ok(apply_overrides(cli, base))
}

fn apply_overrides(cli: &Cli, file_cfg: GatewayConfig) -> GatewayConfig {
    fn pick<T: Clone>(flag: &Option<T>, file: Option<T>) -> Option<T> {
        flag.clone().or(file)
    }

    GatewayConfig {
        bind_address: cli.bind_address.clone().unwrap_or(file_cfg.bind_address),
        port: cli.port.unwrap_or(file_cfg.port),
        store: cli.store.unwrap_or(file_cfg.store),
        data_file: cli.data_file.clone().unwrap_or(file_cfg.data_file),
        app_id: pick(&cli.app_id, file_cfg.app_id),
        api_key: pick(&cli.api_key, file_cfg.api_key),
        world_id_api_key: pick(&cli.world_id_api_key, file_cfg.world_id_api_key),
        world_id_base_url: cli
            .world_id_base_url
            .clone()
            .unwrap_or(file_cfg.world_id_base_url),
        action_api_version: cli.action_api_version.unwrap_or(file_cfg.action_api_version),
        id_secret: pick(&cli.id_secret, file_cfg.id_secret),
        hmac_secret: pick(&cli.hmac_secret, file_cfg.hmac_secret),
        rpc_url: pick(&cli.rpc_url, file_cfg.rpc_url),
        enable_metrics: cli.metrics || file_cfg.enable_metrics,
        log_level: cli.log_level.clone().unwrap_or(file_cfg.log_level),
        log_format: cli.log_format.clone().unwrap_or(file_cfg.log_format),
        request_timeout_secs: cli.request_timeout.unwrap_or(file_cfg.request_timeout_secs),
    }
}

async fn serve(config: GatewayConfig) -> anyhow::Result<()> {
    if config.app_id.is_none() {
        tracing::warn!("APP_ID is not set: /verify-proof and /actions will answer 500");
    }
    if config.api_key.is_none() {
        tracing::warn!("no API key configured: /actions rejects every request");
    }
    tracing::info!(
        store = %config.store,
        data_file = %config.data_file.display(),
        action_api = %config.action_api_version,
        metrics = config.enable_metrics,
        "starting petitions gateway on {}",
        config.listen_addr()
    );

    let server = GatewayServer::from_config(&config)?;
    let shutdown = Arc::new(ShutdownController::new());
    let signals = shutdown.clone();
    tokio::spawn(async move { signals.wait_for_signal().await });

    server.start(&shutdown).await?;
    tracing::info!("petitiond exited cleanly");
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_petitions(
    gateway_url: &str,
    config: &GatewayConfig,
    command: &PetitionsCommand,
) -> anyhow::Result<()> {
    let mut client = GatewayClient::new(gateway_url);
    if let Some(key) = &config.api_key {
        client = client.with_api_key(key.clone());
    }
    let orchestrator = |proof: &PathBuf| {
        Orchestrator::new(
            client.clone(),
            Arc::new(FileProofSource::new(proof.clone())),
            Arc::new(SystemClock),
        )
    };

    match command {
        PetitionsCommand::List => print_json(&client.list_petitions().await?),
        PetitionsCommand::Create {
            title,
            description,
            proof,
        } => match orchestrator(proof).create_petition(title, description).await {
            Ok(petition) => print_json(&petition),
            Err(FlowError::ActionRegistration { petition, source }) => {
                print_json(&petition)?;
                anyhow::bail!(
                    "petition {} was created but its sign action was not registered ({source}); \
                     retry with `petitiond petitions register-action {}`",
                    petition.id,
                    petition.id
                )
            }
            Err(e) => Err(e.into()),
        },
        PetitionsCommand::Sign { id, proof } => {
            let id = PetitionId::new(id.as_str())?;
            print_json(&orchestrator(proof).sign_petition(&id).await?)
        }
        PetitionsCommand::RegisterAction { id } => {
            let id = PetitionId::new(id.as_str())?;
            print_json(&client.register_action(&sign_action_request(&id)).await?)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let format = config
        .log_format
        .parse::<LogFormat>()
        .map_err(anyhow::Error::msg)?;
    init_tracing(&config.log_level, format);
    if let Some(path) = &cli.config {
        tracing::info!("loaded config from {}", path.display());
    }

    match &cli.command {
        Command::Serve => serve(config).await,
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        Command::Petitions(command) => run_petitions(&cli.gateway_url, &config, command).await,
    }
}
