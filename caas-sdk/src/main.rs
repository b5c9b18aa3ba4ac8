//! caas-probe - exercises the gateway SDK API from the command line.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use caas_sdk::{GatewayClient, ProbeConfig, SessionCreatePayload, SessionTokenBundle};

#[derive(Parser)]
#[command(name = "caas-probe", version, about = "Probe a CaaS gateway's SDK API")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (default: ./caas.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Gateway base URL, overriding the config file.
    #[arg(long, global = true, env = "CAAS_BASE_URL")]
    base_url: Option<String>,

    /// Default project id, overriding the config file.
    #[arg(long, global = true)]
    project: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Check gateway health.
    Health,
    /// List gateway capabilities.
    Capabilities,
    /// Create a session for an end user.
    Session {
        user_external_id: String,
        /// Project for this session only.
        #[arg(long = "session-project")]
        project_id: Option<String>,
        /// JSON object forwarded as `user_data`.
        #[arg(long)]
        user_data: Option<String>,
    },
    /// Exchange a refresh token for new tokens.
    Refresh { refresh_token: String },
    /// Revoke an access token.
    Logout { access_token: String },
}

fn init_telemetry(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = ProbeConfig::load(cli.config.as_deref()).map_err(|e| {
        format!(
            "Failed to load configuration: {}. \
             Make sure caas.toml exists or set CAAS__GATEWAY__BASE_URL and CAAS__GATEWAY__API_KEY.",
            e
        )
    })?;
    if let Some(base_url) = cli.base_url {
        config.gateway.base_url = base_url;
    }
    if let Some(project) = cli.project {
        config.gateway.project_id = Some(project);
    }

    let level = cli
        .log_level
        .as_deref()
        .unwrap_or(config.logging.level.as_str());
    init_telemetry(level, cli.json_logs || config.logging.json);

    let client_config = config.gateway.client_config();
    tracing::info!("Probing gateway at {}", client_config.base_url());
    let client = GatewayClient::new(client_config)?;

    let result = match cli.command {
        Command::Health => client.health().await?,
        Command::Capabilities => client.capabilities().await?,
        Command::Session {
            user_external_id,
            project_id,
            user_data,
        } => {
            let mut payload = SessionCreatePayload::new(user_external_id);
            payload.project_id = project_id;
            if let Some(raw) = user_data {
                let data: Map<String, Value> = serde_json::from_str(&raw)
                    .map_err(|e| format!("--user-data must be a JSON object: {}", e))?;
                payload.user_data = Some(data);
            }
            let result = client.create_session_with(payload).await?;
            log_token_bundle(result.as_ref());
            result
        }
        Command::Refresh { refresh_token } => {
            let result = client.refresh(&refresh_token).await?;
            log_token_bundle(result.as_ref());
            result
        }
        Command::Logout { access_token } => client.logout(&access_token).await?,
    };

    match result {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => tracing::info!("Gateway returned no content"),
    }

    Ok(())
}

fn log_token_bundle(result: Option<&Value>) {
    let Some(value) = result else { return };
    match SessionTokenBundle::from_value(value.clone()) {
        Ok(bundle) => tracing::info!(
            token_type = %bundle.token_type,
            expires_in = bundle.expires_in,
            "Session tokens issued"
        ),
        Err(e) => tracing::warn!("Response is not a token bundle: {}", e),
    }
}
