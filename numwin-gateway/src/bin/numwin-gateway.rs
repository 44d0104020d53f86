use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use numwin_gateway::{ConfigOverrides, GatewayConfig, NumberGateway};

#[derive(Parser)]
#[command(name = "numwin-gateway")]
#[command(version)]
#[command(about = "Rolling average calculator over upstream number windows")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve(ConfigArgs),
    /// Print the resolved configuration as TOML
    ShowConfig(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    /// Optional TOML config file; flags and env vars override its values.
    #[arg(long, env = "NUMWIN_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, env = "NUMWIN_BIND_ADDR")]
    bind_addr: Option<String>,

    /// Port to listen on, keeping the host of the bind address.
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    #[arg(long, env = "NUMWIN_WINDOW_SIZE")]
    window_capacity: Option<usize>,

    #[arg(long, env = "NUMWIN_FETCH_TIMEOUT_MS")]
    fetch_timeout_ms: Option<u64>,

    #[arg(long, env = "NUMWIN_UPSTREAM_URL")]
    upstream_url: Option<String>,

    #[arg(long, env = "NUMWIN_AUTH_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,
}

impl ConfigArgs {
    fn resolve(self) -> anyhow::Result<GatewayConfig> {
        let mut config = match &self.config {
            Some(path) => GatewayConfig::load_from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => GatewayConfig::default(),
        };

        ConfigOverrides {
            bind_addr: self.bind_addr,
            port: self.port,
            window_capacity: self.window_capacity,
            fetch_timeout_ms: self.fetch_timeout_ms,
            upstream_url: self.upstream_url,
            auth_token: self.auth_token,
        }
        .apply(&mut config);

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("numwin=info,numwin_gateway=info,tower_http=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let config = args.resolve()?;
            NumberGateway::start(config)
                .await
                .context("gateway terminated")?;
            info!("Gateway stopped");
        }
        Commands::ShowConfig(args) => {
            let config = args.resolve()?;
            print!("{}", config.to_redacted_toml()?);
        }
    }

    Ok(())
}
