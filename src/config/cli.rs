use crate::config::toml_config::FileConfig;
use crate::config::{BridgeSettings, Overrides, UpstreamSettings};
use crate::utils::error::Result;
use clap::{Args, Parser};
use std::path::PathBuf;

/// Upstream connection flags shared by the server and the import tool.
#[derive(Debug, Clone, Args)]
pub struct UpstreamArgs {
    /// Session cookie copied from an authenticated AnkiWeb browser session
    #[arg(long, env = "ANKI_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    /// Card-creation endpoint
    #[arg(long, env = "ANKIWEB_ENDPOINT")]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub user_agent: Option<String>,

    #[arg(long)]
    pub origin: Option<String>,

    #[arg(long)]
    pub referer: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Path to a TOML config file (extra decks, defaults)
    #[arg(short, long, env = "BRIDGE_CONFIG")]
    pub config: Option<PathBuf>,
}

impl UpstreamArgs {
    pub fn load_file(&self) -> Result<Option<FileConfig>> {
        match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                FileConfig::from_file(path).map(Some)
            }
            None => Ok(None),
        }
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            cookie: self.cookie.clone(),
            endpoint: self.endpoint.clone(),
            user_agent: self.user_agent.clone(),
            origin: self.origin.clone(),
            referer: self.referer.clone(),
            timeout_seconds: self.timeout_seconds,
            ..Overrides::default()
        }
    }

    pub fn resolve(&self, file: &FileConfig) -> Result<UpstreamSettings> {
        UpstreamSettings::resolve(&self.overrides(), file)
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "ankiweb-bridge")]
#[command(about = "Local REST API that files flashcards into AnkiWeb decks")]
pub struct ServerArgs {
    #[command(flatten)]
    pub upstream: UpstreamArgs,

    #[arg(long, env = "BRIDGE_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Seconds between cards when a batch request does not say
    #[arg(long)]
    pub default_delay: Option<f64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ServerArgs {
    pub fn resolve(&self) -> Result<BridgeSettings> {
        let file = self.upstream.load_file()?;
        let overrides = Overrides {
            host: self.host.clone(),
            port: self.port,
            default_delay: self.default_delay,
            ..self.upstream.overrides()
        };
        BridgeSettings::resolve(overrides, file)
    }
}
