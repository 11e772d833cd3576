use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use rendezvous_core::{IceServerConfig, RoomId};
use rendezvous_server::{AppState, ServerConfig, router};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rendezvous")]
#[command(about = "WebRTC meeting signaling server")]
struct Args {
    /// Address the HTTP/WebSocket listener binds to.
    #[arg(long, env = "RENDEZVOUS_BIND", default_value = "0.0.0.0:5001")]
    bind: SocketAddr,

    #[arg(
        long,
        env = "RENDEZVOUS_STUN",
        value_delimiter = ',',
        default_value = rendezvous_server::DEFAULT_STUN_SERVER
    )]
    stun: Vec<String>,

    #[arg(long, env = "TURN_URL")]
    turn_url: Option<String>,

    #[arg(long, env = "TURN_USERNAME")]
    turn_username: Option<String>,

    #[arg(long, env = "TURN_CREDENTIAL")]
    turn_credential: Option<String>,

    /// Meeting ids clients may join. Leave empty to accept any id.
    #[arg(long = "allow-meeting", env = "RENDEZVOUS_MEETINGS", value_delimiter = ',')]
    allow_meeting: Vec<String>,

    /// Allowed browser origin. Any origin when unset.
    #[arg(long, env = "CLIENT_URL")]
    cors_origin: Option<String>,

    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        let mut ice_servers = vec![IceServerConfig {
            urls: self.stun,
            username: None,
            credential: None,
        }];
        if let Some(url) = self.turn_url {
            ice_servers.push(IceServerConfig {
                urls: vec![url],
                username: self.turn_username,
                credential: self.turn_credential,
            });
        }

        ServerConfig {
            bind: self.bind,
            ice_servers,
            allowed_meetings: self
                .allow_meeting
                .into_iter()
                .map(|id| id.trim().to_owned())
                .filter(|id| !id.is_empty())
                .map(RoomId::from)
                .collect(),
            cors_origin: self.cors_origin,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&args.log_level).context("Invalid log filter")?,
        )
        .init();

    let config = args.into_config();
    let state = Arc::new(AppState::new(&config));
    let app = router(state, config.cors_origin.as_deref());

    println!("{}", "🚀 Starting rendezvous signaling server...".green().bold());
    if config.allowed_meetings.is_empty() {
        info!("Accepting any meeting id");
    } else {
        info!("Accepting {} meeting id(s)", config.allowed_meetings.len());
    }
    info!("Advertising {} ICE server(s)", config.ice_servers.len());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("Signaling server listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {}", e);
    }
}
