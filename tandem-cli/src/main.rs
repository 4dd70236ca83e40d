use anyhow::Result;
use clap::Parser;
use colored::*;
use std::net::IpAddr;
use std::num::NonZeroUsize;
use tandem_server::{ServerConfig, parse_ice_servers};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tandem-server")]
#[command(about = "Room registry and signaling relay for one-to-one WebRTC calls")]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "TANDEM_HOST")]
    host: Option<IpAddr>,

    #[arg(short, long, env = "TANDEM_PORT")]
    port: Option<u16>,

    /// STUN/TURN URL announced to clients. Repeat or comma-separate for several.
    #[arg(long = "ice-server", env = "TANDEM_ICE_SERVERS", value_delimiter = ',')]
    ice_servers: Vec<String>,

    /// Commands the relay may have queued before connections wait.
    #[arg(long, env = "TANDEM_RELAY_QUEUE")]
    relay_queue: Option<NonZeroUsize>,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        let mut config = ServerConfig::default();
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(capacity) = self.relay_queue {
            config.relay_queue_capacity = capacity.get();
        }

        let ice_servers = parse_ice_servers(self.ice_servers.iter().map(String::as_str));
        if !ice_servers.is_empty() {
            config.ice_servers = ice_servers;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tandem_server=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Cli::parse().into_config();

    println!("{}", "Tandem signaling server".green().bold());
    println!("   ws:   ws://{}/ws", config.bind_addr());
    println!(
        "   ice:  {}",
        config
            .ice_servers
            .iter()
            .flat_map(|s| s.urls.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(", ")
            .cyan()
    );

    tandem_server::serve(config).await
}
