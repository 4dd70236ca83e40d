use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tandem_core::IceServerConfig;
use tandem_core::utils::DEFAULT_STUN_ADDR;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Announced to every client in its `Welcome` frame.
    pub ice_servers: Vec<IceServerConfig>,
    pub relay_queue_capacity: usize,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3001,
            ice_servers: vec![IceServerConfig::stun(DEFAULT_STUN_ADDR)],
            relay_queue_capacity: 256,
        }
    }
}

/// One server entry per URL; blanks are skipped.
pub fn parse_ice_servers<'a>(urls: impl IntoIterator<Item = &'a str>) -> Vec<IceServerConfig> {
    urls.into_iter()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(IceServerConfig::stun)
        .collect()
}
