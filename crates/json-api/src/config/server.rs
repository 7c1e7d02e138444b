//! Server Config

use std::net::IpAddr;

use clap::Args;

/// Address the API listens on.
#[derive(Debug, Args)]
pub struct ServerRuntimeConfig {
    /// Host name or IP address to bind
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(short, long, env = "SERVER_PORT", default_value = "8698")]
    pub port: u16,
}

impl ServerRuntimeConfig {
    /// `host:port`, with IPv6 literals wrapped in brackets.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(ip)) => format!("[{ip}]:{}", self.port),
            _ => format!("{}:{}", self.host, self.port),
        }
    }
}
