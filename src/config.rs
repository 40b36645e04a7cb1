use crate::core::pipeline::DEFAULT_TOP_K;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing::Level;

/// Perfume recommendation server
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ServerConfig {
    /// Directory holding the catalog tables
    #[arg(short, long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory served under /images
    #[arg(short, long, default_value = "Images-test-gout")]
    pub images_dir: PathBuf,

    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(short, long, default_value_t = 5000)]
    pub port: u16,

    /// Perfumes returned per quiz
    #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,

    /// trace, debug, info, warn or error
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Unknown levels fall back to INFO.
    pub fn log_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }
}
