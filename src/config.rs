//! Command-line configuration.
//!
//! # Design Decisions
//! - Flag-configured only; a one-shot developer tool has no business with
//!   config files or reload machinery
//! - Environment overrides (`SPYGLASS_PORT`, `SPYGLASS_UPLOAD`) let wrapper
//!   scripts set defaults without touching the invocation

use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Startup configuration, parsed from flags and environment.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "spyglass",
    version,
    about = "Serves a directory over HTTP while dumping every request it sees"
)]
pub struct Config {
    /// Port to serve on
    #[arg(short, long, env = "SPYGLASS_PORT", default_value_t = 8080)]
    pub port: u16,

    /// The directory to serve
    #[arg(short, long, default_value = ".")]
    pub directory: PathBuf,

    /// Serve on localhost only
    #[arg(short, long)]
    pub localhost: bool,

    /// Only print summary lines, do not dump request headers
    #[arg(short, long)]
    pub quiet: bool,

    /// Do not serve any directory (ignores --directory), log requests only
    #[arg(long)]
    pub no_serve: bool,

    /// Enable support for file uploads
    ///
    /// A stray value in `SPYGLASS_UPLOAD` must never abort startup, so
    /// anything that is not a falsey value counts as enabled.
    #[arg(
        short = 'u',
        long,
        env = "SPYGLASS_UPLOAD",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub enable_upload: bool,
}

impl Config {
    /// The socket address to bind, honoring `--localhost`.
    pub fn bind_address(&self) -> SocketAddr {
        let host: IpAddr = if self.localhost {
            Ipv4Addr::LOCALHOST.into()
        } else {
            Ipv4Addr::UNSPECIFIED.into()
        };
        SocketAddr::new(host, self.port)
    }
}
