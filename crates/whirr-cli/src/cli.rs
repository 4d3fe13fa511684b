use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "whirrd", version, about = "whirr Internet Routing Registry daemon")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the whois server.
    Serve {
        /// Path to a TOML configuration file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured listen address.
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// RPSL dump to load into the store at startup.
        #[arg(long)]
        seed: Option<PathBuf>,
    },
}
