use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone, PartialEq, Eq)]
#[command(name = "selfagent")]
#[command(
    about = "A single configurable persona agent: HTTP API and terminal client",
    long_about = "A single configurable persona agent: HTTP API and terminal client\n\nConfig file loading:\n  - --config <path> (explicit file, overrides default path discovery)\n  - Default search path when --config is not provided:\n    1. $XDG_CONFIG_HOME/selfagent/config.toml\n    2. ~/.config/selfagent/config.toml"
)]
pub struct CliArgs {
    /// Load config from this file path instead of the default discovery path.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API (`/api/agent`, `/api/chat`).
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:5000.
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
    /// Open the terminal client against a running API.
    Chat {
        /// Base URL of the API, e.g. http://localhost:5000/api.
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
    },
}
