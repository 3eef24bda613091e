pub mod agent;
pub mod cli;
pub mod config;
pub mod http;
pub mod llm;
pub mod logging;
pub mod server;

use anyhow::Result;
use cli::{ApiClient, CliArgs, Command, Theme, run_client};
use config::AppConfig;
use http::{HttpClient, HttpDebugConfig};

pub async fn run(args: CliArgs) -> Result<()> {
    let config = if let Some(path) = args.config.as_deref() {
        AppConfig::load_with_path(Some(path))?
    } else {
        AppConfig::load()?
    };

    match args.command {
        Command::Serve { bind } => {
            logging::init_stderr();
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            server::serve(&config, &bind).await
        }
        Command::Chat { api_url } => {
            let log_path = logging::init_session_file()?;
            tracing::info!(path = %log_path.display(), "client session log");

            let api_url = api_url.unwrap_or_else(|| config.api_url.clone());
            let http = HttpClient::new(
                reqwest::Client::new(),
                HttpDebugConfig::from_flag(config.http_debug),
            );
            run_client(ApiClient::new(http, &api_url), Theme::from_env()).await
        }
    }
}
