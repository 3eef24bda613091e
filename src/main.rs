use anyhow::Result;
use clap::Parser;
use selfagent::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    selfagent::run(args).await
}
