use clap::Parser;
use pulse_scripts::{cli::Cli, errors::ScriptError, utils::load_env_file};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    tracing_subscriber::fmt().pretty().init();

    if let Some(path) = load_env_file(None) {
        debug!("loaded environment from {}", path.display());
    }
    let cli = Cli::parse();

    let (command, config) = cli.into_parts();
    command.run(config).await
}
