use clap::Parser;
use media_vault::cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "media_vault=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { path }) => {
            media_vault::cli::init::run(path).await?;
        }
        Some(Commands::Migrate) => {
            media_vault::cli::migrate::run(&cli.config).await?;
        }
        Some(Commands::Serve { host, port }) => {
            media_vault::cli::serve::run(&cli.config, host, port).await?;
        }
        #[cfg(feature = "client")]
        Some(Commands::Media { server, command }) => {
            media_vault::cli::media::run(&server, command).await?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
