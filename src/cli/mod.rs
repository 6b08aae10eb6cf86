pub mod init;
#[cfg(feature = "client")]
pub mod media;
pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vault")]
#[command(version)]
#[command(about = "A small photo & video vault", long_about = None)]
pub struct Cli {
    #[arg(short, long, default_value = "vault.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new vault directory with a starter config
    Init {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Apply pending database migrations
    Migrate,
    /// Run the HTTP API
    Serve {
        #[arg(short = 'H', long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Talk to a running vault server
    #[cfg(feature = "client")]
    Media {
        #[arg(long, env = "VAULT_SERVER", default_value = "http://127.0.0.1:3000")]
        server: String,
        #[command(subcommand)]
        command: MediaCommand,
    },
}

#[cfg(feature = "client")]
#[derive(Subcommand)]
pub enum MediaCommand {
    /// List stored media, optionally only photos or only videos
    List {
        #[arg(long = "type")]
        media_type: Option<String>,
    },
    /// Store a new photo or video reference
    Add {
        #[arg(long = "type", default_value = "photo")]
        media_type: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        thumbnail: Option<String>,
    },
    /// Remove one item by id; unknown ids are ignored
    Remove {
        id: i64,
    },
    /// Remove several items by id in one request; unknown ids are ignored
    RemoveMany {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[cfg(feature = "client")]
    #[test]
    fn test_media_subcommands_have_help() {
        let command = Cli::command();
        let media = command
            .find_subcommand("media")
            .expect("media subcommand should exist");
        for sub in media.get_subcommands() {
            assert!(
                sub.get_about().is_some(),
                "`vault media {}` has no help text",
                sub.get_name()
            );
        }
    }

    #[cfg(feature = "client")]
    #[test]
    fn test_parse_remove_many() {
        let cli = Cli::try_parse_from(["vault", "media", "remove-many", "1", "2", "3"]).unwrap();
        match cli.command {
            Some(Commands::Media {
                command: MediaCommand::RemoveMany { ids },
                ..
            }) => assert_eq!(ids, vec![1, 2, 3]),
            _ => panic!("expected media remove-many"),
        }
    }
}
