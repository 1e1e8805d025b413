use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::Path;

#[derive(Parser)]
#[command(name = "bm", version, about = "Bookmark API service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API.
    Serve {
        /// Keep bookmarks in process memory instead of MongoDB.
        #[arg(long)]
        in_memory: bool,
    },
}

/// Loads `KEY=value` pairs from `path` when it exists. Variables already set
/// in the environment win.
fn load_env_file(path: &Path) -> bool {
    dotenvy::from_path(path).is_ok()
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env_file(Path::new(".env"));
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { in_memory } => {
            let config = bm_api::load_config(in_memory)?;
            bm_api::run(config).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_accepts_in_memory_flag() {
        let cli = Cli::try_parse_from(["bm", "serve", "--in-memory"]).expect("parse");
        assert!(matches!(cli.command, Commands::Serve { in_memory: true }));

        let cli = Cli::try_parse_from(["bm", "serve"]).expect("parse");
        assert!(matches!(cli.command, Commands::Serve { in_memory: false }));
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["bm", "migrate"]).is_err());
    }

    #[test]
    fn env_file_fills_gaps_without_overriding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "BM_CLI_TEST_FROM_FILE=file\nBM_CLI_TEST_PRESET=file\n").unwrap();
        std::env::set_var("BM_CLI_TEST_PRESET", "shell");

        assert!(load_env_file(&path));
        assert_eq!(std::env::var("BM_CLI_TEST_FROM_FILE").unwrap(), "file");
        assert_eq!(std::env::var("BM_CLI_TEST_PRESET").unwrap(), "shell");

        assert!(!load_env_file(&dir.path().join("missing.env")));
    }
}
