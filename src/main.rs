use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use log::info;
use power_snake::game::GameConfig;
use power_snake::modes::HumanMode;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "power_snake")]
#[command(version, about = "Snake with speed-up, obstacles and power-up food")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// JSON game configuration; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Starting tick interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Fastest allowed tick interval in milliseconds
    #[arg(long)]
    min_interval_ms: Option<u64>,

    /// Ignore a direction change that reverses the snake
    #[arg(long)]
    block_reversal: bool,

    /// Write logs here (RUST_LOG filters, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
}

impl Cli {
    /// File config first, then command-line overrides
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(interval) = self.interval_ms {
            config.initial_interval_ms = interval;
        }
        if let Some(min_interval) = self.min_interval_ms {
            config.min_interval_ms = min_interval;
        }
        if self.block_reversal {
            config.block_reversal = true;
        }

        config
            .validate()
            .map_err(|e| anyhow!("Invalid game configuration: {}", e))?;
        Ok(config)
    }
}

/// The terminal belongs to the game, so logs only go to a file
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref())?;
    let config = cli.game_config()?;
    info!("starting with {:?}", config);

    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config);
            human_mode.run().await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_flags() {
        let cli = Cli::parse_from(["power_snake"]);
        assert_eq!(cli.game_config().unwrap(), GameConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "initial_interval_ms": 150, "seed": 1 }}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::parse_from([
            "power_snake",
            "--config",
            &path,
            "--seed",
            "9",
            "--block-reversal",
        ]);
        let config = cli.game_config().unwrap();

        assert_eq!(config.initial_interval_ms, 150);
        assert_eq!(config.seed, Some(9));
        assert!(config.block_reversal);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let cli = Cli::parse_from(["power_snake", "--min-interval-ms", "500"]);
        assert!(cli.game_config().is_err());
    }
}
