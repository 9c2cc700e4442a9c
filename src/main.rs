use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snake_env::game::GameConfig;
use snake_env::modes::HumanMode;
use tracing::Level;

#[derive(Parser)]
#[command(name = "snake_env")]
#[command(version, about = "Grid Snake game with agent-facing state encodings")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// Grid width in cells
    #[arg(long, default_value = "20")]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value = "20")]
    height: usize,

    /// Cell size in pixels (10 pixels per terminal column)
    #[arg(long, default_value = "20")]
    cell_size: u32,

    /// Game ticks per second
    #[arg(long, default_value = "10")]
    fps: u32,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level for the log file
    #[arg(long, default_value = "info")]
    log_level: Level,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        let mut config = GameConfig::new(self.width, self.height)
            .with_cell_size(self.cell_size)
            .with_fps(self.fps);
        config.seed = self.seed;
        config
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    // Create game configuration from CLI arguments
    let config = cli.game_config();
    config.validate().context("Invalid game configuration")?;
    tracing::info!(?config, "starting");

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config)?;
            human_mode.run().await?;
        }
    }

    Ok(())
}
