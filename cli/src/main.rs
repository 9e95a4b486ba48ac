use anyhow::Context;
use clap::Parser;
use pairmatch_runtime::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::path::PathBuf;
use std::sync::Arc;

mod config;
mod feedback;
mod game;
mod input;
mod render;
mod store;
mod supplier;

use config::{Config, PartialConfig};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Board preset: easy, medium or hard
    #[arg(short, long)]
    difficulty: Option<String>,

    /// TOML file with defaults for the options below
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initials recorded with a new high score, asked for when missing
    #[arg(short, long)]
    initials: Option<String>,

    /// JSON file holding the high score and saved faces
    #[arg(long)]
    store: Option<PathBuf>,

    /// How long a mismatched pair stays face up
    #[arg(long)]
    reversal_delay_ms: Option<u64>,

    /// Keep nothing between runs
    #[arg(long)]
    no_save: bool,

    /// Type the card faces instead of using letters
    #[arg(long)]
    prompt_faces: bool,

    /// Ring the terminal bell on a mismatch
    #[arg(long)]
    bell: bool,
}

impl Args {
    fn overrides(&self) -> PartialConfig {
        PartialConfig {
            difficulty: self.difficulty.clone(),
            reversal_delay_ms: self.reversal_delay_ms,
            store_path: self.store.clone(),
            initials: self.initials.clone(),
            max_acquire_attempts: None,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(std::io::stderr)
        .init();

    let file = match &args.config {
        Some(path) => PartialConfig::load(path)?,
        None => PartialConfig::default(),
    };
    let config = Config::resolve(args.overrides().or(file), !args.no_save)?;
    log::debug!("{:?}", config);

    let gateway: Arc<dyn PersistenceGateway> = match &config.store_path {
        Some(path) => {
            let store = store::JsonFileGateway::new(path);
            log::debug!("Store at {}", store.path().display());
            Arc::new(store)
        }
        None => Arc::new(MemoryGateway::new()),
    };
    let input = input::Input::stdin();
    let supplier: Arc<dyn ImageSupplier> = if args.prompt_faces {
        Arc::new(supplier::PromptSupplier::new(input.clone()))
    } else {
        Arc::new(supplier::LabelSupplier)
    };

    let board = config.difficulty.board_config();
    println!("Difficulty: {}", config.difficulty);
    let loaded = FaceLoader::new(gateway.clone(), supplier, &config.session)
        .load(board)
        .await
        .context("Could not gather card faces")?;
    log::debug!("{} faces ({:?})", loaded.faces.len(), loaded.origin);

    let seeds = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let feedback = Arc::new(feedback::TerminalFeedback { bell: args.bell });
    let (driver, events) = SessionDriver::new(board, config.session.clone(), feedback);

    game::Game::new(
        driver,
        events,
        ScoreTracker::new(gateway),
        input,
        config.initials,
        seeds,
    )
    .run(loaded.faces)
    .await
}
