use clap::Parser;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use reversi::Reversi;
use reversi_bot_utils::{initialize_logging, Bot};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
struct Args {
    /// Host name or address of the server
    host: String,

    /// Port of the server
    port: u16,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level);
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let rng = StdRng::seed_from_u64(seed);

    let result = RandomBot { rng }.connect(&args.host, args.port)?;
    info!(%result, "Game over");
    Ok(())
}

struct RandomBot {
    rng: StdRng,
}

impl Bot for RandomBot {
    fn choose_move(&mut self, board: &Reversi) -> (u32, u32) {
        // The server only asks while a legal move exists
        board
            .legal_moves()
            .choose(&mut self.rng)
            .copied()
            .unwrap_or((0, 0))
    }
}
