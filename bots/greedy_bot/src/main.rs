use clap::Parser;
use rand::rngs::StdRng;
use rand::{seq::SliceRandom, SeedableRng};
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
    let rng = StdRng::seed_from_u64(seed);

    let result = GreedyBot { rng }.connect(&args.host, args.port)?;
    info!(%result, "Game over");
    Ok(())
}

struct GreedyBot {
    rng: StdRng,
}

impl GreedyBot {
    /// The moves that flip the most discs.
    fn best_moves(board: &Reversi) -> Vec<(u32, u32)> {
        let mut top_choices: Vec<(u32, u32)> = Vec::new();
        let mut top_score = 0;
        for (row, col) in board.legal_moves() {
            let score = board.flips_for(row, col).len();
            match score.cmp(&top_score) {
                std::cmp::Ordering::Less => {}
                std::cmp::Ordering::Equal => {
                    top_choices.push((row, col));
                }
                std::cmp::Ordering::Greater => {
                    top_choices = vec![(row, col)];
                    top_score = score;
                }
            }
        }
        top_choices
    }
}

impl Bot for GreedyBot {
    fn choose_move(&mut self, board: &Reversi) -> (u32, u32) {
        Self::best_moves(board)
            .choose(&mut self.rng)
            .copied()
            .unwrap_or((0, 0))
    }
}
