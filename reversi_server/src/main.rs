use std::path::PathBuf;

use clap::Parser;
use reversi_server::{Listener, ServerConfig};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Number of rows on the board
    rows: Option<u32>,

    /// Number of columns on the board
    cols: Option<u32>,

    /// Port to listen on
    port: Option<u16>,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Seconds a player may take for a move, 0 to wait forever
    #[arg(short, long)]
    move_timeout: Option<u64>,

    /// How many games to host before exiting, 0 to keep going forever
    #[arg(short, long)]
    num_sessions: Option<usize>,

    /// JSON file with default settings; command line arguments take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

impl Args {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(move_timeout) = self.move_timeout {
            config.move_timeout_secs = move_timeout;
        }
        if let Some(num_sessions) = self.num_sessions {
            config.num_sessions = num_sessions;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    let config = args.into_config()?;
    info!(?config);

    let listener = Listener::bind(config)?;
    let score = listener.serve();
    eprintln!("{}", score);

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
