use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Settings for [`Listener`](crate::Listener).
///
/// Every field is optional in the JSON file; missing ones keep their default.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rows: u32,
    pub cols: u32,
    /// How long a player may think about a move. 0 means forever.
    pub move_timeout_secs: u64,
    /// How many games to host before exiting. 0 means no limit.
    pub num_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 4444,
            rows: 8,
            cols: 8,
            move_timeout_secs: 60,
            num_sessions: 1,
        }
    }
}

impl ServerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Could not open config file '{}'", path.display()))?;
        let config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Could not parse config file '{}'", path.display()))?;
        Ok(config)
    }

    pub fn move_timeout(&self) -> Option<Duration> {
        (self.move_timeout_secs > 0).then(|| Duration::from_secs(self.move_timeout_secs))
    }
}
