mod channel;
mod config;
mod error;
mod listener;
mod model;
mod session;
pub use channel::*;
pub use config::*;
pub use error::*;
pub use listener::*;
pub use model::*;
pub use session::*;
