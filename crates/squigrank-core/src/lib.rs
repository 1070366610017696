pub mod config;
pub mod curve;
pub mod engine;
pub mod error;
pub mod export;
pub mod fetch;
pub mod identity;
pub mod model;
pub mod progress;
pub mod schema;
pub mod score;
pub mod storage;
pub mod target;

pub use config::AppConfig;
pub use engine::{Engine, RankReport, SyncReport};
pub use error::Error;
pub use fetch::Fetcher;
pub use progress::{ProgressReporter, SilentReporter};
