// WealthScan - Core Library
// Exposes all modules for use in the CLI and tests

pub mod profile;
pub mod scoring;
pub mod ranking;
pub mod store;
pub mod insights;
pub mod session;
pub mod config;
pub mod console;

// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use profile::{parse_amount, AmountField, InputError, Profile, ProfileDraft};
pub use scoring::{score, ScoreWeights, WeightError};
pub use ranking::{rank, RankedProfile, Tier};
pub use store::{Corruption, LoadReport, ProfileStore, StoreError};
pub use insights::{Advice, Breakdown, BreakdownBar, Diagnosis, Medal, Phase, Progression};
pub use session::{
    Leaderboard, LeaderboardEntry, MenuState, ScanResult, Session, SessionError,
    DEFAULT_LEADERBOARD_SIZE,
};
pub use config::{Config, ConfigError, DEFAULT_CONFIG_FILE};
pub use console::Console;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
