//! # Prana Core Library
//!
//! This library provides the core logic for Prana, a guided breathing
//! coach. It implements a CLI-first philosophy where all operations are
//! available via a standalone CLI binary; any GUI is a thin layer over
//! the same core library.
//!
//! ## Architecture
//!
//! - **Session Engine**: A phase state machine fed by cancellable
//!   one-shot timers; stale timers are rejected by token
//! - **Session Runner**: Async driver that owns the timers and wires
//!   completions into the stats ledger
//! - **Stats Ledger**: Persisted counters, points and badges with
//!   calendar-period rollovers
//! - **Storage**: JSON profile blob and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: Core phase state machine
//! - [`SessionRunner`]: Timer loop around the engine
//! - [`StatsLedger`]: Durable counters and badge awards
//! - [`Config`]: Application configuration management

pub mod content;
pub mod error;
pub mod events;
pub mod reminders;
pub mod session;
pub mod stats;
pub mod storage;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use session::{
    ArmedPhase, Phase, PhasePlan, PhaseToken, ResumeBehavior, SessionCommand, SessionEngine,
    SessionRunner, SessionState,
};
pub use stats::{Badge, MotivationTier, StatsLedger, StatsRecord};
pub use storage::{Config, JsonFileStore, MemoryStore, Profile, ProfileStore};
