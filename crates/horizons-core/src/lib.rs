//! horizons-core library.
//!
//! A seven-level calendar hierarchy (thirty-year plan down to single days)
//! and the engine that keeps planned items consistent while they are split
//! across it.
//!
//! - [`period`] and [`calendar`]: period ids, the level ladder, and pure
//!   navigation between periods.
//! - [`model`] and [`store`]: canonical items, period views that cache
//!   copies of them, and the resync that keeps both in step.
//! - [`engine`]: the [`Planner`] mutation and query API.
//! - [`snapshot`] and [`lock`]: persistence collaborator and file locking
//!   for the CLI.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types where appropriate;
//!   module-level failures carry `thiserror` enums.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod ids;
pub mod lock;
pub mod model;
pub mod period;
pub mod routine;
pub mod snapshot;
pub mod store;

pub use config::PlannerConfig;
pub use engine::{Assignment, CompletionChange, Planner};
pub use model::{Item, ItemId, ItemKind, NewItem, Period, Placement, TimeSlot};
pub use period::{Direction, Level, Navigator, PeriodId, PeriodKey};
pub use snapshot::{JsonFileStore, Snapshot, SnapshotStore};
