//! dg-core: role allocation and player state for the detective game
//!
//! Roles are elected from a [`RoleCatalog`] according to player votes, then
//! each player gets a [`PlayerState`] whose sanitation decays and whose timed
//! effects (drying, invisibility) run on the Tokio runtime.
//!
//! Logging goes through `tracing`; installing a subscriber is left to the
//! binary.

pub mod config;
pub mod consts;
pub mod error;
pub mod item;
pub mod notify;
pub mod player;
pub mod rng;
pub mod role;
pub mod session;
pub mod timer;
pub mod vote;

pub use config::GameSettings;
pub use error::{AllocationError, CatalogError, GameError, GameResult, SettingsError};
pub use item::{Item, ItemEffect};
pub use notify::{MemoryNotifier, Notifier, TracingNotifier};
pub use player::{Player, PlayerContext, PlayerId, PlayerRoster, PlayerState, SanitationLevel};
pub use rng::GameRng;
pub use role::{Allocation, Preference, Role, RoleCatalog, RoleId, allocate, elect};
pub use session::{GameReport, GameSession, killers};
pub use timer::DelayedTimer;
pub use vote::Vote;
