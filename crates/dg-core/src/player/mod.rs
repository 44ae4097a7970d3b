//! Player system
//!
//! Identity, per-player state and sanitation.

mod identity;
mod sanitation;
mod state;

pub use identity::{Player, PlayerId, PlayerRoster};
pub use sanitation::{SanitationLevel, clamp_sanitation};
pub use state::{PlayerContext, PlayerSnapshot, PlayerState};
