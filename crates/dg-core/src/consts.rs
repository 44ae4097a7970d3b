//! Core game constants
//!
//! These are the stock values of the prototype's game settings. Runtime code
//! reads them through [`crate::GameSettings`], which uses them as defaults.

/// Sentinel vote index meaning "any role"
pub const RANDOM_VOTE: i64 = -1;

/// Sanitation bounds
pub const SANITATION_MIN: u8 = 0;
pub const SANITATION_MAX: u8 = 99;

/// Width of each sanitation level band
pub const SANITATION_LEVEL_WIDTH: u8 = 25;

/// Initial sanitation is drawn from this value up to SANITATION_MAX
pub const SANITATION_LOWEST_INITVALUE: u8 = 50;

/// Upper bound (seconds) of the randomized sanitation decay interval
pub const SANITATION_DROP_INTERVAL: u64 = 10;

/// Sanitation deltas
pub const SANITATIONDROP_BLOODY: i32 = -50;
pub const SANITATIONDROP_SOAK: i32 = -20;

/// Upper bound of the ticks-at-zero countdown before a score penalty
pub const SCOREDROP_SANITATION_COUNT: u32 = 5;

/// Seconds until a soaked player is dry again
pub const DRYING_TIME: u64 = 30;

/// Score applied each time the ticks-at-zero countdown runs out
pub const SANITATION_SCOREDROP: i64 = -3;

/// Default score for a successful item use
pub const ITEMUSE_DEFAULT_SCORE: i64 = 5;

/// Default preference multiplier for role elections (about 70% for one
/// matching voter among five)
pub const ELECTION_MULTIPLIER: u32 = 10;

/// Largest election multiplier a settings file may ask for
pub const ELECTION_MULTIPLIER_MAX: u32 = 10_000;

/// Warning sent with the low sanitation score penalty
pub const LOW_SANITATION_MESSAGE: &str = "Low sanitation. Use a water tap nearby.";
