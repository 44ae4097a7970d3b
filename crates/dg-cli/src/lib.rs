//! dg-cli: console front end for the detective game
//!
//! Reads the setup-phase votes, prints the vote and result tables, and
//! prints player notifications as they happen.

pub mod display;
pub mod input;

pub use display::{OutputMode, StdoutNotifier, print_catalog, print_report};
pub use input::read_ballots;
