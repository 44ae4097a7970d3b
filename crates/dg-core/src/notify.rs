//! Player-facing notifications
//!
//! Score changes, deaths, low sanitation warnings and dry-out messages go
//! through a [`Notifier`] supplied by the presentation layer.

use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

use crate::player::{Player, PlayerId};

/// Sink for messages addressed to a player
pub trait Notifier: Send + Sync {
    fn notify(&self, player: &Player, text: &str);
}

/// Writes notifications to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, player: &Player, text: &str) {
        info!(target: "dg_core::notify", player = %player.name(), id = %player.id(), "{text}");
    }
}

/// A notification captured by [`MemoryNotifier`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub player: PlayerId,
    pub name: String,
    pub text: String,
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    log: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications so far, oldest first
    pub fn messages(&self) -> Vec<Notification> {
        self.log.lock().clone()
    }

    /// Texts sent to one player
    pub fn texts_for(&self, player: PlayerId) -> Vec<String> {
        self.log
            .lock()
            .iter()
            .filter(|n| n.player == player)
            .map(|n| n.text.clone())
            .collect()
    }

    /// Remove and return everything captured
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.log.lock())
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, player: &Player, text: &str) {
        self.log.lock().push(Notification {
            player: player.id(),
            name: player.name().to_string(),
            text: text.to_string(),
        });
    }
}
