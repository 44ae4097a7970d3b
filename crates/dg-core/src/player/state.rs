//! Per-player game state
//!
//! A [`PlayerState`] is a cheap handle; clones share the same player. All
//! field changes go through the methods below under one per-player lock.
//! Timed effects (drying, invisibility) and the sanitation decay run as
//! Tokio tasks that hold only weak references back to the state, so
//! dropping the last handle stops them.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::GameSettings;
use crate::consts::SANITATION_MAX;
use crate::error::{GameError, GameResult};
use crate::notify::Notifier;
use crate::rng::GameRng;
use crate::role::RoleId;
use crate::timer::DelayedTimer;

use super::identity::{Player, PlayerId};
use super::sanitation::{SanitationLevel, clamp_sanitation, decay_loop};

/// Everything a player state needs from its session
#[derive(Clone)]
pub struct PlayerContext {
    pub settings: Arc<GameSettings>,
    pub notifier: Arc<dyn Notifier>,
    /// Parent token; each player runs under a child of it
    pub lifecycle: CancellationToken,
}

impl PlayerContext {
    pub fn new(settings: Arc<GameSettings>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            settings,
            notifier,
            lifecycle: CancellationToken::new(),
        }
    }
}

/// Point-in-time copy of a player's fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub role: RoleId,
    pub role_name: String,
    pub alive: bool,
    pub is_killer: bool,
    pub score: i64,
    pub sanitation: u8,
    pub soaked: bool,
    pub invisible: bool,
    pub bloody: bool,
    pub bloody_once: bool,
}

#[derive(Debug)]
struct Fields {
    player: Player,
    role: RoleId,
    role_name: String,
    alive: bool,
    is_killer: bool,
    score: i64,
    sanitation: u8,
    soaked: bool,
    invisible: bool,
    bloody: bool,
    // Latched by set_bloody; nothing clears it.
    bloody_once: bool,
    // Bumped on every set_invisible; only the newest timer may clear the flag.
    invisible_generation: u64,
}

#[derive(Debug, Default)]
struct Timers {
    dry: Option<DelayedTimer>,
    invisible: Option<DelayedTimer>,
}

pub(super) struct Shared {
    fields: Mutex<Fields>,
    // Lock order: timers before fields.
    timers: Mutex<Timers>,
    decay: Mutex<Option<JoinHandle<()>>>,
    pub(super) settings: Arc<GameSettings>,
    notifier: Arc<dyn Notifier>,
    lifecycle: CancellationToken,
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.lifecycle.cancel();
    }
}

/// Handle to one player's mutable state
#[derive(Clone)]
pub struct PlayerState {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerState")
            .field("fields", &*self.shared.fields.lock())
            .finish()
    }
}

impl PlayerState {
    /// Create the state for a freshly allocated player and start its decay
    ///
    /// Must be called inside a Tokio runtime. Initial sanitation is drawn
    /// from `settings.sanitation_lowest_initvalue..=99`; the decay task gets
    /// its own generator forked from `rng`.
    pub fn spawn(
        player: Player,
        role: RoleId,
        role_name: impl Into<String>,
        ctx: &PlayerContext,
        rng: &mut GameRng,
    ) -> Self {
        let sanitation = clamp_sanitation(
            rng.range_inclusive(
                ctx.settings.sanitation_lowest_initvalue.into(),
                SANITATION_MAX.into(),
            )
            .into(),
        );
        let lifecycle = ctx.lifecycle.child_token();

        let shared = Arc::new(Shared {
            fields: Mutex::new(Fields {
                player,
                role,
                role_name: role_name.into(),
                alive: true,
                is_killer: false,
                score: 0,
                sanitation,
                soaked: false,
                invisible: false,
                bloody: false,
                bloody_once: false,
                invisible_generation: 0,
            }),
            timers: Mutex::new(Timers::default()),
            decay: Mutex::new(None),
            settings: ctx.settings.clone(),
            notifier: ctx.notifier.clone(),
            lifecycle: lifecycle.clone(),
        });

        let handle = tokio::spawn(decay_loop(Arc::downgrade(&shared), rng.fork(), lifecycle));
        *shared.decay.lock() = Some(handle);

        Self { shared }
    }

    pub(super) fn from_shared(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    fn downgrade(&self) -> Weak<Shared> {
        Arc::downgrade(&self.shared)
    }

    pub fn player(&self) -> Player {
        self.shared.fields.lock().player.clone()
    }

    pub fn id(&self) -> PlayerId {
        self.shared.fields.lock().player.id()
    }

    pub fn name(&self) -> String {
        self.shared.fields.lock().player.name().to_string()
    }

    pub fn rename(&self, name: impl Into<String>) {
        self.shared.fields.lock().player.set_name(name);
    }

    pub fn role(&self) -> RoleId {
        self.shared.fields.lock().role
    }

    pub fn role_name(&self) -> String {
        self.shared.fields.lock().role_name.clone()
    }

    pub fn is_alive(&self) -> bool {
        self.shared.fields.lock().alive
    }

    pub fn is_killer(&self) -> bool {
        self.shared.fields.lock().is_killer
    }

    pub fn score(&self) -> i64 {
        self.shared.fields.lock().score
    }

    pub fn sanitation(&self) -> u8 {
        self.shared.fields.lock().sanitation
    }

    pub fn sanitation_level(&self) -> SanitationLevel {
        SanitationLevel::from_sanitation(self.sanitation())
    }

    pub fn is_soaked(&self) -> bool {
        self.shared.fields.lock().soaked
    }

    pub fn is_invisible(&self) -> bool {
        self.shared.fields.lock().invisible
    }

    pub fn is_bloody(&self) -> bool {
        self.shared.fields.lock().bloody
    }

    pub fn is_bloody_once(&self) -> bool {
        self.shared.fields.lock().bloody_once
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        let f = self.shared.fields.lock();
        PlayerSnapshot {
            id: f.player.id(),
            name: f.player.name().to_string(),
            role: f.role,
            role_name: f.role_name.clone(),
            alive: f.alive,
            is_killer: f.is_killer,
            score: f.score,
            sanitation: f.sanitation,
            soaked: f.soaked,
            invisible: f.invisible,
            bloody: f.bloody,
            bloody_once: f.bloody_once,
        }
    }

    fn notify(&self, player: &Player, text: &str) {
        self.shared.notifier.notify(player, text);
    }

    /// Kill the player
    ///
    /// Fails without touching the state if the player is already dead.
    pub fn kill(&self) -> GameResult<()> {
        let player = {
            let mut f = self.shared.fields.lock();
            if !f.alive {
                return Err(GameError::PlayerAlreadyDead {
                    id: f.player.id(),
                    name: f.player.name().to_string(),
                });
            }
            f.alive = false;
            f.player.clone()
        };
        info!(player = %player.name(), "player killed");
        self.notify(&player, &format!("{}'s been killed.", player.name()));
        Ok(())
    }

    /// Flag the player as the killer
    ///
    /// Nothing here stops a second killer; the session picks exactly one.
    pub fn set_killer(&self) {
        self.shared.fields.lock().is_killer = true;
    }

    /// Add `delta` to the score and tell the player
    ///
    /// A zero delta does nothing and sends nothing.
    pub fn add_score(&self, delta: i64, message: &str) {
        if delta == 0 {
            return;
        }
        let player = {
            let mut f = self.shared.fields.lock();
            f.score = f.score.saturating_add(delta);
            f.player.clone()
        };
        let mut text = format!("(To {}) {:+}pts", player.name(), delta);
        if !message.is_empty() {
            text.push_str(": ");
            text.push_str(message);
        }
        self.notify(&player, &text);
    }

    /// Store `value` clamped into `0..=99`
    pub fn set_sanitation(&self, value: i64) {
        self.shared.fields.lock().sanitation = clamp_sanitation(value);
    }

    fn adjust_sanitation(f: &mut Fields, delta: i32) {
        f.sanitation = clamp_sanitation(i64::from(f.sanitation) + i64::from(delta));
    }

    /// One decay step; returns the new sanitation
    pub(super) fn decay_once(&self) -> u8 {
        let mut f = self.shared.fields.lock();
        Self::adjust_sanitation(&mut f, -1);
        f.sanitation
    }

    /// Soak the player and (re)start the drying countdown
    ///
    /// Only the first soak costs sanitation; soaking again while wet just
    /// restarts the countdown.
    pub fn soak(&self) {
        {
            let mut f = self.shared.fields.lock();
            if !f.soaked {
                f.soaked = true;
                Self::adjust_sanitation(&mut f, self.shared.settings.sanitation_drop_soak);
            }
        }

        let weak = self.downgrade();
        let mut timers = self.shared.timers.lock();
        if let Some(old) = timers.dry.take() {
            old.cancel();
        }
        timers.dry = Some(DelayedTimer::start_scoped(
            self.shared.settings.drying_duration(),
            1,
            Some(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    PlayerState::from_shared(shared).set_dry();
                }
            })),
            None,
            self.shared.lifecycle.clone(),
        ));
        debug!(secs = self.shared.settings.drying_time, "drying timer armed");
    }

    fn set_dry(&self) {
        let player = {
            let mut f = self.shared.fields.lock();
            f.soaked = false;
            f.player.clone()
        };
        self.notify(&player, &format!("{} is now fully dried", player.name()));
    }

    /// Wash off blood, get soaked, and end up at full sanitation
    ///
    /// `bloody_once` stays set.
    pub fn wash(&self) {
        self.shared.fields.lock().bloody = false;
        self.soak();
        self.set_sanitation(SANITATION_MAX.into());
    }

    /// Cover the player in blood
    ///
    /// The first call costs sanitation and latches `bloody_once`; further
    /// calls while still bloody do nothing.
    pub fn set_bloody(&self) {
        let mut f = self.shared.fields.lock();
        if !f.bloody {
            f.bloody = true;
            f.bloody_once = true;
            Self::adjust_sanitation(&mut f, self.shared.settings.sanitation_drop_bloody);
        }
    }

    /// Make the player invisible for `seconds`, plus whatever is left of
    /// an invisibility already running
    pub fn set_invisible(&self, seconds: u32) {
        let mut timers = self.shared.timers.lock();
        let carried = match timers.invisible.take() {
            Some(old) => {
                let left = old.remaining_repeats().unwrap_or(0);
                old.cancel();
                left
            }
            None => 0,
        };
        let generation = {
            let mut f = self.shared.fields.lock();
            f.invisible = true;
            f.invisible_generation += 1;
            f.invisible_generation
        };

        let total = seconds.saturating_add(carried);
        let on_tick = self.downgrade();
        let on_done = self.downgrade();
        timers.invisible = Some(DelayedTimer::start_scoped(
            Duration::from_secs(1),
            total,
            Some(Box::new(move || {
                if let Some(shared) = on_tick.upgrade() {
                    let mut f = shared.fields.lock();
                    if f.invisible_generation == generation {
                        f.invisible = true;
                    }
                }
            })),
            Some(Box::new(move || {
                if let Some(shared) = on_done.upgrade() {
                    end_invisibility(&shared, generation);
                }
            })),
            self.shared.lifecycle.clone(),
        ));
        debug!(seconds, carried, total, "invisibility timer armed");
    }

    /// Seconds of invisibility still queued, 0 when none is running
    pub fn invisible_remaining(&self) -> u32 {
        self.shared
            .timers
            .lock()
            .invisible
            .as_ref()
            .and_then(|timer| timer.remaining_repeats().ok())
            .unwrap_or(0)
    }

    /// Ask every background task of this player to stop
    pub fn shutdown(&self) {
        self.shared.lifecycle.cancel();
    }

    /// Wait for the decay task to exit; call after [`PlayerState::shutdown`]
    pub async fn join(&self) {
        let handle = self.shared.decay.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        let timers = std::mem::take(&mut *self.shared.timers.lock());
        for timer in [timers.dry, timers.invisible].into_iter().flatten() {
            timer.join().await;
        }
    }
}

/// Clear the invisible flag unless a newer invisibility has been armed
fn end_invisibility(shared: &Shared, generation: u64) {
    let mut f = shared.fields.lock();
    if f.invisible_generation == generation {
        f.invisible = false;
    }
}
