//! One game from votes to teardown
//!
//! A [`GameSession`] turns setup-phase votes into allocated roles, creates
//! the per-player states, flags one killer and owns the lifecycle token that
//! every background task of the game runs under.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::GameSettings;
use crate::error::AllocationError;
use crate::item::Item;
use crate::notify::Notifier;
use crate::player::{Player, PlayerContext, PlayerId, PlayerSnapshot, PlayerState};
use crate::rng::GameRng;
use crate::role::{Preference, RoleCatalog, allocate};
use crate::vote::{Vote, count_matches};

/// Every killer-flagged player, in input order
pub fn killers(states: &[PlayerState]) -> Vec<&PlayerState> {
    states.iter().filter(|state| state.is_killer()).collect()
}

/// One line of the vote table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteLine {
    pub player: String,
    pub vote: String,
}

/// One line of the result table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultLine {
    pub player: String,
    pub role: String,
}

/// End-of-setup summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameReport {
    pub seed: u64,
    pub votes: Vec<VoteLine>,
    pub results: Vec<ResultLine>,
    pub matches: usize,
    pub killers: Vec<String>,
    pub players: Vec<PlayerSnapshot>,
}

pub struct GameSession {
    catalog: RoleCatalog,
    ctx: PlayerContext,
    seed: u64,
    votes: Vec<(PlayerId, Vote)>,
    states: Vec<PlayerState>,
}

impl GameSession {
    /// Allocate roles for `ballots` and start every player's state
    ///
    /// Must be called inside a Tokio runtime. With at least one player,
    /// exactly one of them is flagged as the killer.
    pub fn start(
        catalog: RoleCatalog,
        settings: GameSettings,
        notifier: Arc<dyn Notifier>,
        ballots: Vec<(Player, Vote)>,
        rng: &mut GameRng,
    ) -> Result<Self, AllocationError> {
        let preferences: Vec<(Player, Preference)> = ballots
            .iter()
            .map(|(player, vote)| (player.clone(), vote.preference(&catalog)))
            .collect();
        let allocation = allocate(
            &catalog,
            catalog.default_role(),
            &preferences,
            settings.election_multiplier,
            rng,
        )?;

        let ctx = PlayerContext::new(Arc::new(settings), notifier);
        let states: Vec<PlayerState> = allocation
            .into_vec()
            .into_iter()
            .map(|(player, role)| {
                PlayerState::spawn(player, role, catalog.name(role), &ctx, rng)
            })
            .collect();

        if !states.is_empty() {
            let len = u32::try_from(states.len()).unwrap_or(u32::MAX);
            let killer = &states[rng.rn2(len) as usize];
            killer.set_killer();
            info!(killer = %killer.name(), "killer chosen");
        }
        info!(players = states.len(), seed = rng.seed(), "session started");

        Ok(Self {
            catalog,
            ctx,
            seed: rng.seed(),
            votes: ballots
                .into_iter()
                .map(|(player, vote)| (player.id(), vote))
                .collect(),
            states,
        })
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &GameSettings {
        &self.ctx.settings
    }

    /// Stock items, scored with this session's item-use score
    pub fn items(&self) -> Vec<Item> {
        Item::standard()
            .into_iter()
            .map(|item| item.use_score(self.ctx.settings.itemuse_default_score))
            .collect()
    }

    pub fn states(&self) -> &[PlayerState] {
        &self.states
    }

    pub fn state(&self, id: PlayerId) -> Option<&PlayerState> {
        self.states.iter().find(|state| state.id() == id)
    }

    pub fn vote_of(&self, id: PlayerId) -> Option<Vote> {
        self.votes
            .iter()
            .find(|(player, _)| *player == id)
            .map(|(_, vote)| *vote)
    }

    pub fn killers(&self) -> Vec<&PlayerState> {
        killers(&self.states)
    }

    /// Votes that got what they asked for
    pub fn matches(&self) -> usize {
        let catalog = &self.catalog;
        count_matches(
            catalog,
            self.votes.iter().zip(&self.states).map(|((_, vote), state)| (vote, state.role())),
        )
    }

    pub fn report(&self) -> GameReport {
        let votes = self
            .votes
            .iter()
            .zip(&self.states)
            .map(|((_, vote), state)| VoteLine {
                player: state.name(),
                vote: vote.label(&self.catalog).to_string(),
            })
            .collect();
        let results = self
            .states
            .iter()
            .map(|state| ResultLine {
                player: state.name(),
                role: state.role_name(),
            })
            .collect();

        GameReport {
            seed: self.seed,
            votes,
            results,
            matches: self.matches(),
            killers: self.killers().iter().map(|state| state.name()).collect(),
            players: self.states.iter().map(PlayerState::snapshot).collect(),
        }
    }

    /// Stop every background task and wait for them to exit
    pub async fn shutdown(self) {
        info!("session shutting down");
        self.ctx.lifecycle.cancel();
        for state in &self.states {
            state.join().await;
        }
    }
}
