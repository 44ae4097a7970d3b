//! Player sanitation: levels, clamping and background decay

use std::sync::Weak;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::consts::{LOW_SANITATION_MESSAGE, SANITATION_LEVEL_WIDTH, SANITATION_MAX, SANITATION_MIN};
use crate::rng::GameRng;

use super::state::{PlayerState, Shared};

/// Sanitation bands
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[repr(u8)]
pub enum SanitationLevel {
    /// 0..=24
    Filthy = 0,
    /// 25..=49
    Unclean = 1,
    /// 50..=74
    Mediocre = 2,
    /// 75..=99
    Clean = 3,
}

impl SanitationLevel {
    pub fn from_sanitation(sanitation: u8) -> Self {
        match clamp_sanitation(sanitation.into()) / SANITATION_LEVEL_WIDTH {
            0 => SanitationLevel::Filthy,
            1 => SanitationLevel::Unclean,
            2 => SanitationLevel::Mediocre,
            _ => SanitationLevel::Clean,
        }
    }

    /// Status line text, `None` when nothing is worth showing
    pub const fn status_string(&self) -> Option<&'static str> {
        match self {
            SanitationLevel::Filthy => Some("Filthy"),
            SanitationLevel::Unclean => Some("Unclean"),
            SanitationLevel::Mediocre => None,
            SanitationLevel::Clean => None,
        }
    }
}

/// Clamp any value into the stored sanitation range
pub fn clamp_sanitation(value: i64) -> u8 {
    value.clamp(SANITATION_MIN.into(), SANITATION_MAX.into()) as u8
}

/// Background sanitation decay for one player
///
/// Sleeps a random `1..=max_interval` seconds, then drops sanitation by one.
/// Each tick spent at zero counts down a randomized counter; when it runs out
/// the player loses score and the counter is re-rolled. Runs until the
/// lifecycle token is cancelled or the player state is dropped.
pub(super) async fn decay_loop(state: Weak<Shared>, mut rng: GameRng, lifecycle: CancellationToken) {
    let (max_interval, max_count, penalty) = match state.upgrade() {
        Some(shared) => {
            let settings = &shared.settings;
            (
                u32::try_from(settings.sanitation_drop_interval).unwrap_or(u32::MAX),
                settings.scoredrop_sanitation_count,
                settings.sanitation_scoredrop,
            )
        }
        None => return,
    };
    let mut countdown = i64::from(rng.range_inclusive(0, max_count));

    loop {
        let wait = Duration::from_secs(rng.range_inclusive(1, max_interval).into());
        tokio::select! {
            _ = lifecycle.cancelled() => break,
            _ = tokio::time::sleep(wait) => {}
        }

        let Some(shared) = state.upgrade() else {
            break;
        };
        let player = PlayerState::from_shared(shared);
        if player.decay_once() > 0 {
            continue;
        }

        countdown -= 1;
        if countdown <= 0 {
            countdown = i64::from(rng.range_inclusive(1, max_count));
            player.add_score(penalty, LOW_SANITATION_MESSAGE);
        }
    }
    debug!("sanitation decay stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_levels() {
        assert_eq!(SanitationLevel::from_sanitation(0), SanitationLevel::Filthy);
        assert_eq!(SanitationLevel::from_sanitation(24), SanitationLevel::Filthy);
        assert_eq!(SanitationLevel::from_sanitation(25), SanitationLevel::Unclean);
        assert_eq!(SanitationLevel::from_sanitation(50), SanitationLevel::Mediocre);
        assert_eq!(SanitationLevel::from_sanitation(75), SanitationLevel::Clean);
        assert_eq!(SanitationLevel::from_sanitation(99), SanitationLevel::Clean);
        assert_eq!(SanitationLevel::from_sanitation(200), SanitationLevel::Clean);
    }

    #[test]
    fn test_clamp_edges() {
        assert_eq!(clamp_sanitation(-1), 0);
        assert_eq!(clamp_sanitation(0), 0);
        assert_eq!(clamp_sanitation(99), 99);
        assert_eq!(clamp_sanitation(100), 99);
    }

    proptest! {
        #[test]
        fn clamp_stays_in_range(value in any::<i64>()) {
            let clamped = clamp_sanitation(value);
            prop_assert!(clamped <= SANITATION_MAX);
            if (0..=99).contains(&value) {
                prop_assert_eq!(i64::from(clamped), value);
            }
        }
    }
}
