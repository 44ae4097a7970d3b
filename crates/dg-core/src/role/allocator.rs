//! Role allocation: one election per catalog entry, then the default role

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AllocationError;
use crate::player::{Player, PlayerId};
use crate::rng::GameRng;

use super::{RoleCatalog, RoleId, elect};

/// What a player asked for before allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Preference {
    /// Any role
    #[default]
    Random,
    /// A specific catalog entry, pool or concrete role
    Role(RoleId),
}

/// Player to concrete role assignment, in preference input order
#[derive(Debug, Clone, Default)]
pub struct Allocation {
    assignments: Vec<(Player, RoleId)>,
}

impl Allocation {
    pub fn iter(&self) -> impl Iterator<Item = (&Player, RoleId)> {
        self.assignments.iter().map(|(player, role)| (player, *role))
    }

    pub fn role_of(&self, id: PlayerId) -> Option<RoleId> {
        self.assignments
            .iter()
            .find(|(player, _)| player.id() == id)
            .map(|(_, role)| *role)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn into_vec(self) -> Vec<(Player, RoleId)> {
        self.assignments
    }
}

/// Assign every player exactly one concrete role
///
/// Entries are processed in catalog order. Each entry elects a player,
/// biased by `multiplier` toward players whose preference is that exact
/// entry. Essential entries re-elect until they land on a free player;
/// other entries are dropped when their pick already has a role, or when
/// taking the pick would leave too few free players for the essential
/// entries still to come. Pools are resolved only once a player is bound.
/// Players left over get `default_role`.
pub fn allocate(
    catalog: &RoleCatalog,
    default_role: RoleId,
    preferences: &[(Player, Preference)],
    multiplier: u32,
    rng: &mut GameRng,
) -> Result<Allocation, AllocationError> {
    let players = preferences.len();
    let essential = catalog.essential_count();
    if players < essential {
        warn!(players, essential, "not enough players for essential roles");
        return Err(AllocationError::NotEnoughPlayers { players, essential });
    }
    validate(catalog, default_role, preferences)?;

    // Elect over indices so the player list is never cloned per entry.
    let ballots: Vec<(usize, Preference)> = preferences
        .iter()
        .enumerate()
        .map(|(idx, (_, pref))| (idx, *pref))
        .collect();
    let multiplier = multiplier.max(1);

    let mut assigned: Vec<Option<RoleId>> = vec![None; players];
    let mut free = players;
    let mut essential_left = essential;

    for &entry in catalog.entries() {
        if free == 0 {
            break;
        }
        let target = Preference::Role(entry);
        let is_essential = catalog.get(entry).is_some_and(|role| role.is_essential());

        let Some(&first) = elect(&target, &ballots, multiplier, rng) else {
            break;
        };
        let mut pick = first;

        if is_essential {
            essential_left -= 1;
            while assigned[pick].is_some() {
                let Some(&again) = elect(&target, &ballots, multiplier, rng) else {
                    break;
                };
                pick = again;
            }
        } else if assigned[pick].is_none() && free <= essential_left {
            debug!(
                entry = catalog.name(entry),
                "dropping entry, remaining players are reserved for essential roles"
            );
            continue;
        }

        if assigned[pick].is_some() {
            debug!(
                entry = catalog.name(entry),
                player = preferences[pick].0.name(),
                "dropping entry, elected player already has a role"
            );
            continue;
        }

        let role = catalog
            .resolve(entry, rng)
            .map_err(|_| AllocationError::UnknownRole(entry))?;
        debug!(
            entry = catalog.name(entry),
            role = catalog.name(role),
            player = preferences[pick].0.name(),
            "assigned role"
        );
        assigned[pick] = Some(role);
        free -= 1;
    }

    let assignments = preferences
        .iter()
        .zip(assigned)
        .map(|((player, _), role)| (player.clone(), role.unwrap_or(default_role)))
        .collect();

    Ok(Allocation { assignments })
}

fn validate(
    catalog: &RoleCatalog,
    default_role: RoleId,
    preferences: &[(Player, Preference)],
) -> Result<(), AllocationError> {
    if !catalog.contains(default_role) {
        return Err(AllocationError::UnknownRole(default_role));
    }
    for (idx, (player, pref)) in preferences.iter().enumerate() {
        if let Preference::Role(role) = pref {
            if !catalog.contains(*role) {
                return Err(AllocationError::UnknownRole(*role));
            }
        }
        if preferences[..idx].iter().any(|(other, _)| other == player) {
            return Err(AllocationError::DuplicatePlayer(player.id()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerRoster;
    use crate::role::Role;

    fn players(roster: &mut PlayerRoster, n: usize) -> Vec<(Player, Preference)> {
        (0..n)
            .map(|i| (roster.join(format!("p{i}")), Preference::Random))
            .collect()
    }

    #[test]
    fn test_not_enough_players() {
        let mut builder = RoleCatalog::builder();
        let a = builder.role(Role::new("A").essential(true));
        let b = builder.role(Role::new("B").essential(true));
        let d = builder.role(Role::new("D"));
        builder.entry(a).entry(b).default_role(d);
        let catalog = builder.build().unwrap();

        let mut roster = PlayerRoster::default();
        let prefs = players(&mut roster, 1);
        let err = allocate(&catalog, d, &prefs, 10, &mut GameRng::new(1)).unwrap_err();
        assert_eq!(err, AllocationError::NotEnoughPlayers { players: 1, essential: 2 });
    }

    #[test]
    fn test_no_players_no_essentials() {
        let catalog = {
            let mut builder = RoleCatalog::builder();
            let x = builder.role(Role::new("X"));
            builder.entry(x).default_role(x);
            builder.build().unwrap()
        };
        let allocation =
            allocate(&catalog, catalog.default_role(), &[], 10, &mut GameRng::new(1)).unwrap();
        assert!(allocation.is_empty());
    }

    #[test]
    fn test_max_multiplier_allocates() {
        let catalog = RoleCatalog::standard();
        let mut roster = PlayerRoster::default();
        let prefs = vec![
            (roster.join("keen"), Preference::Role(catalog.entry(0).unwrap())),
            (roster.join("idle"), Preference::Random),
        ];
        let allocation =
            allocate(&catalog, catalog.default_role(), &prefs, u32::MAX, &mut GameRng::new(6))
                .unwrap();
        assert_eq!(allocation.len(), 2);
        let keen = allocation.role_of(prefs[0].0.id()).unwrap();
        let pool = catalog.get(catalog.entry(0).unwrap()).unwrap().as_pool().unwrap();
        assert!(pool.members().any(|member| member == keen));
    }

    #[test]
    fn test_preferring_player_usually_wins() {
        let catalog = RoleCatalog::standard();
        let investigators = catalog.entry(0).unwrap();
        let pool = catalog.get(investigators).unwrap().as_pool().unwrap().clone();
        let mut wins = 0;
        for seed in 0..200 {
            let mut roster = PlayerRoster::default();
            let mut prefs = players(&mut roster, 5);
            prefs[2].1 = Preference::Role(investigators);
            let allocation =
                allocate(&catalog, catalog.default_role(), &prefs, 10, &mut GameRng::new(seed))
                    .unwrap();
            let role = allocation.role_of(prefs[2].0.id()).unwrap();
            if pool.members().any(|m| m == role) {
                wins += 1;
            }
        }
        // 10 / 14 of the first draw goes to the only matching voter
        assert!(wins > 110, "investigator voter won {wins} of 200");
    }

    #[test]
    fn test_essential_reserved_behind_non_essentials() {
        // Two non-essential entries ahead of one essential entry, two players.
        let mut builder = RoleCatalog::builder();
        let a = builder.role(Role::new("A"));
        let b = builder.role(Role::new("B"));
        let boss = builder.role(Role::new("Boss").essential(true));
        let d = builder.role(Role::new("D"));
        builder.entry(a).entry(b).entry(boss).default_role(d);
        let catalog = builder.build().unwrap();

        for seed in 0..100 {
            let mut roster = PlayerRoster::default();
            let prefs = players(&mut roster, 2);
            let allocation = allocate(&catalog, d, &prefs, 10, &mut GameRng::new(seed)).unwrap();
            assert_eq!(allocation.len(), 2);
            assert_eq!(allocation.iter().filter(|(_, r)| *r == boss).count(), 1);
        }
    }

    #[test]
    fn test_duplicate_player_rejected() {
        let catalog = RoleCatalog::standard();
        let mut roster = PlayerRoster::default();
        let p = roster.join("Gree");
        let prefs = vec![(p.clone(), Preference::Random), (p.clone(), Preference::Random)];
        let err = allocate(&catalog, catalog.default_role(), &prefs, 10, &mut GameRng::new(1))
            .unwrap_err();
        assert_eq!(err, AllocationError::DuplicatePlayer(p.id()));
    }

    #[test]
    fn test_same_name_players_are_distinct() {
        let catalog = RoleCatalog::standard();
        let mut roster = PlayerRoster::default();
        let prefs = vec![
            (roster.join("Kim"), Preference::Random),
            (roster.join("Kim"), Preference::Random),
        ];
        let allocation =
            allocate(&catalog, catalog.default_role(), &prefs, 10, &mut GameRng::new(4)).unwrap();
        assert_eq!(allocation.len(), 2);
    }

    #[test]
    fn test_foreign_role_rejected() {
        let catalog = RoleCatalog::standard();
        let mut roster = PlayerRoster::default();
        let prefs = vec![(roster.join("Kim"), Preference::Role(RoleId(999)))];
        let err = allocate(&catalog, catalog.default_role(), &prefs, 10, &mut GameRng::new(4))
            .unwrap_err();
        assert_eq!(err, AllocationError::UnknownRole(RoleId(999)));
    }
}
