use std::collections::HashSet;

use dg_core::role::{RoleCatalog, allocate};
use dg_core::{AllocationError, GameRng, Player, PlayerRoster, Preference, Role, RoleId, Vote};
use proptest::prelude::*;

/// [EssentialA pool {X:25, Y:75}, NonEssentialB], default Unemployed
fn scenario_catalog() -> (RoleCatalog, RoleId, RoleId, RoleId, RoleId) {
    let mut builder = RoleCatalog::builder();
    let x = builder.role(Role::new("X"));
    let y = builder.role(Role::new("Y"));
    let a = builder.pool("EssentialA", true, vec![(x, 25), (y, 75)]);
    let b = builder.role(Role::new("NonEssentialB"));
    let unemployed = builder.role(Role::new("Unemployed"));
    builder.entry(a).entry(b).default_role(unemployed);
    (builder.build().unwrap(), x, y, b, unemployed)
}

fn two_essentials() -> RoleCatalog {
    let mut builder = RoleCatalog::builder();
    let boss = builder.role(Role::new("Boss").essential(true));
    let medic = builder.role(Role::new("Medic"));
    let nurse = builder.role(Role::new("Nurse"));
    let care = builder.pool("Care", true, vec![(medic, 1), (nurse, 3)]);
    let cook = builder.role(Role::new("Cook"));
    let idle = builder.role(Role::new("Idle"));
    builder.entry(cook).entry(boss).entry(care).default_role(idle);
    builder.build().unwrap()
}

#[test]
fn test_scenario_pool_and_leftovers() {
    let (catalog, x, y, b, unemployed) = scenario_catalog();

    for seed in 0..200 {
        let mut roster = PlayerRoster::default();
        let prefs = vec![
            (roster.join("player1"), Preference::Role(x)),
            (roster.join("player2"), Preference::Random),
            (roster.join("player3"), Preference::Random),
        ];
        let allocation =
            allocate(&catalog, unemployed, &prefs, 10, &mut GameRng::new(seed)).unwrap();
        assert_eq!(allocation.len(), 3);

        let roles: Vec<RoleId> = allocation.iter().map(|(_, role)| role).collect();
        let pool_filled = roles.iter().filter(|r| **r == x || **r == y).count();
        assert_eq!(pool_filled, 1, "seed {seed}: {roles:?}");
        assert!(roles.iter().filter(|r| **r == b).count() <= 1);
        assert!(roles.iter().all(|r| [x, y, b, unemployed].contains(r)));
    }
}

#[test]
fn test_standard_catalog_with_votes() {
    let catalog = RoleCatalog::standard();
    let mut roster = PlayerRoster::default();
    let prefs: Vec<(Player, Preference)> = ["0", "1", "2", "3", "4", "5", "abc", "17"]
        .iter()
        .map(|text| {
            let vote = Vote::parse(text, &catalog);
            (roster.join(format!("voter {text}")), vote.preference(&catalog))
        })
        .collect();

    let allocation = allocate(
        &catalog,
        catalog.default_role(),
        &prefs,
        10,
        &mut GameRng::new(420),
    )
    .unwrap();

    let investigators: Vec<&str> = ["Detective", "Police", "Doctor", "Student"].to_vec();
    let filled = allocation
        .iter()
        .filter(|(_, role)| investigators.contains(&catalog.name(*role)))
        .count();
    assert_eq!(filled, 1);
    assert!(allocation.iter().all(|(_, role)| !catalog.get(role).unwrap().is_pool()));
}

#[test]
fn test_essential_count_is_checked_first() {
    let catalog = two_essentials();
    let mut roster = PlayerRoster::default();
    let prefs = vec![(roster.join("solo"), Preference::Random)];
    let err = allocate(&catalog, catalog.default_role(), &prefs, 10, &mut GameRng::new(0))
        .unwrap_err();
    assert_eq!(err, AllocationError::NotEnoughPlayers { players: 1, essential: 2 });
}

#[test]
fn test_exactly_essential_players_fill_essentials() {
    let catalog = two_essentials();
    for seed in 0..100 {
        let mut roster = PlayerRoster::default();
        let prefs = vec![
            (roster.join("a"), Preference::Random),
            (roster.join("b"), Preference::Random),
        ];
        let allocation =
            allocate(&catalog, catalog.default_role(), &prefs, 10, &mut GameRng::new(seed))
                .unwrap();
        let mut names: Vec<&str> = allocation.iter().map(|(_, r)| catalog.name(r)).collect();
        names.sort_unstable();
        assert!(
            names == ["Boss", "Medic"] || names == ["Boss", "Nurse"],
            "seed {seed}: {names:?}"
        );
    }
}

proptest! {
    #[test]
    fn allocation_is_total_and_fills_essentials(
        votes in prop::collection::vec(prop::option::of(0usize..3), 2..12),
        seed in any::<u64>(),
    ) {
        let catalog = two_essentials();
        let mut roster = PlayerRoster::default();
        let prefs: Vec<(Player, Preference)> = votes
            .iter()
            .enumerate()
            .map(|(i, vote)| {
                let pref = vote
                    .and_then(|idx| catalog.entry(idx))
                    .map_or(Preference::Random, Preference::Role);
                (roster.join(format!("p{i}")), pref)
            })
            .collect();

        let allocation = allocate(
            &catalog,
            catalog.default_role(),
            &prefs,
            10,
            &mut GameRng::new(seed),
        )
        .unwrap();

        prop_assert_eq!(allocation.len(), prefs.len());
        let ids: HashSet<_> = allocation.iter().map(|(p, _)| p.id()).collect();
        prop_assert_eq!(ids.len(), prefs.len());
        for (player, _) in &prefs {
            prop_assert!(allocation.role_of(player.id()).is_some());
        }

        let names: Vec<&str> = allocation.iter().map(|(_, r)| catalog.name(r)).collect();
        prop_assert_eq!(names.iter().filter(|n| **n == "Boss").count(), 1);
        prop_assert_eq!(
            names.iter().filter(|n| **n == "Medic" || **n == "Nurse").count(),
            1
        );
        prop_assert!(names.iter().filter(|n| **n == "Cook").count() <= 1);
    }
}
