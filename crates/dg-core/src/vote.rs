//! Setup-phase role votes
//!
//! Players vote by catalog entry index. Anything that is not a valid index
//! counts as a vote for a random role; bad input is never an error.

use serde::{Deserialize, Serialize};

use crate::consts::RANDOM_VOTE;
use crate::role::{Preference, RoleCatalog, RoleId};

/// A player's vote, already checked against the catalog it was cast for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Vote {
    #[default]
    Random,
    /// Index into [`RoleCatalog::entries`]
    Entry(usize),
}

impl Vote {
    /// Read a vote as typed by a player
    ///
    /// Non-numeric text, [`RANDOM_VOTE`] and out-of-range indices all become
    /// [`Vote::Random`].
    pub fn parse(text: &str, catalog: &RoleCatalog) -> Self {
        match text.trim().parse::<i64>() {
            Ok(index) => Self::from_index(index, catalog),
            Err(_) => Vote::Random,
        }
    }

    pub fn from_index(index: i64, catalog: &RoleCatalog) -> Self {
        if index == RANDOM_VOTE {
            return Vote::Random;
        }
        match usize::try_from(index) {
            Ok(index) if index < catalog.entries().len() => Vote::Entry(index),
            _ => Vote::Random,
        }
    }

    /// The catalog entry voted for
    pub fn entry(&self, catalog: &RoleCatalog) -> Option<RoleId> {
        match *self {
            Vote::Random => None,
            Vote::Entry(index) => catalog.entry(index),
        }
    }

    pub fn preference(&self, catalog: &RoleCatalog) -> Preference {
        self.entry(catalog).map_or(Preference::Random, Preference::Role)
    }

    /// Label for the vote table
    pub fn label<'a>(&self, catalog: &'a RoleCatalog) -> &'a str {
        match self.entry(catalog) {
            Some(entry) => catalog.name(entry),
            None => "Random roles",
        }
    }

    /// Whether the player got what they voted for
    ///
    /// Random always matches. Otherwise the assigned role must be the entry
    /// itself, or, for a pool, share a name with one of its members.
    pub fn matches(&self, catalog: &RoleCatalog, assigned: RoleId) -> bool {
        let Some(entry) = self.entry(catalog) else {
            return true;
        };
        if entry == assigned {
            return true;
        }
        let assigned_name = catalog.name(assigned);
        catalog
            .get(entry)
            .and_then(|role| role.as_pool())
            .is_some_and(|pool| pool.members().any(|member| catalog.name(member) == assigned_name))
    }
}

/// Number of votes in `results` that [`Vote::matches`] the assigned role
pub fn count_matches<'a, I>(catalog: &RoleCatalog, results: I) -> usize
where
    I: IntoIterator<Item = (&'a Vote, RoleId)>,
{
    results
        .into_iter()
        .filter(|(vote, role)| vote.matches(catalog, *role))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::GameRng;

    #[test]
    fn test_parse_coerces_to_random() {
        let catalog = RoleCatalog::standard();
        assert_eq!(Vote::parse("0", &catalog), Vote::Entry(0));
        assert_eq!(Vote::parse(" 5 ", &catalog), Vote::Entry(5));
        assert_eq!(Vote::parse("6", &catalog), Vote::Random);
        assert_eq!(Vote::parse("-1", &catalog), Vote::Random);
        assert_eq!(Vote::parse("-7", &catalog), Vote::Random);
        assert_eq!(Vote::parse("chef", &catalog), Vote::Random);
        assert_eq!(Vote::parse("", &catalog), Vote::Random);
        assert_eq!(Vote::parse("99999999999999999999", &catalog), Vote::Random);
    }

    #[test]
    fn test_labels() {
        let catalog = RoleCatalog::standard();
        assert_eq!(Vote::Random.label(&catalog), "Random roles");
        assert_eq!(Vote::Entry(0).label(&catalog), "Detective roles");
        assert_eq!(Vote::Entry(4).label(&catalog), "Chef");
    }

    #[test]
    fn test_matches_concrete_and_pool() {
        let catalog = RoleCatalog::standard();
        let chef = catalog.entry(4).unwrap();
        let clerk = catalog.entry(3).unwrap();
        assert!(Vote::Entry(4).matches(&catalog, chef));
        assert!(!Vote::Entry(4).matches(&catalog, clerk));
        assert!(Vote::Random.matches(&catalog, clerk));

        let pool = catalog.entry(0).unwrap();
        let mut rng = GameRng::new(3);
        let detective_like = catalog.resolve(pool, &mut rng).unwrap();
        assert!(Vote::Entry(0).matches(&catalog, detective_like));
        assert!(!Vote::Entry(1).matches(&catalog, detective_like));
    }

    #[test]
    fn test_default_unemployed_matches_by_identity_only() {
        let catalog = RoleCatalog::standard();
        // Entry 5 is the catalog's Unemployed, a concrete role: identity only.
        assert!(!Vote::Entry(5).matches(&catalog, catalog.default_role()));
        assert!(Vote::Entry(5).matches(&catalog, catalog.entry(5).unwrap()));
    }

    #[test]
    fn test_count_matches() {
        let catalog = RoleCatalog::standard();
        let chef = catalog.entry(4).unwrap();
        let votes = [Vote::Random, Vote::Entry(4), Vote::Entry(3)];
        let roles = [chef, chef, chef];
        assert_eq!(count_matches(&catalog, votes.iter().zip(roles)), 2);
    }

    #[test]
    fn test_preference() {
        let catalog = RoleCatalog::standard();
        assert_eq!(Vote::Random.preference(&catalog), Preference::Random);
        assert_eq!(
            Vote::Entry(2).preference(&catalog),
            Preference::Role(catalog.entry(2).unwrap())
        );
    }
}
