//! Role definitions, role pools and role allocation
//!
//! Roles live in a [`RoleCatalog`] arena and are referred to by [`RoleId`].
//! Two roles with the same name are still different roles; identity is the
//! handle, never the name.

mod allocator;
mod catalog;
mod election;

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::rng::GameRng;

pub use allocator::{Allocation, Preference, allocate};
pub use catalog::{RoleCatalog, RoleCatalogBuilder};
pub use election::elect;

/// Handle to a role inside a [`RoleCatalog`]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RoleId(pub(crate) usize);

impl RoleId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "role#{}", self.0)
    }
}

/// A role definition, either concrete or a weighted pool of concrete roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    name: String,
    essential: bool,
    description: String,
    usable_items: Vec<String>,
    kind: RoleKind,
}

/// Concrete role or a pool that resolves to one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleKind {
    Concrete,
    Pool(RolePool),
}

impl Role {
    /// A concrete, non-essential role with no description or items
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            essential: false,
            description: String::new(),
            usable_items: Vec::new(),
            kind: RoleKind::Concrete,
        }
    }

    pub(crate) fn pool(name: impl Into<String>, pool: RolePool) -> Self {
        Self {
            kind: RoleKind::Pool(pool),
            ..Self::new(name)
        }
    }

    /// Mark the role as one that must be filled every game
    pub fn essential(mut self, essential: bool) -> Self {
        self.essential = essential;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append item names this role may use
    pub fn usable_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.usable_items.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_essential(&self) -> bool {
        self.essential
    }

    pub fn describe(&self) -> &str {
        &self.description
    }

    pub fn items(&self) -> &[String] {
        &self.usable_items
    }

    pub fn kind(&self) -> &RoleKind {
        &self.kind
    }

    /// The weighted members if this role is a pool
    pub fn as_pool(&self) -> Option<&RolePool> {
        match &self.kind {
            RoleKind::Pool(pool) => Some(pool),
            RoleKind::Concrete => None,
        }
    }

    pub fn is_pool(&self) -> bool {
        self.as_pool().is_some()
    }

    /// Player-facing summary: name, description, then usable items
    pub fn info(&self) -> String {
        let mut info = String::with_capacity(self.name.len() + self.description.len() + 16);
        info.push_str(&self.name);
        info.push('\n');
        info.push_str(&self.description);
        info.push('\n');
        for item in &self.usable_items {
            info.push_str(item);
            info.push(' ');
        }
        info.push('\n');
        info
    }
}

/// Weighted set of concrete roles
///
/// Weights need not sum to 100. Members keep insertion order, which decides
/// which member owns each bucket of the `1..=total` draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePool {
    members: Vec<(RoleId, u32)>,
}

impl RolePool {
    pub(crate) fn new(members: Vec<(RoleId, u32)>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> impl Iterator<Item = RoleId> + '_ {
        self.members.iter().map(|(id, _)| *id)
    }

    pub fn weight_of(&self, role: RoleId) -> Option<u32> {
        self.members
            .iter()
            .find(|(id, _)| *id == role)
            .map(|(_, weight)| *weight)
    }

    /// Sum of all weights, `None` if it does not fit a `u32`
    pub fn total_weight(&self) -> Option<u32> {
        self.members
            .iter()
            .try_fold(0u32, |sum, (_, weight)| sum.checked_add(*weight))
    }

    /// Member owning draw `roll`, where `base < roll <= base + weight`
    ///
    /// Returns `None` when `roll` is outside `1..=total_weight()`.
    pub fn bucket(&self, roll: u32) -> Option<RoleId> {
        let roll = u64::from(roll);
        let mut base = 0u64;
        for &(id, weight) in &self.members {
            let top = base + u64::from(weight);
            if base < roll && roll <= top {
                return Some(id);
            }
            base = top;
        }
        None
    }

    /// Pick a member with probability proportional to its weight
    ///
    /// `None` for an empty pool or one whose weights overflow.
    pub fn choose(&self, rng: &mut GameRng) -> Option<RoleId> {
        let roll = rng.rnd(self.total_weight()?);
        self.bucket(roll)
    }
}
