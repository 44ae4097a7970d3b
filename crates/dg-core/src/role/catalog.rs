//! Role catalog: the arena of role definitions and the ordered entry list
//!
//! Entry order is allocation priority, so essential entries should go first.

use crate::error::CatalogError;
use crate::rng::GameRng;

use super::{Role, RoleId, RolePool};

/// Immutable registry of role definitions
#[derive(Debug, Clone)]
pub struct RoleCatalog {
    roles: Vec<Role>,
    entries: Vec<RoleId>,
    default_role: RoleId,
}

impl RoleCatalog {
    pub fn builder() -> RoleCatalogBuilder {
        RoleCatalogBuilder::default()
    }

    /// Look up a role definition
    pub fn get(&self, id: RoleId) -> Option<&Role> {
        self.roles.get(id.0)
    }

    /// Role name, or `"?"` for a foreign handle
    pub fn name(&self, id: RoleId) -> &str {
        self.get(id).map_or("?", Role::name)
    }

    /// Entries in allocation priority order
    pub fn entries(&self) -> &[RoleId] {
        &self.entries
    }

    /// Entry at a vote index, if in range
    pub fn entry(&self, index: usize) -> Option<RoleId> {
        self.entries.get(index).copied()
    }

    pub fn default_role(&self) -> RoleId {
        self.default_role
    }

    pub fn contains(&self, id: RoleId) -> bool {
        id.0 < self.roles.len()
    }

    /// Number of essential entries, each of which needs its own player
    pub fn essential_count(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|id| self.get(*id))
            .filter(|role| role.is_essential())
            .count()
    }

    /// Resolve an entry to a concrete role
    ///
    /// Concrete roles resolve to themselves; pools pick a member by weight.
    pub fn resolve(&self, id: RoleId, rng: &mut GameRng) -> Result<RoleId, CatalogError> {
        let role = self.get(id).ok_or(CatalogError::UnknownRole(id))?;
        match role.as_pool() {
            None => Ok(id),
            Some(pool) => pool
                .choose(rng)
                .ok_or_else(|| CatalogError::EmptyPool(role.name().to_string())),
        }
    }

    /// The stock catalog of the detective game
    ///
    /// One essential pool of investigator roles, one pool of soldier roles
    /// and four plain jobs. The default role is a separate Unemployed so it
    /// never shares identity with the catalog entry of the same name.
    pub fn standard() -> Self {
        const FLAVOR: &str = "Interesting description with character's\ndark sides revealed.";

        let mut builder = Self::builder();

        let detective = builder.role(
            Role::new("Detective")
                .description(FLAVOR)
                .usable_items(["Investigate"]),
        );
        let police = builder.role(
            Role::new("Police")
                .description(FLAVOR)
                .usable_items(["Investigate", "Body Check"]),
        );
        let doctor = builder.role(
            Role::new("Doctor")
                .description(
                    "You are an experienced doctor who\n\
                     went on a vacation to remedy a trauma\n\
                     from a recent medical malpractice",
                )
                .usable_items(["Autopsy", "Luminol Solution"]),
        );
        let student = builder.role(
            Role::new("Student")
                .description(FLAVOR)
                .usable_items(["Autopsy"]),
        );
        let serviceman = builder.role(
            Role::new("Serviceman")
                .description(format!("{FLAVOR}\nKills the killer if attacked.")),
        );
        let delta_force = builder.role(Role::new("DeltaForce").description(format!(
            "{FLAVOR}\nKills the killer if attacked.\nYou appear to be unemployed in Internet."
        )));
        let unemployed_flavor =
            format!("{FLAVOR}\nGets bonus points for every score gained.");

        let investigators = builder.pool(
            "Detective roles",
            true,
            vec![(detective, 25), (police, 25), (doctor, 25), (student, 25)],
        );
        let soldiers = builder.pool("Soldier roles", false, vec![(serviceman, 75), (delta_force, 25)]);
        let engineer = builder.role(
            Role::new("Engineer")
                .description(FLAVOR)
                .usable_items(["CCTV", "Ice"]),
        );
        let clerk = builder.role(
            Role::new("Clerk")
                .description(FLAVOR)
                .usable_items(["Googling"]),
        );
        let chef = builder.role(
            Role::new("Chef")
                .description(FLAVOR)
                .usable_items(["Chef's Kitchen Knife"]),
        );
        let unemployed = builder.role(
            Role::new("Unemployed")
                .description(unemployed_flavor.clone())
                .usable_items(["Body Check"]),
        );
        let fallback = builder.role(
            Role::new("Unemployed")
                .description(unemployed_flavor)
                .usable_items(["Body Check"]),
        );

        for entry in [investigators, soldiers, engineer, clerk, chef, unemployed] {
            builder.entry(entry);
        }
        builder.default_role(fallback);

        match builder.build() {
            Ok(catalog) => catalog,
            // Every handle above comes from this builder and every pool is valid.
            Err(err) => unreachable!("standard catalog is malformed: {err}"),
        }
    }
}

/// Incremental catalog construction
///
/// `role` and `pool` only register definitions; `entry` appends a definition
/// to the allocation order.
#[derive(Debug, Default)]
pub struct RoleCatalogBuilder {
    roles: Vec<Role>,
    entries: Vec<RoleId>,
    default_role: Option<RoleId>,
}

impl RoleCatalogBuilder {
    /// Register a concrete role definition
    pub fn role(&mut self, role: Role) -> RoleId {
        let id = RoleId(self.roles.len());
        self.roles.push(role);
        id
    }

    /// Register a weighted pool of previously registered roles
    pub fn pool(
        &mut self,
        name: impl Into<String>,
        essential: bool,
        members: Vec<(RoleId, u32)>,
    ) -> RoleId {
        self.role(Role::pool(name, RolePool::new(members)).essential(essential))
    }

    /// Append a registered role to the allocation order
    pub fn entry(&mut self, id: RoleId) -> &mut Self {
        self.entries.push(id);
        self
    }

    /// Role given to players no entry was allocated to
    pub fn default_role(&mut self, id: RoleId) -> &mut Self {
        self.default_role = Some(id);
        self
    }

    pub fn build(self) -> Result<RoleCatalog, CatalogError> {
        let known = |id: RoleId| id.0 < self.roles.len();

        for role in &self.roles {
            let Some(pool) = role.as_pool() else {
                continue;
            };
            if pool.members.is_empty() {
                return Err(CatalogError::EmptyPool(role.name().to_string()));
            }
            for &(member, weight) in &pool.members {
                let Some(member_role) = self.roles.get(member.0) else {
                    return Err(CatalogError::UnknownRole(member));
                };
                if member_role.is_pool() {
                    return Err(CatalogError::NestedPool {
                        pool: role.name().to_string(),
                        member: member_role.name().to_string(),
                    });
                }
                if weight == 0 {
                    return Err(CatalogError::ZeroWeight {
                        pool: role.name().to_string(),
                        member: member_role.name().to_string(),
                    });
                }
            }
            if pool.total_weight().is_none() {
                return Err(CatalogError::WeightOverflow(role.name().to_string()));
            }
        }

        if let Some(unknown) = self.entries.iter().copied().find(|id| !known(*id)) {
            return Err(CatalogError::UnknownRole(unknown));
        }

        let default_role = self.default_role.ok_or(CatalogError::MissingDefaultRole)?;
        match self.roles.get(default_role.0) {
            None => return Err(CatalogError::UnknownRole(default_role)),
            Some(role) if role.is_pool() => {
                return Err(CatalogError::PoolAsDefault(role.name().to_string()));
            }
            Some(_) => {}
        }

        Ok(RoleCatalog {
            roles: self.roles,
            entries: self.entries,
            default_role,
        })
    }
}
