//! Usable items
//!
//! An item knows who may use it and what a successful use is worth. What the
//! item actually does is an [`ItemEffect`] supplied by the caller.

use crate::consts::ITEMUSE_DEFAULT_SCORE;
use crate::player::PlayerState;

/// The in-world action behind an item
pub trait ItemEffect {
    /// Run the effect; `true` when the use succeeded
    fn apply(&mut self, item: &Item, user: &PlayerState) -> bool;
}

impl<F> ItemEffect for F
where
    F: FnMut(&Item, &PlayerState) -> bool,
{
    fn apply(&mut self, item: &Item, user: &PlayerState) -> bool {
        self(item, user)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    name: String,
    description: String,
    /// Role names allowed to use the item; empty means everyone
    user_roles: Vec<String>,
    killer_only: bool,
    use_score: i64,
    use_message: String,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            use_message: format!("Used item - {name}"),
            name,
            description: String::new(),
            user_roles: Vec::new(),
            killer_only: false,
            use_score: ITEMUSE_DEFAULT_SCORE,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn user_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.user_roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict the item to the killer; overrides the role list
    pub fn killer_only(mut self, killer_only: bool) -> Self {
        self.killer_only = killer_only;
        self
    }

    pub fn use_score(mut self, score: i64) -> Self {
        self.use_score = score;
        self
    }

    pub fn use_message(mut self, message: impl Into<String>) -> Self {
        self.use_message = message.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn describe(&self) -> &str {
        &self.description
    }

    pub fn roles(&self) -> &[String] {
        &self.user_roles
    }

    pub fn is_killer_only(&self) -> bool {
        self.killer_only
    }

    pub fn score(&self) -> i64 {
        self.use_score
    }

    /// Whether `user` may use this item
    pub fn is_eligible(&self, user: &PlayerState) -> bool {
        if self.killer_only {
            return user.is_killer();
        }
        if self.user_roles.is_empty() {
            return true;
        }
        let role = user.role_name();
        self.user_roles.iter().any(|name| *name == role)
    }

    /// Use the item; awards the use score when `user` is eligible and the
    /// effect succeeds. Returns whether the score was awarded.
    pub fn use_by(&self, user: &PlayerState, effect: &mut dyn ItemEffect) -> bool {
        if !self.is_eligible(user) || !user.is_alive() {
            return false;
        }
        if !effect.apply(self, user) {
            return false;
        }
        user.add_score(self.use_score, &self.use_message);
        true
    }

    /// Player-facing summary: name, description, then who may use it
    pub fn info(&self) -> String {
        let mut info = format!("{}\n{}\nUser: ", self.name, self.description);
        if self.user_roles.is_empty() {
            info.push_str(if self.killer_only { "Killer only" } else { "Everyone" });
        } else {
            for role in &self.user_roles {
                info.push_str(role);
                info.push(' ');
            }
        }
        info.push('\n');
        info
    }

    pub fn investigate() -> Self {
        Item::new("Investigate")
            .description("Investigate the body for clues.")
            .user_roles(["Detective", "Police"])
    }

    pub fn autopsy() -> Self {
        Item::new("Autopsy")
            .description("Performs autopsy on the body for clues.")
            .user_roles(["Doctor", "Student"])
    }

    /// Every stock item
    pub fn standard() -> Vec<Item> {
        vec![Item::investigate(), Item::autopsy()]
    }
}
