use serde::{Deserialize, Serialize};
use std::fmt;

/// A game (category) on the platform.
///
/// `id` is what stream lookups are keyed by; `name` is only used for display
/// and for naming the output directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Game {
    pub id: String,
    pub name: String,
}

impl Game {
    pub fn new<S1: Into<String>, S2: Into<String>>(id: S1, name: S2) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
