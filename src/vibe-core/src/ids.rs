use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to every catalog entity (song, album, artist,
/// playlist, song list, plugin, page).
///
/// Ids are unique within a running process and are never reused. They are
/// normally handed out by [`Vibe::generate_id`](crate::Vibe::generate_id) at
/// construction time; a plugin that manages its own ids (or restores cached
/// entities) may supply one instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
