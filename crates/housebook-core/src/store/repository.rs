use tracing::{debug, warn};

use crate::error::StoreError;
use crate::models::Member;
use crate::store::kv::KeyValueStore;

/// Key under which the roster is stored
pub const ROSTER_KEY: &str = "houseMembers";

/// Load/save of the full member list.
pub trait RosterRepository {
    /// Read the stored roster. Missing or unreadable data yields an empty list.
    fn load_all(&self) -> Vec<Member>;

    /// Replace the stored roster with `members`.
    fn save_all(&mut self, members: &[Member]) -> Result<(), StoreError>;
}

impl<R: RosterRepository + ?Sized> RosterRepository for Box<R> {
    fn load_all(&self) -> Vec<Member> {
        (**self).load_all()
    }

    fn save_all(&mut self, members: &[Member]) -> Result<(), StoreError> {
        (**self).save_all(members)
    }
}

/// Roster stored as a JSON array under `ROSTER_KEY` in a key-value store.
pub struct KeyValueRepository<S> {
    store: S,
}

impl<S: KeyValueStore> KeyValueRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> RosterRepository for KeyValueRepository<S> {
    fn load_all(&self) -> Vec<Member> {
        let raw = match self.store.get(ROSTER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored roster, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(key = ROSTER_KEY, error = %e, "Failed to read stored roster");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Member>>(&raw) {
            Ok(members) => {
                debug!(count = members.len(), "Loaded stored roster");
                members
            }
            Err(e) => {
                warn!(key = ROSTER_KEY, error = %e, "Failed to parse stored roster, discarding");
                Vec::new()
            }
        }
    }

    fn save_all(&mut self, members: &[Member]) -> Result<(), StoreError> {
        let contents = serde_json::to_string(members)?;
        self.store.set(ROSTER_KEY, &contents)?;
        debug!(count = members.len(), "Saved roster");
        Ok(())
    }
}
