use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::error::StoreError;

pub const FAVORITES_KEY: &str = "favorites";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteChange {
    pub id: String,
    pub favorite: bool,
}

/// Liked video ids, newest first, kept in the shared store.
///
/// Nothing is cached: every call re-reads the store, so another writer (a second tab,
/// another process) simply wins on its next write.
#[derive(Debug)]
pub struct FavoritesSet<S> {
    store: Arc<S>,
    changes: broadcast::Sender<FavoriteChange>,
}

impl<S: KeyValueStore> FavoritesSet<S> {
    pub fn new(store: Arc<S>) -> Self {
        let (changes, _) = broadcast::channel(64);
        Self { store, changes }
    }

    /// Receives one [`FavoriteChange`] per toggle made after subscribing.
    pub fn subscribe(&self) -> broadcast::Receiver<FavoriteChange> {
        self.changes.subscribe()
    }

    pub fn ids(&self) -> Result<Vec<String>, StoreError> {
        let Some(raw) = self.store.get(FAVORITES_KEY)? else {
            return Ok(vec![]);
        };

        match serde_json::from_str(&raw) {
            Ok(ids) => Ok(ids),
            Err(e) => {
                warn!("Ignoring unreadable favorites list: {e}");
                Ok(vec![])
            }
        }
    }

    pub fn contains(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.ids()?.iter().any(|favorite| favorite == id))
    }

    /// Removes `id` if present, otherwise puts it first. Returns whether it is now a favorite.
    pub fn toggle(&self, id: &str) -> Result<bool, StoreError> {
        let mut ids = self.ids()?;

        let favorite = match ids.iter().position(|favorite| favorite == id) {
            Some(position) => {
                ids.remove(position);
                false
            }
            None => {
                ids.insert(0, id.to_owned());
                true
            }
        };

        self.store
            .set(FAVORITES_KEY, &serde_json::to_string(&ids)?)?;
        debug!(id, favorite, count = ids.len(), "Toggled favorite");

        // No subscribers is fine.
        let _ = self.changes.send(FavoriteChange {
            id: id.to_owned(),
            favorite,
        });

        Ok(favorite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn favorites() -> FavoritesSet<MemoryStore> {
        FavoritesSet::new(Arc::new(MemoryStore::default()))
    }

    #[test]
    fn test_toggle_inserts_newest_first() {
        let favorites = favorites();

        assert!(favorites.toggle("a").unwrap());
        assert!(favorites.toggle("b").unwrap());

        assert_eq!(favorites.ids().unwrap(), vec!["b", "a"]);
        assert!(favorites.contains("a").unwrap());
    }

    #[test]
    fn test_double_toggle_restores_membership_and_order() {
        let favorites = favorites();
        for id in ["c", "b", "a"] {
            favorites.toggle(id).unwrap();
        }
        let before = favorites.ids().unwrap();

        assert!(!favorites.toggle("b").unwrap());
        assert!(favorites.toggle("b").unwrap());
        // "b" comes back at the front, everything else keeps its order.
        assert_eq!(favorites.ids().unwrap(), vec!["b", "a", "c"]);

        assert!(favorites.toggle("z").unwrap());
        assert!(!favorites.toggle("z").unwrap());
        assert_eq!(favorites.ids().unwrap(), vec!["b", "a", "c"]);
        assert_ne!(before, favorites.ids().unwrap());
    }

    #[test]
    fn test_unreadable_stored_value_reads_as_empty() {
        let store = Arc::new(MemoryStore::default());
        store.set(FAVORITES_KEY, "not json").unwrap();
        let favorites = FavoritesSet::new(store);

        assert!(favorites.ids().unwrap().is_empty());
        assert!(favorites.toggle("a").unwrap());
        assert_eq!(favorites.ids().unwrap(), vec!["a"]);
    }

    #[test]
    fn test_toggle_notifies_subscribers() {
        let favorites = favorites();
        let mut changes = favorites.subscribe();

        favorites.toggle("a").unwrap();
        favorites.toggle("a").unwrap();

        assert_eq!(
            changes.try_recv().unwrap(),
            FavoriteChange {
                id: "a".into(),
                favorite: true
            }
        );
        assert_eq!(
            changes.try_recv().unwrap(),
            FavoriteChange {
                id: "a".into(),
                favorite: false
            }
        );
        assert!(changes.try_recv().is_err());
    }

    #[test]
    fn test_toggle_without_subscribers_succeeds() {
        let favorites = favorites();

        assert!(favorites.toggle("a").unwrap());
    }

    #[test]
    fn test_sets_sharing_a_store_see_each_other() {
        let store = Arc::new(MemoryStore::default());
        let first = FavoritesSet::new(store.clone());
        let second = FavoritesSet::new(store);

        first.toggle("a").unwrap();

        assert!(second.contains("a").unwrap());
    }
}
