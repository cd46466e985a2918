//! Player persistence.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use zone_rules::{Catalog, GameConfig, Player, PlayerId};

use crate::error::StoreError;

/// Where stalker records live.
pub trait PlayerStore: Send + Sync {
    fn get(&self, id: &PlayerId) -> Result<Option<Player>, StoreError>;

    /// Create a fresh record. Fails if `id` is taken.
    fn create(&self, id: &PlayerId, name: &str) -> Result<Player, StoreError>;

    fn save(&self, player: &Player) -> Result<(), StoreError>;
}

/// In-memory store with one lock per player.
///
/// [`MemoryPlayerStore::update`] holds the player's lock across the whole
/// read-modify-write, so two actions by the same stalker run one after the
/// other while different stalkers proceed in parallel. A lock entry is
/// dropped once no update for that stalker is in flight.
#[derive(Debug)]
pub struct MemoryPlayerStore {
    config: GameConfig,
    catalog: Arc<Catalog>,
    records: Mutex<HashMap<PlayerId, Player>>,
    locks: Mutex<HashMap<PlayerId, Arc<Mutex<()>>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex.lock().map_err(|_| StoreError::Poisoned)
}

impl MemoryPlayerStore {
    pub fn new(config: GameConfig, catalog: Arc<Catalog>) -> Self {
        Self {
            config,
            catalog,
            records: Mutex::new(HashMap::new()),
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn player_lock(&self, id: &PlayerId) -> Result<Arc<Mutex<()>>, StoreError> {
        let mut locks = lock(&self.locks)?;
        Ok(locks.entry(id.clone()).or_default().clone())
    }

    /// Drop the lock entry once nobody else holds or waits on it.
    fn release_lock(&self, id: &PlayerId, player_lock: Arc<Mutex<()>>) -> Result<(), StoreError> {
        let mut locks = lock(&self.locks)?;
        // One count for the table, one for `player_lock`.
        if Arc::strong_count(&player_lock) == 2 {
            locks.remove(id);
        }
        Ok(())
    }

    /// Load, modify and save one player under that player's lock.
    pub fn update<T>(&self, id: &PlayerId, f: impl FnOnce(&mut Player) -> T) -> Result<T, StoreError> {
        let player_lock = self.player_lock(id)?;
        let output = self.update_locked(id, &player_lock, f);
        self.release_lock(id, player_lock)?;
        output
    }

    fn update_locked<T>(
        &self,
        id: &PlayerId,
        player_lock: &Mutex<()>,
        f: impl FnOnce(&mut Player) -> T,
    ) -> Result<T, StoreError> {
        let _guard = lock(player_lock)?;
        let mut player = self.get(id)?.ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let output = f(&mut player);
        self.save(&player)?;
        Ok(output)
    }

    pub fn get_or_create(&self, id: &PlayerId, name: &str) -> Result<Player, StoreError> {
        match self.get(id)? {
            Some(player) => Ok(player),
            None => match self.create(id, name) {
                Err(StoreError::AlreadyExists(_)) => self.get(id)?.ok_or_else(|| StoreError::NotFound(id.clone())),
                other => other,
            },
        }
    }

    /// Every record as a JSON array, ordered by id.
    pub fn export_json(&self) -> Result<String, StoreError> {
        let records = lock(&self.records)?;
        let mut players: Vec<&Player> = records.values().collect();
        players.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(serde_json::to_string_pretty(&players)?)
    }

    /// Load records from [`MemoryPlayerStore::export_json`] output, replacing
    /// any with the same id. Returns how many were loaded.
    pub fn import_json(&self, json: &str) -> Result<usize, StoreError> {
        let players: Vec<Player> = serde_json::from_str(json)?;
        let count = players.len();
        let mut records = lock(&self.records)?;
        for player in players {
            records.insert(player.id.clone(), player);
        }
        tracing::info!(count, "imported player records");
        Ok(count)
    }
}

impl PlayerStore for MemoryPlayerStore {
    fn get(&self, id: &PlayerId) -> Result<Option<Player>, StoreError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn create(&self, id: &PlayerId, name: &str) -> Result<Player, StoreError> {
        let mut records = lock(&self.records)?;
        if records.contains_key(id) {
            return Err(StoreError::AlreadyExists(id.clone()));
        }
        let player = Player::new(id.clone(), name, &self.config).with_starter_kit(&self.catalog);
        records.insert(id.clone(), player.clone());
        tracing::info!(player = %id, name, "new stalker");
        Ok(player)
    }

    fn save(&self, player: &Player) -> Result<(), StoreError> {
        lock(&self.records)?.insert(player.id.clone(), player.clone());
        Ok(())
    }
}
