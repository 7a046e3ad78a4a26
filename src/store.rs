mod backend;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

#[cfg(test)]
pub use backend::MemoryBackend;
pub use backend::{SqliteBackend, StorageBackend, StorageError};

use crate::domain::progress::{
    TaskProgress, TaskStatus, World, WorldPatch, DEFAULT_GAME_VERSION, DEFAULT_WORLD_ICON,
};
use crate::world_id::generate_world_id;

pub const WORLDS_KEY: &str = "mc-tracker-worlds";
pub const ACTIVE_WORLD_KEY: &str = "mc-tracker-active-world";
pub const EXPORT_FORMAT_VERSION: u32 = 1;

pub trait Clock {
    /// Unix epoch milliseconds.
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
    }
}

/// Values used for the world auto-created on an empty store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldDefaults {
    pub name: String,
    pub icon: String,
    pub version: String,
}

impl Default for WorldDefaults {
    fn default() -> Self {
        Self {
            name: "My World".to_string(),
            icon: DEFAULT_WORLD_ICON.to_string(),
            version: DEFAULT_GAME_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    version: u32,
    exported_at: i64,
    worlds: &'a [World],
}

#[derive(Debug, Deserialize)]
struct ImportDocument {
    worlds: Vec<World>,
}

/// Sole owner of worlds and their progress. Every mutation re-serializes the
/// full state into the backend; a failed write is logged and the in-memory
/// state stays authoritative for the session.
pub struct WorldStore<B, C = SystemClock> {
    backend: B,
    clock: C,
    defaults: WorldDefaults,
    worlds: Vec<World>,
    active_world_id: Option<String>,
}

impl<B: StorageBackend> WorldStore<B, SystemClock> {
    pub fn open(backend: B, defaults: WorldDefaults) -> Self {
        Self::open_with_clock(backend, SystemClock, defaults)
    }
}

impl<B: StorageBackend, C: Clock> WorldStore<B, C> {
    pub fn open_with_clock(backend: B, clock: C, defaults: WorldDefaults) -> Self {
        let worlds: Vec<World> = read_json(&backend, WORLDS_KEY).unwrap_or_default();
        let active_world_id: Option<String> =
            read_json::<Option<String>>(&backend, ACTIVE_WORLD_KEY).flatten();

        let mut store = Self {
            backend,
            clock,
            defaults,
            worlds: dedupe_worlds(worlds),
            active_world_id,
        };

        if store.worlds.is_empty() {
            let name = store.defaults.name.clone();
            let icon = store.defaults.icon.clone();
            store.create_world(&name, Some(&icon), None, None);
        } else if store.find(store.active_world_id.as_deref()).is_none() {
            store.active_world_id = store.worlds.first().map(|world| world.id.clone());
        }

        debug!(
            worlds = store.worlds.len(),
            active = ?store.active_world_id,
            "world store loaded"
        );
        store
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn worlds(&self) -> &[World] {
        &self.worlds
    }

    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    pub fn world(&self, id: &str) -> Option<&World> {
        self.find(Some(id))
    }

    /// The active world; a dangling pointer falls back to the first world.
    pub fn active_world(&self) -> Option<&World> {
        self.find(self.active_world_id.as_deref())
            .or_else(|| self.worlds.first())
    }

    pub fn active_world_id(&self) -> Option<&str> {
        self.active_world().map(|world| world.id.as_str())
    }

    pub fn create_world(
        &mut self,
        name: &str,
        icon: Option<&str>,
        seed: Option<&str>,
        version: Option<&str>,
    ) -> &World {
        let name = match name.trim() {
            "" => format!("World {}", self.worlds.len() + 1),
            trimmed => trimmed.to_string(),
        };
        let id = generate_world_id(|candidate| {
            self.worlds.iter().any(|world| world.id == candidate)
        });
        let world = World {
            id: id.clone(),
            name,
            icon: non_blank(icon).unwrap_or_else(|| self.defaults.icon.clone()),
            seed: non_blank(seed),
            version: non_blank(version).unwrap_or_else(|| self.defaults.version.clone()),
            created_at: self.clock.now_millis(),
            progress: Default::default(),
            collection_progress: Default::default(),
        };
        info!(world = %world.id, name = %world.name, "created world");

        self.worlds.push(world);
        self.active_world_id = Some(id);
        self.persist();
        &self.worlds[self.worlds.len() - 1]
    }

    pub fn delete_world(&mut self, id: &str) -> bool {
        let before = self.worlds.len();
        self.worlds.retain(|world| world.id != id);
        if self.worlds.len() == before {
            return false;
        }
        if self.active_world_id.as_deref() == Some(id) {
            self.active_world_id = self.worlds.first().map(|world| world.id.clone());
        }
        info!(world = %id, "deleted world");
        self.persist();
        true
    }

    pub fn set_active_world(&mut self, id: &str) -> bool {
        if self.find(Some(id)).is_none() {
            return false;
        }
        self.active_world_id = Some(id.to_string());
        self.persist();
        true
    }

    pub fn update_world(&mut self, id: &str, mut patch: WorldPatch) -> bool {
        patch.name = patch
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        if !patch.has_changes() {
            return false;
        }
        let Some(world) = self.worlds.iter_mut().find(|world| world.id == id) else {
            return false;
        };
        patch.apply(world);
        self.persist();
        true
    }

    pub fn task_progress(&self, task_id: &str) -> Option<&TaskProgress> {
        self.active_world()?.progress.get(task_id)
    }

    pub fn task_status(&self, task_id: &str) -> TaskStatus {
        self.active_world()
            .map(|world| world.status_of(task_id))
            .unwrap_or_default()
    }

    /// Moving to pending drops the record; completing stamps `completed_at`
    /// unless the task already was completed; leaving completed clears it.
    pub fn set_task_status(&mut self, task_id: &str, status: TaskStatus) -> bool {
        let now = self.clock.now_millis();
        let Some(world) = self.active_world_mut() else {
            return false;
        };

        if status == TaskStatus::Pending {
            world.progress.remove(task_id);
        } else {
            let previous = world.progress.remove(task_id);
            let completed_at = match (status, previous.as_ref()) {
                (TaskStatus::Completed, Some(prev)) if prev.status == TaskStatus::Completed => {
                    prev.completed_at.or(Some(now))
                }
                (TaskStatus::Completed, _) => Some(now),
                _ => None,
            };
            world.progress.insert(
                task_id.to_string(),
                TaskProgress {
                    task_id: task_id.to_string(),
                    status,
                    completed_at,
                    notes: previous.and_then(|prev| prev.notes),
                },
            );
        }
        debug!(task = %task_id, status = %status, "task status set");
        self.persist();
        true
    }

    pub fn toggle_task_complete(&mut self, task_id: &str) -> Option<TaskStatus> {
        let next = match self.task_status(task_id) {
            TaskStatus::Completed => TaskStatus::Pending,
            _ => TaskStatus::Completed,
        };
        self.set_task_status(task_id, next).then_some(next)
    }

    /// Blank notes clear them; the record itself is kept.
    pub fn set_task_notes(&mut self, task_id: &str, notes: &str) -> bool {
        let notes = (!notes.trim().is_empty()).then(|| notes.to_string());
        let Some(world) = self.active_world_mut() else {
            return false;
        };

        let entry = world
            .progress
            .entry(task_id.to_string())
            .or_insert_with(|| TaskProgress {
                task_id: task_id.to_string(),
                status: TaskStatus::Pending,
                completed_at: None,
                notes: None,
            });
        entry.notes = notes;
        self.persist();
        true
    }

    #[cfg(test)]
    pub fn completed_count(&self) -> usize {
        self.active_world().map_or(0, World::completed_count)
    }

    pub fn reset_world_progress(&mut self, world_id: &str) -> bool {
        let Some(world) = self.worlds.iter_mut().find(|world| world.id == world_id) else {
            return false;
        };
        world.progress.clear();
        world.collection_progress.clear();
        info!(world = %world_id, "reset world progress");
        self.persist();
        true
    }

    pub fn is_collected(&self, item_id: &str) -> bool {
        self.active_world()
            .is_some_and(|world| world.is_collected(item_id))
    }

    /// Returns the new collected flag, or `None` without an active world.
    pub fn toggle_collected(&mut self, item_id: &str) -> Option<bool> {
        let world = self.active_world_mut()?;
        let collected = if world.collection_progress.remove(item_id).is_some() {
            false
        } else {
            world.collection_progress.insert(item_id.to_string(), true);
            true
        };
        self.persist();
        Some(collected)
    }

    pub fn export_progress(&self) -> String {
        let document = ExportDocument {
            version: EXPORT_FORMAT_VERSION,
            exported_at: self.clock.now_millis(),
            worlds: &self.worlds,
        };
        match serde_json::to_string_pretty(&document) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "failed to serialize export document");
                String::new()
            }
        }
    }

    /// Replaces every world with the document's; on any failure nothing changes.
    pub fn import_progress(&mut self, raw: &str) -> bool {
        let document: ImportDocument = match serde_json::from_str(raw) {
            Ok(document) => document,
            Err(err) => {
                warn!(error = %err, "rejected import document");
                return false;
            }
        };

        let mut seen = HashSet::new();
        if let Some(duplicate) = document
            .worlds
            .iter()
            .find(|world| !seen.insert(world.id.as_str()))
        {
            warn!(world = %duplicate.id, "rejected import with duplicate world id");
            return false;
        }

        self.worlds = document.worlds;
        self.active_world_id = self.worlds.first().map(|world| world.id.clone());
        info!(worlds = self.worlds.len(), "imported worlds");
        self.persist();
        true
    }

    fn find(&self, id: Option<&str>) -> Option<&World> {
        let id = id?;
        self.worlds.iter().find(|world| world.id == id)
    }

    fn active_world_mut(&mut self) -> Option<&mut World> {
        let position = match self.active_world_id.as_deref() {
            Some(id) => self.worlds.iter().position(|world| world.id == id),
            None => None,
        };
        match position {
            Some(position) => self.worlds.get_mut(position),
            None => self.worlds.first_mut(),
        }
    }

    fn persist(&mut self) {
        write_json(&mut self.backend, WORLDS_KEY, &self.worlds);
        write_json(&mut self.backend, ACTIVE_WORLD_KEY, &self.active_world_id);
    }
}

fn read_json<T: serde::de::DeserializeOwned>(
    backend: &impl StorageBackend,
    key: &str,
) -> Option<T> {
    let raw = match backend.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!(key, error = %err, "failed to read stored state");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, error = %err, "discarding unparsable stored state");
            None
        }
    }
}

fn write_json<T: Serialize>(backend: &mut impl StorageBackend, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(key, error = %err, "failed to serialize state");
            return;
        }
    };
    if let Err(err) = backend.write(key, &raw) {
        warn!(key, error = %err, "failed to persist state; keeping in-memory changes");
    }
}

fn dedupe_worlds(worlds: Vec<World>) -> Vec<World> {
    let mut seen = HashSet::new();
    worlds
        .into_iter()
        .filter(|world| {
            let fresh = seen.insert(world.id.clone());
            if !fresh {
                warn!(world = %world.id, "dropping stored world with duplicate id");
            }
            fresh
        })
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Some(value.to_string()),
        _ => None,
    }
}
