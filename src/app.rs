use std::error::Error;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::config::{Config, ConfigError};
use crate::dataset::{Dataset, DatasetError};
use crate::domain::progress::{ParseTaskStatusError, TaskStatus, World, WorldPatch};
use crate::domain::task::{Category, CollectionCategory, CollectionItem, Task};
use crate::filter::{apply_filters, search_tasks, FilterState, ParseSortKeyError};
use crate::icons::{self, IconResolution, IconSubject};
use crate::stats::{
    category_breakdown, collection_stats, overall_stats, recently_completed, Stats,
};
use crate::store::{SqliteBackend, StorageBackend, StorageError, WorldStore};

pub struct App<B = SqliteBackend> {
    dataset: Dataset,
    store: WorldStore<B>,
    config: Config,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TaskView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub phase: String,
    pub difficulty: String,
    pub status: TaskStatus,
    pub completed_at: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub requirements: Vec<String>,
    pub tips: Option<String>,
    pub wiki_link: Option<String>,
    pub icon: IconResolution,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WorldView {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub seed: Option<String>,
    pub version: String,
    pub created_at: String,
    pub completed: usize,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryStatsView {
    pub category: String,
    pub label: String,
    pub emoji: String,
    #[serde(flatten)]
    pub stats: Stats,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatsReport {
    pub world: Option<WorldView>,
    pub overall: Stats,
    pub categories: Vec<CategoryStatsView>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecentView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub completed_at: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CollectionItemView {
    pub id: String,
    pub name: String,
    pub collection: String,
    pub collected: bool,
    pub icon: IconResolution,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CollectionView {
    pub id: String,
    pub title: String,
    pub icon: String,
    #[serde(flatten)]
    pub stats: Stats,
    pub items: Vec<CollectionItemView>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryView {
    pub id: String,
    pub label: String,
    pub emoji: String,
    pub description: String,
    pub tasks: usize,
}

impl App<SqliteBackend> {
    /// `dataset_override` wins over the config's `dataset` key; with neither,
    /// the embedded dataset is used.
    pub fn open(
        db_path: &Path,
        config: Config,
        dataset_override: Option<&Path>,
    ) -> Result<Self, AppError> {
        let dataset = match dataset_override.or(config.dataset.as_deref()) {
            Some(path) => {
                debug!(path = %path.display(), "loading dataset from file");
                Dataset::load(path)?
            }
            None => Dataset::builtin()?,
        };
        if dataset.is_empty() {
            warn!("dataset has no tasks");
        }
        debug!(tasks = dataset.len(), "dataset loaded");
        let backend = SqliteBackend::open(db_path)?;
        Ok(Self::with_backend(backend, dataset, config))
    }
}

impl<B: StorageBackend> App<B> {
    pub fn with_backend(backend: B, dataset: Dataset, config: Config) -> Self {
        let store = WorldStore::open(backend, config.world_defaults());
        Self {
            dataset,
            store,
            config,
        }
    }

    pub fn list_tasks(&self, filter: &FilterState) -> Vec<TaskView> {
        apply_filters(self.dataset.tasks(), filter, |id| self.store.task_status(id))
            .into_iter()
            .map(|task| self.task_view(task))
            .collect()
    }

    pub fn show_task(&self, id: &str) -> Result<TaskView, AppError> {
        Ok(self.task_view(self.require_task(id)?))
    }

    pub fn search(&self, query: &str, limit: Option<usize>) -> Vec<TaskView> {
        let limit = limit.unwrap_or(self.config.search_limit);
        search_tasks(self.dataset.tasks(), query, limit)
            .into_iter()
            .map(|task| self.task_view(task))
            .collect()
    }

    pub fn set_status(&mut self, id: &str, status: &str) -> Result<TaskView, AppError> {
        let status = TaskStatus::from_str(status)?;
        let task_id = self.require_task(id)?.id.clone();
        if !self.store.set_task_status(&task_id, status) {
            return Err(AppError::NoActiveWorld);
        }
        self.show_task(&task_id)
    }

    pub fn toggle_task(&mut self, id: &str) -> Result<TaskView, AppError> {
        let task_id = self.require_task(id)?.id.clone();
        self.store
            .toggle_task_complete(&task_id)
            .ok_or(AppError::NoActiveWorld)?;
        self.show_task(&task_id)
    }

    pub fn set_notes(&mut self, id: &str, notes: &str) -> Result<TaskView, AppError> {
        let task_id = self.require_task(id)?.id.clone();
        if !self.store.set_task_notes(&task_id, notes) {
            return Err(AppError::NoActiveWorld);
        }
        self.show_task(&task_id)
    }

    pub fn stats(&self) -> StatsReport {
        let status_of = |id: &str| self.store.task_status(id);
        let categories = category_breakdown(&self.dataset, status_of)
            .into_iter()
            .map(|(category, stats)| CategoryStatsView {
                label: category.label().to_string(),
                emoji: category.emoji().to_string(),
                category: category.as_str().to_string(),
                stats,
            })
            .collect();
        StatsReport {
            world: self.store.active_world().map(|world| self.world_view(world)),
            overall: overall_stats(&self.dataset, status_of),
            categories,
        }
    }

    pub fn recent(&self, limit: Option<usize>) -> Vec<RecentView> {
        let limit = limit.unwrap_or(self.config.recent_limit);
        recently_completed(self.store.active_world(), &self.dataset, limit)
            .into_iter()
            .map(|(task, at)| RecentView {
                id: task.id.clone(),
                name: task.name.clone(),
                category: task.category.as_str().to_string(),
                completed_at: format_millis(at),
            })
            .collect()
    }

    pub fn worlds(&self) -> Vec<WorldView> {
        self.store
            .worlds()
            .iter()
            .map(|world| self.world_view(world))
            .collect()
    }

    pub fn create_world(
        &mut self,
        name: &str,
        icon: Option<&str>,
        seed: Option<&str>,
        version: Option<&str>,
    ) -> Result<WorldView, AppError> {
        let id = self.store.create_world(name, icon, seed, version).id.clone();
        self.require_world_view(&id)
    }

    pub fn use_world(&mut self, id: &str) -> Result<WorldView, AppError> {
        if !self.store.set_active_world(id) {
            return Err(AppError::WorldNotFound(id.to_string()));
        }
        self.require_world_view(id)
    }

    pub fn update_world(&mut self, id: &str, patch: WorldPatch) -> Result<WorldView, AppError> {
        if self.store.world(id).is_none() {
            return Err(AppError::WorldNotFound(id.to_string()));
        }
        if !self.store.update_world(id, patch) {
            return Err(AppError::InvalidArgument(
                "nothing to update; pass --name, --icon, --seed, or --version".to_string(),
            ));
        }
        self.require_world_view(id)
    }

    pub fn delete_world(&mut self, id: &str) -> Result<(), AppError> {
        if !self.store.delete_world(id) {
            return Err(AppError::WorldNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Resets `id`, or the active world when `id` is `None`.
    pub fn reset_world(&mut self, id: Option<&str>) -> Result<WorldView, AppError> {
        let id = match id {
            Some(id) => id.to_string(),
            None => self.active_world_id()?,
        };
        if !self.store.reset_world_progress(&id) {
            return Err(AppError::WorldNotFound(id));
        }
        self.require_world_view(&id)
    }

    pub fn collections(&self) -> Vec<CollectionView> {
        let world = self.store.active_world();
        self.dataset
            .collections()
            .iter()
            .map(|category| CollectionView {
                id: category.id.clone(),
                title: category.title.clone(),
                icon: category.icon.clone(),
                stats: collection_stats(category, world),
                items: category
                    .items
                    .iter()
                    .map(|item| self.collection_item_view(category, item))
                    .collect(),
            })
            .collect()
    }

    pub fn toggle_collected(&mut self, item_id: &str) -> Result<CollectionItemView, AppError> {
        let (category, item) = self
            .dataset
            .collection_item(item_id.trim())
            .ok_or_else(|| AppError::NotFound(item_id.to_string()))?;
        self.store
            .toggle_collected(&item.id)
            .ok_or(AppError::NoActiveWorld)?;
        Ok(self.collection_item_view(category, item))
    }

    pub fn export(&self) -> String {
        self.store.export_progress()
    }

    /// Returns the number of imported worlds.
    pub fn import(&mut self, raw: &str) -> Result<usize, AppError> {
        if !self.store.import_progress(raw) {
            return Err(AppError::InvalidArgument(
                "import rejected: expected a JSON document with a `worlds` array of unique worlds"
                    .to_string(),
            ));
        }
        Ok(self.store.world_count())
    }

    /// Resolves a task or collection item by id; unknown ids resolve from the
    /// hints alone.
    pub fn icon(&self, id: &str, name: Option<&str>, category: Option<&str>) -> IconResolution {
        if let Some(task) = self.dataset.task(id) {
            return icons::resolve(&IconSubject::from_task(task));
        }
        if let Some((_, item)) = self.dataset.collection_item(id) {
            return icons::resolve(&IconSubject::from_item(item));
        }
        let category = category.map(Category::parse);
        icons::resolve(&IconSubject {
            id,
            name: name.unwrap_or_default(),
            category: category.as_ref(),
            icon: None,
        })
    }

    pub fn categories(&self) -> Vec<CategoryView> {
        self.dataset
            .categories()
            .into_iter()
            .map(|category| CategoryView {
                id: category.as_str().to_string(),
                label: category.label().to_string(),
                emoji: category.emoji().to_string(),
                description: category
                    .info()
                    .map(|info| info.description.to_string())
                    .unwrap_or_default(),
                tasks: self.dataset.tasks_in_category(&category).len(),
            })
            .collect()
    }

    fn require_task(&self, id: &str) -> Result<&Task, AppError> {
        self.dataset
            .task(id.trim())
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    fn active_world_id(&self) -> Result<String, AppError> {
        self.store
            .active_world_id()
            .map(str::to_string)
            .ok_or(AppError::NoActiveWorld)
    }

    fn task_view(&self, task: &Task) -> TaskView {
        let progress = self.store.task_progress(&task.id);
        TaskView {
            id: task.id.clone(),
            name: task.name.clone(),
            description: task.description.clone(),
            category: task.category.as_str().to_string(),
            phase: task.phase.as_str().to_string(),
            difficulty: task.difficulty.as_str().to_string(),
            status: progress.map(|progress| progress.status).unwrap_or_default(),
            completed_at: progress
                .and_then(|progress| progress.completed_at)
                .map(format_millis),
            notes: progress.and_then(|progress| progress.notes.clone()),
            tags: task.tags.clone(),
            requirements: task.requirements.clone(),
            tips: task.tips.clone(),
            wiki_link: task.wiki_link.clone(),
            icon: icons::resolve(&IconSubject::from_task(task)),
        }
    }

    fn world_view(&self, world: &World) -> WorldView {
        WorldView {
            id: world.id.clone(),
            name: world.name.clone(),
            icon: world.icon.clone(),
            seed: world.seed.clone(),
            version: world.version.clone(),
            created_at: format_millis(world.created_at),
            completed: world.completed_count(),
            active: self.store.active_world_id() == Some(world.id.as_str()),
        }
    }

    fn require_world_view(&self, id: &str) -> Result<WorldView, AppError> {
        self.store
            .world(id)
            .map(|world| self.world_view(world))
            .ok_or_else(|| AppError::WorldNotFound(id.to_string()))
    }

    fn collection_item_view(
        &self,
        category: &CollectionCategory,
        item: &CollectionItem,
    ) -> CollectionItemView {
        CollectionItemView {
            id: item.id.clone(),
            name: item.name.clone(),
            collection: category.id.clone(),
            collected: self.store.is_collected(&item.id),
            icon: icons::resolve(&IconSubject::from_item(item)),
        }
    }
}

/// Epoch milliseconds as RFC 3339; out-of-range values print raw.
pub fn format_millis(millis: i64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .ok()
        .and_then(|at| at.format(&Rfc3339).ok())
        .unwrap_or_else(|| millis.to_string())
}

#[derive(Debug)]
pub enum AppError {
    Io(std::io::Error),
    Storage(StorageError),
    Dataset(DatasetError),
    Config(ConfigError),
    ParseStatus(ParseTaskStatusError),
    ParseSortKey(ParseSortKeyError),
    InvalidArgument(String),
    NotFound(String),
    WorldNotFound(String),
    NoActiveWorld,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "I/O error: {}", err),
            AppError::Storage(err) => write!(f, "storage error: {}", err),
            AppError::Dataset(err) => write!(f, "dataset error: {}", err),
            AppError::Config(err) => write!(f, "{}", err),
            AppError::ParseStatus(err) => write!(f, "status parse error: {}", err),
            AppError::ParseSortKey(err) => write!(f, "sort parse error: {}", err),
            AppError::InvalidArgument(message) => write!(f, "{}", message),
            AppError::NotFound(id) => write!(f, "'{}' not found in dataset", id),
            AppError::WorldNotFound(id) => write!(f, "world '{}' not found", id),
            AppError::NoActiveWorld => {
                write!(f, "no active world; create one with `craftlist world new`")
            }
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            AppError::Storage(err) => Some(err),
            AppError::Dataset(err) => Some(err),
            AppError::Config(err) => Some(err),
            AppError::ParseStatus(err) => Some(err),
            AppError::ParseSortKey(err) => Some(err),
            AppError::InvalidArgument(_) => None,
            AppError::NotFound(_) => None,
            AppError::WorldNotFound(_) => None,
            AppError::NoActiveWorld => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<StorageError> for AppError {
    fn from(value: StorageError) -> Self {
        AppError::Storage(value)
    }
}

impl From<DatasetError> for AppError {
    fn from(value: DatasetError) -> Self {
        AppError::Dataset(value)
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<ParseTaskStatusError> for AppError {
    fn from(value: ParseTaskStatusError) -> Self {
        AppError::ParseStatus(value)
    }
}

impl From<ParseSortKeyError> for AppError {
    fn from(value: ParseSortKeyError) -> Self {
        AppError::ParseSortKey(value)
    }
}

#[cfg(test)]
mod tests;
