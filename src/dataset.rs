use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::domain::task::{Category, CollectionCategory, CollectionItem, Task};

const BUILTIN_DATASET: &str = include_str!("data/dataset.json");

/// Read-only task and collection records, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Dataset {
    tasks: Vec<Task>,
    collections: Vec<CollectionCategory>,
    index: HashMap<String, usize>,
}

#[derive(Debug, Deserialize)]
struct RawDataset {
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    collections: Vec<CollectionCategory>,
}

impl Dataset {
    pub fn builtin() -> Result<Self, DatasetError> {
        Self::from_json(BUILTIN_DATASET)
    }

    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, DatasetError> {
        let parsed: RawDataset = serde_json::from_str(raw)?;
        Self::new(parsed.tasks, parsed.collections)
    }

    pub fn new(
        tasks: Vec<Task>,
        collections: Vec<CollectionCategory>,
    ) -> Result<Self, DatasetError> {
        let mut index = HashMap::with_capacity(tasks.len());
        for (position, task) in tasks.iter().enumerate() {
            if task.id.trim().is_empty() {
                return Err(DatasetError::EmptyId);
            }
            if index.insert(task.id.clone(), position).is_some() {
                return Err(DatasetError::DuplicateId(task.id.clone()));
            }
        }

        let mut item_ids = HashSet::new();
        for item in collections.iter().flat_map(|category| category.items.iter()) {
            if item.id.trim().is_empty() {
                return Err(DatasetError::EmptyId);
            }
            if !item_ids.insert(item.id.as_str()) {
                return Err(DatasetError::DuplicateId(item.id.clone()));
            }
        }

        Ok(Self {
            tasks,
            collections,
            index,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.index.get(id).map(|position| &self.tasks[*position])
    }

    pub fn tasks_in_category(&self, category: &Category) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| &task.category == category)
            .collect()
    }

    /// Categories that have at least one task, known ones in declared order first.
    pub fn categories(&self) -> Vec<Category> {
        let mut present: Vec<Category> = Vec::new();
        for task in &self.tasks {
            if !present.contains(&task.category) {
                present.push(task.category.clone());
            }
        }
        present.sort_by(|a, b| a.rank().cmp(&b.rank()).then_with(|| a.sort_cmp(b)));
        present
    }

    pub fn collections(&self) -> &[CollectionCategory] {
        &self.collections
    }

    pub fn collection_item(&self, id: &str) -> Option<(&CollectionCategory, &CollectionItem)> {
        self.collections.iter().find_map(|category| {
            category
                .items
                .iter()
                .find(|item| item.id == id)
                .map(|item| (category, item))
        })
    }
}

#[derive(Debug)]
pub enum DatasetError {
    Io(std::io::Error),
    Json(serde_json::Error),
    DuplicateId(String),
    EmptyId,
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Io(err) => write!(f, "failed to read dataset: {}", err),
            DatasetError::Json(err) => write!(f, "invalid dataset JSON: {}", err),
            DatasetError::DuplicateId(id) => write!(f, "duplicate dataset id '{}'", id),
            DatasetError::EmptyId => write!(f, "dataset record has an empty id"),
        }
    }
}

impl Error for DatasetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DatasetError::Io(err) => Some(err),
            DatasetError::Json(err) => Some(err),
            DatasetError::DuplicateId(_) | DatasetError::EmptyId => None,
        }
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(value: std::io::Error) -> Self {
        DatasetError::Io(value)
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(value: serde_json::Error) -> Self {
        DatasetError::Json(value)
    }
}
