use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_WORLD_ICON: &str = "🌍";
pub const DEFAULT_GAME_VERSION: &str = "1.21";

/// Emoji palette offered when creating a world.
pub const WORLD_ICONS: [&str; 12] = [
    "🌍", "🌎", "🌏", "⛏️", "🏔️", "🌲", "🏜️", "🌊", "🔥", "💎", "⭐", "🐉",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        let status = match normalized.as_str() {
            "pending" | "todo" => TaskStatus::Pending,
            "in_progress" | "started" | "doing" => TaskStatus::InProgress,
            "completed" | "done" => TaskStatus::Completed,
            _ => {
                return Err(ParseTaskStatusError {
                    value: value.to_string(),
                });
            }
        };
        Ok(status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTaskStatusError {
    value: String,
}

impl fmt::Display for ParseTaskStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid task status '{}': expected one of {}",
            self.value,
            TaskStatus::ALL
                .iter()
                .map(|status| status.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl Error for ParseTaskStatusError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProgress {
    pub task_id: String,
    pub status: TaskStatus,
    /// Epoch milliseconds; present only while `status` is completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    pub id: String,
    pub name: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub progress: BTreeMap<String, TaskProgress>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub collection_progress: BTreeMap<String, bool>,
}

fn default_icon() -> String {
    DEFAULT_WORLD_ICON.to_string()
}

fn default_version() -> String {
    DEFAULT_GAME_VERSION.to_string()
}

impl World {
    pub fn status_of(&self, task_id: &str) -> TaskStatus {
        self.progress
            .get(task_id)
            .map(|progress| progress.status)
            .unwrap_or_default()
    }

    pub fn is_collected(&self, item_id: &str) -> bool {
        self.collection_progress.get(item_id).copied().unwrap_or(false)
    }

    pub fn completed_count(&self) -> usize {
        self.progress
            .values()
            .filter(|progress| progress.status == TaskStatus::Completed)
            .count()
    }
}

/// Metadata edits; id, creation time, and progress are not patchable.
#[derive(Debug, Clone, Default)]
pub struct WorldPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub seed: Option<String>,
    pub version: Option<String>,
}

impl WorldPatch {
    pub fn has_changes(&self) -> bool {
        self.name.is_some() || self.icon.is_some() || self.seed.is_some() || self.version.is_some()
    }

    pub fn apply(self, world: &mut World) {
        if let Some(name) = self.name {
            world.name = name;
        }
        if let Some(icon) = self.icon {
            world.icon = icon;
        }
        if let Some(seed) = self.seed {
            let seed = seed.trim().to_string();
            world.seed = if seed.is_empty() { None } else { Some(seed) };
        }
        if let Some(version) = self.version {
            world.version = version;
        }
    }
}
