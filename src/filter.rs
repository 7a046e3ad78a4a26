use std::cmp::Ordering;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

use crate::domain::progress::TaskStatus;
use crate::domain::task::{Category, Difficulty, Phase, Task};

pub const DEFAULT_SEARCH_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Difficulty,
    Phase,
    #[default]
    Category,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Difficulty => "difficulty",
            SortKey::Phase => "phase",
            SortKey::Category => "category",
        }
    }
}

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "difficulty" => Ok(SortKey::Difficulty),
            "phase" => Ok(SortKey::Phase),
            "category" => Ok(SortKey::Category),
            _ => Err(ParseSortKeyError {
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSortKeyError {
    value: String,
}

impl fmt::Display for ParseSortKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid sort key '{}': expected one of name, difficulty, phase, category",
            self.value
        )
    }
}

impl Error for ParseSortKeyError {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl FromStr for StatusFilter {
    type Err = crate::domain::progress::ParseTaskStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        TaskStatus::from_str(value).map(StatusFilter::Only)
    }
}

/// Session-local view settings; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub categories: Vec<Category>,
    pub phases: Vec<Phase>,
    pub difficulties: Vec<Difficulty>,
    pub status: StatusFilter,
    pub show_completed: bool,
    pub sort_by: SortKey,
    pub direction: SortDirection,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            categories: Vec::new(),
            phases: Vec::new(),
            difficulties: Vec::new(),
            status: StatusFilter::All,
            show_completed: true,
            sort_by: SortKey::Category,
            direction: SortDirection::Asc,
        }
    }
}

impl FilterState {
    pub fn has_active_filters(&self) -> bool {
        normalized_query(&self.search).is_some()
            || !self.categories.is_empty()
            || !self.phases.is_empty()
            || !self.difficulties.is_empty()
            || self.status != StatusFilter::All
            || !self.show_completed
    }

    pub fn toggle_category(&mut self, category: Category) {
        toggle_member(&mut self.categories, category);
    }

    pub fn toggle_phase(&mut self, phase: Phase) {
        toggle_member(&mut self.phases, phase);
    }

    pub fn toggle_difficulty(&mut self, difficulty: Difficulty) {
        toggle_member(&mut self.difficulties, difficulty);
    }

    pub fn toggle_show_completed(&mut self) {
        self.show_completed = !self.show_completed;
    }

    /// Re-selecting the active key flips direction; a new key starts ascending.
    pub fn set_sort_by(&mut self, key: SortKey) {
        if self.sort_by == key {
            self.direction = self.direction.flipped();
        } else {
            self.sort_by = key;
            self.direction = SortDirection::Asc;
        }
    }

    /// Resets filters but keeps the sort settings.
    #[cfg(test)]
    pub fn clear(&mut self) {
        let sort_by = self.sort_by;
        let direction = self.direction;
        *self = Self {
            sort_by,
            direction,
            ..Self::default()
        };
    }
}

fn toggle_member<T: PartialEq>(set: &mut Vec<T>, value: T) {
    if let Some(position) = set.iter().position(|existing| *existing == value) {
        set.remove(position);
    } else {
        set.push(value);
    }
}

pub fn apply_filters<'a, F>(tasks: &'a [Task], filter: &FilterState, status_of: F) -> Vec<&'a Task>
where
    F: Fn(&str) -> TaskStatus,
{
    let query = normalized_query(&filter.search);

    let mut result: Vec<&Task> = tasks
        .iter()
        .filter(|task| query.as_deref().map_or(true, |query| matches_query(task, query)))
        .filter(|task| selected(&filter.categories, &task.category))
        .filter(|task| selected(&filter.phases, &task.phase))
        .filter(|task| selected(&filter.difficulties, &task.difficulty))
        .filter(|task| {
            let needs_status = filter.status != StatusFilter::All || !filter.show_completed;
            if !needs_status {
                return true;
            }
            let status = status_of(&task.id);
            if let StatusFilter::Only(expected) = filter.status {
                if status != expected {
                    return false;
                }
            }
            filter.show_completed || status != TaskStatus::Completed
        })
        .collect();

    // Vec::sort_by is stable, so rank ties keep dataset order.
    result.sort_by(|a, b| filter.direction.apply(compare_tasks(a, b, filter.sort_by)));
    result
}

/// Text search in dataset order, capped at `limit`; an empty query yields nothing.
pub fn search_tasks<'a>(tasks: &'a [Task], query: &str, limit: usize) -> Vec<&'a Task> {
    let Some(query) = normalized_query(query) else {
        return Vec::new();
    };
    tasks
        .iter()
        .filter(|task| matches_query(task, &query))
        .take(limit)
        .collect()
}

fn compare_tasks(a: &Task, b: &Task, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => compare_names(&a.name, &b.name),
        SortKey::Difficulty => a.difficulty.rank().cmp(&b.difficulty.rank()),
        SortKey::Phase => a.phase.rank().cmp(&b.phase.rank()),
        SortKey::Category => a
            .category
            .sort_cmp(&b.category)
            .then_with(|| compare_names(&a.name, &b.name)),
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn selected<T: PartialEq>(set: &[T], value: &T) -> bool {
    set.is_empty() || set.contains(value)
}

fn matches_query(task: &Task, query: &str) -> bool {
    task.name.to_lowercase().contains(query)
        || task.description.to_lowercase().contains(query)
        || task.tags.iter().any(|tag| tag.to_lowercase().contains(query))
}

/// Only the empty string disables the text filter; whitespace is significant.
fn normalized_query(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_lowercase())
    }
}
