use serde::Serialize;

use crate::dataset::Dataset;
use crate::domain::progress::{TaskStatus, World};
use crate::domain::task::{Category, CollectionCategory, Task};

pub const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub percentage: u8,
}

impl Stats {
    pub fn new(total: usize, completed: usize) -> Self {
        Self {
            total,
            completed,
            percentage: percentage(completed, total),
        }
    }
}

/// `round(completed / total * 100)` with halves rounding up; 0 when `total` is 0.
pub fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    ((completed * 200 + total) / (total * 2)) as u8
}

pub fn stats_for<'a, I, F>(tasks: I, status_of: F) -> Stats
where
    I: IntoIterator<Item = &'a Task>,
    F: Fn(&str) -> TaskStatus,
{
    let mut total = 0;
    let mut completed = 0;
    for task in tasks {
        total += 1;
        if status_of(&task.id) == TaskStatus::Completed {
            completed += 1;
        }
    }
    Stats::new(total, completed)
}

pub fn overall_stats<F>(dataset: &Dataset, status_of: F) -> Stats
where
    F: Fn(&str) -> TaskStatus,
{
    stats_for(dataset.tasks(), status_of)
}

pub fn category_stats<F>(dataset: &Dataset, category: &Category, status_of: F) -> Stats
where
    F: Fn(&str) -> TaskStatus,
{
    stats_for(
        dataset
            .tasks()
            .iter()
            .filter(|task| &task.category == category),
        status_of,
    )
}

pub fn category_breakdown<F>(dataset: &Dataset, status_of: F) -> Vec<(Category, Stats)>
where
    F: Fn(&str) -> TaskStatus,
{
    dataset
        .categories()
        .into_iter()
        .map(|category| {
            let stats = category_stats(dataset, &category, &status_of);
            (category, stats)
        })
        .collect()
}

pub fn collection_stats(category: &CollectionCategory, world: Option<&World>) -> Stats {
    let collected = world.map_or(0, |world| {
        category
            .items
            .iter()
            .filter(|item| world.is_collected(&item.id))
            .count()
    });
    Stats::new(category.items.len(), collected)
}

/// Most recently completed tasks of `world`, newest first. Progress for ids
/// the dataset no longer knows is skipped.
pub fn recently_completed<'a>(
    world: Option<&World>,
    dataset: &'a Dataset,
    limit: usize,
) -> Vec<(&'a Task, i64)> {
    let Some(world) = world else {
        return Vec::new();
    };

    let mut completed: Vec<(&'a Task, i64)> = world
        .progress
        .values()
        .filter(|progress| progress.status == TaskStatus::Completed)
        .filter_map(|progress| {
            let at = progress.completed_at?;
            let task = dataset.task(&progress.task_id)?;
            Some((task, at))
        })
        .collect();
    completed.sort_by(|a, b| b.1.cmp(&a.1));
    completed.truncate(limit);
    completed
}
