use std::path::PathBuf;
use std::str::FromStr;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::app::AppError;
use crate::config::DEFAULT_CONFIG_PATH;
use crate::domain::task::{Category, Difficulty, Phase};
use crate::filter::{FilterState, SortKey, StatusFilter};

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::BrightMagenta.on_default())
}

pub fn styled_command() -> clap::Command {
    Cli::command()
}

#[derive(Debug, Parser)]
#[command(name = "craftlist")]
#[command(bin_name = "craftlist")]
#[command(version)]
#[command(about = "A local Minecraft completion checklist with per-world progress")]
#[command(styles = cli_styles())]
pub struct Cli {
    #[arg(
        short = 'd',
        long,
        env = "CRAFTLIST_DB_PATH",
        default_value = ".craftlist/state.sqlite",
        help = "Path to the SQLite file that stores worlds and progress."
    )]
    pub db: PathBuf,

    #[arg(
        short = 'c',
        long,
        env = "CRAFTLIST_CONFIG",
        default_value = DEFAULT_CONFIG_PATH,
        help = "Path to the TOML config file; a missing file means defaults."
    )]
    pub config: PathBuf,

    #[arg(
        long,
        env = "CRAFTLIST_DATASET",
        help = "Alternate dataset JSON; overrides the config file."
    )]
    pub dataset: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "List tasks with filtering and sorting.")]
    Ls(ListArgs),
    #[command(about = "Show one task with its progress and icon sources.")]
    Show(ShowArgs),
    #[command(about = "Set a task status in the active world.")]
    Status(StatusArgs),
    #[command(about = "Flip a task between completed and pending.")]
    Toggle(TaskIdArgs),
    #[command(about = "Set or clear notes on a task.")]
    Note(NoteArgs),
    #[command(about = "Show overall and per-category progress.")]
    Stats(JsonArgs),
    #[command(about = "Show the most recently completed tasks.")]
    Recent(RecentArgs),
    #[command(about = "Quick text search over task names, descriptions, and tags.")]
    Search(SearchArgs),
    #[command(about = "Manage worlds.")]
    World(WorldArgs),
    #[command(about = "Track collection items such as music discs.")]
    Collection(CollectionArgs),
    #[command(about = "Print every world as a JSON backup document.")]
    Export(ExportArgs),
    #[command(about = "Replace every world from a JSON backup document.")]
    Import(ImportArgs),
    #[command(about = "Resolve icon sources and fallback emoji for an id.")]
    Icon(IconArgs),
    #[command(about = "List categories present in the dataset.")]
    Categories(JsonArgs),
    #[command(about = "Generate or install shell completions.")]
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct JsonArgs {
    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct TaskIdArgs {
    #[arg(help = "Task id.")]
    pub id: String,
}

#[derive(Debug, Args, Default)]
pub struct ListArgs {
    #[arg(short = 's', long, help = "Case-insensitive text filter.")]
    pub search: Option<String>,

    #[arg(
        short = 'C',
        long = "category",
        help = "Only these categories (repeatable)."
    )]
    pub categories: Vec<String>,

    #[arg(short = 'p', long = "phase", help = "Only these phases (repeatable).")]
    pub phases: Vec<String>,

    #[arg(
        short = 'D',
        long = "difficulty",
        help = "Only these difficulties (repeatable)."
    )]
    pub difficulties: Vec<String>,

    #[arg(
        long,
        help = "Only tasks with this status: all, pending, in_progress, completed."
    )]
    pub status: Option<String>,

    #[arg(long, help = "Hide completed tasks.")]
    pub hide_completed: bool,

    #[arg(
        long,
        default_value = "category",
        help = "Sort key: name, difficulty, phase, category."
    )]
    pub sort: String,

    #[arg(long, help = "Sort descending.")]
    pub desc: bool,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

impl ListArgs {
    pub fn filter_state(&self) -> Result<FilterState, AppError> {
        let mut filter = FilterState {
            search: self.search.clone().unwrap_or_default(),
            ..FilterState::default()
        };
        let sort_by = SortKey::from_str(&self.sort)?;
        if filter.sort_by != sort_by {
            filter.set_sort_by(sort_by);
        }
        if self.desc {
            filter.set_sort_by(sort_by);
        }
        if self.hide_completed {
            filter.toggle_show_completed();
        }
        if let Some(status) = self.status.as_deref() {
            filter.status = StatusFilter::from_str(status)?;
        }
        for category in split_values(&self.categories).map(Category::parse) {
            if !filter.categories.contains(&category) {
                filter.toggle_category(category);
            }
        }
        for phase in split_values(&self.phases).map(Phase::parse) {
            if !filter.phases.contains(&phase) {
                filter.toggle_phase(phase);
            }
        }
        for difficulty in split_values(&self.difficulties).map(Difficulty::parse) {
            if !filter.difficulties.contains(&difficulty) {
                filter.toggle_difficulty(difficulty);
            }
        }
        Ok(filter)
    }
}

/// Accepts both repeated flags and comma lists.
fn split_values(values: &[String]) -> impl Iterator<Item = &str> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(help = "Task id.")]
    pub id: String,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    #[arg(help = "Task id.")]
    pub id: String,

    #[arg(help = "New status: pending, in_progress, completed.")]
    pub status: String,
}

#[derive(Debug, Args)]
pub struct NoteArgs {
    #[arg(help = "Task id.")]
    pub id: String,

    #[arg(help = "Note text; omit or pass --clear to remove notes.")]
    pub text: Option<String>,

    #[arg(long, conflicts_with = "text", help = "Remove the notes.")]
    pub clear: bool,
}

#[derive(Debug, Args)]
pub struct RecentArgs {
    #[arg(short = 'n', long, help = "Maximum entries (defaults to config recent_limit).")]
    pub limit: Option<usize>,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(help = "Search text.")]
    pub query: String,

    #[arg(short = 'n', long, help = "Maximum results (defaults to config search_limit).")]
    pub limit: Option<usize>,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct WorldArgs {
    #[command(subcommand)]
    pub command: WorldSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum WorldSubcommands {
    #[command(about = "List worlds; the active one is marked.")]
    List(JsonArgs),
    #[command(about = "Create a world and make it active.")]
    New(WorldNewArgs),
    #[command(about = "Switch the active world.")]
    Use(WorldIdArgs),
    #[command(about = "Rename a world or change its icon, seed, or version.")]
    Rename(WorldRenameArgs),
    #[command(about = "Delete a world and its progress.")]
    Delete(WorldIdArgs),
    #[command(about = "Clear all progress of a world (active world by default).")]
    Reset(WorldResetArgs),
    #[command(about = "List the suggested world icons.")]
    Icons(JsonArgs),
}

#[derive(Debug, Args)]
pub struct WorldIdArgs {
    #[arg(help = "World id.")]
    pub id: String,
}

#[derive(Debug, Args)]
pub struct WorldNewArgs {
    #[arg(default_value = "", help = "World name; blank picks `World <n>`.")]
    pub name: String,

    #[arg(long, help = "World icon emoji; `world icons` lists suggestions.")]
    pub icon: Option<String>,

    #[arg(long, help = "World seed.")]
    pub seed: Option<String>,

    #[arg(long = "game-version", help = "Game version label.")]
    pub version: Option<String>,
}

#[derive(Debug, Args)]
pub struct WorldRenameArgs {
    #[arg(help = "World id.")]
    pub id: String,

    #[arg(help = "New name.")]
    pub name: Option<String>,

    #[arg(long, help = "New icon emoji.")]
    pub icon: Option<String>,

    #[arg(long, help = "New seed; an empty value clears it.")]
    pub seed: Option<String>,

    #[arg(long = "game-version", help = "New game version label.")]
    pub version: Option<String>,
}

#[derive(Debug, Args)]
pub struct WorldResetArgs {
    #[arg(help = "World id; defaults to the active world.")]
    pub id: Option<String>,
}

#[derive(Debug, Args)]
pub struct CollectionArgs {
    #[command(subcommand)]
    pub command: CollectionSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum CollectionSubcommands {
    #[command(about = "List collections with per-item state.")]
    List(JsonArgs),
    #[command(about = "Flip an item between collected and not collected.")]
    Toggle(CollectionToggleArgs),
}

#[derive(Debug, Args)]
pub struct CollectionToggleArgs {
    #[arg(help = "Collection item id.")]
    pub id: String,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(short = 'o', long, help = "Write to this file instead of stdout.")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    #[arg(help = "Backup document path, or '-' for stdin.")]
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct IconArgs {
    #[arg(help = "Task id, collection item id, or bare identifier.")]
    pub id: String,

    #[arg(long, help = "Display name hint for ids outside the dataset.")]
    pub name: Option<String>,

    #[arg(long, help = "Category hint for ids outside the dataset.")]
    pub category: Option<String>,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(help = "Shell name (bash, zsh, fish). Auto-detected if omitted.")]
    pub shell: Option<String>,

    #[arg(
        short = 'i',
        long = "install",
        help = "Write completions to the canonical path for the shell."
    )]
    pub install: bool,
}
