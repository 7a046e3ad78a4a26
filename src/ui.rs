use std::io::{self, IsTerminal};

use crate::app::{
    CategoryView, CollectionView, RecentView, StatsReport, TaskView, WorldView,
};
use crate::domain::progress::TaskStatus;
use crate::domain::task::Category;
use crate::filter::{FilterState, SortDirection, StatusFilter};
use crate::icons::IconResolution;

pub fn print_task_list(tasks: &[TaskView], filter: &FilterState) {
    let palette = Palette::auto();
    println!("{}", palette.heading("Tasks"));
    if let Some(summary) = filter_summary(filter) {
        println!("{}", palette.dim(&format!("filters: {summary}")));
    }

    if tasks.is_empty() {
        println!("{}", palette.dim("no tasks matched"));
        return;
    }

    for task in tasks {
        println!("{}", format_task_row(task, &palette));
    }
    println!("{}", palette.dim(&format!("{} task(s)", tasks.len())));
}

pub fn print_task_show(task: &TaskView) {
    let palette = Palette::auto();
    println!("{}", format_task_row(task, &palette));
    for (label, value) in task_show_fields(task) {
        println!("  {} {}", palette.dim(&format!("{label}:")), value);
    }
}

pub fn print_search_results(tasks: &[TaskView], query: &str) {
    let palette = Palette::auto();
    println!("{}", palette.heading(&format!("Search: {query}")));
    if tasks.is_empty() {
        println!("{}", palette.dim("no tasks matched"));
        return;
    }
    for task in tasks {
        println!("{}", format_task_row(task, &palette));
    }
}

pub fn print_stats(report: &StatsReport) {
    let palette = Palette::auto();
    match &report.world {
        Some(world) => println!(
            "{}",
            palette.heading(&format!("{} {}", world.icon, world.name))
        ),
        None => println!("{}", palette.heading("No active world")),
    }
    println!(
        "overall {} {}/{} ({}%)",
        progress_bar(report.overall.percentage),
        report.overall.completed,
        report.overall.total,
        report.overall.percentage
    );
    for entry in &report.categories {
        println!(
            "{} {:<18} {} {}/{} ({}%)",
            entry.emoji,
            entry.label,
            progress_bar(entry.stats.percentage),
            entry.stats.completed,
            entry.stats.total,
            entry.stats.percentage
        );
    }
}

pub fn print_recent(entries: &[RecentView]) {
    let palette = Palette::auto();
    println!("{}", palette.heading("Recently completed"));
    if entries.is_empty() {
        println!("{}", palette.dim("nothing completed yet"));
        return;
    }
    for entry in entries {
        println!(
            "{} {} {}",
            palette.dim(&entry.completed_at),
            palette.id(&entry.id),
            entry.name
        );
    }
}

pub fn print_worlds(worlds: &[WorldView]) {
    let palette = Palette::auto();
    println!("{}", palette.heading("Worlds"));
    if worlds.is_empty() {
        println!("{}", palette.dim("no worlds; create one with `craftlist world new`"));
        return;
    }
    for world in worlds {
        println!("{}", format_world_row(world, &palette));
    }
}

pub fn print_world_icons(icons: &[&str]) {
    let palette = Palette::auto();
    println!("{}", palette.heading("World icons"));
    println!("{}", icons.join(" "));
}

pub fn print_collections(collections: &[CollectionView]) {
    let palette = Palette::auto();
    if collections.is_empty() {
        println!("{}", palette.dim("dataset has no collections"));
        return;
    }
    for collection in collections {
        println!(
            "{} {} {}/{} ({}%)",
            collection.icon,
            palette.heading(&collection.title),
            collection.stats.completed,
            collection.stats.total,
            collection.stats.percentage
        );
        for item in &collection.items {
            let mark = if item.collected { "[x]" } else { "[ ]" };
            println!("  {} {} {}", mark, palette.id(&item.id), item.name);
        }
    }
}

pub fn print_icon(id: &str, resolution: &IconResolution) {
    let palette = Palette::auto();
    println!("{} {}", resolution.emoji, palette.id(id));
    for source in &resolution.sources {
        println!("  {source}");
    }
}

pub fn print_categories(categories: &[CategoryView]) {
    let palette = Palette::auto();
    for category in categories {
        println!(
            "{} {} {} {}",
            category.emoji,
            palette.id(&category.id),
            category.label,
            palette.dim(&format!("({} task(s))", category.tasks))
        );
    }
}

fn format_task_row(task: &TaskView, palette: &Palette) -> String {
    let mut line = format!(
        "{} {} {} {}",
        Category::parse(&task.category).emoji(),
        palette.status(task.status),
        palette.id(&task.id),
        task.name
    );
    line.push(' ');
    line.push_str(&palette.dim(&format!("({}, {})", task.phase, task.difficulty)));
    if !task.tags.is_empty() {
        line.push(' ');
        line.push_str(&palette.tags(&format!("#{}", task.tags.join(" #"))));
    }
    line
}

fn task_show_fields(task: &TaskView) -> Vec<(&'static str, String)> {
    let mut fields = vec![("category", task.category.clone())];
    if !task.description.trim().is_empty() {
        fields.push(("description", task.description.clone()));
    }
    if let Some(at) = task.completed_at.as_deref() {
        fields.push(("completed", at.to_string()));
    }
    if let Some(notes) = task.notes.as_deref() {
        fields.push(("notes", notes.to_string()));
    }
    if !task.requirements.is_empty() {
        fields.push(("requires", task.requirements.join(", ")));
    }
    if let Some(tips) = task.tips.as_deref() {
        fields.push(("tips", tips.to_string()));
    }
    if let Some(link) = task.wiki_link.as_deref() {
        fields.push(("wiki", link.to_string()));
    }
    if let Some(first) = task.icon.sources.first() {
        fields.push(("icon", first.clone()));
    }
    fields
}

fn format_world_row(world: &WorldView, palette: &Palette) -> String {
    let marker = if world.active { "*" } else { " " };
    let mut line = format!(
        "{} {} {} {}",
        marker,
        world.icon,
        palette.id(&world.id),
        world.name
    );
    line.push(' ');
    line.push_str(&palette.dim(&format!(
        "v{} {} done",
        world.version, world.completed
    )));
    if let Some(seed) = world.seed.as_deref() {
        line.push(' ');
        line.push_str(&palette.tags(&format!("seed={seed}")));
    }
    line
}

fn filter_summary(filter: &FilterState) -> Option<String> {
    if !filter.has_active_filters() {
        return None;
    }
    let mut parts = Vec::new();
    if !filter.search.is_empty() {
        parts.push(format!("search={:?}", filter.search));
    }
    if !filter.categories.is_empty() {
        let ids = filter
            .categories
            .iter()
            .map(|category| category.as_str())
            .collect::<Vec<_>>();
        parts.push(format!("category={}", ids.join(",")));
    }
    if !filter.phases.is_empty() {
        let ids = filter
            .phases
            .iter()
            .map(|phase| phase.as_str())
            .collect::<Vec<_>>();
        parts.push(format!("phase={}", ids.join(",")));
    }
    if !filter.difficulties.is_empty() {
        let ids = filter
            .difficulties
            .iter()
            .map(|difficulty| difficulty.as_str())
            .collect::<Vec<_>>();
        parts.push(format!("difficulty={}", ids.join(",")));
    }
    if let StatusFilter::Only(status) = filter.status {
        parts.push(format!("status={status}"));
    }
    if !filter.show_completed {
        parts.push("hide_completed=true".to_string());
    }

    let direction = match filter.direction {
        SortDirection::Asc => "asc",
        SortDirection::Desc => "desc",
    };
    parts.push(format!("sort={} {direction}", filter.sort_by.as_str()));
    Some(parts.join(" "))
}

fn progress_bar(percentage: u8) -> String {
    const WIDTH: usize = 20;
    let filled = usize::from(percentage.min(100)) * WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(WIDTH - filled))
}

struct Palette {
    enabled: bool,
}

impl Palette {
    fn auto() -> Self {
        let enabled = std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
        Self { enabled }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        self.paint("1;36", text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    fn id(&self, text: &str) -> String {
        self.paint("1;94", text)
    }

    fn status(&self, status: TaskStatus) -> String {
        let mark = match status {
            TaskStatus::Pending => "[ ]",
            TaskStatus::InProgress => "[~]",
            TaskStatus::Completed => "[x]",
        };
        self.paint(status_color_code(status), mark)
    }

    fn tags(&self, text: &str) -> String {
        self.paint("90", text)
    }
}

fn status_color_code(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "37",
        TaskStatus::InProgress => "33",
        TaskStatus::Completed => "32",
    }
}

#[cfg(test)]
mod tests {
    use super::{
        filter_summary, format_task_row, format_world_row, progress_bar, task_show_fields,
        Palette,
    };
    use crate::app::{TaskView, WorldView};
    use crate::domain::progress::TaskStatus;
    use crate::domain::task::{Category, Difficulty};
    use crate::filter::{FilterState, SortKey};
    use crate::icons::IconResolution;

    fn sample_task() -> TaskView {
        TaskView {
            id: "mob_zombie".to_string(),
            name: "Zombie".to_string(),
            description: "Defeat a zombie".to_string(),
            category: "mobs".to_string(),
            phase: "early_game".to_string(),
            difficulty: "easy".to_string(),
            status: TaskStatus::Completed,
            completed_at: Some("2026-01-01T00:00:00Z".to_string()),
            notes: Some("at night".to_string()),
            tags: vec!["hostile".to_string(), "overworld".to_string()],
            requirements: Vec::new(),
            tips: None,
            wiki_link: None,
            icon: IconResolution {
                sources: vec!["https://example.test/Zombie.png".to_string()],
                emoji: "🧟",
            },
        }
    }

    #[test]
    fn task_row_shows_status_mark_and_tags() {
        let palette = Palette { enabled: false };
        let row = format_task_row(&sample_task(), &palette);
        assert!(row.starts_with("🐉 [x] mob_zombie Zombie"));
        assert!(row.contains("(early_game, easy)"));
        assert!(row.contains("#hostile #overworld"));
    }

    #[test]
    fn show_fields_skip_absent_values() {
        let fields = task_show_fields(&sample_task());
        let labels: Vec<&str> = fields.iter().map(|(label, _)| *label).collect();
        assert_eq!(
            labels,
            vec!["category", "description", "completed", "notes", "icon"]
        );
    }

    #[test]
    fn world_row_marks_active_world() {
        let palette = Palette { enabled: false };
        let world = WorldView {
            id: "abc1234".to_string(),
            name: "Main".to_string(),
            icon: "🌍".to_string(),
            seed: Some("42".to_string()),
            version: "1.21".to_string(),
            created_at: "1970-01-01T00:00:00Z".to_string(),
            completed: 3,
            active: true,
        };
        assert_eq!(
            format_world_row(&world, &palette),
            "* 🌍 abc1234 Main v1.21 3 done seed=42"
        );
    }

    #[test]
    fn filter_summary_lists_only_active_filters() {
        assert!(filter_summary(&FilterState::default()).is_none());

        let mut filter = FilterState::default();
        filter.search = "iron ".to_string();
        filter.toggle_category(Category::Blocks);
        filter.toggle_difficulty(Difficulty::Hard);
        filter.toggle_show_completed();
        filter.set_sort_by(SortKey::Name);
        assert_eq!(
            filter_summary(&filter).expect("summary"),
            "search=\"iron \" category=blocks difficulty=hard hide_completed=true sort=name asc"
        );
    }

    #[test]
    fn progress_bar_scales_to_width() {
        assert_eq!(progress_bar(0), format!("[{}]", ".".repeat(20)));
        assert_eq!(progress_bar(50), format!("[{}{}]", "#".repeat(10), ".".repeat(10)));
        assert_eq!(progress_bar(100), format!("[{}]", "#".repeat(20)));
    }

    #[test]
    fn palette_paints_only_when_enabled() {
        let on = Palette { enabled: true };
        assert_eq!(on.dim("x"), "\x1b[2mx\x1b[0m");
        let off = Palette { enabled: false };
        assert_eq!(off.status(TaskStatus::InProgress), "[~]");
    }
}
