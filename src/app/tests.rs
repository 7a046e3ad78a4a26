use super::{format_millis, App, AppError};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::domain::progress::{TaskStatus, WorldPatch};
use crate::domain::task::Category;
use crate::filter::{FilterState, SortKey, StatusFilter};
use crate::store::{MemoryBackend, ACTIVE_WORLD_KEY, WORLDS_KEY};

const DATASET: &str = r#"{
  "tasks": [
    {"id": "block_iron_block", "name": "Block of Iron", "category": "blocks", "phase": "mid", "difficulty": "easy"},
    {"id": "mob_zombie", "name": "Zombie", "category": "mobs", "phase": "early", "difficulty": "easy", "tags": ["hostile"]},
    {"id": "item_ender_eye", "name": "Eye of Ender", "category": "items", "phase": "late", "difficulty": "hard"},
    {"id": "adv_stone_age", "name": "Stone Age", "category": "advancements", "phase": "early", "difficulty": "easy"}
  ],
  "collections": [
    {"id": "music_discs", "title": "Music Discs", "icon": "💿", "items": [
      {"id": "disc_cat", "name": "Cat", "icon": "music_disc_cat"},
      {"id": "disc_13", "name": "13", "icon": "music_disc_13"}
    ]}
  ]
}"#;

fn test_app() -> App<MemoryBackend> {
    let dataset = Dataset::from_json(DATASET).expect("test dataset should parse");
    App::with_backend(MemoryBackend::new(), dataset, Config::default())
}

#[test]
fn fresh_app_has_default_world_and_zero_progress() {
    let app = test_app();
    let worlds = app.worlds();
    assert_eq!(worlds.len(), 1);
    assert_eq!(worlds[0].name, "My World");
    assert!(worlds[0].active);

    let report = app.stats();
    assert_eq!(report.overall.total, 4);
    assert_eq!(report.overall.completed, 0);
    assert_eq!(report.overall.percentage, 0);
    assert_eq!(report.categories.len(), 4);
}

#[test]
fn status_changes_flow_into_views_and_stats() {
    let mut app = test_app();
    let view = app
        .set_status("mob_zombie", "done")
        .expect("status should update");
    assert_eq!(view.status, TaskStatus::Completed);
    assert!(view.completed_at.is_some());

    app.set_status("item_ender_eye", "in_progress")
        .expect("status should update");
    let report = app.stats();
    assert_eq!(report.overall.completed, 1);
    assert_eq!(report.overall.percentage, 25);
    let mobs = report
        .categories
        .iter()
        .find(|entry| entry.category == "mobs")
        .expect("mobs category");
    assert_eq!(mobs.stats.percentage, 100);

    let recent = app.recent(None);
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, "mob_zombie");
}

#[test]
fn toggle_and_notes_round_trip() {
    let mut app = test_app();
    let toggled = app.toggle_task("adv_stone_age").expect("toggle");
    assert_eq!(toggled.status, TaskStatus::Completed);
    let toggled = app.toggle_task("adv_stone_age").expect("toggle back");
    assert_eq!(toggled.status, TaskStatus::Pending);

    let noted = app
        .set_notes("block_iron_block", "need 9 ingots")
        .expect("notes");
    assert_eq!(noted.notes.as_deref(), Some("need 9 ingots"));
    assert_eq!(noted.status, TaskStatus::Pending);
}

#[test]
fn unknown_ids_and_statuses_are_errors() {
    let mut app = test_app();
    assert!(matches!(
        app.set_status("nope", "completed"),
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        app.set_status("mob_zombie", "finished"),
        Err(AppError::ParseStatus(_))
    ));
    assert!(matches!(app.show_task("nope"), Err(AppError::NotFound(_))));
    assert!(matches!(
        app.use_world("missing"),
        Err(AppError::WorldNotFound(_))
    ));
}

#[test]
fn list_tasks_respects_filters_and_progress() {
    let mut app = test_app();
    app.set_status("mob_zombie", "completed").expect("status");

    let mut filter = FilterState::default();
    filter.show_completed = false;
    let ids: Vec<String> = app
        .list_tasks(&filter)
        .into_iter()
        .map(|task| task.id)
        .collect();
    assert!(!ids.contains(&"mob_zombie".to_string()));
    assert_eq!(ids.len(), 3);

    let mut filter = FilterState::default();
    filter.status = StatusFilter::Only(TaskStatus::Completed);
    assert_eq!(app.list_tasks(&filter).len(), 1);

    let mut filter = FilterState::default();
    filter.toggle_category(Category::Blocks);
    filter.toggle_category(Category::Items);
    filter.set_sort_by(SortKey::Name);
    let names: Vec<String> = app
        .list_tasks(&filter)
        .into_iter()
        .map(|task| task.name)
        .collect();
    assert_eq!(names, vec!["Block of Iron", "Eye of Ender"]);
}

#[test]
fn search_honours_limit() {
    let app = test_app();
    assert_eq!(app.search("e", Some(2)).len(), 2);
    assert_eq!(app.search("", None).len(), 0);
    assert_eq!(app.search("zombie", None)[0].id, "mob_zombie");
}

#[test]
fn world_lifecycle_scopes_progress() {
    let mut app = test_app();
    app.set_status("mob_zombie", "completed").expect("status");
    let first = app.worlds()[0].id.clone();

    let second = app
        .create_world("  ", None, Some("12345"), None)
        .expect("world should be created");
    assert_eq!(second.name, "World 2");
    assert_eq!(second.seed.as_deref(), Some("12345"));
    assert!(second.active);
    assert_eq!(app.stats().overall.completed, 0);

    app.use_world(&first).expect("switch back");
    assert_eq!(app.stats().overall.completed, 1);

    let renamed = app
        .update_world(
            &second.id,
            WorldPatch {
                name: Some("Hardcore".to_string()),
                ..WorldPatch::default()
            },
        )
        .expect("rename");
    assert_eq!(renamed.name, "Hardcore");
    assert!(matches!(
        app.update_world(&second.id, WorldPatch::default()),
        Err(AppError::InvalidArgument(_))
    ));

    let reset = app.reset_world(None).expect("reset active world");
    assert_eq!(reset.id, first);
    assert_eq!(reset.completed, 0);

    app.delete_world(&second.id).expect("delete");
    assert!(matches!(
        app.delete_world(&second.id),
        Err(AppError::WorldNotFound(_))
    ));
}

#[test]
fn deleting_every_world_requires_a_new_one() {
    let mut app = test_app();
    let only = app.worlds()[0].id.clone();
    app.delete_world(&only).expect("delete");
    assert!(matches!(
        app.set_status("mob_zombie", "completed"),
        Err(AppError::NoActiveWorld)
    ));
    assert!(matches!(app.reset_world(None), Err(AppError::NoActiveWorld)));
    assert!(app.stats().world.is_none());
}

#[test]
fn collections_toggle_and_report() {
    let mut app = test_app();
    let item = app.toggle_collected("disc_cat").expect("toggle");
    assert!(item.collected);
    assert_eq!(item.collection, "music_discs");

    let collections = app.collections();
    assert_eq!(collections.len(), 1);
    assert_eq!(collections[0].stats.completed, 1);
    assert_eq!(collections[0].stats.percentage, 50);

    let item = app.toggle_collected("disc_cat").expect("toggle back");
    assert!(!item.collected);
    assert!(matches!(
        app.toggle_collected("disc_missing"),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn export_import_between_apps() {
    let mut source = test_app();
    source.set_status("mob_zombie", "completed").expect("status");
    let exported = source.export();

    let mut target = test_app();
    assert_eq!(target.import(&exported).expect("import"), 1);
    assert_eq!(target.stats().overall.completed, 1);

    assert!(matches!(
        target.import("not json"),
        Err(AppError::InvalidArgument(_))
    ));
    assert_eq!(target.stats().overall.completed, 1);
}

#[test]
fn icons_resolve_tasks_items_and_hints() {
    let app = test_app();
    let eye = app.icon("item_ender_eye", None, None);
    assert!(eye.sources[0].ends_with("/Invicon_Eye_of_Ender.png"));

    let disc = app.icon("disc_cat", None, None);
    assert!(disc.sources[0].ends_with("/Invicon_Music_Disc_Cat.png"));

    let hinted = app.icon("mob_creeper", Some("Creeper"), Some("mobs"));
    assert!(hinted.sources[0].ends_with("/Invicon_Creeper_Spawn_Egg.png"));
}

#[test]
fn categories_report_counts_in_known_order() {
    let app = test_app();
    let ids: Vec<String> = app
        .categories()
        .into_iter()
        .map(|category| category.id)
        .collect();
    assert_eq!(ids, vec!["blocks", "items", "mobs", "advancements"]);
}

#[test]
fn stored_state_is_shared_through_the_backend() {
    let dataset = Dataset::from_json(DATASET).expect("dataset");
    let backend = MemoryBackend::new()
        .with_entry(WORLDS_KEY, "not json")
        .with_entry(ACTIVE_WORLD_KEY, "\"gone\"");
    let app = App::with_backend(backend, dataset, Config::default());
    assert_eq!(app.worlds().len(), 1);
    assert!(app.worlds()[0].active);
}

#[test]
fn millis_format_as_rfc3339() {
    assert_eq!(format_millis(0), "1970-01-01T00:00:00Z");
    assert_eq!(format_millis(1_500), "1970-01-01T00:00:01.5Z");
}
