mod app;
mod cli;
mod completions;
mod config;
mod dataset;
mod domain;
mod filter;
mod icons;
mod stats;
mod store;
mod ui;
mod world_id;

use std::io::Read;

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CRAFTLIST_LOG";

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json(value: &impl serde::Serialize) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).expect("json serialization should work")
    );
}

fn run() -> Result<(), app::AppError> {
    use clap::Parser;
    use cli::{CollectionSubcommands, Commands, WorldSubcommands};
    use domain::progress::{WorldPatch, WORLD_ICONS};

    let cli = cli::Cli::parse();
    if let Commands::Completions(args) = &cli.command {
        return completions::run_completions_command(args.shell.as_deref(), args.install);
    }

    let config = config::Config::load(&cli.config)?;
    let mut app = app::App::open(&cli.db, config, cli.dataset.as_deref())?;

    match cli.command {
        Commands::Ls(args) => {
            let filter = args.filter_state()?;
            let tasks = app.list_tasks(&filter);
            if args.json {
                print_json(&tasks);
            } else {
                ui::print_task_list(&tasks, &filter);
            }
        }
        Commands::Show(args) => {
            let task = app.show_task(&args.id)?;
            if args.json {
                print_json(&task);
            } else {
                ui::print_task_show(&task);
            }
        }
        Commands::Status(args) => {
            let task = app.set_status(&args.id, &args.status)?;
            println!("updated {} -> {}", task.id, task.status);
        }
        Commands::Toggle(args) => {
            let task = app.toggle_task(&args.id)?;
            println!("updated {} -> {}", task.id, task.status);
        }
        Commands::Note(args) => {
            let text = if args.clear {
                String::new()
            } else {
                args.text.unwrap_or_default()
            };
            let task = app.set_notes(&args.id, &text)?;
            match task.notes {
                Some(_) => println!("noted {}", task.id),
                None => println!("cleared notes on {}", task.id),
            }
        }
        Commands::Stats(args) => {
            let report = app.stats();
            if args.json {
                print_json(&report);
            } else {
                ui::print_stats(&report);
            }
        }
        Commands::Recent(args) => {
            let recent = app.recent(args.limit);
            if args.json {
                print_json(&recent);
            } else {
                ui::print_recent(&recent);
            }
        }
        Commands::Search(args) => {
            let results = app.search(&args.query, args.limit);
            if args.json {
                print_json(&results);
            } else {
                ui::print_search_results(&results, &args.query);
            }
        }
        Commands::World(args) => match args.command {
            WorldSubcommands::List(args) => {
                let worlds = app.worlds();
                if args.json {
                    print_json(&worlds);
                } else {
                    ui::print_worlds(&worlds);
                }
            }
            WorldSubcommands::New(args) => {
                let world = app.create_world(
                    &args.name,
                    args.icon.as_deref(),
                    args.seed.as_deref(),
                    args.version.as_deref(),
                )?;
                println!("created world {} {} {}", world.id, world.icon, world.name);
            }
            WorldSubcommands::Use(args) => {
                let world = app.use_world(&args.id)?;
                println!("active world {} {}", world.id, world.name);
            }
            WorldSubcommands::Rename(args) => {
                let world = app.update_world(
                    &args.id,
                    WorldPatch {
                        name: args.name,
                        icon: args.icon,
                        seed: args.seed,
                        version: args.version,
                    },
                )?;
                println!("updated world {} {} {}", world.id, world.icon, world.name);
            }
            WorldSubcommands::Delete(args) => {
                app.delete_world(&args.id)?;
                println!("deleted world {}", args.id);
            }
            WorldSubcommands::Reset(args) => {
                let world = app.reset_world(args.id.as_deref())?;
                println!("reset world {} {}", world.id, world.name);
            }
            WorldSubcommands::Icons(args) => {
                if args.json {
                    print_json(&WORLD_ICONS);
                } else {
                    ui::print_world_icons(&WORLD_ICONS);
                }
            }
        },
        Commands::Collection(args) => match args.command {
            CollectionSubcommands::List(args) => {
                let collections = app.collections();
                if args.json {
                    print_json(&collections);
                } else {
                    ui::print_collections(&collections);
                }
            }
            CollectionSubcommands::Toggle(args) => {
                let item = app.toggle_collected(&args.id)?;
                let state = if item.collected {
                    "collected"
                } else {
                    "not collected"
                };
                println!("{} -> {}", item.id, state);
            }
        },
        Commands::Export(args) => {
            let document = app.export();
            match args.output {
                Some(path) => {
                    std::fs::write(&path, document)?;
                    println!("exported to {}", path.display());
                }
                None => println!("{document}"),
            }
        }
        Commands::Import(args) => {
            let raw = if args.file.as_os_str() == "-" {
                let mut raw = String::new();
                std::io::stdin().read_to_string(&mut raw)?;
                raw
            } else {
                std::fs::read_to_string(&args.file)?
            };
            let count = app.import(&raw)?;
            println!("imported {count} world(s)");
        }
        Commands::Icon(args) => {
            let resolution = app.icon(&args.id, args.name.as_deref(), args.category.as_deref());
            if args.json {
                print_json(&resolution);
            } else {
                ui::print_icon(&args.id, &resolution);
            }
        }
        Commands::Categories(args) => {
            let categories = app.categories();
            if args.json {
                print_json(&categories);
            } else {
                ui::print_categories(&categories);
            }
        }
        Commands::Completions(_) => unreachable!("completions are handled before app initialization"),
    }

    Ok(())
}
