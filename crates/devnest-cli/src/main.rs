// DevNest CLI
// Thin front end over the devnest-lib command surface

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::process;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use devnest_lib::commands::{ide, launch, project, system};
use devnest_lib::{AppConfig, AppState, DevNestError, IdeCategory, IdeForm, LaunchRequest, NewProjectInput};

#[derive(Parser, Debug)]
#[command(name = "devnest", version, about = "Local project registry and launcher")]
struct Cli {
    /// Data directory (overrides DEVNEST_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered projects
    Projects,
    /// Scan a directory tree for projects
    Scan {
        root: String,
        #[arg(long)]
        depth: Option<u8>,
    },
    /// Register a single directory
    Add {
        path: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Forget a project
    Remove { project_id: String },
    /// Toggle the favorite flag
    Favorite { project_id: String },
    /// Set preferred IDE ids, most preferred first
    Prefer {
        project_id: String,
        ide_ids: Vec<String>,
    },
    /// Replace a project's tags
    Tags { project_id: String, tags: Vec<String> },
    /// Move the given projects to the top of the list
    Reorder { project_ids: Vec<String> },
    /// Compute (or with --cached, show) language statistics
    Stats {
        project_id: String,
        #[arg(long)]
        cached: bool,
    },
    /// List the IDE catalog
    Ides,
    /// Add an IDE to the catalog
    AddIde {
        #[arg(long)]
        name: String,
        #[arg(long)]
        executable: String,
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        args: Option<String>,
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
        #[arg(long)]
        priority: Option<i32>,
    },
    /// Remove an IDE from the catalog
    RemoveIde { ide_id: String },
    /// Detect installed tools (add them with --add)
    Detect {
        #[arg(long)]
        add: bool,
    },
    /// Set an IDE icon from an image or executable
    SetIcon { ide_id: String, file: String },
    /// Open a project in an IDE
    Launch {
        project_id: String,
        #[arg(long)]
        ide: Option<String>,
        /// Store these ids as the new preference list
        #[arg(long = "prefer")]
        preferences: Vec<String>,
        /// Wait for console tools to exit
        #[arg(long)]
        wait: bool,
    },
    /// Reveal a path in the file manager
    Reveal { path: String },
    /// Open a terminal at a path
    Terminal { path: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CategoryArg {
    Gui,
    Cli,
    Terminal,
    Browser,
}

impl From<CategoryArg> for IdeCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Gui => IdeCategory::Gui,
            CategoryArg::Cli => IdeCategory::Cli,
            CategoryArg::Terminal => IdeCategory::Terminal,
            CategoryArg::Browser => IdeCategory::Browser,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Err(e) = run(cli).await {
        eprintln!("{}", String::from(e));
        process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), DevNestError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<(), DevNestError> {
    let config = match cli.data_dir {
        Some(dir) => AppConfig::with_data_dir(dir),
        None => AppConfig::from_env()?,
    };
    let state = AppState::open(config)?;

    match cli.command {
        Command::Projects => print_json(&project::get_projects(&state).await?),
        Command::Scan { root, depth } => {
            print_json(&project::scan_projects(&state, &root, depth).await?)
        }
        Command::Add { path, name, tags } => {
            let input = NewProjectInput {
                path,
                name,
                tags,
                ..Default::default()
            };
            print_json(&project::add_project(&state, input).await?)
        }
        Command::Remove { project_id } => project::remove_project(&state, &project_id).await,
        Command::Favorite { project_id } => {
            print_json(&project::toggle_project_favorite(&state, &project_id).await?)
        }
        Command::Prefer {
            project_id,
            ide_ids,
        } => print_json(&project::set_project_ide_preferences(&state, &project_id, ide_ids).await?),
        Command::Tags { project_id, tags } => {
            print_json(&project::set_project_tags(&state, &project_id, tags).await?)
        }
        Command::Reorder { project_ids } => {
            print_json(&project::reorder_projects(&state, project_ids).await?)
        }
        Command::Stats { project_id, cached } => {
            if cached {
                print_json(&project::get_project_language_stats(&state, &project_id).await?)
            } else {
                print_json(&project::scan_project_language_stats(&state, &project_id).await?)
            }
        }
        Command::Ides => print_json(&ide::get_ides(&state).await?),
        Command::AddIde {
            name,
            executable,
            id,
            args,
            category,
            priority,
        } => {
            let form = IdeForm {
                id,
                name,
                executable,
                args_template: args,
                icon: None,
                category: category.map(IdeCategory::from),
                priority,
            };
            print_json(&ide::add_ide(&state, form).await?)
        }
        Command::RemoveIde { ide_id } => ide::remove_ide(&state, &ide_id).await,
        Command::Detect { add } => {
            if add {
                print_json(&ide::add_detected_ides(&state).await?)
            } else {
                print_json(&ide::scan_ides(&state).await?)
            }
        }
        Command::SetIcon { ide_id, file } => {
            print_json(&ide::set_ide_icon_from_file(&state, &ide_id, &file).await?)
        }
        Command::Launch {
            project_id,
            ide,
            preferences,
            wait,
        } => {
            let request = LaunchRequest {
                project_id,
                ide_id: ide,
                preferences: (!preferences.is_empty()).then_some(preferences),
                wait,
            };
            print_json(&launch::launch(&state, request).await?)
        }
        Command::Reveal { path } => system::open_in_file_manager(&state, &path).await,
        Command::Terminal { path } => system::open_in_terminal(&state, &path).await,
    }
}
