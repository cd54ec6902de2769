use std::fs::{self, OpenOptions};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use placefind_core::{AppConfig, ExitCode, PlacefindError, QueryCache, QueryKey, QueryState};
use placefind_places::AutocompleteSource;
use placefind_tui::app::App;

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "placefind",
    about = "Debounced address search in the terminal",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output in JSON format. Also enabled by setting PLACEFIND_JSON=1.
    #[arg(long, global = true)]
    json: bool,

    /// Override the autocomplete endpoint for this run.
    #[arg(long, global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single search and print the options.
    Search { query: String },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,
    /// Print the config file path.
    Path,
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    let json_output = cli.json || std::env::var("PLACEFIND_JSON").as_deref() == Ok("1");

    if let Err(err) = run(cli, json_output) {
        let code = err
            .downcast_ref::<PlacefindError>()
            .map_or(ExitCode::GeneralError, PlacefindError::exit_code);
        error!(error = %err, code = code as i32, "placefind exited with error");

        if json_output {
            let body = serde_json::json!({
                "status": "error",
                "error": error_kind(code),
                "message": err.to_string(),
            });
            println!("{body:#}");
        } else {
            eprintln!("Error: {err:#}");
        }
        std::process::exit(code as i32);
    }
}

fn run(cli: Cli, json_output: bool) -> Result<()> {
    let start = Instant::now();

    let mut config = AppConfig::load()?;
    if let Some(url) = cli.base_url {
        config.search.base_url = url;
        config.validate()?;
    }
    init_logging(&config);

    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let source = AutocompleteSource::new(&config.search).map_err(PlacefindError::from)?;
    let cache = QueryCache::new(Arc::new(source));

    match cli.command {
        None => {
            info!(endpoint = %config.search.base_url, "starting widget");
            let mut app = App::new(config, cache);
            placefind_tui::run_tui(&mut app)?;
            if let Some(option) = &app.selected {
                if json_output {
                    print_json(&serde_json::json!({"status": "ok", "data": option}))?;
                } else {
                    println!("{}\t{}", option.place_id, option.address);
                }
            }
        }

        Some(Commands::Search { query }) => {
            let key = QueryKey::place(query.trim());
            let state = runtime.block_on(cache.fetch(&key));
            let dur = start.elapsed().as_millis();

            let options = match state {
                QueryState::Failed(msg) => return Err(PlacefindError::Network(msg).into()),
                other => other.options().to_vec(),
            };

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "items": options, "total": options.len(), "query": query },
                    "meta": { "duration_ms": dur }
                }))?;
            } else if options.is_empty() {
                println!("No Option");
            } else {
                for option in &options {
                    println!("{:<24}  {}", option.place_id, option.address);
                }
            }
        }

        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => {
                if json_output {
                    print_json(&serde_json::json!({"status": "ok", "data": config}))?;
                } else {
                    print!("{}", toml::to_string_pretty(&config)?);
                }
            }
            ConfigAction::Path => {
                let path = AppConfig::config_path();
                if json_output {
                    print_json(&serde_json::json!({
                        "status": "ok",
                        "data": { "path": path, "exists": path.exists() }
                    }))?;
                } else {
                    println!("{}", path.display());
                }
            }
        },
    }

    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Send tracing output to the configured log file. `RUST_LOG` takes
/// precedence over the configured level. Logging is skipped when the file
/// cannot be opened so the terminal stays clean.
fn init_logging(config: &AppConfig) {
    let path = config.log_path();
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();
}

fn error_kind(code: ExitCode) -> &'static str {
    match code {
        ExitCode::NetworkError => "network",
        ExitCode::MountFailed => "mount_failed",
        _ => "error",
    }
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}
