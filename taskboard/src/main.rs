//! Command-line task board.
//!
//! Each run loads the collection from the task service, performs one
//! operation, and prints the board. Configuration via CLI flags, environment
//! variables, or config file (`~/.config/taskboard/config.toml`).
//!
//! ```bash
//! taskboard                              # show the board
//! taskboard add "Buy milk" -d "2 liters"
//! taskboard toggle 3
//! taskboard edit 3 --description ""      # clear the description
//! taskboard rm 3 --yes
//! TASKBOARD_URL=http://tasks.local/api/ taskboard
//! ```

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use taskboard::config::{CliArgs, ClientConfig, Command};
use taskboard::form::TaskForm;
use taskboard::service::http::HttpTaskService;
use taskboard::store::{SubmitError, TaskStore};
use taskboard::ui;
use taskboard_proto::task::TaskId;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliArgs::parse();

    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::from_cli(&cli)
        }
    };

    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(base_url = %config.base_url, "taskboard starting");

    let service = match HttpTaskService::with_config(&config.base_url, &config.http_config()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let command = cli.command.unwrap_or(Command::List);
    if command == Command::Health {
        return match service.health().await {
            Ok(health) => {
                println!("{}: {}", health.service, health.status);
                if health.is_healthy() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                }
            }
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let store = TaskStore::new(service);
    let ok = run(&store, command).await;

    print!("{}", ui::render_board(&store.snapshot(), &config.timestamp_format));
    tracing::info!("taskboard exiting");

    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Initialize logging.
///
/// Logs go to `file_path` when given, otherwise to stderr so they never mix
/// with the board on stdout. Returns a [`WorkerGuard`] that must be held
/// until shutdown to ensure all buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let Some(log_path) = file_path else {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(env_filter)
            .init();
        return None;
    };

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Loads the collection and performs `command`. Returns `false` if anything
/// failed; the failure itself is in the store's state.
async fn run(store: &TaskStore<HttpTaskService>, command: Command) -> bool {
    if store.load_all().await.is_err() {
        return false;
    }

    match command {
        Command::List | Command::Health => true,
        Command::Add { title, description } => {
            let mut form = TaskForm::new(title);
            if let Some(description) = description {
                form = form.with_description(description);
            }
            submit(store, &form).await
        }
        Command::Edit {
            id,
            title,
            description,
        } => {
            let Some(task) = store.snapshot().find(id).cloned() else {
                eprintln!("error: no task #{id}");
                return false;
            };
            let mut form = TaskForm::from_task(&task);
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(description) = description {
                form.description = description;
            }
            store.select_for_edit(Some(&task));
            submit(store, &form).await
        }
        Command::Toggle { id } => match store.toggle_status(id).await {
            Ok(Some(_)) => true,
            Ok(None) => {
                eprintln!("error: no task #{id}");
                false
            }
            Err(_) => false,
        },
        Command::Rm { id, yes } => {
            if !yes && !confirm_delete(id) {
                println!("Cancelled.");
                return true;
            }
            store.remove(id).await.is_ok()
        }
    }
}

async fn submit(store: &TaskStore<HttpTaskService>, form: &TaskForm) -> bool {
    match store.submit(form).await {
        Ok(task) => {
            tracing::debug!(task_id = %task.id, "submitted");
            true
        }
        Err(SubmitError::Invalid(e)) => {
            eprintln!("error: {e}");
            false
        }
        // Already recorded in the state and shown on the board.
        Err(SubmitError::Failed(_)) => false,
    }
}

/// Asks on stdin; anything but `y`/`yes` declines.
fn confirm_delete(id: TaskId) -> bool {
    print!("Delete task #{id}? [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
