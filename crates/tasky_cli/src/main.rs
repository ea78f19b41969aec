//! `tasky` command-line entry point.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::CliConfig;
use log::{error, info};
use std::path::{Path, PathBuf};
use tasky_core::db::open_db;
use tasky_core::{
    init_logging, SqliteTaskRepository, Task, TaskId, TaskManager, TaskPriority, Timestamp,
};

#[derive(Parser)]
#[command(name = "tasky", version, about = "Personal task tracker")]
struct Cli {
    /// SQLite database file (overrides TASKY_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a task.
    Add {
        title: String,
        /// Days from now until the task is due.
        #[arg(long, allow_hyphen_values = true)]
        due_in_days: Option<i64>,
    },
    /// Show relevant tasks, or every task with `--all`.
    List {
        #[arg(long)]
        all: bool,
    },
    /// Mark a task done.
    Done { id: TaskId },
    /// Reopen a done task.
    Undo { id: TaskId },
    /// Hide a task for a number of days.
    Postpone {
        id: TaskId,
        #[arg(long)]
        days: i64,
    },
    /// Change task priority (high, normal, low).
    Priority { id: TaskId, priority: TaskPriority },
}

impl Command {
    /// Stable name used in log events.
    fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::List { .. } => "list",
            Self::Done { .. } => "done",
            Self::Undo { .. } => "undo",
            Self::Postpone { .. } => "postpone",
            Self::Priority { .. } => "priority",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::from_env(cli.db);

    if let Some(log_dir) = &config.log_dir {
        let log_dir = absolute(Path::new(log_dir))?;
        init_logging(&config.log_level, &log_dir.to_string_lossy())
            .context("failed to initialize logging")?;
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open database `{}`", config.db_path.display()))?;
    let manager = TaskManager::new(SqliteTaskRepository::new(&conn));

    let command = cli.command.name();
    match run(&manager, cli.command) {
        Ok(()) => {
            info!("event=cli_command module=cli status=ok command={command}");
            Ok(())
        }
        Err(err) => {
            error!("event=cli_command module=cli status=error command={command} error={err}");
            Err(err)
        }
    }
}

fn run(manager: &TaskManager<SqliteTaskRepository<'_>>, command: Command) -> Result<()> {
    match command {
        Command::Add { title, due_in_days } => {
            let due_date = due_in_days.map(|days| Timestamp::now().plus_days(days));
            let task = manager.create_task(title, due_date)?;
            println!("created {}", render(&task));
        }
        Command::List { all } => {
            let tasks = if all {
                manager.list_all_tasks()?
            } else {
                manager.get_relevant_tasks()?
            };
            for task in &tasks {
                println!("{}", render(task));
            }
        }
        Command::Done { id } => {
            manager.set_task_done(id)?;
            println!("task {id} done");
        }
        Command::Undo { id } => {
            manager.revert_task_done(id)?;
            println!("task {id} reopened");
        }
        Command::Postpone { id, days } => {
            let until = Timestamp::now().plus_days(days);
            manager.postpone_task(id, until)?;
            println!("task {id} postponed until {until}");
        }
        Command::Priority { id, priority } => {
            manager.change_task_priority(id, priority)?;
            println!("task {id} priority {priority}");
        }
    }

    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    Ok(cwd.join(path))
}

fn render(task: &Task) -> String {
    let mut line = format!(
        "#{} [{}] {}",
        task.id.unwrap_or_default(),
        task.priority,
        task.title
    );
    if let Some(due) = task.due_date {
        line.push_str(&format!(" due={due}"));
    }
    if let Some(until) = task.postponed_until {
        line.push_str(&format!(" postponed_until={until}"));
    }
    if task.is_done() {
        line.push_str(" (done)");
    }
    line
}
