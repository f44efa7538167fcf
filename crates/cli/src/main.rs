mod config;
mod error;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use runtime::{Agent, AnthropicBackend, TaskExecutor, TaskRequest, TaskState, TripToolHost};
use storage::{Event, EventKind, EventStore, Role};

use config::Config;
use error::{Error, Result};

const CONFIG_FILE: &str = "waypoint.toml";

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(about = "A trip-planning assistant combining partner data with weather forecasts", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session
    Chat,
    /// Ask a single question and print the answer
    Ask {
        /// The question, e.g. "What's the weather at Acme Corp next week?"
        query: String,
    },
    /// List executed tasks
    Tasks {
        /// Show only the last N tasks
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Show the event log for a task
    Logs {
        /// Task ID (prefix match supported)
        #[arg(short, long)]
        task: String,
        /// Filter by event kind (message, tool_call, tool_result)
        #[arg(short, long)]
        kind: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Chat) | None => cmd_chat().await,
        Some(Commands::Ask { query }) => cmd_ask(&query).await,
        Some(Commands::Tasks { limit }) => cmd_tasks(limit),
        Some(Commands::Logs { task, kind }) => cmd_logs(&task, kind.as_deref()),
    }
}

fn load_config() -> Result<Config> {
    if std::path::Path::new(CONFIG_FILE).exists() {
        Ok(Config::load(CONFIG_FILE)?)
    } else {
        Ok(Config::default())
    }
}

fn build_executor(config: &Config) -> Result<TaskExecutor<AnthropicBackend, TripToolHost>> {
    let backend = AnthropicBackend::builder(config.anthropic_api_key()?, config.model()).build();
    let tools = TripToolHost::new(config.partner_directory()?, config.weather_client());

    let data_dir = dirs_data_dir().unwrap_or_else(|| ".waypoint".into());
    std::fs::create_dir_all(&data_dir)?;
    let store = EventStore::open(data_dir.join("events.db"))?;

    Ok(TaskExecutor::new(Agent::new(backend, tools, store)))
}

/// Run one task and stream its updates to the terminal. Returns the
/// final answer so the chat loop can extend its context.
async fn run_task(
    executor: &TaskExecutor<AnthropicBackend, TripToolHost>,
    request: TaskRequest,
    show_progress: bool,
) -> String {
    let (tx, mut rx) = mpsc::channel::<runtime::TaskUpdate>(8);
    let mut answer = String::new();

    let printer = async {
        while let Some(update) = rx.recv().await {
            match update.state {
                TaskState::Working => {
                    if show_progress {
                        println!("  [{}]", update.content);
                    }
                }
                TaskState::Completed | TaskState::InputRequired => {
                    answer = update.content;
                }
            }
        }
    };

    let (_task_id, ()) = tokio::join!(executor.execute(request, tx), printer);
    answer
}

async fn cmd_chat() -> Result<()> {
    println!("waypoint v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    let executor = build_executor(&config)?;
    let context_id = uuid::Uuid::new_v4().to_string();

    println!("Model: {}", config.model());
    println!(
        "Weather source: {}",
        if config.weather_client().is_live() {
            "openweathermap"
        } else {
            "offline mock"
        }
    );
    println!("Type 'quit' or Ctrl+D to exit.\n");

    let mut context: Vec<runtime::Message> = Vec::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "exit" {
            break;
        }

        let request =
            TaskRequest::new(input, context_id.clone()).with_context(context.clone());
        let answer = run_task(&executor, request, true).await;
        println!("\n{answer}\n");

        context.push(runtime::Message::user(input));
        context.push(runtime::Message::assistant(answer));
    }

    println!("\nBye.");
    Ok(())
}

async fn cmd_ask(query: &str) -> Result<()> {
    let config = load_config()?;
    let executor = build_executor(&config)?;

    let context_id = uuid::Uuid::new_v4().to_string();
    let answer = run_task(&executor, TaskRequest::new(query, context_id), false).await;
    println!("{answer}");
    Ok(())
}

fn cmd_tasks(limit: usize) -> Result<()> {
    let store = open_store()?;
    let tasks = store.list_tasks()?;

    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    println!("{:<36}  {:<20}  {:<8}  STATUS", "TASK ID", "STARTED", "MSGS");
    println!("{}", "-".repeat(80));

    for summary in tasks.into_iter().take(limit) {
        let started = Local
            .from_utc_datetime(&summary.started_at.naive_utc())
            .format("%Y-%m-%d %H:%M");
        let status = if summary.ended_at.is_some() {
            "completed"
        } else {
            "running"
        };
        println!(
            "{:<36}  {:<20}  {:<8}  {status}",
            summary.id, started, summary.message_count
        );
    }

    Ok(())
}

fn cmd_logs(task_prefix: &str, kind_filter: Option<&str>) -> Result<()> {
    let store = open_store()?;
    let task_id = store.find_task(task_prefix)?;
    let events = store.load_events(task_id, kind_filter)?;

    if events.is_empty() {
        println!("No events found for task {task_id}");
        return Ok(());
    }

    println!("Task: {task_id}\n");
    for event in events {
        print_event(&event);
    }

    Ok(())
}

fn print_event(event: &Event) {
    let time = Local
        .from_utc_datetime(&event.timestamp.naive_utc())
        .format("%H:%M:%S");

    match &event.kind {
        EventKind::TaskStart { context_id } => {
            println!("[{time}] === Task started (context {context_id}) ===");
        }
        EventKind::TaskEnd => {
            println!("[{time}] === Task completed ===");
        }
        EventKind::Message { role, content } => {
            let role_str = match role {
                Role::User => "USER",
                Role::Assistant => "ASSISTANT",
                Role::System => "SYSTEM",
            };
            // Truncate long messages for display
            let display_content = match content.char_indices().nth(200) {
                Some((idx, _)) => format!("{}...", &content[..idx]),
                None => content.clone(),
            };
            println!("[{time}] {role_str}: {display_content}");
        }
        EventKind::ToolCall { name, input } => {
            println!("[{time}] TOOL CALL: {name} {input}");
        }
        EventKind::ToolResult { name, output } => {
            println!("[{time}] TOOL RESULT: {name} {output}");
        }
    }
}

fn open_store() -> Result<EventStore> {
    let data_dir = dirs_data_dir().unwrap_or_else(|| ".waypoint".into());
    let db_path = data_dir.join("events.db");

    if !db_path.exists() {
        return Err(Error::DatabaseNotFound { path: db_path });
    }

    Ok(EventStore::open(&db_path)?)
}

fn dirs_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share/waypoint"))
    }
    #[cfg(target_os = "linux")]
    {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share")))
            .map(|p| p.join("waypoint"))
    }
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|h| PathBuf::from(h).join("waypoint"))
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}
