//! `todoterm`: terminal task list kept in sync with a REST todo service.
//!
//! Configuration via CLI flags, environment variables, or config file
//! (`~/.config/todoterm/config.toml`).
//!
//! ```bash
//! # Offline demo mode
//! cargo run --bin todoterm -- --offline
//!
//! # Against a local todoterm-server
//! cargo run --bin todoterm-server &
//! cargo run --bin todoterm -- --base-url http://127.0.0.1:3000 --user-id 2392
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use todoterm::api::TodoApi;
use todoterm::api::http::HttpTodoApi;
use todoterm::api::memory::InMemoryTodoApi;
use todoterm::app::{Action, App, UiEvent};
use todoterm::config::{CliArgs, ClientConfig};
use todoterm::controller::TodoController;
use todoterm::ui;
use todoterm_proto::{Task, TaskId, UserId};

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Logs go to a file, ratatui owns the terminal.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(offline = config.offline, "todoterm starting");

    let result = if config.offline {
        let api = InMemoryTodoApi::with_tasks(demo_tasks(config.user_id))
            .with_latency(config.offline_latency);
        run_terminal(api, "offline demo".to_string(), &config).await
    } else {
        let api = HttpTodoApi::new(&config.base_url).map_err(io::Error::other)?;
        run_terminal(api, config.base_url.clone(), &config).await
    };

    tracing::info!("todoterm exiting");
    result
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("todoterm.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Sets up the terminal, runs the app and restores the terminal.
async fn run_terminal<A: TodoApi + 'static>(
    api: A,
    source: String,
    config: &ClientConfig,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, api, source, config).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

/// Main application loop.
///
/// Transitions run as spawned tasks; the loop only draws the latest state
/// and turns key presses into actions.
async fn run_app<A: TodoApi + 'static>(
    terminal: &mut Tui,
    api: A,
    source: String,
    config: &ClientConfig,
) -> io::Result<()> {
    let controller = Arc::new(TodoController::with_error_timeout(
        api,
        config.user_id,
        config.error_timeout,
    ));
    let mut state_rx = controller.store().subscribe();
    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel();
    let mut app = App::new(source);

    tokio::spawn({
        let controller = Arc::clone(&controller);
        async move {
            let _ = controller.load().await;
        }
    });

    loop {
        while let Ok(event) = ui_rx.try_recv() {
            app.apply_ui_event(event);
        }

        let state = state_rx.borrow_and_update().clone();
        app.sync(&state);
        terminal.draw(|frame| ui::draw(frame, &app, &state))?;

        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(action) = app.handle_key_event(key, &state)
        {
            dispatch(&controller, action, &ui_tx);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Runs `action` against the controller. Remote transitions are spawned.
fn dispatch<A: TodoApi + 'static>(
    controller: &Arc<TodoController<A>>,
    action: Action,
    ui_tx: &mpsc::UnboundedSender<UiEvent>,
) {
    match action {
        Action::SetInput(text) => controller.set_input(text),
        Action::SetFilter(filter) => controller.set_filter(filter),
        Action::DismissError => controller.dismiss_error(),
        Action::CommitEdit { id, draft } => {
            let controller = Arc::clone(controller);
            let ui_tx = ui_tx.clone();
            tokio::spawn(async move {
                let event = match controller.commit_title(id, &draft).await {
                    Ok(_) => UiEvent::EditFinished(id),
                    Err(_) => UiEvent::EditRejected(id),
                };
                let _ = ui_tx.send(event);
            });
        }
        remote => {
            let controller = Arc::clone(controller);
            tokio::spawn(async move {
                let result = match remote {
                    Action::Submit => controller.submit().await.map(drop),
                    Action::Toggle(id) => controller.toggle(id).await,
                    Action::ToggleAll => controller.toggle_all().await,
                    Action::Delete(id) => controller.delete(id).await,
                    Action::ClearCompleted => controller.clear_completed().await,
                    _ => Ok(()),
                };
                if let Err(e) = result {
                    tracing::debug!(error = %e, "transition failed");
                }
            });
        }
    }
}

/// Seed list of the offline demo.
fn demo_tasks(user_id: UserId) -> Vec<Task> {
    [
        ("Read the todoterm README", true),
        ("Add a task with Enter", false),
        ("Toggle it with Space", false),
        ("Rename it with e", false),
    ]
    .into_iter()
    .zip(1..)
    .map(|((title, completed), id)| Task {
        id: TaskId::new(id),
        title: title.to_string(),
        completed,
        user_id,
    })
    .collect()
}
