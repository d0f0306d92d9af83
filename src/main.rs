use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc, time::Duration};
use tokio::sync::mpsc;

use portfolio_explorer::app::App;
use portfolio_explorer::async_task::{self, Task, TaskResult};
use portfolio_explorer::cli::{Cli, Commands};
use portfolio_explorer::config::Config;
use portfolio_explorer::error::Result;
use portfolio_explorer::store::RecordStore;
use portfolio_explorer::{event, main_lib, ui};

const LOG_ENV_VAR: &str = "PORTFOLIO_EXPLORER_LOG";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Run));
    init_logging(interactive);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(store) = &cli.store {
        config.store_path = store.clone();
    }
    let store = main_lib::open_store(&config, cli.in_memory);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_interactive(config, store).await,
        Commands::Tree { json } => {
            let tree = async_task::load_tree(store).await?;
            print!("{}", main_lib::render_tree(&tree, json)?);
            Ok(())
        }
        Commands::Add {
            name,
            item_type,
            parent,
            text,
            href,
        } => {
            let record = main_lib::add_item(store.as_ref(), &name, item_type, parent.as_deref(), text, href)?;
            println!("{}", record.id);
            Ok(())
        }
        Commands::Update {
            id,
            name,
            text,
            href,
            clear_href,
            parent,
            root,
            item_type,
        } => {
            let patch = main_lib::build_patch(name, text, href, clear_href, parent, root, item_type);
            let record = portfolio_explorer::admin::update_item(store.as_ref(), &id, patch)?;
            println!("Updated {} ({})", record.name, record.id);
            Ok(())
        }
        Commands::Remove { id } => {
            let removed = portfolio_explorer::admin::remove_item(store.as_ref(), &id)?;
            println!("Removed {} records", removed);
            Ok(())
        }
        Commands::Exec {
            command,
            output,
            screenshot,
            width,
            height,
        } => {
            let mut app = App::new(config);
            app.set_tree(async_task::load_tree(store).await?);
            main_lib::execute_command(&mut app, &command, output.as_deref(), screenshot, width, height)
        }
    }
}

// The TUI owns stdout, so it only logs to a file and only when asked for.
// One-shot subcommands log to stderr under RUST_LOG.
fn init_logging(interactive: bool) {
    if let Ok(log_file) = std::env::var(LOG_ENV_VAR) {
        match std::fs::OpenOptions::new().create(true).append(true).open(&log_file) {
            Ok(file) => {
                env_logger::Builder::new()
                    .target(env_logger::Target::Pipe(Box::new(file)))
                    .filter_level(log::LevelFilter::Debug)
                    .init();
                log::info!("Portfolio Explorer starting up");
            }
            Err(e) => eprintln!("Cannot open log file {}: {}", log_file, e),
        }
    } else if !interactive {
        env_logger::init();
    }
}

async fn run_interactive(config: Config, store: Arc<dyn RecordStore>) -> Result<()> {
    let mut app = App::new(config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup async task channels
    let (task_sender, task_receiver) = mpsc::channel::<Task>(32);
    let (result_sender, mut result_receiver) = mpsc::channel::<TaskResult>(32);

    // Start background worker
    let worker_handle = tokio::spawn(async_task::run_worker(task_receiver, result_sender, store));

    // Load initial data
    log::info!("main: sending LoadTree task");
    event::request_reload(&mut app, &task_sender);

    let outcome = run_loop(&mut terminal, &mut app, &task_sender, &mut result_receiver);

    // Cleanup
    worker_handle.abort();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    task_sender: &mpsc::Sender<Task>,
    result_receiver: &mut mpsc::Receiver<TaskResult>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if crossterm::event::poll(tick_rate)? {
            let event = crossterm::event::read()?;
            if let Err(e) = event::handle_event(event, app, task_sender) {
                app.status_message = format!("Error handling event: {}", e);
            }
        }

        // Handle async task results
        while let Ok(result) = result_receiver.try_recv() {
            if let Some(follow_up) = main_lib::handle_task_result(app, result) {
                let message = app.status_message.clone();
                event::send_task(app, task_sender, follow_up, &message);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
