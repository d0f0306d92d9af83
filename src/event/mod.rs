use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use crate::app::{App, ViewMode};
use crate::async_task::Task;

pub mod admin;
pub mod explorer;

pub use admin::*;
pub use explorer::*;

/// `Ok(true)` when the UI needs a redraw
pub type EventResult = Result<bool, Box<dyn std::error::Error>>;

pub fn handle_event(event: Event, app: &mut App, async_sender: &mpsc::Sender<Task>) -> EventResult {
    let key = match event {
        Event::Key(key) => key,
        // Resize is picked up by the next draw
        Event::Resize(_, _) => return Ok(true),
        _ => return Ok(false),
    };
    if key.kind != KeyEventKind::Press {
        return Ok(false);
    }

    // An open admin prompt swallows every key
    if app.admin.input.is_some() {
        return handle_admin_input(key, app, async_sender);
    }

    // So does the notepad, until it is closed
    if app.opened_document().is_some() {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter => Ok(app.close_document()),
            KeyCode::Char(c) if c == app.config.keybindings.quit => Ok(app.close_document()),
            _ => Ok(false),
        };
    }

    let keys = app.config.keybindings.clone();
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return Ok(false);
        }
        KeyCode::Esc => {
            app.should_quit = true;
            return Ok(false);
        }
        KeyCode::Char(c) if c == keys.quit => {
            app.should_quit = true;
            return Ok(false);
        }
        KeyCode::Char(c) if c == keys.toggle_view => {
            app.toggle_view();
            return Ok(true);
        }
        KeyCode::Char(c) if c == keys.reload => {
            request_reload(app, async_sender);
            return Ok(true);
        }
        _ => {}
    }

    match app.view {
        ViewMode::Explorer => handle_explorer_event(key, app),
        ViewMode::Admin => handle_admin_event(key, app, async_sender),
    }
}

/// Ask the worker for a fresh snapshot of the store
pub fn request_reload(app: &mut App, async_sender: &mpsc::Sender<Task>) {
    send_task(app, async_sender, Task::LoadTree, "Loading...");
}

/// Queue a worker task without blocking the UI loop
pub fn send_task(app: &mut App, async_sender: &mpsc::Sender<Task>, task: Task, message: &str) {
    app.is_loading = true;
    app.status_message = message.to_string();
    if let Err(e) = async_sender.try_send(task) {
        log::error!("event: failed to queue task: {}", e);
        app.is_loading = false;
        app.status_message = format!("Failed to start task: {}", e);
    }
}
