use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;

use crate::app::App;
use crate::async_task::Task;
use crate::event::{send_task, EventResult};
use crate::record::ItemType;

pub fn handle_admin_event(key: KeyEvent, app: &mut App, task_sender: &mpsc::Sender<Task>) -> EventResult {
    let keys = &app.config.keybindings;
    let (new_folder, new_file, delete) = (keys.new_folder, keys.new_file, keys.delete);
    let (rename, move_item) = (keys.rename, keys.move_item);

    let changed = match key.code {
        KeyCode::Up => app.move_up(),
        KeyCode::Down => app.move_down(),
        KeyCode::Enter => {
            app.admin_pick_selected();
            true
        }
        KeyCode::Char(c) if c == new_folder => {
            app.start_admin_input(ItemType::Folder);
            true
        }
        KeyCode::Char(c) if c == new_file => {
            app.start_admin_input(ItemType::File);
            true
        }
        KeyCode::Char(c) if c == rename => app.start_admin_rename(),
        KeyCode::Char(c) if c == move_item => match app.admin_move_selected() {
            Some(task) => {
                let message = app.status_message.clone();
                send_task(app, task_sender, task, &message);
                true
            }
            None => false,
        },
        KeyCode::Char(c) if c == delete => match app.admin_delete_selected() {
            Some(task) => {
                let message = app.status_message.clone();
                send_task(app, task_sender, task, &message);
                true
            }
            None => false,
        },
        _ => return Ok(false),
    };

    Ok(changed)
}

/// Keys while an admin prompt is open
pub fn handle_admin_input(key: KeyEvent, app: &mut App, task_sender: &mpsc::Sender<Task>) -> EventResult {
    let Some(input) = app.admin.input.as_mut() else {
        return Ok(false);
    };

    match key.code {
        KeyCode::Char(c) => input.buffer.push(c),
        KeyCode::Backspace => {
            input.buffer.pop();
        }
        KeyCode::Esc => {
            app.admin.input = None;
            app.status_message = "Cancelled".to_string();
        }
        KeyCode::Enter => {
            if let Some(task) = app.submit_admin_input() {
                let message = app.status_message.clone();
                send_task(app, task_sender, task, &message);
            }
        }
        _ => return Ok(false),
    }

    Ok(true)
}
