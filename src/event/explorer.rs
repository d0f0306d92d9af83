use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, PanelFocus};
use crate::event::EventResult;

pub fn handle_explorer_event(key: KeyEvent, app: &mut App) -> EventResult {
    let keys = &app.config.keybindings;
    let (back, forward, toggle_expand) = (keys.back, keys.forward, keys.toggle_expand);

    let changed = match key.code {
        KeyCode::Tab | KeyCode::BackTab => {
            app.next_panel();
            true
        }
        KeyCode::Up => app.move_up(),
        KeyCode::Down => app.move_down(),
        KeyCode::Enter => {
            if let Some(action) = app.activate_selected() {
                log::debug!("explorer: activated selection -> {:?}", action);
            }
            true
        }
        KeyCode::Backspace => app.go_back(),
        KeyCode::Char(c) if c == back => app.go_back(),
        KeyCode::Char(c) if c == forward => app.go_forward(),
        KeyCode::Char(c) if c == toggle_expand && app.active_panel == PanelFocus::SideTree => {
            app.toggle_selected_expand()
        }
        _ => return Ok(false),
    };

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::handle_event;
    use crate::event::tests::{create_test_app, key};
    use crate::async_task::Task;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_enter_descends_and_brackets_navigate() {
        let mut app = create_test_app();
        let (task_sender, _task_receiver) = mpsc::channel::<Task>(8);

        // First child of "This PC" is the C: drive
        handle_event(key(KeyCode::Enter), &mut app, &task_sender).unwrap();
        assert_eq!(app.breadcrumb(), "C:\\This PC > Local Disk (C:)");

        assert!(handle_event(key(KeyCode::Char('[')), &mut app, &task_sender).unwrap());
        assert_eq!(app.breadcrumb(), "C:\\This PC");

        assert!(handle_event(key(KeyCode::Char(']')), &mut app, &task_sender).unwrap());
        assert_eq!(app.breadcrumb(), "C:\\This PC > Local Disk (C:)");

        // Already at the end of history
        assert!(!handle_event(key(KeyCode::Char(']')), &mut app, &task_sender).unwrap());
    }

    #[tokio::test]
    async fn test_side_tree_space_toggles() {
        let mut app = create_test_app();
        let (task_sender, _task_receiver) = mpsc::channel::<Task>(8);

        handle_event(key(KeyCode::Tab), &mut app, &task_sender).unwrap();
        assert_eq!(app.active_panel, PanelFocus::SideTree);

        // Move to "Local Disk (C:)" and expand it
        handle_event(key(KeyCode::Down), &mut app, &task_sender).unwrap();
        assert!(handle_event(key(KeyCode::Char(' ')), &mut app, &task_sender).unwrap());
        assert!(app.explorer.as_ref().unwrap().is_expanded("drive-c"));
        assert_eq!(app.side_tree_rows().len(), 6);
    }

    #[tokio::test]
    async fn test_unknown_key_is_ignored() {
        let mut app = create_test_app();
        let (task_sender, _task_receiver) = mpsc::channel::<Task>(8);
        assert!(!handle_event(key(KeyCode::Char('z')), &mut app, &task_sender).unwrap());
    }
}
