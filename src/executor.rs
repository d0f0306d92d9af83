use serde::{Deserialize, Serialize};

use crate::action::ItemAction;
use crate::app::App;
use crate::command::Command;
use crate::navigator::NavigationSnapshot;
use crate::tree::FileNode;

/// Explorer state after a command, as written by `exec`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub command: String,
    pub changed: bool,
    /// Full address bar text, prefix included
    pub breadcrumb: String,
    /// `None` when there is nothing to explore
    pub navigation: Option<NavigationSnapshot>,
    pub last_navigation: Option<ItemAction>,
    pub status_message: String,
}

/// Applies commands to a live app, without a terminal
pub struct Executor;

impl Executor {
    pub fn execute(app: &mut App, command: &Command) -> ExecutionResult {
        let changed = Self::apply(app, command);
        log::debug!("executor: {} changed={}", command, changed);

        ExecutionResult {
            command: command.to_string(),
            changed,
            breadcrumb: app.breadcrumb(),
            navigation: Self::navigation(app),
            last_navigation: app.last_navigation.clone(),
            status_message: app.status_message.clone(),
        }
    }

    fn apply(app: &mut App, command: &Command) -> bool {
        match command {
            Command::Back => app.go_back(),
            Command::Forward => app.go_forward(),
            Command::CloseDocument => app.close_document(),
            Command::Activate(target) => match Self::resolve_target(app, target) {
                Some(node) => {
                    let before = Self::navigation(app);
                    match app.activate(node) {
                        ItemAction::NavigateExternal(_) | ItemAction::NavigateInternal(_) => true,
                        _ => Self::navigation(app) != before,
                    }
                }
                None => false,
            },
            Command::ToggleExpand(target) => match Self::resolve_target(app, target) {
                Some(node) => app.toggle_expand(&node.id),
                None => false,
            },
            Command::Enter(target) => match Self::resolve_target(app, target) {
                Some(node) if node.is_folder() => app.enter(node),
                Some(node) => {
                    app.status_message = format!("{} is not a folder", node.name);
                    false
                }
                None => false,
            },
            Command::Sequence(commands) => commands
                .iter()
                .fold(false, |changed, cmd| Self::apply(app, cmd) || changed),
        }
    }

    fn navigation(app: &App) -> Option<NavigationSnapshot> {
        app.explorer
            .as_ref()
            .map(|nav| nav.snapshot(&app.config.layout.breadcrumb_separator))
    }

    /// Look a node up by id first, then by display name
    fn resolve_target(app: &mut App, target: &str) -> Option<FileNode> {
        let found = app
            .tree
            .find_node(target)
            .or_else(|| app.tree.find_by_name(target))
            .cloned();
        if found.is_none() {
            app.status_message = format!("Not found: {}", target);
        }
        found
    }
}
