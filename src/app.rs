use serde::{Deserialize, Serialize};

use crate::action::{resolve_action, ItemAction};
use crate::admin::{AdminPicker, ItemDraft};
use crate::async_task::Task;
use crate::config::Config;
use crate::navigator::{NavigationState, NavigatorEvent};
use crate::record::{ItemType, RecordPatch};
use crate::tree::{FileNode, FileTree};

/// Which surface is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ViewMode {
    #[default]
    Explorer,
    Admin,
}

/// Focused pane inside the explorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PanelFocus {
    SideTree,
    #[default]
    Contents,
}

/// Draft field a create prompt is filling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Text,
    Href,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminInputKind {
    /// Folders only ask for a name; files go on to text and link
    Create { draft: ItemDraft, field: DraftField },
    Rename { id: String },
}

/// Inline admin prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminInput {
    pub kind: AdminInputKind,
    pub buffer: String,
}

impl AdminInput {
    pub fn title(&self) -> String {
        match &self.kind {
            AdminInputKind::Create {
                draft,
                field: DraftField::Name,
            } => format!(" New {} name ", draft.item_type),
            AdminInputKind::Create {
                field: DraftField::Text,
                ..
            } => " Text (optional) ".to_string(),
            AdminInputKind::Create {
                field: DraftField::Href,
                ..
            } => " Link (optional) ".to_string(),
            AdminInputKind::Rename { .. } => " Rename ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdminState {
    pub picker: AdminPicker,
    /// Row 0 is the root entry, rows 1.. are tree nodes
    pub cursor: usize,
    pub input: Option<AdminInput>,
}

pub struct App {
    pub config: Config,
    pub tree: FileTree,
    pub explorer: Option<NavigationState>,
    pub view: ViewMode,
    pub active_panel: PanelFocus,
    pub should_quit: bool,

    // Explorer panes
    pub side_tree_cursor: usize,
    pub contents_cursor: usize,
    /// Link resolved by the last activation; a terminal cannot follow it
    pub last_navigation: Option<ItemAction>,

    pub admin: AdminState,

    // UI State
    pub status_message: String,
    pub is_loading: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tree: FileTree::new(),
            explorer: None,
            view: ViewMode::Explorer,
            active_panel: PanelFocus::Contents,
            should_quit: false,

            side_tree_cursor: 0,
            contents_cursor: 0,
            last_navigation: None,

            admin: AdminState::default(),

            status_message: "Ready".to_string(),
            is_loading: false,
        }
    }

    /// Replace the tree snapshot and re-seed the explorer at the first root
    pub fn set_tree(&mut self, tree: FileTree) {
        self.explorer = NavigationState::from_tree(&tree);
        self.admin.picker.revalidate(&tree);
        self.tree = tree;

        self.side_tree_cursor = 0;
        self.contents_cursor = 0;
        self.admin.cursor = self.admin.cursor.min(self.admin_row_count().saturating_sub(1));

        self.status_message = if self.tree.violations.is_empty() {
            format!("Loaded {} items", self.tree.get_stats().total_nodes)
        } else {
            format!(
                "Loaded {} items ({} integrity issues)",
                self.tree.get_stats().total_nodes,
                self.tree.violations.len()
            )
        };
    }

    /// A failed read leaves an empty tree rather than partial data
    pub fn load_failed(&mut self, message: &str) {
        self.tree = FileTree::new();
        self.explorer = None;
        self.side_tree_cursor = 0;
        self.contents_cursor = 0;
        self.status_message = format!("Error: {}", message);
    }

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            ViewMode::Explorer => ViewMode::Admin,
            ViewMode::Admin => ViewMode::Explorer,
        };
        self.admin.input = None;
    }

    pub fn next_panel(&mut self) {
        self.active_panel = match self.active_panel {
            PanelFocus::SideTree => PanelFocus::Contents,
            PanelFocus::Contents => PanelFocus::SideTree,
        };
    }

    pub fn breadcrumb(&self) -> String {
        match &self.explorer {
            Some(nav) => format!(
                "{}{}",
                self.config.layout.path_prefix,
                nav.breadcrumb(&self.config.layout.breadcrumb_separator)
            ),
            None => self.config.layout.path_prefix.clone(),
        }
    }

    /// Side tree rows honouring the explorer's expansion set
    pub fn side_tree_rows(&self) -> Vec<(&FileNode, usize)> {
        match &self.explorer {
            Some(nav) => self.tree.visible_nodes_with_depth(nav.expanded()),
            None => Vec::new(),
        }
    }

    /// Children of the folder currently displayed
    pub fn contents(&self) -> &[FileNode] {
        match &self.explorer {
            Some(nav) => &nav.current().children,
            None => &[],
        }
    }

    pub fn selected_node(&self) -> Option<FileNode> {
        match self.active_panel {
            PanelFocus::SideTree => self
                .side_tree_rows()
                .get(self.side_tree_cursor)
                .map(|(node, _)| (*node).clone()),
            PanelFocus::Contents => self.contents().get(self.contents_cursor).cloned(),
        }
    }

    pub fn move_up(&mut self) -> bool {
        let cursor = match self.view {
            ViewMode::Admin => &mut self.admin.cursor,
            ViewMode::Explorer => match self.active_panel {
                PanelFocus::SideTree => &mut self.side_tree_cursor,
                PanelFocus::Contents => &mut self.contents_cursor,
            },
        };
        if *cursor > 0 {
            *cursor -= 1;
            true
        } else {
            false
        }
    }

    pub fn move_down(&mut self) -> bool {
        let len = match self.view {
            ViewMode::Admin => self.admin_row_count(),
            ViewMode::Explorer => match self.active_panel {
                PanelFocus::SideTree => self.side_tree_rows().len(),
                PanelFocus::Contents => self.contents().len(),
            },
        };
        let cursor = match self.view {
            ViewMode::Admin => &mut self.admin.cursor,
            ViewMode::Explorer => match self.active_panel {
                PanelFocus::SideTree => &mut self.side_tree_cursor,
                PanelFocus::Contents => &mut self.contents_cursor,
            },
        };
        if *cursor + 1 < len {
            *cursor += 1;
            true
        } else {
            false
        }
    }

    /// Resolve what activating `node` means and apply it. Returns the decision.
    pub fn activate(&mut self, node: FileNode) -> ItemAction {
        let action = resolve_action(&node);
        if self.explorer.is_none() {
            return action;
        }

        match &action {
            ItemAction::Descend => {
                self.enter(node);
            }
            ItemAction::OpenText => {
                let name = node.name.clone();
                let opened = self
                    .explorer
                    .as_mut()
                    .is_some_and(|nav| nav.handle_event(NavigatorEvent::OpenDocument(node)));
                if opened {
                    self.status_message = format!("{} - Notepad", name);
                }
            }
            ItemAction::NavigateExternal(href) => {
                self.status_message = format!("Open in new window: {}", href);
                self.last_navigation = Some(action.clone());
            }
            ItemAction::NavigateInternal(href) => {
                self.status_message = format!("Navigate to {}", href);
                self.last_navigation = Some(action.clone());
            }
            ItemAction::Noop => {}
        }
        action
    }

    /// Descend into a folder. Returns whether the explorer moved; entering
    /// the folder already shown, or a file, changes nothing.
    pub fn enter(&mut self, node: FileNode) -> bool {
        let Some(nav) = self.explorer.as_mut() else {
            return false;
        };
        let name = node.name.clone();
        let moved = nav.handle_event(NavigatorEvent::Enter(node));
        if moved {
            self.contents_cursor = 0;
            self.status_message = format!("Opened {}", name);
        }
        moved
    }

    pub fn activate_selected(&mut self) -> Option<ItemAction> {
        let node = self.selected_node()?;
        Some(self.activate(node))
    }

    pub fn go_back(&mut self) -> bool {
        let moved = self
            .explorer
            .as_mut()
            .map(|nav| nav.handle_event(NavigatorEvent::GoBack))
            .unwrap_or(false);
        if moved {
            self.contents_cursor = 0;
        }
        moved
    }

    pub fn go_forward(&mut self) -> bool {
        let moved = self
            .explorer
            .as_mut()
            .map(|nav| nav.handle_event(NavigatorEvent::GoForward))
            .unwrap_or(false);
        if moved {
            self.contents_cursor = 0;
        }
        moved
    }

    pub fn toggle_expand(&mut self, id: &str) -> bool {
        match self.explorer.as_mut() {
            Some(nav) => nav.handle_event(NavigatorEvent::ToggleExpand(id.to_string())),
            None => false,
        }
    }

    /// Toggle the side tree row under the cursor
    pub fn toggle_selected_expand(&mut self) -> bool {
        let id = self
            .side_tree_rows()
            .get(self.side_tree_cursor)
            .filter(|(node, _)| node.is_folder())
            .map(|(node, _)| node.id.clone());
        match id {
            Some(id) => self.toggle_expand(&id),
            None => false,
        }
    }

    pub fn close_document(&mut self) -> bool {
        match self.explorer.as_mut() {
            Some(nav) => nav.handle_event(NavigatorEvent::CloseDocument),
            None => false,
        }
    }

    pub fn opened_document(&self) -> Option<&FileNode> {
        self.explorer.as_ref().and_then(NavigationState::opened_document)
    }

    // Admin view

    pub fn admin_row_count(&self) -> usize {
        1 + self.tree.all_nodes_with_depth().len()
    }

    /// Node under the admin cursor; `None` on the root row
    pub fn admin_selected_node(&self) -> Option<FileNode> {
        let index = self.admin.cursor.checked_sub(1)?;
        self.tree
            .all_nodes_with_depth()
            .get(index)
            .map(|(node, _)| (*node).clone())
    }

    /// Pick the row under the cursor as parent for new items
    pub fn admin_pick_selected(&mut self) -> bool {
        match self.admin_selected_node() {
            None => {
                self.admin.picker.select_root();
                self.status_message = "Parent: Root".to_string();
                true
            }
            Some(node) => {
                if self.admin.picker.select(&node) {
                    self.status_message = format!("Parent: {}", node.name);
                    true
                } else {
                    self.status_message = format!("{} is a file", node.name);
                    false
                }
            }
        }
    }

    pub fn start_admin_input(&mut self, item_type: ItemType) {
        let draft = match item_type {
            ItemType::Folder => ItemDraft::folder(""),
            ItemType::File => ItemDraft::file(""),
        };
        self.admin.input = Some(AdminInput {
            kind: AdminInputKind::Create {
                draft,
                field: DraftField::Name,
            },
            buffer: String::new(),
        });
    }

    /// Rename prompt for the row under the admin cursor, prefilled
    pub fn start_admin_rename(&mut self) -> bool {
        let Some(node) = self.admin_selected_node() else {
            return false;
        };
        self.admin.input = Some(AdminInput {
            kind: AdminInputKind::Rename { id: node.id },
            buffer: node.name,
        });
        true
    }

    /// Commit the prompt buffer. A file draft moves on to its next field and
    /// yields no task until the link has been entered.
    pub fn submit_admin_input(&mut self) -> Option<Task> {
        let AdminInput { kind, buffer } = self.admin.input.take()?;
        match kind {
            AdminInputKind::Create { mut draft, field } => {
                let next = match field {
                    DraftField::Name => {
                        draft.name = buffer;
                        (draft.item_type == ItemType::File).then_some(DraftField::Text)
                    }
                    DraftField::Text => {
                        draft.text = buffer;
                        Some(DraftField::Href)
                    }
                    DraftField::Href => {
                        draft.href = buffer;
                        None
                    }
                };
                if let Some(field) = next {
                    self.admin.input = Some(AdminInput {
                        kind: AdminInputKind::Create { draft, field },
                        buffer: String::new(),
                    });
                    return None;
                }
                self.status_message = format!("Creating {}...", draft.name.trim());
                Some(Task::CreateItem {
                    draft,
                    parent_id: self.admin.picker.selected_parent().map(str::to_string),
                })
            }
            AdminInputKind::Rename { id } => {
                self.status_message = format!("Renaming to {}...", buffer.trim());
                Some(Task::UpdateItem {
                    id,
                    patch: RecordPatch {
                        name: Some(buffer),
                        ..Default::default()
                    },
                })
            }
        }
    }

    /// Move the row under the cursor into the picked parent (or to the root)
    pub fn admin_move_selected(&mut self) -> Option<Task> {
        let node = self.admin_selected_node()?;
        let parent = self.admin.picker.selected_parent().map(str::to_string);
        if parent.as_deref() == Some(node.id.as_str()) {
            self.status_message = format!("{} cannot contain itself", node.name);
            return None;
        }
        let target = parent
            .as_deref()
            .and_then(|id| self.tree.find_node(id))
            .map(|n| n.name.as_str())
            .unwrap_or("Root");
        self.status_message = format!("Moving {} to {}...", node.name, target);
        Some(Task::UpdateItem {
            id: node.id,
            patch: RecordPatch {
                parent_id: Some(parent),
                ..Default::default()
            },
        })
    }

    /// Delete task for the row under the admin cursor
    pub fn admin_delete_selected(&mut self) -> Option<Task> {
        let node = self.admin_selected_node()?;
        self.status_message = format!("Deleting {}...", node.name);
        Some(Task::DeleteItem { id: node.id })
    }
}
