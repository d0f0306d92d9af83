//! Explorer navigation state
//!
//! Back/forward history over visited folders, the side tree's expansion set
//! and the document shown in the notepad. Every explorer owns one of these.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::action::is_text_document;
use crate::tree::{FileNode, FileTree};

/// Transitions the navigator accepts
#[derive(Debug, Clone, PartialEq)]
pub enum NavigatorEvent {
    Enter(FileNode),
    GoBack,
    GoForward,
    ToggleExpand(String),
    OpenDocument(FileNode),
    CloseDocument,
}

/// Serializable summary of a navigation state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationSnapshot {
    pub history: Vec<String>,
    pub cursor: usize,
    pub expanded: Vec<String>,
    pub opened_document: Option<String>,
    pub breadcrumb: String,
}

#[derive(Debug, Clone)]
pub struct NavigationState {
    history: Vec<FileNode>,
    cursor: usize,
    expanded: HashSet<String>,
    opened_document: Option<FileNode>,
}

impl NavigationState {
    /// Create a navigator positioned at `root`, with `root` expanded
    pub fn new(root: FileNode) -> Self {
        let mut expanded = HashSet::new();
        expanded.insert(root.id.clone());
        Self {
            history: vec![root],
            cursor: 0,
            expanded,
            opened_document: None,
        }
    }

    /// Seed from the first root of a tree; `None` when the tree is empty
    pub fn from_tree(tree: &FileTree) -> Option<Self> {
        tree.first_root().cloned().map(Self::new)
    }

    /// Handle an event and return whether the state changed
    pub fn handle_event(&mut self, event: NavigatorEvent) -> bool {
        let changed = match event {
            NavigatorEvent::Enter(node) => self.enter(node),
            NavigatorEvent::GoBack => self.go_back(),
            NavigatorEvent::GoForward => self.go_forward(),
            NavigatorEvent::ToggleExpand(id) => {
                self.toggle_expand(&id);
                true
            }
            NavigatorEvent::OpenDocument(node) => self.open_document(node),
            NavigatorEvent::CloseDocument => self.close_document(),
        };

        log::debug!(
            "navigator: cursor={} history_len={} changed={}",
            self.cursor,
            self.history.len(),
            changed
        );
        changed
    }

    /// Enter a folder, dropping any forward history
    pub fn enter(&mut self, node: FileNode) -> bool {
        if !node.is_folder() || node.id == self.current().id {
            return false;
        }

        self.history.truncate(self.cursor + 1);
        self.expanded.insert(node.id.clone());
        self.history.push(node);
        self.cursor = self.history.len() - 1;
        true
    }

    pub fn go_back(&mut self) -> bool {
        if self.can_go_back() {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    pub fn go_forward(&mut self) -> bool {
        if self.can_go_forward() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.history.len()
    }

    pub fn toggle_expand(&mut self, id: &str) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
    }

    /// Show a text document; other nodes are refused
    pub fn open_document(&mut self, node: FileNode) -> bool {
        if node.is_folder() || !is_text_document(&node.name) {
            return false;
        }
        self.opened_document = Some(node);
        true
    }

    pub fn close_document(&mut self) -> bool {
        self.opened_document.take().is_some()
    }

    /// The folder currently displayed
    pub fn current(&self) -> &FileNode {
        &self.history[self.cursor]
    }

    pub fn history(&self) -> &[FileNode] {
        &self.history
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn expanded(&self) -> &HashSet<String> {
        &self.expanded
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn opened_document(&self) -> Option<&FileNode> {
        self.opened_document.as_ref()
    }

    /// Names from the first history entry up to and including the cursor
    pub fn breadcrumb(&self, separator: &str) -> String {
        self.history[..=self.cursor]
            .iter()
            .map(|node| node.name.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }

    pub fn snapshot(&self, separator: &str) -> NavigationSnapshot {
        let mut expanded: Vec<String> = self.expanded.iter().cloned().collect();
        expanded.sort();
        NavigationSnapshot {
            history: self.history.iter().map(|n| n.id.clone()).collect(),
            cursor: self.cursor,
            expanded,
            opened_document: self.opened_document.as_ref().map(|n| n.id.clone()),
            breadcrumb: self.breadcrumb(separator),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FileSystemRecord;
    use maplit::hashset;

    fn folder(id: &str) -> FileNode {
        FileNode::from_record(&FileSystemRecord::folder(id, &id.to_uppercase(), None))
    }

    fn history_ids(nav: &NavigationState) -> Vec<&str> {
        nav.history().iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_new_state_seeded_with_root() {
        let nav = NavigationState::new(folder("root"));
        assert_eq!(history_ids(&nav), vec!["root"]);
        assert_eq!(nav.cursor(), 0);
        assert_eq!(nav.expanded(), &hashset! {"root".to_string()});
        assert!(nav.opened_document().is_none());
        assert!(!nav.can_go_back());
        assert!(!nav.can_go_forward());
    }

    #[test]
    fn test_from_empty_tree() {
        assert!(NavigationState::from_tree(&FileTree::new()).is_none());
    }

    #[test]
    fn test_enter_twice_is_noop() {
        let mut nav = NavigationState::new(folder("root"));
        assert!(nav.handle_event(NavigatorEvent::Enter(folder("a"))));
        assert!(!nav.handle_event(NavigatorEvent::Enter(folder("a"))));
        assert_eq!(history_ids(&nav), vec!["root", "a"]);
        assert_eq!(nav.cursor(), 1);
    }

    #[test]
    fn test_enter_after_back_discards_forward_branch() {
        let mut nav = NavigationState::new(folder("root"));
        nav.enter(folder("a"));
        nav.enter(folder("b"));
        assert!(nav.go_back());
        assert!(nav.enter(folder("c")));

        assert_eq!(history_ids(&nav), vec!["root", "a", "c"]);
        assert_eq!(nav.cursor(), 2);
        assert!(!nav.can_go_forward());
        assert_eq!(
            nav.expanded(),
            &hashset! {"root".to_string(), "a".to_string(), "b".to_string(), "c".to_string()}
        );
    }

    #[test]
    fn test_back_and_forward_bounds() {
        let mut nav = NavigationState::new(folder("root"));
        assert!(!nav.handle_event(NavigatorEvent::GoBack));
        assert!(!nav.handle_event(NavigatorEvent::GoForward));
        assert_eq!(nav.cursor(), 0);

        nav.enter(folder("a"));
        assert!(!nav.go_forward());
        assert!(nav.go_back());
        assert_eq!(nav.current().id, "root");
        assert!(nav.go_forward());
        assert_eq!(nav.current().id, "a");
        assert_eq!(history_ids(&nav), vec!["root", "a"]);
    }

    #[test]
    fn test_enter_ignores_files() {
        let mut nav = NavigationState::new(folder("root"));
        let file = FileNode::from_record(&FileSystemRecord::file("f", "bio.txt", None));
        assert!(!nav.enter(file));
        assert_eq!(nav.history().len(), 1);
    }

    #[test]
    fn test_toggle_expand() {
        let mut nav = NavigationState::new(folder("root"));
        nav.handle_event(NavigatorEvent::ToggleExpand("x".to_string()));
        assert!(nav.is_expanded("x"));
        nav.handle_event(NavigatorEvent::ToggleExpand("root".to_string()));
        assert!(!nav.is_expanded("root"));
        assert_eq!(nav.cursor(), 0);
    }

    #[test]
    fn test_documents() {
        let mut nav = NavigationState::new(folder("root"));
        let doc = FileNode::from_record(
            &FileSystemRecord::file("bio", "Bio.TXT", None).with_text("about me"),
        );
        let link = FileNode::from_record(
            &FileSystemRecord::file("gh", "github", None).with_href("https://github.com"),
        );

        assert!(!nav.open_document(link));
        assert!(nav.handle_event(NavigatorEvent::OpenDocument(doc)));
        assert_eq!(nav.opened_document().unwrap().id, "bio");
        assert_eq!(nav.history().len(), 1);

        assert!(nav.handle_event(NavigatorEvent::CloseDocument));
        assert!(!nav.close_document());
    }

    #[test]
    fn test_breadcrumb_stops_at_cursor() {
        let mut nav = NavigationState::new(folder("root"));
        nav.enter(folder("a"));
        nav.enter(folder("b"));
        assert_eq!(nav.breadcrumb(" > "), "ROOT > A > B");

        nav.go_back();
        assert_eq!(nav.breadcrumb(" > "), "ROOT > A");

        let snapshot = nav.snapshot("/");
        assert_eq!(snapshot.history, vec!["root", "a", "b"]);
        assert_eq!(snapshot.cursor, 1);
        assert_eq!(snapshot.expanded, vec!["a", "b", "root"]);
        assert_eq!(snapshot.breadcrumb, "ROOT/A");
    }
}
