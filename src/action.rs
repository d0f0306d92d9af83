//! Decides what activating a node should do.
//!
//! The decision is pure; the caller performs the side effect (entering a
//! folder, showing the notepad, following a link).

use serde::{Deserialize, Serialize};

use crate::tree::FileNode;

/// Suffix of inline text documents
pub const TEXT_DOCUMENT_SUFFIX: &str = ".txt";

/// Scheme prefix that marks a link as leaving the site
pub const EXTERNAL_SCHEME_PREFIX: &str = "http";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemAction {
    /// Folder: enter it
    Descend,
    /// Text document: show it in the notepad
    OpenText,
    /// Absolute URL: open in a new, unrelated browsing context
    NavigateExternal(String),
    /// Site-relative path: in-app route change
    NavigateInternal(String),
    /// Nothing to do
    Noop,
}

pub fn resolve_action(node: &FileNode) -> ItemAction {
    if node.is_folder() {
        return ItemAction::Descend;
    }

    if is_text_document(&node.name) {
        return ItemAction::OpenText;
    }

    match node.href.as_deref() {
        Some(href) if href.starts_with(EXTERNAL_SCHEME_PREFIX) => {
            ItemAction::NavigateExternal(href.to_string())
        }
        Some(href) => ItemAction::NavigateInternal(href.to_string()),
        None => ItemAction::Noop,
    }
}

/// Case-insensitive `.txt` suffix check
pub fn is_text_document(name: &str) -> bool {
    name.to_lowercase().ends_with(TEXT_DOCUMENT_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FileSystemRecord;

    fn node(record: FileSystemRecord) -> FileNode {
        FileNode::from_record(&record)
    }

    #[test]
    fn test_folder_always_descends() {
        let folder = node(
            FileSystemRecord::folder("f", "notes.txt", None).with_href("https://example.com"),
        );
        assert_eq!(resolve_action(&folder), ItemAction::Descend);
    }

    #[test]
    fn test_text_suffix_wins_over_href() {
        let bio = node(FileSystemRecord::file("b", "bio.txt", None).with_href("https://x"));
        assert_eq!(resolve_action(&bio), ItemAction::OpenText);

        let upper = node(FileSystemRecord::file("u", "README.TXT", None));
        assert_eq!(resolve_action(&upper), ItemAction::OpenText);
    }

    #[test]
    fn test_external_and_internal_links() {
        let site = node(FileSystemRecord::file("s", "site.html", None).with_href("https://x.com"));
        assert_eq!(
            resolve_action(&site),
            ItemAction::NavigateExternal("https://x.com".to_string())
        );

        let page = node(FileSystemRecord::file("p", "page", None).with_href("/portfolio/proj"));
        assert_eq!(
            resolve_action(&page),
            ItemAction::NavigateInternal("/portfolio/proj".to_string())
        );
    }

    #[test]
    fn test_inert_file() {
        let plain = node(FileSystemRecord::file("x", "photo.png", None));
        assert_eq!(resolve_action(&plain), ItemAction::Noop);

        // ".txt" in the middle of a name is not a text document
        let middle = node(FileSystemRecord::file("m", "a.txt.bak", None));
        assert_eq!(resolve_action(&middle), ItemAction::Noop);
    }
}
