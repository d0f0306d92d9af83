//! Name-based icon heuristics. Presentation only: nothing in the tree or the
//! navigator depends on these.

use crate::action::is_text_document;
use crate::tree::FileNode;

const DRIVE_MARKERS: [&str; 2] = ["(C:)", "(D:)"];
const COMPUTER_SUFFIX: &str = "PC";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeIcon {
    Drive,
    Computer,
    Folder,
    TextDocument,
    WebLink,
}

impl NodeIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            NodeIcon::Drive => "🖴",
            NodeIcon::Computer => "💻",
            NodeIcon::Folder => "📁",
            NodeIcon::TextDocument => "📄",
            NodeIcon::WebLink => "🌐",
        }
    }
}

/// Icon for the contents pane
pub fn icon_for(node: &FileNode) -> NodeIcon {
    if DRIVE_MARKERS.iter().any(|marker| node.name.contains(marker)) {
        NodeIcon::Drive
    } else if node.name.ends_with(COMPUTER_SUFFIX) {
        NodeIcon::Computer
    } else if node.is_folder() {
        NodeIcon::Folder
    } else if node.name.contains(".txt") {
        NodeIcon::TextDocument
    } else {
        NodeIcon::WebLink
    }
}

/// Icon for the side tree, which only tells folders, documents and links apart
pub fn sidebar_icon(node: &FileNode) -> NodeIcon {
    if node.is_folder() {
        NodeIcon::Folder
    } else if is_text_document(&node.name) {
        NodeIcon::TextDocument
    } else {
        NodeIcon::WebLink
    }
}
