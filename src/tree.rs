use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::Instant;

use crate::record::{FileSystemRecord, ItemType};

/// Represents a single node in the content tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub id: String,
    pub name: String,
    pub text: Option<String>,
    pub href: Option<String>,
    pub item_type: ItemType,
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FileNode>,
}

impl FileNode {
    /// Create a childless node from a stored record
    pub fn from_record(record: &FileSystemRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            text: record.text.clone(),
            href: record.href.clone(),
            item_type: record.item_type,
            parent_id: record.parent_id.clone(),
            children: Vec::new(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.item_type == ItemType::Folder
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Find a node by id in this subtree
    pub fn find(&self, id: &str) -> Option<&FileNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Number of nodes in this subtree, including itself
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(FileNode::count).sum::<usize>()
    }
}

/// Data problems found in a record set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrityViolation {
    /// `parent_id` points at a record that does not exist
    DanglingParent { id: String, parent_id: String },
    /// Following `parent_id` from this record leads back to it
    Cycle { id: String, parent_id: String },
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityViolation::DanglingParent { id, parent_id } => {
                write!(f, "record {} references missing parent {}", id, parent_id)
            }
            IntegrityViolation::Cycle { id, parent_id } => {
                write!(f, "record {} forms a cycle through parent {}", id, parent_id)
            }
        }
    }
}

/// Output of a guarded build: the forest plus the cycles that were cut out of it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeBuild {
    pub nodes: Vec<FileNode>,
    pub violations: Vec<IntegrityViolation>,
}

/// Convert flat records into the forest hanging off `parent_id` (`None` = root level).
///
/// Siblings keep storage order. Records whose parent does not exist are not
/// reachable from anywhere and are left out silently.
pub fn build_tree(records: &[FileSystemRecord], parent_id: Option<&str>) -> Vec<FileNode> {
    let build = build_tree_checked(records, parent_id);
    for violation in &build.violations {
        log::warn!("build_tree: {}", violation);
    }
    build.nodes
}

/// Same as [`build_tree`] but also returns the cycles it had to cut.
pub fn build_tree_checked<'a>(
    records: &'a [FileSystemRecord],
    parent_id: Option<&'a str>,
) -> TreeBuild {
    let mut by_parent: HashMap<Option<&'a str>, Vec<&'a FileSystemRecord>> = HashMap::new();
    for record in records {
        by_parent
            .entry(record.parent_id.as_deref())
            .or_default()
            .push(record);
    }

    let mut ancestors: HashSet<&'a str> = HashSet::new();
    if let Some(start) = parent_id {
        ancestors.insert(start);
    }

    let mut violations = Vec::new();
    let nodes = build_level(&by_parent, parent_id, &mut ancestors, &mut violations);

    TreeBuild { nodes, violations }
}

fn build_level<'a>(
    by_parent: &HashMap<Option<&'a str>, Vec<&'a FileSystemRecord>>,
    parent_id: Option<&'a str>,
    ancestors: &mut HashSet<&'a str>,
    violations: &mut Vec<IntegrityViolation>,
) -> Vec<FileNode> {
    let Some(records) = by_parent.get(&parent_id) else {
        return Vec::new();
    };

    let mut nodes = Vec::with_capacity(records.len());
    for &record in records {
        let id = record.id.as_str();
        if ancestors.contains(id) {
            violations.push(IntegrityViolation::Cycle {
                id: record.id.clone(),
                parent_id: record.parent_id.clone().unwrap_or_default(),
            });
            continue;
        }

        ancestors.insert(id);
        let mut node = FileNode::from_record(record);
        node.children = build_level(by_parent, Some(id), ancestors, violations);
        ancestors.remove(id);

        nodes.push(node);
    }
    nodes
}

/// Report dangling parent references and records caught in parent cycles.
///
/// Unlike the guarded build this also sees cycles that no root can reach.
pub fn audit(records: &[FileSystemRecord]) -> Vec<IntegrityViolation> {
    let parents: HashMap<&str, Option<&str>> = records
        .iter()
        .map(|r| (r.id.as_str(), r.parent_id.as_deref()))
        .collect();

    let mut violations = Vec::new();
    for record in records {
        let Some(parent_id) = record.parent_id.as_deref() else {
            continue;
        };

        if !parents.contains_key(parent_id) {
            violations.push(IntegrityViolation::DanglingParent {
                id: record.id.clone(),
                parent_id: parent_id.to_string(),
            });
            continue;
        }

        if on_cycle(&parents, &record.id) {
            violations.push(IntegrityViolation::Cycle {
                id: record.id.clone(),
                parent_id: parent_id.to_string(),
            });
        }
    }
    violations
}

fn on_cycle(parents: &HashMap<&str, Option<&str>>, start: &str) -> bool {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut current = start;
    while let Some(&Some(parent)) = parents.get(current) {
        if parent == start {
            return true;
        }
        if !seen.insert(parent) {
            // Entered a loop that does not include `start`
            return false;
        }
        current = parent;
    }
    false
}

/// A built snapshot of the whole content tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree {
    pub roots: Vec<FileNode>,
    pub violations: Vec<IntegrityViolation>,
    pub record_count: usize,
}

impl FileTree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the root-level forest from flat records
    pub fn from_records(records: &[FileSystemRecord]) -> Self {
        let start_time = Instant::now();

        let build = build_tree_checked(records, None);
        let mut violations = audit(records);
        for violation in build.violations {
            if !violations.contains(&violation) {
                violations.push(violation);
            }
        }
        for violation in &violations {
            log::warn!("FileTree::from_records: {}", violation);
        }

        let tree = Self {
            roots: build.nodes,
            violations,
            record_count: records.len(),
        };

        log::info!(
            "FileTree::from_records: {} records -> {} root nodes in {:?}",
            records.len(),
            tree.roots.len(),
            start_time.elapsed()
        );
        tree
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn first_root(&self) -> Option<&FileNode> {
        self.roots.first()
    }

    /// Find a node by id
    pub fn find_node(&self, id: &str) -> Option<&FileNode> {
        self.roots.iter().find_map(|node| node.find(id))
    }

    /// Find the first node carrying this display name (depth-first)
    pub fn find_by_name(&self, name: &str) -> Option<&FileNode> {
        fn walk<'a>(nodes: &'a [FileNode], name: &str) -> Option<&'a FileNode> {
            for node in nodes {
                if node.name == name {
                    return Some(node);
                }
                if let Some(found) = walk(&node.children, name) {
                    return Some(found);
                }
            }
            None
        }
        walk(&self.roots, name)
    }

    /// Ids of every node below `id`, not including `id` itself
    pub fn descendant_ids(&self, id: &str) -> Vec<String> {
        fn collect(node: &FileNode, out: &mut Vec<String>) {
            for child in &node.children {
                out.push(child.id.clone());
                collect(child, out);
            }
        }
        let mut ids = Vec::new();
        if let Some(node) = self.find_node(id) {
            collect(node, &mut ids);
        }
        ids
    }

    /// Flattened view respecting an expansion set, with display depth
    pub fn visible_nodes_with_depth(&self, expanded: &HashSet<String>) -> Vec<(&FileNode, usize)> {
        let mut visible = Vec::new();
        for node in &self.roots {
            Self::collect_visible(node, expanded, 0, &mut visible);
        }
        visible
    }

    fn collect_visible<'a>(
        node: &'a FileNode,
        expanded: &HashSet<String>,
        depth: usize,
        visible: &mut Vec<(&'a FileNode, usize)>,
    ) {
        visible.push((node, depth));
        if expanded.contains(&node.id) {
            for child in &node.children {
                Self::collect_visible(child, expanded, depth + 1, visible);
            }
        }
    }

    /// Flattened view with every folder open
    pub fn all_nodes_with_depth(&self) -> Vec<(&FileNode, usize)> {
        fn collect<'a>(nodes: &'a [FileNode], depth: usize, out: &mut Vec<(&'a FileNode, usize)>) {
            for node in nodes {
                out.push((node, depth));
                collect(&node.children, depth + 1, out);
            }
        }
        let mut all = Vec::new();
        collect(&self.roots, 0, &mut all);
        all
    }

    /// Get tree statistics
    pub fn get_stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        for (node, depth) in self.all_nodes_with_depth() {
            if node.is_folder() {
                stats.folders += 1;
            } else {
                stats.files += 1;
            }
            stats.total_nodes += 1;
            stats.max_depth = stats.max_depth.max(depth);
        }
        stats.unreachable = self.record_count.saturating_sub(stats.total_nodes);
        stats
    }
}

/// Statistics about the content tree
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub files: usize,
    pub folders: usize,
    pub max_depth: usize,
    /// Records present in the store but absent from the tree
    pub unreachable: usize,
}
