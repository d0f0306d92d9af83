//! Admin surface: the parent picker and the create/update/delete operations
//! that sit in front of the record store.

use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, Result};
use crate::record::{FileSystemRecord, ItemType, NewRecord, RecordPatch};
use crate::store::RecordStore;
use crate::tree::{FileNode, FileTree};

/// Selected parent for new items. `None` means the root level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminPicker {
    selected_parent: Option<String>,
}

impl AdminPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_parent(&self) -> Option<&str> {
        self.selected_parent.as_deref()
    }

    /// Pick a folder as parent. Files cannot be picked.
    pub fn select(&mut self, node: &FileNode) -> bool {
        if !node.is_folder() {
            return false;
        }
        self.selected_parent = Some(node.id.clone());
        true
    }

    pub fn select_root(&mut self) {
        self.selected_parent = None;
    }

    /// Forget a pick that no longer exists in a freshly loaded tree
    pub fn revalidate(&mut self, tree: &FileTree) {
        if let Some(id) = &self.selected_parent {
            if tree.find_node(id).map(FileNode::is_folder) != Some(true) {
                self.selected_parent = None;
            }
        }
    }
}

/// Values collected by the "add file / folder" form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub text: String,
    pub item_type: ItemType,
    pub href: String,
}

impl ItemDraft {
    pub fn folder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            item_type: ItemType::Folder,
            ..Default::default()
        }
    }

    pub fn file(name: &str) -> Self {
        Self {
            name: name.to_string(),
            item_type: ItemType::File,
            ..Default::default()
        }
    }

    /// Check the draft and turn it into an insertable record.
    /// Links are only kept on files; blank optional fields become `None`.
    pub fn into_new_record(self, parent_id: Option<&str>) -> Result<NewRecord> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ExplorerError::Invalid("name is required".to_string()));
        }

        let text = non_blank(&self.text);
        let href = match self.item_type {
            ItemType::File => non_blank(&self.href),
            ItemType::Folder => None,
        };

        Ok(NewRecord {
            name: name.to_string(),
            text,
            href,
            item_type: self.item_type,
            parent_id: parent_id.map(str::to_string),
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn ensure_folder(records: &[FileSystemRecord], id: &str) -> Result<()> {
    match records.iter().find(|r| r.id == id) {
        None => Err(ExplorerError::NotFound(id.to_string())),
        Some(record) if !record.is_folder() => Err(ExplorerError::Invalid(format!(
            "{} is a file and cannot hold items",
            record.name
        ))),
        Some(_) => Ok(()),
    }
}

/// Create an item under `parent_id`
pub fn create_item(
    store: &dyn RecordStore,
    draft: ItemDraft,
    parent_id: Option<&str>,
) -> Result<FileSystemRecord> {
    let new_record = draft.into_new_record(parent_id)?;
    if let Some(parent) = parent_id {
        ensure_folder(&store.list_all()?, parent)?;
    }

    let record = store.insert(new_record)?;
    log::info!("admin: created {} {} ({})", record.item_type, record.name, record.id);
    Ok(record)
}

/// Apply a partial update, refusing moves that would create a cycle
pub fn update_item(store: &dyn RecordStore, id: &str, mut patch: RecordPatch) -> Result<FileSystemRecord> {
    if patch.is_empty() {
        return Err(ExplorerError::Invalid("nothing to update".to_string()));
    }
    // Same rule as creation: names are stored trimmed
    if let Some(name) = patch.name.as_mut() {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ExplorerError::Invalid("name is required".to_string()));
        }
        *name = trimmed.to_string();
    }

    let records = store.list_all()?;
    let current = records
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| ExplorerError::NotFound(id.to_string()))?;

    if let Some(Some(new_parent)) = &patch.parent_id {
        ensure_folder(&records, new_parent)?;
        if new_parent == id || is_ancestor(&records, id, new_parent) {
            return Err(ExplorerError::IntegrityViolation(format!(
                "moving {} under {} would make it its own ancestor",
                current.name, new_parent
            )));
        }
    }

    if patch.item_type == Some(ItemType::File) && records.iter().any(|r| r.parent_id.as_deref() == Some(id)) {
        return Err(ExplorerError::Invalid(format!(
            "{} still has children and must stay a folder",
            current.name
        )));
    }

    let record = store.update(id, patch)?;
    log::info!("admin: updated {} ({})", record.name, record.id);
    Ok(record)
}

/// Whether `ancestor` appears on the parent chain of `id`
fn is_ancestor(records: &[FileSystemRecord], ancestor: &str, id: &str) -> bool {
    let mut current = id;
    // Bounded walk so corrupted data cannot loop forever
    for _ in 0..records.len() {
        let Some(parent) = records
            .iter()
            .find(|r| r.id == current)
            .and_then(|r| r.parent_id.as_deref())
        else {
            return false;
        };
        if parent == ancestor {
            return true;
        }
        current = parent;
    }
    false
}

/// Delete an item together with everything below it. Returns how many
/// records were removed.
pub fn remove_item(store: &dyn RecordStore, id: &str) -> Result<usize> {
    let records = store.list_all()?;
    if !records.iter().any(|r| r.id == id) {
        return Err(ExplorerError::NotFound(id.to_string()));
    }

    let mut doomed = vec![id.to_string()];
    let mut index = 0;
    while index < doomed.len() {
        let parent = doomed[index].clone();
        for record in &records {
            if record.parent_id.as_deref() == Some(parent.as_str()) && !doomed.contains(&record.id) {
                doomed.push(record.id.clone());
            }
        }
        index += 1;
    }

    // Children first so a partial failure never leaves orphans behind
    for doomed_id in doomed.iter().rev() {
        store.delete(doomed_id)?;
    }

    log::info!("admin: removed {} records starting at {}", doomed.len(), id);
    Ok(doomed.len())
}
