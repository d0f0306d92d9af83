use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of an item in the content tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    #[default]
    File,
    Folder,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemType::File => write!(f, "file"),
            ItemType::Folder => write!(f, "folder"),
        }
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(ItemType::File),
            "folder" | "dir" => Ok(ItemType::Folder),
            other => Err(format!("Unknown item type: {}", other)),
        }
    }
}

/// One flat persisted entry of the content tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSystemRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(rename = "type", default)]
    pub item_type: ItemType,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl FileSystemRecord {
    /// Create a new folder record
    pub fn folder(id: &str, name: &str, parent_id: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            text: None,
            href: None,
            item_type: ItemType::Folder,
            parent_id: parent_id.map(str::to_string),
        }
    }

    /// Create a new file record
    pub fn file(id: &str, name: &str, parent_id: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            text: None,
            href: None,
            item_type: ItemType::File,
            parent_id: parent_id.map(str::to_string),
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_href(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }

    pub fn is_folder(&self) -> bool {
        self.item_type == ItemType::Folder
    }
}

/// Fields of a record about to be inserted; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub name: String,
    pub text: Option<String>,
    pub href: Option<String>,
    pub item_type: ItemType,
    pub parent_id: Option<String>,
}

impl NewRecord {
    pub fn into_record(self, id: String) -> FileSystemRecord {
        FileSystemRecord {
            id,
            name: self.name,
            text: self.text,
            href: self.href,
            item_type: self.item_type,
            parent_id: self.parent_id,
        }
    }
}

/// Partial update of a record. Nullable fields use a nested `Option`:
/// `None` leaves the field alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPatch {
    pub name: Option<String>,
    pub text: Option<Option<String>>,
    pub href: Option<Option<String>>,
    pub item_type: Option<ItemType>,
    pub parent_id: Option<Option<String>>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.text.is_none()
            && self.href.is_none()
            && self.item_type.is_none()
            && self.parent_id.is_none()
    }

    pub fn apply(&self, record: &mut FileSystemRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(text) = &self.text {
            record.text = text.clone();
        }
        if let Some(href) = &self.href {
            record.href = href.clone();
        }
        if let Some(item_type) = self.item_type {
            record.item_type = item_type;
        }
        if let Some(parent_id) = &self.parent_id {
            record.parent_id = parent_id.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_shape() {
        let json = r#"{"id":"1","name":"About","type":"folder","parentId":null}"#;
        let record: FileSystemRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.item_type, ItemType::Folder);
        assert_eq!(record.parent_id, None);
        assert_eq!(record.text, None);

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["type"], "folder");
        assert!(back.get("parentId").is_some());
    }

    #[test]
    fn test_item_type_parsing() {
        assert_eq!("Folder".parse::<ItemType>().unwrap(), ItemType::Folder);
        assert_eq!("file".parse::<ItemType>().unwrap(), ItemType::File);
        assert!("link".parse::<ItemType>().is_err());
    }

    #[test]
    fn test_patch_apply() {
        let mut record = FileSystemRecord::file("1", "old", Some("p")).with_href("/a");
        let patch = RecordPatch {
            name: Some("new".to_string()),
            href: Some(None),
            parent_id: Some(None),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        patch.apply(&mut record);

        assert_eq!(record.name, "new");
        assert_eq!(record.href, None);
        assert_eq!(record.parent_id, None);
        assert_eq!(record.item_type, ItemType::File);
        assert!(RecordPatch::default().is_empty());
    }
}
