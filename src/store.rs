//! Record store backends.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use uuid::Uuid;

use crate::error::{ExplorerError, Result};
use crate::record::{FileSystemRecord, NewRecord, RecordPatch};

/// Persistence for the flat record list. The tree is rebuilt from
/// `list_all` after every mutation.
pub trait RecordStore: Send + Sync {
    fn list_all(&self) -> Result<Vec<FileSystemRecord>>;

    fn insert(&self, record: NewRecord) -> Result<FileSystemRecord>;

    fn update(&self, id: &str, patch: RecordPatch) -> Result<FileSystemRecord>;

    fn delete(&self, id: &str) -> Result<()>;
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn poisoned<E>(_: E) -> ExplorerError {
    ExplorerError::StoreUnavailable("lock poisoned".to_string())
}

fn update_in(
    records: &mut [FileSystemRecord],
    id: &str,
    patch: &RecordPatch,
) -> Result<FileSystemRecord> {
    let record = records
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| ExplorerError::NotFound(id.to_string()))?;
    patch.apply(record);
    Ok(record.clone())
}

fn delete_in(records: &mut Vec<FileSystemRecord>, id: &str) -> Result<()> {
    let index = records
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| ExplorerError::NotFound(id.to_string()))?;
    records.remove(index);
    Ok(())
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<FileSystemRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<FileSystemRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// A small portfolio tree for demo runs
    pub fn sample() -> Self {
        Self::with_records(sample_records())
    }
}

impl RecordStore for MemoryStore {
    fn list_all(&self) -> Result<Vec<FileSystemRecord>> {
        Ok(self.records.read().map_err(poisoned)?.clone())
    }

    fn insert(&self, record: NewRecord) -> Result<FileSystemRecord> {
        let record = record.into_record(new_id());
        self.records.write().map_err(poisoned)?.push(record.clone());
        Ok(record)
    }

    fn update(&self, id: &str, patch: RecordPatch) -> Result<FileSystemRecord> {
        let mut records = self.records.write().map_err(poisoned)?;
        update_in(&mut records, id, &patch)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        delete_in(&mut records, id)
    }
}

/// Records kept as a JSON array in a single file. A missing file reads as
/// an empty store and is created on the first write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<FileSystemRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, records: &[FileSystemRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json)?;
        log::debug!("JsonFileStore: wrote {} records to {:?}", records.len(), self.path);
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn list_all(&self) -> Result<Vec<FileSystemRecord>> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        self.read()
    }

    fn insert(&self, record: NewRecord) -> Result<FileSystemRecord> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        let mut records = self.read()?;
        let record = record.into_record(new_id());
        records.push(record.clone());
        self.write(&records)?;
        Ok(record)
    }

    fn update(&self, id: &str, patch: RecordPatch) -> Result<FileSystemRecord> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        let mut records = self.read()?;
        let updated = update_in(&mut records, id, &patch)?;
        self.write(&records)?;
        Ok(updated)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        let mut records = self.read()?;
        delete_in(&mut records, id)?;
        self.write(&records)
    }
}

pub fn sample_records() -> Vec<FileSystemRecord> {
    vec![
        FileSystemRecord::folder("this-pc", "This PC", None),
        FileSystemRecord::folder("drive-c", "Local Disk (C:)", Some("this-pc")),
        FileSystemRecord::folder("projects", "Projects", Some("drive-c")),
        FileSystemRecord::file("about", "about.txt", Some("drive-c"))
            .with_text("Full-stack developer. I build fast, accessible web apps."),
        FileSystemRecord::file("shop", "webshop.html", Some("projects"))
            .with_href("https://shop.example.com"),
        FileSystemRecord::file("case-study", "case-study", Some("projects"))
            .with_href("/portfolio/case-study"),
        FileSystemRecord::file("stack", "stack.txt", Some("projects"))
            .with_text("Rust, TypeScript, PostgreSQL"),
        FileSystemRecord::folder("drive-d", "Archive (D:)", Some("this-pc")),
        FileSystemRecord::file("contact", "contact", Some("this-pc")).with_href("/contact"),
    ]
}
