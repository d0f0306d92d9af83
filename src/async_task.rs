use std::sync::Arc;
use tokio::sync::mpsc;

use crate::admin::{self, ItemDraft};
use crate::error::{ExplorerError, Result};
use crate::record::{FileSystemRecord, RecordPatch};
use crate::store::RecordStore;
use crate::tree::FileTree;

#[derive(Debug, Clone)]
pub enum Task {
    LoadTree,
    CreateItem {
        draft: ItemDraft,
        parent_id: Option<String>,
    },
    UpdateItem {
        id: String,
        patch: RecordPatch,
    },
    DeleteItem {
        id: String,
    },
}

#[derive(Debug, Clone)]
pub enum TaskResult {
    TreeLoaded { tree: FileTree },
    ItemCreated { record: FileSystemRecord },
    ItemUpdated { record: FileSystemRecord },
    ItemDeleted { id: String, removed: usize },
    /// The store could not be read; the previous snapshot is no longer valid
    LoadFailed { message: String },
    /// A mutation was refused or failed
    Error { message: String },
}

pub async fn run_worker(
    mut task_receiver: mpsc::Receiver<Task>,
    result_sender: mpsc::Sender<TaskResult>,
    store: Arc<dyn RecordStore>,
) {
    while let Some(task) = task_receiver.recv().await {
        let result = match task {
            Task::LoadTree => match load_tree(store.clone()).await {
                Ok(tree) => TaskResult::TreeLoaded { tree },
                Err(e) => TaskResult::LoadFailed { message: e.to_string() },
            },
            Task::CreateItem { draft, parent_id } => {
                let store = store.clone();
                match run_blocking(move || admin::create_item(store.as_ref(), draft, parent_id.as_deref())).await {
                    Ok(record) => TaskResult::ItemCreated { record },
                    Err(e) => TaskResult::Error { message: e.to_string() },
                }
            }
            Task::UpdateItem { id, patch } => {
                let store = store.clone();
                match run_blocking(move || admin::update_item(store.as_ref(), &id, patch)).await {
                    Ok(record) => TaskResult::ItemUpdated { record },
                    Err(e) => TaskResult::Error { message: e.to_string() },
                }
            }
            Task::DeleteItem { id } => {
                let store = store.clone();
                let target = id.clone();
                match run_blocking(move || admin::remove_item(store.as_ref(), &target)).await {
                    Ok(removed) => TaskResult::ItemDeleted { id, removed },
                    Err(e) => TaskResult::Error { message: e.to_string() },
                }
            }
        };

        if let TaskResult::Error { message } | TaskResult::LoadFailed { message } = &result {
            log::error!("worker: task failed: {}", message);
        }

        if result_sender.send(result).await.is_err() {
            // Main thread has dropped the receiver, exit worker
            break;
        }
    }
}

/// Read every record and build a fresh snapshot
pub async fn load_tree(store: Arc<dyn RecordStore>) -> Result<FileTree> {
    let records = run_blocking(move || store.list_all()).await?;
    Ok(FileTree::from_records(&records))
}

// Store access is synchronous file or lock I/O
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ExplorerError::StoreUnavailable(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_load_tree_from_memory_store() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::sample());
        let tree = load_tree(store).await.unwrap();
        assert_eq!(tree.roots.len(), 1);
        assert_eq!(tree.roots[0].name, "This PC");
    }

    #[tokio::test]
    async fn test_worker_round_trip() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        let (task_sender, task_receiver) = mpsc::channel::<Task>(8);
        let (result_sender, mut result_receiver) = mpsc::channel::<TaskResult>(8);
        let worker = tokio::spawn(run_worker(task_receiver, result_sender, store));

        task_sender
            .send(Task::CreateItem {
                draft: ItemDraft::folder("Root"),
                parent_id: None,
            })
            .await
            .unwrap();
        let created = match result_receiver.recv().await.unwrap() {
            TaskResult::ItemCreated { record } => record,
            other => panic!("unexpected result: {:?}", other),
        };

        task_sender.send(Task::LoadTree).await.unwrap();
        match result_receiver.recv().await.unwrap() {
            TaskResult::TreeLoaded { tree } => {
                assert_eq!(tree.roots.len(), 1);
                assert_eq!(tree.roots[0].id, created.id);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        task_sender
            .send(Task::UpdateItem {
                id: created.id.clone(),
                patch: RecordPatch {
                    name: Some(" Home ".to_string()),
                    ..Default::default()
                },
            })
            .await
            .unwrap();
        match result_receiver.recv().await.unwrap() {
            TaskResult::ItemUpdated { record } => {
                assert_eq!(record.id, created.id);
                assert_eq!(record.name, "Home");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        task_sender
            .send(Task::DeleteItem { id: "missing".to_string() })
            .await
            .unwrap();
        assert!(matches!(
            result_receiver.recv().await.unwrap(),
            TaskResult::Error { .. }
        ));

        drop(task_sender);
        worker.await.unwrap();
    }
}
