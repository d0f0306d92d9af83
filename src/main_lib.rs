// Library module containing testable functions from main.rs

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::admin::{self, ItemDraft};
use crate::app::App;
use crate::async_task::{Task, TaskResult};
use crate::classify::icon_for;
use crate::command::Command;
use crate::config::Config;
use crate::error::{ExplorerError, Result};
use crate::executor::Executor;
use crate::record::{FileSystemRecord, ItemType, RecordPatch};
use crate::screenshot;
use crate::store::{JsonFileStore, MemoryStore, RecordStore};
use crate::tree::FileTree;

/// Apply a worker result to the app. Mutations return the reload to queue.
pub fn handle_task_result(app: &mut App, result: TaskResult) -> Option<Task> {
    app.is_loading = false;

    match result {
        TaskResult::TreeLoaded { tree } => {
            app.set_tree(tree);
            None
        }
        TaskResult::ItemCreated { record } => {
            app.status_message = format!("Created {} {}", record.item_type, record.name);
            Some(Task::LoadTree)
        }
        TaskResult::ItemUpdated { record } => {
            app.status_message = format!("Updated {}", record.name);
            Some(Task::LoadTree)
        }
        TaskResult::ItemDeleted { id, removed } => {
            app.status_message = format!("Deleted {} ({} items)", id, removed);
            Some(Task::LoadTree)
        }
        TaskResult::LoadFailed { message } => {
            app.load_failed(&message);
            None
        }
        TaskResult::Error { message } => {
            app.status_message = format!("Error: {}", message);
            None
        }
    }
}

/// Pick the backend from the command line and configuration
pub fn open_store(config: &Config, in_memory: bool) -> Arc<dyn RecordStore> {
    if in_memory {
        log::info!("Using in-memory sample store");
        Arc::new(MemoryStore::sample())
    } else {
        log::info!("Using store file {:?}", config.store_path);
        Arc::new(JsonFileStore::new(&config.store_path))
    }
}

/// Indented listing (or JSON) of the tree, followed by integrity problems
pub fn render_tree(tree: &FileTree, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(&tree.roots)?);
    }

    let mut out = String::new();
    if tree.is_empty() {
        out.push_str("(empty)\n");
    }
    for (node, depth) in tree.all_nodes_with_depth() {
        let suffix = match (&node.item_type, &node.href) {
            (ItemType::Folder, _) => "/".to_string(),
            (_, Some(href)) => format!(" -> {}", href),
            _ => String::new(),
        };
        out.push_str(&format!(
            "{}{} {}{}  [{}]\n",
            "  ".repeat(depth),
            icon_for(node).glyph(),
            node.name,
            suffix,
            node.id
        ));
    }

    for violation in &tree.violations {
        out.push_str(&format!("warning: {}\n", violation));
    }
    Ok(out)
}

pub fn add_item(
    store: &dyn RecordStore,
    name: &str,
    item_type: ItemType,
    parent: Option<&str>,
    text: Option<String>,
    href: Option<String>,
) -> Result<FileSystemRecord> {
    let draft = ItemDraft {
        name: name.to_string(),
        text: text.unwrap_or_default(),
        item_type,
        href: href.unwrap_or_default(),
    };
    admin::create_item(store, draft, parent)
}

/// Patch built from `update` flags; `--root` and `--clear-href` clear
/// the nullable fields
pub fn build_patch(
    name: Option<String>,
    text: Option<String>,
    href: Option<String>,
    clear_href: bool,
    parent: Option<String>,
    root: bool,
    item_type: Option<ItemType>,
) -> RecordPatch {
    RecordPatch {
        name,
        text: text.map(Some),
        href: if clear_href { Some(None) } else { href.map(Some) },
        item_type,
        parent_id: if root { Some(None) } else { parent.map(Some) },
    }
}

/// Run a headless command against a freshly loaded app and write the result
pub fn execute_command(
    app: &mut App,
    command_str: &str,
    output_path: Option<&Path>,
    generate_screenshot: bool,
    width: u16,
    height: u16,
) -> Result<()> {
    let command = Command::from_string(command_str).map_err(ExplorerError::Generic)?;
    let result = Executor::execute(app, &command);
    let result_json = serde_json::to_string_pretty(&result)?;

    match output_path {
        Some(path) => {
            fs::write(path, &result_json)?;
            println!("Result saved to: {}", path.display());
        }
        None => println!("{}", result_json),
    }

    eprintln!("Status: {}", result.status_message);

    if generate_screenshot {
        print!("{}", screenshot::render_to_string(app, width, height)?);
    }

    Ok(())
}
