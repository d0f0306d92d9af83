use clap::Parser;
use mockall::mock;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio_test::{assert_err, assert_ok};

use portfolio_explorer::action::{resolve_action, ItemAction};
use portfolio_explorer::admin::{self, ItemDraft};
use portfolio_explorer::app::App;
use portfolio_explorer::async_task::{run_worker, Task, TaskResult};
use portfolio_explorer::cli::{Cli, Commands};
use portfolio_explorer::config::Config;
use portfolio_explorer::error::{ExplorerError, Result};
use portfolio_explorer::main_lib;
use portfolio_explorer::navigator::{NavigationState, NavigatorEvent};
use portfolio_explorer::record::{FileSystemRecord, ItemType, NewRecord, RecordPatch};
use portfolio_explorer::store::{sample_records, JsonFileStore, MemoryStore, RecordStore};
use portfolio_explorer::tree::{build_tree, FileTree, IntegrityViolation};

mock! {
    pub Store {}

    impl RecordStore for Store {
        fn list_all(&self) -> Result<Vec<FileSystemRecord>>;
        fn insert(&self, record: NewRecord) -> Result<FileSystemRecord>;
        fn update(&self, id: &str, patch: RecordPatch) -> Result<FileSystemRecord>;
        fn delete(&self, id: &str) -> Result<()>;
    }
}

fn sample_navigator() -> (FileTree, NavigationState) {
    let tree = FileTree::from_records(&sample_records());
    let nav = NavigationState::from_tree(&tree).expect("sample tree has a root");
    (tree, nav)
}

// CLI

#[test]
fn test_cli_defaults_to_run() {
    let cli = Cli::try_parse_from(["portfolio-explorer"]).unwrap();
    assert!(cli.command.is_none());
    assert!(!cli.in_memory);
}

#[test]
fn test_cli_add_and_global_flags() {
    let cli = Cli::try_parse_from([
        "portfolio-explorer",
        "add",
        "--name",
        "Blog",
        "--type",
        "folder",
        "--parent",
        "drive-c",
        "--store",
        "/tmp/portfolio.json",
    ])
    .unwrap();

    assert_eq!(cli.store.as_deref(), Some(std::path::Path::new("/tmp/portfolio.json")));
    match cli.command {
        Some(Commands::Add {
            name,
            item_type,
            parent,
            text,
            href,
        }) => {
            assert_eq!(name, "Blog");
            assert_eq!(item_type, ItemType::Folder);
            assert_eq!(parent.as_deref(), Some("drive-c"));
            assert!(text.is_none());
            assert!(href.is_none());
        }
        other => panic!("unexpected command: {:?}", other),
    }

    assert!(Cli::try_parse_from(["portfolio-explorer", "add", "--name", "x", "--type", "bogus"]).is_err());
}

#[test]
fn test_cli_update_flags() {
    let cli = Cli::try_parse_from(["portfolio-explorer", "update", "about", "--root", "--clear-href"]).unwrap();
    match cli.command {
        Some(Commands::Update { id, root, clear_href, parent, .. }) => {
            assert_eq!(id, "about");
            assert!(root);
            assert!(clear_href);
            assert!(parent.is_none());
        }
        other => panic!("unexpected command: {:?}", other),
    }

    assert!(Cli::try_parse_from(["portfolio-explorer", "update", "a", "--root", "--parent", "b"]).is_err());
    assert!(Cli::try_parse_from(["portfolio-explorer", "update", "a", "--href", "/x", "--clear-href"]).is_err());
}

#[test]
fn test_cli_exec_remove_tree() {
    let cli = Cli::try_parse_from([
        "portfolio-explorer",
        "--in-memory",
        "exec",
        "-x",
        "enter:drive-c",
        "--screenshot",
    ])
    .unwrap();
    assert!(cli.in_memory);
    match cli.command {
        Some(Commands::Exec {
            command,
            screenshot,
            width,
            height,
            output,
        }) => {
            assert_eq!(command, "enter:drive-c");
            assert!(screenshot);
            assert_eq!((width, height), (120, 40));
            assert!(output.is_none());
        }
        other => panic!("unexpected command: {:?}", other),
    }

    let cli = Cli::try_parse_from(["portfolio-explorer", "remove", "drive-d"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Remove { id }) if id == "drive-d"));

    let cli = Cli::try_parse_from(["portfolio-explorer", "tree", "--json"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Tree { json: true })));
}

// Tree, navigator and resolver working together

#[test]
fn test_flat_records_to_explorer_walk() {
    let records = vec![
        FileSystemRecord::folder("1", "A", None),
        FileSystemRecord::file("2", "b.txt", Some("1")).with_text("hello"),
        FileSystemRecord::file("3", "site", Some("1")).with_href("https://example.com"),
    ];
    let roots = build_tree(&records, None);
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].children.len(), 2);

    let mut nav = NavigationState::new(roots[0].clone());
    assert_eq!(nav.breadcrumb(" > "), "A");
    assert!(nav.is_expanded("1"));

    let document = roots[0].children[0].clone();
    assert_eq!(resolve_action(&document), ItemAction::OpenText);
    assert!(nav.handle_event(NavigatorEvent::OpenDocument(document)));
    assert_eq!(nav.opened_document().map(|n| n.text.as_deref()), Some(Some("hello")));

    let link = &roots[0].children[1];
    assert_eq!(
        resolve_action(link),
        ItemAction::NavigateExternal("https://example.com".to_string())
    );
}

#[test]
fn test_back_forward_and_branching_history() {
    let (tree, mut nav) = sample_navigator();
    let drive = tree.find_node("drive-c").unwrap().clone();
    let projects = tree.find_node("projects").unwrap().clone();
    let archive = tree.find_node("drive-d").unwrap().clone();

    assert!(nav.handle_event(NavigatorEvent::Enter(drive)));
    assert!(nav.handle_event(NavigatorEvent::Enter(projects)));
    assert_eq!(nav.breadcrumb(" > "), "This PC > Local Disk (C:) > Projects");

    assert!(nav.handle_event(NavigatorEvent::GoBack));
    assert!(nav.handle_event(NavigatorEvent::GoBack));
    assert!(!nav.handle_event(NavigatorEvent::GoBack));
    assert_eq!(nav.cursor(), 0);

    // Entering from the middle drops the forward entries
    assert!(nav.handle_event(NavigatorEvent::Enter(archive)));
    let ids: Vec<&str> = nav.history().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["this-pc", "drive-d"]);
    assert!(!nav.handle_event(NavigatorEvent::GoForward));
}

#[test]
fn test_cycle_is_reported_not_rendered() {
    let records = vec![
        FileSystemRecord::folder("root", "Root", None),
        FileSystemRecord::folder("a", "A", Some("b")),
        FileSystemRecord::folder("b", "B", Some("a")),
        FileSystemRecord::file("lost", "lost.txt", Some("ghost")),
    ];
    let tree = FileTree::from_records(&records);

    assert_eq!(tree.roots.len(), 1);
    assert!(tree.find_node("a").is_none());
    assert!(tree.find_node("lost").is_none());
    assert!(tree
        .violations
        .iter()
        .any(|v| matches!(v, IntegrityViolation::DanglingParent { id, .. } if id == "lost")));
    assert!(tree
        .violations
        .iter()
        .any(|v| matches!(v, IntegrityViolation::Cycle { .. })));
}

// Admin operations against the file store

#[test]
fn test_admin_cascade_through_json_store() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("nested").join("portfolio.json"));

    let root = assert_ok!(admin::create_item(&store, ItemDraft::folder("Root"), None));
    let docs = assert_ok!(admin::create_item(&store, ItemDraft::folder("Docs"), Some(&root.id)));
    assert_ok!(admin::create_item(&store, ItemDraft::file("cv.txt"), Some(&docs.id)));
    assert_err!(admin::create_item(&store, ItemDraft::file("x"), Some("missing")));

    // A fresh handle on the same file sees everything
    let reopened = JsonFileStore::new(store.path());
    assert_eq!(reopened.list_all().unwrap().len(), 3);

    assert_eq!(admin::remove_item(&reopened, &docs.id).unwrap(), 2);
    let tree = FileTree::from_records(&reopened.list_all().unwrap());
    assert_eq!(tree.get_stats().total_nodes, 1);
}

// Worker

#[tokio::test]
async fn test_worker_reports_store_failure() {
    let mut store = MockStore::new();
    store
        .expect_list_all()
        .times(1)
        .returning(|| Err(ExplorerError::StoreUnavailable("disk on fire".to_string())));

    let (task_sender, task_receiver) = mpsc::channel::<Task>(4);
    let (result_sender, mut result_receiver) = mpsc::channel::<TaskResult>(4);
    let worker = tokio::spawn(run_worker(task_receiver, result_sender, Arc::new(store)));

    task_sender.send(Task::LoadTree).await.unwrap();
    let result = result_receiver.recv().await.unwrap();

    let mut app = App::new(Config::default());
    match &result {
        TaskResult::LoadFailed { message } => assert!(message.contains("disk on fire")),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(main_lib::handle_task_result(&mut app, result).is_none());
    assert!(app.tree.is_empty());
    assert!(app.status_message.starts_with("Error:"));

    drop(task_sender);
    worker.await.unwrap();
}

#[tokio::test]
async fn test_worker_mutation_then_reload() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::sample());
    let (task_sender, task_receiver) = mpsc::channel::<Task>(4);
    let (result_sender, mut result_receiver) = mpsc::channel::<TaskResult>(4);
    let worker = tokio::spawn(run_worker(task_receiver, result_sender, store));

    let mut app = App::new(Config::default());
    task_sender.send(Task::LoadTree).await.unwrap();
    let loaded = result_receiver.recv().await.unwrap();
    assert!(main_lib::handle_task_result(&mut app, loaded).is_none());
    assert_eq!(app.contents().len(), 3);

    task_sender
        .send(Task::CreateItem {
            draft: ItemDraft::folder("Blog"),
            parent_id: Some("this-pc".to_string()),
        })
        .await
        .unwrap();
    let created = result_receiver.recv().await.unwrap();
    let follow_up = main_lib::handle_task_result(&mut app, created).expect("reload after create");
    task_sender.send(follow_up).await.unwrap();

    let reloaded = result_receiver.recv().await.unwrap();
    main_lib::handle_task_result(&mut app, reloaded);
    assert_eq!(app.contents().len(), 4);
    assert!(app.contents().iter().any(|n| n.name == "Blog"));

    drop(task_sender);
    worker.await.unwrap();
}
