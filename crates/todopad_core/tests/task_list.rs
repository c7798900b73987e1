use serde_json::json;
use todopad_core::{KvStore, MemoryStore, TaskFilter, TaskListError, TaskListService, TaskStats};

#[test]
fn open_uses_normalized_storage_key() {
    let store = MemoryStore::new();
    let tasks = TaskListService::open(&store, "  Tanaka  Yu ").unwrap();

    assert_eq!(tasks.storage_key().as_str(), "Tanaka-Yu-todos");
    assert!(tasks.tasks().is_empty());
    assert!(matches!(
        TaskListService::open(&store, "   "),
        Err(TaskListError::InvalidInput(_))
    ));
}

#[test]
fn operations_persist_and_reload() {
    let store = MemoryStore::new();
    let (first, second) = {
        let mut tasks = TaskListService::open(&store, "Tanaka").unwrap();
        let first = tasks.add_task("  buy milk ").unwrap();
        let second = tasks.add_task("call mom").unwrap();
        tasks.toggle_task(first.id).unwrap();
        tasks.edit_task(second.id, "call mom tonight").unwrap();
        (first, second)
    };

    let reloaded = TaskListService::open(&store, "Tanaka").unwrap();
    let items = reloaded.tasks();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, first.id);
    assert_eq!(items[0].text, "buy milk");
    assert!(items[0].completed);
    assert_eq!(items[1].id, second.id);
    assert_eq!(items[1].text, "call mom tonight");
    assert!(!items[1].completed);
}

#[test]
fn ids_stay_unique_for_rapid_adds() {
    let store = MemoryStore::new();
    let mut tasks = TaskListService::open(&store, "Tanaka").unwrap();

    let ids: Vec<i64> = (0..20)
        .map(|n| tasks.add_task(&format!("task {n}")).unwrap().id)
        .collect();

    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn invalid_input_and_missing_ids_change_nothing() {
    let store = MemoryStore::new();
    let mut tasks = TaskListService::open(&store, "Tanaka").unwrap();
    let task = tasks.add_task("keep me").unwrap();
    let stored = store.get("Tanaka-todos").unwrap();

    assert!(matches!(tasks.add_task("   "), Err(TaskListError::InvalidInput(_))));
    assert!(matches!(
        tasks.edit_task(task.id, &"x".repeat(501)),
        Err(TaskListError::InvalidInput(_))
    ));
    assert!(matches!(
        tasks.toggle_task(task.id + 1),
        Err(TaskListError::NotFound(id)) if id == task.id + 1
    ));
    assert!(matches!(
        tasks.remove_task(-5),
        Err(TaskListError::NotFound(-5))
    ));

    assert_eq!(tasks.tasks(), [task]);
    assert_eq!(store.get("Tanaka-todos").unwrap(), stored);
}

#[test]
fn views_and_clear_completed() {
    let store = MemoryStore::new();
    let mut tasks = TaskListService::open(&store, "Suzuki").unwrap();
    let a = tasks.add_task("a").unwrap();
    tasks.add_task("b").unwrap();
    let c = tasks.add_task("c").unwrap();
    tasks.toggle_task(a.id).unwrap();
    tasks.toggle_task(c.id).unwrap();

    assert_eq!(
        tasks.stats(),
        TaskStats {
            total: 3,
            active: 1,
            completed: 2
        }
    );
    let completed: Vec<&str> = tasks
        .filtered(TaskFilter::Completed)
        .iter()
        .map(|task| task.text.as_str())
        .collect();
    assert_eq!(completed, ["a", "c"]);

    assert_eq!(tasks.clear_completed().unwrap(), 2);
    assert_eq!(tasks.clear_completed().unwrap(), 0);
    let remaining: Vec<&str> = tasks.tasks().iter().map(|task| task.text.as_str()).collect();
    assert_eq!(remaining, ["b"]);

    let removed = tasks.remove_task(tasks.tasks()[0].id).unwrap();
    assert_eq!(removed.text, "b");
    assert_eq!(store.get("Suzuki-todos").unwrap().as_deref(), Some("[]"));
}

#[test]
fn invalid_stored_entries_are_dropped_not_coerced() {
    let store = MemoryStore::new();
    let stored = json!([
        { "id": 1, "text": "valid", "completed": false, "createdAt": "2024-01-01" },
        { "id": -1, "text": "negative id", "completed": false, "createdAt": "2024-01-01" },
        { "id": 2, "text": "string flag", "completed": "yes", "createdAt": "2024-01-01" },
        { "id": 3, "text": "bad date", "completed": true, "createdAt": "someday" },
        { "id": 1, "text": "duplicate id", "completed": true, "createdAt": "2024-01-02" },
        "not an object"
    ]);
    store.set("Tanaka-todos", &stored.to_string()).unwrap();

    let tasks = TaskListService::open(&store, "Tanaka").unwrap();

    assert_eq!(tasks.tasks().len(), 1);
    assert_eq!(tasks.tasks()[0].text, "valid");
}

#[test]
fn corrupt_stored_list_starts_empty() {
    let store = MemoryStore::new();
    store.set("Tanaka-todos", "[{").unwrap();

    let mut tasks = TaskListService::open(&store, "Tanaka").unwrap();
    assert!(tasks.tasks().is_empty());

    tasks.add_task("fresh start").unwrap();
    let reloaded = TaskListService::open(&store, "Tanaka").unwrap();
    assert_eq!(reloaded.tasks().len(), 1);
}

#[test]
fn users_with_distinct_keys_are_isolated() {
    let store = MemoryStore::new();
    let mut tanaka = TaskListService::open(&store, "Tanaka").unwrap();
    let mut suzuki = TaskListService::open(&store, "Suzuki").unwrap();

    tanaka.add_task("tanaka's task").unwrap();
    suzuki.add_task("suzuki's task").unwrap();

    let reloaded = TaskListService::open(&store, "Tanaka").unwrap();
    assert_eq!(reloaded.tasks().len(), 1);
    assert_eq!(reloaded.tasks()[0].text, "tanaka's task");
    assert_eq!(store.keys().unwrap(), ["Suzuki-todos", "Tanaka-todos"]);
}
