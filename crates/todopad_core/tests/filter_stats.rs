use todopad_core::{compute_stats, filter_tasks, TaskFilter, TaskItem};

fn task(id: i64, completed: bool) -> TaskItem {
    TaskItem {
        id,
        text: format!("task {id}"),
        completed,
        created_at: "2024-01-01T00:00:00.000Z".to_string(),
    }
}

/// Deterministic mixes of open and completed tasks, including empty.
fn collections() -> Vec<Vec<TaskItem>> {
    (0..64u32)
        .map(|mask| {
            (0..6i64)
                .map(|bit| task(bit + 1, mask & (1 << bit) != 0))
                .collect()
        })
        .collect()
}

#[test]
fn all_returns_input_in_order() {
    let tasks = vec![task(3, true), task(1, false), task(2, true)];
    let ids: Vec<i64> = filter_tasks(&tasks, TaskFilter::All)
        .iter()
        .map(|task| task.id)
        .collect();
    assert_eq!(ids, [3, 1, 2]);
}

#[test]
fn active_and_completed_partition_every_collection() {
    for tasks in collections() {
        let active = filter_tasks(&tasks, TaskFilter::Active);
        let completed = filter_tasks(&tasks, TaskFilter::Completed);

        assert!(active.iter().all(|task| !task.completed));
        assert!(completed.iter().all(|task| task.completed));
        assert_eq!(active.len() + completed.len(), tasks.len());
        for task in &tasks {
            let in_active = active.iter().any(|t| t.id == task.id);
            let in_completed = completed.iter().any(|t| t.id == task.id);
            assert!(in_active ^ in_completed);
        }
    }
}

#[test]
fn filters_preserve_relative_order() {
    let tasks = vec![task(5, false), task(4, true), task(3, false), task(2, true)];
    let active: Vec<i64> = filter_tasks(&tasks, TaskFilter::Active)
        .iter()
        .map(|task| task.id)
        .collect();
    let completed: Vec<i64> = filter_tasks(&tasks, TaskFilter::Completed)
        .iter()
        .map(|task| task.id)
        .collect();
    assert_eq!(active, [5, 3]);
    assert_eq!(completed, [4, 2]);
}

#[test]
fn stats_add_up_for_every_collection() {
    for tasks in collections() {
        let stats = compute_stats(&tasks);
        assert_eq!(stats.total, tasks.len());
        assert_eq!(stats.active + stats.completed, stats.total);
        assert_eq!(stats.completed, filter_tasks(&tasks, TaskFilter::Completed).len());
    }
}

#[test]
fn filter_serializes_as_lowercase_word() {
    assert_eq!(
        serde_json::to_value(TaskFilter::Completed).unwrap(),
        serde_json::json!("completed")
    );
    let parsed: TaskFilter = serde_json::from_str("\"active\"").unwrap();
    assert_eq!(parsed, TaskFilter::Active);
}
