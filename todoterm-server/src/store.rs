//! In-memory task storage with fault injection.
//!
//! The [`TodoStore`] keeps every user's tasks in a single id-ordered map, so
//! listings come back in creation order. A [`FaultPlan`] can mark whole
//! operations, or operations on a single task, as failing; the HTTP layer
//! turns a planned fault into a `500` response.

use std::collections::BTreeMap;

use todoterm_proto::{Task, TaskFields, TaskId, UserId};
use tokio::sync::RwLock;

/// Operations of the `/todos` resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GET /todos?userId=`
    List,
    /// `POST /todos`
    Create,
    /// `PATCH /todos/{id}`
    Update,
    /// `DELETE /todos/{id}`
    Delete,
}

/// A planned failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fault {
    operation: Operation,
    /// `None` fails the operation for every task.
    task: Option<TaskId>,
}

/// Set of failures the server should simulate.
#[derive(Debug, Default)]
pub struct FaultPlan {
    faults: Vec<Fault>,
}

impl FaultPlan {
    /// Returns true if `operation` on `task` should fail.
    #[must_use]
    pub fn should_fail(&self, operation: Operation, task: Option<TaskId>) -> bool {
        self.faults
            .iter()
            .any(|f| f.operation == operation && (f.task.is_none() || f.task == task))
    }
}

#[derive(Debug)]
struct Tasks {
    by_id: BTreeMap<TaskId, Task>,
    next_id: i64,
}

/// Thread-safe in-memory task storage.
pub struct TodoStore {
    tasks: RwLock<Tasks>,
    faults: RwLock<FaultPlan>,
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoStore {
    /// Creates an empty store. Ids start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(Tasks {
                by_id: BTreeMap::new(),
                next_id: 1,
            }),
            faults: RwLock::new(FaultPlan::default()),
        }
    }

    /// Tasks owned by `user_id`, in creation order.
    pub async fn list(&self, user_id: UserId) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        tasks
            .by_id
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Stores a new task and returns it with its assigned id.
    pub async fn create(&self, fields: TaskFields) -> Task {
        let mut tasks = self.tasks.write().await;
        let id = TaskId::new(tasks.next_id);
        tasks.next_id += 1;
        let task = fields.into_task(id);
        tasks.by_id.insert(id, task.clone());
        task
    }

    /// Replaces the record of `id`. Returns `None` if there is no such task.
    pub async fn update(&self, id: TaskId, fields: TaskFields) -> Option<Task> {
        let mut tasks = self.tasks.write().await;
        let slot = tasks.by_id.get_mut(&id)?;
        *slot = fields.into_task(id);
        Some(slot.clone())
    }

    /// Removes `id`. Returns false if there was no such task.
    pub async fn delete(&self, id: TaskId) -> bool {
        let mut tasks = self.tasks.write().await;
        tasks.by_id.remove(&id).is_some()
    }

    /// Number of stored tasks across all users.
    pub async fn len(&self) -> usize {
        self.tasks.read().await.by_id.len()
    }

    /// Returns true if no tasks are stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Makes every call of `operation` fail.
    pub async fn fail(&self, operation: Operation) {
        self.faults.write().await.faults.push(Fault {
            operation,
            task: None,
        });
    }

    /// Makes `operation` fail for one task only.
    pub async fn fail_task(&self, operation: Operation, task: TaskId) {
        self.faults.write().await.faults.push(Fault {
            operation,
            task: Some(task),
        });
    }

    /// Removes all planned failures.
    pub async fn clear_faults(&self) {
        self.faults.write().await.faults.clear();
    }

    /// Returns true if `operation` on `task` is planned to fail.
    pub async fn should_fail(&self, operation: Operation, task: Option<TaskId>) -> bool {
        self.faults.read().await.should_fail(operation, task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str, user: u64) -> TaskFields {
        TaskFields {
            title: title.to_string(),
            completed: false,
            user_id: UserId::new(user),
        }
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let store = TodoStore::new();
        let a = store.create(fields("a", 1)).await;
        let b = store.create(fields("b", 1)).await;
        assert_eq!(a.id, TaskId::new(1));
        assert_eq!(b.id, TaskId::new(2));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn list_filters_by_user_in_creation_order() {
        let store = TodoStore::new();
        store.create(fields("mine 1", 1)).await;
        store.create(fields("theirs", 2)).await;
        store.create(fields("mine 2", 1)).await;

        let titles: Vec<String> = store
            .list(UserId::new(1))
            .await
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["mine 1", "mine 2"]);
    }

    #[tokio::test]
    async fn update_replaces_whole_record() {
        let store = TodoStore::new();
        let task = store.create(fields("old", 1)).await;
        let updated = store
            .update(
                task.id,
                TaskFields {
                    title: "new".to_string(),
                    completed: true,
                    user_id: UserId::new(1),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "new");
        assert!(updated.completed);
        assert_eq!(store.list(UserId::new(1)).await, vec![updated]);
    }

    #[tokio::test]
    async fn update_and_delete_unknown_ids() {
        let store = TodoStore::new();
        assert!(store.update(TaskId::new(9), fields("x", 1)).await.is_none());
        assert!(!store.delete(TaskId::new(9)).await);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn faults_match_operation_and_task() {
        let store = TodoStore::new();
        store.fail_task(Operation::Delete, TaskId::new(2)).await;
        store.fail(Operation::Create).await;

        assert!(store.should_fail(Operation::Delete, Some(TaskId::new(2))).await);
        assert!(!store.should_fail(Operation::Delete, Some(TaskId::new(3))).await);
        assert!(store.should_fail(Operation::Create, None).await);
        assert!(!store.should_fail(Operation::Update, Some(TaskId::new(2))).await);

        store.clear_faults().await;
        assert!(!store.should_fail(Operation::Create, None).await);
    }
}
