//! Property tests for the JSON shape of task records.
//!
//! 1. Every `Task` serializes to exactly `{id, title, completed, userId}`.
//! 2. Request bodies never carry an `id`.
//! 3. Arbitrary bytes never cause a panic when decoded as a task list.

use proptest::prelude::*;
use todoterm_proto::{Task, TaskId, UserId};

fn arb_task() -> impl Strategy<Value = Task> {
    (any::<i64>(), ".{0,64}", any::<bool>(), any::<u64>()).prop_map(
        |(id, title, completed, user)| Task {
            id: TaskId::new(id),
            title,
            completed,
            user_id: UserId::new(user),
        },
    )
}

proptest! {
    #[test]
    fn task_json_has_exactly_the_wire_keys(task in arb_task()) {
        let value = serde_json::to_value(&task).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        prop_assert_eq!(keys, vec!["completed", "id", "title", "userId"]);
        prop_assert_eq!(object["title"].as_str(), Some(task.title.as_str()));
    }

    #[test]
    fn request_body_never_carries_id(task in arb_task()) {
        let value = serde_json::to_value(task.fields()).unwrap();
        prop_assert!(value.get("id").is_none());
        prop_assert_eq!(value["completed"].as_bool(), Some(task.completed));
    }

    #[test]
    fn garbage_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = serde_json::from_slice::<Vec<Task>>(&bytes);
    }
}
