//! Paths of the `/todos` resource, shared by client and server.

use crate::task::{TaskId, UserId};

/// Collection path, used for `POST`.
pub const TODOS: &str = "/todos";

/// Item path template in axum syntax, used by the server router.
pub const TODO_ITEM: &str = "/todos/{id}";

/// Query parameter selecting the owner of a listing.
pub const USER_ID_PARAM: &str = "userId";

/// `GET` path listing the tasks of one user.
#[must_use]
pub fn list_path(user_id: UserId) -> String {
    format!("{TODOS}?{USER_ID_PARAM}={user_id}")
}

/// `PATCH`/`DELETE` path of a single task.
#[must_use]
pub fn item_path(id: TaskId) -> String {
    format!("{TODOS}/{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_deterministic() {
        assert_eq!(list_path(UserId::new(2392)), "/todos?userId=2392");
        assert_eq!(item_path(TaskId::new(15)), "/todos/15");
        assert_eq!(item_path(TaskId::new(-1)), "/todos/-1");
    }
}
