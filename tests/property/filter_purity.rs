//! Property tests for the derived views of the list state.
//!
//! Verification command: `cargo test --test filter_purity`

use proptest::prelude::*;
use todoterm::filter::Filter;
use todoterm::state::ListState;
use todoterm_proto::{Task, TaskId, UserId};

fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(("[a-z ]{0,12}", any::<bool>()), 0..20).prop_map(|specs| {
        specs
            .into_iter()
            .zip(1..)
            .map(|((title, completed), id)| Task {
                id: TaskId::new(id),
                title,
                completed,
                user_id: UserId::new(1),
            })
            .collect()
    })
}

fn arb_filter() -> impl Strategy<Value = Filter> {
    prop::sample::select(Filter::ALL.to_vec())
}

proptest! {
    #[test]
    fn filtering_never_changes_collection(tasks in arb_tasks(), filters in prop::collection::vec(arb_filter(), 0..10)) {
        let mut state = ListState { tasks: tasks.clone(), ..ListState::default() };
        for filter in filters {
            state.filter = filter;
            let _ = state.rows();
            let _ = state.items_left_label();
        }
        prop_assert_eq!(state.tasks, tasks);
    }

    #[test]
    fn visible_tasks_are_the_matching_subsequence(tasks in arb_tasks(), filter in arb_filter()) {
        let state = ListState { tasks, filter, ..ListState::default() };
        let expected: Vec<&Task> = state.tasks.iter().filter(|t| filter.matches(t)).collect();
        prop_assert_eq!(state.visible_tasks(), expected);
    }

    #[test]
    fn active_and_completed_partition_all(tasks in arb_tasks()) {
        let mut state = ListState { tasks, ..ListState::default() };
        let total = state.rows().len();
        state.filter = Filter::Active;
        let active = state.rows().len();
        state.filter = Filter::Completed;
        let completed = state.rows().len();

        prop_assert_eq!(active + completed, total);
        prop_assert_eq!(active, state.active_count());
        prop_assert_eq!(state.items_left_label(), format!("{active} items left"));
    }

    #[test]
    fn all_completed_iff_no_active(tasks in arb_tasks()) {
        let state = ListState { tasks, ..ListState::default() };
        prop_assert_eq!(state.all_completed(), state.active_count() == 0);
    }
}
