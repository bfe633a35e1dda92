//! Tests that compare index collections and corresponding rust types using proptest.

use modifier::Modifier;
use proptest::test_runner::TestCaseResult;

use std::fmt::Debug;

// Max size of the generated sequence of actions.
pub const ACTIONS_MAX_LEN: usize = 100;

pub fn compare_collections<A, R, T>(
    actions: &[A],
    compare: impl Fn(&T, &R) -> TestCaseResult,
) -> TestCaseResult
where
    A: Clone + Modifier<R> + Modifier<T> + Debug,
    R: Default,
    T: Default,
{
    let mut collection = T::default();
    let mut reference = R::default();

    for action in actions {
        action.clone().modify(&mut collection);
        action.clone().modify(&mut reference);
        compare(&collection, &reference)?;
    }
    Ok(())
}
