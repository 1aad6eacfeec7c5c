//! Ordered execution of per-item async tasks.
//!
//! Each task starts only after the previous one has settled, and every input
//! yields exactly one [`TaskResult`], in input order. A failing task does not
//! stop the ones after it.

use std::future::Future;

/// Outcome of one task, paired with the input that produced it.
#[derive(Debug)]
pub struct TaskResult<I, T, E> {
    pub input: I,
    pub result: Result<T, E>,
}

impl<I, T, E> TaskResult<I, T, E> {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run `task` once per input, strictly one after another.
///
/// The closure receives a reference to each input and must return a future
/// that does not borrow it; clone what the task needs into the future.
pub async fn run_in_order<I, T, E, F, Fut>(inputs: Vec<I>, mut task: F) -> Vec<TaskResult<I, T, E>>
where
    F: FnMut(&I) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let total = inputs.len();
    let mut results = Vec::with_capacity(total);

    for (index, input) in inputs.into_iter().enumerate() {
        let result = task(&input).await;
        tracing::trace!(index, total, ok = result.is_ok(), "Task settled");
        results.push(TaskResult { input, result });
    }

    results
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_results_follow_input_order() {
        let results = run_in_order(vec![3_u64, 1, 2], |n| {
            let n = *n;
            async move {
                // Longer sleeps first; sequential execution keeps order anyway.
                tokio::time::sleep(Duration::from_millis(n * 5)).await;
                Ok::<_, String>(n * 10)
            }
        })
        .await;

        let values: Vec<u64> = results.iter().map(|r| *r.result.as_ref().unwrap()).collect();
        assert_eq!(values, vec![30, 10, 20]);
    }

    #[tokio::test]
    async fn test_tasks_never_overlap() {
        let active = Arc::new(Mutex::new(0_u32));
        let peak = Arc::new(Mutex::new(0_u32));

        run_in_order(vec![(); 4], |()| {
            let active = Arc::clone(&active);
            let peak = Arc::clone(&peak);
            async move {
                {
                    let mut now = active.lock().unwrap();
                    *now += 1;
                    let mut max = peak.lock().unwrap();
                    *max = (*max).max(*now);
                }
                tokio::task::yield_now().await;
                *active.lock().unwrap() -= 1;
                Ok::<_, ()>(())
            }
        })
        .await;

        assert_eq!(*peak.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_later_tasks() {
        let results = run_in_order(vec!["a", "fail", "c"], |s| {
            let s = *s;
            async move {
                if s == "fail" {
                    Err(format!("{s} rejected"))
                } else {
                    Ok(s.len())
                }
            }
        })
        .await;

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert_eq!(results[1].result.as_ref().unwrap_err(), "fail rejected");
        assert_eq!(results[1].input, "fail");
        assert!(results[2].is_ok());
    }
}
