//! Bounded concurrent execution of per-record tasks

use crate::domain::{DiaryError, Result};
use futures::stream::{self, StreamExt};
use std::future::Future;

/// Result of one task, tagged with the key it was started for
#[derive(Debug)]
pub enum TaskOutcome<K, T> {
    /// Task returned a value
    Succeeded { key: K, value: T },
    /// Task returned an error
    Failed { key: K, error: DiaryError },
}

impl<K, T> TaskOutcome<K, T> {
    /// Key of the task that produced this outcome
    pub fn key(&self) -> &K {
        match self {
            Self::Succeeded { key, .. } | Self::Failed { key, .. } => key,
        }
    }

    /// Whether the task succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Runs tasks with at most `max_in_flight` running at once
///
/// A failing task never cancels the others; every task contributes exactly
/// one outcome. Outcomes arrive in completion order.
#[derive(Debug, Clone, Copy)]
pub struct BoundedExecutor {
    max_in_flight: usize,
}

impl BoundedExecutor {
    /// Create an executor
    ///
    /// # Errors
    ///
    /// Returns `Validation` when `max_in_flight` is zero.
    pub fn new(max_in_flight: usize) -> Result<Self> {
        if max_in_flight == 0 {
            return Err(DiaryError::Validation(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(Self { max_in_flight })
    }

    /// Configured concurrency limit
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Drive every `(key, future)` pair and collect the outcomes
    ///
    /// Futures are not polled before they are admitted.
    pub async fn run_all<K, T, Fut, I>(&self, tasks: I) -> Vec<TaskOutcome<K, T>>
    where
        I: IntoIterator<Item = (K, Fut)>,
        Fut: Future<Output = Result<T>>,
    {
        stream::iter(tasks)
            .map(|(key, fut)| async move {
                match fut.await {
                    Ok(value) => TaskOutcome::Succeeded { key, value },
                    Err(error) => TaskOutcome::Failed { key, error },
                }
            })
            .buffer_unordered(self.max_in_flight)
            .collect()
            .await
    }
}
