//! Supervised background work.
//!
//! Checkout hands off the order save and the delayed session reload to
//! tokio tasks. Nothing the customer waits on awaits them; the supervisor
//! logs every outcome and lets callers collect the results later.

use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, Instrument};

/// How a background task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Succeeded,
    Failed(String),
    /// The task panicked or was aborted.
    Crashed(String),
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Succeeded)
    }
}

/// A finished task and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub name: String,
    pub outcome: TaskOutcome,
}

type Reports = Arc<Mutex<Vec<(u64, TaskReport)>>>;

/// Owns the handles of detached tasks.
///
/// Tasks record their own outcome when they end. Handles of finished tasks
/// are released on the next `spawn`, so only running work keeps a handle.
#[derive(Debug, Default)]
pub struct TaskSupervisor {
    next_seq: u64,
    running: Vec<(u64, String, JoinHandle<()>)>,
    reports: Reports,
}

impl TaskSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `fut` on the current runtime.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, E>(&mut self, name: impl Into<String>, fut: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        self.release_finished();

        let name = name.into();
        let seq = self.next_seq;
        self.next_seq += 1;

        let span = info_span!("background", task = %name);
        let task_name = name.clone();
        let reports = Arc::clone(&self.reports);
        let handle = tokio::spawn(
            async move {
                let outcome = match fut.await {
                    Ok(()) => {
                        info!(task = %task_name, "Background task finished");
                        TaskOutcome::Succeeded
                    }
                    Err(e) => {
                        error!(task = %task_name, error = %e, "Background task failed");
                        TaskOutcome::Failed(e.to_string())
                    }
                };
                lock(&reports).push((
                    seq,
                    TaskReport {
                        name: task_name,
                        outcome,
                    },
                ));
            }
            .instrument(span),
        );
        self.running.push((seq, name, handle));
    }

    /// Number of tasks not yet collected.
    pub fn pending(&self) -> usize {
        let reports = lock(&self.reports);
        let unreported = self
            .running
            .iter()
            .filter(|(seq, _, _)| !reports.iter().any(|(s, _)| s == seq))
            .count();
        unreported + reports.len()
    }

    /// Wait for every task and return their reports in spawn order.
    pub async fn join_all(&mut self) -> Vec<TaskReport> {
        for (seq, name, handle) in self.running.drain(..) {
            if let Err(e) = handle.await {
                error!(task = %name, error = %e, "Background task crashed");
                lock(&self.reports).push((
                    seq,
                    TaskReport {
                        name,
                        outcome: TaskOutcome::Crashed(e.to_string()),
                    },
                ));
            }
        }

        let mut reports = std::mem::take(&mut *lock(&self.reports));
        reports.sort_by_key(|(seq, _)| *seq);
        reports.into_iter().map(|(_, report)| report).collect()
    }

    /// Drop handles of tasks that already ended. A task that ended without
    /// recording an outcome panicked.
    fn release_finished(&mut self) {
        let reports = Arc::clone(&self.reports);
        self.running.retain(|(seq, name, handle)| {
            if !handle.is_finished() {
                return true;
            }
            let mut reports = lock(&reports);
            if !reports.iter().any(|(s, _)| s == seq) {
                error!(task = %name, "Background task crashed");
                reports.push((
                    *seq,
                    TaskReport {
                        name: name.clone(),
                        outcome: TaskOutcome::Crashed("task panicked".to_string()),
                    },
                ));
            }
            false
        });
    }
}

fn lock(reports: &Reports) -> MutexGuard<'_, Vec<(u64, TaskReport)>> {
    reports.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reports_success_and_failure_in_order() {
        let mut supervisor = TaskSupervisor::new();
        supervisor.spawn("ok", async { Ok::<(), String>(()) });
        supervisor.spawn("boom", async { Err::<(), _>("database offline") });
        assert_eq!(supervisor.pending(), 2);

        let reports = supervisor.join_all().await;
        assert_eq!(supervisor.pending(), 0);
        assert_eq!(reports[0].name, "ok");
        assert!(reports[0].outcome.is_success());
        assert_eq!(reports[1].outcome, TaskOutcome::Failed("database offline".into()));
    }

    #[tokio::test]
    async fn test_panicking_task_is_reported() {
        let mut supervisor = TaskSupervisor::new();
        supervisor.spawn("panics", async {
            if true {
                panic!("bad state");
            }
            Ok::<(), String>(())
        });

        let reports = supervisor.join_all().await;
        assert!(matches!(reports[0].outcome, TaskOutcome::Crashed(_)));
    }

    #[tokio::test]
    async fn test_join_all_on_empty_supervisor() {
        let mut supervisor = TaskSupervisor::new();
        assert!(supervisor.join_all().await.is_empty());
    }

    async fn wait_until_finished(supervisor: &TaskSupervisor) {
        while !supervisor.running.iter().all(|(_, _, h)| h.is_finished()) {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_finished_handles_are_released_on_spawn() {
        let mut supervisor = TaskSupervisor::new();
        supervisor.spawn("first", async { Ok::<(), String>(()) });
        wait_until_finished(&supervisor).await;

        supervisor.spawn("second", async { Ok::<(), String>(()) });
        assert_eq!(supervisor.running.len(), 1);
        assert_eq!(supervisor.pending(), 2);

        let reports = supervisor.join_all().await;
        let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
        assert!(reports.iter().all(|r| r.outcome.is_success()));
    }

    #[tokio::test]
    async fn test_released_panicking_task_is_still_reported() {
        let mut supervisor = TaskSupervisor::new();
        supervisor.spawn("panics", async {
            if true {
                panic!("bad state");
            }
            Ok::<(), String>(())
        });
        wait_until_finished(&supervisor).await;
        supervisor.spawn("after", async { Ok::<(), String>(()) });

        let reports = supervisor.join_all().await;
        assert_eq!(reports[0].name, "panics");
        assert!(matches!(reports[0].outcome, TaskOutcome::Crashed(_)));
        assert!(reports[1].outcome.is_success());
    }
}
