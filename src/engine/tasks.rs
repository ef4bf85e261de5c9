use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::error::ShellError;

/// Work that runs outside the loop's thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Copies one pipeline stage's output into the next stage's input.
    Relay,
    /// A statement launched with `&`.
    Background,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Relay => write!(f, "relay"),
            TaskKind::Background => write!(f, "background"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    pub id: usize,
    pub kind: TaskKind,
    pub label: String,
    pub finished: bool,
}

struct Task {
    id: usize,
    kind: TaskKind,
    label: String,
    handle: JoinHandle<Result<(), ShellError>>,
}

impl Task {
    fn finish(self) {
        match self.handle.join() {
            Ok(Ok(())) => {
                tracing::debug!(id = self.id, kind = %self.kind, label = %self.label, "task finished");
            }
            Ok(Err(e)) => {
                tracing::debug!(id = self.id, kind = %self.kind, label = %self.label, error = %e, "task failed");
            }
            Err(_) => {
                tracing::error!(id = self.id, kind = %self.kind, label = %self.label, "task panicked");
            }
        }
    }
}

/// Every relay and background statement started by the session.
///
/// Nothing here blocks the loop: tasks are only joined once they have
/// finished (`reap`) or when `wait` is asked for explicitly.
#[derive(Default)]
pub struct TaskSet {
    next_id: AtomicUsize,
    tasks: Mutex<Vec<Task>>,
}

impl TaskSet {
    pub fn spawn<F>(&self, kind: TaskKind, label: &str, work: F) -> Result<usize, ShellError>
    where
        F: FnOnce() -> Result<(), ShellError> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let handle = thread::Builder::new()
            .name(format!("{}-{}", kind, id))
            .spawn(work)
            .map_err(|e| ShellError::Task(format!("starting {} for {}: {}", kind, label, e)))?;
        tracing::debug!(id, %kind, label, "task started");
        self.lock().push(Task { id, kind, label: label.to_string(), handle });
        Ok(id)
    }

    pub fn snapshot(&self) -> Vec<TaskSummary> {
        self.lock()
            .iter()
            .map(|t| TaskSummary {
                id: t.id,
                kind: t.kind,
                label: t.label.clone(),
                finished: t.handle.is_finished(),
            })
            .collect()
    }

    /// Number of tasks still running.
    pub fn outstanding(&self) -> usize {
        self.lock().iter().filter(|t| !t.handle.is_finished()).count()
    }

    /// Join and forget every task that has already finished.
    pub fn reap(&self) -> usize {
        let finished = self.take(|t| t.handle.is_finished());
        let count = finished.len();
        finished.into_iter().for_each(Task::finish);
        count
    }

    /// Block until every task of `kind` has finished.
    ///
    /// The calling thread's own task is skipped, so `wait &` cannot deadlock.
    pub fn wait(&self, kind: TaskKind) -> usize {
        let me = thread::current().id();
        let pending = self.take(|t| t.kind == kind && t.handle.thread().id() != me);
        let count = pending.len();
        pending.into_iter().for_each(Task::finish);
        count
    }

    fn take(&self, mut pred: impl FnMut(&Task) -> bool) -> Vec<Task> {
        let mut tasks = self.lock();
        let (taken, kept): (Vec<Task>, Vec<Task>) = tasks.drain(..).partition(|t| pred(t));
        *tasks = kept;
        taken
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Task>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_spawn_is_tracked_until_reaped() {
        let tasks = TaskSet::default();
        let (tx, rx) = mpsc::channel::<()>();
        let id = tasks
            .spawn(TaskKind::Background, "sleeper", move || {
                let _ = rx.recv();
                Ok(())
            })
            .unwrap();

        let snap = tasks.snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].id, id);
        assert_eq!(snap[0].kind, TaskKind::Background);
        assert_eq!(snap[0].label, "sleeper");
        assert_eq!(tasks.outstanding(), 1);
        assert_eq!(tasks.reap(), 0);

        drop(tx);
        assert_eq!(tasks.wait(TaskKind::Background), 1);
        assert!(tasks.snapshot().is_empty());
    }

    #[test]
    fn test_wait_only_joins_requested_kind() {
        let tasks = TaskSet::default();
        let (tx, rx) = mpsc::channel::<()>();
        tasks
            .spawn(TaskKind::Relay, "relay", move || {
                let _ = rx.recv();
                Ok(())
            })
            .unwrap();
        tasks
            .spawn(TaskKind::Background, "quick", || Err(ShellError::Task("boom".into())))
            .unwrap();

        assert_eq!(tasks.wait(TaskKind::Background), 1);
        assert_eq!(tasks.snapshot().len(), 1);

        drop(tx);
        while tasks.outstanding() > 0 {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(tasks.reap(), 1);
    }
}
