use crate::core::{MagnetError, MagnetResult};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error};

type Registry = DashMap<String, Arc<TaskEntity>>;

/// Registry of active named tasks
///
/// At most one task per name is active at a time. A task leaves the registry
/// when its outstanding step count drops back to zero.
#[derive(Clone, Default)]
pub struct TaskController {
    tasks: Arc<Registry>,
}

impl TaskController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a task with this name is active
    pub fn is_running(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// Register a new task with zero outstanding steps.
    ///
    /// Fails with `TaskAlreadyRunning` while another task holds the name.
    pub fn add_task(&self, name: &str) -> MagnetResult<TaskHandle> {
        match self.tasks.entry(name.to_string()) {
            Entry::Occupied(_) => Err(MagnetError::TaskAlreadyRunning(name.to_string())),
            Entry::Vacant(vacant) => {
                let entity = Arc::new(TaskEntity::new(name, Arc::downgrade(&self.tasks)));
                vacant.insert(entity.clone());
                debug!(task = name, "task started");
                Ok(TaskHandle { entity })
            }
        }
    }

    /// Look up the handle of an active task
    pub fn find_task(&self, name: &str) -> Option<TaskHandle> {
        self.tasks.get(name).map(|entity| TaskHandle {
            entity: entity.value().clone(),
        })
    }

    /// Number of active tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

struct TaskEntity {
    name: String,
    outstanding: AtomicUsize,
    cleanup: Once,
    completed: watch::Sender<bool>,
    registry: Weak<Registry>,
}

impl TaskEntity {
    fn new(name: &str, registry: Weak<Registry>) -> Self {
        let (completed, _) = watch::channel(false);
        Self {
            name: name.to_string(),
            outstanding: AtomicUsize::new(0),
            cleanup: Once::new(),
            completed,
            registry,
        }
    }

    fn finish(self: &Arc<Self>) {
        self.cleanup.call_once(|| {
            if let Some(registry) = self.registry.upgrade() {
                registry.remove_if(&self.name, |_, entity| Arc::ptr_eq(entity, self));
            }
            self.completed.send_replace(true);
            debug!(task = %self.name, "task completed");
        });
    }
}

/// Handle to a named task; clones share the same counter
#[derive(Clone)]
pub struct TaskHandle {
    entity: Arc<TaskEntity>,
}

impl TaskHandle {
    pub fn name(&self) -> &str {
        &self.entity.name
    }

    /// Add `delta` outstanding steps
    pub fn add(&self, delta: usize) {
        self.entity.outstanding.fetch_add(delta, Ordering::AcqRel);
    }

    /// Outstanding steps not yet completed
    pub fn outstanding(&self) -> usize {
        self.entity.outstanding.load(Ordering::Acquire)
    }

    /// Check whether the task has completed
    pub fn is_done(&self) -> bool {
        *self.entity.completed.borrow()
    }

    /// Complete one step.
    ///
    /// Returns `TaskOverCompleted` when no steps are outstanding; the count
    /// never drops below zero. Reaching zero removes the task from its
    /// controller and releases every waiter, exactly once.
    pub fn try_done(&self) -> MagnetResult<()> {
        let previous = self
            .entity
            .outstanding
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                count.checked_sub(1)
            })
            .map_err(|_| MagnetError::TaskOverCompleted(self.entity.name.clone()))?;

        if previous == 1 {
            self.entity.finish();
        }
        Ok(())
    }

    /// Complete one step, panicking when more steps complete than were added
    pub fn done(&self) {
        if let Err(err) = self.try_done() {
            error!(task = %self.entity.name, "{}", err);
            panic!("{}", err);
        }
    }

    /// Wait until the task completes or `timeout` elapses.
    ///
    /// `None` waits indefinitely. Returns `true` if the task completed.
    pub async fn wait(&self, timeout: Option<Duration>) -> bool {
        let mut completed = self.entity.completed.subscribe();
        let finished = completed.wait_for(|done| *done);
        match timeout {
            None => finished.await.is_ok(),
            Some(limit) => matches!(tokio::time::timeout(limit, finished).await, Ok(Ok(_))),
        }
    }
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("name", &self.entity.name)
            .field("outstanding", &self.outstanding())
            .finish()
    }
}
