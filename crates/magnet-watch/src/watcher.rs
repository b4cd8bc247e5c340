use crate::event::{dedup, ChangeKind, FileChange};
use crate::listener::PackageListener;
use magnet_core::{MagnetError, MagnetResult, Package};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use parking_lot::{Mutex, RwLock};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

type Listeners = Arc<RwLock<Vec<Arc<dyn PackageListener>>>>;
type RawEvents = mpsc::UnboundedReceiver<notify::Result<Event>>;

/// Trait for watch subscriptions over one installed package
pub trait Watcher: Send + Sync {
    /// Register a listener; safe to call while a watch is running
    fn add_listener(&self, listener: Arc<dyn PackageListener>);

    /// Start observing the package's install path in the background.
    ///
    /// Must be called from within a tokio runtime.
    fn watch(&self, pkg: &Package) -> MagnetResult<()>;

    /// Signal the background task to exit. Later calls are no-ops.
    fn stop(&self);
}

/// Creates a fresh watcher for each install path
pub type WatcherFactory = Arc<dyn Fn() -> Box<dyn Watcher> + Send + Sync>;

/// How raw events reach listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchMode {
    /// Dispatch every event as it arrives
    Immediate,
    /// Buffer events and dispatch them deduplicated once per interval
    Batched(Duration),
}

/// notify-backed watcher for a package install path
pub struct PackageWatcher {
    mode: WatchMode,
    listeners: Listeners,
    stop: Mutex<Option<oneshot::Sender<()>>>,
}

impl PackageWatcher {
    pub fn new() -> Self {
        Self::with_mode(WatchMode::Immediate)
    }

    pub fn batched(interval: Duration) -> Self {
        Self::with_mode(WatchMode::Batched(interval))
    }

    pub fn with_mode(mode: WatchMode) -> Self {
        Self {
            mode,
            listeners: Arc::new(RwLock::new(Vec::new())),
            stop: Mutex::new(None),
        }
    }

    /// Factory producing watchers in the given mode
    pub fn factory(mode: WatchMode) -> WatcherFactory {
        Arc::new(move || Box::new(PackageWatcher::with_mode(mode)) as Box<dyn Watcher>)
    }

    fn spawn_session(
        &self,
        pkg: Package,
        events: RawEvents,
        source: Option<RecommendedWatcher>,
    ) -> MagnetResult<()> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| MagnetError::Watch(format!("no async runtime: {}", e)))?;

        let (stop_tx, stop_rx) = oneshot::channel();
        {
            let mut stop = self.stop.lock();
            if stop.is_some() {
                return Err(MagnetError::Watch(format!(
                    "already watching {}",
                    pkg.install_path.display()
                )));
            }
            *stop = Some(stop_tx);
        }

        let session = WatchSession::new(pkg, self.listeners.clone(), source);
        match self.mode {
            WatchMode::Immediate => {
                runtime.spawn(session.run_immediate(events, stop_rx));
            }
            WatchMode::Batched(interval) => {
                let interval = interval.max(Duration::from_millis(1));
                runtime.spawn(session.run_batched(events, stop_rx, interval));
            }
        }
        Ok(())
    }
}

impl Default for PackageWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Watcher for PackageWatcher {
    fn add_listener(&self, listener: Arc<dyn PackageListener>) {
        self.listeners.write().push(listener);
    }

    fn watch(&self, pkg: &Package) -> MagnetResult<()> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut source = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })
        .map_err(|e| MagnetError::Watch(e.to_string()))?;
        source
            .watch(&pkg.install_path, RecursiveMode::Recursive)
            .map_err(|e| {
                MagnetError::Watch(format!("{}: {}", pkg.install_path.display(), e))
            })?;

        debug!(package = %pkg.name, path = %pkg.install_path.display(), mode = ?self.mode, "watching");
        self.spawn_session(pkg.clone(), rx, Some(source))
    }

    fn stop(&self) {
        if let Some(stop) = self.stop.lock().take() {
            let _ = stop.send(());
        }
    }
}

/// State owned by one background watch task
struct WatchSession {
    pkg: Package,
    canonical_root: Option<PathBuf>,
    listeners: Listeners,
    // Dropping the notify watcher ends the raw event stream.
    _source: Option<RecommendedWatcher>,
}

impl WatchSession {
    fn new(pkg: Package, listeners: Listeners, source: Option<RecommendedWatcher>) -> Self {
        let canonical_root = pkg.install_path.canonicalize().ok();
        Self {
            pkg,
            canonical_root,
            listeners,
            _source: source,
        }
    }

    fn is_root(&self, path: &Path) -> bool {
        path == self.pkg.install_path || self.canonical_root.as_deref() == Some(path)
    }

    fn dispatch(&self, changes: Vec<FileChange>) -> ControlFlow<()> {
        let listeners = self.listeners.read().clone();
        for change in changes {
            for listener in &listeners {
                match change.kind {
                    ChangeKind::Create => listener.on_create(&self.pkg, &change.path),
                    ChangeKind::Update => listener.on_update(&self.pkg, &change.path),
                    ChangeKind::Remove => listener.on_remove(&self.pkg, &change.path),
                }
            }
            if change.kind == ChangeKind::Remove && self.is_root(&change.path) {
                info!(package = %self.pkg.name, "package removed, exit watch");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn source_failed(&self, err: notify::Error) {
        error!(package = %self.pkg.name, error = %err, "watch source failed, exit watch");
    }

    async fn run_immediate(self, mut events: RawEvents, mut stop: oneshot::Receiver<()>) {
        loop {
            tokio::select! {
                _ = &mut stop => {
                    debug!(package = %self.pkg.name, "watch stopped");
                    break;
                }
                event = events.recv() => match event {
                    Some(Ok(event)) => {
                        if self.dispatch(FileChange::from_event(event)).is_break() {
                            break;
                        }
                    }
                    Some(Err(err)) => {
                        self.source_failed(err);
                        break;
                    }
                    None => break,
                },
            }
        }
    }

    async fn run_batched(
        self,
        mut events: RawEvents,
        mut stop: oneshot::Receiver<()>,
        interval: Duration,
    ) {
        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut buffer: Vec<FileChange> = Vec::new();

        loop {
            tokio::select! {
                _ = &mut stop => {
                    debug!(package = %self.pkg.name, "watch stopped");
                    break;
                }
                event = events.recv() => match event {
                    Some(Ok(event)) => buffer.extend(FileChange::from_event(event)),
                    Some(Err(err)) => {
                        self.source_failed(err);
                        break;
                    }
                    None => {
                        let _ = self.dispatch(dedup(std::mem::take(&mut buffer)));
                        break;
                    }
                },
                _ = ticker.tick() => {
                    if !buffer.is_empty()
                        && self.dispatch(dedup(std::mem::take(&mut buffer))).is_break()
                    {
                        break;
                    }
                }
            }
        }
    }
}
