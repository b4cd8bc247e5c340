use notify::event::ModifyKind;
use notify::{Event, EventKind};
use std::collections::HashSet;
use std::path::PathBuf;

/// Classified kind of a raw file-system event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Create,
    Update,
    Remove,
}

impl ChangeKind {
    /// Classify a notify event kind; access, rename and permission events are ignored.
    pub fn classify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(ChangeKind::Create),
            EventKind::Modify(ModifyKind::Metadata(_)) | EventKind::Modify(ModifyKind::Name(_)) => {
                None
            }
            EventKind::Modify(_) => Some(ChangeKind::Update),
            EventKind::Remove(_) => Some(ChangeKind::Remove),
            _ => None,
        }
    }
}

/// A single classified change to one path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileChange {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl FileChange {
    /// Split a notify event into one change per affected path
    pub fn from_event(event: Event) -> Vec<FileChange> {
        match ChangeKind::classify(&event.kind) {
            Some(kind) => event
                .paths
                .into_iter()
                .map(|path| FileChange { path, kind })
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Drop repeated changes (same path and kind), keeping first-seen order
pub fn dedup(changes: Vec<FileChange>) -> Vec<FileChange> {
    let mut seen = HashSet::with_capacity(changes.len());
    changes
        .into_iter()
        .filter(|change| seen.insert(change.clone()))
        .collect()
}
