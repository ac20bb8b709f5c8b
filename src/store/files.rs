use crate::domain::file::File;

use super::{
    bus::{BusEvent, SubscriptionId},
    entity::EntityStore,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    Updated { file_id: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEventKind {
    Updated,
}

impl BusEvent for FileEvent {
    type Kind = FileEventKind;

    fn kind(&self) -> FileEventKind {
        match self {
            FileEvent::Updated { .. } => FileEventKind::Updated,
        }
    }
}

/// Transfer-state cache for media files. The server pushes the full file
/// record on every local/remote availability change.
pub struct FileStore {
    entries: EntityStore<i32, File, FileEvent>,
}

impl FileStore {
    pub fn new() -> Self {
        Self {
            entries: EntityStore::new(),
        }
    }

    pub fn get(&self, file_id: i32) -> Option<File> {
        self.entries.get(&file_id)
    }

    pub fn on(
        &self,
        kind: FileEventKind,
        handler: impl Fn(&FileEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.entries.on(kind, handler)
    }

    pub fn off(&self, id: SubscriptionId) {
        self.entries.off(id)
    }

    pub fn clear_subscribers(&self) {
        self.entries.clear_subscribers()
    }

    pub(crate) fn put(&self, file: File) {
        let file_id = file.id;
        self.entries.insert(file_id, file);
        self.entries.emit(&FileEvent::Updated { file_id });
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}
