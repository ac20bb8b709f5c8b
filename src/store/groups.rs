use crate::domain::group::{BasicGroup, Supergroup};

use super::{
    bus::{BusEvent, SubscriptionId},
    entity::EntityStore,
};

/// Group records are small and always replaced whole by the server, so the
/// delta is just the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupEvent {
    Updated { group_id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupEventKind {
    Updated,
}

impl BusEvent for GroupEvent {
    type Kind = GroupEventKind;

    fn kind(&self) -> GroupEventKind {
        match self {
            GroupEvent::Updated { .. } => GroupEventKind::Updated,
        }
    }
}

pub struct SupergroupStore {
    entries: EntityStore<i64, Supergroup, GroupEvent>,
}

impl SupergroupStore {
    pub fn new() -> Self {
        Self {
            entries: EntityStore::new(),
        }
    }

    pub fn get(&self, supergroup_id: i64) -> Option<Supergroup> {
        self.entries.get(&supergroup_id)
    }

    pub fn on(
        &self,
        kind: GroupEventKind,
        handler: impl Fn(&GroupEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.entries.on(kind, handler)
    }

    pub fn off(&self, id: SubscriptionId) {
        self.entries.off(id)
    }

    pub fn clear_subscribers(&self) {
        self.entries.clear_subscribers()
    }

    pub(crate) fn put(&self, supergroup: Supergroup) {
        let group_id = supergroup.id;
        self.entries.insert(group_id, supergroup);
        self.entries.emit(&GroupEvent::Updated { group_id });
    }
}

impl Default for SupergroupStore {
    fn default() -> Self {
        Self::new()
    }
}

pub struct BasicGroupStore {
    entries: EntityStore<i64, BasicGroup, GroupEvent>,
}

impl BasicGroupStore {
    pub fn new() -> Self {
        Self {
            entries: EntityStore::new(),
        }
    }

    pub fn get(&self, basic_group_id: i64) -> Option<BasicGroup> {
        self.entries.get(&basic_group_id)
    }

    pub fn on(
        &self,
        kind: GroupEventKind,
        handler: impl Fn(&GroupEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.entries.on(kind, handler)
    }

    pub fn off(&self, id: SubscriptionId) {
        self.entries.off(id)
    }

    pub fn clear_subscribers(&self) {
        self.entries.clear_subscribers()
    }

    pub(crate) fn put(&self, basic_group: BasicGroup) {
        let group_id = basic_group.id;
        self.entries.insert(group_id, basic_group);
        self.entries.emit(&GroupEvent::Updated { group_id });
    }
}

impl Default for BasicGroupStore {
    fn default() -> Self {
        Self::new()
    }
}
