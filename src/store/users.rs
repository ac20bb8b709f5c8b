use crate::domain::user::{User, UserStatus};

use super::{
    bus::{BusEvent, SubscriptionId},
    entity::EntityStore,
};

const PATCH_UNKNOWN_USER: &str = "USER_PATCH_UNKNOWN_USER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
    Loaded { user_id: i64 },
    StatusChanged { user_id: i64, status: UserStatus },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserEventKind {
    Loaded,
    StatusChanged,
}

impl BusEvent for UserEvent {
    type Kind = UserEventKind;

    fn kind(&self) -> UserEventKind {
        match self {
            UserEvent::Loaded { .. } => UserEventKind::Loaded,
            UserEvent::StatusChanged { .. } => UserEventKind::StatusChanged,
        }
    }
}

pub struct UserStore {
    entries: EntityStore<i64, User, UserEvent>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            entries: EntityStore::new(),
        }
    }

    pub fn get(&self, user_id: i64) -> Option<User> {
        self.entries.get(&user_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn on(
        &self,
        kind: UserEventKind,
        handler: impl Fn(&UserEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.entries.on(kind, handler)
    }

    pub fn off(&self, id: SubscriptionId) {
        self.entries.off(id)
    }

    pub fn clear_subscribers(&self) {
        self.entries.clear_subscribers()
    }

    pub(crate) fn put(&self, user: User) {
        let user_id = user.id;
        self.entries.insert(user_id, user);
        self.entries.emit(&UserEvent::Loaded { user_id });
    }

    pub(crate) fn apply_status(&self, user_id: i64, status: UserStatus) {
        let applied = self.entries.patch(&user_id, |user| {
            user.status = status;
        });

        match applied {
            Some(()) => self
                .entries
                .emit(&UserEvent::StatusChanged { user_id, status }),
            None => tracing::debug!(
                code = PATCH_UNKNOWN_USER,
                user_id,
                "dropping status patch for a user that is not loaded"
            ),
        }
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
