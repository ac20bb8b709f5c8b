use crate::{
    domain::chat::{Chat, ChatType},
    store::{
        chats::ChatStore,
        groups::{BasicGroupStore, SupergroupStore},
    },
};

/// `mute_for` value meaning "muted indefinitely" (i32::MAX seconds).
pub const MUTED_VALUE_MAX: i32 = 2_147_483_647;
/// `mute_for` value meaning "not muted".
pub const MUTED_VALUE_MIN: i32 = 0;

/// Effective mute duration. Deferring to the scope default reads as
/// unmuted: the core tracks no scope-wide settings.
pub fn chat_mute_for(chat: &Chat) -> i32 {
    if chat.notification_settings.use_default_mute_for {
        MUTED_VALUE_MIN
    } else {
        chat.notification_settings.mute_for
    }
}

pub fn is_chat_muted(chat: &Chat) -> bool {
    chat_mute_for(chat) > 0
}

/// The `mute_for` sentinel for the requested mute state.
pub fn muted_value(mute: bool) -> i32 {
    if mute {
        MUTED_VALUE_MAX
    } else {
        MUTED_VALUE_MIN
    }
}

pub fn unread_count(chats: &ChatStore, chat_id: i64) -> u32 {
    chats.get(chat_id).map(|chat| chat.unread_count).unwrap_or(0)
}

/// History can be cleared everywhere except channels.
pub fn can_clear_history(supergroups: &SupergroupStore, chat: &Chat) -> bool {
    match chat.chat_type {
        ChatType::Private { .. } | ChatType::Secret { .. } | ChatType::BasicGroup { .. } => true,
        ChatType::Supergroup { supergroup_id } => supergroups
            .get(supergroup_id)
            .map(|supergroup| !supergroup.is_channel)
            .unwrap_or(false),
    }
}

/// A chat can be deleted (or left) unless the account is already out of it.
/// Group records that are not loaded degrade to not-deletable.
pub fn can_delete_chat(
    supergroups: &SupergroupStore,
    basic_groups: &BasicGroupStore,
    chat: &Chat,
) -> bool {
    match chat.chat_type {
        ChatType::Private { .. } | ChatType::Secret { .. } => true,
        ChatType::BasicGroup { basic_group_id } => basic_groups
            .get(basic_group_id)
            .map(|group| group.status.is_accessible())
            .unwrap_or(false),
        ChatType::Supergroup { supergroup_id } => supergroups
            .get(supergroup_id)
            .map(|supergroup| supergroup.status.is_accessible())
            .unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::group::{BasicGroup, MemberStatus, Supergroup},
        test_support::{sample_private_chat, sample_supergroup_chat},
    };

    fn supergroup(id: i64, is_channel: bool, status: MemberStatus) -> Supergroup {
        Supergroup {
            id,
            member_count: 5,
            is_channel,
            status,
        }
    }

    #[test]
    fn chat_deferring_to_default_reads_as_unmuted() {
        let chat = sample_private_chat(1);

        assert!(chat.notification_settings.use_default_mute_for);
        assert!(!is_chat_muted(&chat));
    }

    #[test]
    fn explicit_mute_for_controls_mute_state() {
        let mut chat = sample_private_chat(1);
        chat.notification_settings.use_default_mute_for = false;
        chat.notification_settings.mute_for = MUTED_VALUE_MAX;

        assert!(is_chat_muted(&chat));

        chat.notification_settings.mute_for = MUTED_VALUE_MIN;

        assert!(!is_chat_muted(&chat));
    }

    #[test]
    fn muted_value_maps_to_the_sentinels() {
        assert_eq!(muted_value(true), MUTED_VALUE_MAX);
        assert_eq!(muted_value(false), MUTED_VALUE_MIN);
    }

    #[test]
    fn unread_count_degrades_to_zero_for_unloaded_chat() {
        let chats = ChatStore::new();

        assert_eq!(unread_count(&chats, 1), 0);
    }

    #[test]
    fn private_chat_history_can_be_cleared() {
        let supergroups = SupergroupStore::new();

        assert!(can_clear_history(&supergroups, &sample_private_chat(1)));
    }

    #[test]
    fn channel_history_cannot_be_cleared() {
        let supergroups = SupergroupStore::new();
        supergroups.put(supergroup(10, true, MemberStatus::Member));

        assert!(!can_clear_history(
            &supergroups,
            &sample_supergroup_chat(1, 10)
        ));
    }

    #[test]
    fn non_channel_supergroup_history_can_be_cleared() {
        let supergroups = SupergroupStore::new();
        supergroups.put(supergroup(10, false, MemberStatus::Member));

        assert!(can_clear_history(
            &supergroups,
            &sample_supergroup_chat(1, 10)
        ));
    }

    #[test]
    fn unloaded_supergroup_degrades_to_not_clearable() {
        let supergroups = SupergroupStore::new();

        assert!(!can_clear_history(
            &supergroups,
            &sample_supergroup_chat(1, 10)
        ));
    }

    #[test]
    fn banned_member_cannot_delete_the_chat() {
        let supergroups = SupergroupStore::new();
        let basic_groups = BasicGroupStore::new();
        supergroups.put(supergroup(10, false, MemberStatus::Banned));

        assert!(!can_delete_chat(
            &supergroups,
            &basic_groups,
            &sample_supergroup_chat(1, 10)
        ));
    }

    #[test]
    fn active_member_can_delete_a_basic_group_chat() {
        let supergroups = SupergroupStore::new();
        let basic_groups = BasicGroupStore::new();
        basic_groups.put(BasicGroup {
            id: 20,
            member_count: 3,
            status: MemberStatus::Member,
        });

        let mut chat = sample_private_chat(1);
        chat.chat_type = crate::domain::chat::ChatType::BasicGroup { basic_group_id: 20 };

        assert!(can_delete_chat(&supergroups, &basic_groups, &chat));
    }

    #[test]
    fn private_chats_are_always_deletable() {
        let supergroups = SupergroupStore::new();
        let basic_groups = BasicGroupStore::new();

        assert!(can_delete_chat(
            &supergroups,
            &basic_groups,
            &sample_private_chat(1)
        ));
    }
}
