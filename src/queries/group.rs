use crate::{
    domain::group::{BasicGroup, MemberStatus, Supergroup},
    store::chats::ChatStore,
};

/// Presentation-ready summary of a group's footer line: either the group is
/// not accessible to the account, or a member count with the number of
/// members currently online (0 or 1 online members are not worth showing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStatus {
    Inaccessible { is_channel: bool },
    Members { count: u32, online: Option<u32> },
}

pub fn supergroup_status(chats: &ChatStore, chat_id: i64, supergroup: &Supergroup) -> GroupStatus {
    if supergroup.status == MemberStatus::Banned {
        return GroupStatus::Inaccessible {
            is_channel: supergroup.is_channel,
        };
    }

    members_status(supergroup.member_count, chats.online_member_count(chat_id))
}

pub fn basic_group_status(chats: &ChatStore, chat_id: i64, basic_group: &BasicGroup) -> GroupStatus {
    if !basic_group.status.is_accessible() {
        return GroupStatus::Inaccessible { is_channel: false };
    }

    members_status(basic_group.member_count, chats.online_member_count(chat_id))
}

fn members_status(count: u32, online: u32) -> GroupStatus {
    GroupStatus::Members {
        count,
        online: (online > 1).then_some(online),
    }
}
