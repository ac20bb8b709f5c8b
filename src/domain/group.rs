use serde::{Deserialize, Serialize};

/// Membership status of the current account in a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberStatus {
    /// Banned and left members have no access to the group content.
    pub fn is_accessible(&self) -> bool {
        !matches!(self, MemberStatus::Left | MemberStatus::Banned)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supergroup {
    pub id: i64,
    pub member_count: u32,
    pub is_channel: bool,
    pub status: MemberStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicGroup {
    pub id: i64,
    pub member_count: u32,
    pub status: MemberStatus,
}
