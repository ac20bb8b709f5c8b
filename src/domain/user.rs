use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UserType {
    Regular,
    Bot,
    Deleted,
    Unknown,
}

/// Presence as reported by the server. Offline carries the last-online
/// timestamp; Online carries the expiry of the online period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UserStatus {
    Empty,
    Online { expires: i64 },
    Offline { was_online: i64 },
    Recently,
    LastWeek,
    LastMonth,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub user_type: UserType,
    pub status: UserStatus,
}
