use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};

use crate::domain::user::{User, UserStatus, UserType};

/// The service-notifications account has a fixed well-known id and is
/// presented as neither online nor offline.
pub const SERVICE_NOTIFICATIONS_USER_ID: i64 = 777_000;

/// How long ago an offline user was last seen, bucketed the way clients
/// render it. Timestamps are unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastSeen {
    JustNow,
    MinutesAgo(i64),
    HoursAgo(i64),
    TodayAt(i64),
    YesterdayAt(i64),
    OnDate(i64),
}

/// Structured presence of a user. A pure function of `(status, now)`; the
/// view layer owns turning it into localized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    ServiceNotifications,
    Bot,
    Online,
    Offline(Option<LastSeen>),
    Recently,
    LastWeek,
    LastMonth,
    LongTimeAgo,
}

pub fn user_presence(user: &User, now: DateTime<Utc>) -> Presence {
    if user.id == SERVICE_NOTIFICATIONS_USER_ID {
        return Presence::ServiceNotifications;
    }
    if user.user_type == UserType::Bot {
        return Presence::Bot;
    }

    match user.status {
        UserStatus::Empty => Presence::LongTimeAgo,
        UserStatus::Online { .. } => Presence::Online,
        UserStatus::Offline { was_online } => Presence::Offline(classify_last_seen(was_online, now)),
        UserStatus::Recently => Presence::Recently,
        UserStatus::LastWeek => Presence::LastWeek,
        UserStatus::LastMonth => Presence::LastMonth,
    }
}

fn classify_last_seen(was_online: i64, now: DateTime<Utc>) -> Option<LastSeen> {
    if was_online <= 0 {
        return None;
    }
    let seen = Utc.timestamp_opt(was_online, 0).single()?;

    // A timestamp from the future collapses to "just now".
    let elapsed = now.signed_duration_since(seen);
    if elapsed < Duration::seconds(60) {
        return Some(LastSeen::JustNow);
    }
    if elapsed < Duration::hours(1) {
        return Some(LastSeen::MinutesAgo(elapsed.num_minutes()));
    }

    let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    if seen >= midnight {
        if elapsed < Duration::hours(6) {
            return Some(LastSeen::HoursAgo(elapsed.num_hours()));
        }
        return Some(LastSeen::TodayAt(was_online));
    }
    if seen >= midnight - Duration::days(1) {
        return Some(LastSeen::YesterdayAt(was_online));
    }

    Some(LastSeen::OnDate(was_online))
}

/// Online indicator: bots and the service account never count as online.
pub fn is_user_online(user: &User) -> bool {
    if user.id == SERVICE_NOTIFICATIONS_USER_ID || user.user_type == UserType::Bot {
        return false;
    }

    matches!(user.status, UserStatus::Online { .. })
}

/// Sort weight for member lists: more recently active users rank higher.
pub fn user_activity_order(user: &User) -> i64 {
    if user.user_type == UserType::Bot {
        return 0;
    }

    match user.status {
        UserStatus::Empty => 1,
        UserStatus::LastMonth => 10,
        UserStatus::LastWeek => 100,
        UserStatus::Recently => 1000,
        UserStatus::Offline { was_online } => was_online,
        UserStatus::Online { expires } => expires,
    }
}

/// Full display name. Accounts that are deleted, unknown, or carry no name
/// at all render as a deleted account.
pub fn user_display_name(user: &User) -> String {
    match user.user_type {
        UserType::Deleted | UserType::Unknown => "Deleted account".to_owned(),
        UserType::Regular | UserType::Bot => {
            match (user.first_name.is_empty(), user.last_name.is_empty()) {
                (false, false) => format!("{} {}", user.first_name, user.last_name),
                (false, true) => user.first_name.clone(),
                (true, false) => user.last_name.clone(),
                (true, true) => "Deleted account".to_owned(),
            }
        }
    }
}
