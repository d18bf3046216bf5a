use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account as seen by the rest of the application.
///
/// The stored password never leaves the repository layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub is_guest: bool,
    pub login_count: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// The reduced user record returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub is_guest: bool,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            is_guest: user.is_guest,
        }
    }
}

/// Per-user login statistics shown on the analytics page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginStats {
    pub username: String,
    pub display_name: String,
    pub is_guest: bool,
    pub login_count: i64,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// An account created at startup when its username is not taken yet.
#[derive(Debug, Clone, Copy)]
pub struct SeedUser {
    pub username: &'static str,
    pub password: &'static str,
    pub display_name: &'static str,
    pub is_guest: bool,
}

pub const DEFAULT_USERS: [SeedUser; 2] = [
    SeedUser {
        username: "owner",
        password: "changeme123",
        display_name: "Keith",
        is_guest: false,
    },
    SeedUser {
        username: "guest",
        password: "guest",
        display_name: "Guest Cowpoke",
        is_guest: true,
    },
];
