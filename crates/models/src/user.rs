use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::AuthError;

/// Usernames and character names share this rule.
pub const USERNAME_PATTERN: &str = "^[a-zA-Z0-9_]{6,30}$";

fn name_regex() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| Regex::new(USERNAME_PATTERN).expect("valid name pattern"))
}

/// Checks `value` against [`USERNAME_PATTERN`], naming `field` in the error.
pub fn validate_name(field: &str, value: &str) -> Result<(), AuthError> {
    if name_regex().is_match(value) {
        Ok(())
    } else {
        Err(AuthError::InvalidField {
            field: field.to_string(),
            reason: format!("string should match pattern '{}'", USERNAME_PATTERN),
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    Test,
    Steam,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Test => "TEST",
            Platform::Steam => "STEAM",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEST" => Ok(Platform::Test),
            "STEAM" => Ok(Platform::Steam),
            _ => Err(format!("Invalid platform: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    Active,
    Inactive,
    Blocked,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Inactive => "INACTIVE",
            UserStatus::Blocked => "BLOCKED",
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(UserStatus::Active),
            "INACTIVE" => Ok(UserStatus::Inactive),
            "BLOCKED" => Ok(UserStatus::Blocked),
            _ => Err(format!("Invalid user status: {}", s)),
        }
    }
}

/// A player account. Accounts are provisioned outside this service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub platform: Platform,
    pub status: UserStatus,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}
