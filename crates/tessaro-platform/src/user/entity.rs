//! User Entity

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::{ApiError, Result};

pub const DEFAULT_NAME: &str = "Unnamed";

/// User role, a closed enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Member,
    OrganizationAdmin,
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Member
    }
}

impl UserRole {
    /// Parse a wire value; absence falls back to the default role.
    pub fn parse(value: Option<&str>) -> Result<Self> {
        match value {
            None => Ok(Self::default()),
            Some("member") => Ok(Self::Member),
            Some("organization_admin") => Ok(Self::OrganizationAdmin),
            Some("admin") => Ok(Self::Admin),
            Some(_) => Err(ApiError::validation(
                "role must be one of member, organization_admin, admin",
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::OrganizationAdmin => "organization_admin",
            Self::Admin => "admin",
        }
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Caller-supplied or generated UUID
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    /// Unique across the store
    pub email: String,

    #[serde(default)]
    pub role: UserRole,

    pub avatar_url: Option<String>,

    /// Organization membership; an empty list makes the user invisible
    #[serde(default)]
    pub organization_ids: Vec<String>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        id: Option<String>,
        name: Option<String>,
        email: impl Into<String>,
        role: UserRole,
        avatar_url: Option<String>,
        organization_ids: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            email: email.into(),
            role,
            avatar_url,
            organization_ids,
            created_at: now,
            updated_at: now,
        }
    }

    /// List/get/count queries only surface users that belong to at least
    /// one organization, optionally narrowed to a single one.
    pub fn is_visible(&self, organization_filter: Option<&str>) -> bool {
        if self.organization_ids.is_empty() {
            return false;
        }
        match organization_filter {
            Some(filter) => self.organization_ids.iter().any(|id| id == filter),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_accepts_the_closed_set() {
        assert_eq!(UserRole::parse(None).unwrap(), UserRole::Member);
        assert_eq!(UserRole::parse(Some("member")).unwrap(), UserRole::Member);
        assert_eq!(
            UserRole::parse(Some("organization_admin")).unwrap(),
            UserRole::OrganizationAdmin
        );
        assert_eq!(UserRole::parse(Some("admin")).unwrap(), UserRole::Admin);
        assert!(UserRole::parse(Some("superuser")).is_err());
    }

    #[test]
    fn new_defaults_name_and_generates_id() {
        let user = User::new(
            None,
            None,
            "a@b.com",
            UserRole::default(),
            None,
            vec!["org-1".to_string()],
        );
        assert_eq!(user.name, "Unnamed");
        assert_eq!(user.role, UserRole::Member);
        assert!(!user.id.is_empty());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn visibility_requires_membership() {
        let mut user = User::new(None, None, "a@b.com", UserRole::Member, None, Vec::new());
        assert!(!user.is_visible(None));

        user.organization_ids = vec!["org-1".to_string()];
        assert!(user.is_visible(None));
        assert!(user.is_visible(Some("org-1")));
        assert!(!user.is_visible(Some("org-2")));
    }
}
