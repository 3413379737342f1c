//! Admin role with different permission levels.

use serde::{Deserialize, Serialize};

/// Role of an administrator account.
///
/// Stored as lowercase text in the database; use [`std::str::FromStr`] and
/// [`std::fmt::Display`] to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access to all admin features including admin-user management.
    SuperAdmin,
    /// Full access to catalog management.
    Admin,
    /// Read-only access to catalog data.
    Viewer,
}

impl AdminRole {
    /// Whether this role may create, edit, or delete catalog entries.
    #[must_use]
    pub const fn can_edit_catalog(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::Admin => write!(f, "admin"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "viewer" => Ok(Self::Viewer),
            _ => Err(format!("invalid admin role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_text() {
        for role in [AdminRole::SuperAdmin, AdminRole::Admin, AdminRole::Viewer] {
            assert_eq!(role.to_string().parse::<AdminRole>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("root".parse::<AdminRole>().is_err());
    }

    #[test]
    fn viewer_is_read_only() {
        assert!(AdminRole::SuperAdmin.can_edit_catalog());
        assert!(AdminRole::Admin.can_edit_catalog());
        assert!(!AdminRole::Viewer.can_edit_catalog());
    }
}
