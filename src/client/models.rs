//! Wire and domain types for the GitHub org API surface

use serde::{Deserialize, Serialize};
use std::fmt;

/// Organization record, as much of it as the preflight needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Organization login (the `org` path segment everywhere else)
    pub login: String,

    /// Opaque numeric identifier
    pub id: u64,
}

/// One entry from the org-wide team listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSummary {
    /// Normalized team identifier, unique within the organization
    pub slug: String,

    /// Opaque numeric identifier
    pub id: u64,

    /// Display name
    #[serde(default)]
    pub name: String,
}

/// One entry from a team's member listing.
///
/// The listing endpoint does not report the member's role per row; it
/// defaults to `member` here and the reconciliation diff never consults it
/// (desired assignments are re-applied unconditionally).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    /// Username
    pub login: String,

    /// Role within the team
    #[serde(default)]
    pub role: TeamRole,
}

/// One entry from a team's repository listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRepo {
    /// Repository name (without the owner prefix)
    pub name: String,

    /// Boolean access flags as reported by the API
    #[serde(default)]
    pub permissions: RepoPermissionFlags,
}

/// Boolean repository access flags.
///
/// The API reports one flag per permission level; the single effective
/// level is the highest flag that is set.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RepoPermissionFlags {
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub maintain: bool,
    #[serde(default)]
    pub push: bool,
    #[serde(default)]
    pub triage: bool,
    #[serde(default)]
    pub pull: bool,
}

impl RepoPermissionFlags {
    /// Reduce the flag set to the highest granted level, if any.
    pub fn effective(&self) -> Option<RepoPermission> {
        if self.admin {
            Some(RepoPermission::Admin)
        } else if self.maintain {
            Some(RepoPermission::Maintain)
        } else if self.push {
            Some(RepoPermission::Push)
        } else if self.triage {
            Some(RepoPermission::Triage)
        } else if self.pull {
            Some(RepoPermission::Pull)
        } else {
            None
        }
    }
}

/// Request body for team creation
#[derive(Debug, Clone, Serialize)]
pub struct CreateTeamRequest {
    /// Display name; the remote service derives the slug from it
    pub name: String,

    /// Team description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Team visibility
    pub privacy: TeamPrivacy,

    /// Parent team reference, omitted when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_team_id: Option<u64>,

    /// Whether the creating user is added as maintainer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_default_maintainer: Option<bool>,
}

/// Team visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamPrivacy {
    Closed,
    Secret,
}

impl TeamPrivacy {
    /// Parse a configured privacy value; `None` for unrecognized input.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "closed" => Some(Self::Closed),
            "secret" => Some(Self::Secret),
            _ => None,
        }
    }
}

impl fmt::Display for TeamPrivacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Secret => write!(f, "secret"),
        }
    }
}

/// Role of a user within a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    #[default]
    Member,
    Maintainer,
}

impl TeamRole {
    /// Parse a configured role value; `None` for unrecognized input.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "member" => Some(Self::Member),
            "maintainer" => Some(Self::Maintainer),
            _ => None,
        }
    }
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member => write!(f, "member"),
            Self::Maintainer => write!(f, "maintainer"),
        }
    }
}

/// Repository permission level, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoPermission {
    Pull,
    Triage,
    Push,
    Maintain,
    Admin,
}

impl RepoPermission {
    /// Parse a configured permission value; `None` for unrecognized input.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pull" => Some(Self::Pull),
            "triage" => Some(Self::Triage),
            "push" => Some(Self::Push),
            "maintain" => Some(Self::Maintain),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for RepoPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pull => "pull",
            Self::Triage => "triage",
            Self::Push => "push",
            Self::Maintain => "maintain",
            Self::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}
