//! Desired-state configuration
//!
//! Loads the `teams:` manifest and validates it into typed desired-state
//! entities. Enum-ish fields are parsed as raw strings and converted here,
//! so the reconciliation engine only ever sees well-formed values and an
//! invalid manifest fails before any remote call.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::client::models::{RepoPermission, TeamPrivacy, TeamRole};
use crate::error::{ConfigError, Result};
use crate::sync::slug::slugify;

/// Validated desired state for a whole run
#[derive(Debug, Clone)]
pub struct TeamsConfig {
    pub teams: Vec<DesiredTeam>,
}

/// One validated team entry from the manifest
#[derive(Debug, Clone)]
pub struct DesiredTeam {
    /// Display name, as configured
    pub name: String,
    /// Slug derived from the name; the join key against observed teams
    pub slug: String,
    pub description: Option<String>,
    pub privacy: TeamPrivacy,
    pub parent_team_id: Option<u64>,
    pub create_default_maintainer: bool,
    pub roles: Vec<RoleGrant>,
    pub repositories: Vec<RepoGrant>,
}

/// Desired membership assignment
#[derive(Debug, Clone)]
pub struct RoleGrant {
    pub username: String,
    pub role: TeamRole,
}

/// Desired repository access grant
#[derive(Debug, Clone)]
pub struct RepoGrant {
    pub name: String,
    pub permission: RepoPermission,
}

// Raw manifest shapes. Unknown keys are ignored; enum-ish fields stay
// strings until validation so errors can name the offending team/repo.

#[derive(Debug, Deserialize)]
struct RawTeamsConfig {
    teams: Vec<RawTeamSpec>,
}

#[derive(Debug, Deserialize)]
struct RawTeamSpec {
    name: String,
    description: Option<String>,
    privacy: Option<String>,
    parent_team_id: Option<u64>,
    create_default_maintainer: Option<bool>,
    #[serde(default)]
    roles: Vec<RawRoleSpec>,
    #[serde(default)]
    repositories: Vec<RawRepoSpec>,
}

#[derive(Debug, Deserialize)]
struct RawRoleSpec {
    username: String,
    role: String,
}

#[derive(Debug, Deserialize)]
struct RawRepoSpec {
    name: String,
    permission: String,
}

impl TeamsConfig {
    /// Load and validate the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.display().to_string()).into()
            } else {
                crate::error::Error::Io(e)
            }
        })?;
        Self::parse(&contents)
    }

    /// Parse and validate manifest contents.
    pub fn parse(contents: &str) -> Result<Self> {
        let raw: RawTeamsConfig =
            serde_yaml::from_str(contents).map_err(ConfigError::from)?;
        Self::validate(raw)
    }

    fn validate(raw: RawTeamsConfig) -> Result<Self> {
        let mut teams = Vec::with_capacity(raw.teams.len());
        let mut seen_slugs: HashMap<String, String> = HashMap::new();

        for spec in raw.teams {
            let slug = slugify(&spec.name);
            if let Some(first) = seen_slugs.insert(slug.clone(), spec.name.clone()) {
                return Err(ConfigError::DuplicateSlug {
                    slug,
                    first,
                    second: spec.name,
                }
                .into());
            }

            let privacy = match spec.privacy {
                None => TeamPrivacy::Closed,
                Some(value) => TeamPrivacy::parse(&value).ok_or(ConfigError::InvalidPrivacy {
                    team: spec.name.clone(),
                    value,
                })?,
            };

            let mut roles = Vec::with_capacity(spec.roles.len());
            for role_spec in spec.roles {
                if roles
                    .iter()
                    .any(|r: &RoleGrant| r.username == role_spec.username)
                {
                    return Err(ConfigError::Duplicate {
                        team: spec.name,
                        kind: "username",
                        value: role_spec.username,
                    }
                    .into());
                }
                let role = TeamRole::parse(&role_spec.role).ok_or_else(|| {
                    ConfigError::InvalidRole {
                        team: spec.name.clone(),
                        username: role_spec.username.clone(),
                        value: role_spec.role.clone(),
                    }
                })?;
                roles.push(RoleGrant {
                    username: role_spec.username,
                    role,
                });
            }

            let mut repositories = Vec::with_capacity(spec.repositories.len());
            for repo_spec in spec.repositories {
                if repositories
                    .iter()
                    .any(|r: &RepoGrant| r.name == repo_spec.name)
                {
                    return Err(ConfigError::Duplicate {
                        team: spec.name,
                        kind: "repository",
                        value: repo_spec.name,
                    }
                    .into());
                }
                let permission = RepoPermission::parse(&repo_spec.permission).ok_or_else(|| {
                    ConfigError::InvalidPermission {
                        team: spec.name.clone(),
                        repo: repo_spec.name.clone(),
                        value: repo_spec.permission.clone(),
                    }
                })?;
                repositories.push(RepoGrant {
                    name: repo_spec.name,
                    permission,
                });
            }

            teams.push(DesiredTeam {
                slug,
                description: spec.description,
                privacy,
                // A configured parent of 0 means "no parent"
                parent_team_id: spec.parent_team_id.filter(|id| *id != 0),
                create_default_maintainer: spec.create_default_maintainer.unwrap_or(false),
                roles,
                repositories,
                name: spec.name,
            });
        }

        Ok(Self { teams })
    }
}
