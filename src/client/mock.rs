//! Mock GitHub API client for testing
//!
//! In-memory org state with call counts and captured write operations, so
//! engine tests can assert both the plan and the remote traffic. Mutations
//! update the in-memory state, which makes run-twice convergence tests
//! observe real post-state.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::models::{
    CreateTeamRequest, Organization, RepoPermission, RepoPermissionFlags, TeamMember, TeamRepo,
    TeamRole, TeamSummary,
};
use super::GitHubApi;
use crate::error::{ApiError, Result};
use crate::sync::slug::slugify;

/// Mock API client for testing.
///
/// Configure remote state via builder methods, run the engine against a
/// clone, then assert on `counts()` and `captured_writes()`.
#[derive(Clone, Default)]
pub struct MockGitHubClient {
    teams: Arc<Mutex<Vec<TeamSummary>>>,
    members: Arc<Mutex<HashMap<String, Vec<TeamMember>>>>,
    repos: Arc<Mutex<HashMap<String, Vec<TeamRepo>>>>,
    /// Slugs whose deletion is denied with Forbidden
    protected: Arc<Mutex<Vec<String>>>,
    /// Error returned by the next call, whatever it is - consumed on use
    fail_next: Arc<Mutex<Option<ApiError>>>,
    /// Error returned by every delete_team call
    delete_team_error: Arc<Mutex<Option<ApiError>>>,
    next_team_id: Arc<Mutex<u64>>,
    call_counts: Arc<Mutex<CallCounts>>,
    writes: Arc<Mutex<Vec<WriteOp>>>,
}

/// Per-method call counters for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub get_organization: usize,
    pub list_teams: usize,
    pub get_team_by_slug: usize,
    pub create_team: usize,
    pub delete_team: usize,
    pub list_team_members: usize,
    pub set_membership: usize,
    pub remove_membership: usize,
    pub list_team_repos: usize,
    pub set_repo_permission: usize,
    pub remove_repo_access: usize,
}

impl CallCounts {
    /// Total number of write (mutating) calls issued.
    pub fn writes(&self) -> usize {
        self.create_team
            + self.delete_team
            + self.set_membership
            + self.remove_membership
            + self.set_repo_permission
            + self.remove_repo_access
    }
}

/// A captured mutating call, in issue order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    CreateTeam {
        name: String,
    },
    DeleteTeam {
        slug: String,
    },
    SetMembership {
        slug: String,
        username: String,
        role: TeamRole,
    },
    RemoveMembership {
        slug: String,
        username: String,
    },
    SetRepoPermission {
        slug: String,
        repo: String,
        permission: RepoPermission,
    },
    RemoveRepoAccess {
        slug: String,
        repo: String,
    },
}

/// Expand a permission level into the flag set the listing would report
fn flags_for(permission: RepoPermission) -> RepoPermissionFlags {
    RepoPermissionFlags {
        admin: permission >= RepoPermission::Admin,
        maintain: permission >= RepoPermission::Maintain,
        push: permission >= RepoPermission::Push,
        triage: permission >= RepoPermission::Triage,
        pull: permission >= RepoPermission::Pull,
    }
}

impl MockGitHubClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing team.
    pub fn with_team(self, slug: &str, id: u64) -> Self {
        self.teams.try_lock().unwrap().push(TeamSummary {
            slug: slug.to_string(),
            id,
            name: slug.to_string(),
        });
        self.members
            .try_lock().unwrap()
            .entry(slug.to_string())
            .or_default();
        self.repos
            .try_lock().unwrap()
            .entry(slug.to_string())
            .or_default();
        self
    }

    /// Seed members for a team.
    pub fn with_members(self, slug: &str, logins: &[&str]) -> Self {
        let members = logins
            .iter()
            .map(|login| TeamMember {
                login: (*login).to_string(),
                role: TeamRole::Member,
            })
            .collect();
        self.members
            .try_lock().unwrap()
            .insert(slug.to_string(), members);
        self
    }

    /// Seed repository grants for a team.
    pub fn with_repo_grant(self, slug: &str, repo: &str, permission: RepoPermission) -> Self {
        self.repos
            .try_lock().unwrap()
            .entry(slug.to_string())
            .or_default()
            .push(TeamRepo {
                name: repo.to_string(),
                permissions: flags_for(permission),
            });
        self
    }

    /// Deny deletion of a team with Forbidden.
    pub fn with_protected_team(self, slug: &str) -> Self {
        self.protected.try_lock().unwrap().push(slug.to_string());
        self
    }

    /// Fail the next call with the given error.
    pub fn fail_next_with(self, err: ApiError) -> Self {
        *self.fail_next.try_lock().unwrap() = Some(err);
        self
    }

    /// Fail every delete_team call with the given error.
    pub fn fail_delete_with(self, err: ApiError) -> Self {
        *self.delete_team_error.try_lock().unwrap() = Some(err);
        self
    }

    /// Snapshot of the call counters.
    pub async fn counts(&self) -> CallCounts {
        self.call_counts.lock().await.clone()
    }

    /// Captured write operations, in issue order.
    pub async fn captured_writes(&self) -> Vec<WriteOp> {
        self.writes.lock().await.clone()
    }

    /// Current remote team slugs, sorted.
    pub async fn team_slugs(&self) -> Vec<String> {
        let mut slugs: Vec<String> = self
            .teams
            .lock()
            .await
            .iter()
            .map(|t| t.slug.clone())
            .collect();
        slugs.sort();
        slugs
    }

    async fn take_injected_error(&self) -> Option<ApiError> {
        self.fail_next.lock().await.take()
    }

    async fn team_exists(&self, slug: &str) -> bool {
        self.teams.lock().await.iter().any(|t| t.slug == slug)
    }
}

#[async_trait]
impl GitHubApi for MockGitHubClient {
    async fn get_organization(&self, org: &str) -> Result<Organization> {
        self.call_counts.lock().await.get_organization += 1;
        if let Some(err) = self.take_injected_error().await {
            return Err(err.into());
        }
        Ok(Organization {
            login: org.to_string(),
            id: 1,
        })
    }

    async fn list_teams(&self, _org: &str) -> Result<Vec<TeamSummary>> {
        self.call_counts.lock().await.list_teams += 1;
        if let Some(err) = self.take_injected_error().await {
            return Err(err.into());
        }
        Ok(self.teams.lock().await.clone())
    }

    async fn get_team_by_slug(&self, _org: &str, slug: &str) -> Result<TeamSummary> {
        self.call_counts.lock().await.get_team_by_slug += 1;
        if let Some(err) = self.take_injected_error().await {
            return Err(err.into());
        }
        self.teams
            .lock()
            .await
            .iter()
            .find(|t| t.slug == slug)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(slug.to_string()).into())
    }

    async fn create_team(&self, _org: &str, request: CreateTeamRequest) -> Result<TeamSummary> {
        self.call_counts.lock().await.create_team += 1;
        self.writes.lock().await.push(WriteOp::CreateTeam {
            name: request.name.clone(),
        });
        if let Some(err) = self.take_injected_error().await {
            return Err(err.into());
        }

        let slug = slugify(&request.name);
        let id = {
            let mut next = self.next_team_id.lock().await;
            *next += 1;
            1000 + *next
        };
        let summary = TeamSummary {
            slug: slug.clone(),
            id,
            name: request.name,
        };
        self.teams.lock().await.push(summary.clone());
        self.members.lock().await.entry(slug.clone()).or_default();
        self.repos.lock().await.entry(slug).or_default();
        Ok(summary)
    }

    async fn delete_team(&self, _org: &str, slug: &str) -> Result<()> {
        self.call_counts.lock().await.delete_team += 1;
        self.writes.lock().await.push(WriteOp::DeleteTeam {
            slug: slug.to_string(),
        });
        if let Some(err) = self.take_injected_error().await {
            return Err(err.into());
        }
        if let Some(err) = self.delete_team_error.lock().await.take() {
            return Err(err.into());
        }
        if self.protected.lock().await.iter().any(|s| s == slug) {
            return Err(ApiError::Forbidden.into());
        }
        if !self.team_exists(slug).await {
            return Err(ApiError::NotFound(slug.to_string()).into());
        }
        self.teams.lock().await.retain(|t| t.slug != slug);
        self.members.lock().await.remove(slug);
        self.repos.lock().await.remove(slug);
        Ok(())
    }

    async fn list_team_members(&self, _org: &str, slug: &str) -> Result<Vec<TeamMember>> {
        self.call_counts.lock().await.list_team_members += 1;
        if let Some(err) = self.take_injected_error().await {
            return Err(err.into());
        }
        if !self.team_exists(slug).await {
            return Err(ApiError::NotFound(slug.to_string()).into());
        }
        Ok(self
            .members
            .lock()
            .await
            .get(slug)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_membership(
        &self,
        _org: &str,
        slug: &str,
        username: &str,
        role: TeamRole,
    ) -> Result<()> {
        self.call_counts.lock().await.set_membership += 1;
        self.writes.lock().await.push(WriteOp::SetMembership {
            slug: slug.to_string(),
            username: username.to_string(),
            role,
        });
        if let Some(err) = self.take_injected_error().await {
            return Err(err.into());
        }
        if !self.team_exists(slug).await {
            return Err(ApiError::NotFound(slug.to_string()).into());
        }
        let mut members = self.members.lock().await;
        let roster = members.entry(slug.to_string()).or_default();
        match roster.iter_mut().find(|m| m.login == username) {
            Some(member) => member.role = role,
            None => roster.push(TeamMember {
                login: username.to_string(),
                role,
            }),
        }
        Ok(())
    }

    async fn remove_membership(&self, _org: &str, slug: &str, username: &str) -> Result<()> {
        self.call_counts.lock().await.remove_membership += 1;
        self.writes.lock().await.push(WriteOp::RemoveMembership {
            slug: slug.to_string(),
            username: username.to_string(),
        });
        if let Some(err) = self.take_injected_error().await {
            return Err(err.into());
        }
        if let Some(roster) = self.members.lock().await.get_mut(slug) {
            roster.retain(|m| m.login != username);
        }
        Ok(())
    }

    async fn list_team_repos(&self, _org: &str, slug: &str) -> Result<Vec<TeamRepo>> {
        self.call_counts.lock().await.list_team_repos += 1;
        if let Some(err) = self.take_injected_error().await {
            return Err(err.into());
        }
        if !self.team_exists(slug).await {
            return Err(ApiError::NotFound(slug.to_string()).into());
        }
        Ok(self
            .repos
            .lock()
            .await
            .get(slug)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_repo_permission(
        &self,
        _org: &str,
        slug: &str,
        repo: &str,
        permission: RepoPermission,
    ) -> Result<()> {
        self.call_counts.lock().await.set_repo_permission += 1;
        self.writes.lock().await.push(WriteOp::SetRepoPermission {
            slug: slug.to_string(),
            repo: repo.to_string(),
            permission,
        });
        if let Some(err) = self.take_injected_error().await {
            return Err(err.into());
        }
        let mut repos = self.repos.lock().await;
        let grants = repos.entry(slug.to_string()).or_default();
        match grants.iter_mut().find(|r| r.name == repo) {
            Some(grant) => grant.permissions = flags_for(permission),
            None => grants.push(TeamRepo {
                name: repo.to_string(),
                permissions: flags_for(permission),
            }),
        }
        Ok(())
    }

    async fn remove_repo_access(&self, _org: &str, slug: &str, repo: &str) -> Result<()> {
        self.call_counts.lock().await.remove_repo_access += 1;
        self.writes.lock().await.push(WriteOp::RemoveRepoAccess {
            slug: slug.to_string(),
            repo: repo.to_string(),
        });
        if let Some(err) = self.take_injected_error().await {
            return Err(err.into());
        }
        if let Some(grants) = self.repos.lock().await.get_mut(slug) {
            grants.retain(|r| r.name != repo);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_team_lifecycle() {
        let mock = MockGitHubClient::new();

        let created = mock
            .create_team(
                "example-org",
                CreateTeamRequest {
                    name: "Platform Team".to_string(),
                    description: None,
                    privacy: crate::client::models::TeamPrivacy::Closed,
                    parent_team_id: None,
                    create_default_maintainer: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(created.slug, "platform-team");

        let teams = mock.list_teams("example-org").await.unwrap();
        assert_eq!(teams.len(), 1);

        mock.delete_team("example-org", "platform-team")
            .await
            .unwrap();
        assert!(mock.list_teams("example-org").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_membership_updates_state() {
        let mock = MockGitHubClient::new().with_team("team-x", 1);

        mock.set_membership("example-org", "team-x", "alice", TeamRole::Maintainer)
            .await
            .unwrap();
        mock.set_membership("example-org", "team-x", "alice", TeamRole::Member)
            .await
            .unwrap();

        let members = mock
            .list_team_members("example-org", "team-x")
            .await
            .unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].role, TeamRole::Member);
        assert_eq!(mock.counts().await.set_membership, 2);
    }

    #[tokio::test]
    async fn test_mock_protected_team_delete_is_forbidden() {
        let mock = MockGitHubClient::new()
            .with_team("legacy", 1)
            .with_protected_team("legacy");

        let err = mock.delete_team("example-org", "legacy").await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Api(ApiError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_mock_member_listing_for_unknown_team_is_not_found() {
        let mock = MockGitHubClient::new();
        let err = mock
            .list_team_members("example-org", "ghost")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Api(ApiError::NotFound(_))
        ));
    }
}
