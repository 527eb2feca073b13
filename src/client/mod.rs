//! GitHub org API client

use async_trait::async_trait;

use crate::error::Result;

pub mod github;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod pagination;

pub use github::GitHubClient;
#[cfg(test)]
#[allow(unused_imports)]
pub use mock::MockGitHubClient;
#[allow(unused_imports)]
pub use models::{
    CreateTeamRequest, Organization, RepoPermission, RepoPermissionFlags, TeamMember, TeamPrivacy,
    TeamRepo, TeamRole, TeamSummary,
};

/// Capability interface over the remote directory service.
///
/// Listing methods drain all pages before returning; callers always see the
/// complete result set. Failures arrive pre-classified as
/// [`ApiError`](crate::error::ApiError) variants, so reconciliation logic
/// matches on the variant and never on transport detail.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Fetch the organization record. Used as an auth/reachability preflight.
    async fn get_organization(&self, org: &str) -> Result<Organization>;

    /// List every team in the organization.
    async fn list_teams(&self, org: &str) -> Result<Vec<TeamSummary>>;

    /// Look up a single team by its slug.
    ///
    /// The engine resolves existence against the drained team list instead
    /// of per-team lookups; this stays available for spot checks.
    #[allow(dead_code)]
    async fn get_team_by_slug(&self, org: &str, slug: &str) -> Result<TeamSummary>;

    /// Create a team. The remote service derives the slug from the name.
    async fn create_team(&self, org: &str, request: CreateTeamRequest) -> Result<TeamSummary>;

    /// Delete a team by slug.
    async fn delete_team(&self, org: &str, slug: &str) -> Result<()>;

    /// List every member of a team.
    async fn list_team_members(&self, org: &str, slug: &str) -> Result<Vec<TeamMember>>;

    /// Add a user to a team or update their role. Idempotent on the remote.
    async fn set_membership(&self, org: &str, slug: &str, username: &str, role: TeamRole)
    -> Result<()>;

    /// Remove a user from a team.
    async fn remove_membership(&self, org: &str, slug: &str, username: &str) -> Result<()>;

    /// List every repository the team has access to.
    async fn list_team_repos(&self, org: &str, slug: &str) -> Result<Vec<TeamRepo>>;

    /// Grant or update the team's permission on a repository.
    async fn set_repo_permission(
        &self,
        org: &str,
        slug: &str,
        repo: &str,
        permission: RepoPermission,
    ) -> Result<()>;

    /// Revoke the team's access to a repository.
    async fn remove_repo_access(&self, org: &str, slug: &str, repo: &str) -> Result<()>;
}
