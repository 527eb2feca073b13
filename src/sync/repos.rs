//! Repository permission reconciliation
//!
//! Unlike membership, this reconciler is comparison-optimized: a grant whose
//! observed effective permission already equals the desired level issues no
//! remote call at all, so a fully converged state produces zero traffic.

use std::collections::BTreeMap;

use crate::client::GitHubApi;
use crate::config::DesiredTeam;
use crate::error::Result;

use super::{Action, SyncEngine, SyncReport};

impl<C: GitHubApi> SyncEngine<C> {
    pub(crate) async fn reconcile_repos(
        &self,
        team: &DesiredTeam,
        report: &mut SyncReport,
    ) -> Result<()> {
        let observed = self.client.list_team_repos(self.org(), &team.slug).await?;

        // Effective permission per observed repo; BTreeMap keeps the
        // revocation pass deterministic.
        let current: BTreeMap<&str, _> = observed
            .iter()
            .map(|r| (r.name.as_str(), r.permissions.effective()))
            .collect();

        for grant in &team.repositories {
            if current.get(grant.name.as_str()) == Some(&Some(grant.permission)) {
                // Already converged; no-op by design.
                continue;
            }
            report.record(
                self.dry_run(),
                Action::SetRepoPermission {
                    slug: team.slug.clone(),
                    repo: grant.name.clone(),
                    permission: grant.permission,
                },
            );
            if !self.dry_run() {
                self.client
                    .set_repo_permission(self.org(), &team.slug, &grant.name, grant.permission)
                    .await?;
            }
        }

        for (name, _) in &current {
            if team.repositories.iter().any(|g| g.name == *name) {
                continue;
            }
            report.record(
                self.dry_run(),
                Action::RemoveRepoPermission {
                    slug: team.slug.clone(),
                    repo: (*name).to_string(),
                },
            );
            if !self.dry_run() {
                self.client
                    .remove_repo_access(self.org(), &team.slug, name)
                    .await?;
            }
        }

        Ok(())
    }
}
