//! Team membership reconciliation
//!
//! Every desired `{username, role}` assignment is re-applied on every run;
//! the remote set-membership call is idempotent, so no is-it-already-correct
//! check is made. Observed members outside the desired roster are removed
//! afterwards. Additions always precede removals within a team.

use std::collections::HashSet;

use crate::client::GitHubApi;
use crate::config::DesiredTeam;
use crate::error::{ApiError, Error, Result};

use super::{Action, SyncEngine, SyncReport};

impl<C: GitHubApi> SyncEngine<C> {
    pub(crate) async fn reconcile_membership(
        &self,
        team: &DesiredTeam,
        report: &mut SyncReport,
    ) -> Result<()> {
        let observed = match self.client.list_team_members(self.org(), &team.slug).await {
            Ok(members) => members,
            // In simulation the team may not exist yet; there is nothing to
            // reconcile against, but would-be assignments are still reported.
            Err(Error::Api(ApiError::NotFound(_))) if self.dry_run() => Vec::new(),
            Err(err) => return Err(err),
        };

        for grant in &team.roles {
            report.record(
                self.dry_run(),
                Action::SetMembership {
                    slug: team.slug.clone(),
                    username: grant.username.clone(),
                    role: grant.role,
                },
            );
            if !self.dry_run() {
                self.client
                    .set_membership(self.org(), &team.slug, &grant.username, grant.role)
                    .await?;
            }
        }

        let keep: HashSet<&str> = team.roles.iter().map(|r| r.username.as_str()).collect();
        for member in &observed {
            if keep.contains(member.login.as_str()) {
                continue;
            }
            report.record(
                self.dry_run(),
                Action::RemoveMembership {
                    slug: team.slug.clone(),
                    username: member.login.clone(),
                },
            );
            if !self.dry_run() {
                self.client
                    .remove_membership(self.org(), &team.slug, &member.login)
                    .await?;
            }
        }

        Ok(())
    }
}
