//! Team existence reconciliation
//!
//! Creates desired teams that are absent from the observed snapshot and
//! deletes observed teams absent from the manifest. Field drift on existing
//! teams (description, privacy) is deliberately not corrected; only
//! creation and deletion are covered.

use std::collections::{BTreeMap, HashSet};

use log::info;

use crate::client::models::CreateTeamRequest;
use crate::client::GitHubApi;
use crate::config::{DesiredTeam, TeamsConfig};
use crate::error::{ApiError, Error, Result};

use super::{Action, SyncEngine, SyncReport, TeamPresence};

impl<C: GitHubApi> SyncEngine<C> {
    /// Converge a single team's existence against the observed slug map.
    pub(crate) async fn ensure_team(
        &self,
        team: &DesiredTeam,
        observed: &BTreeMap<String, u64>,
        report: &mut SyncReport,
    ) -> Result<TeamPresence> {
        if observed.contains_key(&team.slug) {
            info!("Team '{}' already exists", team.name);
            return Ok(TeamPresence::Exists);
        }

        report.record(
            self.dry_run(),
            Action::CreateTeam {
                name: team.name.clone(),
                slug: team.slug.clone(),
            },
        );
        if self.dry_run() {
            return Ok(TeamPresence::Planned);
        }

        let request = CreateTeamRequest {
            name: team.name.clone(),
            description: team.description.clone(),
            privacy: team.privacy,
            parent_team_id: team.parent_team_id,
            create_default_maintainer: team.create_default_maintainer.then_some(true),
        };
        self.client.create_team(self.org(), request).await?;
        Ok(TeamPresence::Created)
    }

    /// Delete every observed team whose slug is not in the manifest.
    ///
    /// A Forbidden response is downgraded to a warning and the run
    /// continues; any other failure is fatal.
    pub(crate) async fn delete_stale_teams(
        &self,
        config: &TeamsConfig,
        observed: &BTreeMap<String, u64>,
        report: &mut SyncReport,
    ) -> Result<()> {
        let desired: HashSet<&str> = config.teams.iter().map(|t| t.slug.as_str()).collect();

        for slug in observed.keys() {
            if desired.contains(slug.as_str()) {
                continue;
            }

            let action = Action::DeleteTeam { slug: slug.clone() };
            if self.dry_run() {
                report.record(true, action);
                continue;
            }

            match self.client.delete_team(self.org(), slug).await {
                Ok(()) => report.record(false, action),
                Err(Error::Api(ApiError::Forbidden)) => {
                    report.warn(format!(
                        "Deletion of team '{}' was denied; leaving it in place",
                        slug
                    ));
                }
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}
