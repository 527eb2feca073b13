//! Reconciliation engine
//!
//! Converges observed organization state to the desired manifest: team
//! existence first, then memberships, then repository grants, one team at a
//! time, with a stale-team deletion pass at the end. Every mutation point
//! branches on dry-run mode; reads always happen so the simulated plan is
//! computed against real observed state.

use std::collections::BTreeMap;
use std::fmt;

use log::{info, warn};

use crate::client::models::{RepoPermission, TeamRole};
use crate::client::GitHubApi;
use crate::config::TeamsConfig;
use crate::error::Result;

pub mod membership;
pub mod repos;
pub mod slug;
pub mod team;

/// Explicit per-run settings. Passed in by the caller; the engine never
/// reads ambient process state.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Organization to reconcile
    pub org: String,
    /// When set, compute and report the plan without applying it
    pub dry_run: bool,
}

/// One operation of the reconciliation plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CreateTeam {
        name: String,
        slug: String,
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
    RemoveRepoPermission {
        slug: String,
        repo: String,
    },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::CreateTeam { name, slug } => {
                write!(f, "create team '{}' (slug '{}')", name, slug)
            }
            Action::DeleteTeam { slug } => write!(f, "delete team '{}'", slug),
            Action::SetMembership {
                slug,
                username,
                role,
            } => write!(f, "set {} '{}' on team '{}'", role, username, slug),
            Action::RemoveMembership { slug, username } => {
                write!(f, "remove member '{}' from team '{}'", username, slug)
            }
            Action::SetRepoPermission {
                slug,
                repo,
                permission,
            } => write!(
                f,
                "grant {} on repository '{}' to team '{}'",
                permission, repo, slug
            ),
            Action::RemoveRepoPermission { slug, repo } => {
                write!(f, "revoke access to repository '{}' from team '{}'", repo, slug)
            }
        }
    }
}

/// Outcome of a run: the ordered operations and any downgraded failures
#[derive(Debug, Default)]
pub struct SyncReport {
    pub actions: Vec<Action>,
    pub warnings: Vec<String>,
}

impl SyncReport {
    /// Record one plan operation, logging it as applied or simulated.
    fn record(&mut self, dry_run: bool, action: Action) {
        if dry_run {
            info!("[dry-run] would {}", action);
        } else {
            info!("{}", action);
        }
        self.actions.push(action);
    }

    /// Record a non-fatal problem.
    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }
}

/// Existence of a desired team at reconciliation time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TeamPresence {
    /// Present in the observed snapshot
    Exists,
    /// Absent; created during this run
    Created,
    /// Absent; creation only planned (dry-run)
    Planned,
}

/// Reconciliation engine over any [`GitHubApi`] implementation
pub struct SyncEngine<C> {
    client: C,
    run: RunConfig,
}

impl<C: GitHubApi> SyncEngine<C> {
    pub fn new(client: C, run: RunConfig) -> Self {
        Self { client, run }
    }

    /// Converge the organization to the desired manifest.
    ///
    /// Teams are processed strictly sequentially: existence, then
    /// memberships, then repository grants, before the next team begins.
    /// Observed teams absent from the manifest are deleted afterwards.
    pub async fn sync(&self, config: &TeamsConfig) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        // Auth/reachability preflight; any failure aborts before writes.
        self.client.get_organization(&self.run.org).await?;

        if self.run.dry_run {
            info!("Dry-run mode enabled. No changes will be made.");
        }

        // Full observed team set, drained once for the whole run. BTreeMap
        // keeps the deletion pass deterministic.
        let observed: BTreeMap<String, u64> = self
            .client
            .list_teams(&self.run.org)
            .await?
            .into_iter()
            .map(|t| (t.slug, t.id))
            .collect();

        for team in &config.teams {
            info!("=== Syncing team: {} ===", team.name);

            let presence = self.ensure_team(team, &observed, &mut report).await?;
            self.reconcile_membership(team, &mut report).await?;

            // Repo grants are not simulated for a team that does not exist
            // yet; only its creation and would-be memberships are reported.
            if presence != TeamPresence::Planned {
                self.reconcile_repos(team, &mut report).await?;
            }
        }

        self.delete_stale_teams(config, &observed, &mut report)
            .await?;

        Ok(report)
    }

    pub(crate) fn org(&self) -> &str {
        &self.run.org
    }

    pub(crate) fn dry_run(&self) -> bool {
        self.run.dry_run
    }
}
