//! GitHub REST API client implementation
//!
//! All remote failures are classified here, once, into the closed
//! [`ApiError`] taxonomy. Nothing above this layer inspects status codes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::de::DeserializeOwned;

use super::models::{
    CreateTeamRequest, Organization, RepoPermission, TeamMember, TeamRepo, TeamRole, TeamSummary,
};
use super::pagination::{self, PAGE_SIZE};
use super::GitHubApi;
use crate::error::{ApiError, Result};

/// GitHub REST API base URL
const API_BASE_URL: &str = "https://api.github.com";

/// Request rate cap. Keeps bulk reconciliations under the REST quota.
const RATE_LIMIT_PER_SECOND: u32 = 10;

/// GitHub API client
pub struct GitHubClient {
    http: HttpClient,
    base_url: String,
    token: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl GitHubClient {
    /// Create a client against the public GitHub API.
    pub fn new(token: String) -> Result<Self> {
        Self::with_base_url(token, API_BASE_URL)
    }

    /// Create a client against a custom API host (tests, GHES).
    pub fn with_base_url(token: String, base_url: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("teamsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let quota = Quota::per_second(std::num::NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap());
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            http,
            base_url,
            token,
            rate_limiter,
        })
    }

    /// Send a request and classify any non-success status.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json");

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(ApiError::from)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized.into()),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden.into()),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(path.to_string()).into()),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                Err(ApiError::RateLimit(Duration::from_secs(retry_after)).into())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(error_msg).into())
            }
            status if status.is_server_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                Err(ApiError::ServerError(error_msg).into())
            }
            _ => Err(ApiError::InvalidResponse(format!("Unexpected status code: {}", status)).into()),
        }
    }

    /// GET a JSON payload.
    async fn get_json<T: DeserializeOwned>(&self, path: String) -> Result<T> {
        let response = self.send(Method::GET, &path, None).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)).into())
    }

    /// Drain every page of a listing endpoint into one vector.
    async fn get_all_pages<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        pagination::drain(|page| {
            let url = format!("{}?per_page={}&page={}", path, PAGE_SIZE, page);
            async move { self.get_json::<Vec<T>>(url).await }
        })
        .await
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn get_organization(&self, org: &str) -> Result<Organization> {
        self.get_json(format!("/orgs/{}", org)).await
    }

    async fn list_teams(&self, org: &str) -> Result<Vec<TeamSummary>> {
        self.get_all_pages(&format!("/orgs/{}/teams", org)).await
    }

    async fn get_team_by_slug(&self, org: &str, slug: &str) -> Result<TeamSummary> {
        self.get_json(format!("/orgs/{}/teams/{}", org, slug)).await
    }

    async fn create_team(&self, org: &str, request: CreateTeamRequest) -> Result<TeamSummary> {
        let body = serde_json::to_value(&request)?;
        let response = self
            .send(Method::POST, &format!("/orgs/{}/teams", org), Some(body))
            .await?;
        response
            .json::<TeamSummary>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)).into())
    }

    async fn delete_team(&self, org: &str, slug: &str) -> Result<()> {
        self.send(
            Method::DELETE,
            &format!("/orgs/{}/teams/{}", org, slug),
            None,
        )
        .await?;
        Ok(())
    }

    async fn list_team_members(&self, org: &str, slug: &str) -> Result<Vec<TeamMember>> {
        self.get_all_pages(&format!("/orgs/{}/teams/{}/members", org, slug))
            .await
    }

    async fn set_membership(
        &self,
        org: &str,
        slug: &str,
        username: &str,
        role: TeamRole,
    ) -> Result<()> {
        let body = serde_json::json!({ "role": role });
        self.send(
            Method::PUT,
            &format!("/orgs/{}/teams/{}/memberships/{}", org, slug, username),
            Some(body),
        )
        .await?;
        Ok(())
    }

    async fn remove_membership(&self, org: &str, slug: &str, username: &str) -> Result<()> {
        self.send(
            Method::DELETE,
            &format!("/orgs/{}/teams/{}/memberships/{}", org, slug, username),
            None,
        )
        .await?;
        Ok(())
    }

    async fn list_team_repos(&self, org: &str, slug: &str) -> Result<Vec<TeamRepo>> {
        self.get_all_pages(&format!("/orgs/{}/teams/{}/repos", org, slug))
            .await
    }

    async fn set_repo_permission(
        &self,
        org: &str,
        slug: &str,
        repo: &str,
        permission: RepoPermission,
    ) -> Result<()> {
        let body = serde_json::json!({ "permission": permission });
        self.send(
            Method::PUT,
            &format!("/orgs/{}/teams/{}/repos/{}/{}", org, slug, org, repo),
            Some(body),
        )
        .await?;
        Ok(())
    }

    async fn remove_repo_access(&self, org: &str, slug: &str, repo: &str) -> Result<()> {
        self.send(
            Method::DELETE,
            &format!("/orgs/{}/teams/{}/repos/{}/{}", org, slug, org, repo),
            None,
        )
        .await?;
        Ok(())
    }
}
