//! Host-facing provider contract.
//!
//! The orchestrator drives a provider through two entry points:
//! [`Provider::load`] validates configuration at startup, and
//! [`Provider::import_resources`] enumerates remote state into files under
//! an output directory. The GitHub provider imports one membership file
//! per organization, fanning out across organizations concurrently.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{GitHubConfig, GitHubOrganization, ManagementState};
use crate::github::{GitHubError, OrgClient};
use crate::http::{HttpTransport, ReqwestTransport};
use crate::members::list_members;

/// Version advertised to the orchestrator.
pub const PLUGIN_VERSION: &str = "0.1.0";

/// Identity and flags for one plugin invocation.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// Restricts the run to a single organization when set.
    pub provider_id: Option<String>,
    /// Apply changes when true, plan-only when false.
    pub execute: bool,
}

impl ExecutionContext {
    /// Context scoped to one organization.
    #[must_use]
    pub fn for_provider(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: Some(provider_id.into()),
            execute: false,
        }
    }
}

/// Contract a provider plugin exposes to the orchestrator.
///
/// Both entry points must be safe to call concurrently per organization;
/// the provider carries no per-call mutable state.
#[async_trait]
pub trait Provider: Send + Sync {
    type Config: Send + Sync;

    /// Key under which this provider's block appears in the host config.
    fn config_name(&self) -> &'static str;

    fn version(&self) -> &'static str;

    /// Whether the provider needs secret material from the config store.
    fn requires_secret(&self) -> bool;

    /// Validate the configuration at startup, returning it for the host
    /// to hold.
    async fn load(&self, config: Self::Config) -> Result<Self::Config, GitHubError>;

    /// Enumerate remote resources into files under `output_dir`.
    async fn import_resources(
        &self,
        ctx: &ExecutionContext,
        config: &Self::Config,
        output_dir: &Path,
    ) -> Result<(), GitHubError>;
}

/// GitHub provider: organization membership and collaborator permissions.
pub struct GitHubProvider {
    transport: Arc<dyn HttpTransport>,
}

impl GitHubProvider {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Import one organization's membership into
    /// `<output_dir>/github/<organization>/members.json`.
    pub async fn import_organization(
        &self,
        org: &GitHubOrganization,
        output_dir: &Path,
    ) -> Result<PathBuf, GitHubError> {
        let client = OrgClient::new(org, Arc::clone(&self.transport));
        let members = list_members(&client).await?;

        let dir = output_dir.join("github").join(&org.organization_name);
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join("members.json");
        tokio::fs::write(&path, serde_json::to_vec_pretty(&members)?).await?;

        tracing::info!(
            organization = %org.organization_name,
            path = %path.display(),
            members = members.len(),
            "Imported organization membership"
        );
        Ok(path)
    }
}

impl Default for GitHubProvider {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestTransport::default()))
    }
}

#[async_trait]
impl Provider for GitHubProvider {
    type Config = GitHubConfig;

    fn config_name(&self) -> &'static str {
        "github"
    }

    fn version(&self) -> &'static str {
        PLUGIN_VERSION
    }

    fn requires_secret(&self) -> bool {
        true
    }

    async fn load(&self, config: GitHubConfig) -> Result<GitHubConfig, GitHubError> {
        config.validate()?;
        Ok(config)
    }

    async fn import_resources(
        &self,
        ctx: &ExecutionContext,
        config: &GitHubConfig,
        output_dir: &Path,
    ) -> Result<(), GitHubError> {
        let mut tasks = Vec::new();
        for org in &config.organizations {
            if org.management_state == ManagementState::Disabled {
                continue;
            }
            if let Some(provider_id) = &ctx.provider_id {
                if provider_id != &org.organization_name {
                    continue;
                }
            }

            tasks.push(async move {
                (
                    org.organization_name.clone(),
                    self.import_organization(org, output_dir).await,
                )
            });
        }

        let mut failed = 0usize;
        for (organization, result) in futures::future::join_all(tasks).await {
            if let Err(error) = result {
                failed += 1;
                tracing::error!(
                    organization = %organization,
                    error = %error,
                    "Organization import failed"
                );
            }
        }

        if failed > 0 {
            return Err(GitHubError::Import { failed });
        }
        Ok(())
    }
}
