//! Template application across organizations.
//!
//! A template describes one desired resource tied to a named organization.
//! [`GitHubTemplate::apply`] fans the template out to every matching
//! organization, collecting proposed changes and any per-organization
//! failures into a single [`TemplateChangeDetails`]. Whether changes are
//! applied or only detected is decided by the execution context, not the
//! template.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{GitHubConfig, GitHubOrganization, ManagementState};
use crate::github::GitHubError;
use crate::http::HttpTransport;
use crate::plugin::ExecutionContext;

/// How a proposed change would alter the live resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Create,
    Update,
    Delete,
}

/// One change detected or applied on one organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposedChange {
    pub change_type: ChangeType,
    pub resource_id: String,
    /// Attribute the change touches, when narrower than the whole resource.
    pub attribute: Option<String>,
}

impl ProposedChange {
    pub fn new(change_type: ChangeType, resource_id: impl Into<String>) -> Self {
        Self {
            change_type,
            resource_id: resource_id.into(),
            attribute: None,
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }
}

/// Outcome of applying one template across all its organizations.
#[derive(Debug)]
pub struct TemplateChangeDetails {
    pub resource_id: String,
    pub resource_type: String,
    pub template_path: PathBuf,
    pub proposed_changes: Vec<ProposedChange>,
    pub exceptions_seen: Vec<String>,
}

impl TemplateChangeDetails {
    fn new(resource_id: &str, resource_type: &str, template_path: &Path) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            resource_type: resource_type.to_string(),
            template_path: template_path.to_path_buf(),
            proposed_changes: Vec::new(),
            exceptions_seen: Vec::new(),
        }
    }

    /// Fold per-organization results in, keeping failures as exception
    /// strings rather than aborting the whole template.
    pub fn extend_changes(&mut self, results: Vec<Result<Vec<ProposedChange>, GitHubError>>) {
        for result in results {
            match result {
                Ok(changes) => self.proposed_changes.extend(changes),
                Err(error) => self.exceptions_seen.push(error.to_string()),
            }
        }
    }
}

/// One GitHub-backed resource template.
///
/// Implementors provide the per-organization work in [`apply_to_org`];
/// the provided [`apply`] handles organization matching, import-only
/// short-circuiting, fan-out, and result collection.
///
/// [`apply_to_org`]: GitHubTemplate::apply_to_org
/// [`apply`]: GitHubTemplate::apply
#[async_trait]
pub trait GitHubTemplate: Send + Sync {
    /// Name of the organization this template's resource belongs to.
    fn org(&self) -> &str;

    fn resource_id(&self) -> &str;

    fn resource_type(&self) -> &str;

    fn template_path(&self) -> &Path;

    fn management_state(&self) -> ManagementState {
        ManagementState::Undefined
    }

    /// Apply or plan this template against one organization.
    async fn apply_to_org(
        &self,
        ctx: &ExecutionContext,
        org: &GitHubOrganization,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Vec<ProposedChange>, GitHubError>;

    /// Apply this template across every matching organization.
    async fn apply(
        &self,
        ctx: &ExecutionContext,
        config: &GitHubConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> TemplateChangeDetails {
        let mut details =
            TemplateChangeDetails::new(self.resource_id(), self.resource_type(), self.template_path());

        if self.management_state() == ManagementState::ImportOnly {
            tracing::info!(
                resource_type = self.resource_type(),
                resource_id = self.resource_id(),
                "Resource is marked as import only"
            );
            return details;
        }

        let mut tasks = Vec::new();
        for org in &config.organizations {
            if org.organization_name != self.org() {
                continue;
            }

            if ctx.execute {
                tracing::info!(
                    organization = %org.organization_name,
                    resource_type = self.resource_type(),
                    resource_id = self.resource_id(),
                    "Applying changes to resource"
                );
            } else {
                tracing::info!(
                    organization = %org.organization_name,
                    resource_type = self.resource_type(),
                    resource_id = self.resource_id(),
                    "Detecting changes for resource"
                );
            }
            tasks.push(self.apply_to_org(ctx, org, Arc::clone(&transport)));
        }

        let ran_any = !tasks.is_empty();
        let results = futures::future::join_all(tasks).await;
        details.extend_changes(results);

        if !details.exceptions_seen.is_empty() {
            tracing::error!(
                operation = if ctx.execute { "apply" } else { "detect" },
                resource_type = self.resource_type(),
                resource_id = self.resource_id(),
                "Error encountered while processing resource changes"
            );
        } else if ran_any && ctx.execute {
            tracing::info!(
                resource_type = self.resource_type(),
                resource_id = self.resource_id(),
                "Successfully applied resource changes to all organizations"
            );
        } else if ran_any {
            tracing::info!(
                resource_type = self.resource_type(),
                resource_id = self.resource_id(),
                "Successfully detected required resource changes on all organizations"
            );
        } else {
            tracing::debug!(
                resource_type = self.resource_type(),
                resource_id = self.resource_id(),
                "No changes detected for resource on any organization"
            );
        }

        details
    }
}
