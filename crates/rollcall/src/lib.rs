//! Rollcall - a GitHub membership provider plugin.
//!
//! This library lets an IAM automation orchestrator enumerate GitHub
//! organization membership and repository collaborator permissions over
//! the GraphQL API, using GitHub App credentials. Each configured
//! organization gets its own authenticated client; membership and
//! collaborator data are fetched concurrently, reconciled to one
//! effective permission per (member, repository), and merged into one
//! record per login.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use rollcall::config::GitHubConfig;
//! use rollcall::plugin::{ExecutionContext, GitHubProvider, Provider};
//!
//! let provider = GitHubProvider::default();
//! let config = provider.load(GitHubConfig::load_from_file("github.toml")?).await?;
//! provider
//!     .import_resources(&ExecutionContext::default(), &config, "output".as_ref())
//!     .await?;
//! ```

pub mod config;
pub mod github;
pub mod http;
pub mod keypath;
pub mod members;
pub mod plugin;
pub mod template;

pub use config::{ConfigError, GitHubConfig, GitHubOrganization, ManagementState};
pub use github::{Cursor, GitHubError, OrgClient};
pub use members::{MemberEntry, MemberRecord, OrgRole, Permission, list_members};
pub use plugin::{ExecutionContext, GitHubProvider, Provider};
