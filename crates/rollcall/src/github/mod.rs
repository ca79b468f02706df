//! GitHub App authentication and GraphQL plumbing.
//!
//! This module owns everything between an organization's credentials and a
//! decoded GraphQL `data` payload: minting installation tokens, issuing
//! point and paginated queries, and mapping wire failures onto
//! [`GitHubError`].
//!
//! # Module Structure
//!
//! - [`error`] - Error types for token exchange and GraphQL calls
//! - [`auth`] - App JWT signing and installation token caching
//! - [`client`] - Per-organization GraphQL client with cursor pagination
//!
//! # Usage
//!
//! ```ignore
//! use rollcall::github::{Cursor, OrgClient};
//!
//! let client = OrgClient::new(&org, transport);
//! let members = client.list(query, cursors, "organization.membersWithRole.edges", None).await?;
//! ```

mod auth;
mod client;
mod error;

// Re-export error types
pub use error::GitHubError;

// Re-export the client surface
pub use client::{Cursor, OrgClient};
