//! Organization membership: fetching, reconciliation, and aggregation.
//!
//! # Module Structure
//!
//! - [`types`] - GraphQL wire shapes and aggregated member records
//! - [`permissions`] - Effective-permission reconciliation per collaborator
//! - [`fetch`] - Concurrent paginated fetches and the per-login merge

mod fetch;
mod permissions;
mod types;

pub use fetch::{list_members, list_members_partial, list_repo_collaborators};
pub use permissions::effective_permission;
pub use types::{
    CollaboratorConnection, CollaboratorEdge, CollaboratorNode, MemberEdge, MemberEntry,
    MemberNode, MemberRecord, OrgRole, Permission, PermissionGranter, PermissionSourceEntry,
    RepoGrant, RepoNode, SourceKind,
};
