//! Wire and output types for organization membership.
//!
//! The deserialization types mirror the GraphQL response shapes for
//! `membersWithRole` and repository `collaborators` connections. The
//! serialization types produce the import records consumed downstream:
//! one single-key mapping per member, `{login: {role, repositories}}`.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Repository permission levels, ordered from weakest to strongest.
///
/// The derived ordering is relied on when collapsing a mixed-role
/// permission set to its strongest non-administrative grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    Read,
    Triage,
    Write,
    Maintain,
    Admin,
}

/// Organization-level role of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrgRole {
    Member,
    Admin,
}

/// Discriminant of a permission source, from the GraphQL `__typename`.
///
/// Only `Repository` and `Organization` drive reconciliation; anything
/// else is grouped but otherwise ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum SourceKind {
    Repository,
    Organization,
    Project,
    Team,
    #[serde(other)]
    Other,
}

/// The granting entity behind one permission source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PermissionGranter {
    #[serde(rename = "__typename")]
    pub kind: SourceKind,
}

/// One entry of a collaborator edge's `permissionSources` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PermissionSourceEntry {
    pub permission: Permission,
    pub source: PermissionGranter,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollaboratorNode {
    pub login: String,
}

/// One edge of a repository's `collaborators` connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorEdge {
    #[serde(default)]
    pub permission_sources: Vec<PermissionSourceEntry>,
    pub node: CollaboratorNode,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct CollaboratorConnection {
    #[serde(default)]
    pub edges: Vec<CollaboratorEdge>,
}

/// One node of the organization's `repositories` connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoNode {
    pub name: String,
    #[serde(default)]
    pub collaborators: Option<CollaboratorConnection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemberNode {
    pub login: String,
}

/// One edge of the organization's `membersWithRole` connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemberEdge {
    #[serde(default)]
    pub role: Option<OrgRole>,
    pub node: MemberNode,
}

/// A resolved repository grant, serialized as `{repo_name: permission}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoGrant {
    pub repo: String,
    pub permission: Permission,
}

impl RepoGrant {
    pub fn new(repo: impl Into<String>, permission: Permission) -> Self {
        Self {
            repo: repo.into(),
            permission,
        }
    }
}

impl Serialize for RepoGrant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.repo, &self.permission)?;
        map.end()
    }
}

/// Everything known about one member, merged from both fetches.
///
/// Absent halves are omitted from the serialized form: a member with no
/// repository grants serializes as `{"role": ...}` alone, and an outside
/// collaborator with no org role as `{"repositories": [...]}` alone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MemberRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<OrgRole>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<RepoGrant>,
}

/// One aggregated member, serialized as `{login: record}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberEntry {
    pub login: String,
    pub record: MemberRecord,
}

impl Serialize for MemberEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.login, &self.record)?;
        map.end()
    }
}
