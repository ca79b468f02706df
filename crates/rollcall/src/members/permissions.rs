//! Collapse a collaborator's permission sources to one effective grant.

use std::collections::{BTreeMap, BTreeSet};

use super::types::{Permission, PermissionSourceEntry, SourceKind};

/// Resolve the effective repository permission for one collaborator edge.
///
/// Permissions are grouped into sets by source kind. A collaborator with
/// no repository-sourced permission contributes nothing; their access is
/// purely role-derived. When the repository-sourced set and the
/// organization-sourced set are both exactly `{ADMIN}`, the grant is
/// inherited org admin rather than repository-specific and is likewise
/// skipped. Every other repository-sourced set is authoritative: a single
/// value is taken as-is, and a mixed set logs a warning and resolves to
/// its strongest non-admin value.
pub fn effective_permission(
    login: &str,
    repo: &str,
    sources: &[PermissionSourceEntry],
) -> Option<Permission> {
    let mut by_kind: BTreeMap<SourceKind, BTreeSet<Permission>> = BTreeMap::new();
    for entry in sources {
        by_kind
            .entry(entry.source.kind)
            .or_default()
            .insert(entry.permission);
    }

    let repo_set = by_kind.get(&SourceKind::Repository)?;

    let admin_only = BTreeSet::from([Permission::Admin]);
    if *repo_set == admin_only && by_kind.get(&SourceKind::Organization) == Some(&admin_only) {
        return None;
    }

    if repo_set.len() == 1 {
        return repo_set.iter().next().copied();
    }

    tracing::warn!(
        member = login,
        repository = repo,
        "Member detected with mixed repository roles"
    );
    repo_set
        .iter()
        .rev()
        .find(|p| **p != Permission::Admin)
        .copied()
}
