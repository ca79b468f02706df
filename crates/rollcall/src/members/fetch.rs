//! Concurrent membership and collaborator fetches, merged per login.
//!
//! Two paginated queries run concurrently against one organization: the
//! `membersWithRole` connection for org-level roles, and the
//! `repositories` connection with nested `collaborators` for per-repo
//! grants. Each produces partial records keyed by login; the merge keeps
//! first-seen order, role records first, with collaborator-only logins
//! (outside collaborators) appended after.

use std::collections::HashMap;

use serde_json::json;

use super::permissions::effective_permission;
use super::types::{MemberEdge, MemberEntry, MemberRecord, RepoGrant, RepoNode};
use crate::github::{Cursor, GitHubError, OrgClient};

const MEMBERS_WITH_ROLE_QUERY: &str = r#"
query ($orgName: String!, $cursor: String) {
  organization(login: $orgName) {
    membersWithRole(first: 100, after: $cursor) {
      pageInfo {
        hasNextPage
        endCursor
      }
      edges {
        role
        node {
          login
        }
      }
    }
  }
}
"#;

const REPO_COLLABORATORS_QUERY: &str = r#"
query ($orgName: String!, $repoCursor: String, $collaboratorCursor: String) {
  organization(login: $orgName) {
    repositories(first: 100, after: $repoCursor) {
      pageInfo {
        hasNextPage
        endCursor
      }
      nodes {
        name
        collaborators(first: 100, after: $collaboratorCursor, affiliation: ALL) {
          pageInfo {
            hasNextPage
            endCursor
          }
          edges {
            permissionSources {
              permission
              source {
                __typename
                ... on Repository {
                  name
                }
                ... on Organization {
                  login
                }
              }
            }
            node {
              login
            }
          }
        }
      }
    }
  }
}
"#;

/// Index of an existing entry for `login`, appending a fresh one if absent.
fn slot_for(
    entries: &mut Vec<MemberEntry>,
    index: &mut HashMap<String, usize>,
    login: &str,
) -> usize {
    if let Some(&i) = index.get(login) {
        return i;
    }
    index.insert(login.to_string(), entries.len());
    entries.push(MemberEntry {
        login: login.to_string(),
        record: MemberRecord::default(),
    });
    entries.len() - 1
}

/// Shallow-merge partial records into the accumulator.
///
/// The two fetches populate disjoint halves of a record, so each half is
/// only written when the partial actually carries it.
fn merge_into(
    entries: &mut Vec<MemberEntry>,
    index: &mut HashMap<String, usize>,
    partial: Vec<MemberEntry>,
) {
    for entry in partial {
        let i = slot_for(entries, index, &entry.login);
        let record = &mut entries[i].record;
        if let Some(role) = entry.record.role {
            record.role = Some(role);
        }
        if !entry.record.repositories.is_empty() {
            record.repositories = entry.record.repositories;
        }
    }
}

/// Fetch every organization member with their org-level role.
///
/// Records carry only the role half; repository grants come from
/// [`list_repo_collaborators`].
pub async fn list_members_partial(
    client: &OrgClient<'_>,
) -> Result<Vec<MemberEntry>, GitHubError> {
    let nodes = client
        .list(
            MEMBERS_WITH_ROLE_QUERY,
            vec![Cursor::new(
                "cursor",
                "organization.membersWithRole.pageInfo.hasNextPage",
                "organization.membersWithRole.pageInfo.endCursor",
            )],
            "organization.membersWithRole.edges",
            Some(json!({
                "orgName": client.organization().organization_name
            })),
        )
        .await?;

    let mut records = Vec::with_capacity(nodes.len());
    for node in nodes {
        let edge: MemberEdge = serde_json::from_value(node)?;
        records.push(MemberEntry {
            login: edge.node.login,
            record: MemberRecord {
                role: edge.role,
                repositories: Vec::new(),
            },
        });
    }
    Ok(records)
}

/// Fetch repository collaborators and reconcile each edge to at most one
/// effective grant, grouped per login in first-seen order.
pub async fn list_repo_collaborators(
    client: &OrgClient<'_>,
) -> Result<Vec<MemberEntry>, GitHubError> {
    // Nested collaborator pages ride on the repository cursor; a
    // per-repository page token is not addressable by key-path, so both
    // cursors track the repositories connection.
    let cursors = vec![
        Cursor::new(
            "repoCursor",
            "organization.repositories.pageInfo.hasNextPage",
            "organization.repositories.pageInfo.endCursor",
        ),
        Cursor::new(
            "collaboratorCursor",
            "organization.repositories.pageInfo.hasNextPage",
            "organization.repositories.pageInfo.endCursor",
        ),
    ];

    let nodes = client
        .list(
            REPO_COLLABORATORS_QUERY,
            cursors,
            "organization.repositories.nodes",
            Some(json!({
                "orgName": client.organization().organization_name
            })),
        )
        .await?;

    let mut entries: Vec<MemberEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for node in nodes {
        let repo: RepoNode = serde_json::from_value(node)?;
        let Some(collaborators) = repo.collaborators else {
            continue;
        };
        for edge in collaborators.edges {
            let Some(permission) =
                effective_permission(&edge.node.login, &repo.name, &edge.permission_sources)
            else {
                continue;
            };
            let i = slot_for(&mut entries, &mut index, &edge.node.login);
            entries[i]
                .record
                .repositories
                .push(RepoGrant::new(repo.name.as_str(), permission));
        }
    }
    Ok(entries)
}

/// Aggregate one record per member, merging role and repository grants.
///
/// Both fetches run concurrently and either failure fails the whole call.
/// Output order is first-seen: members in page order, then outside
/// collaborators in repository order.
pub async fn list_members(client: &OrgClient<'_>) -> Result<Vec<MemberEntry>, GitHubError> {
    let (roles, collaborations) = tokio::try_join!(
        list_members_partial(client),
        list_repo_collaborators(client)
    )?;

    let mut entries: Vec<MemberEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    merge_into(&mut entries, &mut index, roles);
    merge_into(&mut entries, &mut index, collaborations);
    Ok(entries)
}
