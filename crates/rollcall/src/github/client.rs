//! Paginated GraphQL client for one organization's endpoint.
//!
//! A client borrows its [`GitHubOrganization`] and runs every call against
//! that organization's canonical endpoint with its cached installation
//! token. Two request shapes are supported:
//!
//! - **point mode** (`get`/`post`/`patch`/`delete`): one round trip, returns
//!   the response's `data` object;
//! - **list mode** (`list`): repeated posts driven by an ordered cursor
//!   list, accumulating the node array found at a dotted node-path.
//!
//! Cursors are walked front-to-back after each page: the first cursor still
//! reporting more pages advances and the request repeats; exhausted cursors
//! are dropped with their pagination variable left at its last value; when
//! none remain the accumulated nodes are returned.
//!
//! HTTP 429 responses never fail a call: the client suspends for the
//! server's `Retry-After` (default one second) and reissues the same
//! request, indefinitely unless a retry ceiling was configured.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};

use super::auth;
use super::error::GitHubError;
use crate::config::GitHubOrganization;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::keypath;

const GRAPHQL_ACCEPT: &str = "application/vnd.github.vixen-preview+json";

/// One pagination variable and the response key-paths that drive it.
#[derive(Debug, Clone)]
pub struct Cursor {
    /// Name of the GraphQL variable carrying the page token.
    pub variable: String,
    /// Key-path of the boolean "has more pages" flag.
    pub has_next_page_path: String,
    /// Key-path of the next page token.
    pub end_cursor_path: String,
}

impl Cursor {
    pub fn new(
        variable: impl Into<String>,
        has_next_page_path: impl Into<String>,
        end_cursor_path: impl Into<String>,
    ) -> Self {
        Self {
            variable: variable.into(),
            has_next_page_path: has_next_page_path.into(),
            end_cursor_path: end_cursor_path.into(),
        }
    }
}

/// GraphQL client bound to one organization.
pub struct OrgClient<'a> {
    org: &'a GitHubOrganization,
    transport: Arc<dyn HttpTransport>,
    rate_limit_ceiling: Option<u32>,
}

impl<'a> OrgClient<'a> {
    pub fn new(org: &'a GitHubOrganization, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            org,
            transport,
            rate_limit_ceiling: None,
        }
    }

    /// Bound the 429 retry loop to at most `max_retries` reissues.
    ///
    /// Without a ceiling the client retries rate-limited requests forever,
    /// trusting the server's `Retry-After` hints.
    #[must_use]
    pub fn with_rate_limit_ceiling(mut self, max_retries: u32) -> Self {
        self.rate_limit_ceiling = Some(max_retries);
        self
    }

    /// The organization this client is bound to.
    #[must_use]
    pub fn organization(&self) -> &'a GitHubOrganization {
        self.org
    }

    async fn bearer(&self) -> Result<&'a str, GitHubError> {
        auth::bearer_token(self.org, self.transport.as_ref()).await
    }

    /// Send one request, suspending and reissuing on 429 until a
    /// non-rate-limited response arrives.
    async fn send_with_backoff(
        &self,
        method: HttpMethod,
        body: &[u8],
    ) -> Result<HttpResponse, GitHubError> {
        let token = self.bearer().await?;
        let url = self.org.api_endpoint();
        let mut attempts: u32 = 0;

        loop {
            let request = HttpRequest::new(method, url)
                .with_header("Authorization", format!("Bearer {token}"))
                .with_header("Accept", GRAPHQL_ACCEPT)
                .with_header("Content-Type", "application/json")
                .with_body(body.to_vec());

            let resp = self.transport.send(request).await?;
            if resp.status != 429 {
                return Ok(resp);
            }

            if let Some(max) = self.rate_limit_ceiling {
                if attempts >= max {
                    tracing::warn!(attempts, url = %url, "Rate limit retry ceiling reached");
                    return Err(GitHubError::RateLimitExceeded { attempts });
                }
            }

            let delay = resp
                .header("retry-after")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(1);
            attempts += 1;
            tracing::debug!(
                retry_after = delay,
                attempt = attempts,
                url = %url,
                "Rate limited, suspending before retry"
            );
            tokio::time::sleep(Duration::from_secs(delay)).await;
        }
    }

    /// Strip the GraphQL envelope from a successful response.
    ///
    /// `Ok(None)` means a void result (non-JSON body); a non-empty `errors`
    /// array fails the call even when partial `data` is present.
    fn decode_payload(resp: &HttpResponse) -> Result<Option<Value>, GitHubError> {
        if !resp.is_json() {
            return Ok(None);
        }

        let payload: Value = serde_json::from_slice(&resp.body)?;

        let has_errors = match payload.get("errors") {
            None | Some(Value::Null) => false,
            Some(Value::Array(errors)) => !errors.is_empty(),
            Some(_) => true,
        };
        if has_errors {
            let serialized = payload["errors"].to_string();
            tracing::error!(errors = %serialized, "GitHub request failed");
            return Err(GitHubError::GraphQl(serialized));
        }

        Ok(Some(payload.get("data").cloned().unwrap_or(Value::Null)))
    }

    async fn execute_raw(
        &self,
        method: HttpMethod,
        query: &str,
        variables: Option<&Value>,
    ) -> Result<Option<Value>, GitHubError> {
        let mut envelope = serde_json::Map::new();
        envelope.insert("query".to_string(), Value::String(query.to_string()));
        if let Some(vars) = variables {
            envelope.insert("variables".to_string(), vars.clone());
        }
        let body = serde_json::to_vec(&Value::Object(envelope))?;
        let resp = self.send_with_backoff(method, &body).await?;

        if !resp.is_success() {
            let text = String::from_utf8_lossy(&resp.body).into_owned();
            tracing::error!(status = resp.status, body = %text, "GitHub request failed");
            return Err(GitHubError::Transport {
                status: resp.status,
                body: text,
            });
        }

        Self::decode_payload(&resp)
    }

    /// Execute a point-mode request with an explicit verb.
    ///
    /// An absent or empty variables mapping is left out of the request
    /// envelope entirely.
    pub async fn execute(
        &self,
        method: HttpMethod,
        query: &str,
        variables: Option<Value>,
    ) -> Result<Option<Value>, GitHubError> {
        let variables = variables.filter(|v| v.as_object().map_or(true, |m| !m.is_empty()));
        self.execute_raw(method, query, variables.as_ref()).await
    }

    pub async fn get(
        &self,
        query: &str,
        variables: Option<Value>,
    ) -> Result<Option<Value>, GitHubError> {
        self.execute(HttpMethod::Get, query, variables).await
    }

    pub async fn post(
        &self,
        query: &str,
        variables: Option<Value>,
    ) -> Result<Option<Value>, GitHubError> {
        self.execute(HttpMethod::Post, query, variables).await
    }

    pub async fn patch(
        &self,
        query: &str,
        variables: Option<Value>,
    ) -> Result<Option<Value>, GitHubError> {
        self.execute(HttpMethod::Patch, query, variables).await
    }

    pub async fn delete(
        &self,
        query: &str,
        variables: Option<Value>,
    ) -> Result<Option<Value>, GitHubError> {
        self.execute(HttpMethod::Delete, query, variables).await
    }

    /// Execute a paginated query, accumulating nodes across pages.
    ///
    /// Every cursor's variable is seeded to JSON null if absent, so the
    /// first page requests the head of each connection. Nodes are read from
    /// `nodes_path` on every page and appended in arrival order.
    pub async fn list(
        &self,
        query: &str,
        mut cursors: Vec<Cursor>,
        nodes_path: &str,
        variables: Option<Value>,
    ) -> Result<Vec<Value>, GitHubError> {
        let mut variables = variables.unwrap_or_else(|| json!({}));
        if let Some(map) = variables.as_object_mut() {
            for cursor in &cursors {
                map.entry(cursor.variable.clone()).or_insert(Value::Null);
            }
        }

        let mut nodes: Vec<Value> = Vec::new();
        loop {
            let Some(data) = self
                .execute_raw(HttpMethod::Post, query, Some(&variables))
                .await?
            else {
                // Void page mid-pagination voids the whole result.
                return Ok(Vec::new());
            };

            if let Some(page) = keypath::get_path(nodes_path, &data).and_then(Value::as_array) {
                nodes.extend(page.iter().cloned());
            }

            // Find the first cursor that still has pages, dropping exhausted
            // ones from the front. A dropped cursor's variable keeps its
            // last value.
            loop {
                let Some(cursor) = cursors.first() else {
                    return Ok(nodes);
                };
                if keypath::is_true_at(&cursor.has_next_page_path, &data) {
                    break;
                }
                cursors.remove(0);
            }

            let cursor = &cursors[0];
            let next_token = keypath::get_path(&cursor.end_cursor_path, &data)
                .cloned()
                .unwrap_or(Value::Null);
            if let Some(map) = variables.as_object_mut() {
                map.insert(cursor.variable.clone(), next_token);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{MockTransport, json_response};

    const ENDPOINT: &str = "https://api.github.com/graphql";
    const TEST_KEY: &str = include_str!("../../tests/fixtures/app_key.pem");

    /// Organization with a pre-seeded bearer token so tests exercise the
    /// GraphQL path without mocking the token exchange.
    fn authed_org() -> GitHubOrganization {
        let org = GitHubOrganization::new("acme", "github.com/acme", "1234", "567890", TEST_KEY);
        org.bearer_token
            .set("test-token".to_string())
            .expect("fresh cell");
        org
    }

    fn request_variables(req: &HttpRequest) -> Value {
        let body: Value = serde_json::from_slice(&req.body).expect("request body is json");
        body["variables"].clone()
    }

    #[tokio::test]
    async fn test_post_returns_data_object() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Post,
            ENDPOINT,
            200,
            &json!({"data": {"organization": {"name": "acme"}}}),
        );

        let org = authed_org();
        let client = OrgClient::new(&org, Arc::new(mock.clone()));
        let data = client
            .post("query { organization { name } }", None)
            .await
            .expect("request succeeds");

        assert_eq!(data, Some(json!({"organization": {"name": "acme"}})));

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            crate::http::header_get(&requests[0].headers, "authorization"),
            Some("Bearer test-token")
        );
        assert_eq!(
            crate::http::header_get(&requests[0].headers, "accept"),
            Some(GRAPHQL_ACCEPT)
        );
    }

    #[tokio::test]
    async fn test_each_point_verb_uses_its_method() {
        let mock = MockTransport::new();
        mock.push_json(HttpMethod::Get, ENDPOINT, 200, &json!({"data": {}}));
        mock.push_json(HttpMethod::Patch, ENDPOINT, 200, &json!({"data": {}}));
        mock.push_json(HttpMethod::Delete, ENDPOINT, 200, &json!({"data": {}}));

        let org = authed_org();
        let client = OrgClient::new(&org, Arc::new(mock.clone()));
        client.get("query {}", None).await.expect("get");
        client.patch("query {}", None).await.expect("patch");
        client.delete("query {}", None).await.expect("delete");

        let methods: Vec<HttpMethod> = mock.requests().iter().map(|r| r.method).collect();
        assert_eq!(
            methods,
            vec![HttpMethod::Get, HttpMethod::Patch, HttpMethod::Delete]
        );
    }

    #[tokio::test]
    async fn test_graphql_errors_take_precedence_over_data() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Post,
            ENDPOINT,
            200,
            &json!({
                "data": {"organization": null},
                "errors": [{"message": "NOT_FOUND", "path": ["organization"]}],
            }),
        );

        let org = authed_org();
        let client = OrgClient::new(&org, Arc::new(mock));
        let err = client
            .post("query { organization { name } }", None)
            .await
            .expect_err("errors array fails the call");

        match err {
            GitHubError::GraphQl(serialized) => assert!(serialized.contains("NOT_FOUND")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_2xx_surfaces_transport_error() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Post,
            ENDPOINT,
            502,
            &json!({"message": "bad gateway"}),
        );

        let org = authed_org();
        let client = OrgClient::new(&org, Arc::new(mock));
        let err = client.post("query {}", None).await.expect_err("502 fails");

        match err {
            GitHubError::Transport { status, body } => {
                assert_eq!(status, 502);
                assert!(body.contains("bad gateway"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_void_not_error() {
        let mock = MockTransport::new();
        mock.push_response(
            HttpMethod::Post,
            ENDPOINT,
            HttpResponse {
                status: 200,
                headers: vec![("Content-Type".to_string(), "text/html".to_string())],
                body: b"<html>maintenance</html>".to_vec(),
            },
        );

        let org = authed_org();
        let client = OrgClient::new(&org, Arc::new(mock));
        let data = client.post("query {}", None).await.expect("void is ok");
        assert_eq!(data, None);
    }

    #[tokio::test]
    async fn test_malformed_json_body_is_decode_error() {
        let mock = MockTransport::new();
        mock.push_response(
            HttpMethod::Post,
            ENDPOINT,
            HttpResponse {
                status: 200,
                headers: vec![("Content-Type".to_string(), "application/json".to_string())],
                body: b"{truncated".to_vec(),
            },
        );

        let org = authed_org();
        let client = OrgClient::new(&org, Arc::new(mock));
        let err = client
            .post("query {}", None)
            .await
            .expect_err("bad json fails");
        assert!(matches!(err, GitHubError::Decode(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_suspends_for_retry_after_then_succeeds() {
        let mock = MockTransport::new();
        mock.push_response(
            HttpMethod::Post,
            ENDPOINT,
            HttpResponse {
                status: 429,
                headers: vec![("Retry-After".to_string(), "2".to_string())],
                body: Vec::new(),
            },
        );
        mock.push_json(HttpMethod::Post, ENDPOINT, 200, &json!({"data": {"ok": true}}));

        let org = authed_org();
        let client = OrgClient::new(&org, Arc::new(mock.clone()));

        let start = tokio::time::Instant::now();
        let data = client.post("query {}", None).await.expect("retried call");
        let elapsed = start.elapsed();

        assert_eq!(data, Some(json!({"ok": true})));
        assert!(elapsed >= Duration::from_secs(2), "suspended {elapsed:?}");
        assert!(elapsed < Duration::from_secs(3), "suspended {elapsed:?}");
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_defaults_to_one_second_without_header() {
        let mock = MockTransport::new();
        mock.push_response(
            HttpMethod::Post,
            ENDPOINT,
            HttpResponse {
                status: 429,
                headers: Vec::new(),
                body: Vec::new(),
            },
        );
        mock.push_json(HttpMethod::Post, ENDPOINT, 200, &json!({"data": {}}));

        let org = authed_org();
        let client = OrgClient::new(&org, Arc::new(mock));

        let start = tokio::time::Instant::now();
        client.post("query {}", None).await.expect("retried call");
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_secs(1), "suspended {elapsed:?}");
        assert!(elapsed < Duration::from_secs(2), "suspended {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_ceiling_converts_persistent_429_into_error() {
        let mock = MockTransport::new();
        for _ in 0..3 {
            mock.push_response(
                HttpMethod::Post,
                ENDPOINT,
                HttpResponse {
                    status: 429,
                    headers: vec![("Retry-After".to_string(), "1".to_string())],
                    body: Vec::new(),
                },
            );
        }

        let org = authed_org();
        let client = OrgClient::new(&org, Arc::new(mock.clone())).with_rate_limit_ceiling(2);

        let err = client
            .post("query {}", None)
            .await
            .expect_err("ceiling reached");
        assert!(matches!(
            err,
            GitHubError::RateLimitExceeded { attempts: 2 }
        ));
        // Initial request plus two retries.
        assert_eq!(mock.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_list_paginates_until_cursor_exhausts() {
        let page = |node: u64, has_next: bool, end: &str| {
            json!({
                "data": {
                    "organization": {
                        "items": {
                            "nodes": [{"id": node}],
                            "pageInfo": {"hasNextPage": has_next, "endCursor": end},
                        }
                    }
                }
            })
        };

        let mock = MockTransport::new();
        mock.push_json(HttpMethod::Post, ENDPOINT, 200, &page(1, true, "c1"));
        mock.push_json(HttpMethod::Post, ENDPOINT, 200, &page(2, true, "c2"));
        mock.push_json(HttpMethod::Post, ENDPOINT, 200, &page(3, false, "c3"));

        let org = authed_org();
        let client = OrgClient::new(&org, Arc::new(mock.clone()));
        let nodes = client
            .list(
                "query ($cursor: String) { organization { items(after: $cursor) { nodes { id } } } }",
                vec![Cursor::new(
                    "cursor",
                    "organization.items.pageInfo.hasNextPage",
                    "organization.items.pageInfo.endCursor",
                )],
                "organization.items.nodes",
                None,
            )
            .await
            .expect("pagination succeeds");

        assert_eq!(
            nodes,
            vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]
        );

        let requests = mock.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(request_variables(&requests[0])["cursor"], Value::Null);
        assert_eq!(request_variables(&requests[1])["cursor"], json!("c1"));
        assert_eq!(request_variables(&requests[2])["cursor"], json!("c2"));
    }

    #[tokio::test]
    async fn test_list_walks_cursor_chain_and_freezes_dropped_variable() {
        let page = |alpha_next: bool, alpha_end: &str, beta_next: bool, beta_end: &str| {
            json!({
                "data": {
                    "alpha": {
                        "nodes": [{"page": alpha_end}],
                        "pageInfo": {"hasNextPage": alpha_next, "endCursor": alpha_end},
                    },
                    "beta": {
                        "pageInfo": {"hasNextPage": beta_next, "endCursor": beta_end},
                    }
                }
            })
        };

        let mock = MockTransport::new();
        mock.push_json(HttpMethod::Post, ENDPOINT, 200, &page(true, "a1", true, "b0"));
        mock.push_json(HttpMethod::Post, ENDPOINT, 200, &page(false, "a2", true, "b1"));
        mock.push_json(HttpMethod::Post, ENDPOINT, 200, &page(false, "a2", false, "b2"));

        let org = authed_org();
        let client = OrgClient::new(&org, Arc::new(mock.clone()));
        let cursors = vec![
            Cursor::new(
                "alphaCursor",
                "alpha.pageInfo.hasNextPage",
                "alpha.pageInfo.endCursor",
            ),
            Cursor::new(
                "betaCursor",
                "beta.pageInfo.hasNextPage",
                "beta.pageInfo.endCursor",
            ),
        ];
        let nodes = client
            .list("query {}", cursors, "alpha.nodes", None)
            .await
            .expect("chained pagination succeeds");
        assert_eq!(nodes.len(), 3);

        let requests = mock.requests();
        assert_eq!(requests.len(), 3);

        // First request: both variables seeded to null.
        let vars = request_variables(&requests[0]);
        assert_eq!(vars["alphaCursor"], Value::Null);
        assert_eq!(vars["betaCursor"], Value::Null);

        // Second request: the alpha connection advanced.
        let vars = request_variables(&requests[1]);
        assert_eq!(vars["alphaCursor"], json!("a1"));
        assert_eq!(vars["betaCursor"], Value::Null);

        // Third request: alpha exhausted and dropped, its variable frozen
        // at the last token while beta advances.
        let vars = request_variables(&requests[2]);
        assert_eq!(vars["alphaCursor"], json!("a1"));
        assert_eq!(vars["betaCursor"], json!("b1"));
    }

    #[tokio::test]
    async fn test_list_void_page_discards_accumulated_nodes() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Post,
            ENDPOINT,
            200,
            &json!({
                "data": {
                    "items": {
                        "nodes": [{"id": 1}],
                        "pageInfo": {"hasNextPage": true, "endCursor": "c1"},
                    }
                }
            }),
        );
        mock.push_response(
            HttpMethod::Post,
            ENDPOINT,
            HttpResponse {
                status: 200,
                headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
                body: Vec::new(),
            },
        );

        let org = authed_org();
        let client = OrgClient::new(&org, Arc::new(mock));
        let nodes = client
            .list(
                "query {}",
                vec![Cursor::new(
                    "cursor",
                    "items.pageInfo.hasNextPage",
                    "items.pageInfo.endCursor",
                )],
                "items.nodes",
                None,
            )
            .await
            .expect("void result is ok");
        assert!(nodes.is_empty());
    }

    #[tokio::test]
    async fn test_list_without_cursors_returns_single_page() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Post,
            ENDPOINT,
            200,
            &json!({"data": {"items": {"nodes": [{"id": 1}]}}}),
        );

        let org = authed_org();
        let client = OrgClient::new(&org, Arc::new(mock.clone()));
        let nodes = client
            .list("query {}", Vec::new(), "items.nodes", None)
            .await
            .expect("single page");
        assert_eq!(nodes, vec![json!({"id": 1})]);
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_uncached_token_is_exchanged_before_first_query() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Post,
            "https://api.github.com/app/installations/567890/access_tokens",
            201,
            &json!({"token": "ghs_fresh"}),
        );
        mock.push_json(HttpMethod::Post, ENDPOINT, 200, &json!({"data": {}}));

        let org = GitHubOrganization::new("acme", "github.com/acme", "1234", "567890", TEST_KEY);
        let client = OrgClient::new(&org, Arc::new(mock.clone()));
        client.post("query {}", None).await.expect("query succeeds");

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].url.ends_with("/access_tokens"));
        assert_eq!(requests[1].url, ENDPOINT);
        assert_eq!(
            crate::http::header_get(&requests[1].headers, "authorization"),
            Some("Bearer ghs_fresh")
        );
    }

    #[tokio::test]
    async fn test_variables_pass_through_alongside_cursor_seeds() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Post,
            ENDPOINT,
            200,
            &json!({"data": {"items": {"nodes": []}}}),
        );

        let org = authed_org();
        let client = OrgClient::new(&org, Arc::new(mock.clone()));
        client
            .list(
                "query ($login: String!, $cursor: String) {}",
                vec![Cursor::new(
                    "cursor",
                    "items.pageInfo.hasNextPage",
                    "items.pageInfo.endCursor",
                )],
                "items.nodes",
                Some(json!({"login": "acme"})),
            )
            .await
            .expect("list succeeds");

        let vars = request_variables(&mock.requests()[0]);
        assert_eq!(vars["login"], json!("acme"));
        assert_eq!(vars["cursor"], Value::Null);
    }

    #[tokio::test]
    async fn test_point_mode_omits_empty_variables_from_envelope() {
        let mock = MockTransport::new();
        mock.push_json(HttpMethod::Post, ENDPOINT, 200, &json!({"data": {}}));
        mock.push_json(HttpMethod::Post, ENDPOINT, 200, &json!({"data": {}}));
        mock.push_json(HttpMethod::Post, ENDPOINT, 200, &json!({"data": {}}));

        let org = authed_org();
        let client = OrgClient::new(&org, Arc::new(mock.clone()));
        client.post("query {}", None).await.expect("no variables");
        client
            .post("query {}", Some(json!({})))
            .await
            .expect("empty variables");
        client
            .post("query {}", Some(json!({"login": "acme"})))
            .await
            .expect("real variables");

        let requests = mock.requests();
        let body = |i: usize| -> Value { serde_json::from_slice(&requests[i].body).unwrap() };
        assert!(body(0).get("variables").is_none());
        assert!(body(1).get("variables").is_none());
        assert_eq!(body(2)["variables"], json!({"login": "acme"}));
    }

    #[test]
    fn test_decode_payload_handles_missing_data_key() {
        let resp = json_response(200, &json!({}));
        let decoded = OrgClient::decode_payload(&resp).expect("empty body decodes");
        assert_eq!(decoded, Some(Value::Null));
    }
}
