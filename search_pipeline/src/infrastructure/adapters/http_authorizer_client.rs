// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # HTTP Authorizer Client
//!
//! `reqwest`-backed implementation of the `AuthorizerClient` port. One
//! client is built once at startup and reused for every call; connection
//! pool sizing is expressed through `reqwest::ClientBuilder`, and a
//! `tokio::sync::Semaphore` sized to `poolMaxConnections` bounds how many
//! calls may be in flight at once — the same token-gating pattern the
//! teacher uses for CPU/IO work, generalized to HTTP-call tokens. Both the
//! semaphore wait and the call itself are deadline-bound; any failure on
//! either path resolves to the fail-closed-empty authorization result
//! required by the port, never a propagated error.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use url::Url;

use search_pipeline_domain::value_objects::AuthorizationResult;
use search_pipeline_domain::AuthorizerClient;

#[derive(Debug, Serialize)]
struct CheckBatchRequestBody<'a> {
    event_ids: &'a [u64],
    user_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct CheckBatchResponseBody {
    authorized_ids: Vec<u64>,
}

/// Either shape the enumerate-for-user endpoint may answer with: a bare
/// array, or an object wrapping one. Both are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EnumerateResponseBody {
    Wrapped { authorized_ids: Vec<u64> },
    Bare(Vec<u64>),
}

impl EnumerateResponseBody {
    fn into_ids(self) -> Vec<u64> {
        match self {
            EnumerateResponseBody::Wrapped { authorized_ids } => authorized_ids,
            EnumerateResponseBody::Bare(ids) => ids,
        }
    }
}

pub struct HttpAuthorizerClient {
    client: reqwest::Client,
    base_url: Url,
    call_tokens: Arc<Semaphore>,
    pending_acquire_timeout: Duration,
}

impl HttpAuthorizerClient {
    pub fn new(client: reqwest::Client, base_url: Url, pool_max_connections: usize, pending_acquire_timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            call_tokens: Arc::new(Semaphore::new(pool_max_connections.max(1))),
            pending_acquire_timeout,
        }
    }

    async fn acquire_token(&self) -> Option<tokio::sync::SemaphorePermit<'_>> {
        match tokio::time::timeout(self.pending_acquire_timeout, self.call_tokens.acquire()).await {
            Ok(Ok(permit)) => Some(permit),
            Ok(Err(_closed)) | Err(_timed_out) => None,
        }
    }
}

#[async_trait]
impl AuthorizerClient for HttpAuthorizerClient {
    async fn check_batch(&self, event_ids: &[u64], user_id: &str, deadline: Duration) -> AuthorizationResult {
        if event_ids.is_empty() {
            return AuthorizationResult::empty();
        }

        let Some(_permit) = self.acquire_token().await else {
            tracing::debug!("authorizer connection pool saturated past pending-acquire timeout");
            return AuthorizationResult::empty();
        };

        let Ok(url) = self.base_url.join("authorize/check-batch") else {
            return AuthorizationResult::empty();
        };
        let body = CheckBatchRequestBody { event_ids, user_id };

        let call = self.client.post(url).json(&body).send();
        let response = match tokio::time::timeout(deadline, call).await {
            Ok(Ok(response)) if response.status().is_success() => response,
            Ok(Ok(response)) => {
                tracing::debug!(status = %response.status(), "authorizer returned a non-success status");
                return AuthorizationResult::empty();
            }
            Ok(Err(err)) => {
                tracing::debug!(error = %err, "authorizer call failed");
                return AuthorizationResult::empty();
            }
            Err(_elapsed) => {
                tracing::debug!("authorizer call exceeded its per-batch deadline");
                return AuthorizationResult::empty();
            }
        };

        match response.json::<CheckBatchResponseBody>().await {
            Ok(body) => AuthorizationResult::new(body.authorized_ids.into_iter().collect::<HashSet<u64>>()),
            Err(_) => AuthorizationResult::empty(),
        }
    }

    async fn enumerate_for_user(&self, user_id: &str, deadline: Duration) -> Vec<u64> {
        let Some(_permit) = self.acquire_token().await else {
            return Vec::new();
        };
        let Ok(url) = self.base_url.join(&format!("authorize/enumerate/{user_id}")) else {
            return Vec::new();
        };

        let call = self.client.get(url).send();
        let response = match tokio::time::timeout(deadline, call).await {
            Ok(Ok(response)) if response.status().is_success() => response,
            _ => return Vec::new(),
        };

        response.json::<EnumerateResponseBody>().await.map(EnumerateResponseBody::into_ids).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerate_response_accepts_bare_array() {
        let body: EnumerateResponseBody = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(body.into_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn enumerate_response_accepts_wrapped_object() {
        let body: EnumerateResponseBody = serde_json::from_str(r#"{"authorized_ids": [4, 5]}"#).unwrap();
        assert_eq!(body.into_ids(), vec![4, 5]);
    }

    #[tokio::test]
    async fn empty_event_ids_short_circuits_without_a_network_call() {
        let client = HttpAuthorizerClient::new(
            reqwest::Client::new(),
            Url::parse("https://authz.internal/v1/").unwrap(),
            4,
            Duration::from_millis(50),
        );
        let result = client.check_batch(&[], "user-1", Duration::from_secs(1)).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn exhausted_pool_fails_closed_rather_than_blocking_forever() {
        let client = HttpAuthorizerClient::new(
            reqwest::Client::new(),
            Url::parse("https://authz.internal/v1/").unwrap(),
            1,
            Duration::from_millis(20),
        );
        let permit = client.call_tokens.acquire().await.unwrap();
        let result = client.check_batch(&[1, 2], "user-1", Duration::from_secs(1)).await;
        drop(permit);
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn check_batch_returns_the_authorized_subset_on_success() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/authorize/check-batch"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(serde_json::json!({ "authorized_ids": [2, 4] })))
            .mount(&server)
            .await;

        let client = HttpAuthorizerClient::new(reqwest::Client::new(), Url::parse(&format!("{}/", server.uri())).unwrap(), 4, Duration::from_secs(1));
        let result = client.check_batch(&[1, 2, 3, 4], "user-1", Duration::from_secs(1)).await;

        assert!(result.is_authorized(2));
        assert!(result.is_authorized(4));
        assert!(!result.is_authorized(1));
    }

    #[tokio::test]
    async fn check_batch_fails_closed_on_server_error_status() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/authorize/check-batch"))
            .respond_with(wiremock::ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = HttpAuthorizerClient::new(reqwest::Client::new(), Url::parse(&format!("{}/", server.uri())).unwrap(), 4, Duration::from_secs(1));
        let result = client.check_batch(&[1, 2], "user-1", Duration::from_secs(1)).await;

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn enumerate_for_user_returns_ids_on_success() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/authorize/enumerate/user-1"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(serde_json::json!([7, 8, 9])))
            .mount(&server)
            .await;

        let client = HttpAuthorizerClient::new(reqwest::Client::new(), Url::parse(&format!("{}/", server.uri())).unwrap(), 4, Duration::from_secs(1));
        let ids = client.enumerate_for_user("user-1", Duration::from_secs(1)).await;

        assert_eq!(ids, vec![7, 8, 9]);
    }
}
