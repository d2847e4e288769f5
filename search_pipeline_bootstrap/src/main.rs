// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Demo binary: runs one permission-filtered search against a configured
//! index and authorizer endpoint and streams the results to stdout as
//! NDJSON, one `Event` per line. Stands in for the HTTP boundary that the
//! pipeline core treats as an external collaborator.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use url::Url;

use search_pipeline::application::services::{PipelineDriver, PipelineDriverConfig};
use search_pipeline::infrastructure::{HttpAuthorizerClient, HttpIndexSource, PipelineConfig, PipelineMetrics};
use search_pipeline_bootstrap::shutdown::ShutdownCoordinator;
use search_pipeline_bootstrap::{bootstrap_cli, result_to_exit_code};
use search_pipeline_domain::error::SearchError;
use search_pipeline_domain::value_objects::SearchRequest;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match bootstrap_cli() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(64);
        }
    };

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    result_to_exit_code(run(cli).await)
}

async fn run(cli: search_pipeline_bootstrap::ValidatedCli) -> Result<(), SearchError> {
    let coordinator = ShutdownCoordinator::new(Duration::from_secs(5));
    search_pipeline_bootstrap::signals::install(coordinator.clone());

    let config = PipelineConfig::load(cli.config.as_deref())?;

    let index_url = Url::parse(&cli.index_url).map_err(|err| SearchError::InvalidConfiguration(format!("invalid index-url: {err}")))?;
    let authz_url = Url::parse(&cli.authz_url).map_err(|err| SearchError::InvalidConfiguration(format!("invalid authz-url: {err}")))?;

    let http_client = reqwest::Client::builder()
        .pool_max_idle_per_host(config.pool_max_connections)
        .pool_idle_timeout(config.pool_max_idle_time())
        .build()
        .map_err(|err| SearchError::InvalidConfiguration(err.to_string()))?;

    let index_source: Arc<dyn search_pipeline_domain::IndexSource> =
        Arc::new(HttpIndexSource::new(http_client.clone(), index_url, config.index_page_size));
    let authorizer: Arc<dyn search_pipeline_domain::AuthorizerClient> = Arc::new(HttpAuthorizerClient::new(
        http_client,
        authz_url,
        config.pool_max_connections,
        config.pool_pending_acquire_timeout(),
    ));

    let metrics = Arc::new(PipelineMetrics::new()?);

    let driver = PipelineDriver::new(
        index_source,
        authorizer,
        PipelineDriverConfig {
            concurrency: cli.concurrency.unwrap_or(config.concurrency),
            batch_size: config.batch_size,
            batch_delay: config.batch_delay(),
            default_limit: config.default_limit,
            auth_deadline: config.auth_deadline(),
            index_page_size: config.index_page_size,
        },
        metrics,
    );

    let request = SearchRequest::new(cli.query, cli.user_id, cli.limit)?;
    let mut stream = std::pin::pin!(driver.search(request));

    let token = coordinator.token();
    loop {
        tokio::select! {
            _ = token.cancelled() => {
                tracing::info!("shutdown requested, stopping stream early");
                break;
            }
            next = stream.next() => {
                match next {
                    Some(Ok(event)) => {
                        let line = serde_json::to_string(&event).map_err(|err| SearchError::InternalError(err.to_string()))?;
                        println!("{line}");
                    }
                    Some(Err(err)) => return Err(err),
                    None => break,
                }
            }
        }
    }

    Ok(())
}
