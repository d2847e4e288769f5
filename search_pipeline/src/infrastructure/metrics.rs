// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Metrics
//!
//! Prometheus counters and gauges for the core's own activity. Emission
//! across the HTTP boundary is out of scope; this module only registers
//! and updates the series, the way `MetricsService` does for the wider
//! pipeline, scoped down to what the Batcher and Ordered Concurrent Filter
//! actually produce.

use std::sync::Arc;

use prometheus::{IntCounter, IntGauge, Opts, Registry};

use search_pipeline_domain::error::SearchError;

#[derive(Clone)]
pub struct PipelineMetrics {
    registry: Arc<Registry>,
    batches_submitted_total: IntCounter,
    batches_completed_total: IntCounter,
    authorization_calls_total: IntCounter,
    authorization_timeouts_total: IntCounter,
    events_emitted_total: IntCounter,
    tickets_in_flight: IntGauge,
}

impl PipelineMetrics {
    pub fn new() -> Result<Self, SearchError> {
        let registry = Registry::new();

        let batches_submitted_total = IntCounter::with_opts(
            Opts::new("batches_submitted_total", "Total batches submitted to the authorization fan-out").namespace("search_pipeline"),
        )
        .map_err(metrics_error("batches_submitted_total"))?;

        let batches_completed_total = IntCounter::with_opts(
            Opts::new("batches_completed_total", "Total batches whose authorization result has drained").namespace("search_pipeline"),
        )
        .map_err(metrics_error("batches_completed_total"))?;

        let authorization_calls_total = IntCounter::with_opts(
            Opts::new("authorization_calls_total", "Total authorization calls issued").namespace("search_pipeline"),
        )
        .map_err(metrics_error("authorization_calls_total"))?;

        let authorization_timeouts_total = IntCounter::with_opts(
            Opts::new("authorization_timeouts_total", "Total authorization calls that missed their deadline").namespace("search_pipeline"),
        )
        .map_err(metrics_error("authorization_timeouts_total"))?;

        let events_emitted_total = IntCounter::with_opts(
            Opts::new("events_emitted_total", "Total authorized events streamed to callers").namespace("search_pipeline"),
        )
        .map_err(metrics_error("events_emitted_total"))?;

        let tickets_in_flight = IntGauge::with_opts(
            Opts::new("tickets_in_flight", "Authorization tickets currently outstanding").namespace("search_pipeline"),
        )
        .map_err(metrics_error("tickets_in_flight"))?;

        registry.register(Box::new(batches_submitted_total.clone())).map_err(metrics_error("batches_submitted_total"))?;
        registry.register(Box::new(batches_completed_total.clone())).map_err(metrics_error("batches_completed_total"))?;
        registry.register(Box::new(authorization_calls_total.clone())).map_err(metrics_error("authorization_calls_total"))?;
        registry
            .register(Box::new(authorization_timeouts_total.clone()))
            .map_err(metrics_error("authorization_timeouts_total"))?;
        registry.register(Box::new(events_emitted_total.clone())).map_err(metrics_error("events_emitted_total"))?;
        registry.register(Box::new(tickets_in_flight.clone())).map_err(metrics_error("tickets_in_flight"))?;

        Ok(Self {
            registry: Arc::new(registry),
            batches_submitted_total,
            batches_completed_total,
            authorization_calls_total,
            authorization_timeouts_total,
            events_emitted_total,
            tickets_in_flight,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_batch_submitted(&self) {
        self.batches_submitted_total.inc();
        self.tickets_in_flight.inc();
    }

    pub fn record_batch_completed(&self) {
        self.batches_completed_total.inc();
        self.tickets_in_flight.dec();
    }

    pub fn record_authorization_call(&self) {
        self.authorization_calls_total.inc();
    }

    pub fn record_authorization_timeout(&self) {
        self.authorization_timeouts_total.inc();
    }

    pub fn record_events_emitted(&self, count: u64) {
        self.events_emitted_total.inc_by(count);
    }
}

fn metrics_error(metric: &'static str) -> impl Fn(prometheus::Error) -> SearchError {
    move |err| SearchError::InternalError(format!("failed to register metric {metric}: {err}"))
}
