pub mod adapters;
pub mod config;
pub mod logging;
pub mod metrics;

pub use adapters::{HttpAuthorizerClient, HttpIndexSource};
pub use config::PipelineConfig;
pub use metrics::PipelineMetrics;
