pub mod batcher;
pub mod ordered_filter;
pub mod pipeline_driver;

pub use batcher::{Batcher, BatcherConfig};
pub use ordered_filter::{OrderedFilter, OrderedFilterConfig};
pub use pipeline_driver::{PipelineDriver, PipelineDriverConfig};
