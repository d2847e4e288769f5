pub mod http_authorizer_client;
pub mod http_index_source;

pub use http_authorizer_client::HttpAuthorizerClient;
pub use http_index_source::HttpIndexSource;
