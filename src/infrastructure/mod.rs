mod crawler_parallel;
mod crawler_worker;
mod enricher_github;
mod fetcher_http;
mod fetcher_retrier;
mod lookup_graphql;
mod persister_filter;
mod persister_json;
mod sleeper_tokio;

pub use crawler_parallel::*;
pub use crawler_worker::*;
pub use enricher_github::*;
pub use fetcher_http::*;
pub use fetcher_retrier::*;
pub use lookup_graphql::*;
pub use persister_filter::*;
pub use persister_json::*;
pub use sleeper_tokio::*;
