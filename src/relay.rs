use crate::error::RelayError;
use crate::proxy::ProxyConfig;
use crate::upstreams::articles::{fetch_articles, ArticleQuery};
use crate::upstreams::geolocation::{fetch_server_info, ServerInfo};
use crate::upstreams::Endpoints;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait Relay: Send + Sync {
    async fn articles(&self, query: ArticleQuery) -> Result<Value, RelayError>;
    async fn server_info(&self) -> Result<ServerInfo, RelayError>;
}

/// Relay backed by real outbound HTTP calls.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    endpoints: Endpoints,
    proxy: Option<ProxyConfig>,
}

impl HttpRelay {
    pub fn new(endpoints: Endpoints, proxy: Option<ProxyConfig>) -> Self {
        Self { endpoints, proxy }
    }
}

#[async_trait]
impl Relay for HttpRelay {
    async fn articles(&self, query: ArticleQuery) -> Result<Value, RelayError> {
        fetch_articles(&self.endpoints, self.proxy.as_ref(), query).await
    }

    async fn server_info(&self) -> Result<ServerInfo, RelayError> {
        fetch_server_info(&self.endpoints, self.proxy.as_ref()).await
    }
}
