pub mod articles;
pub mod geolocation;

use crate::error::RelayError;
use crate::proxy::ProxyConfig;
use log::debug;
use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

pub const ARTICLE_LIST_URL: &str =
    "https://www.binance.com/bapi/apex/v1/public/apex/cms/article/list/query";
pub const GEOLOCATION_URL: &str = "http://ip-api.com/json";

/// Where the relay sends its outbound calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub article_url: String,
    pub article_timeout: Duration,
    pub geolocation_url: String,
    pub geolocation_timeout: Duration,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            article_url: ARTICLE_LIST_URL.to_string(),
            article_timeout: Duration::from_secs(15),
            geolocation_url: GEOLOCATION_URL.to_string(),
            geolocation_timeout: Duration::from_secs(10),
        }
    }
}

/// Builds a client for one outbound call.
///
/// With a proxy every connection of this client goes through it; without
/// one the client connects directly and ignores proxy environment variables.
pub fn new_client(proxy: Option<&ProxyConfig>, timeout: Duration) -> Result<Client, RelayError> {
    let mut builder = Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(0) // one-off requests
        .redirect(Policy::none()); // a 3xx is an upstream failure

    builder = match proxy {
        Some(p) => builder.proxy(p.to_proxy()?),
        None => builder.no_proxy(),
    };

    builder.build().map_err(|e| RelayError::Config(e.to_string()))
}

/// Sends the request and decodes a 2xx body as JSON.
pub(crate) async fn get_json(request: RequestBuilder) -> Result<Value, RelayError> {
    let resp = request.send().await?;

    let status = resp.status();
    if !status.is_success() {
        debug!("upstream {} answered {}", resp.url(), status);
        return Err(RelayError::Upstream {
            status: status.as_u16(),
        });
    }

    let body = resp.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| RelayError::Decode(e.to_string()))
}
