use super::{get_json, new_client, Endpoints};
use crate::error::RelayError;
use crate::proxy::ProxyConfig;
use log::{debug, error};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const BROWSER_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 ",
    "(KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36"
);
const BROWSER_ACCEPT: &str = "application/json, text/plain, */*";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const SITE_ORIGIN: &str = "https://www.binance.com";
const SITE_REFERER: &str = "https://www.binance.com/";

/// Article-list parameters, forwarded as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleQuery {
    #[serde(rename = "type")]
    pub kind: i64,
    #[serde(rename = "pageNo")]
    pub page_no: i64,
    #[serde(rename = "pageSize")]
    pub page_size: i64,
}

/// The upstream rejects requests that do not look like they come from its
/// own web page.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE));
    headers.insert(ORIGIN, HeaderValue::from_static(SITE_ORIGIN));
    headers.insert(REFERER, HeaderValue::from_static(SITE_REFERER));
    headers
}

pub async fn fetch_articles(
    endpoints: &Endpoints,
    proxy: Option<&ProxyConfig>,
    query: ArticleQuery,
) -> Result<Value, RelayError> {
    let client = new_client(proxy, endpoints.article_timeout)?;
    debug!(
        "fetching articles type={} pageNo={} pageSize={} via {}",
        query.kind,
        query.page_no,
        query.page_size,
        proxy.map(|p| p.addr()).unwrap_or_else(|| "direct".to_string())
    );

    let request = client
        .get(&endpoints.article_url)
        .headers(browser_headers())
        .query(&query);

    get_json(request).await.map_err(|e| {
        error!("article fetch failed: {}", e);
        e
    })
}
