use crate::error::RelayError;
use crate::proxy::ProxyConfig;
use crate::upstreams::articles::{fetch_articles, ArticleQuery};
use crate::upstreams::geolocation::{fetch_server_info, ServerInfo};
use crate::upstreams::Endpoints;
use log::{info, warn};
use serde_json::Value;

/// Article-list requests tried through the proxy.
pub const ARTICLE_CHECKS: [ArticleQuery; 2] = [
    ArticleQuery {
        kind: 1,
        page_no: 1,
        page_size: 1,
    },
    ArticleQuery {
        kind: 1,
        page_no: 1,
        page_size: 50,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyVerification {
    /// Egress seen without the proxy, if that lookup worked.
    pub direct: Option<ServerInfo>,
    pub proxied: ServerInfo,
    pub ip_changed: bool,
    /// One entry per [`ARTICLE_CHECKS`] query, in order.
    pub articles: Vec<ArticleCheck>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCheck {
    pub query: ArticleQuery,
    pub outcome: Result<ArticleSummary, RelayError>,
}

/// Shape of a successful article-list answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleSummary {
    pub keys: Vec<String>,
    pub success: Option<bool>,
    pub catalogs: Option<usize>,
}

impl ArticleSummary {
    pub fn from_body(body: &Value) -> Self {
        Self {
            keys: sorted_keys(body),
            success: body.get("success").and_then(Value::as_bool),
            catalogs: body
                .pointer("/data/catalogs")
                .and_then(Value::as_array)
                .map(Vec::len),
        }
    }
}

fn sorted_keys(body: &Value) -> Vec<String> {
    let mut keys: Vec<String> = body
        .as_object()
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default();
    keys.sort();
    keys
}

/// Compares the egress address with and without the proxy, then tries the
/// article list through it.
///
/// Only the proxied address lookup has to succeed; article failures are
/// reported in the result.
pub async fn verify_proxy(
    endpoints: &Endpoints,
    proxy: &ProxyConfig,
) -> Result<ProxyVerification, RelayError> {
    let direct = match fetch_server_info(endpoints, None).await {
        Ok(info) => {
            info!("direct egress ip {} ({}, {})", info.ip, info.city, info.country);
            Some(info)
        }
        Err(e) => {
            warn!("direct ip lookup failed: {}", e);
            None
        }
    };

    let proxied = fetch_server_info(endpoints, Some(proxy)).await?;
    info!(
        "egress ip via {} is {} ({}, {})",
        proxy, proxied.ip, proxied.city, proxied.country
    );

    let ip_changed = direct.as_ref().map_or(true, |d| d.ip != proxied.ip);
    if !ip_changed {
        warn!("egress ip did not change through {}; the proxy may not be in use", proxy);
    }

    let mut articles = Vec::with_capacity(ARTICLE_CHECKS.len());
    for query in ARTICLE_CHECKS {
        let outcome = fetch_articles(endpoints, Some(proxy), query)
            .await
            .map(|body| ArticleSummary::from_body(&body));
        match &outcome {
            Ok(summary) => {
                info!("article list pageSize={} keys {:?}", query.page_size, summary.keys)
            }
            Err(e) => warn!("article list pageSize={} failed: {}", query.page_size, e),
        }
        articles.push(ArticleCheck { query, outcome });
    }

    Ok(ProxyVerification {
        direct,
        proxied,
        ip_changed,
        articles,
    })
}
