use super::{get_json, new_client, Endpoints};
use crate::error::RelayError;
use crate::proxy::ProxyConfig;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Public address and location of this host as seen by the lookup service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub ip: String,
    pub country: String,
    pub city: String,
}

impl ServerInfo {
    /// Reads `query`, `country` and `city`. Missing or non-string fields
    /// become empty strings.
    pub fn from_lookup(body: &Value) -> Self {
        let field = |name: &str| {
            body.get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            ip: field("query"),
            country: field("country"),
            city: field("city"),
        }
    }
}

pub async fn fetch_server_info(
    endpoints: &Endpoints,
    proxy: Option<&ProxyConfig>,
) -> Result<ServerInfo, RelayError> {
    let client = new_client(proxy, endpoints.geolocation_timeout)?;
    debug!("looking up egress ip at {}", endpoints.geolocation_url);

    let body = get_json(client.get(&endpoints.geolocation_url))
        .await
        .map_err(|e| {
            error!("ip lookup failed: {}", e);
            e
        })?;

    Ok(ServerInfo::from_lookup(&body))
}
