pub mod configuration;
pub mod error;
pub mod logging;
pub mod proxy;
pub mod relay;
pub mod server;
pub mod upstreams;
pub mod verification;

pub use error::RelayError;
pub use proxy::ProxyConfig;
pub use relay::{HttpRelay, Relay};
