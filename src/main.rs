use anyhow::Context;
use relayrs::configuration::Settings;
use relayrs::server;
use relayrs::verification::verify_proxy;
use relayrs::HttpRelay;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    relayrs::logging::builder()
        .parse_default_env() // RUST_LOG still wins
        .init();

    let settings = Settings::new()?;

    // Fail fast: a bad proxy string never degrades to direct connections.
    let proxy = settings
        .proxy_config()
        .context("cannot load proxy configuration")?;
    let endpoints = settings.upstreams.endpoints();

    if std::env::args().nth(1).as_deref() == Some("check") {
        let proxy = proxy.context("`check` needs PROXY_URL")?;
        let report = verify_proxy(&endpoints, &proxy).await?;
        match &report.direct {
            Some(d) => println!("direct:  {} ({}, {})", d.ip, d.city, d.country),
            None => println!("direct:  unavailable"),
        }
        println!(
            "proxied: {} ({}, {})",
            report.proxied.ip, report.proxied.city, report.proxied.country
        );
        println!("ip changed: {}", report.ip_changed);
        for check in &report.articles {
            let q = &check.query;
            print!("articles type={} pageNo={} pageSize={}: ", q.kind, q.page_no, q.page_size);
            match &check.outcome {
                Ok(s) => println!(
                    "ok, keys {:?}, success {:?}, catalogs {:?}",
                    s.keys, s.success, s.catalogs
                ),
                Err(e) => println!("failed, {}", e),
            }
        }
        return Ok(());
    }

    match &proxy {
        Some(p) => log::info!("routing outbound requests through {}", p),
        None => log::warn!("PROXY_URL not set, connecting to upstreams directly"),
    }

    let listener = TcpListener::bind(&settings.server.listen)
        .await
        .with_context(|| format!("cannot listen on {}", settings.server.listen))?;
    log::info!("listening on {}", listener.local_addr()?);

    let relay = Arc::new(HttpRelay::new(endpoints, proxy));
    server::serve(listener, relay).await?;
    Ok(())
}
