//! Shared helpers for the integration tests.
#![allow(dead_code)]

use relayrs::ProxyConfig;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{self, AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A SOCKS5 endpoint that requires username/password auth (RFC 1929) and
/// only supports CONNECT.
///
/// When `redirect` is set every tunnel goes there instead of the requested
/// target, which lets a test tell proxied and direct traffic apart.
pub struct FakeSocks5 {
    addr: SocketAddr,
    username: String,
    password: String,
    targets: Arc<Mutex<Vec<String>>>,
    auth_failures: Arc<Mutex<usize>>,
}

impl FakeSocks5 {
    pub async fn start(username: &str, password: &str) -> Self {
        Self::start_with_redirect(username, password, None).await
    }

    pub async fn start_with_redirect(
        username: &str,
        password: &str,
        redirect: Option<SocketAddr>,
    ) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let targets = Arc::new(Mutex::new(Vec::new()));
        let auth_failures = Arc::new(Mutex::new(0));

        let creds = (username.to_string(), password.to_string());
        let targets_clone = targets.clone();
        let failures_clone = auth_failures.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let creds = creds.clone();
                let targets = targets_clone.clone();
                let failures = failures_clone.clone();
                tokio::spawn(async move {
                    let _ = handle_client(stream, creds, redirect, targets, failures).await;
                });
            }
        });

        Self {
            addr,
            username: username.to_string(),
            password: password.to_string(),
            targets,
            auth_failures,
        }
    }

    pub fn config(&self) -> ProxyConfig {
        self.config_with_password(&self.password)
    }

    pub fn config_with_password(&self, password: &str) -> ProxyConfig {
        ProxyConfig {
            username: self.username.clone(),
            password: password.to_string(),
            host: self.addr.ip().to_string(),
            port: self.addr.port(),
        }
    }

    /// `host:port` of every CONNECT request that passed auth.
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }

    pub fn auth_failures(&self) -> usize {
        *self.auth_failures.lock().unwrap()
    }
}

async fn handle_client(
    mut client: TcpStream,
    (username, password): (String, String),
    redirect: Option<SocketAddr>,
    targets: Arc<Mutex<Vec<String>>>,
    auth_failures: Arc<Mutex<usize>>,
) -> io::Result<()> {
    // method selection
    let mut head = [0u8; 2];
    client.read_exact(&mut head).await?;
    if head[0] != 5 {
        return Ok(());
    }
    let mut methods = vec![0u8; head[1] as usize];
    client.read_exact(&mut methods).await?;
    if !methods.contains(&2) {
        client.write_all(&[5, 0xFF]).await?;
        return Ok(());
    }
    client.write_all(&[5, 2]).await?;

    // username/password
    let mut ver_ulen = [0u8; 2];
    client.read_exact(&mut ver_ulen).await?;
    let mut user = vec![0u8; ver_ulen[1] as usize];
    client.read_exact(&mut user).await?;
    let mut plen = [0u8; 1];
    client.read_exact(&mut plen).await?;
    let mut pass = vec![0u8; plen[0] as usize];
    client.read_exact(&mut pass).await?;

    if user != username.as_bytes() || pass != password.as_bytes() {
        *auth_failures.lock().unwrap() += 1;
        client.write_all(&[1, 1]).await?;
        return Ok(());
    }
    client.write_all(&[1, 0]).await?;

    // CONNECT request
    let mut req = [0u8; 4];
    client.read_exact(&mut req).await?;
    if req[1] != 1 {
        client.write_all(&[5, 7, 0, 1, 0, 0, 0, 0, 0, 0]).await?;
        return Ok(());
    }
    let host = match req[3] {
        1 => {
            let mut ip = [0u8; 4];
            client.read_exact(&mut ip).await?;
            std::net::Ipv4Addr::from(ip).to_string()
        }
        3 => {
            let mut len = [0u8; 1];
            client.read_exact(&mut len).await?;
            let mut name = vec![0u8; len[0] as usize];
            client.read_exact(&mut name).await?;
            String::from_utf8_lossy(&name).into_owned()
        }
        4 => {
            let mut ip = [0u8; 16];
            client.read_exact(&mut ip).await?;
            std::net::Ipv6Addr::from(ip).to_string()
        }
        _ => {
            client.write_all(&[5, 8, 0, 1, 0, 0, 0, 0, 0, 0]).await?;
            return Ok(());
        }
    };
    let mut port = [0u8; 2];
    client.read_exact(&mut port).await?;
    let port = u16::from_be_bytes(port);
    targets.lock().unwrap().push(format!("{}:{}", host, port));

    let upstream = match redirect {
        Some(addr) => TcpStream::connect(addr).await,
        None => TcpStream::connect((host.as_str(), port)).await,
    };
    let mut upstream = match upstream {
        Ok(s) => s,
        Err(_) => {
            client.write_all(&[5, 5, 0, 1, 0, 0, 0, 0, 0, 0]).await?;
            return Ok(());
        }
    };
    client.write_all(&[5, 0, 0, 1, 0, 0, 0, 0, 0, 0]).await?;

    io::copy_bidirectional(&mut client, &mut upstream).await?;
    Ok(())
}

/// A local address nothing listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}
