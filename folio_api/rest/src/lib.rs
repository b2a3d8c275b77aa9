use std::{io::ErrorKind, net::IpAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use folio_core_contact_contracts::ContactService;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middlewares::origin::OriginGateConfig;

mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Contact> {
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub host: IpAddr,
    /// Preferred port; [`bind_available`] probes upward from here.
    pub port: u16,
    /// Exact-match origin allow-list.
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
    /// Include error chains in 500 response bodies (development mode).
    pub verbose_errors: bool,
}

impl<Contact> RestServer<Contact>
where
    Contact: ContactService,
{
    pub fn new(contact: Contact, config: RestServerConfig) -> Self {
        Self { contact, config }
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let listener = bind_available(self.config.host, self.config.port).await?;
        info!("Listening on {}", listener.local_addr()?);
        self.serve_on(listener).await
    }

    /// Serves on an already bound listener.
    pub async fn serve_on(self, listener: TcpListener) -> anyhow::Result<()> {
        let router = self.router();
        axum::serve(listener, router).await.map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let origin_config = Arc::new(OriginGateConfig {
            allowed_origins: self.config.allowed_origins,
            allow_credentials: self.config.allow_credentials,
        });

        let router = Router::new()
            .merge(routes::health::router())
            .merge(routes::contact::router(
                self.contact.into(),
                self.config.verbose_errors,
            ));

        let router = middlewares::origin::add(origin_config)(router);
        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        middlewares::request_id::add(router)
    }
}

/// Binds the first free port at or above `preferred_port`. Ports that are
/// already taken are skipped; any other bind error aborts startup.
pub async fn bind_available(host: IpAddr, preferred_port: u16) -> anyhow::Result<TcpListener> {
    let mut port = preferred_port;
    loop {
        match TcpListener::bind((host, port)).await {
            Ok(listener) => return Ok(listener),
            Err(err) if err.kind() == ErrorKind::AddrInUse => {
                warn!("Port {port} is in use, trying {}", port + 1);
                port = port
                    .checked_add(1)
                    .with_context(|| format!("No free port at or above {preferred_port}"))?;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to bind {host}:{port}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    #[tokio::test]
    async fn bind_available_skips_taken_ports() {
        let host = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let taken = TcpListener::bind((host, 0)).await.unwrap();
        let preferred = taken.local_addr().unwrap().port();

        let listener = bind_available(host, preferred).await.unwrap();

        assert_eq!(listener.local_addr().unwrap().port(), preferred + 1);
    }
}
