use std::{future::Future, time::Duration};

use anyhow::Context;
use folio_api_rest::{RestServer, RestServerConfig};
use folio_config::{Config, ContactBackendKind};
use folio_core_contact_impl::ContactServiceImpl;
use tracing::{error, info, warn};

use crate::{backend::ContactBackend, database, document, email};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let backend = connect_backend(&config).await?;

    let server = RestServer::new(
        ContactServiceImpl::new(backend),
        RestServerConfig {
            host: config.http.host,
            port: config.http.port,
            allowed_origins: config.http.allowed_origins,
            allow_credentials: config.http.allow_credentials,
            verbose_errors: config.general.mode.is_development(),
        },
    );
    server.serve().await
}

/// The availability half of startup: a bounded number of connection attempts
/// with a fixed delay in between. If they are all spent the server comes up
/// anyway and serves everything except submissions, so the site itself stays
/// reachable.
async fn connect_backend(config: &Config) -> anyhow::Result<ContactBackend> {
    match config.contact.backend {
        ContactBackendKind::Postgres => {
            let db_config = config
                .database
                .as_ref()
                .context("contact.backend = \"postgres\" requires a [database] section")?;

            info!("Connecting to database");
            match connect_with_retry(
                "database",
                db_config.connect_attempts,
                db_config.connect_retry_delay.into(),
                || database::connect(db_config),
            )
            .await
            {
                Ok(store) => {
                    store
                        .ensure_schema()
                        .await
                        .context("Failed to ensure contact_messages table")?;
                    info!("Database ready");
                    Ok(ContactBackend::Postgres(store))
                }
                Err(err) => Ok(degraded("database", err)),
            }
        }
        ContactBackendKind::Mongodb => {
            let mongo_config = config
                .mongodb
                .as_ref()
                .context("contact.backend = \"mongodb\" requires a [mongodb] section")?;

            info!("Connecting to MongoDB");
            match connect_with_retry(
                "MongoDB",
                mongo_config.connect_attempts,
                mongo_config.connect_retry_delay.into(),
                || document::connect(mongo_config),
            )
            .await
            {
                Ok(store) => {
                    info!("MongoDB ready");
                    Ok(ContactBackend::Mongodb(store))
                }
                Err(err) => Ok(degraded("MongoDB", err)),
            }
        }
        ContactBackendKind::Smtp => {
            let email_config = config
                .email
                .as_ref()
                .context("contact.backend = \"smtp\" requires an [email] section")?;
            Ok(ContactBackend::Smtp(email::connect(email_config)?))
        }
    }
}

async fn connect_with_retry<T, C, Fut>(
    what: &str,
    attempts: u32,
    delay: Duration,
    mut connect: C,
) -> anyhow::Result<T>
where
    C: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut attempt = 1;
    loop {
        match connect().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                warn!("Failed to connect to the {what} (attempt {attempt}/{attempts}): {err:#}");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

fn degraded(what: &str, err: anyhow::Error) -> ContactBackend {
    error!("Failed to connect to the {what}: {err:#}");
    warn!("Starting degraded: contact submissions will fail until the {what} becomes reachable");
    ContactBackend::Unavailable
}
